// ============================================================================
// Mutation Descriptions
// ============================================================================
//
// Implements the Command Pattern for optimistic collection changes. Each
// Mutation describes one user action; the store applies it immediately and
// the transport persists it asynchronously.
//
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::core::{ItemId, NewItem, RequestStatus, UserId};

/// A single optimistic change to the collection
///
/// Mutations are:
/// - Applied immediately by the store (optimistic visibility)
/// - Sent to the transport for persistence
/// - Reconciled on settlement (commit or rollback)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Insert a new item
    Create { fields: NewItem },

    /// Move a request-like item through the status enumeration
    SetStatus { item: ItemId, status: RequestStatus },

    /// Idempotent like toggle by one user
    ToggleLike { item: ItemId, user: UserId },

    /// Pin or unpin a post
    TogglePin { item: ItemId },

    /// Append a comment to a post
    AddComment {
        item: ItemId,
        author: UserId,
        text: String,
    },

    /// Remove an item
    Delete { item: ItemId },
}

impl Mutation {
    /// Get the id of the targeted item; `None` for creates, which target an
    /// item that does not exist yet
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            Mutation::Create { .. } => None,
            Mutation::SetStatus { item, .. } => Some(item),
            Mutation::ToggleLike { item, .. } => Some(item),
            Mutation::TogglePin { item } => Some(item),
            Mutation::AddComment { item, .. } => Some(item),
            Mutation::Delete { item } => Some(item),
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Mutation::Create { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Mutation::Delete { .. })
    }

    /// Short operation name for logging
    pub fn describe(&self) -> &'static str {
        match self {
            Mutation::Create { .. } => "create",
            Mutation::SetStatus { .. } => "set_status",
            Mutation::ToggleLike { .. } => "toggle_like",
            Mutation::TogglePin { .. } => "toggle_pin",
            Mutation::AddComment { .. } => "add_comment",
            Mutation::Delete { .. } => "delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ItemKind;

    #[test]
    fn test_mutation_item_id() {
        let set = Mutation::SetStatus {
            item: ItemId::new("req-1"),
            status: RequestStatus::Done,
        };
        assert_eq!(set.item_id(), Some(&ItemId::new("req-1")));

        let create = Mutation::Create {
            fields: NewItem::new(ItemKind::Cleaning, "Hallway", UserId::new("alice")),
        };
        assert_eq!(create.item_id(), None);
    }

    #[test]
    fn test_mutation_classification() {
        let create = Mutation::Create {
            fields: NewItem::new(ItemKind::Post, "Hello", UserId::new("bob")),
        };
        assert!(create.is_create());
        assert!(!create.is_delete());

        let delete = Mutation::Delete {
            item: ItemId::new("post-1"),
        };
        assert!(delete.is_delete());
        assert_eq!(delete.describe(), "delete");
    }
}
