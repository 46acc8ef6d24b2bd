use crate::core::{Item, ItemKind, UserId};

/// Predicate over the collection used by `project`
///
/// All criteria are optional and combine with AND. Built in the usual
/// builder style:
///
/// ```
/// use boardsync::{ItemFilter, ItemKind, UserId};
///
/// let filter = ItemFilter::all()
///     .query("faucet")
///     .owned_by(UserId::new("alice"))
///     .kind(ItemKind::Repair);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    query: Option<String>,
    owner: Option<UserId>,
    kinds: Option<Vec<ItemKind>>,
}

impl ItemFilter {
    /// Match everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Case-insensitive text query over title and body
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Only items owned by the given user
    pub fn owned_by(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Restrict to a kind; may be called repeatedly to allow several kinds
    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.kinds.get_or_insert_with(Vec::new).push(kind);
        self
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(query) = &self.query {
            if !item.matches_query(query) {
                return false;
            }
        }
        if let Some(owner) = &self.owner {
            if &item.owner != owner {
                return false;
            }
        }
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&item.kind) {
                return false;
            }
        }
        true
    }
}
