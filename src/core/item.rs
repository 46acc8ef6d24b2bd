use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{ItemId, ItemKind, RequestStatus, UserId};

/// A comment on a post-like item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A domain record: cleaning/repair request or community post.
///
/// `kind` determines which fields are meaningful: request-like items use
/// `status`, post-like items use `pinned`/`liked_by`/`comments`. `liked_by`
/// is a set, so the at-most-once like invariant is structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub title: String,

    #[serde(default)]
    pub body: String,

    pub owner: UserId,

    #[serde(default)]
    pub status: RequestStatus,

    #[serde(default)]
    pub pinned: bool,

    #[serde(default)]
    pub liked_by: BTreeSet<UserId>,

    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Default ordering key
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn like_count(&self) -> usize {
        self.liked_by.len()
    }

    /// Case-insensitive text match over title and body
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.body.to_lowercase().contains(&needle)
    }
}

/// Field bundle for an optimistic create.
///
/// The store assigns a provisional id and timestamp when the create is
/// applied; the backend replaces both with authoritative values on confirm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub kind: ItemKind,
    pub title: String,

    #[serde(default)]
    pub body: String,

    pub owner: UserId,

    #[serde(default)]
    pub status: RequestStatus,
}

impl NewItem {
    pub fn new(kind: ItemKind, title: &str, owner: UserId) -> Self {
        Self {
            kind,
            title: title.to_string(),
            body: String::new(),
            owner,
            status: RequestStatus::Open,
        }
    }

    /// Set the body text
    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Set the initial status (raw input is normalized)
    pub fn status(mut self, status: impl Into<RequestStatus>) -> Self {
        self.status = status.into();
        self
    }

    /// Materialize the item with the given id and timestamp
    pub fn into_item(self, id: ItemId, created_at: DateTime<Utc>) -> Item {
        Item {
            id,
            kind: self.kind,
            title: self.title,
            body: self.body,
            owner: self.owner,
            status: self.status,
            pinned: false,
            liked_by: BTreeSet::new(),
            comments: Vec::new(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_json_with_unknown_status_normalizes_to_open() {
        let raw = r#"{
            "id": "req-1",
            "kind": "repair",
            "title": "Leaking faucet",
            "owner": "alice",
            "status": "URGENT!!!",
            "created_at": "2024-05-01T12:00:00Z"
        }"#;

        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(item.status, RequestStatus::Open);
        assert!(item.liked_by.is_empty());
        assert!(item.comments.is_empty());
    }

    #[test]
    fn test_matches_query_is_case_insensitive() {
        let item = NewItem::new(ItemKind::Post, "Pool Party", UserId::new("bob"))
            .body("Saturday at the clubhouse")
            .into_item(ItemId::new("post-1"), Utc::now());

        assert!(item.matches_query("pool"));
        assert!(item.matches_query("CLUBHOUSE"));
        assert!(!item.matches_query("garage"));
    }
}
