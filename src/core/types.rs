use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier for an item.
///
/// Assigned once: client-generated (uuid v4) for optimistic local inserts,
/// replaced by the server-assigned id when the create is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(raw: impl Into<String>) -> Self {
        ItemId(raw.into())
    }

    /// Generate a provisional client-side id
    pub fn generate() -> Self {
        ItemId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        ItemId(raw.to_string())
    }
}

/// Identifier of a portal user (resident or landlord).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Self {
        UserId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(raw: &str) -> Self {
        UserId(raw.to_string())
    }
}

/// Item subtype tag: determines which fields are meaningful and how the
/// item renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Cleaning request (request-like: carries a status)
    Cleaning,

    /// Repair request (request-like: carries a status)
    Repair,

    /// Community post (post-like: pinned/likes/comments are meaningful)
    Post,
}

impl ItemKind {
    /// Request-like items move through the status enumeration
    pub fn is_request(&self) -> bool {
        matches!(self, ItemKind::Cleaning | ItemKind::Repair)
    }

    /// Post-like items carry the social fields
    pub fn is_post(&self) -> bool {
        matches!(self, ItemKind::Post)
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Cleaning => write!(f, "cleaning"),
            ItemKind::Repair => write!(f, "repair"),
            ItemKind::Post => write!(f, "post"),
        }
    }
}

/// Triage status of a request-like item
///
/// State transitions only move through this closed enumeration:
/// ```text
/// Open ──> InProgress ──> Done
/// ```
/// Unrecognized input values normalize to `Open`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RequestStatus {
    #[default]
    Open,
    InProgress,
    Done,
}

impl RequestStatus {
    /// Parse a raw status value, normalizing anything unrecognized to `Open`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" => RequestStatus::Open,
            "in_progress" | "in-progress" | "in progress" => RequestStatus::InProgress,
            "done" => RequestStatus::Done,
            _ => RequestStatus::Open,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Open => "open",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Done => "done",
        }
    }
}

impl From<String> for RequestStatus {
    fn from(raw: String) -> Self {
        RequestStatus::parse(&raw)
    }
}

impl From<&str> for RequestStatus {
    fn from(raw: &str) -> Self {
        RequestStatus::parse(raw)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
