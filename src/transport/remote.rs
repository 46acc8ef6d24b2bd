use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Item, ItemId, RequestStatus, Result};
use crate::mutation::Mutation;

/// Authoritative fields returned by the backend after a successful persist.
///
/// Server wins on confirmed data: any field present here overwrites the
/// optimistic local value at commit time. The main case is the
/// server-assigned id and canonical timestamp replacing the provisional
/// ones on a confirmed create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
}

impl ServerPatch {
    /// A patch with no authoritative fields; the optimistic state stands
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_id(id: ItemId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.created_at.is_none() && self.status.is_none()
    }

    /// Overwrite local fields with the authoritative server values
    pub fn merge_into(&self, item: &mut Item) {
        if let Some(id) = &self.id {
            item.id = id.clone();
        }
        if let Some(created_at) = self.created_at {
            item.created_at = created_at;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
    }
}

/// The remote collaborator the store consumes.
///
/// Exactly two operations; whatever transport layer is chosen (HTTP,
/// in-process, test double) implements them. All failures must map into
/// the crate error taxonomy, never panic across this seam.
#[async_trait]
pub trait RemoteCollection: Send + Sync {
    /// Fetch the authoritative collection snapshot
    async fn fetch_collection(&self, resource: &str) -> Result<Vec<Item>>;

    /// Persist one mutation, returning the authoritative fields to merge
    async fn persist_mutation(&self, resource: &str, mutation: &Mutation) -> Result<ServerPatch>;
}
