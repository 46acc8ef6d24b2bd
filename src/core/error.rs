use thiserror::Error;

use crate::core::types::ItemId;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Load failed: {0}")]
    LoadFailed(String),

    #[error("Mutation rejected: {0}")]
    MutationRejected(String),

    #[error("Mutation timed out: {0}")]
    MutationTimeout(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Stale response for sequence {0}")]
    StaleResponse(u64),

    #[error("Item '{0}' not found")]
    ItemNotFound(ItemId),

    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Whether this failure should be surfaced to the user.
    ///
    /// `LoadFailed` on a background refresh keeps showing the last good
    /// snapshot, and `StaleResponse` is an internal staleness rejection;
    /// neither warrants a notice on its own.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            StoreError::MutationRejected(_)
                | StoreError::MutationTimeout(_)
                | StoreError::NetworkError(_)
        )
    }

    /// Whether this is a superseded/out-of-order response.
    pub fn is_stale(&self) -> bool {
        matches!(self, StoreError::StaleResponse(_))
    }
}
