//! Recommended API entrypoints.
//!
//! Intended usage in app code:
//! - `BoardClient` over a `RemoteCollection` transport for the full
//!   optimistic cycle,
//! - `ItemFilter`/`SortOrder`/`paginate` in the view layer,
//! - `ProjectionStore` directly only for advanced/synchronous embedding.

pub use crate::core::{
    Comment, Item, ItemId, ItemKind, NewItem, RequestStatus, Result, StoreError, UserId,
};
pub use crate::facade::{BoardClient, Notice};
pub use crate::mutation::{Mutation, MutationId, PendingMutation, PendingState};
pub use crate::projection::{ItemFilter, Page, SortOrder, paginate};
pub use crate::store::{LoadTicket, ProjectionStore};
pub use crate::transport::{InMemoryBackend, RemoteCollection, ServerPatch};
