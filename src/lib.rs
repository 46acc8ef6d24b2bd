// ============================================================================
// Boardsync Library
// ============================================================================

pub mod core;
pub mod facade;
pub mod mutation;
pub mod prelude;
pub mod projection;
pub mod store;
pub mod transport;

// Re-export main types for convenience
pub use crate::core::{Comment, Item, ItemId, ItemKind, NewItem, RequestStatus, UserId};
pub use crate::core::{Result, StoreError};
pub use crate::facade::{BoardClient, Notice};
pub use crate::mutation::{Mutation, MutationId, PendingMutation, PendingState};
pub use crate::projection::{ItemFilter, Page, SortOrder, paginate};
pub use crate::store::{LoadTicket, ProjectionStore};
pub use crate::transport::{InMemoryBackend, RemoteCollection, ServerPatch};
