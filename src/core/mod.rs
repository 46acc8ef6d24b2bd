pub mod error;
pub mod item;
pub mod types;

pub use error::{Result, StoreError};
pub use item::{Comment, Item, NewItem};
pub use types::{ItemId, ItemKind, RequestStatus, UserId};
