pub mod memory;
pub mod remote;

pub use memory::InMemoryBackend;
pub use remote::{RemoteCollection, ServerPatch};
