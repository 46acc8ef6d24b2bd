pub mod change;
pub mod pending;

pub use change::Mutation;
pub use pending::{MutationId, PendingMutation, PendingState};
