// ============================================================================
// Pending Mutation Lifecycle
// ============================================================================
//
// Implements the State Pattern for the in-flight optimistic record. Each
// pending mutation moves through defined states:
// InFlight -> Committed/RolledBack
//
// Pending mutations carry the pre-mutation snapshot so a failed persist can
// restore the item exactly. They live only until the network call settles
// and are never persisted.
//
// ============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::core::{Item, ItemId, Result, StoreError};

/// Global mutation sequence counter
static NEXT_MUTATION_ID: AtomicU64 = AtomicU64::new(1);

/// Monotonically increasing identifier for a pending mutation
///
/// The ordering of ids is the ordering of issuance, which is what makes
/// stale commit/rollback rejection possible: a settlement for an id the
/// store no longer tracks is superseded and gets discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationId(pub u64);

impl MutationId {
    /// Generate the next mutation id
    pub fn new() -> Self {
        MutationId(NEXT_MUTATION_ID.fetch_add(1, Ordering::SeqCst))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for MutationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MutationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mut_{}", self.0)
    }
}

/// Pending mutation state following the State Pattern
///
/// State transitions:
/// ```text
/// InFlight ──commit──> Committed
///    │
///    └──rollback──> RolledBack
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingState {
    /// Persist call has not settled yet
    InFlight,

    /// Server accepted the mutation
    Committed,

    /// Persist failed; the snapshot was restored
    RolledBack,
}

impl PendingState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, PendingState::InFlight)
    }

    /// Check if the mutation reached a terminal state
    pub fn is_settled(&self) -> bool {
        matches!(self, PendingState::Committed | PendingState::RolledBack)
    }
}

impl std::fmt::Display for PendingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PendingState::InFlight => write!(f, "IN_FLIGHT"),
            PendingState::Committed => write!(f, "COMMITTED"),
            PendingState::RolledBack => write!(f, "ROLLED_BACK"),
        }
    }
}

/// An in-flight optimistic change
///
/// `previous` is the item as it was before the mutation was applied;
/// `None` means the item did not exist (optimistic insert), in which case a
/// rollback removes the item entirely.
#[derive(Debug, Clone)]
pub struct PendingMutation {
    /// Sequence id, used for staleness rejection
    id: MutationId,

    /// The item this mutation targets
    item_id: ItemId,

    /// Pre-mutation snapshot (`None` = item was not present)
    previous: Option<Item>,

    /// When the optimistic change was applied
    applied_at: DateTime<Utc>,

    /// Current state (InFlight, Committed, RolledBack)
    state: PendingState,
}

impl PendingMutation {
    pub fn new(item_id: ItemId, previous: Option<Item>) -> Self {
        Self {
            id: MutationId::new(),
            item_id,
            previous,
            applied_at: Utc::now(),
            state: PendingState::InFlight,
        }
    }

    pub fn id(&self) -> MutationId {
        self.id
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn previous(&self) -> Option<&Item> {
        self.previous.as_ref()
    }

    pub fn applied_at(&self) -> DateTime<Utc> {
        self.applied_at
    }

    pub fn state(&self) -> PendingState {
        self.state
    }

    /// Mark the mutation as committed
    ///
    /// # Errors
    /// Returns `StaleResponse` if the mutation has already settled
    pub fn commit(&mut self) -> Result<()> {
        if !self.state.is_in_flight() {
            return Err(StoreError::StaleResponse(self.id.as_u64()));
        }
        self.state = PendingState::Committed;
        Ok(())
    }

    /// Mark the mutation as rolled back
    ///
    /// # Errors
    /// Returns `StaleResponse` if the mutation has already settled
    pub fn rollback(&mut self) -> Result<()> {
        if !self.state.is_in_flight() {
            return Err(StoreError::StaleResponse(self.id.as_u64()));
        }
        self.state = PendingState::RolledBack;
        Ok(())
    }

    /// Consume the record, yielding the pre-mutation snapshot
    pub fn into_previous(self) -> Option<Item> {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_id_is_monotonic() {
        let a = MutationId::new();
        let b = MutationId::new();
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn test_pending_lifecycle() {
        let mut pending = PendingMutation::new(ItemId::new("req-1"), None);
        assert_eq!(pending.state(), PendingState::InFlight);
        assert!(!pending.state().is_settled());

        pending.commit().unwrap();
        assert_eq!(pending.state(), PendingState::Committed);
        assert!(pending.state().is_settled());
    }

    #[test]
    fn test_cannot_settle_twice() {
        let mut pending = PendingMutation::new(ItemId::new("req-1"), None);
        pending.commit().unwrap();
        assert!(pending.commit().is_err());
        assert!(pending.rollback().is_err());
    }

    #[test]
    fn test_rollback_yields_snapshot() {
        let mut pending = PendingMutation::new(ItemId::new("req-1"), None);
        pending.rollback().unwrap();
        assert_eq!(pending.state(), PendingState::RolledBack);
        assert!(pending.into_previous().is_none());
    }
}
