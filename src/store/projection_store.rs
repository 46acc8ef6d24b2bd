// ============================================================================
// Projection Store
// ============================================================================
//
// Client-side ordered collection mirroring a server-side resource
// collection. Optimistic mutations are applied immediately and recorded as
// pending; settlement either commits (drop the snapshot, merge the
// authoritative server fields) or rolls back (restore the snapshot
// exactly).
//
// Staleness discipline is purely sequence-number based: mutation ids are
// globally monotonic, load tickets are per-store monotonic, and any
// settlement or load completion carrying a superseded number is rejected
// with StaleResponse. No locking is involved; all mutations happen on a
// single logical thread and suspension only occurs at the network boundary
// (see the facade).
//
// ============================================================================

use chrono::Utc;

use crate::core::{Comment, Item, ItemId, Result, StoreError};
use crate::mutation::{Mutation, MutationId, PendingMutation};
use crate::projection::{ItemFilter, SortOrder};
use crate::transport::ServerPatch;

/// Callback invoked synchronously after every state change
///
/// `Sync` is required so a store behind `Arc<RwLock<..>>` can move across
/// task boundaries together with its hook.
pub type RenderHook = Box<dyn FnMut() + Send + Sync>;

/// Generation counter for an in-flight `load`
///
/// Issued before the fetch starts; a completion whose ticket has been
/// superseded by a newer completed load is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Local projection of a remote collection with optimistic mutation and
/// conflict reconciliation.
///
/// The store owns the canonical in-memory item list and the pending
/// mutation table. Collection ordering is never stored; it is derived on
/// demand by [`ProjectionStore::project`].
///
/// At most one pending mutation exists per item. A second mutation on an
/// item with an outstanding pending supersedes it: the new pending inherits
/// the original pre-optimistic snapshot and the old mutation id becomes
/// stale, so its late settlement is discarded rather than stacked.
pub struct ProjectionStore {
    /// Canonical collection state
    items: Vec<Item>,

    /// Outstanding optimistic mutations, at most one per item
    pending: Vec<PendingMutation>,

    /// Last issued load ticket
    load_issued: u64,

    /// Newest load ticket that has been applied
    load_applied: u64,

    /// Bumped on every state change, for cheap change detection
    version: u64,

    render_hook: Option<RenderHook>,
}

impl Default for ProjectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectionStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            pending: Vec::new(),
            load_issued: 0,
            load_applied: 0,
            version: 0,
            render_hook: None,
        }
    }

    /// Current canonical collection state
    pub fn snapshot(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// State-change counter; bumps on every apply/commit/rollback/load
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The outstanding pending mutation for an item, if any
    pub fn pending_for(&self, id: &ItemId) -> Option<&PendingMutation> {
        self.pending.iter().find(|p| p.item_id() == id)
    }

    /// Register the render-trigger callback
    ///
    /// The view layer subscribes once; the hook fires synchronously after
    /// every state change.
    pub fn set_render_hook(&mut self, hook: impl FnMut() + Send + Sync + 'static) {
        self.render_hook = Some(Box::new(hook));
    }

    fn notify(&mut self) {
        self.version += 1;
        if let Some(hook) = self.render_hook.as_mut() {
            hook();
        }
    }

    fn index_of(&self, id: &ItemId) -> Result<usize> {
        self.items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| StoreError::ItemNotFound(id.clone()))
    }

    fn take_pending_for(&mut self, id: &ItemId) -> Option<PendingMutation> {
        let pos = self.pending.iter().position(|p| p.item_id() == id)?;
        Some(self.pending.remove(pos))
    }

    /// Apply a mutation immediately and record it as pending.
    ///
    /// Returns the mutation id (for the later `commit`/`rollback`) and the
    /// resulting item state. The render hook fires in the same tick, so the
    /// new state is visible before the persist call settles.
    ///
    /// # Errors
    /// Returns `ItemNotFound` if the target is absent; the collection is
    /// left untouched in that case.
    pub fn apply_optimistic(&mut self, mutation: &Mutation) -> Result<(MutationId, Item)> {
        let (item_id, previous, updated) = match mutation {
            Mutation::Create { fields } => {
                let item = fields.clone().into_item(ItemId::generate(), Utc::now());
                self.items.push(item.clone());
                (item.id.clone(), None, item)
            }
            Mutation::SetStatus { item, status } => {
                let idx = self.index_of(item)?;
                let before = self.items[idx].clone();
                self.items[idx].status = *status;
                (item.clone(), Some(before), self.items[idx].clone())
            }
            Mutation::ToggleLike { item, user } => {
                let idx = self.index_of(item)?;
                let before = self.items[idx].clone();
                let entry = &mut self.items[idx];
                if !entry.liked_by.remove(user) {
                    entry.liked_by.insert(user.clone());
                }
                (item.clone(), Some(before), entry.clone())
            }
            Mutation::TogglePin { item } => {
                let idx = self.index_of(item)?;
                let before = self.items[idx].clone();
                self.items[idx].pinned = !self.items[idx].pinned;
                (item.clone(), Some(before), self.items[idx].clone())
            }
            Mutation::AddComment { item, author, text } => {
                let idx = self.index_of(item)?;
                let before = self.items[idx].clone();
                self.items[idx].comments.push(Comment {
                    author: author.clone(),
                    text: text.clone(),
                    created_at: Utc::now(),
                });
                (item.clone(), Some(before), self.items[idx].clone())
            }
            Mutation::Delete { item } => {
                let idx = self.index_of(item)?;
                let removed = self.items.remove(idx);
                (item.clone(), Some(removed.clone()), removed)
            }
        };

        // One pending per item: a second mutation supersedes the first and
        // inherits its snapshot, so a rollback restores the true
        // pre-optimistic state. The superseded id becomes stale.
        let previous = match self.take_pending_for(&item_id) {
            Some(superseded) => {
                log::debug!(
                    "pending {} on item {} superseded",
                    superseded.id(),
                    item_id
                );
                superseded.into_previous()
            }
            None => previous,
        };

        let record = PendingMutation::new(item_id, previous);
        let id = record.id();
        log::debug!("optimistic {} applied as {}", mutation.describe(), id);
        self.pending.push(record);
        self.notify();
        Ok((id, updated))
    }

    /// Settle a pending mutation after a successful persist.
    ///
    /// The snapshot is discarded and the server's authoritative fields are
    /// merged over the local item (server wins on confirmed data). Returns
    /// the merged item, or `None` for a confirmed delete.
    ///
    /// Idempotent: a second commit of the same id finds no pending record
    /// and is rejected as stale without touching the collection.
    ///
    /// # Errors
    /// Returns `StaleResponse` for unknown or superseded ids; callers
    /// discard those silently.
    pub fn commit(&mut self, id: MutationId, patch: ServerPatch) -> Result<Option<Item>> {
        let pos = match self.pending.iter().position(|p| p.id() == id) {
            Some(pos) => pos,
            None => {
                log::debug!("stale commit for {id} discarded");
                return Err(StoreError::StaleResponse(id.as_u64()));
            }
        };
        let mut record = self.pending.remove(pos);
        record.commit()?;

        let committed = match self.items.iter().position(|i| &i.id == record.item_id()) {
            Some(idx) => {
                patch.merge_into(&mut self.items[idx]);
                Some(self.items[idx].clone())
            }
            // Confirmed delete: the item is already gone locally
            None => None,
        };

        log::debug!("mutation {id} committed");
        self.notify();
        Ok(committed)
    }

    /// Settle a pending mutation after a failed persist.
    ///
    /// Restores the item to the pending snapshot exactly, or removes it
    /// entirely if the snapshot was "not present" (optimistic insert that
    /// never got confirmed). Returns the restored item.
    ///
    /// # Errors
    /// Returns `StaleResponse` for unknown or superseded ids. A stale
    /// rollback therefore can never undo a later, independently committed
    /// mutation.
    pub fn rollback(&mut self, id: MutationId) -> Result<Option<Item>> {
        let pos = match self.pending.iter().position(|p| p.id() == id) {
            Some(pos) => pos,
            None => {
                log::debug!("stale rollback for {id} discarded");
                return Err(StoreError::StaleResponse(id.as_u64()));
            }
        };
        let mut record = self.pending.remove(pos);
        record.rollback()?;
        let item_id = record.item_id().clone();

        let restored = match record.into_previous() {
            Some(snapshot) => {
                match self.items.iter().position(|i| i.id == item_id) {
                    Some(idx) => self.items[idx] = snapshot.clone(),
                    // Rolled-back delete: reinsert; ordering is derived, so
                    // position does not matter
                    None => self.items.push(snapshot.clone()),
                }
                Some(snapshot)
            }
            None => {
                if let Some(idx) = self.items.iter().position(|i| i.id == item_id) {
                    self.items.remove(idx);
                }
                None
            }
        };

        log::warn!("mutation {id} rolled back");
        self.notify();
        Ok(restored)
    }

    /// Issue a generation ticket for a load that is about to start
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_issued += 1;
        LoadTicket(self.load_issued)
    }

    /// Apply an authoritative collection snapshot fetched from the remote.
    ///
    /// Merges by id: settled items are replaced wholesale by the server
    /// copy; items with an outstanding pending mutation keep their local
    /// optimistic state (locally deleted items stay gone, locally created
    /// items stay present) until the mutation settles.
    ///
    /// # Errors
    /// Returns `StaleResponse` if a newer load has already completed; the
    /// caller discards the result and keeps the current state.
    pub fn finish_load(&mut self, ticket: LoadTicket, incoming: Vec<Item>) -> Result<usize> {
        if ticket.0 <= self.load_applied {
            log::debug!("stale load (ticket {}) discarded", ticket.0);
            return Err(StoreError::StaleResponse(ticket.0));
        }
        self.load_applied = ticket.0;

        let mut merged = Vec::with_capacity(incoming.len());
        for item in incoming {
            if self.pending.iter().any(|p| p.item_id() == &item.id) {
                // Outstanding optimistic state wins until settlement; a
                // pending delete has no local copy and the server copy is
                // skipped entirely.
                if let Some(local) = self.get(&item.id) {
                    merged.push(local.clone());
                }
            } else {
                merged.push(item);
            }
        }
        for local in &self.items {
            let already_kept = merged.iter().any(|i| i.id == local.id);
            if !already_kept && self.pending.iter().any(|p| p.item_id() == &local.id) {
                // Optimistic create the server does not know about yet
                merged.push(local.clone());
            }
        }

        self.items = merged;
        log::debug!("load (ticket {}) applied, {} items", ticket.0, self.items.len());
        self.notify();
        Ok(self.items.len())
    }

    /// Derive a filtered, ordered view of the collection.
    ///
    /// Pure with respect to store state: the canonical collection is not
    /// touched and no ordering is stored.
    pub fn project(&self, filter: &ItemFilter, sort: SortOrder) -> Vec<Item> {
        let mut view: Vec<Item> = self
            .items
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        sort.apply(&mut view);
        view
    }
}
