// ============================================================================
// Board Client Facade
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::core::{Item, Result, StoreError};
use crate::mutation::Mutation;
use crate::projection::{ItemFilter, Page, SortOrder, paginate};
use crate::store::ProjectionStore;
use crate::transport::RemoteCollection;

/// User-visible failure notice produced by reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// High-level client driving the full optimistic cycle over one resource.
///
/// This is the recommended way to use the store in applications: UI event
/// -> [`BoardClient::mutate`] -> immediate re-render -> async persist ->
/// commit or rollback -> re-render.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use boardsync::{BoardClient, InMemoryBackend, ItemKind, Mutation, NewItem, UserId};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> boardsync::Result<()> {
/// let backend = Arc::new(InMemoryBackend::new());
/// backend.create_collection("requests").await;
///
/// let client = BoardClient::new(backend, "requests");
/// client.load().await?;
///
/// let fields = NewItem::new(ItemKind::Repair, "Broken lock", UserId::new("alice"));
/// let item = client.mutate(Mutation::Create { fields }).await?;
/// assert_eq!(client.len().await, 1);
/// # let _ = item;
/// # Ok(())
/// # }
/// ```
pub struct BoardClient {
    store: Arc<RwLock<ProjectionStore>>,
    remote: Arc<dyn RemoteCollection>,
    resource: String,
    persist_timeout: Option<Duration>,
    notices: Mutex<Vec<Notice>>,
}

impl BoardClient {
    pub fn new(remote: Arc<dyn RemoteCollection>, resource: &str) -> Self {
        Self {
            store: Arc::new(RwLock::new(ProjectionStore::new())),
            remote,
            resource: resource.to_string(),
            persist_timeout: None,
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Bound every persist call; expiry reconciles as `MutationTimeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout = Some(timeout);
        self
    }

    /// Direct access to the store for advanced usage
    pub fn store(&self) -> &Arc<RwLock<ProjectionStore>> {
        &self.store
    }

    pub async fn set_render_hook(&self, hook: impl FnMut() + Send + Sync + 'static) {
        self.store.write().await.set_render_hook(hook);
    }

    pub async fn snapshot(&self) -> Vec<Item> {
        self.store.read().await.snapshot().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Drain the accumulated user-visible notices
    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().await)
    }

    async fn push_notice(&self, message: String) {
        self.notices.lock().await.push(Notice {
            message,
            at: Utc::now(),
        });
    }

    /// Fetch the authoritative collection snapshot and merge it in.
    ///
    /// The generation ticket is taken before the await, so a slower older
    /// load that completes after a newer one is discarded. On transport
    /// failure the last-known-good snapshot is retained: the failure is
    /// silent on a background refresh and produces an empty-state notice
    /// only when there is no prior data to show.
    ///
    /// # Errors
    /// Returns `LoadFailed` when the transport fails. A stale completion is
    /// not an error for the caller; the current item count is returned.
    pub async fn load(&self) -> Result<usize> {
        let ticket = self.store.write().await.begin_load();

        match self.remote.fetch_collection(&self.resource).await {
            Ok(items) => {
                let mut store = self.store.write().await;
                match store.finish_load(ticket, items) {
                    Ok(count) => Ok(count),
                    Err(err) if err.is_stale() => {
                        log::debug!("load of '{}' superseded, keeping newer state", self.resource);
                        Ok(store.len())
                    }
                    Err(err) => Err(err),
                }
            }
            Err(err) => {
                if self.store.read().await.is_empty() {
                    self.push_notice(format!("Could not load {}: {err}", self.resource))
                        .await;
                } else {
                    log::warn!("background refresh of '{}' failed: {err}", self.resource);
                }
                Err(StoreError::LoadFailed(err.to_string()))
            }
        }
    }

    /// Apply a mutation optimistically, persist it, and reconcile.
    ///
    /// On success the server's authoritative fields are merged and the
    /// confirmed item is returned. On failure the optimistic state is
    /// rolled back, a user-visible notice is recorded, and the failure is
    /// returned as `MutationRejected`, `MutationTimeout` or `NetworkError`.
    pub async fn mutate(&self, mutation: Mutation) -> Result<Item> {
        let (pending_id, optimistic) = self.store.write().await.apply_optimistic(&mutation)?;

        let persist = self.remote.persist_mutation(&self.resource, &mutation);
        let outcome = match self.persist_timeout {
            Some(limit) => match tokio::time::timeout(limit, persist).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::MutationTimeout(format!(
                    "no response within {limit:?}"
                ))),
            },
            None => persist.await,
        };

        match outcome {
            Ok(patch) => {
                let mut store = self.store.write().await;
                match store.commit(pending_id, patch) {
                    Ok(Some(item)) => Ok(item),
                    // Confirmed delete: hand back the last seen state
                    Ok(None) => Ok(optimistic),
                    Err(err) if err.is_stale() => {
                        // Superseded while in flight; the newer mutation's
                        // settlement owns the item now
                        Ok(optimistic)
                    }
                    Err(err) => Err(err),
                }
            }
            Err(err) => {
                let err = match err {
                    err @ (StoreError::MutationRejected(_)
                    | StoreError::MutationTimeout(_)
                    | StoreError::NetworkError(_)) => err,
                    // Anything else the backend reports is an explicit refusal
                    other => StoreError::MutationRejected(other.to_string()),
                };
                match self.store.write().await.rollback(pending_id) {
                    Ok(_) => {}
                    Err(stale) if stale.is_stale() => {
                        log::debug!("rollback of superseded mutation {pending_id} skipped");
                    }
                    Err(other) => return Err(other),
                }
                if err.is_user_visible() {
                    self.push_notice(err.to_string()).await;
                }
                Err(err)
            }
        }
    }

    /// Derive a filtered, ordered view without re-fetching
    pub async fn project(&self, filter: &ItemFilter, sort: SortOrder) -> Vec<Item> {
        self.store.read().await.project(filter, sort)
    }

    /// Project and slice one page of the view
    pub async fn page(
        &self,
        filter: &ItemFilter,
        sort: SortOrder,
        page_size: usize,
        requested_page: usize,
    ) -> Page {
        let view = self.project(filter, sort).await;
        paginate(&view, page_size, requested_page)
    }
}
