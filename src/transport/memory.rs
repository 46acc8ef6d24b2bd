use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::core::{Comment, Item, ItemId, Result, StoreError};
use crate::mutation::Mutation;
use crate::transport::{RemoteCollection, ServerPatch};

/// In-process implementation of [`RemoteCollection`].
///
/// Holds named collections and applies mutations server-side, assigning
/// authoritative ids and timestamps on create. Failure and latency
/// injection hooks let the integration suites drive every reconciliation
/// path (rejection, network drop, timeout, stale load interleaving).
pub struct InMemoryBackend {
    collections: RwLock<HashMap<String, Vec<Item>>>,

    fetch_delay: Mutex<Option<Duration>>,
    persist_delay: Mutex<Option<Duration>>,

    fail_next_fetch: Mutex<bool>,
    reject_next_persist: Mutex<Option<String>>,
    drop_next_persist: Mutex<bool>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            fetch_delay: Mutex::new(None),
            persist_delay: Mutex::new(None),
            fail_next_fetch: Mutex::new(false),
            reject_next_persist: Mutex::new(None),
            drop_next_persist: Mutex::new(false),
        }
    }

    /// Create an empty collection if it does not exist yet
    pub async fn create_collection(&self, name: &str) {
        self.collections
            .write()
            .await
            .entry(name.to_string())
            .or_default();
    }

    /// Append items to a collection, creating it if needed
    pub async fn seed(&self, name: &str, items: Vec<Item>) {
        self.collections
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .extend(items);
    }

    /// Replace a collection's contents wholesale
    pub async fn replace(&self, name: &str, items: Vec<Item>) {
        self.collections
            .write()
            .await
            .insert(name.to_string(), items);
    }

    pub async fn row_count(&self, name: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        collections
            .get(name)
            .map(|items| items.len())
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))
    }

    /// Artificial latency before every fetch answers
    pub async fn set_fetch_delay(&self, delay: Option<Duration>) {
        *self.fetch_delay.lock().await = delay;
    }

    /// Artificial latency before every persist answers
    pub async fn set_persist_delay(&self, delay: Option<Duration>) {
        *self.persist_delay.lock().await = delay;
    }

    /// Make the next fetch fail with a network error
    pub async fn fail_next_fetch(&self) {
        *self.fail_next_fetch.lock().await = true;
    }

    /// Make the next persist fail with an explicit server rejection
    pub async fn reject_next_persist(&self, reason: &str) {
        *self.reject_next_persist.lock().await = Some(reason.to_string());
    }

    /// Make the next persist fail with a network error
    pub async fn drop_next_persist(&self) {
        *self.drop_next_persist.lock().await = true;
    }

    fn find<'a>(items: &'a mut [Item], id: &ItemId) -> Result<&'a mut Item> {
        items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| StoreError::ItemNotFound(id.clone()))
    }

    async fn apply(&self, resource: &str, mutation: &Mutation) -> Result<ServerPatch> {
        let mut collections = self.collections.write().await;
        let items = collections
            .get_mut(resource)
            .ok_or_else(|| StoreError::CollectionNotFound(resource.to_string()))?;

        match mutation {
            Mutation::Create { fields } => {
                // The backend owns id and timestamp assignment
                let item = fields.clone().into_item(ItemId::generate(), Utc::now());
                let patch = ServerPatch {
                    id: Some(item.id.clone()),
                    created_at: Some(item.created_at),
                    status: None,
                };
                items.push(item);
                Ok(patch)
            }
            Mutation::SetStatus { item, status } => {
                let entry = Self::find(items, item)?;
                entry.status = *status;
                Ok(ServerPatch::none())
            }
            Mutation::ToggleLike { item, user } => {
                let entry = Self::find(items, item)?;
                if !entry.liked_by.remove(user) {
                    entry.liked_by.insert(user.clone());
                }
                Ok(ServerPatch::none())
            }
            Mutation::TogglePin { item } => {
                let entry = Self::find(items, item)?;
                entry.pinned = !entry.pinned;
                Ok(ServerPatch::none())
            }
            Mutation::AddComment { item, author, text } => {
                let entry = Self::find(items, item)?;
                entry.comments.push(Comment {
                    author: author.clone(),
                    text: text.clone(),
                    created_at: Utc::now(),
                });
                Ok(ServerPatch::none())
            }
            Mutation::Delete { item } => {
                let before = items.len();
                items.retain(|entry| &entry.id != item);
                if items.len() == before {
                    return Err(StoreError::ItemNotFound(item.clone()));
                }
                Ok(ServerPatch::none())
            }
        }
    }
}

#[async_trait]
impl RemoteCollection for InMemoryBackend {
    async fn fetch_collection(&self, resource: &str) -> Result<Vec<Item>> {
        if std::mem::take(&mut *self.fail_next_fetch.lock().await) {
            return Err(StoreError::NetworkError("connection reset".to_string()));
        }

        // Snapshot at request arrival; the delay below models transfer
        // latency, so a slow response carries the state the server saw
        // when the request came in.
        let items = {
            let collections = self.collections.read().await;
            collections
                .get(resource)
                .cloned()
                .ok_or_else(|| StoreError::CollectionNotFound(resource.to_string()))?
        };

        let delay = *self.fetch_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(items)
    }

    async fn persist_mutation(&self, resource: &str, mutation: &Mutation) -> Result<ServerPatch> {
        let delay = *self.persist_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = self.reject_next_persist.lock().await.take() {
            return Err(StoreError::MutationRejected(reason));
        }
        if std::mem::take(&mut *self.drop_next_persist.lock().await) {
            return Err(StoreError::NetworkError("request dropped".to_string()));
        }

        self.apply(resource, mutation).await
    }
}
