//! Batches (lotes) store.

use super::ResourceCache;
use crate::error::{AdminError, Result};
use arenaticket_client::types::{Batch, BatchCreate, BatchUpdate, Listing};
use arenaticket_client::ApiClient;

const ADMIN_BATCHES: &str = "/admin/lotes";

/// Cached batches of one event.
#[derive(Debug, Clone)]
pub struct BatchesStore {
    api: ApiClient,
    cache: ResourceCache<Batch>,
}

impl BatchesStore {
    /// Store over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: ResourceCache::new(),
        }
    }

    /// The cache this store keeps in sync.
    #[must_use]
    pub const fn cache(&self) -> &ResourceCache<Batch> {
        &self.cache
    }

    /// Load the batches of `event_id`.
    ///
    /// The server lists every batch; the ones of other events are dropped
    /// here.
    pub async fn list_for_event(&self, event_id: &str) {
        let guard = self.cache.begin();
        match self.api.get::<Listing<Batch>>(ADMIN_BATCHES).await {
            Ok(listing) => {
                let (mut items, _) = listing.into_parts();
                items.retain(|batch| batch.event_id == event_id);
                tracing::debug!(event_id, count = items.len(), "Batches loaded");
                self.cache.replace(items, None);
            },
            Err(e) => {
                let e = AdminError::from(e);
                tracing::warn!(event_id, error = %e, "Could not load batches");
                guard.fail(e.to_string());
            },
        }
    }

    /// Create a batch under `event_id` and append it to the cache.
    ///
    /// # Errors
    ///
    /// Returns the request error; the cache is untouched.
    pub async fn create(&self, event_id: &str, payload: BatchCreate) -> Result<Batch> {
        let _guard = self.cache.begin();
        let payload = BatchCreate {
            event_id: Some(event_id.to_string()),
            ..payload
        };
        let created: Batch = self.api.post(ADMIN_BATCHES, &payload).await?;
        self.cache.update(|items| items.push(created.clone()));
        Ok(created)
    }

    /// Update a batch of `event_id` and replace its cached copy.
    ///
    /// # Errors
    ///
    /// Returns the request error; the cache is untouched.
    pub async fn update(&self, event_id: &str, batch_id: &str, payload: BatchUpdate) -> Result<Batch> {
        let _guard = self.cache.begin();
        let payload = BatchUpdate {
            event_id: Some(event_id.to_string()),
            ..payload
        };
        let updated: Batch = self
            .api
            .put(&format!("{ADMIN_BATCHES}/{}", urlencoding::encode(batch_id)), &payload)
            .await?;
        self.cache.replace_where(updated.clone(), |b| b.id == batch_id);
        Ok(updated)
    }

    /// Delete a batch and drop it from the cache.
    ///
    /// # Errors
    ///
    /// Returns the request error; the cache is untouched.
    pub async fn remove(&self, batch_id: &str) -> Result<()> {
        let _guard = self.cache.begin();
        self.api
            .delete(&format!("{ADMIN_BATCHES}/{}", urlencoding::encode(batch_id)))
            .await?;
        self.cache.update(|items| items.retain(|b| b.id != batch_id));
        Ok(())
    }
}
