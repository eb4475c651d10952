//! Events store.

use super::ResourceCache;
use crate::error::{AdminError, Result};
use arenaticket_client::types::{Event, EventCreate, EventUpdate, Listing};
use arenaticket_client::ApiClient;

const ADMIN_EVENTS: &str = "/admin/eventos";
const PUBLIC_EVENTS: &str = "/public/eventos";

/// Cached list of events.
#[derive(Debug, Clone)]
pub struct EventsStore {
    api: ApiClient,
    cache: ResourceCache<Event>,
}

impl EventsStore {
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
    pub const fn cache(&self) -> &ResourceCache<Event> {
        &self.cache
    }

    /// Load all events.
    ///
    /// Falls back to the public listing when the admin one answers 404.
    /// Failures end up in [`ResourceCache::error`].
    pub async fn list(&self) {
        let guard = self.cache.begin();
        let mut outcome = self.fetch(ADMIN_EVENTS).await;
        if matches!(outcome, Err(AdminError::RequestFailed { status: 404, .. })) {
            tracing::debug!("Admin event listing missing, using public listing");
            outcome = self.fetch(PUBLIC_EVENTS).await;
        }
        match outcome {
            Ok((items, page)) => self.cache.replace(items, page),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load events");
                guard.fail(e.to_string());
            },
        }
    }

    async fn fetch(&self, path: &str) -> Result<(Vec<Event>, Option<(u32, u64)>)> {
        let listing: Listing<Event> = self.api.get(path).await?;
        Ok(listing.into_parts())
    }

    /// Create an event; it goes to the top of the cached list.
    ///
    /// # Errors
    ///
    /// Returns the request error; the cache is untouched.
    pub async fn create(&self, payload: &EventCreate) -> Result<Event> {
        let _guard = self.cache.begin();
        let created: Event = self.api.post(ADMIN_EVENTS, payload).await?;
        tracing::info!(id = %created.id, "Event created");
        self.cache.update(|items| items.insert(0, created.clone()));
        Ok(created)
    }

    /// Update an event and replace its cached copy.
    ///
    /// # Errors
    ///
    /// Returns the request error; the cache is untouched.
    pub async fn update(&self, id: &str, payload: &EventUpdate) -> Result<Event> {
        let _guard = self.cache.begin();
        let updated: Event = self
            .api
            .put(&format!("{ADMIN_EVENTS}/{}", urlencoding::encode(id)), payload)
            .await?;
        self.cache.replace_where(updated.clone(), |e| e.id == id);
        Ok(updated)
    }

    /// Delete an event and drop it from the cache.
    ///
    /// # Errors
    ///
    /// Returns the request error; the cache is untouched.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.cache.begin();
        self.api
            .delete(&format!("{ADMIN_EVENTS}/{}", urlencoding::encode(id)))
            .await?;
        self.cache.update(|items| items.retain(|e| e.id != id));
        tracing::info!(id, "Event removed");
        Ok(())
    }
}
