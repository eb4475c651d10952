//! Resource stores: one cached collection per server resource.
//!
//! Each store pairs an [`ApiClient`](arenaticket_client::ApiClient) with a
//! [`ResourceCache`]. Listing operations record their error in the cache and
//! return nothing; mutating operations return a `Result` and touch the cache
//! only on success. Every request runs under a [`LoadingGuard`], so the
//! `loading` flag is cleared on every exit path.

pub mod audit;
pub mod batches;
pub mod events;
pub mod notifications;
pub mod orders;
pub mod sales;
pub mod uploads;

pub use audit::{AuditFilter, AuditStore};
pub use batches::BatchesStore;
pub use events::EventsStore;
pub use notifications::NotificationService;
pub use orders::{OrderFilter, OrdersStore};
pub use sales::{SalesSnapshot, SalesStore};
pub use uploads::BannerUploads;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// State that carries a request-in-flight flag and a displayable error.
pub trait Tracked {
    /// Request-in-flight flag.
    fn loading_mut(&mut self) -> &mut bool;
    /// Last error message.
    fn error_mut(&mut self) -> &mut Option<String>;
}

/// Sets `loading` when created, clears it when dropped.
///
/// Creating a guard also clears the previous error.
pub struct LoadingGuard<'a, S: Tracked> {
    state: &'a Mutex<S>,
}

impl<'a, S: Tracked> LoadingGuard<'a, S> {
    /// Mark `state` as loading.
    pub fn begin(state: &'a Mutex<S>) -> Self {
        {
            let mut guard = lock(state);
            *guard.loading_mut() = true;
            *guard.error_mut() = None;
        }
        Self { state }
    }

    /// Record an error message for display.
    pub fn fail(&self, message: impl Into<String>) {
        *lock(self.state).error_mut() = Some(message.into());
    }
}

impl<S: Tracked> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        *lock(self.state).loading_mut() = false;
    }
}

/// Cached copy of a server collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheState<T> {
    /// Items from the last successful load, adjusted by later mutations
    pub items: Vec<T>,
    /// A request is in flight
    pub loading: bool,
    /// Message of the last failed load
    pub error: Option<String>,
    /// Page count of the last paged answer
    pub total_pages: u32,
    /// Total matches of the last paged answer
    pub total_elements: u64,
}

impl<T> Default for CacheState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            total_pages: 0,
            total_elements: 0,
        }
    }
}

impl<T> Tracked for CacheState<T> {
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.loading
    }

    fn error_mut(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}

/// Shared, lock-protected [`CacheState`]. Clones share the same cache.
#[derive(Debug)]
pub struct ResourceCache<T> {
    state: Arc<Mutex<CacheState<T>>>,
}

impl<T> Clone for ResourceCache<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }
}

impl<T: Clone> ResourceCache<T> {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request.
    pub fn begin(&self) -> LoadingGuard<'_, CacheState<T>> {
        LoadingGuard::begin(&self.state)
    }

    /// Copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> CacheState<T> {
        lock(&self.state).clone()
    }

    /// Cached items.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        lock(&self.state).items.clone()
    }

    /// A request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Message of the last failed load.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    /// Replace the items, and the page counters when the answer was paged.
    pub fn replace(&self, items: Vec<T>, page: Option<(u32, u64)>) {
        let mut state = lock(&self.state);
        state.items = items;
        if let Some((total_pages, total_elements)) = page {
            state.total_pages = total_pages;
            state.total_elements = total_elements;
        }
    }

    /// Edit the items in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        f(&mut lock(&self.state).items)
    }

    /// Replace the first item matching `matches` with `item`. Returns whether
    /// one was found.
    pub fn replace_where(&self, item: T, matches: impl Fn(&T) -> bool) -> bool {
        self.update(|items| {
            if let Some(slot) = items.iter_mut().find(|existing| matches(existing)) {
                *slot = item;
                true
            } else {
                false
            }
        })
    }
}

pub(crate) fn lock<S>(state: &Mutex<S>) -> MutexGuard<'_, S> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_clears_loading_on_every_exit() {
        let cache: ResourceCache<u32> = ResourceCache::new();
        {
            let guard = cache.begin();
            assert!(cache.is_loading());
            guard.fail("boom");
        }
        assert!(!cache.is_loading());
        assert_eq!(cache.error().as_deref(), Some("boom"));

        let early_return = || -> Option<()> {
            let _guard = cache.begin();
            let missing: Option<()> = None;
            missing?;
            Some(())
        };
        assert_eq!(early_return(), None);
        assert!(!cache.is_loading());
        assert_eq!(cache.error(), None);
    }

    #[test]
    fn paged_replace_updates_counters() {
        let cache = ResourceCache::new();
        cache.replace(vec![1, 2], Some((3, 25)));
        cache.replace(vec![4], None);
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.items, vec![4]);
        assert_eq!((snapshot.total_pages, snapshot.total_elements), (3, 25));
    }

    #[test]
    fn replace_where_reports_misses() {
        let cache = ResourceCache::new();
        cache.replace(vec![1, 2, 3], None);
        assert!(cache.replace_where(20, |n| *n == 2));
        assert!(!cache.replace_where(40, |n| *n == 4));
        assert_eq!(cache.items(), vec![1, 20, 3]);
    }
}
