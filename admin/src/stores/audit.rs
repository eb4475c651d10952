//! Audit log store.

use super::ResourceCache;
use crate::error::AdminError;
use arenaticket_client::types::{AuditLog, Listing};
use arenaticket_client::ApiClient;

/// Audit listing filter; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Acting user
    pub user: Option<String>,
    /// Action name
    pub action: Option<String>,
    /// Entity type
    pub entity: Option<String>,
    /// On or after (ISO 8601)
    pub from: Option<String>,
    /// On or before (ISO 8601)
    pub to: Option<String>,
    /// Zero-based page
    pub page: Option<u32>,
    /// Page size
    pub size: Option<u32>,
}

/// Cached page of audit entries.
#[derive(Debug, Clone)]
pub struct AuditStore {
    api: ApiClient,
    cache: ResourceCache<AuditLog>,
}

impl AuditStore {
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
    pub const fn cache(&self) -> &ResourceCache<AuditLog> {
        &self.cache
    }

    /// Load entries matching `filter`. Failures end up in
    /// [`ResourceCache::error`].
    pub async fn list(&self, filter: &AuditFilter) {
        let guard = self.cache.begin();
        let query = [
            ("usuario", filter.user.clone()),
            ("acao", filter.action.clone()),
            ("entidade", filter.entity.clone()),
            ("dataInicio", filter.from.clone()),
            ("dataFim", filter.to.clone()),
            ("page", filter.page.map(|p| p.to_string())),
            ("size", filter.size.map(|s| s.to_string())),
        ];
        match self
            .api
            .get_query::<Listing<AuditLog>>("/admin/auditoria", &query)
            .await
        {
            Ok(listing) => {
                let (items, page) = listing.into_parts();
                self.cache.replace(items, page);
            },
            Err(e) => {
                let e = AdminError::from(e);
                tracing::warn!(error = %e, "Could not load audit log");
                guard.fail(e.to_string());
            },
        }
    }
}
