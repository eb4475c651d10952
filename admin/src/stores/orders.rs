//! Orders (pedidos) store.

use super::ResourceCache;
use crate::error::{AdminError, Result};
use arenaticket_client::types::{Listing, Order, OrderStatus, ResendResponse};
use arenaticket_client::ApiClient;

const ADMIN_ORDERS: &str = "/admin/pedidos";

/// Order listing filter; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Only orders in this status
    pub status: Option<OrderStatus>,
    /// Created on or after (ISO 8601)
    pub from: Option<String>,
    /// Created on or before (ISO 8601)
    pub to: Option<String>,
    /// Zero-based page
    pub page: Option<u32>,
    /// Page size
    pub size: Option<u32>,
    /// Sort expression, e.g. `dataCriacao,desc`
    pub sort: Option<String>,
}

impl OrderFilter {
    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("status", self.status.map(status_param)),
            ("dataInicio", self.from.clone()),
            ("dataFim", self.to.clone()),
            ("page", self.page.map(|p| p.to_string())),
            ("size", self.size.map(|s| s.to_string())),
            ("sort", self.sort.clone()),
        ]
    }
}

fn status_param(status: OrderStatus) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn order_path(id: &str, action: &str) -> String {
    let id = urlencoding::encode(id);
    if action.is_empty() {
        format!("{ADMIN_ORDERS}/{id}")
    } else {
        format!("{ADMIN_ORDERS}/{id}/{action}")
    }
}

/// Cached, optionally paged, list of orders.
#[derive(Debug, Clone)]
pub struct OrdersStore {
    api: ApiClient,
    cache: ResourceCache<Order>,
}

impl OrdersStore {
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
    pub const fn cache(&self) -> &ResourceCache<Order> {
        &self.cache
    }

    /// Load orders matching `filter`. Failures end up in
    /// [`ResourceCache::error`].
    pub async fn list(&self, filter: &OrderFilter) {
        let guard = self.cache.begin();
        match self
            .api
            .get_query::<Listing<Order>>(ADMIN_ORDERS, &filter.query())
            .await
        {
            Ok(listing) => {
                let (items, page) = listing.into_parts();
                self.cache.replace(items, page);
            },
            Err(e) => {
                let e = AdminError::from(e);
                tracing::warn!(error = %e, "Could not load orders");
                guard.fail(e.to_string());
            },
        }
    }

    /// Fetch one order. The cache is not touched.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn find(&self, id: &str) -> Result<Order> {
        Ok(self.api.get(&order_path(id, "")).await?)
    }

    /// Cancel an order and replace its cached copy with the server's.
    ///
    /// # Errors
    ///
    /// Returns the request error, or `AdminError::Protocol` when the server
    /// answers without the updated order.
    pub async fn cancel(&self, id: &str) -> Result<Order> {
        let _guard = self.cache.begin();
        let cancelled: Order = self
            .api
            .patch_empty(&order_path(id, "cancelar"))
            .await?
            .ok_or_else(|| AdminError::Protocol("empty response body".to_string()))?;
        tracing::info!(id, status = ?cancelled.status, "Order cancelled");
        self.cache.replace_where(cancelled.clone(), |o| o.id == id);
        Ok(cancelled)
    }

    /// Ask the server to send the order's ticket codes again.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn resend_codes(&self, id: &str) -> Result<ResendResponse> {
        let response = self
            .api
            .post_empty::<ResendResponse>(&order_path(id, "reenviar-codigos"))
            .await?
            .unwrap_or(ResendResponse {
                success: true,
                message: String::new(),
            });
        tracing::info!(id, success = response.success, "Ticket codes resent");
        Ok(response)
    }
}
