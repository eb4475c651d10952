//! Notification health and resends.

use crate::error::{AdminError, Result};
use arenaticket_client::types::{ResendResponse, SmsHealthStatus};
use arenaticket_client::ApiClient;

/// SMS gateway health and ticket-code resends.
#[derive(Debug, Clone)]
pub struct NotificationService {
    api: ApiClient,
}

impl NotificationService {
    /// Service over `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Current SMS gateway health.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn sms_health(&self) -> Result<SmsHealthStatus> {
        self.api
            .get("/admin/notifications/sms/health")
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Could not read SMS health");
                AdminError::from(e)
            })
    }

    /// Send the ticket codes of `order_id` again.
    ///
    /// # Errors
    ///
    /// Returns the request error, or `AdminError::Protocol` when the answer
    /// has no body.
    pub async fn resend_ticket_codes(&self, order_id: &str) -> Result<ResendResponse> {
        let path = format!(
            "/admin/pedidos/{}/reenviar-codigos",
            urlencoding::encode(order_id)
        );
        match self.api.post_empty::<ResendResponse>(&path).await {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(AdminError::Protocol("empty response body".to_string())),
            Err(e) => {
                tracing::error!(order_id, error = %e, "Could not resend ticket codes");
                Err(e.into())
            },
        }
    }
}
