//! Printer bridge: finds a device and sends tickets and receipts to it.

use super::device::{DeviceHost, PrinterDevice, PrinterKind};
use super::document::{receipt_document, ticket_document};
use crate::constants::PRINT_PAUSE_MS;
use crate::error::{AdminError, Result};
use arenaticket_client::types::SoldTicket;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Picks the first available print API in a configured order.
#[derive(Clone)]
pub struct PrinterBridge {
    host: Arc<dyn DeviceHost>,
    order: Vec<PrinterKind>,
    pause: Duration,
}

impl std::fmt::Debug for PrinterBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrinterBridge")
            .field("order", &self.order)
            .field("pause", &self.pause)
            .finish_non_exhaustive()
    }
}

impl PrinterBridge {
    /// Bridge probing `host` in `order`.
    #[must_use]
    pub fn new(host: Arc<dyn DeviceHost>, order: Vec<PrinterKind>) -> Self {
        Self {
            host,
            order,
            pause: Duration::from_millis(PRINT_PAUSE_MS),
        }
    }

    /// Override the pause between tickets of a batch.
    #[must_use]
    pub const fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Probe order.
    #[must_use]
    pub fn order(&self) -> &[PrinterKind] {
        &self.order
    }

    /// First present device in probe order.
    #[must_use]
    pub fn detect(&self) -> Option<Arc<dyn PrinterDevice>> {
        let found = self.order.iter().find_map(|kind| self.host.probe(*kind));
        match &found {
            Some(device) => tracing::debug!(kind = %device.kind(), "Printer detected"),
            None => tracing::debug!(order = ?self.order, "No printer detected"),
        }
        found
    }

    /// Whether any device is present.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.detect().is_some()
    }

    /// Terminal model guessed from the user agent.
    #[must_use]
    pub fn device_info(&self, user_agent: &str) -> String {
        if !self.is_available() {
            return "Não detectado".to_string();
        }
        let model = if user_agent.contains("V2s") {
            "SUNMI V2s"
        } else if user_agent.contains("V2") {
            "SUNMI V2"
        } else if user_agent.contains("T2") {
            "SUNMI T2"
        } else {
            "SUNMI (modelo desconhecido)"
        };
        model.to_string()
    }

    fn require_device(&self) -> Result<Arc<dyn PrinterDevice>> {
        self.detect().ok_or_else(|| {
            tracing::warn!("Print requested but no printer is available");
            AdminError::DeviceUnavailable("Impressora não detectada.".to_string())
        })
    }

    /// Print one ticket.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::DeviceUnavailable` when no device is present and
    /// `AdminError::PrintFailed` when the device fails.
    pub fn print_ticket(&self, ticket: &SoldTicket) -> Result<()> {
        let device = self.require_device()?;
        device.print(&ticket_document(ticket))?;
        tracing::info!(code = %ticket.code, kind = %device.kind(), "Ticket printed");
        Ok(())
    }

    /// Print tickets one after another, pausing between them.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidInput` for an empty list; otherwise stops
    /// at the first ticket that fails, as [`PrinterBridge::print_ticket`].
    pub async fn print_tickets(&self, tickets: &[SoldTicket]) -> Result<()> {
        if tickets.is_empty() {
            return Err(AdminError::InvalidInput("Nenhum bilhete para imprimir".to_string()));
        }
        for (i, ticket) in tickets.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.pause).await;
            }
            self.print_ticket(ticket)?;
        }
        Ok(())
    }

    /// Print the sale summary.
    ///
    /// # Errors
    ///
    /// Same as [`PrinterBridge::print_ticket`].
    pub fn print_receipt(
        &self,
        tickets: &[SoldTicket],
        payment_method: &str,
        point_of_sale: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let device = self.require_device()?;
        device.print(&receipt_document(tickets, payment_method, point_of_sale, at))?;
        tracing::info!(tickets = tickets.len(), kind = %device.kind(), "Receipt printed");
        Ok(())
    }

    /// Kick the cash drawer if the device has one. Never fails.
    pub fn open_drawer(&self) {
        let Some(device) = self.detect() else {
            tracing::warn!("Cash drawer requested but no printer is available");
            return;
        };
        if let Err(e) = device.open_drawer() {
            tracing::warn!(kind = %device.kind(), error = %e, "Cash drawer not opened");
        }
    }
}
