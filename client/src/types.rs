//! Wire types for the ArenaTicket API
//!
//! Field names on the wire are the server's Portuguese camelCase names; the
//! Rust side uses English names. Dates stay as the server's ISO-8601 text and
//! are parsed on demand with [`parse_timestamp`], because the server mixes
//! offset-qualified and local (`2025-03-15T20:00:00`) timestamps.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Africa/Luanda offset (WAT, UTC+01:00, no daylight saving).
pub const LUANDA_OFFSET_SECONDS: i32 = 3600;

/// The Luanda time zone as a fixed offset.
#[must_use]
pub fn luanda() -> FixedOffset {
    FixedOffset::east_opt(LUANDA_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Parse a server timestamp.
///
/// RFC 3339 values keep their offset; local values without an offset are
/// read as Luanda wall-clock time. A bare `YYYY-MM-DD` date is midnight UTC.
///
/// # Examples
///
/// ```
/// # use arenaticket_client::types::parse_timestamp;
/// let a = parse_timestamp("2025-03-15T20:00:00+01:00").unwrap();
/// let b = parse_timestamp("2025-03-15T20:00:00").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(
///     parse_timestamp("2025-05-01").map(|t| t.to_rfc3339()).as_deref(),
///     Some("2025-05-01T00:00:00+00:00")
/// );
/// assert!(parse_timestamp("soon").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| luanda().from_local_datetime(&naive).single())
        .map(|local| local.with_timezone(&Utc))
}

// ═══════════════════════════════════════════════════════════════════════
// Identity
// ═══════════════════════════════════════════════════════════════════════

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Back-office administrator
    #[serde(rename = "ADMIN")]
    Admin,
    /// Door staff (check-in)
    #[serde(rename = "PORTEIRO")]
    Porteiro,
    /// Sales staff (in-person sales)
    #[serde(rename = "VENDEDOR")]
    Vendedor,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Porteiro => "PORTEIRO",
            Self::Vendedor => "VENDEDOR",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "PORTEIRO" => Ok(Self::Porteiro),
            "VENDEDOR" => Ok(Self::Vendedor),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Authenticated staff member as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User id
    pub id: String,
    /// Display name
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    /// Login e-mail
    pub email: String,
    /// Role
    pub role: Role,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Login e-mail
    pub email: String,
    /// Password
    #[serde(rename = "senha")]
    pub password: String,
}

/// Successful login answer.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token
    pub token: String,
    /// Authenticated user
    #[serde(rename = "usuario", alias = "user")]
    pub user: UserRecord,
}

// ═══════════════════════════════════════════════════════════════════════
// Events and batches
// ═══════════════════════════════════════════════════════════════════════

/// Event (evento).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event id
    pub id: String,
    /// Title
    #[serde(rename = "titulo")]
    pub title: String,
    /// Description
    #[serde(rename = "descricao", default)]
    pub description: String,
    /// Venue
    #[serde(rename = "local", default)]
    pub venue: String,
    /// Start (ISO 8601)
    #[serde(rename = "dataInicio")]
    pub starts_at: String,
    /// End (ISO 8601)
    #[serde(rename = "dataFim")]
    pub ends_at: String,
    /// Banner image URL
    #[serde(rename = "bannerUrl", default, skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    /// Whether tickets may be sold
    #[serde(rename = "abertoParaVenda", default)]
    pub open_for_sale: bool,
    /// Creation timestamp
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    /// Last update timestamp
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for creating an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCreate {
    /// Title
    #[serde(rename = "titulo")]
    pub title: String,
    /// Description
    #[serde(rename = "descricao")]
    pub description: String,
    /// Venue
    #[serde(rename = "local")]
    pub venue: String,
    /// Start (ISO 8601)
    #[serde(rename = "dataInicio")]
    pub starts_at: String,
    /// End (ISO 8601)
    #[serde(rename = "dataFim")]
    pub ends_at: String,
    /// Banner image URL
    #[serde(rename = "bannerUrl", skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    /// Whether tickets may be sold
    #[serde(rename = "abertoParaVenda")]
    pub open_for_sale: bool,
}

/// Partial event update; absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventUpdate {
    /// Title
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Venue
    #[serde(rename = "local", skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Start (ISO 8601)
    #[serde(rename = "dataInicio", skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    /// End (ISO 8601)
    #[serde(rename = "dataFim", skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
    /// Banner image URL
    #[serde(rename = "bannerUrl", skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    /// Whether tickets may be sold
    #[serde(rename = "abertoParaVenda", skip_serializing_if = "Option::is_none")]
    pub open_for_sale: Option<bool>,
}

/// Ticket batch (lote).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Batch id
    pub id: String,
    /// Owning event
    #[serde(rename = "eventoId")]
    pub event_id: String,
    /// Batch name
    #[serde(rename = "nome")]
    pub name: String,
    /// Unit price in kwanza
    #[serde(rename = "preco")]
    pub price: f64,
    /// Tickets issued in this batch
    #[serde(rename = "quantidadeTotal", default)]
    pub total_quantity: i64,
    /// Tickets still available
    #[serde(rename = "quantidadeDisponivel", default)]
    pub available_quantity: i64,
    /// Sale window start (ISO 8601)
    #[serde(rename = "inicioVenda")]
    pub sale_starts_at: String,
    /// Sale window end (ISO 8601)
    #[serde(rename = "fimVenda")]
    pub sale_ends_at: String,
}

impl Batch {
    /// Stock left and `now` inside the sale window.
    ///
    /// Unparseable window bounds make the batch unavailable.
    #[must_use]
    pub fn is_on_sale(&self, now: DateTime<Utc>) -> bool {
        let window = parse_timestamp(&self.sale_starts_at).zip(parse_timestamp(&self.sale_ends_at));
        self.available_quantity > 0
            && window.is_some_and(|(start, end)| now >= start && now <= end)
    }
}

/// Payload for creating a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCreate {
    /// Batch name
    #[serde(rename = "nome")]
    pub name: String,
    /// Unit price in kwanza
    #[serde(rename = "preco")]
    pub price: f64,
    /// Tickets issued in this batch
    #[serde(rename = "quantidadeTotal")]
    pub total_quantity: i64,
    /// Sale window start (ISO 8601)
    #[serde(rename = "inicioVenda")]
    pub sale_starts_at: String,
    /// Sale window end (ISO 8601)
    #[serde(rename = "fimVenda")]
    pub sale_ends_at: String,
    /// Owning event, filled in by the batches store
    #[serde(rename = "eventoId", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

/// Partial batch update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdate {
    /// Batch name
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price in kwanza
    #[serde(rename = "preco", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Tickets issued in this batch
    #[serde(rename = "quantidadeTotal", skip_serializing_if = "Option::is_none")]
    pub total_quantity: Option<i64>,
    /// Sale window start (ISO 8601)
    #[serde(rename = "inicioVenda", skip_serializing_if = "Option::is_none")]
    pub sale_starts_at: Option<String>,
    /// Sale window end (ISO 8601)
    #[serde(rename = "fimVenda", skip_serializing_if = "Option::is_none")]
    pub sale_ends_at: Option<String>,
    /// Owning event, filled in by the batches store
    #[serde(rename = "eventoId", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Tickets and check-in
// ═══════════════════════════════════════════════════════════════════════

/// Ticket lifecycle status. The server owns transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    /// Not used yet
    #[serde(rename = "VALID", alias = "VALIDO")]
    Valid,
    /// Already checked in
    #[serde(rename = "USED", alias = "UTILIZADO")]
    Used,
    /// Cancelled with its order
    #[serde(rename = "CANCELLED", alias = "CANCELADO")]
    Cancelled,
    /// Event or validity window is over
    #[serde(rename = "EXPIRED", alias = "EXPIRADO")]
    Expired,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Valid => "VALID",
            Self::Used => "USED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        })
    }
}

/// Ticket (bilhete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket id
    pub id: String,
    /// Order the ticket belongs to
    #[serde(rename = "pedidoId", default)]
    pub order_id: String,
    /// Event
    #[serde(rename = "eventoId", default)]
    pub event_id: String,
    /// Batch
    #[serde(rename = "loteId", default)]
    pub batch_id: String,
    /// Full ticket code (encoded in the QR)
    #[serde(rename = "codigoTicket")]
    pub code: String,
    /// Short code for manual entry
    #[serde(rename = "codigoCompacto", default, skip_serializing_if = "Option::is_none")]
    pub compact_code: Option<String>,
    /// QR image (data URL or link)
    #[serde(rename = "qrCodeImagem", default, skip_serializing_if = "Option::is_none")]
    pub qr_image: Option<String>,
    /// Holder name
    #[serde(rename = "nomeTitular", default, skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    /// Holder phone
    #[serde(rename = "telefoneTitular", default, skip_serializing_if = "Option::is_none")]
    pub holder_phone: Option<String>,
    /// Current status
    pub status: TicketStatus,
    /// Sale timestamp
    #[serde(rename = "dataVenda", default, skip_serializing_if = "Option::is_none")]
    pub sold_at: Option<String>,
    /// Check-in timestamp
    #[serde(rename = "dataUso", default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<String>,
}

/// Check-in request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInRequest {
    /// Code read from the ticket
    #[serde(rename = "codigoTicket")]
    pub code: String,
    /// Restrict validation to this event
    #[serde(rename = "eventoId", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

/// Check-in / confirmation answer.
///
/// A missing ticket means the server rejected the code; `message` says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInResponse {
    /// Resolved ticket
    #[serde(rename = "bilhete", default)]
    pub ticket: Option<Ticket>,
    /// Server message
    #[serde(rename = "mensagem", default)]
    pub message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Orders
// ═══════════════════════════════════════════════════════════════════════

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Waiting for payment
    #[serde(rename = "PENDING", alias = "PENDENTE")]
    Pending,
    /// Paid, tickets issued
    #[serde(rename = "PAID", alias = "PAGO")]
    Paid,
    /// Cancelled by staff
    #[serde(rename = "CANCELLED", alias = "CANCELADO")]
    Cancelled,
    /// Payment window elapsed
    #[serde(rename = "EXPIRED", alias = "EXPIRADO")]
    Expired,
    /// Money returned
    #[serde(rename = "REFUNDED", alias = "REEMBOLSADO")]
    Refunded,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
            Self::Refunded => "REFUNDED",
        })
    }
}

/// Order (pedido).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id
    pub id: String,
    /// Buyer name
    #[serde(rename = "compradorNome", default)]
    pub buyer_name: String,
    /// Buyer e-mail
    #[serde(rename = "compradorEmail", default, skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    /// Buyer phone
    #[serde(rename = "compradorTelefone", default, skip_serializing_if = "Option::is_none")]
    pub buyer_phone: Option<String>,
    /// Event
    #[serde(rename = "eventoId", default)]
    pub event_id: String,
    /// Batch
    #[serde(rename = "loteId", default)]
    pub batch_id: String,
    /// Number of tickets
    #[serde(rename = "quantidade", default)]
    pub quantity: u32,
    /// Total amount in kwanza
    #[serde(rename = "valorTotal", default)]
    pub amount: f64,
    /// Status
    pub status: OrderStatus,
    /// Creation timestamp
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    /// Last update timestamp
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Whether the last ticket-code notification failed
    #[serde(rename = "hasNotificationFailure", default, skip_serializing_if = "Option::is_none")]
    pub has_notification_failure: Option<bool>,
    /// Status of the last notification attempt
    #[serde(rename = "lastNotificationStatus", default, skip_serializing_if = "Option::is_none")]
    pub last_notification_status: Option<NotificationStatus>,
    /// Time of the last notification attempt
    #[serde(
        rename = "lastNotificationTimestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_notification_timestamp: Option<String>,
    /// Number of failed notification attempts
    #[serde(rename = "notificationFailureCount", default, skip_serializing_if = "Option::is_none")]
    pub notification_failure_count: Option<u32>,
}

impl Order {
    /// Notification health, when the server reported it.
    #[must_use]
    pub fn notification_summary(&self) -> Option<NotificationSummary> {
        Some(NotificationSummary {
            has_notification_failure: self.has_notification_failure?,
            last_notification_status: self.last_notification_status?,
            last_notification_timestamp: self.last_notification_timestamp.clone().unwrap_or_default(),
            notification_failure_count: self.notification_failure_count.unwrap_or_default(),
        })
    }
}

/// Either a Spring page or a bare array, depending on the endpoint version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    /// Paged answer
    Page {
        /// Items on this page
        content: Vec<T>,
        /// Page count
        #[serde(rename = "totalPages", default)]
        total_pages: u32,
        /// Total matching items
        #[serde(rename = "totalElements", default)]
        total_elements: u64,
    },
    /// Bare array
    Items(Vec<T>),
}

impl<T> Listing<T> {
    /// Split into items and optional `(total_pages, total_elements)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Option<(u32, u64)>) {
        match self {
            Self::Page {
                content,
                total_pages,
                total_elements,
            } => (content, Some((total_pages, total_elements))),
            Self::Items(items) => (items, None),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// In-person sales
// ═══════════════════════════════════════════════════════════════════════

/// In-person sale request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRequest {
    /// Event
    #[serde(rename = "eventoId")]
    pub event_id: String,
    /// Batch
    #[serde(rename = "loteId")]
    pub batch_id: String,
    /// Number of tickets
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    /// Buyer name
    #[serde(rename = "compradorNome")]
    pub buyer_name: String,
    /// Buyer phone
    #[serde(rename = "compradorTelefone", skip_serializing_if = "Option::is_none")]
    pub buyer_phone: Option<String>,
    /// Buyer e-mail
    #[serde(rename = "compradorEmail", skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    /// Payment method (cash, card, ...)
    #[serde(rename = "metodoPagamento")]
    pub payment_method: String,
    /// Point of sale name
    #[serde(rename = "pontoVenda", skip_serializing_if = "Option::is_none")]
    pub point_of_sale: Option<String>,
}

/// Ticket as printed after an in-person sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldTicket {
    /// Ticket code
    #[serde(rename = "codigoTicket")]
    pub code: String,
    /// Event title
    #[serde(rename = "evento")]
    pub event: String,
    /// Event date (ISO 8601)
    #[serde(rename = "dataEvento")]
    pub event_date: String,
    /// Batch name
    #[serde(rename = "lote")]
    pub batch: String,
    /// Price in kwanza
    #[serde(rename = "preco")]
    pub price: f64,
    /// Buyer name
    #[serde(rename = "compradorNome")]
    pub buyer_name: String,
}

/// In-person sale answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleResponse {
    /// Created order
    #[serde(rename = "pedidoId")]
    pub order_id: String,
    /// Amount charged
    pub total: f64,
    /// Issued tickets
    #[serde(rename = "bilhetes", default)]
    pub tickets: Vec<SoldTicket>,
    /// Server message
    #[serde(rename = "mensagem", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Audit
// ═══════════════════════════════════════════════════════════════════════

/// Audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    /// Entry id
    pub id: String,
    /// Acting user's name
    #[serde(rename = "usuario", default)]
    pub user: String,
    /// Acting user's id
    #[serde(rename = "usuarioId", default)]
    pub user_id: String,
    /// Action performed
    #[serde(rename = "acao", default)]
    pub action: String,
    /// Entity type
    #[serde(rename = "entidade", default)]
    pub entity: String,
    /// Entity id
    #[serde(rename = "entidadeId", default)]
    pub entity_id: String,
    /// Free-form details
    #[serde(rename = "detalhes", default)]
    pub details: String,
    /// Origin address
    #[serde(rename = "ipAddress", default)]
    pub ip_address: String,
    /// When it happened
    #[serde(default)]
    pub timestamp: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Notifications and uploads
// ═══════════════════════════════════════════════════════════════════════

/// Notification channel and purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// SMS carrying ticket codes
    SmsTicketCodes,
    /// SMS confirming payment
    SmsPaymentConfirmed,
    /// Confirmation e-mail
    EmailConfirmation,
}

/// Delivery outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    /// Delivered
    Success,
    /// Delivery failed
    Failed,
    /// Not attempted yet
    Pending,
}

/// One delivery attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Attempt id
    pub id: u64,
    /// Kind
    #[serde(rename = "tipo")]
    pub kind: NotificationType,
    /// Outcome
    pub status: NotificationStatus,
    /// Attempt number
    #[serde(rename = "tentativa")]
    pub attempt: u32,
    /// Attempt time
    #[serde(rename = "dataTentativa")]
    pub attempted_at: String,
    /// Masked recipient
    #[serde(rename = "destinatario")]
    pub recipient: String,
    /// Failure reason
    #[serde(rename = "motivo", default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Admin who requested a resend
    #[serde(rename = "usuarioId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

/// Per-order notification health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    /// Whether the last delivery failed
    pub has_notification_failure: bool,
    /// Last outcome
    pub last_notification_status: NotificationStatus,
    /// Last attempt time
    pub last_notification_timestamp: String,
    /// Failed attempts
    pub notification_failure_count: u32,
}

/// SMS gateway health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsHealthStatus {
    /// Gateway considered healthy
    pub healthy: bool,
    /// Failures in a row
    pub consecutive_failures: u32,
    /// Failures overall
    pub total_failures: u64,
    /// Successes overall
    pub total_success: u64,
    /// Success rate, 0-100
    pub success_rate: f64,
    /// Last success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success_timestamp: Option<String>,
    /// Last failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failure_timestamp: Option<String>,
    /// Last failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failure_reason: Option<String>,
}

/// Answer to a resend request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendResponse {
    /// Whether the resend was queued
    pub success: bool,
    /// Server message
    pub message: String,
}

/// Answer to a banner upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Whether the upload was stored
    pub success: bool,
    /// Public URL of the stored file
    pub url: String,
    /// Stored file name
    #[serde(default)]
    pub filename: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Server message
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(available: i64, start: &str, end: &str) -> Batch {
        Batch {
            id: "l1".into(),
            event_id: "e1".into(),
            name: "Normal".into(),
            price: 5000.0,
            total_quantity: 100,
            available_quantity: available,
            sale_starts_at: start.into(),
            sale_ends_at: end.into(),
        }
    }

    #[test]
    fn ticket_accepts_english_and_portuguese_status() {
        let used: Ticket = serde_json::from_str(
            r#"{"id":"b1","codigoTicket":"ABC123","status":"USED"}"#,
        )
        .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(used.status, TicketStatus::Used);
        assert_eq!(used.order_id, "");

        let valid: Ticket = serde_json::from_str(
            r#"{"id":"b2","codigoTicket":"XYZ","status":"VALIDO","nomeTitular":"Ana"}"#,
        )
        .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(valid.status, TicketStatus::Valid);
        assert_eq!(valid.holder_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn listing_reads_pages_and_bare_arrays() {
        let page: Listing<AuditLog> = serde_json::from_str(
            r#"{"content":[{"id":"1"}],"totalPages":3,"totalElements":41}"#,
        )
        .unwrap_or_else(|e| unreachable!("{e}"));
        let (items, totals) = page.into_parts();
        assert_eq!(items.len(), 1);
        assert_eq!(totals, Some((3, 41)));

        let bare: Listing<AuditLog> =
            serde_json::from_str(r#"[{"id":"1"},{"id":"2"}]"#).unwrap_or_else(|e| unreachable!("{e}"));
        let (items, totals) = bare.into_parts();
        assert_eq!(items.len(), 2);
        assert_eq!(totals, None);
    }

    #[test]
    fn batch_sale_window_is_inclusive() {
        let now = parse_timestamp("2025-06-01T19:00:00+01:00").unwrap_or_default();
        assert!(batch(10, "2025-06-01T19:00:00", "2025-06-02T00:00:00").is_on_sale(now));
        assert!(!batch(0, "2025-06-01T00:00:00", "2025-06-02T00:00:00").is_on_sale(now));
        assert!(!batch(10, "2025-06-01T19:00:01", "2025-06-02T00:00:00").is_on_sale(now));
        assert!(!batch(10, "whenever", "2025-06-02T00:00:00").is_on_sale(now));
    }

    #[test]
    fn date_only_sale_window_opens_at_midnight_utc() {
        let now = parse_timestamp("2025-06-01T18:00:00Z").unwrap_or_default();
        assert!(batch(50, "2025-05-01", "2025-07-01").is_on_sale(now));
        assert!(!batch(50, "2025-06-02", "2025-07-01").is_on_sale(now));
        assert_eq!(
            parse_timestamp("2025-06-01").map(|t| t.to_rfc3339()).as_deref(),
            Some("2025-06-01T00:00:00+00:00")
        );
        assert!(parse_timestamp("2025-13-01").is_none());
    }

    #[test]
    fn luanda_is_one_hour_ahead() {
        assert_eq!(luanda().local_minus_utc(), 3600);
    }

    #[test]
    fn login_request_uses_server_field_names() {
        let body = serde_json::to_value(LoginRequest {
            email: "porta@arena.ao".into(),
            password: "segredo".into(),
        })
        .unwrap_or_default();
        assert_eq!(body["senha"], "segredo");
        assert_eq!(body["email"], "porta@arena.ao");
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("porteiro".parse::<Role>(), Ok(Role::Porteiro));
        assert!("guest".parse::<Role>().is_err());
        assert_eq!(Role::Vendedor.to_string(), "VENDEDOR");
    }

    #[test]
    fn order_summary_requires_reported_health() {
        let order: Order = serde_json::from_str(
            r#"{"id":"p1","status":"PAGO","hasNotificationFailure":true,"lastNotificationStatus":"FAILED","notificationFailureCount":2}"#,
        )
        .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(order.status, OrderStatus::Paid);
        let summary = order.notification_summary();
        assert_eq!(summary.map(|s| s.notification_failure_count), Some(2));

        let quiet: Order = serde_json::from_str(r#"{"id":"p2","status":"PENDING"}"#)
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert!(quiet.notification_summary().is_none());
    }
}
