//! `arenaticket` command line.
//!
//! Each subcommand stands for one screen of the staff client. Before it runs,
//! the route guard is asked whether the current session may open that screen;
//! a refusal is reported with the path the guard would redirect to.

use crate::checkin::{CheckInPhase, CheckInWorkflow};
use crate::config::Config;
use crate::constants::{LOGIN_ROUTE, PORTEIRO_ROUTE, SALES_ROUTE};
use crate::error::{AdminError, Result};
use crate::printer::{format_currency, format_date, DeviceHost, PrinterBridge};
use crate::providers::{FileStorage, HttpCheckInApi, SessionStorage};
use crate::router::{Navigation, RouteGuard};
use crate::session::{Credentials, SessionManager};
use crate::stores::{
    AuditFilter, AuditStore, BannerUploads, BatchesStore, EventsStore, NotificationService,
    OrderFilter, OrdersStore, SalesStore,
};
use arenaticket_client::types::{OrderStatus, SaleRequest, Ticket};
use arenaticket_client::ApiClient;
use arenaticket_core::environment::{Clock, SystemClock};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

/// ArenaTicket staff client.
#[derive(Debug, Parser)]
#[command(name = "arenaticket", version, about = "ArenaTicket staff client")]
pub struct Cli {
    /// API base URL (overrides ARENATICKET_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// One staff screen or action.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Sign in
    Login {
        /// Login e-mail
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long, env = "ARENATICKET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Ask the route guard about a path
    Open {
        /// Screen path, e.g. /pedidos
        path: String,
    },
    /// Validate a ticket at the door
    Checkin {
        /// Ticket code
        code: String,
        /// Only accept tickets of this event
        #[arg(long)]
        event: Option<String>,
    },
    /// Look a ticket up without checking it in
    Consult {
        /// Ticket code
        code: String,
    },
    /// Confirm a validated ticket
    Confirm {
        /// Ticket id
        ticket_id: String,
    },
    /// List events
    Events,
    /// List the batches of an event
    Batches {
        /// Event id
        event_id: String,
    },
    /// List orders
    Orders {
        /// Order status
        #[arg(long, value_parser = parse_order_status)]
        status: Option<OrderStatus>,
        /// Zero-based page
        #[arg(long)]
        page: Option<u32>,
        /// Page size
        #[arg(long)]
        size: Option<u32>,
    },
    /// Cancel an order
    CancelOrder {
        /// Order id
        id: String,
    },
    /// Send an order's ticket codes again
    ResendCodes {
        /// Order id
        id: String,
    },
    /// Show the audit log
    Audit {
        /// Acting user
        #[arg(long)]
        user: Option<String>,
        /// Action name
        #[arg(long)]
        action: Option<String>,
        /// Entity type
        #[arg(long)]
        entity: Option<String>,
        /// Zero-based page
        #[arg(long)]
        page: Option<u32>,
        /// Page size
        #[arg(long)]
        size: Option<u32>,
    },
    /// Sell tickets at the box office
    Sell {
        /// Event id
        #[arg(long)]
        event: String,
        /// Batch id
        #[arg(long)]
        batch: String,
        /// Number of tickets
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        /// Buyer name
        #[arg(long)]
        buyer: String,
        /// Buyer phone
        #[arg(long)]
        phone: Option<String>,
        /// Buyer e-mail
        #[arg(long)]
        email: Option<String>,
        /// Payment method
        #[arg(long, default_value = "DINHEIRO")]
        payment: String,
        /// Print tickets and receipt afterwards
        #[arg(long)]
        print: bool,
    },
    /// Show SMS gateway health
    SmsHealth,
    /// Show which printer would be used
    Printer,
    /// Upload an event banner image
    UploadBanner {
        /// Image file
        file: PathBuf,
    },
}

impl Command {
    /// Screen this command belongs to, if it needs one.
    #[must_use]
    pub fn screen(&self) -> Option<String> {
        let path = match self {
            Self::Login { .. } => LOGIN_ROUTE.to_string(),
            Self::Logout | Self::Whoami | Self::Open { .. } | Self::Printer => return None,
            Self::Checkin { .. } | Self::Consult { .. } | Self::Confirm { .. } => {
                PORTEIRO_ROUTE.to_string()
            },
            Self::Events | Self::UploadBanner { .. } => "/eventos".to_string(),
            Self::Batches { event_id } => {
                format!("/eventos/{}/lotes", urlencoding::encode(event_id))
            },
            Self::Orders { .. }
            | Self::CancelOrder { .. }
            | Self::ResendCodes { .. }
            | Self::SmsHealth => "/pedidos".to_string(),
            Self::Audit { .. } => "/auditoria".to_string(),
            Self::Sell { .. } => SALES_ROUTE.to_string(),
        };
        Some(path)
    }
}

fn parse_order_status(raw: &str) -> std::result::Result<OrderStatus, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_uppercase()))
        .map_err(|_| format!("unknown order status: {raw}"))
}

/// Wired-up staff client.
pub struct App {
    config: Config,
    session: SessionManager,
    guard: RouteGuard,
    printer: PrinterBridge,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("printer", &self.printer)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Client using the file storage and printer devices from `config`.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let storage = Arc::new(FileStorage::new(config.storage_path.clone()));
        let host = Arc::new(config.printer_host());
        Self::with_parts(config, storage, host)
    }

    /// Client over explicit storage and printer host.
    #[must_use]
    pub fn with_parts(
        config: Config,
        storage: Arc<dyn SessionStorage>,
        host: Arc<dyn DeviceHost>,
    ) -> Self {
        let api = ApiClient::new(config.api_base_url.clone());
        let session = SessionManager::connect(api, storage);
        let printer = PrinterBridge::new(host, config.printer_order.clone());
        Self {
            config,
            session,
            guard: RouteGuard::new(),
            printer,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `clock` for sale windows and receipt timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the printer bridge.
    #[must_use]
    pub fn with_printer(mut self, printer: PrinterBridge) -> Self {
        self.printer = printer;
        self
    }

    /// Session of this client.
    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    fn api(&self) -> ApiClient {
        self.session.api().clone()
    }

    fn authorize(&self, screen: &str) -> Result<()> {
        match self.guard.before_each(screen, &self.session) {
            Navigation::Allow => Ok(()),
            Navigation::Redirect(redirect) => {
                tracing::info!(screen, %redirect, "Command refused by route guard");
                Err(AdminError::AuthorizationDenied { redirect })
            },
        }
    }

    /// Run `command` and return what to show the operator.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::AuthorizationDenied` when the guard refuses the
    /// command's screen, otherwise the command's own error.
    pub async fn execute(&self, command: Command) -> Result<String> {
        if let Some(screen) = command.screen() {
            self.authorize(&screen)?;
        }

        match command {
            Command::Login { email, password } => {
                let user = self.session.login(Credentials { email, password }).await?;
                Ok(format!("Bem-vindo, {} ({})", user.name, user.role))
            },
            Command::Logout => {
                self.session.logout();
                Ok("Sessão terminada".to_string())
            },
            Command::Whoami => Ok(match self.session.current_user() {
                Some(user) => format!("{} <{}> {}", user.name, user.email, user.role),
                None => "Sem sessão".to_string(),
            }),
            Command::Open { path } => Ok(match self.guard.before_each(&path, &self.session) {
                Navigation::Allow => format!("{path}: permitido"),
                Navigation::Redirect(target) => format!("{path}: redirecionado para {target}"),
            }),
            Command::Checkin { code, event } => self.checkin(&code, event.as_deref()).await,
            Command::Consult { code } => {
                let ticket = self.door().consult(&code).await?;
                Ok(render_ticket(&ticket))
            },
            Command::Confirm { ticket_id } => {
                let response = self.door().confirm(&ticket_id).await?;
                let mut out = response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Entrada confirmada".to_string());
                if let Some(ticket) = &response.ticket {
                    out.push('\n');
                    out.push_str(&render_ticket(ticket));
                }
                Ok(out)
            },
            Command::Events => self.events().await,
            Command::Batches { event_id } => self.batches(&event_id).await,
            Command::Orders { status, page, size } => {
                self.orders(&OrderFilter {
                    status,
                    page,
                    size,
                    ..OrderFilter::default()
                })
                .await
            },
            Command::CancelOrder { id } => {
                let order = OrdersStore::new(self.api()).cancel(&id).await?;
                Ok(format!("Pedido {} agora {}", order.id, order.status))
            },
            Command::ResendCodes { id } => {
                let response = NotificationService::new(self.api())
                    .resend_ticket_codes(&id)
                    .await?;
                Ok(if response.message.is_empty() {
                    "Códigos reenviados".to_string()
                } else {
                    response.message
                })
            },
            Command::Audit {
                user,
                action,
                entity,
                page,
                size,
            } => {
                self.audit(&AuditFilter {
                    user,
                    action,
                    entity,
                    page,
                    size,
                    ..AuditFilter::default()
                })
                .await
            },
            Command::Sell {
                event,
                batch,
                quantity,
                buyer,
                phone,
                email,
                payment,
                print,
            } => {
                let request = SaleRequest {
                    event_id: event,
                    batch_id: batch,
                    quantity,
                    buyer_name: buyer,
                    buyer_phone: phone,
                    buyer_email: email,
                    payment_method: payment,
                    point_of_sale: Some(self.config.point_of_sale.clone()),
                };
                self.sell(&request, print).await
            },
            Command::SmsHealth => {
                let health = NotificationService::new(self.api()).sms_health().await?;
                Ok(format!(
                    "SMS {}: {:.1}% sucesso, {} falhas seguidas",
                    if health.healthy { "operacional" } else { "com falhas" },
                    health.success_rate,
                    health.consecutive_failures
                ))
            },
            Command::Printer => Ok(match self.printer.detect() {
                Some(device) => format!("Impressora: {}", device.kind()),
                None => "Impressora não detectada".to_string(),
            }),
            Command::UploadBanner { file } => {
                let bytes = std::fs::read(&file).map_err(|e| {
                    AdminError::InvalidInput(format!("{}: {e}", file.display()))
                })?;
                let name = file
                    .file_name()
                    .map_or_else(|| "banner".to_string(), |n| n.to_string_lossy().into_owned());
                let url = BannerUploads::new(self.api()).upload_banner(&name, bytes).await?;
                Ok(url)
            },
        }
    }

    fn door(&self) -> CheckInWorkflow<HttpCheckInApi> {
        CheckInWorkflow::new(HttpCheckInApi::new(self.api()))
    }

    async fn checkin(&self, code: &str, event: Option<&str>) -> Result<String> {
        match self.door().submit(code, event).await {
            CheckInPhase::Valid(ticket) => Ok(render_ticket(&ticket)),
            CheckInPhase::Failed(error) => Err(error),
            other => Err(AdminError::Protocol(format!("check-in ended in {other:?}"))),
        }
    }

    async fn events(&self) -> Result<String> {
        let store = EventsStore::new(self.api());
        store.list().await;
        let state = store.cache().snapshot();
        loaded(state.error)?;
        let mut out = String::new();
        for event in &state.items {
            let _ = writeln!(
                out,
                "{}  {}  {}  {}{}",
                event.id,
                format_date(&event.starts_at),
                event.title,
                event.venue,
                if event.open_for_sale { "  [à venda]" } else { "" }
            );
        }
        Ok(out)
    }

    async fn batches(&self, event_id: &str) -> Result<String> {
        let store = BatchesStore::new(self.api());
        store.list_for_event(event_id).await;
        let state = store.cache().snapshot();
        loaded(state.error)?;
        let mut out = String::new();
        for batch in &state.items {
            let _ = writeln!(
                out,
                "{}  {}  {}  {}/{}",
                batch.id,
                batch.name,
                format_currency(batch.price),
                batch.available_quantity,
                batch.total_quantity
            );
        }
        Ok(out)
    }

    async fn orders(&self, filter: &OrderFilter) -> Result<String> {
        let store = OrdersStore::new(self.api());
        store.list(filter).await;
        let state = store.cache().snapshot();
        loaded(state.error)?;
        let mut out = String::new();
        for order in &state.items {
            let warning = order
                .notification_summary()
                .filter(|s| s.has_notification_failure)
                .map_or_else(String::new, |s| {
                    format!("  [notificação falhou x{}]", s.notification_failure_count)
                });
            let _ = writeln!(
                out,
                "{}  {}  {}x  {}  {}{}",
                order.id,
                order.buyer_name,
                order.quantity,
                format_currency(order.amount),
                order.status,
                warning
            );
        }
        if state.total_pages > 0 {
            let _ = writeln!(
                out,
                "{} pedidos em {} páginas",
                state.total_elements, state.total_pages
            );
        }
        Ok(out)
    }

    async fn audit(&self, filter: &AuditFilter) -> Result<String> {
        let store = AuditStore::new(self.api());
        store.list(filter).await;
        let state = store.cache().snapshot();
        loaded(state.error)?;
        let mut out = String::new();
        for entry in &state.items {
            let _ = writeln!(
                out,
                "{}  {}  {}  {} {}",
                format_date(&entry.timestamp),
                entry.user,
                entry.action,
                entry.entity,
                entry.entity_id
            );
        }
        Ok(out)
    }

    async fn sell(&self, request: &SaleRequest, print: bool) -> Result<String> {
        let store = SalesStore::with_clock(self.api(), Arc::clone(&self.clock));
        let sale = store.sell(request).await?;

        let mut out = format!(
            "Pedido {}: {} bilhete(s), total {}\n",
            sale.order_id,
            sale.tickets.len(),
            format_currency(sale.total)
        );
        for ticket in &sale.tickets {
            let _ = writeln!(out, "  {}  {}", ticket.code, ticket.batch);
        }

        if print {
            // The sale stands even when printing fails.
            let printed = self.printer.print_tickets(&sale.tickets).await.and_then(|()| {
                self.printer.print_receipt(
                    &sale.tickets,
                    &request.payment_method,
                    &self.config.point_of_sale,
                    self.clock.now(),
                )
            });
            match printed {
                Ok(()) => {
                    self.printer.open_drawer();
                    out.push_str("Impresso\n");
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Sale printed incompletely");
                    let _ = writeln!(out, "Impressão falhou: {e}");
                },
            }
        }
        Ok(out)
    }
}

/// Listing stores keep only the message of a failed load.
fn loaded(error: Option<String>) -> Result<()> {
    error.map_or(Ok(()), |message| {
        Err(AdminError::RequestFailed { status: 0, message })
    })
}

fn render_ticket(ticket: &Ticket) -> String {
    let mut out = format!("{}  {}", ticket.code, ticket.status);
    if let Some(holder) = &ticket.holder_name {
        let _ = write!(out, "  {holder}");
    }
    if let Some(used_at) = &ticket.used_at {
        let _ = write!(out, "  usado em {}", format_date(used_at));
    }
    out
}

/// Load `.env`-style configuration with an optional API URL override.
///
/// # Errors
///
/// Same as [`Config::from_env`].
pub fn load_config(api_url: Option<String>) -> Result<Config> {
    let config = Config::from_env()?;
    Ok(match api_url {
        Some(url) => config.with_api_base_url(url),
        None => config,
    })
}
