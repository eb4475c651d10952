//! Constants shared by the staff client.

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "arenaticket.token";

/// Storage key holding the JSON-serialized user record.
pub const USER_KEY: &str = "arenaticket.user";

/// Name shown when nobody is signed in.
pub const DEFAULT_DISPLAY_NAME: &str = "Administrador";

/// Check-ins kept in the rolling history.
pub const HISTORY_CAPACITY: usize = 10;

/// Login request path, relative to the API base URL.
pub const LOGIN_ENDPOINT: &str = "/auth/login";

/// Login screen.
pub const LOGIN_ROUTE: &str = "/login";

/// Landing screen after login.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Door screen, fallback for door staff.
pub const PORTEIRO_ROUTE: &str = "/porteiro";

/// Sales screen.
pub const SALES_ROUTE: &str = "/vendas";

/// Pause between consecutive tickets in a print batch, in milliseconds.
pub const PRINT_PAUSE_MS: u64 = 500;

/// Point-of-sale name printed on receipts when none is configured.
pub const DEFAULT_POINT_OF_SALE: &str = "Bilheteira";

/// Message for a check-in answer that carries no ticket and no message.
pub const INVALID_TICKET_MESSAGE: &str = "Bilhete inválido";

/// Message when an upload is attempted without a session.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Usuário não autenticado";
