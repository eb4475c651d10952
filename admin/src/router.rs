//! Route table and navigation guard.
//!
//! Every screen the operator can open is a path in [`ROUTES`]. Before a
//! screen runs, [`RouteGuard`] decides whether the current session may see
//! it or where to send the operator instead.

use crate::constants::{DASHBOARD_ROUTE, LOGIN_ROUTE, PORTEIRO_ROUTE, SALES_ROUTE};
use crate::session::{SessionManager, SessionState};
use arenaticket_client::types::Role;

/// Static description of one navigable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Path pattern; `:name` segments match any single segment
    pub path: &'static str,
    /// Only authenticated sessions may enter
    pub requires_auth: bool,
    /// Roles admitted; empty means any authenticated role
    pub allowed_roles: &'static [Role],
    /// Alias that forwards to another path
    pub redirect: Option<&'static str>,
}

impl RouteDescriptor {
    const fn open(path: &'static str) -> Self {
        Self {
            path,
            requires_auth: false,
            allowed_roles: &[],
            redirect: None,
        }
    }

    const fn private(path: &'static str, allowed_roles: &'static [Role]) -> Self {
        Self {
            path,
            requires_auth: true,
            allowed_roles,
            redirect: None,
        }
    }

    const fn alias(path: &'static str, target: &'static str) -> Self {
        Self {
            path,
            requires_auth: false,
            allowed_roles: &[],
            redirect: Some(target),
        }
    }
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Every screen of the staff client.
pub const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor::alias("/", DASHBOARD_ROUTE),
    RouteDescriptor::open(LOGIN_ROUTE),
    RouteDescriptor::private(DASHBOARD_ROUTE, &[]),
    RouteDescriptor::private("/eventos", ADMIN_ONLY),
    RouteDescriptor::private("/lotes", ADMIN_ONLY),
    RouteDescriptor::private("/eventos/:eventoId/lotes", ADMIN_ONLY),
    RouteDescriptor::private("/pedidos", ADMIN_ONLY),
    RouteDescriptor::private("/auditoria", ADMIN_ONLY),
    RouteDescriptor::private(PORTEIRO_ROUTE, &[Role::Porteiro, Role::Admin]),
    RouteDescriptor::private(SALES_ROUTE, &[Role::Vendedor, Role::Admin]),
];

/// Descriptor applied to paths missing from the table.
const UNKNOWN_ROUTE: RouteDescriptor = RouteDescriptor::private("*", &[]);

/// A path resolved against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Matching descriptor
    pub descriptor: &'static RouteDescriptor,
    /// Values captured by `:name` segments
    pub params: Vec<(&'static str, String)>,
}

impl RouteMatch {
    /// Captured value of `:name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Open the requested screen
    Allow,
    /// Open this path instead
    Redirect(String),
}

/// Navigation guard over a route table.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    routes: &'static [RouteDescriptor],
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteGuard {
    /// Guard over [`ROUTES`].
    #[must_use]
    pub const fn new() -> Self {
        Self { routes: ROUTES }
    }

    /// Guard over a custom table.
    #[must_use]
    pub const fn with_routes(routes: &'static [RouteDescriptor]) -> Self {
        Self { routes }
    }

    /// Find the descriptor for `path`. Query string and trailing slash are
    /// ignored.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let target = segments(strip_query(path));
        self.routes.iter().find_map(|descriptor| {
            let pattern = segments(descriptor.path);
            if pattern.len() != target.len() {
                return None;
            }
            let mut params = Vec::new();
            for (expected, actual) in pattern.iter().copied().zip(target.iter().copied()) {
                if let Some(name) = expected.strip_prefix(':') {
                    params.push((name, actual.to_string()));
                } else if expected != actual {
                    return None;
                }
            }
            Some(RouteMatch { descriptor, params })
        })
    }

    /// Decide whether `session` may open `path`.
    ///
    /// Pure: the same path and session always give the same answer.
    #[must_use]
    pub fn decide(&self, path: &str, session: &SessionState) -> Navigation {
        let descriptor = self
            .resolve(path)
            .map_or(&UNKNOWN_ROUTE, |found| found.descriptor);

        if let Some(target) = descriptor.redirect {
            return match self.decide(target, session) {
                Navigation::Allow => Navigation::Redirect(target.to_string()),
                other => other,
            };
        }

        if descriptor.path == LOGIN_ROUTE {
            return if session.is_authenticated() {
                Navigation::Redirect(DASHBOARD_ROUTE.to_string())
            } else {
                Navigation::Allow
            };
        }

        if descriptor.requires_auth && !session.is_authenticated() {
            return Navigation::Redirect(login_redirect(path));
        }

        if !descriptor.allowed_roles.is_empty() && !session.can_access_route(descriptor.allowed_roles) {
            return Navigation::Redirect(fallback_route(session.role()).to_string());
        }

        Navigation::Allow
    }

    /// [`RouteGuard::decide`] after restoring a persisted session when the
    /// in-memory one is empty.
    #[must_use]
    pub fn before_each(&self, path: &str, session: &SessionManager) -> Navigation {
        if session.snapshot().is_empty() {
            let outcome = session.restore_from_storage();
            tracing::debug!(?outcome, "Session restored before navigation");
        }
        let decision = self.decide(path, &session.snapshot());
        if let Navigation::Redirect(target) = &decision {
            tracing::debug!(path, %target, "Navigation redirected");
        }
        decision
    }
}

/// Where a session lands when its role is refused.
#[must_use]
pub const fn fallback_route(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Porteiro) => PORTEIRO_ROUTE,
        _ => DASHBOARD_ROUTE,
    }
}

/// Login path carrying `path` as the return target.
#[must_use]
pub fn login_redirect(path: &str) -> String {
    format!(
        "{LOGIN_ROUTE}?redirect={}",
        urlencoding::encode(path).replace("%2F", "/")
    )
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arenaticket_client::types::UserRecord;

    fn session(role: Role) -> SessionState {
        SessionState::signed_in(
            UserRecord {
                id: "u1".into(),
                name: "Ana".into(),
                email: "ana@arena.ao".into(),
                role,
            },
            "tok".into(),
        )
    }

    #[test]
    fn patterns_capture_params() {
        let guard = RouteGuard::new();
        let found = guard.resolve("/eventos/42/lotes?aba=ativos");
        assert_eq!(
            found.as_ref().map(|m| m.descriptor.path),
            Some("/eventos/:eventoId/lotes")
        );
        assert_eq!(found.as_ref().and_then(|m| m.param("eventoId")), Some("42"));
        assert!(guard.resolve("/eventos/42").is_none());
        assert_eq!(guard.resolve("/pedidos/").map(|m| m.descriptor.path), Some("/pedidos"));
    }

    #[test]
    fn unauthenticated_keeps_query_in_return_target() {
        let guard = RouteGuard::new();
        assert_eq!(
            guard.decide("/pedidos?status=PAGO&page=2", &SessionState::default()),
            Navigation::Redirect("/login?redirect=/pedidos%3Fstatus%3DPAGO%26page%3D2".into())
        );
    }

    #[test]
    fn root_forwards_through_dashboard_rules() {
        let guard = RouteGuard::new();
        assert_eq!(
            guard.decide("/", &session(Role::Vendedor)),
            Navigation::Redirect("/dashboard".into())
        );
        assert_eq!(
            guard.decide("/", &SessionState::default()),
            Navigation::Redirect("/login?redirect=/dashboard".into())
        );
    }

    #[test]
    fn unknown_paths_need_any_session() {
        let guard = RouteGuard::new();
        assert_eq!(guard.decide("/relatorios", &session(Role::Porteiro)), Navigation::Allow);
        assert_eq!(
            guard.decide("/relatorios", &SessionState::default()),
            Navigation::Redirect("/login?redirect=/relatorios".into())
        );
    }

    #[test]
    fn refused_roles_fall_back_by_role() {
        let guard = RouteGuard::new();
        assert_eq!(
            guard.decide("/vendas", &session(Role::Porteiro)),
            Navigation::Redirect("/porteiro".into())
        );
        assert_eq!(
            guard.decide("/porteiro", &session(Role::Vendedor)),
            Navigation::Redirect("/dashboard".into())
        );
        assert_eq!(guard.decide("/porteiro", &session(Role::Admin)), Navigation::Allow);
    }
}
