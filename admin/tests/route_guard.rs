//! Route guard decisions over the full route table.

use arenaticket_admin::constants::{TOKEN_KEY, USER_KEY};
use arenaticket_admin::mocks::MemoryStorage;
use arenaticket_admin::router::{Navigation, RouteGuard, ROUTES};
use arenaticket_admin::session::{SessionManager, SessionState};
use arenaticket_client::types::{Role, UserRecord};
use arenaticket_client::ApiClient;
use proptest::prelude::*;
use std::sync::Arc;

fn signed_in(role: Role) -> SessionState {
    SessionState::signed_in(
        UserRecord {
            id: "u1".into(),
            name: "Paulo".into(),
            email: "paulo@arena.ao".into(),
            role,
        },
        "tok".into(),
    )
}

fn redirect(to: &str) -> Navigation {
    Navigation::Redirect(to.to_string())
}

#[test]
fn test_porteiro_on_admin_route_goes_to_door() {
    let guard = RouteGuard::new();
    assert_eq!(guard.decide("/eventos", &signed_in(Role::Porteiro)), redirect("/porteiro"));
}

#[test]
fn test_unauthenticated_dashboard_goes_to_login() {
    let guard = RouteGuard::new();
    assert_eq!(
        guard.decide("/dashboard", &SessionState::default()),
        redirect("/login?redirect=/dashboard")
    );
}

#[test]
fn test_decision_table() {
    let guard = RouteGuard::new();
    let anonymous = SessionState::default();
    let admin = signed_in(Role::Admin);
    let porteiro = signed_in(Role::Porteiro);
    let vendedor = signed_in(Role::Vendedor);

    let cases: Vec<(&str, &SessionState, Navigation)> = vec![
        ("/login", &anonymous, Navigation::Allow),
        ("/login", &vendedor, redirect("/dashboard")),
        ("/dashboard", &porteiro, Navigation::Allow),
        ("/eventos", &admin, Navigation::Allow),
        ("/eventos", &vendedor, redirect("/dashboard")),
        ("/eventos/e1/lotes", &admin, Navigation::Allow),
        ("/eventos/e1/lotes", &porteiro, redirect("/porteiro")),
        ("/eventos/e1/lotes", &anonymous, redirect("/login?redirect=/eventos/e1/lotes")),
        ("/pedidos", &admin, Navigation::Allow),
        ("/auditoria", &vendedor, redirect("/dashboard")),
        ("/porteiro", &porteiro, Navigation::Allow),
        ("/porteiro", &admin, Navigation::Allow),
        ("/porteiro", &vendedor, redirect("/dashboard")),
        ("/vendas", &vendedor, Navigation::Allow),
        ("/vendas", &admin, Navigation::Allow),
        ("/vendas", &porteiro, redirect("/porteiro")),
        ("/", &admin, redirect("/dashboard")),
    ];

    for (path, session, expected) in cases {
        assert_eq!(guard.decide(path, session), expected, "path {path}");
    }
}

#[test]
fn test_half_session_is_sent_to_login() {
    let guard = RouteGuard::new();
    let token_only = SessionState {
        user: None,
        token: Some("tok".into()),
    };
    assert_eq!(
        guard.decide("/pedidos", &token_only),
        redirect("/login?redirect=/pedidos")
    );
}

#[test]
fn test_before_each_restores_stored_session() {
    let user = r#"{"id":"u9","nome":"Marta","email":"marta@arena.ao","role":"PORTEIRO"}"#;
    let storage = MemoryStorage::new()
        .with_value(TOKEN_KEY, "tok-9")
        .with_value(USER_KEY, user);
    let session = SessionManager::connect(ApiClient::new("http://unused"), Arc::new(storage));

    let guard = RouteGuard::new();
    assert_eq!(guard.before_each("/porteiro", &session), Navigation::Allow);
    assert!(session.is_porteiro());
    assert_eq!(session.api().current_token().as_deref(), Some("tok-9"));
}

#[test]
fn test_before_each_with_corrupted_storage_goes_to_login() {
    let storage = MemoryStorage::new()
        .with_value(TOKEN_KEY, "tok")
        .with_value(USER_KEY, "{not json");
    let probe = storage.clone();
    let session = SessionManager::connect(ApiClient::new("http://unused"), Arc::new(storage));

    assert_eq!(
        RouteGuard::new().before_each("/vendas", &session),
        redirect("/login?redirect=/vendas")
    );
    assert!(probe.is_empty());
}

fn any_session() -> impl Strategy<Value = SessionState> {
    let role = prop_oneof![Just(Role::Admin), Just(Role::Porteiro), Just(Role::Vendedor)];
    (proptest::option::of(role), any::<bool>()).prop_map(|(role, token)| SessionState {
        user: role.map(|role| UserRecord {
            id: "u".into(),
            name: "n".into(),
            email: "e@arena.ao".into(),
            role,
        }),
        token: token.then(|| "tok".to_string()),
    })
}

fn any_path() -> impl Strategy<Value = String> {
    let known = proptest::sample::select(ROUTES.iter().map(|r| r.path).collect::<Vec<_>>())
        .prop_map(|p| p.replace(":eventoId", "e1"));
    prop_oneof![known, "/[a-z]{1,8}(/[a-z0-9]{1,4})?(\\?[a-z]=[0-9])?"]
}

proptest! {
    #[test]
    fn test_decide_is_deterministic(path in any_path(), session in any_session()) {
        let guard = RouteGuard::new();
        prop_assert_eq!(guard.decide(&path, &session), guard.decide(&path, &session.clone()));
    }

    #[test]
    fn test_redirect_targets_are_admitted(path in any_path(), session in any_session()) {
        let guard = RouteGuard::new();
        if let Navigation::Redirect(target) = guard.decide(&path, &session) {
            // One hop is always enough.
            prop_assert_eq!(guard.decide(&target, &session), Navigation::Allow);
        }
    }
}
