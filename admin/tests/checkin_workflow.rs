//! Door check-in through the workflow facade.

use arenaticket_admin::checkin::{CheckInPhase, CheckInWorkflow};
use arenaticket_admin::mocks::{sample_ticket, MockCheckInApi};
use arenaticket_admin::providers::HttpCheckInApi;
use arenaticket_admin::AdminError;
use arenaticket_client::types::TicketStatus;
use arenaticket_client::{ApiClient, StaticToken};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_door(server: &MockServer) -> CheckInWorkflow<HttpCheckInApi> {
    let client = ApiClient::new(format!("{}/api/v1", server.uri()))
        .with_token_source(Arc::new(StaticToken("porteiro-tok".into())));
    CheckInWorkflow::new(HttpCheckInApi::new(client))
}

#[tokio::test]
async fn test_used_ticket_resolves_valid_and_enters_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/porteiro/checkin"))
        .and(body_json(json!({"codigoTicket": "ABC123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bilhete": {
                "id": "b1",
                "codigoTicket": "ABC123",
                "status": "USED",
                "dataUso": "2025-06-01T19:02:00"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let door = http_door(&server);
    let phase = door.submit("ABC123", None).await;

    assert!(matches!(&phase, CheckInPhase::Valid(t) if t.status == TicketStatus::Used));
    assert_eq!(door.history().len(), 1);
    assert!(!door.is_loading());
}

#[tokio::test]
async fn test_unknown_code_is_not_found_with_friendly_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/porteiro/checkin"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "timestamp": "2025-06-01T19:00:00",
            "status": 404,
            "error": "Not Found",
            "message": "Bilhete não encontrado",
            "path": "/api/v1/porteiro/checkin"
        })))
        .mount(&server)
        .await;

    let door = http_door(&server);
    let phase = door.submit("BAD", None).await;

    assert_eq!(
        phase,
        CheckInPhase::Failed(AdminError::NotFound(
            "Bilhete não encontrado ou código inválido".into()
        ))
    );
    assert!(door.history().is_empty());
}

#[tokio::test]
async fn test_business_rejection_keeps_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/porteiro/checkin"))
        .and(body_json(json!({"codigoTicket": "OLD1", "eventoId": "ev-7"})))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "status": 409, "message": "Bilhete já foi utilizado"
        })))
        .mount(&server)
        .await;

    let phase = http_door(&server).submit("OLD1", Some("ev-7")).await;
    assert_eq!(
        phase,
        CheckInPhase::Failed(AdminError::ValidationRejected(
            "Este bilhete já foi utilizado".into()
        ))
    );
}

#[tokio::test]
async fn test_answer_without_ticket_is_rejected() {
    let api = MockCheckInApi::new().with_rejection("X9", "Bilhete cancelado");
    let door = CheckInWorkflow::new(api);

    let phase = door.submit("X9", None).await;
    assert_eq!(
        phase,
        CheckInPhase::Failed(AdminError::ValidationRejected("Bilhete cancelado".into()))
    );
}

#[tokio::test]
async fn test_transport_failure_lands_in_failed_phase() {
    let api = MockCheckInApi::new().with_failure("NET", AdminError::Transport("connection reset".into()));
    let door = CheckInWorkflow::new(api);

    let phase = door.submit("NET", None).await;
    assert!(matches!(phase.error(), Some(e) if e.is_retryable()));
}

#[tokio::test]
async fn test_history_keeps_ten_most_recent() {
    let mut api = MockCheckInApi::new();
    for i in 0..11 {
        api = api.with_ticket(sample_ticket(&format!("b{i}"), &format!("C{i}"), TicketStatus::Valid));
    }
    let door = CheckInWorkflow::new(api);

    for i in 0..11 {
        door.submit(&format!("C{i}"), None).await;
    }

    let codes: Vec<String> = door.history().into_iter().map(|t| t.code).collect();
    let expected: Vec<String> = (1..11).rev().map(|i| format!("C{i}")).collect();
    assert_eq!(codes, expected);
}

#[tokio::test]
async fn test_clear_resets_slot_but_not_history() {
    let api = MockCheckInApi::new().with_ticket(sample_ticket("b1", "ABC", TicketStatus::Valid));
    let door = CheckInWorkflow::new(api);
    door.submit("ABC", None).await;

    door.clear();
    assert_eq!(door.phase(), CheckInPhase::Idle);
    assert_eq!(door.history().len(), 1);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_confirm_replaces_history_entry() {
    let api = MockCheckInApi::new().with_ticket(sample_ticket("b1", "ABC", TicketStatus::Valid));
    let door = CheckInWorkflow::new(api.clone());
    door.submit("ABC", None).await;

    let confirmed = door.confirm("b1").await.unwrap();
    assert_eq!(confirmed.ticket.map(|t| t.status), Some(TicketStatus::Used));

    // The Confirmed action has no effects, so the reduction is already done.
    assert_eq!(door.history()[0].status, TicketStatus::Used);
    assert_eq!(door.phase().ticket().map(|t| t.status), Some(TicketStatus::Used));
    assert_eq!(api.calls(), vec!["validate:ABC", "confirm:b1"]);
}

#[tokio::test]
async fn test_confirm_reraises_errors() {
    let door = CheckInWorkflow::new(MockCheckInApi::new());
    let outcome = door.confirm("missing").await;
    assert!(matches!(outcome, Err(AdminError::NotFound(_))));
    assert!(door.history().is_empty());
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_confirm_accepts_message_only_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/porteiro/checkin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bilhete": {"id": "b1", "codigoTicket": "ABC123", "status": "VALID"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/checkin/b1/confirmar"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"mensagem": "Check-in confirmado"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let door = http_door(&server);
    door.submit("ABC123", None).await;

    let answer = door.confirm("b1").await.unwrap();
    assert_eq!(answer.ticket, None);
    assert_eq!(answer.message.as_deref(), Some("Check-in confirmado"));

    // Nothing came back to replace the entry with.
    assert_eq!(door.history().len(), 1);
    assert_eq!(door.history()[0].status, TicketStatus::Valid);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_confirm_accepts_empty_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/checkin/b1/confirmar"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let door = http_door(&server);
    let answer = door.confirm("b1").await.unwrap();
    assert_eq!(answer.ticket, None);
    assert!(door.history().is_empty());
}

#[tokio::test]
async fn test_confirm_conflict_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/checkin/b1/confirmar"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"mensagem": "Bilhete já utilizado"})),
        )
        .mount(&server)
        .await;

    let door = http_door(&server);
    let outcome = door.confirm("b1").await;
    assert!(matches!(outcome, Err(AdminError::ValidationRejected(_))));
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_consult_reads_public_ticket_without_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/public/bilhete/ABC%20123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "b5",
            "codigoTicket": "ABC 123",
            "status": "VALID",
            "nomeTitular": "Rita"
        })))
        .mount(&server)
        .await;

    let door = http_door(&server);
    let ticket = door.consult(" ABC 123 ").await.unwrap();

    assert_eq!(ticket.holder_name.as_deref(), Some("Rita"));
    assert!(door.history().is_empty());
    assert_eq!(door.phase(), CheckInPhase::Idle);
}
