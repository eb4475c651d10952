//! Normalization of server error payloads into [`ApiError`].
//!
//! The API reports failures as `{ timestamp, status, error, message, path }`.
//! Validation messages often arrive wrapped in technical noise
//! (`Erro de validação: {eventoId=ID do evento é obrigatório}`), so the
//! message is cleaned first and then passed through a fixed table of
//! operator-facing wordings.

use crate::error::ApiError;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Server wording → operator wording.
pub const FRIENDLY_MESSAGES: &[(&str, &str)] = &[
    ("ID do evento é obrigatório", "Evento não encontrado ou inválido"),
    ("Bilhete não encontrado", "Bilhete não encontrado ou código inválido"),
    ("Bilhete já foi utilizado", "Este bilhete já foi utilizado"),
    ("Bilhete expirado", "Este bilhete está expirado"),
    ("Bilhete cancelado", "Este bilhete foi cancelado"),
    (
        "Evento não permite check-in",
        "Check-in não permitido para este evento no momento",
    ),
    ("Acesso negado", "Você não tem permissão para realizar esta ação"),
];

static VALIDATION_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^Erro de validação:\s*").ok());
static FIELD_PREFIX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\{.*=\s*").ok());
static TRAILING_BRACE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\}.*$").ok());

/// Structured error body returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Server timestamp
    #[serde(default)]
    pub timestamp: Option<String>,
    /// HTTP status echoed by the server
    #[serde(default)]
    pub status: Option<u16>,
    /// Reason phrase
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
    /// Request path
    #[serde(default)]
    pub path: Option<String>,
}

/// Strip the technical wrapping the server puts around validation messages.
#[must_use]
pub fn clean_message(raw: &str) -> String {
    let mut message = raw.to_string();
    for pattern in [&VALIDATION_PREFIX, &FIELD_PREFIX, &TRAILING_BRACE] {
        if let Some(re) = &**pattern {
            message = re.replace(&message, "").into_owned();
        }
    }
    message
}

/// Map a cleaned server message to its operator-facing wording.
///
/// Messages outside the table are returned unchanged.
#[must_use]
pub fn friendly_message(cleaned: &str) -> String {
    FRIENDLY_MESSAGES
        .iter()
        .find(|(server, _)| *server == cleaned)
        .map_or_else(|| cleaned.to_string(), |(_, friendly)| (*friendly).to_string())
}

/// Turn a non-2xx answer into an [`ApiError::RequestFailed`].
///
/// # Examples
///
/// ```
/// # use arenaticket_client::messages::normalize_error;
/// # use arenaticket_client::ApiError;
/// let error = normalize_error(404, r#"{"message":"Bilhete não encontrado"}"#);
/// assert_eq!(error, ApiError::RequestFailed {
///     status: 404,
///     message: "Bilhete não encontrado ou código inválido".into(),
/// });
///
/// let error = normalize_error(502, "<html>Bad Gateway</html>");
/// assert_eq!(error.to_string(), "HTTP 502");
/// ```
#[must_use]
pub fn normalize_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .map(|raw| friendly_message(&clean_message(&raw)))
        .filter(|message| !message.trim().is_empty());

    ApiError::RequestFailed {
        status,
        message: message.unwrap_or_else(|| format!("HTTP {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_validation_wrapping() {
        assert_eq!(
            clean_message("Erro de validação: {eventoId=ID do evento é obrigatório}"),
            "ID do evento é obrigatório"
        );
        assert_eq!(clean_message("Lote esgotado"), "Lote esgotado");
    }

    #[test]
    fn wrapped_message_is_remapped_after_cleanup() {
        let error = normalize_error(
            400,
            r#"{"timestamp":"2025-06-01T18:00:00","status":400,"error":"Bad Request","message":"Erro de validação: {eventoId=ID do evento é obrigatório}","path":"/api/v1/porteiro/checkin"}"#,
        );
        assert_eq!(
            error,
            ApiError::RequestFailed {
                status: 400,
                message: "Evento não encontrado ou inválido".into()
            }
        );
    }

    #[test]
    fn every_table_entry_is_remapped() {
        for (server, friendly) in FRIENDLY_MESSAGES {
            let body = format!(r#"{{"message":"{server}"}}"#);
            assert_eq!(normalize_error(409, &body).to_string(), *friendly);
        }
    }

    #[test]
    fn unknown_message_passes_through() {
        let error = normalize_error(409, r#"{"message":"Bilhetes insuficientes"}"#);
        assert_eq!(error.to_string(), "Bilhetes insuficientes");
    }

    #[test]
    fn missing_or_empty_message_falls_back_to_status() {
        assert_eq!(normalize_error(500, "").to_string(), "HTTP 500");
        assert_eq!(normalize_error(403, r#"{"error":"Forbidden"}"#).to_string(), "HTTP 403");
        assert_eq!(normalize_error(400, r#"{"message":""}"#).to_string(), "HTTP 400");
    }
}
