// ── Core error types ──
//
// User-facing errors from folio-core. Transport-layer failures from
// folio-api are translated here; the HTTP status survives on `Api` so the
// mutation boundary can report it.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name -> human-readable violations, in a stable order.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the portfolio API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the portfolio API timed out")]
    Timeout,

    // ── API errors ───────────────────────────────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status, `0` when no response was received.
        status: u16,
        /// Raw error body returned by the server.
        payload: Option<serde_json::Value>,
    },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Login required")]
    LoginRequired { redirect: String },

    // ── Client-side errors ───────────────────────────────────────────
    #[error("Validation failed: {}", summarize(.errors))]
    Validation { errors: FieldErrors },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    /// HTTP status of the failure, `0` for anything that never got a response.
    pub fn status(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            _ => 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. } | Self::LoginRequired { .. })
    }

    /// Failures the query layer may retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::ConnectionFailed { .. } | Self::Api { status: 429 | 502 | 503 | 504, .. }
        )
    }

    /// Build a single-field validation error.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_owned(), vec![message.into()]);
        Self::Validation { errors }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<folio_api::Error> for CoreError {
    fn from(err: folio_api::Error) -> Self {
        match err {
            folio_api::Error::Http {
                status,
                message,
                payload,
            } => CoreError::Api {
                message,
                status,
                payload,
            },
            folio_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e.url().map(ToString::to_string).unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: 0,
                        payload: None,
                    }
                }
            }
            folio_api::Error::Cancelled => CoreError::Cancelled,
            folio_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            folio_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            folio_api::Error::Multipart(message) => CoreError::validation("image", message),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_errors_keep_status_and_message() {
        let err: CoreError = folio_api::Error::Http {
            status: 404,
            message: "Not found".into(),
            payload: Some(json!({ "message": "Not found" })),
        }
        .into();
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "Not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn cancellation_maps_to_cancelled() {
        let err: CoreError = folio_api::Error::Cancelled.into();
        assert!(err.is_cancelled());
        assert_eq!(err.status(), 0);
    }

    #[test]
    fn validation_message_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("slug".into(), vec!["too short".into()]);
        errors.insert("title".into(), vec!["required".into(), "too short".into()]);
        let err = CoreError::Validation { errors };
        assert_eq!(
            err.to_string(),
            "Validation failed: slug: too short; title: required, too short"
        );
    }
}
