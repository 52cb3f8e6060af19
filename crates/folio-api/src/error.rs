use thiserror::Error;

/// Top-level error type for the `folio-api` crate.
///
/// Every request either yields the unwrapped `data` payload or one of these.
/// Non-success HTTP statuses and network failures are both reported with a
/// numeric status through [`Error::status`]; transport failures report `0`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Server responses ────────────────────────────────────────────
    /// Non-success HTTP status, or a `{ success: false }` envelope.
    ///
    /// `message` is the server-provided message when the body carried one,
    /// otherwise the canonical reason phrase. `payload` is the raw JSON body.
    #[error("API error (HTTP {status}): {message}")]
    Http {
        status: u16,
        message: String,
        payload: Option<serde_json::Value>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request was aborted through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON serialization or deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A multipart upload could not be assembled.
    #[error("Invalid multipart body: {0}")]
    Multipart(String),
}

impl Error {
    /// HTTP status associated with this error. Network-level failures,
    /// cancellations and decode errors report `0`.
    pub fn status(&self) -> u16 {
        match self {
            Self::Http { status, .. } => *status,
            _ => 0,
        }
    }

    /// Human-readable message, preferring the server's own wording.
    pub fn message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Raw error payload returned by the server, if any.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Http { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` when the session is missing or expired.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Returns `true` if the request was aborted by its caller.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }
}
