//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use folio_config::ConfigError;
use folio_core::{CoreError, FieldErrors};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const VALIDATION: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the portfolio API at {url}")]
    #[diagnostic(
        code(folio::connection_failed),
        help(
            "Check that the API is running and reachable.\n\
             Set the origin with --api-url or `api_url` in the config file."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(folio::timeout),
        help("Increase the timeout with --timeout or check API responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(folio::auth_failed),
        help(
            "Verify the admin username and password.\n\
             Run: folio config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("Admin login required")]
    #[diagnostic(
        code(folio::login_required),
        help("Sign in first (the web admin redirects to {redirect}).\nRun: folio auth login")
    )]
    LoginRequired { redirect: String },

    #[error("No admin credentials configured")]
    #[diagnostic(
        code(folio::no_credentials),
        help(
            "Configure credentials with: folio config init\n\
             Or set FOLIO_USERNAME and FOLIO_PASSWORD."
        )
    )]
    NoCredentials,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(folio::not_found),
        help("Run: folio {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({status}): {message}")]
    #[diagnostic(code(folio::api_error))]
    ApiError { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(folio::validation))]
    Validation { field: String, reason: String },

    #[error("The submitted form has errors")]
    #[diagnostic(code(folio::invalid_form), help("{details}"))]
    InvalidForm { details: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(folio::config),
        help(
            "Create or fix the config with: folio config init\n\
             Expected at: {path}"
        )
    )]
    Config { message: String, path: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(folio::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(folio::cancelled))]
    Cancelled,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(folio::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(folio::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::LoginRequired { .. } | Self::NoCredentials => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ApiError { status: 404, .. } => exit_code::NOT_FOUND,
            Self::ApiError { status: 409, .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidForm { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Json(_) => exit_code::VALIDATION,
            Self::Cancelled => exit_code::CANCELLED,
            _ => exit_code::GENERAL,
        }
    }

    /// Rewrite a 404 from a lookup into a resource-specific `NotFound`.
    pub fn not_found_as(self, resource_type: &str, identifier: &str, list_command: &str) -> Self {
        match self {
            Self::ApiError { status: 404, .. } => Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                list_command: list_command.into(),
            },
            other => other,
        }
    }
}

fn describe_fields(errors: &FieldErrors) -> String {
    errors
        .iter()
        .flat_map(|(field, messages)| messages.iter().map(move |m| format!("  {field}: {m}")))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Api {
                message,
                status: 401 | 403,
                ..
            } => CliError::AuthFailed { message },

            CoreError::Api {
                message, status, ..
            } => CliError::ApiError { status, message },

            CoreError::LoginRequired { redirect } => CliError::LoginRequired { redirect },

            CoreError::Validation { errors } => CliError::InvalidForm {
                details: describe_fields(&errors),
            },

            CoreError::Cancelled => CliError::Cancelled,

            CoreError::Config { message } => CliError::Config {
                message,
                path: folio_config::config_path().display().to_string(),
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials => CliError::NoCredentials,
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
                path: folio_config::config_path().display().to_string(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_drive_exit_codes() {
        let not_found: CliError = CoreError::Api {
            message: "Project not found".into(),
            status: 404,
            payload: None,
        }
        .into();
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let unauthorized: CliError = CoreError::Api {
            message: "Not authorized".into(),
            status: 401,
            payload: None,
        }
        .into();
        assert_eq!(unauthorized.exit_code(), exit_code::AUTH);

        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
        assert_eq!(CliError::from(CoreError::Cancelled).exit_code(), exit_code::CANCELLED);
    }

    #[test]
    fn validation_lists_each_field() {
        let err = CliError::from(CoreError::validation("slug", "Slug is invalid"));
        assert_eq!(err.exit_code(), exit_code::VALIDATION);
        let CliError::InvalidForm { details } = err else {
            panic!("expected InvalidForm");
        };
        assert_eq!(details, "  slug: Slug is invalid");
    }

    #[test]
    fn not_found_as_only_rewrites_404() {
        let err = CliError::ApiError {
            status: 404,
            message: "gone".into(),
        }
        .not_found_as("project", "abc", "projects list");
        assert!(matches!(err, CliError::NotFound { ref identifier, .. } if identifier == "abc"));

        let err = CliError::ApiError {
            status: 500,
            message: "boom".into(),
        }
        .not_found_as("project", "abc", "projects list");
        assert!(matches!(err, CliError::ApiError { status: 500, .. }));
    }
}
