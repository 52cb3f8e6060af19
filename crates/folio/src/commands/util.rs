//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use folio_core::{CancellationToken, CoreError, ImageFile, ImageSelection, QuerySnapshot};
use tracing::debug;

use crate::error::CliError;
use crate::output;

/// Unwrap a query snapshot, warning when it carries placeholder data.
pub fn resolve<T>(snapshot: QuerySnapshot<T>, quiet: bool) -> Result<Arc<T>, CliError> {
    let is_placeholder = snapshot.is_placeholder;
    match (snapshot.data, snapshot.error) {
        (Some(data), Some(err)) if is_placeholder => {
            output::placeholder_warning(&err.to_string(), quiet);
            Ok(data)
        }
        (_, Some(err)) => Err(CoreError::clone(&err).into()),
        (Some(data), None) => Ok(data),
        (None, None) => Err(CliError::Internal("query finished without data".into())),
    }
}

/// Like `resolve`, but placeholder data is an error. Used before writes.
pub fn resolve_live<T>(snapshot: QuerySnapshot<T>) -> Result<Arc<T>, CliError> {
    match (snapshot.data, snapshot.error) {
        (_, Some(err)) => Err(CoreError::clone(&err).into()),
        (Some(data), None) => Ok(data),
        (None, None) => Err(CliError::Internal("query finished without data".into())),
    }
}

/// Reject blank identifiers before they reach a disabled query.
pub fn require_id(id: &str) -> Result<&str, CliError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CliError::Validation {
            field: "id".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(id)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Load an image file for upload; the format is sniffed from its bytes.
pub fn read_image(path: &Path) -> Result<ImageFile, CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(ImageFile::new(bytes, file_name)?)
}

/// Selection for an optional `--image` flag.
pub fn image_selection(path: Option<&Path>) -> Result<ImageSelection, CliError> {
    match path {
        Some(path) => Ok(ImageSelection::from(read_image(path)?)),
        None => Ok(ImageSelection::new()),
    }
}

/// A token cancelled by Ctrl-C, so an interrupted submit sends nothing further.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling");
            trigger.cancel();
        }
    });
    token
}

/// Render an optional field for detail views.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
