//! Command dispatch: bridges CLI args -> `Portfolio` calls -> output formatting.

pub mod auth;
pub mod certificates;
pub mod config_cmd;
pub mod projects;
pub mod upload;
pub mod util;

use folio_config::Config;
use folio_core::Portfolio;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    portfolio: &Portfolio,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Projects(args) => projects::handle(portfolio, args, cfg, global).await,
        Command::Certificates(args) => certificates::handle(portfolio, args, cfg, global).await,
        Command::Auth(args) => auth::handle(portfolio, args, cfg, global).await,
        Command::Upload(args) => upload::handle(portfolio, args, cfg, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions do not need an API connection".into(),
        )),
    }
}
