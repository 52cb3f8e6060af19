//! CLI flag overrides on top of `folio-config`.
//!
//! The file and environment layers live in `folio-config`; this module
//! only applies `GlobalOpts` and builds the `Portfolio` handle.

use secrecy::ExposeSecret;
use tracing::debug;

use folio_config::Config;
use folio_core::{LoginForm, Portfolio, User};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load config from file + env, then apply flag overrides (flag > env > file).
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = folio_config::load_config()?;
    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.no_fallback {
        cfg.fallback = false;
    }
    Ok(cfg)
}

/// Build the `Portfolio` handle for API-bound commands.
pub fn connect(cfg: &Config) -> Result<Portfolio, CliError> {
    let portfolio_config = folio_config::to_portfolio_config(cfg)?;
    debug!(api_url = %portfolio_config.api_url, "connecting");
    Ok(Portfolio::new(portfolio_config)?)
}

/// Sign in with the configured credentials. Admin commands call this first,
/// since the session cookie only lives as long as the process.
pub async fn sign_in(portfolio: &Portfolio, cfg: &Config) -> Result<User, CliError> {
    let username = folio_config::resolve_username(cfg)?;
    let password = folio_config::resolve_password(cfg, &username)?;
    let form = LoginForm::new(username, password.expose_secret());
    Ok(portfolio.login(form, None).await?)
}
