//! Auth command handlers.

use secrecy::{ExposeSecret, SecretString};

use folio_config::Config;
use folio_core::{LoginForm, Portfolio, User};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

fn detail(u: &User) -> String {
    format!("ID:        {}\nUsername:  {}", u.id, u.username)
}

/// Configured password, or an interactive prompt when none is stored.
fn password_for(cfg: &Config, username: &str) -> Result<SecretString, CliError> {
    match folio_config::resolve_password(cfg, username) {
        Ok(secret) => Ok(secret),
        Err(folio_config::ConfigError::NoCredentials) => {
            let entered = rpassword::prompt_password(format!("Password for {username}: "))?;
            Ok(SecretString::from(entered))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn handle(
    portfolio: &Portfolio,
    args: AuthArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login { username } => {
            let username = match username {
                Some(name) => name,
                None => folio_config::resolve_username(cfg)?,
            };
            let password = password_for(cfg, &username)?;
            let user = portfolio
                .login(LoginForm::new(username, password.expose_secret()), None)
                .await?;
            let out = output::render_single(&global.output, &user, detail, |u| u.username.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::Logout => {
            config::sign_in(portfolio, cfg).await?;
            portfolio.logout(None).await?;
            output::status("Signed out", global.quiet);
            Ok(())
        }

        AuthCommand::Whoami => {
            // Without stored credentials this reports the login redirect.
            if folio_config::resolve_username(cfg).is_ok() {
                config::sign_in(portfolio, cfg).await?;
            }
            let user = portfolio.require_admin().await?;
            let out = output::render_single(&global.output, &*user, detail, |u| u.username.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
