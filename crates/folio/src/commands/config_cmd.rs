//! Config subcommand handlers.

use dialoguer::{Input, Select};

use folio_config::Config;
use folio_core::{Theme, ThemeState};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Copy of the config that is safe to print.
fn redacted(cfg: &Config) -> Config {
    Config {
        password: cfg.password.as_ref().map(|_| "********".into()),
        ..cfg.clone()
    }
}

fn summary(cfg: &Config) -> String {
    [
        format!("API URL:     {}", cfg.api_url),
        format!("Timeout:     {}s", cfg.timeout),
        format!("Stale time:  {}s", cfg.stale_time_secs),
        format!("Retry:       {}", cfg.retry),
        format!("Fallback:    {}", cfg.fallback),
        format!("Theme:       {}", cfg.theme),
        format!("Username:    {}", cfg.username.as_deref().unwrap_or("-")),
        format!(
            "Password:    {}",
            if cfg.password.is_some() { "(plaintext)" } else { "(keyring/env)" }
        ),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = folio_config::config_path();
            eprintln!("folio configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let current = folio_config::load_config_or_default();

            // 1. API origin
            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(current.api_url.clone())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Admin username
            let username: String = Input::new()
                .with_prompt("Admin username")
                .default(current.username.clone().unwrap_or_else(|| "admin".into()))
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Password + storage
            let password = rpassword::prompt_password("Admin password: ").map_err(prompt_err)?;
            let password = if password.is_empty() {
                None
            } else {
                let store_choices = &[
                    "Store in system keyring (recommended)",
                    "Save to config file (plaintext)",
                ];
                let store_selection = Select::new()
                    .with_prompt("Where to store the password?")
                    .items(store_choices)
                    .default(0)
                    .interact()
                    .map_err(prompt_err)?;
                if store_selection == 0 {
                    folio_config::store_password(&username, &password)?;
                    eprintln!("   Password stored in system keyring");
                    None
                } else {
                    Some(password)
                }
            };

            let cfg = Config {
                api_url,
                username: Some(username),
                password,
                ..current
            };
            folio_config::to_portfolio_config(&cfg)?;

            let path = folio_config::save_config(&cfg)?;
            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Test it: folio auth whoami");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&folio_config::load_config()?);
            let out = output::render_single(&global.output, &cfg, summary, |c| c.api_url.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(
                &folio_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        // ── Set password ────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = folio_config::load_config()?;
            let username = folio_config::resolve_username(&cfg)?;
            let password =
                rpassword::prompt_password(format!("New password for {username}: "))
                    .map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            folio_config::store_password(&username, &password)?;
            output::status("Password stored in system keyring", global.quiet);
            Ok(())
        }

        // ── Theme ───────────────────────────────────────────────────
        ConfigCommand::Theme { value } => {
            let mut cfg = folio_config::load_config()?;
            let state = ThemeState::new(cfg.theme);
            let theme: Theme = match value {
                Some(theme) => {
                    state.set(theme);
                    state.current()
                }
                None => state.toggle(),
            };
            cfg.theme = theme;
            folio_config::save_config(&cfg)?;
            output::print_output(&theme.to_string(), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_masks_only_the_password() {
        let cfg = Config {
            username: Some("admin".into()),
            password: Some("hunter22".into()),
            ..Config::default()
        };
        let shown = redacted(&cfg);
        assert_eq!(shown.password.as_deref(), Some("********"));
        assert_eq!(shown.username.as_deref(), Some("admin"));
        assert_eq!(shown.api_url, cfg.api_url);
        assert!(!summary(&shown).contains("hunter22"));
    }
}
