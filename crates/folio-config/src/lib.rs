//! Configuration for the folio admin CLI.
//!
//! One TOML file under the platform config dir, overridden by `FOLIO_*`
//! environment variables, plus password resolution (env, keyring,
//! plaintext) and translation to `folio_core::PortfolioConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_core::config::{DEFAULT_API_URL, DEFAULT_LOGIN_ROUTE};
use folio_core::{CacheConfig, PortfolioConfig, Theme};

/// Keyring service the admin password is stored under.
pub const KEYRING_SERVICE: &str = "folio";

/// Environment variable consulted before the keyring.
pub const PASSWORD_ENV: &str = "FOLIO_PASSWORD";

const USERNAME_ENV: &str = "FOLIO_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no admin credentials configured (set `username` and FOLIO_PASSWORD or a keyring entry)")]
    NoCredentials,

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// API origin, e.g. "https://api.example.com".
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds a cached read stays fresh.
    #[serde(default = "default_stale_time")]
    pub stale_time_secs: u64,

    /// Extra attempts for transient read failures.
    #[serde(default = "default_retry")]
    pub retry: u32,

    /// Serve placeholder content when reads fail.
    #[serde(default = "default_fallback")]
    pub fallback: bool,

    #[serde(default)]
    pub theme: Theme,

    /// Admin username.
    pub username: Option<String>,

    /// Admin password (plaintext; prefer the keyring or FOLIO_PASSWORD).
    pub password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            stale_time_secs: default_stale_time(),
            retry: default_retry(),
            fallback: default_fallback(),
            theme: Theme::default(),
            username: None,
            password: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_stale_time() -> u64 {
    60
}
fn default_retry() -> u32 {
    1
}
fn default_fallback() -> bool {
    true
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "folio", "folio").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("folio");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` plus environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    // The password is only read from the environment by `resolve_password`
    // so it never ends up in a saved file.
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FOLIO_").ignore(&["password"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Admin username: config first, then FOLIO_USERNAME.
pub fn resolve_username(cfg: &Config) -> Result<String, ConfigError> {
    cfg.username
        .clone()
        .filter(|u| !u.trim().is_empty())
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or(ConfigError::NoCredentials)
}

/// Admin password: FOLIO_PASSWORD, then the system keyring, then plaintext.
pub fn resolve_password(cfg: &Config, username: &str) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, username) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = cfg.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials)
}

/// Store the admin password in the system keyring.
pub fn store_password(username: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username)?;
    entry.set_password(password)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `PortfolioConfig` from the file settings.
pub fn to_portfolio_config(cfg: &Config) -> Result<PortfolioConfig, ConfigError> {
    let api_url = cfg.api_url.trim();
    let parsed: url::Url = api_url.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {api_url}"),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected an http(s) URL, got {api_url}"),
        });
    }
    if cfg.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    Ok(PortfolioConfig {
        api_url: api_url.to_owned(),
        timeout: Duration::from_secs(cfg.timeout),
        cache: CacheConfig {
            stale_time: Duration::from_secs(cfg.stale_time_secs),
            retry: cfg.retry,
            ..CacheConfig::default()
        },
        fallback: cfg.fallback,
        theme: cfg.theme,
        login_route: DEFAULT_LOGIN_ROUTE.into(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.timeout, 30);
        assert!(cfg.fallback);
        assert_eq!(cfg.theme, Theme::System);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://api.example.com\"\nfallback = false\ntheme = \"dark\"\nusername = \"admin\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api_url, "https://api.example.com");
        assert!(!cfg.fallback);
        assert_eq!(cfg.theme, Theme::Dark);
        assert_eq!(cfg.username.as_deref(), Some("admin"));
        assert_eq!(cfg.stale_time_secs, 60);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            api_url: "https://folio.example.org".into(),
            retry: 3,
            ..Config::default()
        };

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn portfolio_config_carries_cache_tuning() {
        let cfg = Config {
            timeout: 5,
            stale_time_secs: 10,
            retry: 0,
            fallback: false,
            ..Config::default()
        };
        let portfolio = to_portfolio_config(&cfg).unwrap();
        assert_eq!(portfolio.timeout, Duration::from_secs(5));
        assert_eq!(portfolio.cache.stale_time, Duration::from_secs(10));
        assert_eq!(portfolio.cache.retry, 0);
        assert!(!portfolio.fallback);
        assert_eq!(portfolio.login_route, "/admin/login");
    }

    #[test]
    fn bad_urls_are_rejected() {
        for api_url in ["not a url", "ftp://files.example.com"] {
            let cfg = Config {
                api_url: api_url.into(),
                ..Config::default()
            };
            let err = to_portfolio_config(&cfg).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
        }
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let cfg = Config {
            password: Some("from-file".into()),
            ..Config::default()
        };
        // Env and keyring may be populated on a developer machine, so only
        // assert that some password resolves.
        assert!(resolve_password(&cfg, "folio-test-user-without-keyring").is_ok());
    }
}
