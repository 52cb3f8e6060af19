// ── Runtime client configuration ──
//
// These types describe *how* the portfolio client talks to the API and how
// long cached reads stay fresh. They never touch disk; the CLI builds a
// `PortfolioConfig` (usually through folio-config) and hands it in.

use std::time::Duration;

use crate::theme::Theme;

/// Default API origin used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Route the admin surface redirects to when no session is present.
pub const DEFAULT_LOGIN_ROUTE: &str = "/admin/login";

/// Query cache lifecycle tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a successful read is served without refetching.
    pub stale_time: Duration,
    /// How long an unobserved entry survives before `gc` evicts it.
    pub cache_time: Duration,
    /// Extra attempts for transient read failures. Mutations never retry.
    pub retry: u32,
    /// Pause between retry attempts.
    pub retry_delay: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(60),
            cache_time: Duration::from_secs(300),
            retry: 1,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Configuration for a `Portfolio` handle.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// API origin, e.g. `https://api.example.com`.
    pub api_url: String,
    /// Per-request timeout enforced by the transport.
    pub timeout: Duration,
    pub cache: CacheConfig,
    /// Serve the built-in placeholder dataset when a read fails.
    pub fallback: bool,
    /// Initial theme preference.
    pub theme: Theme,
    /// Where `require_admin` sends callers without a session.
    pub login_route: String,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout: Duration::from_secs(30),
            cache: CacheConfig::default(),
            fallback: true,
            theme: Theme::default(),
            login_route: DEFAULT_LOGIN_ROUTE.into(),
        }
    }
}
