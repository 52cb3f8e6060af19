// ── Portfolio facade ──
//
// Ties the API client, query cache, session and notifications together.
// Reads go through the cache; mutations go straight to the API and fold
// their results back into the cache on success.

mod auth;
mod mutations;
mod queries;
mod submit;

use std::sync::Arc;

use folio_api::{ApiClient, TransportConfig};

use crate::cache::QueryCache;
use crate::config::PortfolioConfig;
use crate::error::CoreError;
use crate::notify::Notifier;
use crate::session::SessionState;
use crate::theme::ThemeState;

pub use submit::{ImageFile, ImageSelection};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<PortfolioInner>`; every clone shares the same
/// cache, session and cookie jar.
#[derive(Clone)]
pub struct Portfolio {
    inner: Arc<PortfolioInner>,
}

struct PortfolioInner {
    config: PortfolioConfig,
    api: ApiClient,
    cache: Arc<QueryCache>,
    session: SessionState,
    theme: ThemeState,
    notifier: Notifier,
}

impl Portfolio {
    /// Build a client for `config.api_url` with a fresh cookie jar.
    pub fn new(config: PortfolioConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let api = ApiClient::new(&config.api_url, &transport)?;
        Ok(Self::with_client(config, api))
    }

    /// Use an existing API client (tests, or a client sharing a cookie jar).
    pub fn with_client(config: PortfolioConfig, api: ApiClient) -> Self {
        let cache = Arc::new(QueryCache::new(config.cache.clone()));
        let theme = ThemeState::new(config.theme);
        Self {
            inner: Arc::new(PortfolioInner {
                config,
                api,
                cache,
                session: SessionState::new(),
                theme,
                notifier: Notifier::new(),
            }),
        }
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.inner.cache
    }

    pub fn session(&self) -> &SessionState {
        &self.inner.session
    }

    pub fn theme(&self) -> &ThemeState {
        &self.inner.theme
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }
}
