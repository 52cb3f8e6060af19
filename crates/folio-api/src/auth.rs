// Session authentication
//
// Cookie-based: a successful login sets the session cookie in the client's
// jar and every later request carries it automatically.

use reqwest::Method;
use secrecy::ExposeSecret;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, User};

impl ApiClient {
    /// `POST /api/auth/login`
    pub async fn login(
        &self,
        request: &LoginRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<User, Error> {
        let url = self.endpoint(&["api", "auth", "login"], "")?;
        debug!(username = %request.username, "logging in");

        let body = json!({
            "username": request.username,
            "password": request.password.expose_secret(),
        });

        self.send_json(Method::POST, url, &body, cancel).await
    }

    /// `POST /api/auth/logout`
    pub async fn logout(&self, cancel: Option<&CancellationToken>) -> Result<(), Error> {
        let url = self.endpoint(&["api", "auth", "logout"], "")?;
        debug!("logging out");
        self.send_empty(Method::POST, url, cancel).await
    }

    /// Resolve the user behind the current session cookie.
    ///
    /// `GET /api/auth/me`. Fails with a 401 `Error::Http` when there is no session.
    pub async fn me(&self, cancel: Option<&CancellationToken>) -> Result<User, Error> {
        let url = self.endpoint(&["api", "auth", "me"], "")?;
        self.get_data(url, cancel).await
    }
}
