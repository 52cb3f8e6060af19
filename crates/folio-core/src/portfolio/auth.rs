// Session handling: login, logout, and the admin guard.

use std::sync::Arc;

use folio_api::User;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::Portfolio;
use crate::cache::{QueryKey, QuerySnapshot};
use crate::error::CoreError;
use crate::forms::{LoginForm, validate_form};

impl Portfolio {
    /// Validate the form, then start a server session.
    pub async fn login(
        &self,
        form: LoginForm,
        cancel: Option<&CancellationToken>,
    ) -> Result<User, CoreError> {
        validate_form(&form).map_err(|errors| CoreError::Validation { errors })?;
        let request = form.into_request();

        match self.inner.api.login(&request, cancel).await {
            Ok(user) => {
                self.inner.session.set_user(user.clone());
                self.inner.cache.set_data(&QueryKey::me(), user.clone());
                info!(username = %user.username, "signed in");
                self.inner.notifier.success(format!("Welcome back, {}", user.username));
                Ok(user)
            }
            Err(e) => Err(self.report_failure("login", CoreError::from(e))),
        }
    }

    /// End the session. Local state is cleared even when the server call fails.
    pub async fn logout(&self, cancel: Option<&CancellationToken>) -> Result<(), CoreError> {
        let result = self.inner.api.logout(cancel).await;
        self.inner.session.clear();
        self.inner.cache.clear();
        match result {
            Ok(()) => {
                info!("signed out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "logout request failed (local session cleared)");
                Err(e.into())
            }
        }
    }

    /// The signed-in user as reported by the server, cached like any query.
    pub async fn current_user(&self) -> QuerySnapshot<User> {
        let api = self.inner.api.clone();
        let snapshot = self
            .inner
            .cache
            .fetch(QueryKey::me(), move || {
                let api = api.clone();
                async move { api.me(None).await.map_err(CoreError::from) }
            })
            .await;

        match (&snapshot.data, &snapshot.error) {
            (Some(user), None) => self.inner.session.set_user(User::clone(user)),
            (_, Some(error)) if error.is_unauthorized() => {
                debug!("no active session");
                self.inner.session.clear();
            }
            _ => {}
        }
        snapshot
    }

    /// Resolve the admin user or ask the caller to redirect to the login route.
    pub async fn require_admin(&self) -> Result<Arc<User>, CoreError> {
        let snapshot = self.current_user().await;
        if let Some(error) = snapshot.error {
            if error.is_unauthorized() {
                return Err(self.login_required());
            }
            return Err(CoreError::clone(&error));
        }
        snapshot.data.ok_or_else(|| self.login_required())
    }

    fn login_required(&self) -> CoreError {
        CoreError::LoginRequired {
            redirect: self.inner.config.login_route.clone(),
        }
    }
}
