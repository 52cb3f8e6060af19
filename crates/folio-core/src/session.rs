// Signed-in user state, observable through a `watch` channel.

use std::sync::Arc;

use folio_api::User;
use tokio::sync::watch;

/// Who is signed in, if anyone.
///
/// The server session itself lives in the HTTP client's cookie jar; this
/// only mirrors the identity the server last confirmed.
#[derive(Debug)]
pub struct SessionState {
    user: watch::Sender<Option<Arc<User>>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        Self { user }
    }

    pub fn set_user(&self, user: User) {
        self.user.send_replace(Some(Arc::new(user)));
    }

    pub fn clear(&self) {
        self.user.send_replace(None);
    }

    pub fn user(&self) -> Option<Arc<User>> {
        self.user.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<User>>> {
        self.user.subscribe()
    }
}
