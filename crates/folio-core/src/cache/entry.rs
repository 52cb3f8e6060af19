// ── Cache entries and snapshots ──
//
// An entry stores a type-erased payload (`CacheData`); consumers read typed
// `QuerySnapshot<T>` views through the `Cacheable` trait.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use folio_api::{Certificate, Page, Project, User};
use tokio::time::Instant;

use crate::error::CoreError;

/// Lifecycle of a query's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Whether a request for the entry is currently on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
}

/// Every payload shape the cache can hold.
#[derive(Debug, Clone)]
pub enum CacheData {
    ProjectPage(Arc<Page<Project>>),
    Project(Arc<Project>),
    CertificatePage(Arc<Page<Certificate>>),
    Certificate(Arc<Certificate>),
    User(Arc<User>),
}

/// Conversion between a concrete payload and `CacheData`.
pub trait Cacheable: Send + Sync + Sized + 'static {
    fn into_data(value: Arc<Self>) -> CacheData;
    fn from_data(data: &CacheData) -> Option<Arc<Self>>;
}

macro_rules! cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn into_data(value: Arc<Self>) -> CacheData {
                CacheData::$variant(value)
            }

            fn from_data(data: &CacheData) -> Option<Arc<Self>> {
                match data {
                    CacheData::$variant(value) => Some(Arc::clone(value)),
                    _ => None,
                }
            }
        }
    };
}

cacheable!(Page<Project>, ProjectPage);
cacheable!(Project, Project);
cacheable!(Page<Certificate>, CertificatePage);
cacheable!(Certificate, Certificate);
cacheable!(User, User);

/// Raw state of one cache slot, published through a `watch` channel.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub status: QueryStatus,
    pub fetch_status: FetchStatus,
    pub data: Option<CacheData>,
    pub error: Option<Arc<CoreError>>,
    pub is_stale: bool,
    pub is_placeholder: bool,
    pub updated_at: Option<DateTime<Utc>>,
    /// Monotonic time of the last successful store, used for freshness.
    pub(crate) fetched_at: Option<Instant>,
    /// Monotonic time of the last read or write, used by `gc`.
    pub(crate) touched_at: Instant,
    /// Bumped on every invalidation so in-flight results know they raced one.
    pub(crate) generation: u64,
}

impl Default for CacheEntry {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            fetch_status: FetchStatus::Idle,
            data: None,
            error: None,
            is_stale: true,
            is_placeholder: false,
            updated_at: None,
            fetched_at: None,
            touched_at: Instant::now(),
            generation: 0,
        }
    }
}

impl CacheEntry {
    /// Servable without a network round trip.
    pub(crate) fn is_fresh(&self, stale_time: Duration) -> bool {
        self.status == QueryStatus::Success
            && !self.is_stale
            && !self.is_placeholder
            && self
                .fetched_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }

    pub(crate) fn store(&mut self, data: CacheData) {
        let now = Instant::now();
        self.status = QueryStatus::Success;
        self.fetch_status = FetchStatus::Idle;
        self.data = Some(data);
        self.error = None;
        self.is_stale = false;
        self.is_placeholder = false;
        self.updated_at = Some(Utc::now());
        self.fetched_at = Some(now);
        self.touched_at = now;
    }

    pub(crate) fn fail(&mut self, error: Arc<CoreError>) {
        self.status = QueryStatus::Error;
        self.fetch_status = FetchStatus::Idle;
        self.error = Some(error);
        self.touched_at = Instant::now();
    }
}

/// Typed, immutable view of a cache entry.
#[derive(Debug)]
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    pub fetch_status: FetchStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<Arc<CoreError>>,
    pub is_stale: bool,
    /// `data` is the built-in placeholder set, not a server response.
    pub is_placeholder: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            fetch_status: self.fetch_status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_stale: self.is_stale,
            is_placeholder: self.is_placeholder,
            updated_at: self.updated_at,
        }
    }
}

impl<T> Default for QuerySnapshot<T> {
    fn default() -> Self {
        Self::disabled()
    }
}

impl<T> QuerySnapshot<T> {
    /// Snapshot of a query that was never issued.
    pub fn disabled() -> Self {
        Self {
            status: QueryStatus::Idle,
            fetch_status: FetchStatus::Idle,
            data: None,
            error: None,
            is_stale: false,
            is_placeholder: false,
            updated_at: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Consume the snapshot as a `Result`, preferring data when present.
    ///
    /// Placeholder data counts as data; check `is_placeholder` first when the
    /// distinction matters.
    pub fn into_result(self) -> Result<Arc<T>, Arc<CoreError>> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Err(Arc::new(CoreError::Internal(
                "query produced neither data nor error".into(),
            ))),
        }
    }
}

impl<T: Cacheable> QuerySnapshot<T> {
    pub(crate) fn from_entry(entry: &CacheEntry) -> Self {
        Self {
            status: entry.status,
            fetch_status: entry.fetch_status,
            data: entry.data.as_ref().and_then(T::from_data),
            error: entry.error.clone(),
            is_stale: entry.is_stale,
            is_placeholder: entry.is_placeholder,
            updated_at: entry.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".into(),
            username: "admin".into(),
        }
    }

    #[test]
    fn payload_round_trips_through_cache_data() {
        let data = User::into_data(Arc::new(user()));
        assert_eq!(User::from_data(&data).unwrap().username, "admin");
        assert!(Project::from_data(&data).is_none());
    }

    #[test]
    fn stored_entry_is_fresh_until_invalidated() {
        let mut entry = CacheEntry::default();
        assert!(!entry.is_fresh(Duration::from_secs(60)));

        entry.store(User::into_data(Arc::new(user())));
        assert!(entry.is_fresh(Duration::from_secs(60)));
        assert!(!entry.is_fresh(Duration::ZERO));

        entry.is_stale = true;
        assert!(!entry.is_fresh(Duration::from_secs(60)));
    }

    #[test]
    fn failure_keeps_previous_data() {
        let mut entry = CacheEntry::default();
        entry.store(User::into_data(Arc::new(user())));
        entry.fail(Arc::new(CoreError::Timeout));

        let snap = QuerySnapshot::<User>::from_entry(&entry);
        assert!(snap.is_error());
        assert_eq!(snap.data.unwrap().id, "u1");
        assert!(matches!(snap.error.as_deref(), Some(CoreError::Timeout)));
    }

    #[test]
    fn disabled_snapshot_is_idle() {
        let snap = QuerySnapshot::<Project>::disabled();
        assert_eq!(snap.status, QueryStatus::Idle);
        assert_eq!(snap.fetch_status, FetchStatus::Idle);
        assert!(snap.into_result().is_err());
    }
}
