// ── Keyed query cache ──
//
// One `watch` channel per key holds the entry subscribers observe. Reads go
// through `fetch`, which serves fresh data directly and otherwise joins or
// starts the single in-flight request for the key. Mutations fold their
// results in through `patch`.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use folio_api::{Identified, Page};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::entry::{CacheData, CacheEntry, Cacheable, FetchStatus, QuerySnapshot, QueryStatus};
use super::key::{QueryKey, Resource};
use super::patch::{CachePatch, PatchReport};
use crate::config::CacheConfig;
use crate::error::CoreError;

type FetchResult = Result<CacheData, Arc<CoreError>>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;
type Slot = Arc<watch::Sender<CacheEntry>>;

#[derive(Clone)]
struct InFlight {
    future: SharedFetch,
    id: u64,
}

/// Process-wide cache of query results. Share it behind an `Arc`.
pub struct QueryCache {
    entries: DashMap<QueryKey, Slot>,
    in_flight: Arc<DashMap<QueryKey, InFlight>>,
    next_fetch_id: AtomicU64,
    config: CacheConfig,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: Arc::new(DashMap::new()),
            next_fetch_id: AtomicU64::new(1),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Resolve `key`, hitting the network only when the entry is not fresh.
    ///
    /// Concurrent callers for the same key share one request. The request
    /// runs on its own task, so dropping a caller does not abandon it.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> QuerySnapshot<T>
    where
        T: Cacheable,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let slot = self.slot(&key);

        if slot.borrow().is_fresh(self.config.stale_time) {
            debug!(key = %key, "cache hit");
            slot.send_modify(|entry| entry.touched_at = Instant::now());
            return QuerySnapshot::from_entry(&slot.borrow());
        }

        let future = self.join_or_start(&key, &slot, fetcher);
        // The outcome is already written to the slot by the fetch task.
        let _ = future.await;
        QuerySnapshot::from_entry(&slot.borrow())
    }

    /// `fetch` guarded by a precondition; a disabled query never runs.
    pub async fn fetch_enabled<T, F, Fut>(
        &self,
        enabled: bool,
        key: QueryKey,
        fetcher: F,
    ) -> QuerySnapshot<T>
    where
        T: Cacheable,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        if !enabled {
            debug!(key = %key, "query disabled");
            return QuerySnapshot::disabled();
        }
        self.fetch(key, fetcher).await
    }

    /// Current snapshot without triggering a request.
    pub fn snapshot<T: Cacheable>(&self, key: &QueryKey) -> QuerySnapshot<T> {
        self.entries
            .get(key)
            .map_or_else(QuerySnapshot::disabled, |slot| {
                QuerySnapshot::from_entry(&slot.borrow())
            })
    }

    /// Watch an entry; the slot is created if it does not exist yet.
    pub fn subscribe(&self, key: &QueryKey) -> watch::Receiver<CacheEntry> {
        self.slot(key).subscribe()
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.in_flight.contains_key(key)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Store a value as if it had just been fetched.
    pub fn set_data<T: Cacheable>(&self, key: &QueryKey, value: T) {
        let data = T::into_data(Arc::new(value));
        self.slot(key).send_modify(|entry| entry.store(data));
    }

    /// Store placeholder data next to the error that caused it.
    ///
    /// The entry stays in the `Error` state and stale, so the next read
    /// retries the network.
    pub fn set_placeholder<T: Cacheable>(&self, key: &QueryKey, value: Arc<T>, error: Arc<CoreError>) {
        let data = T::into_data(value);
        self.slot(key).send_modify(|entry| {
            entry.status = QueryStatus::Error;
            entry.fetch_status = FetchStatus::Idle;
            entry.data = Some(data);
            entry.error = Some(error);
            entry.is_stale = true;
            entry.is_placeholder = true;
            entry.touched_at = Instant::now();
        });
    }

    /// Mark one entry stale. Returns `false` when the key is unknown.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.entries.get(key) {
            Some(slot) => {
                slot.send_modify(mark_stale);
                debug!(key = %key, "invalidated");
                true
            }
            None => false,
        }
    }

    /// Mark every entry matching `pred` stale; returns how many were hit.
    pub fn invalidate_where(&self, pred: impl Fn(&QueryKey) -> bool) -> usize {
        let mut count = 0;
        for item in &self.entries {
            if pred(item.key()) {
                item.value().send_modify(mark_stale);
                count += 1;
            }
        }
        count
    }

    pub fn invalidate_resource(&self, resource: Resource) -> usize {
        let count = self.invalidate_where(|key| key.resource == resource);
        debug!(%resource, count, "invalidated resource");
        count
    }

    pub fn remove(&self, key: &QueryKey) -> bool {
        self.in_flight.remove(key);
        self.entries.remove(key).is_some()
    }

    /// Drop every entry. In-flight requests finish but are no longer stored.
    pub fn clear(&self) {
        self.in_flight.clear();
        self.entries.clear();
        debug!("query cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evict entries nobody watches that were untouched for `cache_time`.
    pub fn gc(&self) -> usize {
        let before = self.entries.len();
        let cache_time = self.config.cache_time;
        self.entries.retain(|key, slot| {
            slot.receiver_count() > 0
                || self.in_flight.contains_key(key)
                || slot.borrow().touched_at.elapsed() < cache_time
        });
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            debug!(evicted, "query cache gc");
        }
        evicted
    }

    // ── Mutation patches ─────────────────────────────────────────────

    /// Fold a mutation result into every cached list of `resource`.
    ///
    /// Detail entries are invalidated rather than patched. Filtered lists
    /// are patched and also marked stale. If any list entry does not hold a
    /// `Page<T>`, the whole resource is invalidated.
    pub fn patch<T>(&self, resource: Resource, patch: &CachePatch<T>) -> PatchReport
    where
        T: Identified + Clone,
        Page<T>: Cacheable,
    {
        let mut report = PatchReport::default();

        let slots: Vec<(QueryKey, Slot)> = self
            .entries
            .iter()
            .filter(|item| item.key().resource == resource)
            .map(|item| (item.key().clone(), Arc::clone(item.value())))
            .collect();

        for (key, slot) in slots {
            if key.is_detail() {
                slot.send_modify(mark_stale);
                report.invalidated += 1;
                continue;
            }

            let in_flight = self.in_flight.contains_key(&key);
            let mut outcome = SlotOutcome::Mismatched;
            slot.send_if_modified(|entry| {
                if entry.is_placeholder {
                    mark_stale(entry);
                    outcome = SlotOutcome::Invalidated;
                    return true;
                }
                let Some(page) = entry.data.as_ref().and_then(Page::<T>::from_data) else {
                    return false;
                };
                entry.data = Some(Page::<T>::into_data(Arc::new(patch.apply(&page))));
                entry.updated_at = Some(Utc::now());
                entry.touched_at = Instant::now();
                // A pending response predates the mutation.
                if key.is_filtered() || in_flight {
                    mark_stale(entry);
                }
                outcome = SlotOutcome::Patched;
                true
            });

            match outcome {
                SlotOutcome::Patched => report.patched += 1,
                SlotOutcome::Invalidated => report.invalidated += 1,
                SlotOutcome::Mismatched => report.mismatched += 1,
            }
        }

        if report.mismatched > 0 {
            warn!(
                %resource,
                mismatched = report.mismatched,
                "unrecognized cache shape; invalidating resource"
            );
            report.invalidated += self.invalidate_resource(resource);
        }

        debug!(
            %resource,
            target = patch.target_id(),
            patched = report.patched,
            invalidated = report.invalidated,
            "applied cache patch"
        );
        report
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn slot(&self, key: &QueryKey) -> Slot {
        let slot = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(watch::channel(CacheEntry::default()).0));
        Arc::clone(slot.value())
    }

    /// Attach to the pending request for `key`, or start one.
    fn join_or_start<T, F, Fut>(&self, key: &QueryKey, slot: &Slot, fetcher: F) -> SharedFetch
    where
        T: Cacheable,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        match self.in_flight.entry(key.clone()) {
            Entry::Occupied(pending) => {
                debug!(key = %key, "joining in-flight request");
                pending.get().future.clone()
            }
            Entry::Vacant(vacant) => {
                let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                let mut generation = 0;
                slot.send_modify(|entry| {
                    entry.status = QueryStatus::Loading;
                    entry.fetch_status = FetchStatus::Fetching;
                    entry.touched_at = Instant::now();
                    generation = entry.generation;
                });
                debug!(key = %key, "fetching");

                let task = FetchTask {
                    key: key.clone(),
                    id,
                    generation,
                    slot: Arc::clone(slot),
                    in_flight: Arc::clone(&self.in_flight),
                    config: self.config.clone(),
                };
                let handle = tokio::spawn(task.run(fetcher));
                let future = async move {
                    handle.await.unwrap_or_else(|e| {
                        Err(Arc::new(CoreError::Internal(format!("fetch task failed: {e}"))))
                    })
                }
                .boxed()
                .shared();

                vacant.insert(InFlight {
                    future: future.clone(),
                    id,
                });
                future
            }
        }
    }
}

enum SlotOutcome {
    Patched,
    Invalidated,
    Mismatched,
}

fn mark_stale(entry: &mut CacheEntry) {
    entry.is_stale = true;
    entry.generation += 1;
}

/// State carried by the spawned request for one key.
struct FetchTask {
    key: QueryKey,
    id: u64,
    generation: u64,
    slot: Slot,
    in_flight: Arc<DashMap<QueryKey, InFlight>>,
    config: CacheConfig,
}

impl FetchTask {
    async fn run<T, F, Fut>(self, mut fetcher: F) -> FetchResult
    where
        T: Cacheable,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let mut attempt = 0;
        let result = loop {
            match fetcher().await {
                Ok(value) => break Ok(T::into_data(Arc::new(value))),
                Err(e) if e.is_transient() && attempt < self.config.retry => {
                    attempt += 1;
                    debug!(key = %self.key, attempt, error = %e, "retrying query");
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => break Err(Arc::new(e)),
            }
        };

        match &result {
            Ok(data) => self.slot.send_modify(|entry| {
                let raced = entry.generation != self.generation;
                entry.store(data.clone());
                // Invalidated while the request was on the wire.
                if raced {
                    entry.is_stale = true;
                }
            }),
            Err(e) => {
                debug!(key = %self.key, error = %e, "query failed");
                self.slot.send_modify(|entry| entry.fail(Arc::clone(e)));
            }
        }

        self.in_flight.remove_if(&self.key, |_, pending| pending.id == self.id);
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;
    use folio_api::{ListParams, Pagination, Project, User};

    fn user(name: &str) -> User {
        User {
            id: format!("id-{name}"),
            username: name.into(),
        }
    }

    fn counting_fetcher(
        calls: &Arc<AtomicUsize>,
        delay: Duration,
    ) -> impl FnMut() -> BoxFuture<'static, Result<User, CoreError>> + Send + 'static {
        let calls = Arc::clone(calls);
        move || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                Ok(user("admin"))
            }
            .boxed()
        }
    }

    fn project_page(ids: &[&str]) -> Page<Project> {
        let items = ids
            .iter()
            .map(|id| Project {
                id: (*id).into(),
                title: format!("Project {id}"),
                slug: format!("project-{id}"),
                summary: String::new(),
                description: String::new(),
                category: folio_api::ProjectCategory::Web,
                difficulty: folio_api::Difficulty::Easy,
                thumbnail: None,
                images: vec![],
                github_url: None,
                live_url: None,
                tech_stack: vec![],
                featured: false,
                created_at: None,
                updated_at: None,
            })
            .collect::<Vec<_>>();
        let total = items.len() as u64;
        Page::new(
            items,
            Some(Pagination {
                page: 1,
                limit: 10,
                total,
                pages: 1,
            }),
        )
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_request() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.fetch(QueryKey::me(), counting_fetcher(&calls, Duration::from_millis(50))),
            cache.fetch(QueryKey::me(), counting_fetcher(&calls, Duration::from_millis(50))),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.data.unwrap().username, "admin");
        assert_eq!(b.data.unwrap().username, "admin");
    }

    #[tokio::test]
    async fn fresh_entry_is_served_from_cache() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch::<User, _, _>(QueryKey::me(), counting_fetcher(&calls, Duration::ZERO)).await;
        let snap = cache
            .fetch::<User, _, _>(QueryKey::me(), counting_fetcher(&calls, Duration::ZERO))
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(snap.is_success());
        assert!(!snap.is_stale);
    }

    #[tokio::test]
    async fn invalidation_triggers_refetch() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch::<User, _, _>(QueryKey::me(), counting_fetcher(&calls, Duration::ZERO)).await;
        assert!(cache.invalidate(&QueryKey::me()));
        assert!(cache.snapshot::<User>(&QueryKey::me()).is_stale);

        cache.fetch::<User, _, _>(QueryKey::me(), counting_fetcher(&calls, Duration::ZERO)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn disabled_query_never_calls_fetcher() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let snap = cache
            .fetch_enabled::<User, _, _>(false, QueryKey::me(), counting_fetcher(&calls, Duration::ZERO))
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(snap.status, QueryStatus::Idle);
        assert_eq!(snap.fetch_status, FetchStatus::Idle);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let cache = QueryCache::new(CacheConfig {
            retry: 2,
            retry_delay: Duration::from_millis(1),
            ..CacheConfig::default()
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let snap = cache
            .fetch::<User, _, _>(QueryKey::me(), move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(CoreError::Timeout)
                    } else {
                        Ok(user("late"))
                    }
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(snap.data.unwrap().username, "late");
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried_and_keeps_data() {
        let cache = QueryCache::new(CacheConfig {
            retry: 3,
            ..CacheConfig::default()
        });
        cache.set_data(&QueryKey::me(), user("old"));
        cache.invalidate(&QueryKey::me());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let snap = cache
            .fetch::<User, _, _>(QueryKey::me(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(CoreError::Api {
                        message: "Forbidden".into(),
                        status: 403,
                        payload: None,
                    })
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(snap.is_error());
        assert_eq!(snap.error.unwrap().status(), 403);
        assert_eq!(snap.data.unwrap().username, "old");
    }

    #[tokio::test]
    async fn patch_updates_lists_and_invalidates_details() {
        let cache = QueryCache::default();
        let list = QueryKey::list(Resource::Projects, &ListParams::default());
        let detail = QueryKey::by_id(Resource::Projects, "a");
        cache.set_data(&list, project_page(&["a", "b"]));
        cache.set_data(&detail, project_page(&["a"]).items[0].clone());

        let created = project_page(&["c"]).items[0].clone();
        let report = cache.patch(Resource::Projects, &CachePatch::InsertAtHead(created));

        assert_eq!(report.patched, 1);
        assert_eq!(report.invalidated, 1);
        assert_eq!(report.mismatched, 0);

        let snap = cache.snapshot::<Page<Project>>(&list);
        let page = snap.data.unwrap();
        assert_eq!(page.items[0].id, "c");
        assert_eq!(page.total(), 3);
        assert!(!snap.is_stale);
        assert!(cache.snapshot::<Project>(&detail).is_stale);
    }

    #[tokio::test]
    async fn unrecognized_shape_invalidates_resource() {
        let cache = QueryCache::default();
        let list = QueryKey::list(Resource::Projects, &ListParams::default());
        let featured = QueryKey::featured(Resource::Projects);
        cache.set_data(&list, project_page(&["a"]));
        // Wrong payload type under a list key.
        cache.set_data(&featured, user("x"));

        let report = cache.patch::<Project>(Resource::Projects, &CachePatch::RemoveById("a".into()));

        assert_eq!(report.mismatched, 1);
        assert!(cache.snapshot::<Page<Project>>(&list).is_stale);
        assert!(cache.snapshot::<Page<Project>>(&list).data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_resources_are_untouched_by_patch() {
        let cache = QueryCache::default();
        cache.set_data(&QueryKey::me(), user("admin"));
        cache.patch::<Project>(Resource::Projects, &CachePatch::RemoveById("a".into()));
        assert!(!cache.snapshot::<User>(&QueryKey::me()).is_stale);
    }

    #[tokio::test(start_paused = true)]
    async fn gc_evicts_only_idle_unwatched_entries() {
        let cache = QueryCache::new(CacheConfig {
            cache_time: Duration::from_secs(10),
            ..CacheConfig::default()
        });
        let watched = QueryKey::by_id(Resource::Projects, "w");
        cache.set_data(&QueryKey::me(), user("admin"));
        cache.set_data(&watched, project_page(&["w"]).items[0].clone());
        let _rx = cache.subscribe(&watched);

        assert_eq!(cache.gc(), 0);
        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(cache.gc(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.snapshot::<Project>(&watched).is_success());
    }
}
