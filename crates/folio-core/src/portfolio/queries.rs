// Cached reads. Each query resolves through `QueryCache::fetch`, so
// concurrent callers share one request and fresh entries skip the network.

use std::sync::Arc;

use folio_api::{Certificate, ListParams, Page, Project};
use tracing::warn;

use super::Portfolio;
use crate::cache::{Cacheable, QueryKey, QuerySnapshot, Resource};
use crate::error::CoreError;
use crate::fallback;

impl Portfolio {
    // ── Projects ─────────────────────────────────────────────────────

    pub async fn projects(&self, params: &ListParams) -> QuerySnapshot<Page<Project>> {
        let key = QueryKey::list(Resource::Projects, params);
        let api = self.inner.api.clone();
        let owned = params.clone();
        let snapshot = self
            .inner
            .cache
            .fetch(key.clone(), move || {
                let api = api.clone();
                let params = owned.clone();
                async move { api.list_projects(&params, None).await.map_err(CoreError::from) }
            })
            .await;
        self.with_fallback(&key, snapshot, || Some(fallback::projects(params)))
    }

    pub async fn featured_projects(&self) -> QuerySnapshot<Page<Project>> {
        let key = QueryKey::featured(Resource::Projects);
        let api = self.inner.api.clone();
        let snapshot = self
            .inner
            .cache
            .fetch(key.clone(), move || {
                let api = api.clone();
                async move { api.featured_projects(None).await.map_err(CoreError::from) }
            })
            .await;
        self.with_fallback(&key, snapshot, || Some(fallback::featured_projects()))
    }

    /// A blank id disables the query: no request, `Idle` snapshot.
    pub async fn project(&self, id: &str) -> QuerySnapshot<Project> {
        let id = id.trim().to_owned();
        let key = QueryKey::by_id(Resource::Projects, id.clone());
        let api = self.inner.api.clone();
        let fetch_id = id.clone();
        let snapshot = self
            .inner
            .cache
            .fetch_enabled(!id.is_empty(), key.clone(), move || {
                let api = api.clone();
                let id = fetch_id.clone();
                async move { api.get_project(&id, None).await.map_err(CoreError::from) }
            })
            .await;
        self.with_fallback(&key, snapshot, || fallback::project_by_id(&id))
    }

    pub async fn project_by_slug(&self, slug: &str) -> QuerySnapshot<Project> {
        let slug = slug.trim().to_owned();
        let key = QueryKey::by_slug(Resource::Projects, slug.clone());
        let api = self.inner.api.clone();
        let fetch_slug = slug.clone();
        let snapshot = self
            .inner
            .cache
            .fetch_enabled(!slug.is_empty(), key.clone(), move || {
                let api = api.clone();
                let slug = fetch_slug.clone();
                async move { api.get_project_by_slug(&slug, None).await.map_err(CoreError::from) }
            })
            .await;
        self.with_fallback(&key, snapshot, || fallback::project_by_slug(&slug))
    }

    // ── Certificates ─────────────────────────────────────────────────

    pub async fn certificates(&self, params: &ListParams) -> QuerySnapshot<Page<Certificate>> {
        let key = QueryKey::list(Resource::Certificates, params);
        let api = self.inner.api.clone();
        let owned = params.clone();
        let snapshot = self
            .inner
            .cache
            .fetch(key.clone(), move || {
                let api = api.clone();
                let params = owned.clone();
                async move { api.list_certificates(&params, None).await.map_err(CoreError::from) }
            })
            .await;
        self.with_fallback(&key, snapshot, || Some(fallback::certificates(params)))
    }

    pub async fn certificate(&self, id: &str) -> QuerySnapshot<Certificate> {
        let id = id.trim().to_owned();
        let key = QueryKey::by_id(Resource::Certificates, id.clone());
        let api = self.inner.api.clone();
        let fetch_id = id.clone();
        let snapshot = self
            .inner
            .cache
            .fetch_enabled(!id.is_empty(), key.clone(), move || {
                let api = api.clone();
                let id = fetch_id.clone();
                async move { api.get_certificate(&id, None).await.map_err(CoreError::from) }
            })
            .await;
        self.with_fallback(&key, snapshot, || fallback::certificate_by_id(&id))
    }

    // ── Fallback ─────────────────────────────────────────────────────

    /// Swap a failed, data-less snapshot for placeholder content when
    /// enabled. The error stays on the snapshot and `is_placeholder` is set.
    fn with_fallback<T: Cacheable>(
        &self,
        key: &QueryKey,
        snapshot: QuerySnapshot<T>,
        placeholder: impl FnOnce() -> Option<Arc<T>>,
    ) -> QuerySnapshot<T> {
        if !self.inner.config.fallback || !snapshot.is_error() || snapshot.data.is_some() {
            return snapshot;
        }
        let Some(error) = snapshot.error.clone() else {
            return snapshot;
        };
        if matches!(*error, CoreError::Cancelled) {
            return snapshot;
        }
        let Some(data) = placeholder() else {
            return snapshot;
        };

        warn!(key = %key, error = %error, "query failed; serving placeholder data");
        self.inner.cache.set_placeholder(key, data, error);
        self.inner.cache.snapshot(key)
    }
}
