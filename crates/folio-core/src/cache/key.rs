// Structured cache keys: resource namespace plus query scope.

use std::fmt;

use folio_api::ListParams;

/// Top-level namespace a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    Projects,
    Certificates,
    Session,
}

/// What slice of a resource an entry holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyScope {
    /// Collection read; carries the canonical `?k=v` query string.
    List(String),
    Featured,
    ById(String),
    BySlug(String),
    /// The signed-in user.
    Me,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: Resource,
    pub scope: KeyScope,
}

impl QueryKey {
    pub fn new(resource: Resource, scope: KeyScope) -> Self {
        Self { resource, scope }
    }

    pub fn list(resource: Resource, params: &ListParams) -> Self {
        Self::new(resource, KeyScope::List(params.query_string()))
    }

    pub fn featured(resource: Resource) -> Self {
        Self::new(resource, KeyScope::Featured)
    }

    pub fn by_id(resource: Resource, id: impl Into<String>) -> Self {
        Self::new(resource, KeyScope::ById(id.into()))
    }

    pub fn by_slug(resource: Resource, slug: impl Into<String>) -> Self {
        Self::new(resource, KeyScope::BySlug(slug.into()))
    }

    pub fn me() -> Self {
        Self::new(Resource::Session, KeyScope::Me)
    }

    /// Single-record entries. These are invalidated after mutations, never patched.
    pub fn is_detail(&self) -> bool {
        matches!(self.scope, KeyScope::ById(_) | KeyScope::BySlug(_))
    }

    /// Lists whose membership depends on server-side filtering.
    ///
    /// An inserted or edited record may not belong in them, so they are
    /// patched for immediate feedback and also marked stale.
    pub fn is_filtered(&self) -> bool {
        match &self.scope {
            KeyScope::Featured => true,
            KeyScope::List(query) => query
                .trim_start_matches('?')
                .split('&')
                .filter(|pair| !pair.is_empty())
                .any(|pair| !pair.starts_with("page=") && !pair.starts_with("limit=")),
            _ => false,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            KeyScope::List(query) => write!(f, "{}/list{query}", self.resource),
            KeyScope::Featured => write!(f, "{}/featured", self.resource),
            KeyScope::ById(id) => write!(f, "{}/id/{id}", self.resource),
            KeyScope::BySlug(slug) => write!(f, "{}/slug/{slug}", self.resource),
            KeyScope::Me => write!(f, "{}/me", self.resource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_readable_in_logs() {
        let params = ListParams {
            page: Some(1),
            ..ListParams::default()
        };
        assert_eq!(QueryKey::list(Resource::Projects, &params).to_string(), "projects/list?page=1");
        assert_eq!(QueryKey::by_id(Resource::Certificates, "c1").to_string(), "certificates/id/c1");
        assert_eq!(QueryKey::me().to_string(), "session/me");
    }

    #[test]
    fn same_params_yield_same_key() {
        let a = ListParams {
            category: Some("web".into()),
            ..ListParams::default()
        };
        let b = a.clone();
        assert_eq!(QueryKey::list(Resource::Projects, &a), QueryKey::list(Resource::Projects, &b));
    }

    #[test]
    fn paging_alone_is_not_filtering() {
        let paged = ListParams {
            page: Some(2),
            limit: Some(10),
            ..ListParams::default()
        };
        let searched = ListParams {
            search: Some("robot".into()),
            ..ListParams::default()
        };
        assert!(!QueryKey::list(Resource::Projects, &paged).is_filtered());
        assert!(QueryKey::list(Resource::Projects, &searched).is_filtered());
        assert!(QueryKey::featured(Resource::Projects).is_filtered());
        assert!(QueryKey::by_slug(Resource::Projects, "x").is_detail());
    }
}
