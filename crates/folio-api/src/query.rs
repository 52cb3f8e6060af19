// Query-string construction for list endpoints.
//
// Parameters keep insertion order so rendered strings (and the cache keys
// derived from them) are deterministic.

use url::form_urlencoded;

/// Ordered set of optional query parameters.
///
/// `None` values are kept so callers can build params unconditionally;
/// they are dropped at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter with a concrete value.
    pub fn push(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), Some(value.to_string())));
        self
    }

    /// Append a parameter that may be absent.
    pub fn push_opt<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.pairs.push((key.into(), value.map(|v| v.to_string())));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.iter().all(|(_, v)| v.is_none())
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for QueryParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(|v| v.to_string())))
                .collect(),
        }
    }
}

/// Render params as `?k=v&...`, or `""` when no value is present.
pub fn create_query_string(params: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in &params.pairs {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn drops_absent_values() {
        let params: QueryParams = [("foo", Some("bar")), ("baz", None)].into_iter().collect();
        assert_eq!(create_query_string(&params), "?foo=bar");
    }

    #[test]
    fn empty_params_render_nothing() {
        assert_eq!(create_query_string(&QueryParams::new()), "");
        let only_none = QueryParams::new().push_opt::<u32>("page", None);
        assert!(only_none.is_empty());
        assert_eq!(create_query_string(&only_none), "");
    }

    #[test]
    fn encodes_values_and_keeps_order() {
        let params = QueryParams::new()
            .push("search", "rust & c")
            .push("page", 2)
            .push_opt("featured", Some(true));
        assert_eq!(
            create_query_string(&params),
            "?search=rust+%26+c&page=2&featured=true"
        );
    }
}
