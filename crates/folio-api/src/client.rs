// Portfolio API HTTP client
//
// Wraps `reqwest::Client` with base-URL resolution, envelope parsing and
// cancellation. Endpoint modules (projects, certificates, auth, upload)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Envelope, Page};
use crate::transport::TransportConfig;

fn json_content_type() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

/// Body attached to a request.
pub enum RequestBody {
    /// No body; the JSON content type is still declared.
    Empty,
    /// Pre-serialized JSON.
    Json(Vec<u8>),
    /// Multipart form. No explicit content type so the boundary is set by reqwest.
    Multipart(reqwest::multipart::Form),
}

impl RequestBody {
    pub fn json(body: &impl Serialize) -> Result<Self, Error> {
        serde_json::to_vec(body)
            .map(Self::Json)
            .map_err(|e| Error::Deserialization {
                message: format!("failed to encode request body: {e}"),
                body: String::new(),
            })
    }
}

/// HTTP client for the portfolio API.
///
/// Every call carries the session cookie jar, parses the
/// `{ success, data, message, errors }` envelope regardless of status, and
/// makes a single attempt. Retrying is left to the caching layer.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// A cookie jar is created when the config has none, since the admin
    /// session is cookie based.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client` (caller manages cookies).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    /// The API origin all paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build an endpoint URL from path segments, percent-encoding each one,
    /// with an optional pre-rendered `?k=v` suffix.
    pub(crate) fn endpoint(&self, segments: &[&str], query: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        let query = query.trim_start_matches('?');
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    // ── Request primitive ────────────────────────────────────────────

    /// Issue a request against a path relative to the base URL and return
    /// the parsed envelope.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        cancel: Option<&CancellationToken>,
    ) -> Result<Envelope<T>, Error> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        self.send(method, url, body, cancel).await
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: RequestBody,
        cancel: Option<&CancellationToken>,
    ) -> Result<Envelope<T>, Error> {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::Cancelled);
        }

        debug!("{method} {url}");

        let req = self.http.request(method, url);
        let req = match body {
            RequestBody::Empty => req.header(CONTENT_TYPE, json_content_type()),
            RequestBody::Json(bytes) => req.header(CONTENT_TYPE, json_content_type()).body(bytes),
            RequestBody::Multipart(form) => req.multipart(form),
        };

        let exchange = async {
            let resp = req.send().await?;
            let status = resp.status();
            let text = resp.text().await?;
            Ok::<_, Error>((status, text))
        };

        let (status, text) = match cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => return Err(Error::Cancelled),
                result = exchange => result?,
            },
            None => exchange.await?,
        };

        parse_envelope(status, text)
    }

    // ── Verb helpers ─────────────────────────────────────────────────

    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        url: Url,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, Error> {
        let envelope = self.send(Method::GET, url, RequestBody::Empty, cancel).await?;
        require_data(envelope)
    }

    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        url: Url,
        cancel: Option<&CancellationToken>,
    ) -> Result<Page<T>, Error> {
        let envelope: Envelope<Vec<T>> =
            self.send(Method::GET, url, RequestBody::Empty, cancel).await?;
        let pagination = envelope.pagination;
        Ok(Page::new(require_data(envelope)?, pagination))
    }

    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: &B,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, Error> {
        let envelope = self
            .send(method, url, RequestBody::json(body)?, cancel)
            .await?;
        require_data(envelope)
    }

    pub(crate) async fn send_empty(
        &self,
        method: Method,
        url: Url,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), Error> {
        let _: Envelope<Value> = self.send(method, url, RequestBody::Empty, cancel).await?;
        Ok(())
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Parse the body as JSON whatever the status, then map failures to
/// `Error::Http` carrying the server message and the raw payload.
fn parse_envelope<T: DeserializeOwned>(status: StatusCode, body: String) -> Result<Envelope<T>, Error> {
    let raw: Option<Value> = if body.trim().is_empty() {
        None
    } else {
        serde_json::from_str(&body).ok()
    };

    if !status.is_success() {
        let message = raw
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| (raw.is_none() && !body.trim().is_empty()).then(|| body.trim().to_owned()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_owned());
        return Err(Error::Http {
            status: status.as_u16(),
            message,
            payload: raw,
        });
    }

    let Some(value) = raw else {
        if body.trim().is_empty() {
            return Ok(Envelope {
                success: true,
                ..Envelope::default()
            });
        }
        let preview = body.chars().take(200).collect::<String>();
        return Err(Error::Deserialization {
            message: format!("response is not JSON (body preview: {preview:?})"),
            body,
        });
    };

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Request failed")
            .to_owned();
        return Err(Error::Http {
            status: status.as_u16(),
            message,
            payload: Some(value),
        });
    }

    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

fn require_data<T>(envelope: Envelope<T>) -> Result<T, Error> {
    envelope.data.ok_or_else(|| Error::Deserialization {
        message: "response envelope carried no data".into(),
        body: envelope.message.unwrap_or_default(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_status_keeps_server_message_and_payload() {
        let body = json!({ "success": false, "message": "Not found" }).to_string();
        let err = parse_envelope::<Value>(StatusCode::NOT_FOUND, body).unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.message(), "Not found");
        assert_eq!(err.payload().unwrap()["success"], false);
    }

    #[test]
    fn error_without_body_uses_reason_phrase() {
        let err = parse_envelope::<Value>(StatusCode::BAD_GATEWAY, String::new()).unwrap_err();
        assert_eq!(err.status(), 502);
        assert_eq!(err.message(), "Bad Gateway");
        assert!(err.payload().is_none());
    }

    #[test]
    fn unsuccessful_envelope_on_ok_status_is_an_error() {
        let body = json!({ "success": false, "message": "Slug taken" }).to_string();
        let err = parse_envelope::<Value>(StatusCode::OK, body).unwrap_err();
        assert_eq!(err.status(), 200);
        assert_eq!(err.message(), "Slug taken");
    }

    #[test]
    fn empty_success_body_is_an_empty_envelope() {
        let env = parse_envelope::<Value>(StatusCode::NO_CONTENT, String::new()).unwrap();
        assert!(env.success);
        assert!(env.data.is_none());
    }

    #[test]
    fn endpoint_encodes_segments_and_keeps_base_path() {
        let client = ApiClient::with_client(reqwest::Client::new(), "http://localhost:4000/backend").unwrap();
        let url = client.endpoint(&["api", "projects", "slug", "a b/c"], "?page=2").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4000/backend/api/projects/slug/a%20b%2Fc?page=2"
        );
    }
}
