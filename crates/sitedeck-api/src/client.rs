// Console API HTTP client
//
// Wraps `reqwest::Client` with URL construction under the API base,
// per-call timeouts and `detail` error extraction. Endpoint groups
// (sites, global config, subscriptions) are implemented as inherent
// methods in sibling modules so this file stays about transport mechanics.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Error body shape ─────────────────────────────────────────────────

/// The service reports failures as `{"detail": ...}`. Request validation
/// failures carry a list of `{loc, msg}` items instead of a string.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Items(Vec<DetailItem>),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct DetailItem {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    #[serde(default)]
    msg: String,
}

impl Detail {
    fn into_message(self) -> Option<String> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            Self::Text(_) | Self::Other(serde_json::Value::Null) => None,
            Self::Items(items) if !items.is_empty() => Some(
                items
                    .into_iter()
                    .map(|item| {
                        let loc: Vec<String> = item
                            .loc
                            .iter()
                            .map(|part| match part {
                                serde_json::Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect();
                        if loc.is_empty() {
                            item.msg
                        } else {
                            format!("{}: {}", loc.join("."), item.msg)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Self::Items(_) => None,
            Self::Other(value) => Some(value.to_string()),
        }
    }
}

/// Which endpoint family a response came from. Server errors on the
/// subscription endpoints mean the automation run itself failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Config,
    Subscription,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the console's configuration and subscription API.
///
/// `base_url` is the API root (e.g. `http://localhost:8000/api/`); every
/// endpoint path is resolved below it.
pub struct ConsoleClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    fetch_timeout: Duration,
}

impl ConsoleClient {
    /// Build a client from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout: transport.timeout,
            fetch_timeout: transport.fetch_timeout,
        })
    }

    /// Wrap an existing `reqwest::Client` with default timeouts.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let defaults = TransportConfig::default();
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout: defaults.timeout,
            fetch_timeout: defaults.fetch_timeout,
        })
    }

    /// The API root every path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure the base path ends with `/` so segments append below it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::ClientSetup(format!("not a usable API base: {raw}")));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `normalize_base_url` rejects cannot-be-a-base URLs, so this
        // always yields segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("GET {url}");

        let resp = self.http.get(url).timeout(self.timeout).send().await?;
        Self::handle_response(resp, Scope::Config).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("{method} {url}");

        let resp = self
            .http
            .request(method, url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;
        Self::handle_response(resp, Scope::Config).await
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments);
        debug!("DELETE {url}");

        let resp = self.http.delete(url).timeout(self.timeout).send().await?;
        Self::handle_empty(resp, Scope::Config).await
    }

    /// GET on a subscription endpoint, returning the raw body text.
    pub(crate) async fn get_subscription_text(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<String, Error> {
        let url = self.url(segments);
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(params)
            .timeout(self.fetch_timeout)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            Err(Self::parse_error(status, resp, Scope::Subscription).await)
        }
    }

    /// POST without a body on a subscription endpoint.
    pub(crate) async fn post_subscription<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .timeout(self.fetch_timeout)
            .send()
            .await?;
        Self::handle_response(resp, Scope::Subscription).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        resp: reqwest::Response,
        scope: Scope,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp, scope).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response, scope: Scope) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp, scope).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response, scope: Scope) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = extract_detail(&raw).unwrap_or_else(|| status_text(status));
        classify(status, message, scope)
    }
}

/// Pull the `detail` message out of an error body, if it has one.
pub(crate) fn extract_detail(raw: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(raw)
        .ok()
        .and_then(|body| body.detail)
        .and_then(Detail::into_message)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| format!("Request failed ({})", status.as_u16()), String::from)
}

fn classify(status: StatusCode, message: String, scope: Scope) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound { message },
        StatusCode::CONFLICT => Error::Conflict { message },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            Error::Validation { message }
        }
        s if s.is_server_error() && scope == Scope::Subscription => {
            Error::RemoteExecution { message }
        }
        s => Error::Http {
            status: s.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ConsoleClient {
        ConsoleClient::with_client(reqwest::Client::new(), base).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let c = client("http://localhost:8000/api");
        assert_eq!(c.base_url().as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn url_appends_encoded_segments() {
        let c = client("http://localhost:8000/api/");
        let url = c.url(&["config", "sites", "a b/c"]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/config/sites/a%20b%2Fc");
    }

    #[test]
    fn string_detail_is_extracted() {
        let raw = r#"{"detail": "Site 'x' not found"}"#;
        assert_eq!(extract_detail(raw).as_deref(), Some("Site 'x' not found"));
    }

    #[test]
    fn list_detail_is_flattened() {
        let raw = r#"{"detail": [
            {"loc": ["body", "timeout"], "msg": "Input should be a valid integer"},
            {"loc": ["body", "sites", 0], "msg": "Field required"}
        ]}"#;
        assert_eq!(
            extract_detail(raw).as_deref(),
            Some("body.timeout: Input should be a valid integer; body.sites.0: Field required")
        );
    }

    #[test]
    fn missing_detail_yields_none() {
        assert!(extract_detail("").is_none());
        assert!(extract_detail("<html>oops</html>").is_none());
        assert!(extract_detail(r#"{"message": "nope"}"#).is_none());
        assert!(extract_detail(r#"{"detail": ""}"#).is_none());
    }

    #[test]
    fn server_errors_on_subscription_scope_are_remote_execution() {
        let err = classify(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Login failed".into(),
            Scope::Subscription,
        );
        assert!(matches!(err, Error::RemoteExecution { .. }));

        let err = classify(
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".into(),
            Scope::Config,
        );
        assert!(matches!(err, Error::Http { status: 500, .. }));
    }
}
