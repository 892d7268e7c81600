// Lotto API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, cookie-session refresh,
// and NestJS-style error decoding. Endpoint groups (auth, slots, bids,
// ...) live in sibling modules as inherent methods so this file stays
// focused on transport mechanics.

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Paths that must never trigger the refresh-and-retry flow.
const NO_REFRESH_PATHS: &[&str] = &["auth/login", "auth/refresh"];

// ── Error response shape ─────────────────────────────────────────────

/// `{ "message": "..." | ["..."], "error": "Bad Request", "statusCode": 400 }`
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorResponse {
    fn message(&self) -> Option<String> {
        match self.message.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_owned))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            other => Some(other.to_string()),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the lotto platform API.
///
/// Authentication is cookie based: `login` stores the access and refresh
/// cookies in the client's jar, and any 401 on a protected route triggers
/// one `POST auth/refresh` followed by a single retry.
pub struct LottoClient {
    http: reqwest::Client,
    base_url: Url,
    refresh_lock: Mutex<()>,
}

impl LottoClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Create a client from a `TransportConfig`, adding a cookie jar if
    /// the config doesn't already carry one.
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client` (caller manages cookies).
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            refresh_lock: Mutex::new(()),
        }
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Core request path ────────────────────────────────────────────

    /// Send a request, refreshing the session once on 401.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let resp = self
            .build(method.clone(), url.clone(), params, body)
            .send()
            .await
            .inspect_err(|e| warn!(path, error = %e, "request failed"))?;

        let refreshable = !NO_REFRESH_PATHS.contains(&path.trim_start_matches('/'));
        if resp.status() != StatusCode::UNAUTHORIZED || !refreshable {
            return Ok(resp);
        }

        debug!(path, "access token rejected, refreshing session");
        self.refresh_session().await?;

        let retry = self
            .build(method, url, params, body)
            .send()
            .await
            .inspect_err(|e| warn!(path, error = %e, "retry failed"))?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!(path, "request still unauthorized after refresh");
            return Err(Error::SessionExpired);
        }
        Ok(retry)
    }

    fn build(
        &self,
        method: Method,
        url: Url,
        params: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        req
    }

    /// `POST auth/refresh` -- rotates the access cookie.
    ///
    /// Serialized so concurrent 401s don't stampede the refresh endpoint.
    pub async fn refresh_session(&self) -> Result<(), Error> {
        let _guard = self.refresh_lock.lock().await;
        let url = self.url("auth/refresh")?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if resp.status().is_success() {
            debug!("session refreshed");
            Ok(())
        } else {
            warn!(status = %resp.status(), "session refresh rejected");
            Err(Error::SessionExpired)
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.execute(Method::GET, path, &[], None).await?;
        handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("params={params:?}");
        let resp = self.execute(Method::GET, path, params, None).await?;
        handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let body = to_json(body)?;
        let resp = self.execute(Method::POST, path, &[], Some(&body)).await?;
        handle_response(resp).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let body = to_json(body)?;
        let resp = self.execute(Method::POST, path, &[], Some(&body)).await?;
        handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let resp = self.execute(Method::DELETE, path, &[], None).await?;
        handle_empty(resp).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Make sure relative joins append to the base path instead of replacing
/// its last segment (`https://host/api` -> `https://host/api/`).
fn normalize_base_url(raw: &Url) -> Url {
    let mut url = raw.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn to_json<B: Serialize>(body: &B) -> Result<serde_json::Value, Error> {
    serde_json::to_value(body).map_err(|e| Error::Deserialization {
        message: format!("failed to encode request body: {e}"),
        body: String::new(),
    })
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
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
        Err(parse_error(status, resp).await)
    }
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorResponse>(&raw).ok();

    let message = parsed
        .as_ref()
        .and_then(ErrorResponse::message)
        .unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw.clone()
            }
        });

    warn!(status = status.as_u16(), %message, "request rejected");

    if status == StatusCode::UNAUTHORIZED {
        return Error::Authentication { message };
    }

    Error::Api {
        status: status.as_u16(),
        message,
        code: parsed.and_then(|p| p.error),
    }
}
