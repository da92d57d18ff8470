//! Minimal HTTP client for fetching HTML pages with safe, structured logging.
//!
//! - Request options: headers, query params, timeout, absolute-URL passthrough
//! - No retries: a failed request is reported once and left to the caller
//! - No timeout unless one is configured (reqwest's default is unbounded)
//! - Optional *raw* request/response logging via `ALMANAC_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), almanac_http::HttpError> {
//! let client = almanac_http::HttpClient::new("https://www.example.edu")?;
//! let html = client
//!     .get_text("calendar", almanac_http::RequestOpts::default())
//!     .await?;
//! assert!(!html.is_empty());
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`) when `ALMANAC_HTTP_RAW=1`.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, StatusCode, Url};
use std::borrow::Cow;
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "ALMANAC_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in headers.iter() {
        let v = val.to_str().unwrap_or("");
        parts.push(format!(
            "-H '{}: {}'",
            name.as_str(),
            v.replace('\'', r"'\''")
        ));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned error {status}: {body_snippet}")]
    Status {
        status: StatusCode,
        body_snippet: String,
    },
}

impl HttpError {
    /// HTTP status for [`HttpError::Status`], `None` for transport failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use almanac_http::RequestOpts;
/// use std::borrow::Cow;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("start_date", Cow::Borrowed("2025-01-01"))]),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.allow_absolute == false);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // e.g. [("search", "".into())]
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

/// Settings applied when the underlying `reqwest::Client` is built.
#[derive(Clone, Debug, Default)]
pub struct ClientSettings {
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// TCP connect timeout. `None` leaves reqwest's default (none).
    pub connect_timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Option<Duration>,
}

impl HttpClient {
    /// Construct a client anchored to a base URL with default settings.
    ///
    /// ```no_run
    /// use almanac_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://www.example.edu")?;
    /// assert_eq!(client.default_timeout, None);
    /// assert_eq!(client.base().as_str(), "https://www.example.edu/");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        Self::with_settings(base, ClientSettings::default())
    }

    /// Construct a client with explicit timeouts and user agent.
    pub fn with_settings(base: &str, settings: ClientSettings) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let mut builder = Client::builder();
        if let Some(connect) = settings.connect_timeout {
            builder = builder.connect_timeout(connect);
        }
        if let Some(ua) = settings.user_agent.as_deref() {
            let value =
                HeaderValue::from_str(ua).map_err(|e| HttpError::Build(e.to_string()))?;
            let mut headers = HeaderMap::new();
            headers.insert(USER_AGENT, value);
            builder = builder.default_headers(headers);
        }
        let inner = builder
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: settings.timeout,
        })
    }

    /// Override the default per-request timeout.
    ///
    /// ```no_run
    /// use almanac_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://www.example.edu")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Some(Duration::from_secs(2)));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = Some(dur);
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// GET a page and return its body as text.
    ///
    /// Non-2xx responses are errors; the body is only returned on success.
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let url = self.resolve(path, opts.allow_absolute)?;
        let method = Method::GET;

        // ----- Build request -----
        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.or(self.default_timeout);
        if let Some(t) = timeout {
            rb = rb.timeout(t);
        }

        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }

        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        // ----- Request logging (pre-send) -----
        let req_id = format!("r{}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query=?url.query(),
            timeout_ms=?timeout.map(|t| t.as_millis() as u64),
            "http.request.start"
        );

        if raw_enabled() {
            let merged = opts.headers.clone().unwrap_or_default();
            let curl = make_curl(&method, &url, &merged);
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, url=%url, message=%message, "http.network_error.send");
            HttpError::Network(message)
        })?;
        let status = resp.status();
        // decodes with the response charset, UTF-8 when none is declared
        let body = resp.text().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, url=%url, message=%message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;
        let bytes = body.as_bytes();

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            "http.response.headers"
        );

        if raw_enabled() {
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                body=%text,
                truncated
            );
        }

        let snippet = snip_body(bytes);
        tracing::trace!(req_id=%req_id, body_snippet=%snippet, "http.response.body_snippet");

        if status.is_success() {
            return Ok(body);
        }

        tracing::warn!(
            req_id=%req_id,
            %status,
            url=%url,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Status {
            status,
            body_snippet: snippet,
        })
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }
}

// ==============================
// Helpers
// ==============================

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_truncated_on_char_boundary() {
        let body = "é".repeat(400); // 800 bytes
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= SNIPPET_MAX + 3);
    }

    #[test]
    fn short_snippet_is_untouched() {
        assert_eq!(snip_body(b"not found"), "not found");
    }

    #[test]
    fn resolves_relative_and_absolute_paths() {
        let client = HttpClient::new("https://www.example.edu/").unwrap();
        let rel = client.resolve("/events/42", false).unwrap();
        assert_eq!(rel.as_str(), "https://www.example.edu/events/42");

        let abs = client
            .resolve("https://other.example.org/calendar?x=1", true)
            .unwrap();
        assert_eq!(abs.host_str(), Some("other.example.org"));

        // Url::join accepts absolute input too
        let joined = client.resolve("https://other.example.org/a", false).unwrap();
        assert_eq!(joined.host_str(), Some("other.example.org"));
    }

    #[test]
    fn curl_line_contains_headers_and_url() {
        let url = Url::parse("https://www.example.edu/calendar?start_date=2025-01-01").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("almanac-test"));
        let curl = make_curl(&Method::GET, &url, &headers);
        assert!(curl.starts_with("curl -XGET"));
        assert!(curl.contains("-H 'user-agent: almanac-test'"));
        assert!(curl.ends_with("'https://www.example.edu/calendar?start_date=2025-01-01'"));
    }
}
