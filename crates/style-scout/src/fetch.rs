//! The fetch capability the engine consumes, plus a `reqwest` adapter.
//!
//! Not a browser, just HTTP GETs. Each call carries its own timeout,
//! redirect cap, headers and body cap. There are no retries: one failed
//! fetch is final for that resource.

use async_trait::async_trait;
use fnv::FnvHashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Per-request fetch settings.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_redirects: usize,
    /// Request headers sent verbatim.
    pub headers: Vec<(String, String)>,
    /// Stop reading the body after this many bytes.
    pub max_body_bytes: Option<usize>,
}

/// Response from a GET request.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers, names lowercased.
    pub headers: Vec<(String, String)>,
    /// Response body as text.
    pub body: String,
}

impl FetchResponse {
    /// Case-insensitive header lookup; first value wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty `content-type`, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level fetch failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_redirect() {
            FetchError::TooManyRedirects
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Anything that can GET a URL for the analyzer.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<FetchResponse, FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<FetchResponse, FetchError> {
        (**self).fetch(url, options).await
    }
}

/// Production fetcher backed by `reqwest`.
///
/// Redirect policy is fixed per `reqwest::Client`, so one client is built
/// lazily for every distinct redirect cap and reused afterwards.
#[derive(Default)]
pub struct HttpFetcher {
    clients: Mutex<FnvHashMap<usize, reqwest::Client>>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn client_for(&self, max_redirects: usize) -> Result<reqwest::Client, FetchError> {
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(client) = clients.get(&max_redirects) {
            return Ok(client.clone());
        }
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .build()
            .map_err(|e| FetchError::Transport(format!("cannot build HTTP client: {e}")))?;
        clients.insert(max_redirects, client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<FetchResponse, FetchError> {
        let client = self.client_for(options.max_redirects)?;

        let mut builder = client.get(url).timeout(options.timeout);
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut r = builder.send().await?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let headers: Vec<(String, String)> = r
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = r.chunk().await? {
            body.extend_from_slice(&chunk);
            if let Some(limit) = options.max_body_bytes {
                if body.len() >= limit {
                    body.truncate(limit);
                    break;
                }
            }
        }

        Ok(FetchResponse {
            url: url.to_string(),
            final_url,
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

/// Cut `body` to at most `max_bytes`, snapping down to a char boundary.
pub fn truncate_body(body: &str, max_bytes: usize) -> &str {
    if body.len() <= max_bytes {
        return body;
    }
    let mut end = max_bytes;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
