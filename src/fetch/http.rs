// src/fetch/http.rs
// =============================================================================
// This module downloads URLs over HTTP.
//
// Key functionality:
// - Makes HTTP GET requests with a browser-like User-Agent
//   (some servers reject default client identifiers)
// - Bounds every request with a timeout
// - Retries failed requests up to a fixed number of attempts
// - Writes downloaded bytes to disk, creating parent directories
//
// Every failure (DNS, TLS, timeout, 404, 500, ...) is collapsed into a single
// category. The last error's text is what the operator sees.
// =============================================================================

use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// User-Agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per URL.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

// Everything that can go wrong while fetching or saving a URL
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client itself could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Every attempt failed; `reason` is the last attempt's error
    #[error("failed after {attempts} attempt(s): {reason}")]
    Exhausted {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// The payload arrived but could not be written
    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The URL has no path component to mirror to
    #[error("{url} has no file path to mirror to")]
    NoPath { url: String },
}

// A reusable HTTP fetcher
//
// We build one reqwest Client and reuse it for every request
// (connection pooling).
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_retries: u32,
}

impl Fetcher {
    /// Builds a fetcher with the given timeout and retry budget.
    ///
    /// A retry budget of 0 is treated as 1: every URL gets at least one try.
    pub fn new(timeout: Duration, max_retries: u32) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            max_retries: max_retries.max(1),
        })
    }

    /// How many attempts each URL gets.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    // Downloads a URL and returns its raw bytes
    //
    // Each attempt re-downloads the full resource; there is no partial
    // resumption. Attempts are made back to back with no delay.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            debug!(url, attempt, "GET");

            match self.fetch_once(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < self.max_retries {
                        warn!(url, "retry {}/{}: {}", attempt, self.max_retries, last_error);
                    }
                }
            }
        }

        warn!(url, attempts = self.max_retries, "giving up: {}", last_error);

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: self.max_retries,
            reason: last_error,
        })
    }

    // Downloads a URL straight to a file
    //
    // Missing parent directories are created first. The body goes to a
    // `.part` sibling that is renamed over `path` only once fully written,
    // so an interrupted write never leaves a truncated file at `path`.
    // An existing file at `path` is overwritten. Returns the bytes written.
    pub async fn download(&self, url: &str, path: &Path) -> Result<u64, FetchError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| FetchError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let bytes = self.fetch(url).await?;

        let partial = partial_path(path);
        let saved = match tokio::fs::write(&partial, &bytes).await {
            Ok(()) => tokio::fs::rename(&partial, path).await,
            Err(e) => Err(e),
        };

        if let Err(source) = saved {
            // Best effort; the original error is what matters
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(FetchError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        Ok(bytes.len() as u64)
    }

    // One GET; non-2xx statuses are turned into errors too
    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

// `assets/app.css` -> `assets/app.css.part`
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is thiserror?
//    - A derive macro that implements std::error::Error for our enum
//    - #[error("...")] becomes the Display text
//    - #[from] generates a From impl so `?` converts reqwest errors for us
//
// 2. Why error_for_status()?
//    - reqwest treats a 404 as a successful *request* (the server answered)
//    - error_for_status() turns 4xx/5xx into an Err so the retry loop sees it
//
// 3. What does .max(1) do?
//    - Returns the larger of the two numbers
//    - Guarantees the for loop 1..=max_retries runs at least once
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(retries: u32) -> Fetcher {
        Fetcher::new(Duration::from_secs(5), retries).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = fetcher(3)
            .fetch(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, b"hello");

        let requests = server.received_requests().await.unwrap();
        let agent = requests[0].headers.get("user-agent").unwrap();
        assert_eq!(agent.to_str().unwrap(), USER_AGENT);
    }

    #[tokio::test]
    async fn test_fetch_exhausts_retry_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = fetcher(3)
            .fetch(&format!("{}/down", server.uri()))
            .await
            .unwrap_err();

        match err {
            FetchError::Exhausted { attempts, reason, .. } => {
                assert_eq!(attempts, 3);
                assert!(reason.contains("500"), "unexpected reason: {reason}");
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_recovers_after_transient_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = fetcher(3)
            .fetch(&format!("{}/flaky", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, b"ok");
    }

    #[tokio::test]
    async fn test_zero_retries_still_tries_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(0);
        assert_eq!(fetcher.max_retries(), 1);
        assert!(fetcher
            .fetch(&format!("{}/gone", server.uri()))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_download_creates_parents_and_overwrites() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/assets/app.css"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body{}"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/app.css");

        let url = format!("{}/assets/app.css", server.uri());
        let written = fetcher(1).download(&url, &target).await.unwrap();
        assert_eq!(written, 6);

        std::fs::write(&target, "stale contents").unwrap();
        fetcher(1).download(&url, &target).await.unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "body{}");
        assert!(!dir.path().join("nested/deeper/app.css.part").exists());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_no_partial_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fonts.css"))
            .respond_with(ResponseTemplate::new(200).set_body_string("@font-face{}"))
            .expect(1)
            .mount(&server)
            .await;

        // A directory at the target makes the final rename fail
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fonts.css");
        std::fs::create_dir(&target).unwrap();

        let url = format!("{}/fonts.css", server.uri());
        let err = fetcher(1).download(&url, &target).await.unwrap_err();

        assert!(matches!(err, FetchError::Io { .. }), "unexpected error: {err:?}");
        assert!(target.is_dir());
        assert!(!dir.path().join("fonts.css.part").exists());
    }

    #[test]
    fn test_partial_path_is_a_sibling() {
        assert_eq!(
            partial_path(Path::new("out/_next/a.woff2")),
            PathBuf::from("out/_next/a.woff2.part")
        );
    }
}
