use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Method;
use url::Url;

/// Retry and deadline knobs for a single request. The defaults are tuned for
/// a free-tier backend that can take close to a minute to cold-start.
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub timeout_ms: u64,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay_ms: 1_000,
            timeout_ms: 60_000,
        }
    }
}

/// One outbound call, immutable once built.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: Url,
    pub method: Method,
    pub headers: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub options: RequestOptions,
}

impl RequestDescriptor {
    pub fn post(url: Url, body: serde_json::Value) -> Self {
        Self {
            url,
            method: Method::POST,
            headers: HashMap::new(),
            body: Some(body),
            options: RequestOptions::default(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            headers: HashMap::new(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Classified result of a call. `Success` and `ClientError` are decisive on
/// the first attempt they appear; `ServerError` and `NetworkFailure` are
/// retried; `Timeout` ends the whole call immediately.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { status: u16, body: String },
    ClientError { status: u16, body: String },
    ServerError { status: u16, body: String },
    NetworkFailure { message: String },
    Timeout,
}

impl Outcome {
    fn is_retryable(&self) -> bool {
        matches!(self, Outcome::ServerError { .. } | Outcome::NetworkFailure { .. })
    }
}

/// HTTP client with bounded per-attempt deadlines and linear-backoff retries.
///
/// Retry counts are small and the dominant failure mode is a cold-starting
/// backend rather than contention, so the backoff is linear
/// (`retry_delay_ms * attempt`) instead of exponential.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        // Per-attempt deadlines are enforced with tokio::time::timeout in
        // send(), so the reqwest client itself only bounds connection setup.
        let inner = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { inner }
    }

    /// Issues the request, retrying transient failures. Never fails for
    /// ordinary failure modes; every path ends in an `Outcome`.
    pub async fn send(&self, request: &RequestDescriptor) -> Outcome {
        let opts = request.options;
        let mut last = Outcome::NetworkFailure {
            message: "request was never attempted".to_string(),
        };

        for attempt in 0..=opts.retries {
            let deadline = Duration::from_millis(opts.timeout_ms);

            let outcome = match tokio::time::timeout(deadline, self.attempt(request)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    // A timeout means the callee is unreachable or slow for
                    // the whole call chain, not a one-attempt blip. Stop here.
                    warn!(
                        "{} {} timed out after {}ms (attempt {}/{})",
                        request.method,
                        request.url,
                        opts.timeout_ms,
                        attempt + 1,
                        opts.retries + 1
                    );
                    return Outcome::Timeout;
                }
            };

            match outcome {
                decisive @ (Outcome::Success { .. } | Outcome::ClientError { .. }) => {
                    return decisive;
                }
                retryable => {
                    debug_assert!(retryable.is_retryable());
                    last = retryable;
                    if attempt < opts.retries {
                        let delay = Duration::from_millis(opts.retry_delay_ms * (attempt as u64 + 1));
                        warn!(
                            "{} {} failed (attempt {}/{}), retrying in {:?}",
                            request.method,
                            request.url,
                            attempt + 1,
                            opts.retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        last
    }

    /// One attempt, no deadline of its own.
    async fn attempt(&self, request: &RequestDescriptor) -> Outcome {
        let mut builder = self.inner.request(request.method.clone(), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let message = if e.is_connect() {
                    format!("Connection error - unable to reach the server: {}", e)
                } else {
                    format!("Network error: {}", e)
                };
                return Outcome::NetworkFailure { message };
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        debug!("{} {} -> {}", request.method, request.url, status);

        match status {
            200..=399 => Outcome::Success { status, body },
            400..=499 => Outcome::ClientError { status, body },
            // 5xx plus anything else unexpected is worth another attempt.
            _ => Outcome::ServerError { status, body },
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
