//! HTTP client wrapping `reqwest` with per-host rate limiting, UA rotation,
//! and retry/backoff — the client builder configuration is grounded in
//! `other_examples/642ee78b_MikkoParkkola-nab__src-http_client.rs.rs`'s
//! `AcceleratedClient`, the block-detection/retry wiring in the teacher's
//! `tools/search/engines/mod.rs` (`fetch_html`, `EngineError`).

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Response;
use tracing::{debug, warn};
use url::Url;

use super::rate_limiter::{RateDecision, RateLimiter};
use super::user_agents::{random_user_agent, stealth_headers};
use crate::error::HttpError;

pub struct HttpClient {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
}

impl HttpClient {
    pub fn new(
        limiter: Arc<RateLimiter>,
        timeout_secs: u64,
        proxy: Option<&str>,
    ) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(proxy_url) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            limiter,
        })
    }

    /// Fetch `url`, honoring the rate limiter's pacing and status-code
    /// policy. Returns `Ok(None)` when the host is, or becomes, permanently
    /// blocked — never a hard error, matching the contract that a single
    /// platform's failure must never abort the crawl cycle.
    pub async fn get(&self, url: &str) -> Result<Option<Response>, HttpError> {
        let parsed = Url::parse(url).map_err(|_| HttpError::InvalidUrl(url.to_string()))?;
        let host = parsed.host_str().unwrap_or("unknown").to_string();

        if let Some(reason) = self.limiter.blocked_reason(&host).await {
            return Err(HttpError::Blocked {
                host,
                reason: reason.to_string(),
            });
        }

        let mut attempt = 0u32;
        loop {
            self.limiter.pace(&host).await;

            let mut headers = HeaderMap::new();
            headers.insert(USER_AGENT, HeaderValue::from_static(random_user_agent()));
            for (k, v) in stealth_headers() {
                if let (Ok(name), Ok(value)) = (
                    HeaderName::from_bytes(k.as_bytes()),
                    HeaderValue::from_str(v),
                ) {
                    headers.insert(name, value);
                }
            }

            let result = self.client.get(url).headers(headers).send().await;

            let response = match result {
                Ok(resp) => resp,
                Err(e) if e.is_timeout() => {
                    warn!(url, "request timed out");
                    if attempt >= self.limiter.max_retries() {
                        return Err(HttpError::Timeout {
                            url: url.to_string(),
                        });
                    }
                    attempt += 1;
                    continue;
                }
                Err(e) => {
                    if attempt >= self.limiter.max_retries() {
                        return Err(HttpError::Transient {
                            url: url.to_string(),
                            source: e,
                        });
                    }
                    attempt += 1;
                    continue;
                }
            };

            let status = response.status();
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            match self
                .limiter
                .record_response(&host, status, retry_after, attempt)
                .await
            {
                RateDecision::Continue => {
                    if status.is_success() {
                        return Ok(Some(response));
                    }
                    if attempt >= self.limiter.max_retries() {
                        return Ok(None);
                    }
                    attempt += 1;
                }
                RateDecision::RetryAfter(wait) => {
                    if attempt >= self.limiter.max_retries() {
                        debug!(url, attempts = attempt, "retries exhausted");
                        return Err(HttpError::RetriesExhausted {
                            url: url.to_string(),
                        });
                    }
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                RateDecision::Blocked(reason) => {
                    return Err(HttpError::Blocked {
                        host,
                        reason: reason.to_string(),
                    });
                }
            }
        }
    }

    pub async fn get_text(&self, url: &str) -> Result<Option<String>, HttpError> {
        match self.get(url).await? {
            Some(resp) => {
                let text = resp.text().await.map_err(|e| HttpError::Transient {
                    url: url.to_string(),
                    source: e,
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    pub async fn get_json(&self, url: &str) -> Result<Option<serde_json::Value>, HttpError> {
        match self.get_text(url).await? {
            Some(text) => Ok(serde_json::from_str(&text).ok()),
            None => Ok(None),
        }
    }
}
