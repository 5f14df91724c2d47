use thiserror::Error;

/// Leaf error type for the HTTP/rate-limiter layer. Kept narrow and typed
/// (mirrors `EngineError` in the teacher's search-engine modules) so callers
/// can distinguish a hard block from a merely transient failure.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("host {host} is permanently blocked: {reason}")]
    Blocked { host: String, reason: String },

    #[error("transient failure fetching {url}: {source}")]
    Transient {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("rate limiter exhausted retries for {url}")]
    RetriesExhausted { url: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Leaf error type for NLP/extraction code paths that can fail to parse
/// upstream content without that failure being fatal to the crawl cycle.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no extractable content found ({0})")]
    Empty(String),

    #[error("malformed structured payload: {0}")]
    Malformed(String),
}

/// Leaf error type for time-series persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("keyword history file is corrupt: {0}")]
    Corrupt(String),

    #[error("atomic save failed: {0}")]
    SaveFailed(String),
}
