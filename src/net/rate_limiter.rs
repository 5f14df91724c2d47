//! Per-host pacing and block tracking.
//!
//! Generalizes two teacher patterns into one: `features/antibot.rs`'s
//! `AntiBot::wait_for_next_request` (single-host pacing via a stored
//! last-request timestamp) and `features/proxy_manager.rs`'s
//! `ProxyManager` (`Arc<RwLock<ProxyRegistry>>` holding one scored,
//! failure-counted entry per resource, auto-disabled past a threshold).
//! Here the registry key is the request host rather than a proxy, and the
//! "disable" outcome is a permanent per-host block rather than proxy
//! removal.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::prelude::*;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};

const MAX_PENALTY_FACTOR: f64 = 5.0;

/// Why a host was permanently blocked for the remainder of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// HTTP 401 — the platform wants an authenticated session.
    /// Authenticated scraping is out of scope, so the host is retired.
    AuthRequired,
    /// A second bare `403` (no `Retry-After`) in this process.
    Forbidden,
    /// A second `412` in this process — read as active risk control.
    RiskControlled,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockReason::AuthRequired => write!(f, "auth required"),
            BlockReason::Forbidden => write!(f, "forbidden"),
            BlockReason::RiskControlled => write!(f, "risk control"),
        }
    }
}

/// What the caller should do after reporting a response's status code.
#[derive(Debug, Clone)]
pub enum RateDecision {
    /// Proceed normally; pacing interval has not changed.
    Continue,
    /// Wait this long, then retry the same request.
    RetryAfter(Duration),
    /// The host is now permanently blocked — stop issuing requests to it.
    Blocked(BlockReason),
}

#[derive(Debug)]
struct HostState {
    last_request: Option<Instant>,
    /// Multiplies the base pacing interval; grows on failure, resets on 2xx.
    penalty_factor: f64,
    consecutive_failures: u32,
    /// Count of `403` responses carrying no `Retry-After` header.
    bare_403_count: u32,
    /// Count of `412` responses seen this process.
    count_412: u32,
    blocked: Option<BlockReason>,
}

impl HostState {
    fn new() -> Self {
        Self {
            last_request: None,
            penalty_factor: 1.0,
            consecutive_failures: 0,
            bare_403_count: 0,
            count_412: 0,
            blocked: None,
        }
    }

    fn penalize(&mut self, factor: f64) {
        self.penalty_factor = (self.penalty_factor * factor).min(MAX_PENALTY_FACTOR);
    }
}

pub struct RateLimiter {
    hosts: RwLock<HashMap<String, Arc<Mutex<HostState>>>>,
    base_interval: Duration,
    jitter_ms: u64,
    max_retries: u32,
}

impl RateLimiter {
    /// `jitter_ms` is the additive jitter ceiling: the actual pacing
    /// interval is `base_interval * penalty_factor + uniform(0, jitter_ms)`.
    pub fn new(base_interval_ms: u64, jitter_ms: u64, max_retries: u32) -> Self {
        Self {
            hosts: RwLock::new(HashMap::new()),
            base_interval: Duration::from_millis(base_interval_ms),
            jitter_ms,
            max_retries,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    async fn entry(&self, host: &str) -> Arc<Mutex<HostState>> {
        if let Some(state) = self.hosts.read().await.get(host) {
            return state.clone();
        }
        let mut hosts = self.hosts.write().await;
        hosts
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(HostState::new())))
            .clone()
    }

    /// Returns the block reason if this host has been retired.
    pub async fn blocked_reason(&self, host: &str) -> Option<BlockReason> {
        let state = self.entry(host).await;
        let state = state.lock().await;
        state.blocked.clone()
    }

    /// Block until it is this host's turn: `base_interval * penalty_factor
    /// + uniform(0, jitter_ms)`, so requests don't fall into a detectable
    /// fixed cadence.
    pub async fn pace(&self, host: &str) {
        let state = self.entry(host).await;
        let wait = {
            let state = state.lock().await;
            let interval = self.base_interval.mul_f64(state.penalty_factor) + jitter(self.jitter_ms);
            match state.last_request {
                Some(last) => {
                    let elapsed = last.elapsed();
                    interval.checked_sub(elapsed)
                }
                None => None,
            }
        };

        if let Some(wait) = wait {
            if !wait.is_zero() {
                debug!(host, ms = wait.as_millis() as u64, "pacing");
                tokio::time::sleep(wait).await;
            }
        }

        state.lock().await.last_request = Some(Instant::now());
    }

    /// Apply the status-code policy table from spec §4.1. `attempt` is the
    /// 0-based attempt count this request has already made, used for the
    /// 429/other exponential backoff.
    pub async fn record_response(
        &self,
        host: &str,
        status: reqwest::StatusCode,
        retry_after: Option<Duration>,
        attempt: u32,
    ) -> RateDecision {
        let state = self.entry(host).await;
        let mut state = state.lock().await;

        if status.is_success() {
            state.penalty_factor = (state.penalty_factor * 0.5).max(1.0);
            state.consecutive_failures = 0;
            state.bare_403_count = 0;
            return RateDecision::Continue;
        }

        match status.as_u16() {
            401 => {
                state.consecutive_failures += 1;
                warn!(host, "401 — auth required, retiring host");
                state.blocked = Some(BlockReason::AuthRequired);
                RateDecision::Blocked(BlockReason::AuthRequired)
            }
            403 => {
                if let Some(wait) = retry_after {
                    RateDecision::RetryAfter(wait.min(Duration::from_secs(30)))
                } else {
                    state.bare_403_count += 1;
                    if state.bare_403_count >= 2 {
                        warn!(host, "second bare 403 — retiring host as forbidden");
                        state.blocked = Some(BlockReason::Forbidden);
                        RateDecision::Blocked(BlockReason::Forbidden)
                    } else {
                        RateDecision::RetryAfter(uniform_duration(2.0, 4.0))
                    }
                }
            }
            412 => {
                state.penalize(3.0);
                state.count_412 += 1;
                if state.count_412 >= 2 {
                    warn!(host, "second 412 — retiring host as risk-controlled");
                    state.blocked = Some(BlockReason::RiskControlled);
                    RateDecision::Blocked(BlockReason::RiskControlled)
                } else {
                    RateDecision::RetryAfter(uniform_duration(5.0, 10.0))
                }
            }
            429 => {
                state.penalize(2.0);
                let backoff = retry_after.unwrap_or_else(|| {
                    Duration::from_secs_f64(2f64.powi(attempt as i32)) + uniform_duration(1.0, 3.0)
                });
                RateDecision::RetryAfter(backoff)
            }
            _ => {
                state.consecutive_failures += 1;
                let backoff =
                    Duration::from_secs_f64(2f64.powi(attempt as i32)) + uniform_duration(0.0, 2.0);
                RateDecision::RetryAfter(backoff)
            }
        }
    }

    /// True once all known hosts are blocked — used by the orchestrator to
    /// short-circuit a platform early rather than retry into a wall.
    pub async fn is_exhausted(&self, hosts: &[&str]) -> bool {
        if hosts.is_empty() {
            return false;
        }
        for host in hosts {
            if self.blocked_reason(host).await.is_none() {
                return false;
            }
        }
        true
    }
}

fn jitter(max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    let mut rng = rand::rng();
    Duration::from_millis(rng.random_range(0..=max_ms))
}

fn uniform_duration(min_secs: f64, max_secs: f64) -> Duration {
    let mut rng = rand::rng();
    Duration::from_secs_f64(rng.random_range(min_secs..=max_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_resets_penalty_and_failures() {
        let rl = RateLimiter::new(10, 0, 3);
        rl.record_response("a.example", reqwest::StatusCode::FORBIDDEN, None, 0)
            .await;
        rl.record_response("a.example", reqwest::StatusCode::OK, None, 0)
            .await;
        assert!(rl.blocked_reason("a.example").await.is_none());
    }

    #[tokio::test]
    async fn second_bare_403_blocks_host_as_forbidden() {
        let rl = RateLimiter::new(10, 0, 3);
        let first = rl
            .record_response("b.example", reqwest::StatusCode::FORBIDDEN, None, 0)
            .await;
        assert!(matches!(first, RateDecision::RetryAfter(_)));
        let second = rl
            .record_response("b.example", reqwest::StatusCode::FORBIDDEN, None, 0)
            .await;
        assert!(matches!(second, RateDecision::Blocked(BlockReason::Forbidden)));
        assert_eq!(rl.blocked_reason("b.example").await, Some(BlockReason::Forbidden));
    }

    #[tokio::test]
    async fn second_412_blocks_host_as_risk_controlled() {
        let rl = RateLimiter::new(10, 0, 3);
        rl.record_response("f.example", reqwest::StatusCode::PRECONDITION_FAILED, None, 0)
            .await;
        let second = rl
            .record_response("f.example", reqwest::StatusCode::PRECONDITION_FAILED, None, 0)
            .await;
        assert!(matches!(second, RateDecision::Blocked(BlockReason::RiskControlled)));
    }

    #[tokio::test]
    async fn block_is_monotonic_once_set_never_cleared_by_success() {
        let rl = RateLimiter::new(10, 0, 3);
        rl.record_response("c.example", reqwest::StatusCode::UNAUTHORIZED, None, 0)
            .await;
        rl.record_response("c.example", reqwest::StatusCode::OK, None, 0)
            .await;
        assert_eq!(rl.blocked_reason("c.example").await, Some(BlockReason::AuthRequired));
    }

    #[tokio::test]
    async fn independent_hosts_do_not_share_penalty_state() {
        let rl = RateLimiter::new(10, 0, 3);
        rl.record_response("d.example", reqwest::StatusCode::FORBIDDEN, None, 0)
            .await;
        rl.record_response("d.example", reqwest::StatusCode::FORBIDDEN, None, 0)
            .await;
        assert!(rl.blocked_reason("e.example").await.is_none());
    }

    #[tokio::test]
    async fn a_403_with_retry_after_is_capped_at_30_seconds() {
        let rl = RateLimiter::new(10, 0, 3);
        let decision = rl
            .record_response(
                "g.example",
                reqwest::StatusCode::FORBIDDEN,
                Some(Duration::from_secs(120)),
                0,
            )
            .await;
        match decision {
            RateDecision::RetryAfter(d) => assert!(d <= Duration::from_secs(30)),
            other => panic!("expected RetryAfter, got {other:?}"),
        }
    }
}
