// ---------------------------------------------------------------------------
// TrendScoutConfig — file-based config loader (trend-scout.json) with
// env-var fallback, following the teacher's `ShadowConfig` pattern.
// ---------------------------------------------------------------------------

use std::path::PathBuf;

pub const ENV_CONFIG_PATH: &str = "TREND_SCOUT_CONFIG";
pub const ENV_DATA_DIR: &str = "TREND_SCOUT_DATA_DIR";

/// Rate limiter tuning. Mirrors spec §4.1's pacing formula inputs:
/// `interval = base_interval * penalty_factor + uniform(0, jitter)`.
#[derive(serde::Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct RateLimiterConfig {
    pub base_interval_ms: Option<u64>,
    /// Additive jitter ceiling in milliseconds, not a ratio of the interval.
    pub jitter_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

impl RateLimiterConfig {
    pub fn resolve_base_interval_ms(&self) -> u64 {
        self.base_interval_ms
            .or_else(|| env_parse("TREND_SCOUT_RL_BASE_INTERVAL_MS"))
            .unwrap_or(2500)
    }

    pub fn resolve_jitter_ms(&self) -> u64 {
        self.jitter_ms
            .or_else(|| env_parse("TREND_SCOUT_RL_JITTER_MS"))
            .unwrap_or(2000)
    }

    pub fn resolve_max_retries(&self) -> u32 {
        self.max_retries
            .or_else(|| env_parse("TREND_SCOUT_RL_MAX_RETRIES"))
            .unwrap_or(3)
    }

    pub fn resolve_request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .or_else(|| env_parse("TREND_SCOUT_RL_TIMEOUT_SECS"))
            .unwrap_or(15)
    }
}

/// Time-series store tuning. Mirrors spec §4.5's `H=144`/10min/48h defaults.
#[derive(serde::Deserialize, Default, Clone, Debug)]
#[serde(default)]
pub struct TimeSeriesConfig {
    pub window_count: Option<usize>,
    pub window_minutes: Option<i64>,
    pub max_age_hours: Option<i64>,
}

impl TimeSeriesConfig {
    pub fn resolve_window_count(&self) -> usize {
        self.window_count
            .or_else(|| env_parse("TREND_SCOUT_TS_WINDOW_COUNT"))
            .unwrap_or(144)
    }

    pub fn resolve_window_minutes(&self) -> i64 {
        self.window_minutes
            .or_else(|| env_parse("TREND_SCOUT_TS_WINDOW_MINUTES"))
            .unwrap_or(10)
    }

    pub fn resolve_max_age_hours(&self) -> i64 {
        self.max_age_hours
            .or_else(|| env_parse("TREND_SCOUT_TS_MAX_AGE_HOURS"))
            .unwrap_or(48)
    }
}

/// Burst-detector and heat-scorer constants. Mirrors spec §4.6/§4.7 exactly;
/// fields are overridable for experimentation but every default matches the
/// spec's stated constant.
#[derive(serde::Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ScoringConfig {
    pub z_threshold: Option<f64>,
    pub half_life_hours: Option<f64>,
    pub macd_fast_period: Option<usize>,
    pub macd_slow_period: Option<usize>,
    pub macd_signal_period: Option<usize>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub delta: Option<f64>,
}

impl ScoringConfig {
    pub fn resolve_z_threshold(&self) -> f64 {
        self.z_threshold.unwrap_or(2.5)
    }
    pub fn resolve_half_life_hours(&self) -> f64 {
        self.half_life_hours.unwrap_or(4.0)
    }
    pub fn resolve_macd_fast_period(&self) -> usize {
        self.macd_fast_period.unwrap_or(12)
    }
    pub fn resolve_macd_slow_period(&self) -> usize {
        self.macd_slow_period.unwrap_or(26)
    }
    pub fn resolve_macd_signal_period(&self) -> usize {
        self.macd_signal_period.unwrap_or(9)
    }
    pub fn resolve_alpha(&self) -> f64 {
        self.alpha.unwrap_or(0.4)
    }
    pub fn resolve_beta(&self) -> f64 {
        self.beta.unwrap_or(0.3)
    }
    pub fn resolve_gamma(&self) -> f64 {
        self.gamma.unwrap_or(0.2)
    }
    pub fn resolve_delta(&self) -> f64 {
        self.delta.unwrap_or(0.1)
    }
}

/// Top-level config loaded from `trend-scout.json`.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct TrendScoutConfig {
    #[serde(default)]
    pub rate_limiter: RateLimiterConfig,
    #[serde(default)]
    pub timeseries: TimeSeriesConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    pub data_dir: Option<String>,
}

impl TrendScoutConfig {
    /// Data directory root: JSON field → `TREND_SCOUT_DATA_DIR` env var → `./data`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(d) = &self.data_dir {
            if !d.trim().is_empty() {
                return PathBuf::from(d);
            }
        }
        std::env::var(ENV_DATA_DIR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Load `trend-scout.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `TREND_SCOUT_CONFIG` env var path
/// 2. `./trend-scout.json` (process cwd)
/// 3. `../trend-scout.json` (one level up)
/// 4. `~/.config/trend-scout/trend-scout.json` (per-user default, for a
///    binary invoked from an arbitrary working directory by a scheduler)
///
/// Missing file → `TrendScoutConfig::default()` (silent, all env-var
/// fallbacks apply). Parse error → log a warning, return the default.
pub fn load_config() -> TrendScoutConfig {
    let mut candidates: Vec<PathBuf> = vec![
        PathBuf::from("trend-scout.json"),
        PathBuf::from("../trend-scout.json"),
    ];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".config").join("trend-scout").join("trend-scout.json"));
    }
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        candidates.insert(0, PathBuf::from(env_path));
    }

    for path in &candidates {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                return match serde_json::from_str::<TrendScoutConfig>(&contents) {
                    Ok(cfg) => {
                        tracing::info!("trend-scout.json loaded from {}", path.display());
                        cfg
                    }
                    Err(e) => {
                        tracing::warn!(
                            "trend-scout.json parse error at {}: {} — using defaults",
                            path.display(),
                            e
                        );
                        TrendScoutConfig::default()
                    }
                };
            }
            Err(_) => continue,
        }
    }

    TrendScoutConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = TrendScoutConfig::default();
        assert_eq!(cfg.timeseries.resolve_window_count(), 144);
        assert_eq!(cfg.timeseries.resolve_max_age_hours(), 48);
        assert_eq!(cfg.scoring.resolve_z_threshold(), 2.5);
        assert_eq!(cfg.scoring.resolve_half_life_hours(), 4.0);
        assert_eq!(cfg.rate_limiter.resolve_request_timeout_secs(), 15);
        assert_eq!(cfg.rate_limiter.resolve_base_interval_ms(), 2500);
        assert_eq!(cfg.rate_limiter.resolve_jitter_ms(), 2000);
    }
}
