//! Sliding 24h time-series store for keyword observations: one
//! `KeywordHistory` per keyword, each holding up to `window_count` windows
//! (144 x 10min = 24h by default). Single-writer per cycle —
//! `engine::TrendEngine` owns the store exclusively while a cycle runs,
//! and appends at most one window per keyword per cycle, stamped with the
//! cycle's own wall-clock time rather than floored to a bucket boundary.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use crate::core::types::{KeywordHistory, KeywordWindow, Platform};
use crate::error::StoreError;
use crate::persist;

pub struct TimeSeriesStore {
    histories: HashMap<String, KeywordHistory>,
    window_minutes: i64,
    window_count: usize,
    max_age_hours: i64,
}

impl TimeSeriesStore {
    pub fn new(window_minutes: i64, window_count: usize, max_age_hours: i64) -> Self {
        Self {
            histories: HashMap::new(),
            window_minutes,
            window_count,
            max_age_hours,
        }
    }

    pub fn window_minutes(&self) -> i64 {
        self.window_minutes
    }

    /// Append one aggregated window for `keyword` at `now`: `count` mentions
    /// this cycle, seen across `platforms`, with total `engagement`. Exactly
    /// one window is appended per call, evicting the oldest window once
    /// `window_count` is exceeded.
    pub fn record(
        &mut self,
        keyword: &str,
        count: u64,
        platforms: HashSet<Platform>,
        engagement: f64,
        now: DateTime<Utc>,
    ) {
        let history = self
            .histories
            .entry(keyword.to_string())
            .or_insert_with(|| KeywordHistory::new(now));

        history.windows.push(KeywordWindow {
            time: now,
            count,
            platforms,
            engagement,
        });
        if history.windows.len() > self.window_count {
            history.windows.remove(0);
        }

        // Recompute from the surviving windows rather than only comparing
        // against the new count — FIFO eviction above may have just dropped
        // the window that held the current peak.
        let peak = history
            .windows
            .iter()
            .max_by_key(|w| w.count)
            .expect("a window was just pushed");
        history.peak_count = peak.count;
        history.peak_time = peak.time;
    }

    pub fn history(&self, keyword: &str) -> Option<&KeywordHistory> {
        self.histories.get(keyword)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &String> {
        self.histories.keys()
    }

    /// Per-window counts in chronological order, for sparklines and burst
    /// detection.
    pub fn counts(&self, keyword: &str) -> Vec<u64> {
        self.histories
            .get(keyword)
            .map(|h| h.windows.iter().map(|w| w.count).collect())
            .unwrap_or_default()
    }

    /// Drop windows older than `max_age_hours`, and drop keywords left
    /// with no windows at all.
    pub fn cleanup(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::hours(self.max_age_hours);
        self.histories.retain(|_, history| {
            history.windows.retain(|w| w.time >= cutoff);
            !history.windows.is_empty()
        });
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        persist::write_json_atomic(path, &self.histories, false)
    }

    pub fn load(path: &Path, window_minutes: i64, window_count: usize, max_age_hours: i64) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::new(window_minutes, window_count, max_age_hours));
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;
        let histories: HashMap<String, KeywordHistory> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(Self {
            histories,
            window_minutes,
            window_count,
            max_age_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + minute * 60, 0).single().unwrap()
    }

    fn platforms(ps: &[Platform]) -> HashSet<Platform> {
        ps.iter().copied().collect()
    }

    #[test]
    fn record_appends_exactly_one_window_per_call() {
        let mut store = TimeSeriesStore::new(10, 144, 48);
        store.record("芯片", 7, platforms(&[Platform::Weibo, Platform::Bilibili]), 15.0, at(0));
        assert_eq!(store.counts("芯片"), vec![7]);
    }

    #[test]
    fn each_cycle_appends_its_own_window_regardless_of_elapsed_time() {
        let mut store = TimeSeriesStore::new(10, 144, 48);
        store.record("芯片", 3, platforms(&[Platform::Weibo]), 1.0, at(0));
        store.record("芯片", 4, platforms(&[Platform::Weibo]), 1.0, at(3));
        assert_eq!(store.counts("芯片"), vec![3, 4]);
    }

    #[test]
    fn window_count_is_capped_with_fifo_eviction() {
        let mut store = TimeSeriesStore::new(10, 3, 48);
        for i in 0..5 {
            store.record("热词", 1, platforms(&[Platform::Weibo]), 1.0, at(i * 10));
        }
        assert_eq!(store.counts("热词").len(), 3);
    }

    #[test]
    fn cleanup_drops_stale_keywords_entirely() {
        let mut store = TimeSeriesStore::new(10, 144, 1);
        store.record("旧词", 1, platforms(&[Platform::Weibo]), 1.0, at(0));
        store.cleanup(at(0) + Duration::hours(3));
        assert!(store.history("旧词").is_none());
    }

    #[test]
    fn peak_count_is_recomputed_after_the_peak_window_is_evicted() {
        let mut store = TimeSeriesStore::new(10, 3, 48);
        store.record("秒杀", 100, platforms(&[Platform::Weibo]), 1.0, at(0));
        store.record("秒杀", 1, platforms(&[Platform::Weibo]), 1.0, at(10));
        store.record("秒杀", 1, platforms(&[Platform::Weibo]), 1.0, at(20));
        store.record("秒杀", 1, platforms(&[Platform::Weibo]), 1.0, at(30));
        let history = store.history("秒杀").unwrap();
        assert_eq!(history.windows.len(), 3);
        assert_eq!(history.peak_count, 1);
    }

    #[test]
    fn peak_count_tracks_the_busiest_window() {
        let mut store = TimeSeriesStore::new(10, 144, 48);
        store.record("爆款", 5, platforms(&[Platform::Weibo]), 1.0, at(0));
        store.record("爆款", 2, platforms(&[Platform::Weibo]), 1.0, at(20));
        let history = store.history("爆款").unwrap();
        assert_eq!(history.peak_count, 5);
    }
}
