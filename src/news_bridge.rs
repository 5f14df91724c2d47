//! Interface-only bridge to `data/news.json`: a shared file contract with
//! whatever aggregator already maintains that file (the original system's
//! news aggregator, not built here — see SPEC_FULL.md Non-goals). This
//! module only knows how to read existing entries and append synthetic
//! "discovered trend" entries; it never touches the aggregator itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::TrendTopic;
use crate::error::StoreError;
use crate::persist;

const SOURCE_LABEL: &str = "🔬 热点发现";

/// `data/news.json`'s top-level shape, owned by the external news
/// aggregator. Unknown fields round-trip through `extra` so this module
/// never clobbers state it doesn't understand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsFile {
    pub last_update: DateTime<Utc>,
    pub total: usize,
    #[serde(default)]
    pub sources: Vec<String>,
    pub items: Vec<Value>,
}

impl NewsFile {
    fn empty(now: DateTime<Utc>) -> Self {
        Self {
            last_update: now,
            total: 0,
            sources: Vec::new(),
            items: Vec::new(),
        }
    }
}

/// The `trend_data` sub-object carried by every synthetic entry this
/// module contributes to `news.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendData {
    pub heat_score: f64,
    pub frequency: u64,
    pub acceleration: f64,
    pub is_burst: bool,
    pub z_score: f64,
    pub macd_signal: String,
    pub direction: String,
    pub platforms: Vec<String>,
    /// The tail of the count series, capped at 20 samples.
    pub sparkline: Vec<u64>,
}

/// One synthetic entry this module contributes to `news.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendNewsItem {
    pub title: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub is_discovered_trend: bool,
    pub trend_data: TrendData,
}

impl TrendNewsItem {
    pub fn from_topic(topic: &TrendTopic, now: DateTime<Utc>) -> Self {
        let macd_signal = match topic.macd_signal {
            crate::core::types::MacdSignal::Bullish => "bullish",
            crate::core::types::MacdSignal::Bearish => "bearish",
            crate::core::types::MacdSignal::Neutral => "neutral",
        };
        Self {
            title: topic.keyword.clone(),
            source: SOURCE_LABEL.to_string(),
            published_at: now,
            is_discovered_trend: true,
            trend_data: TrendData {
                heat_score: topic.heat_score,
                frequency: topic.frequency,
                acceleration: topic.acceleration,
                is_burst: topic.is_burst,
                z_score: topic.burst_z_score,
                macd_signal: macd_signal.to_string(),
                direction: topic.trend_direction.as_glyph().to_string(),
                platforms: topic.platforms.iter().map(|p| p.as_str().to_string()).collect(),
                sparkline: topic.sparkline.iter().rev().take(20).rev().copied().collect(),
            },
        }
    }
}

/// Read `news.json`'s current contents, or an empty wrapper if the file
/// does not exist yet — the aggregator is out of scope, so the first
/// write this module ever makes may be the file's first write, period.
pub fn read_existing(path: &std::path::Path, now: DateTime<Utc>) -> Result<NewsFile, StoreError> {
    if !path.exists() {
        return Ok(NewsFile::empty(now));
    }
    let raw = std::fs::read_to_string(path).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Replace `news.json`'s entries with `source == SOURCE_LABEL` with a
/// fresh batch derived from `topics`, leaving every other entry in place.
pub fn publish(
    path: &std::path::Path,
    topics: &[TrendTopic],
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let mut file = read_existing(path, now)?;
    file.items
        .retain(|v| v.get("source").and_then(Value::as_str) != Some(SOURCE_LABEL));

    for topic in topics {
        let item = TrendNewsItem::from_topic(topic, now);
        let value = serde_json::to_value(item).map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        file.items.push(value);
    }

    file.last_update = now;
    file.total = file.items.len();
    if !file.sources.iter().any(|s| s == SOURCE_LABEL) {
        file.sources.push(SOURCE_LABEL.to_string());
    }

    persist::write_json_atomic(path, &file, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Category, MacdSignal, Platform, TrendDirection};

    fn sample_topic() -> TrendTopic {
        let now = Utc::now();
        TrendTopic {
            keyword: "人工智能".into(),
            heat_score: 88.5,
            frequency: 20,
            acceleration: 3.0,
            source_diversity: 3,
            engagement: 0.8,
            is_burst: true,
            burst_z_score: 3.1,
            macd_signal: MacdSignal::Bullish,
            macd_value: 1.2,
            trend_direction: TrendDirection::StrongUp,
            platforms: vec![Platform::Weibo, Platform::Bilibili],
            related_titles: vec!["人工智能突破".into()],
            category: Category::Tech,
            sparkline: vec![1, 2, 3],
            first_seen: now,
            peak_time: now,
        }
    }

    #[test]
    fn publish_writes_synthetic_entries_inside_the_object_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.json");
        publish(&path, &[sample_topic()], Utc::now()).unwrap();
        let file = read_existing(&path, Utc::now()).unwrap();
        assert_eq!(file.items.len(), 1);
        assert_eq!(file.total, 1);
        assert_eq!(file.items[0]["source"], SOURCE_LABEL);
        assert_eq!(file.items[0]["is_discovered_trend"], true);
        assert!(file.items[0]["trend_data"]["z_score"].is_number());
    }

    #[test]
    fn publish_preserves_non_trend_entries_and_replaces_old_trend_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.json");
        let manual_entry = serde_json::json!({"title": "手写新闻", "source": "编辑部"});
        let seeded = NewsFile {
            last_update: Utc::now(),
            total: 1,
            sources: vec!["编辑部".to_string()],
            items: vec![manual_entry.clone()],
        };
        std::fs::write(&path, serde_json::to_string(&seeded).unwrap()).unwrap();

        publish(&path, &[sample_topic()], Utc::now()).unwrap();
        let file = read_existing(&path, Utc::now()).unwrap();
        assert_eq!(file.items.len(), 2);
        assert!(file.items.contains(&manual_entry));

        publish(&path, &[sample_topic()], Utc::now()).unwrap();
        let file_again = read_existing(&path, Utc::now()).unwrap();
        assert_eq!(file_again.items.len(), 2);
    }
}
