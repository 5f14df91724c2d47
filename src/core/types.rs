use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six platforms sampled each cycle. Matches the `--platforms` CSV enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Douyin,
    Xiaohongshu,
    Weibo,
    Bilibili,
    Zhihu,
    Baidu,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Douyin => "douyin",
            Platform::Xiaohongshu => "xiaohongshu",
            Platform::Weibo => "weibo",
            Platform::Bilibili => "bilibili",
            Platform::Zhihu => "zhihu",
            Platform::Baidu => "baidu",
        }
    }

    pub fn all() -> [Platform; 6] {
        [
            Platform::Douyin,
            Platform::Xiaohongshu,
            Platform::Weibo,
            Platform::Bilibili,
            Platform::Zhihu,
            Platform::Baidu,
        ]
    }
}

impl std::str::FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "douyin" => Ok(Platform::Douyin),
            "xiaohongshu" => Ok(Platform::Xiaohongshu),
            "weibo" => Ok(Platform::Weibo),
            "bilibili" => Ok(Platform::Bilibili),
            "zhihu" => Ok(Platform::Zhihu),
            "baidu" => Ok(Platform::Baidu),
            other => anyhow::bail!("unknown platform: {other}"),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The eight content shapes a platform response can normalize to, per
/// spec §3. `Search` covers autosuggest/search-result entries, `Topic`
/// covers ranked hot-board entries, `Status` covers micro-blog posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Video,
    Note,
    Article,
    Answer,
    Question,
    Topic,
    Search,
    Status,
}

/// A single piece of sampled content, uniform across all six platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawContent {
    pub platform: Platform,
    pub content_id: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    pub pub_time: DateTime<Utc>,
    pub crawl_time: DateTime<Utc>,
    pub content_type: ContentType,
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl RawContent {
    /// `likes + 3*comments + 5*shares + 0.01*views` per spec §3.
    pub fn engagement_score(&self) -> f64 {
        self.likes as f64
            + 3.0 * self.comments as f64
            + 5.0 * self.shares as f64
            + 0.01 * self.views as f64
    }
}

/// One 10-minute bucket of observations for a keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordWindow {
    pub time: DateTime<Utc>,
    pub count: u64,
    pub platforms: HashSet<Platform>,
    pub engagement: f64,
}

/// Sliding 24h window (144 x 10min buckets) of observations for a keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordHistory {
    pub windows: Vec<KeywordWindow>,
    pub first_seen: DateTime<Utc>,
    pub peak_count: u64,
    pub peak_time: DateTime<Utc>,
}

impl KeywordHistory {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            windows: Vec::new(),
            first_seen: now,
            peak_count: 0,
            peak_time: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdSignal {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    #[serde(rename = "↑")]
    StrongUp,
    #[serde(rename = "↗")]
    Up,
    #[serde(rename = "→")]
    Flat,
    #[serde(rename = "↘")]
    Down,
    #[serde(rename = "↓")]
    StrongDown,
}

impl TrendDirection {
    pub fn as_glyph(&self) -> &'static str {
        match self {
            TrendDirection::StrongUp => "↑",
            TrendDirection::Up => "↗",
            TrendDirection::Flat => "→",
            TrendDirection::Down => "↘",
            TrendDirection::StrongDown => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "财经")]
    Finance,
    #[serde(rename = "政治")]
    Politics,
    #[serde(rename = "科技")]
    Tech,
    #[serde(rename = "国际")]
    International,
    #[serde(rename = "时事")]
    CurrentAffairs,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Finance => "财经",
            Category::Politics => "政治",
            Category::Tech => "科技",
            Category::International => "国际",
            Category::CurrentAffairs => "时事",
        }
    }
}

/// A ranked, scored emerging topic, the final output unit of a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendTopic {
    pub keyword: String,
    pub heat_score: f64,
    pub frequency: u64,
    pub acceleration: f64,
    pub source_diversity: usize,
    pub engagement: f64,
    pub is_burst: bool,
    pub burst_z_score: f64,
    pub macd_signal: MacdSignal,
    pub macd_value: f64,
    pub trend_direction: TrendDirection,
    pub platforms: Vec<Platform>,
    pub related_titles: Vec<String>,
    pub category: Category,
    pub sparkline: Vec<u64>,
    pub first_seen: DateTime<Utc>,
    pub peak_time: DateTime<Utc>,
}

/// The scoring constants in effect for a cycle, echoed into `trends.json`
/// so a reader can tell which parameters produced a given ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
    pub half_life_hours: f64,
    pub z_threshold: f64,
    pub macd_fast_period: usize,
    pub macd_slow_period: usize,
    pub macd_signal_period: usize,
}

/// `raw_<timestamp>.json`'s top-level shape per spec §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSnapshotFile {
    pub crawl_time: DateTime<Utc>,
    pub total: usize,
    pub items: Vec<RawContent>,
}

/// `trends.json`'s top-level shape per spec §4.7/§6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsFile {
    pub update_time: DateTime<Utc>,
    pub total_trends: usize,
    pub burst_count: usize,
    pub algorithm: AlgorithmParams,
    pub trends: Vec<TrendTopic>,
}
