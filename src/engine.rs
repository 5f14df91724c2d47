//! The trend engine: owns the time-series store for the lifetime of one
//! process run and drives the sequential NLP → record → burst → score →
//! rank pipeline every cycle. Single-writer by construction — nothing else
//! holds a `&mut TimeSeriesStore` while a cycle is in flight.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::burst;
use crate::core::config::TrendScoutConfig;
use crate::core::types::{AlgorithmParams, Category, MacdSignal, Platform, RawContent, TrendTopic, TrendsFile};
use crate::heat::{self, HeatInputs};
use crate::nlp::{self, stopwords::is_stopword, tokenize::Tokenizer};
use crate::persist;
use crate::timeseries::TimeSeriesStore;

/// A tag counts twice toward a keyword's per-item token frequency, per
/// the engine cycle's "tag weight = 2" rule.
const TAG_WEIGHT: usize = 2;
/// Minimum token length kept even when the token misses the fused
/// batch-keyword set.
const FALLBACK_MIN_LEN: usize = 3;
/// A keyword needs at least this many mentions this cycle to survive.
const MIN_FREQUENCY: u64 = 2;

pub struct TrendEngine {
    store: TimeSeriesStore,
    tokenizer: Tokenizer,
    config: TrendScoutConfig,
    data_dir: PathBuf,
}

impl TrendEngine {
    pub fn new(config: TrendScoutConfig) -> Self {
        let data_dir = config.resolve_data_dir();
        let history_path = data_dir.join("keyword_history.json");
        let store = TimeSeriesStore::load(
            &history_path,
            config.timeseries.resolve_window_minutes(),
            config.timeseries.resolve_window_count(),
            config.timeseries.resolve_max_age_hours(),
        )
        .unwrap_or_else(|e| {
            tracing::warn!("keyword_history.json unreadable ({e}), starting fresh");
            TimeSeriesStore::new(
                config.timeseries.resolve_window_minutes(),
                config.timeseries.resolve_window_count(),
                config.timeseries.resolve_max_age_hours(),
            )
        });

        Self {
            store,
            tokenizer: Tokenizer::new(),
            config,
            data_dir,
        }
    }

    /// Run one full cycle over a batch of freshly crawled content: extract
    /// keywords, record them into the time series, score and rank the
    /// resulting topics, and persist both the updated store and the
    /// ranked trend list.
    ///
    /// An empty `items` batch short-circuits: no keywords are recorded, no
    /// files are written, and an empty topic list is returned — callers
    /// treat this as the semantic "zero raw items" case, not an error.
    pub async fn run_cycle(
        &mut self,
        items: Vec<RawContent>,
        keywords_per_item: usize,
        top_k: usize,
    ) -> anyhow::Result<Vec<TrendTopic>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let texts: Vec<String> = items
            .iter()
            .map(|item| nlp::clean(&format!("{} {}", item.title, item.text)))
            .collect();

        for (word, _pmi) in nlp::discover_new_words(&texts, self.tokenizer.dict()) {
            self.tokenizer.learn(word);
        }

        let fused_set = nlp::fusion::fused_keyword_set(&texts, &self.tokenizer, keywords_per_item);

        let mut keyword_titles: HashMap<String, Vec<String>> = HashMap::new();
        let mut keyword_platforms: HashMap<String, HashSet<Platform>> = HashMap::new();
        let mut keyword_engagement: HashMap<String, f64> = HashMap::new();
        let mut keyword_frequency: HashMap<String, u64> = HashMap::new();

        for (item, text) in items.iter().zip(texts.iter()) {
            let engagement = item.engagement_score();
            let mut tokens = self.tokenizer.segment(text);
            for tag in &item.tags {
                for _ in 0..TAG_WEIGHT {
                    tokens.push(tag.clone());
                }
            }

            let kept: Vec<String> = tokens
                .into_iter()
                .filter(|t| {
                    fused_set.contains(t) || (t.chars().count() >= FALLBACK_MIN_LEN && !is_stopword(t))
                })
                .collect();

            for keyword in kept {
                *keyword_frequency.entry(keyword.clone()).or_insert(0) += 1;
                keyword_titles
                    .entry(keyword.clone())
                    .or_default()
                    .push(item.title.clone());
                keyword_platforms
                    .entry(keyword.clone())
                    .or_default()
                    .insert(item.platform);
                *keyword_engagement.entry(keyword).or_insert(0.0) += engagement;
            }
        }

        keyword_frequency.retain(|_, freq| *freq >= MIN_FREQUENCY);
        keyword_titles.retain(|k, _| keyword_frequency.contains_key(k));
        keyword_platforms.retain(|k, _| keyword_frequency.contains_key(k));
        keyword_engagement.retain(|k, _| keyword_frequency.contains_key(k));

        let max_engagement = keyword_engagement
            .values()
            .copied()
            .fold(0.0_f64, f64::max)
            .max(1.0);

        for (keyword, frequency) in &keyword_frequency {
            let platforms = keyword_platforms.get(keyword).cloned().unwrap_or_default();
            let normalized_engagement =
                (*keyword_engagement.get(keyword).unwrap_or(&0.0) / max_engagement).min(1.0);
            self.store
                .record(keyword, *frequency, platforms, normalized_engagement, now);
        }

        self.store.cleanup(now);

        let z_threshold = self.config.scoring.resolve_z_threshold();
        let half_life = self.config.scoring.resolve_half_life_hours();
        let fast = self.config.scoring.resolve_macd_fast_period();
        let slow = self.config.scoring.resolve_macd_slow_period();
        let signal = self.config.scoring.resolve_macd_signal_period();
        let weights = (
            self.config.scoring.resolve_alpha(),
            self.config.scoring.resolve_beta(),
            self.config.scoring.resolve_gamma(),
            self.config.scoring.resolve_delta(),
        );

        let mut topics: Vec<TrendTopic> = keyword_frequency
            .keys()
            .filter_map(|keyword| {
                let history = self.store.history(keyword)?;
                let counts = self.store.counts(keyword);
                let z = burst::z_score(&counts);
                let is_burst = z > z_threshold;
                let accel = burst::acceleration(&counts);

                let (macd_value, macd_signal) = match burst::macd(&counts, fast, slow, signal) {
                    Some(m) => {
                        let signal_state = match m.cross() {
                            burst::MacdCross::Golden => MacdSignal::Bullish,
                            burst::MacdCross::Death => MacdSignal::Bearish,
                            burst::MacdCross::None => {
                                if m.macd_line > m.signal_line {
                                    MacdSignal::Bullish
                                } else if m.macd_line < m.signal_line {
                                    MacdSignal::Bearish
                                } else {
                                    MacdSignal::Neutral
                                }
                            }
                        };
                        (m.macd_line, signal_state)
                    }
                    None => (0.0, MacdSignal::Neutral),
                };

                let frequency = *keyword_frequency.get(keyword).unwrap_or(&0);
                let source_diversity = keyword_platforms.get(keyword).map(|s| s.len()).unwrap_or(1).max(1);
                let engagement = history.windows.last().map(|w| w.engagement).unwrap_or(0.0);
                let hours_since_peak = (now - history.peak_time).num_minutes() as f64 / 60.0;

                let heat_inputs = HeatInputs {
                    frequency,
                    hours_since_peak,
                    half_life_hours: half_life,
                    acceleration: accel,
                    source_diversity,
                    engagement,
                    is_burst,
                    macd_bullish: macd_signal == MacdSignal::Bullish,
                    weights,
                };
                let heat_score = heat::score(&heat_inputs);
                let direction = heat::trend_direction(&counts);

                let related_titles: Vec<String> = keyword_titles
                    .get(keyword)
                    .map(|t| t.iter().take(5).cloned().collect())
                    .unwrap_or_default();
                let category_text = format!("{} {}", keyword, related_titles.join(" "));
                let category: Category = heat::classify_category(&category_text);
                let platforms: Vec<Platform> = keyword_platforms
                    .get(keyword)
                    .map(|s| s.iter().copied().collect())
                    .unwrap_or_default();

                let sparkline: Vec<u64> = counts.iter().rev().take(20).rev().copied().collect();

                Some(TrendTopic {
                    keyword: keyword.clone(),
                    heat_score,
                    frequency,
                    acceleration: accel,
                    source_diversity,
                    engagement,
                    is_burst,
                    burst_z_score: z,
                    macd_signal,
                    macd_value,
                    trend_direction: direction,
                    platforms,
                    related_titles,
                    category,
                    sparkline,
                    first_seen: history.first_seen,
                    peak_time: history.peak_time,
                })
            })
            .collect();

        topics.sort_by(|a, b| {
            b.heat_score
                .partial_cmp(&a.heat_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        topics.truncate(top_k);

        let algorithm = AlgorithmParams {
            alpha: weights.0,
            beta: weights.1,
            gamma: weights.2,
            delta: weights.3,
            half_life_hours: half_life,
            z_threshold,
            macd_fast_period: fast,
            macd_slow_period: slow,
            macd_signal_period: signal,
        };
        self.persist(&topics, algorithm, now)?;

        info!(topics = topics.len(), "cycle scored and ranked");
        Ok(topics)
    }

    fn persist(
        &self,
        topics: &[TrendTopic],
        algorithm: AlgorithmParams,
        now: chrono::DateTime<Utc>,
    ) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        self.store.save(&self.data_dir.join("keyword_history.json"))?;
        let file = TrendsFile {
            update_time: now,
            total_trends: topics.len(),
            burst_count: topics.iter().filter(|t| t.is_burst).count(),
            algorithm,
            trends: topics.to_vec(),
        };
        persist::write_json_atomic(&self.data_dir.join("trends.json"), &file, true)?;
        Ok(())
    }
}
