//! Heat scoring: combine decayed frequency, acceleration, source
//! diversity, and engagement into the single 0-100 heat score that ranks
//! topics, plus the direction glyph and category label attached to each
//! `TrendTopic`.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

use crate::burst::decayed_value;
use crate::core::types::{Category, TrendDirection};

pub const ALPHA: f64 = 0.4;
pub const BETA: f64 = 0.3;
pub const GAMMA: f64 = 0.2;
pub const DELTA: f64 = 0.1;

const BURST_MULTIPLIER: f64 = 1.5;
const BULLISH_MULTIPLIER: f64 = 1.2;

#[derive(Clone)]
pub struct HeatInputs {
    /// `F` — this cycle's raw mention frequency for the keyword.
    pub frequency: u64,
    pub hours_since_peak: f64,
    pub half_life_hours: f64,
    /// `A` — discrete acceleration from `burst::acceleration`.
    pub acceleration: f64,
    /// `S` — number of distinct platforms the keyword was seen on.
    pub source_diversity: usize,
    /// `E` — already normalized into `[0, 1]` against the cycle's max
    /// engagement by the caller.
    pub engagement: f64,
    pub is_burst: bool,
    pub macd_bullish: bool,
    /// Term weights, normally `(ALPHA, BETA, GAMMA, DELTA)` but
    /// overridable via `ScoringConfig` for experimentation.
    pub weights: (f64, f64, f64, f64),
}

/// Compute the final 0-100 heat score for one topic. Uses fixed divisors
/// (10, 5, 3) rather than cycle-relative maxima — only `engagement` is
/// cycle-normalized, and that normalization happens upstream in
/// `engine::TrendEngine` before this function ever sees it.
pub fn score(inputs: &HeatInputs) -> f64 {
    let f_decayed = decayed_value(
        inputs.frequency as f64,
        inputs.hours_since_peak,
        inputs.half_life_hours,
    );
    let f_norm = (f_decayed / 10.0).min(10.0);
    let a_norm = (inputs.acceleration / 5.0).clamp(-5.0, 5.0);
    let s_norm = inputs.source_diversity as f64 / 3.0;
    let e_norm = inputs.engagement.min(1.0);
    let (alpha, beta, gamma, delta) = inputs.weights;

    let raw = alpha * f_norm + beta * a_norm.max(0.0) + gamma * s_norm + delta * e_norm;
    let mut heat = (raw * 15.0).min(100.0);

    if inputs.is_burst {
        heat *= BURST_MULTIPLIER;
    }
    if inputs.macd_bullish {
        heat *= BULLISH_MULTIPLIER;
    }

    heat = heat.min(100.0).max(0.0);
    (heat * 100.0).round() / 100.0
}

/// Direction glyph from the ratio of the last two bucket counts:
/// `r = (x[n-1] - x[n-2]) / max(x[n-2], 1)`. Fewer than two buckets
/// always reads as flat — there's no delta to compute yet.
pub fn trend_direction(counts: &[u64]) -> TrendDirection {
    let n = counts.len();
    if n < 2 {
        return TrendDirection::Flat;
    }
    let prev = counts[n - 2] as f64;
    let curr = counts[n - 1] as f64;
    let r = (curr - prev) / prev.max(1.0);

    if r > 0.5 {
        TrendDirection::StrongUp
    } else if r > 0.1 {
        TrendDirection::Up
    } else if r >= -0.1 {
        TrendDirection::Flat
    } else if r >= -0.5 {
        TrendDirection::Down
    } else {
        TrendDirection::StrongDown
    }
}

const FINANCE_TERMS: &[&str] = &["股市", "楼市", "房价", "人民币", "汇率", "黄金", "美联储", "央行", "基金", "通胀"];
const POLITICS_TERMS: &[&str] = &["两会", "外交部", "国务院", "人大", "政协", "政策", "中央", "总理", "主席"];
const TECH_TERMS: &[&str] = &["人工智能", "大模型", "芯片", "机器人", "自动驾驶", "元宇宙", "区块链", "算法", "科技"];
const INTERNATIONAL_TERMS: &[&str] = &["美国", "俄罗斯", "欧盟", "联合国", "中美", "日本", "韩国", "国际", "全球"];

static FINANCE_AC: Lazy<AhoCorasick> = Lazy::new(|| AhoCorasick::new(FINANCE_TERMS).unwrap());
static POLITICS_AC: Lazy<AhoCorasick> = Lazy::new(|| AhoCorasick::new(POLITICS_TERMS).unwrap());
static TECH_AC: Lazy<AhoCorasick> = Lazy::new(|| AhoCorasick::new(TECH_TERMS).unwrap());
static INTERNATIONAL_AC: Lazy<AhoCorasick> = Lazy::new(|| AhoCorasick::new(INTERNATIONAL_TERMS).unwrap());

/// Classify a keyword/title into a category via closed keyword sets,
/// checked in priority order: finance, politics, tech, international,
/// falling back to current-affairs. Each set is compiled into an
/// Aho-Corasick automaton so membership is a single scan rather than one
/// substring search per candidate term.
pub fn classify_category(text: &str) -> Category {
    if FINANCE_AC.is_match(text) {
        Category::Finance
    } else if POLITICS_AC.is_match(text) {
        Category::Politics
    } else if TECH_AC.is_match(text) {
        Category::Tech
    } else if INTERNATIONAL_AC.is_match(text) {
        Category::International
    } else {
        Category::CurrentAffairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> HeatInputs {
        HeatInputs {
            frequency: 50,
            hours_since_peak: 1.0,
            half_life_hours: 4.0,
            acceleration: 2.0,
            source_diversity: 3,
            engagement: 0.5,
            is_burst: false,
            macd_bullish: false,
            weights: (ALPHA, BETA, GAMMA, DELTA),
        }
    }

    #[test]
    fn score_is_clamped_to_100() {
        let big = HeatInputs {
            frequency: 1000,
            hours_since_peak: 0.0,
            acceleration: 50.0,
            source_diversity: 6,
            engagement: 1.0,
            is_burst: true,
            macd_bullish: true,
            ..inputs()
        };
        assert_eq!(score(&big), 100.0);
    }

    #[test]
    fn burst_multiplier_increases_score() {
        let base = inputs();
        let bursting = HeatInputs { is_burst: true, ..base.clone() };
        assert!(score(&bursting) >= score(&base));
    }

    #[test]
    fn bullish_multiplier_increases_score() {
        let base = inputs();
        let bullish = HeatInputs { macd_bullish: true, ..base.clone() };
        assert!(score(&bullish) >= score(&base));
    }

    #[test]
    fn cooling_factor_halves_after_one_half_life() {
        let decayed = decayed_value(80.0, 4.0, 4.0);
        assert!((decayed - 40.0).abs() < 1e-9);
    }

    #[test]
    fn score_is_never_negative_or_nan() {
        let zero = HeatInputs {
            frequency: 0,
            acceleration: -10.0,
            source_diversity: 0,
            engagement: 0.0,
            ..inputs()
        };
        let s = score(&zero);
        assert!(s >= 0.0 && !s.is_nan());
    }

    #[test]
    fn direction_strong_up_above_half_ratio() {
        assert_eq!(trend_direction(&[10, 30]), TrendDirection::StrongUp);
    }

    #[test]
    fn direction_up_between_tenth_and_half_ratio() {
        assert_eq!(trend_direction(&[10, 16]), TrendDirection::Up);
    }

    #[test]
    fn direction_flat_within_tenth_ratio() {
        assert_eq!(trend_direction(&[10, 10]), TrendDirection::Flat);
    }

    #[test]
    fn direction_strong_down_below_negative_half_ratio() {
        assert_eq!(trend_direction(&[20, 5]), TrendDirection::StrongDown);
    }

    #[test]
    fn direction_flat_when_fewer_than_two_points() {
        assert_eq!(trend_direction(&[7]), TrendDirection::Flat);
        assert_eq!(trend_direction(&[]), TrendDirection::Flat);
    }

    #[test]
    fn finance_keyword_classifies_as_finance() {
        assert_eq!(classify_category("今日股市大涨"), Category::Finance);
    }

    #[test]
    fn unmatched_text_falls_back_to_current_affairs() {
        assert_eq!(classify_category("小区猫咪走红"), Category::CurrentAffairs);
    }
}
