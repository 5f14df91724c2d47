//! Pure statistical functions over a keyword's bucket-count series: z-score
//! burst detection, EMA/MACD, Newton-cooling decay, and discrete
//! acceleration. No I/O, no shared state — every function takes its
//! series as a plain slice and returns a plain number, so `heat::score`
//! can compose them without owning a `TimeSeriesStore` reference.

const Z_THRESHOLD: f64 = 2.5;

fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

fn std_dev(series: &[f64], mean_val: f64) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let variance = series.iter().map(|v| (v - mean_val).powi(2)).sum::<f64>() / series.len() as f64;
    variance.sqrt()
}

/// Z-score of the latest observation against the series' own history
/// (excluding the latest point itself). Returns 0.0 when there isn't
/// enough history or the series has no variance.
pub fn z_score(series: &[u64]) -> f64 {
    if series.len() < 3 {
        return 0.0;
    }
    let (history, latest) = series.split_at(series.len() - 1);
    let history: Vec<f64> = history.iter().map(|&v| v as f64).collect();
    let m = mean(&history);
    let sd = std_dev(&history, m);
    (latest[0] as f64 - m) / sd.max(1.0)
}

pub fn is_burst(series: &[u64]) -> bool {
    z_score(series) > Z_THRESHOLD
}

/// Exponential moving average with the standard smoothing factor
/// `2 / (period + 1)`, seeded with `e[0] = x[0]` per spec §4.6's recursive
/// definition (not an SMA-seeded variant).
pub fn ema(series: &[f64], period: usize) -> Vec<f64> {
    if series.is_empty() || period == 0 {
        return Vec::new();
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut seed = series[0];
    let mut out = vec![seed];
    for &value in &series[1..] {
        seed = (value - seed) * k + seed;
        out.push(seed);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdCross {
    /// `d_prev <= 0 && d_curr > 0` — the histogram just turned positive.
    Golden,
    /// `d_prev >= 0 && d_curr < 0` — the histogram just turned negative.
    Death,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdResult {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
    /// The histogram value one period before `histogram`, when available —
    /// needed to tell a cross apart from merely being on one side of zero.
    pub prev_histogram: Option<f64>,
}

impl MacdResult {
    /// Golden/death cross per spec §4.6: compares `d_prev` (the histogram
    /// one period back) against `d_curr` (the current histogram), falling
    /// back to `None` when there's no prior point to compare against.
    pub fn cross(&self) -> MacdCross {
        match self.prev_histogram {
            Some(d_prev) if d_prev <= 0.0 && self.histogram > 0.0 => MacdCross::Golden,
            Some(d_prev) if d_prev >= 0.0 && self.histogram < 0.0 => MacdCross::Death,
            _ => MacdCross::None,
        }
    }
}

/// MACD over a count series using periods (fast, slow, signal) — default
/// (12, 26, 9). Returns `None` when the series is too short to compute a
/// slow EMA.
pub fn macd(series: &[u64], fast: usize, slow: usize, signal: usize) -> Option<MacdResult> {
    if series.len() < slow {
        return None;
    }
    let floats: Vec<f64> = series.iter().map(|&v| v as f64).collect();
    let fast_ema = ema(&floats, fast);
    let slow_ema = ema(&floats, slow);
    let len = fast_ema.len().min(slow_ema.len());
    let macd_series: Vec<f64> = (0..len)
        .map(|i| fast_ema[fast_ema.len() - len + i] - slow_ema[slow_ema.len() - len + i])
        .collect();
    let signal_series = ema(&macd_series, signal);
    let n = macd_series.len().min(signal_series.len());
    let histogram_series: Vec<f64> = (0..n)
        .map(|i| {
            macd_series[macd_series.len() - n + i] - signal_series[signal_series.len() - n + i]
        })
        .collect();
    let macd_line = *macd_series.last()?;
    let signal_line = *signal_series.last()?;
    let histogram = *histogram_series.last()?;
    let prev_histogram = if histogram_series.len() >= 2 {
        Some(histogram_series[histogram_series.len() - 2])
    } else {
        None
    };
    Some(MacdResult {
        macd_line,
        signal_line,
        histogram,
        prev_histogram,
    })
}

/// Newton-cooling decay of a peak value over `hours_since_peak`, with
/// half-life `half_life_hours`. `hours_since_peak` is clamped to 0 so a
/// topic that hasn't peaked yet (or just peaked) sees no decay.
pub fn decayed_value(peak: f64, hours_since_peak: f64, half_life_hours: f64) -> f64 {
    let lambda = std::f64::consts::LN_2 / half_life_hours;
    peak * (-lambda * hours_since_peak.max(0.0)).exp()
}

/// Discrete acceleration from a velocity (latest delta) and the delta of
/// deltas, per `0.6*v + 0.4*a`. With exactly two points there's a velocity
/// but no prior delta to compare it against, so the series' own velocity
/// is returned instead of zero.
pub fn acceleration(series: &[u64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }
    let v = series[n - 1] as f64 - series[n - 2] as f64;
    if n < 3 {
        return v;
    }
    let v_prev = series[n - 2] as f64 - series[n - 3] as f64;
    let a = v - v_prev;
    0.6 * v + 0.4 * a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_has_zero_zscore() {
        let series = vec![5, 5, 5, 5, 5];
        assert_eq!(z_score(&series), 0.0);
    }

    #[test]
    fn low_variance_series_uses_clamped_denominator() {
        // mean=5.25, sd≈0.433; with the raw-sd denominator z≈4.04 (a false
        // burst), but the spec's max(sd, 1) clamp gives z=1.75 (no burst).
        let series = vec![5, 5, 5, 6, 7];
        assert!((z_score(&series) - 1.75).abs() < 1e-9);
        assert!(!is_burst(&series));
    }

    #[test]
    fn sudden_spike_is_flagged_as_burst() {
        let series = vec![5, 6, 5, 4, 6, 5, 40];
        assert!(is_burst(&series));
    }

    #[test]
    fn steady_growth_does_not_trigger_burst() {
        let series = vec![5, 6, 7, 8, 9, 10, 11];
        assert!(!is_burst(&series));
    }

    #[test]
    fn ema_seed_equals_first_point() {
        let series = vec![10.0, 20.0, 30.0];
        let result = ema(&series, 3);
        assert_eq!(result[0], 10.0);
    }

    #[test]
    fn macd_is_none_below_slow_period() {
        let series: Vec<u64> = (0..10).collect();
        assert!(macd(&series, 12, 26, 9).is_none());
    }

    #[test]
    fn macd_detects_upward_trend_as_positive_histogram() {
        let series: Vec<u64> = (0..40).map(|i| i * 2).collect();
        let result = macd(&series, 12, 26, 9).unwrap();
        assert!(result.macd_line > 0.0);
    }

    #[test]
    fn decay_halves_after_one_half_life() {
        let decayed = decayed_value(100.0, 4.0, 4.0);
        assert!((decayed - 50.0).abs() < 1e-9);
    }

    #[test]
    fn decay_is_clamped_for_negative_hours() {
        assert_eq!(decayed_value(100.0, -5.0, 4.0), 100.0);
    }

    #[test]
    fn acceleration_is_zero_below_two_points() {
        assert_eq!(acceleration(&[1]), 0.0);
        assert_eq!(acceleration(&[]), 0.0);
    }

    #[test]
    fn acceleration_with_two_points_is_plain_velocity() {
        assert_eq!(acceleration(&[1, 5]), 4.0);
    }

    #[test]
    fn acceleration_reflects_increasing_velocity() {
        let series = vec![1, 2, 4, 8];
        let accel = acceleration(&series);
        assert!(accel > 0.0);
    }

    #[test]
    fn golden_cross_detected_when_histogram_turns_positive() {
        let declining_then_rising: Vec<u64> = (0..30)
            .map(|i| if i < 20 { 30 - i } else { i })
            .collect();
        if let Some(result) = macd(&declining_then_rising, 12, 26, 9) {
            // Not asserting a specific cross here (depends on smoothing
            // lag) — just that `cross()` doesn't panic and is consistent
            // with the sign relationship it's defined over.
            match result.cross() {
                MacdCross::Golden => assert!(result.histogram > 0.0),
                MacdCross::Death => assert!(result.histogram < 0.0),
                MacdCross::None => {}
            }
        }
    }
}
