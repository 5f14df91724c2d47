//! PMI-based new-word discovery, per spec §4.4's `discover_new_words(texts,
//! min_freq=3, max_len=6)` contract: count every character n-gram of
//! length 2..=max_len over CJK-only character streams, keep grams seen at
//! least `min_freq` times that the segmenter doesn't already treat as a
//! single dictionary word, score the survivors by pointwise mutual
//! information, keep those above the threshold, and return the top 50 by
//! raw frequency (not PMI) — PMI here is a filter, frequency is the rank.

use std::collections::{HashMap, HashSet};

use super::stopwords::is_stopword;

const PMI_THRESHOLD: f64 = 2.0;
const DEFAULT_MIN_FREQ: u64 = 3;
const DEFAULT_MAX_LEN: usize = 6;
const TOP_N: usize = 50;
/// Additive smoothing term folded into the PMI score, per spec's
/// `PMI = log(p_joint / prod(p_char)) + epsilon`.
const EPSILON: f64 = 1e-6;

fn is_cjk(c: char) -> bool {
    matches!(c as u32, 0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF)
}

/// Discover candidate new words across a batch of cleaned texts (one
/// crawl cycle's worth) that `known_words` (the tokenizer's current
/// dictionary) does not already treat as a single token.
pub fn discover_new_words(texts: &[String], known_words: &HashSet<String>) -> Vec<(String, f64)> {
    discover_new_words_with(texts, known_words, DEFAULT_MIN_FREQ, DEFAULT_MAX_LEN)
}

/// Same as [`discover_new_words`] with explicit `min_freq`/`max_len`.
pub fn discover_new_words_with(
    texts: &[String],
    known_words: &HashSet<String>,
    min_freq: u64,
    max_len: usize,
) -> Vec<(String, f64)> {
    let runs: Vec<Vec<char>> = texts
        .iter()
        .flat_map(|t| cjk_runs(t))
        .filter(|run| run.len() >= 2)
        .collect();

    let mut unigram: HashMap<char, u64> = HashMap::new();
    let mut total_chars = 0u64;
    for run in &runs {
        for &c in run {
            *unigram.entry(c).or_insert(0) += 1;
            total_chars += 1;
        }
    }
    if total_chars == 0 {
        return Vec::new();
    }

    // Count every n-gram of length 2..=max_len as a sliding window over
    // each CJK run, independently per length class (each length class
    // gets its own "total windows of that length" denominator).
    let mut gram_counts: HashMap<String, u64> = HashMap::new();
    let mut totals_by_len: HashMap<usize, u64> = HashMap::new();
    for run in &runs {
        for len in 2..=max_len.max(2) {
            if run.len() < len {
                continue;
            }
            for window in run.windows(len) {
                let gram: String = window.iter().collect();
                *gram_counts.entry(gram).or_insert(0) += 1;
                *totals_by_len.entry(len).or_insert(0) += 1;
            }
        }
    }

    let p_char = |c: char| -> f64 { *unigram.get(&c).unwrap_or(&1) as f64 / total_chars as f64 };

    let mut ranked: Vec<(String, u64, f64)> = Vec::new();
    for (gram, count) in gram_counts {
        if count < min_freq {
            continue;
        }
        if known_words.contains(&gram) || is_stopword(&gram) {
            continue;
        }
        let len = gram.chars().count();
        let total_len_windows = *totals_by_len.get(&len).unwrap_or(&1) as f64;
        let p_joint = count as f64 / total_len_windows;
        let product_p_char: f64 = gram.chars().map(p_char).product();
        if product_p_char == 0.0 {
            continue;
        }
        let pmi = (p_joint / product_p_char).ln() + EPSILON;
        if pmi > PMI_THRESHOLD {
            ranked.push((gram, count, pmi));
        }
    }

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal)));
    ranked.truncate(TOP_N);
    ranked.into_iter().map(|(gram, _count, pmi)| (gram, pmi)).collect()
}

fn cjk_runs(text: &str) -> Vec<Vec<char>> {
    let mut runs = Vec::new();
    let mut buf = Vec::new();
    for c in text.chars() {
        if is_cjk(c) {
            buf.push(c);
        } else if !buf.is_empty() {
            runs.push(std::mem::take(&mut buf));
        }
    }
    if !buf.is_empty() {
        runs.push(buf);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_known_words() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn frequent_cooccurring_gram_is_discovered() {
        let texts = vec![
            "量子霸权成为焦点".to_string(),
            "量子霸权引发讨论".to_string(),
            "科学家谈量子霸权".to_string(),
            "量子霸权再登热搜".to_string(),
        ];
        let discovered = discover_new_words(&texts, &no_known_words());
        assert!(discovered.iter().any(|(w, _)| w.contains("量子")));
    }

    #[test]
    fn below_min_freq_grams_are_dropped() {
        let texts = vec!["独一无二的孤例短语".to_string()];
        let discovered = discover_new_words(&texts, &no_known_words());
        assert!(discovered.iter().all(|(w, _)| w != "孤例"));
    }

    #[test]
    fn already_known_words_are_excluded() {
        let texts = vec!["量子霸权".to_string(); 5];
        let mut known = HashSet::new();
        known.insert("量子霸权".to_string());
        let discovered = discover_new_words(&texts, &known);
        assert!(discovered.iter().all(|(w, _)| w != "量子霸权"));
    }

    #[test]
    fn empty_corpus_yields_no_candidates() {
        assert!(discover_new_words(&[], &no_known_words()).is_empty());
    }

    #[test]
    fn stopword_grams_are_excluded() {
        let texts = vec!["的了的了的了".to_string(); 5];
        let discovered = discover_new_words(&texts, &no_known_words());
        assert!(discovered.iter().all(|(w, _)| w != "的了"));
    }

    #[test]
    fn result_is_capped_at_top_50() {
        let mut texts = Vec::new();
        for i in 0..80 {
            let c1 = char::from_u32(0x4E00 + (i * 2)).unwrap();
            let c2 = char::from_u32(0x4E01 + (i * 2)).unwrap();
            let phrase: String = [c1, c2, c1, c2, c1, c2].iter().collect();
            texts.push(phrase);
        }
        let discovered = discover_new_words_with(&texts, &no_known_words(), 1, 2);
        assert!(discovered.len() <= 50);
    }
}
