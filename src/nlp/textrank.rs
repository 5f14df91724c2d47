//! TextRank keyword extraction: build a co-occurrence graph over a sliding
//! window (width 5, per spec §4.4) and rank terms by the standard PageRank
//! power iteration over that graph.

use std::collections::{HashMap, HashSet};

use super::tokenize::Tokenizer;

const WINDOW: usize = 5;
const DAMPING: f64 = 0.85;
const ITERATIONS: usize = 30;
const CONVERGENCE: f64 = 1e-5;

/// Top-`top_k` `(word, weight)` pairs by TextRank over `text`, per spec
/// §4.4's `extract_textrank(text, k)` contract: tokenize, then rank by the
/// standard PageRank power iteration over a co-occurrence graph built with
/// a sliding window of 5.
pub fn extract_textrank(text: &str, tokenizer: &Tokenizer, top_k: usize) -> Vec<(String, f64)> {
    rank_tokens(&tokenizer.segment(text), top_k)
}

/// Rank an already-tokenized document and return the top `top_k` by
/// TextRank weight, descending.
pub fn rank_tokens(tokens: &[String], top_k: usize) -> Vec<(String, f64)> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let vocab: Vec<&str> = tokens
        .iter()
        .map(|t| t.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let index: HashMap<&str, usize> = vocab.iter().enumerate().map(|(i, &w)| (w, i)).collect();

    let mut edges: Vec<HashMap<usize, f64>> = vec![HashMap::new(); vocab.len()];
    for i in 0..tokens.len() {
        let a = index[tokens[i].as_str()];
        for j in (i + 1)..tokens.len().min(i + WINDOW) {
            let b = index[tokens[j].as_str()];
            if a == b {
                continue;
            }
            *edges[a].entry(b).or_insert(0.0) += 1.0;
            *edges[b].entry(a).or_insert(0.0) += 1.0;
        }
    }

    let n = vocab.len();
    let mut scores = vec![1.0 / n as f64; n];
    for _ in 0..ITERATIONS {
        let mut next = vec![(1.0 - DAMPING) / n as f64; n];
        let mut delta = 0.0;
        for (node, neighbors) in edges.iter().enumerate() {
            let out_weight: f64 = neighbors.values().sum();
            if out_weight == 0.0 {
                continue;
            }
            for (&neighbor, &weight) in neighbors {
                next[neighbor] += DAMPING * scores[node] * (weight / out_weight);
            }
        }
        for i in 0..n {
            delta += (next[i] - scores[i]).abs();
        }
        scores = next;
        if delta < CONVERGENCE {
            break;
        }
    }

    let mut ranked: Vec<(String, f64)> = vocab
        .into_iter()
        .zip(scores)
        .map(|(w, s)| (w.to_string(), s))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn central_term_ranks_highest() {
        let tokens = toks(&["芯片", "突破", "芯片", "技术", "芯片", "产业", "芯片", "出口"]);
        let ranked = rank_tokens(&tokens, 3);
        assert_eq!(ranked[0].0, "芯片");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(rank_tokens(&[], 5).is_empty());
    }

    #[test]
    fn single_token_ranks_itself() {
        let tokens = toks(&["孤独"]);
        let ranked = rank_tokens(&tokens, 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, "孤独");
    }

    #[test]
    fn text_wrapper_tokenizes_then_ranks() {
        let tokenizer = Tokenizer::new();
        let ranked = extract_textrank("人工智能大模型发布，人工智能引发热议", &tokenizer, 3);
        assert!(ranked.iter().any(|(w, _)| w == "人工智能"));
    }

    #[test]
    fn text_wrapper_empty_text_yields_empty_output() {
        let tokenizer = Tokenizer::new();
        assert!(extract_textrank("", &tokenizer, 5).is_empty());
    }
}
