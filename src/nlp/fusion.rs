//! Keyword fusion, per spec §4.4's `batch_extract(texts, k)` contract:
//! concatenate a cycle's cleaned texts into one corpus, score it with
//! TF-IDF and TextRank each at `2k`, then fuse: `score(w) = tfidf(w) +
//! textrank(w)`, boosted ×1.5 when a term appears in both algorithms' top
//! sets — agreement between a corpus-relative statistic and a
//! graph-centrality statistic is a stronger signal than either alone.
//! Returns one ranked list for the whole batch, not one per document.

use std::collections::HashSet;

use super::textrank::extract_textrank;
use super::tfidf::extract_tfidf;
use super::tokenize::Tokenizer;

const AGREEMENT_BOOST: f64 = 1.5;

/// Fuse TF-IDF and TextRank rankings over the whole batch's concatenated
/// text, returning the top `top_k` `(word, weight)` pairs by fused score,
/// descending.
pub fn batch_extract(texts: &[String], tokenizer: &Tokenizer, top_k: usize) -> Vec<(String, f64)> {
    let corpus = texts.join("。");
    let tfidf_ranked = extract_tfidf(&corpus, tokenizer, top_k * 2);
    let textrank_ranked = extract_textrank(&corpus, tokenizer, top_k * 2);
    fuse(tfidf_ranked, textrank_ranked, top_k)
}

/// The cycle-wide fused keyword set used to decide which tokens in a given
/// item are worth keeping once the corpus-relative TF-IDF/TextRank pass
/// has run over the whole batch.
pub fn fused_keyword_set(texts: &[String], tokenizer: &Tokenizer, top_k: usize) -> HashSet<String> {
    batch_extract(texts, tokenizer, top_k)
        .into_iter()
        .map(|(w, _)| w)
        .collect()
}

fn fuse(
    tfidf_ranked: Vec<(String, f64)>,
    textrank_ranked: Vec<(String, f64)>,
    top_k: usize,
) -> Vec<(String, f64)> {
    use std::collections::HashMap;

    let tfidf_set: HashMap<&str, f64> = tfidf_ranked
        .iter()
        .map(|(w, s)| (w.as_str(), *s))
        .collect();
    let textrank_set: HashMap<&str, f64> = textrank_ranked
        .iter()
        .map(|(w, s)| (w.as_str(), *s))
        .collect();

    let mut combined: HashMap<String, f64> = HashMap::new();
    for (word, score) in tfidf_set.iter() {
        *combined.entry(word.to_string()).or_insert(0.0) += score;
    }
    for (word, score) in textrank_set.iter() {
        *combined.entry(word.to_string()).or_insert(0.0) += score;
    }
    for (word, total) in combined.iter_mut() {
        if tfidf_set.contains_key(word.as_str()) && textrank_set.contains_key(word.as_str()) {
            *total *= AGREEMENT_BOOST;
        }
    }

    let mut ranked: Vec<(String, f64)> = combined.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_in_both_rankings_gets_boosted() {
        let tfidf = vec![("芯片".to_string(), 1.0), ("股市".to_string(), 0.5)];
        let textrank = vec![("芯片".to_string(), 1.0), ("楼市".to_string(), 0.4)];
        let fused = fuse(tfidf, textrank, 5);
        let chip_score = fused.iter().find(|(w, _)| w == "芯片").unwrap().1;
        assert_eq!(chip_score, (1.0 + 1.0) * AGREEMENT_BOOST);
    }

    #[test]
    fn fusion_ordering_invariant_holds() {
        // Any keyword present in both top sets must score at least the
        // sum of its individual scores (the boost only ever multiplies
        // by something >= 1).
        let tfidf = vec![("芯片".to_string(), 0.8), ("股市".to_string(), 0.3)];
        let textrank = vec![("芯片".to_string(), 0.6)];
        let fused = fuse(tfidf.clone(), textrank.clone(), 5);
        let chip_fused = fused.iter().find(|(w, _)| w == "芯片").unwrap().1;
        let chip_sum = 0.8 + 0.6;
        assert!(chip_fused >= chip_sum - 1e-9);
    }

    #[test]
    fn batch_extract_returns_one_ranked_list_for_the_whole_batch() {
        let tokenizer = Tokenizer::new();
        let texts = vec![
            "人工智能大模型持续爆火".to_string(),
            "人工智能引发广泛讨论".to_string(),
            "新能源汽车销量创新高".to_string(),
        ];
        let fused = batch_extract(&texts, &tokenizer, 5);
        assert!(!fused.is_empty());
        assert!(fused.iter().any(|(w, _)| w == "人工智能"));
    }

    #[test]
    fn fused_keyword_set_is_a_flat_set_of_words() {
        let tokenizer = Tokenizer::new();
        let texts = vec!["芯片产业迎来新一轮爆发".to_string()];
        let set = fused_keyword_set(&texts, &tokenizer, 5);
        assert!(set.contains("芯片"));
    }
}
