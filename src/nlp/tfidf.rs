//! TF-IDF keyword scoring, per spec §4.4's `extract_tfidf(text, k)`
//! contract: a single text is split into sentence-level pseudo-documents
//! so IDF has something to discount against, then every term's score is
//! its aggregate TF-IDF (summed across the sentences it appears in),
//! ranked descending. A term common across most of a text's sentences
//! (boilerplate, generic chatter) is suppressed even without a stopword
//! entry for it.

use std::collections::{HashMap, HashSet};

use super::tokenize::Tokenizer;

/// Term frequency for one document, by raw count normalized by doc length.
fn term_frequencies(tokens: &[String]) -> HashMap<&str, f64> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for t in tokens {
        *counts.entry(t.as_str()).or_insert(0) += 1;
    }
    let total = tokens.len().max(1) as f64;
    counts.into_iter().map(|(k, v)| (k, v as f64 / total)).collect()
}

fn inverse_document_frequencies<'a>(docs: &'a [Vec<String>]) -> HashMap<&'a str, f64> {
    let n = docs.len().max(1) as f64;
    let mut doc_count: HashMap<&str, u32> = HashMap::new();
    for doc in docs {
        let unique: HashSet<&str> = doc.iter().map(|s| s.as_str()).collect();
        for term in unique {
            *doc_count.entry(term).or_insert(0) += 1;
        }
    }
    doc_count
        .into_iter()
        .map(|(term, df)| (term, (n / (1.0 + df as f64)).ln() + 1.0))
        .collect()
}

/// Score a batch of pre-tokenized pseudo-documents by aggregate TF-IDF
/// (summed across every document a term appears in). The sentence-split
/// machinery lives here so both `extract_tfidf` and tests can exercise it
/// directly against already-tokenized input.
fn score_token_docs(docs: &[Vec<String>]) -> HashMap<String, f64> {
    let idf = inverse_document_frequencies(docs);
    let mut scores: HashMap<String, f64> = HashMap::new();
    for doc in docs {
        for (term, tf_val) in term_frequencies(doc) {
            let idf_val = idf.get(term).copied().unwrap_or(1.0);
            *scores.entry(term.to_string()).or_insert(0.0) += tf_val * idf_val;
        }
    }
    scores
}

/// Split `text` into sentence-level spans on terminal punctuation/newlines
/// — the pseudo-document unit TF-IDF's IDF term is computed over, since a
/// single text otherwise has no document frequency to speak of.
fn split_sentences(text: &str) -> Vec<&str> {
    text.split(|c: char| matches!(c, '。' | '！' | '？' | '\n' | '.' | '!' | '?' | '；' | ';'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Top-`top_k` `(word, weight)` pairs by aggregate TF-IDF over `text`,
/// descending. `text` is split into sentence-level pseudo-documents so
/// document frequency has meaning even for a single crawled item.
pub fn extract_tfidf(text: &str, tokenizer: &Tokenizer, top_k: usize) -> Vec<(String, f64)> {
    let docs: Vec<Vec<String>> = split_sentences(text)
        .into_iter()
        .map(|sentence| tokenizer.segment(sentence))
        .filter(|doc| !doc.is_empty())
        .collect();
    if docs.is_empty() {
        return Vec::new();
    }
    let mut ranked: Vec<(String, f64)> = score_token_docs(&docs).into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rare_term_outranks_ubiquitous_term() {
        let docs = vec![
            vec!["芯片".to_string(), "突破".to_string(), "芯片".to_string()],
            vec!["突破".to_string(), "股市".to_string()],
            vec!["突破".to_string(), "楼市".to_string()],
        ];
        let scores = score_token_docs(&docs);
        assert!(scores["芯片"] > scores["突破"]);
    }

    #[test]
    fn top_k_is_respected() {
        let tokenizer = Tokenizer::new();
        let scored = extract_tfidf("今日股市大涨。楼市同步走高。汇率保持平稳。", &tokenizer, 2);
        assert_eq!(scored.len(), 2);
    }

    #[test]
    fn empty_text_yields_empty_scores() {
        let tokenizer = Tokenizer::new();
        assert!(extract_tfidf("", &tokenizer, 5).is_empty());
    }

    #[test]
    fn single_sentence_text_still_scores_by_term_frequency() {
        let tokenizer = Tokenizer::new();
        let scored = extract_tfidf("人工智能大模型持续爆火人工智能", &tokenizer, 5);
        assert!(scored.iter().any(|(w, _)| w == "人工智能"));
    }
}
