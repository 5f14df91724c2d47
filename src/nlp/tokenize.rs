//! Forward maximum-matching segmentation over a mutable dictionary, the
//! explicit fallback contract spec §4.4 describes for implementations
//! without a native CJK segmenter available. Seeded with the ~40-term
//! domain lexicon (`nlp::lexicon::DOMAIN_LEXICON`) and growable at runtime
//! via `Tokenizer::learn` (the PMI new-word discoverer in `newwords.rs`
//! feeds back into this).

use std::collections::HashSet;

use super::lexicon::DOMAIN_LEXICON;
use super::stopwords::is_stopword;

/// Longest dictionary entry, in characters — bounds the max-matching
/// window so segmentation stays O(n * max_word_len) rather than O(n^2).
const MAX_WORD_CHARS: usize = 6;

pub struct Tokenizer {
    dict: HashSet<String>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            dict: DOMAIN_LEXICON.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn learn(&mut self, word: impl Into<String>) {
        self.dict.insert(word.into());
    }

    /// The tokenizer's current dictionary, lexicon terms plus anything
    /// learned via [`Tokenizer::learn`] — used by `newwords::discover_new_words`
    /// to skip candidates the segmenter already treats as a single word.
    pub fn dict(&self) -> &HashSet<String> {
        &self.dict
    }

    /// Segment `text` into tokens of at least `min_len` characters,
    /// filtering stopwords, purely numeric tokens, and empty strings.
    pub fn segment_min_len(&self, text: &str, min_len: usize) -> Vec<String> {
        let mut tokens = Vec::new();
        for run in split_script_runs(text) {
            match run {
                Run::Cjk(chars) => tokens.extend(self.max_match(&chars)),
                Run::Latin(word) => {
                    let lower = word.to_lowercase();
                    if !lower.is_empty() {
                        tokens.push(lower);
                    }
                }
            }
        }
        tokens
            .into_iter()
            .filter(|t| {
                !t.is_empty()
                    && t.chars().count() >= min_len
                    && !is_stopword(t)
                    && !t.chars().all(|c| c.is_ascii_digit())
            })
            .collect()
    }

    /// Segment with the default minimum token length of 2.
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.segment_min_len(text, 2)
    }

    /// Forward maximum matching over a single run of CJK characters.
    fn max_match(&self, chars: &[char]) -> Vec<String> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let max_len = MAX_WORD_CHARS.min(chars.len() - i);
            let mut matched = None;
            for len in (2..=max_len).rev() {
                let candidate: String = chars[i..i + len].iter().collect();
                if self.dict.contains(&candidate) {
                    matched = Some(candidate);
                    break;
                }
            }
            match matched {
                Some(word) => {
                    let consumed = word.chars().count();
                    out.push(word);
                    i += consumed;
                }
                None => {
                    out.push(chars[i].to_string());
                    i += 1;
                }
            }
        }
        out
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

enum Run {
    Cjk(Vec<char>),
    Latin(String),
}

fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF
    )
}

fn split_script_runs(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut cjk_buf: Vec<char> = Vec::new();
    let mut latin_buf = String::new();

    for c in text.chars() {
        if is_cjk(c) {
            if !latin_buf.is_empty() {
                runs.push(Run::Latin(std::mem::take(&mut latin_buf)));
            }
            cjk_buf.push(c);
        } else if c.is_alphanumeric() {
            if !cjk_buf.is_empty() {
                runs.push(Run::Cjk(std::mem::take(&mut cjk_buf)));
            }
            latin_buf.push(c);
        } else {
            if !cjk_buf.is_empty() {
                runs.push(Run::Cjk(std::mem::take(&mut cjk_buf)));
            }
            if !latin_buf.is_empty() {
                runs.push(Run::Latin(std::mem::take(&mut latin_buf)));
            }
        }
    }
    if !cjk_buf.is_empty() {
        runs.push(Run::Cjk(cjk_buf));
    }
    if !latin_buf.is_empty() {
        runs.push(Run::Latin(latin_buf));
    }
    runs
}

/// Tokenize with a fresh default tokenizer (lexicon-seeded, no learned
/// words) and the default minimum token length of 2. Most callers that
/// need PMI-discovered words registered should construct their own
/// `Tokenizer` and call `segment` directly.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::new().segment(text)
}

/// Tokenize with an explicit minimum token length.
pub fn tokenize_min_len(text: &str, min_len: usize) -> Vec<String> {
    Tokenizer::new().segment_min_len(text, min_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_terms_survive_as_single_tokens() {
        let tokens = tokenize("最新人工智能大模型发布");
        assert!(tokens.contains(&"人工智能".to_string()));
        assert!(tokens.contains(&"大模型".to_string()));
    }

    #[test]
    fn single_char_fallback_tokens_are_dropped_below_min_len() {
        let tokens = tokenize("喵喵喵");
        assert!(tokens.is_empty());
    }

    #[test]
    fn purely_numeric_tokens_are_filtered() {
        let tokens = tokenize("2024 人工智能");
        assert!(!tokens.iter().any(|t| t == "2024"));
        assert!(tokens.contains(&"人工智能".to_string()));
    }

    #[test]
    fn stopwords_are_filtered() {
        let tokens = tokenize("的了在是");
        assert!(tokens.is_empty());
    }

    #[test]
    fn latin_tokens_are_lowercased() {
        let tokens = tokenize("ChatGPT 发布新版本");
        assert!(tokens.contains(&"chatgpt".to_string()));
    }

    #[test]
    fn learn_extends_the_dictionary() {
        let mut t = Tokenizer::new();
        t.learn("量子计算机");
        let tokens = t.segment("量子计算机突破");
        assert!(tokens.contains(&"量子计算机".to_string()));
    }
}
