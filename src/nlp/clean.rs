//! Text cleaning ahead of tokenization. Adapted from
//! `scraping/rust_scraper/clean.rs`'s HTML/entity-stripping approach —
//! that module is built for English-web readability extraction and
//! discards anything it doesn't recognize as "article body"; here the
//! equivalent pass must retain CJK text (the whole point of the pipeline)
//! while still stripping markup, URLs, and the noise characters Chinese
//! platforms pad titles with (emoji tag brackets, extension dots).

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("valid regex"));
static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[\w一-鿿]+").expect("valid regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
// Full/half-width bracket pairs platforms use for inline topic tags, e.g. 【独家】.
static BRACKET_TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[【\[][^】\]]{0,20}[】\]]").expect("valid regex"));

/// Chinese punctuation kept alongside CJK ideographs, Latin letters, and
/// digits, per spec §4.4's "short whitelist" — everything else (emoji,
/// decorative symbols, stray control characters) is dropped outright
/// rather than merely left alone.
const PUNCTUATION_WHITELIST: &[char] = &[
    '，', '。', '！', '？', '、', '：', '；', '“', '”', '‘', '’', '（', '）', '《', '》', '…', '·',
    '-', '_', '.', ',', '!', '?', ':', ';', '&', '%', '+',
];

fn is_kept_char(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_alphanumeric()
        || matches!(c as u32, 0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF)
        || PUNCTUATION_WHITELIST.contains(&c)
}

/// Clean raw crawled text: strip HTML, URLs, @mentions, bracketed tag
/// decorations, and HTML entities; keep only CJK ideographs, Latin
/// letters, digits, and a short whitelist of Chinese/Latin punctuation;
/// collapse whitespace.
pub fn clean(raw: &str) -> String {
    let no_html = HTML_TAG.replace_all(raw, " ");
    let no_urls = URL.replace_all(&no_html, " ");
    let no_mentions = MENTION.replace_all(&no_urls, " ");
    let no_tags = BRACKET_TAGS.replace_all(&no_mentions, " ");
    let decoded = decode_common_entities(&no_tags);
    let filtered: String = decoded.chars().filter(|&c| is_kept_char(c)).collect();
    WHITESPACE_RUN.replace_all(filtered.trim(), " ").to_string()
}

fn decode_common_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_and_keeps_cjk() {
        let raw = "<p>人工智能<b>大模型</b>爆火</p>";
        assert_eq!(clean(raw), "人工智能大模型爆火");
    }

    #[test]
    fn strips_urls_and_bracket_tags() {
        let raw = "【独家】见 https://example.com/x 了解更多";
        assert_eq!(clean(raw), "见 了解更多");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let raw = "热点   话题\n\n讨论";
        assert_eq!(clean(raw), "热点 话题 讨论");
    }

    #[test]
    fn decodes_html_entities() {
        assert_eq!(clean("A&amp;B"), "A&B");
    }

    #[test]
    fn strips_at_mentions() {
        let raw = "转发 @某某用户 的微博：热议不断";
        let cleaned = clean(raw);
        assert!(!cleaned.contains('@'));
        assert!(cleaned.contains("热议不断"));
    }

    #[test]
    fn drops_emoji_and_decorative_symbols() {
        let raw = "好消息🎉🔥快来看吧✨";
        let cleaned = clean(raw);
        assert!(!cleaned.contains('🎉'));
        assert!(!cleaned.contains('🔥'));
        assert_eq!(cleaned, "好消息快来看吧");
    }
}
