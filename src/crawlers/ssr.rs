//! Shared helpers for pulling structured data out of server-rendered HTML,
//! the pattern spec §4.2 calls "SSR extraction". Grounded in the teacher's
//! `tools/search/engines::fetch_html`/`detect_block_reason` idea of one
//! shared low-level helper reused by every per-platform module, and in
//! `scraping/rust_scraper/clean.rs`'s practice of trying several extraction
//! strategies and keeping whichever yields the most signal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Matches `var NAME = {...};` / `window.NAME = {...}` assignments that
/// embed a JSON-like state blob in a `<script>` tag. Captures the RHS up to
/// the statement-terminating `;` at the end of the line — intentionally
/// greedy-free since platform blobs can be megabytes and span many lines.
static SSR_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:window\.|var\s+)?[A-Za-z_$][\w$]*\s*=\s*(\{[\s\S]*\})\s*;?\s*</script>"#)
        .expect("valid regex")
});

/// Many platforms embed JS object literals that are almost-but-not-quite
/// JSON: bare `undefined` where a strict parser wants `null`. Swap it out
/// before handing the blob to `serde_json`.
pub fn tolerant_json_parse(raw: &str) -> Option<Value> {
    let fixed = raw.replace("undefined", "null");
    serde_json::from_str(&fixed).ok()
}

/// Scan an HTML document's `<script>` bodies for the first SSR state blob
/// that parses as JSON (after `undefined`→`null` normalization).
pub fn extract_ssr_state(html: &str) -> Option<Value> {
    for caps in SSR_ASSIGNMENT.captures_iter(html) {
        if let Some(blob) = caps.get(1) {
            if let Some(value) = tolerant_json_parse(blob.as_str()) {
                return Some(value);
            }
        }
    }
    None
}

/// Recursively walk a JSON value (capped at `max_depth`, per spec §4.2) and
/// collect every object that looks like a content item — i.e. it carries at
/// least one of the given candidate title keys.
pub fn find_item_arrays<'a>(
    value: &'a Value,
    title_keys: &[&str],
    max_depth: u32,
) -> Vec<&'a Value> {
    let mut found = Vec::new();
    walk(value, title_keys, max_depth, &mut found);
    found
}

fn walk<'a>(value: &'a Value, title_keys: &[&str], depth_left: u32, out: &mut Vec<&'a Value>) {
    if depth_left == 0 {
        return;
    }
    match value {
        Value::Object(map) => {
            if title_keys.iter().any(|k| map.contains_key(*k)) {
                out.push(value);
            }
            for v in map.values() {
                walk(v, title_keys, depth_left - 1, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                walk(v, title_keys, depth_left - 1, out);
            }
        }
        _ => {}
    }
}

/// Best-effort string field lookup across a few common key spellings.
pub fn str_field<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_str))
}

pub fn u64_field(obj: &Value, keys: &[&str]) -> u64 {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .and_then(|v| {
            if let Some(n) = v.as_u64() {
                Some(n)
            } else if let Some(s) = v.as_str() {
                super::numeric::parse_count(s)
            } else {
                None
            }
        })
        .unwrap_or(0)
}

/// Last-resort fallback when no SSR blob parses: scrape `<title>`-shaped
/// anchor text directly out of the raw HTML with a loose regex. Low
/// precision by design — only used when every structured strategy failed.
pub fn fallback_titles(html: &str, max: usize) -> Vec<String> {
    static ANCHOR: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"<a[^>]*>([^<]{4,80})</a>"#).expect("valid regex"));
    ANCHOR
        .captures_iter(html)
        .filter_map(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|s| !s.is_empty())
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerant_parse_accepts_bare_undefined() {
        let raw = r#"{"a": 1, "b": undefined}"#;
        let v = tolerant_json_parse(raw).unwrap();
        assert_eq!(v["a"], 1);
        assert!(v["b"].is_null());
    }

    #[test]
    fn extract_ssr_state_finds_window_assignment() {
        let html = r#"<html><script>window.__INITIAL_STATE__ = {"list":[{"title":"x"}]};</script></html>"#;
        let v = extract_ssr_state(html).unwrap();
        assert!(v["list"].is_array());
    }

    #[test]
    fn find_item_arrays_respects_depth_cap() {
        let v: Value = serde_json::json!({"a": {"b": {"title": "deep"}}});
        let found = find_item_arrays(&v, &["title"], 1);
        assert!(found.is_empty());
        let found2 = find_item_arrays(&v, &["title"], 10);
        assert_eq!(found2.len(), 1);
    }
}
