//! Bilibili (video site) crawler. Uses the public web search API, which
//! returns plain JSON — another "public list endpoints" case.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::warn;

use super::ssr::{fallback_titles, str_field, u64_field};
use super::PlatformCrawler;
use crate::core::types::{ContentType, Platform, RawContent};
use crate::net::HttpClient;

pub struct BilibiliCrawler;

#[async_trait]
impl PlatformCrawler for BilibiliCrawler {
    fn platform(&self) -> Platform {
        Platform::Bilibili
    }

    async fn crawl(&self, client: &HttpClient, seed: &str) -> Vec<RawContent> {
        let mut out = Vec::new();
        let api_url = format!(
            "https://api.bilibili.com/x/web-interface/search/type?search_type=video&keyword={}",
            percent_encoding::utf8_percent_encode(seed, percent_encoding::NON_ALPHANUMERIC)
        );

        let value = match client.get_json(&api_url).await {
            Ok(Some(v)) => v,
            Ok(None) => return out,
            Err(e) => {
                warn!(seed, error = %e, "bilibili crawl failed");
                return out;
            }
        };

        let now = Utc::now();
        if let Some(items) = value
            .get("data")
            .and_then(|d| d.get("result"))
            .and_then(|r| r.as_array())
        {
            for item in items {
                let Some(title) = str_field(item, &["title"]) else {
                    continue;
                };
                let clean_title = strip_highlight_markup(title);
                if clean_title.trim().is_empty() {
                    continue;
                }
                let content_id = str_field(item, &["bvid", "aid"])
                    .unwrap_or(&clean_title)
                    .to_string();
                let author = str_field(item, &["author"]).unwrap_or_default().to_string();
                let pub_time = item
                    .get("pubdate")
                    .and_then(|v| v.as_i64())
                    .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
                    .unwrap_or(now);
                out.push(RawContent {
                    platform: Platform::Bilibili,
                    content_id,
                    title: clean_title,
                    text: str_field(item, &["description"]).unwrap_or_default().to_string(),
                    author,
                    likes: u64_field(item, &["like"]),
                    comments: u64_field(item, &["review"]),
                    shares: u64_field(item, &["favorites"]),
                    views: u64_field(item, &["play"]),
                    tags: Vec::new(),
                    url: str_field(item, &["arcurl"]).unwrap_or(&api_url).to_string(),
                    pub_time,
                    crawl_time: now,
                    content_type: ContentType::Video,
                    extra: Default::default(),
                });
            }
        }

        if out.is_empty() {
            if let Some(body) = value.as_str() {
                for title in fallback_titles(body, 20) {
                    out.push(RawContent {
                        platform: Platform::Bilibili,
                        content_id: title.clone(),
                        title,
                        text: String::new(),
                        author: String::new(),
                        likes: 0,
                        comments: 0,
                        shares: 0,
                        views: 0,
                        tags: Vec::new(),
                        url: api_url.clone(),
                        pub_time: now,
                        crawl_time: now,
                        content_type: ContentType::Video,
                        extra: Default::default(),
                    });
                }
            }
        }

        out
    }
}

/// Bilibili wraps matched search terms in `<em class="keyword">…</em>`.
fn strip_highlight_markup(s: &str) -> String {
    s.replace("<em class=\"keyword\">", "")
        .replace("</em>", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_keyword_highlight_spans() {
        let raw = r#"2026 <em class="keyword">人工智能</em> 大会"#;
        assert_eq!(strip_highlight_markup(raw), "2026 人工智能 大会");
    }
}
