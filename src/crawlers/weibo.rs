//! Weibo (micro-blog) crawler. Weibo's mobile search endpoint (`m.weibo.cn`)
//! returns a public JSON API directly — no SSR-blob extraction needed, the
//! "public list endpoints" strategy from spec §4.2.

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use super::ssr::{fallback_titles, u64_field};
use super::PlatformCrawler;
use crate::core::types::{ContentType, Platform, RawContent};
use crate::net::HttpClient;

pub struct WeiboCrawler;

#[async_trait]
impl PlatformCrawler for WeiboCrawler {
    fn platform(&self) -> Platform {
        Platform::Weibo
    }

    async fn crawl(&self, client: &HttpClient, seed: &str) -> Vec<RawContent> {
        let mut out = Vec::new();
        let api_url = format!(
            "https://m.weibo.cn/api/container/getIndex?queryVal={}&containerid=100103type%3D1%26q%3D{}&type=all",
            percent_encoding::utf8_percent_encode(seed, percent_encoding::NON_ALPHANUMERIC),
            percent_encoding::utf8_percent_encode(seed, percent_encoding::NON_ALPHANUMERIC),
        );

        let value = match client.get_json(&api_url).await {
            Ok(Some(v)) => v,
            Ok(None) => return out,
            Err(e) => {
                warn!(seed, error = %e, "weibo crawl failed");
                return out;
            }
        };

        let now = Utc::now();
        if let Some(cards) = value
            .get("data")
            .and_then(|d| d.get("cards"))
            .and_then(|c| c.as_array())
        {
            for card in cards {
                let Some(mblog) = card.get("mblog") else {
                    continue;
                };
                let Some(text) = mblog.get("text").and_then(|v| v.as_str()) else {
                    continue;
                };
                let plain = strip_html_tags(text);
                if plain.trim().is_empty() {
                    continue;
                }
                let content_id = mblog
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or(&plain)
                    .to_string();
                let author = mblog
                    .get("user")
                    .and_then(|u| u.get("screen_name"))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                out.push(RawContent {
                    platform: Platform::Weibo,
                    content_id,
                    title: truncate(&plain, 60),
                    text: plain,
                    author,
                    likes: u64_field(mblog, &["attitudes_count"]),
                    comments: u64_field(mblog, &["comments_count"]),
                    shares: u64_field(mblog, &["reposts_count"]),
                    views: 0,
                    tags: Vec::new(),
                    url: api_url.clone(),
                    pub_time: now,
                    crawl_time: now,
                    content_type: ContentType::Status,
                    extra: Default::default(),
                });
            }
        }

        if out.is_empty() {
            if let Some(body) = value.as_str() {
                for title in fallback_titles(body, 20) {
                    out.push(RawContent {
                        platform: Platform::Weibo,
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
                        content_type: ContentType::Status,
                        extra: Default::default(),
                    });
                }
            }
        }

        out
    }
}

fn strip_html_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_anchor_tags_from_reposted_text() {
        let raw = r#"转发微博 <a href="/1">#热搜#</a> 内容"#;
        assert_eq!(strip_html_tags(raw), "转发微博 #热搜# 内容");
    }
}
