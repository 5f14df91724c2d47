//! Zhihu (Q&A) crawler. The search page embeds results in a
//! `js-initialData` SSR blob; each result carries a `question`/`answer`
//! nested object depending on result type.

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use super::ssr::{extract_ssr_state, fallback_titles, find_item_arrays, str_field, u64_field};
use super::PlatformCrawler;
use crate::core::types::{ContentType, Platform, RawContent};
use crate::net::HttpClient;

pub struct ZhihuCrawler;

const TITLE_KEYS: &[&str] = &["title", "question"];

#[async_trait]
impl PlatformCrawler for ZhihuCrawler {
    fn platform(&self) -> Platform {
        Platform::Zhihu
    }

    async fn crawl(&self, client: &HttpClient, seed: &str) -> Vec<RawContent> {
        let mut out = Vec::new();
        let search_url = format!(
            "https://www.zhihu.com/search?type=content&q={}",
            percent_encoding::utf8_percent_encode(seed, percent_encoding::NON_ALPHANUMERIC)
        );

        let html = match client.get_text(&search_url).await {
            Ok(Some(html)) => html,
            Ok(None) => return out,
            Err(e) => {
                warn!(seed, error = %e, "zhihu crawl failed");
                return out;
            }
        };

        if let Some(state) = extract_ssr_state(&html) {
            let now = Utc::now();
            for item in find_item_arrays(&state, TITLE_KEYS, 10) {
                let title = str_field(item, TITLE_KEYS)
                    .or_else(|| {
                        item.get("question")
                            .and_then(|q| str_field(q, &["title"]))
                    })
                    .unwrap_or_default();
                if title.trim().is_empty() {
                    continue;
                }
                let content_type = if item.get("answer_id").is_some() || item.get("content").is_some()
                {
                    ContentType::Answer
                } else {
                    ContentType::Question
                };
                let content_id = str_field(item, &["id", "answer_id", "question_id"])
                    .unwrap_or(title)
                    .to_string();
                let author = item
                    .get("author")
                    .and_then(|a| str_field(a, &["name"]))
                    .unwrap_or_default()
                    .to_string();
                out.push(RawContent {
                    platform: Platform::Zhihu,
                    content_id,
                    title: title.to_string(),
                    text: str_field(item, &["excerpt"]).unwrap_or_default().to_string(),
                    author,
                    likes: u64_field(item, &["voteup_count"]),
                    comments: u64_field(item, &["comment_count"]),
                    shares: 0,
                    views: 0,
                    tags: Vec::new(),
                    url: search_url.clone(),
                    pub_time: now,
                    crawl_time: now,
                    content_type,
                    extra: Default::default(),
                });
            }
        }

        if out.is_empty() {
            let now = Utc::now();
            for title in fallback_titles(&html, 20) {
                out.push(RawContent {
                    platform: Platform::Zhihu,
                    content_id: title.clone(),
                    title,
                    text: String::new(),
                    author: String::new(),
                    likes: 0,
                    comments: 0,
                    shares: 0,
                    views: 0,
                    tags: Vec::new(),
                    url: search_url.clone(),
                    pub_time: now,
                    crawl_time: now,
                    content_type: ContentType::Question,
                    extra: Default::default(),
                });
            }
        }

        out
    }
}
