//! Xiaohongshu (lifestyle-notes) crawler. Same SSR-blob strategy as
//! `douyin.rs`; the public search page embeds a `window.__INITIAL_STATE__`
//! blob carrying note cards under a nested `feed`/`note` structure.

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use super::ssr::{extract_ssr_state, fallback_titles, find_item_arrays, str_field, u64_field};
use super::PlatformCrawler;
use crate::core::types::{ContentType, Platform, RawContent};
use crate::net::HttpClient;

pub struct XiaohongshuCrawler;

const TITLE_KEYS: &[&str] = &["title", "display_title"];

#[async_trait]
impl PlatformCrawler for XiaohongshuCrawler {
    fn platform(&self) -> Platform {
        Platform::Xiaohongshu
    }

    async fn crawl(&self, client: &HttpClient, seed: &str) -> Vec<RawContent> {
        let mut out = Vec::new();
        let search_url = format!(
            "https://www.xiaohongshu.com/search_result?keyword={}",
            percent_encoding::utf8_percent_encode(seed, percent_encoding::NON_ALPHANUMERIC)
        );

        let html = match client.get_text(&search_url).await {
            Ok(Some(html)) => html,
            Ok(None) => return out,
            Err(e) => {
                warn!(seed, error = %e, "xiaohongshu crawl failed");
                return out;
            }
        };

        if let Some(state) = extract_ssr_state(&html) {
            let now = Utc::now();
            for item in find_item_arrays(&state, TITLE_KEYS, 10) {
                let Some(title) = str_field(item, TITLE_KEYS) else {
                    continue;
                };
                if title.trim().is_empty() {
                    continue;
                }
                let content_id = str_field(item, &["note_id", "id"])
                    .unwrap_or(title)
                    .to_string();
                let author = str_field(item, &["user_nickname", "nickname"])
                    .unwrap_or_default()
                    .to_string();
                let interact = item.get("interact_info").unwrap_or(item);
                out.push(RawContent {
                    platform: Platform::Xiaohongshu,
                    content_id,
                    title: title.to_string(),
                    text: str_field(item, &["desc"]).unwrap_or_default().to_string(),
                    author,
                    likes: u64_field(interact, &["liked_count", "likes"]),
                    comments: u64_field(interact, &["comment_count", "comments"]),
                    shares: u64_field(interact, &["share_count", "shares"]),
                    views: u64_field(interact, &["view_count", "views"]),
                    tags: Vec::new(),
                    url: search_url.clone(),
                    pub_time: now,
                    crawl_time: now,
                    content_type: ContentType::Note,
                    extra: Default::default(),
                });
            }
        }

        if out.is_empty() {
            let now = Utc::now();
            for title in fallback_titles(&html, 20) {
                out.push(RawContent {
                    platform: Platform::Xiaohongshu,
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
                    content_type: ContentType::Note,
                    extra: Default::default(),
                });
            }
        }

        out
    }
}
