//! Douyin (short-video) crawler. Uses the public search-suggest endpoint to
//! harvest autosuggest completions for a seed query, then renders the
//! search-result page and pulls the SSR state blob for the actual video
//! items. Mirrors the per-engine module shape of `tools/search/engines/
//! bing.rs`, generalized from HTML scraping to SSR-blob scraping.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use super::ssr::{extract_ssr_state, fallback_titles, find_item_arrays, str_field, u64_field};
use super::PlatformCrawler;
use crate::core::types::{ContentType, Platform, RawContent};
use crate::net::HttpClient;

pub struct DouyinCrawler;

const TITLE_KEYS: &[&str] = &["desc", "title"];

#[async_trait]
impl PlatformCrawler for DouyinCrawler {
    fn platform(&self) -> Platform {
        Platform::Douyin
    }

    async fn crawl(&self, client: &HttpClient, seed: &str) -> Vec<RawContent> {
        let mut out = Vec::new();

        if let Some(suggestions) = fetch_suggestions(client, seed).await {
            debug!(seed, count = suggestions.len(), "douyin suggest harvested");
        }

        let search_url = format!(
            "https://www.douyin.com/search/{}",
            percent_encoding::utf8_percent_encode(
                seed,
                percent_encoding::NON_ALPHANUMERIC
            )
        );

        let html = match client.get_text(&search_url).await {
            Ok(Some(html)) => html,
            Ok(None) => return out,
            Err(e) => {
                warn!(seed, error = %e, "douyin crawl failed");
                return out;
            }
        };

        if let Some(state) = extract_ssr_state(&html) {
            let now = Utc::now();
            for item in find_item_arrays(&state, TITLE_KEYS, 10) {
                let Some(title) = str_field(item, &["desc", "title"]) else {
                    continue;
                };
                if title.trim().is_empty() {
                    continue;
                }
                let content_id = str_field(item, &["aweme_id", "id"])
                    .unwrap_or(title)
                    .to_string();
                let author = str_field(item, &["nickname", "author"])
                    .unwrap_or_default()
                    .to_string();
                let stats = item.get("statistics").unwrap_or(item);
                out.push(RawContent {
                    platform: Platform::Douyin,
                    content_id,
                    title: title.to_string(),
                    text: String::new(),
                    author,
                    likes: u64_field(stats, &["digg_count", "likes"]),
                    comments: u64_field(stats, &["comment_count", "comments"]),
                    shares: u64_field(stats, &["share_count", "shares"]),
                    views: u64_field(stats, &["play_count", "views"]),
                    tags: Vec::new(),
                    url: search_url.clone(),
                    pub_time: now,
                    crawl_time: now,
                    content_type: ContentType::Video,
                    extra: Default::default(),
                });
            }
        }

        if out.is_empty() {
            let now = Utc::now();
            for title in fallback_titles(&html, 20) {
                out.push(RawContent {
                    platform: Platform::Douyin,
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
                    content_type: ContentType::Video,
                    extra: Default::default(),
                });
            }
        }

        out
    }
}

async fn fetch_suggestions(client: &HttpClient, seed: &str) -> Option<Vec<String>> {
    let url = format!(
        "https://www.douyin.com/aweme/v1/web/search/sug/?keyword={}",
        percent_encoding::utf8_percent_encode(seed, percent_encoding::NON_ALPHANUMERIC)
    );
    let value = client.get_json(&url).await.ok()??;
    let list = value.get("sug_list")?.as_array()?;
    Some(
        list.iter()
            .filter_map(|v| v.get("word").and_then(|w| w.as_str()).map(str::to_string))
            .collect(),
    )
}
