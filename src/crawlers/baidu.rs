//! Baidu crawler. Unlike the other five, Baidu is sampled via its public
//! real-time hot-search board (`top/board?platform=wise&tab=realtime`)
//! rather than a per-seed search — the board already aggregates
//! cross-site attention, so one fetch covers every seed for the cycle.
//! `crawl_all` is overridden to ignore the seed list and fetch the board
//! exactly once per cycle, rather than once per seed.

use async_trait::async_trait;
use chrono::Utc;
use scraper::{Html, Selector};
use tracing::warn;

use super::numeric::parse_count;
use super::PlatformCrawler;
use crate::core::types::{ContentType, Platform, RawContent};
use crate::net::HttpClient;

pub struct BaiduCrawler;

const BOARD_URL: &str = "https://top.baidu.com/board?platform=wise&tab=realtime";

#[async_trait]
impl PlatformCrawler for BaiduCrawler {
    fn platform(&self) -> Platform {
        Platform::Baidu
    }

    /// Unused directly — `crawl_all` fetches the board once and ignores
    /// the seed list. Kept so the trait's per-seed contract is still
    /// satisfiable if ever called in isolation.
    async fn crawl(&self, client: &HttpClient, _seed: &str) -> Vec<RawContent> {
        self.fetch_board(client).await
    }

    async fn crawl_all(&self, client: &HttpClient, _seeds: &[String]) -> Vec<RawContent> {
        self.fetch_board(client).await
    }
}

impl BaiduCrawler {
    async fn fetch_board(&self, client: &HttpClient) -> Vec<RawContent> {
        let mut out = Vec::new();

        let html = match client.get_text(BOARD_URL).await {
            Ok(Some(html)) => html,
            Ok(None) => return out,
            Err(e) => {
                warn!(error = %e, "baidu crawl failed");
                return out;
            }
        };

        let doc = Html::parse_document(&html);
        let Ok(item_sel) = Selector::parse("div.category-wrap_iQLoo") else {
            return out;
        };
        let title_sel = Selector::parse("div.c-single-text-ellipsis").unwrap();
        let hot_sel = Selector::parse("div.hot-index_1Bl1a").unwrap();

        let now = Utc::now();
        for item in doc.select(&item_sel) {
            let Some(title_el) = item.select(&title_sel).next() else {
                continue;
            };
            let title = title_el.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                continue;
            }
            let heat = item
                .select(&hot_sel)
                .next()
                .map(|n| n.text().collect::<String>())
                .and_then(|s| parse_count(s.trim()))
                .unwrap_or(0);

            out.push(RawContent {
                platform: Platform::Baidu,
                content_id: title.clone(),
                title,
                text: String::new(),
                author: String::new(),
                likes: 0,
                comments: 0,
                shares: 0,
                views: heat,
                tags: Vec::new(),
                url: BOARD_URL.to_string(),
                pub_time: now,
                crawl_time: now,
                content_type: ContentType::Topic,
                extra: Default::default(),
            });
        }

        out
    }
}
