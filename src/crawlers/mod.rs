pub mod baidu;
pub mod bilibili;
pub mod douyin;
pub mod numeric;
pub mod ssr;
pub mod weibo;
pub mod xiaohongshu;
pub mod zhihu;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::types::{Platform, RawContent};
use crate::net::HttpClient;

/// One crawler per platform, grounded in the teacher's `SearchService`
/// trait (`tools/search/service.rs`) and per-engine modules under
/// `tools/search/engines/` — each platform is a self-contained file
/// implementing this one contract.
///
/// The entry point the orchestrator calls is `crawl_all`, per spec §4.2's
/// `crawl_all(seed_keywords) -> Vec<RawContent>` contract: one call per
/// crawler per cycle, leaving it up to each crawler how (or whether) to use
/// the seed list. Search-driven platforms fetch once per seed via the
/// default implementation below; a seed-independent platform like Baidu's
/// hot-search board overrides `crawl_all` to fetch once regardless of how
/// many seeds were selected.
#[async_trait]
pub trait PlatformCrawler: Send + Sync {
    fn platform(&self) -> Platform;

    /// Crawl content for a single seed keyword/query. A crawler failure
    /// (network, parse, or empty-result) must never propagate past this
    /// call — callers get an empty `Vec` and the orchestrator logs a
    /// `warn!` and moves on, per the spec's per-platform isolation rule.
    async fn crawl(&self, client: &HttpClient, seed: &str) -> Vec<RawContent>;

    /// Crawl every seed for this cycle. Default: one `crawl` call per seed,
    /// concatenated — the right behavior for a search/SSR-based platform.
    /// Override this for a platform whose fetch doesn't depend on the seed.
    async fn crawl_all(&self, client: &HttpClient, seeds: &[String]) -> Vec<RawContent> {
        let mut out = Vec::new();
        for seed in seeds {
            out.extend(self.crawl(client, seed).await);
        }
        out
    }
}

/// Construct the crawler for a given platform. Central registry used by the
/// orchestrator so adding a platform means adding one match arm here.
pub fn for_platform(platform: Platform) -> Arc<dyn PlatformCrawler> {
    match platform {
        Platform::Douyin => Arc::new(douyin::DouyinCrawler),
        Platform::Xiaohongshu => Arc::new(xiaohongshu::XiaohongshuCrawler),
        Platform::Weibo => Arc::new(weibo::WeiboCrawler),
        Platform::Bilibili => Arc::new(bilibili::BilibiliCrawler),
        Platform::Zhihu => Arc::new(zhihu::ZhihuCrawler),
        Platform::Baidu => Arc::new(baidu::BaiduCrawler),
    }
}
