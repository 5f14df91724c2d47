//! Command-line surface for the trend discoverer, per spec §6.

use clap::Parser;

use crate::core::types::Platform;

fn default_platforms() -> String {
    "bilibili,baidu,xiaohongshu".to_string()
}

#[derive(Parser, Debug)]
#[command(name = "trend-scout", about = "Discover emerging topics across Chinese social/news platforms")]
pub struct Cli {
    /// Minutes between cycles; 0 runs once then exits.
    #[arg(long = "loop", default_value_t = 0)]
    pub loop_minutes: u64,

    /// Comma-separated subset of {bilibili, baidu, xiaohongshu, weibo, zhihu, douyin}.
    #[arg(long, default_value_t = default_platforms())]
    pub platforms: String,

    /// Seed count drawn from the domain-grouped seed bank each cycle.
    #[arg(long, default_value_t = 10)]
    pub keywords: usize,

    /// Number of ranked trends to keep and persist each cycle.
    #[arg(long, default_value_t = 50)]
    pub topk: usize,

    /// Proxy URL applied to all platform HTTP clients.
    #[arg(long)]
    pub proxy: Option<String>,

    /// Also invoke the external news-aggregator bridge after each cycle.
    #[arg(long = "with-news", default_value_t = false)]
    pub with_news: bool,

    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Parse `--platforms` into a concrete platform list, skipping and
    /// warning on any unrecognized entry rather than failing startup.
    pub fn parsed_platforms(&self) -> Vec<Platform> {
        self.platforms
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| match s.parse::<Platform>() {
                Ok(p) => Some(p),
                Err(_) => {
                    tracing::warn!(platform = s, "unknown platform in --platforms, skipping");
                    None
                }
            })
            .collect()
    }
}
