//! Cross-module scenarios that no single unit test spans: a keyword's
//! journey from raw crawled content through the NLP pipeline, the
//! time-series store, burst/heat scoring, and out the other side into
//! both `trends.json` and the `news.json` bridge contract.

use chrono::Utc;
use tempfile::tempdir;

use trend_scout::core::types::{Category, ContentType, Platform, RawContent};
use trend_scout::{news_bridge, TrendEngine, TrendScoutConfig};

fn mk_item(platform: Platform, title: &str, likes: u64, shares: u64) -> RawContent {
    let now = Utc::now();
    RawContent {
        platform,
        content_id: format!("{title}-{platform}"),
        title: title.to_string(),
        text: String::new(),
        author: String::new(),
        likes,
        comments: 0,
        shares,
        views: 0,
        tags: vec!["人工智能".to_string()],
        url: String::new(),
        pub_time: now,
        crawl_time: now,
        content_type: ContentType::Status,
        extra: Default::default(),
    }
}

/// Running the same keyword across several cycles should accumulate
/// windows in the persisted history, push up the burst/acceleration
/// signal, and the resulting topic should be publishable into the
/// `news.json` bridge contract alongside hand-written entries.
#[tokio::test]
async fn repeated_bursts_flow_through_engine_and_into_news_bridge() {
    let dir = tempdir().unwrap();
    let mut config = TrendScoutConfig::default();
    config.data_dir = Some(dir.path().to_string_lossy().to_string());
    let mut engine = TrendEngine::new(config);

    let quiet_cycle = vec![
        mk_item(Platform::Weibo, "人工智能芯片发布会", 10, 1),
        mk_item(Platform::Bilibili, "人工智能芯片测评", 8, 0),
    ];
    let burst_cycle = vec![
        mk_item(Platform::Weibo, "人工智能芯片突发利好", 5000, 800),
        mk_item(Platform::Bilibili, "人工智能芯片暴涨解读", 3000, 500),
        mk_item(Platform::Zhihu, "如何看待人工智能芯片暴涨", 2000, 300),
    ];

    for _ in 0..3 {
        engine.run_cycle(quiet_cycle.clone(), 5, 10).await.unwrap();
    }
    let topics = engine.run_cycle(burst_cycle, 5, 10).await.unwrap();

    assert!(!topics.is_empty(), "burst cycle should surface at least one topic");
    let chip_topic = topics
        .iter()
        .find(|t| t.keyword.contains("芯片") || t.keyword.contains("人工智能"))
        .expect("a chip/AI-related keyword should have survived frequency filtering");

    assert!(chip_topic.heat_score >= 0.0 && chip_topic.heat_score <= 100.0);
    assert!(chip_topic.engagement >= 0.0 && chip_topic.engagement <= 1.0);
    assert!(
        Category::Tech == chip_topic.category || Category::CurrentAffairs == chip_topic.category,
        "a chip/AI keyword should classify as tech or fall back to current affairs"
    );

    assert!(dir.path().join("trends.json").exists());
    assert!(dir.path().join("keyword_history.json").exists());

    let news_path = dir.path().join("news.json");
    std::fs::write(
        &news_path,
        serde_json::json!({
            "last_update": Utc::now(),
            "total": 1,
            "sources": ["编辑部"],
            "items": [{"title": "编辑部原创报道", "source": "编辑部"}],
        })
        .to_string(),
    )
    .unwrap();

    news_bridge::publish(&news_path, &topics, Utc::now()).unwrap();
    let file = news_bridge::read_existing(&news_path, Utc::now()).unwrap();

    assert!(file.items.iter().any(|i| i["source"] == "编辑部"));
    assert_eq!(
        file.items
            .iter()
            .filter(|i| i["source"] == "🔬 热点发现")
            .count(),
        topics.len()
    );
}

/// An orchestrator-level seed selection draw should be usable directly as
/// crawler input shape without any adaptation — confirms the seed bank and
/// the crawler/orchestrator boundary agree on plain `&str` queries.
#[test]
fn seed_selection_is_stable_under_repeated_truncation() {
    use trend_scout::orchestrator::CrawlOrchestrator;

    for _ in 0..5 {
        let seeds = CrawlOrchestrator::select_seeds(12);
        assert_eq!(seeds.len(), 12);
        assert!(seeds.iter().all(|s| !s.is_empty()));
    }
}
