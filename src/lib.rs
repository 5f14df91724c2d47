pub mod burst;
pub mod cli;
pub mod core;
pub mod crawlers;
pub mod engine;
pub mod error;
pub mod heat;
pub mod net;
pub mod news_bridge;
pub mod nlp;
pub mod orchestrator;
pub mod persist;
pub mod seeds;
pub mod timeseries;

pub use core::config::TrendScoutConfig;
pub use core::types::{
    AlgorithmParams, Category, ContentType, KeywordHistory, KeywordWindow, MacdSignal, Platform,
    RawContent, RawSnapshotFile, TrendDirection, TrendTopic, TrendsFile,
};
pub use engine::TrendEngine;
