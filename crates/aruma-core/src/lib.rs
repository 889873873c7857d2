//! Shared domain types and configuration for the Aruma trends collector.

pub mod app_config;
pub mod config;
pub mod keywords;
pub mod snapshot;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use keywords::{TrendsConfig, BEAUTY_FITNESS_CATEGORY_ID, BEAUTY_KEYWORDS, DEFAULT_REGION};
pub use snapshot::{
    CuratedTrend, KeywordRecord, KeywordSummary, RegionScores, SnapshotMetadata, Trend,
    TrendsSnapshot,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
