use std::path::PathBuf;

use crate::keywords::TrendsConfig;

#[derive(Clone)]
pub struct AppConfig {
    pub trends: TrendsConfig,
    /// Directory receiving `trends_<stamp>.json` and `latest.json`.
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Host language sent as `hl`; its last two letters prime the session geo.
    pub host_language: String,
    /// Timezone offset in minutes, sent as `tz`.
    pub tz_offset_minutes: i32,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("region", &self.trends.region)
            .field("keywords", &self.trends.keywords.len())
            .field("category_id", &self.trends.category_id)
            .field("timeframe", &self.trends.timeframe)
            .field("batch_size", &self.trends.batch_size)
            .field("inter_batch_delay", &self.trends.inter_batch_delay)
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .field("host_language", &self.host_language)
            .field("tz_offset_minutes", &self.tz_offset_minutes)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
