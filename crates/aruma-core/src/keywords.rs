//! The tracked keyword set and the parameters of a collection run.

use std::time::Duration;

/// Region queried when `REGION` is unset.
pub const DEFAULT_REGION: &str = "PE";

/// Google Trends category id for "Beauty & Fitness".
pub const BEAUTY_FITNESS_CATEGORY_ID: u32 = 44;

/// Trailing window requested for every batch.
pub const DEFAULT_TIMEFRAME: &str = "today 3-m";

/// Maximum number of keywords the provider accepts in one comparison.
pub const MAX_BATCH_SIZE: usize = 5;

/// Pause between consecutive batches.
pub const DEFAULT_INTER_BATCH_DELAY: Duration = Duration::from_secs(3);

/// Keywords tracked on every run, in output order.
pub const BEAUTY_KEYWORDS: [&str; 9] = [
    "skincare",
    "cerave",
    "niacinamide",
    "retinol",
    "maquillaje",
    "protector solar",
    "serum facial",
    "hidratante",
    "limpiador facial",
];

/// Parameters of one collection run.
///
/// [`Default`] yields the production keyword set; tests substitute synthetic
/// keywords and a zero delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendsConfig {
    /// Two-letter region code, passed verbatim to the provider.
    pub region: String,
    pub keywords: Vec<String>,
    pub category_id: u32,
    pub timeframe: String,
    /// Keywords per provider request, `1..=MAX_BATCH_SIZE`.
    pub batch_size: usize,
    pub inter_batch_delay: Duration,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            keywords: BEAUTY_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            category_id: BEAUTY_FITNESS_CATEGORY_ID,
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            batch_size: MAX_BATCH_SIZE,
            inter_batch_delay: DEFAULT_INTER_BATCH_DELAY,
        }
    }
}
