//! Output records of a collection run.
//!
//! A [`TrendsSnapshot`] is built once per run and written twice (timestamped
//! file and `latest.json`). Its keyword list holds either live
//! [`KeywordSummary`] records or, when live collection produced nothing, the
//! [`CuratedTrend`] fallback records. The two shapes share `keyword`,
//! `average_interest`, `trend` and `top_regions`; only live records carry
//! `interest_over_time` and `rising_queries`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const CATEGORY_NAME: &str = "Beauty & Fitness";
pub const SOURCE_NAME: &str = "Google Trends";
pub const METHOD_LIVE: &str = "Google Trends API + curated fallback";
pub const METHOD_CURATED: &str = "Curated data (Google Trends unavailable)";
pub const NOTE_LIVE: &str = "Real-time Google Trends data";

/// Direction of search interest over the collection window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    #[default]
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Region name to score, in a fixed order.
///
/// Serialized as a JSON object whose key order is the list order, so the
/// descending-score order of live data survives the round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionScores(Vec<(String, u32)>);

impl RegionScores {
    #[must_use]
    pub fn new(entries: Vec<(String, u32)>) -> Self {
        Self(entries)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Score for `region`, if present.
    #[must_use]
    pub fn get(&self, region: &str) -> Option<u32> {
        self.0
            .iter()
            .find(|(name, _)| name == region)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, score)| (name.as_str(), *score))
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for RegionScores {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for RegionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, score) in &self.0 {
            map.serialize_entry(name, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RegionScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegionScoresVisitor;

        impl<'de> Visitor<'de> for RegionScoresVisitor {
            type Value = RegionScores;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of region name to integer score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, score)) = access.next_entry::<String, u32>()? {
                    entries.push((name, score));
                }
                Ok(RegionScores(entries))
            }
        }

        deserializer.deserialize_map(RegionScoresVisitor)
    }
}

/// Live per-keyword summary computed from provider data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSummary {
    pub keyword: String,
    /// Truncated mean interest, 0-100. `0` when the series is absent.
    pub average_interest: u32,
    pub trend: Trend,
    /// `YYYY-MM-DD` to interest value; dates without data are omitted.
    pub interest_over_time: BTreeMap<String, u32>,
    /// Top five regions, highest score first.
    pub top_regions: RegionScores,
    /// Up to five rising related queries in provider order.
    pub rising_queries: Vec<String>,
}

impl KeywordSummary {
    /// An empty summary: no series, no regions, no queries, stable trend.
    #[must_use]
    pub fn empty(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            average_interest: 0,
            trend: Trend::Stable,
            interest_over_time: BTreeMap::new(),
            top_regions: RegionScores::default(),
            rising_queries: Vec::new(),
        }
    }
}

/// Hand-curated keyword record used when live collection yields nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedTrend {
    pub keyword: String,
    pub average_interest: u32,
    pub trend: Trend,
    pub peak_score: u32,
    /// Three-month growth as displayed, e.g. `"+45%"`.
    pub growth_3m: String,
    pub top_regions: RegionScores,
}

/// One entry of a snapshot's keyword list.
///
/// Untagged: live records are recognized by `interest_over_time` and
/// `rising_queries`, curated ones by `peak_score` and `growth_3m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordRecord {
    Live(KeywordSummary),
    Curated(CuratedTrend),
}

impl KeywordRecord {
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            KeywordRecord::Live(s) => &s.keyword,
            KeywordRecord::Curated(c) => &c.keyword,
        }
    }

    #[must_use]
    pub fn average_interest(&self) -> u32 {
        match self {
            KeywordRecord::Live(s) => s.average_interest,
            KeywordRecord::Curated(c) => c.average_interest,
        }
    }

    #[must_use]
    pub fn trend(&self) -> Trend {
        match self {
            KeywordRecord::Live(s) => s.trend,
            KeywordRecord::Curated(c) => c.trend,
        }
    }

    #[must_use]
    pub fn top_regions(&self) -> &RegionScores {
        match self {
            KeywordRecord::Live(s) => &s.top_regions,
            KeywordRecord::Curated(c) => &c.top_regions,
        }
    }

    #[must_use]
    pub fn is_curated(&self) -> bool {
        matches!(self, KeywordRecord::Curated(_))
    }
}

/// Provenance of a snapshot's keyword data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub method: String,
    pub note: String,
}

/// The result of one collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendsSnapshot {
    pub timestamp: DateTime<Local>,
    pub region: String,
    pub category: String,
    pub source: String,
    pub keywords: Vec<KeywordRecord>,
    pub metadata: SnapshotMetadata,
}

impl TrendsSnapshot {
    /// File stem of the timestamped copy: `trends_YYYYMMDD_HHMMSS`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("trends_{}", self.timestamp.format("%Y%m%d_%H%M%S"))
    }

    /// Whether the keyword list came from the curated fallback.
    #[must_use]
    pub fn is_curated(&self) -> bool {
        self.metadata.method == METHOD_CURATED
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
