//! Reduction of raw batch artifacts into per-keyword summaries.
//!
//! The trend heuristic compares the mean of the last seven observations with
//! the mean of the first seven. Series shorter than fourteen points overlap
//! both windows, and below seven points both windows are the whole series, so
//! such series almost always classify as stable.

use std::collections::BTreeMap;

use aruma_core::{KeywordSummary, RegionScores, Trend};

use crate::types::{BatchArtifacts, Observation, RegionBreakdown, RelatedQueries};

/// Observations in each trend window.
pub const TREND_WINDOW: usize = 7;

/// Entries kept for `top_regions` and `rising_queries`.
pub const TOP_N: usize = 5;

/// Summarizes one keyword of a batch.
#[must_use]
pub fn summarize_keyword(keyword: &str, artifacts: &BatchArtifacts) -> KeywordSummary {
    let mut summary = KeywordSummary::empty(keyword);

    if let Some(series) = artifacts.time_series.column(keyword) {
        summary.interest_over_time = interest_over_time(&series);
        let values: Vec<Option<u32>> = series.iter().map(|o| o.value).collect();
        summary.average_interest = average_interest(&values);
        summary.trend = classify_trend(&values);
    }

    summary.top_regions = top_regions(&artifacts.regions, keyword);
    summary.rising_queries = rising_queries(&artifacts.related, keyword);
    summary
}

/// Maps each available observation's calendar date to its value.
#[must_use]
pub fn interest_over_time(series: &[Observation]) -> BTreeMap<String, u32> {
    series
        .iter()
        .filter_map(|o| Some((o.date.format("%Y-%m-%d").to_string(), o.value?)))
        .collect()
}

/// Truncated mean of the available values; `0` when none are available.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn average_interest(values: &[Option<u32>]) -> u32 {
    mean(values).map_or(0, |m| m as u32)
}

/// Classifies the series by comparing the mean of its last
/// [`TREND_WINDOW`] observations (recent) to its first (older).
///
/// Rising when recent exceeds older by at least 10 %, falling when it is
/// more than 10 % below, otherwise stable. A window without available values
/// classifies as stable.
#[must_use]
pub fn classify_trend(values: &[Option<u32>]) -> Trend {
    let head = &values[..values.len().min(TREND_WINDOW)];
    let tail = &values[values.len().saturating_sub(TREND_WINDOW)..];

    let (Some(older), Some(recent)) = (mean(head), mean(tail)) else {
        return Trend::Stable;
    };

    // Scaled comparison: `older * 1.1` is not exact in binary floating point.
    if recent > older && recent * 10.0 >= older * 11.0 {
        Trend::Rising
    } else if recent * 10.0 < older * 9.0 {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

/// The [`TOP_N`] highest-scoring regions for `keyword`, highest first. Ties
/// keep the breakdown's order.
#[must_use]
pub fn top_regions(regions: &RegionBreakdown, keyword: &str) -> RegionScores {
    let Some(mut column) = regions.column(keyword) else {
        return RegionScores::default();
    };
    column.sort_by(|a, b| b.1.cmp(&a.1));
    column.into_iter().take(TOP_N).collect()
}

/// The first [`TOP_N`] rising related queries for `keyword`.
#[must_use]
pub fn rising_queries(related: &RelatedQueries, keyword: &str) -> Vec<String> {
    related
        .get(keyword)
        .and_then(|lists| lists.rising.as_ref())
        .map(|rising| {
            rising
                .iter()
                .take(TOP_N)
                .map(|q| q.query.clone())
                .collect()
        })
        .unwrap_or_default()
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[Option<u32>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().map(|v| f64::from(*v)).collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

#[cfg(test)]
#[path = "summarize_test.rs"]
mod tests;
