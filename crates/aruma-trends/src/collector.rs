//! The batch loop: provider calls, per-artifact recovery, and snapshot
//! assembly.
//!
//! Only a failed time-series call skips a batch. Region and related-query
//! failures are logged and the artifact is treated as empty, so the batch's
//! keywords are still summarized.

use chrono::{DateTime, Local};

use aruma_core::keywords::TrendsConfig;
use aruma_core::snapshot::{CATEGORY_NAME, METHOD_CURATED, METHOD_LIVE, NOTE_LIVE, SOURCE_NAME};
use aruma_core::{KeywordRecord, KeywordSummary, SnapshotMetadata, TrendsSnapshot};

use crate::batch::batch_keywords;
use crate::fallback::curated_trends;
use crate::provider::TrendsProvider;
use crate::summarize::summarize_keyword;
use crate::types::{BatchArtifacts, BatchQuery, RegionBreakdown, RelatedQueries, Resolution};

/// What live collection produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionOutcome {
    /// At least one keyword was summarized. Fewer keywords than configured is
    /// still a live result.
    Collected(Vec<KeywordSummary>),
    /// No keyword was summarized: every batch failed, or the session never
    /// opened.
    Empty,
}

impl CollectionOutcome {
    fn from_summaries(summaries: Vec<KeywordSummary>) -> Self {
        if summaries.is_empty() {
            CollectionOutcome::Empty
        } else {
            CollectionOutcome::Collected(summaries)
        }
    }
}

/// Result of [`collect_keywords`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub outcome: CollectionOutcome,
    pub batches_total: usize,
    /// Batches whose time-series call failed.
    pub batches_failed: usize,
}

/// Runs every batch of `config.keywords` against `provider`, strictly one
/// request at a time, pausing `config.inter_batch_delay` between batches.
///
/// Provider errors never escape: they are logged and reflected in the
/// report.
pub async fn collect_keywords<P: TrendsProvider>(
    provider: &mut P,
    config: &TrendsConfig,
) -> CollectionReport {
    let batches: Vec<&[String]> = batch_keywords(&config.keywords, config.batch_size).collect();
    let batches_total = batches.len();
    let mut batches_failed = 0;
    let mut summaries = Vec::with_capacity(config.keywords.len());

    for (idx, batch) in batches.iter().enumerate() {
        let batch_no = idx + 1;
        tracing::info!(
            batch = batch_no,
            of = batches_total,
            keywords = ?batch,
            "fetching Google Trends batch"
        );

        match collect_batch(provider, config, batch).await {
            Some(artifacts) => {
                for keyword in *batch {
                    let summary = summarize_keyword(keyword, &artifacts);
                    tracing::info!(
                        %keyword,
                        average_interest = summary.average_interest,
                        trend = %summary.trend,
                        "summarized keyword"
                    );
                    summaries.push(summary);
                }
            }
            None => batches_failed += 1,
        }

        if batch_no < batches_total && !config.inter_batch_delay.is_zero() {
            tokio::time::sleep(config.inter_batch_delay).await;
        }
    }

    if batches_failed > 0 {
        tracing::warn!(
            batches_failed,
            batches_total,
            "some Google Trends batches failed"
        );
    }

    CollectionReport {
        outcome: CollectionOutcome::from_summaries(summaries),
        batches_total,
        batches_failed,
    }
}

/// Fetches the three artifacts of one batch. `None` when the time-series
/// call fails.
async fn collect_batch<P: TrendsProvider>(
    provider: &mut P,
    config: &TrendsConfig,
    batch: &[String],
) -> Option<BatchArtifacts> {
    let query = BatchQuery {
        keywords: batch,
        category_id: config.category_id,
        timeframe: &config.timeframe,
        region: &config.region,
    };

    let time_series = match provider.query_time_series(&query).await {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(keywords = ?batch, error = %e, "time series failed; skipping batch");
            return None;
        }
    };

    let regions = provider
        .query_region_breakdown(Resolution::Region, true)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(keywords = ?batch, error = %e, "region breakdown unavailable");
            RegionBreakdown::default()
        });

    let related = provider.query_related_queries().await.unwrap_or_else(|e| {
        tracing::warn!(keywords = ?batch, error = %e, "related queries unavailable");
        RelatedQueries::new()
    });

    Some(BatchArtifacts {
        time_series,
        regions,
        related,
    })
}

/// Assembles the run's snapshot. An empty outcome is replaced by the curated
/// dataset and marked as such in `metadata.method`.
#[must_use]
pub fn build_snapshot(
    outcome: CollectionOutcome,
    config: &TrendsConfig,
    generated_at: DateTime<Local>,
) -> TrendsSnapshot {
    let (keywords, method) = match outcome {
        CollectionOutcome::Collected(summaries) => (
            summaries.into_iter().map(KeywordRecord::Live).collect(),
            METHOD_LIVE,
        ),
        CollectionOutcome::Empty => {
            tracing::warn!("no live keyword data; using curated dataset");
            (
                curated_trends()
                    .into_iter()
                    .map(KeywordRecord::Curated)
                    .collect(),
                METHOD_CURATED,
            )
        }
    };

    TrendsSnapshot {
        timestamp: generated_at,
        region: config.region.clone(),
        category: CATEGORY_NAME.to_string(),
        source: SOURCE_NAME.to_string(),
        keywords,
        metadata: SnapshotMetadata {
            method: method.to_string(),
            note: NOTE_LIVE.to_string(),
        },
    }
}
