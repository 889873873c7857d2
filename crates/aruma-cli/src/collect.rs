//! One collection run: open the Trends session, walk the batches, write the
//! snapshot.
//!
//! Provider failures never fail the run; they shrink the live result or, at
//! worst, switch the snapshot to curated data. Only filesystem errors
//! propagate.

use std::fmt;

use anyhow::Context;
use chrono::Local;

use aruma_core::{AppConfig, TrendsSnapshot};
use aruma_trends::{
    build_snapshot, collect_keywords, write_snapshot, ClientSettings, CollectionOutcome,
    CollectionReport, GoogleTrendsClient, SnapshotPaths,
};

/// What a finished run produced.
#[derive(Debug)]
pub(crate) struct RunSummary {
    pub snapshot: TrendsSnapshot,
    pub paths: SnapshotPaths,
    pub batches_total: usize,
    pub batches_failed: usize,
}

/// Runs a full collection against `base_url` and writes the snapshot under
/// `config.data_dir`.
pub(crate) async fn run_collection(
    config: &AppConfig,
    base_url: &str,
) -> anyhow::Result<RunSummary> {
    tracing::info!(
        region = %config.trends.region,
        keywords = config.trends.keywords.len(),
        "starting Google Trends collection"
    );

    let settings = ClientSettings::from_app_config(config);
    let report = match GoogleTrendsClient::connect_with_base_url(settings, base_url).await {
        Ok(mut client) => collect_keywords(&mut client, &config.trends).await,
        Err(e) => {
            tracing::warn!(error = %e, "could not open Google Trends session");
            CollectionReport {
                outcome: CollectionOutcome::Empty,
                batches_total: 0,
                batches_failed: 0,
            }
        }
    };

    let snapshot = build_snapshot(report.outcome, &config.trends, Local::now());
    let paths = write_snapshot(&config.data_dir, &snapshot).with_context(|| {
        format!(
            "failed to write trends snapshot to {}",
            config.data_dir.display()
        )
    })?;

    tracing::info!(
        path = %paths.timestamped.display(),
        keywords = snapshot.keywords.len(),
        curated = snapshot.is_curated(),
        "snapshot saved"
    );

    Ok(RunSummary {
        snapshot,
        paths,
        batches_total: report.batches_total,
        batches_failed: report.batches_failed,
    })
}

impl fmt::Display for RunSummary {
    /// Human-readable run summary for stdout.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = &self.snapshot;
        writeln!(f, "Google Trends snapshot ({})", snapshot.region)?;
        writeln!(f, "Method: {}", snapshot.metadata.method)?;
        if self.batches_total > 0 {
            writeln!(
                f,
                "Batches: {} ok, {} failed",
                self.batches_total - self.batches_failed,
                self.batches_failed
            )?;
        }
        for record in &snapshot.keywords {
            writeln!(
                f,
                "  {:<18} {:>3}  {}",
                record.keyword(),
                record.average_interest(),
                record.trend()
            )?;
        }
        writeln!(f, "Saved: {}", self.paths.timestamped.display())?;
        write!(f, "Latest: {}", self.paths.latest.display())
    }
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
