//! The seam between the collector and the trends data provider.

use crate::error::TrendsError;
use crate::types::{BatchQuery, RegionBreakdown, RelatedQueries, Resolution, TimeSeriesTable};

/// A stateful trends session.
///
/// [`query_time_series`](TrendsProvider::query_time_series) builds the batch
/// comparison; the region and related-query calls then describe that same
/// batch. Any call may fail independently.
#[allow(async_fn_in_trait)]
pub trait TrendsProvider {
    /// Interest over time for every keyword of `query`.
    ///
    /// # Errors
    ///
    /// Returns [`TrendsError`] when the comparison or its data cannot be fetched.
    async fn query_time_series(
        &mut self,
        query: &BatchQuery<'_>,
    ) -> Result<TimeSeriesTable, TrendsError>;

    /// Interest by sub-region for the current batch.
    ///
    /// # Errors
    ///
    /// Returns [`TrendsError::NoPayload`] before a time-series query, or any
    /// transport/parse error.
    async fn query_region_breakdown(
        &mut self,
        resolution: Resolution,
        include_low_volume: bool,
    ) -> Result<RegionBreakdown, TrendsError>;

    /// Related queries for every keyword of the current batch.
    ///
    /// # Errors
    ///
    /// Returns [`TrendsError::NoPayload`] before a time-series query, or any
    /// transport/parse error.
    async fn query_related_queries(&mut self) -> Result<RelatedQueries, TrendsError>;
}
