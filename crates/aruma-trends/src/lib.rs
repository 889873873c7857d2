//! Google Trends collection for the Aruma beauty keyword set.
//!
//! [`collect_keywords`] drives a [`TrendsProvider`] batch by batch,
//! [`build_snapshot`] turns the outcome into a [`aruma_core::TrendsSnapshot`]
//! (falling back to [`curated_trends`] when nothing was collected), and
//! [`write_snapshot`] persists it.

pub mod batch;
pub mod client;
pub mod collector;
pub mod error;
pub mod fallback;
pub mod provider;
mod rate_limit;
pub mod store;
pub mod summarize;
pub mod types;

pub use batch::batch_keywords;
pub use client::{ClientSettings, GoogleTrendsClient};
pub use collector::{build_snapshot, collect_keywords, CollectionOutcome, CollectionReport};
pub use error::{StoreError, TrendsError};
pub use fallback::curated_trends;
pub use provider::TrendsProvider;
pub use store::{read_snapshot, write_snapshot, SnapshotPaths};
pub use summarize::summarize_keyword;
pub use types::{
    BatchArtifacts, BatchQuery, Observation, RankedQuery, RegionBreakdown, RegionRow,
    RelatedQueries, RelatedQueryLists, Resolution, TimeSeriesTable,
};
