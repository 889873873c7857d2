//! Google Trends wire types and the artifact tables built from them.
//!
//! ## Observed shape of the internal Trends API
//!
//! ### Anti-XSSI prefix
//! Every response body starts with a guard such as `)]}'` (explore) or
//! `)]}',` (widget data) before the JSON document. The client strips
//! everything before the first `{`.
//!
//! ### Explore
//! `POST /trends/api/explore` returns `{"widgets": [...]}`. Each widget has an
//! `id`, a `token`, and a `request` object that must be echoed back verbatim
//! (as the `req` query parameter) when fetching the widget's data. Ids seen:
//! `TIMESERIES`, `GEO_MAP` (comparison map), `GEO_MAP_0`.. (per keyword),
//! `RELATED_TOPICS`/`RELATED_QUERIES` (one per keyword, suffixed `_0`, `_1`..
//! when more than one keyword is compared).
//!
//! ### Multiline (time series)
//! `default.timelineData[]` entries carry `time` as a string of unix seconds
//! and `value` as one integer per compared keyword, in comparison order.
//! `hasData` flags exist but a `0` value is still a real observation; only a
//! missing or `null` entry is treated as not available.
//!
//! ### Compared geo (region breakdown)
//! `default.geoMapData[]` entries carry `geoName`, `geoCode` and `value` with
//! one integer per keyword.
//!
//! ### Related searches
//! `default.rankedList` holds two lists: index 0 is "top", index 1 is
//! "rising". Either may be missing for low-volume keywords.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

/// Top-level response from `POST /trends/api/explore`.
#[derive(Debug, Deserialize)]
pub struct ExploreResponse {
    #[serde(default)]
    pub widgets: Vec<ExploreWidget>,
}

/// One widget descriptor from the explore response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExploreWidget {
    pub id: String,
    #[serde(default)]
    pub token: String,
    /// Echoed back as the `req` parameter of the widget-data call.
    #[serde(default)]
    pub request: serde_json::Value,
}

impl ExploreWidget {
    /// Keyword a per-keyword widget is restricted to.
    ///
    /// Reads `request.restriction.complexKeywordsRestriction.keyword[0].value`.
    #[must_use]
    pub fn restricted_keyword(&self) -> Option<&str> {
        self.request
            .get("restriction")?
            .get("complexKeywordsRestriction")?
            .get("keyword")?
            .get(0)?
            .get("value")?
            .as_str()
    }
}

/// Response from `GET /trends/api/widgetdata/multiline`.
#[derive(Debug, Deserialize)]
pub struct MultilineResponse {
    pub default: MultilineData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultilineData {
    #[serde(default)]
    pub timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// Unix seconds, as a string.
    pub time: String,
    #[serde(default)]
    pub value: Vec<Option<u32>>,
    #[serde(default)]
    pub is_partial: bool,
}

/// Response from `GET /trends/api/widgetdata/comparedgeo`.
#[derive(Debug, Deserialize)]
pub struct ComparedGeoResponse {
    pub default: ComparedGeoData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparedGeoData {
    #[serde(default)]
    pub geo_map_data: Vec<GeoMapEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoMapEntry {
    pub geo_name: String,
    #[serde(default)]
    pub geo_code: String,
    #[serde(default)]
    pub value: Vec<Option<u32>>,
}

/// Response from `GET /trends/api/widgetdata/relatedsearches`.
#[derive(Debug, Deserialize)]
pub struct RelatedSearchesResponse {
    pub default: RelatedSearchesData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedSearchesData {
    #[serde(default)]
    pub ranked_list: Vec<RankedList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedList {
    #[serde(default)]
    pub ranked_keyword: Vec<RankedQuery>,
}

/// A related query with its provider score.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RankedQuery {
    pub query: String,
    /// Relative score for "top"; percentage growth for "rising".
    #[serde(default)]
    pub value: i64,
}

impl RankedQuery {
    #[must_use]
    pub fn new(query: &str, value: i64) -> Self {
        Self {
            query: query.to_string(),
            value,
        }
    }
}

/// Region granularity of the interest breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Country,
    Region,
    City,
    Dma,
}

impl Resolution {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Country => "COUNTRY",
            Resolution::Region => "REGION",
            Resolution::City => "CITY",
            Resolution::Dma => "DMA",
        }
    }
}

/// Parameters of one batch comparison.
#[derive(Debug, Clone, Copy)]
pub struct BatchQuery<'a> {
    pub keywords: &'a [String],
    pub category_id: u32,
    pub timeframe: &'a str,
    pub region: &'a str,
}

/// One dated observation of a keyword's interest. `None` is "not available".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<u32>,
}

/// Interest over time for every keyword of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeriesTable {
    keywords: Vec<String>,
    dates: Vec<NaiveDate>,
    /// One column per keyword, each `dates.len()` long.
    columns: Vec<Vec<Option<u32>>>,
}

impl TimeSeriesTable {
    /// Build a table from dated rows holding one value per keyword.
    ///
    /// Short rows are padded with `None`; extra values are dropped.
    #[must_use]
    pub fn from_rows(keywords: &[String], rows: Vec<(NaiveDate, Vec<Option<u32>>)>) -> Self {
        let mut columns = vec![Vec::with_capacity(rows.len()); keywords.len()];
        let mut dates = Vec::with_capacity(rows.len());
        for (date, values) in rows {
            dates.push(date);
            for (idx, column) in columns.iter_mut().enumerate() {
                column.push(values.get(idx).copied().flatten());
            }
        }
        Self {
            keywords: keywords.to_vec(),
            dates,
            columns,
        }
    }

    /// Build a table from a multiline response. Points whose `time` does not
    /// parse as unix seconds are skipped.
    #[must_use]
    pub fn from_multiline(keywords: &[String], data: MultilineData) -> Self {
        let rows = data
            .timeline_data
            .into_iter()
            .filter_map(|point| {
                let secs = point.time.parse::<i64>().ok()?;
                let date = DateTime::from_timestamp(secs, 0)?.date_naive();
                Some((date, point.value))
            })
            .collect();
        Self::from_rows(keywords, rows)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// The keyword's observations in date order, or `None` when the table is
    /// empty or has no column for the keyword.
    #[must_use]
    pub fn column(&self, keyword: &str) -> Option<Vec<Observation>> {
        if self.is_empty() {
            return None;
        }
        let idx = self.keywords.iter().position(|k| k == keyword)?;
        Some(
            self.dates
                .iter()
                .zip(&self.columns[idx])
                .map(|(date, value)| Observation {
                    date: *date,
                    value: *value,
                })
                .collect(),
        )
    }
}

/// One sub-region row of the interest breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRow {
    pub geo_name: String,
    pub geo_code: String,
    /// One value per keyword column.
    pub values: Vec<Option<u32>>,
}

/// Interest by sub-region, one column per keyword, rows in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionBreakdown {
    keywords: Vec<String>,
    rows: Vec<RegionRow>,
}

impl RegionBreakdown {
    #[must_use]
    pub fn new(keywords: &[String], rows: Vec<RegionRow>) -> Self {
        Self {
            keywords: keywords.to_vec(),
            rows,
        }
    }

    #[must_use]
    pub fn from_compared_geo(keywords: &[String], data: ComparedGeoData) -> Self {
        let rows = data
            .geo_map_data
            .into_iter()
            .map(|entry| RegionRow {
                geo_name: entry.geo_name,
                geo_code: entry.geo_code,
                values: entry.value,
            })
            .collect();
        Self::new(keywords, rows)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(region name, score)` for every row with a value for `keyword`, in
    /// provider order. `None` when the breakdown is empty or has no column
    /// for the keyword.
    #[must_use]
    pub fn column(&self, keyword: &str) -> Option<Vec<(&str, u32)>> {
        if self.is_empty() {
            return None;
        }
        let idx = self.keywords.iter().position(|k| k == keyword)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| {
                    let score = row.values.get(idx).copied().flatten()?;
                    Some((row.geo_name.as_str(), score))
                })
                .collect(),
        )
    }
}

/// "Top" and "rising" related queries of one keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedQueryLists {
    pub top: Option<Vec<RankedQuery>>,
    pub rising: Option<Vec<RankedQuery>>,
}

impl RelatedQueryLists {
    #[must_use]
    pub fn from_related_searches(data: RelatedSearchesData) -> Self {
        let mut lists = data.ranked_list.into_iter().map(|l| l.ranked_keyword);
        Self {
            top: lists.next(),
            rising: lists.next(),
        }
    }
}

/// Related queries per keyword of a batch.
pub type RelatedQueries = HashMap<String, RelatedQueryLists>;

/// The three raw artifacts of one batch. Absent artifacts are empty.
#[derive(Debug, Clone, Default)]
pub struct BatchArtifacts {
    pub time_series: TimeSeriesTable,
    pub regions: RegionBreakdown,
    pub related: RelatedQueries,
}
