//! HTTP client for the Google Trends web API.
//!
//! Mirrors what the Trends web UI does: prime a cookie session, build a
//! comparison with the `explore` endpoint, then fetch each widget's data with
//! the token the comparison returned. One client is one session; it is
//! reused for every batch of a run.

use std::time::Duration;

use aruma_core::AppConfig;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::TrendsError;
use crate::provider::TrendsProvider;
use crate::rate_limit::retry_with_backoff;
use crate::types::{
    BatchQuery, ComparedGeoResponse, ExploreResponse, ExploreWidget, MultilineResponse,
    RegionBreakdown, RelatedQueries, RelatedQueryLists, RelatedSearchesResponse, Resolution,
    TimeSeriesTable,
};

/// Production Google Trends host.
pub const DEFAULT_BASE_URL: &str = "https://trends.google.com/";
const EXPLORE_PATH: &str = "trends/api/explore";
const MULTILINE_PATH: &str = "trends/api/widgetdata/multiline";
const COMPARED_GEO_PATH: &str = "trends/api/widgetdata/comparedgeo";
const RELATED_SEARCHES_PATH: &str = "trends/api/widgetdata/relatedsearches";

/// Session-level settings of a [`GoogleTrendsClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Sent as `hl`, e.g. `es-PE`.
    pub host_language: String,
    /// Sent as `tz`, in minutes.
    pub tz_offset_minutes: i32,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl ClientSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            host_language: config.host_language.clone(),
            tz_offset_minutes: config.tz_offset_minutes,
            request_timeout_secs: config.request_timeout_secs,
            connect_timeout_secs: config.connect_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

/// Widgets of the current comparison.
#[derive(Debug, Clone)]
struct Payload {
    keywords: Vec<String>,
    time_series: Option<ExploreWidget>,
    region: Option<ExploreWidget>,
    related: Vec<ExploreWidget>,
}

impl Payload {
    fn from_widgets(keywords: &[String], widgets: Vec<ExploreWidget>) -> Self {
        let mut payload = Self {
            keywords: keywords.to_vec(),
            time_series: None,
            region: None,
            related: Vec::new(),
        };
        for widget in widgets {
            if widget.id == "TIMESERIES" {
                payload.time_series = Some(widget);
            } else if widget.id == "GEO_MAP" && payload.region.is_none() {
                payload.region = Some(widget);
            } else if widget.id.contains("RELATED_QUERIES") {
                payload.related.push(widget);
            }
        }
        payload
    }
}

/// Client for the Google Trends web API.
///
/// Use [`GoogleTrendsClient::connect`] for production or
/// [`GoogleTrendsClient::connect_with_base_url`] to point at a mock server in
/// tests.
pub struct GoogleTrendsClient {
    client: Client,
    base_url: Url,
    settings: ClientSettings,
    payload: Option<Payload>,
}

impl GoogleTrendsClient {
    /// Opens a session against the production Google Trends host.
    ///
    /// # Errors
    ///
    /// Returns [`TrendsError::Http`] if the HTTP client cannot be built or the
    /// session cookie request fails at the transport level.
    pub async fn connect(settings: ClientSettings) -> Result<Self, TrendsError> {
        Self::connect_with_base_url(settings, DEFAULT_BASE_URL).await
    }

    /// Opens a session against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TrendsError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`TrendsError::Http`] if the client cannot be built or the session
    /// cookie request fails at the transport level.
    pub async fn connect_with_base_url(
        settings: ClientSettings,
        base_url: &str,
    ) -> Result<Self, TrendsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .cookie_store(true)
            .build()?;

        let base_url = normalise_base_url(base_url)?;
        let session = Self {
            client,
            base_url,
            settings,
            payload: None,
        };
        session.prime_cookies().await?;
        Ok(session)
    }

    /// Requests the Trends home page so the cookie store holds a session
    /// cookie. A non-2xx answer is logged, not fatal: later calls may still
    /// succeed without the cookie.
    async fn prime_cookies(&self) -> Result<(), TrendsError> {
        let geo = session_geo(&self.settings.host_language);
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("geo", &geo);

        let response = retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_base_ms,
            || {
                let url = url.clone();
                async move { self.client.get(url).send().await.map_err(TrendsError::from) }
            },
        )
        .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%geo, "Google Trends session primed");
        } else {
            tracing::warn!(
                %geo,
                status = status.as_u16(),
                "session cookie request was not successful; continuing without it"
            );
        }
        Ok(())
    }

    /// Builds the comparison for a batch and stores its widgets.
    async fn build_payload(&mut self, query: &BatchQuery<'_>) -> Result<&Payload, TrendsError> {
        self.payload = None;

        let comparison: Vec<serde_json::Value> = query
            .keywords
            .iter()
            .map(|keyword| {
                json!({
                    "keyword": keyword,
                    "time": query.timeframe,
                    "geo": query.region,
                })
            })
            .collect();
        let req = json!({
            "comparisonItem": comparison,
            "category": query.category_id,
            "property": "",
        });

        let params = vec![
            ("hl", self.settings.host_language.clone()),
            ("tz", self.settings.tz_offset_minutes.to_string()),
            ("req", req.to_string()),
        ];
        let url = self.endpoint(EXPLORE_PATH)?;
        let body = self.request_text(Method::POST, &url, &params).await?;
        let explore: ExploreResponse =
            parse_guarded(&body, &format!("explore({})", query.keywords.join(", ")))?;

        tracing::debug!(
            keywords = ?query.keywords,
            widgets = explore.widgets.len(),
            "built Google Trends payload"
        );
        Ok(self
            .payload
            .insert(Payload::from_widgets(query.keywords, explore.widgets)))
    }

    /// Fetches a widget's data document.
    async fn widget_data<T: DeserializeOwned>(
        &self,
        path: &str,
        widget: &ExploreWidget,
        request: &serde_json::Value,
    ) -> Result<T, TrendsError> {
        let params = vec![
            ("req", request.to_string()),
            ("token", widget.token.clone()),
            ("tz", self.settings.tz_offset_minutes.to_string()),
        ];
        let url = self.endpoint(path)?;
        let body = self.request_text(Method::GET, &url, &params).await?;
        parse_guarded(&body, &format!("{path} ({})", widget.id))
    }

    fn endpoint(&self, path: &str) -> Result<Url, TrendsError> {
        self.base_url
            .join(path)
            .map_err(|e| TrendsError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn current_payload(&self) -> Result<&Payload, TrendsError> {
        self.payload.as_ref().ok_or(TrendsError::NoPayload)
    }

    /// Sends a request with retry, maps 429 and other non-2xx statuses to
    /// typed errors, and returns the body text.
    async fn request_text(
        &self,
        method: Method,
        url: &Url,
        params: &[(&str, String)],
    ) -> Result<String, TrendsError> {
        retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_base_ms,
            || {
                let method = method.clone();
                let url = url.clone();
                async move {
                    let response = self
                        .client
                        .request(method, url.clone())
                        .query(params)
                        .send()
                        .await?;
                    let status = response.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after_secs = response
                            .headers()
                            .get(reqwest::header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(60);
                        return Err(TrendsError::RateLimited { retry_after_secs });
                    }

                    if !status.is_success() {
                        return Err(TrendsError::UnexpectedStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }

                    Ok(response.text().await?)
                }
            },
        )
        .await
    }
}

impl TrendsProvider for GoogleTrendsClient {
    async fn query_time_series(
        &mut self,
        query: &BatchQuery<'_>,
    ) -> Result<TimeSeriesTable, TrendsError> {
        let payload = self.build_payload(query).await?;
        let keywords = payload.keywords.clone();
        let widget = payload
            .time_series
            .clone()
            .ok_or(TrendsError::MissingWidget("TIMESERIES"))?;

        let response: MultilineResponse = self
            .widget_data(MULTILINE_PATH, &widget, &widget.request)
            .await?;
        let partial = response
            .default
            .timeline_data
            .iter()
            .filter(|point| point.is_partial)
            .count();
        let table = TimeSeriesTable::from_multiline(&keywords, response.default);
        tracing::debug!(
            keywords = ?keywords,
            points = table.len(),
            partial,
            "interest over time received"
        );
        Ok(table)
    }

    async fn query_region_breakdown(
        &mut self,
        resolution: Resolution,
        include_low_volume: bool,
    ) -> Result<RegionBreakdown, TrendsError> {
        let payload = self.current_payload()?;
        let widget = payload
            .region
            .as_ref()
            .ok_or(TrendsError::MissingWidget("GEO_MAP"))?;

        let mut request = widget.request.clone();
        if let Some(obj) = request.as_object_mut() {
            obj.insert("resolution".to_string(), json!(resolution.as_str()));
            obj.insert(
                "includeLowSearchVolumeGeos".to_string(),
                json!(include_low_volume),
            );
        }

        let response: ComparedGeoResponse = self
            .widget_data(COMPARED_GEO_PATH, widget, &request)
            .await?;
        Ok(RegionBreakdown::from_compared_geo(
            &payload.keywords,
            response.default,
        ))
    }

    async fn query_related_queries(&mut self) -> Result<RelatedQueries, TrendsError> {
        let payload = self.current_payload()?;
        let mut related = RelatedQueries::new();

        for (idx, widget) in payload.related.iter().enumerate() {
            let keyword = widget
                .restricted_keyword()
                .map(str::to_string)
                .or_else(|| payload.keywords.get(idx).cloned());
            let Some(keyword) = keyword else {
                tracing::debug!(widget = %widget.id, "related-queries widget without keyword");
                continue;
            };

            let response: RelatedSearchesResponse = self
                .widget_data(RELATED_SEARCHES_PATH, widget, &widget.request)
                .await?;
            related.insert(
                keyword,
                RelatedQueryLists::from_related_searches(response.default),
            );
        }

        Ok(related)
    }
}

/// Ensures the base URL ends with exactly one slash so relative endpoint
/// paths join under it.
fn normalise_base_url(base_url: &str) -> Result<Url, TrendsError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| TrendsError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Country code used to prime the session: the last two characters of the
/// host language (`es-PE` → `PE`).
fn session_geo(host_language: &str) -> String {
    let len = host_language.chars().count();
    host_language.chars().skip(len.saturating_sub(2)).collect()
}

/// Drops the anti-XSSI guard that precedes every Trends JSON document.
fn strip_xssi_prefix(body: &str) -> &str {
    body.find('{').map_or(body, |start| &body[start..])
}

fn parse_guarded<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, TrendsError> {
    serde_json::from_str(strip_xssi_prefix(body)).map_err(|e| TrendsError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
