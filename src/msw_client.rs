//! # Surf Forecast API Client
//!
//! Read-only client for the three endpoints the bot needs:
//!
//! | Call              | Endpoint                                                 |
//! |-------------------|----------------------------------------------------------|
//! | [`search_spots`]  | `{base}/{key}/search?match=CONTAINS&type=SPOT&query=..`  |
//! | [`get_forecast`]  | `{base}/{key}/forecast/?spot_id=..&fields=..&units=..`   |
//! | [`get_tides`]     | `{base}/{key}/tide/?spot_id=..&start=..&end=..`          |
//!
//! ## Error Handling
//! - Transport failures and non-2xx statuses become [`ClientError::RemoteService`]
//! - Bodies that don't match the expected JSON shape become
//!   [`ClientError::MalformedResponse`]
//!
//! There are no retries and nothing is cached: every call goes to the network and
//! a failure is returned to the caller straight away.
//!
//! [`search_spots`]: SurfApi::search_spots
//! [`get_forecast`]: SurfApi::get_forecast
//! [`get_tides`]: SurfApi::get_tides

use crate::config::ApiConfig;
use crate::{ForecastEntry, Spot, TideDay};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Fields requested from the forecast endpoint
const FORECAST_FIELDS: &str = "timestamp,localTimestamp,threeHourTimeText,solidRating,fadedRating,swell.minBreakingHeight,swell.maxBreakingHeight,swell.height,swell.period,swell.unit,wind.speed,wind.unit,wind.compassDirection";

/// Errors returned by the forecast API client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network failure or non-success HTTP status
    #[error("remote service error: {0}")]
    RemoteService(String),

    /// Body could not be parsed into the expected shape
    #[error("malformed response from {endpoint}: {source}")]
    MalformedResponse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The three read-only calls the command handler makes.
#[async_trait]
pub trait SurfApi: Send + Sync {
    /// Spots whose name contains `query`, best match first
    async fn search_spots(&self, query: &str) -> Result<Vec<Spot>, ClientError>;

    /// Three-hour forecast windows for a spot, ascending by timestamp
    async fn get_forecast(&self, spot_id: i64) -> Result<Vec<ForecastEntry>, ClientError>;

    /// Tide result sets for `[start, end]` (UTC epoch seconds)
    async fn get_tides(&self, spot_id: i64, start: i64, end: i64)
        -> Result<Vec<TideDay>, ClientError>;
}

/// HTTP implementation of [`SurfApi`].
#[derive(Debug, Clone)]
pub struct MswClient {
    client: reqwest::Client,
    endpoint_root: String,
    units: String,
}

/// One entry of the search response, grouped by result type
#[derive(Debug, Deserialize)]
struct SearchGroup {
    #[serde(default)]
    results: Vec<Spot>,
    #[serde(rename = "type", default)]
    kind: String,
}

impl MswClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::RemoteService(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint_root: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.api_key
            ),
            units: config.units.clone(),
        })
    }

    async fn get_body(&self, path: &str, query: &[(&str, String)]) -> Result<String, ClientError> {
        let url = format!("{}/{}", self.endpoint_root, path);
        tracing::debug!(%url, ?query, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::RemoteService(format!("request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::RemoteService(format!(
                "HTTP {status} from {path}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ClientError::RemoteService(format!("reading {path} body failed: {e}")))
    }
}

#[async_trait]
impl SurfApi for MswClient {
    async fn search_spots(&self, query: &str) -> Result<Vec<Spot>, ClientError> {
        let body = self
            .get_body(
                "search",
                &[
                    ("match", "CONTAINS".to_string()),
                    ("type", "SPOT".to_string()),
                    ("query", query.to_string()),
                ],
            )
            .await?;
        parse_search(&body)
    }

    async fn get_forecast(&self, spot_id: i64) -> Result<Vec<ForecastEntry>, ClientError> {
        let body = self
            .get_body(
                "forecast/",
                &[
                    ("spot_id", spot_id.to_string()),
                    ("fields", FORECAST_FIELDS.to_string()),
                    ("units", self.units.clone()),
                ],
            )
            .await?;
        parse_forecast(&body)
    }

    async fn get_tides(
        &self,
        spot_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<TideDay>, ClientError> {
        let body = self
            .get_body(
                "tide/",
                &[
                    ("spot_id", spot_id.to_string()),
                    ("start", start.to_string()),
                    ("end", end.to_string()),
                ],
            )
            .await?;
        parse_tides(&body)
    }
}

fn parse_json<T: DeserializeOwned>(endpoint: &'static str, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|source| ClientError::MalformedResponse { endpoint, source })
}

/// Spots from a search body. Only `SPOT` groups are kept.
pub fn parse_search(body: &str) -> Result<Vec<Spot>, ClientError> {
    let groups: Vec<SearchGroup> = parse_json("search", body)?;
    Ok(groups
        .into_iter()
        .filter(|g| g.kind.is_empty() || g.kind.eq_ignore_ascii_case("SPOT"))
        .flat_map(|g| g.results)
        .collect())
}

/// Forecast windows from a forecast body, sorted ascending by timestamp.
pub fn parse_forecast(body: &str) -> Result<Vec<ForecastEntry>, ClientError> {
    let mut entries: Vec<ForecastEntry> = parse_json("forecast", body)?;
    // The API already returns ascending order; a stable sort keeps that as-is
    entries.sort_by_key(|e| e.timestamp);
    Ok(entries)
}

/// Tide result sets from a tide body.
pub fn parse_tides(body: &str) -> Result<Vec<TideDay>, ClientError> {
    parse_json("tide", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let body = r#"[
            {"type": "SPOT", "results": [
                {"id": 1449, "name": "Porthcawl - Rest Bay", "URL": "/Porthcawl-Surf-Report/1449/", "tideURL": "/Porthcawl-Tide/1449/", "score": 13.5},
                {"id": 7, "name": "Porthcawl Point", "score": 9.1}
            ]},
            {"type": "AREA", "results": [{"id": 99, "name": "South Wales"}]}
        ]"#;

        let spots = parse_search(body).unwrap();
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].id, 1449);
        assert_eq!(spots[0].url, "/Porthcawl-Surf-Report/1449/");
        assert_eq!(spots[0].tide_url, "/Porthcawl-Tide/1449/");
        assert_eq!(spots[1].url, "");
    }

    #[test]
    fn test_parse_search_empty() {
        assert!(parse_search("[]").unwrap().is_empty());
        assert!(parse_search(r#"[{"type":"SPOT","results":[]}]"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_forecast() {
        let body = r#"[
            {"timestamp": 1700010800, "localTimestamp": 1700010800, "threeHourTimeText": "3am",
             "solidRating": 1, "fadedRating": 2,
             "swell": {"minBreakingHeight": 2, "maxBreakingHeight": 3, "height": 4.5, "period": 11, "unit": "ft"},
             "wind": {"speed": 12, "unit": "mph", "compassDirection": "SW"}},
            {"timestamp": 1700000000, "localTimestamp": 1700000000, "threeHourTimeText": "12am",
             "solidRating": 0, "fadedRating": 0}
        ]"#;

        let entries = parse_forecast(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].three_hour_time_text, "12am");
        assert_eq!(entries[1].swell.period, 11);
        assert_eq!(entries[1].swell.max_breaking_height, 3.0);
        assert_eq!(entries[1].wind.direction_label, "SW");
        assert_eq!(entries[0].swell, Default::default());
    }

    #[test]
    fn test_parse_tides() {
        let body = r#"[{"timestamp": 1700000000, "tide": [
            {"shortdate": "14/11", "state": "LOW", "unixtime": 1700006400, "timezoneOffset": 0},
            {"shortdate": "14/11", "state": "HIGH", "unixtime": 1700028000, "timezoneOffset": 0}
        ]}]"#;

        let sets = parse_tides(body).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].events.len(), 2);
        assert_eq!(sets[0].events[1].state, "HIGH");
        assert_eq!(sets[0].events[1].timestamp_utc, 1700028000);
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_forecast(r#"{"error_response": {"code": 501}}"#).unwrap_err();
        assert!(matches!(
            err,
            ClientError::MalformedResponse {
                endpoint: "forecast",
                ..
            }
        ));

        assert!(matches!(
            parse_search("<html>"),
            Err(ClientError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_endpoint_root_trims_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:9/api/".to_string(),
            ..ApiConfig::default()
        };
        let client = MswClient::new(&config).unwrap();
        assert_eq!(client.endpoint_root, "http://localhost:9/api/mdkey");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_remote_service_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
            request_timeout_secs: 2,
            ..ApiConfig::default()
        };
        let client = MswClient::new(&config).unwrap();
        let err = client.search_spots("porthcawl").await.unwrap_err();
        assert!(matches!(err, ClientError::RemoteService(_)));
    }
}
