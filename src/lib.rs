//! # Surf Bot Core Library
//!
//! This library holds the data model and the forecast pipeline behind the surf bot:
//! fetching spots, forecasts and tides from the surf forecast API, grouping the
//! three-hour forecast windows into days, and turning each day into chat text.
//!
//! ## Data Flow
//! 1. **Search**: resolve a free-text spot name to a [`Spot`] (first match wins)
//! 2. **Forecast**: fetch the spot's [`ForecastEntry`] feed, ascending by time
//! 3. **Group**: split the feed into [`DayForecast`]s at each "12am" marker
//! 4. **Tides**: fetch the [`TideDay`] result sets for each day's start timestamp
//! 5. **Compose**: render tide and forecast text, one message per day
//!
//! Every entity here is built for one command and dropped once the reply is sent.
//! Nothing is cached or persisted between commands.

use serde::{Deserialize, Serialize};

pub mod aggregate;
pub mod compose;
pub mod config;
pub mod handler;
pub mod logging;
pub mod msw_client;
pub mod rating;

/// A named surf location returned by the spot search endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: i64,
    pub name: String,
    #[serde(rename = "URL", default)]
    pub url: String,
    #[serde(rename = "tideURL", default)]
    pub tide_url: String,
    /// Search relevance, higher is a better match
    #[serde(default)]
    pub score: f64,
}

/// Swell conditions for one forecast window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swell {
    #[serde(default)]
    pub min_breaking_height: f64,
    #[serde(default)]
    pub max_breaking_height: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub period: i64,
    #[serde(default)]
    pub unit: String,
}

/// Wind conditions for one forecast window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub unit: String,
    /// Compass label such as "SW"
    #[serde(rename = "compassDirection", default)]
    pub direction_label: String,
}

/// One three-hour forecast window.
///
/// `three_hour_time_text` is the local-time label the API attaches to the window
/// ("12am", "3am", ... "9pm"). A "12am" label marks the start of a new local day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    /// UTC epoch seconds
    pub timestamp: i64,
    /// Epoch seconds shifted into the spot's local time
    pub local_timestamp: i64,
    pub three_hour_time_text: String,
    /// 0-5
    pub solid_rating: i64,
    /// 0-5
    pub faded_rating: i64,
    #[serde(default)]
    pub swell: Swell,
    #[serde(default)]
    pub wind: Wind,
}

/// Forecast windows sharing one local calendar day.
///
/// Entries are contiguous in the original feed and stay in feed order.
#[derive(Clone, Debug, PartialEq)]
pub struct DayForecast {
    pub day_start_timestamp: i64,
    pub day_start_local_timestamp: i64,
    pub entries: Vec<ForecastEntry>,
}

/// A predicted high or low tide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TideEvent {
    /// "HIGH" or "LOW"
    pub state: String,
    #[serde(rename = "unixtime")]
    pub timestamp_utc: i64,
    /// Seconds east of UTC at the spot
    #[serde(default)]
    pub timezone_offset: i64,
}

/// One result set from the tide endpoint.
///
/// A well-formed response for a single-day window holds exactly one of these.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TideDay {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(rename = "tide", default)]
    pub events: Vec<TideEvent>,
}
