//! # Message Composition
//!
//! Turns one [`DayForecast`] and its tide result sets into the text blocks the bot
//! posts: a day title, a "Tides" summary and a "Surf forecast" summary.

use crate::config::EmojiConfig;
use crate::handler::ReportError;
use crate::rating::entry_rating_slots;
use crate::{DayForecast, ForecastEntry, TideDay, TideEvent};
use chrono::DateTime;

/// Shown instead of tide times when the tide response can't be trusted
pub const TIDE_PLACEHOLDER: &str = "Tide data unavailable";

/// Separator between tide events
const TIDE_DELIMITER: &str = " | ";

/// Title for a day's message, e.g. "Tuesday 14 November".
pub fn compose_day_title(day: &DayForecast) -> String {
    DateTime::from_timestamp(day.day_start_local_timestamp, 0)
        .map(|dt| dt.format("%A %-d %B").to_string())
        .unwrap_or_else(|| "Forecast".to_string())
}

/// Forecast summary for one day, one block of lines per three-hour window.
pub fn compose_forecast_text(day: &DayForecast, emoji: &EmojiConfig) -> String {
    day.entries
        .iter()
        .map(|entry| compose_entry(entry, emoji))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn compose_entry(entry: &ForecastEntry, emoji: &EmojiConfig) -> String {
    let stars: String = entry_rating_slots(entry.solid_rating, entry.faded_rating)
        .into_iter()
        .map(|slot| emoji.code(slot))
        .collect();

    let swell = &entry.swell;
    let wind = &entry.wind;

    [
        format!("**{}**", entry.three_hour_time_text),
        format!(
            "{}-{}{}",
            format_number(swell.min_breaking_height),
            format_number(swell.max_breaking_height),
            swell.unit
        ),
        stars,
        format!(
            "Swell {}{} @ {}s",
            format_number(swell.height),
            swell.unit,
            swell.period
        ),
        format!(
            "Wind {}{} {}",
            format_number(wind.speed),
            wind.unit,
            wind.direction_label
        )
        .trim_end()
        .to_string(),
    ]
    .join("\n")
}

/// Tide summary for one day.
///
/// Zero or several result sets means the API answered for the wrong window, so
/// the placeholder is returned instead of failing the whole day.
pub fn compose_tide_text(sets: &[TideDay]) -> String {
    match single_result_set(sets) {
        Ok(set) => {
            let text = set
                .events
                .iter()
                .map(format_tide_event)
                .collect::<Vec<_>>()
                .join(TIDE_DELIMITER);
            if text.is_empty() {
                TIDE_PLACEHOLDER.to_string()
            } else {
                text
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "using tide placeholder");
            TIDE_PLACEHOLDER.to_string()
        }
    }
}

/// The only result set of a tide response.
pub fn single_result_set(sets: &[TideDay]) -> Result<&TideDay, ReportError> {
    match sets {
        [set] => Ok(set),
        _ => Err(ReportError::AnomalousTideData(sets.len())),
    }
}

/// "HIGH 3:05pm" in the spot's local time
fn format_tide_event(event: &TideEvent) -> String {
    let local = event.timestamp_utc + event.timezone_offset;
    match DateTime::from_timestamp(local, 0) {
        Some(dt) => format!("{} {}", event.state, dt.format("%-I:%M%P")),
        None => event.state.clone(),
    }
}

/// Whole numbers without a decimal, everything else to one place
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
