//! Grouping of three-hour forecast windows into local calendar days.
//!
//! Also derives the per-day tide request windows from the grouped days.

use crate::{DayForecast, ForecastEntry};

/// Local-time label the API puts on the first window of each day.
pub const MIDNIGHT_LABEL: &str = "12am";

/// Group an ascending forecast feed into days.
///
/// A new day starts at the first entry and at every entry labelled "12am";
/// everything else is appended to the current day. No entry is dropped, so the
/// entry counts across all days add up to `entries.len()`. A feed that doesn't
/// start at midnight produces a partial first day.
pub fn group_by_day(entries: &[ForecastEntry]) -> Vec<DayForecast> {
    let mut days: Vec<DayForecast> = Vec::new();

    for entry in entries {
        match days.last_mut() {
            Some(day) if entry.three_hour_time_text != MIDNIGHT_LABEL => {
                day.entries.push(entry.clone());
            }
            _ => days.push(DayForecast {
                day_start_timestamp: entry.timestamp,
                day_start_local_timestamp: entry.local_timestamp,
                entries: vec![entry.clone()],
            }),
        }
    }

    days
}

const SECONDS_PER_DAY: i64 = 86_400;

/// Inclusive UTC `(start, end)` tide window for each day.
///
/// A day ends one second before the next day starts. The last day ends one
/// second before the local midnight that follows its start.
pub fn tide_windows(days: &[DayForecast]) -> Vec<(i64, i64)> {
    days.iter()
        .enumerate()
        .map(|(i, day)| {
            let end = match days.get(i + 1) {
                Some(next) => next.day_start_timestamp - 1,
                None => next_local_midnight_utc(day) - 1,
            };
            (day.day_start_timestamp, end)
        })
        .collect()
}

/// UTC epoch seconds of the first local midnight after `day` starts
fn next_local_midnight_utc(day: &DayForecast) -> i64 {
    let offset = day.day_start_local_timestamp - day.day_start_timestamp;
    let local_midnight =
        (day.day_start_local_timestamp.div_euclid(SECONDS_PER_DAY) + 1) * SECONDS_PER_DAY;
    local_midnight - offset
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 8] = ["12am", "3am", "6am", "9am", "12pm", "3pm", "6pm", "9pm"];

    fn feed(start_slot: usize, len: usize) -> Vec<ForecastEntry> {
        (0..len)
            .map(|i| {
                let slot = start_slot + i;
                let ts = 1_699_920_000 + slot as i64 * 3 * 3600;
                ForecastEntry {
                    timestamp: ts,
                    local_timestamp: ts,
                    three_hour_time_text: LABELS[slot % 8].to_string(),
                    solid_rating: 0,
                    faded_rating: 0,
                    swell: Default::default(),
                    wind: Default::default(),
                }
            })
            .collect()
    }

    #[test]
    fn test_two_full_days() {
        let entries = feed(0, 16);
        let days = group_by_day(&entries);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].entries.len(), 8);
        assert_eq!(days[1].entries.len(), 8);
        assert_eq!(days[1].day_start_timestamp, entries[8].timestamp);
        assert_eq!(days[1].day_start_local_timestamp, entries[8].local_timestamp);

        let total: usize = days.iter().map(|d| d.entries.len()).sum();
        assert_eq!(total, 16);
    }

    #[test]
    fn test_partial_first_day() {
        // Feed starts at 9am: 9am, 12pm, 3pm, 6pm, 9pm, then a full day
        let entries = feed(3, 13);
        let days = group_by_day(&entries);

        assert_eq!(entries[0].three_hour_time_text, "9am");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].entries.len(), 5);
        assert_eq!(days[0].day_start_timestamp, entries[0].timestamp);
        assert_eq!(days[1].entries[0].three_hour_time_text, "12am");
        assert_eq!(days[1].entries.len(), 8);
    }

    #[test]
    fn test_entries_stay_in_feed_order() {
        let entries = feed(0, 8);
        let days = group_by_day(&entries);
        assert_eq!(days[0].entries, entries);
    }

    #[test]
    fn test_tide_windows_stop_at_next_day() {
        // Feed starts at 9pm UTC, so the first day holds a single window
        let entries = feed(7, 9);
        let days = group_by_day(&entries);
        let windows = tide_windows(&days);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0], (entries[0].timestamp, entries[1].timestamp - 1));
        assert_eq!(
            windows[1],
            (entries[1].timestamp, entries[1].timestamp + SECONDS_PER_DAY - 1)
        );
    }

    #[test]
    fn test_last_window_ends_at_local_midnight() {
        // 2023-11-14 06:00 local in UTC+10, which is 2023-11-13 20:00 UTC
        let utc = 1_699_905_600;
        let day = DayForecast {
            day_start_timestamp: utc,
            day_start_local_timestamp: utc + 36_000,
            entries: vec![],
        };

        // Local midnight 2023-11-15 00:00 is 2023-11-14 14:00 UTC
        assert_eq!(tide_windows(&[day]), vec![(utc, 1_699_970_400 - 1)]);
    }

    #[test]
    fn test_empty_feed() {
        assert!(group_by_day(&[]).is_empty());
    }
}
