// libs/provider-cell/src/services/summary.rs
use std::collections::HashMap;

use chrono::NaiveTime;

use crate::models::{AvailabilityBlock, AvailabilityWindow};

/// Canonical week order for rendering; day names outside this set sort last.
const DAY_ORDER: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn day_index(day: &str) -> usize {
    DAY_ORDER
        .iter()
        .position(|d| *d == day)
        .unwrap_or(DAY_ORDER.len())
}

fn twelve_hour(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Compact a provider's full weekly schedule into one line, e.g.
/// `"Mon, Wed: 9:00 AM - 12:00 PM | Fri: 2:00 PM - 6:00 PM"`.
///
/// Windows sharing an exact (start, end) pair collapse into one segment
/// regardless of weekday; within a segment weekdays run Mon to Sun with
/// duplicates removed, and segments are ordered by their earliest weekday.
/// The output depends only on the set of rows, never on their order. An
/// empty schedule has no summary at all.
pub fn availability_summary(windows: &[AvailabilityWindow]) -> Option<String> {
    let mut buckets: HashMap<(NaiveTime, NaiveTime), Vec<&str>> = HashMap::new();
    for window in windows {
        buckets
            .entry((window.start_time, window.end_time))
            .or_default()
            .push(window.day.as_str());
    }

    let mut segments: Vec<(usize, NaiveTime, NaiveTime, String)> = Vec::new();
    for ((start, end), mut days) in buckets {
        days.sort_by_key(|day| (day_index(day), *day));
        days.dedup();

        let rendered = format!(
            "{}: {} - {}",
            days.join(", "),
            twelve_hour(start),
            twelve_hour(end)
        );
        segments.push((day_index(days[0]), start, end, rendered));
    }

    if segments.is_empty() {
        return None;
    }

    segments.sort_by(|a, b| (a.0, a.1, a.2).cmp(&(b.0, b.1, b.2)));
    Some(
        segments
            .iter()
            .map(|segment| segment.3.as_str())
            .collect::<Vec<_>>()
            .join(" | "),
    )
}

/// Flat per-window view with wall-clock times, ordered Mon to Sun then by
/// start time.
pub fn availability_blocks(windows: &[AvailabilityWindow]) -> Vec<AvailabilityBlock> {
    let mut blocks: Vec<AvailabilityBlock> = windows
        .iter()
        .map(|window| AvailabilityBlock {
            day: window.day.clone(),
            start: window.start_time.format("%H:%M").to_string(),
            end: window.end_time.format("%H:%M").to_string(),
        })
        .collect();

    blocks.sort_by(|a, b| {
        (day_index(&a.day), &a.start, &a.end).cmp(&(day_index(&b.day), &b.start, &b.end))
    });
    blocks
}
