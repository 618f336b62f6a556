//! Weekly schedule grammar.
//!
//! A schedule is a comma-delimited list of entries, each
//! `<DayName> <Time> [|<Selector>]`:
//!
//! ```text
//! Tuesday 7:00 PM|Both, Friday 4:00 PM
//! ```
//!
//! Day names accept the full English name or the 3-letter abbreviation,
//! case-insensitive. Times accept 12-hour (`7:00 PM`, `7 PM`) and 24-hour
//! (`19:00`, `19:00:00`) readings. The selector is either a concrete court
//! name or the `Both` sentinel, which expands to the configured court pair
//! right here so nothing downstream re-interprets selector strings.

use chrono::{NaiveTime, Weekday};

use courtbot_core::{CourtSelector, WeeklySlot};

use crate::error::{Result, ScheduleError};

/// Parse the full weekly schedule string.
///
/// An empty (or all-whitespace) schedule parses to an empty slot list — a
/// valid "nothing to book" configuration, not an error.
pub fn parse_weekly(
    schedule: &str,
    default_selector: &str,
    pair: &[String; 2],
) -> Result<Vec<WeeklySlot>> {
    schedule.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_entry(entry, default_selector, pair))
        .collect()
}

/// Parse a single `<DayName> <Time> [|<Selector>]` entry.
fn parse_entry(entry: &str, default_selector: &str, pair: &[String; 2]) -> Result<WeeklySlot> {
    let invalid = |reason: &str| ScheduleError::InvalidEntry {
        entry: entry.to_string(),
        reason: reason.to_string(),
    };

    let (head, selector) = match entry.split_once('|') {
        Some((head, selector)) => (head.trim(), selector.trim()),
        None => (entry, default_selector.trim()),
    };

    let (day_token, time_token) = head
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| invalid("expected '<Day> <Time>'"))?;

    let day: Weekday = day_token
        .parse()
        .map_err(|_| invalid(&format!("unknown day name '{day_token}'")))?;

    let start = parse_time_of_day(time_token.trim())
        .ok_or_else(|| invalid(&format!("unparseable time '{}'", time_token.trim())))?;

    let courts = parse_selector(selector, pair)
        .ok_or_else(|| invalid("empty court selector"))?;

    Ok(WeeklySlot { day, start, courts })
}

/// Accepts `7:00 PM`, `7 PM`, `19:00`, and `19:00:00`.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.to_uppercase();
    const FORMATS: [&str; 4] = ["%I:%M %p", "%I %p", "%H:%M:%S", "%H:%M"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&s, fmt).ok())
}

/// The `Both` sentinel (case-insensitive) expands to the configured pair;
/// anything else names a single court.
fn parse_selector(selector: &str, pair: &[String; 2]) -> Option<CourtSelector> {
    if selector.is_empty() {
        return None;
    }
    if selector.eq_ignore_ascii_case("both") {
        Some(CourtSelector::Pair(pair[0].clone(), pair[1].clone()))
    } else {
        Some(CourtSelector::Named(selector.to_string()))
    }
}

/// Parse the configured submission time (`HH:MM:SS`, seconds optional).
pub fn parse_submit_at(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| ScheduleError::InvalidSubmitTime(s.to_string()))
}
