//! Display text helpers shared by list rows and edit rows.

use crate::model::reminder::{DueDate, PriorityLevel};
use chrono::{NaiveDate, NaiveDateTime};

const MEDIUM_DATE_FORMAT: &str = "%b %-d, %Y";
const MEDIUM_DATE_TIME_FORMAT: &str = "%b %-d, %Y %-I:%M %p";
const LONG_DATE_TIME_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

/// Geofence radius text with comma decimals, e.g. "1,5 kilometers".
pub fn radius_label(radius_m: u32) -> String {
    let km = radius_m / 1000;
    if radius_m >= 100_000 {
        return format!("{km} kilometers");
    }
    if radius_m >= 10_000 {
        let hundreds = (radius_m % 1000) / 100;
        if hundreds > 0 {
            return format!("{} kilometers", trim_trailing_zeros(format!("{km},{hundreds}")));
        }
        return format!("{km} kilometers");
    }
    if radius_m >= 1000 {
        let tens = (radius_m % 1000) / 10;
        if tens > 0 {
            return format!("{} kilometers", trim_trailing_zeros(format!("{km},{tens:02}")));
        }
        return match km {
            1 => "1 kilometer".to_string(),
            _ => format!("{km} kilometers"),
        };
    }
    match radius_m {
        1 => "1 meter".to_string(),
        _ => format!("{radius_m} meters"),
    }
}

fn trim_trailing_zeros(mut text: String) -> String {
    while text.ends_with('0') {
        text.pop();
    }
    text
}

/// Exclamation marks shown next to a reminder title.
pub fn priority_marks(level: PriorityLevel) -> &'static str {
    match level {
        PriorityLevel::None => "",
        PriorityLevel::Low => "!",
        PriorityLevel::Medium => "!!",
        PriorityLevel::High => "!!!",
    }
}

/// Segment labels of the priority picker, in `PriorityLevel::ALL` order.
pub fn priority_segment_label(level: PriorityLevel) -> &'static str {
    match level {
        PriorityLevel::None => "None",
        other => priority_marks(other),
    }
}

/// "Mar 1, 2024".
pub fn medium_date(date: NaiveDate) -> String {
    date.format(MEDIUM_DATE_FORMAT).to_string()
}

/// "Mar 1, 2024 9:00 AM".
pub fn medium_date_time(local: NaiveDateTime) -> String {
    local.format(MEDIUM_DATE_TIME_FORMAT).to_string()
}

/// "March 1, 2024 at 9:00 AM".
pub fn long_date_time(local: NaiveDateTime) -> String {
    local.format(LONG_DATE_TIME_FORMAT).to_string()
}

/// Due text for list rows: medium date for all-day reminders, medium date
/// and time otherwise. Malformed components have no text.
pub fn due_text(due: &DueDate) -> Option<String> {
    if due.has_time() {
        due.naive_local().map(medium_date_time)
    } else {
        due.date().map(medium_date)
    }
}
