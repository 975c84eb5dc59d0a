//! One-line repeat summaries for the edit screen.

use crate::format::medium_date;
use crate::model::recurrence::{Frequency, RecurrenceEnd, RecurrenceRule};

/// "Never", "Daily", "Every 3 days", ..., with " on..." appended when any
/// day or month selector narrows the rule.
pub fn rule_summary(rule: Option<&RecurrenceRule>) -> String {
    let Some(rule) = rule else {
        return "Never".to_string();
    };
    let (single, plural) = match rule.frequency() {
        Frequency::Daily => ("Daily", "days"),
        Frequency::Weekly => ("Weekly", "weeks"),
        Frequency::Monthly => ("Monthly", "months"),
        Frequency::Yearly => ("Yearly", "years"),
    };
    let mut summary = match rule.interval() {
        1 => single.to_string(),
        n => format!("Every {n} {plural}"),
    };
    if rule.has_selectors() {
        summary.push_str(" on...");
    }
    summary
}

pub fn end_summary(end: &RecurrenceEnd) -> String {
    match end {
        RecurrenceEnd::Never => "Never".to_string(),
        RecurrenceEnd::EndDate { date } => medium_date(*date),
        RecurrenceEnd::OccurrenceCount { count } => format!("After {count} occurrences"),
    }
}
