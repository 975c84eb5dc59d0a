//! Day sectioning for the reminder list.
//!
//! # Responsibility
//! - Sort reminders by resolved due instant, then title.
//! - Group sorted reminders into day buckets in first-seen order.
//!
//! # Invariants
//! - The sort is stable; undated reminders keep their input order.
//! - Undated and malformed reminders sort after every dated reminder and
//!   share one `NoDate` bucket, which is therefore always last.
//! - A dated reminder's bucket day is its own due-date day, even when the
//!   wall-clock time is shifted by a DST gap.
//! - Bucketing is recomputed wholesale; there is no incremental patching.

use crate::calendar::{day_label, LocalCalendar};
use crate::model::reminder::{DueDate, Reminder};
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

/// Bucket key: a local calendar day or the "no date" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayKey {
    Day(NaiveDate),
    NoDate,
}

/// Reminders sharing one local calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub key: DayKey,
    pub items: Vec<Reminder>,
}

/// Resolves a reminder's due components to an instant in the calendar zone.
pub fn resolved_due<C: LocalCalendar + ?Sized>(
    reminder: &Reminder,
    calendar: &C,
) -> Option<DateTime<Utc>> {
    let local = reminder.due.as_ref()?.naive_local()?;
    calendar.resolve(local)
}

fn compare_dated(
    (left_at, left): (&DateTime<Utc>, &Reminder),
    (right_at, right): (&DateTime<Utc>, &Reminder),
) -> Ordering {
    left_at
        .cmp(right_at)
        .then_with(|| left.title.cmp(&right.title))
}

/// Sorts reminders: dated ascending with title tiebreak, undated last.
pub fn sort_reminders<C: LocalCalendar + ?Sized>(
    reminders: Vec<Reminder>,
    calendar: &C,
) -> Vec<Reminder> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, Reminder)> = reminders
        .into_iter()
        .map(|reminder| (resolved_due(&reminder, calendar), reminder))
        .collect();

    // `sort_by` is stable, so equal keys keep input order.
    keyed.sort_by(|(left_at, left), (right_at, right)| match (left_at, right_at) {
        (Some(l), Some(r)) => compare_dated((l, left), (r, right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, reminder)| reminder).collect()
}

/// Groups already-sorted reminders into buckets in first-seen order.
pub fn bucket<C: LocalCalendar + ?Sized>(sorted: &[Reminder], calendar: &C) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = Vec::new();
    for reminder in sorted {
        let key = day_key(reminder, calendar);

        match buckets.iter_mut().find(|bucket| bucket.key == key) {
            Some(bucket) => bucket.items.push(reminder.clone()),
            None => buckets.push(DayBucket {
                key,
                items: vec![reminder.clone()],
            }),
        }
    }
    buckets
}

/// Bucket key: the due-date day when the reminder sorts as dated.
fn day_key<C: LocalCalendar + ?Sized>(reminder: &Reminder, calendar: &C) -> DayKey {
    resolved_due(reminder, calendar)
        .and(reminder.due.as_ref().and_then(DueDate::date))
        .map_or(DayKey::NoDate, DayKey::Day)
}

/// `bucket(sort(reminders))`.
pub fn section<C: LocalCalendar + ?Sized>(
    reminders: Vec<Reminder>,
    calendar: &C,
) -> Vec<DayBucket> {
    let sorted = sort_reminders(reminders, calendar);
    bucket(&sorted, calendar)
}

/// Header text for `buckets[index]`.
///
/// A single bucket and the `NoDate` bucket render without a header.
pub fn section_header<C: LocalCalendar + ?Sized>(
    buckets: &[DayBucket],
    index: usize,
    calendar: &C,
) -> Option<String> {
    if buckets.len() <= 1 {
        return None;
    }
    match buckets.get(index)?.key {
        DayKey::Day(day) => Some(day_label(day, calendar)),
        DayKey::NoDate => None,
    }
}
