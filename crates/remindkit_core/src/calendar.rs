//! Local calendar/time-zone collaborator.
//!
//! # Responsibility
//! - Resolve floating due-date components to instants in the current zone.
//! - Normalize instants to local calendar days for list bucketing.
//! - Produce "Today"/"Tomorrow"/long-date section labels.
//!
//! # Invariants
//! - The zone is read at call time; nothing caches a zone inside reminders.
//! - Wall-clock times skipped by a DST gap resolve forward to the first
//!   hour that exists; they are never dropped.

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc,
};

/// Longest forward shift tried for skipped wall-clock times.
const MAX_GAP_HOURS: i64 = 24;

/// Calendar services the list and editor layers depend on.
pub trait LocalCalendar {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Resolves local wall-clock time to an instant.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant and
    /// skipped times (DST spring-forward) move forward by the gap.
    fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<Utc>>;

    /// Local calendar day containing `instant`.
    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate;

    fn today(&self) -> NaiveDate {
        self.day_of(self.now())
    }

    /// Local midnight of `day`.
    fn start_of_day(&self, day: NaiveDate) -> Option<DateTime<Utc>> {
        self.resolve(day.and_time(NaiveTime::MIN))
    }
}

impl<C: LocalCalendar + ?Sized> LocalCalendar for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        (**self).resolve(local)
    }

    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        (**self).day_of(instant)
    }
}

/// Resolves `local` in `zone` the way [`LocalCalendar::resolve`] requires.
///
/// Skipped times are shifted forward one hour at a time, so 02:30 inside
/// a one-hour spring-forward gap lands on 03:30.
pub fn resolve_in_zone<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    (0..=MAX_GAP_HOURS).find_map(|hours| {
        let shifted = local.checked_add_signed(Duration::hours(hours))?;
        zone.from_local_datetime(&shifted)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// Calendar backed by the platform's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCalendar;

impl LocalCalendar for SystemCalendar {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        resolve_in_zone(&Local, local)
    }

    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&Local).date_naive()
    }
}

/// Calendar with an explicit zone (a fixed UTC offset by default) and a
/// pinned "now".
///
/// Used by deterministic callers such as tests and batch tools.
#[derive(Debug, Clone, Copy)]
pub struct FixedCalendar<Tz = FixedOffset> {
    zone: Tz,
    now: DateTime<Utc>,
}

impl<Tz: TimeZone> FixedCalendar<Tz> {
    pub fn new(zone: Tz, now: DateTime<Utc>) -> Self {
        Self { zone, now }
    }

    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    pub fn zone(&self) -> &Tz {
        &self.zone
    }
}

impl FixedCalendar {
    /// UTC calendar pinned at `now`.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(Utc.fix(), now)
    }

    pub fn offset(&self) -> FixedOffset {
        self.zone
    }
}

impl<Tz: TimeZone> LocalCalendar for FixedCalendar<Tz> {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        resolve_in_zone(&self.zone, local)
    }

    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.zone).date_naive()
    }
}

/// Section label for a local day relative to the calendar's today.
pub fn day_label<C: LocalCalendar + ?Sized>(day: NaiveDate, calendar: &C) -> String {
    let today = calendar.today();
    if day == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(day) {
        "Tomorrow".to_string()
    } else {
        day.format("%B %-d, %Y").to_string()
    }
}
