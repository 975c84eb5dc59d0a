use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use remindkit_core::{
    section, sort_reminders, DayKey, DueDate, FixedCalendar, LocalCalendar, Reminder,
    ReminderQuery,
};

fn calendar() -> FixedCalendar {
    FixedCalendar::utc(Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).single().expect("valid instant"))
}

fn on_day(title: &str, year: i32, month: u32, day: u32) -> Reminder {
    Reminder::new(title).due_on(DueDate::on_day(
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date"),
    ))
}

fn titles(reminders: &[Reminder]) -> Vec<&str> {
    reminders.iter().map(|r| r.title.as_str()).collect()
}

#[test]
fn equal_due_times_break_ties_by_title() {
    let at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("valid date")
        .and_hms_opt(9, 0, 0)
        .expect("valid time");
    let r1 = Reminder::new("B").due_on(DueDate::at(at));
    let r2 = Reminder::new("A").due_on(DueDate::at(at));

    let sorted = sort_reminders(vec![r1, r2], &calendar());
    assert_eq!(titles(&sorted), vec!["A", "B"]);
}

#[test]
fn title_tiebreak_is_case_sensitive() {
    let sorted = sort_reminders(
        vec![
            on_day("apple", 2024, 3, 1),
            on_day("Banana", 2024, 3, 1),
        ],
        &calendar(),
    );
    assert_eq!(titles(&sorted), vec!["Banana", "apple"]);
}

#[test]
fn dated_buckets_come_first_and_no_date_is_last() {
    let buckets = section(
        vec![
            on_day("Z", 2024, 3, 2),
            on_day("A", 2024, 3, 1),
            Reminder::new("M"),
        ],
        &calendar(),
    );

    let keys: Vec<DayKey> = buckets.iter().map(|b| b.key).collect();
    assert_eq!(
        keys,
        vec![
            DayKey::Day(NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")),
            DayKey::Day(NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date")),
            DayKey::NoDate,
        ]
    );
    assert_eq!(titles(&buckets[0].items), vec!["A"]);
    assert_eq!(titles(&buckets[1].items), vec!["Z"]);
    assert_eq!(titles(&buckets[2].items), vec!["M"]);
}

#[test]
fn undated_reminders_share_one_bucket_regardless_of_title() {
    let buckets = section(
        vec![
            Reminder::new("zzz"),
            on_day("late", 2030, 1, 1),
            Reminder::new("aaa"),
        ],
        &calendar(),
    );
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[1].key, DayKey::NoDate);
    assert_eq!(titles(&buckets[1].items), vec!["zzz", "aaa"]);
}

#[test]
fn sectioning_twice_is_idempotent() {
    let input = vec![
        on_day("x", 2024, 3, 5),
        Reminder::new("y"),
        on_day("w", 2024, 3, 5),
        on_day("v", 2024, 2, 29),
    ];
    let first = section(input.clone(), &calendar());
    let second = section(input, &calendar());
    assert_eq!(first, second);
}

#[test]
fn same_timed_reminders_group_by_calendar_zone() {
    // 23:30 local on Mar 1 at UTC-2 is already Mar 2 in UTC; keys follow
    // the calendar's zone so both stay on Mar 1.
    let minus_two = FixedOffset::west_opt(2 * 3600).expect("valid offset");
    let calendar = FixedCalendar::new(minus_two, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid instant"));
    let late = NaiveDate::from_ymd_opt(2024, 3, 1)
        .expect("valid date")
        .and_hms_opt(23, 30, 0)
        .expect("valid time");
    let buckets = section(
        vec![
            Reminder::new("late").due_on(DueDate::at(late)),
            on_day("early", 2024, 3, 1),
        ],
        &calendar,
    );
    assert_eq!(buckets.len(), 1);
    assert_eq!(
        buckets[0].key,
        DayKey::Day(NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"))
    );
    assert_eq!(titles(&buckets[0].items), vec!["early", "late"]);
}

/// US-Eastern-like zone with one spring-forward gap: 2024-03-10 02:00 to
/// 03:00 local does not exist.
#[derive(Debug, Clone, Copy)]
struct SpringForwardZone;

impl SpringForwardZone {
    fn standard() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).expect("valid offset")
    }

    fn daylight() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).expect("valid offset")
    }

    fn local(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .expect("valid date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid time")
    }
}

impl TimeZone for SpringForwardZone {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        SpringForwardZone
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        if *local <= Self::local(0, 0).date() {
            LocalResult::Single(Self::standard())
        } else {
            LocalResult::Single(Self::daylight())
        }
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        if *local < Self::local(2, 0) {
            LocalResult::Single(Self::standard())
        } else if *local < Self::local(3, 0) {
            LocalResult::None
        } else {
            LocalResult::Single(Self::daylight())
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        if *utc <= Self::local(0, 0).date() {
            Self::standard()
        } else {
            Self::daylight()
        }
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc < Self::local(7, 0) {
            Self::standard()
        } else {
            Self::daylight()
        }
    }
}

#[test]
fn times_skipped_by_dst_keep_their_day_and_move_forward() {
    let calendar = FixedCalendar::new(
        SpringForwardZone,
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0)
            .single()
            .expect("valid instant"),
    );
    assert_eq!(
        calendar.resolve(SpringForwardZone::local(2, 30)),
        Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).single()
    );

    let gap = Reminder::new("gap").due_on(DueDate::at(SpringForwardZone::local(2, 30)));
    let buckets = section(
        vec![
            gap.clone(),
            Reminder::new("after").due_on(DueDate::at(SpringForwardZone::local(3, 10))),
            Reminder::new("before").due_on(DueDate::at(SpringForwardZone::local(1, 59))),
        ],
        &calendar,
    );
    assert_eq!(buckets.len(), 1);
    assert_eq!(
        buckets[0].key,
        DayKey::Day(NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date"))
    );
    assert_eq!(titles(&buckets[0].items), vec!["before", "after", "gap"]);

    let bounded = ReminderQuery::Incomplete {
        due_before: Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).single(),
    };
    assert!(bounded.matches(&gap, &calendar));
}
