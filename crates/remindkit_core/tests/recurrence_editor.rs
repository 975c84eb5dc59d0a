use proptest::collection::btree_set;
use proptest::prelude::*;
use remindkit_core::{
    from_canonical_rule, to_canonical_rule, DayOfWeek, EditorSelectorState, Frequency,
    MonthDayMode, NthWeekday, RecurrenceEnd, RecurrenceRule, RepeatState, SetPosition, Weekday,
};
use std::collections::BTreeSet;
use std::num::NonZeroU32;

fn seeded(rule: &RecurrenceRule) -> EditorSelectorState {
    match from_canonical_rule(Some(rule)) {
        RepeatState::Repeats(state) => state,
        RepeatState::Never => panic!("rule must seed a repeating state"),
    }
}

#[test]
fn weekly_interval_two_on_monday_and_wednesday() {
    let mut state = EditorSelectorState::new();
    state.select_frequency(Frequency::Weekly);
    state.set_interval(2);
    assert!(state.toggle_weekday(Weekday::Monday));
    assert!(state.toggle_weekday(Weekday::Wednesday));
    assert!(state.toggle_weekday(Weekday::Sunday));

    let rule = to_canonical_rule(&state);
    assert_eq!(rule.frequency(), Frequency::Weekly);
    assert_eq!(rule.interval(), 2);
    assert_eq!(
        rule.days_of_week(),
        &[
            DayOfWeek::every(Weekday::Monday),
            DayOfWeek::every(Weekday::Wednesday)
        ]
    );
    assert!(rule.set_positions().is_empty());
}

#[test]
fn monthly_on_the_last_friday() {
    let mut state = EditorSelectorState::new();
    state.select_frequency(Frequency::Monthly);
    state.set_month_day_mode(MonthDayMode::OnTheNthWeekday);
    state.set_nth_weekday(NthWeekday {
        position: SetPosition::Last,
        weekday: Weekday::Friday,
    });

    let rule = to_canonical_rule(&state);
    assert_eq!(rule.set_positions(), &[-1]);
    assert_eq!(rule.days_of_week(), &[DayOfWeek::every(Weekday::Friday)]);
    assert!(rule.days_of_month().is_empty());

    let back = seeded(&rule);
    assert_eq!(back.nth_weekday().position, SetPosition::Last);
    assert_eq!(back.nth_weekday().weekday, Weekday::Friday);
}

#[test]
fn monthly_each_day_with_empty_selection_uses_day_one() {
    let plain_monthly = RecurrenceRule::new(Frequency::Monthly, 1).expect("valid rule");
    let state = seeded(&plain_monthly);
    assert_eq!(state.month_day_mode(), MonthDayMode::EachNumberedDay);
    assert!(state.selected_month_days().is_empty());
    assert_eq!(
        to_canonical_rule(&state).days_of_month(),
        &BTreeSet::from([1])
    );
}

#[test]
fn switching_back_to_each_day_selects_day_one() {
    let rule = RecurrenceRule::builder(Frequency::Monthly)
        .day_of_week(DayOfWeek::every(Weekday::Tuesday))
        .set_position(3)
        .build()
        .expect("valid rule");
    let mut state = seeded(&rule);
    assert!(state.selected_month_days().is_empty());

    state.set_month_day_mode(MonthDayMode::EachNumberedDay);
    assert_eq!(state.selected_month_days(), &BTreeSet::from([1]));
    let converted = to_canonical_rule(&state);
    assert!(converted.set_positions().is_empty());
    assert!(converted.days_of_week().is_empty());
}

#[test]
fn yearly_without_months_defaults_to_january() {
    let rule = RecurrenceRule::new(Frequency::Yearly, 1).expect("valid rule");
    let state = seeded(&rule);
    assert!(state.selected_months().is_empty());
    let converted = to_canonical_rule(&state);
    assert_eq!(converted.months_of_year(), &BTreeSet::from([1]));
    assert!(converted.set_positions().is_empty());
}

#[test]
fn yearly_weekday_rule_emits_position_and_weekday() {
    let mut state = EditorSelectorState::new();
    state.select_frequency(Frequency::Yearly);
    state.toggle_month(11);
    state.set_year_uses_weekday_rule(true);
    state.set_nth_weekday(NthWeekday {
        position: SetPosition::Fourth,
        weekday: Weekday::Thursday,
    });

    let rule = to_canonical_rule(&state);
    assert_eq!(rule.months_of_year(), &BTreeSet::from([1, 11]));
    assert_eq!(rule.days_of_week(), &[DayOfWeek::every(Weekday::Thursday)]);
    assert_eq!(rule.set_positions(), &[4]);
}

#[test]
fn termination_passes_through_unchanged() {
    let end = RecurrenceEnd::OccurrenceCount {
        count: NonZeroU32::new(3).expect("non-zero count"),
    };
    let rule = RecurrenceRule::builder(Frequency::Daily)
        .interval(4)
        .end(end.clone())
        .build()
        .expect("valid rule");
    let mut state = seeded(&rule);
    state.select_frequency(Frequency::Weekly);
    assert_eq!(to_canonical_rule(&state).end(), &end);
}

#[allow(clippy::too_many_arguments)]
fn build_state(
    frequency: Frequency,
    interval: u32,
    weekdays: &BTreeSet<usize>,
    nth_mode: bool,
    month_days: &BTreeSet<u8>,
    nth: NthWeekday,
    months: &BTreeSet<u8>,
    year_rule: bool,
) -> EditorSelectorState {
    let mut state = EditorSelectorState::new();
    state.set_interval(interval);

    state.select_frequency(Frequency::Weekly);
    for index in weekdays {
        let weekday = Weekday::ALL[*index];
        if !state.is_weekday_selected(weekday) {
            state.toggle_weekday(weekday);
        }
    }
    if !weekdays.is_empty() && !weekdays.contains(&Weekday::Sunday.index()) {
        state.toggle_weekday(Weekday::Sunday);
    }

    state.select_frequency(Frequency::Monthly);
    for day in month_days {
        if !state.selected_month_days().contains(day) {
            state.toggle_month_day(*day);
        }
    }
    if !month_days.is_empty() && !month_days.contains(&1) {
        state.toggle_month_day(1);
    }
    state.set_month_day_mode(if nth_mode {
        MonthDayMode::OnTheNthWeekday
    } else {
        MonthDayMode::EachNumberedDay
    });

    state.select_frequency(Frequency::Yearly);
    for month in months {
        if !state.selected_months().contains(month) {
            state.toggle_month(*month);
        }
    }
    if !months.is_empty() && !months.contains(&1) {
        state.toggle_month(1);
    }

    state.set_nth_weekday(nth);
    state.set_year_uses_weekday_rule(year_rule);
    state.select_frequency(frequency);
    state
}

fn assert_same_visible_selection(expected: &EditorSelectorState, actual: &EditorSelectorState) {
    assert_eq!(actual.frequency(), expected.frequency());
    assert_eq!(actual.interval(), expected.interval());
    assert_eq!(actual.end(), expected.end());
    match expected.frequency() {
        Frequency::Daily => {}
        Frequency::Weekly => {
            assert_eq!(actual.selected_weekdays(), expected.selected_weekdays());
        }
        Frequency::Monthly => {
            assert_eq!(actual.month_day_mode(), expected.month_day_mode());
            match expected.month_day_mode() {
                MonthDayMode::EachNumberedDay => {
                    assert_eq!(actual.selected_month_days(), expected.selected_month_days());
                }
                MonthDayMode::OnTheNthWeekday => {
                    assert_eq!(actual.nth_weekday(), expected.nth_weekday());
                }
            }
        }
        Frequency::Yearly => {
            assert_eq!(actual.selected_months(), expected.selected_months());
            assert_eq!(
                actual.year_uses_weekday_rule(),
                expected.year_uses_weekday_rule()
            );
            if expected.year_uses_weekday_rule() {
                assert_eq!(actual.nth_weekday(), expected.nth_weekday());
            }
        }
    }
}

proptest! {
    #[test]
    fn rule_round_trip_reproduces_visible_selection(
        frequency_index in 0usize..4,
        interval in 1u32..=999,
        weekdays in btree_set(0usize..7, 0..7),
        nth_mode in any::<bool>(),
        month_days in btree_set(1u8..=31, 0..6),
        position_index in 0usize..6,
        weekday_index in 0usize..7,
        months in btree_set(1u8..=12, 0..5),
        year_rule in any::<bool>(),
    ) {
        let nth = NthWeekday {
            position: SetPosition::ALL[position_index],
            weekday: Weekday::ALL[weekday_index],
        };
        let state = build_state(
            Frequency::ALL[frequency_index],
            interval,
            &weekdays,
            nth_mode,
            &month_days,
            nth,
            &months,
            year_rule,
        );

        let rule = to_canonical_rule(&state);
        prop_assert!(rule.validate().is_ok());
        let back = seeded(&rule);
        assert_same_visible_selection(&state, &back);
    }

    #[test]
    fn converted_rules_never_leave_required_selectors_empty(
        frequency_index in 0usize..4,
        nth_mode in any::<bool>(),
    ) {
        let mut state = EditorSelectorState::new();
        state.select_frequency(Frequency::ALL[frequency_index]);
        if nth_mode {
            state.set_month_day_mode(MonthDayMode::OnTheNthWeekday);
        }
        let rule = to_canonical_rule(&state);
        match rule.frequency() {
            Frequency::Daily => prop_assert!(!rule.has_selectors()),
            Frequency::Weekly => prop_assert!(!rule.days_of_week().is_empty()),
            Frequency::Monthly if nth_mode => {
                prop_assert_eq!(rule.days_of_week().len(), 1);
                prop_assert_eq!(rule.set_positions().len(), 1);
            }
            Frequency::Monthly => prop_assert!(!rule.days_of_month().is_empty()),
            Frequency::Yearly => prop_assert!(!rule.months_of_year().is_empty()),
        }
    }
}
