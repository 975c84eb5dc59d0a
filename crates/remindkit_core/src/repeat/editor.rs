//! Recurrence editor state machine.
//!
//! # Responsibility
//! - Hold the mutable selector state of one custom-repeat editing session.
//! - Convert between that state and canonical [`RecurrenceRule`] values.
//! - Decide which selectors a rendering layer should show.
//!
//! # Invariants
//! - Weekly state always has at least one weekday toggled.
//! - Month-day and month selections never become empty through a mutation;
//!   un-selecting the last element is refused.
//! - `interval` stays within `1..=MAX_INTERVAL`.
//! - Conversion to a rule is pure and total. Empty Monthly day selections
//!   and empty Yearly month selections are substituted with `1`.
//!
//! # Known loss
//! - "Nth weekday" mode holds a single weekday. Seeding from a rule with
//!   several weekday entries keeps only the first one.

use crate::model::recurrence::{
    DayOfWeek, Frequency, RecurrenceEnd, RecurrenceRule, SetPosition, Weekday,
};
use crate::repeat::labels::{self, DAYS_IN_MONTH_GRID};
use std::collections::BTreeSet;

/// Largest interval offered by the interval picker.
pub const MAX_INTERVAL: u32 = 999;

const DEFAULT_MONTH_DAY: u8 = 1;
const DEFAULT_MONTH: u8 = 1;
const DEFAULT_WEEKDAY: Weekday = Weekday::Sunday;

/// Monthly sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonthDayMode {
    /// "Each" numbered day of the month.
    #[default]
    EachNumberedDay,
    /// "On the" Nth weekday of the month.
    OnTheNthWeekday,
}

/// Ordinal + weekday pair driving the "on the Nth weekday" picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NthWeekday {
    pub position: SetPosition,
    pub weekday: Weekday,
}

impl Default for NthWeekday {
    fn default() -> Self {
        Self {
            position: SetPosition::First,
            weekday: DEFAULT_WEEKDAY,
        }
    }
}

/// Sub-controls a rendering layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    Interval,
    WeekdayToggles,
    MonthDayModeSwitch,
    MonthDayGrid,
    NthWeekdayPicker,
    MonthGrid,
    YearWeekdayRuleToggle,
}

/// Top-level repeat state of a reminder being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatState {
    /// The reminder does not repeat.
    Never,
    Repeats(EditorSelectorState),
}

impl RepeatState {
    pub fn to_rule(&self) -> Option<RecurrenceRule> {
        match self {
            Self::Never => None,
            Self::Repeats(state) => Some(to_canonical_rule(state)),
        }
    }
}

/// Mutable selector state for one editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSelectorState {
    frequency: Frequency,
    interval: u32,
    weekday_toggles: [bool; 7],
    month_day_mode: MonthDayMode,
    selected_month_days: BTreeSet<u8>,
    nth_weekday: NthWeekday,
    selected_months: BTreeSet<u8>,
    year_uses_weekday_rule: bool,
    end: RecurrenceEnd,
}

impl Default for EditorSelectorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSelectorState {
    /// Daily, every 1 day, no selectors, never ends.
    pub fn new() -> Self {
        Self {
            frequency: Frequency::Daily,
            interval: 1,
            weekday_toggles: [false; 7],
            month_day_mode: MonthDayMode::EachNumberedDay,
            selected_month_days: BTreeSet::new(),
            nth_weekday: NthWeekday::default(),
            selected_months: BTreeSet::new(),
            year_uses_weekday_rule: false,
            end: RecurrenceEnd::Never,
        }
    }

    /// Seeds selector state from an existing rule.
    ///
    /// Selectors not used by the rule's frequency are still seeded, so that
    /// switching frequency inside the session starts from the rule's values.
    pub fn from_rule(rule: &RecurrenceRule) -> Self {
        let mut state = Self::new();
        state.frequency = rule.frequency();
        state.interval = rule.interval().clamp(1, MAX_INTERVAL);

        for entry in rule.days_of_week() {
            state.weekday_toggles[entry.weekday.index()] = true;
        }
        if let Some(first) = rule.days_of_week().first() {
            state.nth_weekday.weekday = first.weekday;
        }

        let position = rule.set_positions().first().copied();
        if let Some(slot) = position.and_then(labels::set_position_for_ordinal) {
            state.nth_weekday.position = slot;
        }
        state.month_day_mode = if position.is_some() {
            MonthDayMode::OnTheNthWeekday
        } else {
            MonthDayMode::EachNumberedDay
        };

        state.selected_month_days = rule
            .days_of_month()
            .iter()
            .copied()
            .filter(|day| (1..=DAYS_IN_MONTH_GRID).contains(day))
            .collect();
        state.selected_months = rule
            .months_of_year()
            .iter()
            .copied()
            .filter(|month| (1..=12).contains(month))
            .collect();
        state.year_uses_weekday_rule = !rule.days_of_week().is_empty();
        state.end = rule.end().clone();

        if state.frequency == Frequency::Weekly {
            state.ensure_weekday_selected();
        }
        state
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn is_weekday_selected(&self, weekday: Weekday) -> bool {
        self.weekday_toggles[weekday.index()]
    }

    /// Toggled weekdays in Sunday-first order.
    pub fn selected_weekdays(&self) -> Vec<Weekday> {
        Weekday::ALL
            .into_iter()
            .filter(|weekday| self.is_weekday_selected(*weekday))
            .collect()
    }

    pub fn month_day_mode(&self) -> MonthDayMode {
        self.month_day_mode
    }

    pub fn selected_month_days(&self) -> &BTreeSet<u8> {
        &self.selected_month_days
    }

    pub fn nth_weekday(&self) -> NthWeekday {
        self.nth_weekday
    }

    pub fn selected_months(&self) -> &BTreeSet<u8> {
        &self.selected_months
    }

    pub fn year_uses_weekday_rule(&self) -> bool {
        self.year_uses_weekday_rule
    }

    pub fn end(&self) -> &RecurrenceEnd {
        &self.end
    }

    /// Switches frequency and seeds the default selection the new
    /// frequency requires.
    pub fn select_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        match frequency {
            Frequency::Daily => {}
            Frequency::Weekly => self.ensure_weekday_selected(),
            Frequency::Monthly => {
                if self.selected_month_days.is_empty() {
                    self.selected_month_days.insert(DEFAULT_MONTH_DAY);
                }
            }
            Frequency::Yearly => {
                if self.selected_months.is_empty() {
                    self.selected_months.insert(DEFAULT_MONTH);
                }
            }
        }
    }

    /// Sets the interval, clamped to `1..=MAX_INTERVAL`.
    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval.clamp(1, MAX_INTERVAL);
    }

    /// Flips one weekday. Returns `false` when the change was refused
    /// because it would clear the last selected weekday.
    pub fn toggle_weekday(&mut self, weekday: Weekday) -> bool {
        let index = weekday.index();
        if self.weekday_toggles[index] && self.selected_weekday_count() == 1 {
            return false;
        }
        self.weekday_toggles[index] = !self.weekday_toggles[index];
        true
    }

    pub fn set_month_day_mode(&mut self, mode: MonthDayMode) {
        self.month_day_mode = mode;
        if mode == MonthDayMode::EachNumberedDay && self.selected_month_days.is_empty() {
            self.selected_month_days.insert(DEFAULT_MONTH_DAY);
        }
    }

    /// Flips one day of the month grid. Returns `false` for out-of-range
    /// days and for removing the last selected day.
    pub fn toggle_month_day(&mut self, day: u8) -> bool {
        if !(1..=DAYS_IN_MONTH_GRID).contains(&day) {
            return false;
        }
        toggle_in_non_empty(&mut self.selected_month_days, day)
    }

    pub fn set_nth_weekday(&mut self, nth: NthWeekday) {
        self.nth_weekday = nth;
    }

    /// Flips one month of the year grid. Same refusal rules as
    /// [`Self::toggle_month_day`].
    pub fn toggle_month(&mut self, month: u8) -> bool {
        if !(1..=12).contains(&month) {
            return false;
        }
        toggle_in_non_empty(&mut self.selected_months, month)
    }

    pub fn set_year_uses_weekday_rule(&mut self, enabled: bool) {
        self.year_uses_weekday_rule = enabled;
    }

    /// Replaces the termination carried through the session.
    pub fn set_end(&mut self, end: RecurrenceEnd) {
        self.end = end;
    }

    /// Selectors to show for the current frequency and sub-modes.
    pub fn visible_selectors(&self) -> Vec<Selector> {
        let mut selectors = vec![Selector::Interval];
        match self.frequency {
            Frequency::Daily => {}
            Frequency::Weekly => selectors.push(Selector::WeekdayToggles),
            Frequency::Monthly => {
                selectors.push(Selector::MonthDayModeSwitch);
                selectors.push(match self.month_day_mode {
                    MonthDayMode::EachNumberedDay => Selector::MonthDayGrid,
                    MonthDayMode::OnTheNthWeekday => Selector::NthWeekdayPicker,
                });
            }
            Frequency::Yearly => {
                selectors.push(Selector::MonthGrid);
                selectors.push(Selector::YearWeekdayRuleToggle);
                if self.year_uses_weekday_rule {
                    selectors.push(Selector::NthWeekdayPicker);
                }
            }
        }
        selectors
    }

    fn selected_weekday_count(&self) -> usize {
        self.weekday_toggles.iter().filter(|on| **on).count()
    }

    fn ensure_weekday_selected(&mut self) {
        if self.selected_weekday_count() == 0 {
            self.weekday_toggles[DEFAULT_WEEKDAY.index()] = true;
        }
    }
}

fn toggle_in_non_empty(selection: &mut BTreeSet<u8>, value: u8) -> bool {
    if selection.contains(&value) {
        if selection.len() == 1 {
            return false;
        }
        selection.remove(&value);
    } else {
        selection.insert(value);
    }
    true
}

/// Maps an optional stored rule to editor state.
///
/// `None` yields [`RepeatState::Never`], which callers surface as a
/// separate top-level choice.
pub fn from_canonical_rule(rule: Option<&RecurrenceRule>) -> RepeatState {
    match rule {
        None => RepeatState::Never,
        Some(rule) => RepeatState::Repeats(EditorSelectorState::from_rule(rule)),
    }
}

/// Builds the canonical rule for the current selector state.
pub fn to_canonical_rule(state: &EditorSelectorState) -> RecurrenceRule {
    let mut builder = RecurrenceRule::builder(state.frequency)
        .interval(state.interval)
        .end(state.end.clone());

    match state.frequency {
        Frequency::Daily => {}
        Frequency::Weekly => {
            debug_assert!(
                state.selected_weekday_count() > 0,
                "weekly editor state must keep one weekday selected"
            );
            builder = builder.days_of_week(
                state
                    .selected_weekdays()
                    .into_iter()
                    .map(DayOfWeek::every),
            );
        }
        Frequency::Monthly => match state.month_day_mode {
            MonthDayMode::EachNumberedDay => {
                builder = builder.days_of_month(non_empty_or(
                    &state.selected_month_days,
                    DEFAULT_MONTH_DAY,
                ));
            }
            MonthDayMode::OnTheNthWeekday => {
                builder = builder
                    .day_of_week(DayOfWeek::every(state.nth_weekday.weekday))
                    .set_position(state.nth_weekday.position.ordinal());
            }
        },
        Frequency::Yearly => {
            builder = builder.months_of_year(non_empty_or(&state.selected_months, DEFAULT_MONTH));
            if state.year_uses_weekday_rule {
                builder = builder
                    .day_of_week(DayOfWeek::every(state.nth_weekday.weekday))
                    .set_position(state.nth_weekday.position.ordinal());
            }
        }
    }

    builder.build_trusted()
}

fn non_empty_or(selection: &BTreeSet<u8>, fallback: u8) -> BTreeSet<u8> {
    if selection.is_empty() {
        BTreeSet::from([fallback])
    } else {
        selection.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        from_canonical_rule, to_canonical_rule, EditorSelectorState, MonthDayMode, NthWeekday,
        RepeatState, Selector, MAX_INTERVAL,
    };
    use crate::model::recurrence::{DayOfWeek, Frequency, RecurrenceRule, SetPosition, Weekday};
    use std::collections::BTreeSet;

    #[test]
    fn absent_rule_maps_to_never() {
        assert_eq!(from_canonical_rule(None), RepeatState::Never);
        assert_eq!(RepeatState::Never.to_rule(), None);
    }

    #[test]
    fn default_state_is_daily_every_day() {
        let rule = to_canonical_rule(&EditorSelectorState::new());
        assert_eq!(rule.frequency(), Frequency::Daily);
        assert_eq!(rule.interval(), 1);
        assert!(!rule.has_selectors());
        assert!(rule.set_positions().is_empty());
    }

    #[test]
    fn last_weekday_cannot_be_untoggled() {
        let mut state = EditorSelectorState::new();
        state.select_frequency(Frequency::Weekly);
        assert_eq!(state.selected_weekdays(), vec![Weekday::Sunday]);

        assert!(!state.toggle_weekday(Weekday::Sunday));
        assert!(state.toggle_weekday(Weekday::Monday));
        assert!(state.toggle_weekday(Weekday::Sunday));
        assert_eq!(state.selected_weekdays(), vec![Weekday::Monday]);
    }

    #[test]
    fn month_grids_refuse_to_become_empty() {
        let mut state = EditorSelectorState::new();
        state.select_frequency(Frequency::Monthly);
        assert_eq!(state.selected_month_days(), &BTreeSet::from([1]));
        assert!(!state.toggle_month_day(1));
        assert!(!state.toggle_month_day(32));
        assert!(state.toggle_month_day(15));
        assert!(state.toggle_month_day(1));
        assert_eq!(state.selected_month_days(), &BTreeSet::from([15]));

        state.select_frequency(Frequency::Yearly);
        assert_eq!(state.selected_months(), &BTreeSet::from([1]));
        assert!(!state.toggle_month(1));
        assert!(!state.toggle_month(0));
    }

    #[test]
    fn interval_is_clamped_to_picker_range() {
        let mut state = EditorSelectorState::new();
        state.set_interval(0);
        assert_eq!(state.interval(), 1);
        state.set_interval(5000);
        assert_eq!(state.interval(), MAX_INTERVAL);
    }

    #[test]
    fn weekly_seed_without_weekdays_selects_sunday() {
        let rule = RecurrenceRule::new(Frequency::Weekly, 1).expect("valid rule");
        let state = EditorSelectorState::from_rule(&rule);
        assert_eq!(state.selected_weekdays(), vec![Weekday::Sunday]);
    }

    #[test]
    fn nth_weekday_seed_keeps_only_first_weekday() {
        let rule = RecurrenceRule::builder(Frequency::Monthly)
            .days_of_week([
                DayOfWeek::every(Weekday::Tuesday),
                DayOfWeek::every(Weekday::Thursday),
            ])
            .set_position(2)
            .build()
            .expect("valid rule");
        let state = EditorSelectorState::from_rule(&rule);
        assert_eq!(state.month_day_mode(), MonthDayMode::OnTheNthWeekday);
        assert_eq!(
            state.nth_weekday(),
            NthWeekday {
                position: SetPosition::Second,
                weekday: Weekday::Tuesday,
            }
        );

        let round_trip = to_canonical_rule(&state);
        assert_eq!(
            round_trip.days_of_week(),
            &[DayOfWeek::every(Weekday::Tuesday)]
        );
        assert_eq!(round_trip.set_positions(), &[2]);
    }

    #[test]
    fn visible_selectors_follow_frequency_and_mode() {
        let mut state = EditorSelectorState::new();
        assert_eq!(state.visible_selectors(), vec![Selector::Interval]);

        state.select_frequency(Frequency::Weekly);
        assert_eq!(
            state.visible_selectors(),
            vec![Selector::Interval, Selector::WeekdayToggles]
        );

        state.select_frequency(Frequency::Monthly);
        assert_eq!(
            state.visible_selectors(),
            vec![
                Selector::Interval,
                Selector::MonthDayModeSwitch,
                Selector::MonthDayGrid
            ]
        );
        state.set_month_day_mode(MonthDayMode::OnTheNthWeekday);
        assert_eq!(
            state.visible_selectors().last(),
            Some(&Selector::NthWeekdayPicker)
        );

        state.select_frequency(Frequency::Yearly);
        assert_eq!(
            state.visible_selectors(),
            vec![
                Selector::Interval,
                Selector::MonthGrid,
                Selector::YearWeekdayRuleToggle
            ]
        );
        state.set_year_uses_weekday_rule(true);
        assert_eq!(
            state.visible_selectors().last(),
            Some(&Selector::NthWeekdayPicker)
        );
    }
}
