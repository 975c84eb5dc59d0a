//! Custom-repeat screen row model.
//!
//! # Responsibility
//! - Describe the custom-repeat screen as tagged row values grouped in
//!   sections.
//! - Dispatch row selection and value events by tag into
//!   [`EditorSelectorState`] mutations.
//!
//! # Invariants
//! - Every data-changing event returns the freshly converted rule.
//! - Picker rows only appear while their owning row is expanded.

use crate::model::recurrence::{Frequency, RecurrenceRule, Weekday};
use crate::repeat::editor::{
    to_canonical_rule, EditorSelectorState, MonthDayMode, NthWeekday, MAX_INTERVAL,
};
use crate::repeat::labels;

/// One row of the custom-repeat screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatRow {
    Frequency,
    FrequencyPicker,
    Interval,
    IntervalPicker,
    Weekday(Weekday),
    MonthDayMode(MonthDayMode),
    MonthDayGrid,
    NthWeekdayPicker,
    MonthGrid,
    YearWeekdayRule,
}

/// Editor state plus the screen-local picker expansion flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRepeatScreen {
    state: EditorSelectorState,
    frequency_picker_expanded: bool,
    interval_picker_expanded: bool,
}

impl CustomRepeatScreen {
    /// Opens the screen seeded from `rule`, or Daily/1 when absent.
    pub fn open(rule: Option<&RecurrenceRule>) -> Self {
        let state = rule.map_or_else(EditorSelectorState::new, EditorSelectorState::from_rule);
        Self::with_state(state)
    }

    pub fn with_state(state: EditorSelectorState) -> Self {
        Self {
            state,
            frequency_picker_expanded: false,
            interval_picker_expanded: false,
        }
    }

    pub fn state(&self) -> &EditorSelectorState {
        &self.state
    }

    pub fn rule(&self) -> RecurrenceRule {
        to_canonical_rule(&self.state)
    }

    pub fn is_frequency_picker_expanded(&self) -> bool {
        self.frequency_picker_expanded
    }

    pub fn is_interval_picker_expanded(&self) -> bool {
        self.interval_picker_expanded
    }

    /// Row sections for the current state.
    pub fn sections(&self) -> Vec<Vec<RepeatRow>> {
        let mut header = vec![RepeatRow::Frequency];
        if self.frequency_picker_expanded {
            header.push(RepeatRow::FrequencyPicker);
        }
        header.push(RepeatRow::Interval);
        if self.interval_picker_expanded {
            header.push(RepeatRow::IntervalPicker);
        }

        let mut sections = vec![header];
        match self.state.frequency() {
            Frequency::Daily => {}
            Frequency::Weekly => {
                sections.push(Weekday::ALL.into_iter().map(RepeatRow::Weekday).collect());
            }
            Frequency::Monthly => {
                let detail = match self.state.month_day_mode() {
                    MonthDayMode::EachNumberedDay => RepeatRow::MonthDayGrid,
                    MonthDayMode::OnTheNthWeekday => RepeatRow::NthWeekdayPicker,
                };
                sections.push(vec![
                    RepeatRow::MonthDayMode(MonthDayMode::EachNumberedDay),
                    RepeatRow::MonthDayMode(MonthDayMode::OnTheNthWeekday),
                    detail,
                ]);
            }
            Frequency::Yearly => {
                sections.push(vec![RepeatRow::MonthGrid]);
                let mut rule_rows = vec![RepeatRow::YearWeekdayRule];
                if self.state.year_uses_weekday_rule() {
                    rule_rows.push(RepeatRow::NthWeekdayPicker);
                }
                sections.push(rule_rows);
            }
        }
        sections
    }

    /// Handles a tap on `row`.
    ///
    /// Returns the new rule when the tap changed data, `None` when it only
    /// expanded/collapsed a picker or hit a non-tappable row.
    pub fn select(&mut self, row: RepeatRow) -> Option<RecurrenceRule> {
        match row {
            RepeatRow::Frequency => {
                self.frequency_picker_expanded = !self.frequency_picker_expanded;
                self.interval_picker_expanded = false;
                None
            }
            RepeatRow::Interval => {
                self.interval_picker_expanded = !self.interval_picker_expanded;
                self.frequency_picker_expanded = false;
                None
            }
            RepeatRow::Weekday(weekday) => {
                self.state.toggle_weekday(weekday);
                Some(self.rule())
            }
            RepeatRow::MonthDayMode(mode) => {
                self.state.set_month_day_mode(mode);
                Some(self.rule())
            }
            RepeatRow::FrequencyPicker
            | RepeatRow::IntervalPicker
            | RepeatRow::MonthDayGrid
            | RepeatRow::NthWeekdayPicker
            | RepeatRow::MonthGrid
            | RepeatRow::YearWeekdayRule => None,
        }
    }

    pub fn pick_frequency(&mut self, frequency: Frequency) -> RecurrenceRule {
        self.state.select_frequency(frequency);
        self.rule()
    }

    pub fn pick_interval(&mut self, interval: u32) -> RecurrenceRule {
        self.state.set_interval(interval);
        self.rule()
    }

    pub fn pick_nth_weekday(&mut self, nth: NthWeekday) -> RecurrenceRule {
        self.state.set_nth_weekday(nth);
        self.rule()
    }

    pub fn toggle_month_day(&mut self, day: u8) -> RecurrenceRule {
        self.state.toggle_month_day(day);
        self.rule()
    }

    pub fn toggle_month(&mut self, month: u8) -> RecurrenceRule {
        self.state.toggle_month(month);
        self.rule()
    }

    pub fn set_year_uses_weekday_rule(&mut self, enabled: bool) -> RecurrenceRule {
        self.state.set_year_uses_weekday_rule(enabled);
        self.rule()
    }

    /// Value text of the frequency row.
    pub fn frequency_text(&self) -> &'static str {
        labels::frequency_label(self.state.frequency())
    }

    /// Value text of the interval row: "Day", "3 days", "Week", ...
    pub fn interval_text(&self) -> String {
        let (singular, plural) = interval_unit(self.state.frequency());
        match self.state.interval() {
            1 => singular.to_string(),
            n => format!("{n} {plural}"),
        }
    }

    /// Whether `row` shows a checkmark.
    pub fn is_checked(&self, row: RepeatRow) -> bool {
        match row {
            RepeatRow::Weekday(weekday) => self.state.is_weekday_selected(weekday),
            RepeatRow::MonthDayMode(mode) => self.state.month_day_mode() == mode,
            RepeatRow::YearWeekdayRule => self.state.year_uses_weekday_rule(),
            _ => false,
        }
    }

    /// Interval picker entries, `1..=MAX_INTERVAL`.
    pub fn interval_choices(&self) -> std::ops::RangeInclusive<u32> {
        1..=MAX_INTERVAL
    }
}

/// Singular and plural unit words for an interval of `frequency`.
pub fn interval_unit(frequency: Frequency) -> (&'static str, &'static str) {
    match frequency {
        Frequency::Daily => ("Day", "days"),
        Frequency::Weekly => ("Week", "weeks"),
        Frequency::Monthly => ("Month", "months"),
        Frequency::Yearly => ("Year", "years"),
    }
}
