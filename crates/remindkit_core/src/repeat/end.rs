//! Repeat termination editor.
//!
//! # Responsibility
//! - Edit the `RecurrenceEnd` of a rule as a Forever / End Date choice.
//!
//! # Invariants
//! - Any non-`Never` end shows the end-date choice as checked.
//! - Choosing or editing a date always yields `RecurrenceEnd::EndDate`.

use crate::model::recurrence::RecurrenceEnd;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatEndChoice {
    Forever,
    EndDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatEndRow {
    Choice(RepeatEndChoice),
    DatePicker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatEndEditor {
    end: RecurrenceEnd,
    default_date: NaiveDate,
}

impl RepeatEndEditor {
    /// `default_date` seeds the picker when switching to an end date
    /// without one (callers usually pass the reminder's due day).
    pub fn new(end: RecurrenceEnd, default_date: NaiveDate) -> Self {
        Self { end, default_date }
    }

    pub fn end(&self) -> &RecurrenceEnd {
        &self.end
    }

    pub fn choice(&self) -> RepeatEndChoice {
        if self.end.is_never() {
            RepeatEndChoice::Forever
        } else {
            RepeatEndChoice::EndDate
        }
    }

    /// Date shown in the picker.
    pub fn picker_date(&self) -> NaiveDate {
        self.end.end_date().unwrap_or(self.default_date)
    }

    pub fn rows(&self) -> Vec<RepeatEndRow> {
        let mut rows = vec![
            RepeatEndRow::Choice(RepeatEndChoice::Forever),
            RepeatEndRow::Choice(RepeatEndChoice::EndDate),
        ];
        if self.choice() == RepeatEndChoice::EndDate {
            rows.push(RepeatEndRow::DatePicker);
        }
        rows
    }

    pub fn is_checked(&self, row: RepeatEndRow) -> bool {
        matches!(row, RepeatEndRow::Choice(choice) if choice == self.choice())
    }

    pub fn choose(&mut self, choice: RepeatEndChoice) -> &RecurrenceEnd {
        self.end = match choice {
            RepeatEndChoice::Forever => RecurrenceEnd::Never,
            RepeatEndChoice::EndDate => RecurrenceEnd::EndDate {
                date: self.picker_date(),
            },
        };
        &self.end
    }

    pub fn set_date(&mut self, date: NaiveDate) -> &RecurrenceEnd {
        self.end = RecurrenceEnd::EndDate { date };
        &self.end
    }

    pub fn into_end(self) -> RecurrenceEnd {
        self.end
    }
}
