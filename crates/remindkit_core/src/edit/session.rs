//! Single-reminder edit session.
//!
//! # Responsibility
//! - Apply field edits to a value copy of one reminder.
//! - Describe the edit screen as tagged row sections.
//! - Resolve the session into done/cancel/delete outcomes.
//!
//! # Invariants
//! - The original snapshot is never mutated; cancel returns it unchanged.
//! - A recurrence rule only exists while the reminder has a due date.
//! - A location alarm only exists while location reminding is enabled.

use crate::calendar::LocalCalendar;
use crate::format;
use crate::model::recurrence::{RecurrenceEnd, RecurrenceRule};
use crate::model::reminder::{DueDate, LocationAlarm, Priority, PriorityLevel, Reminder, ReminderId};
use crate::repeat::end::RepeatEndEditor;
use crate::repeat::preset::{preset_for_rule, RepeatPreset};
use crate::repeat::summary::{end_summary, rule_summary};
use chrono::{Duration, NaiveDateTime, Timelike};
use log::debug;

/// One row of the edit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditRow {
    Title,
    RemindOnDay,
    Alarm,
    AlarmPicker,
    Repeat,
    RepeatEnd,
    LocationToggle,
    Location,
    Priority,
    Notes,
    Delete,
}

/// What a row tap asks the caller to present.
#[derive(Debug, Clone, PartialEq)]
pub enum EditNavigation {
    /// Handled in place (expansion toggles, non-tappable rows).
    Stay,
    Repeat(RepeatPreset),
    RepeatEnd(RepeatEndEditor),
    Location(Option<LocationAlarm>),
    Delete(ReminderId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    DoneWithChanges(Reminder),
    DoneWithNoChanges,
}

#[derive(Debug, Clone)]
pub struct ReminderEditSession {
    original: Reminder,
    working: Reminder,
    alarm_expanded: bool,
    location_enabled: bool,
    show_delete: bool,
}

impl ReminderEditSession {
    /// `show_delete` adds the trailing delete section (existing reminders).
    pub fn open(reminder: Reminder, show_delete: bool) -> Self {
        let location_enabled = reminder.location_alarm.is_some();
        Self {
            original: reminder.clone(),
            working: reminder,
            alarm_expanded: false,
            location_enabled,
            show_delete,
        }
    }

    pub fn reminder(&self) -> &Reminder {
        &self.working
    }

    pub fn has_changes(&self) -> bool {
        self.working != self.original
    }

    pub fn is_alarm_expanded(&self) -> bool {
        self.alarm_expanded
    }

    pub fn is_location_enabled(&self) -> bool {
        self.location_enabled
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.working.title = title.into();
    }

    /// Blank notes are stored as `None`.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        let notes = notes.into();
        self.working.notes = (!notes.trim().is_empty()).then_some(notes);
    }

    /// Turning on seeds a due date at `now` rounded up to the next hour,
    /// unless one already exists. Turning off clears due date, recurrence
    /// and alarm expansion.
    pub fn set_remind_on_day(&mut self, on: bool, now: NaiveDateTime) {
        if on {
            if self.working.due.is_none() {
                self.working.due = Some(DueDate::at(round_up_to_hour(now)));
            }
        } else {
            self.working.due = None;
            self.working.recurrence = None;
            self.alarm_expanded = false;
        }
    }

    /// Replaces the due date from the alarm picker.
    pub fn set_due(&mut self, due: DueDate) {
        self.working.due = Some(due);
    }

    pub fn toggle_alarm_expanded(&mut self) {
        self.alarm_expanded = self.working.due.is_some() && !self.alarm_expanded;
    }

    /// Returns `false` when a rule was offered without a due date.
    pub fn set_recurrence(&mut self, rule: Option<RecurrenceRule>) -> bool {
        if rule.is_some() && self.working.due.is_none() {
            return false;
        }
        self.working.recurrence = rule;
        true
    }

    /// Returns `false` when there is no rule to end.
    pub fn set_recurrence_end(&mut self, end: RecurrenceEnd) -> bool {
        match self.working.recurrence.as_mut() {
            Some(rule) => {
                *rule = rule.with_end(end);
                true
            }
            None => false,
        }
    }

    pub fn set_location_enabled(&mut self, enabled: bool) {
        self.location_enabled = enabled;
        if !enabled {
            self.working.location_alarm = None;
        }
    }

    /// Replaces the location alarm; `Some` also enables location reminding.
    pub fn set_location_alarm(&mut self, alarm: Option<LocationAlarm>) {
        if alarm.is_some() {
            self.location_enabled = true;
        }
        self.working.location_alarm = alarm;
    }

    pub fn priority_level(&self) -> PriorityLevel {
        self.working.priority.level()
    }

    pub fn set_priority_level(&mut self, level: PriorityLevel) {
        if self.working.priority.level() != level {
            self.working.priority = Priority::from_level(level);
        }
    }

    /// Row sections for the current working copy.
    pub fn rows(&self) -> Vec<Vec<EditRow>> {
        let mut sections = vec![vec![EditRow::Title]];

        let mut remind = vec![EditRow::RemindOnDay];
        if let Some(due) = self.working.due.as_ref() {
            if due.naive_local().is_some() {
                remind.push(EditRow::Alarm);
                if self.alarm_expanded {
                    remind.push(EditRow::AlarmPicker);
                }
            }
            remind.push(EditRow::Repeat);
            if self.working.recurrence.is_some() {
                remind.push(EditRow::RepeatEnd);
            }
        }
        sections.push(remind);

        let mut location = vec![EditRow::LocationToggle];
        if self.location_enabled {
            location.push(EditRow::Location);
        }
        sections.push(location);

        sections.push(vec![EditRow::Priority, EditRow::Notes]);
        if self.show_delete {
            sections.push(vec![EditRow::Delete]);
        }
        sections
    }

    /// Dispatches a row tap.
    pub fn select<C: LocalCalendar + ?Sized>(&mut self, row: EditRow, calendar: &C) -> EditNavigation {
        match row {
            EditRow::Alarm => {
                self.toggle_alarm_expanded();
                EditNavigation::Stay
            }
            EditRow::Repeat => {
                EditNavigation::Repeat(preset_for_rule(self.working.recurrence.as_ref()))
            }
            EditRow::RepeatEnd => match self.working.recurrence.as_ref() {
                Some(rule) => {
                    let default_date = self
                        .working
                        .due
                        .as_ref()
                        .and_then(DueDate::date)
                        .unwrap_or_else(|| calendar.today());
                    EditNavigation::RepeatEnd(RepeatEndEditor::new(rule.end().clone(), default_date))
                }
                None => EditNavigation::Stay,
            },
            EditRow::Location => EditNavigation::Location(self.working.location_alarm.clone()),
            EditRow::Delete if self.show_delete => EditNavigation::Delete(self.request_delete()),
            EditRow::Title
            | EditRow::RemindOnDay
            | EditRow::AlarmPicker
            | EditRow::LocationToggle
            | EditRow::Priority
            | EditRow::Notes
            | EditRow::Delete => EditNavigation::Stay,
        }
    }

    /// Value text of the alarm row; the expanded form uses the long style.
    pub fn alarm_text(&self) -> Option<String> {
        let local = self.working.due.as_ref()?.naive_local()?;
        Some(if self.alarm_expanded {
            format::long_date_time(local)
        } else {
            format::medium_date_time(local)
        })
    }

    pub fn repeat_text(&self) -> String {
        rule_summary(self.working.recurrence.as_ref())
    }

    pub fn repeat_end_text(&self) -> String {
        self.working
            .recurrence
            .as_ref()
            .map(|rule| end_summary(rule.end()))
            .unwrap_or_else(|| end_summary(&RecurrenceEnd::Never))
    }

    pub fn location_text(&self) -> String {
        self.working
            .location_alarm
            .as_ref()
            .map(|alarm| alarm.location.title.clone())
            .unwrap_or_else(|| "None".to_string())
    }

    pub fn finish(self) -> EditOutcome {
        let changed = self.has_changes();
        debug!(
            "event=edit_finish module=edit status=ok id={} changed={}",
            self.working.id, changed
        );
        if changed {
            EditOutcome::DoneWithChanges(self.working)
        } else {
            EditOutcome::DoneWithNoChanges
        }
    }

    /// Discards every edit.
    pub fn cancel(self) -> Reminder {
        self.original
    }

    pub fn request_delete(&self) -> ReminderId {
        self.original.id
    }
}

fn round_up_to_hour(now: NaiveDateTime) -> NaiveDateTime {
    let floor = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    if floor == now {
        now
    } else {
        floor
            .checked_add_signed(Duration::hours(1))
            .unwrap_or(floor)
    }
}
