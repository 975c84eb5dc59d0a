//! Core logic for remindkit.
//! Recurrence editing and reminder list sectioning live here; rendering and
//! persistence are left to callers.

pub mod calendar;
pub mod edit;
pub mod format;
pub mod list;
pub mod logging;
pub mod model;
pub mod repeat;

pub use calendar::{day_label, FixedCalendar, LocalCalendar, SystemCalendar};
pub use edit::session::{EditNavigation, EditOutcome, EditRow, ReminderEditSession};
pub use list::controller::{
    ListOptions, RefreshOutcome, RefreshRequest, RefreshTicket, ReminderListController,
    SubscriptionId,
};
pub use list::sectioner::{bucket, section, section_header, sort_reminders, DayBucket, DayKey};
pub use list::store::{
    InMemoryReminderStore, ReminderQuery, ReminderStore, StoreError, StoreResult, TimeWindow,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::recurrence::{
    DayOfWeek, Frequency, RecurrenceEnd, RecurrenceRule, RecurrenceRuleBuilder,
    RuleValidationError, SetPosition, Weekday,
};
pub use model::reminder::{
    DueDate, LocationAlarm, Priority, PriorityLevel, Proximity, Reminder, ReminderId,
    ReminderValidationError, StructuredLocation,
};
pub use repeat::editor::{
    from_canonical_rule, to_canonical_rule, EditorSelectorState, MonthDayMode, NthWeekday,
    RepeatState, Selector,
};
pub use repeat::end::{RepeatEndChoice, RepeatEndEditor, RepeatEndRow};
pub use repeat::preset::{preset_for_rule, PresetOutcome, RepeatPreset};
pub use repeat::rows::{CustomRepeatScreen, RepeatRow};
pub use repeat::summary::{end_summary, rule_summary};

/// Minimal health-check API for linkage checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
