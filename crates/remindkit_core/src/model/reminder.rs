//! Reminder record model.
//!
//! # Responsibility
//! - Define the read-only snapshot shape exchanged with the reminder store.
//! - Map raw store priorities onto the four user-facing priority levels.
//!
//! # Invariants
//! - `id` is stable and never nil.
//! - `priority` raw value is within `0..=9`.
//! - A recurrence rule is only attached when a due date is set.

use crate::model::recurrence::RecurrenceRule;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the reminder store.
pub type ReminderId = Uuid;

const MAX_PRIORITY: u8 = 9;

/// Validation errors for reminder records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderValidationError {
    NilId,
    PriorityOutOfRange(u8),
    RecurrenceWithoutDueDate,
}

impl Display for ReminderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "reminder id must not be nil"),
            Self::PriorityOutOfRange(raw) => {
                write!(f, "priority ({raw}) must be within 0..={MAX_PRIORITY}")
            }
            Self::RecurrenceWithoutDueDate => {
                write!(f, "recurrence rule requires a due date")
            }
        }
    }
}

impl Error for ReminderValidationError {}

/// Floating due-date components as stored by the reminder store.
///
/// Components are not checked on construction; combinations that do not
/// form a real date resolve to `None` and the reminder is treated as undated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DueDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub hour: Option<u32>,
    #[serde(default)]
    pub minute: Option<u32>,
}

impl DueDate {
    /// All-day due date.
    pub fn on_day(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: None,
            minute: None,
        }
    }

    /// Due date with hour/minute precision.
    pub fn at(datetime: NaiveDateTime) -> Self {
        Self {
            hour: Some(datetime.hour()),
            minute: Some(datetime.minute()),
            ..Self::on_day(datetime.date())
        }
    }

    pub fn has_time(&self) -> bool {
        self.hour.is_some()
    }

    /// Calendar day of the components, when valid.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Local wall-clock time of the components; all-day dates use midnight.
    pub fn naive_local(&self) -> Option<NaiveDateTime> {
        self.date()?
            .and_hms_opt(self.hour.unwrap_or(0), self.minute.unwrap_or(0), 0)
    }
}

/// User-facing priority buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl PriorityLevel {
    /// Levels in segment order.
    pub const ALL: [Self; 4] = [Self::None, Self::Low, Self::Medium, Self::High];
}

/// Raw store priority: 0 means none, 1 is highest and 9 is lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const NONE: Self = Self(0);

    /// # Errors
    /// Returns [`ReminderValidationError::PriorityOutOfRange`] above 9.
    pub fn new(raw: u8) -> Result<Self, ReminderValidationError> {
        if raw > MAX_PRIORITY {
            return Err(ReminderValidationError::PriorityOutOfRange(raw));
        }
        Ok(Self(raw))
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    /// RFC 5545 buckets: 1-4 high, 5 medium, 6-9 low.
    pub fn level(self) -> PriorityLevel {
        match self.0 {
            1..=4 => PriorityLevel::High,
            5 => PriorityLevel::Medium,
            6..=9 => PriorityLevel::Low,
            _ => PriorityLevel::None,
        }
    }

    pub fn from_level(level: PriorityLevel) -> Self {
        match level {
            PriorityLevel::None => Self(0),
            PriorityLevel::Low => Self(9),
            PriorityLevel::Medium => Self(5),
            PriorityLevel::High => Self(1),
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = ReminderValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

/// Geofence used by a location-based alarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredLocation {
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: u32,
}

/// Whether the alarm fires on arriving or on leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proximity {
    #[default]
    Enter,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAlarm {
    pub location: StructuredLocation,
    #[serde(default)]
    pub proximity: Proximity,
}

/// Reminder snapshot as exchanged with the reminder store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due: Option<DueDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Set by the store when `completed` flips to true.
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location_alarm: Option<LocationAlarm>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

impl Reminder {
    /// Creates a reminder with a generated ID and no schedule.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            priority: Priority::NONE,
            due: None,
            notes: None,
            completed: false,
            completion_date: None,
            location_alarm: None,
            recurrence: None,
        }
    }

    /// Creates a reminder with a store-provided ID.
    ///
    /// # Errors
    /// Returns [`ReminderValidationError::NilId`] for the nil UUID.
    pub fn with_id(id: ReminderId, title: impl Into<String>) -> Result<Self, ReminderValidationError> {
        if id.is_nil() {
            return Err(ReminderValidationError::NilId);
        }
        Ok(Self {
            id,
            ..Self::new(title)
        })
    }

    /// Builder-style due date setter.
    pub fn due_on(mut self, due: DueDate) -> Self {
        self.due = Some(due);
        self
    }

    /// Flips completion state and keeps `completion_date` consistent.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completion_date = completed.then_some(now);
    }

    /// # Errors
    /// Returns the first violated record invariant.
    pub fn validate(&self) -> Result<(), ReminderValidationError> {
        if self.id.is_nil() {
            return Err(ReminderValidationError::NilId);
        }
        if self.recurrence.is_some() && self.due.is_none() {
            return Err(ReminderValidationError::RecurrenceWithoutDueDate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DueDate, Priority, PriorityLevel};

    #[test]
    fn priority_levels_follow_rfc_buckets() {
        let levels: Vec<PriorityLevel> = (0..=9)
            .map(|raw| Priority::new(raw).expect("valid priority").level())
            .collect();
        assert_eq!(levels[0], PriorityLevel::None);
        assert!(levels[1..=4].iter().all(|l| *l == PriorityLevel::High));
        assert_eq!(levels[5], PriorityLevel::Medium);
        assert!(levels[6..=9].iter().all(|l| *l == PriorityLevel::Low));
        assert!(Priority::new(10).is_err());
    }

    #[test]
    fn malformed_components_do_not_resolve() {
        let due = DueDate {
            year: 2024,
            month: 2,
            day: 30,
            hour: None,
            minute: None,
        };
        assert_eq!(due.date(), None);
        assert_eq!(due.naive_local(), None);

        let bad_hour = DueDate {
            year: 2024,
            month: 2,
            day: 1,
            hour: Some(25),
            minute: Some(0),
        };
        assert!(bad_hour.date().is_some());
        assert_eq!(bad_hour.naive_local(), None);
    }
}
