//! Reminder store contracts and in-memory implementation.
//!
//! # Responsibility
//! - Define the store collaborator the list controller and CLI talk to.
//! - Share query filter semantics across store implementations.
//!
//! # Invariants
//! - Write paths must call `Reminder::validate()` before mutating state.
//! - Fetch results are value snapshots; callers never alias store state.

use crate::calendar::LocalCalendar;
use crate::list::sectioner::resolved_due;
use crate::model::reminder::{Reminder, ReminderId, ReminderValidationError};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(ReminderValidationError),
    NotFound(ReminderId),
    Rejected(String),
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "reminder not found: {id}"),
            Self::Rejected(message) => write!(f, "store rejected change: {message}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::Rejected(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<ReminderValidationError> for StoreError {
    fn from(value: ReminderValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Inclusive instant range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Fetch predicate understood by every store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderQuery {
    /// Incomplete reminders; with `due_before`, only dated ones due no later.
    Incomplete { due_before: Option<DateTime<Utc>> },
    /// Completed reminders; with `window`, only those completed inside it.
    Completed { window: Option<TimeWindow> },
}

impl ReminderQuery {
    pub fn matches<C: LocalCalendar + ?Sized>(&self, reminder: &Reminder, calendar: &C) -> bool {
        match self {
            Self::Incomplete { due_before } => {
                if reminder.completed {
                    return false;
                }
                match due_before {
                    None => true,
                    Some(limit) => {
                        resolved_due(reminder, calendar).is_some_and(|due| due <= *limit)
                    }
                }
            }
            Self::Completed { window } => {
                if !reminder.completed {
                    return false;
                }
                match window {
                    None => true,
                    Some(window) => reminder
                        .completion_date
                        .is_some_and(|done| window.contains(done)),
                }
            }
        }
    }
}

/// Store interface consumed by the list controller.
pub trait ReminderStore {
    fn fetch_reminders(&self, query: &ReminderQuery) -> StoreResult<Vec<Reminder>>;
    fn get_reminder(&self, id: ReminderId) -> StoreResult<Option<Reminder>>;
    /// Inserts or replaces by id.
    fn save_reminder(&mut self, reminder: &Reminder) -> StoreResult<()>;
    fn remove_reminder(&mut self, id: ReminderId) -> StoreResult<()>;
}

/// Vector-backed store that filters through a calendar.
///
/// Keeps insertion order, so fetch order is deterministic.
#[derive(Debug, Clone)]
pub struct InMemoryReminderStore<C> {
    calendar: C,
    reminders: Vec<Reminder>,
}

impl<C: LocalCalendar> InMemoryReminderStore<C> {
    pub fn new(calendar: C) -> Self {
        Self {
            calendar,
            reminders: Vec::new(),
        }
    }

    /// Builds a store from snapshots, validating each one.
    ///
    /// # Errors
    /// Returns the first validation failure.
    pub fn with_reminders(
        calendar: C,
        reminders: impl IntoIterator<Item = Reminder>,
    ) -> StoreResult<Self> {
        let mut store = Self::new(calendar);
        for reminder in reminders {
            store.save_reminder(&reminder)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }
}

impl<C: LocalCalendar> ReminderStore for InMemoryReminderStore<C> {
    fn fetch_reminders(&self, query: &ReminderQuery) -> StoreResult<Vec<Reminder>> {
        Ok(self
            .reminders
            .iter()
            .filter(|reminder| query.matches(reminder, &self.calendar))
            .cloned()
            .collect())
    }

    fn get_reminder(&self, id: ReminderId) -> StoreResult<Option<Reminder>> {
        Ok(self.reminders.iter().find(|r| r.id == id).cloned())
    }

    fn save_reminder(&mut self, reminder: &Reminder) -> StoreResult<()> {
        reminder.validate()?;
        match self.reminders.iter_mut().find(|r| r.id == reminder.id) {
            Some(existing) => *existing = reminder.clone(),
            None => self.reminders.push(reminder.clone()),
        }
        Ok(())
    }

    fn remove_reminder(&mut self, id: ReminderId) -> StoreResult<()> {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        if self.reminders.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
