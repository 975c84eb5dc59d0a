//! Recurrence rule value model.
//!
//! # Responsibility
//! - Define the canonical repeat schedule attached to a reminder.
//! - Validate rule invariants once, when a rule is built or decoded.
//!
//! # Invariants
//! - `interval >= 1`.
//! - `days_of_month` values are in `1..=31`, `months_of_year` in `1..=12`.
//! - `set_positions` values are non-zero and within `-366..=366`.
//! - Weekly rules carry no ordinals: no set positions, no week numbers.
//! - Monthly rules never combine numbered days with set positions.
//! - A built rule is immutable; editors produce new rules instead of
//!   mutating a shared one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;

const MAX_SET_POSITION: i32 = 366;
const MAX_WEEK_NUMBER: i8 = 53;

/// Repeat unit of a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// All frequencies in picker order.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// Zero-based picker index.
    pub fn index(self) -> usize {
        match self {
            Self::Daily => 0,
            Self::Weekly => 1,
            Self::Monthly => 2,
            Self::Yearly => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Day of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All weekdays in order (Sunday through Saturday).
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Zero-based index, Sunday = 0.
    pub fn index(self) -> usize {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    /// Calendar-style weekday number, Sunday = 1 through Saturday = 7.
    pub fn number(self) -> u8 {
        // index is always < 7
        self.index() as u8 + 1
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn from_number(number: u8) -> Option<Self> {
        usize::from(number)
            .checked_sub(1)
            .and_then(Self::from_index)
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        Self::ALL[value.num_days_from_sunday() as usize]
    }
}

/// Nth occurrence selector inside a month or year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetPosition {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Last,
}

impl SetPosition {
    /// All positions in picker order.
    pub const ALL: [Self; 6] = [
        Self::First,
        Self::Second,
        Self::Third,
        Self::Fourth,
        Self::Fifth,
        Self::Last,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Fourth => 3,
            Self::Fifth => 4,
            Self::Last => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Ordinal stored in a rule: `1..=5`, or `-1` for the last occurrence.
    pub fn ordinal(self) -> i32 {
        match self {
            Self::Last => -1,
            other => other.index() as i32 + 1,
        }
    }
}

/// Weekday with optional occurrence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayOfWeek {
    pub weekday: Weekday,
    /// `None` means every matching weekday in the period.
    #[serde(default)]
    pub week_number: Option<i8>,
}

impl DayOfWeek {
    pub fn every(weekday: Weekday) -> Self {
        Self {
            weekday,
            week_number: None,
        }
    }

    pub fn nth(weekday: Weekday, week_number: i8) -> Self {
        Self {
            weekday,
            week_number: Some(week_number),
        }
    }
}

/// Termination condition of a repeating schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrenceEnd {
    /// Repeats forever.
    #[default]
    Never,
    /// Last occurrence is on or before `date`.
    EndDate { date: NaiveDate },
    /// Stops after `count` occurrences.
    OccurrenceCount { count: NonZeroU32 },
}

impl RecurrenceEnd {
    pub fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Self::EndDate { date } => Some(*date),
            _ => None,
        }
    }
}

/// Validation errors for recurrence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValidationError {
    ZeroInterval,
    DayOfMonthOutOfRange(u8),
    MonthOutOfRange(u8),
    SetPositionOutOfRange(i32),
    WeekNumberOutOfRange(i8),
    /// Monthly rule with both numbered days and set positions.
    ConflictingMonthlySelectors,
    SetPositionsOnWeekly,
    WeekNumberOnWeekly,
}

impl Display for RuleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroInterval => write!(f, "interval must be >= 1"),
            Self::DayOfMonthOutOfRange(day) => {
                write!(f, "day of month ({day}) must be within 1..=31")
            }
            Self::MonthOutOfRange(month) => write!(f, "month ({month}) must be within 1..=12"),
            Self::SetPositionOutOfRange(position) => write!(
                f,
                "set position ({position}) must be non-zero and within -{MAX_SET_POSITION}..={MAX_SET_POSITION}"
            ),
            Self::WeekNumberOutOfRange(week) => write!(
                f,
                "week number ({week}) must be non-zero and within -{MAX_WEEK_NUMBER}..={MAX_WEEK_NUMBER}"
            ),
            Self::ConflictingMonthlySelectors => write!(
                f,
                "monthly rule cannot combine days of month with set positions"
            ),
            Self::SetPositionsOnWeekly => write!(f, "weekly rule cannot carry set positions"),
            Self::WeekNumberOnWeekly => write!(f, "weekly rule weekdays cannot carry week numbers"),
        }
    }
}

impl Error for RuleValidationError {}

/// Canonical repeat schedule.
///
/// Built through [`RecurrenceRuleBuilder`]; deserialization runs the same
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecurrenceRuleWire", into = "RecurrenceRuleWire")]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: u32,
    days_of_week: Vec<DayOfWeek>,
    days_of_month: BTreeSet<u8>,
    months_of_year: BTreeSet<u8>,
    set_positions: Vec<i32>,
    end: RecurrenceEnd,
}

impl RecurrenceRule {
    /// Creates a plain rule with no day/month selectors and no end.
    ///
    /// # Errors
    /// - Returns [`RuleValidationError::ZeroInterval`] when `interval == 0`.
    pub fn new(frequency: Frequency, interval: u32) -> Result<Self, RuleValidationError> {
        Self::builder(frequency).interval(interval).build()
    }

    pub fn builder(frequency: Frequency) -> RecurrenceRuleBuilder {
        RecurrenceRuleBuilder::new(frequency)
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn days_of_week(&self) -> &[DayOfWeek] {
        &self.days_of_week
    }

    pub fn days_of_month(&self) -> &BTreeSet<u8> {
        &self.days_of_month
    }

    pub fn months_of_year(&self) -> &BTreeSet<u8> {
        &self.months_of_year
    }

    pub fn set_positions(&self) -> &[i32] {
        &self.set_positions
    }

    pub fn end(&self) -> &RecurrenceEnd {
        &self.end
    }

    /// Returns a copy of this rule with only the termination replaced.
    pub fn with_end(&self, end: RecurrenceEnd) -> Self {
        Self {
            end,
            ..self.clone()
        }
    }

    /// Whether any day, week or month selector narrows the schedule.
    pub fn has_selectors(&self) -> bool {
        !self.days_of_week.is_empty()
            || !self.days_of_month.is_empty()
            || !self.months_of_year.is_empty()
    }

    /// Validates rule invariants.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if self.interval == 0 {
            return Err(RuleValidationError::ZeroInterval);
        }
        if let Some(day) = self
            .days_of_month
            .iter()
            .find(|day| !(1..=31).contains(*day))
        {
            return Err(RuleValidationError::DayOfMonthOutOfRange(*day));
        }
        if let Some(month) = self
            .months_of_year
            .iter()
            .find(|month| !(1..=12).contains(*month))
        {
            return Err(RuleValidationError::MonthOutOfRange(*month));
        }
        if let Some(position) = self
            .set_positions
            .iter()
            .find(|position| {
                **position == 0 || !(-MAX_SET_POSITION..=MAX_SET_POSITION).contains(*position)
            })
        {
            return Err(RuleValidationError::SetPositionOutOfRange(*position));
        }
        if let Some(week) = self
            .days_of_week
            .iter()
            .filter_map(|day| day.week_number)
            .find(|week| *week == 0 || !(-MAX_WEEK_NUMBER..=MAX_WEEK_NUMBER).contains(week))
        {
            return Err(RuleValidationError::WeekNumberOutOfRange(week));
        }
        self.validate_frequency_selectors()
    }

    fn validate_frequency_selectors(&self) -> Result<(), RuleValidationError> {
        match self.frequency {
            Frequency::Weekly => {
                if !self.set_positions.is_empty() {
                    return Err(RuleValidationError::SetPositionsOnWeekly);
                }
                if self.days_of_week.iter().any(|day| day.week_number.is_some()) {
                    return Err(RuleValidationError::WeekNumberOnWeekly);
                }
            }
            Frequency::Monthly => {
                if !self.days_of_month.is_empty() && !self.set_positions.is_empty() {
                    return Err(RuleValidationError::ConflictingMonthlySelectors);
                }
            }
            Frequency::Daily | Frequency::Yearly => {}
        }
        Ok(())
    }
}

/// Step-wise constructor for [`RecurrenceRule`].
#[derive(Debug, Clone)]
pub struct RecurrenceRuleBuilder {
    rule: RecurrenceRule,
}

impl RecurrenceRuleBuilder {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            rule: RecurrenceRule {
                frequency,
                interval: 1,
                days_of_week: Vec::new(),
                days_of_month: BTreeSet::new(),
                months_of_year: BTreeSet::new(),
                set_positions: Vec::new(),
                end: RecurrenceEnd::Never,
            },
        }
    }

    pub fn interval(mut self, interval: u32) -> Self {
        self.rule.interval = interval;
        self
    }

    pub fn day_of_week(mut self, day: DayOfWeek) -> Self {
        self.rule.days_of_week.push(day);
        self
    }

    pub fn days_of_week(mut self, days: impl IntoIterator<Item = DayOfWeek>) -> Self {
        self.rule.days_of_week.extend(days);
        self
    }

    pub fn days_of_month(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.rule.days_of_month.extend(days);
        self
    }

    pub fn months_of_year(mut self, months: impl IntoIterator<Item = u8>) -> Self {
        self.rule.months_of_year.extend(months);
        self
    }

    pub fn set_position(mut self, position: i32) -> Self {
        self.rule.set_positions.push(position);
        self
    }

    pub fn end(mut self, end: RecurrenceEnd) -> Self {
        self.rule.end = end;
        self
    }

    /// Validates and returns the rule.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn build(self) -> Result<RecurrenceRule, RuleValidationError> {
        self.rule.validate()?;
        Ok(self.rule)
    }

    /// Returns the rule for inputs that are valid by construction.
    pub(crate) fn build_trusted(self) -> RecurrenceRule {
        debug_assert_eq!(self.rule.validate(), Ok(()));
        self.rule
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecurrenceRuleWire {
    frequency: Frequency,
    interval: u32,
    #[serde(default)]
    days_of_week: Vec<DayOfWeek>,
    #[serde(default)]
    days_of_month: BTreeSet<u8>,
    #[serde(default)]
    months_of_year: BTreeSet<u8>,
    #[serde(default)]
    set_positions: Vec<i32>,
    #[serde(default)]
    end: RecurrenceEnd,
}

impl TryFrom<RecurrenceRuleWire> for RecurrenceRule {
    type Error = RuleValidationError;

    fn try_from(value: RecurrenceRuleWire) -> Result<Self, Self::Error> {
        let rule = Self {
            frequency: value.frequency,
            interval: value.interval,
            days_of_week: value.days_of_week,
            days_of_month: value.days_of_month,
            months_of_year: value.months_of_year,
            set_positions: value.set_positions,
            end: value.end,
        };
        rule.validate()?;
        Ok(rule)
    }
}

impl From<RecurrenceRule> for RecurrenceRuleWire {
    fn from(value: RecurrenceRule) -> Self {
        Self {
            frequency: value.frequency,
            interval: value.interval,
            days_of_week: value.days_of_week,
            days_of_month: value.days_of_month,
            months_of_year: value.months_of_year,
            set_positions: value.set_positions,
            end: value.end,
        }
    }
}
