//! Top-level repeat choices.
//!
//! # Responsibility
//! - Offer the fixed preset list shown before the custom editor.
//! - Decide which preset a stored rule corresponds to.
//!
//! # Invariants
//! - Preset rules carry no selectors and never end.
//! - A rule that matches no preset maps to [`RepeatPreset::Custom`].

use crate::model::recurrence::{Frequency, RecurrenceRule};
use crate::repeat::rows::CustomRepeatScreen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatPreset {
    Never,
    EveryDay,
    EveryWeek,
    EveryTwoWeeks,
    EveryMonth,
    EveryYear,
    Custom,
}

/// Result of choosing a preset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetOutcome {
    /// Replace the reminder's rule (`None` stops repeating).
    SetRule(Option<RecurrenceRule>),
    /// Push the custom editor.
    OpenCustom(CustomRepeatScreen),
}

impl RepeatPreset {
    /// Presets in row order; `Custom` sits in its own trailing section.
    pub const ALL: [Self; 7] = [
        Self::Never,
        Self::EveryDay,
        Self::EveryWeek,
        Self::EveryTwoWeeks,
        Self::EveryMonth,
        Self::EveryYear,
        Self::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::EveryDay => "Every Day",
            Self::EveryWeek => "Every Week",
            Self::EveryTwoWeeks => "Every 2 Weeks",
            Self::EveryMonth => "Every Month",
            Self::EveryYear => "Every Year",
            Self::Custom => "Custom",
        }
    }

    /// Frequency and interval of a fixed preset.
    fn schedule(self) -> Option<(Frequency, u32)> {
        match self {
            Self::EveryDay => Some((Frequency::Daily, 1)),
            Self::EveryWeek => Some((Frequency::Weekly, 1)),
            Self::EveryTwoWeeks => Some((Frequency::Weekly, 2)),
            Self::EveryMonth => Some((Frequency::Monthly, 1)),
            Self::EveryYear => Some((Frequency::Yearly, 1)),
            Self::Never | Self::Custom => None,
        }
    }

    /// Rule stored for a fixed preset. `Never` and `Custom` have none.
    pub fn to_rule(self) -> Option<RecurrenceRule> {
        let (frequency, interval) = self.schedule()?;
        Some(
            RecurrenceRule::builder(frequency)
                .interval(interval)
                .build_trusted(),
        )
    }

    /// Applies the preset to a reminder currently carrying `current`.
    pub fn apply(self, current: Option<&RecurrenceRule>) -> PresetOutcome {
        match self {
            Self::Custom => PresetOutcome::OpenCustom(CustomRepeatScreen::open(current)),
            other => PresetOutcome::SetRule(other.to_rule()),
        }
    }
}

/// Preset row to check for the reminder's current rule.
pub fn preset_for_rule(rule: Option<&RecurrenceRule>) -> RepeatPreset {
    let Some(rule) = rule else {
        return RepeatPreset::Never;
    };
    let no_weekdays = rule.days_of_week().is_empty();
    match (rule.frequency(), rule.interval()) {
        (Frequency::Daily, 1) => RepeatPreset::EveryDay,
        (Frequency::Weekly, 1) if no_weekdays => RepeatPreset::EveryWeek,
        (Frequency::Weekly, 2) if no_weekdays => RepeatPreset::EveryTwoWeeks,
        (Frequency::Monthly, 1) if no_weekdays && rule.days_of_month().is_empty() => {
            RepeatPreset::EveryMonth
        }
        (Frequency::Yearly, 1) if rule.months_of_year().is_empty() => RepeatPreset::EveryYear,
        _ => RepeatPreset::Custom,
    }
}
