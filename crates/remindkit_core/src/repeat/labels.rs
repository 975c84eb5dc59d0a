//! Fixed label tables for repeat pickers and grids.
//!
//! Label index + 1 is the calendar-style number for weekdays, months and
//! ordinals, except that the last ordinal slot stands for `-1`.

use crate::model::recurrence::{Frequency, SetPosition, Weekday};

pub const FREQUENCY_LABELS: [&str; 4] = ["Daily", "Weekly", "Monthly", "Yearly"];

pub const SET_POSITION_LABELS: [&str; 6] = ["first", "second", "third", "fourth", "fifth", "last"];

pub const WEEKDAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const MONTH_SHORT_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const DAYS_IN_MONTH_GRID: u8 = 31;

pub fn frequency_label(frequency: Frequency) -> &'static str {
    FREQUENCY_LABELS[frequency.index()]
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    WEEKDAY_LABELS[weekday.index()]
}

pub fn set_position_label(position: SetPosition) -> &'static str {
    SET_POSITION_LABELS[position.index()]
}

/// Short month label for a 1-based month number.
pub fn month_label(month: u8) -> Option<&'static str> {
    usize::from(month)
        .checked_sub(1)
        .and_then(|index| MONTH_SHORT_LABELS.get(index).copied())
}

/// Maps a stored ordinal back to a picker slot.
///
/// `1..=5` select the matching slot; any non-positive ordinal selects the
/// last slot; ordinals past the table have no slot.
pub fn set_position_for_ordinal(ordinal: i32) -> Option<SetPosition> {
    if ordinal < 1 {
        return Some(SetPosition::Last);
    }
    let index = usize::try_from(ordinal - 1).ok()?;
    if index >= SET_POSITION_LABELS.len() - 1 {
        return None;
    }
    SetPosition::from_index(index)
}

#[cfg(test)]
mod tests {
    use super::{month_label, set_position_for_ordinal, set_position_label, weekday_label};
    use crate::model::recurrence::{SetPosition, Weekday};

    #[test]
    fn ordinal_lookup_maps_negative_to_last_slot() {
        assert_eq!(set_position_for_ordinal(1), Some(SetPosition::First));
        assert_eq!(set_position_for_ordinal(5), Some(SetPosition::Fifth));
        assert_eq!(set_position_for_ordinal(-1), Some(SetPosition::Last));
        assert_eq!(set_position_for_ordinal(-2), Some(SetPosition::Last));
        assert_eq!(set_position_for_ordinal(6), None);
    }

    #[test]
    fn labels_follow_table_order() {
        assert_eq!(weekday_label(Weekday::Friday), "Friday");
        assert_eq!(set_position_label(SetPosition::Last), "last");
        assert_eq!(month_label(1), Some("Jan"));
        assert_eq!(month_label(12), Some("Dec"));
        assert_eq!(month_label(0), None);
        assert_eq!(month_label(13), None);
    }
}
