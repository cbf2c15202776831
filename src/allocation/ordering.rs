//! Display ordering for slots.

use crate::types::Slot;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Integer prefix of a slot number: sign and digits with leading zeros removed.
#[derive(Clone, Copy)]
struct IntegerPrefix<'a> {
    negative: bool,
    magnitude: &'a str,
}

/// The optionally `-`-signed run of ASCII digits a slot number starts with.
/// `-0` reads as zero. A leading `+` is not accepted.
fn leading_integer(s: &str) -> Option<IntegerPrefix<'_>> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let magnitude = rest[..len].trim_start_matches('0');
    Some(IntegerPrefix {
        negative: negative && !magnitude.is_empty(),
        magnitude,
    })
}

/// Compare two integer prefixes by value without overflow.
fn compare_integers(a: IntegerPrefix<'_>, b: IntegerPrefix<'_>) -> Ordering {
    let magnitude = a
        .magnitude
        .len()
        .cmp(&b.magnitude.len())
        .then_with(|| a.magnitude.cmp(b.magnitude));
    match (a.negative, b.negative) {
        (false, false) => magnitude,
        (true, true) => magnitude.reverse(),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}

/// Text a slot number sorts by against non-numeric numbers. A signed zero
/// ("-0", "-00A") drops its sign so it sits with the unsigned zeros it equals.
fn text_key(s: &str) -> &str {
    match s.strip_prefix('-') {
        Some(rest)
            if rest.starts_with(|c: char| c.is_ascii_digit())
                && leading_integer(rest).is_some_and(|n| n.magnitude.is_empty()) =>
        {
            rest
        }
        _ => s,
    }
}

/// Case-insensitive text order; on a case-only difference lowercase sorts first.
///
/// Compares lowercased code points, so non-ASCII letters such as accented
/// characters sort by code point rather than by locale collation rules.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Order two slot numbers for display.
///
/// When both start with an integer the integers decide, so "2" < "10" and
/// "-5" < "-1".
/// A leading `-` makes the integer negative; `+` is text. Otherwise the
/// numbers are compared as text. Numbers whose integer
/// prefixes are equal ("1" and "01", "3A" and "3B") compare equal and keep
/// their relative order under a stable sort.
pub fn compare_slot_numbers(a: &str, b: &str) -> Ordering {
    match (leading_integer(a), leading_integer(b)) {
        (Some(x), Some(y)) => compare_integers(x, y),
        _ => compare_text(text_key(a), text_key(b)),
    }
}

/// Sort slots in place by slot number. Stable.
pub fn sort_slots(slots: &mut [Slot]) {
    slots.sort_by(|a, b| compare_slot_numbers(&a.slot_no, &b.slot_no));
}

/// A sorted copy of `slots`.
pub fn sorted_slots(slots: &[Slot]) -> Vec<Slot> {
    let mut out = slots.to_vec();
    sort_slots(&mut out);
    out
}

/// Column of the data-model table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "slotNo")]
    SlotNo,
    #[serde(rename = "isCovered")]
    IsCovered,
    #[serde(rename = "isEVCharging")]
    IsEvCharging,
    #[serde(rename = "isOccupied")]
    IsOccupied,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slotno" | "slot" | "number" => Ok(SortField::SlotNo),
            "iscovered" | "covered" => Ok(SortField::IsCovered),
            "isevcharging" | "ev" => Ok(SortField::IsEvCharging),
            "isoccupied" | "occupied" => Ok(SortField::IsOccupied),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::SlotNo => "slotNo",
            SortField::IsCovered => "isCovered",
            SortField::IsEvCharging => "isEVCharging",
            SortField::IsOccupied => "isOccupied",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Flip direction, as a second click on the same column does.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sort a copy of `slots` by one column. Booleans order false before true.
/// Ties keep their input order in either direction.
pub fn sort_by_field(slots: &[Slot], field: SortField, direction: SortDirection) -> Vec<Slot> {
    let mut out = slots.to_vec();
    out.sort_by(|a, b| {
        let ord = match field {
            SortField::SlotNo => compare_slot_numbers(&a.slot_no, &b.slot_no),
            SortField::IsCovered => a.is_covered.cmp(&b.is_covered),
            SortField::IsEvCharging => a.is_ev_charging.cmp(&b.is_ev_charging),
            SortField::IsOccupied => a.is_occupied.cmp(&b.is_occupied),
        };
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    out
}
