//! Occupancy statistics, uniqueness checks and view filters.

use crate::types::{ParkingStats, Slot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Count slots by status and feature.
///
/// `occupancy_rate` is the occupied share in whole percent, rounded half up;
/// an empty lot reports 0.
pub fn parking_stats(slots: &[Slot]) -> ParkingStats {
    let total = slots.len();
    let occupied = slots.iter().filter(|s| s.is_occupied).count();
    let ev_slots = slots.iter().filter(|s| s.is_ev_charging).count();
    let covered_slots = slots.iter().filter(|s| s.is_covered).count();

    let occupancy_rate = if total > 0 {
        ((occupied * 200 + total) / (2 * total)) as u32
    } else {
        0
    };

    ParkingStats {
        total,
        occupied,
        available: total - occupied,
        ev_slots,
        covered_slots,
        occupancy_rate,
    }
}

/// Whether any slot already uses `candidate`, ignoring case.
pub fn is_slot_number_taken(slots: &[Slot], candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();
    slots.iter().any(|s| s.slot_no.to_lowercase() == candidate)
}

/// View filter over the slot grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotFilter {
    #[default]
    All,
    Available,
    Occupied,
    Ev,
    Covered,
}

impl SlotFilter {
    pub fn matches(&self, slot: &Slot) -> bool {
        match self {
            SlotFilter::All => true,
            SlotFilter::Available => !slot.is_occupied,
            SlotFilter::Occupied => slot.is_occupied,
            SlotFilter::Ev => slot.is_ev_charging,
            SlotFilter::Covered => slot.is_covered,
        }
    }
}

impl FromStr for SlotFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(SlotFilter::All),
            "available" | "free" => Ok(SlotFilter::Available),
            "occupied" => Ok(SlotFilter::Occupied),
            "ev" => Ok(SlotFilter::Ev),
            "covered" => Ok(SlotFilter::Covered),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

impl fmt::Display for SlotFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotFilter::All => "all",
            SlotFilter::Available => "available",
            SlotFilter::Occupied => "occupied",
            SlotFilter::Ev => "ev",
            SlotFilter::Covered => "covered",
        };
        f.write_str(name)
    }
}

/// The slots matching `filter`, in input order.
pub fn filter_slots(slots: &[Slot], filter: SlotFilter) -> Vec<Slot> {
    slots.iter().filter(|s| filter.matches(s)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot() -> Vec<Slot> {
        vec![
            Slot::new("1", "A1", true, true),
            Slot::new("2", "A2", true, false).occupied(true),
            Slot::new("3", "A3", false, true),
            Slot::new("4", "B1", false, false),
        ]
    }

    #[test]
    fn test_stats_quarter_occupied() {
        let stats = parking_stats(&lot());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.available, 3);
        assert_eq!(stats.ev_slots, 2);
        assert_eq!(stats.covered_slots, 2);
        assert_eq!(stats.occupancy_rate, 25);
    }

    #[test]
    fn test_stats_empty_lot() {
        assert_eq!(parking_stats(&[]), ParkingStats::default());
    }

    #[test]
    fn test_stats_rounds_half_up() {
        let mut slots: Vec<Slot> = (0..8)
            .map(|i| Slot::new(i.to_string(), format!("S{i}"), false, false))
            .collect();
        slots[0].is_occupied = true;
        // 1/8 = 12.5%
        assert_eq!(parking_stats(&slots).occupancy_rate, 13);

        let thirds = vec![
            Slot::new("1", "A1", false, false).occupied(true),
            Slot::new("2", "A2", false, false).occupied(true),
            Slot::new("3", "A3", false, false),
        ];
        assert_eq!(parking_stats(&thirds).occupancy_rate, 67);
    }

    #[test]
    fn test_slot_number_taken_ignores_case() {
        let slots = lot();
        assert!(is_slot_number_taken(&slots, "a1"));
        assert!(is_slot_number_taken(&slots, "B1"));
        assert!(!is_slot_number_taken(&slots, "B2"));
        assert!(!is_slot_number_taken(&[], "A1"));
    }

    #[test]
    fn test_filters() {
        let slots = lot();
        assert_eq!(filter_slots(&slots, SlotFilter::All).len(), 4);
        assert_eq!(filter_slots(&slots, SlotFilter::Available).len(), 3);
        assert_eq!(filter_slots(&slots, SlotFilter::Occupied)[0].slot_no, "A2");
        assert_eq!(filter_slots(&slots, SlotFilter::Ev).len(), 2);
        assert_eq!(filter_slots(&slots, SlotFilter::Covered).len(), 2);
        assert_eq!("Free".parse::<SlotFilter>(), Ok(SlotFilter::Available));
    }
}
