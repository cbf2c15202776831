//! Best-match slot selection.

use super::ordering::compare_slot_numbers;
use crate::types::{Allocation, Slot};

/// Pick a free slot for a vehicle.
///
/// Only unoccupied slots are considered. A slot qualifies when it has EV
/// charging (if `needs_ev`) and a roof (if `needs_cover`). The qualifying slot
/// with the lowest slot number wins; on an ordering tie the earlier slot in
/// `slots` wins. The input is not modified; the caller applies the
/// occupancy change.
pub fn allocate(slots: &[Slot], needs_ev: bool, needs_cover: bool) -> Allocation {
    let mut available = slots.iter().filter(|s| !s.is_occupied).peekable();

    if available.peek().is_none() {
        return Allocation {
            slot: None,
            message: "Parking lot is completely full.".to_string(),
        };
    }

    let best = available
        .filter(|s| (!needs_ev || s.is_ev_charging) && (!needs_cover || s.is_covered))
        .min_by(|a, b| compare_slot_numbers(&a.slot_no, &b.slot_no));

    match best {
        Some(slot) => Allocation {
            message: format!("Slot {} allocated successfully!", slot.slot_no),
            slot: Some(slot.clone()),
        },
        None => {
            let mut reasons = Vec::new();
            if needs_ev {
                reasons.push("EV charging");
            }
            if needs_cover {
                reasons.push("covered spot");
            }
            Allocation {
                slot: None,
                message: format!("No available slot with {} found.", reasons.join(" & ")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Vec<Slot> {
        vec![
            Slot::new("1", "A1", false, true),
            Slot::new("2", "A2", true, false),
        ]
    }

    #[test]
    fn test_ev_request_picks_ev_slot() {
        let result = allocate(&pair(), true, false);
        assert_eq!(result.slot.unwrap().slot_no, "A1");
        assert_eq!(result.message, "Slot A1 allocated successfully!");
    }

    #[test]
    fn test_cover_request_picks_covered_slot() {
        let result = allocate(&pair(), false, true);
        assert_eq!(result.slot.unwrap().slot_no, "A2");
    }

    #[test]
    fn test_no_match_names_both_features() {
        let result = allocate(&pair(), true, true);
        assert!(result.slot.is_none());
        assert_eq!(
            result.message,
            "No available slot with EV charging & covered spot found."
        );
    }

    #[test]
    fn test_no_match_single_feature() {
        let slots = vec![Slot::new("1", "A1", false, false)];
        let result = allocate(&slots, false, true);
        assert_eq!(result.message, "No available slot with covered spot found.");
    }

    #[test]
    fn test_full_lot() {
        let slots = vec![
            Slot::new("1", "A1", true, true).occupied(true),
            Slot::new("2", "A2", true, true).occupied(true),
        ];
        let result = allocate(&slots, false, false);
        assert!(result.slot.is_none());
        assert_eq!(result.message, "Parking lot is completely full.");
    }

    #[test]
    fn test_empty_lot_is_full() {
        let result = allocate(&[], true, true);
        assert_eq!(result.message, "Parking lot is completely full.");
    }

    #[test]
    fn test_lowest_number_wins_regardless_of_input_order() {
        let slots = vec![
            Slot::new("1", "10", false, false),
            Slot::new("2", "B1", false, false),
            Slot::new("3", "2", false, false),
        ];
        let result = allocate(&slots, false, false);
        assert_eq!(result.slot.unwrap().slot_no, "2");
    }

    #[test]
    fn test_negative_numbers_win_by_value() {
        let slots = vec![
            Slot::new("1", "-1", false, false),
            Slot::new("2", "0", false, false),
            Slot::new("3", "-5", false, false),
        ];
        let result = allocate(&slots, false, false);
        assert_eq!(result.slot.unwrap().slot_no, "-5");
    }

    #[test]
    fn test_skips_occupied() {
        let slots = vec![
            Slot::new("1", "A1", true, true).occupied(true),
            Slot::new("2", "A2", true, true),
        ];
        let result = allocate(&slots, true, true);
        assert_eq!(result.slot.unwrap().id.as_str(), "2");
    }
}
