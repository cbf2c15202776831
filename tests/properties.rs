//! Property tests for the allocation and query functions.

use proptest::prelude::*;
use smartpark::{
    allocate, compare_slot_numbers, is_slot_number_taken, sorted_slots, MemoryCache,
    ParkingStore, Slot, StoreConfig,
};
use std::cmp::Ordering;

fn slot_strategy() -> impl Strategy<Value = (String, bool, bool, bool)> {
    ("[A-C0-9-]{1,4}", any::<bool>(), any::<bool>(), any::<bool>())
}

fn slots_strategy() -> impl Strategy<Value = Vec<Slot>> {
    prop::collection::vec(slot_strategy(), 0..24).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (no, covered, ev, occupied))| {
                Slot::new(i.to_string(), no, covered, ev).occupied(occupied)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn sorted_output_is_ordered_and_idempotent(slots in slots_strategy()) {
        let once = sorted_slots(&slots);
        for pair in once.windows(2) {
            prop_assert_ne!(
                compare_slot_numbers(&pair[0].slot_no, &pair[1].slot_no),
                Ordering::Greater
            );
        }
        prop_assert_eq!(sorted_slots(&once), once.clone());
        prop_assert_eq!(once.len(), slots.len());
    }

    #[test]
    fn slot_number_taken_is_case_insensitive_membership(
        slots in slots_strategy(),
        candidate in "[a-cA-C0-9]{1,4}",
    ) {
        let expected = slots
            .iter()
            .any(|s| s.slot_no.to_lowercase() == candidate.to_lowercase());
        prop_assert_eq!(is_slot_number_taken(&slots, &candidate), expected);
    }

    #[test]
    fn allocation_respects_requirements(
        slots in slots_strategy(),
        needs_ev in any::<bool>(),
        needs_cover in any::<bool>(),
    ) {
        let qualifies =
            |s: &Slot| !s.is_occupied && (!needs_ev || s.is_ev_charging) && (!needs_cover || s.is_covered);

        let result = allocate(&slots, needs_ev, needs_cover);
        match result.slot {
            Some(slot) => {
                prop_assert!(qualifies(&slot));
                // Nothing qualifying sorts strictly before the winner.
                for other in slots.iter().filter(|s| qualifies(*s)) {
                    prop_assert_ne!(
                        compare_slot_numbers(&other.slot_no, &slot.slot_no),
                        Ordering::Less
                    );
                }
            }
            None => {
                prop_assert!(!slots.iter().any(qualifies));
            }
        }
    }

    #[test]
    fn allocation_does_not_mutate_input(slots in slots_strategy()) {
        let before = slots.clone();
        let _ = allocate(&slots, false, false);
        prop_assert_eq!(slots, before);
    }

    #[test]
    fn snapshot_json_roundtrip(slots in slots_strategy()) {
        let bytes = serde_json::to_vec(&slots).unwrap();
        let back: Vec<Slot> = serde_json::from_slice(&bytes).unwrap();
        prop_assert_eq!(back, slots);
    }

    #[test]
    fn store_keeps_numbers_unique_and_sorted(numbers in prop::collection::vec("[a-cA-C0-9 ]{0,7}", 0..16)) {
        let mut store = ParkingStore::open(
            MemoryCache::new(),
            StoreConfig { seed: Vec::new(), ..Default::default() },
        );
        for no in &numbers {
            store.add_slot(no, false, false);
        }

        let slots = store.slots();
        for (i, a) in slots.iter().enumerate() {
            prop_assert!(!a.slot_no.is_empty() && a.slot_no.chars().count() <= 6);
            prop_assert_eq!(a.slot_no.clone(), a.slot_no.to_uppercase());
            for b in &slots[i + 1..] {
                prop_assert_ne!(a.slot_no.to_lowercase(), b.slot_no.to_lowercase());
                prop_assert_ne!(&a.id, &b.id);
            }
        }
        prop_assert_eq!(sorted_slots(slots), slots.to_vec());
    }
}
