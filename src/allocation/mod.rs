//! Pure queries over a snapshot of the slot list.
//!
//! Nothing here mutates its input. The store calls these to pick a slot
//! for a vehicle, to keep its collection in display order and to validate
//! new slot numbers; front ends call them directly for stats and views.

mod allocate;
mod ordering;
mod stats;

pub use allocate::allocate;
pub use ordering::{
    compare_slot_numbers, sort_by_field, sort_slots, sorted_slots, SortDirection, SortField,
};
pub use stats::{filter_slots, is_slot_number_taken, parking_stats, SlotFilter};
