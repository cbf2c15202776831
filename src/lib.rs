//! # SmartPark
//!
//! A small parking-lot manager: add slots, park and free vehicles with a
//! best-match allocator, edit slot features, and keep everything in a
//! client-local cache that is rewritten after every change.
//!
//! ## Core Concepts
//!
//! - **Slots**: parking spaces with a unique number, feature flags and occupancy
//! - **Allocation**: pure queries picking, sorting and counting slots
//! - **Store**: the owner of the collection, with write-through persistence
//! - **Events**: change notifications for whatever renders the lot
//!
//! ## Example
//!
//! ```ignore
//! use smartpark::{FileCache, ParkingStore, SlotChanges};
//!
//! let mut store = ParkingStore::with_cache(FileCache::open(".smartpark")?);
//!
//! let outcome = store.add_slot("c1", true, true);
//! assert!(outcome.ok);
//!
//! let allocation = store.park_vehicle(true, false);
//! if let Some(slot) = allocation.slot {
//!     store.update_slot(&slot.id, SlotChanges::default().covered(false));
//!     store.remove_vehicle(&slot.id);
//! }
//! ```

pub mod allocation;
pub mod cache;
pub mod error;
pub mod events;
pub mod store;
pub mod types;

// Re-exports
pub use allocation::{
    allocate, compare_slot_numbers, filter_slots, is_slot_number_taken, parking_stats,
    sort_by_field, sort_slots, sorted_slots, SlotFilter, SortDirection, SortField,
};
pub use cache::{FileCache, KeyValueCache, MemoryCache};
pub use error::{CacheError, Result, ValidationError, MAX_SLOT_NO_LEN};
pub use events::{
    DropReason, EventFilter, ParkingEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
    SubscriptionManager,
};
pub use store::{demo_slots, ParkingStore, StoreConfig, DEFAULT_CACHE_KEY};
pub use types::*;
