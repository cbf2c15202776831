//! Change notifications for front ends.
//!
//! A front end subscribes once and re-renders whenever the store publishes:
//! - the new sorted slot snapshot after every slot mutation
//! - the new last-result after every last-result change
//!
//! Delivery uses bounded queues. A subscriber that falls behind by a full
//! buffer is dropped rather than stalling the store.
//!
//! # Example
//!
//! ```ignore
//! let handle = store.subscribe(SubscriptionConfig::default());
//!
//! loop {
//!     match handle.recv() {
//!         Ok(ParkingEvent::Snapshot { slots, .. }) => render(&slots),
//!         Ok(ParkingEvent::SlotsChanged { slots }) => render(&slots),
//!         Ok(ParkingEvent::ResultChanged { result }) => toast(result),
//!         Ok(ParkingEvent::Dropped { .. }) | Err(_) => break,
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, EventFilter, ParkingEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
};
