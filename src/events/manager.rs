//! Subscription manager for broadcasting store changes.

use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::types::{
    DropReason, EventFilter, ParkingEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
};
use crate::types::{LastResult, Slot};

struct Subscription {
    filter: EventFilter,
    sender: Sender<ParkingEvent>,
}

impl Subscription {
    /// Returns false if the buffer is full or the receiver is gone.
    fn try_send(&self, event: ParkingEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Manages subscriptions and broadcasts events.
pub struct SubscriptionManager {
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    next_id: AtomicU64,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a subscription whose first event is `initial`.
    pub fn subscribe(
        &self,
        config: SubscriptionConfig,
        initial: ParkingEvent,
    ) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        let subscription = Subscription {
            filter: config.filter,
            sender,
        };

        // A one-slot buffer still has room for the snapshot.
        subscription.try_send(initial);
        self.subscriptions.write().insert(id, subscription);
        debug!(id = id.0, "subscription added");

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(sub) = self.subscriptions.write().remove(&id) {
            let _ = sub.sender.try_send(ParkingEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    // --- Broadcasting ---

    /// Publish a new slot snapshot.
    pub fn broadcast_slots(&self, slots: &[Slot]) {
        let event = ParkingEvent::SlotsChanged {
            slots: slots.to_vec(),
        };
        self.broadcast(|sub| sub.filter.slots, event);
    }

    /// Publish a new last-result value.
    pub fn broadcast_result(&self, result: Option<&LastResult>) {
        let event = ParkingEvent::ResultChanged {
            result: result.cloned(),
        };
        self.broadcast(|sub| sub.filter.results, event);
    }

    /// Drops subscribers that fail to receive.
    fn broadcast<F>(&self, filter: F, event: ParkingEvent)
    where
        F: Fn(&Subscription) -> bool,
    {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if filter(sub) && !sub.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for id in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    debug!(id = id.0, "dropping slow subscriber");
                    let _ = sub.sender.try_send(ParkingEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
