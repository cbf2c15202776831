//! Subscription and event types.

use crate::types::{LastResult, Slot};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before the subscriber is dropped.
    /// Default: 256
    pub buffer_size: usize,

    /// Which events to deliver.
    pub filter: EventFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            filter: EventFilter::all(),
        }
    }
}

/// Which event kinds a subscriber wants.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventFilter {
    pub slots: bool,
    pub results: bool,
}

impl EventFilter {
    pub fn all() -> Self {
        Self {
            slots: true,
            results: true,
        }
    }

    pub fn slots() -> Self {
        Self {
            slots: true,
            ..Default::default()
        }
    }

    pub fn results() -> Self {
        Self {
            results: true,
            ..Default::default()
        }
    }
}

/// Events delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParkingEvent {
    /// Current state, sent once when the subscription starts.
    Snapshot {
        slots: Vec<Slot>,
        last_result: Option<LastResult>,
    },

    /// The slot collection was replaced. Always sorted.
    SlotsChanged { slots: Vec<Slot> },

    /// The last-result value was set or cleared.
    ResultChanged { result: Option<LastResult> },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<ParkingEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<ParkingEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<ParkingEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<ParkingEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything queued right now, without blocking.
    pub fn drain(&self) -> Vec<ParkingEvent> {
        self.receiver.try_iter().collect()
    }
}
