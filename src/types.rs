//! Core types for the parking store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Opaque identifier for a slot. Assigned once, never reused.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub String);

impl SlotId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        SlotId(s.to_string())
    }
}

impl From<String> for SlotId {
    fn from(s: String) -> Self {
        SlotId(s)
    }
}

/// Milliseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Current time. A clock set before the epoch reads as zero.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Timestamp(millis)
    }
}

/// Issues slot ids from the wall clock.
///
/// Every id is strictly greater than any numeric id the generator has issued
/// or observed, so ids stay unique even when the clock stalls or steps back.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id that already exists so it is never issued again.
    pub fn observe(&mut self, id: &SlotId) {
        if let Ok(n) = id.0.parse::<u64>() {
            self.last = self.last.max(n);
        }
    }

    /// Produce a fresh id.
    pub fn next_id(&mut self) -> SlotId {
        let candidate = Timestamp::now().0.max(self.last.saturating_add(1));
        self.last = candidate;
        SlotId(candidate.to_string())
    }
}

/// A parking space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,

    /// Display number, uppercase and unique ignoring case.
    #[serde(rename = "slotNo")]
    pub slot_no: String,

    #[serde(rename = "isCovered")]
    pub is_covered: bool,

    #[serde(rename = "isEVCharging")]
    pub is_ev_charging: bool,

    #[serde(rename = "isOccupied")]
    pub is_occupied: bool,
}

impl Slot {
    /// A new, unoccupied slot.
    pub fn new(
        id: impl Into<SlotId>,
        slot_no: impl Into<String>,
        is_covered: bool,
        is_ev_charging: bool,
    ) -> Self {
        Self {
            id: id.into(),
            slot_no: slot_no.into(),
            is_covered,
            is_ev_charging,
            is_occupied: false,
        }
    }

    /// Builder-style occupancy, mostly for fixtures.
    pub fn occupied(mut self, is_occupied: bool) -> Self {
        self.is_occupied = is_occupied;
        self
    }
}

/// Partial update of a slot's feature flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChanges {
    #[serde(rename = "isCovered", default, skip_serializing_if = "Option::is_none")]
    pub is_covered: Option<bool>,

    #[serde(rename = "isEVCharging", default, skip_serializing_if = "Option::is_none")]
    pub is_ev_charging: Option<bool>,
}

impl SlotChanges {
    pub fn covered(mut self, value: bool) -> Self {
        self.is_covered = Some(value);
        self
    }

    pub fn ev_charging(mut self, value: bool) -> Self {
        self.is_ev_charging = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.is_covered.is_none() && self.is_ev_charging.is_none()
    }

    /// Merge the provided fields into `slot`.
    pub fn apply_to(&self, slot: &mut Slot) {
        if let Some(covered) = self.is_covered {
            slot.is_covered = covered;
        }
        if let Some(ev) = self.is_ev_charging {
            slot.is_ev_charging = ev;
        }
    }
}

/// Outcome category of the last park/free/update action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Success,
    Error,
    Info,
}

/// The most recent action outcome, shown until cleared or replaced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastResult {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub message: String,
    pub slot: Option<Slot>,
}

impl LastResult {
    pub fn success(message: impl Into<String>, slot: Slot) -> Self {
        Self {
            kind: ResultKind::Success,
            message: message.into(),
            slot: Some(slot),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Error,
            message: message.into(),
            slot: None,
        }
    }

    pub fn info(message: impl Into<String>, slot: Slot) -> Self {
        Self {
            kind: ResultKind::Info,
            message: message.into(),
            slot: Some(slot),
        }
    }
}

/// Result of `add_slot`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOutcome {
    pub ok: bool,
    pub message: String,
}

/// Result of an allocation attempt. `slot` is `None` on failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub slot: Option<Slot>,
    pub message: String,
}

/// Aggregate occupancy figures for a lot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingStats {
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
    pub ev_slots: usize,
    pub covered_slots: usize,
    /// Whole percent, 0..=100.
    pub occupancy_rate: u32,
}
