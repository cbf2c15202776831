//! The parking store: canonical slot list, last-result value and
//! write-through persistence.

use crate::allocation::{self, SlotFilter};
use crate::cache::KeyValueCache;
use crate::error::{Result, ValidationError, MAX_SLOT_NO_LEN};
use crate::events::{
    ParkingEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{
    AddOutcome, Allocation, IdGenerator, LastResult, ParkingStats, Slot, SlotChanges, SlotId,
};
use tracing::{debug, info, warn};

/// Cache key holding the slot snapshot.
pub const DEFAULT_CACHE_KEY: &str = "smartpark_slots_v1";

/// The demo lot used when nothing usable is cached.
pub fn demo_slots() -> Vec<Slot> {
    vec![
        Slot::new("1", "A1", true, true),
        Slot::new("2", "A2", true, false).occupied(true),
        Slot::new("3", "A3", false, true),
        Slot::new("4", "B1", true, false),
        Slot::new("5", "B2", false, false).occupied(true),
        Slot::new("6", "B3", false, true),
    ]
}

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Key of the snapshot entry in the cache.
    pub cache_key: String,

    /// Collection used when the cache has no readable snapshot.
    pub seed: Vec<Slot>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            seed: demo_slots(),
        }
    }
}

/// Owns the slot collection.
///
/// Every successful mutation re-sorts the collection, writes the full
/// snapshot to the cache and notifies subscribers before returning. No
/// operation fails: bad input comes back as an `ok: false` outcome or an
/// error-kind last-result, unknown ids are ignored, and cache failures are
/// logged while the store carries on in memory.
pub struct ParkingStore {
    config: StoreConfig,

    cache: Box<dyn KeyValueCache>,

    /// Always sorted by slot number.
    slots: Vec<Slot>,

    last_result: Option<LastResult>,

    ids: IdGenerator,

    subscriptions: SubscriptionManager,
}

impl ParkingStore {
    /// Load the collection from `cache`, falling back to the configured seed.
    ///
    /// The loaded collection is written back once so the cache always holds
    /// a readable snapshot after startup.
    pub fn open(cache: impl KeyValueCache + 'static, config: StoreConfig) -> Self {
        let mut slots = Self::load(&cache, &config);
        allocation::sort_slots(&mut slots);

        let mut ids = IdGenerator::new();
        for slot in &slots {
            ids.observe(&slot.id);
        }

        let store = Self {
            config,
            cache: Box::new(cache),
            slots,
            last_result: None,
            ids,
            subscriptions: SubscriptionManager::new(),
        };
        store.persist();
        store
    }

    /// Open with the default key and demo seed.
    pub fn with_cache(cache: impl KeyValueCache + 'static) -> Self {
        Self::open(cache, StoreConfig::default())
    }

    fn load(cache: &dyn KeyValueCache, config: &StoreConfig) -> Vec<Slot> {
        let key = config.cache_key.as_str();
        match Self::read_snapshot(cache, key) {
            Ok(Some(slots)) => {
                debug!(key, count = slots.len(), "loaded slot snapshot");
                slots
            }
            Ok(None) => {
                debug!(key, "no slot snapshot cached, using seed");
                config.seed.clone()
            }
            Err(e) => {
                warn!(key, error = %e, "slot snapshot unavailable, using seed");
                config.seed.clone()
            }
        }
    }

    fn read_snapshot(cache: &dyn KeyValueCache, key: &str) -> Result<Option<Vec<Slot>>> {
        match cache.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    // --- Reads ---

    /// Current slots, sorted by slot number.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn last_result(&self) -> Option<&LastResult> {
        self.last_result.as_ref()
    }

    pub fn get(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| &s.id == id)
    }

    /// Look up a slot by number, ignoring case.
    pub fn find_by_slot_no(&self, slot_no: &str) -> Option<&Slot> {
        let wanted = slot_no.trim().to_lowercase();
        self.slots
            .iter()
            .find(|s| s.slot_no.to_lowercase() == wanted)
    }

    pub fn stats(&self) -> ParkingStats {
        allocation::parking_stats(&self.slots)
    }

    /// Sorted slots matching `filter`.
    pub fn filtered(&self, filter: SlotFilter) -> Vec<Slot> {
        allocation::filter_slots(&self.slots, filter)
    }

    /// Subscribe to changes. The first event is a snapshot of the current state.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let initial = ParkingEvent::Snapshot {
            slots: self.slots.clone(),
            last_result: self.last_result.clone(),
        };
        self.subscriptions.subscribe(config, initial)
    }

    /// End a subscription. Its handle receives a final `Dropped` event.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    // --- Mutations ---

    /// Add an unoccupied slot. The number is trimmed and uppercased.
    pub fn add_slot(&mut self, slot_no: &str, is_covered: bool, is_ev_charging: bool) -> AddOutcome {
        let slot_no = match self.validate_slot_no(slot_no) {
            Ok(n) => n,
            Err(e) => {
                debug!(error = %e, "slot rejected");
                return AddOutcome {
                    ok: false,
                    message: e.to_string(),
                };
            }
        };

        let id = self.ids.next_id();
        info!(%id, slot_no = %slot_no, is_covered, is_ev_charging, "slot added");
        self.slots
            .push(Slot::new(id, slot_no.clone(), is_covered, is_ev_charging));
        allocation::sort_slots(&mut self.slots);
        self.commit_slots();

        AddOutcome {
            ok: true,
            message: format!("Slot {slot_no} added successfully!"),
        }
    }

    fn validate_slot_no(&self, raw: &str) -> std::result::Result<String, ValidationError> {
        let slot_no = raw.trim().to_uppercase();
        if slot_no.is_empty() {
            return Err(ValidationError::EmptySlotNo);
        }
        if slot_no.chars().count() > MAX_SLOT_NO_LEN {
            return Err(ValidationError::SlotNoTooLong(slot_no));
        }
        if allocation::is_slot_number_taken(&self.slots, &slot_no) {
            return Err(ValidationError::DuplicateSlotNo(slot_no));
        }
        Ok(slot_no)
    }

    /// Park a vehicle in the best matching free slot.
    ///
    /// On success the winner is marked occupied and the last-result is a
    /// success carrying the slot as it was allocated; otherwise the
    /// last-result is an error with the allocation message.
    pub fn park_vehicle(&mut self, needs_ev: bool, needs_cover: bool) -> Allocation {
        let result = allocation::allocate(&self.slots, needs_ev, needs_cover);

        match &result.slot {
            Some(allocated) => {
                if let Some(slot) = self.slots.iter_mut().find(|s| s.id == allocated.id) {
                    slot.is_occupied = true;
                }
                info!(id = %allocated.id, slot_no = %allocated.slot_no, "vehicle parked");
                self.commit_slots();
                self.set_result(Some(LastResult::success(
                    result.message.clone(),
                    allocated.clone(),
                )));
            }
            None => {
                info!(needs_ev, needs_cover, message = %result.message, "allocation failed");
                self.set_result(Some(LastResult::error(result.message.clone())));
            }
        }

        result
    }

    /// Free a slot. Unknown ids are ignored.
    pub fn remove_vehicle(&mut self, slot_id: &SlotId) {
        let Some(slot) = self.slots.iter_mut().find(|s| &s.id == slot_id) else {
            debug!(id = %slot_id, "remove_vehicle: no such slot");
            return;
        };

        let before = slot.clone();
        slot.is_occupied = false;
        info!(id = %slot_id, slot_no = %before.slot_no, "vehicle removed");

        self.commit_slots();
        self.set_result(Some(LastResult::info(
            format!("Slot {} is now free.", before.slot_no),
            before,
        )));
    }

    /// Delete a slot permanently. Clears the last-result either way.
    pub fn delete_slot(&mut self, slot_id: &SlotId) {
        let before = self.slots.len();
        self.slots.retain(|s| &s.id != slot_id);

        if self.slots.len() != before {
            info!(id = %slot_id, "slot deleted");
            self.commit_slots();
        } else {
            debug!(id = %slot_id, "delete_slot: no such slot");
        }
        self.set_result(None);
    }

    /// Merge feature-flag changes into a slot. Unknown ids are ignored.
    pub fn update_slot(&mut self, slot_id: &SlotId, changes: SlotChanges) {
        let Some(slot) = self.slots.iter_mut().find(|s| &s.id == slot_id) else {
            debug!(id = %slot_id, "update_slot: no such slot");
            return;
        };

        changes.apply_to(slot);
        let merged = slot.clone();
        info!(id = %slot_id, ?changes, "slot updated");

        self.commit_slots();
        self.set_result(Some(LastResult::info(
            format!("Slot {} updated.", merged.slot_no),
            merged,
        )));
    }

    pub fn clear_result(&mut self) {
        self.set_result(None);
    }

    // --- Internals ---

    /// Persist and publish the current collection.
    fn commit_slots(&self) {
        self.persist();
        self.subscriptions.broadcast_slots(&self.slots);
    }

    fn set_result(&mut self, result: Option<LastResult>) {
        self.last_result = result;
        self.subscriptions
            .broadcast_result(self.last_result.as_ref());
    }

    /// Overwrite the cached snapshot. Failures are logged and ignored.
    fn persist(&self) {
        let key = self.config.cache_key.as_str();
        let bytes = match serde_json::to_vec(&self.slots) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize slot snapshot");
                return;
            }
        };

        match self.cache.set(key, &bytes) {
            Ok(()) => debug!(key, count = self.slots.len(), "slot snapshot written"),
            Err(e) => warn!(key, error = %e, "failed to write slot snapshot"),
        }
    }
}
