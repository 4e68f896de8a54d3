//! Cached per-property history views
//!
//! Histories are computed outside the map lock. Each property slot carries a
//! generation counter and an in-flight writer count, so a view computed
//! while a write to the same property was running is returned but never
//! cached.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StoreResult;
use crate::types::PropertyHistory;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    writers: usize,
    history: Option<Arc<PropertyHistory>>,
}

#[derive(Debug, Default)]
pub(crate) struct HistoryCache {
    slots: RwLock<HashMap<String, Slot>>,
}

/// Marks a write to one property as in flight; dropping it drops the
/// cached view for that property
pub(crate) struct WriteGuard<'a> {
    cache: &'a HistoryCache,
    property_id: String,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        let mut slots = self.cache.slots.write();
        if let Some(slot) = slots.get_mut(&self.property_id) {
            slot.writers = slot.writers.saturating_sub(1);
            slot.generation += 1;
            slot.history = None;
        }
    }
}

impl HistoryCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Call before touching the store for `property_id`; hold the guard
    /// until the store call returns
    pub(crate) fn begin_write(&self, property_id: &str) -> WriteGuard<'_> {
        let mut slots = self.slots.write();
        let slot = slots.entry(property_id.to_string()).or_default();
        slot.writers += 1;
        slot.history = None;
        WriteGuard {
            cache: self,
            property_id: property_id.to_string(),
        }
    }

    /// Cached view for `property_id`, or `compute` it from the store
    pub(crate) fn get_or_compute<F>(
        &self,
        property_id: &str,
        compute: F,
    ) -> StoreResult<Option<Arc<PropertyHistory>>>
    where
        F: FnOnce() -> StoreResult<Option<PropertyHistory>>,
    {
        // None: a writer is active, so whatever we compute stays uncached
        let seen = {
            let slots = self.slots.read();
            match slots.get(property_id) {
                Some(slot) if slot.writers == 0 => {
                    if let Some(history) = &slot.history {
                        return Ok(Some(Arc::clone(history)));
                    }
                    Some(slot.generation)
                }
                Some(_) => None,
                None => Some(0),
            }
        };

        let history = compute()?.map(Arc::new);

        if let (Some(generation), Some(history)) = (seen, &history) {
            let mut slots = self.slots.write();
            let slot = slots.entry(property_id.to_string()).or_default();
            if slot.writers == 0 && slot.generation == generation && slot.history.is_none() {
                slot.history = Some(Arc::clone(history));
            }
        }
        Ok(history)
    }
}
