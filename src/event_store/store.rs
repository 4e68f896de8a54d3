//! Event store trait and the in-memory implementation
//!
//! Events are sharded by property. Each shard is its own `RwLock`, so writes
//! to one property never wait on another property's readers or writers.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::types::{EventPatch, HistoryEvent};

/// Durable append/query interface the service is built on
pub trait EventStore: Send + Sync {
    /// Append a new event. Fails with `DuplicateId` if the id is taken.
    fn append(&self, event: HistoryEvent) -> StoreResult<()>;

    fn get_by_id(&self, id: &str) -> StoreResult<Option<HistoryEvent>>;

    /// Events for one property in append order
    fn get_by_property(&self, property_id: &str) -> StoreResult<Vec<HistoryEvent>>;

    /// Every event in the store, grouped by property, each group in append order
    fn all_events(&self) -> StoreResult<Vec<HistoryEvent>>;

    /// Hard delete; returns the removed event
    fn delete_by_id(&self, id: &str) -> StoreResult<Option<HistoryEvent>>;

    /// Apply `patch` in place; returns the updated event
    fn update(&self, id: &str, patch: &EventPatch) -> StoreResult<Option<HistoryEvent>>;
}

type Shard = Arc<RwLock<Vec<HistoryEvent>>>;

/// In-memory event store
#[derive(Default)]
pub struct InMemoryEventStore {
    /// property id → that property's events
    shards: RwLock<BTreeMap<String, Shard>>,
    /// event id → property id
    ids: RwLock<HashMap<String, String>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn shard(&self, property_id: &str) -> Option<Shard> {
        self.shards.read().get(property_id).cloned()
    }

    fn shard_or_create(&self, property_id: &str) -> Shard {
        if let Some(shard) = self.shard(property_id) {
            return shard;
        }
        self.shards
            .write()
            .entry(property_id.to_string())
            .or_default()
            .clone()
    }

    fn property_of(&self, id: &str) -> Option<String> {
        self.ids.read().get(id).cloned()
    }

    /// Overwrite a stored event with the same id (used by journal replay)
    pub(crate) fn replace(&self, event: HistoryEvent) -> bool {
        let Some(shard) = self.shard(&event.property_id) else {
            return false;
        };
        let mut events = shard.write();
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => {
                *slot = event;
                true
            }
            None => false,
        }
    }

    /// Total number of stored events
    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&self, event: HistoryEvent) -> StoreResult<()> {
        // The id index stays locked until the event is in its shard, so an id
        // is never visible without its event.
        let mut ids = self.ids.write();
        if ids.contains_key(&event.id) {
            return Err(StoreError::DuplicateId(event.id));
        }
        let shard = self.shard_or_create(&event.property_id);
        ids.insert(event.id.clone(), event.property_id.clone());
        shard.write().push(event);
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<HistoryEvent>> {
        let Some(property_id) = self.property_of(id) else {
            return Ok(None);
        };
        Ok(self
            .shard(&property_id)
            .and_then(|shard| shard.read().iter().find(|e| e.id == id).cloned()))
    }

    fn get_by_property(&self, property_id: &str) -> StoreResult<Vec<HistoryEvent>> {
        Ok(self
            .shard(property_id)
            .map(|shard| shard.read().clone())
            .unwrap_or_default())
    }

    fn all_events(&self) -> StoreResult<Vec<HistoryEvent>> {
        let shards: Vec<Shard> = self.shards.read().values().cloned().collect();
        let mut events = Vec::new();
        for shard in shards {
            events.extend(shard.read().iter().cloned());
        }
        Ok(events)
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<Option<HistoryEvent>> {
        let Some(property_id) = self.property_of(id) else {
            return Ok(None);
        };
        let Some(shard) = self.shard(&property_id) else {
            return Ok(None);
        };

        let removed = {
            let mut events = shard.write();
            events
                .iter()
                .position(|e| e.id == id)
                .map(|pos| events.remove(pos))
        };

        if removed.is_some() {
            self.ids.write().remove(id);
        }
        Ok(removed)
    }

    fn update(&self, id: &str, patch: &EventPatch) -> StoreResult<Option<HistoryEvent>> {
        let Some(property_id) = self.property_of(id) else {
            return Ok(None);
        };
        let Some(shard) = self.shard(&property_id) else {
            return Ok(None);
        };

        let mut events = shard.write();
        let Some(slot) = events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        let updated = slot.apply_patch(patch).map_err(StoreError::InvalidPatch)?;
        *slot = updated.clone();
        Ok(Some(updated))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{EventMetadata, EventSource, EventType, SourceKind};
    use chrono::{TimeZone, Utc};
    use std::thread;

    pub(crate) fn make_event(id: &str, property_id: &str, event_type: EventType) -> HistoryEvent {
        HistoryEvent {
            id: id.to_string(),
            property_id: property_id.to_string(),
            event_type,
            title: format!("{} event", event_type),
            description: "Recorded in test".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            data: Default::default(),
            source: EventSource::new(SourceKind::System, "sys", "System"),
            metadata: EventMetadata::default(),
            is_public: true,
            tags: Vec::new(),
        }
    }

    /// Store whose every call fails, as a lost disk would
    pub(crate) struct FailingStore;

    fn disk_gone() -> StoreError {
        StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
    }

    impl EventStore for FailingStore {
        fn append(&self, _event: HistoryEvent) -> StoreResult<()> {
            Err(disk_gone())
        }
        fn get_by_id(&self, _id: &str) -> StoreResult<Option<HistoryEvent>> {
            Err(disk_gone())
        }
        fn get_by_property(&self, _property_id: &str) -> StoreResult<Vec<HistoryEvent>> {
            Err(disk_gone())
        }
        fn all_events(&self) -> StoreResult<Vec<HistoryEvent>> {
            Err(disk_gone())
        }
        fn delete_by_id(&self, _id: &str) -> StoreResult<Option<HistoryEvent>> {
            Err(disk_gone())
        }
        fn update(&self, _id: &str, _patch: &EventPatch) -> StoreResult<Option<HistoryEvent>> {
            Err(disk_gone())
        }
    }

    #[test]
    fn test_append_and_fetch() {
        let store = InMemoryEventStore::new();
        store.append(make_event("e1", "p1", EventType::Listed)).unwrap();
        store.append(make_event("e2", "p1", EventType::PriceChange)).unwrap();
        store.append(make_event("e3", "p2", EventType::Listed)).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get_by_id("e2").unwrap().unwrap().event_type, EventType::PriceChange);

        let p1: Vec<String> = store.get_by_property("p1").unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(p1, vec!["e1", "e2"]);
        assert!(store.get_by_property("missing").unwrap().is_empty());
        assert_eq!(store.all_events().unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = InMemoryEventStore::new();
        store.append(make_event("e1", "p1", EventType::Listed)).unwrap();
        let err = store.append(make_event("e1", "p2", EventType::Sold)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == "e1"));
        assert!(store.get_by_property("p2").unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_from_index_and_shard() {
        let store = InMemoryEventStore::new();
        store.append(make_event("e1", "p1", EventType::Listed)).unwrap();

        let removed = store.delete_by_id("e1").unwrap();
        assert_eq!(removed.map(|e| e.id), Some("e1".to_string()));
        assert!(store.get_by_id("e1").unwrap().is_none());
        assert!(store.get_by_property("p1").unwrap().is_empty());
        assert!(store.delete_by_id("e1").unwrap().is_none());
    }

    #[test]
    fn test_update_applies_patch() {
        let store = InMemoryEventStore::new();
        store.append(make_event("e1", "p1", EventType::Listed)).unwrap();

        let patch = EventPatch {
            title: Some("Listed again".to_string()),
            ..Default::default()
        };
        let updated = store.update("e1", &patch).unwrap().unwrap();
        assert_eq!(updated.title, "Listed again");
        assert_eq!(store.get_by_id("e1").unwrap().unwrap().title, "Listed again");
        assert!(store.update("nope", &patch).unwrap().is_none());
    }

    #[test]
    fn test_update_rejects_bad_data_without_mutating() {
        let store = InMemoryEventStore::new();
        store.append(make_event("e1", "p1", EventType::Listed)).unwrap();

        let patch = EventPatch {
            title: Some("Changed".to_string()),
            data: Some(serde_json::json!({"price": {"newPrice": 1}})),
            ..Default::default()
        };
        let err = store.update("e1", &patch).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPatch(_)));
        assert_eq!(store.get_by_id("e1").unwrap().unwrap().title, "listed event");
    }

    #[test]
    fn test_concurrent_appends_do_not_lose_events() {
        let store = Arc::new(InMemoryEventStore::new());
        let mut handles = Vec::new();

        for t in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    let id = format!("e-{}-{}", t, i);
                    store.append(make_event(&id, "shared", EventType::ViewingScheduled)).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_by_property("shared").unwrap().len(), 400);
        assert_eq!(store.len(), 400);
    }
}
