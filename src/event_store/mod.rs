//! Event Store Module
//!
//! The append-only collection of property history events:
//! - `EventStore`: the storage trait the service is built against
//! - `InMemoryEventStore`: per-property sharded store behind `RwLock`s
//! - `JournalEventStore`: in-memory store persisted to a JSON-lines journal
//!
//! # Architecture
//!
//! ```text
//! Write Path (journal):
//! ┌──────────┐    ┌───────────────┐    ┌─────────────────┐
//! │ Service  │───►│ append entry  │───►│ apply to shard  │
//! │ request  │    │ events.jsonl  │    │ (per property)  │
//! └──────────┘    └───────────────┘    └─────────────────┘
//!
//! Read Path (Startup):
//! ┌───────────────┐    ┌─────────────────┐
//! │ Open journal  │───►│ Replay entries  │───► Ready!
//! └───────────────┘    └─────────────────┘
//! ```

mod journal;
pub(crate) mod store;

pub use journal::{JournalConfig, JournalEventStore};
pub use store::{EventStore, InMemoryEventStore};
