//! Durable key-value slots.
//!
//! The session manager persists the signed-in identity into a single slot
//! (`USER_SLOT`). Two stores are provided:
//!
//! - `FileSlotStore`: one JSON file per key under a data directory
//! - `MemorySlotStore`: process-local, used by tests and ephemeral runs

pub mod slot;

pub use slot::{FileSlotStore, MemorySlotStore, SlotStore, USER_SLOT};
