//! CareerCompass core library.
//!
//! This crate holds everything the front-ends share:
//!
//! - `auth`: the session manager, identities, and transition effects
//! - `storage`: the durable key-value slot the session persists into
//! - `routes`: the fixed route table and navbar link sets
//! - `models`: mock course catalog, recently viewed courses, and applications
//! - `utils`: string and date formatting helpers

pub mod auth;
pub mod error;
pub mod models;
pub mod routes;
pub mod storage;
pub mod utils;

pub use auth::{
    Effects, Identity, Navigator, Notification, Notifier, SessionHandle, SessionManager,
    SessionState, UserKind, Variant,
};
pub use error::{SessionError, StorageError};
pub use routes::{nav_links, NavLink, Route};
pub use storage::{FileSlotStore, MemorySlotStore, SlotStore, USER_SLOT};
