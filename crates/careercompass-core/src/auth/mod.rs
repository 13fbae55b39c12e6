//! Session management for the signed-in user.
//!
//! This module provides:
//! - `SessionManager`: the single owner of the signed-in identity
//! - `SessionHandle`: cloneable access for consumers such as spawned tasks
//! - `Identity` / `UserKind`: who is signed in and on which side of the platform
//! - `Effects`: notifications and navigation produced by transitions
//!
//! Credentials are not verified. Any non-empty input signs in.

pub mod effects;
pub mod identity;
pub mod session;

pub use effects::{Effects, Navigator, Notification, Notifier, Variant};
pub use identity::{Identity, UserKind};
pub use session::{SessionHandle, SessionManager, SessionState, DEFAULT_LATENCY};
