//! Per-route screen rendering.

pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod landing;
