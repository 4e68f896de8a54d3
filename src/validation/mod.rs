//! Input validation for history events
//!
//! Create and update requests are checked before they reach the store. All
//! violations are collected, not just the first.

mod rules;

pub use rules::{validate_create, validate_patch, MAX_CONFIDENCE};
