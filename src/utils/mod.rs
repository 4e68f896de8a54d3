//! Utility functions and helpers
//!
//! Clock injection, date arithmetic and atomic file replacement.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write_with, cleanup_temp_files};
pub use time::{ceil_days_between, Clock, ManualClock, SystemClock};
