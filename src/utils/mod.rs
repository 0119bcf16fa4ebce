//! Formatting and clock helpers shared by the engine.
//!
//! Provides:
//! - [`format_size`], [`format_date_short`], [`format_elapsed`] - display formatting
//! - [`unix_now`] - wall clock in Unix seconds on native and wasm targets

mod format;
mod time;

pub use format::{format_date_short, format_elapsed, format_size, thousands};
pub use time::unix_now;
