// Module declarations for the library crate.

pub mod cli;
pub mod config;
pub mod display;
pub mod event;
pub mod monitor;
pub mod telemetry;
pub mod timefmt;
pub mod util;
pub mod worker;

// Re-export the formatter entry points for convenience.
pub use timefmt::{format_elapsed, format_millis, format_seconds, ElapsedParts, TimerStyle};
