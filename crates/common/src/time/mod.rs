//! Time utilities and abstractions
//!
//! - **[`clock`]**: real and mock clocks; every cache timestamp goes through
//!   a [`Clock`]
//! - **[`interval`]**: recurring intervals with jitter, used by background
//!   sweeps

pub mod clock;
pub mod interval;

// Re-export commonly used items
pub use clock::{Clock, MockClock, SystemClock};
pub use interval::{Interval, IntervalConfig};
