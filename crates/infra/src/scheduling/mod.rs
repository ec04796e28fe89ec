//! Scheduling infrastructure for background cache maintenance
//!
//! The janitor follows the runtime rules used across this crate:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on shutdown

pub mod error;
pub mod janitor;

pub use error::{SchedulerError, SchedulerResult};
pub use janitor::{Janitor, SweepReport};
