//! Overlay state (pure).
//!
//! Everything here is plain owned data driven by explicit `Instant`s; no
//! timers, threads or globals.

pub mod groups;
pub mod log_store;
pub mod queue;
pub mod schedule;

// Re-export for convenience
pub use groups::GroupStateMachine;
pub use log_store::LogStore;
pub use queue::{DrainReport, IngestionQueue, Task, DEFAULT_CHUNK_SIZE};
pub use schedule::{Debounce, Throttle};
