//! View-state layer - windowing and reconciliation
//!
//! Decides which entries reach the render surface and applies that decision
//! with as few structural changes as possible.
//!
//! # Module Structure
//!
//! - `types`: Value types (Viewport, Tolerance)
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `visible_range`: VisibleRange - half-open range of rendered entries
//! - `windower`: velocity-adaptive tolerance and window computation
//! - `reconcile`: RenderSurface trait and LIS-based list reconciliation

pub mod height_index;
pub mod reconcile;
pub mod types;
pub mod visible_range;
pub mod windower;

pub use height_index::HeightIndex;
pub use reconcile::{reconcile, ListSurface, ReconcileStats, RenderSurface};
pub use types::{Tolerance, Viewport};
pub use visible_range::VisibleRange;
pub use windower::{compute_window, ScrollTracker, TolerancePolicy, Window};
