//! devconsole
//!
//! An in-page developer console overlay engine with a terminal front end.
//! Producer calls (`log`, `group`, `time`, `table`, ...) are queued, drained
//! in chunks, grouped, and rendered through a velocity-aware virtual window
//! that a list reconciler keeps in sync with the screen.
//!
//! The engine (`state`, `view_state`, `overlay`) is pure and tick-driven;
//! `source`, `view` and the binary are the impure shell around it.

pub mod config;
pub mod logging;
pub mod model;
pub mod overlay;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;
