//! Shelf layout engine.
//!
//! Pure functions turning an ordered series list into a shelf grid and a
//! flat list of spine placements. Re-run on every collection change.

pub mod config;
pub mod engine;

pub use config::{LayoutConfig, LayoutError, RowPolicy};
pub use engine::{compute_layout, DroppedVolume, Placement, Shelf, ShelfLayout};
