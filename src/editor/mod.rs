//! Interaction model of the weekly availability editor.
//!
//! The editor only supports half-hour precision. Slots created elsewhere
//! with finer boundaries are coarsened the first time they are loaded here
//! and saved back.

pub mod grid;
pub mod history;
pub mod presets;
mod state;

pub use grid::{grid_to_slots, slots_to_grid, AvailabilityGrid, CELLS_PER_DAY, CELL_MINUTES};
pub use history::History;
pub use presets::Preset;
pub use state::{AvailabilityEditor, CellLocator, PaintMode, UniformCellLocator};
