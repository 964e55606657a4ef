//! Diagram View
//!
//! Purely presentational: choose which homology dimensions to show and map
//! their pairs into plot coordinates. Nothing here recomputes or mutates a
//! diagram.

mod filter;
mod display;

pub use filter::{DimensionSelection, filter};
pub use display::{DisplayPoint, DisplayRange, PlotMode, normalize, plot_points};
