//! Diagram points in plot coordinates.
//!
//! Renderers draw diagrams on a fixed square axis. Points are mapped to
//! (x, y) in either birth/death or birth/lifetime coordinates and clipped
//! into the axis range. Essential classes have no finite death; they are
//! pinned to the top edge.

use crate::topology::HomologyDiagram;
use serde::{Deserialize, Serialize};

/// Inclusive axis range shared by both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub min: f64,
    pub max: f64,
}

impl DisplayRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn clip(&self, v: f64) -> (f64, bool) {
        let clipped = v.max(self.min).min(self.max);
        (clipped, clipped != v)
    }
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotMode {
    /// (birth, death)
    BirthDeath,
    /// (birth, death - birth)
    #[default]
    Lifetime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayPoint {
    pub dimension: usize,
    pub x: f64,
    pub y: f64,
    /// Death is +∞; y sits on the top edge
    pub essential: bool,
    /// A finite coordinate fell outside the range
    pub clipped: bool,
}

/// Plot coordinates of every pair in `diagram`.
pub fn normalize(diagram: &HomologyDiagram, range: DisplayRange, mode: PlotMode) -> Vec<DisplayPoint> {
    diagram
        .pairs
        .iter()
        .map(|pair| {
            let (x, x_clipped) = range.clip(pair.birth);
            let (y, y_clipped, essential) = if pair.is_essential() {
                (range.max, false, true)
            } else {
                let raw = match mode {
                    PlotMode::BirthDeath => pair.death,
                    PlotMode::Lifetime => pair.persistence(),
                };
                let (y, clipped) = range.clip(raw);
                (y, clipped, false)
            };

            DisplayPoint {
                dimension: diagram.dimension,
                x,
                y,
                essential,
                clipped: x_clipped || y_clipped,
            }
        })
        .collect()
}

/// [`normalize`] over a filtered selection, preserving its order
pub fn plot_points(
    shown: &[(usize, &HomologyDiagram)],
    range: DisplayRange,
    mode: PlotMode,
) -> Vec<DisplayPoint> {
    shown
        .iter()
        .flat_map(|(_, diagram)| normalize(diagram, range, mode))
        .collect()
}
