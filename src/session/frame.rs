//! Output of one pipeline run.

use crate::projection::GeometricPrimitive;
use crate::topology::{BettiNumbers, HomologyDiagram};
use crate::view::DisplayPoint;
use serde::Serialize;
use std::fmt;

/// Non-fatal condition shown alongside a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The selected source could not be turned into a cloud
    Rejected { source: String, reason: String },
    /// Cloud is not 2D or 3D; nothing is drawn or computed
    UnsupportedDimension { dimension: usize },
    /// The persistence backend failed; diagrams are shown empty
    ComputationFailed { reason: String },
    /// No cloud loaded yet
    NoCloud,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { source, reason } => write!(f, "Rejected {}: {}", source, reason),
            Self::UnsupportedDimension { dimension } => write!(
                f,
                "Only 2D or 3D point clouds are supported (got {}D)",
                dimension
            ),
            Self::ComputationFailed { reason } => {
                write!(f, "Persistence computation failed: {}", reason)
            }
            Self::NoCloud => f.write_str("No point cloud loaded"),
        }
    }
}

/// Per-dimension numbers printed next to a diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagramSummary {
    pub dimension: usize,
    pub pairs: usize,
    pub essential: usize,
    pub total_persistence: f64,
    pub entropy: f64,
}

impl DiagramSummary {
    pub fn of(diagram: &HomologyDiagram) -> Self {
        Self {
            dimension: diagram.dimension,
            pairs: diagram.len(),
            essential: diagram.essential().count(),
            total_persistence: diagram.total_persistence(),
            entropy: diagram.persistence_entropy(),
        }
    }
}

/// Everything a renderer needs for one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Render counter within the session
    pub seq: u64,
    pub radius: f64,
    /// Rips distance threshold (2 × radius)
    pub threshold: f64,
    /// Ambient dimension of the cloud, if one is loaded
    pub dimension: Option<usize>,
    pub points: usize,
    pub primitives: Vec<GeometricPrimitive>,
    /// Selected diagrams only, in dimension order
    pub diagrams: Vec<HomologyDiagram>,
    pub summaries: Vec<DiagramSummary>,
    /// Selected diagrams in plot coordinates
    pub plot: Vec<DisplayPoint>,
    /// Betti numbers at the threshold; `None` when nothing was computed
    pub betti: Option<BettiNumbers>,
    pub notices: Vec<Notice>,
}

impl Frame {
    /// Frame for a session with nothing to draw
    pub fn blank(seq: u64, radius: f64, threshold: f64, notices: Vec<Notice>) -> Self {
        Self {
            seq,
            radius,
            threshold,
            dimension: None,
            points: 0,
            primitives: Vec::new(),
            diagrams: Vec::new(),
            summaries: Vec::new(),
            plot: Vec::new(),
            betti: None,
            notices,
        }
    }

    pub fn diagram(&self, dimension: usize) -> Option<&HomologyDiagram> {
        self.diagrams.iter().find(|d| d.dimension == dimension)
    }

    pub fn has_notices(&self) -> bool {
        !self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::PersistencePair;

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            Notice::UnsupportedDimension { dimension: 4 }.to_string(),
            "Only 2D or 3D point clouds are supported (got 4D)"
        );
        assert_eq!(Notice::NoCloud.to_string(), "No point cloud loaded");
    }

    #[test]
    fn test_notice_serializes_tagged() {
        let json = serde_json::to_string(&Notice::ComputationFailed {
            reason: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"computation_failed","reason":"boom"}"#);
    }

    #[test]
    fn test_summary() {
        let dgm = HomologyDiagram::new(
            0,
            vec![PersistencePair::new(0.0, 0.5), PersistencePair::essential(0.0)],
        );
        let summary = DiagramSummary::of(&dgm);
        assert_eq!(summary.pairs, 2);
        assert_eq!(summary.essential, 1);
        assert_eq!(summary.total_persistence, 0.5);
        assert_eq!(summary.entropy, 0.0);
    }

    #[test]
    fn test_blank_frame_serializes_infinite_death_as_null() {
        let mut frame = Frame::blank(0, 0.05, 0.1, vec![Notice::NoCloud]);
        frame.diagrams.push(HomologyDiagram::new(0, vec![PersistencePair::essential(0.0)]));
        let json = serde_json::to_value(&frame).unwrap();
        assert!(json["diagrams"][0]["pairs"][0]["death"].is_null());
        assert!(frame.has_notices());
        assert!(frame.diagram(0).is_some());
    }
}
