//! Radius → threshold → diagrams.

use super::backend::{PersistenceBackend, StandardReduction};
use crate::cloud::PointCloud;
use crate::error::ComputationError;
use crate::topology::{DiagramSet, HomologyDiagram};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Components, loops and voids
pub const DEFAULT_MAX_DIMENSION: usize = 2;

/// Rips distance threshold for balls of radius `radius`.
///
/// Two balls of radius r first touch when their centers are 2r apart, so
/// the complex at 2r is the one the ball picture shows.
pub fn distance_threshold(radius: f64) -> f64 {
    2.0 * radius
}

/// Wraps a [`PersistenceBackend`] with the viewer's calling convention.
#[derive(Clone)]
pub struct PersistenceEngine {
    backend: Arc<dyn PersistenceBackend>,
    max_dimension: usize,
}

impl PersistenceEngine {
    pub fn new(backend: Arc<dyn PersistenceBackend>) -> Self {
        Self {
            backend,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    /// Engine over [`StandardReduction`]
    pub fn standard() -> Self {
        Self::new(Arc::new(StandardReduction))
    }

    pub fn with_max_dimension(mut self, max_dimension: usize) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Diagrams for dimensions `0..=max_dimension()` at ball radius `radius`
    pub fn compute(&self, cloud: &PointCloud, radius: f64) -> Result<DiagramSet, ComputationError> {
        self.compute_with(cloud, radius, self.max_dimension)
    }

    /// Diagrams for dimensions `0..=max_dimension` at ball radius `radius`.
    ///
    /// Always returns exactly `max_dimension + 1` diagrams in dimension
    /// order; dimensions without features are empty.
    pub fn compute_with(
        &self,
        cloud: &PointCloud,
        radius: f64,
        max_dimension: usize,
    ) -> Result<DiagramSet, ComputationError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ComputationError::InvalidRadius(radius));
        }

        let threshold = distance_threshold(radius);
        debug!(
            backend = self.backend.name(),
            points = cloud.len(),
            radius,
            threshold,
            max_dimension,
            "computing persistence"
        );

        let mut raw = self.backend.compute(cloud.points(), max_dimension, threshold)?;

        let diagrams: Vec<HomologyDiagram> = (0..=max_dimension)
            .map(|d| HomologyDiagram::new(d, raw.remove(&d).unwrap_or_default()))
            .collect();

        if !raw.is_empty() {
            debug!(
                dropped = ?raw.keys().collect::<Vec<_>>(),
                "backend returned dimensions above the ceiling"
            );
        }

        Ok(DiagramSet {
            threshold,
            diagrams,
        })
    }
}

impl Default for PersistenceEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for PersistenceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceEngine")
            .field("backend", &self.backend.name())
            .field("max_dimension", &self.max_dimension)
            .finish()
    }
}
