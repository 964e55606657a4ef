//! The persistence computation boundary.

use crate::error::ComputationError;
use crate::topology::{persistence_pairs, PersistencePair, VietorisRips};
use ndarray::ArrayView2;
use std::collections::BTreeMap;

/// Backend output: dimension → (birth, death) pairs. Dimensions without
/// pairs may be missing.
pub type RawDiagrams = BTreeMap<usize, Vec<PersistencePair>>;

/// Anything that can turn points and a distance threshold into persistence
/// diagrams.
///
/// Implementations must be deterministic: identical arguments give
/// bit-identical output.
pub trait PersistenceBackend: Send + Sync {
    /// Compute diagrams for dimensions `0..=max_dimension` of the Rips
    /// filtration truncated at `distance_threshold`.
    fn compute(
        &self,
        points: ArrayView2<'_, f64>,
        max_dimension: usize,
        distance_threshold: f64,
    ) -> Result<RawDiagrams, ComputationError>;

    /// Backend name for logs
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Vietoris-Rips filtration reduced over Z/2Z by coboundary reduction
/// with clearing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardReduction;

impl PersistenceBackend for StandardReduction {
    fn compute(
        &self,
        points: ArrayView2<'_, f64>,
        max_dimension: usize,
        distance_threshold: f64,
    ) -> Result<RawDiagrams, ComputationError> {
        if points.nrows() == 0 {
            return Err(ComputationError::EmptyCloud);
        }
        if !distance_threshold.is_finite() || distance_threshold <= 0.0 {
            return Err(ComputationError::InvalidThreshold(distance_threshold));
        }
        if let Some(index) = points
            .rows()
            .into_iter()
            .position(|row| row.iter().any(|v| !v.is_finite()))
        {
            return Err(ComputationError::NonFiniteCoordinate { index });
        }

        let vr = VietorisRips::from_points(points, distance_threshold);
        persistence_pairs(&vr, max_dimension)
    }

    fn name(&self) -> &'static str {
        "standard-reduction"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_rejects_degenerate_input() {
        let backend = StandardReduction;

        let empty = Array2::<f64>::zeros((0, 2));
        assert_eq!(
            backend.compute(empty.view(), 2, 1.0),
            Err(ComputationError::EmptyCloud)
        );

        let points = array![[0.0, 0.0], [1.0, 0.0]];
        assert_eq!(
            backend.compute(points.view(), 2, 0.0),
            Err(ComputationError::InvalidThreshold(0.0))
        );
        assert!(matches!(
            backend.compute(points.view(), 2, f64::NAN),
            Err(ComputationError::InvalidThreshold(_))
        ));

        let bad = array![[0.0, 0.0], [f64::NAN, 1.0]];
        assert_eq!(
            backend.compute(bad.view(), 2, 1.0),
            Err(ComputationError::NonFiniteCoordinate { index: 1 })
        );
    }

    #[test]
    fn test_single_point() {
        let points = array![[0.5, 0.5]];
        let raw = StandardReduction.compute(points.view(), 2, 0.1).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[&0], vec![PersistencePair::essential(0.0)]);
    }
}
