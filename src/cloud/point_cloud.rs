//! Immutable point cloud with a content fingerprint.

use crate::error::CloudError;
use ndarray::{Array2, ArrayView1, ArrayView2};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Ambient dimensions a cloud may live in
pub const SUPPORTED_DIMENSIONS: [usize; 2] = [2, 3];

/// Finite, non-empty set of 2D or 3D points (one point per row).
///
/// A cloud is never mutated after construction; loading a new source
/// replaces the whole value.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    points: Array2<f64>,
    fingerprint: u64,
}

impl PointCloud {
    /// Wrap a coordinate matrix, rejecting empty clouds and dimensions other
    /// than 2 or 3.
    pub fn from_array(points: Array2<f64>) -> Result<Self, CloudError> {
        if points.nrows() == 0 {
            return Err(CloudError::Empty);
        }
        let dim = points.ncols();
        if !SUPPORTED_DIMENSIONS.contains(&dim) {
            return Err(CloudError::UnsupportedDimension(dim));
        }
        Ok(Self::from_validated(points))
    }

    /// Build from row vectors. Rows must all share one length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, CloudError> {
        let first = rows.first().ok_or(CloudError::Empty)?;
        let dim = first.len();

        let mut flat = Vec::with_capacity(rows.len() * dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(CloudError::malformed(
                    i + 1,
                    format!("expected {} columns, found {}", dim, row.len()),
                ));
            }
            flat.extend_from_slice(row);
        }

        let points = Array2::from_shape_vec((rows.len(), dim), flat)
            .map_err(|e| CloudError::malformed(1, e.to_string()))?;
        Self::from_array(points)
    }

    /// Caller guarantees the shape invariants (non-empty, 2 or 3 columns).
    pub(crate) fn from_validated(points: Array2<f64>) -> Self {
        let fingerprint = fingerprint_of(&points);
        Self { points, fingerprint }
    }

    /// Ambient dimension (2 or 3)
    pub fn dimension(&self) -> usize {
        self.points.ncols()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    /// Always false for a constructed cloud
    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Coordinate matrix, one point per row
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Coordinates of point `index`
    pub fn point(&self, index: usize) -> ArrayView1<'_, f64> {
        self.points.row(index)
    }

    /// Content hash over shape and coordinate bits.
    ///
    /// Two clouds with bit-identical coordinates share a fingerprint, which
    /// makes it usable as the cache identity of the cloud.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Axis-aligned bounds as (min, max) per coordinate
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.points
            .columns()
            .into_iter()
            .map(|col| {
                col.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
            })
            .collect()
    }
}

fn fingerprint_of(points: &Array2<f64>) -> u64 {
    let mut hasher = DefaultHasher::new();
    points.nrows().hash(&mut hasher);
    points.ncols().hash(&mut hasher);
    for v in points.iter() {
        v.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rejects_unsupported_dimension() {
        let line = array![[0.0], [1.0]];
        assert_eq!(
            PointCloud::from_array(line),
            Err(CloudError::UnsupportedDimension(1))
        );

        let four_d = Array2::<f64>::zeros((3, 4));
        assert_eq!(
            PointCloud::from_array(four_d),
            Err(CloudError::UnsupportedDimension(4))
        );
    }

    #[test]
    fn test_rejects_empty() {
        let empty = Array2::<f64>::zeros((0, 2));
        assert_eq!(PointCloud::from_array(empty), Err(CloudError::Empty));
        assert_eq!(PointCloud::from_rows(&[]), Err(CloudError::Empty));
    }

    #[test]
    fn test_ragged_rows() {
        let rows = vec![vec![0.0, 1.0], vec![0.0, 1.0, 2.0]];
        let err = PointCloud::from_rows(&rows).unwrap_err();
        assert!(matches!(err, CloudError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = PointCloud::from_array(array![[0.0, 0.0], [1.0, 0.0]]).unwrap();
        let b = PointCloud::from_array(array![[0.0, 0.0], [1.0, 0.0]]).unwrap();
        let c = PointCloud::from_array(array![[0.0, 0.0], [1.0, 1e-12]]).unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_bounds() {
        let cloud = PointCloud::from_array(array![[0.1, 0.9], [0.5, 0.2], [0.3, 0.4]]).unwrap();
        let bounds = cloud.bounds();
        assert_eq!(bounds, vec![(0.1, 0.5), (0.2, 0.9)]);
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.dimension(), 2);
        assert!(!cloud.is_empty());
    }
}
