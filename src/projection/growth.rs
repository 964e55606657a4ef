//! Ball growth: one disc or sphere per point.

use crate::cloud::PointCloud;
use serde::Serialize;

/// Shape of a primitive, fixed by the cloud's ambient dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Disc,
    Sphere,
}

/// A ball of the current radius around one point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometricPrimitive {
    /// Row of the point in its cloud, stable across frames
    pub index: usize,
    pub kind: PrimitiveKind,
    pub center: Vec<f64>,
    pub radius: f64,
}

impl GeometricPrimitive {
    /// Axis-aligned bounding box as (min corner, max corner)
    pub fn bounding_box(&self) -> (Vec<f64>, Vec<f64>) {
        let lo = self.center.iter().map(|c| c - self.radius).collect();
        let hi = self.center.iter().map(|c| c + self.radius).collect();
        (lo, hi)
    }

    /// Whether this ball meets `other` (closed balls)
    pub fn touches(&self, other: &GeometricPrimitive) -> bool {
        let dist_sq: f64 = self
            .center
            .iter()
            .zip(&other.center)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        dist_sq.sqrt() <= self.radius + other.radius
    }
}

/// Balls of `radius` around every point, in cloud order.
pub fn project(cloud: &PointCloud, radius: f64) -> Vec<GeometricPrimitive> {
    let kind = match cloud.dimension() {
        2 => PrimitiveKind::Disc,
        _ => PrimitiveKind::Sphere,
    };

    cloud
        .points()
        .rows()
        .into_iter()
        .enumerate()
        .map(|(index, row)| GeometricPrimitive {
            index,
            kind,
            center: row.to_vec(),
            radius,
        })
        .collect()
}
