//! Built-in demo datasets.
//!
//! Every entry is a pure function of its name: two loads of the same
//! dataset produce bit-identical clouds. Sampled shapes draw from a fixed
//! ChaCha8 seed so they obey the same rule.

use super::PointCloud;
use crate::error::CloudError;
use ndarray::{arr2, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

const SAMPLE_SEED: u64 = 0x5EED_7DA0;
const CIRCLE_POINTS: usize = 24;
const SPHERE_POINTS: usize = 40;
const SHAPE_CENTER: f64 = 0.5;
const SHAPE_RADIUS: f64 = 0.35;
const SHAPE_NOISE: f64 = 0.02;

/// Named built-in point sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Six scattered points in the unit square
    Demo2d,
    /// Six scattered points in the unit cube
    Demo3d,
    /// Noisy circle, one persistent loop
    Circle,
    /// Noisy sphere, one persistent void
    Sphere,
}

impl Dataset {
    pub const ALL: [Dataset; 4] = [Self::Demo2d, Self::Demo3d, Self::Circle, Self::Sphere];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Demo2d => "demo2d",
            Self::Demo3d => "demo3d",
            Self::Circle => "circle",
            Self::Sphere => "sphere",
        }
    }

    /// Ambient dimension of the dataset
    pub fn dimension(&self) -> usize {
        match self {
            Self::Demo2d | Self::Circle => 2,
            Self::Demo3d | Self::Sphere => 3,
        }
    }

    /// Materialize the dataset
    pub fn load(&self) -> PointCloud {
        let points = match self {
            Self::Demo2d => arr2(&[
                [0.1, 0.2],
                [0.3, 0.8],
                [0.6, 0.1],
                [0.9, 0.5],
                [0.4, 0.4],
                [0.2, 0.9],
            ]),
            Self::Demo3d => arr2(&[
                [0.1, 0.2, 0.3],
                [0.4, 0.6, 0.2],
                [0.5, 0.8, 0.7],
                [0.9, 0.3, 0.5],
                [0.2, 0.7, 0.9],
                [0.8, 0.5, 0.4],
            ]),
            Self::Circle => noisy_circle(CIRCLE_POINTS),
            Self::Sphere => noisy_sphere(SPHERE_POINTS),
        };
        PointCloud::from_validated(points)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = CloudError;

    /// Accepts bare names and the `.csv` file names used by the demo menu.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = name.strip_suffix(".csv").unwrap_or(name.as_str());
        Self::ALL
            .into_iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| CloudError::UnknownDataset(s.to_string()))
    }
}

/// Load a catalog entry by name
pub fn load(name: &str) -> Result<PointCloud, CloudError> {
    Ok(name.parse::<Dataset>()?.load())
}

/// Evenly spaced angles with radial Gaussian jitter
fn noisy_circle(n: usize) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(SAMPLE_SEED);
    let mut points = Array2::<f64>::zeros((n, 2));

    for i in 0..n {
        let theta = 2.0 * PI * (i as f64) / (n as f64);
        let jitter: f64 = rng.sample(StandardNormal);
        let r = SHAPE_RADIUS + SHAPE_NOISE * jitter;
        points[[i, 0]] = SHAPE_CENTER + r * theta.cos();
        points[[i, 1]] = SHAPE_CENTER + r * theta.sin();
    }

    points
}

/// Fibonacci lattice on the sphere with radial Gaussian jitter
fn noisy_sphere(n: usize) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(SAMPLE_SEED ^ 0x3D);
    let mut points = Array2::<f64>::zeros((n, 3));
    let golden = PI * (3.0 - 5.0_f64.sqrt());

    for i in 0..n {
        let z = 1.0 - 2.0 * (i as f64 + 0.5) / (n as f64);
        let ring = (1.0 - z * z).sqrt();
        let phi = golden * i as f64;
        let jitter: f64 = rng.sample(StandardNormal);
        let r = SHAPE_RADIUS + SHAPE_NOISE * jitter;
        points[[i, 0]] = SHAPE_CENTER + r * ring * phi.cos();
        points[[i, 1]] = SHAPE_CENTER + r * ring * phi.sin();
        points[[i, 2]] = SHAPE_CENTER + r * z;
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for dataset in Dataset::ALL {
            assert_eq!(dataset.name().parse::<Dataset>().unwrap(), dataset);
        }
        assert_eq!("demo2d.csv".parse::<Dataset>().unwrap(), Dataset::Demo2d);
        assert_eq!(" Demo3D.CSV ".parse::<Dataset>().unwrap(), Dataset::Demo3d);
        assert!(matches!(
            "torus".parse::<Dataset>(),
            Err(CloudError::UnknownDataset(_))
        ));
    }

    #[test]
    fn test_loads_are_bit_identical() {
        for dataset in Dataset::ALL {
            let a = dataset.load();
            let b = dataset.load();
            assert_eq!(a, b);
            assert_eq!(a.fingerprint(), b.fingerprint());
        }
    }

    #[test]
    fn test_shapes() {
        let demo2d = load("demo2d.csv").unwrap();
        assert_eq!((demo2d.len(), demo2d.dimension()), (6, 2));
        assert_eq!(demo2d.point(3).to_vec(), vec![0.9, 0.5]);

        let demo3d = load("demo3d").unwrap();
        assert_eq!((demo3d.len(), demo3d.dimension()), (6, 3));

        let circle = Dataset::Circle.load();
        assert_eq!((circle.len(), circle.dimension()), (CIRCLE_POINTS, 2));

        let sphere = Dataset::Sphere.load();
        assert_eq!((sphere.len(), sphere.dimension()), (SPHERE_POINTS, 3));
    }

    #[test]
    fn test_sampled_shapes_stay_near_radius() {
        for dataset in [Dataset::Circle, Dataset::Sphere] {
            let cloud = dataset.load();
            assert_eq!(cloud.dimension(), dataset.dimension());
            for row in cloud.points().rows() {
                let r = row.iter().map(|v| (v - SHAPE_CENTER).powi(2)).sum::<f64>().sqrt();
                assert!((r - SHAPE_RADIUS).abs() < 10.0 * SHAPE_NOISE, "r = {}", r);
            }
        }
    }
}
