//! Point Cloud Sources
//!
//! A session's point cloud comes from one of three places:
//! - the built-in catalog (`demo2d`, `demo3d`, sampled shapes)
//! - a headerless numeric table uploaded by the user
//! - a coordinate matrix handed over by an embedding program
//!
//! Whatever the source, the result is an immutable [`PointCloud`] of 2D or
//! 3D points. Loading never touches global state.

mod point_cloud;
mod catalog;
mod table;

pub use point_cloud::{PointCloud, SUPPORTED_DIMENSIONS};
pub use catalog::{Dataset, load};
pub use table::parse;

use crate::error::CloudError;
use ndarray::Array2;

/// Where a session's point cloud comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Catalog(Dataset),
    Table(String),
    Array(Array2<f64>),
}

impl Source {
    /// Build the cloud this source describes.
    pub fn load(&self) -> Result<PointCloud, CloudError> {
        match self {
            Self::Catalog(dataset) => Ok(dataset.load()),
            Self::Table(raw) => parse(raw),
            Self::Array(points) => PointCloud::from_array(points.clone()),
        }
    }

    /// Short label for notices and logs
    pub fn label(&self) -> String {
        match self {
            Self::Catalog(dataset) => dataset.name().to_string(),
            Self::Table(_) => "uploaded table".to_string(),
            Self::Array(points) => format!("{}x{} matrix", points.nrows(), points.ncols()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_source_dispatch() {
        let catalog = Source::Catalog(Dataset::Demo3d).load().unwrap();
        assert_eq!(catalog.dimension(), 3);

        let table = Source::Table("0,0\n1,1\n".to_string()).load().unwrap();
        assert_eq!(table.len(), 2);

        let err = Source::Array(array![[0.0, 1.0, 2.0, 3.0]]).load().unwrap_err();
        assert_eq!(err, CloudError::UnsupportedDimension(4));
    }
}
