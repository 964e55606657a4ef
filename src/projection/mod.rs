//! Growth Projection
//!
//! Maps the point cloud and the current radius to renderable balls: discs
//! for 2D clouds, spheres for 3D clouds. Pure and stateless; each primitive
//! carries its point's index so renderers can label points stably while
//! the radius changes.

mod growth;

pub use growth::{GeometricPrimitive, PrimitiveKind, project};
