//! Topology Module: Persistent Homology and Simplicial Complexes
//!
//! Implements the mathematical structures behind the viewer:
//! - Truncated Vietoris-Rips filtration
//! - Exact persistent homology via coboundary reduction with clearing
//! - Persistence diagrams and Betti numbers
//!
//! ## Mathematical Background
//!
//! For a point cloud X we construct the filtration of simplicial complexes
//! VR_ε(X), truncated at a distance threshold ε = 2r where r is the radius
//! of the balls drawn around each point. Persistent homology tracks the
//! birth and death of topological features (connected components, loops,
//! voids) across this filtration.
//!
//! Reduction is over Z/2Z and returns, for each dimension d ≤ max_dim, the
//! (birth, death) pairs of the d-th persistence module. Classes still alive
//! at ε are reported with death = +∞.

mod vietoris_rips;
mod reduction;
mod diagram;
mod betti;

pub use vietoris_rips::{VietorisRips, Simplex, distance_matrix};
pub use reduction::persistence_pairs;
pub use diagram::{PersistencePair, HomologyDiagram, DiagramSet};
pub use betti::BettiNumbers;
