//! Persistence Engine
//!
//! Given a point cloud and the current ball radius r, the engine:
//! 1. derives the Rips distance threshold ε = 2r
//! 2. asks a [`PersistenceBackend`] for dimensions 0..=max_dim
//! 3. returns exactly max_dim + 1 diagrams, one per dimension
//!
//! The backend is a seam: [`StandardReduction`] is the built-in boundary
//! matrix reduction, anything else implementing the trait can replace it.
//! Results are deterministic, so [`DiagramCache`] can memoize them.

mod backend;
mod persistence_engine;
mod cache;

pub use backend::{PersistenceBackend, RawDiagrams, StandardReduction};
pub use persistence_engine::{PersistenceEngine, distance_threshold, DEFAULT_MAX_DIMENSION};
pub use cache::{CacheKey, DiagramCache, DEFAULT_CACHE_CAPACITY};
