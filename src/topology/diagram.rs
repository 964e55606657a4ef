//! Persistence Diagrams
//!
//! A persistence pair [b, d) records a homology class that appears at
//! filtration value b and merges away at d. Classes still alive at the
//! truncation threshold have d = +∞ (essential).
//!
//! ## Summaries
//!
//! - Total persistence: Σ (dᵢ - bᵢ) over finite pairs
//! - Persistent entropy: H_P = -Σᵢ pᵢ log(pᵢ), pᵢ = lᵢ / L

use serde::Serialize;

/// One (birth, death) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersistencePair {
    pub birth: f64,
    /// `f64::INFINITY` for essential classes (serialized as `null`)
    pub death: f64,
}

impl PersistencePair {
    pub fn new(birth: f64, death: f64) -> Self {
        Self { birth, death }
    }

    pub fn essential(birth: f64) -> Self {
        Self::new(birth, f64::INFINITY)
    }

    /// Lifetime of the class
    pub fn persistence(&self) -> f64 {
        if self.death.is_infinite() {
            f64::INFINITY
        } else {
            self.death - self.birth
        }
    }

    /// Never dies within the threshold?
    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }

    /// Alive at filtration value `epsilon`: birth ≤ ε < death
    pub fn is_alive_at(&self, epsilon: f64) -> bool {
        self.birth <= epsilon && epsilon < self.death
    }
}

/// All pairs of one homology dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomologyDiagram {
    pub dimension: usize,
    pub pairs: Vec<PersistencePair>,
}

impl HomologyDiagram {
    pub fn new(dimension: usize, pairs: Vec<PersistencePair>) -> Self {
        Self { dimension, pairs }
    }

    pub fn empty(dimension: usize) -> Self {
        Self::new(dimension, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn finite(&self) -> impl Iterator<Item = &PersistencePair> {
        self.pairs.iter().filter(|p| !p.is_essential())
    }

    pub fn essential(&self) -> impl Iterator<Item = &PersistencePair> {
        self.pairs.iter().filter(|p| p.is_essential())
    }

    /// Sum of finite lifetimes
    pub fn total_persistence(&self) -> f64 {
        // An empty f64 sum is -0.0
        self.finite().map(|p| p.persistence()).fold(0.0, |acc, l| acc + l)
    }

    /// Longest finite lifetime (0 if none)
    pub fn max_persistence(&self) -> f64 {
        self.finite().map(|p| p.persistence()).fold(0.0, f64::max)
    }

    /// Shannon entropy of the normalized finite lifetimes
    pub fn persistence_entropy(&self) -> f64 {
        let lifetimes: Vec<f64> = self
            .finite()
            .map(|p| p.persistence())
            .filter(|&l| l > 0.0)
            .collect();

        let total = lifetimes.iter().fold(0.0, |acc, l| acc + l);
        if total <= 0.0 {
            return 0.0;
        }

        lifetimes
            .iter()
            .map(|l| l / total)
            .map(|p| -p * p.ln())
            .fold(0.0, |acc, h| acc + h)
    }

    /// Number of classes alive at `epsilon`
    pub fn betti_at(&self, epsilon: f64) -> usize {
        self.pairs.iter().filter(|p| p.is_alive_at(epsilon)).count()
    }
}

/// One diagram per dimension `0..=max_dimension`, computed at a single
/// distance threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramSet {
    pub threshold: f64,
    pub diagrams: Vec<HomologyDiagram>,
}

impl DiagramSet {
    /// Empty diagrams for every dimension up to `max_dimension`
    pub fn empty(max_dimension: usize, threshold: f64) -> Self {
        Self {
            threshold,
            diagrams: (0..=max_dimension).map(HomologyDiagram::empty).collect(),
        }
    }

    pub fn max_dimension(&self) -> usize {
        self.diagrams.len().saturating_sub(1)
    }

    pub fn get(&self, dimension: usize) -> Option<&HomologyDiagram> {
        self.diagrams.get(dimension)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HomologyDiagram> {
        self.diagrams.iter()
    }

    /// True when no dimension has any pair
    pub fn is_empty(&self) -> bool {
        self.diagrams.iter().all(|d| d.is_empty())
    }
}
