//! Betti Numbers: Topological Invariants
//!
//! The k-th Betti number βₖ counts the number of k-dimensional
//! "holes" in a topological space:
//!
//! - β₀: Number of connected components
//! - β₁: Number of 1-dimensional loops/cycles
//! - β₂: Number of 2-dimensional voids/cavities
//!
//! Read off a diagram set as the number of classes alive at ε.

use super::DiagramSet;
use serde::Serialize;

/// Betti numbers at a specific filtration value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BettiNumbers {
    pub beta_0: usize, // Connected components
    pub beta_1: usize, // Loops
    pub beta_2: usize, // Voids
    pub epsilon: f64,  // Filtration scale
}

impl BettiNumbers {
    pub fn new(beta_0: usize, beta_1: usize, beta_2: usize, epsilon: f64) -> Self {
        Self {
            beta_0,
            beta_1,
            beta_2,
            epsilon,
        }
    }

    /// Betti numbers at `epsilon`. Dimensions the set does not carry
    /// count as zero.
    pub fn from_diagrams(diagrams: &DiagramSet, epsilon: f64) -> Self {
        let beta = |d: usize| diagrams.get(d).map_or(0, |dgm| dgm.betti_at(epsilon));
        Self::new(beta(0), beta(1), beta(2), epsilon)
    }

    /// Betti numbers of the complex at the set's own threshold
    pub fn at_threshold(diagrams: &DiagramSet) -> Self {
        Self::from_diagrams(diagrams, diagrams.threshold)
    }

    /// Total topological complexity
    pub fn total(&self) -> usize {
        self.beta_0 + self.beta_1 + self.beta_2
    }

    /// Euler characteristic χ = β₀ - β₁ + β₂
    pub fn euler_characteristic(&self) -> i64 {
        self.beta_0 as i64 - self.beta_1 as i64 + self.beta_2 as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{HomologyDiagram, PersistencePair};

    #[test]
    fn test_from_diagrams() {
        let set = DiagramSet {
            threshold: 1.0,
            diagrams: vec![
                HomologyDiagram::new(
                    0,
                    vec![
                        PersistencePair::new(0.0, 0.3),
                        PersistencePair::new(0.0, 0.7),
                        PersistencePair::essential(0.0),
                    ],
                ),
                HomologyDiagram::new(1, vec![PersistencePair::new(0.5, 0.9)]),
            ],
        };

        let early = BettiNumbers::from_diagrams(&set, 0.6);
        assert_eq!((early.beta_0, early.beta_1, early.beta_2), (2, 1, 0));
        assert_eq!(early.total(), 3);
        assert_eq!(early.euler_characteristic(), 1);

        let end = BettiNumbers::at_threshold(&set);
        assert_eq!((end.beta_0, end.beta_1, end.beta_2), (1, 0, 0));
        assert_eq!(end.epsilon, 1.0);
    }
}
