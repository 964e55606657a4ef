//! Dimension selection over a diagram set.

use crate::topology::{DiagramSet, HomologyDiagram};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Homology dimensions the user wants drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSelection {
    dimensions: BTreeSet<usize>,
}

impl DimensionSelection {
    /// H0, H1 and H2
    pub fn all() -> Self {
        Self::from_flags(true, true, true)
    }

    pub fn none() -> Self {
        Self {
            dimensions: BTreeSet::new(),
        }
    }

    /// From the three show-toggles
    pub fn from_flags(show_h0: bool, show_h1: bool, show_h2: bool) -> Self {
        let dimensions = [show_h0, show_h1, show_h2]
            .into_iter()
            .enumerate()
            .filter_map(|(d, on)| on.then_some(d))
            .collect();
        Self { dimensions }
    }

    pub fn contains(&self, dimension: usize) -> bool {
        self.dimensions.contains(&dimension)
    }

    pub fn set(&mut self, dimension: usize, shown: bool) {
        if shown {
            self.dimensions.insert(dimension);
        } else {
            self.dimensions.remove(&dimension);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.dimensions.iter().copied()
    }
}

impl Default for DimensionSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<usize> for DimensionSelection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            dimensions: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for DimensionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.iter().map(|d| format!("H{}", d)).collect();
        f.write_str(&labels.join(","))
    }
}

impl FromStr for DimensionSelection {
    type Err = String;

    /// Comma separated list such as `0,1` or `h0,H2`. Empty selects nothing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                let digits = t.strip_prefix(['h', 'H']).unwrap_or(t);
                digits
                    .parse::<usize>()
                    .map_err(|_| format!("invalid homology dimension '{}'", t))
            })
            .collect()
    }
}

/// Diagrams whose dimension is selected, in their original order.
///
/// Borrows from `diagrams`; nothing is copied, reordered or invented.
pub fn filter<'a>(
    diagrams: &'a DiagramSet,
    selection: &DimensionSelection,
) -> Vec<(usize, &'a HomologyDiagram)> {
    diagrams
        .iter()
        .filter(|d| selection.contains(d.dimension))
        .map(|d| (d.dimension, d))
        .collect()
}
