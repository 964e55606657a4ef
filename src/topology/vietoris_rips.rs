//! Vietoris-Rips Complex Construction
//!
//! The Vietoris-Rips complex VR_ε(X) is a simplicial complex where:
//! - 0-simplices are the points in X
//! - A k-simplex [v₀, ..., vₖ] exists iff d(vᵢ, vⱼ) ≤ ε for all i,j
//!
//! Each simplex enters the filtration at the largest pairwise distance
//! among its vertices. Balls of radius r around two points first touch
//! when their centers are 2r apart, so the complex at ε = 2r is the nerve
//! picture the user sees growing.

use ndarray::{Array2, ArrayView2};
use std::collections::HashSet;

/// Truncated Vietoris-Rips filtration over a point cloud
#[derive(Debug, Clone)]
pub struct VietorisRips {
    /// Distance matrix (precomputed)
    distances: Array2<f64>,
    /// Truncation threshold ε
    threshold: f64,
}

/// A simplex with its filtration value
#[derive(Debug, Clone, PartialEq)]
pub struct Simplex {
    /// Sorted vertex indices
    pub vertices: Vec<usize>,
    /// Filtration value at which the simplex appears
    pub birth: f64,
}

impl Simplex {
    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }
}

impl VietorisRips {
    /// Create from precomputed distance matrix
    pub fn from_distance_matrix(distances: Array2<f64>, threshold: f64) -> Self {
        Self {
            distances,
            threshold,
        }
    }

    /// Create from point cloud (computes distance matrix)
    pub fn from_points(points: ArrayView2<'_, f64>, threshold: f64) -> Self {
        Self {
            distances: distance_matrix(points),
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.distances.nrows()
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances[[i, j]]
    }

    /// Largest pairwise distance; the complex is complete once ε reaches it
    pub fn diameter(&self) -> f64 {
        self.distances.iter().cloned().fold(0.0, f64::max)
    }

    /// Edges present at the threshold, with their lengths
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        let n = self.n_points();
        let mut edges = Vec::new();

        for i in 0..n {
            for j in i + 1..n {
                let d = self.distances[[i, j]];
                if d <= self.threshold {
                    edges.push((i, j, d));
                }
            }
        }

        edges
    }

    /// All simplices of dimension ≤ `max_simplex_dim` present at the
    /// threshold, level by level: vertices, then edges, then each
    /// (k+1)-clique extended from a k-clique by a larger vertex.
    pub fn simplices(&self, max_simplex_dim: usize) -> Vec<Simplex> {
        let n = self.n_points();
        let mut all: Vec<Simplex> = (0..n)
            .map(|i| Simplex {
                vertices: vec![i],
                birth: 0.0,
            })
            .collect();

        if max_simplex_dim == 0 {
            return all;
        }

        let mut level: Vec<Simplex> = self
            .edges()
            .into_iter()
            .map(|(i, j, d)| Simplex {
                vertices: vec![i, j],
                birth: d,
            })
            .collect();

        for _ in 2..=max_simplex_dim {
            let next = self.extend(&level);
            all.append(&mut level);
            level = next;
            if level.is_empty() {
                break;
            }
        }
        all.append(&mut level);

        all
    }

    /// Cofaces obtained by appending one larger vertex to each simplex
    fn extend(&self, level: &[Simplex]) -> Vec<Simplex> {
        let n = self.n_points();
        let mut next = Vec::new();

        for simplex in level {
            let last = simplex.vertices[simplex.vertices.len() - 1];
            'candidate: for v in last + 1..n {
                let mut birth = simplex.birth;
                for &u in &simplex.vertices {
                    let d = self.distances[[u, v]];
                    if d > self.threshold {
                        continue 'candidate;
                    }
                    birth = birth.max(d);
                }

                let mut vertices = simplex.vertices.clone();
                vertices.push(v);
                next.push(Simplex { vertices, birth });
            }
        }

        next
    }

    /// Count connected components using Union-Find
    pub fn count_components(&self) -> usize {
        let n = self.n_points();
        let mut parent: Vec<usize> = (0..n).collect();
        let mut rank = vec![0usize; n];

        fn find(parent: &mut [usize], i: usize) -> usize {
            if parent[i] != i {
                parent[i] = find(parent, parent[i]);
            }
            parent[i]
        }

        fn union(parent: &mut [usize], rank: &mut [usize], x: usize, y: usize) {
            let rx = find(parent, x);
            let ry = find(parent, y);
            if rx != ry {
                if rank[rx] < rank[ry] {
                    parent[rx] = ry;
                } else if rank[rx] > rank[ry] {
                    parent[ry] = rx;
                } else {
                    parent[ry] = rx;
                    rank[rx] += 1;
                }
            }
        }

        for (i, j, _) in self.edges() {
            union(&mut parent, &mut rank, i, j);
        }

        let mut roots = HashSet::new();
        for i in 0..n {
            roots.insert(find(&mut parent, i));
        }
        roots.len()
    }
}

/// Euclidean distance matrix
pub fn distance_matrix(points: ArrayView2<'_, f64>) -> Array2<f64> {
    let n = points.nrows();
    let dim = points.ncols();

    let mut dm = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in i + 1..n {
            let mut dist_sq = 0.0;
            for d in 0..dim {
                let diff = points[[i, d]] - points[[j, d]];
                dist_sq += diff * diff;
            }
            let dist = dist_sq.sqrt();
            dm[[i, j]] = dist;
            dm[[j, i]] = dist;
        }
    }

    dm
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_triangle() {
        // Equilateral triangle with side 1
        let points = array![[0.0, 0.0], [1.0, 0.0], [0.5, 0.866]];

        // At ε < 1, three components
        let below = VietorisRips::from_points(points.view(), 0.8);
        assert_eq!(below.count_components(), 3);
        assert!(below.edges().is_empty());

        // At ε ≥ 1, one component and the filled triangle
        let above = VietorisRips::from_points(points.view(), 1.2);
        assert_eq!(above.count_components(), 1);
        let simplices = above.simplices(2);
        assert_eq!(simplices.len(), 3 + 3 + 1);
        let triangle = simplices.last().unwrap();
        assert_eq!(triangle.vertices, vec![0, 1, 2]);
        assert_eq!(triangle.dimension(), 2);
    }

    #[test]
    fn test_simplex_birth_is_longest_edge() {
        let dm = array![
            [0.0, 1.0, 2.0, 3.0],
            [1.0, 0.0, 1.5, 2.5],
            [2.0, 1.5, 0.0, 0.5],
            [3.0, 2.5, 0.5, 0.0]
        ];
        let vr = VietorisRips::from_distance_matrix(dm, 10.0);
        let simplices = vr.simplices(3);

        let tet = simplices.iter().find(|s| s.dimension() == 3).unwrap();
        assert_eq!(tet.vertices, vec![0, 1, 2, 3]);
        assert_eq!(tet.birth, 3.0);

        let tri = simplices.iter().find(|s| s.vertices == vec![1, 2, 3]).unwrap();
        assert_eq!(tri.birth, 2.5);

        // 4 vertices, 6 edges, 4 triangles, 1 tetrahedron
        assert_eq!(simplices.len(), 15);
    }

    #[test]
    fn test_truncation_drops_long_edges() {
        let dm = array![[0.0, 1.0, 3.0], [1.0, 0.0, 1.0], [3.0, 1.0, 0.0]];
        let vr = VietorisRips::from_distance_matrix(dm, 2.0);

        assert_eq!(vr.edges().len(), 2);
        // Path 0-1-2 has no triangle
        assert!(vr.simplices(2).iter().all(|s| s.dimension() < 2));
        assert_eq!(vr.diameter(), 3.0);
        assert_eq!(vr.count_components(), 1);
    }
}
