//! Exact Persistent Homology via Coboundary Reduction
//!
//! ## Algorithm Overview
//!
//! 1. H₀ from Kruskal's algorithm: edges in filtration order, each merge
//!    kills a component
//! 2. For d = 1..=max_dim, reduce the coboundary matrix of the d-simplices
//!    over Z/2Z, columns in reverse filtration order. The pivot of a column
//!    is its earliest cofacet.
//! 3. A column reduced to pivot τ pairs (σ, τ); a zero column is a class
//!    still alive at the threshold
//!
//! Persistent cohomology yields the same pairs as homology, and lets the
//! reduction skip work the boundary matrix cannot:
//!
//! - **Clearing**: a d-simplex that was a pivot in dimension d-1 reduces to
//!   zero and is never visited
//! - **Implicit cofacets**: (d+1)-simplices are enumerated from a column's
//!   vertices when needed and never stored, so no simplex of dimension
//!   `max_dim + 1` is materialized
//! - **Compact simplices**: a simplex is its index in the combinatorial
//!   number system plus its filtration value
//!
//! Pairs with zero persistence are dropped, matching Ripser's output.
//!
//! ## Reference
//!
//! Bauer (2021). "Ripser: efficient computation of Vietoris-Rips
//! persistence barcodes". Journal of Applied and Computational Topology.
//!
//! de Silva, Morozov, Vejdemo-Johansson (2011). "Dualities in persistent
//! (co)homology". Inverse Problems.

use super::diagram::PersistencePair;
use super::vietoris_rips::VietorisRips;
use crate::error::ComputationError;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};

/// Persistence pairs keyed by homology dimension
pub type RawPairs = BTreeMap<usize, Vec<PersistencePair>>;

/// A simplex as (filtration value, combinatorial index). Within one
/// dimension the filtration order is diameter, then index.
#[derive(Debug, Clone, Copy)]
struct Cell {
    diameter: f64,
    index: u64,
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.diameter
            .total_cmp(&other.diameter)
            .then(self.index.cmp(&other.index))
    }
}

/// Binomial coefficients C(m, k) for m ≤ n, k ≤ max_k
struct Binomial {
    table: Vec<Vec<u64>>,
}

impl Binomial {
    /// None when some C(m, k) overflows u64
    fn new(n: usize, max_k: usize) -> Option<Self> {
        let mut table = vec![vec![0u64; n + 1]; max_k + 1];
        for m in 0..=n {
            table[0][m] = 1;
            for k in 1..=max_k.min(m) {
                table[k][m] = table[k - 1][m - 1].checked_add(table[k][m - 1])?;
            }
        }
        Some(Self { table })
    }

    fn get(&self, m: usize, k: usize) -> u64 {
        self.table[k][m]
    }
}

/// Implicit view of the truncated Rips complex
struct Complex<'a> {
    vr: &'a VietorisRips,
    binomial: Binomial,
    n: usize,
}

impl<'a> Complex<'a> {
    /// Index of a simplex from its ascending vertices
    fn index_of(&self, vertices: &[usize]) -> u64 {
        vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| self.binomial.get(v, i + 1))
            .sum()
    }

    /// Ascending vertices of the `dim`-simplex at `index`
    fn vertices(&self, mut index: u64, dim: usize, out: &mut Vec<usize>) {
        out.clear();
        let mut top = self.n;
        for k in (1..=dim + 1).rev() {
            // Largest v < top with C(v, k) ≤ index
            let (mut lo, mut hi) = (k - 1, top);
            while hi - lo > 1 {
                let mid = (lo + hi) / 2;
                if self.binomial.get(mid, k) <= index {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            out.push(lo);
            index -= self.binomial.get(lo, k);
            top = lo;
        }
        out.reverse();
    }

    /// Cofacets of `cell` present at the threshold
    fn coboundary(&self, cell: Cell, dim: usize, scratch: &mut Vec<usize>, out: &mut Vec<Cell>) {
        out.clear();
        self.vertices(cell.index, dim, scratch);
        let threshold = self.vr.threshold();

        'vertex: for w in 0..self.n {
            let mut diameter = cell.diameter;
            for &u in scratch.iter() {
                if u == w {
                    continue 'vertex;
                }
                let d = self.vr.distance(u, w);
                if d > threshold {
                    continue 'vertex;
                }
                diameter = diameter.max(d);
            }

            // Index of scratch ∪ {w}: vertices above w shift up one position
            let mut index = 0;
            let mut position = 1;
            let mut placed = false;
            for &u in scratch.iter() {
                if !placed && w < u {
                    index += self.binomial.get(w, position);
                    position += 1;
                    placed = true;
                }
                index += self.binomial.get(u, position);
                position += 1;
            }
            if !placed {
                index += self.binomial.get(w, position);
            }

            out.push(Cell { diameter, index });
        }
    }

    /// All (dim+1)-simplices at the threshold, each extended from its
    /// facet without the largest vertex
    fn extend(&self, level: &[Cell], dim: usize) -> Vec<Cell> {
        let threshold = self.vr.threshold();
        let mut vertices = Vec::with_capacity(dim + 2);
        let mut next = Vec::new();

        for &cell in level {
            self.vertices(cell.index, dim, &mut vertices);
            let last = vertices[vertices.len() - 1];
            'candidate: for v in last + 1..self.n {
                let mut diameter = cell.diameter;
                for &u in &vertices {
                    let d = self.vr.distance(u, v);
                    if d > threshold {
                        continue 'candidate;
                    }
                    diameter = diameter.max(d);
                }
                next.push(Cell {
                    diameter,
                    index: cell.index + self.binomial.get(v, dim + 2),
                });
            }
        }

        next
    }
}

/// Persistence pairs per dimension for a truncated Rips filtration.
///
/// Only dimensions `0..=max_dim` appear as keys, and only when they have at
/// least one pair.
pub fn persistence_pairs(vr: &VietorisRips, max_dim: usize) -> Result<RawPairs, ComputationError> {
    let n = vr.n_points();
    let mut pairs = RawPairs::new();
    if n == 0 {
        return Ok(pairs);
    }

    let binomial = Binomial::new(n, max_dim + 2).ok_or_else(|| {
        ComputationError::backend(format!(
            "{} points are too many to index simplices of dimension {}",
            n,
            max_dim + 1
        ))
    })?;
    let complex = Complex { vr, binomial, n };

    // H0: union-find over edges in filtration order
    let mut edges: Vec<Cell> = vr
        .edges()
        .into_iter()
        .map(|(i, j, d)| Cell {
            diameter: d,
            index: complex.index_of(&[i, j]),
        })
        .collect();
    edges.sort_unstable();

    let mut parent: Vec<usize> = (0..n).collect();
    let mut rank = vec![0usize; n];

    fn find(parent: &mut [usize], i: usize) -> usize {
        if parent[i] != i {
            parent[i] = find(parent, parent[i]);
        }
        parent[i]
    }

    let mut columns = Vec::new();
    let mut scratch = Vec::with_capacity(2);
    let mut components = n;
    for &edge in &edges {
        complex.vertices(edge.index, 1, &mut scratch);
        let rx = find(&mut parent, scratch[0]);
        let ry = find(&mut parent, scratch[1]);
        if rx == ry {
            columns.push(edge);
            continue;
        }
        match rank[rx].cmp(&rank[ry]) {
            Ordering::Less => parent[rx] = ry,
            Ordering::Greater => parent[ry] = rx,
            Ordering::Equal => {
                parent[ry] = rx;
                rank[rx] += 1;
            }
        }
        components -= 1;
        if edge.diameter > 0.0 {
            pairs
                .entry(0)
                .or_insert_with(Vec::new)
                .push(PersistencePair::new(0.0, edge.diameter));
        }
    }
    pairs
        .entry(0)
        .or_insert_with(Vec::new)
        .extend(std::iter::repeat(PersistencePair::essential(0.0)).take(components));

    let mut level = edges;
    for dim in 1..=max_dim {
        let pivots = reduce(&complex, dim, columns, &mut pairs);
        if dim == max_dim {
            break;
        }
        level = complex.extend(&level, dim);
        columns = level
            .iter()
            .filter(|cell| !pivots.contains(&cell.index))
            .copied()
            .collect();
    }

    Ok(pairs)
}

/// Reduce the coboundary columns of `dim`-simplices, recording pairs.
/// Returns the pivots, i.e. the (dim+1)-simplices that killed a class.
fn reduce(complex: &Complex<'_>, dim: usize, mut columns: Vec<Cell>, pairs: &mut RawPairs) -> HashSet<u64> {
    columns.sort_unstable_by(|a, b| b.cmp(a));

    // Pivot index -> position in `combinations`
    let mut pivot_of: HashMap<u64, usize> = HashMap::new();
    // Simplices whose coboundaries sum to each reduced column
    let mut combinations: Vec<Vec<Cell>> = Vec::new();

    let mut scratch = Vec::with_capacity(dim + 1);
    let mut cofacets = Vec::new();
    let mut working: BinaryHeap<Reverse<Cell>> = BinaryHeap::new();

    for column in columns {
        complex.coboundary(column, dim, &mut scratch, &mut cofacets);

        let Some(first) = cofacets.iter().min().copied() else {
            record(pairs, dim, column, None);
            continue;
        };

        // Most columns are already reduced: their earliest cofacet is free
        if !pivot_of.contains_key(&first.index) {
            pivot_of.insert(first.index, combinations.len());
            combinations.push(vec![column]);
            record(pairs, dim, column, Some(first));
            continue;
        }

        working.clear();
        working.extend(cofacets.drain(..).map(Reverse));
        let mut combination = vec![column];
        let low = loop {
            let Some(low) = pivot(&mut working) else { break None };
            let Some(&other) = pivot_of.get(&low.index) else { break Some(low) };
            for &simplex in &combinations[other] {
                complex.coboundary(simplex, dim, &mut scratch, &mut cofacets);
                working.extend(cofacets.drain(..).map(Reverse));
            }
            combination.extend_from_slice(&combinations[other]);
        };

        if let Some(low) = low {
            pivot_of.insert(low.index, combinations.len());
            combinations.push(cancel_pairs(combination));
        }
        record(pairs, dim, column, low);
    }

    pivot_of.into_keys().collect()
}

/// Earliest entry of a Z/2Z column held as a heap with repeats. Equal
/// entries cancel in pairs; the pivot stays in the heap.
fn pivot(heap: &mut BinaryHeap<Reverse<Cell>>) -> Option<Cell> {
    loop {
        let Reverse(top) = heap.pop()?;
        match heap.peek() {
            Some(&Reverse(next)) if next.index == top.index => {
                heap.pop();
            }
            _ => {
                heap.push(Reverse(top));
                return Some(top);
            }
        }
    }
}

/// Z/2Z sum of a list of simplices
fn cancel_pairs(mut cells: Vec<Cell>) -> Vec<Cell> {
    cells.sort_unstable();
    let mut sum: Vec<Cell> = Vec::with_capacity(cells.len());
    for cell in cells {
        if sum.last().map_or(false, |last| last.index == cell.index) {
            sum.pop();
        } else {
            sum.push(cell);
        }
    }
    sum
}

/// Pair a column with the cofacet that killed it, or mark it essential
fn record(pairs: &mut RawPairs, dim: usize, column: Cell, death: Option<Cell>) {
    let pair = match death {
        Some(death) if death.diameter > column.diameter => {
            PersistencePair::new(column.diameter, death.diameter)
        }
        Some(_) => return,
        None => PersistencePair::essential(column.diameter),
    };
    pairs.entry(dim).or_insert_with(Vec::new).push(pair);
}
