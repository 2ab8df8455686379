//! Region graph: travel-cost model over a square grid of cells.
//!
//! # Shape
//!
//! Nodes are grid cells `(i, j)` of an `N×N` grid. Each cell links to its
//! right and lower neighbour with an integer weight drawn from the terrain
//! stream. Edges are undirected: both directions share one weight.
//!
//! The graph is built once when the engine is constructed and never mutated
//! afterwards.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{config::Domain, rng::StreamRng};

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub i: u32,
    pub j: u32,
}

impl Cell {
    pub const fn new(i: u32, j: u32) -> Self {
        Self { i, j }
    }
}

#[derive(Debug, Default, Clone)]
pub struct RegionGraph {
    size:      u32,
    adjacency: HashMap<Cell, Vec<Cell>>,
    weights:   HashMap<(Cell, Cell), u32>,
}

impl RegionGraph {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Build the standard grid: every cell links right and down with a
    /// weight in `min_weight..=max_weight`.
    pub fn grid(size: u32, min_weight: u32, max_weight: u32, rng: &mut StreamRng) -> Self {
        let mut graph = Self::new(size);
        for i in 0..size {
            for j in 0..size {
                let here = Cell::new(i, j);
                if i + 1 < size {
                    let w = rng.range_inclusive(min_weight as i64, max_weight as i64) as u32;
                    graph.add_edge(here, Cell::new(i + 1, j), w);
                }
                if j + 1 < size {
                    let w = rng.range_inclusive(min_weight as i64, max_weight as i64) as u32;
                    graph.add_edge(here, Cell::new(i, j + 1), w);
                }
            }
        }
        log::debug!(
            "region graph built: {size}x{size} cells, {} edges",
            graph.edge_count()
        );
        graph
    }

    /// Add an undirected edge. Re-adding an existing edge overwrites its
    /// weight without duplicating the adjacency entry.
    pub fn add_edge(&mut self, u: Cell, v: Cell, weight: u32) {
        if self.weights.insert((u, v), weight).is_none() {
            self.adjacency.entry(u).or_default().push(v);
        }
        if self.weights.insert((v, u), weight).is_none() {
            self.adjacency.entry(v).or_default().push(u);
        }
    }

    pub fn weight(&self, u: Cell, v: Cell) -> Option<u32> {
        self.weights.get(&(u, v)).copied()
    }

    pub fn neighbours(&self, cell: Cell) -> &[Cell] {
        self.adjacency.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.weights.len() / 2
    }

    /// Minimum total weight from `source` to `destination`, or `None` if
    /// the destination is unreachable.
    ///
    /// Standard Dijkstra: a visited set stops a node being settled twice
    /// and the search returns as soon as the destination is popped.
    pub fn shortest_path(&self, source: Cell, destination: Cell) -> Option<u64> {
        let mut dist: HashMap<Cell, u64> = HashMap::new();
        let mut visited: HashSet<Cell> = HashSet::new();
        let mut heap = BinaryHeap::new();

        dist.insert(source, 0);
        heap.push(Reverse((0u64, source)));

        while let Some(Reverse((d, node))) = heap.pop() {
            if !visited.insert(node) {
                continue;
            }
            if node == destination {
                return Some(d);
            }
            for &next in self.neighbours(node) {
                if visited.contains(&next) {
                    continue;
                }
                let step = self.weight(node, next).unwrap_or(1) as u64;
                let candidate = d + step;
                if dist.get(&next).map_or(true, |&best| candidate < best) {
                    dist.insert(next, candidate);
                    heap.push(Reverse((candidate, next)));
                }
            }
        }
        None
    }

    /// Cell containing the domain coordinate `(x, y)`. Coordinates outside
    /// the domain clamp to the border cells.
    pub fn cell_for(&self, x: f64, y: f64, domain: &Domain) -> Cell {
        let span = (domain.max - domain.min).max(f64::EPSILON);
        let last = self.size.saturating_sub(1);
        let axis = |v: f64| -> u32 {
            let t = ((v - domain.min) / span * self.size as f64).floor();
            (t.max(0.0) as u32).min(last)
        };
        Cell::new(axis(x), axis(y))
    }
}
