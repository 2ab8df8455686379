//! Memoized distance lookups.
//!
//! Point distances are keyed by the unordered pair of point ids; graph route
//! costs by the unordered pair of cells. Both caches grow until `clear()`.

use std::collections::HashMap;

use crate::{
    point::SpatialPoint,
    region_graph::{Cell, RegionGraph},
    types::PointId,
};

#[derive(Debug, Default)]
pub struct DistanceCache {
    distances: HashMap<(PointId, PointId), f64>,
    routes:    HashMap<(Cell, Cell), Option<u64>>,
    hits:      u64,
    misses:    u64,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Euclidean distance between `a` and `b`, computed at most once per
    /// unordered id pair. A fresh computation is stored under `(a, b)`.
    pub fn distance_between(&mut self, a: &SpatialPoint, b: &SpatialPoint) -> f64 {
        let key = (a.id(), b.id());
        let reverse = (b.id(), a.id());

        if let Some(&d) = self.distances.get(&key).or_else(|| self.distances.get(&reverse)) {
            self.hits += 1;
            return d;
        }

        let d = a.distance_to(b);
        self.distances.insert(key, d);
        self.misses += 1;
        log::debug!("distance cache miss {} <-> {}: {d:.3}", a.id(), b.id());
        d
    }

    /// Shortest route cost between two cells, memoized. `None` means no
    /// route exists.
    pub fn route_cost_between(&mut self, graph: &RegionGraph, from: Cell, to: Cell) -> Option<u64> {
        let key = if from <= to { (from, to) } else { (to, from) };
        if let Some(&cost) = self.routes.get(&key) {
            self.hits += 1;
            return cost;
        }
        let cost = graph.shortest_path(key.0, key.1);
        self.routes.insert(key, cost);
        self.misses += 1;
        cost
    }

    pub fn clear(&mut self) {
        self.distances.clear();
        self.routes.clear();
    }

    /// Cached entries across both caches.
    pub fn len(&self) -> usize {
        self.distances.len() + self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
