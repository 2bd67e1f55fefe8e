use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::sparse::SparseVector;

type Neighbors = SmallVec<[u32; 16]>;

/// Fast bit vector for visited-node tracking during graph traversal.
/// Much faster than a hash set for dense integer sets.
struct VisitedSet {
    bits: Vec<u64>,
}

impl VisitedSet {
    #[inline]
    fn new(capacity: usize) -> Self {
        Self {
            bits: vec![0; capacity.div_ceil(64)],
        }
    }

    /// Marks `idx` visited; returns true when it was not visited before.
    #[inline]
    fn insert(&mut self, idx: usize) -> bool {
        let word = idx / 64;
        let mask = 1u64 << (idx % 64);
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        let was_set = (self.bits[word] & mask) != 0;
        self.bits[word] |= mask;
        !was_set
    }
}

/// HNSW graph over the catalog's sparse name vectors.
///
/// Vectors are L2-normalized at transform time, so cosine distance is
/// `1 - dot`. The graph is built once during snapshot construction and is
/// immutable afterwards; `search` takes `&self` and allocates its own visited
/// set, so concurrent queries need no locks.
pub struct HnswIndex {
    vectors: Vec<SparseVector>,
    /// Per node, adjacency lists for layers `0..=assigned_layer`.
    layers: Vec<Vec<Neighbors>>,
    max_connections: usize,
    max_layers: usize,
    ef_construction: usize,
}

impl HnswIndex {
    #[must_use]
    pub fn new(max_connections: usize, max_layers: usize) -> Self {
        Self {
            vectors: Vec::new(),
            layers: Vec::new(),
            max_connections,
            max_layers,
            ef_construction: 200,
        }
    }

    /// Select a layer using exponential decay.
    #[inline]
    fn select_layer(&self) -> usize {
        let mut layer = 0;
        while layer < self.max_layers - 1 && rand::random::<f32>() < 0.5 {
            layer += 1;
        }
        layer
    }

    #[inline]
    fn distance(&self, query: &SparseVector, idx: usize) -> f32 {
        1.0 - query.dot(&self.vectors[idx])
    }

    /// Greedy beam search restricted to one layer. Returns up to `ef`
    /// candidates sorted by ascending distance.
    fn search_layer(
        &self,
        query: &SparseVector,
        entry_point: usize,
        ef: usize,
        layer: usize,
        visited: &mut VisitedSet,
    ) -> Vec<(usize, f32)> {
        // Min-heap of candidates to expand, max-heap of current results.
        let mut candidates: BinaryHeap<(Reverse<OrderedFloat<f32>>, usize)> =
            BinaryHeap::with_capacity(ef * 2);
        let mut results: BinaryHeap<(OrderedFloat<f32>, usize)> =
            BinaryHeap::with_capacity(ef + 1);

        let entry_dist = self.distance(query, entry_point);
        candidates.push((Reverse(OrderedFloat(entry_dist)), entry_point));
        results.push((OrderedFloat(entry_dist), entry_point));
        visited.insert(entry_point);

        let mut worst_dist = entry_dist;

        while let Some((Reverse(OrderedFloat(current_dist)), current_idx)) = candidates.pop() {
            if results.len() >= ef && current_dist > worst_dist {
                break;
            }

            let node_layers = &self.layers[current_idx];
            if layer >= node_layers.len() {
                continue;
            }
            // Copy out to decouple the neighbor walk from the heaps.
            let neighbors: Neighbors = node_layers[layer].clone();

            for &neighbor in &neighbors {
                let neighbor_idx = neighbor as usize;
                if visited.insert(neighbor_idx) {
                    let dist = self.distance(query, neighbor_idx);
                    if results.len() < ef || dist < worst_dist {
                        candidates.push((Reverse(OrderedFloat(dist)), neighbor_idx));
                        results.push((OrderedFloat(dist), neighbor_idx));
                        if results.len() > ef {
                            results.pop();
                            if let Some(&(OrderedFloat(worst), _)) = results.peek() {
                                worst_dist = worst;
                            }
                        } else if dist > worst_dist {
                            worst_dist = dist;
                        }
                    }
                }
            }
        }

        let mut result_vec: Vec<(usize, f32)> = results
            .into_iter()
            .map(|(OrderedFloat(dist), idx)| (idx, dist))
            .collect();
        result_vec.sort_unstable_by(|a, b| a.1.total_cmp(&b.1));
        result_vec
    }

    /// Insert a vector into the graph, linking it at every layer up to its
    /// assigned one.
    pub fn insert(&mut self, vector: SparseVector) {
        let assigned = self.select_layer();
        let idx = self.vectors.len();
        self.vectors.push(vector);
        self.layers.push(vec![Neighbors::new(); assigned + 1]);

        if idx == 0 {
            return;
        }

        let query = self.vectors[idx].clone();
        let mut visited = VisitedSet::new(self.vectors.len());
        let candidates = self.search_layer(&query, 0, self.ef_construction, 0, &mut visited);

        for layer in 0..=assigned {
            let neighbors: Neighbors = candidates
                .iter()
                .filter(|&&(c, _)| self.layers[c].len() > layer)
                .take(self.max_connections)
                .map(|&(c, _)| c as u32)
                .collect();

            for &neighbor in &neighbors {
                let neighbor_idx = neighbor as usize;
                self.layers[neighbor_idx][layer].push(idx as u32);
                if self.layers[neighbor_idx][layer].len() > self.max_connections * 2 {
                    self.prune(neighbor_idx, layer);
                }
            }
            self.layers[idx][layer] = neighbors;
        }
    }

    /// Keep only the closest `2 * max_connections` links of a node at one layer.
    fn prune(&mut self, node_idx: usize, layer: usize) {
        let anchor = self.vectors[node_idx].clone();
        let mut links: Vec<u32> = self.layers[node_idx][layer].to_vec();
        links.sort_by_key(|&c| OrderedFloat(self.distance(&anchor, c as usize)));
        links.truncate(self.max_connections * 2);
        self.layers[node_idx][layer] = Neighbors::from_vec(links);
    }

    /// Search for the `k` nearest vectors, returning `(index, similarity)`
    /// pairs in descending similarity order.
    #[must_use]
    pub fn search(&self, query: &SparseVector, k: usize, ef: usize) -> Vec<(usize, f32)> {
        if self.vectors.is_empty() {
            return Vec::new();
        }

        let ef = ef.max(k).max(16);
        let mut visited = VisitedSet::new(self.vectors.len());
        let mut entry_point = 0usize;

        // Descend the upper layers greedily before the wide layer-0 pass.
        // Small graphs are effectively flat, skip straight to layer 0.
        if self.vectors.len() >= 1000 {
            for layer in (1..self.max_layers).rev() {
                let nearest = self.search_layer(query, entry_point, 1, layer, &mut visited);
                if let Some(&(idx, _)) = nearest.first() {
                    entry_point = idx;
                }
                visited = VisitedSet::new(self.vectors.len());
            }
        }

        self.search_layer(query, entry_point, ef, 0, &mut visited)
            .into_iter()
            .take(k)
            .map(|(idx, dist)| (idx, 1.0 - dist))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
