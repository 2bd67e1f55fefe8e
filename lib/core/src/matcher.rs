use std::str::FromStr;

use ahash::AHashMap;
use rayon::prelude::*;

use crate::hnsw::HnswIndex;
use crate::sparse::SparseVector;
use crate::vectorizer::CharGramVectorizer;

/// Best catalog entry for a query, with cosine similarity in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub index: usize,
    pub name: String,
    pub similarity: f32,
}

/// How queries are resolved against the name matrix.
///
/// `Linear` is an exact brute-force scan, `Graph` an approximate HNSW search,
/// and `Auto` picks the graph once the catalog is large enough for the scan
/// to matter. Both produce the same output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Linear,
    Graph,
    Auto,
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(MatchStrategy::Linear),
            "graph" => Ok(MatchStrategy::Graph),
            "auto" => Ok(MatchStrategy::Auto),
            _ => Err(format!("unknown match strategy: {s}")),
        }
    }
}

/// Catalog size at which `Auto` switches from the exact scan to the graph.
pub const AUTO_GRAPH_THRESHOLD: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub strategy: MatchStrategy,
    /// HNSW search breadth; higher trades latency for recall.
    pub ef_search: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Auto,
            ef_search: 64,
        }
    }
}

/// Resolves free-text queries to their closest catalog name.
///
/// Owns the fitted vectorizer, the precomputed name matrix, an exact-name
/// lookup and, depending on the strategy, an HNSW graph over the matrix.
pub struct NameMatcher {
    names: Vec<String>,
    vectorizer: CharGramVectorizer,
    vectors: Vec<SparseVector>,
    lookup: AHashMap<String, usize>,
    index: Option<HnswIndex>,
    ef_search: usize,
}

impl NameMatcher {
    /// Fit the vectorizer over the catalog names, transform them all and
    /// build the search structure the config asks for.
    #[must_use]
    pub fn fit(names: Vec<String>, config: MatchConfig) -> Self {
        let vectorizer = CharGramVectorizer::fit(&names);
        let vectors: Vec<SparseVector> = names
            .par_iter()
            .map(|name| vectorizer.transform(name))
            .collect();

        let mut lookup = AHashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            lookup.entry(name.clone()).or_insert(i);
        }

        let use_graph = match config.strategy {
            MatchStrategy::Linear => false,
            MatchStrategy::Graph => true,
            MatchStrategy::Auto => names.len() >= AUTO_GRAPH_THRESHOLD,
        };
        let index = use_graph.then(|| {
            let mut index = HnswIndex::new(16, 4);
            for vector in &vectors {
                index.insert(vector.clone());
            }
            index
        });

        Self {
            names,
            vectorizer,
            vectors,
            lookup,
            index,
            ef_search: config.ef_search,
        }
    }

    /// Best match for one query, or `None` for degenerate queries that share
    /// no n-gram with the catalog (including empty input). Never errors;
    /// non-finite similarities from degenerate vectors collapse to 0.
    #[must_use]
    pub fn match_top1(&self, query: &str) -> Option<NameMatch> {
        if self.names.is_empty() {
            return None;
        }

        // Exact hit: reuse the precomputed row instead of re-vectorizing.
        let transformed;
        let vector = match self.lookup.get(query) {
            Some(&i) => &self.vectors[i],
            None => {
                transformed = self.vectorizer.transform(query);
                &transformed
            }
        };
        if vector.is_empty() {
            return None;
        }

        let (index, raw) = match &self.index {
            Some(graph) => graph.search(vector, 1, self.ef_search).into_iter().next()?,
            None => {
                let mut best = (0usize, f32::MIN);
                for (i, row) in self.vectors.iter().enumerate() {
                    let sim = vector.dot(row);
                    if sim > best.1 {
                        best = (i, sim);
                    }
                }
                best
            }
        };

        let similarity = if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Some(NameMatch {
            index,
            name: self.names[index].clone(),
            similarity,
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
