use ahash::AHashMap;

use crate::sparse::SparseVector;

/// Shortest character n-gram extracted from a name.
pub const NGRAM_MIN: usize = 2;
/// Longest character n-gram extracted from a name.
pub const NGRAM_MAX: usize = 5;

/// Character n-gram TF-IDF model fitted over the catalog names.
///
/// Names are lowercased and split into overlapping n-grams of length
/// `NGRAM_MIN..=NGRAM_MAX` (whitespace included), so partial and typo queries
/// still share grams with their catalog entry. Term weight is raw count times
/// smoothed IDF `ln((1 + n) / (1 + df)) + 1`, and the result is L2-normalized
/// so cosine similarity reduces to a dot product.
#[derive(Debug, Clone)]
pub struct CharGramVectorizer {
    vocabulary: AHashMap<String, u32>,
    idf: Vec<f32>,
}

fn count_grams(text: &str) -> AHashMap<String, u32> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut counts = AHashMap::new();
    for n in NGRAM_MIN..=NGRAM_MAX {
        if chars.len() < n {
            break;
        }
        for window in chars.windows(n) {
            *counts.entry(window.iter().collect::<String>()).or_insert(0u32) += 1;
        }
    }
    counts
}

impl CharGramVectorizer {
    /// Fit the vocabulary and IDF weights over the given documents.
    #[must_use]
    pub fn fit(docs: &[String]) -> Self {
        let mut df: AHashMap<String, u32> = AHashMap::new();
        for doc in docs {
            for gram in count_grams(doc).into_keys() {
                *df.entry(gram).or_insert(0) += 1;
            }
        }

        // Sorted assignment keeps term ids reproducible across runs.
        let mut terms: Vec<(String, u32)> = df.into_iter().collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let n = docs.len() as f32;
        let mut vocabulary = AHashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (id, (term, df)) in terms.into_iter().enumerate() {
            vocabulary.insert(term, id as u32);
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
        }
        Self { vocabulary, idf }
    }

    /// Transform free text into a unit-length TF-IDF vector. Grams outside
    /// the fitted vocabulary are dropped; text sharing no gram with the
    /// vocabulary yields the empty vector.
    #[must_use]
    pub fn transform(&self, text: &str) -> SparseVector {
        let counts = count_grams(text);
        let mut pairs = Vec::with_capacity(counts.len());
        for (gram, tf) in counts {
            if let Some(&id) = self.vocabulary.get(&gram) {
                pairs.push((id, tf as f32 * self.idf[id as usize]));
            }
        }
        let mut vector = SparseVector::from_pairs(pairs);
        vector.normalize();
        vector
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}
