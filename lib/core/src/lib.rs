//! # mealfit Core
//!
//! Core library for the mealfit suitability engine.
//!
//! This crate provides the in-memory matching-and-scoring pipeline:
//!
//! - [`NutritionRecord`] - A catalog dish and its feature extraction
//! - [`NameMatcher`] - Fuzzy dish-name resolution (TF-IDF + linear or HNSW)
//! - [`QuantileTable`] - Catalog-wide calibration breakpoints
//! - [`compute_score`] - Concept-specific rule scoring with hard thresholds
//! - [`ConceptModels`] - Frozen per-concept regression prediction
//! - [`Snapshot`] - The immutable serving unit fusing rule and model scores
//!
//! ## Example
//!
//! ```rust
//! use mealfit_core::{compute_score, Concept, NutritionRecord};
//!
//! let dish = NutritionRecord {
//!     kcal: Some(120.0),
//!     protein: Some(21.0),
//!     sodium: Some(45.0),
//!     ..NutritionRecord::named("닭가슴살 구이")
//! };
//!
//! // Lean and protein-dense: great for bulking, scored on built-in bands.
//! let score = compute_score(Concept::Bulking, &dish, None);
//! assert!(score > 50.0);
//! ```

pub mod calibration;
pub mod concept;
pub mod error;
pub mod hnsw;
pub mod matcher;
pub mod model;
pub mod record;
pub mod scoring;
pub mod snapshot;
pub mod sparse;
pub mod vectorizer;

pub use calibration::{Quantiles, QuantileTable, Signal, to_unit, SIGNAL_COUNT};
pub use concept::{Concept, ConceptProfile, CONCEPT_COUNT};
pub use error::{Error, Result};
pub use hnsw::HnswIndex;
pub use matcher::{MatchConfig, MatchStrategy, NameMatch, NameMatcher, AUTO_GRAPH_THRESHOLD};
pub use model::{ConceptModels, MedianImputer, RidgeModel, StandardScaler};
pub use record::{FeatureVector, NutritionRecord, FEATURE_DIM};
pub use scoring::compute_score;
pub use snapshot::{Snapshot, SuitabilityResult, MODEL_WEIGHT, RULE_WEIGHT};
pub use sparse::SparseVector;
pub use vectorizer::CharGramVectorizer;
