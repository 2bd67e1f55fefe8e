//! # mealfit
//!
//! A dish-name suitability engine for dietary concepts.
//!
//! mealfit takes free-text menu item names, resolves them against a nutrition
//! catalog with character n-gram TF-IDF matching, and scores each match for a
//! dietary concept by fusing a frozen regression model with rule-based
//! nutrition scoring.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! mealfit --catalog ./data/catalog.json --artifacts ./data/artifacts.json --http-port 8000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use mealfit::prelude::*;
//! use std::path::PathBuf;
//!
//! let store = ArtifactStore::new(StoreConfig {
//!     catalog_path: PathBuf::from("./data/catalog.json"),
//!     artifacts_path: PathBuf::from("./data/artifacts.json"),
//!     match_config: MatchConfig::default(),
//! });
//! store.load().unwrap();
//!
//! let ranked = store
//!     .recommend("keto", &["닭가슴살 샐러드".to_string()], 15)
//!     .unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! mealfit is composed of several crates:
//!
//! - `mealfit-core` - Matching, calibration, scoring and snapshot assembly
//! - `mealfit-store` - Catalog/artifact loading and the served snapshot
//! - `mealfit-api` - REST API

pub use mealfit_core::{
    compute_score, Concept, Error, HnswIndex, MatchConfig, MatchStrategy, NameMatcher,
    NutritionRecord, QuantileTable, Result, Snapshot, SuitabilityResult,
};

pub use mealfit_store::{ArtifactStore, StoreConfig};

pub use mealfit_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        compute_score, ArtifactStore, Concept, Error, MatchConfig, MatchStrategy, NameMatcher,
        NutritionRecord, RestApi, Result, Snapshot, StoreConfig, SuitabilityResult,
    };
}
