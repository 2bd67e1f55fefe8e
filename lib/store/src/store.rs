use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use mealfit_core::{Error, MatchConfig, Result, Snapshot, SuitabilityResult};

use crate::artifacts::load_artifacts;
use crate::catalog::load_catalog;

/// File locations and matching knobs for a store load.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub catalog_path: PathBuf,
    pub artifacts_path: PathBuf,
    pub match_config: MatchConfig,
}

/// Owns the currently served [`Snapshot`] and swaps it atomically on
/// reload. Readers clone the `Arc` and keep scoring against the old
/// snapshot even while a new one is being built.
pub struct ArtifactStore {
    config: StoreConfig,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            snapshot: RwLock::new(None),
        }
    }

    /// Load catalog and artifacts from disk and build a fresh snapshot.
    /// All-or-nothing: on any failure the previously served snapshot (or
    /// the not-ready state) is left untouched.
    pub fn load(&self) -> Result<()> {
        info!(catalog = %self.config.catalog_path.display(), "loading catalog");
        let records = load_catalog(&self.config.catalog_path)?;
        info!(records = records.len(), "catalog cleaned");

        info!(artifacts = %self.config.artifacts_path.display(), "loading artifacts");
        let bundle = load_artifacts(&self.config.artifacts_path)?;

        let snapshot = Snapshot::build(
            records,
            bundle.models,
            bundle.calibration,
            self.config.match_config,
        )?;
        info!(catalog_size = snapshot.catalog_size(), "snapshot ready");

        *self.snapshot.write() = Some(Arc::new(snapshot));
        Ok(())
    }

    #[must_use]
    pub fn ready(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Number of dishes in the served snapshot, 0 before the first load.
    #[must_use]
    pub fn catalog_size(&self) -> usize {
        self.snapshot
            .read()
            .as_ref()
            .map_or(0, |s| s.catalog_size())
    }

    /// Handle to the served snapshot, or [`Error::NotReady`] before the
    /// first successful load.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.snapshot.read().clone().ok_or(Error::NotReady)
    }

    /// Rank `items` for a concept given by name. Readiness is checked
    /// before the concept name so a cold store always reports
    /// [`Error::NotReady`] first.
    pub fn recommend(
        &self,
        concept: &str,
        items: &[String],
        count: usize,
    ) -> Result<Vec<SuitabilityResult>> {
        let snapshot = self.snapshot()?;
        let concept = concept.parse()?;
        Ok(snapshot.recommend(concept, items, count))
    }
}
