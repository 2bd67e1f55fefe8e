use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::Serialize;

use crate::calibration::QuantileTable;
use crate::concept::Concept;
use crate::error::{Error, Result};
use crate::matcher::{MatchConfig, NameMatcher};
use crate::model::ConceptModels;
use crate::record::{FeatureVector, NutritionRecord};
use crate::scoring::compute_score;

/// Share of the learned prediction in the fused score.
pub const MODEL_WEIGHT: f64 = 0.3;
/// Share of the rule-based score in the fused score.
pub const RULE_WEIGHT: f64 = 0.7;

/// Outcome for one evaluated menu name. Unmatched queries keep their
/// position with all matched fields `None`. Constructed per evaluation,
/// never mutated, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuitabilityResult {
    pub query: String,
    pub matched_name: Option<String>,
    /// Cosine similarity of the match, rounded to 3 decimals.
    pub similarity: Option<f32>,
    /// Fused suitability in `[0, 100]`.
    pub suitability: Option<i32>,
}

impl SuitabilityResult {
    #[inline]
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched_name.is_some()
    }
}

/// Immutable serving snapshot: the cleaned catalog, its precomputed feature
/// matrix, the fitted name matcher, calibration quantiles and the frozen
/// per-concept models.
///
/// Built once (all-or-nothing) before serving starts and shared via `Arc`
/// afterwards; evaluation is lock-free CPU work with no interior mutability.
pub struct Snapshot {
    records: Vec<NutritionRecord>,
    features: Vec<FeatureVector>,
    matcher: NameMatcher,
    calibration: QuantileTable,
    models: ConceptModels,
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

impl Snapshot {
    /// Assemble a snapshot from cleaned records and pre-fit artifacts.
    /// Precomputes the full feature matrix and fits the name matcher here,
    /// at load time, so no extraction happens per request. When the artifact
    /// bundle carried no calibration table, one is fitted from the catalog.
    pub fn build(
        records: Vec<NutritionRecord>,
        models: ConceptModels,
        calibration: Option<QuantileTable>,
        match_config: MatchConfig,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        let features: Vec<FeatureVector> = records.par_iter().map(|r| r.features()).collect();
        let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        let matcher = NameMatcher::fit(names, match_config);
        let calibration = calibration.unwrap_or_else(|| QuantileTable::fit(&records));
        Ok(Self {
            records,
            features,
            matcher,
            calibration,
            models,
        })
    }

    #[inline]
    #[must_use]
    pub fn catalog_size(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn matcher(&self) -> &NameMatcher {
        &self.matcher
    }

    #[inline]
    #[must_use]
    pub fn calibration(&self) -> &QuantileTable {
        &self.calibration
    }

    #[inline]
    #[must_use]
    pub fn record(&self, index: usize) -> Option<&NutritionRecord> {
        self.records.get(index)
    }

    /// Score every item for the concept, preserving input order.
    ///
    /// Matched items are gathered from the precomputed feature matrix and
    /// run through the regression in a single batched call; unmatched items
    /// keep their positions as empty placeholders. Deterministic for a given
    /// snapshot.
    #[must_use]
    pub fn evaluate(&self, concept: Concept, items: &[String]) -> Vec<SuitabilityResult> {
        let matches: Vec<_> = items
            .iter()
            .map(|query| self.matcher.match_top1(query))
            .collect();

        let matched_rows: Vec<FeatureVector> = matches
            .iter()
            .flatten()
            .map(|m| self.features[m.index])
            .collect();
        let predictions = self.models.predict_batch(concept, &matched_rows);
        let mut predictions = predictions.into_iter();

        items
            .iter()
            .zip(matches)
            .map(|(query, matched)| match matched {
                Some(m) => {
                    let prediction = predictions.next().unwrap_or(0.0);
                    let rule = compute_score(concept, &self.records[m.index], Some(&self.calibration));
                    let fused = MODEL_WEIGHT * prediction + RULE_WEIGHT * rule;
                    SuitabilityResult {
                        query: query.clone(),
                        matched_name: Some(m.name),
                        similarity: Some(round3(m.similarity)),
                        suitability: Some(fused.clamp(0.0, 100.0).round() as i32),
                    }
                }
                None => SuitabilityResult {
                    query: query.clone(),
                    matched_name: None,
                    similarity: None,
                    suitability: None,
                },
            })
            .collect()
    }

    /// Evaluate, drop unmatched entries, rank descending by
    /// `(suitability, similarity)` and truncate to `count`.
    #[must_use]
    pub fn recommend(
        &self,
        concept: Concept,
        items: &[String],
        count: usize,
    ) -> Vec<SuitabilityResult> {
        let mut ranked: Vec<SuitabilityResult> = self
            .evaluate(concept, items)
            .into_iter()
            .filter(SuitabilityResult::is_matched)
            .collect();
        ranked.sort_by_key(|r| {
            std::cmp::Reverse((
                r.suitability.unwrap_or(0),
                OrderedFloat(r.similarity.unwrap_or(0.0)),
            ))
        });
        ranked.truncate(count.max(1));
        ranked
    }
}
