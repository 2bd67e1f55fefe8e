use crate::concept::{Concept, CONCEPT_COUNT};
use crate::record::{FeatureVector, FEATURE_DIM};

/// Replaces non-finite feature entries with the per-feature median learned
/// at training time.
#[derive(Debug, Clone, PartialEq)]
pub struct MedianImputer {
    medians: FeatureVector,
}

impl MedianImputer {
    #[must_use]
    pub fn new(medians: FeatureVector) -> Self {
        Self { medians }
    }

    pub fn transform(&self, row: &mut FeatureVector) {
        for i in 0..FEATURE_DIM {
            if !row[i].is_finite() {
                row[i] = self.medians[i];
            }
        }
    }
}

/// Zero-mean unit-variance scaling with parameters learned at training time.
/// Zero-variance features pass through unscaled.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: FeatureVector,
    std: FeatureVector,
}

impl StandardScaler {
    #[must_use]
    pub fn new(mean: FeatureVector, std: FeatureVector) -> Self {
        Self { mean, std }
    }

    pub fn transform(&self, row: &mut FeatureVector) {
        for i in 0..FEATURE_DIM {
            let scale = if self.std[i] > 0.0 { self.std[i] } else { 1.0 };
            row[i] = (row[i] - self.mean[i]) / scale;
        }
    }
}

/// Linear regression artifact, frozen after training:
/// `features . coefficients + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeModel {
    coefficients: FeatureVector,
    intercept: f64,
}

impl RidgeModel {
    #[must_use]
    pub fn new(coefficients: FeatureVector, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    #[must_use]
    pub fn predict(&self, row: &FeatureVector) -> f64 {
        row.iter()
            .zip(&self.coefficients)
            .map(|(x, c)| x * c)
            .sum::<f64>()
            + self.intercept
    }
}

/// Pre-fit imputer, scaler and one regression model per concept. Treated as
/// a pure `features -> prediction` function; nothing here ever retrains.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptModels {
    imputer: MedianImputer,
    scaler: StandardScaler,
    models: [RidgeModel; CONCEPT_COUNT],
}

impl ConceptModels {
    /// Models must be given in [`Concept::ALL`] order.
    #[must_use]
    pub fn new(
        imputer: MedianImputer,
        scaler: StandardScaler,
        models: [RidgeModel; CONCEPT_COUNT],
    ) -> Self {
        Self {
            imputer,
            scaler,
            models,
        }
    }

    /// Imputes, scales (in that order) and predicts the whole batch in one
    /// pass with the concept's model.
    #[must_use]
    pub fn predict_batch(&self, concept: Concept, rows: &[FeatureVector]) -> Vec<f64> {
        let model = &self.models[concept as usize];
        rows.iter()
            .map(|row| {
                let mut x = *row;
                self.imputer.transform(&mut x);
                self.scaler.transform(&mut x);
                model.predict(&x)
            })
            .collect()
    }
}
