use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;

use mealfit_core::{
    Concept, ConceptModels, Error, FeatureVector, MedianImputer, QuantileTable, Quantiles, Result,
    RidgeModel, Signal, StandardScaler, CONCEPT_COUNT, FEATURE_DIM, SIGNAL_COUNT,
};

/// On-disk layout of the trained bundle. The byte format is an input
/// boundary owned by the offline training job; only the logical transform
/// and predict parameters matter here.
#[derive(Debug, Deserialize)]
struct RawBundle {
    imputer: RawImputer,
    scaler: RawScaler,
    models: AHashMap<String, RawModel>,
    #[serde(default)]
    calibration: Option<AHashMap<String, Quantiles>>,
}

#[derive(Debug, Deserialize)]
struct RawImputer {
    medians: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Validated artifacts, ready for snapshot assembly.
pub struct ArtifactBundle {
    pub models: ConceptModels,
    pub calibration: Option<QuantileTable>,
}

fn to_feature_vector(values: Vec<f64>) -> Result<FeatureVector> {
    <FeatureVector>::try_from(values.as_slice()).map_err(|_| Error::InvalidDimension {
        expected: FEATURE_DIM,
        actual: values.len(),
    })
}

/// Read and validate the artifact bundle. Any defect - wrong vector
/// dimension, missing concept model, incomplete calibration - fails the
/// whole load; artifacts are never partially accepted.
pub fn load_artifacts(path: &Path) -> Result<ArtifactBundle> {
    let raw = std::fs::read_to_string(path)?;
    let bundle: RawBundle =
        serde_json::from_str(&raw).map_err(|e| Error::Serialization(e.to_string()))?;

    let imputer = MedianImputer::new(to_feature_vector(bundle.imputer.medians)?);
    let scaler = StandardScaler::new(
        to_feature_vector(bundle.scaler.mean)?,
        to_feature_vector(bundle.scaler.std)?,
    );

    let mut models = Vec::with_capacity(CONCEPT_COUNT);
    for concept in Concept::ALL {
        let raw_model = bundle
            .models
            .get(concept.as_str())
            .ok_or_else(|| Error::Artifact(format!("missing model for concept {concept}")))?;
        models.push(RidgeModel::new(
            to_feature_vector(raw_model.coefficients.clone())?,
            raw_model.intercept,
        ));
    }
    let models: [RidgeModel; CONCEPT_COUNT] = models
        .try_into()
        .map_err(|_| Error::Artifact("model table size mismatch".to_string()))?;

    let calibration = match bundle.calibration {
        Some(table) => {
            let mut quantiles = [Quantiles::EMPTY; SIGNAL_COUNT];
            for signal in Signal::ALL {
                let q = table.get(signal.key()).ok_or_else(|| {
                    Error::Artifact(format!("calibration missing signal {}", signal.key()))
                })?;
                quantiles[signal as usize] = *q;
            }
            Some(QuantileTable::from_quantiles(quantiles))
        }
        None => None,
    };

    Ok(ArtifactBundle {
        models: ConceptModels::new(imputer, scaler, models),
        calibration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_bundle(json: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.to_string().as_bytes()).unwrap();
        file
    }

    fn valid_bundle() -> serde_json::Value {
        let zeros = vec![0.0; FEATURE_DIM];
        let ones = vec![1.0; FEATURE_DIM];
        let mut models = serde_json::Map::new();
        for concept in Concept::ALL {
            models.insert(
                concept.as_str().to_string(),
                serde_json::json!({"coefficients": zeros, "intercept": 50.0}),
            );
        }
        serde_json::json!({
            "imputer": {"medians": zeros},
            "scaler": {"mean": zeros, "std": ones},
            "models": models,
        })
    }

    #[test]
    fn test_load_valid_bundle() {
        let file = write_bundle(&valid_bundle());
        let bundle = load_artifacts(file.path()).unwrap();
        assert!(bundle.calibration.is_none());
        let preds = bundle
            .models
            .predict_batch(Concept::Keto, &[[0.0; FEATURE_DIM]]);
        assert_eq!(preds, vec![50.0]);
    }

    #[test]
    fn test_wrong_dimension_fails() {
        let mut bundle = valid_bundle();
        bundle["imputer"]["medians"] = serde_json::json!(vec![0.0; FEATURE_DIM - 1]);
        let file = write_bundle(&bundle);
        let err = load_artifacts(file.path()).err().unwrap();
        assert!(matches!(
            err,
            Error::InvalidDimension {
                expected: FEATURE_DIM,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_missing_concept_model_fails() {
        let mut bundle = valid_bundle();
        bundle["models"].as_object_mut().unwrap().remove("bulking");
        let file = write_bundle(&bundle);
        let err = load_artifacts(file.path()).err().unwrap();
        assert!(matches!(err, Error::Artifact(_)));
    }

    #[test]
    fn test_partial_calibration_fails() {
        let mut bundle = valid_bundle();
        bundle["calibration"] = serde_json::json!({
            "kcal": {"p10": 50.0, "p25": 120.0, "p50": 250.0, "p75": 420.0, "p90": 600.0}
        });
        let file = write_bundle(&bundle);
        let err = load_artifacts(file.path()).err().unwrap();
        assert!(matches!(err, Error::Artifact(_)));
    }

    #[test]
    fn test_complete_calibration_loads() {
        let mut bundle = valid_bundle();
        let mut calibration = serde_json::Map::new();
        for signal in Signal::ALL {
            calibration.insert(
                signal.key().to_string(),
                serde_json::json!({"p10": 0.0, "p25": 1.0, "p50": 2.0, "p75": 3.0, "p90": 4.0}),
            );
        }
        bundle["calibration"] = serde_json::Value::Object(calibration);
        let file = write_bundle(&bundle);
        let loaded = load_artifacts(file.path()).unwrap();
        let table = loaded.calibration.unwrap();
        assert_eq!(table.get(Signal::Sodium).p90, 4.0);
    }
}
