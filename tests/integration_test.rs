//! End-to-end tests over the full load-match-score pipeline.

use std::io::Write;
use std::sync::Arc;

use mealfit::prelude::*;
use mealfit_core::FEATURE_DIM;

fn write_json(value: &serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    file
}

fn fixture_catalog() -> serde_json::Value {
    serde_json::json!([
        {"name": "닭가슴살 샐러드", "kcal": 180.0, "protein": 25.0, "fat": 4.0,
         "carbs": 8.0, "sugar": 2.0, "fiber": 3.0, "sodium": 120.0, "sat_fat": 1.0},
        {"name": "김치찌개", "kcal": 250.0, "protein": 15.0, "fat": 12.0,
         "carbs": 10.0, "sugar": 3.0, "fiber": 2.0, "sodium": 1100.0, "sat_fat": 4.0},
        {"name": "연어 스테이크", "kcal": 320.0, "protein": 28.0, "fat": 18.0,
         "carbs": 2.0, "sugar": 0.5, "fiber": 0.5, "sodium": 200.0, "sat_fat": 3.5},
        {"name": "초코 케이크", "kcal": 450.0, "protein": 5.0, "fat": 22.0,
         "carbs": 58.0, "sugar": 38.0, "fiber": 1.5, "sodium": 280.0, "sat_fat": 12.0},
        {"name": "현미밥", "kcal": 310.0, "protein": 6.0, "fat": 2.0,
         "carbs": 65.0, "sugar": 1.0, "fiber": 3.0, "sodium": 10.0, "sat_fat": 0.4},
    ])
}

fn fixture_artifacts(medians_len: usize) -> serde_json::Value {
    let medians = vec![0.0; medians_len];
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
        "imputer": {"medians": medians},
        "scaler": {"mean": zeros, "std": ones},
        "models": models,
    })
}

fn loaded_store() -> (Arc<ArtifactStore>, Vec<tempfile::NamedTempFile>) {
    let catalog = write_json(&fixture_catalog());
    let artifacts = write_json(&fixture_artifacts(FEATURE_DIM));
    let store = Arc::new(ArtifactStore::new(StoreConfig {
        catalog_path: catalog.path().to_path_buf(),
        artifacts_path: artifacts.path().to_path_buf(),
        match_config: MatchConfig::default(),
    }));
    store.load().unwrap();
    (store, vec![catalog, artifacts])
}

#[test]
fn test_store_not_ready_until_loaded() {
    let catalog = write_json(&fixture_catalog());
    let artifacts = write_json(&fixture_artifacts(FEATURE_DIM));
    let store = ArtifactStore::new(StoreConfig {
        catalog_path: catalog.path().to_path_buf(),
        artifacts_path: artifacts.path().to_path_buf(),
        match_config: MatchConfig::default(),
    });

    let err = store
        .recommend("keto", &["김치찌개".to_string()], 5)
        .unwrap_err();
    assert!(matches!(err, Error::NotReady));

    store.load().unwrap();
    let results = store
        .recommend("keto", &["김치찌개".to_string()], 5)
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn test_exact_name_matches_with_full_similarity() {
    let (store, _files) = loaded_store();
    let snapshot = store.snapshot().unwrap();

    let results = snapshot.evaluate(Concept::Diet, &["연어 스테이크".to_string()]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matched_name.as_deref(), Some("연어 스테이크"));
    assert_eq!(results[0].similarity, Some(1.0));
    assert!(results[0].suitability.is_some());
}

#[test]
fn test_unmatched_items_keep_position() {
    let (store, _files) = loaded_store();
    let snapshot = store.snapshot().unwrap();

    let items = vec![
        "김치찌개".to_string(),
        "xyzw".to_string(),
        "현미밥".to_string(),
    ];
    let results = snapshot.evaluate(Concept::LowSodium, &items);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].query, "김치찌개");
    assert!(results[0].is_matched());
    assert_eq!(results[1].query, "xyzw");
    assert!(!results[1].is_matched());
    assert_eq!(results[1].suitability, None);
    assert!(results[2].is_matched());
}

#[test]
fn test_recommend_ranks_and_truncates() {
    let (store, _files) = loaded_store();

    let items: Vec<String> = [
        "닭가슴살 샐러드",
        "김치찌개",
        "연어 스테이크",
        "초코 케이크",
        "현미밥",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let results = store.recommend("low_sodium", &items, 3).unwrap();
    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].suitability.unwrap() >= pair[1].suitability.unwrap());
    }
    // 1100mg sodium is over the hard threshold, so the stew cannot make
    // the cut over the three lowest-sodium dishes.
    assert!(results
        .iter()
        .all(|r| r.matched_name.as_deref() != Some("김치찌개")));
}

#[test]
fn test_recommend_count_floors_at_one() {
    let (store, _files) = loaded_store();
    let results = store
        .recommend("diet", &["현미밥".to_string(), "김치찌개".to_string()], 0)
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn test_unknown_concept_is_rejected() {
    let (store, _files) = loaded_store();
    let err = store
        .recommend("paleo", &["김치찌개".to_string()], 5)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownConcept(name) if name == "paleo"));
}

#[test]
fn test_evaluation_is_idempotent() {
    let (store, _files) = loaded_store();
    let snapshot = store.snapshot().unwrap();
    let items = vec!["초코 케이크".to_string(), "연어 스테이크".to_string()];

    let first = snapshot.evaluate(Concept::Keto, &items);
    let second = snapshot.evaluate(Concept::Keto, &items);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.suitability, b.suitability);
        assert_eq!(a.similarity, b.similarity);
        assert_eq!(a.matched_name, b.matched_name);
    }
}

#[test]
fn test_batch_matches_single_queries() {
    let (store, _files) = loaded_store();
    let snapshot = store.snapshot().unwrap();
    let items = vec![
        "닭가슴살 샐러드".to_string(),
        "초코 케이크".to_string(),
        "현미밥".to_string(),
    ];

    let batch = snapshot.evaluate(Concept::Bulking, &items);
    for (item, batched) in items.iter().zip(&batch) {
        let single = snapshot.evaluate(Concept::Bulking, std::slice::from_ref(item));
        assert_eq!(single[0].suitability, batched.suitability);
        assert_eq!(single[0].matched_name, batched.matched_name);
    }
}

#[test]
fn test_empty_catalog_fails_load() {
    let catalog = write_json(&serde_json::json!([]));
    let artifacts = write_json(&fixture_artifacts(FEATURE_DIM));
    let store = ArtifactStore::new(StoreConfig {
        catalog_path: catalog.path().to_path_buf(),
        artifacts_path: artifacts.path().to_path_buf(),
        match_config: MatchConfig::default(),
    });
    let err = store.load().unwrap_err();
    assert!(matches!(err, Error::EmptyCatalog));
    let err = store
        .recommend("diet", &["현미밥".to_string()], 5)
        .unwrap_err();
    assert!(matches!(err, Error::NotReady));
}

#[test]
fn test_wrong_artifact_dimension_fails_load() {
    let catalog = write_json(&fixture_catalog());
    let artifacts = write_json(&fixture_artifacts(FEATURE_DIM - 1));
    let store = ArtifactStore::new(StoreConfig {
        catalog_path: catalog.path().to_path_buf(),
        artifacts_path: artifacts.path().to_path_buf(),
        match_config: MatchConfig::default(),
    });
    let err = store.load().unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidDimension {
            expected: FEATURE_DIM,
            actual: 8
        }
    ));
}

#[test]
fn test_graph_strategy_matches_exact_names() {
    let catalog = write_json(&fixture_catalog());
    let artifacts = write_json(&fixture_artifacts(FEATURE_DIM));
    let store = ArtifactStore::new(StoreConfig {
        catalog_path: catalog.path().to_path_buf(),
        artifacts_path: artifacts.path().to_path_buf(),
        match_config: MatchConfig {
            strategy: MatchStrategy::Graph,
            ef_search: 64,
        },
    });
    store.load().unwrap();

    let results = store
        .recommend("glycemic", &["현미밥".to_string()], 5)
        .unwrap();
    assert_eq!(results[0].matched_name.as_deref(), Some("현미밥"));
    assert_eq!(results[0].similarity, Some(1.0));
}
