// Matching and scoring throughput across catalog sizes.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;

use mealfit_core::{
    Concept, ConceptModels, MatchConfig, MatchStrategy, MedianImputer, NameMatcher,
    NutritionRecord, RidgeModel, Snapshot, StandardScaler, CONCEPT_COUNT, FEATURE_DIM,
};

const SYLLABLES: &[&str] = &[
    "김", "치", "찌", "개", "된", "장", "국", "밥", "불", "고", "기", "닭", "갈", "비", "볶",
    "음", "탕", "수", "육", "전", "골", "냉", "면", "만", "두",
];

fn random_name(rng: &mut impl Rng) -> String {
    let len = rng.random_range(2..=6);
    (0..len)
        .map(|_| SYLLABLES[rng.random_range(0..SYLLABLES.len())])
        .collect()
}

fn random_record(rng: &mut impl Rng) -> NutritionRecord {
    NutritionRecord {
        kcal: Some(rng.random_range(50.0..800.0)),
        protein: Some(rng.random_range(1.0..40.0)),
        fat: Some(rng.random_range(0.5..30.0)),
        carbs: Some(rng.random_range(1.0..80.0)),
        sugar: Some(rng.random_range(0.0..30.0)),
        fiber: Some(rng.random_range(0.0..10.0)),
        sodium: Some(rng.random_range(10.0..2000.0)),
        sat_fat: Some(rng.random_range(0.1..12.0)),
        ..NutritionRecord::named(random_name(rng))
    }
}

fn identity_models() -> ConceptModels {
    let models: [RidgeModel; CONCEPT_COUNT] =
        std::array::from_fn(|_| RidgeModel::new([0.0; FEATURE_DIM], 50.0));
    ConceptModels::new(
        MedianImputer::new([0.0; FEATURE_DIM]),
        StandardScaler::new([0.0; FEATURE_DIM], [1.0; FEATURE_DIM]),
        models,
    )
}

fn benchmark_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_top1");

    for size in [100usize, 1000, 10000].iter() {
        let mut rng = StdRng::seed_from_u64(42);
        let names: Vec<String> = (0..*size).map(|_| random_name(&mut rng)).collect();
        let queries: Vec<String> = (0..100).map(|_| random_name(&mut rng)).collect();

        for (label, strategy) in [("linear", MatchStrategy::Linear), ("graph", MatchStrategy::Graph)]
        {
            let matcher = NameMatcher::fit(
                names.clone(),
                MatchConfig {
                    strategy,
                    ef_search: 64,
                },
            );
            group.bench_with_input(
                BenchmarkId::new(label, size),
                &queries,
                |b, queries| {
                    b.iter(|| {
                        for query in queries {
                            black_box(matcher.match_top1(query));
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

fn benchmark_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for size in [1000usize, 10000].iter() {
        let mut rng = StdRng::seed_from_u64(42);
        let records: Vec<NutritionRecord> = (0..*size).map(|_| random_record(&mut rng)).collect();
        let items: Vec<String> = (0..100).map(|_| random_name(&mut rng)).collect();

        let snapshot =
            Snapshot::build(records, identity_models(), None, MatchConfig::default()).unwrap();

        group.bench_with_input(BenchmarkId::new("batch_100", size), &items, |b, items| {
            b.iter(|| black_box(snapshot.evaluate(Concept::Diet, items)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_match, benchmark_evaluate);
criterion_main!(benches);
