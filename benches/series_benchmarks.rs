use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use scorebook::config::Config;
use scorebook::engine::math::smooth;
use scorebook::engine::series::{SeriesOptions, build_chart_series};
use scorebook::funbox::FunboxRegistry;
use scorebook::mode::{Difficulty, Mode};
use scorebook::report::{ResultContext, ResultFlags, Tag, finalize_result};
use scorebook::result::{CharClassCounts, TestResult};
use scorebook::store::ledger::{Fingerprint, RecordMetrics};
use scorebook::store::{Ledger, MemoryStore};
use scorebook::units::UnitRegistry;

fn make_result(sample_count: usize) -> TestResult {
    let speed_samples: Vec<f64> = (0..sample_count)
        .map(|i| 70.0 + (i % 17) as f64 - 8.0)
        .collect();
    let raw_samples: Vec<f64> = (0..sample_count)
        .map(|i| 76.0 + (i % 13) as f64 - 6.0)
        .collect();
    let error_samples: Vec<u32> = (0..sample_count).map(|i| (i % 9 == 0) as u32).collect();

    TestResult {
        mode: Mode::Time,
        submode: sample_count.to_string(),
        speed: 81.3,
        raw_speed: 85.3,
        accuracy: 96.5,
        consistency: 70.0,
        key_consistency: 62.0,
        duration_seconds: sample_count as f64,
        afk_seconds: 0.0,
        char_counts: CharClassCounts::default(),
        speed_samples,
        raw_samples,
        error_samples,
        punctuation: false,
        numbers: false,
        blind: false,
        lazy_mode: false,
        bailed_out: false,
        difficulty: Difficulty::Normal,
        language: "english".to_string(),
        funbox: Vec::new(),
        timestamp: Utc::now(),
    }
}

fn bench_chart_series(c: &mut Criterion) {
    let registry = UnitRegistry::new();
    let unit = registry.get("wpm").unwrap();
    let result = make_result(120);

    c.bench_function("build_chart_series (120 samples)", |b| {
        b.iter(|| build_chart_series(black_box(&result), unit, SeriesOptions::default()))
    });
}

fn bench_smoothing(c: &mut Criterion) {
    let values: Vec<f64> = (0..600).map(|i| 70.0 + (i % 23) as f64).collect();

    c.bench_function("smooth (600 samples, radius 1)", |b| {
        b.iter(|| smooth(black_box(&values), 1))
    });
}

fn bench_finalize(c: &mut Criterion) {
    let config = Config::default();
    let units = UnitRegistry::new();
    let funbox = FunboxRegistry::new();
    let tags = vec![
        Tag {
            id: "t1".to_string(),
            display: "daily".to_string(),
        },
        Tag {
            id: "t2".to_string(),
            display: "fresh".to_string(),
        },
    ];
    let ctx = ResultContext {
        config: &config,
        units: &units,
        funbox: &funbox,
        tags: &tags,
        dont_save: false,
        flags: ResultFlags::default(),
    };

    // Seed a faster record so the bench path reads but never writes
    let result = make_result(60);
    let mut seeded = result.clone();
    seeded.speed = 120.0;
    let mut ledger = Ledger::new(MemoryStore::new());
    ledger
        .consider_update(
            &Fingerprint::of(&seeded),
            RecordMetrics::of(&seeded),
            seeded.timestamp,
        )
        .unwrap();

    c.bench_function("finalize_result (60 samples, 2 tags)", |b| {
        b.iter(|| finalize_result(black_box(&result), &ctx, &mut ledger))
    });
}

criterion_group!(benches, bench_chart_series, bench_smoothing, bench_finalize);
criterion_main!(benches);
