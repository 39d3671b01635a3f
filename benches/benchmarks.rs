use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use review_keywords::{
    extract_keywords, AnalysisConfig, SentimentLabel, StreamingAggregator, TextRecord,
    WhitespaceAnalyzer,
};

const WORDS: &[&str] = &[
    "battery", "screen", "camera", "great", "terrible", "fast", "slow", "배터리", "화면", "카메라",
    "좋아요", "별로", "delivery", "price", "quality",
];

fn make_records(n: usize) -> Vec<TextRecord> {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    (0..n)
        .map(|_| {
            let len = rng.gen_range(5..30);
            let content = (0..len)
                .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
                .collect::<Vec<_>>()
                .join(" ");
            let label = SentimentLabel::ALL[rng.gen_range(0..3)];
            TextRecord::new(content, rng.gen_range(1..=5), label)
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let records = make_records(10_000);
    let texts: Vec<&str> = records.iter().map(|r| r.content.as_str()).collect();

    let mut group = c.benchmark_group("extract");
    for batch_size in [100usize, 1_000, 10_000] {
        let config = AnalysisConfig {
            batch_size,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &config, |b, cfg| {
            b.iter(|| extract_keywords(&WhitespaceAnalyzer, black_box(&texts), cfg).unwrap())
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let records = make_records(10_000);
    let texts: Vec<&str> = records.iter().map(|r| r.content.as_str()).collect();
    let keywords =
        extract_keywords(&WhitespaceAnalyzer, &texts, &AnalysisConfig::default()).unwrap();

    let mut group = c.benchmark_group("aggregate");
    for chunk_size in [100usize, 1_000, 10_000] {
        let aggregator = StreamingAggregator::new(chunk_size).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &aggregator,
            |b, agg| b.iter(|| agg.aggregate(black_box(&records), &keywords).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_extract, bench_aggregate);
criterion_main!(benches);
