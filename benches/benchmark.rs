use criterion::{criterion_group, criterion_main, Criterion};
use occupation_similarity::{aggregate, SimilarityMatrix, SimilarityOptions, SkillRecord, TFIDFVectorizer};

const WORDS: &[&str] = &[
    "sql", "python", "excel", "triage", "charting", "budget", "payroll", "rust", "audit", "logistics",
    "safety", "tableau", "contracting", "procurement", "cybersecurity", "networking", "statistics",
    "forecasting", "welding", "inspection",
];

/// deterministic synthetic dataset: `occupations` occupations, 12 skills each
fn synthetic_records(occupations: usize) -> Vec<SkillRecord> {
    let mut state = 0x1234_5678u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state as usize
    };
    let mut records = Vec::with_capacity(occupations * 12);
    for occ in 0..occupations {
        for _ in 0..12 {
            let a = WORDS[next() % WORDS.len()];
            let b = WORDS[next() % WORDS.len()];
            records.push(SkillRecord::new(format!("occupation {occ}"), format!("{a} {b}")));
        }
    }
    records
}

fn similarity_benchmark(c: &mut Criterion) {
    let records = synthetic_records(500);
    let docs = aggregate(&records);
    let vectorizer: TFIDFVectorizer = TFIDFVectorizer::default();

    c.bench_function("aggregate_500", |b| b.iter(|| aggregate(&records)));
    c.bench_function("fit_500", |b| b.iter(|| vectorizer.fit(&docs).unwrap()));

    let fitted = vectorizer.fit(&docs).unwrap();
    c.bench_function("matrix_500_parallel", |b| {
        b.iter(|| SimilarityMatrix::compute(&fitted, &SimilarityOptions::default()).unwrap())
    });
    let sequential = SimilarityOptions { parallel: false, ..Default::default() };
    c.bench_function("matrix_500_sequential", |b| {
        b.iter(|| SimilarityMatrix::compute(&fitted, &sequential).unwrap())
    });
    let matrix = SimilarityMatrix::compute(&fitted, &sequential).unwrap();
    c.bench_function("top_k_lookup", |b| b.iter(|| matrix.top_k("Occupation 42", 10, false).unwrap()));
}

criterion_group!(benches, similarity_benchmark);
criterion_main!(benches);
