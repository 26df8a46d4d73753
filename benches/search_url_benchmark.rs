use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{thread_rng, Rng};
use serde_json::json;
use tour_search::{build_search_url, default_criteria_on, SearchForm};

// URL building and form normalization for criteria of growing list sizes
pub fn search_url_benchmark(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let mut group = c.benchmark_group("search_url");

    for list_len in [1usize, 10, 100].iter() {
        let mut rng = thread_rng();
        let regions: Vec<u32> = (0..*list_len).map(|_| rng.gen_range(1..10_000)).collect();
        let delimited = regions
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(":");

        let mut criteria = default_criteria_on(today);
        criteria.region = Some(regions.clone());

        group.bench_with_input(
            BenchmarkId::new("build", list_len),
            &criteria,
            |b, criteria| b.iter(|| black_box(build_search_url(criteria, Some(2)))),
        );

        let input = json!({
            "country": "10",
            "region": delimited,
            "from_city": "99",
            "adult_amount": "2",
            "child_age": regions,
        });
        group.bench_with_input(BenchmarkId::new("normalize", list_len), &input, |b, input| {
            b.iter(|| {
                let form: SearchForm = serde_json::from_value(input.clone()).unwrap();
                black_box(form.into_criteria_on(today).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, search_url_benchmark);
criterion_main!(benches);
