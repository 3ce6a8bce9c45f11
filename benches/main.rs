use codspeed_criterion_compat::*;
use css_sheet_parser::parse_stylesheet;

const SAMPLE: &str = include_str!("../fixtures/sample.css");

fn benchmark(c: &mut Criterion) {
    c.bench_function("sample", |b| {
        b.iter(|| parse_stylesheet(black_box(SAMPLE)))
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
