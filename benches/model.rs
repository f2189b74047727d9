use bibrecord::{Kind, Name, Record};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_name_parsing(c: &mut Criterion) {
    let input = "Smith, John and de la Vallee Poussin, Charles and Knuth, Donald E.";
    c.bench_function("parse_name_list", |b| {
        b.iter(|| Name::parse_list(black_box(input)));
    });

    c.bench_function("parse_space_form_name", |b| {
        b.iter(|| Name::parse(black_box("Charles Louis Xavier Joseph de la Vallee Poussin")));
    });
}

fn bench_key_generation(c: &mut Criterion) {
    let mut record = Record::builder()
        .kind(Kind::Book)
        .field("author", "Poe, Edgar A. and Hawthorne, Nathaniel")
        .field("title", "Tales and Sketches")
        .field("year", "1996")
        .build();
    record.parse_names();

    c.bench_function("generate_key", |b| {
        b.iter(|| black_box(&record).generate_key());
    });
}

criterion_group!(benches, bench_name_parsing, bench_key_generation);
criterion_main!(benches);
