//! Deep clone benchmarks
//!
//! Compares the recursive and worklist traversals on wide and deep graphs,
//! and the JSON round trip on the same input.
//!
//! Run with: `cargo bench -p otter-clone`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use otter_clone::json::json_round_trip;
use otter_clone::{
    CloneOptions, JsArray, JsDate, JsObject, JsRegExp, Traversal, Value, deep_clone_with,
};
use std::hint::black_box;

/// `n` records that all point at one shared config object
fn wide_graph(n: usize) -> Value {
    let config = JsObject::new();
    config.set("pattern", Value::regex(JsRegExp::new("^[a-z]+$", "i").unwrap()));
    config.set("created", Value::date(JsDate::from_timestamp_millis(0).unwrap()));
    let config = Value::object(config);

    let records = JsArray::with_capacity(n);
    for i in 0..n {
        let record = JsObject::new();
        record.set("id", Value::number(i as f64));
        record.set("name", Value::string("record"));
        record.set(
            "tags",
            Value::array(JsArray::from_vec(vec![Value::from("a"), Value::from("b")])),
        );
        record.set("config", config.clone());
        records.push(Value::object(record));
    }
    Value::array(records)
}

fn clone_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_clone");

    for n in [100, 1_000, 10_000].iter() {
        let source = wide_graph(*n);
        for traversal in [Traversal::Recursive, Traversal::Worklist] {
            let options = CloneOptions::new().with_traversal(traversal);
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", traversal), n),
                &source,
                |b, source| b.iter(|| black_box(deep_clone_with(source, options))),
            );
        }
        group.bench_with_input(BenchmarkId::new("json_round_trip", n), &source, |b, source| {
            b.iter(|| black_box(json_round_trip(source).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, clone_benchmark);
criterion_main!(benches);
