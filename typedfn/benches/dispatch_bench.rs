//! Dispatch benchmarks.
//!
//! Measures the cost of selecting a signature for small fixed arities, for
//! unions, for variadic calls, and for the no-match diagnostic path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use typedfn::{Signatures, Typed, TypedFunction, Value};

fn build_fixture(typed: &Typed) -> TypedFunction {
    typed
        .build((
            "bench",
            Signatures::new()
                .with("number", |_| Ok(Value::Null))
                .with("number, number", |_| Ok(Value::Null))
                .with("string | boolean, number, null", |_| Ok(Value::Null))
                .with("Array | Object | Date | RegExp", |_| Ok(Value::Null))
                .with("string, number...", |_| Ok(Value::Null)),
        ))
        .expect("fixture compiles")
}

fn bench_fixed(c: &mut Criterion) {
    let typed = Typed::create();
    let f = build_fixture(&typed);

    c.bench_function("dispatch_first_signature", |b| {
        b.iter(|| f.call(black_box(vec![Value::Number(1.0)])))
    });

    c.bench_function("dispatch_three_params", |b| {
        b.iter(|| {
            f.call(black_box(vec![
                Value::Boolean(true),
                Value::Number(1.0),
                Value::Null,
            ]))
        })
    });

    c.bench_function("dispatch_union_of_four", |b| {
        b.iter(|| f.call(black_box(vec![Value::RegExp("a".to_string())])))
    });
}

fn bench_variadic(c: &mut Criterion) {
    let typed = Typed::create();
    let f = build_fixture(&typed);
    let args: Vec<Value> = std::iter::once(Value::from("x"))
        .chain((0..16).map(Value::from))
        .collect();

    c.bench_function("dispatch_variadic_16", |b| {
        b.iter(|| f.call(black_box(args.clone())))
    });
}

fn bench_no_match(c: &mut Criterion) {
    let typed = Typed::create();
    let f = build_fixture(&typed);

    c.bench_function("dispatch_no_match", |b| {
        b.iter(|| f.call(black_box(vec![Value::Undefined, Value::Undefined])))
    });
}

fn bench_build(c: &mut Criterion) {
    let typed = Typed::create();
    c.bench_function("build_five_signatures", |b| b.iter(|| build_fixture(black_box(&typed))));
}

criterion_group!(benches, bench_fixed, bench_variadic, bench_no_match, bench_build);
criterion_main!(benches);
