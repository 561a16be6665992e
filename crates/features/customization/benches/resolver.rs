use bindery_customization::prelude::*;
use bindery_kernel::domain::catalog::{Dependency, Group, GroupId, GroupKind, OptionId, Product, ProductOption};
use bindery_kernel::domain::money::Money;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// `width` independent chains of `depth` single-select groups; each link requires option
/// "on" of the previous one.
fn chains(width: usize, depth: usize) -> Schema {
    let options = || {
        ["on", "off"]
            .iter()
            .map(|o| ProductOption::new(OptionId::new(*o), *o, Money::new(10)))
            .collect()
    };

    let mut groups = Vec::with_capacity(width * depth);
    for chain in 0..width {
        for link in 0..depth {
            let name = format!("c{chain}-{link}");
            let mut group = Group::new(GroupId::new(&name), &name, GroupKind::SingleSelect { options: options() });
            if link > 0 {
                group.depends_on = Some(Dependency::new(format!("c{chain}-{}", link - 1), "on"));
            }
            groups.push(group);
        }
    }

    validate_schema(Product { base_price: Money::new(1000), groups }).expect("bench product is valid")
}

/// Every group answered "on", so everything is visible.
fn all_on(schema: &Schema) -> SelectionState {
    schema
        .ordered_groups()
        .map(|g| (g.name.clone(), SelectionValue::single("on")))
        .collect()
}

fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");

    for (label, width, depth) in [("10x5", 10, 5), ("50x20", 50, 20), ("100x50", 100, 50)] {
        let schema = chains(width, depth);
        let state = all_on(&schema);
        group.throughput(Throughput::Elements((width * depth) as u64));

        group.bench_with_input(BenchmarkId::new("visibility", label), &state, |b, s| {
            b.iter(|| black_box(resolve_visibility(schema.graph(), s).len()));
        });

        group.bench_with_input(BenchmarkId::new("total", label), &state, |b, s| {
            b.iter(|| black_box(compute_total(&schema, s)));
        });

        // Switching the first root off cascades through its whole chain.
        group.bench_with_input(BenchmarkId::new("cascade", label), &state, |b, s| {
            b.iter(|| {
                let next = set_selection(&schema, s, "c0-0", SelectionValue::single("off")).expect("accepted");
                black_box(next.len())
            });
        });

        group.bench_function(BenchmarkId::new("validate_schema", label), |b| {
            b.iter(|| black_box(validate_schema(schema.product().clone()).is_ok()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolver);
criterion_main!(benches);
