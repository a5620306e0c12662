use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use vadacl::prelude::*;

fn company() -> EntitySchema {
    EntitySchema::new("Company")
        .validate(
            "name",
            PropertyValidations::new()
                .rule("required", json!({}))
                .rule("pattern", json!({ "pattern": "[a-zA-Z]+" })),
        )
        .validate(
            "city",
            PropertyValidations::new()
                .rule("required", json!({}))
                .rule("minLength", json!({ "minLength": 2 })),
        )
}

fn compiler() -> RuleCompiler {
    RuleCompiler::new(MessageResolver::new(MessageTable::english()))
}

fn bench_rule_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_compilation");
    let company = company();
    let compiler = compiler();
    let overrides = PropertyValidations::new().rule("maxLength", json!({ "maxLength": 40 }));

    group.bench_function("base_rules", |b| {
        b.iter(|| compiler.apply_rules(Some(&company), Some(black_box("city")), None))
    });

    group.bench_function("with_overrides", |b| {
        b.iter(|| compiler.apply_rules(Some(&company), Some(black_box("city")), Some(&overrides)))
    });

    // Dominated by regex compilation.
    group.bench_function("pattern_rule", |b| {
        b.iter(|| compiler.apply_rules(Some(&company), Some(black_box("name")), None))
    });

    group.bench_function("merge_only", |b| {
        let base = company.property_validations("city").cloned().unwrap_or_default();
        b.iter(|| merge_validations(black_box(&base), Some(&overrides)).len())
    });

    group.finish();
}

fn bench_field_validators(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_validators");
    let compiler = compiler();
    let company = company();

    let name_rules = compiler
        .apply_rules(Some(&company), Some("name"), None)
        .unwrap_or_default();
    let valid = FormControl::new(json!("Acme"));
    let invalid = FormControl::new(json!("Acme 42"));

    group.bench_function("name_valid", |b| {
        b.iter(|| name_rules.iter().filter_map(|v| v(black_box(&valid))).count())
    });

    group.bench_function("name_invalid", |b| {
        b.iter(|| name_rules.iter().filter_map(|v| v(black_box(&invalid))).count())
    });

    group.finish();
}

fn bench_collection_validators(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_validators");
    let compiler = compiler();

    let totals = PropertyValidations::new().rule("totals", json!({ "total": 100 }));
    let totals = compiler
        .apply_collection_rule(None, None, Some(&totals))
        .unwrap_or_default();
    let shares = FormControl::array((0..10).map(|_| FormControl::new(10)));

    group.bench_function("totals_10", |b| {
        b.iter(|| totals.iter().filter_map(|v| v(black_box(&shares))).count())
    });

    let true_count = PropertyValidations::new().rule("withinTrueCount", json!({ "minCount": 1, "maxCount": 3 }));
    let true_count = compiler
        .apply_collection_rule(None, None, Some(&true_count))
        .unwrap_or_default();
    let choices = FormControl::array((0..6).map(|i| FormControl::new(i % 2 == 0)));

    group.bench_function("within_true_count_6", |b| {
        b.iter(|| true_count.iter().filter_map(|v| v(black_box(&choices))).count())
    });

    group.finish();
}

fn bench_form_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("form_updates");
    let compiler = compiler();
    let company = company();
    let rules = |property: &str| {
        compiler
            .apply_rules(Some(&company), Some(property), None)
            .unwrap_or_default()
    };

    let mut form = FormControl::group([
        ("name", FormControl::empty().with_validators(rules("name"))),
        ("city", FormControl::empty().with_validators(rules("city"))),
    ]);

    group.bench_function("set_group_value", |b| {
        b.iter(|| {
            set_control_value(&mut form, black_box(json!({ "name": "Acme", "city": "Richmond" })), true);
            form.valid()
        })
    });

    group.finish();
}

criterion_group!(
    validation_benches,
    bench_rule_compilation,
    bench_field_validators,
    bench_collection_validators,
    bench_form_updates,
);

criterion_main!(validation_benches);
