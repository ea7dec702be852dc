use indexmap::IndexMap;
use morph_core::MorphError;
use morph_space::{Benchmark, CardRef, Parameter, ParameterSpace};

fn coupling(name: &str, low: f64, high: f64) -> Parameter {
    Parameter::new(
        name,
        CardRef {
            block: "dim6".to_string(),
            id: 1,
        },
        vec![2],
        (low, high),
    )
}

fn point(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[test]
fn parameter_names_are_normalized_and_unique() {
    let mut space = ParameterSpace::new();
    space.add_parameter(coupling("c W", 0.0, 1.0)).unwrap();
    assert!(space.parameter("c_W").is_some());

    // a hyphenated spelling collides with the normalized name
    let err = space.add_parameter(coupling("c-W", 0.0, 1.0)).unwrap_err();
    assert!(matches!(err, MorphError::Config(_)));
    assert_eq!(err.info().code, "duplicate-parameter");
}

#[test]
fn invalid_parameter_definitions_are_rejected() {
    let mut space = ParameterSpace::new();
    let err = space.add_parameter(coupling("cH", 2.0, 1.0)).unwrap_err();
    assert_eq!(err.info().code, "invalid-range");

    let mut no_powers = coupling("cH", 0.0, 1.0);
    no_powers.max_powers.clear();
    let err = space.add_parameter(no_powers).unwrap_err();
    assert_eq!(err.info().code, "empty-power-tuple");
}

#[test]
fn benchmarks_must_be_total_over_known_parameters() {
    let mut space = ParameterSpace::new();
    space.add_parameter(coupling("cW", 0.0, 1.0)).unwrap();
    space.add_parameter(coupling("cB", -1.0, 1.0)).unwrap();

    let err = space
        .add_benchmark("partial", point(&[("cW", 0.5)]))
        .unwrap_err();
    assert_eq!(err.info().code, "missing-parameter-value");

    let err = space
        .add_benchmark("alien", point(&[("cW", 0.5), ("cB", 0.0), ("cZ", 1.0)]))
        .unwrap_err();
    assert_eq!(err.info().code, "unknown-parameter");

    space
        .add_benchmark("sm", point(&[("cW", 0.0), ("cB", 0.0)]))
        .unwrap();
    let err = space
        .add_benchmark("sm", point(&[("cW", 1.0), ("cB", 1.0)]))
        .unwrap_err();
    assert_eq!(err.info().code, "duplicate-benchmark");
}

#[test]
fn first_benchmark_becomes_default_until_overridden() {
    let mut space = ParameterSpace::new();
    space.add_parameter(coupling("cW", 0.0, 1.0)).unwrap();
    space.add_benchmark("sm", point(&[("cW", 0.0)])).unwrap();
    space.add_benchmark("bsm", point(&[("cW", 1.0)])).unwrap();
    assert_eq!(space.default_benchmark(), Some("sm"));

    space.set_default_benchmark("bsm").unwrap();
    assert_eq!(space.default_benchmark(), Some("bsm"));

    let err = space.set_default_benchmark("missing").unwrap_err();
    assert_eq!(err.info().code, "unknown-benchmark");
}

#[test]
fn auto_named_benchmarks_follow_insertion_count() {
    let mut space = ParameterSpace::new();
    space.add_parameter(coupling("cW", 0.0, 1.0)).unwrap();
    let first = space.add_benchmark_auto(point(&[("cW", 0.25)])).unwrap();
    let second = space.add_benchmark_auto(point(&[("cW", 0.75)])).unwrap();
    assert_eq!(first, "benchmark_0");
    assert_eq!(second, "benchmark_1");
}

#[test]
fn set_benchmarks_replaces_and_resets_default() {
    let mut space = ParameterSpace::new();
    space.add_parameter(coupling("cW", 0.0, 1.0)).unwrap();
    space.add_benchmark("old", point(&[("cW", 0.0)])).unwrap();

    space
        .set_benchmarks(vec![
            Benchmark::new("a", point(&[("cW", 0.1)])),
            Benchmark::new("b", point(&[("cW", 0.9)])),
        ])
        .unwrap();
    assert_eq!(space.n_benchmarks(), 2);
    assert!(space.benchmark("old").is_none());
    assert_eq!(space.default_benchmark(), Some("a"));
}

#[test]
fn set_parameters_replaces_registry_and_discards_benchmarks() {
    let mut space = ParameterSpace::new();
    space.add_parameter(coupling("cW", 0.0, 1.0)).unwrap();
    space.add_benchmark("sm", point(&[("cW", 0.0)])).unwrap();

    space
        .set_parameters(vec![coupling("cB", -1.0, 1.0), coupling("cHq3", -1.0, 1.0)])
        .unwrap();
    assert_eq!(space.parameter_names(), vec!["cB", "cHq3"]);
    // benchmarks were total over the old registry and do not survive
    assert_eq!(space.n_benchmarks(), 0);
    assert_eq!(space.default_benchmark(), None);

    let err = space
        .set_parameters(vec![coupling("cZ", 0.0, 1.0), coupling("cZ", 0.0, 1.0)])
        .unwrap_err();
    assert_eq!(err.info().code, "duplicate-parameter");
    // the failed replacement left the registry untouched
    assert_eq!(space.parameter_names(), vec!["cB", "cHq3"]);
}

#[test]
fn failed_replacement_keeps_previous_benchmarks() {
    let mut space = ParameterSpace::new();
    space.add_parameter(coupling("cW", 0.0, 1.0)).unwrap();
    space.add_benchmark("old", point(&[("cW", 0.0)])).unwrap();

    let err = space
        .set_benchmarks(vec![Benchmark::new("bad", point(&[("cZ", 1.0)]))])
        .unwrap_err();
    assert_eq!(err.info().code, "unknown-parameter");
    assert_eq!(space.n_benchmarks(), 1);
    assert_eq!(space.default_benchmark(), Some("old"));
}
