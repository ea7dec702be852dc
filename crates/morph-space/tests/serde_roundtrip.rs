use indexmap::IndexMap;
use morph_space::{CardRef, Parameter, ParameterSpace};

fn sample_space() -> ParameterSpace {
    let mut space = ParameterSpace::new();
    for (idx, name) in ["cW", "cB", "cHq3"].iter().enumerate() {
        space
            .add_parameter(
                Parameter::new(
                    *name,
                    CardRef {
                        block: "dim6".to_string(),
                        id: idx as u32 + 1,
                    },
                    vec![2, 4],
                    (-10.0, 10.0),
                )
                .with_transform("1e-2 * theta"),
            )
            .unwrap();
    }
    for tag in 0..3 {
        let point: IndexMap<String, f64> = ["cW", "cB", "cHq3"]
            .iter()
            .map(|name| (name.to_string(), tag as f64 * 0.5 - 0.5))
            .collect();
        space.add_benchmark(format!("point_{tag}"), point).unwrap();
    }
    space.set_default_benchmark("point_1").unwrap();
    space
}

#[test]
fn space_round_trips_through_json() {
    let space = sample_space();
    let json = serde_json::to_string_pretty(&space).unwrap();
    let restored: ParameterSpace = serde_json::from_str(&json).unwrap();

    assert_eq!(space, restored);
    assert_eq!(restored.parameter_names(), vec!["cW", "cB", "cHq3"]);
    assert_eq!(restored.default_benchmark(), Some("point_1"));
    assert_eq!(
        space.fingerprint().unwrap(),
        restored.fingerprint().unwrap()
    );
}

#[test]
fn corrupt_records_fail_validation_on_load() {
    let space = sample_space();
    let mut value: serde_json::Value = serde_json::to_value(&space).unwrap();
    // point a benchmark at a parameter that does not exist
    value["benchmarks"][0]["point"]["cZ"] = serde_json::json!(1.0);
    let err = serde_json::from_value::<ParameterSpace>(value).unwrap_err();
    assert!(err.to_string().contains("unknown-parameter"));
}
