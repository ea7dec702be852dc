use indexmap::IndexMap;
use morph_basis::enumerate_components;
use morph_core::MorphError;
use morph_space::{CardRef, Parameter, ParameterSpace};

fn space_with(parameters: &[(&str, Vec<u32>)]) -> ParameterSpace {
    let mut space = ParameterSpace::new();
    for (idx, (name, powers)) in parameters.iter().enumerate() {
        space
            .add_parameter(Parameter::new(
                *name,
                CardRef {
                    block: "dim6".to_string(),
                    id: idx as u32 + 1,
                },
                powers.clone(),
                (-1.0, 1.0),
            ))
            .unwrap();
    }
    space
}

fn point(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[test]
fn single_parameter_yields_budget_plus_one_components() {
    let space = space_with(&[("g", vec![2])]);
    let components = enumerate_components(&space, &[2]).unwrap();
    assert_eq!(components.len(), 3);
    let exponents: Vec<u32> = components.iter().map(|c| c.power("g").unwrap()).collect();
    assert_eq!(exponents, vec![0, 1, 2]);
}

#[test]
fn enumeration_is_order_stable() {
    let space = space_with(&[("cW", vec![2]), ("cB", vec![2])]);
    let first = enumerate_components(&space, &[2]).unwrap();
    let second = enumerate_components(&space, &[2]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn per_parameter_budget_caps_exponents() {
    let space = space_with(&[("g", vec![1])]);
    let components = enumerate_components(&space, &[3]).unwrap();
    let exponents: Vec<u32> = components.iter().map(|c| c.power("g").unwrap()).collect();
    assert_eq!(exponents, vec![0, 1]);
}

#[test]
fn overall_budget_caps_the_exponent_sum() {
    let space = space_with(&[("cW", vec![2]), ("cB", vec![2])]);
    let components = enumerate_components(&space, &[2]).unwrap();
    let pairs: Vec<(u32, u32)> = components
        .iter()
        .map(|c| (c.power("cW").unwrap(), c.power("cB").unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (2, 0)]
    );
    assert!(components.iter().all(|c| c.degree() <= 2));
}

#[test]
fn empty_registry_yields_the_constant_component() {
    let space = ParameterSpace::new();
    let components = enumerate_components(&space, &[4]).unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].degree(), 0);
    assert_eq!(components[0].evaluate(&point(&[])).unwrap(), 1.0);
}

#[test]
fn configurations_are_concatenated_in_order() {
    let space = space_with(&[("g", vec![2, 1])]);
    let components = enumerate_components(&space, &[2, 1]).unwrap();
    assert_eq!(components.len(), 5);
    let tags: Vec<usize> = components.iter().map(|c| c.configuration).collect();
    assert_eq!(tags, vec![0, 0, 0, 1, 1]);
}

#[test]
fn short_power_tuples_are_a_configuration_error() {
    let space = space_with(&[("g", vec![2])]);
    let err = enumerate_components(&space, &[2, 2]).unwrap_err();
    assert!(matches!(err, MorphError::Config(_)));
    assert_eq!(err.info().code, "power-tuple-too-short");
}

#[test]
fn empty_budget_slice_is_rejected() {
    let space = space_with(&[("g", vec![2])]);
    let err = enumerate_components(&space, &[]).unwrap_err();
    assert_eq!(err.info().code, "empty-configurations");
}

#[test]
fn evaluation_handles_zero_bases_and_powers() {
    let space = space_with(&[("g", vec![3])]);
    let components = enumerate_components(&space, &[3]).unwrap();

    // exponent 0 contributes 1 for any base, including 0^0
    assert_eq!(components[0].evaluate(&point(&[("g", 0.0)])).unwrap(), 1.0);
    assert_eq!(components[0].evaluate(&point(&[("g", -7.5)])).unwrap(), 1.0);

    assert_eq!(components[3].evaluate(&point(&[("g", 2.0)])).unwrap(), 8.0);
    assert_eq!(components[2].evaluate(&point(&[("g", -3.0)])).unwrap(), 9.0);

    let err = components[1].evaluate(&point(&[])).unwrap_err();
    assert_eq!(err.info().code, "missing-parameter-value");
}
