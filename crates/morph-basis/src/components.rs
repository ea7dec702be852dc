use indexmap::IndexMap;
use morph_core::errors::{ErrorInfo, MorphError};
use morph_space::{ParameterPoint, ParameterSpace};
use serde::{Deserialize, Serialize};

/// One monomial in the polynomial expansion of the squared amplitude.
///
/// A component belongs to a single operator configuration and maps every
/// registered parameter to a non-negative exponent (explicit zeros
/// included), in registry order. Components are derived by
/// [`enumerate_components`], never hand-edited; their list order fixes the
/// column layout of the basis matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Index of the operator configuration the component belongs to.
    pub configuration: usize,
    /// Exponent per parameter name, in registry order.
    pub powers: IndexMap<String, u32>,
}

impl Component {
    /// Sum of all exponents.
    pub fn degree(&self) -> u32 {
        self.powers.values().sum()
    }

    /// Exponent carried by the named parameter, if registered.
    pub fn power(&self, parameter: &str) -> Option<u32> {
        self.powers.get(parameter).copied()
    }

    /// Evaluates the monomial at a concrete parameter point.
    ///
    /// The product of `value^exponent` over all parameters; an exponent of
    /// zero contributes 1 regardless of the base, including `0^0`. Total
    /// over finite reals; a point missing one of the component's parameters
    /// is a configuration error.
    pub fn evaluate(&self, point: &ParameterPoint) -> Result<f64, MorphError> {
        let mut product = 1.0;
        for (name, &power) in &self.powers {
            let value = point.get(name).ok_or_else(|| {
                MorphError::Config(
                    ErrorInfo::new(
                        "missing-parameter-value",
                        "point does not assign a value to a component parameter",
                    )
                    .with_context("parameter", name.clone()),
                )
            })?;
            product *= value.powi(power as i32);
        }
        Ok(product)
    }
}

/// Enumerates the exhaustive component list implied by the registry and the
/// per-configuration overall degree budgets.
///
/// For each configuration `c` the result contains every exponent assignment
/// whose per-parameter exponent is at most that parameter's
/// `max_powers[c]` and whose exponent sum is at most `overall_budgets[c]`.
/// Configurations are concatenated in order; duplicate monomials across
/// configurations are distinct columns. Enumeration is deterministic, with
/// earlier parameters varying slowest, so two runs on the same input yield
/// the same ordered list.
///
/// An empty registry yields one constant component per configuration. An
/// empty budget slice, or a configuration index beyond any parameter's
/// declared `max_powers` length, is a configuration error reported before
/// any component is produced.
pub fn enumerate_components(
    space: &ParameterSpace,
    overall_budgets: &[u32],
) -> Result<Vec<Component>, MorphError> {
    if overall_budgets.is_empty() {
        return Err(MorphError::Config(ErrorInfo::new(
            "empty-configurations",
            "at least one operator configuration budget is required",
        )));
    }

    let names: Vec<String> = space
        .parameter_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    // validate every configuration index before emitting anything
    let mut caps_per_configuration = Vec::with_capacity(overall_budgets.len());
    for configuration in 0..overall_budgets.len() {
        let mut caps = Vec::with_capacity(names.len());
        for parameter in space.parameters() {
            let cap = parameter
                .max_powers
                .get(configuration)
                .copied()
                .ok_or_else(|| {
                    MorphError::Config(
                        ErrorInfo::new(
                            "power-tuple-too-short",
                            "parameter declares no degree budget for a requested configuration",
                        )
                        .with_context("parameter", parameter.name.clone())
                        .with_context("configuration", configuration.to_string())
                        .with_context("declared", parameter.max_powers.len().to_string()),
                    )
                })?;
            caps.push(cap);
        }
        caps_per_configuration.push(caps);
    }

    let mut components = Vec::new();
    for (configuration, (&budget, caps)) in overall_budgets
        .iter()
        .zip(&caps_per_configuration)
        .enumerate()
    {
        let mut exponents = Vec::new();
        expand_powers(caps, budget, 0, &mut Vec::new(), &mut exponents);
        for assignment in exponents {
            let powers: IndexMap<String, u32> =
                names.iter().cloned().zip(assignment).collect();
            components.push(Component {
                configuration,
                powers,
            });
        }
    }
    Ok(components)
}

fn expand_powers(
    caps: &[u32],
    remaining: u32,
    idx: usize,
    current: &mut Vec<u32>,
    out: &mut Vec<Vec<u32>>,
) {
    if idx == caps.len() {
        out.push(current.clone());
        return;
    }
    let cap = caps[idx].min(remaining);
    for exponent in 0..=cap {
        current.push(exponent);
        expand_powers(caps, remaining - exponent, idx + 1, current, out);
        current.pop();
    }
}
