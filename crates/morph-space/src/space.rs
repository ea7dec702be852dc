use indexmap::IndexMap;
use morph_core::errors::{ErrorInfo, MorphError};
use serde::{Deserialize, Serialize};

use crate::hash::stable_hash_string;
use crate::parameter::{normalize_name, Parameter};

/// Concrete assignment of values to parameters, keyed by parameter name.
pub type ParameterPoint = IndexMap<String, f64>;

/// A named evaluation point covering every registered parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    /// Unique benchmark name.
    pub name: String,
    /// Total assignment of parameter values.
    pub point: ParameterPoint,
}

impl Benchmark {
    /// Creates a benchmark from a name and a total parameter assignment.
    pub fn new(name: impl Into<String>, point: ParameterPoint) -> Self {
        Self {
            name: name.into(),
            point,
        }
    }
}

/// Ordered registry of parameters and benchmarks.
///
/// Derived morphing artifacts bind to a [`ParameterSpace::fingerprint`]
/// snapshot; any edit to the parameters or benchmarks changes the
/// fingerprint and thereby invalidates previously computed morphing state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "SpaceRecord", into = "SpaceRecord")]
pub struct ParameterSpace {
    parameters: IndexMap<String, Parameter>,
    benchmarks: IndexMap<String, ParameterPoint>,
    default_benchmark: Option<String>,
}

impl ParameterSpace {
    /// Creates an empty space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parameter, rejecting duplicate names.
    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<(), MorphError> {
        let mut parameter = parameter;
        parameter.name = normalize_name(&parameter.name);
        parameter.validate()?;
        if self.parameters.contains_key(&parameter.name) {
            return Err(MorphError::Config(
                ErrorInfo::new("duplicate-parameter", "parameter name exists already")
                    .with_context("parameter", parameter.name.clone()),
            ));
        }
        self.parameters.insert(parameter.name.clone(), parameter);
        Ok(())
    }

    /// Replaces the whole parameter registry.
    ///
    /// Existing benchmarks are discarded: they were total assignments over
    /// the previous registry and cannot be assumed valid for the new one.
    pub fn set_parameters(&mut self, parameters: Vec<Parameter>) -> Result<(), MorphError> {
        let mut replacement = Self::new();
        for parameter in parameters {
            replacement.add_parameter(parameter)?;
        }
        *self = replacement;
        Ok(())
    }

    /// Adds a named benchmark with a total parameter assignment.
    ///
    /// The first benchmark ever added becomes the default sampling benchmark
    /// unless overridden through [`ParameterSpace::set_default_benchmark`].
    pub fn add_benchmark(
        &mut self,
        name: impl Into<String>,
        point: ParameterPoint,
    ) -> Result<(), MorphError> {
        let name = name.into();
        if self.benchmarks.contains_key(&name) {
            return Err(MorphError::Config(
                ErrorInfo::new("duplicate-benchmark", "benchmark name exists already")
                    .with_context("benchmark", name),
            ));
        }
        self.validate_point(&point)?;
        self.benchmarks.insert(name.clone(), point);
        if self.default_benchmark.is_none() {
            self.default_benchmark = Some(name);
        }
        Ok(())
    }

    /// Adds a benchmark under an automatically generated name and returns it.
    pub fn add_benchmark_auto(&mut self, point: ParameterPoint) -> Result<String, MorphError> {
        let name = format!("benchmark_{}", self.benchmarks.len());
        self.add_benchmark(name.clone(), point)?;
        Ok(name)
    }

    /// Replaces all benchmarks; the first entry becomes the new default.
    pub fn set_benchmarks(&mut self, benchmarks: Vec<Benchmark>) -> Result<(), MorphError> {
        let previous_benchmarks = std::mem::take(&mut self.benchmarks);
        let previous_default = self.default_benchmark.take();
        for benchmark in benchmarks {
            if let Err(err) = self.add_benchmark(benchmark.name, benchmark.point) {
                self.benchmarks = previous_benchmarks;
                self.default_benchmark = previous_default;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Overrides the default sampling benchmark.
    pub fn set_default_benchmark(&mut self, name: &str) -> Result<(), MorphError> {
        if !self.benchmarks.contains_key(name) {
            return Err(MorphError::Config(
                ErrorInfo::new("unknown-benchmark", "benchmark is not registered")
                    .with_context("benchmark", name.to_string()),
            ));
        }
        self.default_benchmark = Some(name.to_string());
        Ok(())
    }

    /// Returns the default sampling benchmark, if any benchmark exists.
    pub fn default_benchmark(&self) -> Option<&str> {
        self.default_benchmark.as_deref()
    }

    /// Checks that a point assigns a finite value to exactly the registered
    /// parameter names.
    pub fn validate_point(&self, point: &ParameterPoint) -> Result<(), MorphError> {
        for name in point.keys() {
            if !self.parameters.contains_key(name) {
                return Err(MorphError::Config(
                    ErrorInfo::new("unknown-parameter", "point references an unknown parameter")
                        .with_context("parameter", name.clone()),
                ));
            }
        }
        for name in self.parameters.keys() {
            match point.get(name) {
                Some(value) if value.is_finite() => {}
                Some(_) => {
                    return Err(MorphError::Config(
                        ErrorInfo::new("non-finite-value", "point value must be finite")
                            .with_context("parameter", name.clone()),
                    ));
                }
                None => {
                    return Err(MorphError::Config(
                        ErrorInfo::new(
                            "missing-parameter-value",
                            "point must assign a value to every parameter",
                        )
                        .with_context("parameter", name.clone()),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Returns the registered parameters in insertion order.
    pub fn parameters(&self) -> impl ExactSizeIterator<Item = &Parameter> {
        self.parameters.values()
    }

    /// Looks up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Returns the parameter names in insertion order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.keys().map(String::as_str).collect()
    }

    /// Number of registered parameters.
    pub fn n_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Returns the benchmarks in insertion order.
    pub fn benchmarks(&self) -> impl ExactSizeIterator<Item = (&str, &ParameterPoint)> {
        self.benchmarks
            .iter()
            .map(|(name, point)| (name.as_str(), point))
    }

    /// Returns the benchmarks as owned records in insertion order.
    pub fn benchmark_list(&self) -> Vec<Benchmark> {
        self.benchmarks
            .iter()
            .map(|(name, point)| Benchmark::new(name.clone(), point.clone()))
            .collect()
    }

    /// Looks up a benchmark point by name.
    pub fn benchmark(&self, name: &str) -> Option<&ParameterPoint> {
        self.benchmarks.get(name)
    }

    /// Number of registered benchmarks.
    pub fn n_benchmarks(&self) -> usize {
        self.benchmarks.len()
    }

    /// Stable hash over the parameters and benchmarks.
    ///
    /// This is the snapshot identity that morphing artifacts bind to. The
    /// default benchmark selection is excluded: it biases event sampling but
    /// does not enter the morphing mathematics.
    pub fn fingerprint(&self) -> Result<String, MorphError> {
        let parameters: Vec<&Parameter> = self.parameters.values().collect();
        let benchmarks: Vec<(&String, &ParameterPoint)> = self.benchmarks.iter().collect();
        stable_hash_string(&(parameters, benchmarks))
    }
}

/// Serialized form of [`ParameterSpace`]: ordered records instead of maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpaceRecord {
    parameters: Vec<Parameter>,
    benchmarks: Vec<Benchmark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_benchmark: Option<String>,
}

impl From<ParameterSpace> for SpaceRecord {
    fn from(space: ParameterSpace) -> Self {
        let benchmarks = space.benchmark_list();
        Self {
            parameters: space.parameters.into_values().collect(),
            benchmarks,
            default_benchmark: space.default_benchmark,
        }
    }
}

impl TryFrom<SpaceRecord> for ParameterSpace {
    type Error = MorphError;

    fn try_from(record: SpaceRecord) -> Result<Self, Self::Error> {
        let mut space = ParameterSpace::new();
        for parameter in record.parameters {
            space.add_parameter(parameter)?;
        }
        for benchmark in record.benchmarks {
            space.add_benchmark(benchmark.name, benchmark.point)?;
        }
        if let Some(default) = record.default_benchmark {
            space.set_default_benchmark(&default)?;
        }
        Ok(space)
    }
}
