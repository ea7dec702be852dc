use morph_core::errors::{ErrorInfo, MorphError};
use morph_space::{Benchmark, ParameterPoint, ParameterSpace};
use serde::{Deserialize, Serialize};

use crate::components::Component;
use crate::matrix::{component_vector, MorphingMatrix};

/// One accepted basis: ordered benchmarks plus the inverse of their
/// component-value matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphingBasis {
    /// Benchmarks in matrix row order.
    pub benchmarks: Vec<Benchmark>,
    /// Inverse of the component-value matrix over these benchmarks.
    pub matrix: MorphingMatrix,
}

impl MorphingBasis {
    /// Computes the reconstruction weight of every benchmark for the given
    /// target point, in basis order.
    pub fn weights(
        &self,
        components: &[Component],
        theta: &ParameterPoint,
    ) -> Result<Vec<(String, f64)>, MorphError> {
        if components.len() != self.benchmarks.len() {
            return Err(MorphError::Config(
                ErrorInfo::new(
                    "basis-size-mismatch",
                    "component list does not match the basis length",
                )
                .with_context("components", components.len().to_string())
                .with_context("benchmarks", self.benchmarks.len().to_string()),
            ));
        }
        let values = component_vector(components, theta)?;
        let weights = self.matrix.benchmark_weights(&values)?;
        Ok(self
            .benchmarks
            .iter()
            .zip(weights.iter())
            .map(|(benchmark, &weight)| (benchmark.name.clone(), weight))
            .collect())
    }
}

/// Complete morphing state bound to a parameter-space snapshot.
///
/// The component list, the bases and their matrices are one unit; none is
/// meaningful without the others. The setup records the fingerprint of the
/// [`ParameterSpace`] it was derived from, so later edits to parameters or
/// benchmarks make it verifiably stale instead of silently wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphingSetup {
    /// Ordered component list shared by all bases.
    pub components: Vec<Component>,
    /// Independently optimized bases; more than one is the documented
    /// multi-basis extension.
    pub bases: Vec<MorphingBasis>,
    /// Fingerprint of the parameter space the setup was bound to.
    pub space_fingerprint: String,
}

impl MorphingSetup {
    /// Binds components and bases to the current snapshot of a space.
    pub fn bind(
        components: Vec<Component>,
        bases: Vec<MorphingBasis>,
        space: &ParameterSpace,
    ) -> Result<Self, MorphError> {
        let setup = Self {
            components,
            bases,
            space_fingerprint: space.fingerprint()?,
        };
        setup.validate()?;
        Ok(setup)
    }

    /// Number of combined bases.
    pub fn n_bases(&self) -> usize {
        self.bases.len()
    }

    /// Structural consistency of the setup itself.
    pub fn validate(&self) -> Result<(), MorphError> {
        if self.components.is_empty() {
            return Err(MorphError::Config(ErrorInfo::new(
                "empty-component-list",
                "morphing setup carries no components",
            )));
        }
        if self.bases.is_empty() {
            return Err(MorphError::Config(ErrorInfo::new(
                "empty-basis-list",
                "morphing setup carries no bases",
            )));
        }
        for (idx, basis) in self.bases.iter().enumerate() {
            if basis.benchmarks.len() != self.components.len()
                || basis.matrix.dimension() != self.components.len()
            {
                return Err(MorphError::Config(
                    ErrorInfo::new(
                        "basis-size-mismatch",
                        "basis length and matrix dimension must match the component count",
                    )
                    .with_context("basis", idx.to_string())
                    .with_context("components", self.components.len().to_string())
                    .with_context("benchmarks", basis.benchmarks.len().to_string())
                    .with_context("matrix", basis.matrix.dimension().to_string()),
                ));
            }
        }
        Ok(())
    }

    /// Checks that the setup still matches the given space snapshot.
    pub fn verify_fresh(&self, space: &ParameterSpace) -> Result<(), MorphError> {
        let current = space.fingerprint()?;
        if current != self.space_fingerprint {
            return Err(MorphError::Config(
                ErrorInfo::new(
                    "stale-morphing-state",
                    "parameter space was edited after the morphing setup was derived",
                )
                .with_context("bound", self.space_fingerprint.clone())
                .with_context("current", current)
                .with_hint("re-run the basis optimization against the edited space"),
            ));
        }
        Ok(())
    }

    /// All benchmarks referenced by the setup, deduplicated by name in
    /// basis order (fixed benchmarks shared between bases appear once).
    pub fn combined_benchmarks(&self) -> Vec<Benchmark> {
        let mut combined: Vec<Benchmark> = Vec::new();
        for basis in &self.bases {
            for benchmark in &basis.benchmarks {
                if combined.iter().all(|seen| seen.name != benchmark.name) {
                    combined.push(benchmark.clone());
                }
            }
        }
        combined
    }

    /// Reconstructs the benchmark weights for an arbitrary target point.
    ///
    /// For every basis the component row vector at `theta` is mapped through
    /// the basis matrix, each basis's weights are scaled by `1 / n_bases`,
    /// and the `(benchmark_name, weight)` entries are concatenated in basis
    /// order. For any polynomial expressible in the declared components the
    /// weighted sum of benchmark evaluations equals the evaluation at
    /// `theta` up to floating-point error, regardless of where `theta` lies
    /// relative to the benchmarks.
    pub fn reconstruct_weights(
        &self,
        theta: &ParameterPoint,
    ) -> Result<Vec<(String, f64)>, MorphError> {
        self.validate()?;
        let scale = 1.0 / self.bases.len() as f64;
        let mut entries = Vec::new();
        for basis in &self.bases {
            for (name, weight) in basis.weights(&self.components, theta)? {
                entries.push((name, weight * scale));
            }
        }
        Ok(entries)
    }
}
