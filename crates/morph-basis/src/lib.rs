#![deny(missing_docs)]
#![doc = "Morphing basis engine: component enumeration, basis optimization and weight reconstruction."]

//! The squared amplitude of a process with couplings `theta` is assumed to
//! be a linear combination of monomial components in those couplings. Given
//! evaluations at as many benchmark points as there are components, the
//! amplitude can be reconstructed exactly anywhere in parameter space. This
//! crate enumerates the components, searches for a well-conditioned
//! benchmark basis, and turns arbitrary parameter points into benchmark
//! weights.

/// Monomial components and their enumeration.
pub mod components;
/// Deterministic seed derivation for basis searches and trials.
pub mod determinism;
/// Component-value matrix construction and inversion.
pub mod matrix;
/// Stochastic basis search and the high-level benchmark derivation.
pub mod optimize;
/// Bound morphing state and weight reconstruction.
pub mod setup;

pub use components::{enumerate_components, Component};
pub use matrix::{build_morphing_matrix, MorphingMatrix, DEFAULT_CONDITION_TOLERANCE};
pub use optimize::{
    derive_morphing_benchmarks, optimize_basis, BasisSearchReport, MorphingOptions,
    OptimizeReport, OptimizeSettings,
};
pub use setup::{MorphingBasis, MorphingSetup};
