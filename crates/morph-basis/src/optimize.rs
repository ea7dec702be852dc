use morph_core::errors::{ErrorInfo, MorphError};
use morph_core::RngHandle;
use morph_space::{Benchmark, ParameterPoint, ParameterSpace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{enumerate_components, Component};
use crate::determinism;
use crate::matrix::{build_morphing_matrix, component_vector, MorphingMatrix};
use crate::setup::{MorphingBasis, MorphingSetup};
use crate::DEFAULT_CONDITION_TOLERANCE;

/// Knobs governing the stochastic basis search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeSettings {
    /// Number of candidate bases evaluated per optimized basis.
    #[serde(default = "default_n_trials")]
    pub n_trials: usize,
    /// Number of validation points used to score each surviving candidate.
    #[serde(default = "default_n_test_thetas")]
    pub n_test_thetas: usize,
    /// Number of independently optimized bases to combine (multi-basis
    /// extension; weights are scaled by `1 / n_bases` at reconstruction).
    #[serde(default = "default_n_bases")]
    pub n_bases: usize,
    /// Condition-number tolerance forwarded to the matrix builder.
    #[serde(default = "default_condition_tolerance")]
    pub condition_tolerance: f64,
    /// Worker threads for trial evaluation; 1 keeps the search serial.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_n_trials() -> usize {
    100
}

fn default_n_test_thetas() -> usize {
    100
}

fn default_n_bases() -> usize {
    1
}

fn default_condition_tolerance() -> f64 {
    DEFAULT_CONDITION_TOLERANCE
}

fn default_concurrency() -> usize {
    1
}

impl Default for OptimizeSettings {
    fn default() -> Self {
        Self {
            n_trials: default_n_trials(),
            n_test_thetas: default_n_test_thetas(),
            n_bases: default_n_bases(),
            condition_tolerance: default_condition_tolerance(),
            concurrency: default_concurrency(),
        }
    }
}

/// Trial statistics for one optimized basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisSearchReport {
    /// Index of the basis within the search.
    pub basis_index: usize,
    /// Trial index that produced the accepted basis.
    pub best_trial: usize,
    /// Mean sum of squared weights of the accepted basis over the
    /// validation points (lower is better).
    pub best_score: f64,
    /// Condition number of the accepted basis matrix.
    pub condition: f64,
    /// Trials whose matrix inverted within tolerance.
    pub surviving_trials: usize,
    /// Trials rejected for singular or ill-conditioned matrices.
    pub degenerate_trials: usize,
}

/// Diagnostics returned alongside the optimized bases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeReport {
    /// Master seed driving all sampling substreams.
    pub seed: u64,
    /// Trial budget per basis.
    pub n_trials: usize,
    /// Validation points per surviving trial.
    pub n_test_thetas: usize,
    /// Per-basis search statistics.
    pub searches: Vec<BasisSearchReport>,
}

struct TrialOutcome {
    trial: usize,
    score: f64,
    basis: Vec<Benchmark>,
    matrix: MorphingMatrix,
}

/// Shared inputs of one basis search.
struct SearchContext<'a> {
    space: &'a ParameterSpace,
    components: &'a [Component],
    fixed_benchmarks: &'a [Benchmark],
    settings: &'a OptimizeSettings,
    /// Benchmarks still to be sampled per candidate.
    k: usize,
    /// First running index used to name sampled benchmarks.
    name_start: usize,
}

/// Searches for benchmark bases minimizing the expected squared
/// reconstruction weight over the declared parameter ranges.
///
/// Fixed benchmarks appear, in order, at the head of every candidate basis;
/// the remaining `k = n_components - n_fixed` benchmarks are drawn uniformly
/// per parameter range, one substream per trial. Candidates whose matrix
/// degenerates are rejected locally; if every trial of a basis degenerates
/// the search fails with [`MorphError::Infeasible`]. All configuration
/// errors (including `k < 0`) are raised before any sampling.
pub fn optimize_basis(
    space: &ParameterSpace,
    components: &[Component],
    fixed_benchmarks: &[Benchmark],
    settings: &OptimizeSettings,
    seed: u64,
) -> Result<(Vec<MorphingBasis>, OptimizeReport), MorphError> {
    validate_inputs(space, components, fixed_benchmarks, settings)?;
    let k = components.len() - fixed_benchmarks.len();

    let mut bases = Vec::with_capacity(settings.n_bases);
    let mut searches = Vec::with_capacity(settings.n_bases);
    for basis_index in 0..settings.n_bases {
        let context = SearchContext {
            space,
            components,
            fixed_benchmarks,
            settings,
            k,
            name_start: fixed_benchmarks.len() + basis_index * k,
        };
        let (basis, report) = search_single_basis(&context, seed, basis_index)?;
        bases.push(basis);
        searches.push(report);
    }

    let report = OptimizeReport {
        seed,
        n_trials: settings.n_trials,
        n_test_thetas: settings.n_test_thetas,
        searches,
    };
    Ok((bases, report))
}

fn validate_inputs(
    space: &ParameterSpace,
    components: &[Component],
    fixed_benchmarks: &[Benchmark],
    settings: &OptimizeSettings,
) -> Result<(), MorphError> {
    if components.is_empty() {
        return Err(MorphError::Config(ErrorInfo::new(
            "empty-component-list",
            "cannot optimize a basis without components",
        )));
    }
    if settings.n_trials == 0 {
        return Err(MorphError::Config(ErrorInfo::new(
            "zero-trials",
            "n_trials must be positive",
        )));
    }
    if settings.n_test_thetas == 0 {
        return Err(MorphError::Config(ErrorInfo::new(
            "zero-test-thetas",
            "n_test_thetas must be positive",
        )));
    }
    if settings.n_bases == 0 {
        return Err(MorphError::Config(ErrorInfo::new(
            "zero-bases",
            "n_bases must be positive",
        )));
    }
    if fixed_benchmarks.len() > components.len() {
        return Err(MorphError::Config(
            ErrorInfo::new(
                "too-many-fixed-benchmarks",
                "more fixed benchmarks than components leaves no room to sample",
            )
            .with_context("components", components.len().to_string())
            .with_context("fixed", fixed_benchmarks.len().to_string())
            .with_hint("drop benchmarks or raise the degree budget"),
        ));
    }
    for benchmark in fixed_benchmarks {
        space.validate_point(&benchmark.point)?;
    }
    for (idx, benchmark) in fixed_benchmarks.iter().enumerate() {
        if fixed_benchmarks[..idx]
            .iter()
            .any(|other| other.name == benchmark.name)
        {
            return Err(MorphError::Config(
                ErrorInfo::new("duplicate-benchmark", "fixed benchmark names must be unique")
                    .with_context("benchmark", benchmark.name.clone()),
            ));
        }
    }
    Ok(())
}

fn search_single_basis(
    context: &SearchContext<'_>,
    master_seed: u64,
    basis_index: usize,
) -> Result<(MorphingBasis, BasisSearchReport), MorphError> {
    let settings = context.settings;
    let basis_seed = determinism::basis_seed(master_seed, basis_index);

    let run = |trial: usize| -> Result<Option<TrialOutcome>, MorphError> {
        run_trial(context, determinism::trial_seed(basis_seed, trial), trial)
    };

    // one substream per trial, so the parallel reduction is order-independent
    let outcomes: Result<Vec<Option<TrialOutcome>>, MorphError> = if settings.concurrency > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.concurrency)
            .build()
            .map_err(|err| {
                MorphError::Config(ErrorInfo::new("thread-pool", err.to_string()))
            })?;
        pool.install(|| (0..settings.n_trials).into_par_iter().map(run).collect())
    } else {
        (0..settings.n_trials).map(run).collect()
    };
    let outcomes = outcomes?;

    let mut best: Option<TrialOutcome> = None;
    let mut surviving = 0usize;
    let mut degenerate = 0usize;
    for outcome in outcomes {
        match outcome {
            None => degenerate += 1,
            Some(candidate) => {
                surviving += 1;
                // first-seen wins on exact score ties
                let better = best
                    .as_ref()
                    .map_or(true, |current| candidate.score < current.score);
                if better {
                    best = Some(candidate);
                }
            }
        }
    }

    let best = best.ok_or_else(|| {
        MorphError::Infeasible(
            ErrorInfo::new(
                "no-invertible-basis",
                "every candidate basis degenerated within the trial budget",
            )
            .with_context("basis", basis_index.to_string())
            .with_context("n_trials", settings.n_trials.to_string())
            .with_hint("increase n_trials or lower the degree budget"),
        )
    })?;

    let report = BasisSearchReport {
        basis_index,
        best_trial: best.trial,
        best_score: best.score,
        condition: best.matrix.condition(),
        surviving_trials: surviving,
        degenerate_trials: degenerate,
    };
    let basis = MorphingBasis {
        benchmarks: best.basis,
        matrix: best.matrix,
    };
    Ok((basis, report))
}

fn run_trial(
    context: &SearchContext<'_>,
    trial_seed: u64,
    trial: usize,
) -> Result<Option<TrialOutcome>, MorphError> {
    let settings = context.settings;
    let mut rng = RngHandle::from_seed(trial_seed);

    let mut basis: Vec<Benchmark> = context.fixed_benchmarks.to_vec();
    for offset in 0..context.k {
        let point = sample_point(context.space, &mut rng);
        basis.push(Benchmark::new(
            format!("morphing_basis_vector_{}", context.name_start + offset),
            point,
        ));
    }

    let matrix =
        match build_morphing_matrix(context.components, &basis, settings.condition_tolerance) {
            Ok(matrix) => matrix,
            Err(MorphError::Degenerate(_)) => return Ok(None),
            Err(other) => return Err(other),
        };

    let mut total = 0.0;
    for _ in 0..settings.n_test_thetas {
        let theta = sample_point(context.space, &mut rng);
        let values = component_vector(context.components, &theta)?;
        let weights = matrix.benchmark_weights(&values)?;
        total += weights.iter().map(|weight| weight * weight).sum::<f64>();
    }
    let score = total / settings.n_test_thetas as f64;
    if !score.is_finite() {
        return Ok(None);
    }

    Ok(Some(TrialOutcome {
        trial,
        score,
        basis,
        matrix,
    }))
}

fn sample_point(space: &ParameterSpace, rng: &mut RngHandle) -> ParameterPoint {
    let mut point = ParameterPoint::default();
    for parameter in space.parameters() {
        let (low, high) = parameter.range;
        point.insert(parameter.name.clone(), rng.uniform_in(low, high));
    }
    point
}

/// Options for [`derive_morphing_benchmarks`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphingOptions {
    /// Overall degree budget per operator configuration.
    pub max_overall_power: Vec<u32>,
    /// Carry the space's existing benchmarks as fixed basis members.
    #[serde(default)]
    pub keep_existing_benchmarks: bool,
    /// Search knobs.
    #[serde(default)]
    pub optimize: OptimizeSettings,
}

impl Default for MorphingOptions {
    fn default() -> Self {
        Self {
            max_overall_power: vec![4],
            keep_existing_benchmarks: false,
            optimize: OptimizeSettings::default(),
        }
    }
}

/// Enumerates components, optimizes bases and installs the resulting
/// benchmarks into the space.
///
/// The previous benchmark set is replaced (kept benchmarks reappear at the
/// head when `keep_existing_benchmarks` is set) and the returned setup is
/// bound to the updated space fingerprint, so it stays valid until the next
/// manual edit.
pub fn derive_morphing_benchmarks(
    space: &mut ParameterSpace,
    options: &MorphingOptions,
    seed: u64,
) -> Result<(MorphingSetup, OptimizeReport), MorphError> {
    let components = enumerate_components(space, &options.max_overall_power)?;
    let fixed = if options.keep_existing_benchmarks {
        space.benchmark_list()
    } else {
        Vec::new()
    };
    let (bases, report) = optimize_basis(space, &components, &fixed, &options.optimize, seed)?;

    let mut combined: Vec<Benchmark> = Vec::new();
    for basis in &bases {
        for benchmark in &basis.benchmarks {
            if combined.iter().all(|seen| seen.name != benchmark.name) {
                combined.push(benchmark.clone());
            }
        }
    }
    space.set_benchmarks(combined)?;

    let setup = MorphingSetup::bind(components, bases, space)?;
    Ok((setup, report))
}
