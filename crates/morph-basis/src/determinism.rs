use morph_core::derive_substream_seed;

/// Derives the deterministic seed for one optimized basis.
pub fn basis_seed(master_seed: u64, basis_index: usize) -> u64 {
    derive_substream_seed(master_seed, basis_index as u64)
}

/// Derives the deterministic seed for a candidate trial within one basis
/// search. Trials own disjoint substreams, so they may be evaluated on any
/// number of threads without changing the result.
pub fn trial_seed(basis_seed: u64, trial: usize) -> u64 {
    derive_substream_seed(basis_seed, trial as u64)
}
