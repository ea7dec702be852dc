//! Parameter and benchmark registry for the morphing engine.
//!
//! A [`ParameterSpace`] holds the ordered set of theory couplings together
//! with the named benchmark points at which the external simulator evaluates
//! the squared amplitude. Parameter and benchmark order is contractual: it
//! fixes the column layout of every derived morphing artifact, so both
//! collections preserve insertion order and round-trip losslessly.

mod hash;
mod parameter;
mod space;

pub use hash::{stable_hash_string, to_canonical_json_bytes};
pub use parameter::{normalize_name, CardRef, Parameter};
pub use space::{Benchmark, ParameterPoint, ParameterSpace};
