//! Persistence for the morphing setup state tuple.
//!
//! The engine's external format contract is a single payload holding the
//! parameters, benchmarks, components and morphing matrices; the morphing
//! fields may be absent, meaning "no morphing configured". Payloads are
//! written as pretty JSON and every invariant is re-validated on load.

mod state;

pub use state::SetupPayload;
