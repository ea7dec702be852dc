#![deny(missing_docs)]
#![doc = "Core error, randomness and schema types shared by the morphing engine crates."]

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, MorphError};
pub use provenance::{SchemaVersion, SetupProvenance};
pub use rng::{derive_substream_seed, RngHandle};
