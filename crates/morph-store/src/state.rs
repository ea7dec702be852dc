use std::fs;
use std::path::Path;

use morph_basis::MorphingSetup;
use morph_core::errors::ErrorInfo;
use morph_core::{MorphError, SchemaVersion, SetupProvenance};
use morph_space::ParameterSpace;
use serde::{Deserialize, Serialize};

/// Serializable snapshot of a complete engine setup.
///
/// Carries the parameter space together with the optional morphing state
/// bound to it. Construction and loading both validate that the morphing
/// state, when present, is structurally sound and matches the embedded
/// space's fingerprint, so a payload can never round-trip into a setup that
/// silently disagrees with its parameters or benchmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupPayload {
    /// Schema version of the payload layout.
    pub schema_version: SchemaVersion,
    /// Provenance describing how the setup was produced.
    #[serde(default)]
    pub provenance: SetupProvenance,
    /// Parameter and benchmark registry.
    pub space: ParameterSpace,
    /// Morphing state, absent when no morphing is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morphing: Option<MorphingSetup>,
}

impl SetupPayload {
    /// Builds a validated payload from a space and optional morphing state.
    pub fn new(
        space: ParameterSpace,
        morphing: Option<MorphingSetup>,
    ) -> Result<Self, MorphError> {
        let payload = Self {
            schema_version: SchemaVersion::default(),
            provenance: SetupProvenance::default(),
            space,
            morphing,
        };
        payload.validate()?;
        Ok(payload)
    }

    /// Attaches provenance information.
    pub fn with_provenance(mut self, provenance: SetupProvenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Restores a payload from disk, re-validating every invariant.
    pub fn load(path: &Path) -> Result<Self, MorphError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            MorphError::Serde(
                ErrorInfo::new("setup-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let payload: Self = serde_json::from_str(&contents).map_err(|err| {
            MorphError::Serde(
                ErrorInfo::new("setup-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        payload.validate()?;
        Ok(payload)
    }

    /// Writes the payload to disk as pretty JSON.
    pub fn store(&self, path: &Path) -> Result<(), MorphError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                MorphError::Serde(
                    ErrorInfo::new("setup-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            MorphError::Serde(
                ErrorInfo::new("setup-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            MorphError::Serde(
                ErrorInfo::new("setup-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Splits the payload into its space and morphing parts.
    pub fn into_parts(self) -> (ParameterSpace, Option<MorphingSetup>) {
        (self.space, self.morphing)
    }

    fn validate(&self) -> Result<(), MorphError> {
        if let Some(morphing) = &self.morphing {
            morphing.validate()?;
            morphing.verify_fresh(&self.space).map_err(|err| {
                MorphError::Serde(
                    ErrorInfo::new(
                        "setup-mismatch",
                        "morphing state does not match the embedded parameter space",
                    )
                    .with_hint(err.to_string()),
                )
            })?;
        }
        Ok(())
    }
}
