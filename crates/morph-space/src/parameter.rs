use morph_core::errors::{ErrorInfo, MorphError};
use serde::{Deserialize, Serialize};

/// External parameter-card reference for a coupling.
///
/// The block name is case-sensitive and is written verbatim into the card
/// files consumed by the simulator; neither field is interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    /// Card block the coupling lives in.
    pub block: String,
    /// Integer entry id within the block.
    pub id: u32,
}

/// A named continuous coupling of the underlying theory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Unique display name; spaces and hyphens are normalized to underscores.
    pub name: String,
    /// External card reference.
    pub card: CardRef,
    /// Maximal polynomial power contributed to the squared amplitude, one
    /// entry per operator configuration.
    pub max_powers: Vec<u32>,
    /// Range `[min, max]` of primary interest; only biases benchmark
    /// sampling during basis optimization.
    pub range: (f64, f64),
    /// Optional scalar transform expression applied to the value before it
    /// is written into a parameter card. Opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

impl Parameter {
    /// Creates a parameter with the given name, card reference, degree
    /// budgets and sampling range.
    pub fn new(
        name: impl Into<String>,
        card: CardRef,
        max_powers: Vec<u32>,
        range: (f64, f64),
    ) -> Self {
        Self {
            name: normalize_name(&name.into()),
            card,
            max_powers,
            range,
            transform: None,
        }
    }

    /// Attaches a card transform expression.
    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), MorphError> {
        if self.name.is_empty() {
            return Err(MorphError::Config(ErrorInfo::new(
                "empty-parameter-name",
                "parameter name must not be empty",
            )));
        }
        if self.max_powers.is_empty() {
            return Err(MorphError::Config(
                ErrorInfo::new(
                    "empty-power-tuple",
                    "parameter declares no per-configuration degree budget",
                )
                .with_context("parameter", self.name.clone()),
            ));
        }
        let (low, high) = self.range;
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(MorphError::Config(
                ErrorInfo::new("invalid-range", "parameter range must be finite with min <= max")
                    .with_context("parameter", self.name.clone())
                    .with_context("range", format!("[{low}, {high}]")),
            ));
        }
        Ok(())
    }
}

/// Normalizes a display name by replacing spaces and hyphens with underscores.
pub fn normalize_name(raw: &str) -> String {
    raw.replace([' ', '-'], "_")
}
