use morph_core::errors::{ErrorInfo, MorphError};
use morph_space::{Benchmark, ParameterPoint};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::components::Component;

/// Condition-number tolerance above which a basis is treated as degenerate.
pub const DEFAULT_CONDITION_TOLERANCE: f64 = 1e12;

/// Inverse of the component-value matrix for one accepted basis.
///
/// The matrix is only meaningful together with the component list and the
/// ordered benchmarks it was built from; [`crate::setup::MorphingBasis`]
/// keeps the three as one unit. Serialized as a dense row-major 2-D array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRecord", into = "MatrixRecord")]
pub struct MorphingMatrix {
    inverse: DMatrix<f64>,
    condition: f64,
}

impl MorphingMatrix {
    /// Number of components (and benchmarks) the matrix was built from.
    pub fn dimension(&self) -> usize {
        self.inverse.nrows()
    }

    /// Condition number of the component-value matrix, for diagnostics and
    /// tie-breaking.
    pub fn condition(&self) -> f64 {
        self.condition
    }

    /// The stored inverse of the component-value matrix.
    pub fn inverse(&self) -> &DMatrix<f64> {
        &self.inverse
    }

    /// Maps a component-value vector at some point to one weight per
    /// benchmark, in basis order.
    pub fn benchmark_weights(
        &self,
        component_values: &DVector<f64>,
    ) -> Result<DVector<f64>, MorphError> {
        if component_values.len() != self.dimension() {
            return Err(MorphError::Config(
                ErrorInfo::new(
                    "component-vector-length",
                    "component vector length does not match the matrix dimension",
                )
                .with_context("expected", self.dimension().to_string())
                .with_context("actual", component_values.len().to_string()),
            ));
        }
        Ok(self.inverse.transpose() * component_values)
    }
}

/// Evaluates every component at a point, in component order.
pub(crate) fn component_vector(
    components: &[Component],
    point: &ParameterPoint,
) -> Result<DVector<f64>, MorphError> {
    let mut values = Vec::with_capacity(components.len());
    for component in components {
        values.push(component.evaluate(point)?);
    }
    Ok(DVector::from_vec(values))
}

/// Builds the square component-value matrix for a candidate basis and
/// attempts its inversion.
///
/// `C[i][j]` holds component `j` evaluated at benchmark `i`. A singular or
/// near-singular matrix (condition number above `condition_tolerance`)
/// yields a [`MorphError::Degenerate`] so the optimizer can reject the
/// candidate locally; a basis whose length differs from the component count
/// is a configuration error.
pub fn build_morphing_matrix(
    components: &[Component],
    basis: &[Benchmark],
    condition_tolerance: f64,
) -> Result<MorphingMatrix, MorphError> {
    let n = components.len();
    if n == 0 {
        return Err(MorphError::Config(ErrorInfo::new(
            "empty-component-list",
            "cannot build a basis matrix without components",
        )));
    }
    if basis.len() != n {
        return Err(MorphError::Config(
            ErrorInfo::new(
                "basis-size-mismatch",
                "basis must contain exactly one benchmark per component",
            )
            .with_context("components", n.to_string())
            .with_context("benchmarks", basis.len().to_string()),
        ));
    }

    let mut values = DMatrix::<f64>::zeros(n, n);
    for (row, benchmark) in basis.iter().enumerate() {
        for (col, component) in components.iter().enumerate() {
            values[(row, col)] = component.evaluate(&benchmark.point)?;
        }
    }

    let singular = values.singular_values();
    let s_max = singular.iter().copied().fold(0.0f64, f64::max);
    let s_min = singular.iter().copied().fold(f64::INFINITY, f64::min);
    if !s_max.is_finite() || s_min <= 0.0 {
        return Err(MorphError::Degenerate(
            ErrorInfo::new("singular-basis", "component-value matrix is singular")
                .with_context("dimension", n.to_string()),
        ));
    }
    let condition = s_max / s_min;
    if condition > condition_tolerance {
        return Err(MorphError::Degenerate(
            ErrorInfo::new(
                "ill-conditioned-basis",
                "component-value matrix exceeds the condition tolerance",
            )
            .with_context("condition", format!("{condition:e}"))
            .with_context("tolerance", format!("{condition_tolerance:e}")),
        ));
    }

    let inverse = values.try_inverse().ok_or_else(|| {
        MorphError::Degenerate(
            ErrorInfo::new("singular-basis", "component-value matrix is not invertible")
                .with_context("dimension", n.to_string()),
        )
    })?;

    Ok(MorphingMatrix { inverse, condition })
}

/// On-disk form of [`MorphingMatrix`]: dense rows plus the conditioning
/// metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MatrixRecord {
    rows: Vec<Vec<f64>>,
    condition: f64,
}

impl From<MorphingMatrix> for MatrixRecord {
    fn from(matrix: MorphingMatrix) -> Self {
        let rows = matrix
            .inverse
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        Self {
            rows,
            condition: matrix.condition,
        }
    }
}

impl TryFrom<MatrixRecord> for MorphingMatrix {
    type Error = MorphError;

    fn try_from(record: MatrixRecord) -> Result<Self, Self::Error> {
        let n = record.rows.len();
        if n == 0 {
            return Err(MorphError::Serde(ErrorInfo::new(
                "empty-matrix",
                "morphing matrix must have at least one row",
            )));
        }
        for (idx, row) in record.rows.iter().enumerate() {
            if row.len() != n {
                return Err(MorphError::Serde(
                    ErrorInfo::new("ragged-matrix", "morphing matrix must be square")
                        .with_context("row", idx.to_string())
                        .with_context("expected", n.to_string())
                        .with_context("actual", row.len().to_string()),
                ));
            }
        }
        if !record.condition.is_finite() || record.condition < 1.0 {
            return Err(MorphError::Serde(
                ErrorInfo::new("invalid-condition", "condition number must be finite and >= 1")
                    .with_context("condition", record.condition.to_string()),
            ));
        }
        let inverse = DMatrix::from_fn(n, n, |i, j| record.rows[i][j]);
        Ok(Self {
            inverse,
            condition: record.condition,
        })
    }
}
