//! Structured calculator errors
//!
//! Errors never crash the system. They are values returned to the caller
//! with a machine-readable code and a message meant to be shown verbatim.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const SINGULAR_MATRIX: &str = "SINGULAR_MATRIX";
    pub const NOT_POSITIVE_DEFINITE: &str = "NOT_POSITIVE_DEFINITE";
    pub const COMPLEX_EIGENVALUES: &str = "COMPLEX_EIGENVALUES";
    pub const UNKNOWN_OPERATION: &str = "UNKNOWN_OPERATION";
}

/// Every failure the engine or dispatcher can report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Missing or malformed field, dimension mismatch, size over the bound
    #[error("{0}")]
    Validation(String),

    /// Inverse requested on a (near-)singular matrix
    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    /// Cholesky on a matrix that is not symmetric positive-definite
    #[error("Matrix is not positive definite: {0}")]
    NotPositiveDefinite(String),

    /// Eigenvalues of a 2×2 matrix with a negative discriminant
    #[error("Complex eigenvalues not supported (discriminant = {discriminant})")]
    ComplexEigenvalues { discriminant: f64 },

    /// Operation name not in the registry
    #[error("Operation '{name}' not implemented or not recognized{}", suggestion_suffix(.suggestion))]
    UnknownOperation {
        name: String,
        suggestion: Option<String>,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" ({})", s),
        None => String::new(),
    }
}

impl CalcError {
    /// Machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            CalcError::Validation(_) => codes::VALIDATION_ERROR,
            CalcError::SingularMatrix(_) => codes::SINGULAR_MATRIX,
            CalcError::NotPositiveDefinite(_) => codes::NOT_POSITIVE_DEFINITE,
            CalcError::ComplexEigenvalues { .. } => codes::COMPLEX_EIGENVALUES,
            CalcError::UnknownOperation { .. } => codes::UNKNOWN_OPERATION,
        }
    }

    // ========== Common Error Constructors ==========

    pub fn validation(details: impl Into<String>) -> Self {
        CalcError::Validation(details.into())
    }

    pub fn missing_field(op: &str, field: &str) -> Self {
        Self::validation(format!("{}: '{}' is required", op, field))
    }

    pub fn dimension_mismatch(op: &str, a: (usize, usize), b: (usize, usize)) -> Self {
        Self::validation(format!(
            "{}: matrices must have same dimensions: {}×{} vs {}×{}",
            op, a.0, a.1, b.0, b.1
        ))
    }

    pub fn not_square(op: &str, rows: usize, cols: usize) -> Self {
        Self::validation(format!("{}: requires square matrix, got {}×{}", op, rows, cols))
    }

    pub fn too_large(op: &str, what: &str, got: usize, max: usize) -> Self {
        Self::validation(format!(
            "{}: {} {} exceeds the maximum of {}",
            op, what, got, max
        ))
    }

    pub fn unknown_operation(name: &str) -> Self {
        CalcError::UnknownOperation { name: name.to_string(), suggestion: None }
    }

    /// Builder: attach a suggestion to an unknown-operation error
    pub fn with_suggestion(self, text: impl Into<String>) -> Self {
        match self {
            CalcError::UnknownOperation { name, .. } => CalcError::UnknownOperation {
                name,
                suggestion: Some(text.into()),
            },
            other => other,
        }
    }
}

/// Result alias used across the workspace
pub type CalcResult<T> = Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            CalcError::validation("x"),
            CalcError::SingularMatrix("x".into()),
            CalcError::NotPositiveDefinite("x".into()),
            CalcError::ComplexEigenvalues { discriminant: -1.0 },
            CalcError::unknown_operation("x"),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 5);
    }

    #[test]
    fn test_unknown_operation_message() {
        let err = CalcError::unknown_operation("mul");
        assert_eq!(err.to_string(), "Operation 'mul' not implemented or not recognized");

        let err = err.with_suggestion("Similar: multiply");
        assert_eq!(
            err.to_string(),
            "Operation 'mul' not implemented or not recognized (Similar: multiply)"
        );
    }

    #[test]
    fn test_singular_message_prefix() {
        let err = CalcError::SingularMatrix("determinant is 0".into());
        assert!(err.to_string().starts_with("Singular matrix"));
        assert_eq!(err.code(), codes::SINGULAR_MATRIX);
    }

    #[test]
    fn test_with_suggestion_ignores_other_kinds() {
        let err = CalcError::validation("bad").with_suggestion("nope");
        assert_eq!(err, CalcError::validation("bad"));
    }
}
