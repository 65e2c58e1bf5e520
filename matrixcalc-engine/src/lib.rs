//! Matrixcalc Engine - Matrix Operations
//!
//! The computational core of the calculator, one plugin per operation:
//! - Arithmetic (add, subtract, multiply, transpose, scalar_multiply, equality)
//! - Construction (identity, zero)
//! - Algebra (determinant, inverse, rank, trace, adjoint)
//! - Decompositions (lu, cholesky, eigen)
//! - Statistics (covariance, correlation)
//! - Utilities (is_square, is_identity, is_zero, is_symmetric, dimensions)
//!
//! Every operation is also available as a plain function taking a
//! `StepRecorder`, so callers can use the engine without the registry.

mod helpers;
mod construct;
mod ops;
mod props;
mod inverse;
mod decompose;
mod stats;

pub use helpers::extract_matrix;
pub use construct::{identity, zero};
pub use ops::{add, subtract, multiply, transpose, scalar_multiply, equality};
pub use props::{determinant, rank, trace, is_square, is_identity, is_zero, is_symmetric, dimensions};
pub use inverse::{inverse, adjoint};
pub use decompose::{lu, cholesky, eigen};
pub use stats::{covariance, correlation};

use matrixcalc_plugin::OperationRegistry;

/// Load matrix operations into registry
pub fn load_matrix_operations(registry: OperationRegistry) -> OperationRegistry {
    registry
        // Basic (6 operations)
        .with_operation(ops::AddFn)
        .with_operation(ops::SubtractFn)
        .with_operation(ops::MultiplyFn)
        .with_operation(ops::TransposeFn)
        .with_operation(ops::EqualityFn)
        .with_operation(ops::ScalarMultiplyFn)

        // Construction (2 operations)
        .with_operation(construct::IdentityFn)
        .with_operation(construct::ZeroFn)

        // Algebra (5 operations)
        .with_operation(props::DeterminantFn)
        .with_operation(props::RankFn)
        .with_operation(props::TraceFn)
        .with_operation(inverse::InverseFn)
        .with_operation(inverse::AdjointFn)

        // Decompositions (3 operations)
        .with_operation(decompose::LuFn)
        .with_operation(decompose::CholeskyFn)
        .with_operation(decompose::EigenFn)

        // Statistics (2 operations)
        .with_operation(stats::CovarianceFn)
        .with_operation(stats::CorrelationFn)

        // Utilities (5 operations)
        .with_operation(props::IsSquareFn)
        .with_operation(props::IsIdentityFn)
        .with_operation(props::IsZeroFn)
        .with_operation(props::IsSymmetricFn)
        .with_operation(props::DimensionsFn)
}

/// Registry with every matrix operation loaded
pub fn standard_registry() -> OperationRegistry {
    load_matrix_operations(OperationRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_matrix_operations() {
        let registry = standard_registry();
        assert_eq!(registry.len(), 23);

        assert!(registry.get("add").is_some());
        assert!(registry.get("scalar_multiply").is_some());
        assert!(registry.get("Cholesky").is_some());
        assert!(registry.get("dimensions").is_some());
        assert!(registry.get("solve").is_none());
    }

    #[test]
    fn test_meta_names_match_keys() {
        let registry = standard_registry();
        for meta in registry.list_operations(None) {
            let op = registry.get(meta.name).unwrap();
            assert_eq!(op.meta().name, meta.name);
            assert!(!meta.title.is_empty());
        }
    }

    #[test]
    fn test_categories() {
        let registry = standard_registry();
        assert_eq!(registry.list_operations(Some("decomposition")).len(), 3);
        assert_eq!(registry.list_operations(Some("statistics")).len(), 2);
        assert_eq!(registry.list_operations(Some("utilities")).len(), 5);
    }
}
