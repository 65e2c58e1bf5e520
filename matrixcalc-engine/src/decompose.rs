//! Matrix decomposition functions

use matrixcalc_plugin::prelude::*;
use nalgebra::DMatrix;
use crate::helpers::*;
use crate::props::is_symmetric;

/// Doolittle LU factorization without pivoting: A = L·U with unit-diagonal L.
///
/// Fails when a pivot before the last row is at or below `pivot_tol(A, eps)`,
/// since the factorization would need row exchanges.
pub fn lu(a: &Matrix, eps: f64, rec: &mut StepRecorder) -> CalcResult<(Matrix, Matrix)> {
    check_square(a, "lu")?;
    let n = a.rows();
    let tol = pivot_tol(a, eps);
    let mut l = DMatrix::<f64>::identity(n, n);
    let mut u = DMatrix::<f64>::zeros(n, n);

    rec.note("LU Decomposition", || {
        "Decompose A into L (unit lower triangular) and U (upper triangular), row by row.".to_string()
    });

    for i in 0..n {
        for k in i..n {
            let sum: f64 = (0..i).map(|j| l[(i, j)] * u[(j, k)]).sum();
            u[(i, k)] = a.at(i, k) - sum;
        }
        rec.record(|| Step::new(format!("U Row {}", i + 1), {
            let entries: Vec<String> = (i..n)
                .map(|k| {
                    if i == 0 {
                        format!("U({},{}) = {}", i + 1, k + 1, fmt_num(u[(i, k)]))
                    } else {
                        let terms: Vec<String> = (0..i)
                            .map(|j| format!("{}·{}", fmt_term(l[(i, j)]), fmt_term(u[(j, k)])))
                            .collect();
                        format!(
                            "U({},{}) = {} − ({}) = {}",
                            i + 1, k + 1, fmt_num(a.at(i, k)), terms.join(" + "), fmt_num(u[(i, k)])
                        )
                    }
                })
                .collect();
            entries.join("; ")
        }));

        if i + 1 == n {
            break;
        }

        let pivot = u[(i, i)];
        if pivot.abs() <= tol {
            return Err(CalcError::validation(format!(
                "lu: zero pivot U({},{}); this matrix needs row exchanges, LU without pivoting does not exist",
                i + 1, i + 1
            )));
        }

        for k in (i + 1)..n {
            let sum: f64 = (0..i).map(|j| l[(k, j)] * u[(j, i)]).sum();
            l[(k, i)] = (a.at(k, i) - sum) / pivot;
        }
        rec.record(|| Step::new(format!("L Column {}", i + 1), {
            let entries: Vec<String> = ((i + 1)..n)
                .map(|k| {
                    let sum: f64 = (0..i).map(|j| l[(k, j)] * u[(j, i)]).sum();
                    format!(
                        "L({},{}) = ({} − {}) / {} = {}",
                        k + 1, i + 1, fmt_num(a.at(k, i)), fmt_term(sum), fmt_term(pivot), fmt_num(l[(k, i)])
                    )
                })
                .collect();
            entries.join("; ")
        }));
    }

    let (l, u) = (Matrix::from_dmatrix(l), Matrix::from_dmatrix(u));
    rec.note("Verify", || format!("L × U = A with L = {} and U = {}", l, u));
    Ok((l, u))
}

/// Cholesky factorization A = L·Lᵗ of a symmetric positive-definite matrix.
///
/// L comes from nalgebra; a pivot L(i,i)² at or below `pivot_tol(A, eps)`
/// is rejected as not positive definite.
pub fn cholesky(a: &Matrix, eps: f64, rec: &mut StepRecorder) -> CalcResult<Matrix> {
    check_square(a, "cholesky")?;
    if !is_symmetric(a, eps, &mut StepRecorder::disabled()) {
        return Err(CalcError::NotPositiveDefinite("matrix must be symmetric".to_string()));
    }

    let n = a.rows();
    let tol = pivot_tol(a, eps);
    let l = a.as_dmatrix().clone().cholesky()
        .map(|chol| chol.l())
        .ok_or_else(|| CalcError::NotPositiveDefinite("a pivot is zero or negative".to_string()))?;

    if let Some(i) = (0..n).find(|&i| l[(i, i)] * l[(i, i)] <= tol) {
        return Err(CalcError::NotPositiveDefinite(format!(
            "pivot {:e} at ({},{}) is within the zero threshold {:e}",
            l[(i, i)] * l[(i, i)], i + 1, i + 1, tol
        )));
    }

    rec.note("Cholesky", || "Find lower triangular L such that A = L × Lᵀ.".to_string());
    if rec.is_enabled() {
        for i in 0..n {
            for j in 0..=i {
                let sum: f64 = (0..j).map(|k| l[(i, k)] * l[(j, k)]).sum();
                if i == j {
                    rec.note("Diagonal", || {
                        format!(
                            "L({},{}) = √({} − {}) = {}",
                            i + 1, i + 1, fmt_num(a.at(i, i)), fmt_term(sum), fmt_num(l[(i, i)])
                        )
                    });
                } else {
                    rec.note("Below Diagonal", || {
                        format!(
                            "L({},{}) = ({} − {}) / {} = {}",
                            i + 1, j + 1, fmt_num(a.at(i, j)), fmt_term(sum),
                            fmt_term(l[(j, j)]), fmt_num(l[(i, j)])
                        )
                    });
                }
            }
        }
    }

    let l = Matrix::from_dmatrix(l);
    rec.note("Result", || format!("L = {}", l));
    Ok(l)
}

/// Real eigenvalues of a 2×2 matrix from λ² − tr(A)·λ + det(A) = 0,
/// larger root first
pub fn eigen(a: &Matrix, eps: f64, rec: &mut StepRecorder) -> CalcResult<(f64, f64)> {
    if a.shape() != (2, 2) {
        return Err(CalcError::validation(format!(
            "eigen: eigenvalues are only supported for 2×2 matrices, got {}",
            fmt_shape(a)
        )));
    }

    let (p, q, r, s) = (a.at(0, 0), a.at(0, 1), a.at(1, 0), a.at(1, 1));
    let tr = p + s;
    let det = p * s - q * r;
    let mut disc = tr * tr - 4.0 * det;

    rec.note("Characteristic Equation", || {
        format!(
            "det(A − λI) = λ² − {}λ + {} = 0 (trace {}, determinant {})",
            fmt_term(tr), fmt_term(det), fmt_num(tr), fmt_num(det)
        )
    });
    rec.note("Discriminant", || {
        format!("Δ = {}² − 4·{} = {}", fmt_term(tr), fmt_term(det), fmt_num(disc))
    });

    // round-off in Δ grows with tr² and |det|
    let slack = eps * (tr * tr + 4.0 * det.abs()).max(1.0);
    if disc < 0.0 {
        if disc > -slack {
            disc = 0.0;
        } else {
            return Err(CalcError::ComplexEigenvalues { discriminant: disc });
        }
    }

    let root = disc.sqrt();
    let (l1, l2) = ((tr + root) / 2.0, (tr - root) / 2.0);
    rec.note("Eigenvalues", || {
        format!(
            "λ₁ = ({} + √{}) / 2 = {}, λ₂ = ({} − √{}) / 2 = {}",
            fmt_num(tr), fmt_num(disc), fmt_num(l1), fmt_num(tr), fmt_num(disc), fmt_num(l2)
        )
    });
    Ok((l1, l2))
}

static SQUARE_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrixA", "Matrix", "Square matrix")];
static TWO_BY_TWO_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrixA", "Matrix", "2×2 matrix")];

// ============ lu ============

pub struct LuFn;

static LU_RELATED: [&str; 2] = ["cholesky", "determinant"];

impl OperationPlugin for LuFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "lu", title: "LU Decomposition",
            description: "LU decomposition without pivoting (returns {L, U})",
            args: &SQUARE_ARGS, returns: "Lu", category: "decomposition", related: &LU_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "lu", ctx)?;
        let eps = ctx.epsilon();
        let (l, u) = lu(&a, eps, &mut ctx.steps)?;
        Ok(OpResult::Lu { l, u })
    }
}

// ============ cholesky ============

pub struct CholeskyFn;

static CHOL_RELATED: [&str; 2] = ["lu", "is_symmetric"];

impl OperationPlugin for CholeskyFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "cholesky", title: "Cholesky Decomposition",
            description: "Cholesky decomposition (returns lower triangular L where A = L*L')",
            args: &SQUARE_ARGS, returns: "Cholesky", category: "decomposition", related: &CHOL_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "cholesky", ctx)?;
        let eps = ctx.epsilon();
        let l = cholesky(&a, eps, &mut ctx.steps)?;
        Ok(OpResult::Cholesky { l })
    }
}

// ============ eigen ============

pub struct EigenFn;

static EIGEN_RELATED: [&str; 2] = ["trace", "determinant"];

impl OperationPlugin for EigenFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "eigen", title: "Eigenvalues",
            description: "Real eigenvalues of a 2×2 matrix",
            args: &TWO_BY_TWO_ARGS, returns: "Eigen", category: "decomposition", related: &EIGEN_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "eigen", ctx)?;
        let eps = ctx.epsilon();
        let (l1, l2) = eigen(&a, eps, &mut ctx.steps)?;
        Ok(OpResult::Eigen(l1, l2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{multiply, transpose};

    const EPS: f64 = 1e-10;

    fn m(rows: &[&[f64]]) -> Matrix {
        let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
        Matrix::from_rows(&rows, "m").unwrap()
    }

    fn off() -> StepRecorder {
        StepRecorder::disabled()
    }

    #[test]
    fn test_lu_decomposition() {
        let a = m(&[&[4.0, 3.0], &[6.0, 3.0]]);
        let (l, u) = lu(&a, EPS, &mut off()).unwrap();

        assert!(l.approx_eq(&m(&[&[1.0, 0.0], &[1.5, 1.0]]), 1e-12));
        assert!(u.approx_eq(&m(&[&[4.0, 3.0], &[0.0, -1.5]]), 1e-12));
        assert!(multiply(&l, &u, &mut off()).unwrap().approx_eq(&a, 1e-12));
    }

    #[test]
    fn test_lu_reconstructs_3x3() {
        let a = m(&[&[2.0, -1.0, -2.0], &[-4.0, 6.0, 3.0], &[-4.0, -2.0, 8.0]]);
        let (l, u) = lu(&a, EPS, &mut off()).unwrap();
        assert!(multiply(&l, &u, &mut off()).unwrap().approx_eq(&a, 1e-10));
        assert!(u.approx_eq(&m(&[&[2.0, -1.0, -2.0], &[0.0, 4.0, -1.0], &[0.0, 0.0, 3.0]]), 1e-12));
    }

    #[test]
    fn test_lu_needs_pivoting() {
        let err = lu(&m(&[&[0.0, 1.0], &[1.0, 0.0]]), EPS, &mut off()).unwrap_err();
        assert_eq!(err.code(), codes::VALIDATION_ERROR);
        assert!(err.to_string().contains("zero pivot U(1,1)"));
    }

    #[test]
    fn test_lu_singular_last_pivot_is_fine() {
        let (_, u) = lu(&m(&[&[1.0, 2.0], &[2.0, 4.0]]), EPS, &mut off()).unwrap();
        assert_eq!(u.at(1, 1), 0.0);
    }

    #[test]
    fn test_lu_steps() {
        let mut rec = StepRecorder::enabled();
        lu(&m(&[&[4.0, 3.0], &[6.0, 3.0]]), EPS, &mut rec).unwrap();
        let titles: Vec<&str> = rec.steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["LU Decomposition", "U Row 1", "L Column 1", "U Row 2", "Verify"]);
        assert_eq!(rec.steps()[2].description, "L(2,1) = (6 − 0) / 4 = 1.5");
        assert_eq!(rec.steps()[3].description, "U(2,2) = 3 − (1.5·3) = -1.5");
    }

    #[test]
    fn test_cholesky() {
        let a = m(&[&[4.0, 12.0], &[12.0, 37.0]]);
        let l = cholesky(&a, EPS, &mut off()).unwrap();
        assert!(l.approx_eq(&m(&[&[2.0, 0.0], &[6.0, 1.0]]), 1e-12));

        let lt = transpose(&l, &mut off());
        assert!(multiply(&l, &lt, &mut off()).unwrap().approx_eq(&a, 1e-10));
    }

    #[test]
    fn test_cholesky_3x3() {
        let a = m(&[&[4.0, 12.0, -16.0], &[12.0, 37.0, -43.0], &[-16.0, -43.0, 98.0]]);
        let l = cholesky(&a, EPS, &mut off()).unwrap();
        assert!(l.approx_eq(&m(&[&[2.0, 0.0, 0.0], &[6.0, 1.0, 0.0], &[-8.0, 5.0, 3.0]]), 1e-10));
    }

    #[test]
    fn test_cholesky_rejects() {
        let err = cholesky(&m(&[&[1.0, 2.0], &[2.0, 1.0]]), EPS, &mut off()).unwrap_err();
        assert_eq!(err.code(), codes::NOT_POSITIVE_DEFINITE);

        let err = cholesky(&m(&[&[4.0, 1.0], &[2.0, 3.0]]), EPS, &mut off()).unwrap_err();
        assert_eq!(err, CalcError::NotPositiveDefinite("matrix must be symmetric".to_string()));
    }

    #[test]
    fn test_cholesky_is_scale_invariant() {
        for scale in [1e-6, 1e-3, 1e3, 1e6] {
            let a = m(&[&[4.0 * scale, 12.0 * scale], &[12.0 * scale, 37.0 * scale]]);
            let l = cholesky(&a, EPS, &mut off()).unwrap();
            let root = scale.sqrt();
            let expected = m(&[&[2.0 * root, 0.0], &[6.0 * root, root]]);
            assert!(l.approx_eq(&expected, 1e-9 * root.max(1.0)), "scale = {scale}: L = {l}");

            let b = m(&[&[scale, 2.0 * scale], &[2.0 * scale, scale]]);
            let err = cholesky(&b, EPS, &mut off()).unwrap_err();
            assert_eq!(err.code(), codes::NOT_POSITIVE_DEFINITE, "scale = {scale}");
        }
    }

    #[test]
    fn test_cholesky_tiny_positive_pivot() {
        let l = cholesky(&m(&[&[1e-11]]), EPS, &mut off()).unwrap();
        assert!((l.at(0, 0) - 1e-11f64.sqrt()).abs() < 1e-20);
    }

    #[test]
    fn test_cholesky_semidefinite() {
        let err = cholesky(&m(&[&[1e6, 1e6], &[1e6, 1e6]]), EPS, &mut off()).unwrap_err();
        assert_eq!(err.code(), codes::NOT_POSITIVE_DEFINITE);
    }

    #[test]
    fn test_lu_zero_pivot_at_large_scale() {
        let err = lu(&m(&[&[1e6, 2e6, 3e6], &[2e6, 4e6, 7e6], &[1e6, 1e6, 1e6]]), EPS, &mut off()).unwrap_err();
        assert!(err.to_string().contains("zero pivot U(2,2)"), "{err}");
    }

    #[test]
    fn test_cholesky_steps() {
        let mut rec = StepRecorder::enabled();
        cholesky(&m(&[&[4.0, 12.0], &[12.0, 37.0]]), EPS, &mut rec).unwrap();
        assert_eq!(rec.steps()[1].description, "L(1,1) = √(4 − 0) = 2");
        assert_eq!(rec.steps()[2].description, "L(2,1) = (12 − 0) / 2 = 6");
        assert_eq!(rec.steps()[3].description, "L(2,2) = √(37 − 36) = 1");
    }

    #[test]
    fn test_eigen_diagonal() {
        let (l1, l2) = eigen(&m(&[&[2.0, 0.0], &[0.0, 3.0]]), EPS, &mut off()).unwrap();
        assert_eq!((l1, l2), (3.0, 2.0));
    }

    #[test]
    fn test_eigen_symmetric() {
        let (l1, l2) = eigen(&m(&[&[2.0, 1.0], &[1.0, 2.0]]), EPS, &mut off()).unwrap();
        assert!((l1 - 3.0).abs() < 1e-12);
        assert!((l2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_eigen_repeated_root() {
        let (l1, l2) = eigen(&m(&[&[1.0, 1.0], &[0.0, 1.0]]), EPS, &mut off()).unwrap();
        assert_eq!((l1, l2), (1.0, 1.0));
    }

    #[test]
    fn test_eigen_complex() {
        let err = eigen(&m(&[&[0.0, -1.0], &[1.0, 0.0]]), EPS, &mut off()).unwrap_err();
        assert_eq!(err, CalcError::ComplexEigenvalues { discriminant: -4.0 });
    }

    #[test]
    fn test_eigen_requires_2x2() {
        let err = eigen(&Matrix::identity(3), EPS, &mut off()).unwrap_err();
        assert_eq!(err.code(), codes::VALIDATION_ERROR);
    }
}
