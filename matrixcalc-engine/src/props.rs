//! Matrix properties: determinant, rank, trace, structural predicates

use matrixcalc_plugin::prelude::*;
use crate::helpers::*;

/// det(A).
///
/// 1×1 and 2×2 use the closed forms; larger matrices use Gaussian
/// elimination with partial pivoting, tracking the sign of row swaps.
pub fn determinant(a: &Matrix, rec: &mut StepRecorder) -> CalcResult<f64> {
    check_square(a, "determinant")?;
    let n = a.rows();

    if n == 1 {
        let det = a.at(0, 0);
        rec.note("Determinant", || format!("For a 1×1 matrix det(A) = a = {}", fmt_num(det)));
        return Ok(det);
    }

    if n == 2 {
        let (p, q, r, s) = (a.at(0, 0), a.at(0, 1), a.at(1, 0), a.at(1, 1));
        let det = p * s - q * r;
        rec.note("Formula", || "For a 2×2 matrix det(A) = ad − bc".to_string());
        rec.note("Result", || {
            format!(
                "det(A) = {}·{} − {}·{} = {}",
                fmt_term(p), fmt_term(s), fmt_term(q), fmt_term(r), fmt_num(det)
            )
        });
        return Ok(det);
    }

    let mut m = a.as_dmatrix().clone();
    let mut sign = 1.0;

    for k in 0..n {
        let (p, pivot_abs) = (k..n)
            .map(|i| (i, m[(i, k)].abs()))
            .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if pivot_abs == 0.0 {
            rec.note("Zero Column", || {
                format!("Column {} has no non-zero pivot at or below row {}, so det(A) = 0", k + 1, k + 1)
            });
            return Ok(0.0);
        }

        if p != k {
            m.swap_rows(k, p);
            sign = -sign;
            rec.note("Pivot", || {
                format!(
                    "Swap R{} and R{} to use the largest pivot {} (determinant changes sign)",
                    k + 1, p + 1, fmt_num(m[(k, k)])
                )
            });
        } else {
            rec.note("Pivot", || format!("Pivot for column {} is {}", k + 1, fmt_num(m[(k, k)])));
        }

        for i in (k + 1)..n {
            let factor = m[(i, k)] / m[(k, k)];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                let delta = factor * m[(k, j)];
                m[(i, j)] -= delta;
            }
            rec.note("Eliminate", || {
                format!("R{} ← R{} − {}·R{}", i + 1, i + 1, fmt_term(factor), k + 1)
            });
        }
    }

    let diagonal: Vec<f64> = (0..n).map(|i| m[(i, i)]).collect();
    let det = sign * diagonal.iter().product::<f64>();
    rec.note("Result", || {
        let terms: Vec<String> = diagonal.iter().map(|d| fmt_term(*d)).collect();
        let prefix = if sign < 0.0 { "−1 × " } else { "" };
        format!("det(A) = {}{} = {}", prefix, terms.join(" × "), fmt_num(det))
    });
    Ok(det)
}

/// rank(A) via reduced row echelon form with partial pivoting.
///
/// Pivots at or below `pivot_tol(A, eps)` count as zero.
pub fn rank(a: &Matrix, eps: f64, rec: &mut StepRecorder) -> usize {
    let mut m = a.as_dmatrix().clone();
    let (rows, cols) = a.shape();
    let tol = pivot_tol(a, eps);
    let mut rank = 0;

    for col in 0..cols {
        if rank >= rows {
            break;
        }

        let (p, pivot_abs) = (rank..rows)
            .map(|i| (i, m[(i, col)].abs()))
            .fold((rank, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if pivot_abs <= tol {
            rec.note("No Pivot", || {
                format!("Column {} has no usable pivot (all remaining entries ≈ 0)", col + 1)
            });
            continue;
        }

        if p != rank {
            m.swap_rows(rank, p);
            rec.note("Swap Rows", || format!("Swap R{} and R{}", rank + 1, p + 1));
        }

        let pivot = m[(rank, col)];
        for j in col..cols {
            m[(rank, j)] /= pivot;
        }
        rec.note("Pivot", || {
            format!("Pivot {} at ({}, {}): divide R{} by it", fmt_num(pivot), rank + 1, col + 1, rank + 1)
        });

        for i in 0..rows {
            if i == rank {
                continue;
            }
            let factor = m[(i, col)];
            if factor.abs() <= tol {
                continue;
            }
            for j in col..cols {
                let delta = factor * m[(rank, j)];
                m[(i, j)] -= delta;
            }
            rec.note("Eliminate", || {
                format!("R{} ← R{} − {}·R{}", i + 1, i + 1, fmt_term(factor), rank + 1)
            });
        }

        rank += 1;
    }

    rec.note("Count", || format!("Row echelon form has {} non-zero rows", rank));
    rec.note("Result", || format!("Rank = {}", rank));
    rank
}

/// tr(A), the sum of the diagonal
pub fn trace(a: &Matrix, rec: &mut StepRecorder) -> CalcResult<f64> {
    check_square(a, "trace")?;
    let diagonal: Vec<f64> = (0..a.rows()).map(|i| a.at(i, i)).collect();
    let sum = diagonal.iter().sum::<f64>();
    rec.note("Trace", || "Sum of diagonal elements.".to_string());
    rec.note("Result", || {
        let terms: Vec<String> = diagonal.iter().map(|d| fmt_term(*d)).collect();
        format!("tr(A) = {} = {}", terms.join(" + "), fmt_num(sum))
    });
    Ok(sum)
}

pub fn is_square(a: &Matrix, rec: &mut StepRecorder) -> bool {
    let square = a.is_square();
    rec.note("Check", || format!("rows == columns? {} vs {}", a.rows(), a.cols()));
    rec.note("Result", || if square { "Square".to_string() } else { "Not square".to_string() });
    square
}

/// Square, diagonal ≈ 1, everything else ≈ 0
pub fn is_identity(a: &Matrix, eps: f64, rec: &mut StepRecorder) -> bool {
    rec.note("Check", || "Diagonal = 1, others = 0?".to_string());
    if !a.is_square() {
        rec.note("Result", || format!("Not identity: {} is not square", fmt_shape(a)));
        return false;
    }
    let identity = a.approx_eq(&Matrix::identity(a.rows()), eps);
    rec.note("Result", || if identity { "Identity".to_string() } else { "Not identity".to_string() });
    identity
}

/// Every element ≈ 0
pub fn is_zero(a: &Matrix, eps: f64, rec: &mut StepRecorder) -> bool {
    let offender = a.flatten().into_iter().position(|v| v.abs() > eps);
    rec.note("Check", || "All elements = 0?".to_string());
    rec.note("Result", || match offender {
        None => "Zero matrix".to_string(),
        Some(idx) => format!(
            "Not zero matrix: element ({}, {}) is {}",
            idx / a.cols() + 1, idx % a.cols() + 1, fmt_num(a.flatten()[idx])
        ),
    });
    offender.is_none()
}

/// A ≈ Aᵗ
pub fn is_symmetric(a: &Matrix, eps: f64, rec: &mut StepRecorder) -> bool {
    rec.note("Check", || "A = Aᵀ?".to_string());
    if !a.is_square() {
        rec.note("Result", || format!("Not symmetric: {} is not square", fmt_shape(a)));
        return false;
    }
    let n = a.rows();
    let mismatch = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .find(|&(i, j)| (a.at(i, j) - a.at(j, i)).abs() > eps);

    rec.note("Result", || match mismatch {
        None => "Symmetric".to_string(),
        Some((i, j)) => format!(
            "Not symmetric: A({},{}) = {} but A({},{}) = {}",
            i + 1, j + 1, fmt_num(a.at(i, j)), j + 1, i + 1, fmt_num(a.at(j, i))
        ),
    });
    mismatch.is_none()
}

/// (rows, cols)
pub fn dimensions(a: &Matrix, rec: &mut StepRecorder) -> (usize, usize) {
    rec.note("Count", || format!("{} rows, {} columns", a.rows(), a.cols()));
    a.shape()
}

static A_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrixA", "Matrix", "Matrix to inspect")];
static SQUARE_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrixA", "Matrix", "Square matrix")];

// ============ determinant ============

pub struct DeterminantFn;

static DET_RELATED: [&str; 2] = ["inverse", "lu"];

impl OperationPlugin for DeterminantFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "determinant", title: "Determinant",
            description: "Determinant (closed form up to 2×2, partial-pivoting elimination above)",
            args: &SQUARE_ARGS, returns: "Scalar", category: "algebra", related: &DET_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "determinant", ctx)?;
        determinant(&a, &mut ctx.steps).map(OpResult::Scalar)
    }
}

// ============ rank ============

pub struct RankFn;

static RANK_RELATED: [&str; 1] = ["determinant"];

impl OperationPlugin for RankFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "rank", title: "Matrix Rank",
            description: "Number of linearly independent rows (row reduction with pivoting)",
            args: &A_ARGS, returns: "Count", category: "algebra", related: &RANK_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "rank", ctx)?;
        let eps = ctx.epsilon();
        Ok(OpResult::Count(rank(&a, eps, &mut ctx.steps)))
    }
}

// ============ trace ============

pub struct TraceFn;

static TRACE_RELATED: [&str; 1] = ["eigen"];

impl OperationPlugin for TraceFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "trace", title: "Trace",
            description: "Sum of the diagonal elements",
            args: &SQUARE_ARGS, returns: "Scalar", category: "algebra", related: &TRACE_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "trace", ctx)?;
        trace(&a, &mut ctx.steps).map(OpResult::Scalar)
    }
}

// ============ is_square ============

pub struct IsSquareFn;

static IS_SQUARE_RELATED: [&str; 2] = ["is_symmetric", "dimensions"];

impl OperationPlugin for IsSquareFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "is_square", title: "Check Square Matrix",
            description: "Check if matrix is square (rows == cols)",
            args: &A_ARGS, returns: "Label", category: "utilities", related: &IS_SQUARE_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "is_square", ctx)?;
        Ok(OpResult::yes_no(is_square(&a, &mut ctx.steps)))
    }
}

// ============ is_identity ============

pub struct IsIdentityFn;

static IS_IDENTITY_RELATED: [&str; 1] = ["identity"];

impl OperationPlugin for IsIdentityFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "is_identity", title: "Check Identity Matrix",
            description: "Check if matrix is the identity (within epsilon)",
            args: &A_ARGS, returns: "Label", category: "utilities", related: &IS_IDENTITY_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "is_identity", ctx)?;
        let eps = ctx.epsilon();
        Ok(OpResult::yes_no(is_identity(&a, eps, &mut ctx.steps)))
    }
}

// ============ is_zero ============

pub struct IsZeroFn;

static IS_ZERO_RELATED: [&str; 1] = ["zero"];

impl OperationPlugin for IsZeroFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "is_zero", title: "Check Zero Matrix",
            description: "Check if every element is zero (within epsilon)",
            args: &A_ARGS, returns: "Label", category: "utilities", related: &IS_ZERO_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "is_zero", ctx)?;
        let eps = ctx.epsilon();
        Ok(OpResult::yes_no(is_zero(&a, eps, &mut ctx.steps)))
    }
}

// ============ is_symmetric ============

pub struct IsSymmetricFn;

static IS_SYMMETRIC_RELATED: [&str; 2] = ["transpose", "cholesky"];

impl OperationPlugin for IsSymmetricFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "is_symmetric", title: "Check Symmetric Matrix",
            description: "Check if A equals its transpose (within epsilon)",
            args: &A_ARGS, returns: "Label", category: "utilities", related: &IS_SYMMETRIC_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "is_symmetric", ctx)?;
        let eps = ctx.epsilon();
        Ok(OpResult::yes_no(is_symmetric(&a, eps, &mut ctx.steps)))
    }
}

// ============ dimensions ============

pub struct DimensionsFn;

static DIMENSIONS_RELATED: [&str; 1] = ["is_square"];

impl OperationPlugin for DimensionsFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "dimensions", title: "Matrix Dimensions",
            description: "Number of rows and columns",
            args: &A_ARGS, returns: "Dimensions", category: "utilities", related: &DIMENSIONS_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "dimensions", ctx)?;
        let (rows, cols) = dimensions(&a, &mut ctx.steps);
        Ok(OpResult::Dimensions { rows, cols })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    fn m(rows: &[&[f64]]) -> Matrix {
        let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
        Matrix::from_rows(&rows, "m").unwrap()
    }

    fn off() -> StepRecorder {
        StepRecorder::disabled()
    }

    #[test]
    fn test_determinant_closed_forms() {
        assert_eq!(determinant(&m(&[&[-7.0]]), &mut off()).unwrap(), -7.0);
        assert_eq!(determinant(&m(&[&[1.0, 2.0], &[3.0, 4.0]]), &mut off()).unwrap(), -2.0);
    }

    #[test]
    fn test_determinant_of_identity_is_one() {
        for n in 1..=10 {
            let det = determinant(&Matrix::identity(n), &mut off()).unwrap();
            assert!((det - 1.0).abs() < EPS, "n = {n}: det = {det}");
        }
    }

    #[test]
    fn test_determinant_with_pivoting() {
        // zero in the top-left forces a row swap
        let a = m(&[&[0.0, 2.0, 1.0], &[1.0, 1.0, 0.0], &[2.0, 0.0, 3.0]]);
        let det = determinant(&a, &mut off()).unwrap();
        assert!((det - (-8.0)).abs() < EPS, "det = {det}");

        let b = m(&[&[6.0, 1.0, 1.0], &[4.0, -2.0, 5.0], &[2.0, 8.0, 7.0]]);
        let det = determinant(&b, &mut off()).unwrap();
        assert!((det - (-306.0)).abs() < 1e-9, "det = {det}");
    }

    #[test]
    fn test_determinant_singular_and_non_square() {
        let a = m(&[&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], &[0.0, 0.0, 0.0]]);
        assert_eq!(determinant(&a, &mut off()).unwrap(), 0.0);

        let err = determinant(&m(&[&[1.0, 2.0]]), &mut off()).unwrap_err();
        assert_eq!(err.to_string(), "determinant: requires square matrix, got 1×2");
    }

    #[test]
    fn test_determinant_steps_carry_values() {
        let mut rec = StepRecorder::enabled();
        determinant(&m(&[&[1.0, 2.0], &[3.0, 4.0]]), &mut rec).unwrap();
        assert_eq!(rec.steps()[1].description, "det(A) = 1·4 − 2·3 = -2");

        let mut rec = StepRecorder::enabled();
        determinant(&m(&[&[0.0, 2.0, 1.0], &[1.0, 1.0, 0.0], &[2.0, 0.0, 3.0]]), &mut rec).unwrap();
        assert!(rec.steps()[0].description.starts_with("Swap R1 and R3"));
        assert!(rec.steps().last().unwrap().description.ends_with("= -8"));
    }

    #[test]
    fn test_rank() {
        assert_eq!(rank(&m(&[&[1.0, 2.0], &[2.0, 4.0]]), EPS, &mut off()), 1);
        assert_eq!(rank(&Matrix::identity(3), EPS, &mut off()), 3);
        assert_eq!(rank(&Matrix::zeros(2, 3), EPS, &mut off()), 0);
        assert_eq!(rank(&m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]), EPS, &mut off()), 2);
        assert_eq!(rank(&m(&[&[1.0, 2.0, 3.0], &[0.0, 1.0, 4.0]]), EPS, &mut off()), 2);
        assert_eq!(rank(&m(&[&[1.0], &[2.0], &[3.0]]), EPS, &mut off()), 1);
    }

    #[test]
    fn test_rank_is_scale_invariant() {
        let base = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        for scale in [1e-6, 1e-3, 1.0, 1e3, 1e6] {
            let rows: Vec<Vec<f64>> = base.iter().map(|r| r.iter().map(|v| v * scale).collect()).collect();
            let a = Matrix::from_rows(&rows, "a").unwrap();
            assert_eq!(rank(&a, EPS, &mut off()), 2, "scale = {scale}");
        }

        let tiny = m(&[&[1e-12, 0.0], &[0.0, 1e-12]]);
        assert_eq!(rank(&tiny, EPS, &mut off()), 2);
        let huge = m(&[&[1e8, 2e8], &[3e8, 4e8]]);
        assert_eq!(rank(&huge, EPS, &mut off()), 2);
    }

    #[test]
    fn test_trace() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        let mut rec = StepRecorder::enabled();
        assert_eq!(trace(&a, &mut rec).unwrap(), 15.0);
        assert_eq!(rec.steps()[1].description, "tr(A) = 1 + 5 + 9 = 15");
        assert!(trace(&m(&[&[1.0, 2.0]]), &mut off()).is_err());
    }

    #[test]
    fn test_predicates() {
        assert!(is_square(&Matrix::identity(2), &mut off()));
        assert!(!is_square(&m(&[&[1.0, 2.0]]), &mut off()));

        assert!(is_identity(&m(&[&[1.0, 1e-12], &[0.0, 1.0]]), EPS, &mut off()));
        assert!(!is_identity(&m(&[&[1.0, 0.0]]), EPS, &mut off()));
        assert!(!is_identity(&m(&[&[2.0, 0.0], &[0.0, 1.0]]), EPS, &mut off()));

        assert!(is_zero(&Matrix::zeros(3, 2), EPS, &mut off()));
        assert!(!is_zero(&m(&[&[0.0, 0.1]]), EPS, &mut off()));

        assert!(is_symmetric(&m(&[&[1.0, 2.0], &[2.0, 1.0]]), EPS, &mut off()));
        assert!(!is_symmetric(&m(&[&[1.0, 2.0], &[3.0, 1.0]]), EPS, &mut off()));
        assert!(!is_symmetric(&m(&[&[1.0, 2.0]]), EPS, &mut off()));
    }

    #[test]
    fn test_is_symmetric_steps_name_mismatch() {
        let mut rec = StepRecorder::enabled();
        is_symmetric(&m(&[&[1.0, 2.0], &[3.0, 1.0]]), EPS, &mut rec);
        assert_eq!(rec.steps()[1].description, "Not symmetric: A(1,2) = 2 but A(2,1) = 3");
    }

    #[test]
    fn test_dimensions_fn() {
        let req = OperationRequest::new("dimensions").with_a(vec![vec![1.0, 2.0, 3.0]]);
        let result = DimensionsFn.call(&req, &mut EvalContext::default()).unwrap();
        assert_eq!(result, OpResult::Dimensions { rows: 1, cols: 3 });
    }
}
