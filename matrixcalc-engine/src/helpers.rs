//! Helper functions for request extraction and shape checks

use matrixcalc_core::{fmt_num, CalcError, CalcResult, Matrix, OperationRequest};
use matrixcalc_plugin::EvalContext;

/// Extract and validate a matrix field, enforcing the size bound
pub fn extract_matrix(
    rows: Option<&Vec<Vec<f64>>>,
    op: &str,
    field: &str,
    ctx: &EvalContext,
) -> CalcResult<Matrix> {
    let rows = rows.ok_or_else(|| CalcError::missing_field(op, field))?;
    let m = Matrix::from_rows(rows, field)?;
    let max = ctx.max_dim();
    if m.rows() > max || m.cols() > max {
        return Err(CalcError::validation(format!(
            "{}: {} is {}×{}, maximum matrix size is {}×{}",
            op, field, m.rows(), m.cols(), max, max
        )));
    }
    Ok(m)
}

/// `matrixA` of the request
pub fn matrix_a(req: &OperationRequest, op: &str, ctx: &EvalContext) -> CalcResult<Matrix> {
    extract_matrix(req.matrix_a.as_ref(), op, "matrixA", ctx)
}

/// `matrixB` of the request
pub fn matrix_b(req: &OperationRequest, op: &str, ctx: &EvalContext) -> CalcResult<Matrix> {
    extract_matrix(req.matrix_b.as_ref(), op, "matrixB", ctx)
}

/// Extract a positive dimension (`size`, `rows`, `cols`) bounded by `max`
pub fn extract_dim(value: Option<i64>, op: &str, field: &str, max: usize) -> CalcResult<usize> {
    let v = value.ok_or_else(|| CalcError::missing_field(op, field))?;
    if v <= 0 {
        return Err(CalcError::validation(format!(
            "{}: {} must be a positive integer, got {}", op, field, v
        )));
    }
    let v = v as usize;
    if v > max {
        return Err(CalcError::too_large(op, field, v, max));
    }
    Ok(v)
}

/// Extract a finite scalar
pub fn extract_scalar(value: Option<f64>, op: &str) -> CalcResult<f64> {
    match value {
        Some(s) if s.is_finite() => Ok(s),
        Some(_) => Err(CalcError::validation(format!("{}: scalar must be a finite number", op))),
        None => Err(CalcError::missing_field(op, "scalar")),
    }
}

/// Check that two matrices have the same dimensions
pub fn check_same_dims(a: &Matrix, b: &Matrix, op: &str) -> CalcResult<()> {
    if a.shape() != b.shape() {
        return Err(CalcError::dimension_mismatch(op, a.shape(), b.shape()));
    }
    Ok(())
}

/// Check that two matrices have compatible dimensions for multiplication
pub fn check_matmul_dims(a: &Matrix, b: &Matrix, op: &str) -> CalcResult<()> {
    if a.cols() != b.rows() {
        return Err(CalcError::validation(format!(
            "{}: incompatible dimensions {}×{} and {}×{} (columns of A must equal rows of B)",
            op, a.rows(), a.cols(), b.rows(), b.cols()
        )));
    }
    Ok(())
}

/// Check that a matrix is square
pub fn check_square(m: &Matrix, op: &str) -> CalcResult<()> {
    if !m.is_square() {
        return Err(CalcError::not_square(op, m.rows(), m.cols()));
    }
    Ok(())
}

/// Zero threshold for pivots of `m`: eps · max(rows, cols) · max|aᵢⱼ|.
///
/// Compare with `<=`; an all-zero matrix has threshold 0 and no pivots.
pub fn pivot_tol(m: &Matrix, eps: f64) -> f64 {
    let (rows, cols) = m.shape();
    eps * rows.max(cols) as f64 * m.as_dmatrix().amax()
}

/// Hadamard bound Π ‖rowᵢ‖₂, the largest |det| a matrix with these rows can have
pub fn hadamard_bound(m: &Matrix) -> f64 {
    m.as_dmatrix().row_iter().map(|row| row.norm()).product()
}

/// "[1, 2.5, -3]"
pub fn fmt_row(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| fmt_num(*v)).collect();
    format!("[{}]", parts.join(", "))
}

/// Parenthesize negatives so "a − (−3)" reads correctly
pub fn fmt_term(value: f64) -> String {
    if value < 0.0 && fmt_num(value) != "0" {
        format!("({})", fmt_num(value))
    } else {
        fmt_num(value)
    }
}

/// "r×c"
pub fn fmt_shape(m: &Matrix) -> String {
    format!("{}×{}", m.rows(), m.cols())
}
