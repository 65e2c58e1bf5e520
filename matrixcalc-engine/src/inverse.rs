//! Inverse and adjugate

use matrixcalc_plugin::prelude::*;
use nalgebra::DMatrix;
use crate::helpers::*;
use crate::props::determinant;

/// A⁻¹.
///
/// Singular when |det(A)| < `eps` or |det(A)| ≤ `eps` · Hadamard bound of A.
/// 2×2 uses the adjugate formula, everything else Gauss-Jordan elimination
/// with partial pivoting.
pub fn inverse(a: &Matrix, eps: f64, rec: &mut StepRecorder) -> CalcResult<Matrix> {
    check_square(a, "inverse")?;
    let n = a.rows();

    let det = determinant(a, &mut StepRecorder::disabled())?;
    rec.note("Calculate Determinant", || {
        format!("det(A) = {}. If it is 0 the matrix is not invertible.", fmt_num(det))
    });
    let relative = eps * hadamard_bound(a);
    if det.abs() < eps || det.abs() <= relative {
        return Err(CalcError::SingularMatrix(format!(
            "|det(A)| = {:e} is within the singularity threshold {:e}, inverse does not exist",
            det.abs(), eps.max(relative)
        )));
    }

    if n == 2 {
        let adj = adjoint(a, &mut StepRecorder::disabled())?;
        rec.note("Adjoint Matrix", || format!("adj(A) = [[d, −b], [−c, a]] = {}", adj));
        let inv = Matrix::from_dmatrix(adj.as_dmatrix() / det);
        rec.note("Divide", || format!("A⁻¹ = (1/{}) × adj(A) = {}", fmt_num(det), inv));
        return Ok(inv);
    }

    // Gauss-Jordan on [A | I]
    let tol = pivot_tol(a, eps);
    let mut m = a.as_dmatrix().clone();
    let mut inv = DMatrix::<f64>::identity(n, n);
    rec.note("Augment", || format!("Start from [A | I] with the {}×{} identity on the right", n, n));

    for col in 0..n {
        let (p, pivot_abs) = (col..n)
            .map(|i| (i, m[(i, col)].abs()))
            .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if pivot_abs <= tol {
            return Err(CalcError::SingularMatrix(format!(
                "no pivot above {:e} in column {}, inverse does not exist", tol, col + 1
            )));
        }

        if p != col {
            m.swap_rows(col, p);
            inv.swap_rows(col, p);
            rec.note("Swap Rows", || format!("Swap R{} and R{} (largest pivot in column {})", col + 1, p + 1, col + 1));
        }

        let pivot = m[(col, col)];
        for j in 0..n {
            m[(col, j)] /= pivot;
            inv[(col, j)] /= pivot;
        }
        rec.note("Normalize", || format!("R{} ← R{} / {}", col + 1, col + 1, fmt_term(pivot)));

        for i in 0..n {
            if i == col {
                continue;
            }
            let factor = m[(i, col)];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                let dm = factor * m[(col, j)];
                let di = factor * inv[(col, j)];
                m[(i, j)] -= dm;
                inv[(i, j)] -= di;
            }
            rec.note("Eliminate", || {
                format!("R{} ← R{} − {}·R{}", i + 1, i + 1, fmt_term(factor), col + 1)
            });
        }
    }

    let inv = Matrix::from_dmatrix(inv);
    rec.note("Result", || format!("The left block is now I, so A⁻¹ = {}", inv));
    Ok(inv)
}

/// adj(A), the transpose of the cofactor matrix
pub fn adjoint(a: &Matrix, rec: &mut StepRecorder) -> CalcResult<Matrix> {
    check_square(a, "adjoint")?;
    let n = a.rows();

    if n == 1 {
        rec.note("Cofactors", || "A 1×1 matrix has the single cofactor 1".to_string());
        return Ok(Matrix::identity(1));
    }

    let mut cofactors = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let minor = a.as_dmatrix().clone().remove_row(i).remove_column(j);
            let minor_det = determinant(&Matrix::from_dmatrix(minor), &mut StepRecorder::disabled())?;
            let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
            // avoid -0 in the output
            let c = sign * minor_det + 0.0;
            cofactors[(i, j)] = c;
            rec.note("Cofactor", || {
                format!(
                    "C({},{}) = (−1)^{} · M({},{}) = {} · {} = {}",
                    i + 1, j + 1, i + j + 2, i + 1, j + 1,
                    fmt_num(sign), fmt_term(minor_det), fmt_num(c)
                )
            });
        }
    }

    let adj = Matrix::from_dmatrix(cofactors.transpose());
    rec.note("Transpose", || format!("adj(A) = Cᵀ = {}", adj));
    Ok(adj)
}

static SQUARE_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrixA", "Matrix", "Square matrix")];

// ============ inverse ============

pub struct InverseFn;

static INVERSE_RELATED: [&str; 2] = ["determinant", "adjoint"];

impl OperationPlugin for InverseFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "inverse", title: "Inverse Matrix",
            description: "Matrix inverse; fails with a singular-matrix error when |det| is below epsilon",
            args: &SQUARE_ARGS, returns: "Matrix", category: "algebra", related: &INVERSE_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "inverse", ctx)?;
        let eps = ctx.epsilon();
        inverse(&a, eps, &mut ctx.steps).map(OpResult::Matrix)
    }
}

// ============ adjoint ============

pub struct AdjointFn;

static ADJOINT_RELATED: [&str; 1] = ["inverse"];

impl OperationPlugin for AdjointFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "adjoint", title: "Adjoint Matrix",
            description: "Adjugate: transpose of the cofactor matrix",
            args: &SQUARE_ARGS, returns: "Matrix", category: "algebra", related: &ADJOINT_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "adjoint", ctx)?;
        adjoint(&a, &mut ctx.steps).map(OpResult::Matrix)
    }
}
