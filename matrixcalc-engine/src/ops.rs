//! Matrix operations: element-wise arithmetic, products, transpose, equality

use matrixcalc_plugin::prelude::*;
use crate::helpers::*;

static AB_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("matrixA", "Matrix", "Left operand"),
    ArgMeta::required("matrixB", "Matrix", "Right operand"),
];

static A_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrixA", "Matrix", "Operand")];

static SCALAR_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("matrixA", "Matrix", "Matrix to scale"),
    ArgMeta::required("scalar", "Number", "Factor applied to every element"),
];

/// Shared body of add/subtract
fn elementwise(
    a: &Matrix,
    b: &Matrix,
    op: &str,
    symbol: &str,
    f: fn(f64, f64) -> f64,
    rec: &mut StepRecorder,
) -> CalcResult<Matrix> {
    check_same_dims(a, b, op)?;
    rec.note("Check Dimensions", || {
        format!("Both matrices are {}, so they can be combined element by element.", fmt_shape(a))
    });

    let result = a.as_dmatrix().zip_map(b.as_dmatrix(), f);

    for i in 0..a.rows() {
        rec.record(|| Step::new(format!("Row {}", i + 1), {
            let terms: Vec<String> = (0..a.cols())
                .map(|j| format!("{} {} {}", fmt_num(a.at(i, j)), symbol, fmt_term(b.at(i, j))))
                .collect();
            let values: Vec<f64> = result.row(i).iter().copied().collect();
            format!("[{}] = {}", terms.join(", "), fmt_row(&values))
        }));
    }

    let result = Matrix::from_dmatrix(result);
    rec.note("Complete", || format!("Result matrix: {}", result));
    Ok(result)
}

/// A + B
pub fn add(a: &Matrix, b: &Matrix, rec: &mut StepRecorder) -> CalcResult<Matrix> {
    elementwise(a, b, "add", "+", |x, y| x + y, rec)
}

/// A − B
pub fn subtract(a: &Matrix, b: &Matrix, rec: &mut StepRecorder) -> CalcResult<Matrix> {
    elementwise(a, b, "subtract", "-", |x, y| x - y, rec)
}

/// A · B
pub fn multiply(a: &Matrix, b: &Matrix, rec: &mut StepRecorder) -> CalcResult<Matrix> {
    check_matmul_dims(a, b, "multiply")?;
    rec.note("Check Dimensions", || {
        format!(
            "A is {} and B is {}: columns of A ({}) equal rows of B ({}), so the result is {}×{}.",
            fmt_shape(a), fmt_shape(b), a.cols(), b.rows(), a.rows(), b.cols()
        )
    });

    let product = a.as_dmatrix() * b.as_dmatrix();

    for i in 0..a.rows() {
        for j in 0..b.cols() {
            rec.record(|| Step::new(format!("Entry ({}, {})", i + 1, j + 1), {
                let terms: Vec<String> = (0..a.cols())
                    .map(|k| format!("{}·{}", fmt_term(a.at(i, k)), fmt_term(b.at(k, j))))
                    .collect();
                format!(
                    "Row {} of A times column {} of B: {} = {}",
                    i + 1, j + 1, terms.join(" + "), fmt_num(product[(i, j)])
                )
            }));
        }
    }

    Ok(Matrix::from_dmatrix(product))
}

/// Aᵗ
pub fn transpose(a: &Matrix, rec: &mut StepRecorder) -> Matrix {
    let t = Matrix::from_dmatrix(a.as_dmatrix().transpose());
    rec.note("Transpose", || {
        format!("Swap rows and columns: the {} matrix becomes {}.", fmt_shape(a), fmt_shape(&t))
    });
    rec.note("Complete", || format!("Element at (i,j) is now at (j,i): {}", t));
    t
}

/// s · A
pub fn scalar_multiply(a: &Matrix, scalar: f64, rec: &mut StepRecorder) -> Matrix {
    let result = a.as_dmatrix() * scalar;
    rec.note("Scalar Multiplication", || format!("Multiply every element by {}.", fmt_num(scalar)));
    for i in 0..a.rows() {
        rec.record(|| Step::new(format!("Row {}", i + 1), {
            let values: Vec<f64> = result.row(i).iter().copied().collect();
            format!("{} × {} = {}", fmt_term(scalar), fmt_row(&a.row_vec(i)), fmt_row(&values))
        }));
    }
    Matrix::from_dmatrix(result)
}

/// Element-wise equality within `eps`; different shapes are never equal
pub fn equality(a: &Matrix, b: &Matrix, eps: f64, rec: &mut StepRecorder) -> bool {
    if a.shape() != b.shape() {
        rec.note("Check Dimensions", || {
            format!("A is {} but B is {}: matrices are not equal.", fmt_shape(a), fmt_shape(b))
        });
        return false;
    }
    rec.note("Check Dimensions", || format!("Both matrices are {}.", fmt_shape(a)));

    for i in 0..a.rows() {
        for j in 0..a.cols() {
            if (a.at(i, j) - b.at(i, j)).abs() > eps {
                rec.note("Compare Elements", || {
                    format!(
                        "A({},{}) = {} differs from B({},{}) = {}.",
                        i + 1, j + 1, fmt_num(a.at(i, j)), i + 1, j + 1, fmt_num(b.at(i, j))
                    )
                });
                return false;
            }
        }
    }

    rec.note("Compare Elements", || {
        format!("All {} corresponding elements match within {:e}.", a.rows() * a.cols(), eps)
    });
    true
}

// ============ add ============

pub struct AddFn;

static ADD_RELATED: [&str; 2] = ["subtract", "scalar_multiply"];

impl OperationPlugin for AddFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "add", title: "Matrix Addition",
            description: "Element-wise sum of two matrices of the same dimensions",
            args: &AB_ARGS, returns: "Matrix", category: "basic", related: &ADD_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "add", ctx)?;
        let b = matrix_b(req, "add", ctx)?;
        add(&a, &b, &mut ctx.steps).map(OpResult::Matrix)
    }
}

// ============ subtract ============

pub struct SubtractFn;

static SUBTRACT_RELATED: [&str; 1] = ["add"];

impl OperationPlugin for SubtractFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "subtract", title: "Matrix Subtraction",
            description: "Element-wise difference A − B of two matrices of the same dimensions",
            args: &AB_ARGS, returns: "Matrix", category: "basic", related: &SUBTRACT_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "subtract", ctx)?;
        let b = matrix_b(req, "subtract", ctx)?;
        subtract(&a, &b, &mut ctx.steps).map(OpResult::Matrix)
    }
}

// ============ multiply ============

pub struct MultiplyFn;

static MULTIPLY_RELATED: [&str; 2] = ["scalar_multiply", "transpose"];

impl OperationPlugin for MultiplyFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "multiply", title: "Matrix Multiplication",
            description: "Matrix product A·B; columns of A must equal rows of B",
            args: &AB_ARGS, returns: "Matrix", category: "basic", related: &MULTIPLY_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "multiply", ctx)?;
        let b = matrix_b(req, "multiply", ctx)?;
        multiply(&a, &b, &mut ctx.steps).map(OpResult::Matrix)
    }
}

// ============ transpose ============

pub struct TransposeFn;

static TRANSPOSE_RELATED: [&str; 1] = ["is_symmetric"];

impl OperationPlugin for TransposeFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "transpose", title: "Matrix Transpose",
            description: "Swap rows and columns",
            args: &A_ARGS, returns: "Matrix", category: "basic", related: &TRANSPOSE_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "transpose", ctx)?;
        Ok(OpResult::Matrix(transpose(&a, &mut ctx.steps)))
    }
}

// ============ scalar_multiply ============

pub struct ScalarMultiplyFn;

static SCALAR_RELATED: [&str; 1] = ["multiply"];

impl OperationPlugin for ScalarMultiplyFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "scalar_multiply", title: "Scalar Multiplication",
            description: "Multiply every element by a scalar",
            args: &SCALAR_ARGS, returns: "Matrix", category: "scalar", related: &SCALAR_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "scalar_multiply", ctx)?;
        let s = extract_scalar(req.scalar, "scalar_multiply")?;
        Ok(OpResult::Matrix(scalar_multiply(&a, s, &mut ctx.steps)))
    }
}

// ============ equality ============

pub struct EqualityFn;

static EQUALITY_RELATED: [&str; 1] = ["dimensions"];

impl OperationPlugin for EqualityFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "equality", title: "Matrix Equality Check",
            description: "Check whether two matrices are equal element by element (within epsilon)",
            args: &AB_ARGS, returns: "Label", category: "scalar", related: &EQUALITY_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "equality", ctx)?;
        let b = matrix_b(req, "equality", ctx)?;
        let eps = ctx.epsilon();
        let equal = equality(&a, &b, eps, &mut ctx.steps);
        Ok(OpResult::label(if equal { "Equal" } else { "Not Equal" }))
    }
}
