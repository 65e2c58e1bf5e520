//! Matrix construction: identity and zero matrices

use matrixcalc_plugin::prelude::*;
use crate::helpers::extract_dim;

/// n×n identity
pub fn identity(n: usize, rec: &mut StepRecorder) -> Matrix {
    rec.note("Identity Matrix", || format!("Creating {}×{} identity matrix.", n, n));
    rec.note("Diagonal", || {
        format!("Set the {} diagonal elements to 1 and the other {} elements to 0.", n, n * n - n)
    });
    Matrix::identity(n)
}

/// rows×cols of zeros
pub fn zero(rows: usize, cols: usize, rec: &mut StepRecorder) -> Matrix {
    rec.note("Zero Matrix", || format!("Creating {}×{} zero matrix.", rows, cols));
    rec.note("All Zeros", || format!("All {} elements set to 0.", rows * cols));
    Matrix::zeros(rows, cols)
}

// ============ identity ============

pub struct IdentityFn;

static IDENTITY_ARGS: [ArgMeta; 1] = [ArgMeta::required("size", "Integer", "Number of rows and columns (1 to the maximum size)")];
static IDENTITY_RELATED: [&str; 2] = ["zero", "is_identity"];

impl OperationPlugin for IdentityFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "identity", title: "Identity Matrix",
            description: "Square matrix with ones on the diagonal and zeros elsewhere",
            args: &IDENTITY_ARGS, returns: "Matrix", category: "scalar", related: &IDENTITY_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let n = extract_dim(req.size, "identity", "size", ctx.max_dim())?;
        Ok(OpResult::Matrix(identity(n, &mut ctx.steps)))
    }
}

// ============ zero ============

pub struct ZeroFn;

static ZERO_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("rows", "Integer", "Number of rows (1 to the maximum size)"),
    ArgMeta::required("cols", "Integer", "Number of columns (1 to the maximum size)"),
];
static ZERO_RELATED: [&str; 2] = ["identity", "is_zero"];

impl OperationPlugin for ZeroFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "zero", title: "Zero Matrix",
            description: "Matrix of the given dimensions filled with zeros",
            args: &ZERO_ARGS, returns: "Matrix", category: "scalar", related: &ZERO_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let rows = extract_dim(req.rows, "zero", "rows", ctx.max_dim())?;
        let cols = extract_dim(req.cols, "zero", "cols", ctx.max_dim())?;
        Ok(OpResult::Matrix(zero(rows, cols, &mut ctx.steps)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let i = identity(3, &mut StepRecorder::disabled());
        assert_eq!(i.shape(), (3, 3));
        assert_eq!(i.at(1, 1), 1.0);
        assert_eq!(i.at(0, 2), 0.0);
    }

    #[test]
    fn test_zero() {
        let z = zero(2, 4, &mut StepRecorder::disabled());
        assert_eq!(z.shape(), (2, 4));
        assert!(z.flatten().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_zero_fn_rejects_oversize() {
        let req = OperationRequest::new("zero").with_dims(11, 2);
        let err = ZeroFn.call(&req, &mut EvalContext::default()).unwrap_err();
        assert_eq!(err.code(), codes::VALIDATION_ERROR);
    }

    #[test]
    fn test_identity_fn_requires_size() {
        let err = IdentityFn.call(&OperationRequest::new("identity"), &mut EvalContext::default()).unwrap_err();
        assert_eq!(err.to_string(), "identity: 'size' is required");

        let req = OperationRequest::new("identity").with_size(-1);
        assert!(IdentityFn.call(&req, &mut EvalContext::default()).is_err());
    }

    #[test]
    fn test_identity_steps() {
        let mut rec = StepRecorder::enabled();
        identity(4, &mut rec);
        assert_eq!(rec.steps()[0].description, "Creating 4×4 identity matrix.");
        assert!(rec.steps()[1].description.contains("other 12 elements"));
    }
}
