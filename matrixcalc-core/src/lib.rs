//! Matrix Calculator Core - Fundamental types
//!
//! This crate provides the core types used throughout the calculator:
//! - `Matrix`: Validated rectangular matrix of finite values
//! - `OpResult`: Tagged result of an operation
//! - `Step` / `StepRecorder`: Optional step-by-step explanations
//! - `CalcError`: Structured errors returned as data
//! - `OperationRequest` / `Response`: Wire envelopes

mod error;
mod matrix;
mod result;
mod step;
mod envelope;

pub use error::{CalcError, CalcResult, codes};
pub use matrix::{Matrix, DEFAULT_MAX_DIM, DEFAULT_EPSILON};
pub use result::OpResult;
pub use step::{Step, StepRecorder};
pub use envelope::{OperationRequest, Response, Status};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{CalcError, CalcResult, Matrix, OpResult, Step, StepRecorder};
    pub use crate::{OperationRequest, Response, Status};
    pub use crate::fmt_num;
    pub use crate::error::codes;
}

/// Render a number for steps and summaries: integers without a fraction,
/// everything else with at most six decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        return format!("{}", rounded as i64);
    }
    let s = format!("{:.6}", rounded);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
