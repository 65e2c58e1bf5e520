//! Request and response envelopes exchanged with the caller

use serde::{Deserialize, Serialize};
use crate::{CalcError, OpResult, Step};

/// Incoming calculation request (camelCase on the wire)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_a: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_b: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<i64>,
    #[serde(default)]
    pub step_by_step: bool,
}

impl OperationRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self { operation: operation.into(), ..Default::default() }
    }

    pub fn with_a(mut self, rows: Vec<Vec<f64>>) -> Self {
        self.matrix_a = Some(rows);
        self
    }

    pub fn with_b(mut self, rows: Vec<Vec<f64>>) -> Self {
        self.matrix_b = Some(rows);
        self
    }

    pub fn with_scalar(mut self, scalar: f64) -> Self {
        self.scalar = Some(scalar);
        self
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_dims(mut self, rows: i64, cols: i64) -> Self {
        self.rows = Some(rows);
        self.cols = Some(cols);
        self
    }

    pub fn with_steps(mut self, enabled: bool) -> Self {
        self.step_by_step = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Outgoing response; an error never carries a result or steps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: Status,
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<OpResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Response {
    pub fn success(operation: impl Into<String>, result: OpResult, steps: Option<Vec<Step>>) -> Self {
        Self {
            status: Status::Success,
            operation: operation.into(),
            result: Some(result),
            steps,
            message: None,
            code: None,
        }
    }

    pub fn error(operation: impl Into<String>, err: &CalcError) -> Self {
        Self {
            status: Status::Error,
            operation: operation.into(),
            result: None,
            steps: None,
            message: Some(err.to_string()),
            code: Some(err.code().to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
