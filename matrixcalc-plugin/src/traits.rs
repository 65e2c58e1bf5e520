//! Plugin traits

use matrixcalc_core::{CalcResult, OpResult, OperationRequest};
use crate::EvalContext;
use serde::Serialize;

/// Metadata about a request field an operation reads
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
}

impl ArgMeta {
    pub const fn required(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: false }
    }
}

/// Metadata for an operation plugin
#[derive(Debug, Clone, Serialize)]
pub struct OperationMeta {
    /// Wire name (`operation` field of the request)
    pub name: &'static str,
    /// Display title echoed in successful responses
    pub title: &'static str,
    pub description: &'static str,
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub category: &'static str,
    pub related: &'static [&'static str],
}

/// A single calculator operation.
///
/// `call` validates the request fields it needs and runs the computation;
/// it must not panic on any request.
pub trait OperationPlugin: Send + Sync {
    fn meta(&self) -> OperationMeta;
    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult>;
}
