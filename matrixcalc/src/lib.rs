//! Matrixcalc - Step-by-step Matrix Calculator
//!
//! `Calculator` dispatches an `OperationRequest` to the matching engine
//! operation and wraps the outcome in a `Response`. `Session` adds the
//! bounded request history.

mod session;

pub use session::{HistoryEntry, Session, DEFAULT_HISTORY_LIMIT};
pub use matrixcalc_core::{CalcError, OpResult, OperationRequest, Response, Status, Step};
pub use matrixcalc_plugin::{EngineConfig, OperationMeta};

use matrixcalc_core::CalcResult;
use matrixcalc_plugin::{EvalContext, OperationRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main calculator engine
#[derive(Clone)]
pub struct Calculator {
    registry: Arc<OperationRegistry>,
    config: EngineConfig,
}

impl Calculator {
    pub fn new(registry: OperationRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            config: EngineConfig::default(),
        }
    }

    pub fn with_standard_operations() -> Self {
        Self::new(matrixcalc_engine::standard_registry())
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Run one request. Never panics; every failure becomes an error envelope.
    pub fn calculate(&self, req: &OperationRequest) -> Response {
        match self.dispatch(req) {
            Ok(response) => {
                info!(operation = %req.operation, status = "success", "calculated");
                response
            }
            Err(err) => {
                info!(operation = %req.operation, status = "error", code = err.code(), "{}", err);
                Response::error(req.operation.as_str(), &err)
            }
        }
    }

    /// Decode a JSON request and run it
    pub fn calculate_json(&self, input: &str) -> Response {
        match serde_json::from_str::<OperationRequest>(input) {
            Ok(req) => self.calculate(&req),
            Err(e) => {
                warn!("malformed request: {}", e);
                let err = CalcError::validation(format!("invalid request: {}", e));
                Response::error(operation_hint(input), &err)
            }
        }
    }

    /// Metadata for every registered operation
    pub fn operations(&self) -> Vec<OperationMeta> {
        self.registry.list_operations(None)
    }

    fn dispatch(&self, req: &OperationRequest) -> CalcResult<Response> {
        let op = self.registry.resolve(&req.operation)?;
        let meta = op.meta();

        let mut ctx = EvalContext::new(self.config).with_steps(req.step_by_step);
        let result = op.call(req, &mut ctx)?;

        if !result.is_finite() {
            return Err(CalcError::validation(format!(
                "{}: result contains a non-finite value (overflow)",
                meta.name
            )));
        }

        let steps = if req.step_by_step {
            let steps = ctx.into_steps();
            debug!(operation = meta.name, steps = steps.len(), "recorded steps");
            Some(steps)
        } else {
            None
        };

        Ok(Response::success(meta.title, result, steps))
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::with_standard_operations()
    }
}

/// Best-effort `operation` field from input that failed to decode
fn operation_hint(input: &str) -> String {
    serde_json::from_str::<serde_json::Value>(input)
        .ok()
        .and_then(|v| v.get("operation")?.as_str().map(str::to_string))
        .unwrap_or_default()
}
