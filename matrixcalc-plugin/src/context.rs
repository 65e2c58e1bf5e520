//! Evaluation Context

use matrixcalc_core::{Step, StepRecorder, DEFAULT_EPSILON, DEFAULT_MAX_DIM};
use serde::{Deserialize, Serialize};

/// Numeric limits shared by every operation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on rows and columns of inputs and generated matrices
    pub max_dim: usize,
    /// Values with magnitude below this are treated as zero
    pub epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_dim: DEFAULT_MAX_DIM, epsilon: DEFAULT_EPSILON }
    }
}

impl EngineConfig {
    pub fn with_max_dim(mut self, max_dim: usize) -> Self {
        self.max_dim = max_dim.max(1);
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        if epsilon.is_finite() && epsilon > 0.0 {
            self.epsilon = epsilon;
        }
        self
    }
}

/// Evaluation context passed to plugins, one per request
pub struct EvalContext {
    pub config: EngineConfig,
    pub steps: StepRecorder,
}

impl EvalContext {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, steps: StepRecorder::disabled() }
    }

    pub fn with_steps(mut self, enabled: bool) -> Self {
        self.steps = StepRecorder::new(enabled);
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    pub fn max_dim(&self) -> usize {
        self.config.max_dim
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps.into_steps()
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
