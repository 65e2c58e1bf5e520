//! Matrix Calculator Plugin System
//!
//! Provides the seam between the dispatcher and the engine:
//! - `OperationPlugin`: one implementation per calculator operation
//! - `OperationRegistry`: name lookup with suggestions for typos
//! - `EvalContext`: engine limits plus the step recorder for one request

mod traits;
mod registry;
mod context;

pub use traits::{OperationPlugin, OperationMeta, ArgMeta};
pub use registry::OperationRegistry;
pub use context::{EvalContext, EngineConfig};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        OperationPlugin, OperationMeta, ArgMeta,
        OperationRegistry, EvalContext, EngineConfig,
    };
    pub use matrixcalc_core::prelude::*;
}
