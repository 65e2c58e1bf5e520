//! Line protocol
//!
//! Each input line is either an operation request or a control command
//! `{"command": "history" | "clear_history" | "operations"}`, and yields
//! exactly one JSON response line.

use matrixcalc::{CalcError, Response, Session};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Command {
    History,
    ClearHistory,
    Operations,
}

impl Command {
    fn name(self) -> &'static str {
        match self {
            Command::History => "history",
            Command::ClearHistory => "clear_history",
            Command::Operations => "operations",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ControlLine {
    command: Command,
}

/// Handle one non-empty input line and render the response line
pub fn handle_line(session: &mut Session, line: &str) -> String {
    let response = match serde_json::from_str::<JsonValue>(line) {
        Ok(value) if value.get("command").is_some() => handle_command(session, value),
        _ => encode(&session.process_json(line)),
    };
    response.to_string()
}

fn handle_command(session: &mut Session, value: JsonValue) -> JsonValue {
    let command = match serde_json::from_value::<ControlLine>(value) {
        Ok(ctl) => ctl.command,
        Err(e) => {
            warn!("unknown control command: {}", e);
            let err = CalcError::validation(format!(
                "unknown command ({}); expected history, clear_history or operations",
                e
            ));
            return encode(&Response::error("command", &err));
        }
    };

    let result = match command {
        Command::History => json!(session.history()),
        Command::ClearHistory => {
            let cleared = session.history().len();
            session.clear();
            info!(cleared, "history cleared");
            json!({ "cleared": cleared })
        }
        Command::Operations => json!(session.calculator().operations()),
    };

    json!({
        "status": "success",
        "operation": command.name(),
        "result": result,
    })
}

fn encode(response: &Response) -> JsonValue {
    serde_json::to_value(response).unwrap_or_else(|e| {
        json!({
            "status": "error",
            "operation": response.operation,
            "message": format!("failed to encode response: {}", e),
            "code": "VALIDATION_ERROR",
        })
    })
}
