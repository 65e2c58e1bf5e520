//! Per-client session: a calculator plus a bounded history of requests

use crate::{Calculator, OperationRequest, Response, Status};
use serde::Serialize;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 15;

/// One processed request as shown in the history list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub operation: String,
    pub status: Status,
    /// Rendered result on success, the error message otherwise
    pub summary: String,
}

impl HistoryEntry {
    fn from_response(id: u64, response: &Response) -> Self {
        let summary = match (&response.result, &response.message) {
            (Some(result), _) => result.summary(),
            (None, Some(message)) => message.clone(),
            (None, None) => String::new(),
        };
        Self {
            id,
            operation: response.operation.clone(),
            status: response.status,
            summary,
        }
    }
}

pub struct Session {
    calculator: Calculator,
    history: VecDeque<HistoryEntry>,
    limit: usize,
    next_id: u64,
}

impl Session {
    pub fn new(calculator: Calculator) -> Self {
        Self {
            calculator,
            history: VecDeque::new(),
            limit: DEFAULT_HISTORY_LIMIT,
            next_id: 1,
        }
    }

    /// Zero disables history
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self.history.truncate(limit);
        self
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn process(&mut self, req: &OperationRequest) -> Response {
        let response = self.calculator.calculate(req);
        self.remember(&response);
        response
    }

    pub fn process_json(&mut self, input: &str) -> Response {
        let response = self.calculator.calculate_json(input);
        self.remember(&response);
        response
    }

    /// Newest first
    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.next_id = 1;
    }

    fn remember(&mut self, response: &Response) {
        let entry = HistoryEntry::from_response(self.next_id, response);
        self.next_id += 1;
        self.history.push_front(entry);
        self.history.truncate(self.limit);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Calculator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transpose(n: i64) -> OperationRequest {
        OperationRequest::new("transpose").with_a(vec![vec![n as f64, 0.0]])
    }

    #[test]
    fn test_history_newest_first() {
        let mut session = Session::default();
        session.process(&transpose(1));
        session.process(&OperationRequest::new("identity").with_size(2));

        let ids: Vec<u64> = session.history().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(session.history()[0].operation, "Identity Matrix");
        assert_eq!(session.history()[0].summary, "[[1, 0], [0, 1]]");
        assert_eq!(session.history()[1].summary, "[[1], [0]]");
    }

    #[test]
    fn test_history_is_capped() {
        let mut session = Session::default();
        for n in 0..20 {
            session.process(&transpose(n));
        }
        assert_eq!(session.history().len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(session.history().front().map(|e| e.id), Some(20));
        assert_eq!(session.history().back().map(|e| e.id), Some(6));
    }

    #[test]
    fn test_errors_are_recorded() {
        let mut session = Session::default();
        session.process_json(r#"{"operation": "inverse", "matrixA": [[0]]}"#);

        let entry = &session.history()[0];
        assert_eq!(entry.status, Status::Error);
        assert_eq!(entry.operation, "inverse");
        assert!(entry.summary.starts_with("Singular matrix"));
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut session = Session::default().with_history_limit(3);
        session.process(&transpose(1));
        session.process(&transpose(2));
        session.clear();
        assert!(session.history().is_empty());

        session.process(&transpose(3));
        assert_eq!(session.history()[0].id, 1);
    }

    #[test]
    fn test_zero_limit_keeps_nothing() {
        let mut session = Session::default().with_history_limit(0);
        let response = session.process(&transpose(1));
        assert!(response.is_success());
        assert!(session.history().is_empty());
    }
}
