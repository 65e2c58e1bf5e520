//! Operation Registry

use crate::{EvalContext, OperationMeta, OperationPlugin};
use matrixcalc_core::{CalcError, CalcResult, OpResult, OperationRequest};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Central operation registry; immutable once built
#[derive(Clone, Default)]
pub struct OperationRegistry {
    operations: HashMap<String, Arc<dyn OperationPlugin>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self { operations: HashMap::new() }
    }

    pub fn with_operation<P: OperationPlugin + 'static>(mut self, op: P) -> Self {
        let name = op.meta().name.to_lowercase();
        self.operations.insert(name, Arc::new(op));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn OperationPlugin> {
        self.operations.get(&name.trim().to_lowercase()).map(|op| op.as_ref())
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Resolve `name` or build an unknown-operation error with suggestions
    pub fn resolve(&self, name: &str) -> CalcResult<&dyn OperationPlugin> {
        match self.get(name) {
            Some(op) => Ok(op),
            None => {
                let similar = self.find_similar(name);
                let mut err = CalcError::unknown_operation(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!("Similar: {}", suggestions.join(", ")));
                }
                Err(err)
            }
        }
    }

    pub fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        self.resolve(&req.operation)?.call(req, ctx)
    }

    /// Metadata of every operation, sorted by category then name
    pub fn list_operations(&self, category: Option<&str>) -> Vec<OperationMeta> {
        let mut metas: Vec<OperationMeta> = self.operations.values()
            .map(|op| op.meta())
            .filter(|m| category.map_or(true, |c| m.category == c))
            .collect();
        metas.sort_by(|a, b| a.category.cmp(b.category).then(a.name.cmp(b.name)));
        metas
    }

    /// Operation names similar to `name`, most similar first
    fn find_similar(&self, name: &str) -> Vec<String> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let mut matches: Vec<(String, usize)> = self.operations.keys()
            .filter_map(|candidate| {
                let score = Self::similarity_score(&query, candidate);
                (score >= 10).then(|| (candidate.clone(), score))
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        let distinct = query_chars.union(&candidate_chars).count().max(1);
        // character overlap as a percentage of all distinct characters
        score += common * 40 / distinct;

        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgMeta;

    struct Echo(&'static str);

    static NO_ARGS: [ArgMeta; 0] = [];

    impl OperationPlugin for Echo {
        fn meta(&self) -> OperationMeta {
            OperationMeta {
                name: self.0,
                title: "Echo",
                description: "test operation",
                args: &NO_ARGS,
                returns: "Count",
                category: "test",
                related: &[],
            }
        }

        fn call(&self, _req: &OperationRequest, _ctx: &mut EvalContext) -> CalcResult<OpResult> {
            Ok(OpResult::Count(self.0.len()))
        }
    }

    fn registry() -> OperationRegistry {
        OperationRegistry::new()
            .with_operation(Echo("multiply"))
            .with_operation(Echo("transpose"))
            .with_operation(Echo("trace"))
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let reg = registry();
        assert!(reg.get("Multiply").is_some());
        assert!(reg.get(" trace ").is_some());
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_call_dispatches() {
        let reg = registry();
        let mut ctx = EvalContext::default();
        let result = reg.call(&OperationRequest::new("trace"), &mut ctx).unwrap();
        assert_eq!(result, OpResult::Count(5));
    }

    #[test]
    fn test_unknown_operation_suggests_prefix_match() {
        let reg = registry();
        let err = reg.resolve("mult").err().unwrap();
        match err {
            CalcError::UnknownOperation { name, suggestion } => {
                assert_eq!(name, "mult");
                assert!(suggestion.unwrap().starts_with("Similar: multiply"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_empty_name_has_no_suggestion() {
        let reg = registry();
        let err = reg.resolve("").err().unwrap();
        assert_eq!(err, CalcError::unknown_operation(""));
    }

    #[test]
    fn test_list_operations_sorted() {
        let names: Vec<&str> = registry().list_operations(None).iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["multiply", "trace", "transpose"]);
        assert!(registry().list_operations(Some("other")).is_empty());
    }
}
