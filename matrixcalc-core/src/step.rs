//! Step-by-step explanations

use serde::{Deserialize, Serialize};

/// One arithmetic milestone of a computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    pub description: String,
}

impl Step {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into() }
    }
}

/// Collects steps when enabled, ignores them otherwise.
///
/// Steps are built lazily so a disabled recorder never formats anything.
#[derive(Debug, Default)]
pub struct StepRecorder {
    enabled: bool,
    steps: Vec<Step>,
}

impl StepRecorder {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, steps: Vec::new() }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn enabled() -> Self {
        Self::new(true)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record<F>(&mut self, step: F)
    where
        F: FnOnce() -> Step,
    {
        if self.enabled {
            self.steps.push(step());
        }
    }

    /// Shorthand for `record` with a title and a lazily built description
    pub fn note<F>(&mut self, title: &str, description: F)
    where
        F: FnOnce() -> String,
    {
        self.record(|| Step::new(title, description()));
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_recorder_never_builds_steps() {
        let mut rec = StepRecorder::disabled();
        rec.record(|| panic!("must not be called"));
        assert!(rec.is_empty());
    }

    #[test]
    fn test_enabled_recorder_keeps_order() {
        let mut rec = StepRecorder::enabled();
        rec.note("First", || "a".to_string());
        rec.record(|| Step::new("Second", "b"));

        let steps = rec.into_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title, "First");
        assert_eq!(steps[1].description, "b");
    }
}
