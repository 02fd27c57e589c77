//! Diagnostics for the type-compatibility boundary.
//!
//! Type erasure in [`StepSequence`](crate::StepSequence) opens one failure
//! path: a step constructed against a different base type than the
//! sequence it lands in. That mismatch never arises from normal use of the
//! pipeline API, so it is not an error the caller handles; it is reported
//! through an injected [`IssueReporter`] strategy and the offending step is
//! dropped.

use std::sync::Mutex;

use thiserror::Error;

use crate::StepKind;

/// A structured diagnostic emitted by the compatibility check.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Issue {
    /// A step's declared base type does not match the sequence it was
    /// folded into.
    #[error("{kind} step bound to {found} cannot apply to a sequence over {expected}")]
    StepTypeMismatch {
        /// Variant of the offending step.
        kind: StepKind,
        /// Base type of the sequence.
        expected: &'static str,
        /// Base type the step was constructed against.
        found: &'static str,
    },
}

impl Issue {
    /// Create a step type mismatch issue.
    #[inline]
    pub fn step_type_mismatch(kind: StepKind, expected: &'static str, found: &'static str) -> Self {
        Issue::StepTypeMismatch {
            kind,
            expected,
            found,
        }
    }
}

/// Strategy object receiving diagnostics from the compatibility check.
///
/// Reporters are injected per sequence (never installed as an ambient
/// global), invoked synchronously, and must not retain references across
/// calls.
pub trait IssueReporter: Send + Sync {
    /// Handle one issue.
    fn report(&self, issue: Issue);
}

/// The default reporter: logs each issue through `tracing` and carries on.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl IssueReporter for LogReporter {
    fn report(&self, issue: Issue) {
        match &issue {
            Issue::StepTypeMismatch {
                kind,
                expected,
                found,
            } => {
                tracing::warn!(step = %kind, expected, found, "dropping incompatible step");
            }
        }
    }
}

/// Escalates every issue to a panic.
///
/// Install in tests (or debug builds) where a mismatch should fail loudly
/// instead of being logged and swallowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanicReporter;

impl IssueReporter for PanicReporter {
    fn report(&self, issue: Issue) {
        panic!("{issue}");
    }
}

/// Captures issues for later assertions.
#[derive(Debug, Default)]
pub struct CollectReporter {
    issues: Mutex<Vec<Issue>>,
}

impl CollectReporter {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// The issues reported so far.
    pub fn issues(&self) -> Vec<Issue> {
        self.issues
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.issues().is_empty()
    }
}

impl IssueReporter for CollectReporter {
    fn report(&self, issue: Issue) {
        self.issues
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(issue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = Issue::step_type_mismatch(StepKind::Transform, "i32", "alloc::string::String");
        let text = issue.to_string();
        assert!(text.contains("transform"));
        assert!(text.contains("i32"));
    }

    #[test]
    fn test_collect_reporter_accumulates() {
        let reporter = CollectReporter::new();
        assert!(reporter.is_empty());

        reporter.report(Issue::step_type_mismatch(StepKind::SetValue, "a", "b"));
        reporter.report(Issue::step_type_mismatch(StepKind::Peek, "a", "c"));

        assert_eq!(reporter.issues().len(), 2);
    }

    #[test]
    #[should_panic(expected = "cannot apply")]
    fn test_panic_reporter_escalates() {
        PanicReporter.report(Issue::step_type_mismatch(StepKind::Update, "a", "b"));
    }
}
