//! Ordered, type-erased step storage.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::report::{IssueReporter, LogReporter};
use crate::step::{ErasedStep, Step};

/// An ordered sequence of type-erased steps bound to one logical base type.
///
/// Steps are stored in an internal vector rather than as nested function
/// calls, keeping the fold's call stack flat. Application order is
/// insertion order; there is no reordering and no deduplication.
pub struct StepSequence<Base> {
    steps: Vec<ErasedStep>,
    reporter: Arc<dyn IssueReporter>,
    _base: PhantomData<fn(Base) -> Base>,
}

impl<Base> Clone for StepSequence<Base> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            reporter: Arc::clone(&self.reporter),
            _base: PhantomData,
        }
    }
}

impl<Base> fmt::Debug for StepSequence<Base> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSequence")
            .field("base", &std::any::type_name::<Base>())
            .field("steps", &self.steps)
            .finish()
    }
}

impl<Base> Default for StepSequence<Base> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            reporter: Arc::new(LogReporter),
            _base: PhantomData,
        }
    }
}

impl<Base: Send + Sync + 'static> StepSequence<Base> {
    /// Create an empty sequence with the default reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the issue reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn IssueReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The injected reporter.
    #[inline]
    pub fn reporter(&self) -> &Arc<dyn IssueReporter> {
        &self.reporter
    }

    /// Append a step.
    #[inline]
    pub fn push(&mut self, step: Step<Base>) {
        self.steps.push(ErasedStep::new(step));
    }

    /// Return a new sequence with `step` appended; this sequence is
    /// unaffected.
    pub fn appending(&self, step: Step<Base>) -> Self {
        let mut appended = self.clone();
        appended.push(step);
        appended
    }

    /// Append an already-erased step, validating its declared base type.
    ///
    /// An incompatible step is dropped and reported. In correct usage this
    /// never fires: steps are created already bound to the sequence's base,
    /// so the check is a defensive boundary around the type erasure.
    pub fn push_erased(&mut self, step: ErasedStep) {
        if step.is_compatible::<Base>() {
            self.steps.push(step);
        } else {
            self.reporter.report(crate::report::Issue::step_type_mismatch(
                step.kind(),
                std::any::type_name::<Base>(),
                step.base_type_name(),
            ));
        }
    }

    /// Concatenate another sequence's steps after this one's.
    pub fn extend(&mut self, other: StepSequence<Base>) {
        self.steps.extend(other.steps);
    }

    /// The erased steps, in application order.
    #[inline]
    pub fn steps(&self) -> &[ErasedStep] {
        &self.steps
    }

    /// Number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence holds no steps.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fold the steps over `base`, strictly left to right.
    ///
    /// Every step is applied exactly once, in insertion order; a step whose
    /// declared base type does not match is skipped and reported.
    pub fn fold(&self, base: Base) -> Base {
        self.steps
            .iter()
            .fold(base, |acc, step| step.try_update(acc, self.reporter.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectReporter;

    #[test]
    fn test_fold_applies_in_insertion_order() {
        let mut sequence = StepSequence::<Vec<i32>>::new();
        sequence.push(Step::modify(|items: &mut Vec<i32>| items.push(1)));
        sequence.push(Step::modify(|items: &mut Vec<i32>| items.push(2)));
        sequence.push(Step::modify(|items: &mut Vec<i32>| items.push(3)));

        assert_eq!(sequence.fold(Vec::new()), vec![1, 2, 3]);
    }

    #[test]
    fn test_appending_leaves_original_untouched() {
        let sequence = StepSequence::<i32>::new().appending(Step::transform(|n| n + 1));
        let longer = sequence.appending(Step::transform(|n| n * 10));

        assert_eq!(sequence.len(), 1);
        assert_eq!(longer.len(), 2);
        assert_eq!(sequence.fold(0), 1);
        assert_eq!(longer.fold(0), 10);
    }

    #[test]
    fn test_push_erased_filters_incompatible() {
        let reporter = Arc::new(CollectReporter::new());
        let mut sequence = StepSequence::<i32>::new()
            .with_reporter(Arc::clone(&reporter) as Arc<dyn IssueReporter>);

        sequence.push_erased(ErasedStep::new(Step::<i32>::transform(|n| n + 1)));
        sequence.push_erased(ErasedStep::new(Step::<String>::transform(|s| s)));

        assert_eq!(sequence.len(), 1);
        assert_eq!(reporter.issues().len(), 1);
        assert_eq!(sequence.fold(1), 2);
    }

    #[test]
    fn test_empty_fold_is_identity() {
        let sequence = StepSequence::<String>::new();
        assert_eq!(sequence.fold("same".to_owned()), "same");
    }
}
