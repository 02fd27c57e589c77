//! Deferred mutation steps and their type-erased form.
//!
//! A [`Step`] is one discrete, typed update bound to a specific base type.
//! [`ErasedStep`] boxes a step behind a type tag so heterogeneous steps can
//! sit in one sequence; the tag enables a safe downcast-or-skip at fold
//! time instead of unconstrained dynamic casting.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::report::{Issue, IssueReporter};
use crate::{modified, Path};

/// The operation variant a [`Step`] was built from, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Embed a constant through a path.
    SetValue,
    /// Whole-base transform.
    Transform,
    /// Copy-then-mutate in place.
    Modify,
    /// Side-effecting observation; base passes through unchanged.
    Peek,
    /// Arbitrary base-to-base update; the escape hatch scoping rides on.
    Update,
}

impl StepKind {
    /// The variant name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::SetValue => "set_value",
            StepKind::Transform => "transform",
            StepKind::Modify => "modify",
            StepKind::Peek => "peek",
            StepKind::Update => "update",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

enum Run<Base> {
    ByValue(Arc<dyn Fn(Base) -> Base + Send + Sync>),
    InPlace(Arc<dyn Fn(&mut Base) + Send + Sync>),
    Observe(Arc<dyn Fn(&Base) + Send + Sync>),
}

impl<Base> Clone for Run<Base> {
    fn clone(&self) -> Self {
        match self {
            Run::ByValue(f) => Run::ByValue(Arc::clone(f)),
            Run::InPlace(f) => Run::InPlace(Arc::clone(f)),
            Run::Observe(f) => Run::Observe(Arc::clone(f)),
        }
    }
}

/// One deferred update operation over a base of type `Base`.
///
/// Steps are immutable once constructed and applied in insertion order by
/// the owning [`StepSequence`](crate::StepSequence).
pub struct Step<Base> {
    kind: StepKind,
    run: Run<Base>,
}

impl<Base> Clone for Step<Base> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            run: self.run.clone(),
        }
    }
}

impl<Base> fmt::Debug for Step<Base> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("kind", &self.kind)
            .field("base", &std::any::type_name::<Base>())
            .finish()
    }
}

impl<Base: 'static> Step<Base> {
    /// A step that embeds `value` through `path`.
    pub fn set_value<Value>(path: Path<Base, Value>, value: Value) -> Self
    where
        Value: Clone + Send + Sync + 'static,
    {
        Self {
            kind: StepKind::SetValue,
            run: Run::ByValue(Arc::new(move |base| path.embed(value.clone(), base))),
        }
    }

    /// A step that maps the whole base through `f`.
    pub fn transform(f: impl Fn(Base) -> Base + Send + Sync + 'static) -> Self {
        Self {
            kind: StepKind::Transform,
            run: Run::ByValue(Arc::new(f)),
        }
    }

    /// A step that copies the base and mutates the copy in place.
    pub fn modify(f: impl Fn(&mut Base) + Send + Sync + 'static) -> Self {
        Self {
            kind: StepKind::Modify,
            run: Run::InPlace(Arc::new(f)),
        }
    }

    /// A step that runs `f` for its side effect and passes the base
    /// through unchanged.
    pub fn peek(f: impl Fn(&Base) + Send + Sync + 'static) -> Self {
        Self {
            kind: StepKind::Peek,
            run: Run::Observe(Arc::new(f)),
        }
    }

    /// A step applying an arbitrary base-to-base update.
    ///
    /// Scoped sub-pipelines collapse into a single step of this kind.
    pub fn update_with(f: impl Fn(Base) -> Base + Send + Sync + 'static) -> Self {
        Self {
            kind: StepKind::Update,
            run: Run::ByValue(Arc::new(f)),
        }
    }

    /// The variant this step was built from.
    #[inline]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Apply this step to a base value.
    pub fn update(&self, base: Base) -> Base {
        match &self.run {
            Run::ByValue(f) => f(base),
            Run::InPlace(f) => modified(base, |base| f(base)),
            Run::Observe(f) => {
                f(&base);
                base
            }
        }
    }
}

/// A [`Step`] with its base type erased.
///
/// Remembers the `TypeId` and name of the base the step was constructed
/// against, so a sequence can check compatibility before folding it in.
#[derive(Clone)]
pub struct ErasedStep {
    base: TypeId,
    base_name: &'static str,
    kind: StepKind,
    payload: Arc<dyn Any + Send + Sync>,
}

impl fmt::Debug for ErasedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedStep")
            .field("kind", &self.kind)
            .field("base", &self.base_name)
            .finish()
    }
}

impl ErasedStep {
    /// Erase a step's base type.
    pub fn new<Base: Send + Sync + 'static>(step: Step<Base>) -> Self {
        Self {
            base: TypeId::of::<Base>(),
            base_name: std::any::type_name::<Base>(),
            kind: step.kind(),
            payload: Arc::new(step),
        }
    }

    /// The variant of the underlying step.
    #[inline]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Name of the base type the step was constructed against.
    #[inline]
    pub fn base_type_name(&self) -> &'static str {
        self.base_name
    }

    /// Whether the underlying step was constructed against `Base`.
    #[inline]
    pub fn is_compatible<Base: 'static>(&self) -> bool {
        self.base == TypeId::of::<Base>()
    }

    /// Apply the underlying step if it is compatible with `Base`.
    ///
    /// On a type mismatch the step is skipped: the base is returned
    /// unchanged and a [`Issue::StepTypeMismatch`] is handed to `reporter`.
    pub fn try_update<Base: Send + Sync + 'static>(
        &self,
        base: Base,
        reporter: &dyn IssueReporter,
    ) -> Base {
        match self.payload.downcast_ref::<Step<Base>>() {
            Some(step) => step.update(base),
            None => {
                reporter.report(Issue::step_type_mismatch(
                    self.kind,
                    std::any::type_name::<Base>(),
                    self.base_name,
                ));
                base
            }
        }
    }
}

impl<Base: Send + Sync + 'static> From<Step<Base>> for ErasedStep {
    fn from(step: Step<Base>) -> Self {
        ErasedStep::new(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectReporter;

    #[test]
    fn test_step_variants_update() {
        let double = Step::<i32>::transform(|n| n * 2);
        assert_eq!(double.update(4), 8);
        assert_eq!(double.kind(), StepKind::Transform);

        let bump = Step::<i32>::modify(|n| *n += 1);
        assert_eq!(bump.update(4), 5);

        let noop = Step::<i32>::peek(|_| {});
        assert_eq!(noop.update(4), 4);
    }

    #[test]
    fn test_erased_step_compatibility() {
        let step = ErasedStep::new(Step::<i32>::transform(|n| n + 1));

        assert!(step.is_compatible::<i32>());
        assert!(!step.is_compatible::<String>());
    }

    #[test]
    fn test_try_update_skips_mismatched_base() {
        let reporter = CollectReporter::new();
        let step = ErasedStep::new(Step::<i32>::transform(|n| n + 1));

        let out = step.try_update::<String>("keep".to_owned(), &reporter);
        assert_eq!(out, "keep");
        assert_eq!(reporter.issues().len(), 1);

        let out = step.try_update::<i32>(1, &reporter);
        assert_eq!(out, 2);
        assert_eq!(reporter.issues().len(), 1);
    }
}
