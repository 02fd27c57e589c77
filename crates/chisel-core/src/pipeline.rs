//! Mutation pipelines and field-scoped builders.
//!
//! A [`Pipeline`] owns one [`StepSequence`] and is the unit callers compose:
//! append whole-base steps directly, reach into a location with
//! [`Pipeline::at`], or collapse a sub-pipeline through a path with
//! [`Pipeline::scope`]. Nothing runs until [`Pipeline::apply`] folds the
//! accumulated steps over a concrete value in one pass.

use std::fmt;
use std::sync::Arc;

use crate::report::IssueReporter;
use crate::sequence::StepSequence;
use crate::step::Step;
use crate::Path;

/// An ordered collection of deferred update steps over `Base`.
///
/// Pipelines are immutable values: every builder method consumes `self` and
/// returns the extended pipeline, and [`apply`](Pipeline::apply) takes
/// `&self`, so a built pipeline can be applied to any number of values.
///
/// # Examples
///
/// ```
/// use chisel_core::{path, Pipeline};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: i32,
///     label: String,
/// }
///
/// let pipeline = Pipeline::empty()
///     .at(path!(Counter, count)).set(3)
///     .at(path!(Counter, label)).modify(|label| label.push('!'));
///
/// let counter = pipeline.apply(Counter { count: 0, label: "hits".into() });
/// assert_eq!(counter, Counter { count: 3, label: "hits!".into() });
/// ```
pub struct Pipeline<Base> {
    sequence: StepSequence<Base>,
}

impl<Base> Clone for Pipeline<Base> {
    fn clone(&self) -> Self {
        Self {
            sequence: self.sequence.clone(),
        }
    }
}

impl<Base> fmt::Debug for Pipeline<Base> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl<Base: Send + Sync + 'static> Default for Pipeline<Base> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Base: Send + Sync + 'static> Pipeline<Base> {
    /// A pipeline whose fold is the identity function.
    pub fn empty() -> Self {
        Self {
            sequence: StepSequence::new(),
        }
    }

    /// Wrap an existing sequence.
    pub fn from_sequence(sequence: StepSequence<Base>) -> Self {
        Self { sequence }
    }

    /// The underlying sequence.
    #[inline]
    pub fn sequence(&self) -> &StepSequence<Base> {
        &self.sequence
    }

    /// Number of accumulated steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether no steps have been accumulated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Replace the issue reporter carried by the sequence.
    pub fn with_reporter(mut self, reporter: Arc<dyn IssueReporter>) -> Self {
        self.sequence = self.sequence.with_reporter(reporter);
        self
    }

    /// Return a new pipeline with one more step.
    pub fn append(mut self, step: Step<Base>) -> Self {
        self.sequence.push(step);
        self
    }

    /// Concatenate `other`'s steps after this pipeline's.
    ///
    /// Order matters: this pipeline's effects are visible to `other`'s
    /// steps, mirroring function composition `g ∘ f` where `f` runs first.
    /// When both write the same location, the last write wins.
    pub fn combined(mut self, other: Pipeline<Base>) -> Self {
        self.sequence.extend(other.sequence);
        self
    }

    /// Fold every accumulated step over `base`, strictly in insertion
    /// order, and return the result.
    pub fn apply(&self, base: Base) -> Base {
        self.sequence.fold(base)
    }

    /// Apply the pipeline to a value behind a mutable reference.
    pub fn apply_in_place(&self, base: &mut Base)
    where
        Base: Clone,
    {
        *base = self.apply(base.clone());
    }

    /// Append a whole-base transform.
    pub fn transform(self, f: impl Fn(Base) -> Base + Send + Sync + 'static) -> Self {
        self.append(Step::transform(f))
    }

    /// Append a copy-then-mutate step.
    pub fn modify(self, f: impl Fn(&mut Base) + Send + Sync + 'static) -> Self {
        self.append(Step::modify(f))
    }

    /// Append a side-effecting observation; the base passes through
    /// unchanged.
    pub fn peek(self, f: impl Fn(&Base) + Send + Sync + 'static) -> Self {
        self.append(Step::peek(f))
    }

    /// Append an arbitrary base-to-base update.
    pub fn update(self, f: impl Fn(Base) -> Base + Send + Sync + 'static) -> Self {
        self.append(Step::update_with(f))
    }

    /// Append a step embedding `value` through `path`.
    pub fn set<Value>(self, path: Path<Base, Value>, value: Value) -> Self
    where
        Value: Clone + Send + Sync + 'static,
    {
        self.append(Step::set_value(path, value))
    }

    /// Scope this pipeline to the location `path` points at.
    ///
    /// The returned [`Field`] borrows nothing; it owns the pipeline and
    /// hands it back from whichever operation finishes the chain.
    pub fn at<Value>(self, path: Path<Base, Value>) -> Field<Self, Value>
    where
        Value: Send + Sync + 'static,
    {
        Field::new(self, path)
    }

    /// Build a sub-pipeline for the value at `path` and fold it into this
    /// pipeline as a single update step.
    ///
    /// The generated step extracts through `path`, applies the built
    /// sub-pipeline, and embeds the result back.
    pub fn scope<Local>(
        self,
        path: Path<Base, Local>,
        build: impl FnOnce(Pipeline<Local>) -> Pipeline<Local>,
    ) -> Self
    where
        Local: Send + Sync + 'static,
    {
        let scoped = build(Pipeline::empty());
        self.append(Step::update_with(move |base| {
            let local = scoped.apply(path.extract(&base));
            path.embed(local, base)
        }))
    }

    /// Like [`scope`](Pipeline::scope), over an optional location.
    ///
    /// When the optional is absent the generated step returns the base
    /// unchanged; only a present value is run through the sub-pipeline and
    /// embedded back.
    pub fn scope_if_present<Local>(
        self,
        path: Path<Base, Option<Local>>,
        build: impl FnOnce(Pipeline<Local>) -> Pipeline<Local>,
    ) -> Self
    where
        Local: Send + Sync + 'static,
    {
        let scoped = build(Pipeline::empty());
        self.append(Step::update_with(move |base| match path.extract(&base) {
            Some(local) => {
                let local = scoped.apply(local);
                path.embed(Some(local), base)
            }
            None => base,
        }))
    }
}

/// Anything that accumulates steps: [`Pipeline`] itself, and the builder
/// front-ends layered on top of it.
pub trait StepContainer: Sized {
    /// The base type the contained steps apply to.
    type Base: Send + Sync + 'static;

    /// Return the container with one more step.
    fn append_step(self, step: Step<Self::Base>) -> Self;
}

impl<Base: Send + Sync + 'static> StepContainer for Pipeline<Base> {
    type Base = Base;

    fn append_step(self, step: Step<Base>) -> Self {
        self.append(step)
    }
}

/// A step container focused on one location of its base.
///
/// Created by [`Pipeline::at`]; every finishing operation appends exactly
/// the steps it describes and returns the owning container.
pub struct Field<C: StepContainer, Value> {
    container: C,
    path: Path<C::Base, Value>,
}

impl<C: StepContainer, Value: Send + Sync + 'static> Field<C, Value> {
    /// Focus `container` on `path`.
    pub fn new(container: C, path: Path<C::Base, Value>) -> Self {
        Self { container, path }
    }

    /// Compose the focus deeper through `path`.
    pub fn at<Local>(self, path: Path<Value, Local>) -> Field<C, Local>
    where
        Local: Send + Sync + 'static,
    {
        Field {
            container: self.container,
            path: self.path.appending(path),
        }
    }

    /// Unconditionally overwrite the location with `value`.
    ///
    /// Last write wins: an earlier step in the same pipeline writing this
    /// location is simply overwritten when the fold reaches this step.
    pub fn set(self, value: Value) -> C
    where
        Value: Clone,
    {
        let Field { container, path } = self;
        container.append_step(Step::set_value(path, value))
    }

    /// Overwrite the location only when `condition` holds; otherwise the
    /// container is returned unchanged.
    pub fn set_if(self, condition: bool, value: Value) -> C
    where
        Value: Clone,
    {
        if condition {
            self.set(value)
        } else {
            self.container
        }
    }

    /// Overwrite the location with one of two values depending on
    /// `condition`.
    pub fn set_if_else(self, condition: bool, then_value: Value, else_value: Value) -> C
    where
        Value: Clone,
    {
        self.set(if condition { then_value } else { else_value })
    }

    /// Overwrite the location when a value is given; `None` appends
    /// nothing.
    pub fn set_if_some(self, value: Option<Value>) -> C
    where
        Value: Clone,
    {
        match value {
            Some(value) => self.set(value),
            None => self.container,
        }
    }

    /// Mutate the located value in place.
    pub fn modify(self, f: impl Fn(&mut Value) + Send + Sync + 'static) -> C {
        let Field { container, path } = self;
        container.append_step(Step::update_with(move |base| {
            let mut value = path.extract(&base);
            f(&mut value);
            path.embed(value, base)
        }))
    }

    /// Observe the located value for its side effect.
    pub fn peek(self, f: impl Fn(&Value) + Send + Sync + 'static) -> C {
        let Field { container, path } = self;
        container.append_step(Step::peek(move |base| {
            let value = path.extract(base);
            f(&value);
        }))
    }

    /// Build a sub-pipeline for the located value and fold it in as one
    /// update step.
    pub fn scope(self, build: impl FnOnce(Pipeline<Value>) -> Pipeline<Value>) -> C {
        let Field { container, path } = self;
        let scoped = build(Pipeline::empty());
        container.append_step(Step::update_with(move |base| {
            let local = scoped.apply(path.extract(&base));
            path.embed(local, base)
        }))
    }
}

impl<C: StepContainer, Wrapped: Send + Sync + 'static> Field<C, Option<Wrapped>> {
    /// Write `default` into the location only when it is currently absent.
    ///
    /// Distinct from scoping: the step substitutes, nothing more. A present
    /// value is left untouched, so the default is never reapplied.
    pub fn set_if_absent(self, default: Wrapped) -> C
    where
        Wrapped: Clone,
    {
        let Field { container, path } = self;
        container.append_step(Step::update_with(move |base| {
            if path.extract(&base).is_none() {
                path.embed(Some(default.clone()), base)
            } else {
                base
            }
        }))
    }

    /// Aggressively unwrap the focus: reads substitute `default` when the
    /// location is absent, so subsequent chained operations proceed as if
    /// it were present. Writes still go through the original optional
    /// embed.
    pub fn unwrap_or(self, default: Wrapped) -> Field<C, Wrapped>
    where
        Wrapped: Clone,
    {
        Field {
            path: self.path.unwrap_or(default),
            container: self.container,
        }
    }

    /// Build a sub-pipeline run only when the located optional is present;
    /// an absent value leaves the base unchanged.
    pub fn scope_if_present(self, build: impl FnOnce(Pipeline<Wrapped>) -> Pipeline<Wrapped>) -> C {
        let Field { container, path } = self;
        let scoped = build(Pipeline::empty());
        container.append_step(Step::update_with(move |base| match path.extract(&base) {
            Some(local) => {
                let local = scoped.apply(local);
                path.embed(Some(local), base)
            }
            None => base,
        }))
    }
}
