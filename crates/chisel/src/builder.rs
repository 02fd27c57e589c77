//! Deferred construction over an initial-value factory.

use std::fmt;
use std::sync::Arc;

use chisel_core::{Field, IssueReporter, Path, Pipeline, Shared, Step, StepContainer};

/// A pipeline paired with a factory for its initial value.
///
/// The factory is a no-argument thunk so lazily-constructed or shared
/// defaults work the same as plain seeds. Nothing runs until
/// [`Builder::build`] calls the factory and folds the accumulated pipeline
/// over the fresh value.
///
/// # Examples
///
/// ```
/// use chisel::{path, Builder};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Request {
///     url: String,
///     retries: u32,
/// }
///
/// let request = Builder::new(Request::default())
///     .at(path!(Request, url)).set("https://example.com".to_owned())
///     .at(path!(Request, retries)).set(3)
///     .build();
///
/// assert_eq!(request.retries, 3);
/// ```
pub struct Builder<Base> {
    initial: Arc<dyn Fn() -> Base + Send + Sync>,
    pipeline: Pipeline<Base>,
}

impl<Base> Clone for Builder<Base> {
    fn clone(&self) -> Self {
        Self {
            initial: Arc::clone(&self.initial),
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<Base> fmt::Debug for Builder<Base> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl<Base: Send + Sync + 'static> Builder<Base> {
    /// Create a builder seeded with `value`; the factory clones it on
    /// every [`base`](Builder::base) call.
    pub fn new(value: Base) -> Self
    where
        Base: Clone,
    {
        Self::from_factory(move || value.clone())
    }

    /// Create a builder over an explicit initial-value factory.
    pub fn from_factory(factory: impl Fn() -> Base + Send + Sync + 'static) -> Self {
        Self {
            initial: Arc::new(factory),
            pipeline: Pipeline::empty(),
        }
    }

    /// The initial value, as produced by the factory, without applying the
    /// current pipeline.
    pub fn base(&self) -> Base {
        (self.initial)()
    }

    /// The accumulated pipeline.
    #[inline]
    pub fn pipeline(&self) -> &Pipeline<Base> {
        &self.pipeline
    }

    /// Build the value: call the factory, fold the pipeline over it.
    pub fn build(&self) -> Base {
        self.pipeline.apply(self.base())
    }

    /// Commit the current configuration.
    ///
    /// Returns a new builder seeded with the freshly built value and an
    /// empty pipeline, enabling incremental multi-stage construction
    /// without re-running prior steps on every build.
    pub fn commit(self) -> Self
    where
        Base: Clone,
    {
        Builder::new(self.build())
    }

    /// Replace the issue reporter carried by the pipeline.
    pub fn with_reporter(mut self, reporter: Arc<dyn IssueReporter>) -> Self {
        self.pipeline = self.pipeline.with_reporter(reporter);
        self
    }

    /// Concatenate `pipeline`'s steps after the current ones.
    pub fn combined(mut self, pipeline: Pipeline<Base>) -> Self {
        self.pipeline = self.pipeline.combined(pipeline);
        self
    }

    /// Append a whole-base transform.
    pub fn transform(mut self, f: impl Fn(Base) -> Base + Send + Sync + 'static) -> Self {
        self.pipeline = self.pipeline.transform(f);
        self
    }

    /// Append a copy-then-mutate step.
    pub fn modify(mut self, f: impl Fn(&mut Base) + Send + Sync + 'static) -> Self {
        self.pipeline = self.pipeline.modify(f);
        self
    }

    /// Append a side-effecting observation.
    pub fn peek(mut self, f: impl Fn(&Base) + Send + Sync + 'static) -> Self {
        self.pipeline = self.pipeline.peek(f);
        self
    }

    /// Append a step embedding `value` through `path`.
    pub fn set<Value>(mut self, path: Path<Base, Value>, value: Value) -> Self
    where
        Value: Clone + Send + Sync + 'static,
    {
        self.pipeline = self.pipeline.set(path, value);
        self
    }

    /// Focus the builder on the location `path` points at.
    pub fn at<Value>(self, path: Path<Base, Value>) -> Field<Self, Value>
    where
        Value: Send + Sync + 'static,
    {
        Field::new(self, path)
    }

    /// Build a sub-pipeline for the value at `path` and fold it in as one
    /// step.
    pub fn scope<Local>(
        mut self,
        path: Path<Base, Local>,
        build: impl FnOnce(Pipeline<Local>) -> Pipeline<Local>,
    ) -> Self
    where
        Local: Send + Sync + 'static,
    {
        self.pipeline = self.pipeline.scope(path, build);
        self
    }

    /// Like [`scope`](Builder::scope) over an optional location; absent
    /// values leave the base unchanged.
    pub fn scope_if_present<Local>(
        mut self,
        path: Path<Base, Option<Local>>,
        build: impl FnOnce(Pipeline<Local>) -> Pipeline<Local>,
    ) -> Self
    where
        Local: Send + Sync + 'static,
    {
        self.pipeline = self.pipeline.scope_if_present(path, build);
        self
    }
}

impl<T: Send + 'static> Builder<Shared<T>> {
    /// Build against a shared target, discarding the returned handle.
    ///
    /// The mutation already happened through the handle during the fold;
    /// this exists to silence the unused-result of [`Builder::build`].
    pub fn apply(&self) {
        let _ = self.build();
    }
}

impl<Base: Send + Sync + 'static> StepContainer for Builder<Base> {
    type Base = Base;

    fn append_step(mut self, step: Step<Base>) -> Self {
        self.pipeline = self.pipeline.append(step);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chisel_core::path;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Mock {
        value: i32,
    }

    #[test]
    fn test_build_leaves_base_untouched() {
        let builder = Builder::new(Mock::default()).at(path!(Mock, value)).set(1);

        assert_eq!(builder.base(), Mock::default());
        assert_eq!(builder.build(), Mock { value: 1 });
        assert_eq!(builder.base(), Mock::default());
    }

    #[test]
    fn test_commit_reseeds_factory() {
        let builder = Builder::new(Mock::default()).at(path!(Mock, value)).set(1);

        let before = builder.base();
        let committed = builder.commit();

        assert_eq!(before, Mock::default());
        assert_eq!(committed.base(), Mock { value: 1 });
        assert!(committed.pipeline().is_empty());
    }

    #[test]
    fn test_from_factory_is_lazy() {
        let builder = Builder::from_factory(|| Mock { value: 40 })
            .modify(|mock| mock.value += 2);

        assert_eq!(builder.build().value, 42);
        assert_eq!(builder.build().value, 42);
    }
}
