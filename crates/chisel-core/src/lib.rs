//! Typed bidirectional paths + deferred mutation pipelines.
//!
//! `chisel-core` lets a caller describe a sequence of "update a value at
//! some internal location" operations, then apply them atomically to a
//! concrete instance in one left-to-right pass.
//!
//! # Core concepts
//!
//! - **[`Path`]**: a pair of pure functions for reading a sub-value out of
//!   a root and writing one back in, composing arbitrarily deep, including
//!   through optional layers.
//! - **[`Step`]**: one deferred, typed update operation bound to a specific
//!   base type.
//! - **[`StepSequence`]**: ordered, type-erased step storage with a
//!   defensive compatibility check.
//! - **[`Pipeline`]**: the composable unit — accumulate steps, combine,
//!   scope through paths, then fold everything with a single
//!   [`Pipeline::apply`].
//! - **[`Shared`]**: identity-preserving targets for reference semantics.
//!
//! # Deterministic folding
//!
//! ```text
//! base' = pipeline.apply(base)
//! ```
//!
//! The fold is strictly sequential over the step list in insertion order;
//! later steps observe the effects of earlier ones, and the same
//! `(pipeline, base)` always produces the same result.
//!
//! # Quick start
//!
//! ```
//! use chisel_core::{path, Pipeline};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Window {
//!     title: String,
//!     width: u32,
//! }
//!
//! let pipeline = Pipeline::empty()
//!     .at(path!(Window, title)).set("main".to_owned())
//!     .at(path!(Window, width)).modify(|w| *w *= 2);
//!
//! let window = pipeline.apply(Window { title: String::new(), width: 400 });
//! assert_eq!(window, Window { title: "main".into(), width: 800 });
//! ```

pub mod path;
pub mod pipeline;
pub mod report;
pub mod sequence;
pub mod shared;
pub mod step;

pub use path::Path;
pub use pipeline::{Field, Pipeline, StepContainer};
pub use report::{CollectReporter, Issue, IssueReporter, LogReporter, PanicReporter};
pub use sequence::StepSequence;
pub use shared::Shared;
pub use step::{ErasedStep, Step, StepKind};

/// Run `transform` against a mutable copy of `value` and return the copy.
///
/// The single primitive behind copy-then-mutate steps: the input binding
/// is never touched, the updated copy is the result.
///
/// # Examples
///
/// ```
/// use chisel_core::modified;
///
/// let original = vec![1, 2];
/// let longer = modified(original.clone(), |items| items.push(3));
///
/// assert_eq!(original, vec![1, 2]);
/// assert_eq!(longer, vec![1, 2, 3]);
/// ```
#[inline]
pub fn modified<T>(value: T, transform: impl FnOnce(&mut T)) -> T {
    let mut value = value;
    transform(&mut value);
    value
}
