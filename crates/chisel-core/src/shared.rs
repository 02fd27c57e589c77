//! Identity-preserving pipeline targets.
//!
//! Value-typed bases are rebuilt copy-on-write by every fold. [`Shared`]
//! is the reference-semantics counterpart: a handle whose clones all point
//! at the same storage, so applying a pipeline mutates through the handle
//! and returns the *same* identity.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::{Path, Pipeline};

/// A shared, identity-carrying slot for a value of type `T`.
///
/// Cloning a `Shared` clones the handle, not the value; [`Shared::ptr_eq`]
/// tells whether two handles name the same slot. Lock poisoning is
/// ignored: the pipeline fold is the only writer and never unwinds while
/// holding the lock mid-update in normal use.
///
/// # Examples
///
/// ```
/// use chisel_core::{path, Path, Pipeline, Shared};
///
/// #[derive(Clone)]
/// struct Label {
///     text: String,
/// }
///
/// let label = Shared::new(Label { text: "a".into() });
/// let pipeline = Pipeline::empty()
///     .at(Path::shared(path!(Label, text)))
///     .modify(|text| text.push('b'));
///
/// let out = pipeline.apply(label.clone());
/// assert!(Shared::ptr_eq(&out, &label));
/// assert_eq!(label.with(|l| l.text.clone()), "ab");
/// ```
pub struct Shared<T>(Arc<Mutex<T>>);

impl<T> Shared<T> {
    /// Wrap a value in a fresh shared slot.
    pub fn new(value: T) -> Self {
        Self(Arc::new(Mutex::new(value)))
    }

    /// Run `f` against a borrow of the stored value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    /// Run `f` against a mutable borrow of the stored value.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Clone the stored value out.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Replace the stored value.
    pub fn set(&self, value: T) {
        self.with_mut(|slot| *slot = value);
    }

    /// Whether two handles name the same slot.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| f.debug_tuple("Shared").field(value).finish())
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T, Value> Path<Shared<T>, Value>
where
    T: Clone + Send + 'static,
    Value: 'static,
{
    /// Lift a path over `T` to a path over a shared slot of `T`.
    ///
    /// Extraction reads under the lock; embedding rewrites the guarded
    /// value through the inner path and returns the same handle, so
    /// identity is preserved across a fold.
    pub fn shared(inner: Path<T, Value>) -> Self {
        let read = inner.clone();
        Path::new(
            move |value, root: Shared<T>| {
                root.with_mut(|slot| {
                    let current = slot.clone();
                    *slot = inner.embed(value, current);
                });
                root
            },
            move |root: &Shared<T>| root.with(|value| read.extract(value)),
        )
    }
}

impl<T: Send + 'static> Pipeline<Shared<T>> {
    /// Apply the pipeline to a shared target, discarding the returned
    /// handle.
    ///
    /// Purely an ergonomic alias: the returned handle is the same identity
    /// the caller already holds, because mutation happens through the
    /// handle during the fold.
    pub fn apply_shared(&self, target: &Shared<T>) {
        let _ = self.apply(target.clone());
    }
}
