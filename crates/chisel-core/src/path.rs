//! Bidirectional value paths.
//!
//! A [`Path`] pairs two pure functions: `extract` reads a sub-value out of a
//! root, `embed` writes a (possibly transformed) sub-value back into it.
//! Paths compose with [`Path::appending`], lift over optional layers with
//! [`Path::optional`] and [`Path::optional_root`], and reach into standard
//! containers with [`Path::key`] and [`Path::index`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::modified;

/// A path that supports embedding a value in a root and extracting a root's
/// embedded value.
///
/// For a *lawful* path, `extract(embed(v, r)) == v` (get-put) and
/// `embed(extract(r), r) == r` (put-get). The laws are a convention checked
/// by the test suite, not enforced at construction: [`Path::get_only`]
/// deliberately breaks get-put by discarding every write.
///
/// Paths are immutable and cheap to clone; the closures they hold are
/// `Send + Sync`, so a path may be shared across threads freely.
///
/// # Examples
///
/// ```
/// use chisel_core::{path, Path};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct User {
///     name: String,
/// }
///
/// let name = path!(User, name);
/// let user = User { name: "alice".into() };
///
/// assert_eq!(name.extract(&user), "alice");
/// let renamed = name.embed("bob".into(), user);
/// assert_eq!(renamed.name, "bob");
/// ```
pub struct Path<Root, Value> {
    embed: Arc<dyn Fn(Value, Root) -> Root + Send + Sync>,
    extract: Arc<dyn Fn(&Root) -> Value + Send + Sync>,
}

impl<Root, Value> Clone for Path<Root, Value> {
    fn clone(&self) -> Self {
        Self {
            embed: Arc::clone(&self.embed),
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<Root, Value> fmt::Debug for Path<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Path<{} -> {}>",
            std::any::type_name::<Root>(),
            std::any::type_name::<Value>()
        )
    }
}

impl<Root: 'static, Value: 'static> Path<Root, Value> {
    /// Create a path from a pair of functions.
    ///
    /// The functions are stored verbatim; no validation is performed.
    ///
    /// * `embed` - writes a value into a root and returns the updated root.
    /// * `extract` - reads the value out of a root.
    pub fn new(
        embed: impl Fn(Value, Root) -> Root + Send + Sync + 'static,
        extract: impl Fn(&Root) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            embed: Arc::new(embed),
            extract: Arc::new(extract),
        }
    }

    /// Create a path from a read-write location described by a read closure
    /// and a write-to-place closure.
    ///
    /// `embed` is derived mechanically: copy the root, run `set` on the
    /// copy, return it. The [`path!`](crate::path!) macro expands to this
    /// constructor for plain field chains.
    pub fn field(
        get: impl Fn(&Root) -> Value + Send + Sync + 'static,
        set: impl Fn(&mut Root, Value) + Send + Sync + 'static,
    ) -> Self {
        Self::new(move |value, root| modified(root, |root| set(root, value)), get)
    }

    /// Create a read-only path.
    ///
    /// `embed` returns the root unchanged, silently discarding the write.
    /// This is a documented escape hatch for locations the caller only
    /// intends to observe (see [`Pipeline::peek`](crate::Pipeline::peek)),
    /// not a bug: the path is deliberately unlawful on embed.
    pub fn get_only(get: impl Fn(&Root) -> Value + Send + Sync + 'static) -> Self {
        Self::new(|_, root| root, get)
    }

    /// Extract the value from a root.
    #[inline]
    pub fn extract(&self, root: &Root) -> Value {
        (self.extract)(root)
    }

    /// Return a root with `value` embedded into it.
    ///
    /// Note: the value is discarded if this path was created with
    /// [`Path::get_only`].
    #[inline]
    pub fn embed(&self, value: Value, root: Root) -> Root {
        (self.embed)(value, root)
    }

    /// Embed `value` into a root behind a mutable reference.
    #[inline]
    pub fn embed_in_place(&self, value: Value, root: &mut Root)
    where
        Root: Clone,
    {
        *root = self.embed(value, root.clone());
    }

    /// Lift the path's value into an optional.
    ///
    /// `extract` always yields `Some`; embedding `None` is a no-op that
    /// returns the root unchanged.
    pub fn optional(&self) -> Path<Root, Option<Value>> {
        let embed = Arc::clone(&self.embed);
        let extract = Arc::clone(&self.extract);
        Path::new(
            move |value, root| match value {
                Some(value) => embed(value, root),
                None => root,
            },
            move |root| Some(extract(root)),
        )
    }

    /// Lift the path over an optional root.
    ///
    /// An absent root extracts `None`, and embedding into an absent root
    /// yields `None`. Embedding `None` into a *present* root returns the
    /// root unchanged when `unwrap_with_root` is `true`, and `None` when it
    /// is `false`; the flag resolves what writing an absent value into a
    /// present root means.
    pub fn optional_root(&self, unwrap_with_root: bool) -> Path<Option<Root>, Option<Value>> {
        let embed = Arc::clone(&self.embed);
        let extract = Arc::clone(&self.extract);
        Path::new(
            move |value, root| match (root, value) {
                (Some(root), Some(value)) => Some(embed(value, root)),
                (Some(root), None) => {
                    if unwrap_with_root {
                        Some(root)
                    } else {
                        None
                    }
                }
                (None, _) => None,
            },
            move |root: &Option<Root>| root.as_ref().map(|root| extract(root)),
        )
    }

    /// Return a new path created by appending `path` to this one.
    ///
    /// `extract` chains the reads; `embed` reads the intermediate value,
    /// embeds into it, then embeds the result back into the root.
    pub fn appending<Appended: 'static>(
        &self,
        path: Path<Value, Appended>,
    ) -> Path<Root, Appended> {
        let embed_outer = Arc::clone(&self.embed);
        let extract_outer = Arc::clone(&self.extract);
        let extract_chain = Arc::clone(&self.extract);
        let embed_inner = path.embed;
        let extract_inner = path.extract;
        Path::new(
            move |appended, root| {
                let mid = extract_outer(&root);
                let mid = embed_inner(appended, mid);
                embed_outer(mid, root)
            },
            move |root| extract_inner(&extract_chain(root)),
        )
    }
}

impl<Root: 'static, Wrapped: 'static> Path<Root, Option<Wrapped>> {
    /// Append a path whose root is the wrapped type of this path's optional
    /// value.
    ///
    /// The appended path is lifted over the optional intermediate with
    /// `optional_root(true)`, so embedding `None` through the composite
    /// leaves a present intermediate untouched. Only this single optional
    /// layer is supported; deeper optional nesting must be composed
    /// explicitly.
    pub fn appending_optional<Appended: 'static>(
        &self,
        path: Path<Wrapped, Appended>,
    ) -> Path<Root, Option<Appended>> {
        self.appending(path.optional_root(true))
    }

    /// Turn a path to an optional value into a path to the wrapped value by
    /// substituting `default` on read when the value is absent.
    ///
    /// This is the aggressive unwrap: reads proceed as if the location
    /// already held `default`, while writes still go through the original
    /// optional embed (wrapped in `Some`).
    pub fn unwrap_or(&self, default: Wrapped) -> Path<Root, Wrapped>
    where
        Wrapped: Clone + Send + Sync,
    {
        let embed = Arc::clone(&self.embed);
        let extract = Arc::clone(&self.extract);
        Path::new(
            move |value, root| embed(Some(value), root),
            move |root| extract(root).unwrap_or_else(|| default.clone()),
        )
    }
}

impl<K, E> Path<HashMap<K, E>, Option<E>>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    E: Clone + 'static,
{
    /// A path to the entry under `key` in a map.
    ///
    /// An absent key extracts `None`; embedding `None` removes the key.
    pub fn key(key: K) -> Self {
        let read_key = key.clone();
        Path::new(
            move |value, root: HashMap<K, E>| {
                modified(root, |map| match value {
                    Some(value) => {
                        map.insert(key.clone(), value);
                    }
                    None => {
                        map.remove(&key);
                    }
                })
            },
            move |root| root.get(&read_key).cloned(),
        )
    }
}

impl<E: Clone + 'static> Path<Vec<E>, E> {
    /// A path to the element at `index`.
    ///
    /// Unchecked: extracting or embedding past the end panics, matching
    /// slice indexing. Out-of-range use is a contract violation on the
    /// caller's side; use [`Path::index_safe`] for a defined fallback.
    pub fn index(index: usize) -> Self {
        Path::new(
            move |value, root: Vec<E>| modified(root, |items| items[index] = value),
            move |root| root[index].clone(),
        )
    }

    /// A read-only path to the element at `index`; embed is ignored.
    pub fn index_get_only(index: usize) -> Self {
        Path::get_only(move |root: &Vec<E>| root[index].clone())
    }
}

impl<E: Clone + 'static> Path<Vec<E>, Option<E>> {
    /// A bounds-checked path to the element at `index`.
    ///
    /// Extracting past the end yields `None`; embedding past the end, or
    /// embedding `None`, is a silent no-op.
    pub fn index_safe(index: usize) -> Self {
        Path::new(
            move |value, root: Vec<E>| {
                modified(root, |items| {
                    if let Some(value) = value {
                        if index < items.len() {
                            items[index] = value;
                        }
                    }
                })
            },
            move |root| root.get(index).cloned(),
        )
    }
}

/// Construct a [`Path`] from a root type and a chain of named fields.
///
/// Expands to [`Path::field`] with mechanical get/set closures; the field
/// chain must be reachable through `Clone`-able owned values.
///
/// # Examples
///
/// ```
/// use chisel_core::path;
///
/// #[derive(Clone)]
/// struct Inner {
///     value: i32,
/// }
///
/// #[derive(Clone)]
/// struct Outer {
///     inner: Inner,
/// }
///
/// let p = path!(Outer, inner.value);
/// let outer = Outer { inner: Inner { value: 3 } };
/// assert_eq!(p.extract(&outer), 3);
/// ```
#[macro_export]
macro_rules! path {
    ($root:ty, $($field:ident).+) => {
        $crate::Path::<$root, _>::field(
            |root: &$root| root.$($field).+.clone(),
            |root: &mut $root, value| root.$($field).+ = value,
        )
    };
}
