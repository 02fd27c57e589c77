//! Opt-in configuration entry points for host types.

use chisel_core::Pipeline;

use crate::Builder;

/// Configure an existing value through a pipeline built inline.
///
/// Opt-in marker: implement it for a type to get the `configured` entry
/// point.
///
/// # Examples
///
/// ```
/// use chisel::{path, Configure};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Theme {
///     dark: bool,
/// }
///
/// impl Configure for Theme {}
///
/// let theme = Theme::default().configured(|config| {
///     config.at(path!(Theme, dark)).set(true)
/// });
/// assert!(theme.dark);
/// ```
pub trait Configure: Sized + Send + Sync + 'static {
    /// Apply a pipeline built by `build` to `self`.
    fn configured(self, build: impl FnOnce(Pipeline<Self>) -> Pipeline<Self>) -> Self {
        build(Pipeline::empty()).apply(self)
    }
}

/// Construct a value from its default and a pipeline built inline.
pub trait FromPipeline: Configure + Default {
    /// Build `Self::default()` configured by `build`.
    fn from_pipeline(build: impl FnOnce(Pipeline<Self>) -> Pipeline<Self>) -> Self {
        Self::default().configured(build)
    }
}

/// Hang a [`Builder`] off any cloneable value.
pub trait BuilderProvider: Sized + Clone + Send + Sync + 'static {
    /// A builder seeded with a clone of `self`.
    fn builder(&self) -> Builder<Self> {
        Builder::new(self.clone())
    }
}
