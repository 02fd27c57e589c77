//! Declarative value configuration.
//!
//! `chisel` layers ergonomic construction on top of
//! [`chisel-core`](chisel_core)'s paths and pipelines: a [`Builder`] pairs
//! an initial-value factory with a pipeline, and the opt-in traits in
//! [`configure`] give host types `configured`/`from_pipeline`/`builder`
//! entry points.
//!
//! # Examples
//!
//! ```
//! use chisel::{path, Builder};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let staged = Builder::new(Server::default())
//!     .at(path!(Server, host)).set("localhost".to_owned())
//!     .commit();
//!
//! let server = staged.at(path!(Server, port)).set(8080).build();
//! assert_eq!(server.host, "localhost");
//! assert_eq!(server.port, 8080);
//! ```

pub mod builder;
pub mod configure;

pub use builder::Builder;
pub use configure::{BuilderProvider, Configure, FromPipeline};

pub use chisel_core::{
    modified, path, CollectReporter, ErasedStep, Field, Issue, IssueReporter, LogReporter,
    PanicReporter, Path, Pipeline, Shared, Step, StepContainer, StepKind, StepSequence,
};
