//! Canopy Core — module hierarchy for multi-module scans.
//!
//! This crate models how the modules of a project nest inside each other and
//! derives the relative paths needed to correlate findings across module
//! boundaries: project definition loading, the immutable hierarchy store,
//! directory relativization and the JSON report.

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod module;
pub mod output;
pub mod path_resolver;
pub mod pipeline;
pub mod reactor;

pub use error::{ConfigError, HierarchyError, PipelineError, ReactorError};
pub use hierarchy::ModuleHierarchy;
pub use module::{InputModule, ProjectModule};
pub use path_resolver::relativize;
