//! Error types for the fallible layers around the hierarchy store.
//!
//! Hierarchy queries themselves never fail; these cover loading project
//! definitions, building a hierarchy from them and optional validation.

use std::path::PathBuf;

use thiserror::Error;

/// A violation of the tree precondition found by `ModuleHierarchy::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("root module '{key}' has a recorded parent")]
    RootHasParent { key: String },

    #[error("module '{key}' is its own ancestor")]
    Cycle { key: String },

    #[error("module '{key}' is not connected to the root")]
    Detached { key: String },
}

/// Failure to read or parse a project definition file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read project definition {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid project definition {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to turn a project definition into a hierarchy.
#[derive(Debug, Error)]
pub enum ReactorError {
    #[error("invalid module key '{key}': allowed characters are letters, digits, '-', '_', '.' and ':', with at least one non-digit")]
    InvalidKey { key: String },

    #[error("module key '{key}' is declared more than once")]
    DuplicateKey { key: String },
}

/// Any failure of a full hierarchy run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Reactor(#[from] ReactorError),

    #[error("module hierarchy is not a tree: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("cannot write report {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
