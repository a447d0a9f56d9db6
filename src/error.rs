//! Error types for smartcp.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur while loading a configuration, resolving path templates
//! and copying files, and the [`Result`] type alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | IO | [`Error::Io`], [`Error::TempFile`], [`Error::Persist`] |
//! | Configuration | [`Error::Parse`], [`Error::EmptyConfig`], [`Error::MalformedExpression`], [`Error::InvalidArguments`] |
//! | Resolution | [`Error::MissingBinding`], [`Error::Template`] |
//! | Copy | [`Error::MissingParent`], [`Error::IsADirectory`] |
//!
//! A missing input file is not an error: the binding is skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for smartcp operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a sync run.
///
/// Every error is fatal for the run. Since already-copied files are
/// detected as up to date, fixing the cause and re-running is safe.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error while inspecting or copying a file
    #[error("{path}: {source}")]
    Io {
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML or does not have the
    /// expected structure (missing `clients`, `input_base`, ...)
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The configuration document is empty
    #[error("Empty config file")]
    EmptyConfig,

    /// A path expression node matches none (or more than one) of the
    /// recognized shapes
    #[error("{node} should have `arg', `mapping' or `path_format' ({reason})")]
    MalformedExpression {
        /// The offending node, rendered back as YAML
        node: String,
        /// What is wrong with it
        reason: String,
    },

    /// A client's `arguments` is not a mapping from labels to value lists
    #[error("Invalid arguments for `{name}': {reason}")]
    InvalidArguments {
        /// The parameter label, or `arguments` for the whole table
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// An `arg` node references a label that is not bound
    #[error("unknown label `{label}', it should be in {available:?}")]
    MissingBinding {
        /// The label that was looked up
        label: String,
        /// Labels present in the current binding
        available: Vec<String>,
    },

    /// A `path_format` template cannot be expanded
    #[error("Invalid path format {template:?}: {reason}")]
    Template {
        /// The template string
        template: String,
        /// Why it could not be expanded
        reason: String,
    },

    /// The destination directory of an output path does not exist
    ///
    /// `segment` is the topmost missing directory name and `ancestor` the
    /// nearest directory that does exist.
    #[error("There is no {segment} in {ancestor}")]
    MissingParent {
        /// Name of the first missing directory below `ancestor`
        segment: String,
        /// Nearest existing ancestor
        ancestor: PathBuf,
    },

    /// An input path resolved to a directory
    #[error("Input is a directory: {0}")]
    IsADirectory(PathBuf),

    /// Failed to create temporary file
    #[error("Failed to create temporary file in {path}: {source}")]
    TempFile {
        /// Directory where temp file creation was attempted
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Failed to persist temporary file
    #[error("Failed to persist temporary file to {path}: {source}")]
    Persist {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn template(template: &str, reason: impl Into<String>) -> Self {
        Self::Template {
            template: template.to_owned(),
            reason: reason.into(),
        }
    }
}
