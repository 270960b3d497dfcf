//! Error types for section registration, scroll spying, document ingest and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when registering or looking up sections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Sections need a non-empty id to be addressable.
    #[error("section id must not be empty")]
    EmptyId,

    /// Another section already uses this id.
    #[error("section id '{id}' is already registered")]
    DuplicateId {
        /// The colliding id.
        id: String,
    },

    /// The named parent has not been registered yet.
    #[error("parent '{parent}' of section '{id}' is not registered")]
    UnknownParent {
        /// Id of the section being added.
        id: String,
        /// Id given as its parent.
        parent: String,
    },
}

/// Errors raised by the scroll spy coordinator.
#[derive(Debug, Error)]
pub enum SpyError {
    /// Registration was rejected by the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The tracking service has not been created yet, or was already disposed.
    #[error("tracking service is not attached")]
    NotAttached,

    /// An asynchronous tracking service operation failed.
    #[error("tracking service failed: {0}")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl SpyError {
    /// Wraps a tracking service failure.
    pub fn service<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Service(Box::new(err))
    }
}

/// Errors raised while reading and parsing a markdown document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read the document from disk.
    #[error("failed to read document {path}: {source}")]
    Read {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The tree-sitter grammar could not be loaded.
    #[error("failed to load grammar: {0}")]
    Language(String),

    /// tree-sitter produced no syntax tree.
    #[error("failed to parse document")]
    Parse,

    /// The section selector is not a valid tree-sitter query.
    #[error("invalid section selector '{selector}': {message}")]
    Query {
        /// The rejected selector.
        selector: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Errors raised by the terminal tracking service.
#[derive(Debug, Error)]
pub enum ViewportError {
    /// No heading in the document carries this id.
    #[error("section '{id}' is not in the document")]
    UnknownSection {
        /// The requested id.
        id: String,
    },

    /// The service was used after disposal.
    #[error("viewport tracker has been disposed")]
    Disposed,

    /// Observation could not run its selector over the document.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config {path}: {message}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Deserializer diagnostic.
        message: String,
    },
}
