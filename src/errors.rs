//! Shared error types for pipeline operations.
//!
//! Every pipeline stage returns its error to its direct caller; nothing is
//! retried or swallowed. Errors raised inside a filter or writer are wrapped
//! with the stage that raised them so a failure can be traced back to the
//! faulty input or configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for resio operations
#[derive(Debug, Error)]
pub enum Error {
    /// A document in the input stream is not well-formed YAML.
    ///
    /// `index` is the zero-based position of the document within its stream.
    /// No partial sequence is returned for a stream that fails to parse.
    #[error("malformed document at index {index}: {source}")]
    MalformedDocument {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    /// A filter was constructed with invalid configuration, detected before
    /// any node is processed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A filter failed mid-transformation.
    #[error("filter {name} (stage {stage}) failed: {source}")]
    Filter {
        name: String,
        stage: usize,
        #[source]
        source: Box<Error>,
    },

    /// A destination could not be written.
    #[error("write to {destination} failed: {source}")]
    Write {
        destination: String,
        #[source]
        source: Box<Error>,
    },

    /// A package directory could not be read.
    #[error("failed to read package at {path}: {message}")]
    Package { path: PathBuf, message: String },

    /// Serialization errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Git errors
    #[error(transparent)]
    Git(#[from] git2::Error),

    /// Directory traversal errors
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Wrapped external errors
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Create a malformed-document error for the document at `index`.
    pub fn malformed(index: usize, source: serde_yaml::Error) -> Self {
        Self::MalformedDocument { index, source }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Wrap an error raised by the filter `name` running at `stage`.
    pub fn filter(name: impl Into<String>, stage: usize, source: Error) -> Self {
        Self::Filter {
            name: name.into(),
            stage,
            source: Box::new(source),
        }
    }

    /// Wrap an error raised while writing to `destination`.
    pub fn write(destination: impl Into<String>, source: Error) -> Self {
        Self::Write {
            destination: destination.into(),
            source: Box::new(source),
        }
    }

    /// Create a package read error with path context.
    pub fn package(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Package {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_carries_stage_context() {
        let inner = Error::configuration("bad pattern");
        let err = Error::filter("FileSetter", 2, inner);
        let msg = err.to_string();
        assert!(msg.contains("FileSetter"));
        assert!(msg.contains("stage 2"));
    }

    #[test]
    fn test_write_error_names_destination() {
        let inner = Error::configuration("boom");
        let err = Error::write("foo/bar.yaml", inner);
        assert!(err.to_string().contains("foo/bar.yaml"));
    }
}
