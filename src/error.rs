//! Errors returned by this crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by loading, clustering and plotting.
#[derive(Debug, Error)]
pub enum Error {
    /// The kernel matrix could not be loaded.
    #[error("Cannot load the kernel matrix")]
    KernelLoad,

    /// Reading or writing a text file failed.
    #[error("io error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A text file has content that cannot be parsed.
    #[error("parse error in {path} at line {line}: {message}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// Input is empty.
    #[error("empty input")]
    EmptyInput,

    /// A matrix that must be square is not.
    #[error("matrix is not square: {nrows} x {ncols}")]
    NotSquare {
        /// Number of rows.
        nrows: usize,
        /// Number of columns.
        ncols: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// Two inputs that must have the same length do not.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// There are more tags than samples.
    #[error("{tags} tags given for only {samples} samples")]
    TooManyTags {
        /// Number of tags.
        tags: usize,
        /// Number of samples.
        samples: usize,
    },

    /// The eigendecomposition did not converge.
    #[error("eigendecomposition failed: {0}")]
    Decomposition(String),

    /// Rendering a figure failed.
    #[error("plot error: {0}")]
    Plot(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
