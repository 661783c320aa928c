//! Error type shared by every export path.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing or writing an image-data file.
#[derive(Debug, Error)]
pub enum VtiError {
    /// Grid has a zero-length axis.
    #[error("invalid grid {nx}x{ny}: both axes need at least one point")]
    InvalidGrid {
        /// Points along x
        nx: usize,
        /// Points along y
        ny: usize,
    },

    /// A field slice does not hold exactly `nx * ny` values.
    #[error("field '{field}' has {actual} values, grid needs {expected}")]
    LengthMismatch {
        /// Name of the offending field
        field: &'static str,
        /// Point count of the grid
        expected: usize,
        /// Length of the slice that was passed
        actual: usize,
    },

    /// One appended block would not fit in the 32-bit length prefix.
    #[error("appended block of {bytes} bytes exceeds the 32-bit length prefix")]
    PayloadTooLarge {
        /// Size of a single field block in bytes
        bytes: u64,
    },

    /// Destination could not be created or opened for writing.
    #[error("cannot open '{}' for writing: {source}", path.display())]
    Open {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Stream failed after the destination was opened.
    #[error("write to '{}' failed: {source}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Caller-supplied sink failed during an in-memory or streamed write.
    #[error("output stream failed: {0}")]
    Sink(#[source] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VtiError>;
