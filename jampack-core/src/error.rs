//! Error types for Jampack operations.
//!
//! The taxonomy follows the five failure classes a block can hit: I/O,
//! format, integrity, invariant and resource errors. Format, integrity and
//! invariant errors are never recoverable mid-block — the pipeline has no
//! resync points inside a block — so they always fail the whole operation.

use std::io;
use thiserror::Error;

/// The main error type for Jampack operations.
#[derive(Debug, Error)]
pub enum JampackError {
    /// I/O error from the underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Bad magic bytes at the start of a block header.
    #[error("bad block magic: expected {expected:02x?}, found {found:02x?}")]
    BadMagic {
        /// Expected magic bytes.
        expected: [u8; 3],
        /// Actual bytes found.
        found: [u8; 3],
    },

    /// A header field was outside its legal range, or declared lengths were
    /// mutually inconsistent.
    #[error("corrupt header: {message}")]
    CorruptHeader {
        /// Description of the inconsistency.
        message: String,
    },

    /// The decoded block's checksum did not match the header's.
    #[error("block checksum mismatch: header says {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Checksum recorded in the header.
        expected: u32,
        /// Checksum computed from the decoded block.
        computed: u32,
    },

    /// A model, token, or index invariant was violated.
    #[error("invariant violated in {stage}: {message}")]
    Invariant {
        /// Pipeline stage that detected the violation.
        stage: &'static str,
        /// Description of the violated invariant.
        message: String,
    },

    /// A token or stream read past the end of its buffer.
    #[error("{stage}: read beyond buffer (wanted {wanted} bytes, had {available})")]
    BufferUnderrun {
        /// Pipeline stage that hit the underrun.
        stage: &'static str,
        /// Bytes the stage tried to read.
        wanted: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// Allocation or capacity failure.
    #[error("resource error: {message}")]
    Resource {
        /// Description of the resource failure.
        message: String,
    },
}

/// Result type alias for Jampack operations.
pub type Result<T> = std::result::Result<T, JampackError>;

impl JampackError {
    /// Create a bad-magic error.
    pub fn bad_magic(expected: [u8; 3], found: [u8; 3]) -> Self {
        Self::BadMagic { expected, found }
    }

    /// Create a corrupt-header error.
    pub fn corrupt_header(message: impl Into<String>) -> Self {
        Self::CorruptHeader {
            message: message.into(),
        }
    }

    /// Create a checksum-mismatch error.
    pub fn checksum_mismatch(expected: u32, computed: u32) -> Self {
        Self::ChecksumMismatch { expected, computed }
    }

    /// Create an invariant-violation error.
    pub fn invariant(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Invariant {
            stage,
            message: message.into(),
        }
    }

    /// Create a buffer-underrun error.
    pub fn buffer_underrun(stage: &'static str, wanted: usize, available: usize) -> Self {
        Self::BufferUnderrun {
            stage,
            wanted,
            available,
        }
    }

    /// Create a resource error.
    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JampackError::bad_magic(*b"JAM", [0x1f, 0x8b, 0x00]);
        assert!(err.to_string().contains("bad block magic"));

        let err = JampackError::checksum_mismatch(0x1234_5678, 0xdead_beef);
        assert!(err.to_string().contains("checksum mismatch"));

        let err = JampackError::invariant("rans", "CDF sum != PROB_SCALE");
        assert!(err.to_string().contains("rans"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "short read");
        let err: JampackError = io_err.into();
        assert!(matches!(err, JampackError::Io(_)));
    }
}
