//! Error types for the cellframe protocol.
//!
//! These are the hard failures: no index is produced. Truncated data and
//! malformed sub-frame lengths are expected on a lossy link and are reported
//! as [`ParseCondition`](crate::ParseCondition) values on a partial index
//! instead.

use thiserror::Error;

/// Protocol-level errors raised while parsing, encoding or converting frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    // Structural errors (parse aborted)
    /// Buffer is shorter than the frame header
    #[error("frame header truncated: expected at least {expected} bytes, got {actual}")]
    TruncatedHeader {
        /// Header size in bytes
        expected: usize,
        /// Actual buffer length
        actual: usize,
    },

    /// Frame declares more sub-frames than the index can hold
    #[error("sub-frame count {count} exceeds maximum {max}")]
    SubFrameCountOverflow {
        /// Declared (or requested) sub-frame count
        count: usize,
        /// Static capacity
        max: usize,
    },

    /// Sub-frame declares more data cells than the index can hold
    #[error("sub-frame {sub_frame} declares {count} data cells, maximum is {max}")]
    CellCountOverflow {
        /// Position of the offending sub-frame within the frame
        sub_frame: usize,
        /// Declared (or requested) cell count
        count: usize,
        /// Static capacity
        max: usize,
    },

    // Encoding and conversion errors
    /// Status bits hold a value with no known meaning
    #[error("unknown sub-frame status: {0}")]
    UnknownStatus(u8),

    /// Value does not fit into its bit-packed wire field
    #[error("{field} value {value} does not fit in {bits} bits")]
    FieldOverflow {
        /// Name of the wire field
        field: &'static str,
        /// Offending value
        value: usize,
        /// Width of the field in bits
        bits: u32,
    },

    // CBOR errors (wrapped for testability)
    /// Failed to encode data as CBOR
    #[error("failed to encode CBOR: {0}")]
    CborEncode(String),

    /// Failed to decode CBOR data
    #[error("failed to decode CBOR: {0}")]
    CborDecode(String),
}

/// Convenient Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
