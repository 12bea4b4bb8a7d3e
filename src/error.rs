//! Error types for voltwire
//!
//! Failures fall into disjoint classes: stream faults, usage faults
//! (values with no wire representation), authentication rejection, and
//! malformed input seen while decoding.

use thiserror::Error;

use crate::protocol::TypeTag;

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for voltwire operations
#[derive(Debug, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("Unsupported parameter type: {0}")]
    UnsupportedType(String),

    #[error("No null representation for type {0}")]
    NoNullSentinel(TypeTag),

    #[error("Value is reserved as the {0} null sentinel")]
    ReservedValue(TypeTag),

    #[error("{what} too large: {len} (max {max})")]
    ValueTooLarge {
        what: &'static str,
        len: usize,
        max: usize,
    },

    // -------------------------------------------------------------------------
    // Authentication Errors
    // -------------------------------------------------------------------------
    #[error("Authentication failed (status 0x{status:02x})")]
    AuthenticationFailed { status: u8 },

    #[error("Invalid handshake state: {0}")]
    InvalidState(String),

    // -------------------------------------------------------------------------
    // Decoding Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WireError {
    /// True for caller mistakes that must abort the in-flight request.
    pub fn is_usage_fault(&self) -> bool {
        matches!(
            self,
            WireError::UnsupportedType(_)
                | WireError::NoNullSentinel(_)
                | WireError::ReservedValue(_)
                | WireError::ValueTooLarge { .. }
                | WireError::InvalidState(_)
        )
    }

    /// Only stream faults are worth retrying, and never from this layer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WireError::Io(_))
    }
}
