//! Error types for icosphere generation and displacement

use thiserror::Error;

/// Errors that can occur while building, displacing or uploading a sphere mesh
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IcosphereError {
    /// Configuration validation failed (non-positive scale, excessive depth, ...)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A displacement generator returned an offset array of the wrong length
    #[error("generator `{generator}` returned {actual} offsets for {expected} vertices")]
    ContractViolation {
        /// Name reported by the offending generator
        generator: String,
        /// Number of vertices the generator was given
        expected: usize,
        /// Number of offsets it returned
        actual: usize,
    },

    /// A zero-length or non-finite vector reached a step that needs a direction
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

/// Result type alias for icosphere operations
pub type Result<T> = std::result::Result<T, IcosphereError>;
