//! Error types for the Tokenflow library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`TokenflowError`] enum.
//!
//! # Examples
//!
//! ```
//! use tokenflow::error::{Result, TokenflowError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(TokenflowError::analysis("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

use crate::analysis::attribute::AttributeKind;
use crate::analysis::stream::StreamState;

/// The main error type for Tokenflow operations.
#[derive(Error, Debug)]
pub enum TokenflowError {
    /// An attribute was requested from a stream that never registered it.
    #[error("Attribute not present: {0}")]
    AttributeNotPresent(AttributeKind),

    /// A lifecycle method was called out of order.
    #[error("Invalid stream state: cannot {operation} while {state}")]
    InvalidStreamState {
        operation: &'static str,
        state: StreamState,
    },

    /// Releasing a resource during close failed.
    #[error("Resource release error: {0}")]
    ResourceRelease(String),

    /// Analysis-related errors (tokenization, filtering, dictionaries, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with TokenflowError.
pub type Result<T> = std::result::Result<T, TokenflowError>;

impl TokenflowError {
    /// Create a new attribute-not-present error.
    pub fn attribute_not_present(kind: AttributeKind) -> Self {
        TokenflowError::AttributeNotPresent(kind)
    }

    /// Create a new invalid stream state error.
    pub fn invalid_state(operation: &'static str, state: StreamState) -> Self {
        TokenflowError::InvalidStreamState { operation, state }
    }

    /// Create a new resource release error.
    pub fn resource_release<S: Into<String>>(msg: S) -> Self {
        TokenflowError::ResourceRelease(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TokenflowError::Analysis(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        TokenflowError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TokenflowError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TokenflowError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error is a lifecycle violation.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, TokenflowError::InvalidStreamState { .. })
    }
}
