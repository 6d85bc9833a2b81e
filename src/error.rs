//! Error types for gocart
//!
//! All modules use `CartResult<T>` as their return type.

use thiserror::Error;

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

/// All errors that can occur in gocart
#[derive(Error, Debug)]
pub enum CartError {
    // Usage errors
    #[error("cart store is closed: handles must be used within the lifetime of their CartStore")]
    StoreClosed,

    // Storage errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CartError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if this is the usage error raised for out-of-scope access
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::StoreClosed)
    }
}
