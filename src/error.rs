//! Error types for tola-math.
//!
//! Annotation itself never fails: missing renderers and malformed math nodes
//! are skipped. These errors only come from the fallible edges (config
//! validation, host ready-state parsing, renderer option building).

use thiserror::Error;

/// Errors that can occur at the edges of math annotation.
#[derive(Debug, Error)]
pub enum MathError {
    /// Marker class is empty or contains whitespace
    #[error("invalid marker class {0:?}: must be a single non-empty class name")]
    InvalidMarkerClass(String),

    /// Host reported a `readyState` value that is not part of the DOM standard
    #[error("unknown document ready state: {0:?}")]
    UnknownReadyState(String),

    /// Renderer backend failed (option building, engine startup, TeX errors)
    #[error("renderer error: {0}")]
    Renderer(String),
}

/// Result type alias for tola-math operations.
pub type MathResult<T> = Result<T, MathError>;

impl MathError {
    /// Create a renderer error from any error type.
    pub fn renderer(err: impl std::fmt::Display) -> Self {
        Self::Renderer(err.to_string())
    }
}
