// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cicerone guide engine.

use thiserror::Error;

/// The primary error type used across all Cicerone collaborator traits and
/// core operations.
///
/// Lookup misses (an empty cache hit, zero retrieval results) are NOT errors:
/// they are expected outcomes handled by falling back to the next stage, and
/// are modelled as empty results rather than variants here.
#[derive(Debug, Error)]
pub enum CiceroneError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Corpus search backend errors (vector store unreachable, query failure).
    #[error("corpus error: {message}")]
    Corpus {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generation provider errors (API failure, rate limit, malformed output).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A session state invariant was violated (e.g. pending topic equals the
    /// current anchor). A programming defect: panics under `debug_assertions`,
    /// self-heals in release builds.
    #[error("session invariant violated: {0}")]
    InvariantViolation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let e = CiceroneError::Corpus {
            message: "vector backend unreachable".into(),
            source: None,
        };
        assert!(e.to_string().contains("vector backend unreachable"));

        let e = CiceroneError::Timeout {
            duration: std::time::Duration::from_millis(2500),
        };
        assert!(e.to_string().contains("timed out"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CiceroneError>();
    }
}
