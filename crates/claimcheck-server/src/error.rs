//! Error types for the claimcheck server.
//!
//! One taxonomy for everything a request can die of: bad client input,
//! missing generation configuration, a failed external generation call,
//! and unknown quiz lookups. Every error is terminal for the request
//! that triggered it; nothing is retried internally.

use std::path::PathBuf;

use claimcheck_generation::GenerationError;

/// A specialized `Result` type for claimcheck server operations.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors that can occur while creating, fetching, or verifying quizzes.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    // ========================================================================
    // Client Errors
    // ========================================================================
    /// Malformed or missing client input (empty feature list, blank
    /// quiz id). Never retried; surfaced as a 400.
    #[error("{message}")]
    Validation {
        /// Description of what was wrong with the input.
        message: String,
    },

    /// Lookup of an unknown or expired quiz id. Surfaced as a 404,
    /// distinct from validation errors.
    #[error("quiz not found: '{quiz_id}'")]
    NotFound {
        /// The id that failed to resolve.
        quiz_id: String,
    },

    // ========================================================================
    // Generation Errors
    // ========================================================================
    /// External generation was selected but no credential is configured.
    /// Prevents the remote call entirely so operators can tell "not
    /// configured" from "provider down".
    #[error("external generation is not configured: {message}\n\nSuggestion: set GENERATION_API_KEY, or set USE_MOCK_AI=true to use local synthesis")]
    Configuration {
        /// Description of the missing configuration.
        message: String,
    },

    /// The external generation call failed or returned unusable output.
    /// Local synthesis is never silently substituted; no partial quiz is
    /// stored.
    #[error("quiz generation failed: {0}")]
    Generation(GenerationError),

    // ========================================================================
    // Configuration File Errors
    // ========================================================================
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your claimcheck.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GenerationError> for QuizError {
    fn from(err: GenerationError) -> Self {
        match err {
            // A missing credential is an operator problem, not a
            // provider problem.
            GenerationError::MissingCredential => {
                Self::configuration("no generation credential is configured")
            }
            other => Self::Generation(other),
        }
    }
}

impl QuizError {
    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error for the given quiz id.
    #[must_use]
    pub fn not_found(quiz_id: impl Into<String>) -> Self {
        Self::NotFound {
            quiz_id: quiz_id.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Returns `true` if this error is the caller's fault (4xx-equivalent).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }
}
