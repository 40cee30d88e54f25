//! Error types for the buddy coordinator.
//!
//! Coordinator operations themselves never fail: numeric input is clamped and
//! controller failures are isolated at the fan-out site. The errors here cover
//! the fallible edges around it: configuration loading, scenario parsing, and
//! the per-controller failures that renderers report back.

use std::path::PathBuf;

/// A specialized `Result` type for buddy operations.
pub type Result<T> = std::result::Result<T, BuddyError>;

/// Result returned by every [`BuddyController`](crate::BuddyController) callback.
pub type ControllerResult = std::result::Result<(), ControllerError>;

/// Errors that can occur while configuring or driving the buddy.
#[derive(Debug, thiserror::Error)]
pub enum BuddyError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your buddy.json with a JSON linter")]
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
    // Input Errors
    // ========================================================================
    /// A mood name did not match any known mood.
    #[error("Unknown mood '{name}'\n\nSuggestion: Use one of idle, happy, sad, focused, thinking, excited")]
    UnknownMood {
        /// The rejected mood name.
        name: String,
    },

    /// A tab mode name did not match any known mode.
    #[error("Unknown tab mode '{name}'\n\nSuggestion: Use either 'Learning' or 'Practicing'")]
    UnknownTabMode {
        /// The rejected mode name.
        name: String,
    },

    /// A renderer name did not match any known backend.
    #[error("Unknown renderer '{name}'\n\nSuggestion: Use one of native, web, placeholder")]
    UnknownRenderer {
        /// The rejected renderer name.
        name: String,
    },

    /// A scripted scenario could not be parsed.
    #[error("Invalid scenario '{path}': {message}\n\nSuggestion: Each step must be {{\"event\": ..., \"payload\": ...}} or {{\"wait\": <ms>}}")]
    ScenarioParseError {
        /// Path to the scenario file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuddyError {
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

    /// Creates a new `UnknownMood` error.
    #[must_use]
    pub fn unknown_mood(name: impl Into<String>) -> Self {
        Self::UnknownMood { name: name.into() }
    }

    /// Creates a new `UnknownTabMode` error.
    #[must_use]
    pub fn unknown_tab_mode(name: impl Into<String>) -> Self {
        Self::UnknownTabMode { name: name.into() }
    }

    /// Creates a new `UnknownRenderer` error.
    #[must_use]
    pub fn unknown_renderer(name: impl Into<String>) -> Self {
        Self::UnknownRenderer { name: name.into() }
    }

    /// Creates a new `ScenarioParseError`.
    #[must_use]
    pub fn scenario_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ScenarioParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failure reported by a controller callback.
///
/// These never reach callers of the coordinator; they are logged per
/// controller and delivery continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// The animation backend has no input with the expected name.
    #[error("animation input '{input}' is not available")]
    MissingInput {
        /// Name of the missing input.
        input: String,
    },
}

impl ControllerError {
    /// Creates a new `MissingInput` error.
    #[must_use]
    pub fn missing_input(input: impl Into<String>) -> Self {
        Self::MissingInput {
            input: input.into(),
        }
    }
}
