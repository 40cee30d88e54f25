//! Configuration for the buddy coordinator.
//!
//! Holds the celebration delays used by the high-level events, the auto-open
//! behavior of the composition root, and an optional renderer override.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BuddyError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "buddy.json";

/// Default delay between `on_app_open`'s mood change and its celebration.
const fn default_app_open_celebrate_delay_ms() -> u64 {
    400
}

/// Default delay between `on_chat_reply`'s mood change and its celebration.
const fn default_chat_reply_celebrate_delay_ms() -> u64 {
    150
}

/// Default delay before the app fires `on_app_open` at startup.
const fn default_auto_open_delay_ms() -> u64 {
    300
}

/// Default value for boolean options that default to true.
const fn default_true() -> bool {
    true
}

/// Main configuration for the buddy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuddyConfig {
    /// Milliseconds between the app-open mood change and the celebration.
    #[serde(default = "default_app_open_celebrate_delay_ms")]
    pub app_open_celebrate_delay_ms: u64,

    /// Milliseconds between the chat-reply mood change and the celebration.
    #[serde(default = "default_chat_reply_celebrate_delay_ms")]
    pub chat_reply_celebrate_delay_ms: u64,

    /// Whether the app fires `on_app_open` by itself once mounted.
    #[serde(default = "default_true")]
    pub auto_open_animation: bool,

    /// Milliseconds the app waits before firing `on_app_open`.
    #[serde(default = "default_auto_open_delay_ms")]
    pub auto_open_delay_ms: u64,

    /// Renderer override; `None` picks one from the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<RendererKind>,
}

impl Default for BuddyConfig {
    fn default() -> Self {
        Self {
            app_open_celebrate_delay_ms: default_app_open_celebrate_delay_ms(),
            chat_reply_celebrate_delay_ms: default_chat_reply_celebrate_delay_ms(),
            auto_open_animation: default_true(),
            auto_open_delay_ms: default_auto_open_delay_ms(),
            renderer: None,
        }
    }
}

impl BuddyConfig {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `buddy.json` in the current directory. If not found, returns
    /// the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            BuddyError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `buddy.json` inside a specific directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `BuddyError::ConfigParseError` if the file cannot be read or
    /// contains invalid JSON, and `BuddyError::ConfigValidationError` if the
    /// values are out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(BuddyError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| BuddyError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// Both celebration delays must be nonzero so the burst never overlaps
    /// the mood change that precedes it.
    pub fn validate(&self) -> Result<()> {
        if self.app_open_celebrate_delay_ms == 0 {
            return Err(BuddyError::config_validation(
                "appOpenCelebrateDelayMs must be greater than 0",
                "Set appOpenCelebrateDelayMs to at least 1 in your buddy.json",
            ));
        }

        if self.chat_reply_celebrate_delay_ms == 0 {
            return Err(BuddyError::config_validation(
                "chatReplyCelebrateDelayMs must be greater than 0",
                "Set chatReplyCelebrateDelayMs to at least 1 in your buddy.json",
            ));
        }

        Ok(())
    }

    /// Delay before the app-open celebration.
    #[must_use]
    pub const fn app_open_celebrate_delay(&self) -> Duration {
        Duration::from_millis(self.app_open_celebrate_delay_ms)
    }

    /// Delay before the chat-reply celebration.
    #[must_use]
    pub const fn chat_reply_celebrate_delay(&self) -> Duration {
        Duration::from_millis(self.chat_reply_celebrate_delay_ms)
    }

    /// Delay before the app fires `on_app_open` at startup.
    #[must_use]
    pub const fn auto_open_delay(&self) -> Duration {
        Duration::from_millis(self.auto_open_delay_ms)
    }
}

// ============================================================================
// RendererKind
// ============================================================================

/// Animation backend a buddy view renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    /// Native state-machine animation engine.
    Native,
    /// Browser canvas animation engine.
    Web,
    /// Hand-animated fallback with no engine.
    Placeholder,
}

impl RendererKind {
    /// Returns the lowercase name of this renderer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Web => "web",
            Self::Placeholder => "placeholder",
        }
    }

    /// Parses a string into a `RendererKind`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "native" => Some(Self::Native),
            "web" => Some(Self::Web),
            "placeholder" => Some(Self::Placeholder),
            _ => None,
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RendererKind {
    type Err = BuddyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s).ok_or_else(|| BuddyError::unknown_renderer(s))
    }
}

impl<'de> Deserialize<'de> for RendererKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid renderer '{s}': expected one of 'native', 'web', 'placeholder'"
            ))
        })
    }
}

impl Serialize for RendererKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
