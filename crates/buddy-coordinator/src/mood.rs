//! Mood and tab-mode vocabulary shared by the coordinator and renderers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BuddyError;

// ============================================================================
// Mood
// ============================================================================

/// The single expressive state driving every buddy view's appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mood {
    /// Resting state (default).
    #[default]
    Idle,
    /// Cheerful, used on app open and after replies.
    Happy,
    /// Downcast.
    Sad,
    /// Concentrating on a lesson or input.
    Focused,
    /// Waiting on an asynchronous answer.
    Thinking,
    /// Celebrating an achievement.
    Excited,
}

impl Mood {
    /// Every mood, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Idle,
        Self::Happy,
        Self::Sad,
        Self::Focused,
        Self::Thinking,
        Self::Excited,
    ];

    /// Returns the lowercase name of this mood.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Focused => "focused",
            Self::Thinking => "thinking",
            Self::Excited => "excited",
        }
    }

    /// Parses a string into a `Mood`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|mood| mood.as_str() == lower)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = BuddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s).ok_or_else(|| BuddyError::unknown_mood(s))
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid mood '{s}': expected one of 'idle', 'happy', 'sad', 'focused', 'thinking', 'excited'"
            ))
        })
    }
}

impl Serialize for Mood {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// TabMode
// ============================================================================

/// Study-guide tab selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TabMode {
    /// Lessons tab.
    #[default]
    Learning,
    /// Exercises tab.
    Practicing,
}

impl TabMode {
    /// Returns the display name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Learning => "Learning",
            Self::Practicing => "Practicing",
        }
    }

    /// Mood the buddy takes on when this tab is opened.
    #[must_use]
    pub const fn mood(self) -> Mood {
        match self {
            Self::Learning => Mood::Focused,
            Self::Practicing => Mood::Happy,
        }
    }

    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "learning" => Some(Self::Learning),
            "practicing" => Some(Self::Practicing),
            _ => None,
        }
    }
}

impl fmt::Display for TabMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabMode {
    type Err = BuddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s).ok_or_else(|| BuddyError::unknown_tab_mode(s))
    }
}

impl<'de> Deserialize<'de> for TabMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid tab mode '{s}': expected 'Learning' or 'Practicing'"
            ))
        })
    }
}

impl Serialize for TabMode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
