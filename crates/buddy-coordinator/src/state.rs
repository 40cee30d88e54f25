//! Observable buddy state.
//!
//! [`BuddyState`] is plain data: every write normalizes its input, so no
//! sequence of calls can leave it out of range. The coordinator owns one
//! behind a lock and publishes a copy after each write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Mood;

/// Upper bound for progress.
pub const MAX_PROGRESS: f64 = 100.0;

/// Clamps a progress value to `[0, 100]`. `NaN` becomes 0.
///
/// # Examples
///
/// ```
/// use buddy_coordinator::state::clamp_progress;
///
/// assert_eq!(clamp_progress(-5.0), 0.0);
/// assert_eq!(clamp_progress(42.5), 42.5);
/// assert_eq!(clamp_progress(120.0), 100.0);
/// assert_eq!(clamp_progress(f64::NAN), 0.0);
/// ```
#[must_use]
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_PROGRESS)
    }
}

/// Clamps a streak value to `>= 0`, saturating at `u32::MAX`.
///
/// # Examples
///
/// ```
/// use buddy_coordinator::state::clamp_streak;
///
/// assert_eq!(clamp_streak(-3), 0);
/// assert_eq!(clamp_streak(7), 7);
/// ```
#[must_use]
pub fn clamp_streak(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Progress rounded to a whole percent, as shown on badges.
///
/// # Examples
///
/// ```
/// use buddy_coordinator::state::progress_percent;
///
/// assert_eq!(progress_percent(59.6), 60);
/// assert_eq!(progress_percent(250.0), 100);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_percent(progress: f64) -> u8 {
    // clamped to [0, 100] first
    clamp_progress(progress).round() as u8
}

// ============================================================================
// TriggerCounters
// ============================================================================

/// Counters for one-shot animations. They only grow until the next reset.
///
/// Observers detect a fresh event by comparing against the last value they
/// saw, so two identical triggers in a row still read as two events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCounters {
    /// Celebration bursts fired.
    pub celebrate: u64,
    /// Thinking starts and stops fired.
    pub thinking: u64,
    /// Taps fired.
    pub tap: u64,
    /// Winks fired.
    pub wink: u64,
}

// ============================================================================
// BuddyState
// ============================================================================

/// Complete expressive state of the buddy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuddyState {
    /// Active mood.
    pub mood: Mood,
    /// Overall completion, always within `[0, 100]`.
    pub progress: f64,
    /// Consecutive completions.
    pub streak_count: u32,
    /// Whether an asynchronous answer is in flight.
    pub is_thinking: bool,
    /// One-shot trigger counters.
    pub triggers: TriggerCounters,
    /// When the state was last written.
    pub updated_at: DateTime<Utc>,
}

impl Default for BuddyState {
    fn default() -> Self {
        Self::new()
    }
}

impl BuddyState {
    /// Creates a state holding the documented defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use buddy_coordinator::{BuddyState, Mood};
    ///
    /// let state = BuddyState::new();
    /// assert_eq!(state.mood, Mood::Idle);
    /// assert_eq!(state.progress, 0.0);
    /// assert_eq!(state.streak_count, 0);
    /// assert!(!state.is_thinking);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            mood: Mood::Idle,
            progress: 0.0,
            streak_count: 0,
            is_thinking: false,
            triggers: TriggerCounters::default(),
            updated_at: Utc::now(),
        }
    }

    /// Updates the `updated_at` timestamp to the current time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Restores every field to its default.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Stores a new mood.
    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
        self.touch();
    }

    /// Stores a clamped progress value and returns what was stored.
    pub fn set_progress(&mut self, value: f64) -> f64 {
        self.progress = clamp_progress(value);
        self.touch();
        self.progress
    }

    /// Stores a clamped streak value and returns what was stored.
    pub fn set_streak_count(&mut self, value: i64) -> u32 {
        self.streak_count = clamp_streak(value);
        self.touch();
        self.streak_count
    }

    /// Stores the thinking flag.
    ///
    /// Starting forces the `Thinking` mood. Stopping falls back to `Idle`, but
    /// only when the mood is still `Thinking`; a mood set in between is kept.
    pub fn set_is_thinking(&mut self, thinking: bool) {
        self.is_thinking = thinking;
        if thinking {
            self.mood = Mood::Thinking;
        } else if self.mood == Mood::Thinking {
            self.mood = Mood::Idle;
        }
        self.touch();
    }

    /// Records a celebration: bumps the counter and switches to `Excited`.
    pub fn record_celebrate(&mut self) -> u64 {
        self.triggers.celebrate += 1;
        self.mood = Mood::Excited;
        self.touch();
        self.triggers.celebrate
    }

    /// Records a thinking start or stop.
    ///
    /// Unlike [`set_is_thinking`](Self::set_is_thinking), stopping always
    /// lands on `Idle`.
    pub fn record_thinking(&mut self, start: bool) -> u64 {
        self.triggers.thinking += 1;
        self.is_thinking = start;
        self.mood = if start { Mood::Thinking } else { Mood::Idle };
        self.touch();
        self.triggers.thinking
    }

    /// Records a tap.
    pub fn record_tap(&mut self) -> u64 {
        self.triggers.tap += 1;
        self.touch();
        self.triggers.tap
    }

    /// Records a wink.
    pub fn record_wink(&mut self) -> u64 {
        self.triggers.wink += 1;
        self.touch();
        self.triggers.wink
    }
}

// ============================================================================
// Tests
// ============================================================================
