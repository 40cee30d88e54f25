//! Hand-animated fallback used when no animation engine is available.
//!
//! The placeholder shows the mood as an emoji on a colored disc, pulses on
//! taps and winks, bounces on celebrations, and carries progress and streak
//! badges. It never fails.

use std::sync::{Mutex, MutexGuard, PoisonError};

use buddy_coordinator::state::{clamp_progress, progress_percent};
use buddy_coordinator::{BuddyController, ControllerId, ControllerResult, Mood, TriggerCounters};
use serde::Serialize;

/// Emoji shown for a mood.
#[must_use]
pub const fn mood_emoji(mood: Mood) -> &'static str {
    match mood {
        Mood::Idle => "🙂",
        Mood::Happy => "😊",
        Mood::Sad => "😢",
        Mood::Focused => "🧐",
        Mood::Thinking => "🤔",
        Mood::Excited => "🎉",
    }
}

/// Background color shown for a mood.
#[must_use]
pub const fn mood_color(mood: Mood) -> &'static str {
    match mood {
        Mood::Idle => "#E5E7EB",
        Mood::Happy => "#FCD34D",
        Mood::Sad => "#93C5FD",
        Mood::Focused => "#60A5FA",
        Mood::Thinking => "#A78BFA",
        Mood::Excited => "#F472B6",
    }
}

/// What the placeholder currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderFace {
    /// Displayed mood.
    pub mood: Mood,
    /// Progress badge value.
    pub progress: f64,
    /// Streak badge value.
    pub streak: u32,
    /// Whether the thinking animation is running.
    pub thinking: bool,
    /// Pulse animations played (taps, winks).
    pub pulses: u64,
    /// Bounce animations played (celebrations).
    pub bounces: u64,
}

/// New one-shot events found by [`PlaceholderRenderer::observe_triggers`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerEdges {
    /// Taps since the last observation.
    pub taps: u64,
    /// Winks since the last observation.
    pub winks: u64,
}

#[derive(Debug, Default)]
struct PlaceholderState {
    face: PlaceholderFace,
    seen: TriggerCounters,
}

/// Buddy view drawn without an animation engine.
#[derive(Debug)]
pub struct PlaceholderRenderer {
    id: ControllerId,
    state: Mutex<PlaceholderState>,
}

impl PlaceholderRenderer {
    /// Creates a placeholder showing the default face.
    #[must_use]
    pub fn new(id: ControllerId) -> Self {
        Self {
            id,
            state: Mutex::new(PlaceholderState::default()),
        }
    }

    /// Copy of what is currently shown.
    #[must_use]
    pub fn face(&self) -> PlaceholderFace {
        self.lock().face.clone()
    }

    /// Plays a pulse for every tap and wink not seen before.
    ///
    /// Taps and winks are not pushed to controllers; views read them from
    /// the coordinator's trigger counters and compare with what they last saw.
    pub fn observe_triggers(&self, counters: TriggerCounters) -> TriggerEdges {
        let mut state = self.lock();
        let edges = TriggerEdges {
            taps: counters.tap.saturating_sub(state.seen.tap),
            winks: counters.wink.saturating_sub(state.seen.wink),
        };
        state.face.pulses += edges.taps + edges.winks;
        state.seen = counters;
        edges
    }

    /// One-line text rendering of the face and its badges.
    #[must_use]
    pub fn render_line(&self) -> String {
        let face = self.face();
        let thinking = if face.thinking { " ..." } else { "" };
        let percent = progress_percent(face.progress);
        format!(
            "{} {} ({}){thinking} | Progress {percent}% | Streak 🔥 {}",
            mood_emoji(face.mood),
            face.mood,
            mood_color(face.mood),
            face.streak,
        )
    }

    fn lock(&self) -> MutexGuard<'_, PlaceholderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BuddyController for PlaceholderRenderer {
    fn id(&self) -> &ControllerId {
        &self.id
    }

    fn apply_mood(&self, mood: Mood) -> ControllerResult {
        self.lock().face.mood = mood;
        Ok(())
    }

    fn apply_progress(&self, progress: f64) -> ControllerResult {
        self.lock().face.progress = clamp_progress(progress);
        Ok(())
    }

    fn apply_streak(&self, streak: u32) -> ControllerResult {
        self.lock().face.streak = streak;
        Ok(())
    }

    fn fire_celebrate(&self) -> ControllerResult {
        let mut state = self.lock();
        state.face.bounces += 1;
        state.face.mood = Mood::Excited;
        Ok(())
    }

    fn fire_thinking(&self, start: bool) -> ControllerResult {
        let mut state = self.lock();
        state.face.thinking = start;
        if start {
            state.face.mood = Mood::Thinking;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn renderer() -> PlaceholderRenderer {
        PlaceholderRenderer::new(ControllerId::from("placeholder-test"))
    }

    #[test]
    fn test_render_line_default() {
        insta::assert_snapshot!(renderer().render_line(), @"🙂 idle (#E5E7EB) | Progress 0% | Streak 🔥 0");
    }

    #[test]
    fn test_render_line_after_updates() {
        let view = renderer();
        view.apply_mood(Mood::Focused).unwrap();
        view.apply_progress(59.6).unwrap();
        view.apply_streak(3).unwrap();
        view.fire_thinking(true).unwrap();

        insta::assert_snapshot!(view.render_line(), @"🤔 thinking (#A78BFA) ... | Progress 60% | Streak 🔥 3");
    }

    #[test]
    fn test_badge_percent_rounds_like_state() {
        let view = renderer();
        view.apply_progress(66.5).unwrap();
        assert!(view.render_line().contains("Progress 67%"));
        view.apply_progress(0.4).unwrap();
        assert!(view.render_line().contains("Progress 0%"));
    }

    #[test]
    fn test_celebrate_bounces_and_excites() {
        let view = renderer();
        view.fire_celebrate().unwrap();
        view.fire_celebrate().unwrap();

        let face = view.face();
        assert_eq!(face.bounces, 2);
        assert_eq!(face.mood, Mood::Excited);
    }

    #[test]
    fn test_observe_triggers_counts_edges_once() {
        let view = renderer();
        let mut counters = TriggerCounters {
            tap: 2,
            wink: 1,
            ..TriggerCounters::default()
        };

        assert_eq!(view.observe_triggers(counters), TriggerEdges { taps: 2, winks: 1 });
        assert_eq!(view.observe_triggers(counters), TriggerEdges::default());

        counters.tap += 1;
        assert_eq!(view.observe_triggers(counters), TriggerEdges { taps: 1, winks: 0 });
        assert_eq!(view.face().pulses, 4);
    }

    #[test]
    fn test_every_mood_has_emoji_and_color() {
        for mood in Mood::ALL {
            assert!(!mood_emoji(mood).is_empty());
            assert!(mood_color(mood).starts_with('#'));
        }
    }
}
