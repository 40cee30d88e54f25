//! Controller driving the browser canvas animation engine.
//!
//! The web build of the asset has no numeric mood input. Moods are shown with
//! one boolean per expressive mood, at most one of which is on at a time.

use std::sync::{Mutex, MutexGuard, PoisonError};

use buddy_coordinator::{BuddyController, ControllerId, ControllerResult, Mood};

use crate::inputs::InputSet;

/// Boolean input that shows a mood, if the web asset has one for it.
#[must_use]
pub const fn mood_flag(mood: Mood) -> Option<&'static str> {
    match mood {
        Mood::Happy => Some("isHappy"),
        Mood::Sad => Some("isSad"),
        Mood::Focused => Some("isFocused"),
        Mood::Thinking => Some("isThinking"),
        Mood::Idle | Mood::Excited => None,
    }
}

const MOOD_FLAGS: [&str; 4] = ["isHappy", "isSad", "isFocused", "isThinking"];

/// Inputs the web build of the buddy asset declares.
#[must_use]
pub fn web_inputs() -> InputSet {
    MOOD_FLAGS
        .iter()
        .fold(InputSet::new(), |inputs, flag| inputs.boolean(flag))
        .number("progress")
        .number("streakCount")
        .trigger("celebrate")
        .boolean("thinking")
}

/// Buddy view rendered on a web canvas.
#[derive(Debug)]
pub struct WebRenderer {
    id: ControllerId,
    inputs: Mutex<InputSet>,
}

impl WebRenderer {
    /// Creates a renderer over the web buddy asset.
    #[must_use]
    pub fn new(id: ControllerId) -> Self {
        Self::with_inputs(id, web_inputs())
    }

    /// Creates a renderer over an asset declaring the given inputs.
    #[must_use]
    pub fn with_inputs(id: ControllerId, inputs: InputSet) -> Self {
        Self {
            id,
            inputs: Mutex::new(inputs),
        }
    }

    /// Copy of the current input values.
    #[must_use]
    pub fn inputs(&self) -> InputSet {
        self.lock().clone()
    }

    /// One-line description of the canvas inputs.
    #[must_use]
    pub fn describe(&self) -> String {
        let inputs = self.lock();
        let values: Vec<String> = inputs
            .iter()
            .map(|(name, input)| format!("{name}={}", crate::format_input(input)))
            .collect();
        format!("[web] {}", values.join(" "))
    }

    fn lock(&self) -> MutexGuard<'_, InputSet> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BuddyController for WebRenderer {
    fn id(&self) -> &ControllerId {
        &self.id
    }

    fn apply_mood(&self, mood: Mood) -> ControllerResult {
        let active = mood_flag(mood);
        let mut inputs = self.lock();
        for flag in MOOD_FLAGS {
            inputs.set_boolean(flag, Some(flag) == active)?;
        }
        Ok(())
    }

    fn apply_progress(&self, progress: f64) -> ControllerResult {
        self.lock()
            .set_number("progress", buddy_coordinator::state::clamp_progress(progress))
    }

    fn apply_streak(&self, streak: u32) -> ControllerResult {
        self.lock().set_number("streakCount", f64::from(streak))
    }

    fn fire_celebrate(&self) -> ControllerResult {
        self.lock().fire("celebrate")
    }

    fn fire_thinking(&self, start: bool) -> ControllerResult {
        self.lock().toggle("thinking", start)
    }
}
