//! Controller driving the native state-machine animation engine.
//!
//! The buddy asset exposes a single numeric `mood` input, numeric `progress`
//! and `streakCount` inputs, a `celebrate` trigger and a `thinking` trigger.

use std::sync::{Mutex, MutexGuard, PoisonError};

use buddy_coordinator::{BuddyController, ControllerId, ControllerResult, Mood};

use crate::inputs::InputSet;

/// Name of the state machine inside the buddy asset.
pub const STATE_MACHINE: &str = "BuddyMachine";

/// Numeric value of each mood on the `mood` input.
#[must_use]
pub const fn mood_value(mood: Mood) -> f64 {
    match mood {
        Mood::Idle => 0.0,
        Mood::Happy => 1.0,
        Mood::Sad => 2.0,
        Mood::Focused => 3.0,
        Mood::Thinking => 4.0,
        Mood::Excited => 5.0,
    }
}

/// Inputs the buddy asset declares.
#[must_use]
pub fn buddy_inputs() -> InputSet {
    InputSet::new()
        .number("mood")
        .number("progress")
        .number("streakCount")
        .trigger("celebrate")
        .trigger("thinking")
}

/// Buddy view rendered by the native animation engine.
#[derive(Debug)]
pub struct NativeRenderer {
    id: ControllerId,
    inputs: Mutex<InputSet>,
}

impl NativeRenderer {
    /// Creates a renderer over the standard buddy asset.
    #[must_use]
    pub fn new(id: ControllerId) -> Self {
        Self::with_inputs(id, buddy_inputs())
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

    /// One-line description of the engine inputs.
    #[must_use]
    pub fn describe(&self) -> String {
        let inputs = self.lock();
        let values: Vec<String> = inputs
            .iter()
            .map(|(name, input)| format!("{name}={}", crate::format_input(input)))
            .collect();
        format!("[native {STATE_MACHINE}] {}", values.join(" "))
    }

    fn lock(&self) -> MutexGuard<'_, InputSet> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BuddyController for NativeRenderer {
    fn id(&self) -> &ControllerId {
        &self.id
    }

    fn apply_mood(&self, mood: Mood) -> ControllerResult {
        self.lock().set_number("mood", mood_value(mood))
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
