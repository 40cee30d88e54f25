//! Statically declared state-machine inputs.
//!
//! Animation engines expose named inputs of three kinds. A renderer declares
//! the inputs its asset provides up front; writing to an input that was not
//! declared, or declared with another kind, is a [`ControllerError`].

use std::collections::BTreeMap;

use buddy_coordinator::{ControllerError, ControllerResult};
use serde::{Deserialize, Serialize};

/// Value held by one state-machine input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Input {
    /// Numeric input.
    Number(f64),
    /// Boolean input.
    Boolean(bool),
    /// Trigger input; the value counts how often it was fired.
    Trigger(u64),
}

/// Inputs of one state machine, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSet {
    inputs: BTreeMap<String, Input>,
}

impl InputSet {
    /// Creates an empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a numeric input starting at 0.
    #[must_use]
    pub fn number(mut self, name: &str) -> Self {
        self.inputs.insert(name.to_string(), Input::Number(0.0));
        self
    }

    /// Declares a boolean input starting at `false`.
    #[must_use]
    pub fn boolean(mut self, name: &str) -> Self {
        self.inputs.insert(name.to_string(), Input::Boolean(false));
        self
    }

    /// Declares a trigger input.
    #[must_use]
    pub fn trigger(mut self, name: &str) -> Self {
        self.inputs.insert(name.to_string(), Input::Trigger(0));
        self
    }

    /// Removes a declared input, as an asset missing it would.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.inputs.remove(name);
        self
    }

    /// Current value of an input.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Input> {
        self.inputs.get(name).copied()
    }

    /// Returns `true` if an input with this name is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    /// Sets a numeric input.
    pub fn set_number(&mut self, name: &str, value: f64) -> ControllerResult {
        match self.inputs.get_mut(name) {
            Some(Input::Number(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(ControllerError::missing_input(name)),
        }
    }

    /// Sets a boolean input.
    pub fn set_boolean(&mut self, name: &str, value: bool) -> ControllerResult {
        match self.inputs.get_mut(name) {
            Some(Input::Boolean(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(ControllerError::missing_input(name)),
        }
    }

    /// Fires a trigger input. A boolean input is switched on instead.
    pub fn fire(&mut self, name: &str) -> ControllerResult {
        match self.inputs.get_mut(name) {
            Some(Input::Trigger(count)) => {
                *count += 1;
                Ok(())
            }
            Some(Input::Boolean(slot)) => {
                *slot = true;
                Ok(())
            }
            _ => Err(ControllerError::missing_input(name)),
        }
    }

    /// Drives an on/off animation that may be a boolean or a trigger.
    ///
    /// Booleans follow `on`; triggers fire on every change.
    pub fn toggle(&mut self, name: &str, on: bool) -> ControllerResult {
        match self.inputs.get_mut(name) {
            Some(Input::Boolean(slot)) => {
                *slot = on;
                Ok(())
            }
            Some(Input::Trigger(count)) => {
                *count += 1;
                Ok(())
            }
            _ => Err(ControllerError::missing_input(name)),
        }
    }

    /// Iterates over inputs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Input)> {
        self.inputs.iter().map(|(name, input)| (name.as_str(), *input))
    }
}
