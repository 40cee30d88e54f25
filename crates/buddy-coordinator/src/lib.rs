//! Buddy Coordinator
//!
//! Keeps every animated buddy view in sync: one observable mood / progress /
//! streak state, a registry of per-view animation controllers, and the app
//! events that translate user actions into mood changes and one-shot
//! animations.

pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod mood;
pub mod scenario;
pub mod state;

pub use config::{BuddyConfig, RendererKind};
pub use controller::{BuddyController, ControllerId, ControllerRegistry};
pub use coordinator::{BuddyCoordinator, ControllerRegistration};
pub use error::{BuddyError, ControllerError, ControllerResult, Result};
pub use events::AppEvent;
pub use mood::{Mood, TabMode};
pub use scenario::{Scenario, ScenarioStep};
pub use state::{BuddyState, TriggerCounters};
