//! Controller contract and registry.
//!
//! Every mounted buddy view implements [`BuddyController`] over whatever
//! animation primitives it has and registers it with the coordinator. The
//! registry only holds [`Weak`] references: views own their controllers, and a
//! controller dropped without unregistering is pruned on the next fan-out.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::error::ControllerResult;
use crate::Mood;

// ============================================================================
// ControllerId
// ============================================================================

/// Unique identifier of a registered controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(String);

impl ControllerId {
    /// Creates an id from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ControllerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ControllerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// BuddyController
// ============================================================================

/// Capabilities a buddy view exposes to the coordinator.
///
/// Callbacks take `&self` and may be invoked from any task; implementations
/// keep their animation state behind interior mutability. Returning an error
/// only affects this controller: the coordinator logs it and moves on.
pub trait BuddyController: Send + Sync {
    /// Identifier the controller is registered under.
    fn id(&self) -> &ControllerId;

    /// Shows the given mood.
    fn apply_mood(&self, mood: Mood) -> ControllerResult;

    /// Shows overall progress, already clamped to `[0, 100]`.
    fn apply_progress(&self, progress: f64) -> ControllerResult;

    /// Shows the current streak.
    fn apply_streak(&self, streak: u32) -> ControllerResult;

    /// Plays the celebration burst.
    fn fire_celebrate(&self) -> ControllerResult;

    /// Starts or stops the thinking animation.
    fn fire_thinking(&self, start: bool) -> ControllerResult;
}

// ============================================================================
// ControllerRegistry
// ============================================================================

/// Unordered map of registered controllers, keyed by id.
#[derive(Default)]
pub struct ControllerRegistry {
    entries: HashMap<ControllerId, Weak<dyn BuddyController>>,
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("ids", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ControllerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller under its own id.
    ///
    /// Returns `true` if an entry with the same id was replaced.
    pub fn register(&mut self, controller: &Arc<dyn BuddyController>) -> bool {
        self.entries
            .insert(controller.id().clone(), Arc::downgrade(controller))
            .is_some()
    }

    /// Removes a controller. Returns `true` if it was registered.
    pub fn unregister(&mut self, id: &ControllerId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Returns `true` if a controller with this id is registered.
    #[must_use]
    pub fn contains(&self, id: &ControllerId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered entries, including ones whose owner is gone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<ControllerId> {
        self.entries.keys().cloned().collect()
    }

    /// Upgrades every live entry and prunes the ones whose view was dropped.
    pub fn live(&mut self) -> Vec<Arc<dyn BuddyController>> {
        let mut live = Vec::with_capacity(self.entries.len());
        self.entries.retain(|id, weak| {
            weak.upgrade().map_or_else(
                || {
                    tracing::debug!(controller = %id, "Pruning dropped controller");
                    false
                },
                |controller| {
                    live.push(controller);
                    true
                },
            )
        });
        live
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent(ControllerId);

    impl BuddyController for Silent {
        fn id(&self) -> &ControllerId {
            &self.0
        }
        fn apply_mood(&self, _mood: Mood) -> ControllerResult {
            Ok(())
        }
        fn apply_progress(&self, _progress: f64) -> ControllerResult {
            Ok(())
        }
        fn apply_streak(&self, _streak: u32) -> ControllerResult {
            Ok(())
        }
        fn fire_celebrate(&self) -> ControllerResult {
            Ok(())
        }
        fn fire_thinking(&self, _start: bool) -> ControllerResult {
            Ok(())
        }
    }

    fn silent(id: &str) -> Arc<dyn BuddyController> {
        Arc::new(Silent(ControllerId::from(id)))
    }

    #[test]
    fn test_register_and_unregister() {
        let mut registry = ControllerRegistry::new();
        let a = silent("a");
        assert!(!registry.register(&a));
        assert!(registry.contains(&ControllerId::from("a")));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(&ControllerId::from("a")));
        assert!(!registry.unregister(&ControllerId::from("a")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_id_overwrites() {
        let mut registry = ControllerRegistry::new();
        let first = silent("dup");
        let second = silent("dup");
        registry.register(&first);
        assert!(registry.register(&second));
        assert_eq!(registry.len(), 1);

        let live = registry.live();
        assert_eq!(live.len(), 1);
        assert!(Arc::ptr_eq(&live[0], &second));
    }

    #[test]
    fn test_live_prunes_dropped_controllers() {
        let mut registry = ControllerRegistry::new();
        let kept = silent("kept");
        registry.register(&kept);
        {
            let gone = silent("gone");
            registry.register(&gone);
        }
        assert_eq!(registry.len(), 2);

        let live = registry.live();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id().as_str(), "kept");
        assert_eq!(registry.ids(), vec![ControllerId::from("kept")]);
    }

    #[test]
    fn test_registry_does_not_own_controllers() {
        let mut registry = ControllerRegistry::new();
        let controller = silent("weak");
        registry.register(&controller);
        assert_eq!(Arc::strong_count(&controller), 1);
    }
}
