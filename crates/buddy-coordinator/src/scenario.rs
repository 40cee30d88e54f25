//! Scripted sequences of app events.
//!
//! A scenario is a JSON array whose steps are either an [`AppEvent`] object
//! or a pause:
//!
//! ```json
//! [
//!   {"event": "app_open"},
//!   {"wait": 500},
//!   {"event": "grade_select", "payload": 3},
//!   {"event": "lesson_complete"}
//! ]
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BuddyError, Result};
use crate::{AppEvent, BuddyCoordinator, TabMode};

/// One step of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioStep {
    /// Pause for the given number of milliseconds.
    Wait {
        /// Milliseconds to wait.
        wait: u64,
    },
    /// Dispatch an app event.
    Event(AppEvent),
}

/// An ordered list of steps replayed against a coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario {
    /// Steps in execution order.
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Parses a scenario from JSON text.
    pub fn from_json(path: impl AsRef<Path>, json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| BuddyError::scenario_parse(path.as_ref(), e.to_string()))
    }

    /// Loads a scenario from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(path, &contents)
    }

    /// A short session touching every screen after the app has opened: pick
    /// a grade, take a lesson, chat with the assistant, enroll in a course.
    #[must_use]
    pub fn demo() -> Self {
        use AppEvent as E;
        use ScenarioStep::{Event, Wait};

        Self {
            steps: vec![
                Event(E::TabChange(TabMode::Learning)),
                Event(E::GradeSelect(2)),
                Event(E::WeekOpen("week-1".to_string())),
                Event(E::SubjectTap("Geography".to_string())),
                Event(E::LessonStart),
                Event(E::LessonComplete),
                Event(E::ChatSend),
                Event(E::ChatThinkingStart),
                Wait { wait: 1500 },
                Event(E::ChatReply),
                Wait { wait: 300 },
                Event(E::CourseEnroll),
            ],
        }
    }

    /// Number of event steps.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, ScenarioStep::Event(_)))
            .count()
    }

    /// Replays every step in order, awaiting the pauses.
    pub async fn run(&self, coordinator: &BuddyCoordinator) {
        for step in &self.steps {
            match step {
                ScenarioStep::Wait { wait } => {
                    tokio::time::sleep(Duration::from_millis(*wait)).await;
                }
                ScenarioStep::Event(event) => coordinator.dispatch(event),
            }
        }
    }
}
