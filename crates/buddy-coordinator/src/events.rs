//! High-level app events.
//!
//! Each event is a fixed recipe of primitive coordinator calls. UI handlers
//! call the `on_*` methods directly; scripted runs build [`AppEvent`] values
//! and hand them to [`BuddyCoordinator::dispatch`].
//!
//! # Event Types
//!
//! - `app_open` - happy, then a delayed celebration
//! - `tab_change` - focused on Learning, happy on Practicing, plus a tap
//! - `grade_select` - focused, progress = grade x 20, plus a tap
//! - `week_open` - focused
//! - `subject_tap` - focused, plus a tap
//! - `add_subject` - excited, plus a celebration
//! - `lesson_start` - focused, plus a tap
//! - `lesson_complete` - excited, streak + 1, progress + 10, celebration
//! - `chat_send` - focused, plus a tap
//! - `chat_thinking_start` - thinking on every view
//! - `chat_reply` - thinking off, then a delayed celebration
//! - `course_enroll` - excited, progress + 15, celebration

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BuddyCoordinator, Mood, TabMode};

/// Progress granted per grade step by `on_grade_select`.
pub const PROGRESS_PER_GRADE: f64 = 20.0;

/// Progress granted by `on_lesson_complete`.
pub const LESSON_PROGRESS: f64 = 10.0;

/// Progress granted by `on_course_enroll`.
pub const ENROLL_PROGRESS: f64 = 15.0;

// ============================================================================
// AppEvent
// ============================================================================

/// A meaningful app occurrence the buddy reacts to.
///
/// Serialized as a JSON object with "event" and "payload" fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum AppEvent {
    /// The app finished mounting.
    AppOpen,
    /// The study-guide tab changed.
    TabChange(TabMode),
    /// A grade was picked.
    GradeSelect(u32),
    /// A study week was opened, by id.
    WeekOpen(String),
    /// A subject card was tapped, by name.
    SubjectTap(String),
    /// A subject was added.
    AddSubject,
    /// A lesson started.
    LessonStart,
    /// A lesson was completed.
    LessonComplete,
    /// A chat message was sent.
    ChatSend,
    /// The assistant started working on a reply.
    ChatThinkingStart,
    /// The assistant's reply arrived.
    ChatReply,
    /// The user enrolled in a course.
    CourseEnroll,
}

impl AppEvent {
    /// Returns the event name as a string.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::AppOpen => "app_open",
            Self::TabChange(_) => "tab_change",
            Self::GradeSelect(_) => "grade_select",
            Self::WeekOpen(_) => "week_open",
            Self::SubjectTap(_) => "subject_tap",
            Self::AddSubject => "add_subject",
            Self::LessonStart => "lesson_start",
            Self::LessonComplete => "lesson_complete",
            Self::ChatSend => "chat_send",
            Self::ChatThinkingStart => "chat_thinking_start",
            Self::ChatReply => "chat_reply",
            Self::CourseEnroll => "course_enroll",
        }
    }
}

// ============================================================================
// Recipes
// ============================================================================

impl BuddyCoordinator {
    /// Applies the recipe for `event`.
    pub fn dispatch(&self, event: &AppEvent) {
        debug!(event = event.event_name(), "Dispatching app event");
        match event {
            AppEvent::AppOpen => self.on_app_open(),
            AppEvent::TabChange(mode) => self.on_tab_change(*mode),
            AppEvent::GradeSelect(grade) => self.on_grade_select(*grade),
            AppEvent::WeekOpen(week_id) => self.on_week_open(week_id),
            AppEvent::SubjectTap(name) => self.on_subject_tap(name),
            AppEvent::AddSubject => self.on_add_subject(),
            AppEvent::LessonStart => self.on_lesson_start(),
            AppEvent::LessonComplete => self.on_lesson_complete(),
            AppEvent::ChatSend => self.on_chat_send(),
            AppEvent::ChatThinkingStart => self.on_chat_thinking_start(),
            AppEvent::ChatReply => self.on_chat_reply(),
            AppEvent::CourseEnroll => self.on_course_enroll(),
        }
    }

    /// Greets the user, then celebrates once the greeting has shown.
    pub fn on_app_open(&self) {
        self.set_mood(Mood::Happy);
        self.schedule_celebrate(self.config().app_open_celebrate_delay(), "app_open");
    }

    /// Reacts to a study-guide tab switch.
    pub fn on_tab_change(&self, mode: TabMode) {
        self.set_mood(mode.mood());
        self.trigger_tap();
    }

    /// Reacts to a grade pick; progress is `grade x 20`, capped at 100.
    pub fn on_grade_select(&self, grade: u32) {
        self.set_mood(Mood::Focused);
        self.set_progress(f64::from(grade) * PROGRESS_PER_GRADE);
        self.trigger_tap();
    }

    /// Reacts to a study week being opened.
    pub fn on_week_open(&self, week_id: &str) {
        debug!(week_id, "Week opened");
        self.set_mood(Mood::Focused);
    }

    /// Reacts to a subject card tap.
    pub fn on_subject_tap(&self, subject_name: &str) {
        debug!(subject_name, "Subject tapped");
        self.set_mood(Mood::Focused);
        self.trigger_tap();
    }

    /// Reacts to a new subject.
    pub fn on_add_subject(&self) {
        self.set_mood(Mood::Excited);
        self.trigger_celebrate();
    }

    /// Reacts to a lesson starting.
    pub fn on_lesson_start(&self) {
        self.set_mood(Mood::Focused);
        self.trigger_tap();
    }

    /// Extends the streak, adds lesson progress and celebrates.
    pub fn on_lesson_complete(&self) {
        let state = self.snapshot();
        self.set_mood(Mood::Excited);
        self.set_streak_count(i64::from(state.streak_count) + 1);
        self.set_progress((state.progress + LESSON_PROGRESS).min(crate::state::MAX_PROGRESS));
        self.trigger_celebrate();
    }

    /// Reacts to the user sending a chat message.
    pub fn on_chat_send(&self) {
        self.set_mood(Mood::Focused);
        self.trigger_tap();
    }

    /// Shows every view thinking while a reply is in flight.
    pub fn on_chat_thinking_start(&self) {
        self.set_mood(Mood::Thinking);
        self.set_is_thinking(true);
        self.trigger_thinking(true);
    }

    /// Ends the thinking animation, then celebrates the reply.
    pub fn on_chat_reply(&self) {
        self.set_mood(Mood::Happy);
        self.set_is_thinking(false);
        self.trigger_thinking(false);
        self.schedule_celebrate(self.config().chat_reply_celebrate_delay(), "chat_reply");
    }

    /// Adds enrollment progress and celebrates.
    pub fn on_course_enroll(&self) {
        let progress = self.progress();
        self.set_mood(Mood::Excited);
        self.set_progress((progress + ENROLL_PROGRESS).min(crate::state::MAX_PROGRESS));
        self.trigger_celebrate();
    }
}

// ============================================================================
// Tests
// ============================================================================
