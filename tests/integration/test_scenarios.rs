//! End-to-end tests for app events driving mounted buddy views.
//!
//! Every test composes a coordinator with real renderers and checks what the
//! views end up showing, not just the coordinator's own state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use buddy_coordinator::{
    AppEvent, BuddyConfig, BuddyController, BuddyCoordinator, ControllerError, ControllerId,
    ControllerResult, Mood, RendererKind, Scenario, TabMode,
};
use buddy_render::inputs::Input;
use buddy_render::native::buddy_inputs;
use buddy_render::{BuddySize, BuddyView, NativeRenderer, Renderer};

/// Appends every callback to a log shared by several controllers.
struct SharedLog {
    id: ControllerId,
    log: Arc<Mutex<Vec<String>>>,
}

impl SharedLog {
    fn new(id: &str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            id: ControllerId::from(id),
            log: Arc::clone(log),
        })
    }

    fn push(&self, call: &str) -> ControllerResult {
        self.log
            .lock()
            .expect("log lock poisoned")
            .push(format!("{}:{call}", self.id));
        Ok(())
    }
}

impl BuddyController for SharedLog {
    fn id(&self) -> &ControllerId {
        &self.id
    }
    fn apply_mood(&self, mood: Mood) -> ControllerResult {
        self.push(&format!("mood={mood}"))
    }
    fn apply_progress(&self, progress: f64) -> ControllerResult {
        self.push(&format!("progress={progress}"))
    }
    fn apply_streak(&self, streak: u32) -> ControllerResult {
        self.push(&format!("streak={streak}"))
    }
    fn fire_celebrate(&self) -> ControllerResult {
        self.push("celebrate")
    }
    fn fire_thinking(&self, start: bool) -> ControllerResult {
        self.push(&format!("thinking={start}"))
    }
}

/// A controller whose asset declares none of the expected inputs.
struct Broken(ControllerId);

impl BuddyController for Broken {
    fn id(&self) -> &ControllerId {
        &self.0
    }
    fn apply_mood(&self, _: Mood) -> ControllerResult {
        Err(ControllerError::missing_input("mood"))
    }
    fn apply_progress(&self, _: f64) -> ControllerResult {
        Err(ControllerError::missing_input("progress"))
    }
    fn apply_streak(&self, _: u32) -> ControllerResult {
        Err(ControllerError::missing_input("streakCount"))
    }
    fn fire_celebrate(&self) -> ControllerResult {
        Err(ControllerError::missing_input("celebrate"))
    }
    fn fire_thinking(&self, _: bool) -> ControllerResult {
        Err(ControllerError::missing_input("thinking"))
    }
}

fn native_view(buddy: &BuddyCoordinator) -> (Arc<NativeRenderer>, BuddyView) {
    let native = Arc::new(NativeRenderer::new(ControllerId::from("native-view")));
    let view = BuddyView::mount_renderer(
        Renderer::Native(Arc::clone(&native)),
        BuddySize::Hero,
        buddy,
    );
    (native, view)
}

/// Tests that a chat round trip reaches every view in order.
#[tokio::test(start_paused = true)]
async fn test_chat_round_trip_order_on_two_views() {
    let buddy = BuddyCoordinator::default();
    let log = Arc::new(Mutex::new(Vec::new()));
    let first = SharedLog::new("a", &log);
    let second = SharedLog::new("b", &log);
    buddy.register_controller(first.clone());
    buddy.register_controller(second.clone());

    buddy.on_chat_thinking_start();
    buddy.on_chat_reply();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let calls = log.lock().expect("log lock poisoned").clone();
    for id in ["a", "b"] {
        let own: Vec<&str> = calls
            .iter()
            .filter_map(|call| call.strip_prefix(&format!("{id}:")))
            .collect();
        assert_eq!(
            own,
            vec![
                "mood=thinking",
                "thinking=true",
                "mood=happy",
                "thinking=false",
                "celebrate"
            ],
            "unexpected callbacks for {id}"
        );
    }
    assert_eq!(buddy.mood(), Mood::Excited);
    assert!(!buddy.is_thinking());
}

/// Tests that a broken view does not stop healthy views or the state.
#[test]
fn test_broken_view_is_isolated() {
    let buddy = BuddyCoordinator::default();
    let broken: Arc<dyn BuddyController> = Arc::new(Broken(ControllerId::from("broken")));
    let _broken_view = buddy.attach(Arc::clone(&broken));
    let healthy = BuddyView::mount(RendererKind::Placeholder, BuddySize::Small, &buddy);

    buddy.on_grade_select(3);
    buddy.on_lesson_complete();

    assert!((buddy.progress() - 70.0).abs() < f64::EPSILON);
    assert_eq!(buddy.streak_count(), 1);
    let line = healthy.describe();
    assert!(line.contains("Progress 70%"), "got: {line}");
    assert!(line.contains("Streak 🔥 1"), "got: {line}");
    assert!(line.contains("excited"), "got: {line}");
}

/// Tests that grade selection drives native inputs.
#[test]
fn test_grade_select_reaches_native_inputs() {
    let buddy = BuddyCoordinator::default();
    let (native, _view) = native_view(&buddy);

    buddy.on_grade_select(4);
    let inputs = native.inputs();
    assert_eq!(inputs.get("mood"), Some(Input::Number(3.0)));
    assert_eq!(inputs.get("progress"), Some(Input::Number(80.0)));

    buddy.on_grade_select(6);
    assert_eq!(native.inputs().get("progress"), Some(Input::Number(100.0)));
}

/// Tests the lesson complete recipe from mid progress.
#[test]
fn test_lesson_complete_from_fifty() {
    let buddy = BuddyCoordinator::default();
    let (native, _view) = native_view(&buddy);
    buddy.set_progress(50.0);
    buddy.set_streak_count(2);

    buddy.on_lesson_complete();

    assert!((buddy.progress() - 60.0).abs() < f64::EPSILON);
    assert_eq!(buddy.streak_count(), 3);
    assert_eq!(buddy.mood(), Mood::Excited);
    let inputs = native.inputs();
    assert_eq!(inputs.get("progress"), Some(Input::Number(60.0)));
    assert_eq!(inputs.get("streakCount"), Some(Input::Number(3.0)));
    assert_eq!(inputs.get("celebrate"), Some(Input::Trigger(1)));
}

/// Tests that a view missing its mood input still gets the other updates.
#[test]
fn test_asset_without_mood_input_degrades() {
    let buddy = BuddyCoordinator::default();
    let native = Arc::new(NativeRenderer::with_inputs(
        ControllerId::from("old-asset"),
        buddy_inputs().without("mood"),
    ));
    let _view = BuddyView::mount_renderer(
        Renderer::Native(Arc::clone(&native)),
        BuddySize::Medium,
        &buddy,
    );

    buddy.on_tab_change(TabMode::Practicing);
    buddy.set_progress(33.0);

    assert_eq!(buddy.mood(), Mood::Happy);
    assert!(!native.inputs().contains("mood"));
    assert_eq!(native.inputs().get("progress"), Some(Input::Number(33.0)));
}

/// Tests that reset returns every view to the defaults.
#[tokio::test(start_paused = true)]
async fn test_reset_clears_views_and_pending_celebrations() {
    let buddy = BuddyCoordinator::default();
    let (native, _view) = native_view(&buddy);
    buddy.on_grade_select(3);
    buddy.set_streak_count(7);
    buddy.on_app_open();
    assert_eq!(buddy.pending_count(), 1);

    buddy.reset();
    tokio::time::sleep(Duration::from_millis(500)).await;

    let state = buddy.snapshot();
    assert_eq!(state.mood, Mood::Idle);
    assert!(state.progress.abs() < f64::EPSILON);
    assert_eq!(state.streak_count, 0);
    assert_eq!(state.triggers.celebrate, 0);

    let inputs = native.inputs();
    assert_eq!(inputs.get("mood"), Some(Input::Number(0.0)));
    assert_eq!(inputs.get("progress"), Some(Input::Number(0.0)));
    assert_eq!(inputs.get("streakCount"), Some(Input::Number(0.0)));
}

/// Tests that a view mounted late matches views mounted earlier.
#[test]
fn test_late_view_catches_up() {
    let buddy = BuddyCoordinator::default();
    let early = BuddyView::mount(RendererKind::Web, BuddySize::Small, &buddy);
    buddy.on_tab_change(TabMode::Learning);
    buddy.set_progress(45.0);

    let late = BuddyView::mount(RendererKind::Web, BuddySize::Small, &buddy);
    assert_eq!(early.describe(), late.describe());
    assert!(late.describe().contains("isFocused=on"));
}

/// Tests that an unmounted view no longer counts as registered.
#[test]
fn test_unmounted_view_stops_receiving() {
    let buddy = BuddyCoordinator::default();
    let (native, view) = native_view(&buddy);
    buddy.set_mood(Mood::Sad);
    drop(view);

    buddy.set_mood(Mood::Excited);
    assert_eq!(buddy.controller_count(), 0);
    assert_eq!(native.inputs().get("mood"), Some(Input::Number(2.0)));
}

/// Tests a scenario loaded from JSON against mounted views.
#[tokio::test(start_paused = true)]
async fn test_json_scenario_end_to_end() {
    let json = r#"[
        {"event": "app_open"},
        {"wait": 500},
        {"event": "tab_change", "payload": "practicing"},
        {"event": "grade_select", "payload": 1},
        {"event": "add_subject"},
        {"event": "chat_send"},
        {"event": "chat_thinking_start"},
        {"wait": 100},
        {"event": "chat_reply"},
        {"wait": 200}
    ]"#;
    let scenario = Scenario::from_json("session.json", json).expect("scenario parses");
    assert_eq!(scenario.event_count(), 7);

    let buddy = BuddyCoordinator::new(BuddyConfig::default());
    let (native, _view) = native_view(&buddy);
    scenario.run(&buddy).await;

    let state = buddy.snapshot();
    assert!((state.progress - 20.0).abs() < f64::EPSILON);
    assert_eq!(state.mood, Mood::Excited);
    // app open, add subject, chat reply
    assert_eq!(state.triggers.celebrate, 3);
    assert_eq!(native.inputs().get("celebrate"), Some(Input::Trigger(3)));
    assert_eq!(buddy.pending_count(), 0);
}

/// Tests dispatching events one by one matches calling the handlers.
#[test]
fn test_dispatch_matches_direct_handlers() {
    let dispatched = BuddyCoordinator::default();
    let direct = BuddyCoordinator::default();

    for event in [
        AppEvent::GradeSelect(2),
        AppEvent::SubjectTap("History".to_string()),
        AppEvent::LessonComplete,
        AppEvent::CourseEnroll,
    ] {
        dispatched.dispatch(&event);
    }
    direct.on_grade_select(2);
    direct.on_subject_tap("History");
    direct.on_lesson_complete();
    direct.on_course_enroll();

    let (a, b) = (dispatched.snapshot(), direct.snapshot());
    assert_eq!(a.mood, b.mood);
    assert!((a.progress - b.progress).abs() < f64::EPSILON);
    assert_eq!(a.streak_count, b.streak_count);
    assert_eq!(a.triggers, b.triggers);
}
