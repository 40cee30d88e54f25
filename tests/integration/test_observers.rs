//! Integration tests for state observers.
//!
//! Views that render taps and winks never receive a controller callback for
//! them; they watch the coordinator and compare trigger counters.

use std::time::Duration;

use buddy_coordinator::{BuddyCoordinator, BuddyState, Mood, RendererKind};
use buddy_render::{BuddySize, BuddyView, Renderer, TriggerEdges};

fn placeholder_of(view: &BuddyView) -> &buddy_render::PlaceholderRenderer {
    match view.renderer() {
        Renderer::Placeholder(placeholder) => placeholder,
        other => panic!("expected a placeholder view, got {:?}", other.kind()),
    }
}

/// Tests that the receiver starts at the current state.
#[test]
fn test_subscribe_sees_current_state() {
    let buddy = BuddyCoordinator::default();
    buddy.set_progress(42.0);

    let receiver = buddy.subscribe();
    let state: BuddyState = receiver.borrow().clone();
    assert!((state.progress - 42.0).abs() < f64::EPSILON);
    assert_eq!(state.mood, Mood::Idle);
}

/// Tests that a watcher task sees the last write of a burst.
#[tokio::test]
async fn test_watcher_task_sees_final_state() {
    let buddy = BuddyCoordinator::default();
    let mut receiver = buddy.subscribe();

    let watcher = tokio::spawn(async move {
        loop {
            receiver.changed().await.expect("coordinator alive");
            let state = receiver.borrow_and_update().clone();
            if state.streak_count == 3 {
                return state;
            }
        }
    });

    buddy.on_lesson_complete();
    buddy.on_lesson_complete();
    buddy.on_lesson_complete();

    let state = tokio::time::timeout(Duration::from_secs(1), watcher)
        .await
        .expect("watcher timed out")
        .expect("watcher panicked");
    assert_eq!(state.mood, Mood::Excited);
    assert!((state.progress - 30.0).abs() < f64::EPSILON);
    assert_eq!(state.triggers.celebrate, 3);
}

/// Tests that two placeholder views each see every tap exactly once.
#[test]
fn test_trigger_edges_per_view() {
    let buddy = BuddyCoordinator::default();
    let hero = BuddyView::mount(RendererKind::Placeholder, BuddySize::Hero, &buddy);
    let badge = BuddyView::mount(RendererKind::Placeholder, BuddySize::Tiny, &buddy);

    buddy.on_subject_tap("Math");
    buddy.trigger_wink();
    let edges = placeholder_of(&hero).observe_triggers(buddy.triggers());
    assert_eq!(edges, TriggerEdges { taps: 1, winks: 1 });

    buddy.on_lesson_start();
    assert_eq!(
        placeholder_of(&hero).observe_triggers(buddy.triggers()),
        TriggerEdges { taps: 1, winks: 0 }
    );
    assert_eq!(
        placeholder_of(&badge).observe_triggers(buddy.triggers()),
        TriggerEdges { taps: 2, winks: 1 }
    );

    assert_eq!(placeholder_of(&hero).face().pulses, 3);
    assert_eq!(placeholder_of(&badge).face().pulses, 3);
}

/// Tests that identical triggers in a row still read as separate events.
#[test]
fn test_repeated_triggers_are_distinct() {
    let buddy = BuddyCoordinator::default();
    let mut receiver = buddy.subscribe();
    let before = receiver.borrow_and_update().triggers;

    buddy.trigger_celebrate();
    let first = receiver.borrow_and_update().triggers;
    buddy.trigger_celebrate();
    let second = receiver.borrow_and_update().triggers;

    assert_eq!(first.celebrate, before.celebrate + 1);
    assert_eq!(second.celebrate, first.celebrate + 1);
}

/// Tests that observers resync after a reset clears the counters.
#[test]
fn test_edges_after_reset() {
    let buddy = BuddyCoordinator::default();
    let view = BuddyView::mount(RendererKind::Placeholder, BuddySize::Medium, &buddy);
    let placeholder = placeholder_of(&view);

    buddy.trigger_tap();
    buddy.trigger_tap();
    assert_eq!(placeholder.observe_triggers(buddy.triggers()).taps, 2);

    buddy.reset();
    assert_eq!(placeholder.observe_triggers(buddy.triggers()), TriggerEdges::default());

    buddy.trigger_tap();
    assert_eq!(placeholder.observe_triggers(buddy.triggers()).taps, 1);
}

/// Tests that the snapshot serializes with camelCase keys.
#[test]
fn test_snapshot_json_shape() {
    let buddy = BuddyCoordinator::default();
    buddy.set_streak_count(2);
    buddy.set_is_thinking(true);

    let json = serde_json::to_value(buddy.snapshot()).expect("serializes");
    assert_eq!(json["mood"], "thinking");
    assert_eq!(json["streakCount"], 2);
    assert_eq!(json["isThinking"], true);
    assert_eq!(json["triggers"]["celebrate"], 0);
    assert!(json["updatedAt"].is_string());
}
