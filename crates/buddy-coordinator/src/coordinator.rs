//! The buddy coordinator: observable state plus controller fan-out.
//!
//! A [`BuddyCoordinator`] is a cheap, cloneable handle created once by the
//! application root and passed down to whatever needs it. Each write runs to
//! completion on the calling task: the state lock is taken for the write
//! only, the new state is published to watchers, and then every live
//! controller is called with the state lock released.
//!
//! Writes that reach controllers are serialized by a separate emit lock held
//! from the state write through the last callback, so views receive updates
//! in the same order the state saw them. Controller callbacks must therefore
//! not call back into those writes.
//!
//! # Example
//!
//! ```
//! use buddy_coordinator::{BuddyConfig, BuddyCoordinator, Mood};
//!
//! let buddy = BuddyCoordinator::new(BuddyConfig::default());
//! buddy.set_progress(140.0);
//! buddy.trigger_celebrate();
//!
//! assert_eq!(buddy.progress(), 100.0);
//! assert_eq!(buddy.mood(), Mood::Excited);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::controller::{BuddyController, ControllerId, ControllerRegistry};
use crate::error::ControllerResult;
use crate::state::{BuddyState, TriggerCounters};
use crate::{BuddyConfig, Mood};

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Where a delayed celebration is waiting.
enum Worker {
    Task(AbortHandle),
    Thread(JoinHandle<()>),
}

/// A celebration scheduled for later.
///
/// The flag is checked under the emit lock right before firing, so a
/// cancellation that wins the lock always sticks.
struct PendingCelebration {
    cancelled: Arc<AtomicBool>,
    worker: Worker,
}

impl PendingCelebration {
    fn is_finished(&self) -> bool {
        match &self.worker {
            Worker::Task(task) => task.is_finished(),
            Worker::Thread(thread) => thread.is_finished(),
        }
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        if let Worker::Task(task) = &self.worker {
            task.abort();
        }
    }
}

struct Inner {
    config: BuddyConfig,
    state: Mutex<BuddyState>,
    registry: Mutex<ControllerRegistry>,
    publisher: watch::Sender<BuddyState>,
    emit: Mutex<()>,
    pending: Mutex<Vec<PendingCelebration>>,
}

impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inner").finish_non_exhaustive()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        for celebration in pending.drain(..) {
            celebration.cancel();
        }
    }
}

// ============================================================================
// BuddyCoordinator
// ============================================================================

/// Single source of truth for the buddy's expressive state.
#[derive(Clone)]
pub struct BuddyCoordinator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for BuddyCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuddyCoordinator")
            .field("state", &*lock(&self.inner.state))
            .field("registry", &*lock(&self.inner.registry))
            .finish_non_exhaustive()
    }
}

impl Default for BuddyCoordinator {
    fn default() -> Self {
        Self::new(BuddyConfig::default())
    }
}

impl BuddyCoordinator {
    /// Creates a coordinator holding the default state and no controllers.
    #[must_use]
    pub fn new(config: BuddyConfig) -> Self {
        let state = BuddyState::new();
        let (publisher, _) = watch::channel(state.clone());
        Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(state),
                registry: Mutex::new(ControllerRegistry::new()),
                publisher,
                emit: Mutex::new(()),
                pending: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The configuration this coordinator was built with.
    #[must_use]
    pub fn config(&self) -> &BuddyConfig {
        &self.inner.config
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> BuddyState {
        lock(&self.inner.state).clone()
    }

    /// Active mood.
    #[must_use]
    pub fn mood(&self) -> Mood {
        lock(&self.inner.state).mood
    }

    /// Overall progress in `[0, 100]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        lock(&self.inner.state).progress
    }

    /// Current streak.
    #[must_use]
    pub fn streak_count(&self) -> u32 {
        lock(&self.inner.state).streak_count
    }

    /// Whether an asynchronous answer is in flight.
    #[must_use]
    pub fn is_thinking(&self) -> bool {
        lock(&self.inner.state).is_thinking
    }

    /// Current trigger counters.
    #[must_use]
    pub fn triggers(&self) -> TriggerCounters {
        lock(&self.inner.state).triggers
    }

    /// Subscribes to state changes.
    ///
    /// The receiver sees the current state immediately and is notified after
    /// every write. Intermediate states may be skipped by a slow reader; use
    /// the trigger counters to detect one-shot events.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BuddyState> {
        self.inner.publisher.subscribe()
    }

    // ------------------------------------------------------------------------
    // Primitive setters
    // ------------------------------------------------------------------------

    /// Stores a mood and shows it on every view.
    pub fn set_mood(&self, mood: Mood) {
        let _emit = self.emit_guard();
        self.update(|state| state.set_mood(mood));
        debug!(%mood, "Mood set");
        self.fan_out("apply_mood", |controller| controller.apply_mood(mood));
    }

    /// Stores progress clamped to `[0, 100]` and shows it on every view.
    pub fn set_progress(&self, value: f64) {
        let _emit = self.emit_guard();
        let progress = self.update(|state| state.set_progress(value));
        debug!(progress, "Progress set");
        self.fan_out("apply_progress", |controller| {
            controller.apply_progress(progress)
        });
    }

    /// Stores the streak clamped to `>= 0` and shows it on every view.
    pub fn set_streak_count(&self, value: i64) {
        let _emit = self.emit_guard();
        let streak = self.update(|state| state.set_streak_count(value));
        debug!(streak, "Streak set");
        self.fan_out("apply_streak", |controller| controller.apply_streak(streak));
    }

    /// Stores the thinking flag without notifying controllers.
    ///
    /// See [`BuddyState::set_is_thinking`] for the mood side effect.
    pub fn set_is_thinking(&self, thinking: bool) {
        self.update(|state| state.set_is_thinking(thinking));
        debug!(thinking, "Thinking flag set");
    }

    // ------------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------------

    /// Fires a celebration burst on every view and switches to `Excited`.
    pub fn trigger_celebrate(&self) {
        let _emit = self.emit_guard();
        self.celebrate();
    }

    /// Starts or stops the thinking animation on every view.
    pub fn trigger_thinking(&self, start: bool) {
        let _emit = self.emit_guard();
        let count = self.update(|state| state.record_thinking(start));
        debug!(count, start, "Thinking triggered");
        self.fan_out("fire_thinking", |controller| {
            controller.fire_thinking(start)
        });
    }

    /// Records a tap. Views pick it up from the trigger counters.
    pub fn trigger_tap(&self) {
        let count = self.update(BuddyState::record_tap);
        debug!(count, "Tap triggered");
    }

    /// Records a wink. Views pick it up from the trigger counters.
    pub fn trigger_wink(&self) {
        let count = self.update(BuddyState::record_wink);
        debug!(count, "Wink triggered");
    }

    // ------------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------------

    /// Registers a controller under its id, replacing any previous entry.
    ///
    /// Only a weak reference is kept; the caller stays the owner.
    pub fn register_controller(&self, controller: Arc<dyn BuddyController>) {
        let replaced = lock(&self.inner.registry).register(&controller);
        if replaced {
            debug!(controller = %controller.id(), "Controller re-registered");
        } else {
            debug!(controller = %controller.id(), "Controller registered");
        }
    }

    /// Removes a controller. Unknown ids are ignored.
    pub fn unregister_controller(&self, id: &ControllerId) {
        if lock(&self.inner.registry).unregister(id) {
            debug!(controller = %id, "Controller unregistered");
        }
    }

    /// Registers a view's controller for as long as the returned guard lives.
    ///
    /// The controller is brought up to date with the current mood, progress
    /// and streak straight away, so a view mounted late matches the others.
    pub fn attach(&self, controller: Arc<dyn BuddyController>) -> ControllerRegistration {
        let id = controller.id().clone();
        let _emit = self.emit_guard();
        self.register_controller(Arc::clone(&controller));

        let state = self.snapshot();
        let sync = [
            ("apply_mood", controller.apply_mood(state.mood)),
            ("apply_progress", controller.apply_progress(state.progress)),
            ("apply_streak", controller.apply_streak(state.streak_count)),
        ];
        for (operation, result) in sync {
            log_failure(&id, operation, result);
        }

        ControllerRegistration {
            coordinator: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Returns `true` if a controller with this id is registered.
    #[must_use]
    pub fn is_registered(&self, id: &ControllerId) -> bool {
        lock(&self.inner.registry).contains(id)
    }

    /// Number of registered controllers.
    #[must_use]
    pub fn controller_count(&self) -> usize {
        lock(&self.inner.registry).len()
    }

    // ------------------------------------------------------------------------
    // Reset and deferred work
    // ------------------------------------------------------------------------

    /// Restores the default state and shows it on every view.
    ///
    /// Pending delayed celebrations are cancelled; the registry is untouched.
    pub fn reset(&self) {
        let _emit = self.emit_guard();
        let cancelled = self.cancel_pending();
        let state = self.update(|state| {
            state.reset();
            state.clone()
        });
        debug!(cancelled, "State reset");

        self.fan_out("apply_mood", |controller| controller.apply_mood(state.mood));
        self.fan_out("apply_progress", |controller| {
            controller.apply_progress(state.progress)
        });
        self.fan_out("apply_streak", |controller| {
            controller.apply_streak(state.streak_count)
        });
    }

    /// Aborts delayed celebrations that have not fired yet.
    ///
    /// Returns the number of tasks that were still pending.
    pub fn cancel_pending(&self) -> usize {
        let mut pending = lock(&self.inner.pending);
        let mut cancelled = 0;
        for celebration in pending.drain(..) {
            if !celebration.is_finished() {
                celebration.cancel();
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Number of delayed celebrations that have not fired yet.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        let mut pending = lock(&self.inner.pending);
        pending.retain(|celebration| !celebration.is_finished());
        pending.len()
    }

    /// Fires [`trigger_celebrate`](Self::trigger_celebrate) after `delay`.
    ///
    /// The waiter only holds a weak handle, so it does nothing once the
    /// coordinator is gone. Inside a tokio runtime it is a task; otherwise a
    /// plain thread sleeps through the delay.
    pub(crate) fn schedule_celebrate(&self, delay: Duration, reason: &'static str) {
        let cancelled = Arc::new(AtomicBool::new(false));
        let coordinator = Arc::downgrade(&self.inner);

        let worker = if let Ok(runtime) = Handle::try_current() {
            let flag = Arc::clone(&cancelled);
            let task = runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                fire_scheduled(&coordinator, &flag, reason);
            });
            Worker::Task(task.abort_handle())
        } else {
            let flag = Arc::clone(&cancelled);
            let spawned = std::thread::Builder::new()
                .name(format!("buddy-{reason}"))
                .spawn(move || {
                    std::thread::sleep(delay);
                    fire_scheduled(&coordinator, &flag, reason);
                });
            match spawned {
                Ok(thread) => Worker::Thread(thread),
                Err(error) => {
                    warn!(reason, %error, "Could not start delayed celebration");
                    return;
                }
            }
        };

        let mut pending = lock(&self.inner.pending);
        pending.retain(|celebration| !celebration.is_finished());
        pending.push(PendingCelebration { cancelled, worker });
        debug!(reason, ?delay, "Delayed celebration scheduled");
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Holds back other fanning-out writes until dropped.
    fn emit_guard(&self) -> MutexGuard<'_, ()> {
        lock(&self.inner.emit)
    }

    /// Celebrates; the caller holds the emit lock.
    fn celebrate(&self) {
        let count = self.update(BuddyState::record_celebrate);
        debug!(count, "Celebrate triggered");
        self.fan_out("fire_celebrate", |controller| controller.fire_celebrate());
    }

    /// Applies a write under the state lock, then publishes the new state.
    fn update<R>(&self, write: impl FnOnce(&mut BuddyState) -> R) -> R {
        let (result, state) = {
            let mut state = lock(&self.inner.state);
            let result = write(&mut state);
            (result, state.clone())
        };
        self.inner.publisher.send_replace(state);
        result
    }

    /// Calls every live controller, isolating failures per controller.
    fn fan_out(
        &self,
        operation: &'static str,
        call: impl Fn(&dyn BuddyController) -> ControllerResult,
    ) {
        let controllers = lock(&self.inner.registry).live();
        for controller in &controllers {
            log_failure(controller.id(), operation, call(controller.as_ref()));
        }
    }
}

/// Runs a delayed celebration unless it was cancelled or the coordinator is gone.
fn fire_scheduled(coordinator: &Weak<Inner>, cancelled: &AtomicBool, reason: &'static str) {
    let Some(inner) = coordinator.upgrade() else {
        debug!(reason, "Coordinator dropped before delayed celebration");
        return;
    };
    let coordinator = BuddyCoordinator { inner };
    let _emit = coordinator.emit_guard();
    if cancelled.load(Ordering::Acquire) {
        debug!(reason, "Delayed celebration cancelled");
        return;
    }
    coordinator.celebrate();
}

fn log_failure(id: &ControllerId, operation: &'static str, result: ControllerResult) {
    if let Err(error) = result {
        warn!(controller = %id, operation, %error, "Controller callback failed");
    }
}

// ============================================================================
// ControllerRegistration
// ============================================================================

/// Keeps a controller registered until dropped.
///
/// Dropping the guard unregisters the controller on every exit path of the
/// owning view, including unwinding.
#[derive(Debug)]
#[must_use = "dropping the registration unregisters the controller"]
pub struct ControllerRegistration {
    coordinator: Weak<Inner>,
    id: ControllerId,
}

impl ControllerRegistration {
    /// Id of the registered controller.
    #[must_use]
    pub const fn id(&self) -> &ControllerId {
        &self.id
    }
}

impl Drop for ControllerRegistration {
    fn drop(&mut self) {
        if let Some(inner) = self.coordinator.upgrade() {
            BuddyCoordinator { inner }.unregister_controller(&self.id);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
