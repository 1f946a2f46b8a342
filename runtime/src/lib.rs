//! # Stock Counter Runtime
//!
//! Runtime implementation for the stock counter architecture.
//!
//! This crate provides the Store runtime that coordinates reducer
//! execution and effect handling. It stands in for the host GUI
//! framework's lifecycle-scoped concurrency primitive: each effect runs
//! as a spawned task, results are marshalled back through the store,
//! and teardown cancels whatever is still in flight.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Abort Path**: [`Store::abort`] cancels in-flight effect tasks on screen teardown
//!
//! ## Example
//!
//! ```ignore
//! use stock_counter_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! let handle = store.send(Action::DoSomething).await?;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use stock_counter_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{RwLock, watch};

pub use error::StoreError;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown
        /// or abort was initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received, and by
        /// [`EffectHandle::wait_with_timeout`](crate::EffectHandle::wait_with_timeout).
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,

        /// A task join error occurred during effect execution
        ///
        /// This typically means a spawned task panicked.
        #[error("Task failed during effect execution: {0}")]
        TaskJoinError(#[from] tokio::task::JoinError),
    }
}

/// Configuration for the Store runtime
///
/// # Example
///
/// ```ignore
/// use stock_counter_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
///
/// let store = Store::with_config(state, reducer, env, config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the action broadcast channel
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast channel capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects of a
/// single action to complete. Tracking is cascading: a feedback action
/// dispatched by an effect is applied to state, and its own effects
/// finish, before the originating effect is considered complete. After
/// [`wait`](EffectHandle::wait) the state and the display both reflect
/// the settled operation.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle together with its tracking side
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects of the originating action to complete
    ///
    /// Blocks until the effect counter reaches zero. Aborted effects
    /// count as complete.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect
/// panics or is cancelled by an abort.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreConfig, StoreError, watch,
    };
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and abort)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Concurrency
    ///
    /// Multiple concurrent `send()` calls serialize at the reducer level
    /// (the write lock), so state mutations are never torn. Effects run
    /// on independent spawned tasks and may complete in any order -
    /// overlapping operations race to update the display with
    /// last-completion-wins semantics.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        /// Abort signal observed by every in-flight effect task.
        abort: Arc<watch::Sender<bool>>,
        pending_effects: Arc<AtomicUsize>,
        /// Action broadcast channel for observing actions produced by
        /// effects. This is what the screen's display listener and the
        /// request-response helper subscribe to.
        action_broadcast: broadcast::Sender<A>,
        default_shutdown_timeout: Duration,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses the default [`StoreConfig`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let config = StoreConfig::default().with_broadcast_capacity(64);
        /// let store = Store::with_config(MyState::default(), MyReducer, my_env, config);
        /// ```
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity);
            let (abort, _) = watch::channel(false);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                abort: Arc::new(abort),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
                default_shutdown_timeout: config.default_shutdown_timeout,
            }
        }

        /// Number of effect tasks currently in flight
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Whether the store has been shut down or aborted
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// This method:
        /// 1. Sets the shutdown flag (rejecting new actions)
        /// 2. Waits for pending effects to complete (with timeout)
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires
        /// before all pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            // Set shutdown flag to reject new actions
            self.shutdown.store(true, Ordering::Release);

            // Wait for pending effects with timeout
            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(100);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Graceful shutdown using the configured default timeout
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the default timeout
        /// expires before all pending effects complete.
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.default_shutdown_timeout).await
        }

        /// Abort the store immediately
        ///
        /// Intended for screen teardown: new actions are rejected and
        /// every in-flight effect task is cancelled at its next await
        /// point. A cancelled backend round-trip never settles and never
        /// writes to the display.
        ///
        /// Unlike [`shutdown`](Self::shutdown) this does not wait for
        /// anything; it is safe to call from synchronous code such as a
        /// `Drop` impl.
        pub fn abort(&self) {
            tracing::info!("Aborting store, cancelling in-flight effects");
            metrics::counter!("store.abort.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);
            let _ = self.abort.send(true);
        }

        /// Send an action to the store
        ///
        /// This is the primary way to interact with the store:
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Executes returned effects asynchronously
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns after starting effect execution, not after
        /// completion; use the returned [`EffectHandle`] to wait.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is
        /// shutting down or aborted.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic will propagate and halt the
        /// store. Reducers should be pure functions that do not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.actions.rejected").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect_internal(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching result action
        ///
        /// Designed for request-response patterns: subscribe to the action
        /// broadcast, send the initial action, then wait for an action
        /// matching the predicate. The screen tests use this to wait for
        /// the `*Settled` action of a button press.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action within `timeout`
        /// - [`StoreError::ChannelClosed`]: broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid a race with fast effects
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {} // Not the action we want, keep waiting
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Slow consumer; if the terminal action was
                            // dropped the timeout will catch it.
                            tracing::warn!(skipped, "Action observer lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        }
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects of this store
        ///
        /// Returns a receiver that gets a clone of every action fed back
        /// by an effect (button presses sent via `send` are not
        /// broadcast, only their settled results are).
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure so the read lock is released
        /// promptly:
        ///
        /// ```ignore
        /// let quantity = store.state(|s| s.quantity).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Execute an effect with tracking
        ///
        /// Internal method that executes effects with completion tracking.
        /// Uses [`DecrementGuard`] to ensure the effect counter is always
        /// decremented, even if the effect panics or is aborted.
        ///
        /// # Effect Types
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, feeds resulting action back if `Some`
        /// - `Delay`: Waits for duration, then feeds the action back
        ///
        /// Every spawned task races its work against the store's abort
        /// signal; an aborted task stops at its next await point without
        /// dispatching anything.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned into tasks
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                }
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    // Track global pending effects for shutdown
                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();
                    let mut aborted = store.abort.subscribe();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        let outcome = tokio::select! {
                            _ = aborted.wait_for(|flag| *flag) => {
                                tracing::trace!("Effect::Future aborted");
                                metrics::counter!("store.effects.aborted").increment(1);
                                return;
                            }
                            outcome = fut => outcome,
                        };

                        if let Some(action) = outcome {
                            tracing::trace!("Effect::Future produced an action, feeding back");

                            // Broadcast to observers (display listeners, tests)
                            let _ = store.action_broadcast.send(action.clone());

                            // Feed the action back and wait for its own effects,
                            // so the original handle covers the whole cascade
                            if let Ok(mut nested) = store.send(action).await {
                                nested.wait().await;
                            }
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                }
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();
                    let mut aborted = store.abort.subscribe();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        tokio::select! {
                            _ = aborted.wait_for(|flag| *flag) => {
                                tracing::trace!("Effect::Delay aborted");
                                metrics::counter!("store.effects.aborted").increment(1);
                                return;
                            }
                            () = tokio::time::sleep(duration) => {}
                        }

                        tracing::trace!("Effect::Delay completed, feeding action back");
                        let _ = store.action_broadcast.send((*action).clone());
                        if let Ok(mut nested) = store.send(*action).await {
                            nested.wait().await;
                        }
                    });
                }
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                abort: Arc::clone(&self.abort),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
                default_shutdown_timeout: self.default_shutdown_timeout,
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use stock_counter_core::environment::Clock;
    use stock_counter_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
    use stock_counter_testing::FixedClock;

    #[derive(Debug, Clone, Default)]
    struct TestState {
        count: u32,
        settled: u32,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestAction {
        Bump,
        BumpLater,
        SlowBump,
        Settled,
    }

    #[derive(Clone)]
    struct TestEnv {
        clock: FixedClock,
    }

    #[derive(Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            // Clock is injected the same way the screen injects its backend
            let _now = env.clock.now();

            match action {
                TestAction::Bump => {
                    state.count += 1;
                    smallvec![Effect::future(async { Some(TestAction::Settled) })]
                }
                TestAction::BumpLater => {
                    smallvec![Effect::Delay {
                        duration: Duration::from_secs(1),
                        action: Box::new(TestAction::Bump),
                    }]
                }
                TestAction::SlowBump => {
                    state.count += 1;
                    smallvec![Effect::future(async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Some(TestAction::Settled)
                    })]
                }
                TestAction::Settled => {
                    state.settled += 1;
                    smallvec![Effect::None]
                }
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        let env = TestEnv {
            clock: stock_counter_testing::test_clock(),
        };
        Store::new(TestState::default(), TestReducer, env)
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn send_applies_reducer_and_feedback() {
        let store = test_store();

        let mut handle = store.send(TestAction::Bump).await.unwrap();
        handle.wait().await;

        let (count, settled) = store.state(|s| (s.count, s.settled)).await;
        assert_eq!(count, 1);
        assert_eq!(settled, 1);
    }

    #[tokio::test(start_paused = true)]
    #[allow(clippy::unwrap_used)]
    async fn delay_effect_dispatches_after_duration() {
        let store = test_store();

        let mut handle = store.send(TestAction::BumpLater).await.unwrap();
        let count = store.state(|s| s.count).await;
        assert_eq!(count, 0, "delayed action must not apply immediately");

        handle.wait().await;
        let count = store.state(|s| s.count).await;
        assert_eq!(count, 1);
    }

    #[tokio::test(start_paused = true)]
    #[allow(clippy::unwrap_used)]
    async fn abort_cancels_in_flight_effects() {
        let store = test_store();

        let mut handle = store.send(TestAction::SlowBump).await.unwrap();
        store.abort();

        // The cancelled effect still completes its handle
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();

        let settled = store.state(|s| s.settled).await;
        assert_eq!(settled, 0, "aborted effect must not settle");

        let rejected = store.send(TestAction::Bump).await;
        assert!(matches!(rejected, Err(StoreError::ShutdownInProgress)));
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn shutdown_rejects_new_actions() {
        let store = test_store();

        store.shutdown(Duration::from_secs(1)).await.unwrap();
        assert!(store.is_shutting_down());

        let rejected = store.send(TestAction::Bump).await;
        assert!(matches!(rejected, Err(StoreError::ShutdownInProgress)));
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn send_and_wait_for_terminal_action() {
        let store = test_store();

        let result = store
            .send_and_wait_for(
                TestAction::Bump,
                |a| matches!(a, TestAction::Settled),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(result, TestAction::Settled);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn subscribed_observers_see_feedback_actions() {
        let store = test_store();
        let mut rx = store.subscribe_actions();

        let mut handle = store.send(TestAction::Bump).await.unwrap();
        handle.wait().await;

        let observed = rx.recv().await.unwrap();
        assert_eq!(observed, TestAction::Settled);
    }

    #[tokio::test]
    async fn completed_handle_returns_immediately() {
        let mut handle = EffectHandle::completed();
        handle.wait().await;
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn concurrent_sends_serialize_at_the_reducer() {
        let store = test_store();

        let mut handles = Vec::new();
        for _ in 0..10 {
            handles.push(store.send(TestAction::Bump).await.unwrap());
        }
        for mut handle in handles {
            handle.wait().await;
        }

        let (count, settled) = store.state(|s| (s.count, s.settled)).await;
        assert_eq!(count, 10);
        assert_eq!(settled, 10);
    }
}
