//! The screen controller.
//!
//! [`StockScreen`] wires the two button triggers to the store and owns
//! the screen's lifetime: construction shows the starting quantity on
//! the display, teardown aborts whatever operations are still in
//! flight so nothing writes to a destroyed display.

use std::sync::Arc;
use std::time::Duration;

use stock_counter_runtime::{EffectHandle, Store, StoreError};
use tokio::sync::broadcast;

use crate::environment::{Backend, ScreenEnvironment, SimulatedBackend, StockDisplay};
use crate::reducer::StockReducer;
use crate::types::{BACKEND_DELAY, DEFAULT_STOCK, StockAction, StockState};

/// Store type backing the stock screen
pub type ScreenStore = Store<StockState, StockAction, ScreenEnvironment, StockReducer>;

/// Configuration for a stock screen
///
/// # Example
///
/// ```ignore
/// let config = ScreenConfig::default()
///     .with_initial_stock(10)
///     .with_backend_delay(Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScreenConfig {
    /// Quantity the screen starts with
    pub initial_stock: u32,
    /// Simulated backend round-trip per operation
    pub backend_delay: Duration,
}

impl ScreenConfig {
    /// Set the starting quantity
    #[must_use]
    pub const fn with_initial_stock(mut self, quantity: u32) -> Self {
        self.initial_stock = quantity;
        self
    }

    /// Set the simulated backend delay
    #[must_use]
    pub const fn with_backend_delay(mut self, delay: Duration) -> Self {
        self.backend_delay = delay;
        self
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            initial_stock: DEFAULT_STOCK,
            backend_delay: BACKEND_DELAY,
        }
    }
}

/// The stock screen controller
///
/// Owns the store and the display reference. Each button press spawns
/// one independent operation; rapid presses may overlap, racing to
/// update the display with last-completion-wins semantics.
pub struct StockScreen {
    store: ScreenStore,
}

impl StockScreen {
    /// Create a screen with the default configuration and the
    /// production backend
    ///
    /// The starting quantity is shown on the display before any
    /// interaction.
    #[must_use]
    pub fn new(display: Arc<dyn StockDisplay>) -> Self {
        let config = ScreenConfig::default();
        let backend = Arc::new(SimulatedBackend::new(config.backend_delay));
        Self::with_config(config, backend, display)
    }

    /// Create a screen with a custom configuration and backend
    #[must_use]
    pub fn with_config(
        config: ScreenConfig,
        backend: Arc<dyn Backend>,
        display: Arc<dyn StockDisplay>,
    ) -> Self {
        let env = ScreenEnvironment::new(backend, Arc::clone(&display));
        let store = Store::new(
            StockState::with_quantity(config.initial_stock),
            StockReducer::new(),
            env,
        );

        // Show the starting quantity before any interaction
        display.show(config.initial_stock);
        tracing::debug!(initial_stock = config.initial_stock, "Screen created");

        Self { store }
    }

    /// Handle a press of the increase button
    ///
    /// Schedules one asynchronous increase operation and returns without
    /// waiting for it; the display updates once the backend settles.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the screen was
    /// already torn down.
    pub async fn press_increase(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(StockAction::IncreasePressed).await
    }

    /// Handle a press of the decrease button
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the screen was
    /// already torn down.
    pub async fn press_decrease(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(StockAction::DecreasePressed).await
    }

    /// Current stock quantity held by the model
    pub async fn quantity(&self) -> u32 {
        self.store.state(|s| s.quantity).await
    }

    /// Subscribe to the settled actions of this screen
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<StockAction> {
        self.store.subscribe_actions()
    }

    /// Wait for in-flight operations to finish, then stop the screen
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if operations are still
    /// running when the store's default timeout expires.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.store.shutdown_default().await
    }

    /// Tear the screen down immediately
    ///
    /// Cancels in-flight operations; a cancelled operation never settles
    /// and never writes to the display. Also invoked on drop.
    pub fn teardown(&self) {
        self.store.abort();
    }
}

impl Drop for StockScreen {
    fn drop(&mut self) {
        self.store.abort();
    }
}
