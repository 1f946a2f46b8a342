//! Environment dependencies for the stock screen.
//!
//! Two traits carry everything the screen needs from the outside world:
//! [`Backend`] stands in for the purchase backend (a fixed artificial
//! delay in production), and [`StockDisplay`] is the view seam the
//! reducer's display effect writes settled results through.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::types::BACKEND_DELAY;

/// Boxed future returned by [`Backend::settle`]
pub type SettleFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// The simulated purchase backend
///
/// One call models one backend round-trip for a stock operation. The
/// operation is total: it always settles, there is no failure path.
pub trait Backend: Send + Sync {
    /// Complete one simulated round-trip
    fn settle(&self) -> SettleFuture;
}

/// Production backend: a fixed delay standing in for purchase processing
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    /// Create a backend with a custom round-trip delay
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(BACKEND_DELAY)
    }
}

impl Backend for SimulatedBackend {
    fn settle(&self) -> SettleFuture {
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
        })
    }
}

/// The text display the screen writes results into
///
/// Implementations must tolerate being called from effect tasks; the
/// store serializes the reducer but display writes race with
/// last-completion-wins semantics when operations overlap.
pub trait StockDisplay: Send + Sync {
    /// Set the displayed text to the decimal form of `quantity`
    fn show(&self, quantity: u32);
}

/// A plain text field, the production display
///
/// Holds the decimal string of the last shown quantity, the way a text
/// widget would.
#[derive(Debug, Default)]
pub struct TextDisplay {
    text: Mutex<String>,
}

impl TextDisplay {
    /// Create an empty text field
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current displayed text
    pub fn text(&self) -> String {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, String> {
        // A poisoned lock only means a panicked writer; the text itself
        // is still a valid String.
        self.text.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl StockDisplay for TextDisplay {
    fn show(&self, quantity: u32) {
        *self.lock() = quantity.to_string();
    }
}

/// Injected dependencies for the stock reducer
#[derive(Clone)]
pub struct ScreenEnvironment {
    /// Simulated purchase backend
    pub backend: Arc<dyn Backend>,
    /// Display the settled results are pushed to
    pub display: Arc<dyn StockDisplay>,
}

impl ScreenEnvironment {
    /// Create a new screen environment
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, display: Arc<dyn StockDisplay>) -> Self {
        Self { backend, display }
    }
}
