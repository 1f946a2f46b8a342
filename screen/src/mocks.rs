//! Test doubles for the screen environment.
//!
//! Used by the unit and integration tests; kept public so downstream
//! tests can drive a screen without real delays or a real display.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use crate::environment::{Backend, SettleFuture, StockDisplay};

/// Backend that settles immediately, with no simulated delay
///
/// Makes operation outcomes deterministic to await in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantBackend;

impl Backend for InstantBackend {
    fn settle(&self) -> SettleFuture {
        Box::pin(async {})
    }
}

/// Display that records every value shown
///
/// Also publishes each update on a watch channel so tests can await the
/// next display write instead of sleeping.
#[derive(Debug)]
pub struct RecordingDisplay {
    shown: Mutex<Vec<u32>>,
    updates: watch::Sender<Option<u32>>,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        let (updates, _) = watch::channel(None);
        Self {
            shown: Mutex::new(Vec::new()),
            updates,
        }
    }
}

impl RecordingDisplay {
    /// Create an empty recording display
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value shown so far, in order
    pub fn shown(&self) -> Vec<u32> {
        self.lock().clone()
    }

    /// The most recently shown value, if any
    pub fn last(&self) -> Option<u32> {
        self.lock().last().copied()
    }

    /// Displayed text, mirroring what a text widget would hold
    pub fn text(&self) -> Option<String> {
        self.last().map(|quantity| quantity.to_string())
    }

    /// Subscribe to display updates
    #[must_use]
    pub fn watch_updates(&self) -> watch::Receiver<Option<u32>> {
        self.updates.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u32>> {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StockDisplay for RecordingDisplay {
    fn show(&self, quantity: u32) {
        self.lock().push(quantity);
        let _ = self.updates.send(Some(quantity));
    }
}
