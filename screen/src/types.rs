//! State, actions, and constants for the stock screen.

use std::time::Duration;

/// Stock shown when the screen is created, before any interaction
pub const DEFAULT_STOCK: u32 = 50;

/// Simulated backend round-trip per operation
pub const BACKEND_DELAY: Duration = Duration::from_millis(1000);

/// Stock screen state
///
/// The quantity can never go negative: the type is unsigned and the
/// decrease path clamps at zero instead of underflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockState {
    /// Current stock quantity
    pub quantity: u32,
}

impl StockState {
    /// Create a state with the given starting quantity
    #[must_use]
    pub const fn with_quantity(quantity: u32) -> Self {
        Self { quantity }
    }
}

impl Default for StockState {
    fn default() -> Self {
        Self::with_quantity(DEFAULT_STOCK)
    }
}

/// Stock screen actions
///
/// Button presses arrive from the screen controller; `*Settled` actions
/// are fed back by the simulated backend effect once its round-trip
/// completes. The stock only mutates on settlement, never on the press
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAction {
    /// The increase button was pressed
    IncreasePressed,
    /// The decrease button was pressed
    DecreasePressed,
    /// An increase operation finished its backend round-trip
    IncreaseSettled,
    /// A decrease operation finished its backend round-trip
    DecreaseSettled,
}

impl StockAction {
    /// True for the `*Settled` feedback actions
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::IncreaseSettled | Self::DecreaseSettled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_starts_at_fifty() {
        assert_eq!(StockState::default().quantity, DEFAULT_STOCK);
        assert_eq!(DEFAULT_STOCK, 50);
    }

    #[test]
    fn settled_classification() {
        assert!(StockAction::IncreaseSettled.is_settled());
        assert!(StockAction::DecreaseSettled.is_settled());
        assert!(!StockAction::IncreasePressed.is_settled());
        assert!(!StockAction::DecreasePressed.is_settled());
    }
}
