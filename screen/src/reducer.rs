//! Reducer logic for the stock screen.
//!
//! A button press produces a backend effect; the matching `*Settled`
//! feedback mutates the quantity and pushes the result to the display.
//! Nothing is observable on the display before the backend settles.

use std::sync::Arc;

use stock_counter_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

use crate::environment::ScreenEnvironment;
use crate::types::{StockAction, StockState};

/// Reducer for the stock screen
#[derive(Clone, Copy, Debug, Default)]
pub struct StockReducer;

impl StockReducer {
    /// Creates a new `StockReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Effect for one backend round-trip, feeding `settled` back on completion
    fn round_trip(
        env: &ScreenEnvironment,
        settled: StockAction,
    ) -> Effect<StockAction> {
        let backend = Arc::clone(&env.backend);
        Effect::future(async move {
            backend.settle().await;
            Some(settled)
        })
    }

    /// Effect that pushes a settled result to the display
    fn show(env: &ScreenEnvironment, result: u32) -> Effect<StockAction> {
        let display = Arc::clone(&env.display);
        Effect::future(async move {
            display.show(result);
            None
        })
    }
}

impl Reducer for StockReducer {
    type State = StockState;
    type Action = StockAction;
    type Environment = ScreenEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Button presses ==========
            StockAction::IncreasePressed => {
                smallvec![Self::round_trip(env, StockAction::IncreaseSettled)]
            }

            StockAction::DecreasePressed => {
                smallvec![Self::round_trip(env, StockAction::DecreaseSettled)]
            }

            // ========== Backend completions ==========
            StockAction::IncreaseSettled => {
                state.quantity += 1;
                smallvec![Self::show(env, state.quantity)]
            }

            StockAction::DecreaseSettled => {
                // Empty stock reports the literal 0, it does not echo the
                // current value. Only correct because the floor is exactly
                // zero; kept as the backend observably behaves.
                let result = if state.quantity > 0 {
                    state.quantity -= 1;
                    state.quantity
                } else {
                    0
                };
                smallvec![Self::show(env, result)]
            }
        }
    }
}
