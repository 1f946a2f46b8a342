//! # Stock Counter Screen
//!
//! A purchase-scene stock counter: one quantity, an increase and a
//! decrease button, and a text display, backed by a simulated backend
//! that takes one second per operation.
//!
//! ## Architecture
//!
//! The screen follows the workspace's unidirectional data flow:
//!
//! - [`types::StockState`] holds the quantity (floor at zero)
//! - [`types::StockAction`] carries button presses and backend completions
//! - [`reducer::StockReducer`] is the pure business logic: a press
//!   produces a backend effect, a settlement mutates the quantity and
//!   pushes the result to the display
//! - [`environment::ScreenEnvironment`] injects the backend and display
//! - [`screen::StockScreen`] is the controller wiring triggers to the
//!   store, showing the starting quantity on creation and cancelling
//!   in-flight operations on teardown
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stock_counter_screen::environment::{StockDisplay, TextDisplay};
//! use stock_counter_screen::screen::StockScreen;
//!
//! # async fn example() -> Result<(), stock_counter_runtime::StoreError> {
//! let display = Arc::new(TextDisplay::new());
//! let screen = StockScreen::new(Arc::clone(&display) as Arc<dyn StockDisplay>);
//! assert_eq!(display.text(), "50");
//!
//! let mut handle = screen.press_increase().await?;
//! handle.wait().await;
//! assert_eq!(display.text(), "51");
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod mocks;
pub mod reducer;
pub mod screen;
pub mod types;

pub use environment::{Backend, ScreenEnvironment, SimulatedBackend, StockDisplay, TextDisplay};
pub use reducer::StockReducer;
pub use screen::{ScreenConfig, ScreenStore, StockScreen};
pub use types::{BACKEND_DELAY, DEFAULT_STOCK, StockAction, StockState};
