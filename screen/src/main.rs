//! Stock counter demo binary
//!
//! Drives the screen the way a user would: show the starting stock,
//! press each button, and print what the display holds after each
//! operation settles.

use std::sync::Arc;

use stock_counter_runtime::StoreError;
use stock_counter_screen::environment::{StockDisplay, TextDisplay};
use stock_counter_screen::screen::StockScreen;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stock_counter_screen=debug,stock_counter_runtime=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Stock Counter: MVC on a reducer store ===\n");

    let display = Arc::new(TextDisplay::new());
    let screen = StockScreen::new(Arc::clone(&display) as Arc<dyn StockDisplay>);

    println!("Display shows: {}", display.text());

    println!("\n>>> Pressing: increase");
    let mut handle = screen.press_increase().await?;
    handle.wait().await;
    println!("Display shows: {}", display.text());

    println!("\n>>> Pressing: increase");
    let mut handle = screen.press_increase().await?;
    handle.wait().await;
    println!("Display shows: {}", display.text());

    println!("\n>>> Pressing: decrease");
    let mut handle = screen.press_decrease().await?;
    handle.wait().await;
    println!("Display shows: {}", display.text());

    println!("\nFinal quantity: {}", screen.quantity().await);

    screen.shutdown().await?;
    println!("Screen shut down cleanly");

    Ok(())
}
