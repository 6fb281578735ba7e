//! Example demonstrating an airplane mode observation end to end.
//!
//! This example shows how to:
//! - Read the current toggle once
//! - Observe the current state followed by every change
//! - Tear the subscription down on the control thread by dropping it
//!
//! Run with: cargo run --example airplane_mode

use airplane_mode_watch::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Airplane Mode Example ===\n");

    let watcher = AirplaneModeWatcher::create()?;
    let host = Arc::new(SimulatedHost::new());

    println!(
        "Airplane mode on: {}",
        watcher.is_airplane_mode_on(Some(&*host))?
    );

    let mut states = watcher.get_and_observe(Some(host.clone()))?.subscribe();

    // Flip the toggle a few times from another thread
    let toggler = Arc::clone(&host);
    let handle = thread::spawn(move || {
        for on in [true, false, true] {
            thread::sleep(Duration::from_millis(100));
            println!("--- Host sets airplane mode to {on} ---");
            toggler.set_airplane_mode(on);
        }
    });

    // Initial state plus three changes
    for _ in 0..4 {
        match states.next().await {
            Some(state) => println!("Airplane mode on: {}", state.is_on()),
            None => break,
        }
    }

    let _ = handle.join();

    println!("\nDropping the stream...");
    drop(states);
    thread::sleep(Duration::from_millis(50));
    println!("Listeners still registered: {}", host.listener_count());

    println!("\n=== Example Complete ===");
    Ok(())
}
