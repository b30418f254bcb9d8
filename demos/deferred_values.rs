//! Deferred values example for universals.
//!
//! Demonstrates:
//! - Storing a thunk that only runs on first read
//! - The result replacing the thunk in place
//! - Iteration seeing the raw, unresolved entry
//! - `tracing` output for registry events
//!
//! Run with: `cargo run --example deferred_values`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use universals::{Registry, RegistryApi, RegistryError};

fn main() -> Result<(), RegistryError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== universals: Deferred Values ===\n");

    let registry = Registry::new();
    let runs = Arc::new(AtomicUsize::new(0));

    // -------------------------------------------------------------------------
    // 1. Store a deferred value
    // -------------------------------------------------------------------------
    println!("1. Storing a deferred connection pool descriptor...");

    let counter = runs.clone();
    registry.set_deferred("pool", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        println!("   (thunk running)");
        json!({"size": 8, "url": "postgresql://localhost"})
    })?;

    // -------------------------------------------------------------------------
    // 2. Iteration yields the raw entry
    // -------------------------------------------------------------------------
    println!("\n2. Iterating before the first read...");

    for (name, entry) in registry.each() {
        println!("   {name}: deferred = {}", entry.is_deferred());
    }

    // -------------------------------------------------------------------------
    // 3. First and second reads
    // -------------------------------------------------------------------------
    println!("\n3. Reading twice...");

    println!("   first:  {:?}", registry.get("pool"));
    println!("   second: {:?}", registry.get("pool"));
    println!("   thunk ran {} time(s)", runs.load(Ordering::SeqCst));

    println!("\n4. Iterating after the first read...");

    for (name, entry) in registry.each() {
        println!("   {name}: deferred = {}", entry.is_deferred());
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
