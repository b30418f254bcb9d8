//! Basic usage example for universals.
//!
//! Demonstrates:
//! - Storing strings, numbers and JSON values under validated names
//! - Reading with `get()` and `get_or()`
//! - Checking presence with `has()`
//! - Collection views: `keys()`, `values()`, `each()`, `key_for()`
//! - Rejected names
//!
//! Run with: `cargo run --example basic_usage`

use serde_json::json;
use universals::{instance, RegistryApi, RegistryError};

fn main() -> Result<(), RegistryError> {
    println!("=== universals: Basic Usage ===\n");

    let universe = instance();

    // -------------------------------------------------------------------------
    // 1. Store values
    // -------------------------------------------------------------------------
    println!("1. Storing values...");

    universe.set("app_name", "MyApp")?;
    universe.set("version", 1)?;
    universe.set("debug_mode?", true)?;
    universe.set("limits", json!({"connections": 16, "timeout_ms": 5000}))?;

    println!("   Stored: app_name, version, debug_mode?, limits");

    // -------------------------------------------------------------------------
    // 2. Check presence with has()
    // -------------------------------------------------------------------------
    println!("\n2. Checking presence with has()...");

    println!("   has(\"app_name\") = {}", universe.has("app_name"));
    println!("   has(\"missing\")  = {}", universe.has("missing"));

    // -------------------------------------------------------------------------
    // 3. Read values
    // -------------------------------------------------------------------------
    println!("\n3. Reading values...");

    println!("   app_name:    {:?}", universe.get("app_name"));
    println!("   limits:      {:?}", universe.get("limits"));
    println!("   missing:     {}", universe.get_or("missing", "fallback"));

    // -------------------------------------------------------------------------
    // 4. Collection views
    // -------------------------------------------------------------------------
    println!("\n4. Collection views...");

    println!("   size:   {}", universe.len());
    println!("   keys:   {:?}", universe.keys());
    println!("   key_for(1): {:?}", universe.key_for(&json!(1)));
    for (name, entry) in universe.each() {
        println!("   each -> {name} = {entry:?}");
    }

    // -------------------------------------------------------------------------
    // 5. Rejected names
    // -------------------------------------------------------------------------
    println!("\n5. Rejected names...");

    for name in ["1_method", "method-one", "method[]", "method="] {
        match universe.set(name, "blah") {
            Ok(()) => println!("   stored {name} (unexpected)"),
            Err(e) => println!("   Error (expected): {e}"),
        }
    }
    if let Err(e) = universe.set(&123, "blah") {
        println!("   Error (expected): {e}");
    }

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------
    println!("\n=== Example Complete ===");
    println!("The registry now contains {} entries.", universe.len());

    Ok(())
}
