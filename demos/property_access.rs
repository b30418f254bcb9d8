//! Property access example for universals.
//!
//! Demonstrates:
//! - `Property` handles for names chosen at runtime
//! - Accessor methods generated with `define_properties!`
//! - A named registry declared with `define_registry!`
//!
//! Run with: `cargo run --example property_access`

use universals::{define_properties, define_registry, RegistryApi, RegistryError};

define_registry!(app);

define_properties! {
    /// Well-known application settings.
    trait Settings {
        title,
        theme,
        ready,
    }
}

fn main() -> Result<(), RegistryError> {
    println!("=== universals: Property Access ===\n");

    // -------------------------------------------------------------------------
    // 1. Generated accessors
    // -------------------------------------------------------------------------
    println!("1. Using generated accessors...");

    app::API.set_title("Universals")?;
    app::API.set_theme("dark")?;

    println!("   title = {:?}", app::API.title());
    println!("   theme = {:?}", app::API.theme());
    println!("   ready = {:?} (never set)", app::API.ready());

    // -------------------------------------------------------------------------
    // 2. Runtime names through Property handles
    // -------------------------------------------------------------------------
    println!("\n2. Using property handles...");

    for name in ["retries", "loaded?", "reset!"] {
        app::API.property(name).set(0)?;
        println!("   {name} exists: {}", app::API.property(name).exists());
    }

    match app::API.property("not-a-name").set(1) {
        Ok(_) => println!("   stored not-a-name (unexpected)"),
        Err(e) => println!("   Error (expected): {e}"),
    }

    println!("\n3. Everything stored: {:?}", app::keys());

    println!("\n=== Example Complete ===");
    Ok(())
}
