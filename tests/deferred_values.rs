//! Integration tests for deferred values.
//!
//! A deferred entry is a thunk that runs on the first `get` of its key; the
//! result then replaces the thunk in place. Iteration and value snapshots see
//! whatever is stored at the time, so an unread thunk shows up as
//! `Entry::Deferred`. A thunk that panics caches nothing and runs again on
//! the next read.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use universals::{Deferred, Entry, Registry, RegistryApi, RegistryError};

fn counting(calls: &Arc<AtomicUsize>, result: Value) -> impl Fn() -> Value + Send + Sync + 'static {
    let calls = calls.clone();
    move || {
        calls.fetch_add(1, Ordering::SeqCst);
        result.clone()
    }
}

#[test]
fn test_thunk_runs_exactly_once() -> Result<(), RegistryError> {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));

    registry.set_deferred("x", counting(&calls, json!("Y")))?;

    assert_eq!(registry.get("x"), Some(json!("Y")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.get("x"), Some(json!("Y")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    Ok(())
}

#[test]
fn test_each_yields_unresolved_thunks() -> Result<(), RegistryError> {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));

    registry.set("plain", 1)?;
    registry.set_deferred("lazy", counting(&calls, json!(2)))?;

    let entries: Vec<(String, Entry)> = registry.each().collect();
    assert_eq!(entries[0], ("plain".to_string(), Entry::from(1)));
    assert!(entries[1].1.is_deferred());
    assert!(registry.values()[1].is_deferred());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let _ = registry.get("lazy");
    assert_eq!(registry.values()[1], json!(2));

    Ok(())
}

#[test]
fn test_key_for_ignores_unresolved_thunks() -> Result<(), RegistryError> {
    let registry = Registry::new();

    registry.set_deferred("lazy", || json!(7))?;
    registry.set("eager", 7)?;

    assert_eq!(registry.key_for(&json!(7)).as_deref(), Some("eager"));

    let _ = registry.get("lazy");
    assert_eq!(registry.key_for(&json!(7)).as_deref(), Some("lazy"));

    Ok(())
}

#[test]
fn test_reassigning_resets_the_key() -> Result<(), RegistryError> {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));

    registry.set_deferred("x", counting(&calls, json!(1)))?;
    let _ = registry.get("x");

    registry.set_deferred("x", counting(&calls, json!(2)))?;
    assert!(registry.values()[0].is_deferred());
    assert_eq!(registry.get("x"), Some(json!(2)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    Ok(())
}

#[test]
fn test_shared_deferred_handle() -> Result<(), RegistryError> {
    let a = Registry::new();
    let b = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let deferred = Deferred::new(counting(&calls, json!("shared")));

    a.set("value", deferred.clone())?;
    b.set("value", deferred.clone())?;

    assert_eq!(a.get("value"), Some(json!("shared")));
    assert_eq!(b.get("value"), Some(json!("shared")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(deferred.is_resolved());

    Ok(())
}

#[test]
fn test_clear_during_resolution() -> Result<(), RegistryError> {
    let registry = Arc::new(Registry::new());
    let inner = registry.clone();

    registry.set_deferred("x", move || {
        inner.clear();
        json!("late")
    })?;

    assert_eq!(registry.get("x"), Some(json!("late")));
    assert!(!registry.has("x"));

    Ok(())
}

#[test]
fn test_concurrent_first_reads() -> Result<(), RegistryError> {
    let registry = Arc::new(Registry::new());
    let calls = Arc::new(AtomicUsize::new(0));
    registry.set_deferred("config", counting(&calls, json!({"workers": 4})))?;

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.get("config")
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(json!({"workers": 4})));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.values(), vec![Entry::Value(json!({"workers": 4}))]);

    Ok(())
}

#[test]
fn test_set_all_accepts_deferred_entries() -> Result<(), RegistryError> {
    let registry = Registry::new();

    registry.set_all([
        ("now", Entry::from(1)),
        ("later", Entry::from(Deferred::new(|| json!(2)))),
    ])?;

    assert!(!registry.values()[0].is_deferred());
    assert!(registry.values()[1].is_deferred());
    assert_eq!(registry.get("later"), Some(json!(2)));

    Ok(())
}

#[test]
fn test_failed_thunk_runs_again() -> Result<(), RegistryError> {
    let registry = Registry::new();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();

    registry.set_deferred("settings", move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        assert!(attempt >= 2, "settings file missing");
        json!({"attempt": attempt})
    })?;

    for _ in 0..2 {
        let read = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| registry.get("settings")));
        assert!(read.is_err());
        assert!(registry.values()[0].is_deferred());
    }

    assert_eq!(registry.get("settings"), Some(json!({"attempt": 2})));
    assert_eq!(registry.get("settings"), Some(json!({"attempt": 2})));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    Ok(())
}

#[test]
fn test_failed_thunk_leaves_registry_usable() -> Result<(), RegistryError> {
    let registry = Arc::new(Registry::new());
    registry.set("before", 1)?;
    registry.set_deferred("broken", || panic!("cannot compute"))?;

    let worker = registry.clone();
    let joined = thread::spawn(move || worker.get("broken")).join();
    assert!(joined.is_err());

    registry.set("after", 2)?;
    assert_eq!(registry.keys(), vec!["before", "broken", "after"]);
    assert!(registry.values()[1].is_deferred());

    Ok(())
}
