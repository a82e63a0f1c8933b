//! Key Rotator Integration Tests

use keywheel_rotator::{KeyRotator, RotatorError};
use std::sync::Arc;
use std::thread;

#[test]
fn test_invalidation_scenario() {
    let rotator = KeyRotator::new(["A", "B", "C"]);

    assert_eq!(rotator.get_current_key().unwrap(), "A");
    rotator.mark_key_as_invalid("A");
    assert_eq!(rotator.get_current_key().unwrap(), "B");
    rotator.mark_key_as_invalid("B");
    assert_eq!(rotator.get_current_key().unwrap(), "C");

    // Exhausting the pool does not fail the mark itself
    rotator.mark_key_as_invalid("C");
    assert_eq!(rotator.get_current_key(), Err(RotatorError::NoValidKeys));
}

#[test]
fn test_error_messages() {
    assert_eq!(RotatorError::EmptyPool.to_string(), "No API keys available");
    assert_eq!(
        RotatorError::NoValidKeys.to_string(),
        "No valid API keys available"
    );
}

#[test]
fn test_rotation_visits_every_valid_key_once_per_cycle() {
    let keys: Vec<String> = (0..10).map(|i| format!("key-{}", i)).collect();
    let rotator = KeyRotator::new(keys.clone());
    rotator.mark_key_as_invalid("key-3");
    rotator.mark_key_as_invalid("key-7");

    let visited: Vec<String> = (0..8).map(|_| rotator.rotate_key().unwrap()).collect();
    let expected: Vec<&str> = vec![
        "key-1", "key-2", "key-4", "key-5", "key-6", "key-8", "key-9", "key-0",
    ];
    assert_eq!(visited, expected);
}

#[test]
fn test_concurrent_reads_never_return_invalid_keys() {
    let rotator = Arc::new(KeyRotator::new(["A", "B", "C", "D"]));
    rotator.mark_key_as_invalid("B");
    rotator.mark_key_as_invalid("D");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let rotator = Arc::clone(&rotator);
            thread::spawn(move || {
                for _ in 0..500 {
                    let key = if i % 2 == 0 {
                        rotator.get_current_key().unwrap()
                    } else {
                        rotator.rotate_key().unwrap()
                    };
                    assert!(key == "A" || key == "C", "unexpected key {}", key);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_invalidation_leaves_survivor_current() {
    let keys: Vec<String> = (0..16).map(|i| format!("key-{}", i)).collect();
    let rotator = Arc::new(KeyRotator::new(keys.clone()));

    let handles: Vec<_> = keys
        .iter()
        .filter(|k| k.as_str() != "key-11")
        .cloned()
        .map(|key| {
            let rotator = Arc::clone(&rotator);
            thread::spawn(move || {
                rotator.mark_key_as_invalid(&key);
                let _ = rotator.get_current_key();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(rotator.get_valid_keys(), vec!["key-11"]);
    assert_eq!(rotator.get_current_key().unwrap(), "key-11");
}

#[test]
fn test_pool_mutation_while_reading() {
    let rotator = Arc::new(KeyRotator::new(["A", "B"]));

    let writer = {
        let rotator = Arc::clone(&rotator);
        thread::spawn(move || {
            for i in 0..200 {
                let key = format!("extra-{}", i % 5);
                rotator.add_key(&key);
                rotator.remove_key(&key);
            }
        })
    };

    for _ in 0..200 {
        let key = rotator.rotate_key().unwrap();
        assert!(!key.is_empty());
    }

    writer.join().unwrap();
    assert_eq!(rotator.get_all_keys(), vec!["A", "B"]);
}
