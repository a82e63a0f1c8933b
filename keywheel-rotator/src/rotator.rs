//! Key rotator
//!
//! Holds a pool of interchangeable API keys, hands out the active one and
//! moves past keys the upstream provider has rejected.
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use crate::error::{RotatorError, RotatorResult};
use crate::mask::mask_key;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Mutable rotator state, guarded as a whole by one lock
struct PoolState {
    /// Ordered, distinct credentials
    keys: Vec<String>,
    /// Index of the active key; in range whenever `keys` is non-empty
    current_index: usize,
    /// Keys the provider has rejected
    invalid_keys: HashSet<String>,
    /// Most recent selection time per key
    last_used: HashMap<String, DateTime<Utc>>,
}

impl PoolState {
    fn rotate(&mut self) -> RotatorResult<String> {
        if self.keys.is_empty() {
            return Err(RotatorError::EmptyPool);
        }

        let len = self.keys.len();
        for step in 1..=len {
            let index = (self.current_index + step) % len;
            let candidate = match self.keys.get(index) {
                Some(key) if !self.invalid_keys.contains(key) => key.clone(),
                _ => continue,
            };

            self.current_index = index;
            self.last_used.insert(candidate.clone(), Utc::now());
            debug!(key = %mask_key(&candidate), index, "Rotated to next key");
            return Ok(candidate);
        }

        Err(RotatorError::NoValidKeys)
    }

    fn current_key(&self) -> Option<&String> {
        self.keys.get(self.current_index)
    }

    /// Pooled keys currently flagged invalid
    fn invalid_count(&self) -> usize {
        self.keys
            .iter()
            .filter(|k| self.invalid_keys.contains(*k))
            .count()
    }
}

/// Per-key entry of a [`PoolSnapshot`]
#[derive(Debug, Clone, Serialize)]
pub struct KeyStatus {
    /// Masked credential
    pub key: String,
    pub valid: bool,
    pub current: bool,
    pub last_used: Option<DateTime<Utc>>,
}

/// Point-in-time view of the pool, safe to log or serialize
#[derive(Debug, Clone, Serialize)]
pub struct PoolSnapshot {
    pub pool_size: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub current_index: Option<usize>,
    pub keys: Vec<KeyStatus>,
}

/// Rotates through a pool of equivalent API keys.
///
/// All operations take `&self` and are safe to call from many threads; share
/// one instance per credential pool behind an `Arc`.
pub struct KeyRotator {
    state: Mutex<PoolState>,
}

impl KeyRotator {
    /// Create a rotator seeded with `keys`, in order.
    ///
    /// Repeated entries are collapsed to their first occurrence. An empty
    /// list produces an empty pool.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pool: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if !pool.contains(&key) {
                pool.push(key);
            }
        }

        Self {
            state: Mutex::new(PoolState {
                keys: pool,
                current_index: 0,
                invalid_keys: HashSet::new(),
                last_used: HashMap::new(),
            }),
        }
    }

    /// Return the active key, rotating first if it has been marked invalid
    pub fn get_current_key(&self) -> RotatorResult<String> {
        let mut state = self.state.lock();

        let current = match state.current_key() {
            Some(key) => key.clone(),
            None => return Err(RotatorError::EmptyPool),
        };

        if state.invalid_keys.contains(&current) {
            return state.rotate();
        }

        state.last_used.insert(current.clone(), Utc::now());
        Ok(current)
    }

    /// Advance to the next valid key in cyclic order.
    ///
    /// The pointer is left where it was when no valid key exists.
    pub fn rotate_key(&self) -> RotatorResult<String> {
        self.state.lock().rotate()
    }

    /// Flag `key` as rejected by the provider.
    ///
    /// If it is the active key the rotator moves on immediately. This never
    /// fails: exhausting the pool is logged and reported by the next read.
    pub fn mark_key_as_invalid(&self, key: &str) {
        let mut state = self.state.lock();

        if state.invalid_keys.insert(key.to_string()) {
            warn!(key = %mask_key(key), "Marked key as invalid");
        }

        if state.current_key().map(String::as_str) == Some(key) {
            if let Err(e) = state.rotate() {
                error!(
                    key = %mask_key(key),
                    error = %e,
                    "Failed to rotate to next key"
                );
            }
        }
    }

    /// Append `key` to the pool if absent, treating it as valid
    pub fn add_key(&self, key: &str) {
        let mut state = self.state.lock();
        if state.keys.iter().any(|k| k == key) {
            return;
        }

        state.keys.push(key.to_string());
        state.invalid_keys.remove(key);
        info!(key = %mask_key(key), pool_size = state.keys.len(), "Added key to pool");
    }

    /// Remove `key` from the pool along with its tracked state
    pub fn remove_key(&self, key: &str) {
        let mut state = self.state.lock();
        let Some(index) = state.keys.iter().position(|k| k == key) else {
            return;
        };

        state.keys.remove(index);
        state.last_used.remove(key);
        state.invalid_keys.remove(key);
        if state.current_index >= state.keys.len() {
            state.current_index = 0;
        }

        info!(key = %mask_key(key), pool_size = state.keys.len(), "Removed key from pool");
    }

    /// When `key` was last handed out, if ever
    pub fn get_last_used_time(&self, key: &str) -> Option<DateTime<Utc>> {
        self.state.lock().last_used.get(key).copied()
    }

    pub fn get_all_keys(&self) -> Vec<String> {
        self.state.lock().keys.clone()
    }

    /// Keys not flagged invalid, in pool order
    pub fn get_valid_keys(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .keys
            .iter()
            .filter(|k| !state.invalid_keys.contains(*k))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().keys.is_empty()
    }

    /// Whether the pool holds at least one non-empty credential.
    ///
    /// A pool seeded from an unconfigured environment contains only the
    /// empty-string placeholder.
    pub fn has_configured_credential(&self) -> bool {
        self.state.lock().keys.iter().any(|k| !k.is_empty())
    }

    /// Capture the pool state with every key masked
    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.lock();
        let keys: Vec<KeyStatus> = state
            .keys
            .iter()
            .enumerate()
            .map(|(index, key)| KeyStatus {
                key: mask_key(key),
                valid: !state.invalid_keys.contains(key),
                current: index == state.current_index,
                last_used: state.last_used.get(key).copied(),
            })
            .collect();
        let invalid_count = state.invalid_count();

        PoolSnapshot {
            pool_size: keys.len(),
            valid_count: keys.len() - invalid_count,
            invalid_count,
            current_index: if keys.is_empty() {
                None
            } else {
                Some(state.current_index)
            },
            keys,
        }
    }
}

impl fmt::Debug for KeyRotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("KeyRotator")
            .field("pool_size", &state.keys.len())
            .field("invalid_count", &state.invalid_count())
            .field("current_index", &state.current_index)
            .finish()
    }
}
