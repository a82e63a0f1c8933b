//! Service integration helpers for wiring a rotator into a service
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


use crate::rotator::KeyRotator;
use keywheel_config::{AppConfig, ConfigError, KeyPoolConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the long-lived rotator for a service from its key pool config.
///
/// Call once at startup and hand the `Arc` to every component that issues
/// outbound requests.
pub fn init_key_rotator(config: &KeyPoolConfig) -> Arc<KeyRotator> {
    let rotator = KeyRotator::new(config.keys.iter().cloned());

    if rotator.has_configured_credential() {
        info!(
            keys_var = %config.keys_var,
            pool_size = rotator.len(),
            "Initialized key rotator"
        );
    } else {
        warn!(
            keys_var = %config.keys_var,
            key_var = %config.key_var,
            "No API key configured, rotator holds an empty placeholder"
        );
    }

    Arc::new(rotator)
}

/// Load configuration from the environment and build the rotator
pub fn key_rotator_from_env() -> Result<Arc<KeyRotator>, ConfigError> {
    let config = AppConfig::from_env()?;
    Ok(init_key_rotator(&config.key_pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(keys: &[&str]) -> KeyPoolConfig {
        KeyPoolConfig {
            keys_var: "TAVILY_API_KEYS".to_string(),
            key_var: "TAVILY_API_KEY".to_string(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_init_key_rotator_preserves_order() {
        let rotator = init_key_rotator(&pool(&["k1", "k2"]));
        assert_eq!(rotator.get_all_keys(), vec!["k1", "k2"]);
        assert_eq!(rotator.get_current_key().unwrap(), "k1");
    }

    #[test]
    fn test_init_key_rotator_with_placeholder() {
        let rotator = init_key_rotator(&pool(&[""]));
        assert!(!rotator.has_configured_credential());
        assert_eq!(rotator.get_current_key().unwrap(), "");
    }
}
