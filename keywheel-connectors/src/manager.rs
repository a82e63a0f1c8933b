//! Rotating caller
//!
//! Runs credentialed calls against a shared key rotator, retiring keys the
//! provider rejects and retrying with the next one.
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


use crate::error::{ConnectorError, ConnectorResult};
use crate::traits::CredentialedCall;
use keywheel_rotator::{mask_key, KeyRotator, RotatorError};
use std::sync::Arc;
use tracing::{debug, warn};

/// How many keys a single call may try
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed cap on attempts; `None` means one attempt per pooled key
    pub max_attempts: Option<usize>,
}

impl RetryPolicy {
    pub fn new(max_attempts: Option<usize>) -> Self {
        Self { max_attempts }
    }

    /// Attempts allowed for a pool of `pool_size` keys, at least one
    pub fn attempts_for(&self, pool_size: usize) -> usize {
        self.max_attempts.unwrap_or(pool_size).max(1)
    }
}

/// Issues calls with the rotator's current key
pub struct RotatingCaller {
    rotator: Arc<KeyRotator>,
    policy: RetryPolicy,
}

impl RotatingCaller {
    pub fn new(rotator: Arc<KeyRotator>, policy: RetryPolicy) -> Self {
        Self { rotator, policy }
    }

    pub fn rotator(&self) -> &Arc<KeyRotator> {
        &self.rotator
    }

    /// Send `call`, moving to the next key whenever the provider rejects the
    /// current one.
    ///
    /// Failures unrelated to the credential are returned as-is without a
    /// retry. Pool exhaustion surfaces as [`ConnectorError::Rotation`], also
    /// when this call rejected the last valid key. The empty placeholder key
    /// is never sent.
    pub async fn call<C>(&self, call: &C) -> ConnectorResult<C::Output>
    where
        C: CredentialedCall + ?Sized,
    {
        let attempts = self.policy.attempts_for(self.rotator.len());

        for attempt in 1..=attempts {
            let key = self.rotator.get_current_key()?;
            if key.is_empty() {
                return Err(ConnectorError::NoCredentialConfigured);
            }

            match call.send(&key).await {
                Ok(output) => {
                    if attempt > 1 {
                        debug!(attempt, "Request succeeded after key rotation");
                    }
                    return Ok(output);
                }
                Err(e) if e.is_invalid_credential() => {
                    warn!(
                        key = %mask_key(&key),
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Provider rejected API key"
                    );
                    self.rotator.mark_key_as_invalid(&key);
                }
                Err(e) => return Err(ConnectorError::Provider(e)),
            }
        }

        if self.rotator.get_valid_keys().is_empty() {
            return Err(ConnectorError::Rotation(RotatorError::NoValidKeys));
        }
        Err(ConnectorError::AttemptsExhausted { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ProviderError;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Accepts only `good_key`; everything else gets a 403
    struct FakeProvider {
        good_key: String,
        seen: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn accepting(good_key: &str) -> Self {
            Self {
                good_key: good_key.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CredentialedCall for FakeProvider {
        type Output = String;

        async fn send(&self, api_key: &str) -> Result<String, ProviderError> {
            self.seen.lock().await.push(api_key.to_string());
            if api_key == self.good_key {
                Ok(format!("ok:{}", api_key))
            } else {
                Err(ProviderError::new("Forbidden").with_status(403))
            }
        }
    }

    /// Always fails with a server error
    struct BrokenProvider;

    #[async_trait]
    impl CredentialedCall for BrokenProvider {
        type Output = ();

        async fn send(&self, _api_key: &str) -> Result<(), ProviderError> {
            Err(ProviderError::new("Internal Server Error").with_status(500))
        }
    }

    fn caller(keys: &[&str], policy: RetryPolicy) -> RotatingCaller {
        RotatingCaller::new(Arc::new(KeyRotator::new(keys.iter().copied())), policy)
    }

    #[test]
    fn test_retry_policy_attempts() {
        assert_eq!(RetryPolicy::default().attempts_for(3), 3);
        assert_eq!(RetryPolicy::default().attempts_for(0), 1);
        assert_eq!(RetryPolicy::new(Some(2)).attempts_for(5), 2);
    }

    #[tokio::test]
    async fn test_first_key_succeeds() {
        let caller = caller(&["A", "B"], RetryPolicy::default());
        let provider = FakeProvider::accepting("A");

        assert_eq!(caller.call(&provider).await.unwrap(), "ok:A");
        assert_eq!(*provider.seen.lock().await, vec!["A"]);
        assert_eq!(caller.rotator().get_valid_keys(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_rejected_keys_are_retired() {
        let caller = caller(&["A", "B", "C"], RetryPolicy::default());
        let provider = FakeProvider::accepting("C");

        assert_eq!(caller.call(&provider).await.unwrap(), "ok:C");
        assert_eq!(*provider.seen.lock().await, vec!["A", "B", "C"]);
        assert_eq!(caller.rotator().get_valid_keys(), vec!["C"]);

        // Later calls go straight to the surviving key
        assert_eq!(caller.call(&provider).await.unwrap(), "ok:C");
        assert_eq!(provider.seen.lock().await.len(), 4);
    }

    #[tokio::test]
    async fn test_all_keys_rejected() {
        let caller = caller(&["A", "B"], RetryPolicy::default());
        let provider = FakeProvider::accepting("Z");

        let error = caller.call(&provider).await.unwrap_err();
        assert!(matches!(error, ConnectorError::Rotation(RotatorError::NoValidKeys)));
        assert_eq!(provider.seen.lock().await.len(), 2);

        let error = caller.call(&provider).await.unwrap_err();
        assert!(matches!(error, ConnectorError::Rotation(RotatorError::NoValidKeys)));
        assert_eq!(provider.seen.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_placeholder_key_is_never_sent() {
        let caller = caller(&[""], RetryPolicy::default());
        let provider = FakeProvider::accepting("A");

        let error = caller.call(&provider).await.unwrap_err();
        assert!(matches!(error, ConnectorError::NoCredentialConfigured));
        assert!(provider.seen.lock().await.is_empty());
        assert_eq!(caller.rotator().get_valid_keys(), vec![""]);
    }

    #[tokio::test]
    async fn test_attempt_cap() {
        let caller = caller(&["A", "B", "C"], RetryPolicy::new(Some(1)));
        let provider = FakeProvider::accepting("C");

        let error = caller.call(&provider).await.unwrap_err();
        assert!(matches!(error, ConnectorError::AttemptsExhausted { attempts: 1 }));
        assert_eq!(caller.rotator().get_valid_keys(), vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let caller = caller(&["A", "B"], RetryPolicy::default());

        let error = caller.call(&BrokenProvider).await.unwrap_err();
        assert!(matches!(error, ConnectorError::Provider(ref e) if e.status == Some(500)));
        assert!(!error.is_invalid_credential());
        assert_eq!(caller.rotator().get_valid_keys(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_empty_pool() {
        let caller = caller(&[], RetryPolicy::default());
        let error = caller.call(&BrokenProvider).await.unwrap_err();
        assert!(matches!(error, ConnectorError::Rotation(RotatorError::EmptyPool)));
    }
}
