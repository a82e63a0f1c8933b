//! Trait definitions for credentialed calls
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


use async_trait::async_trait;
use crate::classify::ProviderError;

/// An outbound request that needs an API key attached.
///
/// Implementations send one attempt with the given key and report the
/// provider's failure as a [`ProviderError`] so the caller can tell a
/// rejected key apart from other failures.
#[async_trait]
pub trait CredentialedCall: Send + Sync {
    /// Successful response type
    type Output: Send;

    /// Send the request using `api_key`
    async fn send(&self, api_key: &str) -> Result<Self::Output, ProviderError>;
}
