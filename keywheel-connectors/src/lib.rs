//! Credentialed connectors
//!
//! Caller-side pieces around a [`KeyRotator`](keywheel_rotator::KeyRotator):
//! - classifying upstream failures that mean "this API key was rejected"
//! - the [`CredentialedCall`] seam for one attempt with one key
//! - [`RotatingCaller`], which retires rejected keys and retries
//! - [`HttpJsonRequest`], a reqwest-backed JSON POST
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


pub mod classify;
pub mod error;
pub mod http;
pub mod manager;
pub mod traits;

pub use classify::{is_invalid_credential_error, ProviderError, ProviderErrorBody, ProviderResponse};
pub use error::{ConnectorError, ConnectorResult};
pub use http::{CredentialPlacement, HttpJsonRequest};
pub use manager::{RetryPolicy, RotatingCaller};
pub use traits::CredentialedCall;
