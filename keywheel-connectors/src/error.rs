//! Error types for credentialed connectors
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


use crate::classify::ProviderError;
use keywheel_rotator::RotatorError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Key rotation failed: {0}")]
    Rotation(#[from] RotatorError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("No API key configured")]
    NoCredentialConfigured,

    #[error("Gave up after {attempts} attempts with rejected API keys")]
    AttemptsExhausted { attempts: usize },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConnectorError {
    /// Whether this error means the provider rejected the credential
    pub fn is_invalid_credential(&self) -> bool {
        match self {
            ConnectorError::Provider(e) => e.is_invalid_credential(),
            ConnectorError::Http(e) => e.status() == Some(StatusCode::FORBIDDEN),
            _ => false,
        }
    }
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;
