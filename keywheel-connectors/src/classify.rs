//! Classification of upstream failures caused by a rejected API key
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


use crate::error::ConnectorError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// Error code providers use for a rejected key
pub const INVALID_API_KEY_CODE: &str = "invalid_api_key";

const FORBIDDEN: u16 = 403;

/// Error payload returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// HTTP response attached to a provider error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    pub data: Option<ProviderErrorBody>,
}

/// A failed call to the upstream provider
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub response: Option<ProviderResponse>,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_response(mut self, response: ProviderResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// Build an error from a non-success HTTP status and its body.
    ///
    /// A JSON body is decoded into [`ProviderErrorBody`]; anything else is
    /// kept as the message.
    pub fn from_http(status: u16, body: &str) -> Self {
        let data = serde_json::from_str::<ProviderErrorBody>(body).ok();

        let message = data
            .as_ref()
            .and_then(|d| d.message.clone())
            .or_else(|| {
                let text = body.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .unwrap_or_else(|| format!("HTTP {}", status));
        let code = data.as_ref().and_then(|d| d.code.clone());

        Self {
            response: Some(ProviderResponse { status, data }),
            status: Some(status),
            code,
            message,
        }
    }

    /// Wrap a transport-level failure (connect, timeout, decode)
    pub fn from_transport(error: reqwest::Error) -> Self {
        Self {
            status: error.status().map(|s| s.as_u16()),
            message: error.to_string(),
            ..Default::default()
        }
    }

    /// Whether the provider rejected the credential.
    ///
    /// Checked in order: response status, top-level status, error code,
    /// then the message text.
    pub fn is_invalid_credential(&self) -> bool {
        self.response.as_ref().map(|r| r.status) == Some(FORBIDDEN)
            || self.status == Some(FORBIDDEN)
            || self.code.as_deref() == Some(INVALID_API_KEY_CODE)
            || mentions_api_key(&self.message)
    }
}

fn mentions_api_key(message: &str) -> bool {
    message.to_lowercase().contains("api key")
}

/// Decide whether an arbitrary error means the API key was rejected.
///
/// Known error types anywhere in the source chain are inspected
/// structurally; otherwise the top-level message is checked.
pub fn is_invalid_credential_error(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        if let Some(e) = e.downcast_ref::<ProviderError>() {
            if e.is_invalid_credential() {
                return true;
            }
        } else if let Some(e) = e.downcast_ref::<ConnectorError>() {
            if e.is_invalid_credential() {
                return true;
            }
        } else if let Some(e) = e.downcast_ref::<reqwest::Error>() {
            if e.status() == Some(StatusCode::FORBIDDEN) {
                return true;
            }
        }
        current = e.source();
    }

    mentions_api_key(&error.to_string())
}
