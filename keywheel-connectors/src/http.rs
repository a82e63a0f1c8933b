//! JSON-over-HTTP credentialed request
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
use crate::traits::CredentialedCall;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Where the API key goes on the outgoing request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CredentialPlacement {
    /// `Authorization: Bearer <key>`
    #[default]
    BearerHeader,
    /// A top-level field of the JSON body, e.g. `api_key`
    BodyField(String),
}

/// A JSON POST request that carries the rotator's key
#[derive(Debug, Clone)]
pub struct HttpJsonRequest {
    client: reqwest::Client,
    url: String,
    body: Value,
    placement: CredentialPlacement,
}

impl HttpJsonRequest {
    pub fn new(client: reqwest::Client, url: impl Into<String>, body: Value) -> Self {
        Self {
            client,
            url: url.into(),
            body,
            placement: CredentialPlacement::default(),
        }
    }

    pub fn with_placement(mut self, placement: CredentialPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Build the request for one attempt with `api_key` attached
    pub fn build_request(&self, api_key: &str) -> Result<reqwest::Request, ProviderError> {
        let mut builder = self.client.post(&self.url);
        let mut body = self.body.clone();

        match &self.placement {
            CredentialPlacement::BearerHeader => {
                builder = builder.bearer_auth(api_key);
            }
            CredentialPlacement::BodyField(field) => {
                let Value::Object(map) = &mut body else {
                    return Err(ProviderError::new(
                        "Request body must be a JSON object to carry the API key",
                    ));
                };
                map.insert(field.clone(), Value::String(api_key.to_string()));
            }
        }

        builder
            .json(&body)
            .build()
            .map_err(ProviderError::from_transport)
    }
}

#[async_trait]
impl CredentialedCall for HttpJsonRequest {
    type Output = Value;

    async fn send(&self, api_key: &str) -> Result<Value, ProviderError> {
        let request = self.build_request(api_key)?;
        debug!(url = %self.url, "Sending credentialed request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http(status.as_u16(), &body));
        }

        response.json().await.map_err(ProviderError::from_transport)
    }
}
