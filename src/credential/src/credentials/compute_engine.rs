// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Credentials for workloads running on Google Cloud.
//!
//! Compute Engine, GKE, Cloud Run and similar environments expose a metadata
//! server. These credentials fetch access tokens for the default service
//! account, and the project id, from that server.

use crate::Result;
use crate::mds::Client;
use crate::token::{Token, TokenProvider};
use crate::token_cache::TokenCache;

/// Credentials backed by the Compute Engine metadata server.
#[derive(Clone, Debug)]
pub struct ComputeEngineCredential {
    client: Client,
    token_provider: TokenCache<MdsTokenProvider>,
}

impl ComputeEngineCredential {
    /// Creates credentials using the default metadata server.
    ///
    /// The `GCE_METADATA_HOST` environment variable overrides the host.
    pub fn new() -> Self {
        Self::from_client(Client::new(None))
    }

    /// Creates credentials using a custom metadata server endpoint, such as
    /// `http://localhost:8080`.
    pub fn with_endpoint<S: Into<String>>(endpoint: S) -> Self {
        Self::from_client(Client::new(Some(endpoint.into())))
    }

    fn from_client(client: Client) -> Self {
        Self {
            token_provider: TokenCache::new(MdsTokenProvider {
                client: client.clone(),
            }),
            client,
        }
    }

    /// Fetches the project id from the metadata server.
    ///
    /// Returns `Ok(None)` if the metadata server reports an empty value.
    pub async fn project_id(&self) -> Result<Option<String>> {
        let id = self.client.project_id().await?;
        Ok(Some(id).filter(|s| !s.is_empty()))
    }

    pub(crate) async fn token(&self) -> Result<Token> {
        self.token_provider.token().await
    }
}

impl Default for ComputeEngineCredential {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct MdsTokenProvider {
    client: Client,
}

#[async_trait::async_trait]
impl TokenProvider for MdsTokenProvider {
    async fn token(&self) -> Result<Token> {
        self.client.access_token().await
    }
}
