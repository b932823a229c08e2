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

//! A client for the Compute Engine Metadata Service (MDS).

use crate::Result;
use crate::errors::{self, CredentialsError};
use crate::token::Token;
use reqwest::RequestBuilder;
use std::time::Duration;
use tokio::time::Instant;

pub(crate) const METADATA_ROOT: &str = "http://metadata.google.internal";
pub(crate) const METADATA_FLAVOR: &str = "metadata-flavor";
pub(crate) const METADATA_FLAVOR_VALUE: &str = "Google";
pub(crate) const GCE_METADATA_HOST_ENV_VAR: &str = "GCE_METADATA_HOST";

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
const PROJECT_ID_PATH: &str = "/computeMetadata/v1/project/project-id";

#[derive(Clone, Debug)]
pub(crate) struct Client {
    endpoint: String,
    inner: reqwest::Client,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub(crate) struct MdsTokenResponse {
    pub(crate) access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expires_in: Option<u64>,
    pub(crate) token_type: String,
}

impl Client {
    /// Creates a new client, `GCE_METADATA_HOST` takes precedence over the
    /// endpoint override.
    pub(crate) fn new(endpoint_override: Option<String>) -> Self {
        let endpoint = match std::env::var(GCE_METADATA_HOST_ENV_VAR) {
            Ok(host) if !host.is_empty() => format!("http://{host}"),
            _ => endpoint_override.unwrap_or_else(|| METADATA_ROOT.to_string()),
        };
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            inner: reqwest::Client::new(),
        }
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.inner
            .get(format!("{}{path}", self.endpoint))
            .header(METADATA_FLAVOR, METADATA_FLAVOR_VALUE)
    }

    /// Fetches an access token for the default service account.
    pub(crate) async fn access_token(&self) -> Result<Token> {
        let error_message = "failed to fetch access token from the metadata server";
        let response = self.send(self.get(TOKEN_PATH), error_message).await?;
        let response = response.json::<MdsTokenResponse>().await.map_err(|e| {
            // Decoding errors are not transient. Typically they indicate a badly
            // configured MDS endpoint.
            CredentialsError::new(!e.is_decode(), error_message, e)
        })?;
        Ok(Token {
            token: response.access_token,
            token_type: response.token_type,
            expires_at: response
                .expires_in
                .map(|d| Instant::now() + Duration::from_secs(d)),
        })
    }

    /// Fetches the id of the project hosting the workload.
    pub(crate) async fn project_id(&self) -> Result<String> {
        let error_message = "failed to fetch project id from the metadata server";
        let response = self.send(self.get(PROJECT_ID_PATH), error_message).await?;
        let project_id = response
            .text()
            .await
            .map_err(|e| CredentialsError::new(!e.is_decode(), error_message, e))?;
        Ok(project_id.trim().to_string())
    }

    async fn send(
        &self,
        request: RequestBuilder,
        error_message: &str,
    ) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| errors::from_http_error(e, error_message))?;
        if !response.status().is_success() {
            return Err(errors::from_http_response(response, error_message).await);
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use scoped_env::ScopedEnv;
    use serial_test::{parallel, serial};

    fn client(server: &Server) -> Client {
        Client::new(Some(format!("http://{}", server.addr())))
    }

    #[tokio::test]
    #[parallel]
    async fn access_token_success() -> anyhow::Result<()> {
        let server = Server::run();
        let response = MdsTokenResponse {
            access_token: "test-token".to_string(),
            expires_in: Some(3600),
            token_type: "Bearer".to_string(),
        };
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", TOKEN_PATH),
                request::headers(contains((METADATA_FLAVOR, METADATA_FLAVOR_VALUE))),
            ])
            .respond_with(json_encoded(response)),
        );

        let token = client(&server).access_token().await?;
        assert_eq!(token.token, "test-token");
        assert_eq!(token.token_type, "Bearer");
        assert!(token.expires_at.is_some(), "{token:?}");
        Ok(())
    }

    #[tokio::test]
    #[parallel]
    async fn access_token_without_expiration() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", TOKEN_PATH)).respond_with(
                json_encoded(serde_json::json!({"access_token": "t", "token_type": "Bearer"})),
            ),
        );
        let token = client(&server).access_token().await?;
        assert!(token.expires_at.is_none(), "{token:?}");
        Ok(())
    }

    #[tokio::test]
    #[parallel]
    async fn access_token_http_error() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", TOKEN_PATH))
                .respond_with(status_code(503).body("try again")),
        );
        let err = client(&server).access_token().await.unwrap_err();
        assert!(err.is_transient(), "{err:?}");
        assert!(err.to_string().contains("try again"), "{err}");
    }

    #[tokio::test]
    #[parallel]
    async fn access_token_bad_payload() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", TOKEN_PATH))
                .respond_with(status_code(200).body("<html>not json</html>")),
        );
        let err = client(&server).access_token().await.unwrap_err();
        assert!(!err.is_transient(), "{err:?}");
    }

    #[tokio::test]
    #[parallel]
    async fn project_id_success() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", PROJECT_ID_PATH),
                request::headers(contains((METADATA_FLAVOR, METADATA_FLAVOR_VALUE))),
            ])
            .respond_with(status_code(200).body("test-project\n")),
        );
        let project_id = client(&server).project_id().await?;
        assert_eq!(project_id, "test-project");
        Ok(())
    }

    #[tokio::test]
    #[parallel]
    async fn project_id_not_found() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", PROJECT_ID_PATH))
                .respond_with(status_code(404)),
        );
        let err = client(&server).project_id().await.unwrap_err();
        assert!(!err.is_transient(), "{err:?}");
    }

    #[test]
    #[serial]
    fn endpoint_resolution() {
        let _e = ScopedEnv::remove(GCE_METADATA_HOST_ENV_VAR);
        assert_eq!(Client::new(None).endpoint(), METADATA_ROOT);
        assert_eq!(
            Client::new(Some("http://localhost:1234/".to_string())).endpoint(),
            "http://localhost:1234"
        );

        let _e = ScopedEnv::set(GCE_METADATA_HOST_ENV_VAR, "metadata.test:8080");
        assert_eq!(
            Client::new(Some("http://localhost:1234".to_string())).endpoint(),
            "http://metadata.test:8080"
        );
    }
}
