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

//! Types and functions to work with credentials.

pub mod compute_engine;
pub mod service_account;

use crate::Result;
use crate::constants::GOOGLE_APPLICATION_CREDENTIALS;
use crate::errors::CredentialsError;
use crate::token::{Token, TokenProvider};
use compute_engine::ComputeEngineCredential;
use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderValue};
use service_account::ServiceAccountCredential;
use std::sync::Arc;

/// The credentials used by a Firebase app.
///
/// Each variant states whether it carries a project id: service account keys
/// always do, the metadata server can be queried for one, and custom token
/// providers never do.
#[derive(Clone, Debug)]
pub enum Credential {
    /// A service account key.
    ServiceAccount(ServiceAccountCredential),
    /// The Compute Engine metadata server.
    ComputeEngine(ComputeEngineCredential),
    /// An application-provided source of access tokens.
    Custom(Arc<dyn TokenProvider>),
}

impl Credential {
    /// Finds credentials using [Application Default Credentials].
    ///
    /// If `GOOGLE_APPLICATION_CREDENTIALS` names a file, the file must contain
    /// a service account key. Otherwise the credentials use the metadata
    /// server, which is only available when running on Google Cloud.
    ///
    /// [Application Default Credentials]: https://google.aip.dev/auth/4110
    pub async fn application_default() -> Result<Self> {
        match std::env::var(GOOGLE_APPLICATION_CREDENTIALS) {
            Ok(path) if !path.is_empty() => {
                tracing::debug!(%path, "loading credentials from {GOOGLE_APPLICATION_CREDENTIALS}");
                let cred = ServiceAccountCredential::from_file(&path).await?;
                Ok(Self::ServiceAccount(cred))
            }
            _ => {
                tracing::debug!("using credentials from the metadata server");
                Ok(Self::ComputeEngine(ComputeEngineCredential::new()))
            }
        }
    }

    /// Wraps an application-provided token source.
    pub fn from_token_provider<T: TokenProvider + 'static>(provider: T) -> Self {
        Self::Custom(Arc::new(provider))
    }

    /// Returns the project id embedded in the credentials, if any.
    ///
    /// Only service account keys embed a project id. Use
    /// [ComputeEngineCredential::project_id] to query the metadata server.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::ServiceAccount(c) => Some(c.project_id()),
            Self::ComputeEngine(_) | Self::Custom(_) => None,
        }
    }

    /// Returns an access token, refreshing it if needed.
    pub async fn token(&self) -> Result<Token> {
        match self {
            Self::ServiceAccount(c) => c.token().await,
            Self::ComputeEngine(c) => c.token().await,
            Self::Custom(p) => p.token().await,
        }
    }

    /// Returns the headers used to authenticate a request.
    pub async fn headers(&self) -> Result<HeaderMap> {
        let token = self.token().await?;
        let mut value = HeaderValue::from_str(&format!("{} {}", token.token_type, token.token))
            .map_err(|e| CredentialsError::from_source(false, e))?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

impl From<ServiceAccountCredential> for Credential {
    fn from(value: ServiceAccountCredential) -> Self {
        Self::ServiceAccount(value)
    }
}

impl From<ComputeEngineCredential> for Credential {
    fn from(value: ComputeEngineCredential) -> Self {
        Self::ComputeEngine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tests::MockTokenProvider;
    use scoped_env::ScopedEnv;
    use serial_test::{parallel, serial};

    type TestResult = anyhow::Result<()>;

    fn mock_provider(token: &'static str) -> MockTokenProvider {
        let mut mock = MockTokenProvider::new();
        mock.expect_token().returning(move || {
            Ok(Token {
                token: token.to_string(),
                token_type: "Bearer".to_string(),
                expires_at: None,
            })
        });
        mock
    }

    #[tokio::test]
    #[parallel]
    async fn custom_headers() -> TestResult {
        let cred = Credential::from_token_provider(mock_provider("test-token"));
        let headers = cred.headers().await?;
        let value = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value, "Bearer test-token");
        assert!(value.is_sensitive(), "{value:?}");
        assert_eq!(headers.len(), 1, "{headers:?}");
        Ok(())
    }

    #[tokio::test]
    #[parallel]
    async fn custom_headers_error() {
        let mut mock = MockTokenProvider::new();
        mock.expect_token()
            .times(1)
            .returning(|| Err(CredentialsError::from_msg(true, "test-only")));
        let cred = Credential::from_token_provider(mock);
        let err = cred.headers().await.unwrap_err();
        assert!(err.is_transient(), "{err:?}");
    }

    #[tokio::test]
    #[parallel]
    async fn invalid_header_value() {
        let cred = Credential::from_token_provider(mock_provider("bad\ntoken"));
        let err = cred.headers().await.unwrap_err();
        assert!(!err.is_transient(), "{err:?}");
    }

    #[test]
    #[parallel]
    fn project_id_by_variant() -> TestResult {
        let sa = ServiceAccountCredential::from_json(
            service_account::tests::service_account_json(String::new()),
        )?;
        assert_eq!(Credential::from(sa).project_id(), Some("test-project-id"));

        let ce = ComputeEngineCredential::with_endpoint("http://localhost:1");
        assert_eq!(Credential::from(ce).project_id(), None);

        let custom = Credential::from_token_provider(MockTokenProvider::new());
        assert_eq!(custom.project_id(), None);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn application_default_service_account() -> TestResult {
        let file = tempfile::NamedTempFile::new()?;
        std::fs::write(
            file.path(),
            service_account::tests::service_account_json(String::new()).to_string(),
        )?;
        let _e = ScopedEnv::set(GOOGLE_APPLICATION_CREDENTIALS, file.path().to_str().unwrap());
        let cred = Credential::application_default().await?;
        assert!(matches!(cred, Credential::ServiceAccount(_)), "{cred:?}");
        assert_eq!(cred.project_id(), Some("test-project-id"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn application_default_missing_file() {
        let _e = ScopedEnv::set(GOOGLE_APPLICATION_CREDENTIALS, "/does/not/exist.json");
        let err = Credential::application_default().await.unwrap_err();
        assert!(err.to_string().contains("/does/not/exist.json"), "{err}");
    }

    #[tokio::test]
    #[serial]
    async fn application_default_metadata_server() -> TestResult {
        let _e = ScopedEnv::remove(GOOGLE_APPLICATION_CREDENTIALS);
        let cred = Credential::application_default().await?;
        assert!(matches!(cred, Credential::ComputeEngine(_)), "{cred:?}");
        Ok(())
    }
}
