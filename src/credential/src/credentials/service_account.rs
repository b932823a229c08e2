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

//! [Service Account] credentials.
//!
//! A service account key is a JSON document in the format described by
//! [aip/4112]. It contains the service account email, the project the account
//! belongs to, and an RSA private key. Treat these keys as you would treat any
//! other password.
//!
//! The credentials in this module use [Self-signed JWTs] to bypass the
//! intermediate step of exchanging client assertions for OAuth tokens.
//!
//! ```
//! # use firebase_admin_credential::credentials::service_account::ServiceAccountCredential;
//! let key = serde_json::json!({
//!     "type": "service_account",
//!     "client_email": "test-client-email",
//!     "private_key_id": "test-private-key-id",
//!     "private_key": "", // <-- Provide a valid PKCS#8 PEM key here
//!     "project_id": "test-project-id",
//! });
//! let credential = ServiceAccountCredential::from_json(key)?;
//! assert_eq!(credential.project_id(), "test-project-id");
//! # Ok::<(), firebase_admin_credential::errors::CredentialsError>(())
//! ```
//!
//! [aip/4112]: https://google.aip.dev/auth/4112
//! [Self-signed JWTs]: https://google.aip.dev/auth/4111
//! [Service Account]: https://cloud.google.com/iam/docs/service-account-creds

mod jws;

use crate::Result;
use crate::constants::{FIREBASE_SCOPES, SERVICE_ACCOUNT_TYPE};
use crate::errors::CredentialsError;
use crate::token::{Token, TokenProvider};
use crate::token_cache::TokenCache;
use base64::prelude::{BASE64_URL_SAFE_NO_PAD, Engine as _};
use jws::{CLOCK_SKEW_FUDGE, DEFAULT_TOKEN_TIMEOUT, JwsClaims, JwsHeader};
use rustls::crypto::CryptoProvider;
use rustls::sign::Signer;
use rustls_pemfile::Item;
use std::path::Path;
use time::OffsetDateTime;

/// A representation of a [service account key] in the format described by
/// [aip/4112].
///
/// [aip/4112]: https://google.aip.dev/auth/4112
/// [service account key]: https://cloud.google.com/iam/docs/keys-create-delete#creating
#[derive(serde::Deserialize, Default, Clone, PartialEq)]
pub struct ServiceAccountKey {
    /// The client email address of the service account.
    pub client_email: String,
    /// ID of the service account's private key.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// The PEM-encoded PKCS#8 private key.
    pub private_key: String,
    /// The project id the service account belongs to.
    pub project_id: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"[censored]")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Credentials backed by a service account key.
///
/// These credentials always carry a project id.
#[derive(Clone, Debug)]
pub struct ServiceAccountCredential {
    project_id: String,
    client_email: String,
    token_provider: TokenCache<ServiceAccountTokenProvider>,
}

impl ServiceAccountCredential {
    /// Creates credentials from a parsed service account key.
    ///
    /// Fails if the key has no `project_id` or `client_email`. The private key
    /// is not parsed until the first token is requested.
    pub fn new(key: ServiceAccountKey) -> Result<Self> {
        if key.project_id.is_empty() {
            return Err(CredentialsError::from_msg(
                false,
                "service account key must contain a string \"project_id\" property",
            ));
        }
        if key.client_email.is_empty() {
            return Err(CredentialsError::from_msg(
                false,
                "service account key must contain a string \"client_email\" property",
            ));
        }
        Ok(Self {
            project_id: key.project_id.clone(),
            client_email: key.client_email.clone(),
            token_provider: TokenCache::new(ServiceAccountTokenProvider { key }),
        })
    }

    /// Creates credentials from the JSON contents of a service account key.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match json.get("type").and_then(|t| t.as_str()) {
            None | Some(SERVICE_ACCOUNT_TYPE) => {}
            Some(t) => {
                return Err(CredentialsError::from_msg(
                    false,
                    format!("expected a {SERVICE_ACCOUNT_TYPE} key, found type {t:?}"),
                ));
            }
        }
        let key = serde_json::from_value::<ServiceAccountKey>(json)
            .map_err(|e| CredentialsError::new(false, "cannot parse service account key", e))?;
        Self::new(key)
    }

    /// Creates credentials from a service account key file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await.map_err(|e| {
            CredentialsError::new(
                false,
                format!("cannot read service account key file {}", path.display()),
                e,
            )
        })?;
        let json = serde_json::from_slice::<serde_json::Value>(&contents)
            .map_err(|e| CredentialsError::new(false, "cannot parse service account key", e))?;
        Self::from_json(json)
    }

    /// The project the service account belongs to.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// The service account email.
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub(crate) async fn token(&self) -> Result<Token> {
        self.token_provider.token().await
    }
}

#[derive(Debug)]
struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
}

#[async_trait::async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn token(&self) -> Result<Token> {
        let signer = self.signer()?;

        let expires_at = tokio::time::Instant::now() - CLOCK_SKEW_FUDGE + DEFAULT_TOKEN_TIMEOUT;
        // The claims encode a unix timestamp. `Instant` has no epoch, so we
        // use `time::OffsetDateTime`, which reads system time.
        let now = OffsetDateTime::now_utc() - CLOCK_SKEW_FUDGE;
        let claims = JwsClaims {
            iss: self.key.client_email.clone(),
            scope: FIREBASE_SCOPES.join(" "),
            exp: now + DEFAULT_TOKEN_TIMEOUT,
            iat: now,
            sub: self.key.client_email.clone(),
        };
        let header = JwsHeader {
            alg: "RS256",
            typ: "JWT",
            kid: self.key.private_key_id.as_deref(),
        };
        let encoded_header_claims = format!("{}.{}", header.encode()?, claims.encode()?);
        let sig = signer
            .sign(encoded_header_claims.as_bytes())
            .map_err(|e| CredentialsError::from_source(false, e))?;
        let token = format!(
            "{}.{}",
            encoded_header_claims,
            BASE64_URL_SAFE_NO_PAD.encode(sig)
        );

        Ok(Token {
            token,
            token_type: "Bearer".to_string(),
            expires_at: Some(expires_at),
        })
    }
}

impl ServiceAccountTokenProvider {
    // Creates a signer using the private key stored in the service account key.
    fn signer(&self) -> Result<Box<dyn Signer>> {
        let key_provider = CryptoProvider::get_default().map_or_else(
            || rustls::crypto::ring::default_provider().key_provider,
            |p| p.key_provider,
        );

        let private_key = rustls_pemfile::read_one(&mut self.key.private_key.as_bytes())
            .map_err(|e| CredentialsError::from_source(false, e))?
            .ok_or_else(|| {
                CredentialsError::from_msg(false, "missing PEM section in service account key")
            })?;
        let pk = match private_key {
            Item::Pkcs8Key(item) => key_provider.load_private_key(item.into()),
            other => {
                return Err(CredentialsError::from_msg(
                    false,
                    format!("expected key to be in form of PKCS8, found {other:?}"),
                ));
            }
        };
        let sk = pk.map_err(|e| CredentialsError::from_source(false, e))?;

        sk.choose_scheme(&[rustls::SignatureScheme::RSA_PKCS1_SHA256])
            .ok_or_else(|| {
                CredentialsError::from_msg(
                    false,
                    "unable to choose RSA_PKCS1_SHA256 signing scheme as it is not supported by current signer",
                )
            })
    }
}
