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

//! Credentials for tests.
//!
//! None of these credentials contact a real authorization server.

use firebase_admin_credential::Result;
use firebase_admin_credential::credentials::Credential;
use firebase_admin_credential::credentials::service_account::ServiceAccountCredential;
use firebase_admin_credential::token::{Token, TokenProvider};

/// The token returned by [test_credential].
pub const TEST_TOKEN: &str = "test-only-token";

/// The project id in [test_service_account].
pub const TEST_PROJECT_ID: &str = "test-project-id";

#[derive(Debug)]
struct FixedTokenProvider;

#[async_trait::async_trait]
impl TokenProvider for FixedTokenProvider {
    async fn token(&self) -> Result<Token> {
        Ok(Token {
            token: TEST_TOKEN.to_string(),
            token_type: "Bearer".to_string(),
            expires_at: None,
        })
    }
}

/// A credential that always returns [TEST_TOKEN] and carries no project id.
pub fn test_credential() -> Credential {
    Credential::from_token_provider(FixedTokenProvider)
}

/// A service account credential for [TEST_PROJECT_ID].
///
/// The key has no private key material, requesting a token fails.
pub fn test_service_account() -> ServiceAccountCredential {
    let key = serde_json::json!({
        "type": "service_account",
        "client_email": "test-only@test-project-id.iam.gserviceaccount.com",
        "private_key_id": "test-only-key-id",
        "private_key": "",
        "project_id": TEST_PROJECT_ID,
    });
    ServiceAccountCredential::from_json(key).expect("test service account key is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_token() -> Result<()> {
        let cred = test_credential();
        assert_eq!(cred.token().await?.token, TEST_TOKEN);
        assert_eq!(cred.project_id(), None);
        Ok(())
    }

    #[test]
    fn service_account() {
        assert_eq!(test_service_account().project_id(), TEST_PROJECT_ID);
    }
}
