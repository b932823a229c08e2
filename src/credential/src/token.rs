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

//! Access tokens and the trait implemented by their sources.

use crate::Result;
use tokio::time::Instant;

/// An OAuth2 access token.
#[derive(Clone, PartialEq)]
pub struct Token {
    /// The value used in the `Authorization:` header.
    pub token: String,

    /// The type of the token, typically `"Bearer"`.
    pub token_type: String,

    /// The instant at which the token expires.
    ///
    /// If `None`, the token does not expire.
    pub expires_at: Option<Instant>,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token", &"[censored]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A source of access tokens.
///
/// Applications implement this trait to plug their own token source into a
/// [Credential::Custom][crate::credentials::Credential::Custom]. Such
/// credentials carry no project id.
///
/// # Example
/// ```
/// # use firebase_admin_credential::token::{Token, TokenProvider};
/// # use firebase_admin_credential::Result;
/// #[derive(Debug)]
/// struct Fixed(String);
///
/// #[async_trait::async_trait]
/// impl TokenProvider for Fixed {
///     async fn token(&self) -> Result<Token> {
///         Ok(Token { token: self.0.clone(), token_type: "Bearer".into(), expires_at: None })
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait TokenProvider: std::fmt::Debug + Send + Sync {
    /// Returns a token, refreshing it if needed.
    async fn token(&self) -> Result<Token>;
}
