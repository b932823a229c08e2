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

use crate::Result;
use crate::token::{Token, TokenProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
// Using tokio's wrapper makes the cache testable without relying on clock times.
use tokio::time::Instant;

// Tokens are refreshed slightly before they expire, so a request started with
// a cached token does not reach the service with an expired one.
const EXPIRATION_MARGIN: Duration = Duration::from_secs(10);

/// Wraps a token provider and reuses its tokens until they expire.
///
/// Concurrent callers wait for a single refresh. Errors are not cached, the
/// next call attempts a new refresh.
#[derive(Debug)]
pub(crate) struct TokenCache<T>
where
    T: TokenProvider,
{
    token: Arc<Mutex<Option<Token>>>,
    inner: Arc<T>,
}

// We manually implement `Clone` because deriving it would require `T: Clone`,
// even though we only hold an `Arc<T>`.
impl<T: TokenProvider> Clone for TokenCache<T> {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
            inner: self.inner.clone(),
        }
    }
}

fn is_valid(token: &Token) -> bool {
    token
        .expires_at
        .is_none_or(|e| e > Instant::now() + EXPIRATION_MARGIN)
}

impl<T: TokenProvider> TokenCache<T> {
    pub(crate) fn new(inner: T) -> Self {
        Self {
            token: Arc::new(Mutex::new(None)),
            inner: Arc::new(inner),
        }
    }
}

#[async_trait::async_trait]
impl<T: TokenProvider + 'static> TokenProvider for TokenCache<T> {
    async fn token(&self) -> Result<Token> {
        // Holding the lock during the refresh serializes concurrent refreshes.
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| is_valid(t)) {
            return Ok(token.clone());
        }
        tracing::debug!("refreshing access token");
        let token = self.inner.token().await?;
        *guard = Some(token.clone());
        Ok(token)
    }
}
