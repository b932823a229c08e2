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

//! The HTTP transport for the Instance ID service.

use crate::Error;
use crate::errors::ServiceError;
use firebase_admin_app::App;
use std::sync::LazyLock;

/// The production endpoint for the Instance ID service.
pub(crate) const DEFAULT_ENDPOINT: &str = "https://console.firebase.google.com";

const CLIENT_HEADER: &str = "x-firebase-client";

static CLIENT_HEADER_VALUE: LazyLock<String> =
    LazyLock::new(|| format!("fire-admin-rust/{}", env!("CARGO_PKG_VERSION")));

const ENCODED_CHARS: percent_encoding::AsciiSet = percent_encoding::CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent encode a single path segment.
pub(crate) fn enc(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, &ENCODED_CHARS).to_string()
}

/// Sends authenticated requests to the Instance ID service.
#[derive(Clone, Debug)]
pub(crate) struct ReqwestClient {
    inner: reqwest::Client,
    endpoint: String,
}

impl ReqwestClient {
    pub(crate) fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self {
            inner: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a request with no body, returning an error for non-2xx responses.
    pub(crate) async fn execute(
        &self,
        app: &App,
        method: reqwest::Method,
        path: String,
    ) -> Result<(), Error> {
        let credential = app.credential().await.map_err(Error::Authentication)?;
        let auth_headers = credential.headers().await.map_err(Error::Authentication)?;
        let response = self
            .inner
            .request(method, format!("{}{path}", self.endpoint))
            .headers(auth_headers)
            .header(CLIENT_HEADER, CLIENT_HEADER_VALUE.as_str())
            .send()
            .await
            .map_err(Error::Io)?;
        if !response.status().is_success() {
            return to_http_error(response).await;
        }
        Ok(())
    }
}

async fn to_http_error<O>(response: reqwest::Response) -> Result<O, Error> {
    let status_code = response.status().as_u16();
    let body = response.bytes().await.map_err(Error::Io)?;
    let error = ServiceError::from_http_response(status_code, &body);
    tracing::debug!(status_code, status = ?error.status(), "Instance ID service error");
    Err(Error::Service(error))
}
