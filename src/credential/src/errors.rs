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

//! Errors created while loading or using credentials.

use http::StatusCode;
use std::error::Error;
use std::fmt::{Display, Formatter, Result};
use std::sync::Arc;

/// Represents an error loading or using a [Credential][crate::credentials::Credential].
///
/// Problems loading credentials include a badly formatted or missing key
/// file. Problems using credentials include a temporary failure to create
/// an access token, or to reach the metadata server. The latter may happen
/// even after the credentials were successfully loaded.
///
/// The Firebase services never retry on these errors, but the
/// [is_transient()][CredentialsError::is_transient] predicate tells the
/// application whether a future attempt may succeed.
///
/// # Example
/// ```
/// # use firebase_admin_credential::errors::CredentialsError;
/// let err = CredentialsError::from_msg(true, "simulated transient error");
/// assert!(err.is_transient());
/// assert!(err.to_string().contains("simulated transient error"));
/// ```
///
/// [Credential]: crate::credentials::Credential
#[derive(Clone, Debug)]
pub struct CredentialsError {
    is_transient: bool,
    message: Option<String>,
    source: Option<Arc<dyn Error + Send + Sync>>,
}

impl CredentialsError {
    /// Creates a new error wrapping `source`.
    pub fn from_source<T: Error + Send + Sync + 'static>(is_transient: bool, source: T) -> Self {
        Self {
            is_transient,
            message: None,
            source: Some(Arc::new(source)),
        }
    }

    /// Creates a new error with only a message.
    pub fn from_msg<T: Into<String>>(is_transient: bool, message: T) -> Self {
        Self {
            is_transient,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Creates a new error with a message and a source.
    pub fn new<M, T>(is_transient: bool, message: M, source: T) -> Self
    where
        M: Into<String>,
        T: Error + Send + Sync + 'static,
    {
        Self {
            is_transient,
            message: Some(message.into()),
            source: Some(Arc::new(source)),
        }
    }

    /// Returns `true` if a future attempt may succeed.
    pub fn is_transient(&self) -> bool {
        self.is_transient
    }
}

impl Error for CredentialsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|s| s.as_ref() as &(dyn Error + 'static))
    }
}

const TRANSIENT_MSG: &str = "but future attempts may succeed";
const PERMANENT_MSG: &str = "and future attempts will not succeed";

impl Display for CredentialsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let msg = if self.is_transient {
            TRANSIENT_MSG
        } else {
            PERMANENT_MSG
        };
        match (&self.message, &self.source) {
            (Some(m), Some(s)) => write!(f, "credentials error, {msg}: {m}, source: {s}"),
            (Some(m), None) => write!(f, "credentials error, {msg}: {m}"),
            (None, Some(s)) => write!(f, "credentials error, {msg}, source: {s}"),
            (None, None) => write!(f, "credentials error, {msg}"),
        }
    }
}

/// Errors that indicate the problem is temporary, and may go away on a future
/// attempt.
pub(crate) fn is_transient_http_status(c: StatusCode) -> bool {
    matches!(
        c,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
    )
}

/// Maps a transport error. Connection problems are reported as transient.
pub(crate) fn from_http_error(err: reqwest::Error, msg: &str) -> CredentialsError {
    let transient = err.is_connect() || err.is_timeout();
    CredentialsError::new(transient, msg, err)
}

/// Maps an unsuccessful HTTP response, consuming its body for the message.
pub(crate) async fn from_http_response(response: reqwest::Response, msg: &str) -> CredentialsError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("[cannot read response body: {e}]"));
    CredentialsError::from_msg(
        is_transient_http_status(status),
        format!("{msg}, status code: {status}, body: {body}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(StatusCode::INTERNAL_SERVER_ERROR)]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE)]
    #[test_case(StatusCode::REQUEST_TIMEOUT)]
    #[test_case(StatusCode::TOO_MANY_REQUESTS)]
    fn transient(c: StatusCode) {
        assert!(is_transient_http_status(c));
    }

    #[test_case(StatusCode::NOT_FOUND)]
    #[test_case(StatusCode::UNAUTHORIZED)]
    #[test_case(StatusCode::BAD_REQUEST)]
    #[test_case(StatusCode::BAD_GATEWAY)]
    #[test_case(StatusCode::PRECONDITION_FAILED)]
    fn permanent(c: StatusCode) {
        assert!(!is_transient_http_status(c));
    }

    #[test_case(true)]
    #[test_case(false)]
    fn from_source(transient: bool) {
        let source = std::io::Error::other("test-only");
        let got = CredentialsError::from_source(transient, source);
        assert_eq!(got.is_transient(), transient, "{got}");
        assert!(got.source().is_some(), "{got}");
        assert!(got.to_string().contains("test-only"), "{got}");
    }

    #[test]
    fn fmt() {
        let e = CredentialsError::from_msg(true, "test-only-err-123");
        let got = e.to_string();
        assert!(got.contains("test-only-err-123"), "{got}");
        assert!(got.contains(TRANSIENT_MSG), "{got}");
        assert!(e.source().is_none(), "{e:?}");

        let e = CredentialsError::new(false, "test-only-err-123", std::io::Error::other("io"));
        let got = e.to_string();
        assert!(got.contains("test-only-err-123"), "{got}");
        assert!(got.contains(PERMANENT_MSG), "{got}");
        assert!(got.contains("source: io"), "{got}");
    }

    #[test]
    fn fmt_does_not_assume_a_token_request() {
        let e = CredentialsError::from_msg(
            true,
            "failed to fetch project id from the metadata server",
        );
        let got = e.to_string();
        assert!(got.starts_with("credentials error, "), "{got}");
        assert!(!got.contains("access token"), "{got}");
        assert!(got.contains("project id"), "{got}");
    }
}
