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

//! Errors returned by the Instance ID service.

use firebase_admin_credential::errors::CredentialsError;

/// The message used when no project id can be found.
pub(crate) const NO_PROJECT_ID_MESSAGE: &str = "Failed to determine project ID for InstanceId. \
    Initialize the SDK with service account credentials or set project ID as an app option. \
    Alternatively set the GOOGLE_CLOUD_PROJECT environment variable.";

/// The error type for the Instance ID service.
///
/// [Error::App] is the only variant returned synchronously, by
/// [instance_id()][crate::instance_id]. It indicates a programming error,
/// such as using the service before initializing the default app. All other
/// variants are returned by the asynchronous operations.
///
/// # Example
/// ```
/// # use firebase_admin_instance_id::{Error, InstanceId};
/// async fn delete(client: &InstanceId) {
///     match client.delete_instance_id("test-iid").await {
///         Ok(()) => println!("deleted"),
///         Err(Error::Service(e)) if e.http_status_code() == 404 => println!("not found"),
///         Err(e) => println!("some other error {e}"),
///     }
/// }
/// ```
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The app is missing or deleted.
    #[error(transparent)]
    App(#[from] firebase_admin_app::Error),

    /// The project id could not be determined.
    #[error("{}", NO_PROJECT_ID_MESSAGE)]
    NoProjectId,

    /// The request has an invalid argument, detected before contacting the
    /// service.
    #[error("{0}")]
    InvalidArgument(String),

    /// The service returned an error.
    #[error(transparent)]
    Service(ServiceError),

    /// The credentials could not produce a project id or an access token.
    #[error(transparent)]
    Authentication(CredentialsError),

    /// The request could not be sent, or the response could not be received.
    #[error("cannot send request to the Instance ID service: {0}")]
    Io(#[source] reqwest::Error),
}

impl Error {
    /// The service error details, if this error was returned by the service.
    pub fn as_service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(e) => Some(e),
            _ => None,
        }
    }
}

/// The error codes of the Instance ID service.
///
/// The codes are derived from the HTTP status code of the response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    InvalidArgument,
    InsufficientPermission,
    InstanceIdNotFound,
    AlreadyDeleted,
    TooManyRequests,
    InternalError,
    ServerUnavailable,
    UnknownError,
}

impl ErrorCode {
    /// Maps an HTTP status code to the Instance ID error code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidArgument,
            401 | 403 => Self::InsufficientPermission,
            404 => Self::InstanceIdNotFound,
            409 => Self::AlreadyDeleted,
            429 => Self::TooManyRequests,
            500 => Self::InternalError,
            503 => Self::ServerUnavailable,
            _ => Self::UnknownError,
        }
    }

    /// The code in `instance-id/<code>` form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "instance-id/invalid-argument",
            Self::InsufficientPermission => "instance-id/insufficient-permission",
            Self::InstanceIdNotFound => "instance-id/instance-id-not-found",
            Self::AlreadyDeleted => "instance-id/already-deleted",
            Self::TooManyRequests => "instance-id/too-many-requests",
            Self::InternalError => "instance-id/internal-error",
            Self::ServerUnavailable => "instance-id/server-unavailable",
            Self::UnknownError => "instance-id/unknown-error",
        }
    }

    // Used when the response has no error message.
    fn default_message(status: u16) -> Option<&'static str> {
        match status {
            400 => Some("Malformed instance ID argument."),
            401 => Some("Request not authorized."),
            403 => Some(
                "Project does not match instance ID or the client does not have sufficient privileges.",
            ),
            404 => Some("Failed to find the instance ID."),
            409 => Some("Already deleted."),
            429 => Some("Request throttled out by the backend server."),
            500 => Some("Internal server error."),
            503 => Some("Backend servers are over capacity. Try again later."),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error response from the Instance ID service.
///
/// The display format is the service message, unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    http_status_code: u16,
    status: Option<String>,
    message: String,
    code: ErrorCode,
}

impl ServiceError {
    /// Creates an error from the response status code and body.
    ///
    /// Bodies in the `{"error": {"message": ..., "status": ...}}` format
    /// provide the message and status. Otherwise the message is derived from
    /// the status code.
    pub fn from_http_response(http_status_code: u16, body: &[u8]) -> Self {
        let wrapper = serde_json::from_slice::<ErrorWrapper>(body).ok();
        let status = wrapper.as_ref().and_then(|w| w.error.status.clone());
        let message = wrapper
            .and_then(|w| w.error.message)
            .filter(|m| !m.is_empty())
            .or_else(|| ErrorCode::default_message(http_status_code).map(str::to_string))
            .unwrap_or_else(|| {
                format!(
                    "Unexpected response with status: {http_status_code} and body: {}",
                    String::from_utf8_lossy(body)
                )
            });
        Self {
            http_status_code,
            status,
            message,
            code: ErrorCode::from_http_status(http_status_code),
        }
    }

    /// The HTTP status code of the response.
    pub fn http_status_code(&self) -> u16 {
        self.http_status_code
    }

    /// The status in the response body, such as `NOT_FOUND`.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The Instance ID error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

#[derive(serde::Deserialize)]
struct ErrorWrapper {
    error: WrapperStatus,
}

#[derive(serde::Deserialize, Default)]
#[serde(default)]
struct WrapperStatus {
    message: Option<String>,
    status: Option<String>,
}
