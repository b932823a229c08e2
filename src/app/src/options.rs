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

use firebase_admin_credential::credentials::Credential;

/// Configuration for a Firebase app.
///
/// # Example
/// ```
/// # use firebase_admin_app::AppOptions;
/// let options = AppOptions::new().with_project_id("my-project");
/// assert_eq!(options.project_id(), Some("my-project"));
/// assert!(options.credential().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppOptions {
    project_id: Option<String>,
    credential: Option<Credential>,
}

impl AppOptions {
    /// Creates options with no project id and no credential.
    ///
    /// Apps created with these options use [Application Default Credentials].
    ///
    /// [Application Default Credentials]: https://google.aip.dev/auth/4110
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Google Cloud project used by Firebase services.
    pub fn with_project_id<S: Into<String>>(mut self, v: S) -> Self {
        self.project_id = Some(v.into());
        self
    }

    /// Sets the credentials used by Firebase services.
    pub fn with_credential<C: Into<Credential>>(mut self, v: C) -> Self {
        self.credential = Some(v.into());
        self
    }

    /// The explicitly configured project id, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// The explicitly configured credential, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}
