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

use crate::Error;
use crate::http::{ReqwestClient, enc};
use firebase_admin_app::App;

/// A client for the Firebase Instance ID service.
///
/// Use [instance_id()][crate::instance_id] to get the shared client for an
/// app. Each app has at most one shared client, deleting the app discards it.
///
/// # Example
/// ```no_run
/// # use firebase_admin_app::{AppOptions, initialize_app};
/// # use firebase_admin_instance_id::instance_id;
/// # async fn sample() -> anyhow::Result<()> {
/// let app = initialize_app(AppOptions::new().with_project_id("my-project"))?;
/// let client = instance_id(Some(&app))?;
/// client.delete_instance_id("some-instance-id").await?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct InstanceId {
    app: App,
    inner: ReqwestClient,
}

impl InstanceId {
    /// Returns a builder for a client that is not shared through the
    /// registry.
    ///
    /// This is mostly useful to target an emulator or a test server.
    pub fn builder(app: &App) -> Builder {
        Builder::new(app)
    }

    pub(crate) fn new(app: &App) -> Self {
        Builder::new(app).build()
    }

    /// The app this client is bound to.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Deletes an instance ID and its associated data.
    ///
    /// The project id is resolved on each call. Fails without contacting the
    /// service if `instance_id` is empty or the app has been deleted.
    pub async fn delete_instance_id(&self, instance_id: &str) -> Result<(), Error> {
        if instance_id.is_empty() {
            return Err(Error::InvalidArgument(
                "Instance ID must be a non-empty string.".to_string(),
            ));
        }
        self.app.check_not_deleted()?;
        let project_id = crate::project_id::resolve(&self.app).await?;
        tracing::debug!(app = self.app.name(), %project_id, instance_id, "deleting instance id");
        let path = format!(
            "/v1/projects/{}/instanceIds/{}",
            enc(&project_id),
            enc(instance_id)
        );
        self.inner
            .execute(&self.app, reqwest::Method::DELETE, path)
            .await
    }
}

/// Configures an [InstanceId] client.
#[derive(Clone, Debug)]
pub struct Builder {
    app: App,
    endpoint: Option<String>,
}

impl Builder {
    fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            endpoint: None,
        }
    }

    /// Sets the service endpoint, for example `http://localhost:9099`.
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint = Some(v.into());
        self
    }

    pub fn build(self) -> InstanceId {
        InstanceId {
            app: self.app,
            inner: ReqwestClient::new(self.endpoint),
        }
    }
}
