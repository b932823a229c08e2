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

//! Determine the Google Cloud project used by an app.

use crate::App;
use firebase_admin_credential::credentials::Credential;
use firebase_admin_credential::errors::CredentialsError;

/// The environment variables consulted for a project id, in order.
pub const PROJECT_ID_ENV_VARS: [&str; 2] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];

/// Finds the project id for `app`.
///
/// The first non-empty value wins:
/// 1. the project id in the app options,
/// 2. the project id in a service account credential,
/// 3. the `GOOGLE_CLOUD_PROJECT` and then the `GCLOUD_PROJECT` environment
///    variables,
/// 4. the metadata server, if the app uses Compute Engine credentials.
///
/// Returns `Ok(None)` if none of these yield a value. Services turn that into
/// an error naming the service.
///
/// If the app has no configured credential and loading the default
/// credentials fails, the environment variables are still consulted. The
/// load error is returned only if they are unset.
pub async fn find_project_id(app: &App) -> Result<Option<String>, CredentialsError> {
    if let Some(id) = app.options().project_id().filter(|s| !s.is_empty()) {
        tracing::debug!(app = app.name(), "project id from app options");
        return Ok(Some(id.to_string()));
    }
    // A credential that fails to load does not hide the environment.
    let credential = match app.credential().await {
        Ok(c) => c,
        Err(e) => {
            return match project_id_from_env() {
                Some(id) => {
                    tracing::debug!(app = app.name(), error = %e, "project id from environment");
                    Ok(Some(id))
                }
                None => Err(e),
            };
        }
    };
    if let Some(id) = credential.project_id().filter(|s| !s.is_empty()) {
        tracing::debug!(app = app.name(), "project id from credential");
        return Ok(Some(id.to_string()));
    }
    if let Some(id) = project_id_from_env() {
        tracing::debug!(app = app.name(), "project id from environment");
        return Ok(Some(id));
    }
    match credential {
        Credential::ComputeEngine(c) => {
            tracing::debug!(app = app.name(), "project id from metadata server");
            c.project_id().await
        }
        Credential::ServiceAccount(_) | Credential::Custom(_) => Ok(None),
    }
}

fn project_id_from_env() -> Option<String> {
    PROJECT_ID_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppOptions;
    use firebase_admin_credential::credentials::compute_engine::ComputeEngineCredential;
    use firebase_admin_test_utils::credentials::{test_credential, test_service_account};
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use scoped_env::ScopedEnv;
    use serial_test::serial;

    type TestResult = anyhow::Result<()>;

    fn app(options: AppOptions) -> App {
        App::new("test-app".to_string(), options)
    }

    fn clear_env() -> [ScopedEnv<&'static str>; 2] {
        PROJECT_ID_ENV_VARS.map(ScopedEnv::remove)
    }

    #[tokio::test]
    #[serial]
    async fn from_options() -> TestResult {
        let _env = ScopedEnv::set("GOOGLE_CLOUD_PROJECT", "env-project");
        let app = app(AppOptions::new()
            .with_project_id("explicit-project")
            .with_credential(test_service_account()));
        assert_eq!(find_project_id(&app).await?.as_deref(), Some("explicit-project"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn empty_option_is_ignored() -> TestResult {
        let _env = clear_env();
        let app = app(AppOptions::new()
            .with_project_id("")
            .with_credential(test_service_account()));
        assert_eq!(find_project_id(&app).await?.as_deref(), Some("test-project-id"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn from_service_account() -> TestResult {
        let _env = ScopedEnv::set("GOOGLE_CLOUD_PROJECT", "env-project");
        let app = app(AppOptions::new().with_credential(test_service_account()));
        assert_eq!(find_project_id(&app).await?.as_deref(), Some("test-project-id"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn from_env_primary() -> TestResult {
        let _e1 = ScopedEnv::set("GOOGLE_CLOUD_PROJECT", "primary-project");
        let _e2 = ScopedEnv::set("GCLOUD_PROJECT", "legacy-project");
        let app = app(AppOptions::new().with_credential(test_credential()));
        assert_eq!(find_project_id(&app).await?.as_deref(), Some("primary-project"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn from_env_legacy() -> TestResult {
        let _e1 = ScopedEnv::remove("GOOGLE_CLOUD_PROJECT");
        let _e2 = ScopedEnv::set("GCLOUD_PROJECT", "legacy-project");
        let app = app(AppOptions::new().with_credential(test_credential()));
        assert_eq!(find_project_id(&app).await?.as_deref(), Some("legacy-project"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn not_found() -> TestResult {
        let _env = clear_env();
        let app = app(AppOptions::new().with_credential(test_credential()));
        assert_eq!(find_project_id(&app).await?, None);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn from_metadata_server() -> TestResult {
        let _env = clear_env();
        let _mds = ScopedEnv::remove("GCE_METADATA_HOST");
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "GET",
                "/computeMetadata/v1/project/project-id",
            ))
            .times(1)
            .respond_with(status_code(200).body("mds-project")),
        );
        let cred = ComputeEngineCredential::with_endpoint(format!("http://{}", server.addr()));
        let app = app(AppOptions::new().with_credential(cred));
        assert_eq!(find_project_id(&app).await?.as_deref(), Some("mds-project"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn env_wins_over_metadata_server() -> TestResult {
        let _env = ScopedEnv::set("GOOGLE_CLOUD_PROJECT", "env-project");
        // No expectations, any request to the server fails the test.
        let server = Server::run();
        let cred = ComputeEngineCredential::with_endpoint(format!("http://{}", server.addr()));
        let app = app(AppOptions::new().with_credential(cred));
        assert_eq!(find_project_id(&app).await?.as_deref(), Some("env-project"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn metadata_server_error() {
        let _env = clear_env();
        let _mds = ScopedEnv::remove("GCE_METADATA_HOST");
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "GET",
                "/computeMetadata/v1/project/project-id",
            ))
            .respond_with(status_code(503)),
        );
        let cred = ComputeEngineCredential::with_endpoint(format!("http://{}", server.addr()));
        let app = app(AppOptions::new().with_credential(cred));
        let err = find_project_id(&app).await.unwrap_err();
        assert!(err.is_transient(), "{err:?}");
    }

    #[tokio::test]
    #[serial]
    async fn env_when_default_credentials_fail() -> TestResult {
        let _adc = ScopedEnv::set("GOOGLE_APPLICATION_CREDENTIALS", "/does/not/exist.json");
        let _e1 = ScopedEnv::set("GOOGLE_CLOUD_PROJECT", "env-project");
        let _e2 = ScopedEnv::remove("GCLOUD_PROJECT");
        let app = app(AppOptions::new());
        assert_eq!(find_project_id(&app).await?.as_deref(), Some("env-project"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn default_credentials_fail_without_env() {
        let _adc = ScopedEnv::set("GOOGLE_APPLICATION_CREDENTIALS", "/does/not/exist.json");
        let _env = clear_env();
        let app = app(AppOptions::new());
        let err = find_project_id(&app).await.unwrap_err();
        assert!(err.to_string().contains("/does/not/exist.json"), "{err}");
    }
}
