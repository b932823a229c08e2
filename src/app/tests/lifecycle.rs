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

#[cfg(test)]
mod tests {
    use firebase_admin_app::*;
    use firebase_admin_test_utils::credentials::test_credential;
    use serial_test::serial;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type TestResult = anyhow::Result<()>;

    #[test]
    #[serial]
    fn default_app_lifecycle() -> TestResult {
        let _guard = firebase_admin_test_utils::tracing::enable_tracing();
        assert_eq!(get_app(None).unwrap_err(), Error::NoDefaultApp);

        let app = initialize_app(AppOptions::new().with_credential(test_credential()))?;
        assert_eq!(app.name(), DEFAULT_APP_NAME);
        assert_eq!(get_app(None)?.id(), app.id());
        assert!(apps().iter().any(|a| a.id() == app.id()));

        let notified = Arc::new(AtomicUsize::new(0));
        let n = notified.clone();
        app.on_delete(move |_| {
            n.fetch_add(1, Ordering::SeqCst);
        })?;

        delete_app(&app)?;
        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert!(app.is_deleted());
        assert_eq!(get_app(None).unwrap_err(), Error::NoDefaultApp);
        Ok(())
    }

    #[test]
    #[serial]
    fn recreate_named_app() -> TestResult {
        let options = AppOptions::new().with_project_id("test-project");
        let first = initialize_app_with_name(options.clone(), "recreated")?;
        assert_eq!(
            initialize_app_with_name(options.clone(), "recreated").unwrap_err(),
            Error::DuplicateApp("recreated".to_string())
        );
        delete_app(&first)?;

        let second = initialize_app_with_name(options, "recreated")?;
        assert_ne!(first.id(), second.id());
        assert!(!second.is_deleted());
        assert_eq!(
            delete_app(&first).unwrap_err(),
            Error::AppDeleted("recreated".to_string())
        );
        assert_eq!(get_app(Some("recreated"))?.id(), second.id());
        delete_app(&second)?;
        Ok(())
    }
}
