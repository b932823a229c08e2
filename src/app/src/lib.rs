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

//! Firebase app lifecycle for the Firebase Admin SDK for Rust.
//!
//! An [App] bundles the configuration and credentials shared by the Firebase
//! services. Applications typically initialize a single default app at
//! startup:
//!
//! ```
//! # use firebase_admin_app::{AppOptions, delete_app, get_app, initialize_app_with_name};
//! let app = initialize_app_with_name(
//!     AppOptions::new().with_project_id("my-project"),
//!     "doc-example",
//! )?;
//! assert_eq!(get_app(Some("doc-example"))?.id(), app.id());
//! delete_app(&app)?;
//! # Ok::<(), firebase_admin_app::Error>(())
//! ```
//!
//! Services keep per-app state. They subscribe to [App::on_delete] to release
//! that state when the app is deleted.

mod app;
mod errors;
mod options;
pub mod project_id;
mod registry;

pub use app::{App, AppId, DEFAULT_APP_NAME};
pub use errors::{Error, Result};
pub use options::AppOptions;

/// Initializes the default app.
///
/// Fails if the default app is already initialized.
pub fn initialize_app(options: AppOptions) -> Result<App> {
    registry::APPS.initialize(options, None)
}

/// Initializes an app with the given name.
///
/// Fails if `name` is empty, or an app with the same name is already
/// initialized.
pub fn initialize_app_with_name(options: AppOptions, name: &str) -> Result<App> {
    registry::APPS.initialize(options, Some(name))
}

/// Returns the app with the given name, or the default app if `name` is
/// `None`.
pub fn get_app(name: Option<&str>) -> Result<App> {
    registry::APPS.get(name)
}

/// Returns all the initialized apps.
pub fn apps() -> Vec<App> {
    registry::APPS.list()
}

/// Deletes an app.
///
/// The app is removed from the set of initialized apps, marked as deleted,
/// and its delete listeners are notified. A new app with the same name may be
/// initialized afterwards, it has a different [AppId].
pub fn delete_app(app: &App) -> Result<()> {
    registry::APPS.delete(app)
}
