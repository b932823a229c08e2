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

//! Firebase Instance ID for the Firebase Admin SDK for Rust.
//!
//! The [Instance ID] service identifies app installations. This crate deletes
//! instance IDs and the data associated with them, for example to honor data
//! deletion requests.
//!
//! Each [App] has one shared [InstanceId] client, returned by
//! [instance_id()]:
//!
//! ```no_run
//! # use firebase_admin_app::{AppOptions, initialize_app};
//! # async fn sample() -> anyhow::Result<()> {
//! initialize_app(AppOptions::new().with_project_id("my-project"))?;
//! let client = firebase_admin_instance_id::instance_id(None)?;
//! client.delete_instance_id("some-instance-id").await?;
//! # Ok(()) }
//! ```
//!
//! [Instance ID]: https://firebase.google.com/docs/reference/admin/node/firebase-admin.instance-id
//! [App]: firebase_admin_app::App

mod client;
mod errors;
mod http;
mod project_id;
mod registry;

pub use client::{Builder, InstanceId};
pub use errors::{Error, ErrorCode, ServiceError};
pub use registry::InstanceIdRegistry;

use firebase_admin_app::App;
use std::sync::Arc;

/// Returns the [InstanceId] client for `app`, or for the default app if
/// `app` is `None`.
///
/// Repeated calls for the same app return the same client. The client is
/// discarded when the app is deleted, later calls for a new app with the same
/// name return a new client.
///
/// Fails with [Error::App] if the default app is requested and does not
/// exist, or if `app` has been deleted. No other errors are possible, the
/// project id and credentials are only used when sending requests.
pub fn instance_id(app: Option<&App>) -> Result<Arc<InstanceId>, Error> {
    let default;
    let app = match app {
        Some(a) => a,
        None => {
            default = firebase_admin_app::get_app(None)?;
            &default
        }
    };
    registry::INSTANCE_IDS.get(app)
}
