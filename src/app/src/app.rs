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

use crate::AppOptions;
use crate::errors::{Error, Result};
use firebase_admin_credential::credentials::Credential;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// The name of the app initialized without an explicit name.
pub const DEFAULT_APP_NAME: &str = "[DEFAULT]";

/// Identifies an app for its whole lifetime.
///
/// Each call to [initialize_app][crate::initialize_app] creates a new
/// identity, even if an app with the same name and options existed before.
/// Services use it to key their per-app state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(u64);

impl AppId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

type DeleteListener = Box<dyn FnOnce(&App) + Send>;

/// A handle to an initialized Firebase app.
///
/// Cloning the handle is cheap, all clones refer to the same app. Compare apps
/// using [App::id], two apps with equal options are still different apps.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    id: AppId,
    name: String,
    options: AppOptions,
    default_credential: OnceCell<Credential>,
    deleted: AtomicBool,
    // Guarded together with `deleted` transitions, see `App::teardown()`.
    delete_listeners: Mutex<Vec<DeleteListener>>,
}

impl App {
    pub(crate) fn new(name: String, options: AppOptions) -> Self {
        Self {
            inner: Arc::new(AppInner {
                id: AppId::next(),
                name,
                options,
                default_credential: OnceCell::new(),
                deleted: AtomicBool::new(false),
                delete_listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The identity of this app.
    pub fn id(&self) -> AppId {
        self.inner.id
    }

    /// The name of this app, [DEFAULT_APP_NAME] for the default app.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The options used to initialize this app.
    pub fn options(&self) -> &AppOptions {
        &self.inner.options
    }

    /// Returns `true` once the app is deleted.
    pub fn is_deleted(&self) -> bool {
        self.inner.deleted.load(Ordering::Acquire)
    }

    /// Returns an error if the app is deleted.
    pub fn check_not_deleted(&self) -> Result<()> {
        if self.is_deleted() {
            return Err(Error::AppDeleted(self.inner.name.clone()));
        }
        Ok(())
    }

    /// The credentials for this app.
    ///
    /// Returns the credential in the app options or, if none was configured,
    /// loads [Application Default Credentials] the first time it is called.
    ///
    /// [Application Default Credentials]: https://google.aip.dev/auth/4110
    pub async fn credential(&self) -> firebase_admin_credential::Result<&Credential> {
        if let Some(c) = self.inner.options.credential() {
            return Ok(c);
        }
        self.inner
            .default_credential
            .get_or_try_init(Credential::application_default)
            .await
    }

    /// Registers a function called when the app is deleted.
    ///
    /// Listeners run once, after the app is marked as deleted, in registration
    /// order. Fails if the app is already deleted, the listener is not called
    /// in that case.
    pub fn on_delete<F>(&self, listener: F) -> Result<()>
    where
        F: FnOnce(&App) + Send + 'static,
    {
        let mut listeners = self
            .inner
            .delete_listeners
            .lock()
            .expect("app delete listeners lock is poisoned");
        self.check_not_deleted()?;
        listeners.push(Box::new(listener));
        Ok(())
    }

    /// Marks the app as deleted and notifies the listeners.
    ///
    /// Returns `false` if the app was already deleted.
    pub(crate) fn teardown(&self) -> bool {
        let listeners = {
            let mut guard = self
                .inner
                .delete_listeners
                .lock()
                .expect("app delete listeners lock is poisoned");
            if self.inner.deleted.swap(true, Ordering::AcqRel) {
                return false;
            }
            std::mem::take(&mut *guard)
        };
        // Listeners may call back into this app, do not hold the lock.
        tracing::debug!(
            app = %self.inner.name,
            count = listeners.len(),
            "notifying delete listeners"
        );
        for listener in listeners {
            listener(self);
        }
        true
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("options", &self.inner.options)
            .field("deleted", &self.is_deleted())
            .finish()
    }
}
