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

//! Shares one [InstanceId] client per app.

use crate::{Error, InstanceId};
use firebase_admin_app::{App, AppId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, Mutex};

/// The process-wide registry used by [instance_id()][crate::instance_id].
pub(crate) static INSTANCE_IDS: LazyLock<Arc<InstanceIdRegistry>> =
    LazyLock::new(|| Arc::new(InstanceIdRegistry::new()));

/// Maps apps to their [InstanceId] client.
///
/// A registry creates the client on first use and returns the same client
/// until the app is deleted. Entries are removed when their app is deleted.
#[derive(Debug, Default)]
pub struct InstanceIdRegistry {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    clients: HashMap<AppId, Arc<InstanceId>>,
    // Apps with a delete listener, at most one listener per app.
    subscribed: HashSet<AppId>,
}

impl InstanceIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the client for `app`, creating it if needed.
    ///
    /// Fails if `app` has been deleted.
    pub fn get(self: &Arc<Self>, app: &App) -> Result<Arc<InstanceId>, Error> {
        let mut state = self.lock();
        // Checked under the lock, the delete listener also takes it.
        app.check_not_deleted()?;
        if let Some(client) = state.clients.get(&app.id()) {
            return Ok(client.clone());
        }
        if !state.subscribed.contains(&app.id()) {
            let weak = Arc::downgrade(self);
            app.on_delete(move |app| {
                if let Some(registry) = weak.upgrade() {
                    registry.forget(app);
                }
            })?;
            state.subscribed.insert(app.id());
        }
        let client = Arc::new(InstanceId::new(app));
        state.clients.insert(app.id(), client.clone());
        tracing::debug!(app = app.name(), "created Instance ID client");
        Ok(client)
    }

    /// Discards the client for `app`, if any.
    ///
    /// Returns the discarded client. A later [get()][Self::get] creates a new
    /// client.
    pub fn remove(&self, app: &App) -> Option<Arc<InstanceId>> {
        let removed = self.lock().clients.remove(&app.id());
        if removed.is_some() {
            tracing::debug!(app = app.name(), "removed Instance ID client");
        }
        removed
    }

    /// The number of clients in the registry.
    pub fn len(&self) -> usize {
        self.lock().clients.len()
    }

    /// Returns `true` if the registry has no clients.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Called once the app is deleted.
    fn forget(&self, app: &App) {
        let mut state = self.lock();
        state.subscribed.remove(&app.id());
        if state.clients.remove(&app.id()).is_some() {
            tracing::debug!(app = app.name(), "removed Instance ID client");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state
            .lock()
            .expect("instance id registry lock is poisoned")
    }
}
