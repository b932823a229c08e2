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

use crate::app::{App, DEFAULT_APP_NAME};
use crate::errors::{Error, Result};
use crate::AppOptions;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

/// The process-wide set of live apps, keyed by name.
pub(crate) static APPS: LazyLock<AppRegistry> = LazyLock::new(AppRegistry::default);

#[derive(Debug, Default)]
pub(crate) struct AppRegistry {
    apps: Mutex<HashMap<String, App>>,
}

impl AppRegistry {
    pub(crate) fn initialize(&self, options: AppOptions, name: Option<&str>) -> Result<App> {
        let name = match name {
            None => DEFAULT_APP_NAME,
            Some("") => return Err(Error::InvalidAppName),
            Some(n) => n,
        };
        let mut apps = self.apps.lock().expect("app registry lock is poisoned");
        if apps.contains_key(name) {
            return Err(Error::DuplicateApp(name.to_string()));
        }
        let app = App::new(name.to_string(), options);
        apps.insert(name.to_string(), app.clone());
        tracing::debug!(app = name, id = ?app.id(), "initialized app");
        Ok(app)
    }

    pub(crate) fn get(&self, name: Option<&str>) -> Result<App> {
        let apps = self.apps.lock().expect("app registry lock is poisoned");
        match name {
            None => apps.get(DEFAULT_APP_NAME).cloned().ok_or(Error::NoDefaultApp),
            Some("") => Err(Error::InvalidAppName),
            Some(n) => apps.get(n).cloned().ok_or_else(|| Error::NoApp(n.to_string())),
        }
    }

    pub(crate) fn list(&self) -> Vec<App> {
        let apps = self.apps.lock().expect("app registry lock is poisoned");
        apps.values().cloned().collect()
    }

    pub(crate) fn delete(&self, app: &App) -> Result<()> {
        {
            let mut apps = self.apps.lock().expect("app registry lock is poisoned");
            // Only remove the entry if it is this app, and not a newer app
            // initialized with the same name.
            if apps.get(app.name()).is_some_and(|a| a.id() == app.id()) {
                apps.remove(app.name());
            }
        }
        if !app.teardown() {
            return Err(Error::AppDeleted(app.name().to_string()));
        }
        tracing::debug!(app = app.name(), id = ?app.id(), "deleted app");
        Ok(())
    }
}
