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

/// Errors reported by the app lifecycle functions.
///
/// These errors indicate a programming mistake, such as using an app before
/// it is initialized or after it is deleted. They are detected before any I/O
/// takes place.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// No app was initialized without a name.
    #[error("The default Firebase app does not exist.")]
    NoDefaultApp,

    /// No app with the given name was initialized.
    #[error("Firebase app named \"{0}\" does not exist.")]
    NoApp(String),

    /// An app with the given name is already initialized.
    #[error("Firebase app named \"{0}\" already exists.")]
    DuplicateApp(String),

    /// App names must be non-empty.
    #[error("Invalid Firebase app name provided. App name must be a non-empty string.")]
    InvalidAppName,

    /// The app was deleted.
    #[error("Firebase app named \"{0}\" has already been deleted.")]
    AppDeleted(String),
}

/// A specialized [Result][std::result::Result] for app lifecycle functions.
pub type Result<T> = std::result::Result<T, Error>;
