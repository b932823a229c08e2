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

//! Credentials for the Firebase Admin SDK for Rust.
//!
//! A [Credential][credentials::Credential] produces the `Authorization`
//! headers sent with each request to Firebase services. Some credentials also
//! know which Google Cloud project they belong to, the Firebase services use
//! that information when the application does not configure a project id
//! explicitly.
//!
//! Most applications use [Credential::application_default], which finds
//! credentials in the environment following [Application Default Credentials].
//!
//! [Application Default Credentials]: https://google.aip.dev/auth/4110
//! [Credential::application_default]: credentials::Credential::application_default

pub mod credentials;
pub mod errors;
pub mod token;

pub(crate) mod constants;
pub(crate) mod mds;
pub(crate) mod token_cache;

/// The result type used by the functions in this crate.
pub type Result<T> = std::result::Result<T, crate::errors::CredentialsError>;
