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
use firebase_admin_app::App;
use firebase_admin_app::project_id::find_project_id;

/// Resolves the project id used in Instance ID requests for `app`.
pub(crate) async fn resolve(app: &App) -> Result<String, Error> {
    find_project_id(app)
        .await
        .map_err(Error::Authentication)?
        .ok_or(Error::NoProjectId)
}
