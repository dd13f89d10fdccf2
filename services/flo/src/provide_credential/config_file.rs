// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::AZUQUA_CONFIG_FILE;
use crate::Credential;
use async_trait::async_trait;
use azuqua_core::{Context, Error, ProvideCredential, Result};
use log::debug;

/// ConfigFileCredentialProvider loads credentials from an account config file.
///
/// The file is a JSON object carrying `accessKey` and `accessSecret`:
///
/// ```json
/// { "accessKey": "...", "accessSecret": "..." }
/// ```
///
/// The path is taken from [`ConfigFileCredentialProvider::with_path`], or from
/// the `AZUQUA_CONFIG_FILE` env. `~` is expanded to the home dir.
///
/// - No path configured: returns `Ok(None)`.
/// - Path from env but file missing: returns `Ok(None)`.
/// - Path set explicitly but file missing: returns [`azuqua_core::ErrorKind::ConfigInvalid`].
/// - File present but invalid: returns [`azuqua_core::ErrorKind::ConfigInvalid`].
#[derive(Debug, Default, Clone)]
pub struct ConfigFileCredentialProvider {
    path: Option<String>,
}

impl ConfigFileCredentialProvider {
    /// Create a new ConfigFileCredentialProvider which reads the path from env.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the account config from this path instead of env.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ConfigFileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let (path, explicit) = match &self.path {
            Some(path) => (path.clone(), true),
            None => match ctx.env_var(AZUQUA_CONFIG_FILE) {
                Some(path) if !path.is_empty() => (path, false),
                _ => return Ok(None),
            },
        };

        let expanded_path = ctx
            .expand_home_dir(&path)
            .ok_or_else(|| Error::unexpected("failed to expand home directory"))?;

        let content = match ctx.file_read(&expanded_path).await {
            Ok(content) => content,
            Err(err) if explicit => {
                return Err(Error::config_invalid(format!(
                    "failed to read account config {expanded_path}"
                ))
                .with_source(err));
            }
            Err(_) => {
                debug!("account config not found at {expanded_path:?}");
                return Ok(None);
            }
        };

        debug!("loading credential from account config {expanded_path:?}");
        Credential::from_account_file(&content).map(Some)
    }
}
