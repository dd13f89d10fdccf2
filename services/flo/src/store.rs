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

use std::sync::{Arc, Mutex};

use azuqua_core::{Context, Error, ProvideCredential, Result, SigningCredential};
use log::debug;

use crate::provide_credential::{ConfigFileCredentialProvider, EnvCredentialProvider};
use crate::Credential;

/// CredentialStore holds the account credential used to sign requests.
///
/// The credential is replaced wholesale, never patched field by field.
/// Requests clone the credential before signing, so a replacement never
/// affects a call already in flight.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credential: Arc<Mutex<Option<Credential>>>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a credential.
    pub fn with_credential(credential: Credential) -> Self {
        let store = Self::new();
        store.set(credential);
        store
    }

    /// Replace the stored credential.
    pub fn set(&self, credential: Credential) {
        *self.credential.lock().expect("lock poisoned") = Some(credential);
    }

    /// Replace the stored credential with the given access key and secret.
    pub fn set_from_args(&self, access_key: impl Into<String>, access_secret: impl Into<String>) {
        self.set(Credential::new(access_key, access_secret));
    }

    /// Replace the stored credential with the one found in env.
    ///
    /// Returns `false` and keeps the current credential if env doesn't
    /// carry both the access key and the access secret.
    pub fn set_from_env(&self, ctx: &Context) -> bool {
        match EnvCredentialProvider::new().load(ctx) {
            Some(cred) => {
                debug!("credential loaded from env");
                self.set(cred);
                true
            }
            None => false,
        }
    }

    /// Load the credential from an account config file, blocking the current thread.
    ///
    /// `~` in path will be expanded to the home dir.
    pub fn load_from_file(&self, ctx: &Context, path: &str) -> Result<Credential> {
        let path = ctx.expand_home_dir(path).ok_or_else(|| {
            Error::config_invalid(format!("failed to expand home dir in {path}"))
        })?;
        let content = std::fs::read(&path).map_err(|e| {
            Error::config_invalid(format!("failed to read account config {path}")).with_source(e)
        })?;
        let cred = Credential::from_account_file(&content)?;

        self.set(cred.clone());
        Ok(cred)
    }

    /// Load the credential from an account config file through the context.
    ///
    /// `~` in path will be expanded to the home dir.
    pub async fn load_from_file_async(&self, ctx: &Context, path: &str) -> Result<Credential> {
        let cred = ConfigFileCredentialProvider::new()
            .with_path(path)
            .provide_credential(ctx)
            .await?
            .ok_or_else(|| Error::config_invalid(format!("no credential found in {path}")))?;

        self.set(cred.clone());
        Ok(cred)
    }

    /// Load the credential from any provider.
    ///
    /// Returns `false` and keeps the current credential if the provider
    /// found nothing.
    pub async fn load_from(
        &self,
        ctx: &Context,
        provider: &dyn ProvideCredential<Credential = Credential>,
    ) -> Result<bool> {
        match provider.provide_credential(ctx).await? {
            Some(cred) => {
                self.set(cred);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Get a snapshot of the credential.
    ///
    /// Returns [`azuqua_core::ErrorKind::AccountNotConfigured`] if either the
    /// access key or the access secret is missing.
    pub fn get(&self) -> Result<Credential> {
        let cred = self.credential.lock().expect("lock poisoned").clone();

        match cred {
            Some(cred) if cred.is_valid() => Ok(cred),
            _ => Err(Error::account_not_configured(
                "access key and access secret must both be set",
            )),
        }
    }

    /// Check whether a usable credential is stored.
    pub fn is_configured(&self) -> bool {
        self.get().is_ok()
    }
}
