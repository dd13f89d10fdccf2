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

use crate::{constants::*, Credential};
use async_trait::async_trait;
use azuqua_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads azuqua credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `AZUQUA_ACCESS_KEY`, falling back to `ACCESS_KEY`
/// - `AZUQUA_ACCESS_SECRET`, falling back to `ACCESS_SECRET`
///
/// Empty values are treated as unset.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }

    /// Load the credential without awaiting, env access never blocks.
    pub fn load(&self, ctx: &Context) -> Option<Credential> {
        let access_key = lookup(ctx, AZUQUA_ACCESS_KEY, ACCESS_KEY)?;
        let access_secret = lookup(ctx, AZUQUA_ACCESS_SECRET, ACCESS_SECRET)?;

        Some(Credential::new(access_key, access_secret))
    }
}

fn lookup(ctx: &Context, prefixed: &str, generic: &str) -> Option<String> {
    ctx.env_var(prefixed)
        .filter(|v| !v.is_empty())
        .or_else(|| ctx.env_var(generic).filter(|v| !v.is_empty()))
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(self.load(ctx))
    }
}
