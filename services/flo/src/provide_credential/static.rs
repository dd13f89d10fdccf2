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

use crate::Credential;
use async_trait::async_trait;
use azuqua_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides a fixed access key and access secret.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    access_key: String,
    access_secret: String,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider with access key and access secret.
    pub fn new(access_key: &str, access_secret: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            access_secret: access_secret.to_string(),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(Credential::new(&self.access_key, &self.access_secret)))
    }
}
