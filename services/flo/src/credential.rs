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

use std::fmt::{Debug, Formatter};

use azuqua_core::utils::Redact;
use azuqua_core::{Error, Result, SigningCredential};
use serde::Deserialize;

/// Credential for the azuqua api.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access key of the azuqua account.
    pub access_key: String,
    /// Access secret of the azuqua account, used as the hmac key.
    pub access_secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(access_key: impl Into<String>, access_secret: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            access_secret: access_secret.into(),
        }
    }

    /// Parse a credential from the content of an account config file.
    ///
    /// The file is a JSON object with the required string fields
    /// `accessKey` and `accessSecret`. Other fields are ignored.
    pub fn from_account_file(content: &[u8]) -> Result<Self> {
        let file: AccountFile = serde_json::from_slice(content).map_err(|e| {
            Error::config_invalid("account config is not a valid JSON object").with_source(e)
        })?;

        match (file.access_key, file.access_secret) {
            (Some(ak), Some(sk)) if !ak.is_empty() && !sk.is_empty() => Ok(Self::new(ak, sk)),
            _ => Err(Error::config_invalid(
                "account config must contain non-empty accessKey and accessSecret",
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountFile {
    access_key: Option<String>,
    access_secret: Option<String>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key", &Redact::from(&self.access_key))
            .field("access_secret", &Redact::from(&self.access_secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key.is_empty() && !self.access_secret.is_empty()
    }
}
