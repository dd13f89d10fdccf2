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

use azuqua_core::hash::hex_hmac_sha256;
use azuqua_core::time::{format_iso8601_millis, now, DateTime};
use azuqua_core::{Error, Result, SigningCredential};
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use log::debug;

use crate::constants::{X_API_ACCESS_KEY, X_API_HASH, X_API_TIMESTAMP};
use crate::{AssembledRequest, Credential};

/// Everything covered by a signature. Lives for one call only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest<'a> {
    /// Http method, lowercased when signing.
    pub method: &'a Method,
    /// Path including the query string.
    pub path: &'a str,
    /// ISO 8601 timestamp with millisecond precision.
    pub timestamp: String,
    /// Serialized body, query or content hash.
    pub payload: &'a str,
}

impl SignableRequest<'_> {
    /// Construct string to sign
    ///
    /// ## Format
    ///
    /// ```text
    /// lowercase(method) + ":" + path + ":" + timestamp + payload
    /// ```
    ///
    /// The timestamp always has the same length, so a `:` inside the path or
    /// the payload can't shift the boundaries between the parts.
    pub fn string_to_sign(&self) -> String {
        format!(
            "{}:{}:{}{}",
            self.method.as_str().to_ascii_lowercase(),
            self.path,
            self.timestamp,
            self.payload
        )
    }

    /// Lowercase hex HMAC-SHA256 of the string to sign keyed by `secret`.
    pub fn hash(&self, secret: &str) -> String {
        hex_hmac_sha256(secret.as_bytes(), self.string_to_sign().as_bytes())
    }
}

/// Authentication headers of one request.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Value of `x-api-hash`.
    pub hash: String,
    /// Value of `x-api-accesskey`.
    pub access_key: String,
    /// Value of `x-api-timestamp`, the same one that was signed.
    pub timestamp: String,
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("hash", &azuqua_core::utils::Redact::from(&self.hash))
            .field("access_key", &self.access_key)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl AuthHeaders {
    /// Insert the auth headers, replacing any header with the same name.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(HeaderName::from_static(X_API_HASH), {
            let mut value: HeaderValue = self.hash.parse()?;
            value.set_sensitive(true);

            value
        });
        headers.insert(
            HeaderName::from_static(X_API_ACCESS_KEY),
            self.access_key.parse()?,
        );
        headers.insert(
            HeaderName::from_static(X_API_TIMESTAMP),
            self.timestamp.parse()?,
        );

        Ok(())
    }
}

/// RequestSigner computes the azuqua api hash of a request.
#[derive(Debug, Default, Clone)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a signer which signs with the current time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign method, path and payload with the credential.
    ///
    /// Fails with [`azuqua_core::ErrorKind::AccountNotConfigured`] if the
    /// access key or access secret is empty.
    pub fn sign(
        &self,
        cred: &Credential,
        method: &Method,
        path: &str,
        payload: &str,
    ) -> Result<AuthHeaders> {
        if !cred.is_valid() {
            return Err(Error::account_not_configured(
                "access key and access secret must both be set",
            ));
        }

        // One timestamp for both the signed string and the header.
        let timestamp = format_iso8601_millis(self.time.unwrap_or_else(now));
        let signable = SignableRequest {
            method,
            path,
            timestamp,
            payload,
        };
        debug!("calculated string to sign: {}", signable.string_to_sign());

        let hash = signable.hash(&cred.access_secret);
        Ok(AuthHeaders {
            hash,
            access_key: cred.access_key.clone(),
            timestamp: signable.timestamp,
        })
    }

    /// Sign an assembled request and attach the auth headers to it.
    pub fn sign_request(&self, cred: &Credential, req: &mut AssembledRequest) -> Result<()> {
        let headers = self.sign(cred, &req.method, &req.path, &req.payload)?;
        headers.apply(&mut req.headers)
    }
}
