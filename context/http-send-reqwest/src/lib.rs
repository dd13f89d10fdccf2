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

//! Reqwest-based http sending implementation for azuqua.
//!
//! `ReqwestHttpSend` performs exactly one request per call and collects the
//! whole response body before returning. TLS or plaintext is picked from the
//! request uri scheme. Connection pooling is whatever the wrapped
//! `reqwest::Client` provides.
//!
//! ## Example
//!
//! ```no_run
//! use azuqua_core::Context;
//! use azuqua_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn main() -> anyhow::Result<()> {
//! let client = reqwest::Client::builder()
//!     .user_agent("azuqua-rs/0.1")
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//!
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! # Ok(())
//! # }
//! ```

use std::error::Error as _;
use std::io;

use async_trait::async_trait;
use azuqua_core::{Error, HttpSend, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to build request").with_source(e))?;
        debug!("sending {} {}", req.method(), req.url());

        let resp: http::Response<_> = self.client.execute(req).await.map_err(network_error)?.into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(network_error)?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

/// Map a reqwest failure into a network error carrying the best code we can find.
fn network_error(err: reqwest::Error) -> Error {
    let code = error_code(&err);
    Error::network(format!("failed to reach requested resource ({code})"))
        .with_code(code)
        .with_source(err)
}

fn error_code(err: &reqwest::Error) -> &'static str {
    // Prefer the os level error if there is one.
    let mut source = err.source();
    while let Some(e) = source {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionRefused => return "ECONNREFUSED",
                io::ErrorKind::ConnectionReset => return "ECONNRESET",
                io::ErrorKind::ConnectionAborted => return "ECONNABORTED",
                io::ErrorKind::TimedOut => return "ETIMEDOUT",
                io::ErrorKind::NotConnected => return "ENOTCONN",
                io::ErrorKind::AddrNotAvailable => return "EADDRNOTAVAIL",
                _ => {}
            }
        }
        source = e.source();
    }

    if err.is_timeout() {
        "ETIMEDOUT"
    } else if err.is_connect() {
        "ECONNECT"
    } else if err.is_body() || err.is_decode() {
        "EBODY"
    } else {
        "EREQUEST"
    }
}
