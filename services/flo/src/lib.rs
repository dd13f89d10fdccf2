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

//! Client for the azuqua flo api.
//!
//! Every call is signed with the account's access key and access secret:
//!
//! ```text
//! x-api-hash = hex(hmac_sha256(secret, lowercase(method) + ":" + path + ":" + timestamp + payload))
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use azuqua_core::{Context, OsEnv};
//! use azuqua_flo::{Client, Config, RequestParams};
//!
//! # async fn example(ctx: Context) -> azuqua_core::Result<()> {
//! // Credentials are taken from AZUQUA_ACCESS_KEY and AZUQUA_ACCESS_SECRET.
//! let client = Client::new(ctx.with_env(OsEnv), Config::new());
//!
//! for flo in client.flos(RequestParams::new()).await? {
//!     println!("{} => {}", flo.name, flo.alias);
//! }
//!
//! let resp = client
//!     .invoke_by_name("Send Email", RequestParams::new().with_body("to", "a@b.c"))
//!     .await?;
//! println!("{resp}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod constants;

mod config;
pub use config::{Config, HttpOptions, Protocol};

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod store;
pub use store::CredentialStore;

mod route;
pub use route::{Route, RouteTemplate};

mod params;
pub use params::RequestParams;

mod multipart;
pub use multipart::Multipart;

mod assemble;
pub use assemble::{assemble, AssembledRequest};

mod sign_request;
pub use sign_request::{AuthHeaders, RequestSigner, SignableRequest};

pub mod response;

mod flo;
pub use flo::{Flo, FloCache};

mod client;
pub use client::Client;

pub use tokio_util::sync::CancellationToken;
