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

//! Azuqua flo api with convenience APIs.

pub use azuqua_flo::*;

#[cfg(feature = "default-context")]
use crate::default_context;

/// Create a flo client with the default context.
///
/// This function creates a client with:
/// - Default context (tokio file reader, reqwest http client, OS env)
/// - Credentials from `AZUQUA_ACCESS_KEY` and `AZUQUA_ACCESS_SECRET`, or the
///   legacy `ACCESS_KEY` and `ACCESS_SECRET`
/// - `https://api.azuqua.com:443`
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> azuqua::Result<()> {
/// let client = azuqua::flo::default_client();
/// let flos = client.flos(azuqua::flo::RequestParams::new()).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_client() -> Client {
    Client::new(default_context(), Config::new())
}

/// Create a flo client with the default context and the given config.
///
/// Credentials set on `config` win over env.
#[cfg(feature = "default-context")]
pub fn default_client_with_config(config: Config) -> Client {
    Client::new(default_context(), config)
}
