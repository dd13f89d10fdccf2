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

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use azuqua_core::utils::Redact;
use azuqua_core::{Context, Error};

use crate::constants::*;

/// Protocol used to reach the api.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Plaintext http.
    Http,
    /// Http over TLS.
    #[default]
    Https,
}

impl Protocol {
    /// Guess the protocol from a port number: 443 is https, anything else is http.
    ///
    /// This mirrors how older clients picked the protocol. Prefer setting
    /// [`Config::protocol`] explicitly; this is only used when a port is
    /// configured without a protocol.
    pub fn from_port(port: u16) -> Self {
        if port == DEFAULT_HTTPS_PORT {
            Protocol::Https
        } else {
            Protocol::Http
        }
    }

    /// The uri scheme for this protocol.
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Default port for this protocol.
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => DEFAULT_HTTPS_PORT,
        }
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.scheme())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches(':').to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            v => Err(Error::config_invalid(format!(
                "protocol must be http or https, got '{v}'"
            ))),
        }
    }
}

/// Where the api lives.
///
/// HttpOptions is frozen once built: there are no setters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpOptions {
    host: String,
    port: u16,
    protocol: Protocol,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_HTTPS_PORT,
            protocol: Protocol::Https,
        }
    }
}

impl HttpOptions {
    /// Create a new HttpOptions.
    pub fn new(host: impl Into<String>, port: u16, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
        }
    }

    /// Host of the api.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port of the api.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Protocol of the api.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Build the full url for a path which already carries its query string.
    pub fn url(&self, path_and_query: &str) -> String {
        format!(
            "{}://{}:{}{}",
            self.protocol.scheme(),
            self.host,
            self.port,
            path_and_query
        )
    }
}

/// Config carries all the configuration for the flo client.
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZUQUA_ACCESS_KEY`]
    /// - env value: [`ACCESS_KEY`]
    pub access_key: Option<String>,
    /// `access_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZUQUA_ACCESS_SECRET`]
    /// - env value: [`ACCESS_SECRET`]
    pub access_secret: Option<String>,
    /// Api host, defaults to `api.azuqua.com`.
    pub host: Option<String>,
    /// Api port, defaults to the protocol's default port.
    pub port: Option<u16>,
    /// Api protocol.
    ///
    /// If unset and a port is set, the protocol is guessed from the port.
    /// Otherwise https.
    pub protocol: Option<Protocol>,
    /// Upper bound for a single request, unset means no timeout.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set access_key
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Set access_secret
    pub fn with_access_secret(mut self, access_secret: impl Into<String>) -> Self {
        self.access_secret = Some(access_secret.into());
        self
    }

    /// Set host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set protocol
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load credentials from env.
    ///
    /// Values already set on this config are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = env_value(ctx, AZUQUA_ACCESS_KEY, ACCESS_KEY) {
            self.access_key.get_or_insert(v);
        }
        if let Some(v) = env_value(ctx, AZUQUA_ACCESS_SECRET, ACCESS_SECRET) {
            self.access_secret.get_or_insert(v);
        }

        self
    }

    /// Build the frozen http options.
    pub fn http_options(&self) -> HttpOptions {
        let protocol = match (self.protocol, self.port) {
            (Some(protocol), _) => protocol,
            (None, Some(port)) => Protocol::from_port(port),
            (None, None) => Protocol::Https,
        };

        HttpOptions {
            host: self
                .host
                .clone()
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or_else(|| protocol.default_port()),
            protocol,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key", &Redact::from(&self.access_key))
            .field("access_secret", &Redact::from(&self.access_secret))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("protocol", &self.protocol)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Empty values fall through to the generic name.
fn env_value(ctx: &Context, prefixed: &str, generic: &str) -> Option<String> {
    ctx.env_var(prefixed)
        .filter(|v| !v.is_empty())
        .or_else(|| ctx.env_var(generic).filter(|v| !v.is_empty()))
}
