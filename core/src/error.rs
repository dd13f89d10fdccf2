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

use std::fmt;

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// The error type for azuqua operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
    body: Option<ResponseBody>,
    code: Option<String>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Access key or access secret is missing.
    ///
    /// Always raised before any network I/O happens.
    AccountNotConfigured,

    /// Configuration error (missing file, unparsable content, missing fields)
    ConfigInvalid,

    /// A path placeholder has no matching value, or values are left over.
    ParameterMismatch,

    /// Request cannot be built (invalid header, invalid query value, etc.)
    RequestInvalid,

    /// Server responded with a status outside `[200, 400)`.
    Http,

    /// Server responded with a body that is not valid JSON.
    ResponseParse,

    /// Server responded with a success status but the body carries an `error`.
    Api,

    /// The flo could not be resolved from the local flo cache.
    FloNotFound,

    /// Transport level failure (DNS, connection refused, TLS, timeout).
    Network,

    /// The call was cancelled by the caller.
    Cancelled,

    /// Unexpected errors (I/O, encoding, etc.)
    Unexpected,
}

/// The body returned by the server alongside an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed as JSON.
    Json(Value),
    /// Body that could not be parsed as JSON.
    Text(String),
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            code: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the http status returned by the server.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the body returned by the server.
    pub fn with_body(mut self, body: ResponseBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach the underlying transport error code, like `ETIMEDOUT`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the http status if the error comes from a server response.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Get the raw server payload if available.
    pub fn body(&self) -> Option<&ResponseBody> {
        self.body.as_ref()
    }

    /// Get the underlying transport error code if available.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Check if this error was produced by the server rather than locally.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Http | ErrorKind::ResponseParse | ErrorKind::Api
        )
    }
}

// Convenience constructors
impl Error {
    /// Create an account not configured error
    pub fn account_not_configured(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountNotConfigured, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a parameter mismatch error
    pub fn parameter_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParameterMismatch, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create an http error
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Http, message).with_status(status)
    }

    /// Create a response parse error
    pub fn response_parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResponseParse, message)
    }

    /// Create an api error
    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Api, message)
    }

    /// Create a flo not found error
    pub fn flo_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FloNotFound, message)
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Create a cancelled error
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::AccountNotConfigured => write!(f, "account not configured"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::ParameterMismatch => write!(f, "parameter mismatch"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Http => write!(f, "http error"),
            ErrorKind::ResponseParse => write!(f, "response parse error"),
            ErrorKind::Api => write!(f, "api error"),
            ErrorKind::FloNotFound => write!(f, "flo not found"),
            ErrorKind::Network => write!(f, "network error"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::method::InvalidMethod> for Error {
    fn from(err: http::method::InvalidMethod) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
