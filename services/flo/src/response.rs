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

//! Turn raw api responses into values or typed errors.

use azuqua_core::{Error, ResponseBody, Result};
use bytes::Bytes;
use http::StatusCode;
use log::debug;
use serde_json::Value;

/// Classification of one raw response.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 2xx or 3xx with a JSON body that carries no error.
    Success(Value),
    /// Status outside `[200, 400)`.
    HttpError {
        /// Status returned by the server.
        status: StatusCode,
        /// Message extracted from the body.
        message: String,
        /// Parsed JSON body, or the raw text.
        body: ResponseBody,
    },
    /// Success status but the body is not JSON.
    ParseError(String),
    /// Success status but the JSON body carries an `error`.
    BusinessError {
        /// Status returned by the server.
        status: StatusCode,
        /// Message extracted from the error.
        message: String,
        /// The whole JSON body.
        body: Value,
    },
}

impl Outcome {
    /// Convert into the value a caller sees.
    pub fn into_result(self) -> Result<Value> {
        match self {
            Outcome::Success(v) => Ok(v),
            Outcome::HttpError {
                status,
                message,
                body,
            } => Err(Error::http(status, message).with_body(body)),
            Outcome::ParseError(text) => Err(Error::response_parse(format!(
                "failed to parse server response as JSON: {text}"
            ))
            .with_body(ResponseBody::Text(text))),
            Outcome::BusinessError {
                status,
                message,
                body,
            } => Err(Error::api(message)
                .with_status(status)
                .with_body(ResponseBody::Json(body))),
        }
    }
}

/// Check if a successful response body actually reports a failure.
///
/// The api may answer `200` with `{"error": ...}` when the request was
/// accepted but the flo rejected it.
pub fn is_business_error(body: &Value) -> bool {
    matches!(
        body.get("error"),
        Some(v) if !v.is_null() && v != &Value::Bool(false)
    )
}

/// Classify a status and body.
///
/// This is a pure function: the same input always yields the same outcome.
pub fn classify(status: StatusCode, body: &[u8]) -> Outcome {
    let parsed = serde_json::from_slice::<Value>(body);

    if !(200..400).contains(&status.as_u16()) {
        let (message, body) = match parsed {
            Ok(v) => (
                error_message(&v).unwrap_or_else(|| default_message(status)),
                ResponseBody::Json(v),
            ),
            Err(_) => (
                default_message(status),
                ResponseBody::Text(String::from_utf8_lossy(body).to_string()),
            ),
        };
        return Outcome::HttpError {
            status,
            message,
            body,
        };
    }

    match parsed {
        Err(_) => Outcome::ParseError(String::from_utf8_lossy(body).to_string()),
        Ok(v) if is_business_error(&v) => Outcome::BusinessError {
            status,
            message: error_message(&v).unwrap_or_else(|| v["error"].to_string()),
            body: v,
        },
        Ok(v) => Outcome::Success(v),
    }
}

/// Normalize a raw http response into a value or a typed error.
pub fn normalize(resp: http::Response<Bytes>) -> Result<Value> {
    let status = resp.status();
    let outcome = classify(status, resp.body());
    if !matches!(outcome, Outcome::Success(_)) {
        debug!("server responded with status {status}, classified as error");
    }

    outcome.into_result()
}

// error.message, then error, then message.
fn error_message(v: &Value) -> Option<String> {
    let error = v.get("error");
    error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| error.and_then(Value::as_str))
        .or_else(|| v.get("message").and_then(Value::as_str))
        .map(str::to_string)
}

fn default_message(status: StatusCode) -> String {
    format!("server responded with status {}", status.as_u16())
}
