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

use std::collections::BTreeMap;

use azuqua_core::hash::hex_sha256;
use azuqua_core::{Error, Result};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, Method};
use log::debug;
use percent_encoding::utf8_percent_encode;
use serde_json::{Map, Value};

use crate::constants::{APPLICATION_JSON, URI_COMPONENT_ENCODE_SET};
use crate::route::{has_placeholders, resolve_path_named};
use crate::RequestParams;

/// A request ready to be signed and sent.
#[derive(Debug, Clone)]
pub struct AssembledRequest {
    /// Http method.
    pub method: Method,
    /// Path with the sorted, encoded query string appended.
    pub path: String,
    /// Default headers merged with the caller's headers.
    pub headers: HeaderMap,
    /// Bytes sent on the wire, empty for GET and DELETE.
    pub body: Bytes,
    /// The payload covered by the signature.
    pub payload: String,
}

/// Turn a method, a path pattern and params into a concrete request.
///
/// - `:name` placeholders in `path` are filled from the top-level params.
/// - GET and DELETE never send a body; the payload is the query as JSON,
///   with every value as a string, or empty if there is no query.
/// - Other methods send the body as JSON; the payload is the same JSON, or
///   `{}` if the body is empty, in which case nothing is sent.
/// - Multipart forms are encoded once; the payload is the hex sha256 of the
///   encoded bytes.
pub fn assemble(method: Method, path: &str, params: RequestParams) -> Result<AssembledRequest> {
    let mut params = params;
    let path = if has_placeholders(path) {
        resolve_path_named(path, params.fields_mut())?
    } else {
        path.to_string()
    };
    let path = if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    };

    let (query, extra_headers, body, multipart) = params.into_parts();
    let query = stringify_query(query)?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

    let (body, payload) = if is_read_method(&method) {
        if multipart.is_some() {
            return Err(Error::request_invalid(format!(
                "{method} requests can't carry a multipart body"
            )));
        }
        if !body.is_empty() {
            debug!("dropping body fields of {method} {path}, the api doesn't accept them");
        }

        let payload = if query.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&query)?
        };
        (Bytes::new(), payload)
    } else if let Some(form) = multipart {
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(&form.content_type())?);

        let bytes = form.encode();
        let payload = hex_sha256(&bytes);
        (bytes, payload)
    } else if body.is_empty() {
        (Bytes::new(), "{}".to_string())
    } else {
        let payload = serde_json::to_string(&body)?;
        (Bytes::from(payload.clone()), payload)
    };

    for (key, value) in extra_headers {
        let name = HeaderName::from_bytes(key.as_bytes())?;
        let value = HeaderValue::from_str(&scalar_to_string("header", &key, &value)?)?;
        headers.insert(name, value);
    }

    let path = if query.is_empty() {
        path
    } else {
        format!("{path}?{}", encode_query(&query))
    };

    Ok(AssembledRequest {
        method,
        path,
        headers,
        body,
        payload,
    })
}

/// GET and DELETE carry their data in the query string.
pub(crate) fn is_read_method(method: &Method) -> bool {
    method == Method::GET || method == Method::DELETE
}

fn stringify_query(query: Map<String, Value>) -> Result<BTreeMap<String, String>> {
    query
        .iter()
        .map(|(k, v)| Ok((k.clone(), scalar_to_string("query", k, v)?)))
        .collect()
}

fn scalar_to_string(place: &str, key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(v) => Ok(v.clone()),
        Value::Number(v) => Ok(v.to_string()),
        Value::Bool(v) => Ok(v.to_string()),
        v => Err(Error::request_invalid(format!(
            "{place} value of '{key}' must be a string, number or bool, got {v}"
        ))),
    }
}

fn encode_query(query: &BTreeMap<String, String>) -> String {
    query
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, &URI_COMPONENT_ENCODE_SET),
                utf8_percent_encode(v, &URI_COMPONENT_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
