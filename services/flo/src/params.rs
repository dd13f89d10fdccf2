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

use azuqua_core::{Error, Result};
use serde_json::{Map, Value};

use crate::Multipart;

/// Caller supplied parameters of a request.
///
/// Parameters come as one JSON object. The nested `query`, `headers` and
/// `body` objects go to their place, every other top-level key is either
/// consumed by a path placeholder or folded into the body.
///
/// ```
/// use azuqua_flo::RequestParams;
/// use serde_json::json;
///
/// let params = RequestParams::from_value(json!({
///     "headers": {"x-trace": "abc"},
///     "query": {"limit": 10},
///     "body": {"name": "azuqua"},
///     "location": "Seattle",
/// }))
/// .unwrap();
///
/// assert_eq!(params.merged_body(), json!({"name": "azuqua", "location": "Seattle"}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    query: Map<String, Value>,
    headers: Map<String, Value>,
    body: Map<String, Value>,
    fields: Map<String, Value>,
    multipart: Option<Multipart>,
}

impl RequestParams {
    /// Create empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition a JSON value into params.
    ///
    /// `null` is treated as empty. Anything but an object is rejected, and so
    /// are `query`, `headers` or `body` entries which are not objects.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut fields = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            v => {
                return Err(Error::request_invalid(format!(
                    "request params must be a JSON object, got {v}"
                )))
            }
        };

        Ok(Self {
            query: take_object(&mut fields, "query")?,
            headers: take_object(&mut fields, "headers")?,
            body: take_object(&mut fields, "body")?,
            fields,
            multipart: None,
        })
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add an extra header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Add a body field.
    pub fn with_body(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Add a top-level field, which fills a path placeholder or lands in the body.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Send a multipart form instead of a JSON body.
    pub fn with_multipart(mut self, form: Multipart) -> Self {
        self.multipart = Some(form);
        self
    }

    /// Query parameters.
    pub fn query(&self) -> &Map<String, Value> {
        &self.query
    }

    /// Extra headers.
    pub fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }

    /// Multipart form, if any.
    pub fn multipart(&self) -> Option<&Multipart> {
        self.multipart.as_ref()
    }

    /// The body as it will be sent: the nested body with top-level fields on top.
    pub fn merged_body(&self) -> Value {
        let mut body = self.body.clone();
        body.extend(self.fields.clone());
        Value::Object(body)
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Map<String, Value>,
        Map<String, Value>,
        Map<String, Value>,
        Option<Multipart>,
    ) {
        let mut body = self.body;
        body.extend(self.fields);
        (self.query, self.headers, body, self.multipart)
    }
}

impl TryFrom<Value> for RequestParams {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

fn take_object(fields: &mut Map<String, Value>, key: &str) -> Result<Map<String, Value>> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(v) => Err(Error::request_invalid(format!(
            "'{key}' in request params must be a JSON object, got {v}"
        ))),
    }
}
