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

//! Static route table of the azuqua api.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use azuqua_core::{Error, Result};
use http::Method;
use once_cell::sync::Lazy;
use percent_encoding::utf8_percent_encode;
use serde_json::{Map, Value};

use crate::constants::URI_COMPONENT_ENCODE_SET;

/// A path pattern plus the http method used to reach it.
///
/// The pattern may contain `:name` segments which are filled at request time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTemplate {
    path: &'static str,
    method: Method,
}

impl RouteTemplate {
    /// Create a new route template.
    pub const fn new(path: &'static str, method: Method) -> Self {
        Self { path, method }
    }

    /// The raw path pattern, like `/flo/:alias/invoke`.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// The http method of this route.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Names of the placeholders in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix(':'))
    }

    /// Fill placeholders by position.
    ///
    /// The number of values must match the number of placeholders exactly.
    pub fn resolve(&self, values: &[&str]) -> Result<String> {
        let mut values = values.iter();
        let path = render(self.path, |name| {
            values.next().map(|v| v.to_string()).ok_or_else(|| {
                Error::parameter_mismatch(format!(
                    "missing value for placeholder :{name} in {}",
                    self.path
                ))
            })
        })?;

        let left = values.count();
        if left > 0 {
            return Err(Error::parameter_mismatch(format!(
                "{left} values left over after filling {}",
                self.path
            )));
        }

        Ok(path)
    }

    /// Fill placeholders by name, consuming the matching keys from `params`.
    ///
    /// Only string and number values can fill a placeholder.
    pub fn resolve_named(&self, params: &mut Map<String, Value>) -> Result<String> {
        resolve_path_named(self.path, params)
    }
}

/// Fill the placeholders of any path pattern by name, consuming the matching keys.
pub(crate) fn resolve_path_named(pattern: &str, params: &mut Map<String, Value>) -> Result<String> {
    render(pattern, |name| match params.remove(name) {
        Some(Value::String(v)) => Ok(v),
        Some(Value::Number(v)) => Ok(v.to_string()),
        Some(v) => Err(Error::parameter_mismatch(format!(
            "placeholder :{name} in {pattern} can't be filled with {v}"
        ))),
        None => Err(Error::parameter_mismatch(format!(
            "missing value for placeholder :{name} in {pattern}"
        ))),
    })
}

/// Check if a path pattern carries any `:name` segment.
pub(crate) fn has_placeholders(pattern: &str) -> bool {
    pattern.split('/').any(|segment| segment.starts_with(':'))
}

fn render(pattern: &str, mut lookup: impl FnMut(&str) -> Result<String>) -> Result<String> {
    let mut segments = Vec::new();
    for segment in pattern.split('/') {
        match segment.strip_prefix(':') {
            Some(name) => {
                let value = lookup(name)?;
                if value.is_empty() {
                    return Err(Error::parameter_mismatch(format!(
                        "empty value for placeholder :{name} in {pattern}"
                    )));
                }
                segments.push(utf8_percent_encode(&value, &URI_COMPONENT_ENCODE_SET).to_string())
            }
            None => segments.push(segment.to_string()),
        }
    }

    Ok(segments.join("/"))
}

/// All logical operations of the azuqua api.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Read the definition of a flo.
    ReadFlo,
    /// Invoke a flo.
    Invoke,
    /// Resume a paused flo execution.
    Resume,
    /// Inject data into a flo.
    Inject,
    /// Turn a flo on.
    Enable,
    /// Turn a flo off.
    Disable,
    /// List all flos of the account.
    Flos,
    /// Schedule a flo.
    Schedule,
    /// Retry a flo execution.
    Retry,
    /// Read the inputs of a flo.
    Inputs,
    /// Read the outputs of a flo.
    Outputs,
    /// Read the telemetry data of a flo execution.
    ReadFloExecutionTelemetry,
    /// Read the metrics of a flo execution.
    ReadFloExecutionMetrics,
    /// Read the past executions of a flo.
    ReadFloPastExecutions,
    /// Read the orgs and groups of the user.
    Groups,
    /// Create a rule.
    CreateRule,
    /// Read a rule.
    ReadRule,
    /// Update a rule.
    UpdateRule,
    /// Delete a rule.
    DeleteRule,
    /// Read all rules of the account.
    ReadAllRules,
    /// Link a rule to a flo.
    LinkRuleAndFlo,
    /// Read the connectors of an org.
    GetOrgConnectors,
}

static ROUTES_BY_NAME: Lazy<HashMap<&'static str, Route>> =
    Lazy::new(|| Route::ALL.iter().map(|r| (r.name(), *r)).collect());

impl Route {
    /// Every route in table order.
    pub const ALL: [Route; 22] = [
        Route::ReadFlo,
        Route::Invoke,
        Route::Resume,
        Route::Inject,
        Route::Enable,
        Route::Disable,
        Route::Flos,
        Route::Schedule,
        Route::Retry,
        Route::Inputs,
        Route::Outputs,
        Route::ReadFloExecutionTelemetry,
        Route::ReadFloExecutionMetrics,
        Route::ReadFloPastExecutions,
        Route::Groups,
        Route::CreateRule,
        Route::ReadRule,
        Route::UpdateRule,
        Route::DeleteRule,
        Route::ReadAllRules,
        Route::LinkRuleAndFlo,
        Route::GetOrgConnectors,
    ];

    /// Look a route up by its api name, like `readFlo`.
    pub fn from_name(name: &str) -> Option<Route> {
        ROUTES_BY_NAME.get(name).copied()
    }

    /// The api name of this route.
    pub fn name(&self) -> &'static str {
        match self {
            Route::ReadFlo => "readFlo",
            Route::Invoke => "invoke",
            Route::Resume => "resume",
            Route::Inject => "inject",
            Route::Enable => "enable",
            Route::Disable => "disable",
            Route::Flos => "flos",
            Route::Schedule => "schedule",
            Route::Retry => "retry",
            Route::Inputs => "inputs",
            Route::Outputs => "outputs",
            Route::ReadFloExecutionTelemetry => "readFloExecutionTelemetry",
            Route::ReadFloExecutionMetrics => "readFloExecutionMetrics",
            Route::ReadFloPastExecutions => "readFloPastExecutions",
            Route::Groups => "groups",
            Route::CreateRule => "createRule",
            Route::ReadRule => "readRule",
            Route::UpdateRule => "updateRule",
            Route::DeleteRule => "deleteRule",
            Route::ReadAllRules => "readAllRules",
            Route::LinkRuleAndFlo => "linkRuleAndFlo",
            Route::GetOrgConnectors => "getOrgConnectors",
        }
    }

    /// The path pattern and method of this route.
    pub fn template(&self) -> RouteTemplate {
        match self {
            Route::ReadFlo => RouteTemplate::new("/flo/:alias/read", Method::GET),
            Route::Invoke => RouteTemplate::new("/flo/:alias/invoke", Method::POST),
            Route::Resume => RouteTemplate::new("/flo/:alias/resume/:exec", Method::POST),
            Route::Inject => RouteTemplate::new("/flo/:alias/inject", Method::POST),
            Route::Enable => RouteTemplate::new("/flo/:alias/enable", Method::POST),
            Route::Disable => RouteTemplate::new("/flo/:alias/disable", Method::POST),
            Route::Flos => RouteTemplate::new("/account/flos", Method::GET),
            Route::Schedule => RouteTemplate::new("/flo/:alias/schedule", Method::POST),
            Route::Retry => RouteTemplate::new("/flo/:alias/retry", Method::POST),
            Route::Inputs => RouteTemplate::new("/flo/:alias/inputs", Method::GET),
            Route::Outputs => RouteTemplate::new("/flo/:alias/outputs", Method::GET),
            Route::ReadFloExecutionTelemetry => {
                RouteTemplate::new("/telemetry/:alias/:exec/data", Method::GET)
            }
            Route::ReadFloExecutionMetrics => {
                RouteTemplate::new("/telemetry/:alias/:exec/metrics", Method::GET)
            }
            Route::ReadFloPastExecutions => {
                RouteTemplate::new("/telemetry/:alias/executions", Method::GET)
            }
            Route::Groups => RouteTemplate::new("/user/orgs", Method::GET),
            Route::CreateRule => RouteTemplate::new("/rule", Method::POST),
            Route::ReadRule => RouteTemplate::new("/rule/:id", Method::GET),
            Route::UpdateRule => RouteTemplate::new("/rule/:id", Method::PUT),
            Route::DeleteRule => RouteTemplate::new("/rule/:id", Method::DELETE),
            Route::ReadAllRules => RouteTemplate::new("/rules", Method::GET),
            Route::LinkRuleAndFlo => {
                RouteTemplate::new("/rule/:ruleId/associate/:floId", Method::POST)
            }
            Route::GetOrgConnectors => RouteTemplate::new("/connectors/:orgId", Method::GET),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
