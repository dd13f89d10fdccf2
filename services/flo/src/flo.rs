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

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use azuqua_core::time::{parse_rfc3339, DateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A flo as listed by the api.
///
/// Only the well known fields are typed, anything else the api returns is
/// kept in `extra`. A typed field that is `null` or carries an unexpected
/// type falls back to its default instead of failing the whole listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flo {
    /// ID of the flo.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// Alias of the flo, used in every flo route.
    #[serde(default, deserialize_with = "lenient_string")]
    pub alias: String,
    /// Display name of the flo.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Version of the flo.
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: Option<String>,
    /// Whether the flo is turned on.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: bool,
    /// Whether the flo has been published.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub published: bool,
    /// Security level access of the flo.
    #[serde(default, deserialize_with = "string_or_number")]
    pub security_level: Option<String>,
    /// Client token of the flo.
    #[serde(default, deserialize_with = "string_or_number")]
    pub client_token: Option<String>,
    /// Description of the flo.
    #[serde(default, deserialize_with = "string_or_number")]
    pub description: Option<String>,
    /// Creation time as sent by the api.
    #[serde(default, deserialize_with = "string_or_number")]
    pub created: Option<String>,
    /// Update time as sent by the api.
    #[serde(default, deserialize_with = "string_or_number")]
    pub updated: Option<String>,
    /// Every other field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Flo {
    /// Parse `created`, returns `None` if it's absent or not RFC 3339.
    pub fn created_at(&self) -> Option<DateTime> {
        self.created.as_deref().and_then(|v| parse_rfc3339(v).ok())
    }

    /// Parse `updated`, returns `None` if it's absent or not RFC 3339.
    pub fn updated_at(&self) -> Option<DateTime> {
        self.updated.as_deref().and_then(|v| parse_rfc3339(v).ok())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(v)) => Some(v),
        Some(Value::Number(v)) => Some(v.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_number(deserializer)?.unwrap_or_default())
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(
        Option::<Value>::deserialize(deserializer)?,
        Some(Value::Bool(true))
    ))
}

#[derive(Debug, Default)]
struct State {
    flos: Vec<Flo>,
    aliases_by_name: HashMap<String, String>,
}

/// Local cache of the flos of the account, mapping display name to alias.
///
/// The cache has no TTL. It's filled by listing flos and replaced wholesale
/// on every listing; the last writer wins.
#[derive(Debug, Default, Clone)]
pub struct FloCache {
    state: Arc<Mutex<Option<State>>>,
}

impl FloCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached flos.
    ///
    /// If several flos share a name, the first one listed wins.
    pub fn replace(&self, flos: Vec<Flo>) {
        let mut aliases_by_name = HashMap::with_capacity(flos.len());
        for flo in &flos {
            if flo.name.is_empty() || flo.alias.is_empty() {
                continue;
            }
            aliases_by_name
                .entry(flo.name.clone())
                .or_insert_with(|| flo.alias.clone());
        }

        *self.state.lock().expect("lock poisoned") = Some(State {
            flos,
            aliases_by_name,
        });
    }

    /// Drop every cached flo.
    pub fn clear(&self) {
        *self.state.lock().expect("lock poisoned") = None;
    }

    /// Check if the cache has been filled since creation or the last clear.
    pub fn is_populated(&self) -> bool {
        self.state.lock().expect("lock poisoned").is_some()
    }

    /// Snapshot of the cached flos.
    pub fn flos(&self) -> Option<Vec<Flo>> {
        self.state
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .map(|s| s.flos.clone())
    }

    /// Resolve a display name or an alias to an alias.
    ///
    /// A known alias resolves to itself.
    pub fn resolve(&self, name_or_alias: &str) -> Option<String> {
        let state = self.state.lock().expect("lock poisoned");
        let state = state.as_ref()?;

        if state.flos.iter().any(|f| f.alias == name_or_alias) {
            return Some(name_or_alias.to_string());
        }
        state.aliases_by_name.get(name_or_alias).cloned()
    }
}
