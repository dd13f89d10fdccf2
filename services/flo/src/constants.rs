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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used by the azuqua api.
pub const X_API_HASH: &str = "x-api-hash";
pub const X_API_ACCESS_KEY: &str = "x-api-accesskey";
pub const X_API_TIMESTAMP: &str = "x-api-timestamp";

pub const APPLICATION_JSON: &str = "application/json";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

// Env values used by the azuqua api.
pub const AZUQUA_ACCESS_KEY: &str = "AZUQUA_ACCESS_KEY";
pub const AZUQUA_ACCESS_SECRET: &str = "AZUQUA_ACCESS_SECRET";
pub const AZUQUA_CONFIG_FILE: &str = "AZUQUA_CONFIG_FILE";
// Legacy generic pair, lower priority than the prefixed pair.
pub const ACCESS_KEY: &str = "ACCESS_KEY";
pub const ACCESS_SECRET: &str = "ACCESS_SECRET";

pub const DEFAULT_HOST: &str = "api.azuqua.com";
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// AsciiSet matching javascript's `encodeURIComponent`.
///
/// - Encode every byte except: 'A'-'Z', 'a'-'z', '0'-'9', '-', '_', '.', '!', '~', '*', '\'', '(', ')'.
pub static URI_COMPONENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');
