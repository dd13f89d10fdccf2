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

use azuqua_core::time::parse_rfc3339;
use azuqua_flo::{assemble, Credential, RequestParams, RequestSigner, SignableRequest};
use http::Method;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

#[test_case(Method::POST, "/flo/:alias/invoke", json!({"alias": "abc", "a": 1}),
    "/flo/abc/invoke", r#"{"a":1}"#,
    "b96f5f84621db2e46b655a5403093e93d8b33eb4e677ab6142bb6f711a3ab11a"; "invoke with body")]
#[test_case(Method::GET, "/flo/:alias/read", json!({"alias": "abc"}),
    "/flo/abc/read", "",
    "80d2da9e8d28ff0ec47a90042f51c06d603513c32a00e28764952e3f823b6c8e"; "read without query")]
#[test_case(Method::POST, "/flo/abc/enable", Value::Null,
    "/flo/abc/enable", "{}",
    "cc5a104ea84971b6bf075c73e0dd5041a95c2075a07d5a082c2c395142eb243f"; "write without body")]
#[test_case(Method::GET, "/account/flos", json!({"query": {"org": 5, "limit": "10"}}),
    "/account/flos?limit=10&org=5", r#"{"limit":"10","org":"5"}"#,
    "6ca16992b272509c2837a0890e24912ec03339054e89f56ab6e728b228dd4496"; "list with query")]
fn test_golden(
    method: Method,
    pattern: &str,
    params: Value,
    path: &str,
    payload: &str,
    hash: &str,
) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut req = assemble(method, pattern, RequestParams::from_value(params).unwrap()).unwrap();
    assert_eq!(req.path, path);
    assert_eq!(req.payload, payload);

    RequestSigner::new()
        .with_time(parse_rfc3339("2024-01-01T00:00:00.000Z").unwrap())
        .sign_request(&Credential::new("k", "s"), &mut req)
        .unwrap();
    assert_eq!(req.headers["x-api-hash"], hash);
}

#[test]
fn test_string_to_sign() {
    let req = SignableRequest {
        method: &Method::DELETE,
        path: "/rule/7",
        timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        payload: "",
    };

    assert_eq!(req.string_to_sign(), "delete:/rule/7:2024-01-01T00:00:00.000Z");
}

#[test]
fn test_query_order_does_not_change_hash() {
    let signer =
        RequestSigner::new().with_time(parse_rfc3339("2024-01-01T00:00:00.000Z").unwrap());
    let cred = Credential::new("k", "s");

    let mut a = assemble(
        Method::GET,
        "/account/flos",
        RequestParams::new().with_query("org", 5).with_query("limit", 10),
    )
    .unwrap();
    let mut b = assemble(
        Method::GET,
        "/account/flos",
        RequestParams::new().with_query("limit", "10").with_query("org", "5"),
    )
    .unwrap();
    signer.sign_request(&cred, &mut a).unwrap();
    signer.sign_request(&cred, &mut b).unwrap();

    assert_eq!(a.path, b.path);
    assert_eq!(a.headers["x-api-hash"], b.headers["x-api-hash"]);
}
