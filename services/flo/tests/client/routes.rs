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

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use azuqua_flo::{Config, Multipart, Protocol, RequestParams, Route};
use http::Method;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use super::{json_response, test_client, test_client_with_config, MockHttpSend};

const FLOS: &str = r#"[
    {"id": 1, "alias": "abc", "name": "Send Email", "active": true},
    {"id": 2, "alias": "def", "name": "Sync Leads", "active": false}
]"#;

#[tokio::test]
async fn test_invoke_signs_and_sends_json_body() -> Result<()> {
    let http = MockHttpSend::reply(200, r#"{"result": 42}"#);
    let client = test_client(http.clone());

    let resp = client
        .invoke("abc", RequestParams::new().with_body("a", 1))
        .await?;
    assert_eq!(resp, json!({"result": 42}));

    let reqs = http.requests();
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.uri.to_string(), "https://api.azuqua.com:443/flo/abc/invoke");
    assert_eq!(req.body.as_ref(), br#"{"a":1}"#);
    assert_eq!(req.header("accept"), "application/json");
    assert_eq!(req.header("content-type"), "application/json");
    assert_eq!(req.header("x-api-accesskey"), "k");
    assert_eq!(req.header("x-api-timestamp"), "2024-01-01T00:00:00.000Z");
    assert_eq!(
        req.header("x-api-hash"),
        "b96f5f84621db2e46b655a5403093e93d8b33eb4e677ab6142bb6f711a3ab11a"
    );
    Ok(())
}

#[tokio::test]
async fn test_enable_signs_empty_object() -> Result<()> {
    let http = MockHttpSend::reply(200, r#"{"active": true}"#);
    let client = test_client(http.clone());

    client.enable("abc").await?;

    let req = &http.requests()[0];
    assert_eq!(req.path_and_query(), "/flo/abc/enable");
    assert!(req.body.is_empty());
    assert_eq!(
        req.header("x-api-hash"),
        "cc5a104ea84971b6bf075c73e0dd5041a95c2075a07d5a082c2c395142eb243f"
    );
    Ok(())
}

#[tokio::test]
async fn test_read_flo_without_body() -> Result<()> {
    let http = MockHttpSend::reply(200, r#"{"alias": "abc"}"#);
    let client = test_client(http.clone());

    client.read_flo("abc").await?;

    let req = &http.requests()[0];
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.path_and_query(), "/flo/abc/read");
    assert!(req.body.is_empty());
    assert_eq!(
        req.header("x-api-hash"),
        "80d2da9e8d28ff0ec47a90042f51c06d603513c32a00e28764952e3f823b6c8e"
    );
    Ok(())
}

#[tokio::test]
#[allow(deprecated)]
async fn test_read_is_read_flo() -> Result<()> {
    let http = MockHttpSend::reply(200, r#"{"alias": "abc"}"#);
    let client = test_client(http.clone());

    assert_eq!(client.read("abc").await?, json!({"alias": "abc"}));
    assert_eq!(http.requests()[0].path_and_query(), "/flo/abc/read");
    Ok(())
}

#[tokio::test]
async fn test_flos_fills_cache() -> Result<()> {
    let http = MockHttpSend::reply(200, FLOS);
    let client = test_client(http.clone());

    let flos = client
        .flos(RequestParams::new().with_query("org", 5).with_query("limit", 10))
        .await?;
    assert_eq!(flos.len(), 2);
    assert_eq!(flos[0].id.as_deref(), Some("1"));

    let req = &http.requests()[0];
    assert_eq!(req.path_and_query(), "/account/flos?limit=10&org=5");
    assert!(req.body.is_empty());
    assert_eq!(
        req.header("x-api-hash"),
        "6ca16992b272509c2837a0890e24912ec03339054e89f56ab6e728b228dd4496"
    );

    assert_eq!(client.flo_cache().resolve("Sync Leads").as_deref(), Some("def"));
    Ok(())
}

#[tokio::test]
async fn test_flos_rejects_non_array() {
    let client = test_client(MockHttpSend::reply(200, r#"{"flos": []}"#));

    let err = client
        .flos(RequestParams::new())
        .await
        .expect_err("object listing must fail");
    assert_eq!(err.kind(), azuqua_core::ErrorKind::ResponseParse);
    assert!(!client.flo_cache().is_populated());
}

#[tokio::test]
async fn test_invoke_by_name_uses_cache() -> Result<()> {
    let listings = Arc::new(AtomicUsize::new(0));
    let counter = listings.clone();
    let http = MockHttpSend::new(move |req| {
        if req.uri().path() == "/account/flos" {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json_response(200, FLOS))
        } else {
            Ok(json_response(200, r#"{"ok": true}"#))
        }
    });
    let client = test_client(http.clone());

    client
        .invoke_by_name("Send Email", RequestParams::new())
        .await?;
    client
        .invoke_by_name("Send Email", RequestParams::new())
        .await?;
    // An alias resolves to itself.
    client.invoke_by_name("def", RequestParams::new()).await?;

    assert_eq!(listings.load(Ordering::SeqCst), 1);
    let paths: Vec<_> = http
        .requests()
        .iter()
        .map(|r| r.path_and_query().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/account/flos",
            "/flo/abc/invoke",
            "/flo/abc/invoke",
            "/flo/def/invoke"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_invoke_by_name_with_loosely_typed_listing() -> Result<()> {
    let http = MockHttpSend::new(|req| {
        if req.uri().path() == "/account/flos" {
            Ok(json_response(
                200,
                r#"[{"alias": "abc", "name": "Send", "active": null, "security_level": 2}]"#,
            ))
        } else {
            Ok(json_response(200, r#"{"ok": true}"#))
        }
    });
    let client = test_client(http.clone());

    let flos = client.flos(RequestParams::new()).await?;
    assert_eq!(flos.len(), 1);
    assert!(!flos[0].active);
    assert_eq!(flos[0].security_level.as_deref(), Some("2"));

    client.invoke_by_name("Send", RequestParams::new()).await?;
    assert_eq!(
        http.requests()[1].path_and_query().to_string(),
        "/flo/abc/invoke"
    );
    Ok(())
}

#[tokio::test]
async fn test_invoke_by_unknown_name() {
    let http = MockHttpSend::reply(200, FLOS);
    let client = test_client(http.clone());

    let err = client
        .invoke_by_name("Unknown Flo", RequestParams::new())
        .await
        .expect_err("unknown flo must fail");

    assert_eq!(err.kind(), azuqua_core::ErrorKind::FloNotFound);
    // Exactly one refresh, no invoke.
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn test_rule_routes() -> Result<()> {
    let http = MockHttpSend::reply(200, r#"{"id": 7}"#);
    let client = test_client(http.clone());

    client.create_rule(json!({"policy": "p"})).await?;
    client.update_rule(7, json!({"policy": "q"})).await?;
    client.read_rule(7).await?;
    client.delete_rule(7).await?;
    client.read_all_rules().await?;
    client.link_rule_and_flo(7, 42).await?;

    let reqs = http.requests();
    let seen: Vec<(Method, String)> = reqs
        .iter()
        .map(|r| (r.method.clone(), r.path_and_query().to_string()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (Method::POST, "/rule".to_string()),
            (Method::PUT, "/rule/7".to_string()),
            (Method::GET, "/rule/7".to_string()),
            (Method::DELETE, "/rule/7".to_string()),
            (Method::GET, "/rules".to_string()),
            (Method::POST, "/rule/7/associate/42".to_string()),
        ]
    );

    let body: Value = serde_json::from_slice(&reqs[0].body)?;
    assert_eq!(body, json!({"rule": {"policy": "p"}}));
    let body: Value = serde_json::from_slice(&reqs[1].body)?;
    assert_eq!(body, json!({"rule": {"policy": "q"}}));
    assert!(reqs[3].body.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_flo_routes() -> Result<()> {
    let http = MockHttpSend::reply(200, "{}");
    let client = test_client(http.clone());

    client
        .resume("abc", "exec-1", RequestParams::new().with_body("x", 1))
        .await?;
    client.inject("abc", RequestParams::new()).await?;
    client.disable("abc").await?;
    client.schedule("abc", RequestParams::new()).await?;
    client.retry("abc", RequestParams::new()).await?;
    client.inputs("abc").await?;
    client.outputs("abc").await?;
    client
        .read_flo_execution_telemetry("abc", "exec-1", RequestParams::new())
        .await?;
    client
        .read_flo_execution_metrics("abc", "exec-1", RequestParams::new())
        .await?;
    client
        .read_flo_past_executions("abc", RequestParams::new().with_query("limit", 5))
        .await?;
    client.groups(RequestParams::new()).await?;
    client.get_org_connectors(12).await?;

    let paths: Vec<_> = http
        .requests()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path_and_query()))
        .collect();
    assert_eq!(
        paths,
        vec![
            "POST /flo/abc/resume/exec-1",
            "POST /flo/abc/inject",
            "POST /flo/abc/disable",
            "POST /flo/abc/schedule",
            "POST /flo/abc/retry",
            "GET /flo/abc/inputs",
            "GET /flo/abc/outputs",
            "GET /telemetry/abc/exec-1/data",
            "GET /telemetry/abc/exec-1/metrics",
            "GET /telemetry/abc/executions?limit=5",
            "GET /user/orgs",
            "GET /connectors/12",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_call_by_route_name() -> Result<()> {
    let http = MockHttpSend::reply(200, "{}");
    let client = test_client(http.clone());

    client
        .call_by_name(
            "invoke",
            RequestParams::from_value(json!({"alias": "abc", "a": 1}))?,
        )
        .await?;
    client
        .call(Route::ReadFlo, RequestParams::new().with_field("alias", "def"))
        .await?;

    let reqs = http.requests();
    assert_eq!(reqs[0].path_and_query(), "/flo/abc/invoke");
    // The placeholder value is consumed, not sent.
    assert_eq!(reqs[0].body.as_ref(), br#"{"a":1}"#);
    assert_eq!(reqs[1].path_and_query(), "/flo/def/read");

    let err = client
        .call_by_name("notARoute", RequestParams::new())
        .await
        .expect_err("unknown route");
    assert_eq!(err.kind(), azuqua_core::ErrorKind::RequestInvalid);
    Ok(())
}

#[tokio::test]
async fn test_make_request_with_placeholders() -> Result<()> {
    let http = MockHttpSend::reply(200, "{}");
    let client = test_client(http.clone());

    client
        .make_request(
            Method::GET,
            "/flo/:alias/inputs",
            RequestParams::from_value(json!({"alias": "abc"}))?,
        )
        .await?;

    assert_eq!(http.requests()[0].path_and_query(), "/flo/abc/inputs");
    Ok(())
}

#[tokio::test]
async fn test_custom_headers_cannot_override_auth() -> Result<()> {
    let http = MockHttpSend::reply(200, "{}");
    let client = test_client(http.clone());

    client
        .invoke(
            "abc",
            RequestParams::new()
                .with_header("x-trace", "trace-1")
                .with_header("x-api-hash", "forged")
                .with_body("a", 1),
        )
        .await?;

    let req = &http.requests()[0];
    assert_eq!(req.header("x-trace"), "trace-1");
    assert_eq!(
        req.header("x-api-hash"),
        "b96f5f84621db2e46b655a5403093e93d8b33eb4e677ab6142bb6f711a3ab11a"
    );
    assert_eq!(req.headers.get_all("x-api-hash").iter().count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_multipart_body_matches_signed_hash() -> Result<()> {
    let http = MockHttpSend::reply(200, "{}");
    let client = test_client(http.clone());
    let form = Multipart::with_boundary("XYZ")
        .text("name", "azuqua")
        .file("upload", "a.txt", "text/plain", &b"hello"[..]);
    let encoded = form.encode();

    client
        .invoke("abc", RequestParams::new().with_multipart(form))
        .await?;

    let req = &http.requests()[0];
    assert_eq!(req.body, encoded);
    assert_eq!(req.header("content-type"), "multipart/form-data; boundary=XYZ");

    let payload = azuqua_core::hash::hex_sha256(&req.body);
    let expected = azuqua_flo::SignableRequest {
        method: &Method::POST,
        path: "/flo/abc/invoke",
        timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        payload: &payload,
    }
    .hash("s");
    assert_eq!(req.header("x-api-hash"), expected);
    Ok(())
}

#[tokio::test]
async fn test_custom_http_options() -> Result<()> {
    let http = MockHttpSend::reply(200, "{}");
    let client = test_client_with_config(
        http.clone(),
        Config::new()
            .with_access_key("k")
            .with_access_secret("s")
            .with_host("localhost")
            .with_port(8080),
    );

    assert_eq!(client.http_options().protocol(), Protocol::Http);
    client.read_all_rules().await?;

    assert_eq!(
        http.requests()[0].uri.to_string(),
        "http://localhost:8080/rules"
    );
    Ok(())
}
