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
use std::time::Duration;

use azuqua_core::{Context, Error, ErrorKind, ResponseBody, StaticEnv};
use azuqua_flo::{CancellationToken, Client, Config, RequestParams, Route};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::{test_client, test_client_with_config, MockHttpSend};

#[tokio::test]
async fn test_missing_credentials_fail_before_network() {
    let http = MockHttpSend::reply(200, "{}");
    let client = test_client_with_config(http.clone(), Config::new().with_access_key("k"));

    let err = client
        .invoke("abc", RequestParams::new())
        .await
        .expect_err("missing secret must fail");

    assert_eq!(err.kind(), ErrorKind::AccountNotConfigured);
    assert_eq!(http.request_count(), 0);

    client.set_from_args("k", "s");
    client
        .invoke("abc", RequestParams::new())
        .await
        .expect("credential is configured now");
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn test_credentials_from_env() {
    let http = MockHttpSend::reply(200, "{}");
    let ctx = Context::new().with_http_send(http.clone()).with_env(StaticEnv {
        home_dir: None,
        envs: HashMap::from_iter([
            ("AZUQUA_ACCESS_KEY".to_string(), "env_key".to_string()),
            ("AZUQUA_ACCESS_SECRET".to_string(), "env_secret".to_string()),
        ]),
    });

    let client = Client::new(ctx, Config::new());
    client.read_all_rules().await.expect("must succeed");

    assert_eq!(http.requests()[0].header("x-api-accesskey"), "env_key");
}

#[tokio::test]
async fn test_parameter_mismatch_fails_before_network() {
    let http = MockHttpSend::reply(200, "{}");
    let client = test_client(http.clone());

    let err = client
        .call(Route::Resume, RequestParams::new().with_field("alias", "abc"))
        .await
        .expect_err("missing exec must fail");

    assert_eq!(err.kind(), ErrorKind::ParameterMismatch);
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn test_http_error() {
    let client = test_client(MockHttpSend::reply(
        422,
        r#"{"error":{"message":"invalid"}}"#,
    ));

    let err = client
        .invoke("abc", RequestParams::new())
        .await
        .expect_err("422 must fail");

    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.to_string(), "invalid");
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(
        err.body(),
        Some(&ResponseBody::Json(json!({"error": {"message": "invalid"}})))
    );
}

#[tokio::test]
async fn test_business_error() {
    let client = test_client(MockHttpSend::reply(200, r#"{"error": "bad input"}"#));

    let err = client
        .invoke("abc", RequestParams::new())
        .await
        .expect_err("business error must fail");

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.to_string(), "bad input");
}

#[tokio::test]
async fn test_parse_error() {
    let client = test_client(MockHttpSend::reply(200, "not json"));

    let err = client
        .read_flo("abc")
        .await
        .expect_err("invalid json must fail");

    assert_eq!(err.kind(), ErrorKind::ResponseParse);
    assert_eq!(err.body(), Some(&ResponseBody::Text("not json".to_string())));
}

#[tokio::test]
async fn test_network_error_passes_through() {
    let http = MockHttpSend::new(|_| {
        Err(Error::network("connection refused").with_code("ECONNREFUSED"))
    });
    let client = test_client(http);

    let err = client
        .read_flo("abc")
        .await
        .expect_err("network error must fail");

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.code(), Some("ECONNREFUSED"));
    assert!(!err.is_server_error());
}

#[tokio::test]
async fn test_timeout() {
    let http = MockHttpSend::reply(200, "{}").with_delay(Duration::from_secs(30));
    let client = test_client_with_config(
        http,
        Config::new()
            .with_access_key("k")
            .with_access_secret("s")
            .with_timeout(Duration::from_millis(20)),
    );

    let err = client
        .read_flo("abc")
        .await
        .expect_err("slow server must time out");

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.code(), Some("ETIMEDOUT"));
}

#[tokio::test]
async fn test_cancel_in_flight() {
    let http = MockHttpSend::reply(200, "{}").with_delay(Duration::from_secs(30));
    let client = test_client(http.clone());
    let token = CancellationToken::new();

    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });

    let err = client
        .make_request_with_cancel(Method::GET, "/flo/abc/read", RequestParams::new(), &token)
        .await
        .expect_err("cancelled call must fail");

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn test_cancel_before_send() {
    let http = MockHttpSend::reply(200, "{}");
    let client = test_client(http.clone());
    let token = CancellationToken::new();
    token.cancel();

    let err = client
        .call_with_cancel(
            Route::ReadFlo,
            RequestParams::new().with_field("alias", "abc"),
            &token,
        )
        .await
        .expect_err("cancelled call must fail");

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(http.request_count(), 0);
}
