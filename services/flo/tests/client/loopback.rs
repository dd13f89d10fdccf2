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

use anyhow::Result;
use azuqua_core::time::parse_rfc3339;
use azuqua_core::{Context, ErrorKind, StaticEnv};
use azuqua_flo::{Client, Config, Protocol, RequestParams, RequestSigner};
use azuqua_http_send_reqwest::ReqwestHttpSend;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Accept one connection, return its request head and answer with `response`.
async fn serve_once(listener: TcpListener, response: &'static [u8]) -> String {
    let (mut stream, _) = listener.accept().await.expect("accept must succeed");

    let mut head = Vec::new();
    let mut buf = [0; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.expect("read must succeed");
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }

    stream
        .write_all(response)
        .await
        .expect("write must succeed");
    String::from_utf8_lossy(&head).to_lowercase()
}

fn plaintext_client(port: u16) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::new(),
        });
    let config = Config::new()
        .with_access_key("k")
        .with_access_secret("s")
        .with_host("127.0.0.1")
        .with_port(port)
        .with_protocol(Protocol::Http);
    let time = parse_rfc3339("2024-01-01T00:00:00.000Z").expect("valid time");

    Client::new(ctx, config).with_signer(RequestSigner::new().with_time(time))
}

#[tokio::test]
async fn test_invoke_over_plaintext_http() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let server = tokio::spawn(serve_once(
        listener,
        b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 13\r\nconnection: close\r\n\r\n{\"result\":42}",
    ));

    let resp = plaintext_client(port)
        .invoke("abc", RequestParams::new().with_body("a", 1))
        .await?;
    assert_eq!(resp, json!({"result": 42}));

    let head = server.await?;
    assert!(head.starts_with("post /flo/abc/invoke http/1.1\r\n"));
    assert!(head.contains(
        "x-api-hash: b96f5f84621db2e46b655a5403093e93d8b33eb4e677ab6142bb6f711a3ab11a\r\n"
    ));
    assert!(head.contains("x-api-accesskey: k\r\n"));
    assert!(head.contains("x-api-timestamp: 2024-01-01t00:00:00.000z\r\n"));
    Ok(())
}

#[tokio::test]
async fn test_server_error_over_plaintext_http() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let server = tokio::spawn(serve_once(
        listener,
        b"HTTP/1.1 503 Service Unavailable\r\ncontent-type: text/plain\r\ncontent-length: 11\r\nconnection: close\r\n\r\nmaintenance",
    ));

    let err = plaintext_client(port)
        .read_flo("abc")
        .await
        .expect_err("503 must fail");
    server.await?;

    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    Ok(())
}

#[tokio::test]
async fn test_connection_refused() -> Result<()> {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };

    let err = plaintext_client(port)
        .read_flo("abc")
        .await
        .expect_err("nothing listens on this port");

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.code().is_some());
    Ok(())
}
