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

use std::env;

use anyhow::Result;
use azuqua_core::{Context, OsEnv};
use azuqua_file_read_tokio::TokioFileRead;
use azuqua_flo::{Client, Config, DefaultCredentialProvider, RequestParams};
use azuqua_http_send_reqwest::ReqwestHttpSend;
use log::{debug, warn};

/// Build a client against the real api, only when `AZUQUA_FLO_TEST=on`.
async fn init_live_client() -> Option<Client> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("AZUQUA_FLO_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::new(ctx, Config::new());
    if !client.credentials().is_configured() {
        let loaded = client
            .load_credential(&DefaultCredentialProvider::new())
            .await
            .expect("credential provider must not fail");
        assert!(loaded, "AZUQUA_ACCESS_KEY and AZUQUA_ACCESS_SECRET must be set");
    }

    Some(client)
}

#[tokio::test]
async fn test_live_list_and_read_flos() -> Result<()> {
    let Some(client) = init_live_client().await else {
        warn!("AZUQUA_FLO_TEST is not set, skipped");
        return Ok(());
    };

    let flos = client.flos(RequestParams::new()).await?;
    debug!("listed {} flos", flos.len());

    if let Some(flo) = flos.first() {
        let read = client.read_flo(&flo.alias).await?;
        debug!("read flo: {read}");

        assert!(!client.resolve_alias(&flo.name).await?.is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn test_live_bad_secret_is_rejected() -> Result<()> {
    let Some(client) = init_live_client().await else {
        warn!("AZUQUA_FLO_TEST is not set, skipped");
        return Ok(());
    };

    let access_key = client.credentials().get()?.access_key;
    client.set_from_args(access_key, "definitely-not-the-secret");

    let err = client
        .flos(RequestParams::new())
        .await
        .expect_err("bad secret must be rejected");
    assert!(err.is_server_error());
    Ok(())
}
