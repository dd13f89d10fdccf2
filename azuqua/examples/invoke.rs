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

use anyhow::Result;
use azuqua::flo::{default_client, DefaultCredentialProvider, RequestParams};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let client = default_client();

    // Fall back to the file pointed to by AZUQUA_CONFIG_FILE.
    if !client.credentials().is_configured() {
        client
            .load_credential(&DefaultCredentialProvider::new())
            .await?;
    }

    let flos = client.flos(RequestParams::new()).await?;
    for flo in &flos {
        println!("{:<40} {:<20} active={}", flo.name, flo.alias, flo.active);
    }

    let Some(name) = std::env::args().nth(1) else {
        println!("pass a flo name to invoke it");
        return Ok(());
    };

    let params = RequestParams::from_value(json!({
        "headers": {"x-request-source": "azuqua-example"},
        "body": {"invoked_by": "example"},
    }))?;
    let resp = client.invoke_by_name(&name, params).await?;
    println!("{}", serde_json::to_string_pretty(&resp)?);

    Ok(())
}
