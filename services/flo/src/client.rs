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

use std::fmt::Display;
use std::sync::Once;
use std::time::Duration;

use azuqua_core::{Context, Error, ProvideCredential, ResponseBody, Result};
use bytes::Bytes;
use http::{Method, Uri};
use log::{debug, warn};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::{
    assemble, response, Config, Credential, CredentialStore, Flo, FloCache, HttpOptions,
    RequestParams, RequestSigner, Route,
};

static READ_DEPRECATION: Once = Once::new();

/// Client of the azuqua flo api.
///
/// Every call goes through the same pipeline: assemble the request, sign it
/// with the stored credential, send it through the context's [`azuqua_core::HttpSend`]
/// and normalize the response.
///
/// ```no_run
/// use azuqua_core::Context;
/// use azuqua_flo::{Client, Config, RequestParams};
///
/// # async fn example(ctx: Context) -> azuqua_core::Result<()> {
/// let client = Client::new(ctx, Config::new().with_access_key("key").with_access_secret("secret"));
/// let _resp = client
///     .invoke("abc", RequestParams::new().with_body("name", "azuqua"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    http: HttpOptions,
    timeout: Option<Duration>,
    store: CredentialStore,
    signer: RequestSigner,
    flos: FloCache,
}

impl Client {
    /// Create a new client.
    ///
    /// Credentials set on `config` win over the ones found in env. Missing
    /// credentials are not an error here; they can be loaded later, and calls
    /// fail with [`azuqua_core::ErrorKind::AccountNotConfigured`] until then.
    pub fn new(ctx: Context, config: Config) -> Self {
        let config = config.from_env(&ctx);

        let store = CredentialStore::new();
        if config.access_key.is_some() || config.access_secret.is_some() {
            store.set(Credential::new(
                config.access_key.clone().unwrap_or_default(),
                config.access_secret.clone().unwrap_or_default(),
            ));
        }

        debug!("azuqua client created with {config:?}");
        Self {
            http: config.http_options(),
            timeout: config.timeout,
            ctx,
            store,
            signer: RequestSigner::new(),
            flos: FloCache::new(),
        }
    }

    /// Replace the request signer.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Where requests are sent.
    pub fn http_options(&self) -> &HttpOptions {
        &self.http
    }

    /// The credential store of this client.
    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    /// The flo cache of this client.
    pub fn flo_cache(&self) -> &FloCache {
        &self.flos
    }

    /// Replace the credential with the one found in env.
    pub fn set_from_env(&self) -> bool {
        self.store.set_from_env(&self.ctx)
    }

    /// Replace the credential with the given access key and secret.
    pub fn set_from_args(&self, access_key: impl Into<String>, access_secret: impl Into<String>) {
        self.store.set_from_args(access_key, access_secret)
    }

    /// Load the credential from an account config file, blocking the current thread.
    pub fn load_config(&self, path: &str) -> Result<Credential> {
        self.store.load_from_file(&self.ctx, path)
    }

    /// Load the credential from an account config file.
    pub async fn load_config_async(&self, path: &str) -> Result<Credential> {
        self.store.load_from_file_async(&self.ctx, path).await
    }

    /// Load the credential from a provider, like [`crate::DefaultCredentialProvider`].
    pub async fn load_credential(
        &self,
        provider: &dyn ProvideCredential<Credential = Credential>,
    ) -> Result<bool> {
        self.store.load_from(&self.ctx, provider).await
    }

    /// Send a signed request to an arbitrary path.
    ///
    /// `:name` placeholders in `path` are filled from the top-level params.
    pub async fn make_request(
        &self,
        method: Method,
        path: &str,
        params: RequestParams,
    ) -> Result<Value> {
        self.send(method, path, params, None).await
    }

    /// Same as [`Client::make_request`], but the call ends with
    /// [`azuqua_core::ErrorKind::Cancelled`] as soon as `cancel` fires.
    pub async fn make_request_with_cancel(
        &self,
        method: Method,
        path: &str,
        params: RequestParams,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        self.send(method, path, params, Some(cancel)).await
    }

    /// Call a route of the table, placeholders are filled from the top-level params.
    pub async fn call(&self, route: Route, params: RequestParams) -> Result<Value> {
        let template = route.template();
        self.send(template.method().clone(), template.path(), params, None)
            .await
    }

    /// Call a route looked up by its api name, like `readFlo`.
    pub async fn call_by_name(&self, name: &str, params: RequestParams) -> Result<Value> {
        let route = Route::from_name(name)
            .ok_or_else(|| Error::request_invalid(format!("unknown route '{name}'")))?;
        self.call(route, params).await
    }

    /// Same as [`Client::call`] with cancellation.
    pub async fn call_with_cancel(
        &self,
        route: Route,
        params: RequestParams,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let template = route.template();
        self.send(
            template.method().clone(),
            template.path(),
            params,
            Some(cancel),
        )
        .await
    }

    async fn route(&self, route: Route, values: &[&str], params: RequestParams) -> Result<Value> {
        let template = route.template();
        let path = template.resolve(values)?;
        self.send(template.method().clone(), &path, params, None)
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: RequestParams,
        cancel: Option<&CancellationToken>,
    ) -> Result<Value> {
        // Fail before touching the network.
        let cred = self.store.get()?;

        let mut req = assemble(method, path, params)?;
        self.signer.sign_request(&cred, &mut req)?;

        let uri: Uri = self.http.url(&req.path).parse()?;
        debug!("sending {} {uri}", req.method);

        let mut http_req = http::Request::new(req.body);
        *http_req.method_mut() = req.method;
        *http_req.uri_mut() = uri;
        *http_req.headers_mut() = req.headers;

        let resp = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return Err(Error::cancelled("request cancelled by caller"));
                }
                resp = self.dispatch(http_req) => resp?,
            },
            None => self.dispatch(http_req).await?,
        };

        response::normalize(resp)
    }

    async fn dispatch(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let Some(timeout) = self.timeout else {
            return self.ctx.http_send(req).await;
        };

        tokio::time::timeout(timeout, self.ctx.http_send(req))
            .await
            .map_err(|_| {
                Error::network(format!("request timed out after {timeout:?}"))
                    .with_code("ETIMEDOUT")
            })?
    }
}

// Flo routes.
impl Client {
    /// List all flos of the account and refill the flo cache.
    ///
    /// `params` are sent as query, use [`RequestParams::with_query`].
    pub async fn flos(&self, params: RequestParams) -> Result<Vec<Flo>> {
        let value = self.route(Route::Flos, &[], params).await?;
        let flos: Vec<Flo> = serde_json::from_value(value.clone()).map_err(|e| {
            Error::response_parse("flo listing is not an array of flos")
                .with_body(ResponseBody::Json(value))
                .with_source(e)
        })?;

        self.flos.replace(flos.clone());
        Ok(flos)
    }

    /// Drop the flo cache and list flos again.
    pub async fn refresh_flos(&self) -> Result<Vec<Flo>> {
        self.flos.clear();
        self.flos(RequestParams::new()).await
    }

    /// Resolve a flo display name or alias into an alias.
    ///
    /// The flo cache is refreshed once if the name is unknown.
    pub async fn resolve_alias(&self, name_or_alias: &str) -> Result<String> {
        if let Some(alias) = self.flos.resolve(name_or_alias) {
            return Ok(alias);
        }

        debug!("flo {name_or_alias:?} not in cache, refreshing");
        self.refresh_flos().await?;
        self.flos
            .resolve(name_or_alias)
            .ok_or_else(|| Error::flo_not_found(format!("no flo named {name_or_alias:?}")))
    }

    /// Read the definition of a flo.
    pub async fn read_flo(&self, alias: &str) -> Result<Value> {
        self.route(Route::ReadFlo, &[alias], RequestParams::new())
            .await
    }

    /// Read the definition of a flo.
    #[deprecated(note = "use `read_flo` instead")]
    pub async fn read(&self, alias: &str) -> Result<Value> {
        READ_DEPRECATION.call_once(|| warn!("read is deprecated, use read_flo instead"));
        self.read_flo(alias).await
    }

    /// Invoke a flo.
    ///
    /// Top-level params and `body` are sent in the body, `query` and
    /// `headers` where their names say.
    pub async fn invoke(&self, alias: &str, params: RequestParams) -> Result<Value> {
        self.route(Route::Invoke, &[alias], params).await
    }

    /// Invoke a flo by its display name, see [`Client::resolve_alias`].
    pub async fn invoke_by_name(&self, name: &str, params: RequestParams) -> Result<Value> {
        let alias = self.resolve_alias(name).await?;
        self.invoke(&alias, params).await
    }

    /// Resume a paused flo execution.
    pub async fn resume(&self, alias: &str, exec: &str, params: RequestParams) -> Result<Value> {
        self.route(Route::Resume, &[alias, exec], params).await
    }

    /// Inject data into a flo.
    pub async fn inject(&self, alias: &str, params: RequestParams) -> Result<Value> {
        self.route(Route::Inject, &[alias], params).await
    }

    /// Turn a flo on.
    pub async fn enable(&self, alias: &str) -> Result<Value> {
        self.route(Route::Enable, &[alias], RequestParams::new())
            .await
    }

    /// Turn a flo off.
    pub async fn disable(&self, alias: &str) -> Result<Value> {
        self.route(Route::Disable, &[alias], RequestParams::new())
            .await
    }

    /// Schedule a flo.
    pub async fn schedule(&self, alias: &str, params: RequestParams) -> Result<Value> {
        self.route(Route::Schedule, &[alias], params).await
    }

    /// Retry a flo execution.
    pub async fn retry(&self, alias: &str, params: RequestParams) -> Result<Value> {
        self.route(Route::Retry, &[alias], params).await
    }

    /// Read the inputs of a flo.
    pub async fn inputs(&self, alias: &str) -> Result<Value> {
        self.route(Route::Inputs, &[alias], RequestParams::new())
            .await
    }

    /// Read the outputs of a flo.
    pub async fn outputs(&self, alias: &str) -> Result<Value> {
        self.route(Route::Outputs, &[alias], RequestParams::new())
            .await
    }

    /// Read the telemetry data of a flo execution.
    pub async fn read_flo_execution_telemetry(
        &self,
        alias: &str,
        exec: &str,
        params: RequestParams,
    ) -> Result<Value> {
        self.route(Route::ReadFloExecutionTelemetry, &[alias, exec], params)
            .await
    }

    /// Read the metrics of a flo execution.
    pub async fn read_flo_execution_metrics(
        &self,
        alias: &str,
        exec: &str,
        params: RequestParams,
    ) -> Result<Value> {
        self.route(Route::ReadFloExecutionMetrics, &[alias, exec], params)
            .await
    }

    /// Read the past executions of a flo.
    pub async fn read_flo_past_executions(
        &self,
        alias: &str,
        params: RequestParams,
    ) -> Result<Value> {
        self.route(Route::ReadFloPastExecutions, &[alias], params)
            .await
    }

    /// Read the orgs and groups the user belongs to.
    pub async fn groups(&self, params: RequestParams) -> Result<Value> {
        self.route(Route::Groups, &[], params).await
    }

    /// Read the connectors of an org.
    pub async fn get_org_connectors(&self, org_id: impl Display) -> Result<Value> {
        self.route(
            Route::GetOrgConnectors,
            &[&org_id.to_string()],
            RequestParams::new(),
        )
        .await
    }
}

// Rule routes.
impl Client {
    /// Create a rule.
    pub async fn create_rule(&self, rule: Value) -> Result<Value> {
        self.route(Route::CreateRule, &[], rule_params(rule)?)
            .await
    }

    /// Read a rule.
    pub async fn read_rule(&self, id: impl Display) -> Result<Value> {
        self.route(Route::ReadRule, &[&id.to_string()], RequestParams::new())
            .await
    }

    /// Update a rule.
    pub async fn update_rule(&self, id: impl Display, rule: Value) -> Result<Value> {
        self.route(Route::UpdateRule, &[&id.to_string()], rule_params(rule)?)
            .await
    }

    /// Delete a rule.
    pub async fn delete_rule(&self, id: impl Display) -> Result<Value> {
        self.route(Route::DeleteRule, &[&id.to_string()], RequestParams::new())
            .await
    }

    /// Read all rules of the account.
    pub async fn read_all_rules(&self) -> Result<Value> {
        self.route(Route::ReadAllRules, &[], RequestParams::new())
            .await
    }

    /// Link a rule to a flo.
    pub async fn link_rule_and_flo(
        &self,
        rule_id: impl Display,
        flo_id: impl Display,
    ) -> Result<Value> {
        self.route(
            Route::LinkRuleAndFlo,
            &[&rule_id.to_string(), &flo_id.to_string()],
            RequestParams::new(),
        )
        .await
    }
}

// Rules travel as `{"rule": ...}`.
fn rule_params(rule: Value) -> Result<RequestParams> {
    RequestParams::from_value(json!({ "body": { "rule": rule } }))
}
