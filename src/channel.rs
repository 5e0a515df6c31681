//! The request channel the client sends JSON-RPC calls through.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result, RpcError};

/// Sends one JSON-RPC call and returns its raw result.
///
/// A call is a single unit of work: it either yields the whole result or an
/// error, never a partial reply.
#[async_trait]
pub trait RequestChannel: Send + Sync {
    async fn send(&self, method: &'static str, params: Value) -> Result<Value>;
}

#[async_trait]
impl<T: RequestChannel + ?Sized> RequestChannel for Arc<T> {
    async fn send(&self, method: &'static str, params: Value) -> Result<Value> {
        (**self).send(method, params).await
    }
}

/// JSON-RPC request wrapper
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// JSON-RPC response wrapper
///
/// `result` is `None` only when the field is absent; an explicit `null` is kept.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC 2.0 over HTTP POST.
///
/// The node routes calls by `<service>.<method>`, so every method is sent with
/// the configured service prefix.
pub struct HttpChannel {
    client: Client,
    url: String,
    method_prefix: String,
    request_id: AtomicU64,
}

impl HttpChannel {
    pub fn new(url: impl Into<String>, method_prefix: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url, method_prefix)
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxies, TLS roots).
    pub fn with_client(
        client: Client,
        url: impl Into<String>,
        method_prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            method_prefix: method_prefix.into(),
            request_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method_prefix(&self) -> &str {
        &self.method_prefix
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl RequestChannel for HttpChannel {
    async fn send(&self, method: &'static str, params: Value) -> Result<Value> {
        let method = format!("{}.{method}", self.method_prefix);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id(),
            method: &method,
            params,
        };
        debug!(url = %self.url, method = %method, id = request.id, "sending request");

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<RpcResponse>(&body) {
            Ok(RpcResponse {
                error: Some(error), ..
            }) => {
                debug!(method = %method, code = error.code, message = %error.message, "request failed");
                Err(Error::Rpc(error))
            }
            _ if !status.is_success() => Err(Error::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
            Ok(RpcResponse {
                result: Some(result),
                ..
            }) => Ok(result),
            Ok(RpcResponse { result: None, .. }) => Err(Error::Json(serde::de::Error::custom(
                "response carries neither result nor error",
            ))),
            Err(err) => Err(Error::Json(err)),
        }
    }
}
