//! Connection settings for a client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Id;

/// Path under a chain's base URI where the node serves this API.
pub const JSONRPC_ENDPOINT: &str = "/seqapi";

/// Service name the node registers its handlers under; methods are sent as
/// `<service>.<method>`.
pub const SERVICE_NAME: &str = "seqvm";

/// Default pause between attempts of a wait, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Shortest pause a config may ask for; smaller values are raised to it.
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

fn default_endpoint_path() -> String {
    JSONRPC_ENDPOINT.to_string()
}

fn default_method_prefix() -> String {
    SERVICE_NAME.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Everything needed to build a client for one node endpoint.
///
/// Deserializable so applications can embed it in their own config files:
///
/// ```
/// use seq_rpc_client::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(
///     r#"{"uri": "http://127.0.0.1:9650/ext/bc/seq/", "network_id": 1337,
///         "chain_id": "11111111111111111111111111111111LpoYY"}"#,
/// ).unwrap();
/// assert_eq!(config.endpoint_url(), "http://127.0.0.1:9650/ext/bc/seq/seqapi");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URI of the chain, e.g. `http://127.0.0.1:9650/ext/bc/<chain>`.
    pub uri: String,
    pub network_id: u32,
    pub chain_id: Id,
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,
    #[serde(default = "default_method_prefix")]
    pub method_prefix: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl ClientConfig {
    pub fn new(uri: impl Into<String>, network_id: u32, chain_id: Id) -> Self {
        Self {
            uri: uri.into(),
            network_id,
            chain_id,
            endpoint_path: default_endpoint_path(),
            method_prefix: default_method_prefix(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }

    /// Config for a node on this machine's default API port.
    pub fn local(network_id: u32, chain_id: Id) -> Self {
        Self::new(
            format!("http://127.0.0.1:9650/ext/bc/{chain_id}"),
            network_id,
            chain_id,
        )
    }

    /// Pause between wait attempts, never below [`MIN_POLL_INTERVAL_MS`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    /// Full URL requests are posted to.
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.uri.trim_end_matches('/'), self.endpoint_path)
    }
}
