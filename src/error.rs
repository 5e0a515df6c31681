//! Errors returned by the client.

use serde::Deserialize;

use crate::not_found::NotFound;
use crate::types::Id;

/// JSON-RPC error object returned by the node.
///
/// Handler failures arrive as code `-32000` with the handler's error text as
/// `message`; that text is what [`NotFound`] sentinels are matched against.
#[derive(Debug, Clone, PartialEq, Deserialize, thiserror::Error)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Client error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} does not exist")]
    MissingAsset(Id),
    #[error("wait canceled")]
    Canceled,
    #[error("wait deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    /// Returns `true` if the node reported the given entity kind as missing.
    pub fn is_not_found(&self, kind: NotFound) -> bool {
        kind.matches(&self.to_string())
    }

    /// Returns `true` if a wait gave up because it was canceled or timed out,
    /// as opposed to the node call itself failing.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Canceled | Self::DeadlineExceeded)
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
