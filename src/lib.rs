//! Typed async client for the SEQ sequencer node's JSON-RPC API.
//!
//! The node serves genesis data, transaction status, asset metadata, balances,
//! block headers and bodies, and accepts message transactions. On top of the
//! plain calls the client offers two waits that poll the node until a balance
//! reaches a threshold or a transaction is accepted.
//!
//! # Features
//!
//! - **Types** (`types`, `genesis`, `units`) are always available.
//! - **`client`** (enabled by default): [`SeqRpcClient`], the [`RequestChannel`]
//!   abstraction with its `reqwest` implementation, and cancellable polling.
//!
//! # Quick start
//!
//! ```no_run
//! use seq_rpc_client::{Id, SeqRpcClient};
//!
//! #[tokio::main]
//! async fn main() -> seq_rpc_client::client::Result<()> {
//!     let chain_id: Id = "11111111111111111111111111111111LpoYY".parse().unwrap();
//!     let client = SeqRpcClient::new("http://127.0.0.1:9650/ext/bc/seq", 1337, chain_id);
//!     let genesis = client.genesis().await?;
//!     println!("HRP: {}, validity window: {} ms", genesis.hrp, genesis.validity_window);
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
pub mod genesis;
mod not_found;
mod queries;
pub mod types;
pub mod units;

#[cfg(feature = "client")]
mod channel;
#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
mod error;
#[cfg(feature = "client")]
pub mod poll;

pub use cache::{AssetCache, GenesisCell};
pub use config::{
    ClientConfig, DEFAULT_POLL_INTERVAL_MS, JSONRPC_ENDPOINT, MIN_POLL_INTERVAL_MS, SERVICE_NAME,
};
pub use genesis::{ChainParser, Genesis, Parser, Registries, Rules, TypeRegistry};
pub use not_found::{ASSET_NOT_FOUND, NotFound, TX_NOT_FOUND};
pub use queries::HeaderQuery;
pub use types::*;

#[cfg(feature = "client")]
pub use channel::{HttpChannel, RequestChannel};
#[cfg(feature = "client")]
pub use client::{Error, Result, RpcError, SeqRpcClient};
#[cfg(feature = "client")]
pub use poll::{Backoff, CancelScope, ExponentialBackoff, FixedBackoff, poll_until};
