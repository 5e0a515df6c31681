//! Example: query a local sequencer node and wait on a transaction.
//!
//! Run with:
//!
//! ```text
//! SEQ_CHAIN_ID=<cb58 chain id> SEQ_NETWORK_ID=1337 cargo run --example local -- [tx id]
//! ```
//!
//! `SEQ_URI` overrides the chain's base URI. Log verbosity follows `RUST_LOG`,
//! then `SEQ_RPC_LOG`.

use std::env;
use std::time::Duration;

use seq_rpc_client::{CancelScope, ChainParser, ClientConfig, HeaderQuery, Id, SeqRpcClient, client::Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,seq_rpc_client=debug";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| {
            env::var("SEQ_RPC_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .and_then(|v| EnvFilter::try_new(v).ok())
        })
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(filter)
        .try_init();
}

fn config_from_env() -> ClientConfig {
    let chain_id: Id = env::var("SEQ_CHAIN_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Id::EMPTY);
    let network_id = env::var("SEQ_NETWORK_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1337);
    match env::var("SEQ_URI") {
        Ok(uri) => ClientConfig::new(uri, network_id, chain_id),
        Err(_) => ClientConfig::local(network_id, chain_id),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let config = config_from_env();
    let client = SeqRpcClient::from_config(&config);

    println!("=== SEQ RPC Client ===\n");
    println!("Endpoint: {}", config.endpoint_url());

    // 1. Genesis
    println!("1. Fetching genesis...");
    let genesis = client.genesis().await?;
    println!("   HRP: {}", genesis.hrp);
    println!("   Min block gap: {} ms", genesis.min_block_gap);
    println!("   Validity window: {} ms", genesis.validity_window);
    println!("   Allocations: {}", genesis.custom_allocation.len());
    println!();

    // 2. Rules
    println!("2. Deriving rules...");
    let parser = client.parser().await?;
    let rules = parser.rules(chrono::Utc::now().timestamp_millis());
    println!("   Chain: {}", parser.chain_id());
    println!("   Max block units: {:?}", rules.max_block_units());
    println!();

    // 3. Recent blocks
    println!("3. Fetching accepted block window...");
    let window = client.accepted_block_window().await?;
    println!("   Window: {window} blocks");
    let headers = client.block_headers(HeaderQuery::height(0), i64::MAX).await?;
    println!("   Headers returned: {}", headers.blocks.len());
    if let Some(last) = headers.blocks.last() {
        println!("   Latest: {} at height {}", last.block_id, last.height);
    }
    println!();

    // 4. Optional transaction wait
    if let Some(tx_id) = env::args().nth(1).and_then(|v| v.parse::<Id>().ok()) {
        println!("4. Waiting for transaction {tx_id}...");
        let status = client
            .wait_for_transaction(tx_id, &CancelScope::with_timeout(Duration::from_secs(30)))
            .await?;
        println!("   Success: {}", status.success);
        println!("   Fee: {}", status.fee);
        if let Some(accepted) = status.accepted_at() {
            println!("   Accepted at: {accepted}");
        }
    }

    println!("\n=== Done! ===");
    Ok(())
}
