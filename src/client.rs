//! Async JSON-RPC client for the sequencer node.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::cache::{AssetCache, GenesisCell};
use crate::channel::{HttpChannel, RequestChannel};
use crate::config::ClientConfig;
use crate::genesis::{Genesis, GenesisReply, Parser, Registries};
use crate::not_found::NotFound;
use crate::poll::{Backoff, CancelScope, FixedBackoff, poll_until};
use crate::queries::HeaderQuery;
use crate::types::*;
use crate::units::format_balance;

pub use crate::error::{Error, Result, RpcError};

/// Method names as the node registers them.
///
/// Casing is inconsistent across methods and must be kept as is; the node
/// resolves names exactly.
pub mod methods {
    pub const GENESIS: &str = "genesis";
    pub const TX: &str = "tx";
    pub const ASSET: &str = "asset";
    pub const BALANCE: &str = "balance";
    pub const LOAN: &str = "loan";
    pub const BLOCK_HEADERS_BY_HEIGHT: &str = "getblockheadersbyheight";
    pub const BLOCK_HEADERS_BY_ID: &str = "getblockheadersid";
    pub const BLOCK_HEADERS_BY_START: &str = "getBlockHeadersByStart";
    pub const BLOCK_TRANSACTIONS: &str = "getblocktransactions";
    /// Shares its name with [`BLOCK_TRANSACTIONS`]; the node tells the two
    /// apart by their arguments.
    pub const BLOCK_TRANSACTIONS_BY_NAMESPACE: &str = "getblocktransactions";
    pub const COMMITMENT_BLOCKS: &str = "getCommitmentBlocks";
    pub const ACCEPTED_BLOCK_WINDOW: &str = "getAcceptedBlockWindow";
    pub const SUBMIT_MSG_TX: &str = "submitMsgTx";
}

/// Async client for one sequencer chain endpoint.
///
/// Asset metadata and genesis are remembered per client; everything else goes
/// to the node on every call. A client is `Send + Sync` and meant to be shared.
///
/// # Example
///
/// ```no_run
/// use seq_rpc_client::{CancelScope, Id, SeqRpcClient};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> seq_rpc_client::client::Result<()> {
///     let chain_id: Id = "11111111111111111111111111111111LpoYY".parse().unwrap();
///     let client = SeqRpcClient::local(1337, chain_id);
///     let asset = Id::EMPTY;
///     client
///         .wait_for_balance("seq1...", asset, 1_000_000, &CancelScope::with_timeout(Duration::from_secs(30)))
///         .await?;
///     Ok(())
/// }
/// ```
pub struct SeqRpcClient<C = HttpChannel> {
    channel: C,
    network_id: u32,
    chain_id: Id,
    assets: AssetCache,
    genesis: GenesisCell,
    registries: Arc<Registries>,
    backoff: Arc<dyn Backoff>,
}

impl SeqRpcClient<HttpChannel> {
    /// Create a client for the chain served at `uri`.
    pub fn new(uri: impl Into<String>, network_id: u32, chain_id: Id) -> Self {
        Self::from_config(&ClientConfig::new(uri, network_id, chain_id))
    }

    /// Create a client for a node on this machine's default API port.
    pub fn local(network_id: u32, chain_id: Id) -> Self {
        Self::from_config(&ClientConfig::local(network_id, chain_id))
    }

    /// Create a client from `config`; waits pause for its poll interval.
    pub fn from_config(config: &ClientConfig) -> Self {
        let channel = HttpChannel::new(config.endpoint_url(), config.method_prefix.clone());
        Self::with_channel(channel, config.network_id, config.chain_id)
            .with_backoff(FixedBackoff::new(config.poll_interval()))
    }
}

impl<C: RequestChannel> SeqRpcClient<C> {
    /// Create a client that sends its calls through `channel`.
    pub fn with_channel(channel: C, network_id: u32, chain_id: Id) -> Self {
        Self {
            channel,
            network_id,
            chain_id,
            assets: AssetCache::default(),
            genesis: GenesisCell::default(),
            registries: Arc::new(Registries::default()),
            backoff: Arc::new(FixedBackoff::default()),
        }
    }

    /// Registries handed to every [`Parser`] this client builds.
    pub fn with_registries(mut self, registries: Registries) -> Self {
        self.registries = Arc::new(registries);
        self
    }

    /// Backoff between attempts of [`wait_for_balance`](Self::wait_for_balance)
    /// and [`wait_for_transaction`](Self::wait_for_transaction).
    pub fn with_backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn network_id(&self) -> u32 {
        self.network_id
    }

    pub fn chain_id(&self) -> Id {
        self.chain_id
    }

    /// The cached metadata of `asset`, without contacting the node.
    pub fn cached_asset(&self, asset: &Id) -> Option<AssetRecord> {
        self.assets.get(asset)
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: P,
    ) -> Result<R> {
        let params = serde_json::to_value(params)?;
        let result = self.channel.send(method, params).await?;
        Ok(serde_json::from_value(result)?)
    }

    // ── Chain ────────────────────────────────────────────────────

    /// Returns the chain's genesis, fetching it on first use.
    ///
    /// A failed fetch is not remembered; the next call asks again.
    pub async fn genesis(&self) -> Result<Arc<Genesis>> {
        if let Some(genesis) = self.genesis.get() {
            return Ok(genesis);
        }
        let reply: GenesisReply = self.call(methods::GENESIS, serde_json::json!({})).await?;
        Ok(self.genesis.store(reply.genesis))
    }

    /// Builds a [`Parser`] for this chain from its genesis.
    pub async fn parser(&self) -> Result<Parser> {
        let genesis = self.genesis().await?;
        Ok(Parser::new(
            self.network_id,
            self.chain_id,
            genesis,
            Arc::clone(&self.registries),
        ))
    }

    /// Number of recent blocks the node keeps accepted-block data for.
    pub async fn accepted_block_window(&self) -> Result<i64> {
        self.call(methods::ACCEPTED_BLOCK_WINDOW, serde_json::json!({}))
            .await
    }

    // ── Transactions ─────────────────────────────────────────────

    /// Status of a transaction, or `None` if the node does not know it.
    pub async fn tx(&self, tx_id: Id) -> Result<Option<TxStatus>> {
        match self.call(methods::TX, TxArgs { tx_id }).await {
            Ok(status) => Ok(Some(status)),
            Err(err) if err.is_not_found(NotFound::Tx) => {
                debug!(%tx_id, "transaction not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Submits a message transaction for another chain and returns its id.
    pub async fn submit_msg_tx(
        &self,
        chain_id: &str,
        network_id: u32,
        secondary_chain_id: &[u8],
        data: &[u8],
    ) -> Result<Id> {
        let reply: SubmitMsgTxReply = self
            .call(
                methods::SUBMIT_MSG_TX,
                SubmitMsgTxArgs {
                    chain_id,
                    network_id,
                    secondary_chain_id,
                    data,
                },
            )
            .await?;
        Ok(reply.tx_id)
    }

    // ── Assets ───────────────────────────────────────────────────

    /// Metadata of `asset`, or `None` if it does not exist.
    ///
    /// With `use_cache`, a previously fetched record is returned as is without
    /// contacting the node. Fetched records always refresh the cache.
    pub async fn asset(&self, asset: Id, use_cache: bool) -> Result<Option<AssetRecord>> {
        if use_cache && let Some(record) = self.assets.get(&asset) {
            return Ok(Some(record));
        }
        match self.call::<_, AssetRecord>(methods::ASSET, AssetArgs { asset }).await {
            Ok(record) => {
                self.assets.insert(asset, record.clone());
                Ok(Some(record))
            }
            Err(err) if err.is_not_found(NotFound::Asset) => {
                debug!(%asset, "asset not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Balance of `address` in `asset`.
    pub async fn balance(&self, address: &str, asset: Id) -> Result<u64> {
        let reply: AmountReply = self
            .call(methods::BALANCE, BalanceArgs { address, asset })
            .await?;
        Ok(reply.amount)
    }

    /// Amount of `asset` loaned out to the `destination` chain.
    pub async fn loan(&self, asset: Id, destination: Id) -> Result<u64> {
        let reply: AmountReply = self
            .call(methods::LOAN, LoanArgs { asset, destination })
            .await?;
        Ok(reply.amount)
    }

    // ── Blocks ───────────────────────────────────────────────────

    /// Headers from height `height` up to `end` (milliseconds).
    pub async fn block_headers_by_height(
        &self,
        height: u64,
        end: i64,
    ) -> Result<BlockHeadersResponse> {
        self.call(
            methods::BLOCK_HEADERS_BY_HEIGHT,
            HeadersByHeightArgs { height, end },
        )
        .await
    }

    /// Headers from the block with id `id` up to `end` (milliseconds).
    pub async fn block_headers_by_id(&self, id: &str, end: i64) -> Result<BlockHeadersResponse> {
        self.call(methods::BLOCK_HEADERS_BY_ID, HeadersByIdArgs { id, end })
            .await
    }

    /// Headers from timestamp `start` up to `end`, both in milliseconds.
    pub async fn block_headers_by_start(&self, start: i64, end: i64) -> Result<BlockHeadersResponse> {
        self.call(
            methods::BLOCK_HEADERS_BY_START,
            HeadersByStartArgs { start, end },
        )
        .await
    }

    /// Headers from the block selected by `query` up to `end` (milliseconds).
    pub async fn block_headers(
        &self,
        query: impl Into<HeaderQuery>,
        end: i64,
    ) -> Result<BlockHeadersResponse> {
        match query.into() {
            HeaderQuery::Height(height) => self.block_headers_by_height(height, end).await,
            HeaderQuery::Id(id) => self.block_headers_by_id(&id, end).await,
            HeaderQuery::Start(start) => self.block_headers_by_start(start, end).await,
        }
    }

    /// Transactions included in the block with id `id`.
    pub async fn block_transactions(&self, id: &str) -> Result<TransactionResponse> {
        self.call(methods::BLOCK_TRANSACTIONS, BlockTransactionsArgs { id })
            .await
    }

    /// Transactions of `namespace` in the block at `height`.
    pub async fn block_transactions_by_namespace(
        &self,
        height: u64,
        namespace: &str,
    ) -> Result<SeqTransactionResponse> {
        self.call(
            methods::BLOCK_TRANSACTIONS_BY_NAMESPACE,
            BlockTransactionsByNamespaceArgs { height, namespace },
        )
        .await
    }

    /// Up to `max_blocks` commitment blocks from height `first`.
    pub async fn commitment_blocks(
        &self,
        first: u64,
        current_height: u64,
        max_blocks: u32,
    ) -> Result<SequencerWarpBlockResponse> {
        self.call(
            methods::COMMITMENT_BLOCKS,
            CommitmentBlocksArgs {
                first,
                current_height,
                max_blocks,
            },
        )
        .await
    }

    // ── Waiting ──────────────────────────────────────────────────

    /// Waits until `address` holds at least `min` of `asset`.
    ///
    /// Fails with [`Error::MissingAsset`] before polling if the asset does not
    /// exist. Each unsatisfied check logs the current and target amounts.
    pub async fn wait_for_balance(
        &self,
        address: &str,
        asset: Id,
        min: u64,
        scope: &CancelScope,
    ) -> Result<()> {
        let Some(record) = self.asset(asset, true).await? else {
            return Err(Error::MissingAsset(asset));
        };
        let record = &record;
        let symbol = record.symbol_lossy();
        let symbol = symbol.as_str();

        poll_until(scope, self.backoff.as_ref(), move || async move {
            let balance = self.balance(address, asset).await?;
            if balance >= min {
                return Ok(Some(()));
            }
            info!(
                address,
                %asset,
                current = %format_balance(balance, record.decimals),
                target = %format_balance(min, record.decimals),
                symbol,
                "waiting for balance"
            );
            Ok(None)
        })
        .await
    }

    /// Waits until the node knows `tx_id` and returns its status.
    pub async fn wait_for_transaction(&self, tx_id: Id, scope: &CancelScope) -> Result<TxStatus> {
        poll_until(scope, self.backoff.as_ref(), move || async move {
            self.tx(tx_id).await
        })
        .await
    }
}
