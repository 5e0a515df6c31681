//! Request and response types of the sequencer node's JSON-RPC API.
//!
//! Field names follow the node's JSON encoding. Byte strings travel as
//! standard base64 and identifiers as CB58 strings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

const ID_LEN: usize = 32;
const CHECKSUM_LEN: usize = 4;

/// A 32-byte identifier for chains, assets and transactions.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id([u8; ID_LEN]);

/// Error parsing an [`Id`] from its CB58 form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid base58: {0}")]
    Base58(String),
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("checksum mismatch")]
    Checksum,
}

impl Id {
    /// The all-zero identifier.
    pub const EMPTY: Self = Self([0; ID_LEN]);

    pub const fn new(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
        let digest = Sha256::digest(bytes);
        let mut out = [0; CHECKSUM_LEN];
        out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
        out
    }
}

impl From<[u8; ID_LEN]> for Id {
    fn from(value: [u8; ID_LEN]) -> Self {
        Self(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = Vec::with_capacity(ID_LEN + CHECKSUM_LEN);
        payload.extend_from_slice(&self.0);
        payload.extend_from_slice(&Self::checksum(&self.0));
        f.write_str(&bs58::encode(payload).into_string())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({self})")
    }
}

impl FromStr for Id {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| IdParseError::Base58(e.to_string()))?;
        if decoded.len() != ID_LEN + CHECKSUM_LEN {
            return Err(IdParseError::Length {
                expected: ID_LEN,
                actual: decoded.len().saturating_sub(CHECKSUM_LEN),
            });
        }
        let (raw, checksum) = decoded.split_at(ID_LEN);
        if Self::checksum(raw) != checksum {
            return Err(IdParseError::Checksum);
        }
        let mut bytes = [0; ID_LEN];
        bytes.copy_from_slice(raw);
        Ok(Self(bytes))
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Byte strings encoded as standard base64; `null` decodes to empty.
mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => STANDARD.decode(s).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

fn millis_to_utc(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

// ── Transactions ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct TxArgs {
    #[serde(rename = "txId")]
    pub tx_id: Id,
}

/// Status of an accepted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxStatus {
    /// Acceptance time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub success: bool,
    /// Units consumed per fee dimension.
    #[serde(default)]
    pub units: [u64; 5],
    pub fee: u64,
}

impl TxStatus {
    /// Acceptance time as a UTC datetime, if the timestamp is representable.
    pub fn accepted_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.timestamp)
    }
}

// ── Assets ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct AssetArgs {
    pub asset: Id,
}

/// Metadata of an asset as last reported by the node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(with = "base64_bytes")]
    pub symbol: Vec<u8>,
    pub decimals: u8,
    #[serde(with = "base64_bytes")]
    pub metadata: Vec<u8>,
    pub supply: u64,
    pub owner: String,
    #[serde(rename = "warp")]
    pub is_warp: bool,
}

impl AssetRecord {
    /// The symbol rendered as text, replacing invalid UTF-8.
    pub fn symbol_lossy(&self) -> String {
        String::from_utf8_lossy(&self.symbol).into_owned()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BalanceArgs<'a> {
    pub address: &'a str,
    pub asset: Id,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoanArgs {
    pub asset: Id,
    pub destination: Id,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AmountReply {
    pub amount: u64,
}

// ── Blocks ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct HeadersByHeightArgs {
    pub height: u64,
    pub end: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct HeadersByIdArgs<'a> {
    pub id: &'a str,
    pub end: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct HeadersByStartArgs {
    pub start: i64,
    pub end: i64,
}

/// Summary of one accepted block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    #[serde(rename = "blockId", default)]
    pub block_id: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub l1_head: u64,
    #[serde(default)]
    pub height: u64,
}

impl BlockInfo {
    /// Block time as a UTC datetime, if the timestamp is representable.
    pub fn produced_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.timestamp)
    }
}

/// A window of block headers with its neighbours.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeadersResponse {
    #[serde(default)]
    pub from: u64,
    #[serde(default)]
    pub blocks: Vec<BlockInfo>,
    #[serde(default)]
    pub prev: BlockInfo,
    #[serde(default)]
    pub next: BlockInfo,
}

#[derive(Debug, Serialize)]
pub(crate) struct BlockTransactionsArgs<'a> {
    #[serde(rename = "block_id")]
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct BlockTransactionsByNamespaceArgs<'a> {
    pub height: u64,
    pub namespace: &'a str,
}

/// A transaction included in a block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub fee: u64,
}

/// Transactions of one block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    #[serde(default)]
    pub txs: Vec<TransactionInfo>,
    #[serde(rename = "blockId", default)]
    pub block_id: String,
}

/// A sequenced message transaction scoped to a namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqTransaction {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub tx_id: String,
    #[serde(default)]
    pub index: u64,
    #[serde(with = "base64_bytes", default)]
    pub transaction: Vec<u8>,
}

/// Namespace-filtered transactions of one block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqTransactionResponse {
    #[serde(default)]
    pub txs: Vec<SeqTransaction>,
    #[serde(rename = "blockId", default)]
    pub block_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommitmentBlocksArgs {
    pub first: u64,
    pub current_height: u64,
    pub max_blocks: u32,
}

/// Block commitment data consumed by warp relayers.
///
/// Height and roots are arbitrary-size integers on the wire and are kept
/// as exact JSON numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerWarpBlock {
    #[serde(rename = "blockId", default)]
    pub block_id: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub l1_head: u64,
    pub height: serde_json::Number,
    #[serde(rename = "root")]
    pub block_root: serde_json::Number,
    #[serde(rename = "parent")]
    pub parent_root: serde_json::Number,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerWarpBlockResponse {
    #[serde(rename = "blocks", default)]
    pub blocks: Vec<SequencerWarpBlock>,
}

// ── Submission ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct SubmitMsgTxArgs<'a> {
    pub chain_id: &'a str,
    pub network_id: u32,
    #[serde(with = "base64_bytes")]
    pub secondary_chain_id: &'a [u8],
    #[serde(with = "base64_bytes")]
    pub data: &'a [u8],
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitMsgTxReply {
    #[serde(rename = "txId")]
    pub tx_id: Id,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_id_renders_as_cb58() {
        assert_eq!(Id::EMPTY.to_string(), "11111111111111111111111111111111LpoYY");
        assert_eq!(
            "11111111111111111111111111111111LpoYY".parse::<Id>(),
            Ok(Id::EMPTY)
        );
    }

    #[test]
    fn id_rejects_bad_checksum_and_length() {
        assert_eq!(
            "11111111111111111111111111111111LpoYZ".parse::<Id>(),
            Err(IdParseError::Checksum)
        );
        assert!(matches!(
            "1111".parse::<Id>(),
            Err(IdParseError::Length { expected: 32, .. })
        ));
        assert!(matches!("0OIl".parse::<Id>(), Err(IdParseError::Base58(_))));
    }

    #[test]
    fn id_parses_its_own_rendering() {
        let id = Id::new([7; 32]);
        let text = id.to_string();
        assert_eq!(text.parse::<Id>(), Ok(id));
        assert_eq!(serde_json::to_value(id).unwrap(), json!(text));
    }

    #[test]
    fn asset_record_decodes_node_reply() {
        let reply = json!({
            "symbol": "U0VR",
            "decimals": 6,
            "metadata": null,
            "supply": 1_000_000_u64,
            "owner": "seq1qqds2l0ryq5hc2ddps04384zz6rfeuvn3kyvn77hp4n5sv3ahuh6wgkt57y",
            "warp": false
        });
        let record: AssetRecord = serde_json::from_value(reply).unwrap();
        assert_eq!(record.symbol_lossy(), "SEQ");
        assert_eq!(record.decimals, 6);
        assert!(record.metadata.is_empty());
        assert!(!record.is_warp);
    }

    #[test]
    fn tx_status_tolerates_missing_units() {
        let status: TxStatus = serde_json::from_value(json!({
            "timestamp": 1_700_000_000_000_i64,
            "success": true,
            "fee": 42
        }))
        .unwrap();
        assert_eq!(status.units, [0; 5]);
        assert_eq!(
            status.accepted_at().map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn submit_args_encode_bytes_as_base64() {
        let args = SubmitMsgTxArgs {
            chain_id: "chain",
            network_id: 1337,
            secondary_chain_id: b"nkit",
            data: &[0xde, 0xad],
        };
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({
                "chain_id": "chain",
                "network_id": 1337,
                "secondary_chain_id": "bmtpdA==",
                "data": "3q0="
            })
        );
    }

    #[test]
    fn warp_block_keeps_large_roots_exact() {
        let root = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let body = format!(
            r#"{{"blockId":"b","timestamp":1,"l1_head":2,"height":3,"root":{root},"parent":0}}"#
        );
        let block: SequencerWarpBlock = serde_json::from_str(&body).unwrap();
        assert_eq!(block.block_root.to_string(), root);
        assert_eq!(block.height.as_u64(), Some(3));
    }
}
