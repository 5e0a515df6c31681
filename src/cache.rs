//! Per-client memory of values fetched from the node.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::genesis::Genesis;
use crate::types::{AssetRecord, Id};

/// Last successfully fetched metadata per asset.
///
/// Only resolved records are stored; a lookup that finds nothing leaves the
/// cache untouched. The lock guards map access only and is never held while
/// a request is in flight.
#[derive(Debug, Default)]
pub struct AssetCache {
    records: Mutex<HashMap<Id, AssetRecord>>,
}

impl AssetCache {
    /// The stored record for `asset`, if any.
    pub fn get(&self, asset: &Id) -> Option<AssetRecord> {
        self.records.lock().get(asset).cloned()
    }

    /// Store `record`, replacing any earlier entry for `asset`.
    pub fn insert(&self, asset: Id, record: AssetRecord) {
        self.records.lock().insert(asset, record);
    }

    /// Number of assets with a stored record.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

/// Holds the node's genesis once it has been fetched.
///
/// Concurrent first fetches may both reach the node; the first value stored
/// wins and every caller gets that value back.
#[derive(Debug, Default)]
pub struct GenesisCell {
    value: OnceLock<Arc<Genesis>>,
}

impl GenesisCell {
    pub fn get(&self) -> Option<Arc<Genesis>> {
        self.value.get().cloned()
    }

    /// Store `genesis` unless a value is already present, returning the stored one.
    pub fn store(&self, genesis: Genesis) -> Arc<Genesis> {
        Arc::clone(self.value.get_or_init(|| Arc::new(genesis)))
    }
}
