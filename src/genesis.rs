//! Genesis configuration, the chain rules derived from it, and the parser
//! handed to transaction decoders.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::Id;

/// Per-dimension fee values: bandwidth, compute, storage read, allocate, write.
pub type Dimensions = [u64; 5];

/// A balance credited to an address at genesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAllocation {
    pub address: String,
    pub balance: u64,
}

/// Genesis of the sequencer chain as served by the node.
///
/// The node never changes its genesis, so one fetch per client is enough.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Genesis {
    /// Human readable prefix of bech32 addresses.
    pub hrp: String,

    /// Minimum gap between blocks, in milliseconds.
    pub min_block_gap: i64,
    /// Minimum gap between empty blocks, in milliseconds.
    pub min_empty_block_gap: i64,

    pub min_unit_price: Dimensions,
    pub unit_price_change_denominator: Dimensions,
    pub window_target_units: Dimensions,
    pub max_block_units: Dimensions,

    /// How long a transaction stays valid after its timestamp, in milliseconds.
    pub validity_window: i64,

    #[serde(rename = "baseUnits")]
    pub base_compute_units: u64,
    pub storage_key_read_units: u64,
    pub storage_value_read_units: u64,
    pub storage_key_allocate_units: u64,
    pub storage_value_allocate_units: u64,
    pub storage_key_write_units: u64,
    pub storage_value_write_units: u64,

    pub state_branch_factor: u64,

    pub custom_allocation: Vec<CustomAllocation>,
}

impl Genesis {
    /// Derive the rule set in force at `timestamp` (milliseconds).
    ///
    /// The rule set does not vary with time yet.
    pub fn rules(self: &Arc<Self>, _timestamp: i64, network_id: u32, chain_id: Id) -> Rules {
        Rules {
            genesis: Arc::clone(self),
            network_id,
            chain_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenesisReply {
    pub genesis: Genesis,
}

/// Chain rules scoped to one network and chain.
#[derive(Clone, Debug)]
pub struct Rules {
    genesis: Arc<Genesis>,
    network_id: u32,
    chain_id: Id,
}

impl Rules {
    pub fn network_id(&self) -> u32 {
        self.network_id
    }

    pub fn chain_id(&self) -> Id {
        self.chain_id
    }

    pub fn min_block_gap(&self) -> i64 {
        self.genesis.min_block_gap
    }

    pub fn min_empty_block_gap(&self) -> i64 {
        self.genesis.min_empty_block_gap
    }

    pub fn validity_window(&self) -> i64 {
        self.genesis.validity_window
    }

    pub fn min_unit_price(&self) -> Dimensions {
        self.genesis.min_unit_price
    }

    pub fn unit_price_change_denominator(&self) -> Dimensions {
        self.genesis.unit_price_change_denominator
    }

    pub fn window_target_units(&self) -> Dimensions {
        self.genesis.window_target_units
    }

    pub fn max_block_units(&self) -> Dimensions {
        self.genesis.max_block_units
    }

    pub fn base_compute_units(&self) -> u64 {
        self.genesis.base_compute_units
    }

    pub fn storage_key_read_units(&self) -> u64 {
        self.genesis.storage_key_read_units
    }

    pub fn storage_value_read_units(&self) -> u64 {
        self.genesis.storage_value_read_units
    }

    pub fn storage_key_allocate_units(&self) -> u64 {
        self.genesis.storage_key_allocate_units
    }

    pub fn storage_value_allocate_units(&self) -> u64 {
        self.genesis.storage_value_allocate_units
    }

    pub fn storage_key_write_units(&self) -> u64 {
        self.genesis.storage_key_write_units
    }

    pub fn storage_value_write_units(&self) -> u64 {
        self.genesis.storage_value_write_units
    }
}

// ── Type registries ──────────────────────────────────────────

/// A registered action or auth type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredType {
    pub id: u8,
    pub name: String,
    /// Whether payloads of this type may carry a warp message.
    pub uses_warp: bool,
}

/// Read-only table of the types a chain understands, keyed by type id.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    by_id: HashMap<u8, RegisteredType>,
    by_name: HashMap<String, u8>,
}

/// Error building a [`TypeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("type id {0} registered twice")]
    DuplicateId(u8),
    #[error("type name {0:?} registered twice")]
    DuplicateName(String),
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    pub fn get(&self, id: u8) -> Option<&RegisteredType> {
        self.by_id.get(&id)
    }

    pub fn lookup(&self, name: &str) -> Option<&RegisteredType> {
        self.by_name.get(name).and_then(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    types: Vec<RegisteredType>,
}

impl TypeRegistryBuilder {
    pub fn register(mut self, id: u8, name: impl Into<String>, uses_warp: bool) -> Self {
        self.types.push(RegisteredType {
            id,
            name: name.into(),
            uses_warp,
        });
        self
    }

    pub fn build(self) -> Result<TypeRegistry, RegistryError> {
        let mut registry = TypeRegistry::default();
        for ty in self.types {
            if registry.by_id.contains_key(&ty.id) {
                return Err(RegistryError::DuplicateId(ty.id));
            }
            if registry.by_name.contains_key(&ty.name) {
                return Err(RegistryError::DuplicateName(ty.name));
            }
            registry.by_name.insert(ty.name.clone(), ty.id);
            registry.by_id.insert(ty.id, ty);
        }
        Ok(registry)
    }
}

/// The action and auth registries a chain decodes transactions with.
#[derive(Clone, Debug, Default)]
pub struct Registries {
    pub actions: TypeRegistry,
    pub auth: TypeRegistry,
}

impl Registries {
    pub fn new(actions: TypeRegistry, auth: TypeRegistry) -> Self {
        Self { actions, auth }
    }
}

// ── Parser ───────────────────────────────────────────────────

/// What a transaction decoder needs to know about a chain.
pub trait ChainParser {
    fn chain_id(&self) -> Id;

    fn rules(&self, timestamp: i64) -> Rules;

    fn registry(&self) -> (&TypeRegistry, &TypeRegistry);
}

/// [`ChainParser`] backed by a fetched genesis.
#[derive(Clone, Debug)]
pub struct Parser {
    network_id: u32,
    chain_id: Id,
    genesis: Arc<Genesis>,
    registries: Arc<Registries>,
}

impl Parser {
    pub fn new(
        network_id: u32,
        chain_id: Id,
        genesis: Arc<Genesis>,
        registries: Arc<Registries>,
    ) -> Self {
        Self {
            network_id,
            chain_id,
            genesis,
            registries,
        }
    }

    pub fn genesis(&self) -> &Genesis {
        &self.genesis
    }
}

impl ChainParser for Parser {
    fn chain_id(&self) -> Id {
        self.chain_id
    }

    fn rules(&self, timestamp: i64) -> Rules {
        self.genesis.rules(timestamp, self.network_id, self.chain_id)
    }

    fn registry(&self) -> (&TypeRegistry, &TypeRegistry) {
        (&self.registries.actions, &self.registries.auth)
    }
}
