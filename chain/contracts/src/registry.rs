//! Reward Registry — catalog of claimable reward units
//!
//! A reward unit binds a caller-assigned id to an underlying asset and the
//! depositor that owns its backing balance. The registry only records the
//! binding; it never moves assets, and registration is legal before or
//! after the matching deposit. Quantity is always read through to the
//! ledger, so it reports 0 until the deposit lands and tracks every
//! withdrawal and claim afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use types::asset::AssetRef;
use types::ids::{AccountId, RewardId};

use crate::errors::RegistryError;
use crate::events::{ContractEvent, RewardRegistered};
use crate::ledger::AssetLedger;

/// A registered reward unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardUnit {
    pub id: RewardId,
    pub asset: AssetRef,
    pub owner: AccountId,
}

/// Catalog of reward units keyed by reward id.
#[derive(Debug, Default)]
pub struct RewardRegistry {
    rewards: HashMap<RewardId, RewardUnit>,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl RewardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reward unit bound to a ledger balance owned by `owner`.
    ///
    /// Fails `DuplicateRewardId` if `id` is already registered.
    pub fn register(
        &mut self,
        id: RewardId,
        asset: AssetRef,
        owner: AccountId,
    ) -> Result<ContractEvent, RegistryError> {
        if self.rewards.contains_key(&id) {
            return Err(RegistryError::DuplicateRewardId { id: id.value() });
        }

        self.rewards.insert(
            id,
            RewardUnit {
                id,
                asset: asset.clone(),
                owner,
            },
        );

        let event = ContractEvent::RewardRegistered(RewardRegistered { id, asset, owner });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Look up a registered reward unit.
    pub fn get(&self, id: RewardId) -> Result<&RewardUnit, RegistryError> {
        self.rewards
            .get(&id)
            .ok_or(RegistryError::UnknownRewardId { id: id.value() })
    }

    /// Check whether a reward id is registered.
    pub fn contains(&self, id: RewardId) -> bool {
        self.rewards.contains_key(&id)
    }

    /// Current claimable quantity of a reward unit.
    ///
    /// Read-only; reflects the latest ledger custody state for the bound
    /// asset and owner.
    pub fn quantity_of(&self, id: RewardId, ledger: &AssetLedger) -> Result<u64, RegistryError> {
        let unit = self.get(id)?;
        Ok(ledger.custodied_quantity(&unit.owner, &unit.asset))
    }

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}
