//! Campaign Manager — campaign lifecycle and claim-root attachment
//!
//! A campaign composes an ordered sequence of reward-unit references behind
//! a single eligibility commitment. The sequence is stored verbatim and
//! defines the index-to-reward mapping consumed by claims; it is never
//! reshuffled here, even when `randomized` is set — randomization must be
//! encoded into the sequence or the off-core tree build before root
//! attachment.
//!
//! Lifecycle per campaign: `Created` (no root) → `RootAttached` (claims
//! permitted) → `Exhausted` once every reward in the sequence reaches zero
//! quantity. Exhaustion is derived on demand, never stored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use types::asset::AssetRef;
use types::ids::{CampaignId, RewardId};

use crate::errors::CampaignError;
use crate::events::{CampaignCreated, ClaimRootAttached, ContractEvent};
use crate::ledger::AssetLedger;
use crate::registry::RewardRegistry;
use crate::security::AccessControl;

/// Derived lifecycle state of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    /// No claim root attached; claims rejected
    Created,
    /// Root attached, claims permitted
    RootAttached,
    /// Every reward in the sequence has zero quantity
    Exhausted,
}

/// A single campaign record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    /// Index i of the commitment yields `reward_sequence[i]`. Immutable
    /// after creation.
    pub reward_sequence: Vec<RewardId>,
    pub randomized: bool,
    /// Asset a claimant must hold for claims to succeed, if set.
    pub eligibility_gate: Option<AssetRef>,
    /// Write-once eligibility commitment.
    pub claim_root: Option<[u8; 32]>,
}

/// Campaign store managing creation and root attachment.
#[derive(Debug)]
pub struct CampaignManager {
    campaigns: HashMap<CampaignId, Campaign>,
    /// Access control for admin/operator roles
    access_control: AccessControl,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl CampaignManager {
    /// Create a new campaign manager with an admin.
    pub fn new(admin: impl Into<String>) -> Self {
        Self {
            campaigns: HashMap::new(),
            access_control: AccessControl::new(admin),
            events: Vec::new(),
        }
    }

    /// Create a campaign. Admin or operator only.
    ///
    /// The reward sequence is stored verbatim, preserving order. Every id
    /// in it must already be registered.
    pub fn create(
        &mut self,
        caller: &str,
        id: CampaignId,
        randomized: bool,
        eligibility_gate: Option<AssetRef>,
        reward_sequence: Vec<RewardId>,
        registry: &RewardRegistry,
    ) -> Result<ContractEvent, CampaignError> {
        if !self.access_control.is_authorized(caller) {
            return Err(CampaignError::Unauthorized);
        }

        if self.campaigns.contains_key(&id) {
            return Err(CampaignError::DuplicateCampaignId { id: id.value() });
        }

        if reward_sequence.is_empty() {
            return Err(CampaignError::EmptyRewardSequence);
        }

        for reward_id in &reward_sequence {
            if !registry.contains(*reward_id) {
                return Err(CampaignError::UnknownRewardId {
                    id: reward_id.value(),
                });
            }
        }

        let reward_count = reward_sequence.len();
        self.campaigns.insert(
            id,
            Campaign {
                id,
                reward_sequence,
                randomized,
                eligibility_gate,
                claim_root: None,
            },
        );

        let event = ContractEvent::CampaignCreated(CampaignCreated {
            id,
            reward_count,
            randomized,
        });

        self.events.push(event.clone());
        Ok(event)
    }

    /// Attach the claim root to a campaign. Admin or operator only.
    ///
    /// The root is write-once: attaching when one is already set fails
    /// `RootAlreadySet` and the first root remains active.
    pub fn attach_claim(
        &mut self,
        caller: &str,
        id: CampaignId,
        root: [u8; 32],
    ) -> Result<ContractEvent, CampaignError> {
        let campaign = self
            .campaigns
            .get_mut(&id)
            .ok_or(CampaignError::CampaignNotFound { id: id.value() })?;

        if !self.access_control.is_authorized(caller) {
            return Err(CampaignError::Unauthorized);
        }

        if campaign.claim_root.is_some() {
            return Err(CampaignError::RootAlreadySet { id: id.value() });
        }

        campaign.claim_root = Some(root);

        let event = ContractEvent::ClaimRootAttached(ClaimRootAttached {
            id,
            root,
            attached_by: caller.to_string(),
        });

        self.events.push(event.clone());
        Ok(event)
    }

    /// Look up a campaign.
    pub fn campaign(&self, id: CampaignId) -> Result<&Campaign, CampaignError> {
        self.campaigns
            .get(&id)
            .ok_or(CampaignError::CampaignNotFound { id: id.value() })
    }

    /// Derived lifecycle state, computed on demand.
    pub fn status(
        &self,
        id: CampaignId,
        registry: &RewardRegistry,
        ledger: &AssetLedger,
    ) -> Result<CampaignStatus, CampaignError> {
        let campaign = self.campaign(id)?;

        if campaign.claim_root.is_none() {
            return Ok(CampaignStatus::Created);
        }

        // Sequence ids are validated at creation; an unknown id here would
        // mean the registry lost an entry, which it never does.
        let exhausted = campaign
            .reward_sequence
            .iter()
            .all(|rid| registry.quantity_of(*rid, ledger).unwrap_or(0) == 0);

        if exhausted {
            Ok(CampaignStatus::Exhausted)
        } else {
            Ok(CampaignStatus::RootAttached)
        }
    }

    /// Grant operator rights for campaign management. Admin-only.
    pub fn grant_operator(&mut self, admin: &str, operator: impl Into<String>) -> bool {
        self.access_control.grant_operator(admin, operator)
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
