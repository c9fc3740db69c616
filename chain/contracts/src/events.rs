//! Contract events
//!
//! Events are immutable records emitted by contract operations. Each
//! state-changing operation appends exactly one event to its component's
//! append-only log; downstream readers consume them as claim history.

use serde::{Deserialize, Serialize};
use types::asset::AssetRef;
use types::ids::{AccountId, CampaignId, RewardId};

/// Fungible units taken into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleDeposited {
    pub owner: AccountId,
    pub asset: AssetRef,
    pub amount: u64,
}

/// A non-fungible unit taken into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueDeposited {
    pub owner: AccountId,
    pub asset: AssetRef,
}

/// Fungible units released back to their depositor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleWithdrawn {
    pub owner: AccountId,
    pub asset: AssetRef,
    pub amount: u64,
}

/// A non-fungible unit released back to its depositor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueWithdrawn {
    pub owner: AccountId,
    pub asset: AssetRef,
}

/// One unit released to a claimant by the claim authorizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardReleased {
    pub recipient: AccountId,
    pub asset: AssetRef,
}

/// A reward unit registered in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRegistered {
    pub id: RewardId,
    pub asset: AssetRef,
    pub owner: AccountId,
}

/// A campaign created with its reward sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignCreated {
    pub id: CampaignId,
    pub reward_count: usize,
    pub randomized: bool,
}

/// The eligibility commitment root attached to a campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRootAttached {
    pub id: CampaignId,
    pub root: [u8; 32],
    pub attached_by: String,
}

/// A claim settled: the leaf index consumed and one reward unit released
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardClaimed {
    pub campaign_id: CampaignId,
    pub index: u64,
    pub claimant: AccountId,
    pub reward_id: RewardId,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    FungibleDeposited(FungibleDeposited),
    UniqueDeposited(UniqueDeposited),
    FungibleWithdrawn(FungibleWithdrawn),
    UniqueWithdrawn(UniqueWithdrawn),
    RewardReleased(RewardReleased),
    RewardRegistered(RewardRegistered),
    CampaignCreated(CampaignCreated),
    ClaimRootAttached(ClaimRootAttached),
    RewardClaimed(RewardClaimed),
}
