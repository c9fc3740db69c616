//! Claim Authorizer — proof verification and single-consumption settlement
//!
//! Verifies a claimant's Merkle inclusion proof against a campaign's
//! committed root, enforces single consumption of each authorized leaf
//! index, and drives the ledger release. A claim settles as one atomic
//! unit: the consumed mark lands only after the release succeeds, so a
//! failed transfer leaves the index claimable.

use std::collections::{HashMap, HashSet};

use types::ids::{AccountId, CampaignId};

use crate::campaign::CampaignManager;
use crate::errors::ClaimError;
use crate::events::{ContractEvent, RewardClaimed};
use crate::ledger::{AssetLedger, AssetVault};
use crate::merkle;
use crate::registry::RewardRegistry;

/// Claim authorizer holding the per-campaign consumed-index sets.
///
/// The consumed set is append-only: an index enters it exactly once, on
/// the first successful claim for that index, and never leaves it.
#[derive(Debug, Default)]
pub struct ClaimAuthorizer {
    consumed: HashMap<CampaignId, HashSet<u64>>,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl ClaimAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure verification with no side effects.
    ///
    /// Returns `true` only when the campaign exists with a root attached,
    /// `index` is unconsumed and within the reward sequence, and the proof
    /// resolves the `(claimant, index)` leaf to the committed root. The
    /// eligibility gate is not consulted here; it is enforced by `claim`.
    pub fn check_claim(
        &self,
        campaigns: &CampaignManager,
        claimant: AccountId,
        campaign_id: CampaignId,
        index: u64,
        proof: &[[u8; 32]],
    ) -> bool {
        let campaign = match campaigns.campaign(campaign_id) {
            Ok(c) => c,
            Err(_) => return false,
        };
        let root = match campaign.claim_root {
            Some(r) => r,
            None => return false,
        };
        if self.is_consumed(campaign_id, index) {
            return false;
        }
        if index as usize >= campaign.reward_sequence.len() {
            return false;
        }
        merkle::verify_proof(merkle::leaf_hash(claimant, index), proof, root)
    }

    /// Settle a claim: verify, release one reward unit, consume the index.
    ///
    /// Preconditions are checked before any mutation; the release and the
    /// consumed mark commit together or not at all.
    pub fn claim(
        &mut self,
        campaigns: &CampaignManager,
        registry: &RewardRegistry,
        ledger: &mut AssetLedger,
        vault: &mut dyn AssetVault,
        claimant: AccountId,
        campaign_id: CampaignId,
        index: u64,
        proof: &[[u8; 32]],
    ) -> Result<ContractEvent, ClaimError> {
        let campaign = campaigns
            .campaign(campaign_id)
            .map_err(|_| ClaimError::CampaignNotFound {
                id: campaign_id.value(),
            })?;

        let root = campaign.claim_root.ok_or(ClaimError::CampaignNotReady)?;

        if self.is_consumed(campaign_id, index) {
            return Err(ClaimError::AlreadyClaimed { index });
        }

        // An index outside the sequence cannot appear in a correctly built
        // commitment, so it is indistinguishable from a forged proof.
        if index as usize >= campaign.reward_sequence.len() {
            return Err(ClaimError::InvalidProof);
        }

        if !merkle::verify_proof(merkle::leaf_hash(claimant, index), proof, root) {
            return Err(ClaimError::InvalidProof);
        }

        if let Some(gate) = &campaign.eligibility_gate {
            if vault.balance_of(claimant, gate) == 0 {
                return Err(ClaimError::EligibilityNotMet);
            }
        }

        let reward_id = campaign.reward_sequence[index as usize];
        let unit = registry.get(reward_id)?;

        if registry.quantity_of(reward_id, ledger)? == 0 {
            return Err(ClaimError::RewardExhausted {
                id: reward_id.value(),
            });
        }

        // Release first; the consumed mark lands only on success.
        ledger.release(vault, unit.owner, &unit.asset, claimant)?;

        self.consumed.entry(campaign_id).or_default().insert(index);

        let event = ContractEvent::RewardClaimed(RewardClaimed {
            campaign_id,
            index,
            claimant,
            reward_id,
        });

        self.events.push(event.clone());
        Ok(event)
    }

    /// Check whether a leaf index has been consumed for a campaign.
    pub fn is_consumed(&self, campaign_id: CampaignId, index: u64) -> bool {
        self.consumed
            .get(&campaign_id)
            .map_or(false, |set| set.contains(&index))
    }

    /// Number of consumed indices for a campaign.
    pub fn consumed_count(&self, campaign_id: CampaignId) -> usize {
        self.consumed.get(&campaign_id).map_or(0, HashSet::len)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryVault;
    use crate::merkle::{hash_pair, leaf_hash};
    use types::asset::AssetRef;
    use types::ids::RewardId;

    struct Fixture {
        vault: InMemoryVault,
        ledger: AssetLedger,
        registry: RewardRegistry,
        campaigns: CampaignManager,
        authorizer: ClaimAuthorizer,
        depositor: AccountId,
    }

    fn poap() -> AssetRef {
        AssetRef::fungible("0xpoap", 1)
    }

    /// Deposit `quantity` units under reward id 1 and create campaign 1
    /// with a `slots`-long sequence of that reward. No root attached.
    fn setup(quantity: u64, slots: usize) -> Fixture {
        let mut vault = InMemoryVault::new();
        let mut ledger = AssetLedger::new("admin");
        let mut registry = RewardRegistry::new();
        let mut campaigns = CampaignManager::new("admin");
        let depositor = AccountId::new();

        vault.mint(depositor, &poap(), quantity);
        ledger
            .deposit_fungible(&mut vault, depositor, &poap(), quantity)
            .unwrap();
        registry.register(RewardId::new(1), poap(), depositor).unwrap();
        campaigns
            .create(
                "admin",
                CampaignId::new(1),
                false,
                None,
                vec![RewardId::new(1); slots],
                &registry,
            )
            .unwrap();

        Fixture {
            vault,
            ledger,
            registry,
            campaigns,
            authorizer: ClaimAuthorizer::new(),
            depositor,
        }
    }

    /// Two-leaf commitment for `(a, 0)` and `(b, 1)`; returns
    /// `(root, proof_a, proof_b)`.
    fn two_leaf_tree(a: AccountId, b: AccountId) -> ([u8; 32], [[u8; 32]; 1], [[u8; 32]; 1]) {
        let leaf_a = leaf_hash(a, 0);
        let leaf_b = leaf_hash(b, 1);
        (hash_pair(&leaf_a, &leaf_b), [leaf_b], [leaf_a])
    }

    #[test]
    fn test_check_claim_valid() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let (root, proof_a, _) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        assert!(fx
            .authorizer
            .check_claim(&fx.campaigns, alice, CampaignId::new(1), 0, &proof_a));
    }

    #[test]
    fn test_check_claim_no_root() {
        let fx = setup(10, 5);
        let alice = AccountId::new();
        assert!(!fx
            .authorizer
            .check_claim(&fx.campaigns, alice, CampaignId::new(1), 0, &[]));
    }

    #[test]
    fn test_check_claim_unknown_campaign() {
        let fx = setup(10, 5);
        let alice = AccountId::new();
        assert!(!fx
            .authorizer
            .check_claim(&fx.campaigns, alice, CampaignId::new(9), 0, &[]));
    }

    #[test]
    fn test_claim_success_and_consumption() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let (root, proof_a, _) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        let event = fx
            .authorizer
            .claim(
                &fx.campaigns,
                &fx.registry,
                &mut fx.ledger,
                &mut fx.vault,
                alice,
                CampaignId::new(1),
                0,
                &proof_a,
            )
            .unwrap();
        assert!(matches!(event, ContractEvent::RewardClaimed(_)));
        assert!(fx.authorizer.is_consumed(CampaignId::new(1), 0));
        assert_eq!(fx.vault.balance_of(alice, &poap()), 1);
        assert_eq!(
            fx.registry
                .quantity_of(RewardId::new(1), &fx.ledger)
                .unwrap(),
            9
        );
    }

    #[test]
    fn test_claim_twice_fails() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let (root, proof_a, _) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        fx.authorizer
            .claim(
                &fx.campaigns,
                &fx.registry,
                &mut fx.ledger,
                &mut fx.vault,
                alice,
                CampaignId::new(1),
                0,
                &proof_a,
            )
            .unwrap();

        let result = fx.authorizer.claim(
            &fx.campaigns,
            &fx.registry,
            &mut fx.ledger,
            &mut fx.vault,
            alice,
            CampaignId::new(1),
            0,
            &proof_a,
        );
        assert_eq!(result, Err(ClaimError::AlreadyClaimed { index: 0 }));
        // Quantity unchanged by the rejected retry
        assert_eq!(fx.vault.balance_of(alice, &poap()), 1);
    }

    #[test]
    fn test_claim_wrong_identity_proof() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let eve = AccountId::new();
        let (root, proof_a, _) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        let result = fx.authorizer.claim(
            &fx.campaigns,
            &fx.registry,
            &mut fx.ledger,
            &mut fx.vault,
            eve,
            CampaignId::new(1),
            0,
            &proof_a,
        );
        assert_eq!(result, Err(ClaimError::InvalidProof));
    }

    #[test]
    fn test_claim_wrong_index_proof() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let (root, proof_a, _) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        // Alice's proof was built for index 0
        let result = fx.authorizer.claim(
            &fx.campaigns,
            &fx.registry,
            &mut fx.ledger,
            &mut fx.vault,
            alice,
            CampaignId::new(1),
            1,
            &proof_a,
        );
        assert_eq!(result, Err(ClaimError::InvalidProof));
    }

    #[test]
    fn test_claim_out_of_range_index() {
        let mut fx = setup(10, 1);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let (root, _, proof_b) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        // Index 1 is committed but the sequence has a single slot.
        let result = fx.authorizer.claim(
            &fx.campaigns,
            &fx.registry,
            &mut fx.ledger,
            &mut fx.vault,
            bob,
            CampaignId::new(1),
            1,
            &proof_b,
        );
        assert_eq!(result, Err(ClaimError::InvalidProof));
    }

    #[test]
    fn test_claim_no_root() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();

        let result = fx.authorizer.claim(
            &fx.campaigns,
            &fx.registry,
            &mut fx.ledger,
            &mut fx.vault,
            alice,
            CampaignId::new(1),
            0,
            &[],
        );
        assert_eq!(result, Err(ClaimError::CampaignNotReady));
    }

    #[test]
    fn test_claim_unknown_campaign() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();

        let result = fx.authorizer.claim(
            &fx.campaigns,
            &fx.registry,
            &mut fx.ledger,
            &mut fx.vault,
            alice,
            CampaignId::new(9),
            0,
            &[],
        );
        assert_eq!(result, Err(ClaimError::CampaignNotFound { id: 9 }));
    }

    #[test]
    fn test_claim_exhausted_reward() {
        // One custodied unit, two committed slots: the second claim finds
        // the reward drained and the index stays unconsumed.
        let mut fx = setup(1, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let (root, proof_a, proof_b) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        fx.authorizer
            .claim(
                &fx.campaigns,
                &fx.registry,
                &mut fx.ledger,
                &mut fx.vault,
                alice,
                CampaignId::new(1),
                0,
                &proof_a,
            )
            .unwrap();

        let result = fx.authorizer.claim(
            &fx.campaigns,
            &fx.registry,
            &mut fx.ledger,
            &mut fx.vault,
            bob,
            CampaignId::new(1),
            1,
            &proof_b,
        );
        assert_eq!(result, Err(ClaimError::RewardExhausted { id: 1 }));
        assert!(!fx.authorizer.is_consumed(CampaignId::new(1), 1));
        // The index stays claimable: commitment verification still passes,
        // only the release is blocked until replenishment.
        assert!(fx
            .authorizer
            .check_claim(&fx.campaigns, bob, CampaignId::new(1), 1, &proof_b));
    }

    #[test]
    fn test_claim_eligibility_gate() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let gate = AssetRef::non_fungible("0xpass", 1);

        // Recreate the campaign with a gate under a fresh id.
        fx.campaigns
            .create(
                "admin",
                CampaignId::new(2),
                false,
                Some(gate.clone()),
                vec![RewardId::new(1); 5],
                &fx.registry,
            )
            .unwrap();
        let (root, proof_a, _) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(2), root)
            .unwrap();

        let result = fx.authorizer.claim(
            &fx.campaigns,
            &fx.registry,
            &mut fx.ledger,
            &mut fx.vault,
            alice,
            CampaignId::new(2),
            0,
            &proof_a,
        );
        assert_eq!(result, Err(ClaimError::EligibilityNotMet));

        // Holding the gating asset unlocks the claim.
        fx.vault.mint(alice, &gate, 1);
        assert!(fx
            .authorizer
            .claim(
                &fx.campaigns,
                &fx.registry,
                &mut fx.ledger,
                &mut fx.vault,
                alice,
                CampaignId::new(2),
                0,
                &proof_a,
            )
            .is_ok());
    }

    #[test]
    fn test_check_claim_false_after_consumption() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let (root, proof_a, _) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        assert!(fx
            .authorizer
            .check_claim(&fx.campaigns, alice, CampaignId::new(1), 0, &proof_a));

        fx.authorizer
            .claim(
                &fx.campaigns,
                &fx.registry,
                &mut fx.ledger,
                &mut fx.vault,
                alice,
                CampaignId::new(1),
                0,
                &proof_a,
            )
            .unwrap();

        assert!(!fx
            .authorizer
            .check_claim(&fx.campaigns, alice, CampaignId::new(1), 0, &proof_a));
    }

    #[test]
    fn test_consumed_count() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let (root, proof_a, proof_b) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        assert_eq!(fx.authorizer.consumed_count(CampaignId::new(1)), 0);
        fx.authorizer
            .claim(
                &fx.campaigns,
                &fx.registry,
                &mut fx.ledger,
                &mut fx.vault,
                alice,
                CampaignId::new(1),
                0,
                &proof_a,
            )
            .unwrap();
        fx.authorizer
            .claim(
                &fx.campaigns,
                &fx.registry,
                &mut fx.ledger,
                &mut fx.vault,
                bob,
                CampaignId::new(1),
                1,
                &proof_b,
            )
            .unwrap();
        assert_eq!(fx.authorizer.consumed_count(CampaignId::new(1)), 2);
    }

    #[test]
    fn test_depositor_can_still_withdraw_remainder() {
        let mut fx = setup(10, 5);
        let alice = AccountId::new();
        let bob = AccountId::new();
        let (root, proof_a, _) = two_leaf_tree(alice, bob);
        fx.campaigns
            .attach_claim("admin", CampaignId::new(1), root)
            .unwrap();

        fx.authorizer
            .claim(
                &fx.campaigns,
                &fx.registry,
                &mut fx.ledger,
                &mut fx.vault,
                alice,
                CampaignId::new(1),
                0,
                &proof_a,
            )
            .unwrap();

        let depositor = fx.depositor;
        fx.ledger
            .withdraw_fungible(&mut fx.vault, depositor, &poap(), 9)
            .unwrap();
        assert_eq!(
            fx.registry
                .quantity_of(RewardId::new(1), &fx.ledger)
                .unwrap(),
            0
        );
    }
}
