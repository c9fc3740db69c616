//! Asset Ledger — custody balances, deposits, withdrawals, releases
//!
//! The ledger is a thin accounting layer over the external asset vault
//! collaborator: every deposit, withdrawal, and release moves units through
//! the vault first and commits the matching balance mutation only after the
//! transfer succeeds, so a rejected transfer leaves no state behind.
//!
//! Custody is tracked by provenance: fungible balances are keyed by
//! `(owner, asset)` so withdraw and claim can attribute quantity to the
//! depositor that contributed it; each non-fungible unit maps to the single
//! owner that custodied it.

use std::collections::HashMap;

use types::asset::AssetRef;
use types::ids::AccountId;

use crate::errors::{LedgerError, VaultError};
use crate::events::{
    ContractEvent, FungibleDeposited, FungibleWithdrawn, RewardReleased, UniqueDeposited,
    UniqueWithdrawn,
};
use crate::security::{AccessControl, PauseGuard, ReentrancyGuard};

/// External asset vault collaborator.
///
/// The only surface the core depends on: moving units into custody, moving
/// them out, and reading a holder's balance for eligibility checks.
pub trait AssetVault {
    /// Move `qty` units of `asset` from `owner`'s holdings into custody.
    fn transfer_in(&mut self, owner: AccountId, asset: &AssetRef, qty: u64)
        -> Result<(), VaultError>;

    /// Move `qty` custodied units of `asset` out to `recipient`.
    fn transfer_out(
        &mut self,
        recipient: AccountId,
        asset: &AssetRef,
        qty: u64,
    ) -> Result<(), VaultError>;

    /// Units of `asset` held by `holder` outside custody.
    fn balance_of(&self, holder: AccountId, asset: &AssetRef) -> u64;
}

/// In-memory vault implementation.
///
/// Stands in for the external token contracts in tests and local
/// simulation. Holdings are minted directly into wallets; custody is a
/// single pooled count per asset, mirroring how the real collaborator
/// reports contract-held balances.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    wallets: HashMap<(AccountId, AssetRef), u64>,
    custody: HashMap<AssetRef, u64>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint units directly into a holder's wallet.
    pub fn mint(&mut self, holder: AccountId, asset: &AssetRef, qty: u64) {
        *self.wallets.entry((holder, asset.clone())).or_insert(0) += qty;
    }

    /// Total units of `asset` currently in custody.
    pub fn custody_total(&self, asset: &AssetRef) -> u64 {
        self.custody.get(asset).copied().unwrap_or(0)
    }
}

impl AssetVault for InMemoryVault {
    fn transfer_in(
        &mut self,
        owner: AccountId,
        asset: &AssetRef,
        qty: u64,
    ) -> Result<(), VaultError> {
        let held = self
            .wallets
            .entry((owner, asset.clone()))
            .or_insert(0);
        if *held < qty {
            return Err(VaultError::InsufficientHoldings {
                asset: asset.to_string(),
                required: qty,
                available: *held,
            });
        }
        *held -= qty;
        *self.custody.entry(asset.clone()).or_insert(0) += qty;
        Ok(())
    }

    fn transfer_out(
        &mut self,
        recipient: AccountId,
        asset: &AssetRef,
        qty: u64,
    ) -> Result<(), VaultError> {
        let held = self.custody.entry(asset.clone()).or_insert(0);
        if *held < qty {
            return Err(VaultError::InsufficientHoldings {
                asset: asset.to_string(),
                required: qty,
                available: *held,
            });
        }
        *held -= qty;
        *self.wallets.entry((recipient, asset.clone())).or_insert(0) += qty;
        Ok(())
    }

    fn balance_of(&self, holder: AccountId, asset: &AssetRef) -> u64 {
        self.wallets
            .get(&(holder, asset.clone()))
            .copied()
            .unwrap_or(0)
    }
}

/// Core custody ledger.
///
/// All state-changing operations check:
/// 1. Pause state
/// 2. Reentrancy guard
/// 3. Asset kind and amount validity
/// 4. The vault transfer, before any balance mutation
#[derive(Debug)]
pub struct AssetLedger {
    /// Fungible custody: owner -> (asset -> count)
    fungible: HashMap<AccountId, HashMap<AssetRef, u64>>,
    /// Non-fungible custody: asset -> owner
    unique: HashMap<AssetRef, AccountId>,
    /// Security: reentrancy guard
    reentrancy_guard: ReentrancyGuard,
    /// Security: pause guard
    pause_guard: PauseGuard,
    /// Security: admin for pause control
    access_control: AccessControl,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl AssetLedger {
    /// Create a new ledger with an admin caller.
    pub fn new(admin: impl Into<String>) -> Self {
        Self {
            fungible: HashMap::new(),
            unique: HashMap::new(),
            reentrancy_guard: ReentrancyGuard::new(),
            pause_guard: PauseGuard::new(),
            access_control: AccessControl::new(admin),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Take fungible units into custody for `owner`.
    ///
    /// Validates: not paused, no reentrancy, fungible kind, positive amount.
    /// Emits `FungibleDeposited`.
    pub fn deposit_fungible(
        &mut self,
        vault: &mut dyn AssetVault,
        owner: AccountId,
        asset: &AssetRef,
        amount: u64,
    ) -> Result<ContractEvent, LedgerError> {
        self.check_not_paused()?;
        self.check_reentrancy()?;

        if !asset.is_fungible() {
            self.reentrancy_guard.release();
            return Err(LedgerError::KindMismatch {
                asset: asset.to_string(),
            });
        }

        if amount == 0 {
            self.reentrancy_guard.release();
            return Err(LedgerError::InvalidAmount);
        }

        // Pre-compute the credited balance so an overflow aborts before
        // the vault transfer runs.
        let current = self.balance_of(&owner, asset);
        let new_balance = match current.checked_add(amount) {
            Some(v) => v,
            None => {
                self.reentrancy_guard.release();
                return Err(LedgerError::Overflow);
            }
        };

        if let Err(e) = vault.transfer_in(owner, asset, amount) {
            self.reentrancy_guard.release();
            return Err(e.into());
        }

        self.fungible
            .entry(owner)
            .or_default()
            .insert(asset.clone(), new_balance);

        let event = ContractEvent::FungibleDeposited(FungibleDeposited {
            owner,
            asset: asset.clone(),
            amount,
        });

        self.events.push(event.clone());
        self.reentrancy_guard.release();
        Ok(event)
    }

    /// Take one non-fungible unit into custody for `owner`.
    ///
    /// Fails `DuplicateAsset` if the unit is already custodied.
    /// Emits `UniqueDeposited`.
    pub fn deposit_unique(
        &mut self,
        vault: &mut dyn AssetVault,
        owner: AccountId,
        asset: &AssetRef,
    ) -> Result<ContractEvent, LedgerError> {
        self.check_not_paused()?;
        self.check_reentrancy()?;

        if asset.is_fungible() {
            self.reentrancy_guard.release();
            return Err(LedgerError::KindMismatch {
                asset: asset.to_string(),
            });
        }

        if self.unique.contains_key(asset) {
            self.reentrancy_guard.release();
            return Err(LedgerError::DuplicateAsset {
                asset: asset.to_string(),
            });
        }

        if let Err(e) = vault.transfer_in(owner, asset, 1) {
            self.reentrancy_guard.release();
            return Err(e.into());
        }

        self.unique.insert(asset.clone(), owner);

        let event = ContractEvent::UniqueDeposited(UniqueDeposited {
            owner,
            asset: asset.clone(),
        });

        self.events.push(event.clone());
        self.reentrancy_guard.release();
        Ok(event)
    }

    // ───────────────────────── Withdraw ─────────────────────────

    /// Release fungible custody back to the depositor.
    ///
    /// Fails `Unauthorized` when `caller` has no recorded custody of the
    /// asset, `InsufficientBalance` when overdrawn.
    pub fn withdraw_fungible(
        &mut self,
        vault: &mut dyn AssetVault,
        caller: AccountId,
        asset: &AssetRef,
        amount: u64,
    ) -> Result<ContractEvent, LedgerError> {
        self.check_not_paused()?;
        self.check_reentrancy()?;

        if !asset.is_fungible() {
            self.reentrancy_guard.release();
            return Err(LedgerError::KindMismatch {
                asset: asset.to_string(),
            });
        }

        if amount == 0 {
            self.reentrancy_guard.release();
            return Err(LedgerError::InvalidAmount);
        }

        let available = self.balance_of(&caller, asset);
        if available == 0 {
            self.reentrancy_guard.release();
            return Err(LedgerError::Unauthorized);
        }
        if available < amount {
            self.reentrancy_guard.release();
            return Err(LedgerError::InsufficientBalance {
                asset: asset.to_string(),
                required: amount,
                available,
            });
        }

        if let Err(e) = vault.transfer_out(caller, asset, amount) {
            self.reentrancy_guard.release();
            return Err(e.into());
        }

        self.fungible
            .entry(caller)
            .or_default()
            .insert(asset.clone(), available - amount);

        let event = ContractEvent::FungibleWithdrawn(FungibleWithdrawn {
            owner: caller,
            asset: asset.clone(),
            amount,
        });

        self.events.push(event.clone());
        self.reentrancy_guard.release();
        Ok(event)
    }

    /// Release a custodied non-fungible unit back to its depositor.
    pub fn withdraw_unique(
        &mut self,
        vault: &mut dyn AssetVault,
        caller: AccountId,
        asset: &AssetRef,
    ) -> Result<ContractEvent, LedgerError> {
        self.check_not_paused()?;
        self.check_reentrancy()?;

        if asset.is_fungible() {
            self.reentrancy_guard.release();
            return Err(LedgerError::KindMismatch {
                asset: asset.to_string(),
            });
        }

        match self.unique.get(asset) {
            None => {
                self.reentrancy_guard.release();
                return Err(LedgerError::InsufficientBalance {
                    asset: asset.to_string(),
                    required: 1,
                    available: 0,
                });
            }
            Some(owner) if *owner != caller => {
                self.reentrancy_guard.release();
                return Err(LedgerError::Unauthorized);
            }
            Some(_) => {}
        }

        if let Err(e) = vault.transfer_out(caller, asset, 1) {
            self.reentrancy_guard.release();
            return Err(e.into());
        }

        self.unique.remove(asset);

        let event = ContractEvent::UniqueWithdrawn(UniqueWithdrawn {
            owner: caller,
            asset: asset.clone(),
        });

        self.events.push(event.clone());
        self.reentrancy_guard.release();
        Ok(event)
    }

    // ───────────────────────── Release ─────────────────────────

    /// Release one unit of a reward's backing asset to a claimant.
    ///
    /// Internal-only entry used by the claim authorizer: decrements the
    /// reward owner's custody and transfers the unit to `recipient`. Never
    /// exposed to arbitrary callers.
    pub(crate) fn release(
        &mut self,
        vault: &mut dyn AssetVault,
        reward_owner: AccountId,
        asset: &AssetRef,
        recipient: AccountId,
    ) -> Result<ContractEvent, LedgerError> {
        self.check_not_paused()?;
        self.check_reentrancy()?;

        if asset.is_fungible() {
            let available = self.balance_of(&reward_owner, asset);
            if available == 0 {
                self.reentrancy_guard.release();
                return Err(LedgerError::InsufficientBalance {
                    asset: asset.to_string(),
                    required: 1,
                    available: 0,
                });
            }

            if let Err(e) = vault.transfer_out(recipient, asset, 1) {
                self.reentrancy_guard.release();
                return Err(e.into());
            }

            self.fungible
                .entry(reward_owner)
                .or_default()
                .insert(asset.clone(), available - 1);
        } else {
            if self.unique.get(asset) != Some(&reward_owner) {
                self.reentrancy_guard.release();
                return Err(LedgerError::InsufficientBalance {
                    asset: asset.to_string(),
                    required: 1,
                    available: 0,
                });
            }

            if let Err(e) = vault.transfer_out(recipient, asset, 1) {
                self.reentrancy_guard.release();
                return Err(e.into());
            }

            self.unique.remove(asset);
        }

        let event = ContractEvent::RewardReleased(RewardReleased {
            recipient,
            asset: asset.clone(),
        });

        self.events.push(event.clone());
        self.reentrancy_guard.release();
        Ok(event)
    }

    // ───────────────────────── Balance Queries ─────────────────────────

    /// Fungible custody count for a specific owner and asset.
    pub fn balance_of(&self, owner: &AccountId, asset: &AssetRef) -> u64 {
        self.fungible
            .get(owner)
            .and_then(|assets| assets.get(asset))
            .copied()
            .unwrap_or(0)
    }

    /// Owner of a custodied non-fungible unit, if any.
    pub fn holder_of(&self, asset: &AssetRef) -> Option<AccountId> {
        self.unique.get(asset).copied()
    }

    /// Custodied quantity attributable to `owner`, for either kind.
    ///
    /// Non-fungible quantity is an existence flag: 1 while the unit is
    /// custodied under `owner`, 0 otherwise.
    pub fn custodied_quantity(&self, owner: &AccountId, asset: &AssetRef) -> u64 {
        if asset.is_fungible() {
            self.balance_of(owner, asset)
        } else if self.unique.get(asset) == Some(owner) {
            1
        } else {
            0
        }
    }

    // ───────────────────────── Pause ─────────────────────────

    /// Pause the ledger. Admin-only.
    pub fn pause(&mut self, caller: &str) -> Result<(), LedgerError> {
        if !self.access_control.is_admin(caller) {
            return Err(LedgerError::Unauthorized);
        }
        self.pause_guard.pause();
        Ok(())
    }

    /// Unpause the ledger. Admin-only.
    pub fn unpause(&mut self, caller: &str) -> Result<(), LedgerError> {
        if !self.access_control.is_admin(caller) {
            return Err(LedgerError::Unauthorized);
        }
        self.pause_guard.unpause();
        Ok(())
    }

    /// Check if the ledger is paused.
    pub fn is_paused(&self) -> bool {
        self.pause_guard.is_paused()
    }

    /// Get the current admin.
    pub fn admin(&self) -> &str {
        self.access_control.admin()
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn check_not_paused(&self) -> Result<(), LedgerError> {
        if self.pause_guard.is_paused() {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    fn check_reentrancy(&mut self) -> Result<(), LedgerError> {
        if !self.reentrancy_guard.acquire() {
            return Err(LedgerError::Reentrancy);
        }
        Ok(())
    }
}
