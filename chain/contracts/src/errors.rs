//! Contract-specific error types
//!
//! Comprehensive error taxonomy for ledger, registry, campaign, and claim
//! operations. Every error aborts the triggering operation with zero state
//! mutation; recovery is the caller's responsibility.

use thiserror::Error;

/// Errors surfaced by the external asset vault collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Insufficient holdings of {asset}: required {required}, available {available}")]
    InsufficientHoldings {
        asset: String,
        required: u64,
        available: u64,
    },

    #[error("Transfer rejected by vault: {reason}")]
    TransferRejected { reason: String },
}

/// Ledger-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unauthorized: caller is not the recorded owner")]
    Unauthorized,

    #[error("Insufficient balance for {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: String,
        required: u64,
        available: u64,
    },

    #[error("Asset already custodied: {asset}")]
    DuplicateAsset { asset: String },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Asset kind mismatch for {asset}")]
    KindMismatch { asset: String },

    #[error("Ledger is paused")]
    Paused,

    #[error("Reentrancy detected")]
    Reentrancy,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),
}

/// Registry-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Reward id already registered: {id}")]
    DuplicateRewardId { id: u64 },

    #[error("Unknown reward id: {id}")]
    UnknownRewardId { id: u64 },
}

/// Campaign-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CampaignError {
    #[error("Campaign id already exists: {id}")]
    DuplicateCampaignId { id: u64 },

    #[error("Unknown reward id in sequence: {id}")]
    UnknownRewardId { id: u64 },

    #[error("Reward sequence must not be empty")]
    EmptyRewardSequence,

    #[error("Claim root already set for campaign {id}")]
    RootAlreadySet { id: u64 },

    #[error("Campaign not found: {id}")]
    CampaignNotFound { id: u64 },

    #[error("Unauthorized: caller may not manage campaigns")]
    Unauthorized,
}

/// Claim-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Campaign not found: {id}")]
    CampaignNotFound { id: u64 },

    #[error("Campaign not ready: no claim root attached")]
    CampaignNotReady,

    #[error("Invalid proof: verification failed")]
    InvalidProof,

    #[error("Index already claimed: {index}")]
    AlreadyClaimed { index: u64 },

    #[error("Reward exhausted: {id}")]
    RewardExhausted { id: u64 },

    #[error("Eligibility gate not met")]
    EligibilityNotMet,

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
