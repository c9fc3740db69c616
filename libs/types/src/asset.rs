//! Asset reference types
//!
//! An `AssetRef` names one claimable asset inside a collection: the
//! collection address plus a token id, tagged with whether units of it are
//! interchangeable. The custody ledger keys all balances by these refs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether units of an asset are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// Interchangeable units tracked as a count
    Fungible,
    /// A single distinguishable unit (quantity is 0 or 1)
    NonFungible,
}

/// Reference to an asset held in custody.
///
/// `collection` is the external collection address as reported by the asset
/// vault collaborator; `token_id` selects the asset within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub collection: String,
    pub token_id: u64,
    pub kind: AssetKind,
}

impl AssetRef {
    /// Reference a fungible asset.
    pub fn fungible(collection: impl Into<String>, token_id: u64) -> Self {
        Self {
            collection: collection.into(),
            token_id,
            kind: AssetKind::Fungible,
        }
    }

    /// Reference a non-fungible unit.
    pub fn non_fungible(collection: impl Into<String>, token_id: u64) -> Self {
        Self {
            collection: collection.into(),
            token_id,
            kind: AssetKind::NonFungible,
        }
    }

    pub fn is_fungible(&self) -> bool {
        self.kind == AssetKind::Fungible
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.collection, self.token_id)
    }
}
