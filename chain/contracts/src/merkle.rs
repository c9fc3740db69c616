//! Leaf encoding and Merkle proof verification
//!
//! The claim commitment is built off-core over `(identity, index)` pairs;
//! this module only verifies membership against an attached root.
//!
//! Leaf encoding: `SHA-256(identity_uuid_bytes || index_be_bytes)` (16 + 8
//! bytes). Sibling pairs are sorted before hashing at every level, so the
//! verifier never needs left/right position flags. The convention must
//! match the off-core tree builder exactly.

use sha2::{Digest, Sha256};
use types::ids::AccountId;

/// Compute a SHA-256 hash of arbitrary data (utility for tests/proofs).
pub fn compute_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode the claim leaf for `(claimant, index)`.
pub fn leaf_hash(claimant: AccountId, index: u64) -> [u8; 32] {
    let mut data = [0u8; 24];
    data[..16].copy_from_slice(claimant.as_bytes());
    data[16..].copy_from_slice(&index.to_be_bytes());
    compute_hash(&data)
}

/// Hash a sibling pair in sorted order.
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut data = [0u8; 64];
    if a <= b {
        data[..32].copy_from_slice(a);
        data[32..].copy_from_slice(b);
    } else {
        data[..32].copy_from_slice(b);
        data[32..].copy_from_slice(a);
    }
    compute_hash(&data)
}

/// Verify a Merkle inclusion proof against a committed root.
///
/// Folds the leaf upward through the sibling path using sorted-pair
/// hashing and compares the result to `root`.
pub fn verify_proof(leaf: [u8; 32], proof: &[[u8; 32]], root: [u8; 32]) -> bool {
    let mut computed = leaf;
    for sibling in proof {
        computed = hash_pair(&computed, sibling);
    }
    computed == root
}
