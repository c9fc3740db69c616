//! Shared security primitives for contract modules
//!
//! Provides reusable guards and access control used by the ledger and
//! campaign modules.

use std::collections::HashSet;

/// Reentrancy guard preventing nested calls into protected functions.
///
/// A ledger operation acquires the guard before calling out to the asset
/// vault collaborator and releases it on every exit path. Any nested call
/// attempt fails.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Returns `false` if already locked (reentrancy attempt).
    pub fn acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Release the guard.
    pub fn release(&mut self) {
        self.locked = false;
    }

    /// Check if currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Composable pause modifier.
///
/// When paused, state-changing operations must be rejected; read queries
/// are unaffected.
#[derive(Debug, Clone, Default)]
pub struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    /// Create a new unpaused guard.
    pub fn new() -> Self {
        Self { paused: false }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Two-tier access control: one admin plus granted operators.
///
/// The admin controls pausing and role grants; campaign creation and root
/// attachment accept either the admin or a granted operator. Callers are
/// identified by opaque principal strings supplied by the identity
/// collaborator.
#[derive(Debug, Clone)]
pub struct AccessControl {
    admin: String,
    operators: HashSet<String>,
}

impl AccessControl {
    /// Create access control with an initial admin.
    pub fn new(admin: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
            operators: HashSet::new(),
        }
    }

    /// Check if a caller is the admin.
    pub fn is_admin(&self, caller: &str) -> bool {
        caller == self.admin
    }

    /// Check if a caller is a granted operator.
    pub fn is_operator(&self, caller: &str) -> bool {
        self.operators.contains(caller)
    }

    /// Check if a caller may perform operator-level operations.
    pub fn is_authorized(&self, caller: &str) -> bool {
        self.is_admin(caller) || self.is_operator(caller)
    }

    /// Grant operator rights. Admin-only; returns `false` when the caller
    /// is not the admin.
    pub fn grant_operator(&mut self, admin_caller: &str, target: impl Into<String>) -> bool {
        if !self.is_admin(admin_caller) {
            return false;
        }
        self.operators.insert(target.into());
        true
    }

    /// Revoke operator rights. Admin-only.
    pub fn revoke_operator(&mut self, admin_caller: &str, target: &str) -> bool {
        if !self.is_admin(admin_caller) {
            return false;
        }
        self.operators.remove(target)
    }

    /// Transfer admin to a new principal.
    pub fn transfer_admin(&mut self, current_admin: &str, new_admin: impl Into<String>) -> bool {
        if !self.is_admin(current_admin) {
            return false;
        }
        self.admin = new_admin.into();
        true
    }

    /// Get the current admin identifier.
    pub fn admin(&self) -> &str {
        &self.admin
    }
}
