//! Role checks, pause gates and the re-entrancy guard.

use soroban_sdk::{Address, Env};

use crate::error::VaultError;
use crate::storage::{self, Role};

/// Passes only if `caller` holds `role` and authorized this invocation.
pub fn require_role(env: &Env, caller: &Address, role: Role) -> Result<(), VaultError> {
    if !storage::has_role(env, role, caller) {
        return Err(VaultError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

pub fn require_initialized(env: &Env) -> Result<(), VaultError> {
    if !storage::is_initialized(env) {
        return Err(VaultError::NotInitialized);
    }
    Ok(())
}

pub fn require_deposits_open(env: &Env) -> Result<(), VaultError> {
    if storage::deposits_paused(env) {
        return Err(VaultError::DepositsArePaused);
    }
    Ok(())
}

pub fn require_withdrawals_open(env: &Env) -> Result<(), VaultError> {
    if storage::withdrawals_paused(env) {
        return Err(VaultError::WithdrawalsArePaused);
    }
    Ok(())
}

pub fn require_positive(amount: i128) -> Result<(), VaultError> {
    if amount <= 0 {
        return Err(VaultError::InvalidAmount);
    }
    Ok(())
}

/// True if the record at `current_epoch_id` is active.
pub fn epoch_is_active(env: &Env) -> bool {
    storage::get_current_epoch(env)
        .map(|record| record.is_epoch_active)
        .unwrap_or(false)
}

pub fn require_no_active_epoch(env: &Env) -> Result<(), VaultError> {
    if epoch_is_active(env) {
        return Err(VaultError::EpochActive);
    }
    Ok(())
}

/// Held for the duration of a mutating call; the flag clears on drop.
///
/// A failed invocation rolls back its storage writes, so the flag never
/// outlives the call that set it.
pub struct ReentrancyGuard<'a> {
    env: &'a Env,
}

impl<'a> ReentrancyGuard<'a> {
    pub fn enter(env: &'a Env) -> Result<Self, VaultError> {
        if storage::is_locked(env) {
            return Err(VaultError::Reentrancy);
        }
        storage::set_locked(env, true);
        Ok(Self { env })
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        storage::set_locked(self.env, false);
    }
}
