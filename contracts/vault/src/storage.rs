//! Storage layout and typed accessors.
//!
//! Instance storage holds vault-wide scalars that are read on nearly every
//! call. Persistent storage holds per-account entries (share balances,
//! allowances, role grants) and the epoch arena keyed by dense epoch id.

use soroban_sdk::{contracttype, Address, Env};

use crate::constants::{
    INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};
use crate::epoch::EpochRecord;
use crate::error::VaultError;

/// Roles understood by the access guard.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Starts epochs, manages pause flags, capacity and configuration.
    Admin,
    /// Borrows capital during an epoch and settles it with a PnL.
    Trader,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Underlying asset token contract
    Asset,
    /// Optional external yield vault
    ExternalVault,
    /// Bookkept assets under management
    TotalAssets,
    /// Sum of all share balances
    TotalSupply,
    DepositsPaused,
    WithdrawalsPaused,
    MaxTotalDeposits,
    /// Minimum epoch length in seconds before settlement is allowed
    EpochDuration,
    /// Id of the latest epoch, 0 before the first one starts
    CurrentEpochId,
    /// Re-entrancy flag, set while a guarded call is in flight
    Locked,
    /// Share balance per holder
    Balance(Address),
    /// Share allowance (owner, spender)
    Allowance(Address, Address),
    /// Role grant (role, account)
    Role(Role, Address),
    /// Epoch record arena
    Epoch(u32),
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Asset)
}

pub fn get_asset(env: &Env) -> Result<Address, VaultError> {
    env.storage()
        .instance()
        .get(&DataKey::Asset)
        .ok_or(VaultError::NotInitialized)
}

pub fn set_asset(env: &Env, asset: &Address) {
    env.storage().instance().set(&DataKey::Asset, asset);
}

pub fn get_external_vault(env: &Env) -> Option<Address> {
    env.storage()
        .instance()
        .get::<_, Option<Address>>(&DataKey::ExternalVault)
        .flatten()
}

pub fn set_external_vault(env: &Env, external_vault: &Option<Address>) {
    env.storage()
        .instance()
        .set(&DataKey::ExternalVault, external_vault);
}

pub fn get_total_assets(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalAssets)
        .unwrap_or(0)
}

pub fn set_total_assets(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalAssets, &total);
}

pub fn get_total_supply(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

pub fn set_total_supply(env: &Env, supply: i128) {
    env.storage().instance().set(&DataKey::TotalSupply, &supply);
}

pub fn deposits_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::DepositsPaused)
        .unwrap_or(false)
}

pub fn set_deposits_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::DepositsPaused, &paused);
}

pub fn withdrawals_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::WithdrawalsPaused)
        .unwrap_or(false)
}

pub fn set_withdrawals_paused(env: &Env, paused: bool) {
    env.storage()
        .instance()
        .set(&DataKey::WithdrawalsPaused, &paused);
}

pub fn get_max_total_deposits(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::MaxTotalDeposits)
        .unwrap_or(0)
}

pub fn set_max_total_deposits(env: &Env, max: i128) {
    env.storage().instance().set(&DataKey::MaxTotalDeposits, &max);
}

pub fn get_epoch_duration(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::EpochDuration)
        .unwrap_or(0)
}

pub fn set_epoch_duration(env: &Env, duration: u64) {
    env.storage().instance().set(&DataKey::EpochDuration, &duration);
}

pub fn get_current_epoch_id(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::CurrentEpochId)
        .unwrap_or(0)
}

pub fn set_current_epoch_id(env: &Env, epoch_id: u32) {
    env.storage()
        .instance()
        .set(&DataKey::CurrentEpochId, &epoch_id);
}

pub fn is_locked(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Locked)
        .unwrap_or(false)
}

pub fn set_locked(env: &Env, locked: bool) {
    env.storage().instance().set(&DataKey::Locked, &locked);
}

pub fn get_balance(env: &Env, owner: &Address) -> i128 {
    let key = DataKey::Balance(owner.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            bump_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

pub fn set_balance(env: &Env, owner: &Address, balance: i128) {
    let key = DataKey::Balance(owner.clone());
    env.storage().persistent().set(&key, &balance);
    bump_persistent(env, &key);
}

pub fn get_allowance(env: &Env, owner: &Address, spender: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Allowance(owner.clone(), spender.clone()))
        .unwrap_or(0)
}

pub fn set_allowance(env: &Env, owner: &Address, spender: &Address, amount: i128) {
    let key = DataKey::Allowance(owner.clone(), spender.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Role(role, account.clone()))
        .unwrap_or(false)
}

pub fn set_role(env: &Env, role: Role, account: &Address, granted: bool) {
    let key = DataKey::Role(role, account.clone());
    if granted {
        env.storage().persistent().set(&key, &true);
        bump_persistent(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn get_epoch(env: &Env, epoch_id: u32) -> Option<EpochRecord> {
    let key = DataKey::Epoch(epoch_id);
    let record = env.storage().persistent().get::<_, EpochRecord>(&key);
    if record.is_some() {
        bump_persistent(env, &key);
    }
    record
}

pub fn set_epoch(env: &Env, epoch_id: u32, record: &EpochRecord) {
    let key = DataKey::Epoch(epoch_id);
    env.storage().persistent().set(&key, record);
    bump_persistent(env, &key);
}

/// The record at `current_epoch_id`, if any epoch has ever started.
pub fn get_current_epoch(env: &Env) -> Option<EpochRecord> {
    match get_current_epoch_id(env) {
        0 => None,
        epoch_id => get_epoch(env, epoch_id),
    }
}
