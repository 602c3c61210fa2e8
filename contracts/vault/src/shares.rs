//! Share ledger: balances, allowances and total supply.

use soroban_sdk::{Address, Env};

use crate::error::VaultError;
use crate::storage;

pub fn mint(env: &Env, to: &Address, shares: i128) -> Result<(), VaultError> {
    let balance = storage::get_balance(env, to)
        .checked_add(shares)
        .ok_or(VaultError::MathOverflow)?;
    let supply = storage::get_total_supply(env)
        .checked_add(shares)
        .ok_or(VaultError::MathOverflow)?;

    storage::set_balance(env, to, balance);
    storage::set_total_supply(env, supply);
    Ok(())
}

pub fn burn(env: &Env, from: &Address, shares: i128) -> Result<(), VaultError> {
    let balance = storage::get_balance(env, from);
    if balance < shares {
        return Err(VaultError::InsufficientShares);
    }
    let supply = storage::get_total_supply(env)
        .checked_sub(shares)
        .ok_or(VaultError::MathOverflow)?;

    storage::set_balance(env, from, balance - shares);
    storage::set_total_supply(env, supply);
    Ok(())
}

pub fn move_shares(env: &Env, from: &Address, to: &Address, shares: i128) -> Result<(), VaultError> {
    let from_balance = storage::get_balance(env, from);
    if from_balance < shares {
        return Err(VaultError::InsufficientShares);
    }
    storage::set_balance(env, from, from_balance - shares);

    let to_balance = storage::get_balance(env, to)
        .checked_add(shares)
        .ok_or(VaultError::MathOverflow)?;
    storage::set_balance(env, to, to_balance);
    Ok(())
}

/// Spends `shares` of the allowance `owner` granted `spender`.
pub fn spend_allowance(
    env: &Env,
    owner: &Address,
    spender: &Address,
    shares: i128,
) -> Result<(), VaultError> {
    let allowance = storage::get_allowance(env, owner, spender);
    if allowance < shares {
        return Err(VaultError::InsufficientAllowance);
    }
    storage::set_allowance(env, owner, spender, allowance - shares);
    Ok(())
}
