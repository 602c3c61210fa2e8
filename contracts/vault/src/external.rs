//! Interface of the external yield vault that idle capital is parked in.

use soroban_sdk::{contractclient, token, Address, Env};

use crate::constants::EXTERNAL_APPROVAL_LEDGERS;

/// Share-based yield vault. `from` on `deposit` names the payer, which must
/// have approved the vault to pull `assets` through the asset token.
#[contractclient(name = "YieldVaultClient")]
pub trait YieldVaultInterface {
    fn deposit(env: Env, from: Address, assets: i128, receiver: Address) -> i128;
    fn withdraw(env: Env, assets: i128, receiver: Address, owner: Address) -> i128;
    fn redeem(env: Env, shares: i128, receiver: Address, owner: Address) -> i128;
    fn max_deposit(env: Env, receiver: Address) -> i128;
    fn preview_redeem(env: Env, shares: i128) -> i128;
    fn balance_of(env: Env, owner: Address) -> i128;
}

/// How much of `available` the external vault will take right now.
pub fn deposit_headroom(env: &Env, external_vault: &Address, available: i128) -> i128 {
    let vault = env.current_contract_address();
    let max = YieldVaultClient::new(env, external_vault).max_deposit(&vault);
    available.min(max).max(0)
}

/// Parks `assets` in the external vault and returns the shares received.
pub fn park(env: &Env, asset: &Address, external_vault: &Address, assets: i128) -> i128 {
    let vault = env.current_contract_address();
    let live_until = env.ledger().sequence() + EXTERNAL_APPROVAL_LEDGERS;
    token::Client::new(env, asset).approve(&vault, external_vault, &assets, &live_until);
    YieldVaultClient::new(env, external_vault).deposit(&vault, &assets, &vault)
}

/// Shares the vault holds and what they would redeem for.
pub fn position(env: &Env, external_vault: &Address) -> (i128, i128) {
    let vault = env.current_contract_address();
    let client = YieldVaultClient::new(env, external_vault);
    let shares = client.balance_of(&vault);
    if shares <= 0 {
        return (0, 0);
    }
    (shares, client.preview_redeem(&shares))
}

/// Pulls exactly `assets` back into the vault.
pub fn withdraw(env: &Env, external_vault: &Address, assets: i128) {
    let vault = env.current_contract_address();
    YieldVaultClient::new(env, external_vault).withdraw(&assets, &vault, &vault);
}

/// Redeems `shares` into the vault and returns the realized assets.
pub fn redeem(env: &Env, external_vault: &Address, shares: i128) -> i128 {
    let vault = env.current_contract_address();
    YieldVaultClient::new(env, external_vault).redeem(&shares, &vault, &vault)
}
