#![cfg(test)]
//! Bare share-based yield vault standing in for the external vault in tests.
//!
//! Its assets are simply its token balance, so yield is simulated by minting
//! the asset to it and losses by `lose`. Shares are priced pro-rata without
//! any virtual offset, which keeps test arithmetic exact.

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env};

#[contracttype]
#[derive(Clone)]
pub enum MockKey {
    Asset,
    Supply,
    Cap,
    Shares(Address),
}

#[contract]
pub struct MockYieldVault;

#[contractimpl]
impl MockYieldVault {
    pub fn init(env: Env, asset: Address) {
        env.storage().instance().set(&MockKey::Asset, &asset);
        env.storage().instance().set(&MockKey::Cap, &i128::MAX);
    }

    /// Caps the assets the vault will hold in total.
    pub fn set_cap(env: Env, cap: i128) {
        env.storage().instance().set(&MockKey::Cap, &cap);
    }

    /// Burns `amount` of the held asset.
    pub fn lose(env: Env, amount: i128) {
        Self::token(&env).burn(&env.current_contract_address(), &amount);
    }

    pub fn total_assets(env: Env) -> i128 {
        Self::token(&env).balance(&env.current_contract_address())
    }

    pub fn deposit(env: Env, from: Address, assets: i128, receiver: Address) -> i128 {
        from.require_auth();
        let me = env.current_contract_address();
        let (total, supply) = Self::totals(&env);
        let shares = if supply == 0 || total == 0 {
            assets
        } else {
            assets * supply / total
        };

        Self::token(&env).transfer_from(&me, &from, &me, &assets);
        Self::set_shares(&env, &receiver, Self::balance_of(env.clone(), receiver.clone()) + shares);
        env.storage().instance().set(&MockKey::Supply, &(supply + shares));
        shares
    }

    pub fn withdraw(env: Env, assets: i128, receiver: Address, owner: Address) -> i128 {
        owner.require_auth();
        let (total, supply) = Self::totals(&env);
        let shares = (assets * supply + total - 1) / total;
        Self::burn(&env, &owner, shares, supply);
        Self::token(&env).transfer(&env.current_contract_address(), &receiver, &assets);
        shares
    }

    pub fn redeem(env: Env, shares: i128, receiver: Address, owner: Address) -> i128 {
        owner.require_auth();
        let (total, supply) = Self::totals(&env);
        let assets = shares * total / supply;
        Self::burn(&env, &owner, shares, supply);
        if assets > 0 {
            Self::token(&env).transfer(&env.current_contract_address(), &receiver, &assets);
        }
        assets
    }

    pub fn max_deposit(env: Env, _receiver: Address) -> i128 {
        let cap: i128 = env.storage().instance().get(&MockKey::Cap).unwrap_or(i128::MAX);
        let (total, _) = Self::totals(&env);
        (cap - total).max(0)
    }

    pub fn preview_redeem(env: Env, shares: i128) -> i128 {
        let (total, supply) = Self::totals(&env);
        if supply == 0 {
            return 0;
        }
        shares * total / supply
    }

    pub fn balance_of(env: Env, owner: Address) -> i128 {
        env.storage()
            .instance()
            .get(&MockKey::Shares(owner))
            .unwrap_or(0)
    }
}

impl MockYieldVault {
    fn token(env: &Env) -> token::Client<'_> {
        let asset: Address = env.storage().instance().get(&MockKey::Asset).unwrap();
        token::Client::new(env, &asset)
    }

    fn totals(env: &Env) -> (i128, i128) {
        let total = Self::token(env).balance(&env.current_contract_address());
        let supply = env.storage().instance().get(&MockKey::Supply).unwrap_or(0);
        (total, supply)
    }

    fn set_shares(env: &Env, owner: &Address, shares: i128) {
        env.storage()
            .instance()
            .set(&MockKey::Shares(owner.clone()), &shares);
    }

    fn burn(env: &Env, owner: &Address, shares: i128, supply: i128) {
        let balance = Self::balance_of(env.clone(), owner.clone());
        assert!(balance >= shares, "insufficient shares");
        Self::set_shares(env, owner, balance - shares);
        env.storage()
            .instance()
            .set(&MockKey::Supply, &(supply - shares));
    }
}
