//! Event payloads and their publishers.
//!
//! Every event is published under a single short symbol topic. Events are for
//! off-chain observers only; nothing in the contract reads them back.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::storage::Role;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EpochStarted {
    pub epoch_id: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EpochEnded {
    pub epoch_id: u32,
    pub timestamp: u64,
}

/// How the epoch's opening capital was split between the two pools.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalAllocated {
    pub epoch_id: u32,
    pub external_deposits: i128,
    /// Shares the external vault minted for `external_deposits`
    pub external_shares: i128,
    pub unutilized: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsBorrowed {
    pub trader: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsSettled {
    pub trader: Address,
    pub borrowed_amount: i128,
    pub pnl: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositsPausedUpdated {
    pub paused: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalsPausedUpdated {
    pub paused: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EpochDurationUpdated {
    pub duration: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaxTotalDepositsUpdated {
    pub old_max: i128,
    pub new_max: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalVaultUpdated {
    pub external_vault: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleUpdated {
    pub role: Role,
    pub account: Address,
    pub granted: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposit {
    pub caller: Address,
    pub owner: Address,
    pub assets: i128,
    pub shares: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdraw {
    pub caller: Address,
    pub receiver: Address,
    pub owner: Address,
    pub assets: i128,
    pub shares: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SharesTransferred {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
}

pub fn epoch_started(env: &Env, epoch_id: u32, timestamp: u64) {
    env.events().publish(
        (symbol_short!("ep_start"),),
        EpochStarted { epoch_id, timestamp },
    );
}

pub fn epoch_ended(env: &Env, epoch_id: u32, timestamp: u64) {
    env.events().publish(
        (symbol_short!("ep_end"),),
        EpochEnded { epoch_id, timestamp },
    );
}

pub fn external_allocated(
    env: &Env,
    epoch_id: u32,
    external_deposits: i128,
    external_shares: i128,
    unutilized: i128,
) {
    env.events().publish(
        (symbol_short!("ext_alloc"),),
        ExternalAllocated {
            epoch_id,
            external_deposits,
            external_shares,
            unutilized,
        },
    );
}

pub fn funds_borrowed(env: &Env, trader: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("borrowed"),),
        FundsBorrowed { trader, amount },
    );
}

pub fn funds_settled(env: &Env, trader: Address, borrowed_amount: i128, pnl: i128) {
    env.events().publish(
        (symbol_short!("settled"),),
        FundsSettled {
            trader,
            borrowed_amount,
            pnl,
        },
    );
}

pub fn deposits_paused(env: &Env, paused: bool) {
    env.events().publish(
        (symbol_short!("dep_pause"),),
        DepositsPausedUpdated { paused },
    );
}

pub fn withdrawals_paused(env: &Env, paused: bool) {
    env.events().publish(
        (symbol_short!("wd_pause"),),
        WithdrawalsPausedUpdated { paused },
    );
}

pub fn epoch_duration_updated(env: &Env, duration: u64) {
    env.events().publish(
        (symbol_short!("duration"),),
        EpochDurationUpdated { duration },
    );
}

pub fn max_total_deposits_updated(env: &Env, old_max: i128, new_max: i128) {
    env.events().publish(
        (symbol_short!("max_dep"),),
        MaxTotalDepositsUpdated { old_max, new_max },
    );
}

pub fn external_vault_updated(env: &Env, external_vault: Option<Address>) {
    env.events().publish(
        (symbol_short!("ext_vault"),),
        ExternalVaultUpdated { external_vault },
    );
}

pub fn role_updated(env: &Env, role: Role, account: Address, granted: bool) {
    env.events().publish(
        (symbol_short!("role"),),
        RoleUpdated {
            role,
            account,
            granted,
        },
    );
}

pub fn deposit(env: &Env, caller: Address, owner: Address, assets: i128, shares: i128) {
    env.events().publish(
        (symbol_short!("deposit"),),
        Deposit {
            caller,
            owner,
            assets,
            shares,
        },
    );
}

pub fn withdraw(
    env: &Env,
    caller: Address,
    receiver: Address,
    owner: Address,
    assets: i128,
    shares: i128,
) {
    env.events().publish(
        (symbol_short!("withdraw"),),
        Withdraw {
            caller,
            receiver,
            owner,
            assets,
            shares,
        },
    );
}

pub fn shares_transferred(env: &Env, from: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("transfer"),),
        SharesTransferred { from, to, amount },
    );
}
