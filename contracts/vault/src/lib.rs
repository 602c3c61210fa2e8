//! # Epoch Vault Contract
//!
//! A capital-allocation vault for Soroban. Depositors pool a single asset and
//! receive proportional shares. During discrete epochs a designated trader
//! borrows the pooled capital, trades it off-chain, and returns it at the end
//! of the epoch together with a profit or loss. Capital the trader has not
//! drawn yet can be parked in an external yield vault for the duration of the
//! epoch.
//!
//! ## Fund Pools
//!
//! While an epoch is active every unit of the opening capital sits in exactly
//! one of three places:
//!
//! - **unutilized**: idle in the vault's own token balance
//! - **external**: deposited in the external yield vault
//! - **borrowed**: with the trader
//!
//! Borrowing always drains unutilized cash before touching the external
//! position.
//!
//! ## Lifecycle
//!
//! ```text
//! deposit / mint ──► [no epoch] ──start_epoch──► [active] ──settle──► [settled]
//!                      ▲                            │ borrow*            │
//!                      └────────── unpause_all ◄────┴────────────────────┘
//! ```
//!
//! - `start_epoch` snapshots `total_assets`, parks what the external vault
//!   accepts, and pauses deposits and withdrawals.
//! - `borrow` hands capital to the trader.
//! - `settle` pulls back borrowed capital adjusted by the trading PnL, redeems
//!   the external position, and rewrites `total_assets` to the epoch's final
//!   value. Withdrawals reopen; deposits stay paused until the admin reopens
//!   them.
//!
//! ## Share Accounting
//!
//! Shares are priced against the bookkept `total_assets`, not the raw token
//! balance, since part of the capital may be parked externally or lent out.
//! Rounding always favors the vault.
//!
//! ## Storage Layout
//!
//! ### Instance Storage
//! - `Asset`, `ExternalVault`: collaborator contracts
//! - `TotalAssets`, `TotalSupply`: share accounting totals
//! - `DepositsPaused`, `WithdrawalsPaused`, `MaxTotalDeposits`, `EpochDuration`
//! - `CurrentEpochId`: 0 before the first epoch
//! - `Locked`: re-entrancy flag
//!
//! ### Persistent Storage
//! - `Balance(holder)`, `Allowance(owner, spender)`: share ledger
//! - `Role(role, account)`: role grants
//! - `Epoch(id)`: epoch records, never deleted
//!
//! # Examples
//!
//! ```ignore
//! vault.deposit(&user, &1_000, &user);
//! vault.start_epoch(&admin);
//! vault.borrow(&trader, &1_000);
//! // ... epoch duration elapses ...
//! vault.settle(&trader, &-100);
//! vault.redeem(&user, &vault.balance_of(&user), &user, &user);
//! ```

#![no_std]

use soroban_sdk::{contract, contractimpl, log, panic_with_error, token, Address, Env};

mod access;
mod constants;
mod epoch;
mod error;
mod events;
mod external;
mod math;
mod shares;
mod storage;

pub use crate::epoch::EpochRecord;
pub use crate::error::VaultError;
pub use crate::events::{
    Deposit, DepositsPausedUpdated, EpochDurationUpdated, EpochEnded, EpochStarted,
    ExternalAllocated, ExternalVaultUpdated, FundsBorrowed, FundsSettled,
    MaxTotalDepositsUpdated, RoleUpdated, SharesTransferred, Withdraw, WithdrawalsPausedUpdated,
};
pub use crate::external::{YieldVaultClient, YieldVaultInterface};
pub use crate::storage::Role;

use crate::access::ReentrancyGuard;
use crate::math::Rounding;

#[contract]
pub struct EpochVault;

#[contractimpl]
impl EpochVault {
    // ==========================================================================
    // INITIALIZATION
    // ==========================================================================

    /// Initializes the vault.
    ///
    /// Must be called exactly once after deployment. Grants `Role::Admin` to
    /// `admin` and `Role::Trader` to `trader`; further grants go through
    /// `grant_role`.
    ///
    /// # Arguments
    /// * `admin` - Account that starts epochs and manages configuration
    /// * `trader` - Account allowed to borrow and settle
    /// * `asset` - Token contract of the pooled asset
    /// * `external_vault` - Optional yield vault for idle capital
    /// * `epoch_duration` - Seconds an epoch must run before it can settle
    /// * `max_total_deposits` - Hard cap on `total_assets`
    ///
    /// # Errors
    /// - `AlreadyInitialized` if called twice
    /// - `InvalidAmount` if `max_total_deposits` is negative
    pub fn initialize(
        env: Env,
        admin: Address,
        trader: Address,
        asset: Address,
        external_vault: Option<Address>,
        epoch_duration: u64,
        max_total_deposits: i128,
    ) -> Result<(), VaultError> {
        if storage::is_initialized(&env) {
            return Err(VaultError::AlreadyInitialized);
        }
        admin.require_auth();
        if max_total_deposits < 0 {
            return Err(VaultError::InvalidAmount);
        }

        storage::set_asset(&env, &asset);
        storage::set_external_vault(&env, &external_vault);
        storage::set_total_assets(&env, 0);
        storage::set_total_supply(&env, 0);
        storage::set_deposits_paused(&env, false);
        storage::set_withdrawals_paused(&env, false);
        storage::set_max_total_deposits(&env, max_total_deposits);
        storage::set_epoch_duration(&env, epoch_duration);
        storage::set_current_epoch_id(&env, 0);
        storage::set_role(&env, Role::Admin, &admin, true);
        storage::set_role(&env, Role::Trader, &trader, true);
        storage::bump_instance(&env);

        events::role_updated(&env, Role::Admin, admin, true);
        events::role_updated(&env, Role::Trader, trader, true);
        Ok(())
    }

    // ==========================================================================
    // EPOCH LIFECYCLE
    // ==========================================================================

    /// Opens a new epoch over the vault's current assets.
    ///
    /// The external vault receives as much of `total_assets` as it will
    /// accept; the remainder stays unutilized. Deposits and withdrawals are
    /// paused until settlement.
    ///
    /// # Returns
    /// The id of the new epoch.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not an admin
    /// - `EpochActive` if the current epoch has not settled
    /// - `NoAvailableFunds` if `total_assets` is zero
    ///
    /// # Events
    /// `ep_start`, `ext_alloc`, `dep_pause`, `wd_pause`
    pub fn start_epoch(env: Env, caller: Address) -> Result<u32, VaultError> {
        access::require_initialized(&env)?;
        access::require_role(&env, &caller, Role::Admin)?;
        let _guard = ReentrancyGuard::enter(&env)?;
        access::require_no_active_epoch(&env)?;

        let total_assets = storage::get_total_assets(&env);
        if total_assets <= 0 {
            return Err(VaultError::NoAvailableFunds);
        }

        let epoch_id = storage::get_current_epoch_id(&env)
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        let now = env.ledger().timestamp();
        let asset = storage::get_asset(&env)?;
        let external_vault = storage::get_external_vault(&env);

        let external_deposits = match &external_vault {
            Some(external_vault) => external::deposit_headroom(&env, external_vault, total_assets),
            None => 0,
        };
        let record = EpochRecord::open(now, total_assets, external_deposits)?;

        storage::set_current_epoch_id(&env, epoch_id);
        storage::set_epoch(&env, epoch_id, &record);
        storage::set_deposits_paused(&env, true);
        storage::set_withdrawals_paused(&env, true);
        storage::bump_instance(&env);

        let external_shares = match external_vault.filter(|_| external_deposits > 0) {
            Some(external_vault) => {
                external::park(&env, &asset, &external_vault, external_deposits)
            }
            None => 0,
        };

        log!(&env, "epoch started", epoch_id, total_assets, external_deposits);
        events::epoch_started(&env, epoch_id, now);
        events::external_allocated(
            &env,
            epoch_id,
            record.initial_external_deposits,
            external_shares,
            record.initial_unutilized_asset,
        );
        events::deposits_paused(&env, true);
        events::withdrawals_paused(&env, true);
        Ok(epoch_id)
    }

    /// Lends `amount` of the epoch's capital to the trader.
    ///
    /// Unutilized cash is used first. Any remainder comes from the external
    /// vault: if the remainder covers the whole external position it is fully
    /// redeemed and the trader receives whatever the redemption realized,
    /// otherwise exactly the remainder is withdrawn.
    ///
    /// # Arguments
    /// * `trader` - Borrowing trader (must authorize, must hold `Role::Trader`)
    /// * `amount` - Requested amount
    ///
    /// # Returns
    /// The amount actually transferred to the trader.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is not positive
    /// - `EpochNotActive` if no epoch is running
    /// - `ExternalVaultSharesZero` if unutilized cash is short and the vault
    ///   holds no external shares to make up the difference
    ///
    /// # Events
    /// `borrowed`
    pub fn borrow(env: Env, trader: Address, amount: i128) -> Result<i128, VaultError> {
        access::require_initialized(&env)?;
        access::require_role(&env, &trader, Role::Trader)?;
        let _guard = ReentrancyGuard::enter(&env)?;
        access::require_positive(amount)?;

        let epoch_id = storage::get_current_epoch_id(&env);
        let mut record = Self::active_epoch(&env)?;

        let utilizing = record.take_unutilized(amount);
        let need = amount - utilizing;
        let mut borrowing = 0;

        if need > 0 {
            let external_vault = storage::get_external_vault(&env);
            let (shares, redeemable) = match &external_vault {
                Some(external_vault) => external::position(&env, external_vault),
                None => (0, 0),
            };
            let external_vault = match external_vault {
                Some(external_vault) if shares > 0 => external_vault,
                _ => return Err(VaultError::ExternalVaultSharesZero),
            };

            if need >= redeemable {
                borrowing = external::redeem(&env, &external_vault, shares);
                record.book_external_redemption(borrowing)?;
            } else {
                external::withdraw(&env, &external_vault, need);
                record.book_external_withdrawal(need)?;
                borrowing = need;
            }
        }

        let total = utilizing
            .checked_add(borrowing)
            .ok_or(VaultError::MathOverflow)?;
        record.record_borrow(total)?;
        debug_assert!(record.is_conserved());
        storage::set_epoch(&env, epoch_id, &record);
        storage::bump_instance(&env);

        if total > 0 {
            let asset = storage::get_asset(&env)?;
            token::Client::new(&env, &asset).transfer(
                &env.current_contract_address(),
                &trader,
                &total,
            );
        }

        events::funds_borrowed(&env, trader, total);
        Ok(total)
    }

    /// Closes the active epoch.
    ///
    /// The trader returns `funds_borrowed + pnl`; the external position is
    /// redeemed in full and its gain or loss booked. `total_assets` becomes
    /// `initial_vault_assets + pnl + external_vault_pnl`.
    ///
    /// # Arguments
    /// * `trader` - Settling trader (must authorize, must hold `Role::Trader`)
    /// * `pnl` - Trading profit (positive) or loss (negative)
    ///
    /// # Returns
    /// The vault's new `total_assets`.
    ///
    /// # Errors
    /// - `EpochNotActive` if no epoch is running
    /// - `EpochNotEnded` if the epoch duration has not elapsed
    /// - `LossExceedsBorrowAmount` if `-pnl` exceeds `funds_borrowed`
    ///
    /// # Panics
    /// With `AccountingInvariant` if the final assets would be negative.
    ///
    /// # Events
    /// `settled`, `wd_pause`, `ep_end`
    pub fn settle(env: Env, trader: Address, pnl: i128) -> Result<i128, VaultError> {
        access::require_initialized(&env)?;
        access::require_role(&env, &trader, Role::Trader)?;
        let _guard = ReentrancyGuard::enter(&env)?;

        let epoch_id = storage::get_current_epoch_id(&env);
        let mut record = Self::active_epoch(&env)?;

        let now = env.ledger().timestamp();
        if !record.has_ended(now, storage::get_epoch_duration(&env)) {
            return Err(VaultError::EpochNotEnded);
        }
        let funds_to_transfer = record.amount_due(pnl)?;
        let borrowed = record.funds_borrowed;

        let proceeds = match storage::get_external_vault(&env) {
            Some(external_vault) => match external::position(&env, &external_vault) {
                (shares, _) if shares > 0 => external::redeem(&env, &external_vault, shares),
                _ => 0,
            },
            None => 0,
        };
        record.book_external_redemption(proceeds)?;

        let final_assets = match record.settle(now, pnl) {
            Ok(final_assets) => final_assets,
            Err(VaultError::AccountingInvariant) => {
                log!(&env, "settlement drives assets negative", epoch_id, pnl);
                panic_with_error!(&env, VaultError::AccountingInvariant)
            }
            Err(err) => return Err(err),
        };

        storage::set_epoch(&env, epoch_id, &record);
        storage::set_total_assets(&env, final_assets);
        storage::set_withdrawals_paused(&env, false);
        storage::bump_instance(&env);

        if funds_to_transfer > 0 {
            let asset = storage::get_asset(&env)?;
            token::Client::new(&env, &asset).transfer(
                &trader,
                &env.current_contract_address(),
                &funds_to_transfer,
            );
        }

        log!(&env, "epoch settled", epoch_id, final_assets);
        events::funds_settled(&env, trader, borrowed, pnl);
        events::withdrawals_paused(&env, false);
        events::epoch_ended(&env, epoch_id, now);
        Ok(final_assets)
    }

    // ==========================================================================
    // DEPOSITOR - DEPOSIT / MINT
    // ==========================================================================

    /// Deposits `assets` from `caller` and mints shares to `receiver`.
    ///
    /// # Returns
    /// Shares minted (floor rounding).
    ///
    /// # Errors
    /// - `DepositsArePaused` while deposits are paused
    /// - `InvalidAmount` if `assets` is not positive or buys no shares
    /// - `MaxDepositExceeded` if `assets` exceeds the remaining capacity
    ///
    /// # Events
    /// `deposit`
    pub fn deposit(
        env: Env,
        caller: Address,
        assets: i128,
        receiver: Address,
    ) -> Result<i128, VaultError> {
        caller.require_auth();
        let asset = storage::get_asset(&env)?;
        let _guard = ReentrancyGuard::enter(&env)?;
        access::require_deposits_open(&env)?;
        access::require_positive(assets)?;

        if assets > Self::deposit_capacity(&env) {
            return Err(VaultError::MaxDepositExceeded);
        }
        let shares = Self::to_shares(&env, assets, Rounding::Floor)?;
        if shares <= 0 {
            return Err(VaultError::InvalidAmount);
        }

        Self::book_deposit(&env, &receiver, assets, shares)?;
        token::Client::new(&env, &asset).transfer(
            &caller,
            &env.current_contract_address(),
            &assets,
        );

        events::deposit(&env, caller, receiver, assets, shares);
        Ok(shares)
    }

    /// Mints exactly `shares` to `receiver`, pulling the required assets from
    /// `caller`.
    ///
    /// # Returns
    /// Assets paid (ceiling rounding).
    ///
    /// # Errors
    /// - `DepositsArePaused` while deposits are paused
    /// - `InvalidAmount` if `shares` is not positive
    /// - `MaxMintExceeded` if the mint would breach the capacity
    pub fn mint(
        env: Env,
        caller: Address,
        shares: i128,
        receiver: Address,
    ) -> Result<i128, VaultError> {
        caller.require_auth();
        let asset = storage::get_asset(&env)?;
        let _guard = ReentrancyGuard::enter(&env)?;
        access::require_deposits_open(&env)?;
        access::require_positive(shares)?;

        if shares > Self::mint_capacity(&env)? {
            return Err(VaultError::MaxMintExceeded);
        }
        let assets = Self::to_assets(&env, shares, Rounding::Ceiling)?;
        if assets > Self::deposit_capacity(&env) {
            return Err(VaultError::MaxMintExceeded);
        }

        Self::book_deposit(&env, &receiver, assets, shares)?;
        token::Client::new(&env, &asset).transfer(
            &caller,
            &env.current_contract_address(),
            &assets,
        );

        events::deposit(&env, caller, receiver, assets, shares);
        Ok(assets)
    }

    // ==========================================================================
    // DEPOSITOR - WITHDRAW / REDEEM
    // ==========================================================================

    /// Withdraws exactly `assets` to `receiver`, burning `owner`'s shares.
    ///
    /// A `caller` other than `owner` spends the share allowance `owner`
    /// granted it.
    ///
    /// # Returns
    /// Shares burned (ceiling rounding).
    ///
    /// # Errors
    /// - `WithdrawalsArePaused` while withdrawals are paused
    /// - `InvalidAmount` if `assets` is not positive
    /// - `MaxWithdrawExceeded` if `assets` exceeds what `owner` can withdraw
    /// - `InsufficientAllowance` if `caller` may not spend enough of `owner`'s shares
    ///
    /// # Events
    /// `withdraw`
    pub fn withdraw(
        env: Env,
        caller: Address,
        assets: i128,
        receiver: Address,
        owner: Address,
    ) -> Result<i128, VaultError> {
        caller.require_auth();
        let asset = storage::get_asset(&env)?;
        let _guard = ReentrancyGuard::enter(&env)?;
        access::require_withdrawals_open(&env)?;
        access::require_positive(assets)?;

        if assets > Self::withdraw_capacity(&env, &owner)? {
            return Err(VaultError::MaxWithdrawExceeded);
        }
        let shares = Self::to_shares(&env, assets, Rounding::Ceiling)?;

        Self::book_withdrawal(&env, &caller, &owner, assets, shares)?;
        token::Client::new(&env, &asset).transfer(
            &env.current_contract_address(),
            &receiver,
            &assets,
        );

        events::withdraw(&env, caller, receiver, owner, assets, shares);
        Ok(shares)
    }

    /// Redeems exactly `shares` of `owner` and sends the assets to `receiver`.
    ///
    /// # Returns
    /// Assets paid out (floor rounding).
    ///
    /// # Errors
    /// - `WithdrawalsArePaused` while withdrawals are paused
    /// - `InvalidAmount` if `shares` is not positive
    /// - `MaxRedeemExceeded` if `shares` exceeds `owner`'s balance
    /// - `InsufficientAllowance` if `caller` may not spend enough of `owner`'s shares
    pub fn redeem(
        env: Env,
        caller: Address,
        shares: i128,
        receiver: Address,
        owner: Address,
    ) -> Result<i128, VaultError> {
        caller.require_auth();
        let asset = storage::get_asset(&env)?;
        let _guard = ReentrancyGuard::enter(&env)?;
        access::require_withdrawals_open(&env)?;
        access::require_positive(shares)?;

        if shares > storage::get_balance(&env, &owner) {
            return Err(VaultError::MaxRedeemExceeded);
        }
        let assets = Self::to_assets(&env, shares, Rounding::Floor)?
            .min(storage::get_total_assets(&env));

        Self::book_withdrawal(&env, &caller, &owner, assets, shares)?;
        if assets > 0 {
            token::Client::new(&env, &asset).transfer(
                &env.current_contract_address(),
                &receiver,
                &assets,
            );
        }

        events::withdraw(&env, caller, receiver, owner, assets, shares);
        Ok(assets)
    }

    // ==========================================================================
    // DEPOSITOR - PREVIEWS AND LIMITS
    // ==========================================================================

    /// Shares `deposit(assets)` would mint now; 0 while deposits are paused.
    pub fn preview_deposit(env: Env, assets: i128) -> Result<i128, VaultError> {
        if storage::deposits_paused(&env) {
            return Ok(0);
        }
        Self::to_shares(&env, assets, Rounding::Floor)
    }

    /// Assets `mint(shares)` would cost now; 0 while deposits are paused.
    pub fn preview_mint(env: Env, shares: i128) -> Result<i128, VaultError> {
        if storage::deposits_paused(&env) {
            return Ok(0);
        }
        Self::to_assets(&env, shares, Rounding::Ceiling)
    }

    /// Shares `withdraw(assets)` would burn now; 0 while withdrawals are paused.
    pub fn preview_withdraw(env: Env, assets: i128) -> Result<i128, VaultError> {
        if storage::withdrawals_paused(&env) {
            return Ok(0);
        }
        Self::to_shares(&env, assets, Rounding::Ceiling)
    }

    /// Assets `redeem(shares)` would pay now; 0 while withdrawals are paused.
    pub fn preview_redeem(env: Env, shares: i128) -> Result<i128, VaultError> {
        if storage::withdrawals_paused(&env) {
            return Ok(0);
        }
        Self::to_assets(&env, shares, Rounding::Floor)
    }

    /// Largest `assets` a `deposit` can currently accept.
    ///
    /// # Arguments
    /// * `_receiver` - Ignored; capacity is vault-wide
    ///
    /// # Returns
    /// Remaining headroom under `max_total_deposits`, or 0 while paused
    pub fn max_deposit(env: Env, _receiver: Address) -> i128 {
        Self::deposit_capacity(&env)
    }

    /// Largest `shares` a `mint` can currently request.
    ///
    /// # Arguments
    /// * `_receiver` - Ignored; capacity is vault-wide
    ///
    /// # Returns
    /// The floor share equivalent of the remaining deposit headroom, or 0
    /// while deposits are paused.
    pub fn max_mint(env: Env, _receiver: Address) -> Result<i128, VaultError> {
        Self::mint_capacity(&env)
    }

    /// Largest `assets` `owner` can currently withdraw.
    ///
    /// # Arguments
    /// * `owner` - Share holder to query
    ///
    /// # Returns
    /// The floor asset value of `owner`'s shares capped at `total_assets`, or
    /// 0 while withdrawals are paused.
    pub fn max_withdraw(env: Env, owner: Address) -> Result<i128, VaultError> {
        Self::withdraw_capacity(&env, &owner)
    }

    /// Largest `shares` `owner` can currently redeem.
    ///
    /// # Returns
    /// `owner`'s share balance, or 0 while withdrawals are paused.
    pub fn max_redeem(env: Env, owner: Address) -> i128 {
        if storage::withdrawals_paused(&env) {
            return 0;
        }
        storage::get_balance(&env, &owner)
    }

    /// Shares `assets` are worth at the current price, rounded down. Unlike
    /// the previews this ignores the pause flags.
    pub fn convert_to_shares(env: Env, assets: i128) -> Result<i128, VaultError> {
        Self::to_shares(&env, assets, Rounding::Floor)
    }

    /// Assets `shares` are worth at the current price, rounded down. Unlike
    /// the previews this ignores the pause flags.
    ///
    /// # Arguments
    /// * `shares` - Share amount to value
    ///
    /// # Returns
    /// The asset value in raw token units
    pub fn convert_to_assets(env: Env, shares: i128) -> Result<i128, VaultError> {
        Self::to_assets(&env, shares, Rounding::Floor)
    }

    // ==========================================================================
    // SHARE TOKEN
    // ==========================================================================

    /// Returns the share balance of `owner`.
    ///
    /// # Arguments
    /// * `owner` - Share holder to query
    ///
    /// # Returns
    /// The balance in shares, or 0 for unknown holders
    pub fn balance_of(env: Env, owner: Address) -> i128 {
        storage::get_balance(&env, &owner)
    }

    /// Returns the sum of all share balances.
    pub fn total_supply(env: Env) -> i128 {
        storage::get_total_supply(&env)
    }

    /// Returns how many of `owner`'s shares `spender` may still spend.
    ///
    /// # Arguments
    /// * `owner` - Share holder who granted the allowance
    /// * `spender` - Account allowed to spend
    ///
    /// # Returns
    /// The remaining allowance, or 0 if none was granted
    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        storage::get_allowance(&env, &owner, &spender)
    }

    /// Sets the amount of `owner`'s shares `spender` may withdraw, redeem or
    /// transfer. Overwrites any previous allowance.
    pub fn approve(
        env: Env,
        owner: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), VaultError> {
        owner.require_auth();
        if amount < 0 {
            return Err(VaultError::InvalidAmount);
        }
        storage::set_allowance(&env, &owner, &spender, amount);
        Ok(())
    }

    /// Moves `amount` shares from `from` to `to`.
    ///
    /// # Arguments
    /// * `from` - Sender (must authorize)
    /// * `to` - Recipient
    /// * `amount` - Shares to move
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is negative
    /// - `InsufficientShares` if `from` holds fewer than `amount` shares
    ///
    /// # Events
    /// `transfer`
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), VaultError> {
        from.require_auth();
        if amount < 0 {
            return Err(VaultError::InvalidAmount);
        }
        shares::move_shares(&env, &from, &to, amount)?;
        events::shares_transferred(&env, from, to, amount);
        Ok(())
    }

    /// Moves `amount` of `from`'s shares to `to`, spending the allowance
    /// `from` granted `spender`.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is negative
    /// - `InsufficientAllowance` if the allowance is short
    /// - `InsufficientShares` if `from` holds fewer than `amount` shares
    ///
    /// # Events
    /// `transfer`
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), VaultError> {
        spender.require_auth();
        if amount < 0 {
            return Err(VaultError::InvalidAmount);
        }
        shares::spend_allowance(&env, &from, &spender, amount)?;
        shares::move_shares(&env, &from, &to, amount)?;
        events::shares_transferred(&env, from, to, amount);
        Ok(())
    }

    // ==========================================================================
    // ADMINISTRATIVE - PAUSE CONTROL
    // ==========================================================================

    /// Sets the deposit gate. Reopening deposits after a settlement is the
    /// admin's call; settlement never does it.
    pub fn set_deposits_paused(env: Env, caller: Address, paused: bool) -> Result<(), VaultError> {
        access::require_role(&env, &caller, Role::Admin)?;
        storage::set_deposits_paused(&env, paused);
        events::deposits_paused(&env, paused);
        Ok(())
    }

    /// Sets the withdrawal gate.
    ///
    /// # Arguments
    /// * `caller` - Admin account (must authorize)
    /// * `paused` - New state of the gate
    ///
    /// # Events
    /// `wd_pause`
    pub fn set_withdrawals_paused(
        env: Env,
        caller: Address,
        paused: bool,
    ) -> Result<(), VaultError> {
        access::require_role(&env, &caller, Role::Admin)?;
        storage::set_withdrawals_paused(&env, paused);
        events::withdrawals_paused(&env, paused);
        Ok(())
    }

    /// Pauses deposits and withdrawals.
    pub fn pause_all(env: Env, caller: Address) -> Result<(), VaultError> {
        access::require_role(&env, &caller, Role::Admin)?;
        storage::set_deposits_paused(&env, true);
        storage::set_withdrawals_paused(&env, true);
        events::deposits_paused(&env, true);
        events::withdrawals_paused(&env, true);
        Ok(())
    }

    /// Reopens deposits and withdrawals.
    ///
    /// # Arguments
    /// * `caller` - Admin account (must authorize)
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not an admin
    /// - `EpochNotActive` while an epoch is running; reopening is only
    ///   possible once the epoch has settled
    pub fn unpause_all(env: Env, caller: Address) -> Result<(), VaultError> {
        access::require_role(&env, &caller, Role::Admin)?;
        if access::epoch_is_active(&env) {
            return Err(VaultError::EpochNotActive);
        }
        storage::set_deposits_paused(&env, false);
        storage::set_withdrawals_paused(&env, false);
        events::deposits_paused(&env, false);
        events::withdrawals_paused(&env, false);
        Ok(())
    }

    // ==========================================================================
    // ADMINISTRATIVE - CONFIGURATION
    // ==========================================================================

    /// Sets the minimum epoch length in seconds.
    ///
    /// # Errors
    /// - `EpochActive` while an epoch is running
    pub fn set_epoch_duration(env: Env, caller: Address, duration: u64) -> Result<(), VaultError> {
        access::require_role(&env, &caller, Role::Admin)?;
        access::require_no_active_epoch(&env)?;
        storage::set_epoch_duration(&env, duration);
        events::epoch_duration_updated(&env, duration);
        Ok(())
    }

    /// Sets the cap on `total_assets`.
    ///
    /// # Errors
    /// - `InvalidAmount` if `max` is below the current `total_assets`
    pub fn set_max_total_deposits(env: Env, caller: Address, max: i128) -> Result<(), VaultError> {
        access::require_role(&env, &caller, Role::Admin)?;
        if max < storage::get_total_assets(&env) {
            return Err(VaultError::InvalidAmount);
        }
        let old_max = storage::get_max_total_deposits(&env);
        storage::set_max_total_deposits(&env, max);
        events::max_total_deposits_updated(&env, old_max, max);
        Ok(())
    }

    /// Replaces (or clears) the external yield vault.
    ///
    /// # Errors
    /// - `EpochActive` while an epoch is running; the previous vault may
    ///   still hold the epoch's capital
    pub fn set_external_vault(
        env: Env,
        caller: Address,
        external_vault: Option<Address>,
    ) -> Result<(), VaultError> {
        access::require_role(&env, &caller, Role::Admin)?;
        access::require_no_active_epoch(&env)?;
        storage::set_external_vault(&env, &external_vault);
        events::external_vault_updated(&env, external_vault);
        Ok(())
    }

    /// Grants `role` to `account`.
    ///
    /// # Arguments
    /// * `caller` - Admin account (must authorize)
    /// * `role` - Role to grant
    /// * `account` - Receiving account
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not an admin
    ///
    /// # Events
    /// `role`
    pub fn grant_role(
        env: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), VaultError> {
        access::require_role(&env, &caller, Role::Admin)?;
        storage::set_role(&env, role, &account, true);
        events::role_updated(&env, role, account, true);
        Ok(())
    }

    /// Revokes `role` from `account`. Revoking a role that was never granted
    /// is a no-op apart from the event.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not an admin
    ///
    /// # Events
    /// `role`
    pub fn revoke_role(
        env: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), VaultError> {
        access::require_role(&env, &caller, Role::Admin)?;
        storage::set_role(&env, role, &account, false);
        events::role_updated(&env, role, account, false);
        Ok(())
    }

    // ==========================================================================
    // READ FUNCTIONS
    // ==========================================================================

    /// Returns the record of epoch `epoch_id`.
    ///
    /// # Errors
    /// - `EpochNotFound` for ids that were never started
    pub fn get_epoch(env: Env, epoch_id: u32) -> Result<EpochRecord, VaultError> {
        storage::get_epoch(&env, epoch_id).ok_or(VaultError::EpochNotFound)
    }

    /// Returns the id of the latest epoch.
    ///
    /// # Returns
    /// The epoch id, or 0 if no epoch has started yet
    pub fn current_epoch_id(env: Env) -> u32 {
        storage::get_current_epoch_id(&env)
    }

    /// Returns true between `start_epoch` and `settle`.
    pub fn is_epoch_active(env: Env) -> bool {
        access::epoch_is_active(&env)
    }

    /// Returns the deposit gate.
    ///
    /// # Returns
    /// `true` if `deposit` and `mint` are currently rejected
    pub fn deposits_paused(env: Env) -> bool {
        storage::deposits_paused(&env)
    }

    /// Returns the withdrawal gate.
    ///
    /// # Returns
    /// `true` if `withdraw` and `redeem` are currently rejected
    pub fn withdrawals_paused(env: Env) -> bool {
        storage::withdrawals_paused(&env)
    }

    /// Returns the cap on `total_assets` in raw token units.
    pub fn max_total_deposits(env: Env) -> i128 {
        storage::get_max_total_deposits(&env)
    }

    /// Returns the minimum epoch length.
    ///
    /// # Returns
    /// Seconds that must elapse after `start_epoch` before `settle` succeeds
    pub fn epoch_duration(env: Env) -> u64 {
        storage::get_epoch_duration(&env)
    }

    /// Bookkept assets, including capital parked externally or lent out.
    pub fn total_assets(env: Env) -> i128 {
        storage::get_total_assets(&env)
    }

    /// Returns the underlying asset token contract.
    ///
    /// # Errors
    /// - `NotInitialized` before `initialize`
    pub fn asset(env: Env) -> Result<Address, VaultError> {
        storage::get_asset(&env)
    }

    /// Returns the configured external yield vault, if any.
    pub fn external_vault(env: Env) -> Option<Address> {
        storage::get_external_vault(&env)
    }

    /// Returns whether `account` holds `role`.
    ///
    /// # Arguments
    /// * `role` - Role to check
    /// * `account` - Account to check
    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        storage::has_role(&env, role, &account)
    }

    /// Returns the contract version.
    pub fn version(_env: Env) -> u32 {
        constants::CONTRACT_VERSION
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

impl EpochVault {
    fn active_epoch(env: &Env) -> Result<EpochRecord, VaultError> {
        storage::get_current_epoch(env)
            .filter(|record| record.is_epoch_active)
            .ok_or(VaultError::EpochNotActive)
    }

    fn to_shares(env: &Env, assets: i128, rounding: Rounding) -> Result<i128, VaultError> {
        math::convert_to_shares(
            assets,
            storage::get_total_assets(env),
            storage::get_total_supply(env),
            rounding,
        )
    }

    fn to_assets(env: &Env, shares: i128, rounding: Rounding) -> Result<i128, VaultError> {
        math::convert_to_assets(
            shares,
            storage::get_total_assets(env),
            storage::get_total_supply(env),
            rounding,
        )
    }

    fn deposit_capacity(env: &Env) -> i128 {
        if storage::deposits_paused(env) {
            return 0;
        }
        let total_assets = storage::get_total_assets(env);
        let max = storage::get_max_total_deposits(env);
        if total_assets >= max {
            return 0;
        }
        max - total_assets
    }

    fn mint_capacity(env: &Env) -> Result<i128, VaultError> {
        match Self::deposit_capacity(env) {
            0 => Ok(0),
            remaining => Self::to_shares(env, remaining, Rounding::Floor),
        }
    }

    fn withdraw_capacity(env: &Env, owner: &Address) -> Result<i128, VaultError> {
        if storage::withdrawals_paused(env) {
            return Ok(0);
        }
        let shares = storage::get_balance(env, owner);
        let assets = Self::to_assets(env, shares, Rounding::Floor)?;
        Ok(assets.min(storage::get_total_assets(env)))
    }

    fn book_deposit(
        env: &Env,
        receiver: &Address,
        assets: i128,
        shares: i128,
    ) -> Result<(), VaultError> {
        let total_assets = storage::get_total_assets(env)
            .checked_add(assets)
            .ok_or(VaultError::MathOverflow)?;
        shares::mint(env, receiver, shares)?;
        storage::set_total_assets(env, total_assets);
        storage::bump_instance(env);
        Ok(())
    }

    fn book_withdrawal(
        env: &Env,
        caller: &Address,
        owner: &Address,
        assets: i128,
        shares: i128,
    ) -> Result<(), VaultError> {
        if caller != owner {
            shares::spend_allowance(env, owner, caller, shares)?;
        }
        shares::burn(env, owner, shares)?;
        let total_assets = storage::get_total_assets(env)
            .checked_sub(assets)
            .ok_or(VaultError::MathOverflow)?;
        storage::set_total_assets(env, total_assets);
        storage::bump_instance(env);
        Ok(())
    }
}

#[cfg(test)]
mod mock_yield_vault;
