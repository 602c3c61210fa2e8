use soroban_sdk::contracterror;

/// Caller-visible failure conditions.
///
/// Codes are stable: clients and indexers match on the numeric value, so new
/// variants are only ever appended.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    /// `initialize` was called on a vault that already has an admin.
    AlreadyInitialized = 1,
    /// Vault configuration is missing; `initialize` has not run.
    NotInitialized = 2,
    /// Caller does not hold the role required by the operation.
    Unauthorized = 3,
    /// Zero or negative amount, or a capacity below current assets.
    InvalidAmount = 4,
    /// An epoch is active and the operation requires none to be.
    EpochActive = 5,
    /// The operation requires an active epoch.
    EpochNotActive = 6,
    /// Settlement attempted before the epoch duration elapsed.
    EpochNotEnded = 7,
    /// No epoch record exists for the requested id.
    EpochNotFound = 8,
    /// An epoch cannot start with zero assets under management.
    NoAvailableFunds = 9,
    /// Borrow needs external capital but the vault holds no external shares.
    ExternalVaultSharesZero = 10,
    /// Reported loss is larger than the amount lent to the trader.
    LossExceedsBorrowAmount = 11,
    DepositsArePaused = 12,
    WithdrawalsArePaused = 13,
    MaxDepositExceeded = 14,
    MaxMintExceeded = 15,
    MaxWithdrawExceeded = 16,
    MaxRedeemExceeded = 17,
    InsufficientShares = 18,
    InsufficientAllowance = 19,
    /// A guarded entry point was entered while another was in flight.
    Reentrancy = 20,
    MathOverflow = 21,
    DivisionByZero = 22,
    /// Settlement would leave the vault with negative assets.
    AccountingInvariant = 23,
}
