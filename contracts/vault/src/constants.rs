/// Contract version reported by `version()`; bumped on every code upgrade.
pub const CONTRACT_VERSION: u32 = 1;

pub const DAY_IN_LEDGERS: u32 = 17_280;

// Instance entries hold the vault configuration and are touched on every call.
pub const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

// Balances, allowances, role grants and epoch records.
pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Ledgers the external vault's allowance stays live after an epoch start.
/// The allowance is consumed within the same invocation.
pub const EXTERNAL_APPROVAL_LEDGERS: u32 = 100;
