//! Epoch records and their bookkeeping transitions.
//!
//! A record is created by `open`, mutated by every borrow, and finalized once
//! by `settle`. The methods here only touch the record itself; token and
//! external-vault calls are issued by the contract around them.

use soroban_sdk::contracttype;

use crate::error::VaultError;

/// One trading window. Records are never deleted and stay addressable by id.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EpochRecord {
    pub start_time: u64,
    /// 0 while the epoch is active
    pub end_time: u64,
    pub is_epoch_active: bool,
    pub is_settled: bool,
    /// `total_assets` snapshot at start
    pub initial_vault_assets: i128,
    pub initial_external_deposits: i128,
    pub initial_unutilized_asset: i128,
    pub current_external_deposits: i128,
    pub current_unutilized_asset: i128,
    /// Cumulative amount handed to the trader this epoch
    pub funds_borrowed: i128,
    /// Yield (or loss) realized from the external vault this epoch
    pub external_vault_pnl: i128,
    /// PnL reported by the trader at settlement
    pub trading_pnl: i128,
    /// `total_assets` after settlement
    pub final_vault_assets: i128,
}

impl EpochRecord {
    /// Opens a record for `initial_vault_assets`, of which `external_deposits`
    /// were parked in the external vault and the rest stays unutilized.
    pub fn open(
        start_time: u64,
        initial_vault_assets: i128,
        external_deposits: i128,
    ) -> Result<Self, VaultError> {
        if external_deposits < 0 || external_deposits > initial_vault_assets {
            return Err(VaultError::InvalidAmount);
        }
        let unutilized = initial_vault_assets - external_deposits;

        Ok(Self {
            start_time,
            end_time: 0,
            is_epoch_active: true,
            is_settled: false,
            initial_vault_assets,
            initial_external_deposits: external_deposits,
            initial_unutilized_asset: unutilized,
            current_external_deposits: external_deposits,
            current_unutilized_asset: unutilized,
            funds_borrowed: 0,
            external_vault_pnl: 0,
            trading_pnl: 0,
            final_vault_assets: 0,
        })
    }

    /// Draws up to `need` from idle cash and returns what was taken.
    pub fn take_unutilized(&mut self, need: i128) -> i128 {
        let used = need.min(self.current_unutilized_asset).max(0);
        self.current_unutilized_asset -= used;
        used
    }

    /// Books a partial external withdrawal of `assets`.
    ///
    /// Principal is reduced first; anything beyond the recorded principal is
    /// yield the position accrued since the epoch started.
    pub fn book_external_withdrawal(&mut self, assets: i128) -> Result<(), VaultError> {
        let from_principal = assets.min(self.current_external_deposits).max(0);
        let accrued = assets
            .checked_sub(from_principal)
            .ok_or(VaultError::MathOverflow)?;

        self.current_external_deposits -= from_principal;
        self.external_vault_pnl = self
            .external_vault_pnl
            .checked_add(accrued)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// Books a full redemption of the external position for `proceeds`.
    pub fn book_external_redemption(&mut self, proceeds: i128) -> Result<(), VaultError> {
        let delta = proceeds
            .checked_sub(self.current_external_deposits)
            .ok_or(VaultError::MathOverflow)?;

        self.external_vault_pnl = self
            .external_vault_pnl
            .checked_add(delta)
            .ok_or(VaultError::MathOverflow)?;
        self.current_external_deposits = 0;
        Ok(())
    }

    pub fn record_borrow(&mut self, amount: i128) -> Result<(), VaultError> {
        self.funds_borrowed = self
            .funds_borrowed
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// Capital is idle, externally parked, or with the trader. Realized
    /// external yield is the only way the pools can outgrow the snapshot.
    pub fn is_conserved(&self) -> bool {
        let held = self
            .current_external_deposits
            .checked_add(self.current_unutilized_asset)
            .and_then(|sum| sum.checked_add(self.funds_borrowed));
        let expected = self
            .initial_vault_assets
            .checked_add(self.external_vault_pnl);

        match (held, expected) {
            (Some(held), Some(expected)) => held == expected,
            _ => false,
        }
    }

    pub fn has_ended(&self, now: u64, duration: u64) -> bool {
        now >= self.start_time.saturating_add(duration)
    }

    /// Rejects a loss larger than what was lent.
    pub fn validate_pnl(&self, pnl: i128) -> Result<(), VaultError> {
        if pnl < 0 {
            let loss = pnl.checked_neg().ok_or(VaultError::MathOverflow)?;
            if loss > self.funds_borrowed {
                return Err(VaultError::LossExceedsBorrowAmount);
            }
        }
        Ok(())
    }

    /// What the trader owes back: the borrowed capital adjusted by `pnl`.
    pub fn amount_due(&self, pnl: i128) -> Result<i128, VaultError> {
        self.validate_pnl(pnl)?;
        self.funds_borrowed
            .checked_add(pnl)
            .ok_or(VaultError::MathOverflow)
    }

    /// Finalizes the record and returns the vault's new total assets.
    ///
    /// Fails with `AccountingInvariant` if the result would be negative; the
    /// loss cap makes that unreachable unless the external vault lost more
    /// than the whole vault held.
    pub fn settle(&mut self, now: u64, trading_pnl: i128) -> Result<i128, VaultError> {
        let total_pnl = trading_pnl
            .checked_add(self.external_vault_pnl)
            .ok_or(VaultError::MathOverflow)?;
        let final_assets = self
            .initial_vault_assets
            .checked_add(total_pnl)
            .ok_or(VaultError::MathOverflow)?;
        if final_assets < 0 {
            return Err(VaultError::AccountingInvariant);
        }

        self.trading_pnl = trading_pnl;
        self.final_vault_assets = final_assets;
        self.current_external_deposits = 0;
        self.current_unutilized_asset = 0;
        self.is_settled = true;
        self.is_epoch_active = false;
        self.end_time = now;
        Ok(final_assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_splits_pools() {
        let record = EpochRecord::open(10, 4_000, 3_000).unwrap();
        assert_eq!(record.initial_external_deposits, 3_000);
        assert_eq!(record.initial_unutilized_asset, 1_000);
        assert_eq!(
            record.initial_external_deposits + record.initial_unutilized_asset,
            record.initial_vault_assets
        );
        assert_eq!(record.current_unutilized_asset, 1_000);
        assert!(record.is_epoch_active);
        assert!(!record.is_settled);
        assert_eq!(record.end_time, 0);
        assert!(record.is_conserved());
    }

    #[test]
    fn test_open_rejects_external_above_total() {
        assert_eq!(
            EpochRecord::open(0, 1_000, 1_001),
            Err(VaultError::InvalidAmount)
        );
    }

    #[test]
    fn test_unutilized_consumed_first() {
        let mut record = EpochRecord::open(0, 4_000, 3_000).unwrap();

        let used = record.take_unutilized(600);
        record.record_borrow(used).unwrap();
        assert_eq!(used, 600);
        assert_eq!(record.current_unutilized_asset, 400);
        assert!(record.is_conserved());

        let used = record.take_unutilized(1_000);
        assert_eq!(used, 400);
        assert_eq!(record.current_unutilized_asset, 0);
    }

    #[test]
    fn test_partial_external_withdrawal_keeps_conservation() {
        let mut record = EpochRecord::open(0, 4_000, 3_000).unwrap();
        let used = record.take_unutilized(1_500);
        record.book_external_withdrawal(500).unwrap();
        record.record_borrow(used + 500).unwrap();

        assert_eq!(record.current_external_deposits, 2_500);
        assert_eq!(record.funds_borrowed, 1_500);
        assert_eq!(record.external_vault_pnl, 0);
        assert!(record.is_conserved());
    }

    #[test]
    fn test_withdrawal_beyond_principal_is_booked_as_yield() {
        let mut record = EpochRecord::open(0, 1_000, 1_000).unwrap();
        record.book_external_withdrawal(1_050).unwrap();
        record.record_borrow(1_050).unwrap();

        assert_eq!(record.current_external_deposits, 0);
        assert_eq!(record.external_vault_pnl, 50);
        assert!(record.is_conserved());
    }

    #[test]
    fn test_full_redemption_books_difference() {
        let mut record = EpochRecord::open(0, 4_000, 3_000).unwrap();
        record.book_external_redemption(2_700).unwrap();

        assert_eq!(record.current_external_deposits, 0);
        assert_eq!(record.external_vault_pnl, -300);
    }

    #[test]
    fn test_loss_capped_by_borrowed() {
        let mut record = EpochRecord::open(0, 1_000, 0).unwrap();
        let used = record.take_unutilized(800);
        record.record_borrow(used).unwrap();

        assert_eq!(record.validate_pnl(-800), Ok(()));
        assert_eq!(
            record.validate_pnl(-801),
            Err(VaultError::LossExceedsBorrowAmount)
        );
        assert_eq!(record.amount_due(-300), Ok(500));
        assert_eq!(record.amount_due(200), Ok(1_000));
    }

    #[test]
    fn test_has_ended() {
        let record = EpochRecord::open(100, 1_000, 0).unwrap();
        assert!(!record.has_ended(199, 100));
        assert!(record.has_ended(200, 100));
    }

    #[test]
    fn test_settle_finalizes_record() {
        let mut record = EpochRecord::open(0, 4_000, 0).unwrap();
        let used = record.take_unutilized(4_000);
        record.record_borrow(used).unwrap();

        let final_assets = record.settle(500, -400).unwrap();
        assert_eq!(final_assets, 3_600);
        assert_eq!(record.final_vault_assets, 3_600);
        assert_eq!(record.trading_pnl, -400);
        assert_eq!(record.end_time, 500);
        assert!(record.is_settled);
        assert!(!record.is_epoch_active);
        assert_eq!(record.current_unutilized_asset, 0);
        assert_eq!(record.current_external_deposits, 0);
    }

    #[test]
    fn test_settle_includes_external_pnl() {
        let mut record = EpochRecord::open(0, 4_000, 3_000).unwrap();
        record.book_external_redemption(3_300).unwrap();

        assert_eq!(record.settle(1, 100), Ok(4_400));
    }

    #[test]
    fn test_settle_refuses_negative_assets() {
        let mut record = EpochRecord::open(0, 1_000, 1_000).unwrap();
        record.book_external_redemption(0).unwrap();

        assert_eq!(record.settle(1, -1), Err(VaultError::AccountingInvariant));
        assert!(record.is_epoch_active);
    }
}
