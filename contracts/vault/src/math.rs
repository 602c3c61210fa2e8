use crate::error::VaultError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rounding {
    Floor,
    Ceiling,
}

/// Convert assets to shares against the vault's bookkept totals.
///
/// Formula: shares = assets × (total_shares + 1) / (total_assets + 1)
///
/// The virtual share and virtual asset make an empty vault price shares 1:1
/// and keep a donation to an empty vault from skewing the first depositor.
pub fn convert_to_shares(
    assets: i128,
    total_assets: i128,
    total_shares: i128,
    rounding: Rounding,
) -> Result<i128, VaultError> {
    let virtual_shares = total_shares
        .checked_add(1)
        .ok_or(VaultError::MathOverflow)?;
    let virtual_assets = total_assets
        .checked_add(1)
        .ok_or(VaultError::MathOverflow)?;

    mul_div(assets, virtual_shares, virtual_assets, rounding)
}

/// Convert shares to assets.
///
/// Formula: assets = shares × (total_assets + 1) / (total_shares + 1)
pub fn convert_to_assets(
    shares: i128,
    total_assets: i128,
    total_shares: i128,
    rounding: Rounding,
) -> Result<i128, VaultError> {
    let virtual_shares = total_shares
        .checked_add(1)
        .ok_or(VaultError::MathOverflow)?;
    let virtual_assets = total_assets
        .checked_add(1)
        .ok_or(VaultError::MathOverflow)?;

    mul_div(shares, virtual_assets, virtual_shares, rounding)
}

/// Computes (value × numerator) / denominator with configurable rounding.
///
/// All operands are expected non-negative; a negative input is rejected
/// rather than rounded towards zero.
pub fn mul_div(
    value: i128,
    numerator: i128,
    denominator: i128,
    rounding: Rounding,
) -> Result<i128, VaultError> {
    if denominator == 0 {
        return Err(VaultError::DivisionByZero);
    }
    if value < 0 || numerator < 0 || denominator < 0 {
        return Err(VaultError::InvalidAmount);
    }

    let product = value
        .checked_mul(numerator)
        .ok_or(VaultError::MathOverflow)?;

    let result = match rounding {
        Rounding::Floor => product / denominator,
        Rounding::Ceiling => {
            let quotient = product / denominator;
            if product % denominator == 0 {
                quotient
            } else {
                quotient.checked_add(1).ok_or(VaultError::MathOverflow)?
            }
        }
    };

    Ok(result)
}
