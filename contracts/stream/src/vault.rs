//! Yield-vault custody. Every call goes through the Admin-maintained allow-list.

use soroban_sdk::{contractclient, token, Address, Env};

use crate::errors::ContractError;
use crate::math::mul_div_ceil;
use crate::storage;

/// Lending-vault interface compatible with common Soroban money markets.
#[allow(dead_code)]
#[contractclient(name = "VaultClient")]
pub trait YieldVault {
    /// Credits `amount` tokens already transferred in by `from`; returns shares issued.
    fn deposit(env: Env, from: Address, amount: i128) -> i128;

    /// Burns `shares` and sends the underlying tokens to `to`; returns tokens sent.
    fn withdraw(env: Env, to: Address, shares: i128) -> i128;

    /// Current value of `shares` in underlying tokens.
    fn get_value(env: Env, shares: i128) -> i128;
}

pub fn ensure_approved(env: &Env, vault: &Address) -> Result<(), ContractError> {
    if storage::is_vault_approved(env, vault) {
        Ok(())
    } else {
        Err(ContractError::VaultNotApproved)
    }
}

/// Moves `amount` of contract-held `token` into `vault` and returns the shares issued.
pub fn deposit(
    env: &Env,
    vault: &Address,
    token: &Address,
    amount: i128,
) -> Result<i128, ContractError> {
    ensure_approved(env, vault)?;
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let contract = env.current_contract_address();
    token::Client::new(env, token).transfer(&contract, vault, &amount);

    let shares = VaultClient::new(env, vault).deposit(&contract, &amount);
    if shares <= 0 {
        return Err(ContractError::VaultFailure);
    }
    Ok(shares)
}

/// Redeems `shares` back to the contract and returns the tokens received.
pub fn redeem(env: &Env, vault: &Address, shares: i128) -> Result<i128, ContractError> {
    ensure_approved(env, vault)?;
    if shares <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let received = VaultClient::new(env, vault).withdraw(&env.current_contract_address(), &shares);
    if received < 0 {
        return Err(ContractError::VaultFailure);
    }
    Ok(received)
}

pub fn value_of(env: &Env, vault: &Address, shares: i128) -> Result<i128, ContractError> {
    if shares <= 0 {
        return Ok(0);
    }
    ensure_approved(env, vault)?;
    Ok(VaultClient::new(env, vault).get_value(&shares))
}

/// Shares to redeem so that `amount_out` of `total_principal` is released,
/// rounded up in the protocol's favour and never more than `total_shares`.
pub fn shares_for(
    total_shares: i128,
    amount_out: i128,
    total_principal: i128,
) -> Result<i128, ContractError> {
    if total_shares <= 0 || amount_out <= 0 {
        return Ok(0);
    }
    if amount_out >= total_principal {
        return Ok(total_shares);
    }
    let shares = mul_div_ceil(total_shares, amount_out, total_principal)?;
    Ok(shares.min(total_shares))
}

/// Shares out of `held` whose current value in `vault` covers `shortfall`.
pub fn shares_to_cover(
    env: &Env,
    vault: &Address,
    held: i128,
    shortfall: i128,
) -> Result<i128, ContractError> {
    if held <= 0 || shortfall <= 0 {
        return Ok(0);
    }
    let value = value_of(env, vault, held)?;
    cover_from_value(held, value, shortfall)
}

/// Rounded up; the whole position once it is worth no more than `shortfall`.
fn cover_from_value(held: i128, value: i128, shortfall: i128) -> Result<i128, ContractError> {
    if value <= shortfall {
        return Ok(held);
    }
    Ok(mul_div_ceil(held, shortfall, value)?.min(held))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shares_for_is_proportional() {
        assert_eq!(shares_for(1000, 250, 1000), Ok(250));
        assert_eq!(shares_for(900, 500, 1000), Ok(450));
    }

    #[test]
    fn test_shares_for_rounds_up() {
        // 1000 * 1 / 3 = 333.33 -> 334
        assert_eq!(shares_for(1000, 1, 3), Ok(334));
    }

    #[test]
    fn test_shares_for_final_release_takes_everything() {
        assert_eq!(shares_for(977, 400, 400), Ok(977));
        assert_eq!(shares_for(0, 400, 400), Ok(0));
    }

    #[test]
    fn test_cover_from_value_after_loss() {
        // 500 shares worth 450: a 50 token gap needs 500 * 50 / 450 = 55.5 -> 56.
        assert_eq!(cover_from_value(500, 450, 50), Ok(56));
    }

    #[test]
    fn test_cover_from_value_takes_everything_when_short() {
        assert_eq!(cover_from_value(500, 40, 50), Ok(500));
        assert_eq!(cover_from_value(500, 50, 50), Ok(500));
    }
}
