use soroban_sdk::{contractclient, Env};

use crate::errors::ContractError;
use crate::types::UsdPegConfig;

/// Prices and USD amounts carry 7 decimals.
pub const PRICE_SCALE: i128 = 10_000_000;

/// External price feed. Returns the token price in USD and the ledger
/// timestamp at which it was observed.
#[allow(dead_code)]
#[contractclient(name = "PriceOracleClient")]
pub trait PriceOracle {
    fn price(env: Env) -> (i128, u64);
}

pub fn validate_config(config: &UsdPegConfig) -> Result<(), ContractError> {
    if config.usd_amount <= 0
        || config.min_price <= 0
        || config.max_price < config.min_price
        || config.max_staleness == 0
    {
        return Err(ContractError::InvalidOracleConfig);
    }
    Ok(())
}

/// Fetches a price and refuses it unless it is positive, no older than
/// `max_staleness`, and inside `[min_price, max_price]`.
pub fn fetch_price(env: &Env, config: &UsdPegConfig) -> Result<i128, ContractError> {
    let client = PriceOracleClient::new(env, &config.oracle);
    let (price, observed_at) = match client.try_price() {
        Ok(Ok(reading)) => reading,
        _ => return Err(ContractError::OracleUnavailable),
    };

    if price <= 0 {
        return Err(ContractError::OracleInvalidPrice);
    }

    let now = env.ledger().timestamp();
    if now.saturating_sub(observed_at) > config.max_staleness {
        return Err(ContractError::OracleStalePrice);
    }

    if price < config.min_price || price > config.max_price {
        return Err(ContractError::PriceOutOfBounds);
    }

    Ok(price)
}

/// Token units worth `usd_amount` at `price`, rounded down.
pub fn usd_to_tokens(usd_amount: i128, price: i128) -> Result<i128, ContractError> {
    if price <= 0 {
        return Err(ContractError::OracleInvalidPrice);
    }
    let numerator = usd_amount
        .checked_mul(PRICE_SCALE)
        .ok_or(ContractError::ArithmeticOverflow)?;
    Ok(numerator / price)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_usd_to_tokens() {
        // $500 at $0.50 per token is 1000 tokens.
        assert_eq!(usd_to_tokens(500 * PRICE_SCALE, PRICE_SCALE / 2), Ok(1000 * PRICE_SCALE));
        // $100 at $2.00 is 50 tokens.
        assert_eq!(usd_to_tokens(100 * PRICE_SCALE, 2 * PRICE_SCALE), Ok(50 * PRICE_SCALE));
        assert_eq!(usd_to_tokens(1, 0), Err(ContractError::OracleInvalidPrice));
        assert_eq!(
            usd_to_tokens(i128::MAX, PRICE_SCALE),
            Err(ContractError::ArithmeticOverflow)
        );
    }
}
