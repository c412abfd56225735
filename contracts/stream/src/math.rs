//! Fixed-point helpers. All amounts are non-negative `i128` token units and
//! every division rounds in the protocol's favour.

use crate::errors::ContractError;
use crate::types::{InterestDistribution, InterestStrategy};

pub const BPS_DENOMINATOR: u32 = 10_000;
/// Upper bound for any configurable fee (10%).
pub const MAX_FEE_BPS: u32 = 1_000;

/// `value * num / den`, rounded down. Falls back to a split computation when
/// the direct product overflows, so any `num <= den` is always representable.
pub fn mul_div_floor(value: i128, num: u64, den: u64) -> i128 {
    debug_assert!(value >= 0 && den > 0);
    if let Some(product) = value.checked_mul(num as i128) {
        return product / den as i128;
    }
    let den_i = den as i128;
    let whole = (value / den_i) * num as i128;
    let rem = ((value % den_i) as u128 * num as u128 / den as u128) as i128;
    whole + rem
}

/// `a * b / c` rounded up, for share redemption.
pub fn mul_div_ceil(a: i128, b: i128, c: i128) -> Result<i128, ContractError> {
    if c <= 0 || a < 0 || b < 0 {
        return Err(ContractError::InvalidAmount);
    }
    let product = a.checked_mul(b).ok_or(ContractError::ArithmeticOverflow)?;
    let quotient = product / c;
    if product % c == 0 {
        Ok(quotient)
    } else {
        Ok(quotient + 1)
    }
}

pub fn calculate_fee(amount: i128, fee_bps: u32) -> i128 {
    if fee_bps == 0 || amount <= 0 {
        return 0;
    }
    mul_div_floor(amount, fee_bps as u64, BPS_DENOMINATOR as u64)
}

pub fn split_interest(total_interest: i128, strategy: InterestStrategy) -> InterestDistribution {
    if total_interest <= 0 {
        return InterestDistribution {
            to_sender: 0,
            to_receiver: 0,
            to_protocol: 0,
            total_interest: 0,
        };
    }

    let (to_sender, to_receiver, to_protocol) = match strategy {
        InterestStrategy::ToSender => (total_interest, 0, 0),
        InterestStrategy::ToReceiver => (0, total_interest, 0),
        InterestStrategy::ToProtocol => (0, 0, total_interest),
        InterestStrategy::SenderReceiver => {
            let half = total_interest / 2;
            (total_interest - half, half, 0)
        }
        InterestStrategy::Even => {
            let third = total_interest / 3;
            (total_interest - 2 * third, third, third)
        }
    };

    InterestDistribution {
        to_sender,
        to_receiver,
        to_protocol,
        total_interest,
    }
}
