//! Arbiter-led disputes. The sender names an arbiter once; the arbiter can
//! freeze the stream and settle it on a basis-point split of what is left.

use soroban_sdk::Address;

use crate::errors::ContractError;
use crate::math::{mul_div_floor, BPS_DENOMINATOR};
use crate::types::Stream;

pub fn assign(stream: &mut Stream, arbiter: &Address) -> Result<(), ContractError> {
    if stream.arbiter.is_some() {
        return Err(ContractError::ArbiterAlreadySet);
    }
    stream.arbiter = Some(arbiter.clone());
    Ok(())
}

pub fn require_arbiter(stream: &Stream, caller: &Address) -> Result<(), ContractError> {
    match &stream.arbiter {
        Some(arbiter) if arbiter == caller => Ok(()),
        _ => Err(ContractError::Unauthorized),
    }
}

pub fn set_frozen(stream: &mut Stream, frozen: bool) -> Result<(), ContractError> {
    match (stream.is_frozen, frozen) {
        (true, true) => Err(ContractError::AlreadyFrozen),
        (false, false) => Err(ContractError::NotFrozen),
        _ => {
            stream.is_frozen = frozen;
            Ok(())
        }
    }
}

pub fn ensure_not_frozen(stream: &Stream) -> Result<(), ContractError> {
    if stream.is_frozen {
        Err(ContractError::StreamFrozen)
    } else {
        Ok(())
    }
}

/// Principal awarded to the receiver out of `remaining`, rounded down.
pub fn receiver_share(remaining: i128, receiver_bps: u32) -> Result<i128, ContractError> {
    if receiver_bps > BPS_DENOMINATOR {
        return Err(ContractError::InvalidSplit);
    }
    Ok(mul_div_floor(
        remaining.max(0),
        receiver_bps as u64,
        BPS_DENOMINATOR as u64,
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_receiver_share_splits_remaining() {
        assert_eq!(receiver_share(1000, 6000), Ok(600));
        assert_eq!(receiver_share(1000, 0), Ok(0));
        assert_eq!(receiver_share(1000, 10_000), Ok(1000));
    }

    #[test]
    fn test_receiver_share_rounds_toward_sender() {
        assert_eq!(receiver_share(999, 5000), Ok(499));
    }

    #[test]
    fn test_receiver_share_rejects_more_than_everything() {
        assert_eq!(receiver_share(1000, 10_001), Err(ContractError::InvalidSplit));
    }
}
