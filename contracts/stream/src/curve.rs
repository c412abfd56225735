//! Vesting curves: map elapsed time to the amount unlocked so far.
//!
//! All functions are pure. Results are monotonic in `now`, zero before the
//! cliff, and exactly `total` from `end` onwards so the last withdrawal never
//! leaves rounding dust behind.

use soroban_sdk::Vec;

use crate::errors::ContractError;
use crate::math::mul_div_floor;
use crate::types::{CurveType, Milestone};

pub const MAX_PERCENTAGE: u32 = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Unlock {
    pub amount: i128,
    /// Set when an exponential schedule overflowed and the linear formula was used instead.
    pub degraded: bool,
}

impl Unlock {
    fn exact(amount: i128) -> Self {
        Unlock {
            amount,
            degraded: false,
        }
    }
}

/// `total * elapsed / duration`, rounded down.
pub fn linear(total: i128, elapsed: u64, duration: u64) -> i128 {
    mul_div_floor(total, elapsed, duration)
}

/// `total * elapsed² / duration²`, rounded down. `None` when any intermediate
/// product overflows.
pub fn exponential(total: i128, elapsed: u64, duration: u64) -> Option<i128> {
    let elapsed = elapsed as i128;
    let duration = duration as i128;
    let elapsed_sq = elapsed.checked_mul(elapsed)?;
    let duration_sq = duration.checked_mul(duration)?;
    let numerator = total.checked_mul(elapsed_sq)?;
    Some(numerator / duration_sq)
}

/// Amount unlocked at `now` for a schedule running from `start` to `end`.
///
/// Exponential schedules whose intermediate products overflow degrade to the
/// linear formula instead of failing; `Unlock::degraded` reports when that
/// happened.
pub fn unlocked(curve: CurveType, total: i128, start: u64, cliff: u64, end: u64, now: u64) -> Unlock {
    if total <= 0 || now <= start || now < cliff {
        return Unlock::exact(0);
    }
    if now >= end {
        return Unlock::exact(total);
    }

    let duration = end - start;
    let elapsed = now - start;

    match curve {
        CurveType::Linear => Unlock::exact(linear(total, elapsed, duration)),
        CurveType::Exponential => match exponential(total, elapsed, duration) {
            Some(amount) => Unlock::exact(amount),
            None => Unlock {
                amount: linear(total, elapsed, duration),
                degraded: true,
            },
        },
    }
}

/// Applies milestone caps. Before `end`, the unlocked amount may not exceed the
/// highest percentage among reached milestones (nothing if none is reached).
pub fn apply_milestones(
    unlocked: i128,
    total: i128,
    milestones: &Vec<Milestone>,
    end: u64,
    now: u64,
) -> i128 {
    if milestones.is_empty() || now >= end {
        return unlocked;
    }

    let mut reached: u32 = 0;
    for milestone in milestones.iter() {
        if milestone.timestamp <= now && milestone.percentage > reached {
            reached = milestone.percentage;
        }
    }

    let cap = mul_div_floor(total, reached as u64, MAX_PERCENTAGE as u64);
    unlocked.min(cap)
}

/// Milestones must be strictly ascending in time, inside `[start, end]`, with
/// non-decreasing percentages no larger than 100.
pub fn validate_milestones(
    milestones: &Vec<Milestone>,
    start: u64,
    end: u64,
) -> Result<(), ContractError> {
    let mut previous: Option<Milestone> = None;
    for milestone in milestones.iter() {
        if milestone.timestamp < start
            || milestone.timestamp > end
            || milestone.percentage > MAX_PERCENTAGE
        {
            return Err(ContractError::InvalidMilestones);
        }
        if let Some(prev) = previous {
            if milestone.timestamp <= prev.timestamp || milestone.percentage < prev.percentage {
                return Err(ContractError::InvalidMilestones);
            }
        }
        previous = Some(milestone);
    }
    Ok(())
}
