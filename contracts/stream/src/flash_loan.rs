use soroban_sdk::{contractclient, token, Address, Bytes, Env};

use crate::errors::ContractError;
use crate::math::calculate_fee;
use crate::storage;

pub const DEFAULT_FLASH_LOAN_FEE_BPS: u32 = 9;

/// Implemented by contracts that borrow from the pool. `exec_op` receives the
/// loan and must send `amount + fee` back to the lender before returning.
#[allow(dead_code)]
#[contractclient(name = "FlashLoanReceiverClient")]
pub trait FlashLoanReceiver {
    fn exec_op(
        env: Env,
        initiator: Address,
        token: Address,
        amount: i128,
        fee: i128,
        params: Bytes,
    ) -> bool;
}

/// Fails while a flash loan is in flight. Checked by every fund-moving entrypoint.
pub fn ensure_unlocked(env: &Env) -> Result<(), ContractError> {
    if storage::is_flash_loan_locked(env) {
        return Err(ContractError::FlashLoanInProgress);
    }
    Ok(())
}

/// Lends `amount` of the pool's `token` balance to `receiver` for the duration
/// of its callback and returns the fee collected.
///
/// The lock is held across the callback. Any shortfall after the callback
/// aborts the whole invocation, so no partial loan is ever observable.
pub fn execute(
    env: &Env,
    initiator: &Address,
    receiver: &Address,
    token: &Address,
    amount: i128,
    params: &Bytes,
    fee_bps: u32,
) -> Result<i128, ContractError> {
    ensure_unlocked(env)?;
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let token_client = token::Client::new(env, token);
    let pool = env.current_contract_address();
    let balance_before = token_client.balance(&pool);
    if amount > balance_before {
        return Err(ContractError::InsufficientLiquidity);
    }
    let fee = calculate_fee(amount, fee_bps);

    storage::set_flash_loan_lock(env, true);
    let outcome = lend(
        env,
        &token_client,
        initiator,
        receiver,
        token,
        amount,
        fee,
        params,
        balance_before,
    );
    storage::set_flash_loan_lock(env, false);

    outcome.map(|_| fee)
}

#[allow(clippy::too_many_arguments)]
fn lend(
    env: &Env,
    token_client: &token::Client,
    initiator: &Address,
    receiver: &Address,
    token: &Address,
    amount: i128,
    fee: i128,
    params: &Bytes,
    balance_before: i128,
) -> Result<(), ContractError> {
    let pool = env.current_contract_address();
    token_client.transfer(&pool, receiver, &amount);

    let accepted = match FlashLoanReceiverClient::new(env, receiver)
        .try_exec_op(initiator, token, &amount, &fee, params)
    {
        Ok(Ok(accepted)) => accepted,
        _ => false,
    };

    let required = balance_before
        .checked_add(fee)
        .ok_or(ContractError::ArithmeticOverflow)?;
    if !accepted || token_client.balance(&pool) < required {
        return Err(ContractError::FlashLoanNotRepaid);
    }
    Ok(())
}
