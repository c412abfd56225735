//! Stream receipts. Each stream has exactly one receipt; whoever holds it
//! collects withdrawals and may cancel. Owners are indexed so wallets can list
//! their positions.

use soroban_sdk::{Address, Env, Vec};

use crate::storage;
use crate::types::{ReceiptMetadata, Stream, StreamReceipt, StreamStatus};

pub fn mint(env: &Env, stream_id: u64, owner: &Address) -> StreamReceipt {
    let receipt = StreamReceipt {
        stream_id,
        owner: owner.clone(),
        minted_at: env.ledger().timestamp(),
    };
    storage::save_receipt(env, &receipt);
    index_add(env, owner, stream_id);
    receipt
}

/// Moves the receipt and the stream's withdrawal rights to `to`. Callers have
/// already checked ownership, soulbound status and compliance.
pub fn reassign(env: &Env, stream: &mut Stream, receipt: &mut StreamReceipt, to: &Address) {
    index_remove(env, &receipt.owner, receipt.stream_id);
    index_add(env, to, receipt.stream_id);

    receipt.owner = to.clone();
    stream.receipt_owner = to.clone();
    storage::save_receipt(env, receipt);
    storage::save_stream(env, stream);
}

/// Live balances behind a receipt. `unlocked` is the schedule's unlocked amount
/// in token units at the time of the call.
pub fn metadata(stream: &Stream, unlocked: i128) -> ReceiptMetadata {
    let (locked_balance, unlocked_balance) = match stream.status {
        StreamStatus::Completed | StreamStatus::Cancelled => (0, 0),
        StreamStatus::Active | StreamStatus::Paused => {
            let unlocked = unlocked.min(stream.total_amount);
            (
                stream.total_amount - unlocked,
                (unlocked - stream.withdrawn_amount).max(0),
            )
        }
    };

    ReceiptMetadata {
        stream_id: stream.stream_id,
        locked_balance,
        unlocked_balance,
        total_amount: stream.total_amount,
        token: stream.token.clone(),
    }
}

pub fn owned_by(env: &Env, owner: &Address) -> Vec<u64> {
    storage::owner_receipts(env, owner)
}

fn index_add(env: &Env, owner: &Address, stream_id: u64) {
    let mut ids = storage::owner_receipts(env, owner);
    ids.push_back(stream_id);
    storage::set_owner_receipts(env, owner, &ids);
}

fn index_remove(env: &Env, owner: &Address, stream_id: u64) {
    let mut ids = storage::owner_receipts(env, owner);
    if let Some(position) = ids.iter().position(|id| id == stream_id) {
        ids.remove(position as u32);
    }
    storage::set_owner_receipts(env, owner, &ids);
}
