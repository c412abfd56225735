//! Voting delegation for stream receipts. A receipt's voting power is what its
//! holder could withdraw right now; the holder may point it at a delegate, and
//! a delegate's weight is the sum over every stream delegated to it.

use soroban_sdk::{Address, Env, Vec};

use crate::storage;

/// Points `stream_id` at `delegate`, moving it off any previous delegate.
pub fn delegate(env: &Env, stream_id: u64, delegate: &Address) {
    if let Some(previous) = storage::voting_delegate(env, stream_id) {
        if &previous == delegate {
            return;
        }
        index_remove(env, &previous, stream_id);
    }
    index_add(env, delegate, stream_id);
    storage::set_voting_delegate(env, stream_id, Some(delegate));
}

/// Drops any delegation; a new receipt holder starts undelegated.
pub fn clear(env: &Env, stream_id: u64) {
    if let Some(previous) = storage::voting_delegate(env, stream_id) {
        index_remove(env, &previous, stream_id);
        storage::set_voting_delegate(env, stream_id, None);
    }
}

pub fn delegated_streams(env: &Env, delegate: &Address) -> Vec<u64> {
    storage::delegations(env, delegate)
}

fn index_add(env: &Env, delegate: &Address, stream_id: u64) {
    let mut ids = storage::delegations(env, delegate);
    ids.push_back(stream_id);
    storage::set_delegations(env, delegate, &ids);
}

fn index_remove(env: &Env, delegate: &Address, stream_id: u64) {
    let mut ids = storage::delegations(env, delegate);
    if let Some(position) = ids.iter().position(|id| id == stream_id) {
        ids.remove(position as u32);
    }
    storage::set_delegations(env, delegate, &ids);
}
