use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::errors::ContractError;
use crate::types::{Config, Role, Stream, StreamProposal, StreamReceipt};

pub const LEDGER_THRESHOLD: u32 = 17_280;
pub const LEDGER_BUMP: u32 = 120_960;

/// Layout version written by `initialize`.
pub const CONTRACT_VERSION: u32 = 1;

/// Namespace for all contract storage keys.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,             // Instance: global settings.
    NextStreamId,       // Instance: auto-incrementing stream counter.
    NextProposalId,     // Instance: auto-incrementing proposal counter.
    FlashLoanLock,      // Instance: set only while a flash loan is in flight.
    Version,            // Instance: storage layout version.
    Stream(u64),        // Persistent.
    Proposal(u64),      // Persistent.
    Receipt(u64),       // Persistent.
    OwnerReceipts(Address),
    RoleMembers(Role),
    Restricted,
    ApprovedVault(Address),
    FlashLoanFees(Address),
    VotingDelegate(u64),
    Delegations(Address),
}

// ---------------------------------------------------------------------------
// Instance storage
// ---------------------------------------------------------------------------

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(LEDGER_THRESHOLD, LEDGER_BUMP);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<Config, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn stream_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::NextStreamId)
        .unwrap_or(0u64)
}

/// Returns the next stream id and advances the counter.
pub fn allocate_stream_id(env: &Env) -> u64 {
    let id = stream_count(env);
    env.storage()
        .instance()
        .set(&DataKey::NextStreamId, &(id + 1));
    id
}

pub fn proposal_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::NextProposalId)
        .unwrap_or(0u64)
}

pub fn allocate_proposal_id(env: &Env) -> u64 {
    let id = proposal_count(env);
    env.storage()
        .instance()
        .set(&DataKey::NextProposalId, &(id + 1));
    id
}

pub fn version(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::Version)
        .unwrap_or(CONTRACT_VERSION)
}

pub fn set_version(env: &Env, version: u32) {
    env.storage().instance().set(&DataKey::Version, &version);
    bump_instance(env);
}

pub fn is_flash_loan_locked(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::FlashLoanLock)
        .unwrap_or(false)
}

pub fn set_flash_loan_lock(env: &Env, locked: bool) {
    if locked {
        env.storage().instance().set(&DataKey::FlashLoanLock, &true);
    } else {
        env.storage().instance().remove(&DataKey::FlashLoanLock);
    }
}

// ---------------------------------------------------------------------------
// Persistent storage
// ---------------------------------------------------------------------------

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, LEDGER_THRESHOLD, LEDGER_BUMP);
}

pub fn load_stream(env: &Env, stream_id: u64) -> Result<Stream, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Stream(stream_id))
        .ok_or(ContractError::StreamNotFound)
}

pub fn save_stream(env: &Env, stream: &Stream) {
    let key = DataKey::Stream(stream.stream_id);
    env.storage().persistent().set(&key, stream);
    bump_persistent(env, &key);
}

pub fn extend_stream_ttl(env: &Env, stream_id: u64) -> Result<(), ContractError> {
    let key = DataKey::Stream(stream_id);
    if !env.storage().persistent().has(&key) {
        return Err(ContractError::StreamNotFound);
    }
    bump_persistent(env, &key);
    let receipt_key = DataKey::Receipt(stream_id);
    if env.storage().persistent().has(&receipt_key) {
        bump_persistent(env, &receipt_key);
    }
    Ok(())
}

pub fn load_proposal(env: &Env, proposal_id: u64) -> Result<StreamProposal, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Proposal(proposal_id))
        .ok_or(ContractError::ProposalNotFound)
}

pub fn save_proposal(env: &Env, proposal: &StreamProposal) {
    let key = DataKey::Proposal(proposal.proposal_id);
    env.storage().persistent().set(&key, proposal);
    bump_persistent(env, &key);
}

pub fn load_receipt(env: &Env, stream_id: u64) -> Result<StreamReceipt, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Receipt(stream_id))
        .ok_or(ContractError::ReceiptNotFound)
}

pub fn save_receipt(env: &Env, receipt: &StreamReceipt) {
    let key = DataKey::Receipt(receipt.stream_id);
    env.storage().persistent().set(&key, receipt);
    bump_persistent(env, &key);
}

pub fn owner_receipts(env: &Env, owner: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerReceipts(owner.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn set_owner_receipts(env: &Env, owner: &Address, ids: &Vec<u64>) {
    let key = DataKey::OwnerReceipts(owner.clone());
    if ids.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, ids);
        bump_persistent(env, &key);
    }
}

pub fn role_members(env: &Env, role: Role) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::RoleMembers(role))
        .unwrap_or(Vec::new(env))
}

pub fn set_role_members(env: &Env, role: Role, members: &Vec<Address>) {
    let key = DataKey::RoleMembers(role);
    env.storage().persistent().set(&key, members);
    bump_persistent(env, &key);
}

pub fn restricted_addresses(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Restricted)
        .unwrap_or(Vec::new(env))
}

pub fn set_restricted_addresses(env: &Env, addresses: &Vec<Address>) {
    env.storage()
        .persistent()
        .set(&DataKey::Restricted, addresses);
    bump_persistent(env, &DataKey::Restricted);
}

pub fn is_vault_approved(env: &Env, vault: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::ApprovedVault(vault.clone()))
        .unwrap_or(false)
}

pub fn set_vault_approved(env: &Env, vault: &Address, approved: bool) {
    let key = DataKey::ApprovedVault(vault.clone());
    if approved {
        env.storage().persistent().set(&key, &true);
        bump_persistent(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn flash_loan_fees(env: &Env, token: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::FlashLoanFees(token.clone()))
        .unwrap_or(0)
}

pub fn set_flash_loan_fees(env: &Env, token: &Address, total: i128) {
    let key = DataKey::FlashLoanFees(token.clone());
    env.storage().persistent().set(&key, &total);
    bump_persistent(env, &key);
}

pub fn voting_delegate(env: &Env, stream_id: u64) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::VotingDelegate(stream_id))
}

pub fn set_voting_delegate(env: &Env, stream_id: u64, delegate: Option<&Address>) {
    let key = DataKey::VotingDelegate(stream_id);
    match delegate {
        Some(delegate) => {
            env.storage().persistent().set(&key, delegate);
            bump_persistent(env, &key);
        }
        None => env.storage().persistent().remove(&key),
    }
}

pub fn delegations(env: &Env, delegate: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::Delegations(delegate.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn set_delegations(env: &Env, delegate: &Address, ids: &Vec<u64>) {
    let key = DataKey::Delegations(delegate.clone());
    if ids.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, ids);
        bump_persistent(env, &key);
    }
}
