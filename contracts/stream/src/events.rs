//! Structured event records. Every state transition publishes exactly one
//! record under a `(topic, id)` pair so indexers can follow a stream or
//! proposal without decoding payloads.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env};

use crate::types::{CurveType, InterestDistribution, Role, Stream, StreamProposal};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamCreatedEvent {
    pub stream_id: u64,
    pub sender: Address,
    pub receiver: Address,
    pub token: Address,
    pub total_amount: i128,
    pub start_time: u64,
    pub end_time: u64,
    pub curve: CurveType,
    pub vault: Option<Address>,
    pub usd_pegged: bool,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamWithdrawnEvent {
    pub stream_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub total_withdrawn: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamCancelledEvent {
    pub stream_id: u64,
    pub canceller: Address,
    pub to_receiver: i128,
    pub to_sender: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamPausedEvent {
    pub stream_id: u64,
    pub pauser: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamUnpausedEvent {
    pub stream_id: u64,
    pub unpauser: Address,
    pub paused_duration: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamToppedUpEvent {
    pub stream_id: u64,
    pub amount: i128,
    pub new_total: i128,
    pub new_end_time: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterestPaidEvent {
    pub stream_id: u64,
    pub distribution: InterestDistribution,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalCreatedEvent {
    pub proposal_id: u64,
    pub sender: Address,
    pub receiver: Address,
    pub token: Address,
    pub amount: i128,
    pub required_approvals: u32,
    pub deadline: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalApprovedEvent {
    pub proposal_id: u64,
    pub approver: Address,
    pub approval_count: u32,
    pub required_approvals: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalExecutedEvent {
    pub proposal_id: u64,
    pub stream_id: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiptTransferredEvent {
    pub stream_id: u64,
    pub from: Address,
    pub to: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RestrictionChangedEvent {
    pub address: Address,
    pub restricted: bool,
    pub admin: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultApprovalEvent {
    pub vault: Address,
    pub approved: bool,
    pub admin: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChangedEvent {
    pub role: Role,
    pub address: Address,
    pub granted: bool,
    pub admin: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashLoanEvent {
    pub initiator: Address,
    pub receiver: Address,
    pub token: Address,
    pub amount: i128,
    pub fee: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArbiterAssignedEvent {
    pub stream_id: u64,
    pub arbiter: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamFrozenEvent {
    pub stream_id: u64,
    pub arbiter: Address,
    pub frozen: bool,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisputeResolvedEvent {
    pub stream_id: u64,
    pub arbiter: Address,
    pub receiver_bps: u32,
    pub to_receiver: i128,
    pub to_sender: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClawbackEvent {
    pub stream_id: u64,
    pub officer: Address,
    pub destination: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VotingDelegatedEvent {
    pub stream_id: u64,
    pub owner: Address,
    pub delegate: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpgradedEvent {
    pub admin: Address,
    pub wasm_hash: BytesN<32>,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MigratedEvent {
    pub admin: Address,
    pub from_version: u32,
    pub to_version: u32,
    pub timestamp: u64,
}

pub fn stream_created(env: &Env, stream: &Stream) {
    env.events().publish(
        (symbol_short!("created"), stream.stream_id),
        StreamCreatedEvent {
            stream_id: stream.stream_id,
            sender: stream.sender.clone(),
            receiver: stream.receiver.clone(),
            token: stream.token.clone(),
            total_amount: stream.total_amount,
            start_time: stream.start_time,
            end_time: stream.end_time,
            curve: stream.curve,
            vault: stream.vault.clone(),
            usd_pegged: stream.usd_peg.is_pegged(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn stream_withdrawn(env: &Env, stream: &Stream, owner: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("withdrew"), stream.stream_id),
        StreamWithdrawnEvent {
            stream_id: stream.stream_id,
            owner: owner.clone(),
            amount,
            total_withdrawn: stream.withdrawn_amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn stream_cancelled(
    env: &Env,
    stream_id: u64,
    canceller: &Address,
    to_receiver: i128,
    to_sender: i128,
) {
    env.events().publish(
        (symbol_short!("cancelled"), stream_id),
        StreamCancelledEvent {
            stream_id,
            canceller: canceller.clone(),
            to_receiver,
            to_sender,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn stream_paused(env: &Env, stream_id: u64, pauser: &Address) {
    env.events().publish(
        (symbol_short!("paused"), stream_id),
        StreamPausedEvent {
            stream_id,
            pauser: pauser.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn stream_unpaused(env: &Env, stream_id: u64, unpauser: &Address, paused_duration: u64) {
    env.events().publish(
        (symbol_short!("unpaused"), stream_id),
        StreamUnpausedEvent {
            stream_id,
            unpauser: unpauser.clone(),
            paused_duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn stream_topped_up(env: &Env, stream: &Stream, amount: i128) {
    env.events().publish(
        (symbol_short!("topped_up"), stream.stream_id),
        StreamToppedUpEvent {
            stream_id: stream.stream_id,
            amount,
            new_total: stream.total_amount,
            new_end_time: stream.end_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn interest_paid(env: &Env, stream_id: u64, distribution: &InterestDistribution) {
    env.events().publish(
        (symbol_short!("interest"), stream_id),
        InterestPaidEvent {
            stream_id,
            distribution: distribution.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn proposal_created(env: &Env, proposal: &StreamProposal) {
    env.events().publish(
        (symbol_short!("proposed"), proposal.proposal_id),
        ProposalCreatedEvent {
            proposal_id: proposal.proposal_id,
            sender: proposal.sender.clone(),
            receiver: proposal.params.receiver.clone(),
            token: proposal.params.token.clone(),
            amount: proposal.params.amount,
            required_approvals: proposal.required_approvals,
            deadline: proposal.deadline,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn proposal_approved(env: &Env, proposal: &StreamProposal, approver: &Address) {
    env.events().publish(
        (symbol_short!("approved"), proposal.proposal_id),
        ProposalApprovedEvent {
            proposal_id: proposal.proposal_id,
            approver: approver.clone(),
            approval_count: proposal.approvers.len(),
            required_approvals: proposal.required_approvals,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn proposal_executed(env: &Env, proposal_id: u64, stream_id: u64) {
    env.events().publish(
        (symbol_short!("executed"), proposal_id),
        ProposalExecutedEvent {
            proposal_id,
            stream_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn receipt_transferred(env: &Env, stream_id: u64, from: &Address, to: &Address) {
    env.events().publish(
        (symbol_short!("receipt"), stream_id),
        ReceiptTransferredEvent {
            stream_id,
            from: from.clone(),
            to: to.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn restriction_changed(env: &Env, address: &Address, restricted: bool, admin: &Address) {
    env.events().publish(
        (symbol_short!("restrict"), address.clone()),
        RestrictionChangedEvent {
            address: address.clone(),
            restricted,
            admin: admin.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn vault_approval(env: &Env, vault: &Address, approved: bool, admin: &Address) {
    env.events().publish(
        (symbol_short!("vault"), vault.clone()),
        VaultApprovalEvent {
            vault: vault.clone(),
            approved,
            admin: admin.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn role_changed(env: &Env, role: Role, address: &Address, granted: bool, admin: &Address) {
    env.events().publish(
        (symbol_short!("role"), address.clone()),
        RoleChangedEvent {
            role,
            address: address.clone(),
            granted,
            admin: admin.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn flash_loan(
    env: &Env,
    initiator: &Address,
    receiver: &Address,
    token: &Address,
    amount: i128,
    fee: i128,
) {
    env.events().publish(
        (symbol_short!("flashloan"), receiver.clone()),
        FlashLoanEvent {
            initiator: initiator.clone(),
            receiver: receiver.clone(),
            token: token.clone(),
            amount,
            fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn arbiter_assigned(env: &Env, stream_id: u64, arbiter: &Address) {
    env.events().publish(
        (symbol_short!("arbiter"), stream_id),
        ArbiterAssignedEvent {
            stream_id,
            arbiter: arbiter.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn stream_frozen(env: &Env, stream_id: u64, arbiter: &Address, frozen: bool) {
    env.events().publish(
        (symbol_short!("frozen"), stream_id),
        StreamFrozenEvent {
            stream_id,
            arbiter: arbiter.clone(),
            frozen,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn dispute_resolved(
    env: &Env,
    stream_id: u64,
    arbiter: &Address,
    receiver_bps: u32,
    to_receiver: i128,
    to_sender: i128,
) {
    env.events().publish(
        (symbol_short!("resolved"), stream_id),
        DisputeResolvedEvent {
            stream_id,
            arbiter: arbiter.clone(),
            receiver_bps,
            to_receiver,
            to_sender,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn clawback(env: &Env, stream_id: u64, officer: &Address, destination: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("clawback"), stream_id),
        ClawbackEvent {
            stream_id,
            officer: officer.clone(),
            destination: destination.clone(),
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn voting_delegated(env: &Env, stream_id: u64, owner: &Address, delegate: &Address) {
    env.events().publish(
        (symbol_short!("delegated"), stream_id),
        VotingDelegatedEvent {
            stream_id,
            owner: owner.clone(),
            delegate: delegate.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn upgraded(env: &Env, admin: &Address, wasm_hash: &BytesN<32>) {
    env.events().publish(
        (symbol_short!("upgraded"),),
        UpgradedEvent {
            admin: admin.clone(),
            wasm_hash: wasm_hash.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn migrated(env: &Env, admin: &Address, from_version: u32, to_version: u32) {
    env.events().publish(
        (symbol_short!("migrated"), to_version),
        MigratedEvent {
            admin: admin.clone(),
            from_version,
            to_version,
            timestamp: env.ledger().timestamp(),
        },
    );
}
