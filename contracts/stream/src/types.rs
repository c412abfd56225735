use soroban_sdk::{contracttype, Address, Vec};

// ---------------------------------------------------------------------------
// Configuration & roles
// ---------------------------------------------------------------------------

/// Global configuration for the protocol.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Receives creation fees and the protocol share of vault yield.
    pub treasury: Address,
    pub protocol_fee_bps: u32,
    pub flash_loan_fee_bps: u32,
    /// Emergency switch halting every fund-moving entrypoint.
    pub paused: bool,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Admin = 0,
    Pauser = 1,
    TreasuryManager = 2,
    /// May claw back the funds of any open stream.
    ComplianceOfficer = 3,
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamStatus {
    Active = 0,
    Paused = 1,
    Completed = 2,
    Cancelled = 3,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CurveType {
    Linear = 0,
    Exponential = 1,
}

/// Who receives the yield a vault earns on a stream's principal.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InterestStrategy {
    ToSender = 0,
    ToReceiver = 1,
    ToProtocol = 2,
    /// 50/50, any odd unit goes to the sender.
    SenderReceiver = 3,
    /// Three-way split, remainder to the sender.
    Even = 4,
}

/// Caps the unlocked amount at `percentage` of the total once `timestamp` is reached.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub timestamp: u64,
    pub percentage: u32,
}

/// Oracle-indexed payout. Prices and USD amounts carry 7 decimals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UsdPegConfig {
    pub usd_amount: i128,
    pub min_price: i128,
    pub max_price: i128,
    pub oracle: Address,
    /// Maximum age of a price, in seconds.
    pub max_staleness: u64,
}

/// Whether a stream pays a fixed token amount or a USD target.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UsdPeg {
    Unpegged,
    Pegged(UsdPegConfig),
}

impl UsdPeg {
    pub fn as_config(&self) -> Option<&UsdPegConfig> {
        match self {
            UsdPeg::Unpegged => None,
            UsdPeg::Pegged(config) => Some(config),
        }
    }

    pub fn is_pegged(&self) -> bool {
        matches!(self, UsdPeg::Pegged(_))
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateStreamParams {
    pub receiver: Address,
    pub token: Address,
    /// Gross deposit. For USD-pegged streams this is the most the sender is
    /// willing to pay once the oracle price is applied.
    pub amount: i128,
    pub start_time: u64,
    pub cliff_time: u64,
    pub end_time: u64,
    pub curve: CurveType,
    pub milestones: Vec<Milestone>,
    pub vault: Option<Address>,
    pub interest_strategy: InterestStrategy,
    pub usd_peg: UsdPeg,
    pub is_soulbound: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stream {
    pub stream_id: u64,
    pub sender: Address,
    pub receiver: Address,
    pub token: Address,
    pub total_amount: i128,
    pub withdrawn_amount: i128,
    pub start_time: u64,
    pub cliff_time: u64,
    pub end_time: u64,
    pub curve: CurveType,
    pub milestones: Vec<Milestone>,
    pub status: StreamStatus,
    pub paused_at: Option<u64>,
    pub total_paused_duration: u64,
    pub cancelled_at: Option<u64>,
    pub vault: Option<Address>,
    pub vault_shares: i128,
    /// Principal still custodied by the vault.
    pub vault_principal: i128,
    /// Redeemed surplus held by the contract on behalf of this stream.
    pub vault_yield: i128,
    pub interest_strategy: InterestStrategy,
    pub usd_peg: UsdPeg,
    pub usd_withdrawn: i128,
    /// Current holder of withdrawal and cancellation rights.
    pub receipt_owner: Address,
    pub is_soulbound: bool,
    /// Set once by the sender; may freeze the stream and settle a dispute.
    pub arbiter: Option<Address>,
    pub is_frozen: bool,
}

// ---------------------------------------------------------------------------
// Proposals
// ---------------------------------------------------------------------------

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProposalStatus {
    Pending = 0,
    Executed = 1,
    Expired = 2,
}

/// A stream awaiting M-of-N approval. Funds stay with the sender until execution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamProposal {
    pub proposal_id: u64,
    pub sender: Address,
    pub params: CreateStreamParams,
    /// Identities allowed to approve.
    pub signers: Vec<Address>,
    /// Distinct signers that have approved, in approval order.
    pub approvers: Vec<Address>,
    pub required_approvals: u32,
    pub deadline: u64,
    pub created_at: u64,
    pub executed: bool,
    pub stream_id: Option<u64>,
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamReceipt {
    pub stream_id: u64,
    pub owner: Address,
    pub minted_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiptMetadata {
    pub stream_id: u64,
    pub locked_balance: i128,
    pub unlocked_balance: i128,
    pub total_amount: i128,
    pub token: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterestDistribution {
    pub to_sender: i128,
    pub to_receiver: i128,
    pub to_protocol: i128,
    pub total_interest: i128,
}
