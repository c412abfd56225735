use soroban_sdk::contracterror;

/// Every failure the contract can return. Codes are part of the public ABI and
/// must never be renumbered.
#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    StreamNotFound = 3,
    ProposalNotFound = 4,
    ReceiptNotFound = 5,
    Unauthorized = 6,
    NotReceiptOwner = 7,
    InvalidTimeRange = 8,
    InvalidAmount = 9,
    InvalidApprovalThreshold = 10,
    InvalidMilestones = 11,
    InvalidFee = 12,
    InvalidOracleConfig = 13,
    SenderIsReceiver = 14,
    NothingToWithdraw = 15,
    InsufficientLiquidity = 16,
    AddressRestricted = 17,
    OracleStalePrice = 18,
    OracleInvalidPrice = 19,
    PriceOutOfBounds = 20,
    OracleUnavailable = 21,
    FlashLoanInProgress = 22,
    FlashLoanNotRepaid = 23,
    ProposalExpired = 24,
    AlreadyApproved = 25,
    ProposalAlreadyExecuted = 26,
    AlreadyCancelled = 27,
    AlreadyPaused = 28,
    NotPaused = 29,
    StreamCompleted = 30,
    StreamPaused = 31,
    VaultNotApproved = 32,
    VaultFailure = 33,
    StreamIsSoulbound = 34,
    RoleAlreadyGranted = 35,
    RoleNotGranted = 36,
    CannotRevokeLastAdmin = 37,
    ContractPaused = 38,
    ArithmeticOverflow = 39,
    UnsupportedTopUp = 40,
    DepositExceedsLimit = 41,
    AlreadyRestricted = 42,
    NotRestricted = 43,
    SelfTransfer = 44,
    InvalidVersion = 45,
    StreamFrozen = 46,
    ArbiterAlreadySet = 47,
    InvalidSplit = 48,
    StreamEnded = 49,
    AlreadyFrozen = 50,
    NotFrozen = 51,
}

/// Coarse classification of [`ContractError`] for callers that only need to
/// decide how to react.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    AlreadyDone,
    NotFound,
    Unauthorized,
    InvalidInput,
    InsufficientFunds,
    ComplianceRejected,
    OracleUnsafe,
    ConcurrencyRejected,
    Expired,
    Halted,
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        use ContractError::*;
        match self {
            AlreadyInitialized | AlreadyApproved | ProposalAlreadyExecuted | AlreadyCancelled
            | AlreadyPaused | NotPaused | StreamCompleted | RoleAlreadyGranted
            | AlreadyRestricted | NotRestricted | ArbiterAlreadySet | AlreadyFrozen
            | NotFrozen => ErrorKind::AlreadyDone,
            NotInitialized | StreamNotFound | ProposalNotFound | ReceiptNotFound
            | RoleNotGranted => ErrorKind::NotFound,
            Unauthorized | NotReceiptOwner | VaultNotApproved | StreamIsSoulbound
            | CannotRevokeLastAdmin => ErrorKind::Unauthorized,
            InvalidTimeRange | InvalidAmount | InvalidApprovalThreshold | InvalidMilestones
            | InvalidFee | InvalidOracleConfig | SenderIsReceiver | ArithmeticOverflow
            | UnsupportedTopUp | DepositExceedsLimit | SelfTransfer | InvalidVersion
            | InvalidSplit => ErrorKind::InvalidInput,
            NothingToWithdraw | InsufficientLiquidity | VaultFailure => {
                ErrorKind::InsufficientFunds
            }
            AddressRestricted => ErrorKind::ComplianceRejected,
            OracleStalePrice | OracleInvalidPrice | PriceOutOfBounds | OracleUnavailable => {
                ErrorKind::OracleUnsafe
            }
            FlashLoanInProgress | FlashLoanNotRepaid => ErrorKind::ConcurrencyRejected,
            ProposalExpired | StreamEnded => ErrorKind::Expired,
            StreamPaused | ContractPaused | StreamFrozen => ErrorKind::Halted,
        }
    }

    /// Whether retrying the same call later may succeed without any party
    /// changing its inputs.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::OracleUnsafe | ErrorKind::ConcurrencyRejected | ErrorKind::Halted
        )
    }
}
