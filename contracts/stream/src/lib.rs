#![no_std]

mod access;
mod curve;
mod dispute;
mod errors;
mod events;
mod flash_loan;
mod math;
mod oracle;
mod receipt;
mod storage;
mod types;
mod vault;
mod voting;

use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token, Address, Bytes, BytesN, Env, Vec,
};

pub use errors::{ContractError, ErrorKind};
pub use flash_loan::{FlashLoanReceiver, FlashLoanReceiverClient};
pub use oracle::{PriceOracle, PriceOracleClient, PRICE_SCALE};
pub use types::{
    Config, CreateStreamParams, CurveType, InterestDistribution, InterestStrategy, Milestone,
    ProposalStatus, ReceiptMetadata, Role, Stream, StreamProposal, StreamReceipt, StreamStatus,
    UsdPeg, UsdPegConfig,
};
pub use vault::{VaultClient, YieldVault};

use math::MAX_FEE_BPS;

/// How a new stream's deposit reaches the contract.
#[derive(Clone, Copy, PartialEq)]
enum Funding {
    /// The sender signs the creating call.
    Direct,
    /// An executed proposal spends the allowance the sender granted up front.
    Allowance,
}

/// Final split of the tokens a stream still holds when it closes.
struct Settlement {
    to_receiver: i128,
    to_sender: i128,
    interest: InterestDistribution,
}

impl Settlement {
    fn principal_only(to_receiver: i128) -> Self {
        Settlement {
            to_receiver,
            to_sender: 0,
            interest: math::split_interest(0, InterestStrategy::ToSender),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal Helpers
// ---------------------------------------------------------------------------

impl TesseraStream {
    /// Loads the config and rejects the call while the protocol is halted or a
    /// flash loan is in flight.
    fn ensure_operational(env: &Env) -> Result<Config, ContractError> {
        let config = storage::get_config(env)?;
        if config.paused {
            return Err(ContractError::ContractPaused);
        }
        flash_loan::ensure_unlocked(env)?;
        Ok(config)
    }

    fn require_open(stream: &Stream) -> Result<(), ContractError> {
        match stream.status {
            StreamStatus::Cancelled => Err(ContractError::AlreadyCancelled),
            StreamStatus::Completed => Err(ContractError::StreamCompleted),
            StreamStatus::Active | StreamStatus::Paused => Ok(()),
        }
    }

    fn validate_stream_params(
        env: &Env,
        sender: &Address,
        params: &CreateStreamParams,
    ) -> Result<(), ContractError> {
        if params.start_time >= params.end_time {
            return Err(ContractError::InvalidTimeRange);
        }
        if params.cliff_time < params.start_time || params.cliff_time > params.end_time {
            return Err(ContractError::InvalidTimeRange);
        }
        if params.amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if sender == &params.receiver {
            return Err(ContractError::SenderIsReceiver);
        }

        access::validate_receiver(env, &params.receiver)?;
        curve::validate_milestones(&params.milestones, params.start_time, params.end_time)?;

        if let Some(vault_address) = &params.vault {
            vault::ensure_approved(env, vault_address)?;
        }
        if let Some(peg) = params.usd_peg.as_config() {
            oracle::validate_config(peg)?;
        }
        Ok(())
    }

    /// Returns `(gross pulled from the sender, protocol fee, stream total)`.
    fn quote_deposit(
        env: &Env,
        config: &Config,
        params: &CreateStreamParams,
    ) -> Result<(i128, i128, i128), ContractError> {
        match params.usd_peg.as_config() {
            Some(peg) => {
                let price = oracle::fetch_price(env, peg)?;
                let deposit = oracle::usd_to_tokens(peg.usd_amount, price)?;
                if deposit <= 0 {
                    return Err(ContractError::InvalidAmount);
                }
                let fee = math::calculate_fee(deposit, config.protocol_fee_bps);
                let gross = deposit
                    .checked_add(fee)
                    .ok_or(ContractError::ArithmeticOverflow)?;
                if gross > params.amount {
                    return Err(ContractError::DepositExceedsLimit);
                }
                Ok((gross, fee, deposit))
            }
            None => {
                let fee = math::calculate_fee(params.amount, config.protocol_fee_bps);
                let total = params.amount - fee;
                if total <= 0 {
                    return Err(ContractError::InvalidAmount);
                }
                Ok((params.amount, fee, total))
            }
        }
    }

    /// Funds, persists and mints the receipt for an already validated stream.
    fn open_stream(
        env: &Env,
        config: &Config,
        sender: &Address,
        params: CreateStreamParams,
        funding: Funding,
    ) -> Result<u64, ContractError> {
        let (gross, fee, total) = Self::quote_deposit(env, config, &params)?;

        let contract = env.current_contract_address();
        let token_client = token::Client::new(env, &params.token);
        match funding {
            Funding::Direct => token_client.transfer(sender, &contract, &gross),
            Funding::Allowance => token_client.transfer_from(&contract, sender, &contract, &gross),
        }
        if fee > 0 {
            token_client.transfer(&contract, &config.treasury, &fee);
        }

        let vault_shares = match &params.vault {
            Some(vault_address) => vault::deposit(env, vault_address, &params.token, total)?,
            None => 0,
        };
        let vault_principal = if params.vault.is_some() { total } else { 0 };

        // Only allocate the id and persist after custody is settled.
        let stream_id = storage::allocate_stream_id(env);
        let stream = Stream {
            stream_id,
            sender: sender.clone(),
            receiver: params.receiver.clone(),
            token: params.token,
            total_amount: total,
            withdrawn_amount: 0,
            start_time: params.start_time,
            cliff_time: params.cliff_time,
            end_time: params.end_time,
            curve: params.curve,
            milestones: params.milestones,
            status: StreamStatus::Active,
            paused_at: None,
            total_paused_duration: 0,
            cancelled_at: None,
            vault: params.vault,
            vault_shares,
            vault_principal,
            vault_yield: 0,
            interest_strategy: params.interest_strategy,
            usd_peg: params.usd_peg,
            usd_withdrawn: 0,
            receipt_owner: params.receiver,
            is_soulbound: params.is_soulbound,
            arbiter: None,
            is_frozen: false,
        };

        storage::save_stream(env, &stream);
        receipt::mint(env, stream_id, &stream.receipt_owner);
        storage::bump_instance(env);
        events::stream_created(env, &stream);

        Ok(stream_id)
    }

    /// Schedule output for `total` at `now`, curve and milestone caps applied.
    fn scheduled(env: &Env, stream: &Stream, total: i128, now: u64) -> i128 {
        let unlock = curve::unlocked(
            stream.curve,
            total,
            stream.start_time,
            stream.cliff_time,
            stream.end_time,
            now,
        );
        if unlock.degraded {
            log!(env, "exponential schedule overflowed, using linear", stream.stream_id);
        }
        curve::apply_milestones(unlock.amount, total, &stream.milestones, stream.end_time, now)
    }

    /// Tokens currently owed to the receipt owner, plus the USD amount they
    /// settle for pegged streams (zero otherwise).
    fn claimable(env: &Env, stream: &Stream, now: u64) -> Result<(i128, i128), ContractError> {
        let remaining = stream.total_amount - stream.withdrawn_amount;
        match stream.usd_peg.as_config() {
            None => {
                let unlocked = Self::scheduled(env, stream, stream.total_amount, now);
                Ok(((unlocked - stream.withdrawn_amount).clamp(0, remaining), 0))
            }
            Some(peg) => {
                let unlocked_usd = Self::scheduled(env, stream, peg.usd_amount, now);
                let usd_due = unlocked_usd - stream.usd_withdrawn;
                if usd_due <= 0 {
                    return Ok((0, 0));
                }
                let price = oracle::fetch_price(env, peg)?;
                let tokens = oracle::usd_to_tokens(usd_due, price)?;
                Ok((tokens.min(remaining), usd_due))
            }
        }
    }

    /// Frees `amount` of principal from the stream's vault into contract custody.
    /// Any excess redeemed is banked as yield. After a vault loss the
    /// proportional redemption falls short, so more shares are redeemed against
    /// the position's current value; the call fails only once every share is
    /// gone and the receiver still cannot be paid.
    fn release_from_vault(
        env: &Env,
        stream: &mut Stream,
        amount: i128,
    ) -> Result<(), ContractError> {
        let Some(vault_address) = stream.vault.clone() else {
            return Ok(());
        };

        let mut shares = vault::shares_for(stream.vault_shares, amount, stream.vault_principal)?;
        let received = if shares > 0 {
            vault::redeem(env, &vault_address, shares)?
        } else {
            0
        };

        let mut available = received
            .checked_add(stream.vault_yield)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if available < amount {
            let held = stream.vault_shares - shares;
            let mut extra = vault::shares_to_cover(env, &vault_address, held, amount - available)?;
            let mut topped_up = if extra > 0 {
                vault::redeem(env, &vault_address, extra)?
            } else {
                0
            };
            if available + topped_up < amount && extra < held {
                // Vault rounding left a gap; take the rest of the position.
                topped_up += vault::redeem(env, &vault_address, held - extra)?;
                extra = held;
            }
            shares += extra;
            available += topped_up;
        }
        if available < amount {
            return Err(ContractError::VaultFailure);
        }

        stream.vault_shares -= shares;
        stream.vault_principal = (stream.vault_principal - amount).max(0);
        stream.vault_yield = available - amount;
        Ok(())
    }

    /// Redeems every remaining share and returns the tokens the contract now
    /// holds for the stream (principal plus or minus yield).
    fn close_custody(env: &Env, stream: &mut Stream, remaining: i128) -> Result<i128, ContractError> {
        let Some(vault_address) = stream.vault.clone() else {
            return Ok(remaining);
        };

        let received = if stream.vault_shares > 0 {
            vault::redeem(env, &vault_address, stream.vault_shares)?
        } else {
            0
        };
        let available = received
            .checked_add(stream.vault_yield)
            .ok_or(ContractError::ArithmeticOverflow)?;

        stream.vault_shares = 0;
        stream.vault_principal = 0;
        stream.vault_yield = 0;
        Ok(available)
    }

    /// Receiver first, then the sender's principal; whatever is left is yield.
    /// Vault losses therefore land on the sender before the receiver.
    fn settle(
        available: i128,
        owed_receiver: i128,
        owed_sender: i128,
        strategy: InterestStrategy,
    ) -> Settlement {
        let to_receiver = owed_receiver.min(available).max(0);
        let to_sender = owed_sender.min(available - to_receiver).max(0);
        let interest = math::split_interest(available - to_receiver - to_sender, strategy);
        Settlement {
            to_receiver,
            to_sender,
            interest,
        }
    }

    fn pay_out(env: &Env, config: &Config, stream: &Stream, settlement: &Settlement) {
        let token_client = token::Client::new(env, &stream.token);
        let contract = env.current_contract_address();

        let to_owner = settlement.to_receiver + settlement.interest.to_receiver;
        if to_owner > 0 {
            token_client.transfer(&contract, &stream.receipt_owner, &to_owner);
        }
        let to_sender = settlement.to_sender + settlement.interest.to_sender;
        if to_sender > 0 {
            token_client.transfer(&contract, &stream.sender, &to_sender);
        }
        if settlement.interest.to_protocol > 0 {
            token_client.transfer(&contract, &config.treasury, &settlement.interest.to_protocol);
        }
        if settlement.interest.total_interest > 0 {
            events::interest_paid(env, stream.stream_id, &settlement.interest);
        }
    }

    fn receipt_metadata(env: &Env, stream: &Stream) -> ReceiptMetadata {
        let unlocked = Self::scheduled(env, stream, stream.total_amount, env.ledger().timestamp());
        receipt::metadata(stream, unlocked)
    }

    /// Marks a stream terminal after an out-of-band settlement.
    fn close_out(stream: &mut Stream, now: u64) {
        if let Some(paused_at) = stream.paused_at.take() {
            stream.total_paused_duration += now.saturating_sub(paused_at);
        }
        stream.status = StreamStatus::Cancelled;
        stream.cancelled_at = Some(now);
        stream.is_frozen = false;
    }

    fn require_pause_rights(env: &Env, stream: &Stream, caller: &Address) -> Result<(), ContractError> {
        if caller == &stream.sender || access::has_role(env, Role::Pauser, caller) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized)
        }
    }
}

// ---------------------------------------------------------------------------
// Contract Implementation
// ---------------------------------------------------------------------------

#[contract]
pub struct TesseraStream;

#[contractimpl]
impl TesseraStream {
    /// Initialise the contract and make `admin` the first holder of every role.
    ///
    /// The treasury starts out as `admin`, the protocol fee at zero and the
    /// flash-loan fee at 9 bps. Can only be called once.
    ///
    /// # Errors
    /// - `AlreadyInitialized` on a second call
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        admin.require_auth();
        if storage::has_config(&env) {
            return Err(ContractError::AlreadyInitialized);
        }

        storage::set_config(
            &env,
            &Config {
                treasury: admin.clone(),
                protocol_fee_bps: 0,
                flash_loan_fee_bps: flash_loan::DEFAULT_FLASH_LOAN_FEE_BPS,
                paused: false,
            },
        );
        storage::set_version(&env, storage::CONTRACT_VERSION);
        for role in [
            Role::Admin,
            Role::Pauser,
            Role::TreasuryManager,
            Role::ComplianceOfficer,
        ] {
            access::add_role_member(&env, role, admin.clone())?;
        }
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<Config, ContractError> {
        storage::get_config(&env)
    }

    // -----------------------------------------------------------------------
    // Roles & compliance
    // -----------------------------------------------------------------------

    /// Grant `role` to `address`. Only an Admin may call this.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not an Admin
    /// - `RoleAlreadyGranted` if `address` already holds the role
    pub fn grant_role(
        env: Env,
        caller: Address,
        role: Role,
        address: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Admin, &caller)?;
        access::add_role_member(&env, role, address.clone())?;
        events::role_changed(&env, role, &address, true, &caller);
        Ok(())
    }

    /// Revoke `role` from `address`. The last Admin cannot be removed.
    pub fn revoke_role(
        env: Env,
        caller: Address,
        role: Role,
        address: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Admin, &caller)?;
        access::remove_role_member(&env, role, &address)?;
        events::role_changed(&env, role, &address, false, &caller);
        Ok(())
    }

    pub fn has_role(env: Env, role: Role, address: Address) -> bool {
        access::has_role(&env, role, &address)
    }

    pub fn get_role_members(env: Env, role: Role) -> Vec<Address> {
        storage::role_members(&env, role)
    }

    /// Add `address` to the restricted set. Restricted addresses cannot be
    /// named as a receiver, receipt recipient or treasury.
    ///
    /// Existing streams are not touched: a restricted receiver keeps what it
    /// already holds but cannot be handed new rights.
    pub fn restrict_address(env: Env, caller: Address, address: Address) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Admin, &caller)?;
        access::restrict(&env, address.clone())?;
        events::restriction_changed(&env, &address, true, &caller);
        Ok(())
    }

    pub fn unrestrict_address(
        env: Env,
        caller: Address,
        address: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Admin, &caller)?;
        access::unrestrict(&env, &address)?;
        events::restriction_changed(&env, &address, false, &caller);
        Ok(())
    }

    pub fn is_restricted(env: Env, address: Address) -> bool {
        access::is_restricted(&env, &address)
    }

    pub fn get_restricted_addresses(env: Env) -> Vec<Address> {
        storage::restricted_addresses(&env)
    }

    /// Allow streams to custody principal in `vault`.
    pub fn approve_vault(env: Env, caller: Address, vault: Address) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Admin, &caller)?;
        storage::set_vault_approved(&env, &vault, true);
        events::vault_approval(&env, &vault, true, &caller);
        Ok(())
    }

    /// Remove `vault` from the allow-list. Streams already holding shares in it
    /// cannot withdraw, cancel or top up until it is approved again.
    pub fn revoke_vault(env: Env, caller: Address, vault: Address) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Admin, &caller)?;
        if !storage::is_vault_approved(&env, &vault) {
            return Err(ContractError::VaultNotApproved);
        }
        storage::set_vault_approved(&env, &vault, false);
        events::vault_approval(&env, &vault, false, &caller);
        Ok(())
    }

    pub fn is_vault_approved(env: Env, vault: Address) -> bool {
        storage::is_vault_approved(&env, &vault)
    }

    // -----------------------------------------------------------------------
    // Protocol settings
    // -----------------------------------------------------------------------

    /// Halt or resume every fund-moving entrypoint. Pauser role only.
    ///
    /// Views, role management and receipt transfers keep working while halted.
    pub fn set_global_pause(env: Env, caller: Address, paused: bool) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Pauser, &caller)?;
        let mut config = storage::get_config(&env)?;
        if config.paused == paused {
            return Err(if paused {
                ContractError::AlreadyPaused
            } else {
                ContractError::NotPaused
            });
        }
        config.paused = paused;
        storage::set_config(&env, &config);
        env.events()
            .publish((symbol_short!("halt"), caller), paused);
        Ok(())
    }

    /// Set the creation fee in basis points (at most 1000).
    pub fn set_protocol_fee(env: Env, caller: Address, fee_bps: u32) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::TreasuryManager, &caller)?;
        if fee_bps > MAX_FEE_BPS {
            return Err(ContractError::InvalidFee);
        }
        let mut config = storage::get_config(&env)?;
        let old_fee = config.protocol_fee_bps;
        config.protocol_fee_bps = fee_bps;
        storage::set_config(&env, &config);
        env.events()
            .publish((symbol_short!("fee"), symbol_short!("protocol")), (old_fee, fee_bps));
        Ok(())
    }

    pub fn set_flash_loan_fee(env: Env, caller: Address, fee_bps: u32) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Admin, &caller)?;
        if fee_bps > MAX_FEE_BPS {
            return Err(ContractError::InvalidFee);
        }
        let mut config = storage::get_config(&env)?;
        let old_fee = config.flash_loan_fee_bps;
        config.flash_loan_fee_bps = fee_bps;
        storage::set_config(&env, &config);
        env.events()
            .publish((symbol_short!("fee"), symbol_short!("flash")), (old_fee, fee_bps));
        Ok(())
    }

    /// Point fee and protocol-yield payouts at `treasury`.
    pub fn set_treasury(env: Env, caller: Address, treasury: Address) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::TreasuryManager, &caller)?;
        access::validate_receiver(&env, &treasury)?;
        let mut config = storage::get_config(&env)?;
        config.treasury = treasury.clone();
        storage::set_config(&env, &config);
        env.events()
            .publish((symbol_short!("treasury"),), treasury);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Stream lifecycle
    // -----------------------------------------------------------------------

    /// Create a stream funded directly by `sender`.
    ///
    /// Pulls `params.amount` from the sender, forwards the protocol fee to the
    /// treasury and keeps the rest as the stream's `total_amount`. If a vault is
    /// set the principal goes straight into it and the returned shares are
    /// recorded on the stream.
    ///
    /// USD-pegged streams are sized by the oracle instead: the deposit is
    /// `usd_amount / price` tokens, the fee is charged on top, and
    /// `params.amount` is only the most the sender will pay.
    ///
    /// # Returns
    /// - `u64`: the new stream id. Ids are sequential from 0.
    ///
    /// # Authorization
    /// - Requires authorization from `sender`
    ///
    /// # Errors
    /// - `ContractPaused`, `FlashLoanInProgress` while the protocol is halted or locked
    /// - `InvalidTimeRange` unless `start < end` and `cliff` lies in `[start, end]`
    /// - `InvalidAmount` for a non-positive amount, or one consumed entirely by the fee
    /// - `SenderIsReceiver`, `AddressRestricted`, `InvalidMilestones`
    /// - `VaultNotApproved` for a vault outside the allow-list
    /// - `InvalidOracleConfig`, any oracle failure, or `DepositExceedsLimit` for pegged streams
    ///
    /// # Events
    /// - `created(stream_id)` with a `StreamCreatedEvent`
    pub fn create_stream(
        env: Env,
        sender: Address,
        params: CreateStreamParams,
    ) -> Result<u64, ContractError> {
        sender.require_auth();
        let config = Self::ensure_operational(&env)?;
        Self::validate_stream_params(&env, &sender, &params)?;
        Self::open_stream(&env, &config, &sender, params, Funding::Direct)
    }

    /// Create several streams under one authorization. Every entry is
    /// validated before any funds move; one bad entry rejects the batch.
    pub fn create_streams(
        env: Env,
        sender: Address,
        streams: Vec<CreateStreamParams>,
    ) -> Result<Vec<u64>, ContractError> {
        sender.require_auth();
        let config = Self::ensure_operational(&env)?;

        for params in streams.iter() {
            Self::validate_stream_params(&env, &sender, &params)?;
        }

        let mut created_ids = Vec::new(&env);
        for params in streams.iter() {
            let stream_id = Self::open_stream(&env, &config, &sender, params, Funding::Direct)?;
            created_ids.push_back(stream_id);
        }
        Ok(created_ids)
    }

    /// Withdraw everything currently unlocked to the receipt owner.
    ///
    /// For pegged streams the unlocked USD amount is converted at a freshly
    /// fetched oracle price; the payout is capped by what the stream still holds.
    ///
    /// The withdrawal that exhausts the stream closes it: all remaining vault
    /// shares are redeemed, unused principal (pegged streams only) goes back to
    /// the sender and any yield is split by the stream's interest strategy.
    ///
    /// # Returns
    /// - `i128`: principal paid to the receipt owner
    ///
    /// # Authorization
    /// - Requires authorization from `caller`, who must hold the receipt
    ///
    /// # Errors
    /// - `NotReceiptOwner` if `caller` does not hold the receipt
    /// - `StreamPaused`, `AlreadyCancelled`, `StreamCompleted` by status
    /// - `NothingToWithdraw` when nothing new has unlocked
    /// - oracle errors for pegged streams, `VaultFailure` when the vault under-delivers
    ///
    /// # Events
    /// - `withdrew(stream_id)` with a `StreamWithdrawnEvent`
    /// - `interest(stream_id)` when yield is distributed
    pub fn withdraw(env: Env, stream_id: u64, caller: Address) -> Result<i128, ContractError> {
        caller.require_auth();
        let config = Self::ensure_operational(&env)?;
        let mut stream = storage::load_stream(&env, stream_id)?;

        if caller != stream.receipt_owner {
            return Err(ContractError::NotReceiptOwner);
        }
        Self::require_open(&stream)?;
        dispute::ensure_not_frozen(&stream)?;
        if stream.status == StreamStatus::Paused {
            return Err(ContractError::StreamPaused);
        }

        let now = env.ledger().timestamp();
        let (amount, usd_settled) = Self::claimable(&env, &stream, now)?;
        if amount <= 0 {
            return Err(ContractError::NothingToWithdraw);
        }

        let withdrawn_before = stream.withdrawn_amount;
        let remaining = stream.total_amount - withdrawn_before;
        stream.usd_withdrawn += usd_settled;
        let usd_paid_in_full = stream
            .usd_peg
            .as_config()
            .map_or(false, |peg| stream.usd_withdrawn >= peg.usd_amount);

        let settlement = if amount == remaining || usd_paid_in_full {
            let available = Self::close_custody(&env, &mut stream, remaining)?;
            stream.status = StreamStatus::Completed;
            Self::settle(available, amount, remaining - amount, stream.interest_strategy)
        } else {
            Self::release_from_vault(&env, &mut stream, amount)?;
            Settlement::principal_only(amount)
        };
        stream.withdrawn_amount = withdrawn_before + settlement.to_receiver;

        // CEI: persist before any outgoing transfer.
        storage::save_stream(&env, &stream);
        Self::pay_out(&env, &config, &stream, &settlement);

        events::stream_withdrawn(&env, &stream, &caller, settlement.to_receiver);
        Ok(settlement.to_receiver)
    }

    /// Cancel a stream and settle it immediately.
    ///
    /// Whatever had unlocked but was not yet withdrawn goes to the receipt
    /// owner, the unvested remainder goes back to the sender and vault yield is
    /// split by the stream's interest strategy. Time keeps counting while a
    /// stream is paused, so cancelling a paused stream pays out everything
    /// unlocked up to now.
    ///
    /// # Authorization
    /// - The sender, the receipt owner or any Admin
    ///
    /// # Errors
    /// - `Unauthorized` for anyone else
    /// - `AlreadyCancelled`, `StreamCompleted` once terminal
    ///
    /// # Events
    /// - `cancelled(stream_id)` with a `StreamCancelledEvent`
    pub fn cancel_stream(env: Env, stream_id: u64, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();
        let config = Self::ensure_operational(&env)?;
        let mut stream = storage::load_stream(&env, stream_id)?;

        let authorized = caller == stream.sender
            || caller == stream.receipt_owner
            || access::has_role(&env, Role::Admin, &caller);
        if !authorized {
            return Err(ContractError::Unauthorized);
        }
        Self::require_open(&stream)?;
        dispute::ensure_not_frozen(&stream)?;

        let now = env.ledger().timestamp();
        let (owed_receiver, usd_settled) = Self::claimable(&env, &stream, now)?;
        let remaining = stream.total_amount - stream.withdrawn_amount;

        let available = Self::close_custody(&env, &mut stream, remaining)?;
        let settlement = Self::settle(
            available,
            owed_receiver,
            remaining - owed_receiver,
            stream.interest_strategy,
        );

        stream.withdrawn_amount += settlement.to_receiver;
        stream.usd_withdrawn += usd_settled;
        Self::close_out(&mut stream, now);

        storage::save_stream(&env, &stream);
        Self::pay_out(&env, &config, &stream, &settlement);

        events::stream_cancelled(
            &env,
            stream_id,
            &caller,
            settlement.to_receiver,
            settlement.to_sender,
        );
        Ok(())
    }

    /// Block withdrawals on a stream. The schedule itself keeps running.
    ///
    /// # Authorization
    /// - The sender or a Pauser
    pub fn pause_stream(env: Env, stream_id: u64, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();
        Self::ensure_operational(&env)?;
        let mut stream = storage::load_stream(&env, stream_id)?;
        Self::require_pause_rights(&env, &stream, &caller)?;
        Self::require_open(&stream)?;
        if stream.status == StreamStatus::Paused {
            return Err(ContractError::AlreadyPaused);
        }

        stream.status = StreamStatus::Paused;
        stream.paused_at = Some(env.ledger().timestamp());
        storage::save_stream(&env, &stream);

        events::stream_paused(&env, stream_id, &caller);
        Ok(())
    }

    pub fn unpause_stream(env: Env, stream_id: u64, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();
        Self::ensure_operational(&env)?;
        let mut stream = storage::load_stream(&env, stream_id)?;
        Self::require_pause_rights(&env, &stream, &caller)?;
        Self::require_open(&stream)?;
        if stream.status != StreamStatus::Paused {
            return Err(ContractError::NotPaused);
        }

        let now = env.ledger().timestamp();
        let paused_duration = stream
            .paused_at
            .take()
            .map_or(0, |paused_at| now.saturating_sub(paused_at));
        stream.total_paused_duration += paused_duration;
        stream.status = StreamStatus::Active;
        storage::save_stream(&env, &stream);

        events::stream_unpaused(&env, stream_id, &caller, paused_duration);
        Ok(())
    }

    /// Add funds to a running linear stream, keeping its rate.
    ///
    /// The protocol fee is taken from `amount` and the end time moves out by
    /// `duration * net / total`, rounded up. Streams with milestones, an
    /// exponential curve or a USD peg cannot be topped up, and neither can a
    /// stream whose end time has passed (`StreamEnded`).
    pub fn top_up_stream(
        env: Env,
        stream_id: u64,
        sender: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        sender.require_auth();
        let config = Self::ensure_operational(&env)?;
        let mut stream = storage::load_stream(&env, stream_id)?;

        if sender != stream.sender {
            return Err(ContractError::Unauthorized);
        }
        Self::require_open(&stream)?;
        if stream.is_frozen {
            return Err(ContractError::StreamFrozen);
        }
        if env.ledger().timestamp() >= stream.end_time {
            return Err(ContractError::StreamEnded);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if stream.curve != CurveType::Linear
            || stream.usd_peg.is_pegged()
            || !stream.milestones.is_empty()
        {
            return Err(ContractError::UnsupportedTopUp);
        }

        let fee = math::calculate_fee(amount, config.protocol_fee_bps);
        let net = amount - fee;
        if net <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        // Rounded up so the rate never rises.
        let duration = (stream.end_time - stream.start_time) as i128;
        let extension = math::mul_div_ceil(duration, net, stream.total_amount)?;
        let extension = u64::try_from(extension).map_err(|_| ContractError::ArithmeticOverflow)?;
        let new_end = stream
            .end_time
            .checked_add(extension)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let new_total = stream
            .total_amount
            .checked_add(net)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let contract = env.current_contract_address();
        let token_client = token::Client::new(&env, &stream.token);
        token_client.transfer(&sender, &contract, &amount);
        if fee > 0 {
            token_client.transfer(&contract, &config.treasury, &fee);
        }
        if let Some(vault_address) = stream.vault.clone() {
            let shares = vault::deposit(&env, &vault_address, &stream.token, net)?;
            stream.vault_shares = stream
                .vault_shares
                .checked_add(shares)
                .ok_or(ContractError::ArithmeticOverflow)?;
            stream.vault_principal = stream
                .vault_principal
                .checked_add(net)
                .ok_or(ContractError::ArithmeticOverflow)?;
        }

        stream.total_amount = new_total;
        stream.end_time = new_end;
        storage::save_stream(&env, &stream);

        events::stream_topped_up(&env, &stream, net);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Stream views
    // -----------------------------------------------------------------------

    pub fn get_stream(env: Env, stream_id: u64) -> Result<Stream, ContractError> {
        storage::load_stream(&env, stream_id)
    }

    pub fn get_stream_count(env: Env) -> u64 {
        storage::stream_count(&env)
    }

    /// Amount unlocked by the schedule so far.
    ///
    /// | Status      | Return value                              |
    /// |-------------|-------------------------------------------|
    /// | `Active`    | curve and milestone caps at `now`         |
    /// | `Paused`    | same (time is not suspended by a pause)   |
    /// | `Completed` | `withdrawn_amount`                        |
    /// | `Cancelled` | `withdrawn_amount`, frozen at cancel time |
    ///
    /// Pegged streams report USD units (7 decimals) while open.
    pub fn unlocked_amount(env: Env, stream_id: u64) -> Result<i128, ContractError> {
        let stream = storage::load_stream(&env, stream_id)?;
        match stream.status {
            StreamStatus::Completed | StreamStatus::Cancelled => Ok(stream.withdrawn_amount),
            StreamStatus::Active | StreamStatus::Paused => {
                let now = env.ledger().timestamp();
                let total = stream
                    .usd_peg
                    .as_config()
                    .map_or(stream.total_amount, |peg| peg.usd_amount);
                Ok(Self::scheduled(&env, &stream, total, now))
            }
        }
    }

    /// What a withdrawal would pay right now, ignoring a stream-level pause.
    /// Pegged streams report USD units (7 decimals) and never call the oracle.
    pub fn withdrawable_amount(env: Env, stream_id: u64) -> Result<i128, ContractError> {
        let stream = storage::load_stream(&env, stream_id)?;
        if Self::require_open(&stream).is_err() {
            return Ok(0);
        }
        let now = env.ledger().timestamp();
        let withdrawable = match stream.usd_peg.as_config() {
            Some(peg) => Self::scheduled(&env, &stream, peg.usd_amount, now) - stream.usd_withdrawn,
            None => {
                Self::scheduled(&env, &stream, stream.total_amount, now) - stream.withdrawn_amount
            }
        };
        Ok(withdrawable.max(0))
    }

    /// Current value of the stream's vault position, including banked yield.
    pub fn get_vault_value(env: Env, stream_id: u64) -> Result<i128, ContractError> {
        let stream = storage::load_stream(&env, stream_id)?;
        let in_vault = match &stream.vault {
            Some(vault_address) => vault::value_of(&env, vault_address, stream.vault_shares)?,
            None => 0,
        };
        Ok(in_vault + stream.vault_yield)
    }

    /// Keep a long-running stream and its receipt from expiring. Anyone may call.
    pub fn extend_stream_ttl(env: Env, stream_id: u64) -> Result<(), ContractError> {
        storage::extend_stream_ttl(&env, stream_id)
    }

    // -----------------------------------------------------------------------
    // Proposals
    // -----------------------------------------------------------------------

    /// Propose a stream that is created only once `required_approvals` of the
    /// `signers` approve before `deadline`.
    ///
    /// Nothing moves at proposal time. Before the final approval the sender
    /// must grant this contract a token allowance covering the gross deposit;
    /// execution draws it with `transfer_from`.
    ///
    /// # Errors
    /// - any `create_stream` validation error
    /// - `InvalidApprovalThreshold` unless `1 <= required_approvals <= signers.len()`
    ///   and the signers are distinct
    /// - `InvalidTimeRange` when `deadline` is not in the future
    pub fn create_proposal(
        env: Env,
        sender: Address,
        params: CreateStreamParams,
        signers: Vec<Address>,
        required_approvals: u32,
        deadline: u64,
    ) -> Result<u64, ContractError> {
        sender.require_auth();
        Self::ensure_operational(&env)?;
        Self::validate_stream_params(&env, &sender, &params)?;

        if required_approvals == 0 || required_approvals > signers.len() {
            return Err(ContractError::InvalidApprovalThreshold);
        }
        for (i, signer) in signers.iter().enumerate() {
            if signers.iter().skip(i + 1).any(|other| other == signer) {
                return Err(ContractError::InvalidApprovalThreshold);
            }
        }

        let now = env.ledger().timestamp();
        if deadline <= now {
            return Err(ContractError::InvalidTimeRange);
        }

        let proposal = StreamProposal {
            proposal_id: storage::allocate_proposal_id(&env),
            sender,
            params,
            signers,
            approvers: Vec::new(&env),
            required_approvals,
            deadline,
            created_at: now,
            executed: false,
            stream_id: None,
        };
        storage::save_proposal(&env, &proposal);
        storage::bump_instance(&env);

        events::proposal_created(&env, &proposal);
        Ok(proposal.proposal_id)
    }

    /// Record `approver`'s approval. The approval that reaches the threshold
    /// executes the proposal in the same call and returns the new stream id.
    ///
    /// # Errors
    /// - `ProposalAlreadyExecuted`, `ProposalExpired` (deadline is inclusive)
    /// - `Unauthorized` if `approver` is not a signer
    /// - `AlreadyApproved` on a repeat approval
    /// - any creation error when this approval triggers execution
    pub fn approve_proposal(
        env: Env,
        proposal_id: u64,
        approver: Address,
    ) -> Result<Option<u64>, ContractError> {
        approver.require_auth();
        let mut proposal = storage::load_proposal(&env, proposal_id)?;

        if proposal.executed {
            return Err(ContractError::ProposalAlreadyExecuted);
        }
        if env.ledger().timestamp() > proposal.deadline {
            return Err(ContractError::ProposalExpired);
        }
        if !proposal.signers.iter().any(|signer| signer == approver) {
            return Err(ContractError::Unauthorized);
        }
        if proposal.approvers.iter().any(|a| a == approver) {
            return Err(ContractError::AlreadyApproved);
        }

        proposal.approvers.push_back(approver.clone());
        if proposal.approvers.len() < proposal.required_approvals {
            storage::save_proposal(&env, &proposal);
            events::proposal_approved(&env, &proposal, &approver);
            return Ok(None);
        }

        // Compliance and vault approval may have changed since proposal time.
        let config = Self::ensure_operational(&env)?;
        Self::validate_stream_params(&env, &proposal.sender, &proposal.params)?;

        let stream_id = Self::open_stream(
            &env,
            &config,
            &proposal.sender,
            proposal.params.clone(),
            Funding::Allowance,
        )?;
        proposal.executed = true;
        proposal.stream_id = Some(stream_id);
        storage::save_proposal(&env, &proposal);

        events::proposal_approved(&env, &proposal, &approver);
        events::proposal_executed(&env, proposal_id, stream_id);
        Ok(Some(stream_id))
    }

    pub fn get_proposal(env: Env, proposal_id: u64) -> Result<StreamProposal, ContractError> {
        storage::load_proposal(&env, proposal_id)
    }

    /// Expiry is evaluated lazily against the current ledger time.
    pub fn proposal_status(env: Env, proposal_id: u64) -> Result<ProposalStatus, ContractError> {
        let proposal = storage::load_proposal(&env, proposal_id)?;
        if proposal.executed {
            Ok(ProposalStatus::Executed)
        } else if env.ledger().timestamp() > proposal.deadline {
            Ok(ProposalStatus::Expired)
        } else {
            Ok(ProposalStatus::Pending)
        }
    }

    pub fn get_proposal_count(env: Env) -> u64 {
        storage::proposal_count(&env)
    }

    // -----------------------------------------------------------------------
    // Receipts
    // -----------------------------------------------------------------------

    /// Hand the receipt, and with it the right to withdraw and cancel, to `to`.
    ///
    /// # Errors
    /// - `NotReceiptOwner` unless `from` holds the receipt
    /// - `StreamIsSoulbound` for soulbound streams
    /// - `AddressRestricted` if `to` is restricted
    /// - `SelfTransfer` when `to == from`
    pub fn transfer_receipt(
        env: Env,
        stream_id: u64,
        from: Address,
        to: Address,
    ) -> Result<(), ContractError> {
        from.require_auth();
        let mut stream = storage::load_stream(&env, stream_id)?;
        let mut stream_receipt = storage::load_receipt(&env, stream_id)?;

        if from != stream_receipt.owner {
            return Err(ContractError::NotReceiptOwner);
        }
        if stream.is_soulbound {
            return Err(ContractError::StreamIsSoulbound);
        }
        if from == to {
            return Err(ContractError::SelfTransfer);
        }
        dispute::ensure_not_frozen(&stream)?;
        access::validate_receiver(&env, &to)?;

        receipt::reassign(&env, &mut stream, &mut stream_receipt, &to);
        voting::clear(&env, stream_id);
        events::receipt_transferred(&env, stream_id, &from, &to);
        Ok(())
    }

    pub fn get_receipt(env: Env, stream_id: u64) -> Result<StreamReceipt, ContractError> {
        storage::load_receipt(&env, stream_id)
    }

    /// Live locked/unlocked balances for the receipt, in token units.
    pub fn get_receipt_metadata(env: Env, stream_id: u64) -> Result<ReceiptMetadata, ContractError> {
        let stream = storage::load_stream(&env, stream_id)?;
        Ok(Self::receipt_metadata(&env, &stream))
    }

    pub fn get_receipts_by_owner(env: Env, owner: Address) -> Vec<u64> {
        receipt::owned_by(&env, &owner)
    }

    // -----------------------------------------------------------------------
    // Voting
    // -----------------------------------------------------------------------

    /// Voting weight carried by the receipt: the unlocked balance its holder
    /// could withdraw now, in token units. Zero once the stream is terminal.
    pub fn get_voting_power(env: Env, stream_id: u64) -> Result<i128, ContractError> {
        let stream = storage::load_stream(&env, stream_id)?;
        Ok(Self::receipt_metadata(&env, &stream).unlocked_balance)
    }

    /// Point the stream's voting power at `delegate`. Moving the receipt
    /// drops the delegation.
    ///
    /// # Errors
    /// - `NotReceiptOwner` unless `owner` holds the receipt
    /// - `AlreadyCancelled`, `StreamCompleted` once terminal
    pub fn delegate_voting_power(
        env: Env,
        stream_id: u64,
        owner: Address,
        delegate: Address,
    ) -> Result<(), ContractError> {
        owner.require_auth();
        let stream = storage::load_stream(&env, stream_id)?;
        if owner != stream.receipt_owner {
            return Err(ContractError::NotReceiptOwner);
        }
        Self::require_open(&stream)?;

        voting::delegate(&env, stream_id, &delegate);
        events::voting_delegated(&env, stream_id, &owner, &delegate);
        Ok(())
    }

    pub fn get_voting_delegate(env: Env, stream_id: u64) -> Option<Address> {
        storage::voting_delegate(&env, stream_id)
    }

    /// Combined voting power of every stream delegated to `delegate`.
    pub fn get_delegated_voting_power(env: Env, delegate: Address) -> Result<i128, ContractError> {
        let mut total: i128 = 0;
        for stream_id in voting::delegated_streams(&env, &delegate).iter() {
            let stream = storage::load_stream(&env, stream_id)?;
            total = total
                .checked_add(Self::receipt_metadata(&env, &stream).unlocked_balance)
                .ok_or(ContractError::ArithmeticOverflow)?;
        }
        Ok(total)
    }

    // -----------------------------------------------------------------------
    // Disputes & clawback
    // -----------------------------------------------------------------------

    /// Name the arbiter for a stream. Only the sender may do this, and only once.
    pub fn set_arbiter(
        env: Env,
        stream_id: u64,
        sender: Address,
        arbiter: Address,
    ) -> Result<(), ContractError> {
        sender.require_auth();
        let mut stream = storage::load_stream(&env, stream_id)?;
        if sender != stream.sender {
            return Err(ContractError::Unauthorized);
        }
        Self::require_open(&stream)?;

        dispute::assign(&mut stream, &arbiter)?;
        storage::save_stream(&env, &stream);
        events::arbiter_assigned(&env, stream_id, &arbiter);
        Ok(())
    }

    /// Freeze a disputed stream. While frozen it cannot be withdrawn from,
    /// cancelled, topped up or have its receipt moved.
    pub fn freeze_stream(env: Env, stream_id: u64, arbiter: Address) -> Result<(), ContractError> {
        arbiter.require_auth();
        let mut stream = storage::load_stream(&env, stream_id)?;
        dispute::require_arbiter(&stream, &arbiter)?;
        Self::require_open(&stream)?;

        dispute::set_frozen(&mut stream, true)?;
        storage::save_stream(&env, &stream);
        events::stream_frozen(&env, stream_id, &arbiter, true);
        Ok(())
    }

    pub fn unfreeze_stream(env: Env, stream_id: u64, arbiter: Address) -> Result<(), ContractError> {
        arbiter.require_auth();
        let mut stream = storage::load_stream(&env, stream_id)?;
        dispute::require_arbiter(&stream, &arbiter)?;
        Self::require_open(&stream)?;

        dispute::set_frozen(&mut stream, false)?;
        storage::save_stream(&env, &stream);
        events::stream_frozen(&env, stream_id, &arbiter, false);
        Ok(())
    }

    /// Settle a dispute and close the stream.
    ///
    /// The arbiter awards `receiver_bps` of the principal still held to the
    /// receipt owner and the rest to the sender, regardless of the schedule.
    /// Vault yield is split by the stream's interest strategy as on cancel.
    ///
    /// # Errors
    /// - `Unauthorized` unless `arbiter` is the stream's arbiter
    /// - `InvalidSplit` when `receiver_bps` exceeds 10_000
    /// - `AlreadyCancelled`, `StreamCompleted` once terminal
    ///
    /// # Events
    /// - `resolved(stream_id)` with a `DisputeResolvedEvent`
    pub fn resolve_dispute(
        env: Env,
        stream_id: u64,
        arbiter: Address,
        receiver_bps: u32,
    ) -> Result<(), ContractError> {
        arbiter.require_auth();
        let config = Self::ensure_operational(&env)?;
        let mut stream = storage::load_stream(&env, stream_id)?;
        dispute::require_arbiter(&stream, &arbiter)?;
        Self::require_open(&stream)?;

        let remaining = stream.total_amount - stream.withdrawn_amount;
        let awarded = dispute::receiver_share(remaining, receiver_bps)?;
        let available = Self::close_custody(&env, &mut stream, remaining)?;
        let settlement = Self::settle(
            available,
            awarded,
            remaining - awarded,
            stream.interest_strategy,
        );

        stream.withdrawn_amount += settlement.to_receiver;
        Self::close_out(&mut stream, env.ledger().timestamp());

        storage::save_stream(&env, &stream);
        Self::pay_out(&env, &config, &stream, &settlement);

        events::dispute_resolved(
            &env,
            stream_id,
            &arbiter,
            receiver_bps,
            settlement.to_receiver,
            settlement.to_sender,
        );
        Ok(())
    }

    /// Recover everything a stream still holds, vault position included, to
    /// `destination` and close the stream.
    ///
    /// Meant for regulatory seizure, so it runs while the protocol is halted
    /// and on frozen streams. Already-withdrawn funds are out of reach.
    ///
    /// # Returns
    /// - `i128`: tokens sent to `destination`
    ///
    /// # Errors
    /// - `Unauthorized` unless `officer` is a ComplianceOfficer
    /// - `AddressRestricted` if `destination` is restricted
    /// - `FlashLoanInProgress` while a flash loan is out
    /// - `AlreadyCancelled`, `StreamCompleted` once terminal
    pub fn clawback_stream(
        env: Env,
        stream_id: u64,
        officer: Address,
        destination: Address,
    ) -> Result<i128, ContractError> {
        officer.require_auth();
        storage::get_config(&env)?;
        flash_loan::ensure_unlocked(&env)?;
        access::require_role(&env, Role::ComplianceOfficer, &officer)?;

        let mut stream = storage::load_stream(&env, stream_id)?;
        Self::require_open(&stream)?;
        access::validate_receiver(&env, &destination)?;

        let remaining = stream.total_amount - stream.withdrawn_amount;
        let recovered = Self::close_custody(&env, &mut stream, remaining)?;
        Self::close_out(&mut stream, env.ledger().timestamp());

        storage::save_stream(&env, &stream);
        if recovered > 0 {
            token::Client::new(&env, &stream.token).transfer(
                &env.current_contract_address(),
                &destination,
                &recovered,
            );
        }

        events::clawback(&env, stream_id, &officer, &destination, recovered);
        Ok(recovered)
    }

    // -----------------------------------------------------------------------
    // Upgrades
    // -----------------------------------------------------------------------

    /// Replace the contract's code with an already-uploaded WASM blob. Storage
    /// is kept; run `migrate` afterwards if the new code expects a newer layout.
    pub fn upgrade(env: Env, caller: Address, new_wasm_hash: BytesN<32>) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Admin, &caller)?;

        env.deployer()
            .update_current_contract_wasm(new_wasm_hash.clone());
        events::upgraded(&env, &caller, &new_wasm_hash);
        Ok(())
    }

    pub fn get_version(env: Env) -> u32 {
        storage::version(&env)
    }

    /// Record that stored data now follows layout `target_version`. Versions
    /// only move forward, so each migration runs once.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is an Admin
    /// - `InvalidVersion` unless `target_version` is above the current one
    pub fn migrate(env: Env, caller: Address, target_version: u32) -> Result<(), ContractError> {
        caller.require_auth();
        access::require_role(&env, Role::Admin, &caller)?;

        let current = storage::version(&env);
        if target_version <= current {
            return Err(ContractError::InvalidVersion);
        }
        storage::set_version(&env, target_version);
        events::migrated(&env, &caller, current, target_version);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Flash loans
    // -----------------------------------------------------------------------

    /// Lend `amount` of the contract's `token` balance to `receiver` for the
    /// span of its `exec_op` callback.
    ///
    /// The receiver must return `amount + fee` before the callback ends. While
    /// the loan is out every fund-moving entrypoint rejects with
    /// `FlashLoanInProgress`, which includes a nested `flash_loan`.
    ///
    /// # Returns
    /// - `i128`: the fee collected
    ///
    /// # Errors
    /// - `InsufficientLiquidity` if the pool holds less than `amount`
    /// - `FlashLoanNotRepaid` if the callback fails, returns `false` or underpays
    pub fn flash_loan(
        env: Env,
        initiator: Address,
        receiver: Address,
        token: Address,
        amount: i128,
        params: Bytes,
    ) -> Result<i128, ContractError> {
        initiator.require_auth();
        let config = storage::get_config(&env)?;
        if config.paused {
            return Err(ContractError::ContractPaused);
        }

        let fee = flash_loan::execute(
            &env,
            &initiator,
            &receiver,
            &token,
            amount,
            &params,
            config.flash_loan_fee_bps,
        )?;

        let collected = storage::flash_loan_fees(&env, &token)
            .checked_add(fee)
            .ok_or(ContractError::ArithmeticOverflow)?;
        storage::set_flash_loan_fees(&env, &token, collected);

        events::flash_loan(&env, &initiator, &receiver, &token, amount, fee);
        Ok(fee)
    }

    /// Cumulative flash-loan fees earned in `token`.
    pub fn get_flash_loan_fees(env: Env, token: Address) -> i128 {
        storage::flash_loan_fees(&env, &token)
    }
}

#[cfg(test)]
mod mocks;
