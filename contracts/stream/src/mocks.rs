//! Counterparty contracts for tests: a share-priced yield vault, a settable
//! price feed and a flash-loan borrower with a configurable repayment habit.

use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, token, Address, Bytes, Env};

const BPS: i128 = 10_000;

fn stored_token(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&symbol_short!("token"))
        .unwrap()
}

/// Vault whose share price starts at 1:1 and can be moved to simulate yield
/// or losses. Gains must be backed by minting tokens to the vault.
#[contract]
pub struct MockVault;

#[contractimpl]
impl MockVault {
    pub fn init(env: Env, token: Address) {
        env.storage().instance().set(&symbol_short!("token"), &token);
        env.storage().instance().set(&symbol_short!("price"), &BPS);
    }

    /// Share price in basis points of the underlying (10_000 = 1:1).
    pub fn set_share_price(env: Env, price_bps: i128) {
        env.storage().instance().set(&symbol_short!("price"), &price_bps);
    }

    pub fn deposit(env: Env, _from: Address, amount: i128) -> i128 {
        amount * BPS / Self::price(&env)
    }

    pub fn withdraw(env: Env, to: Address, shares: i128) -> i128 {
        let amount = Self::get_value(env.clone(), shares);
        token::Client::new(&env, &stored_token(&env)).transfer(
            &env.current_contract_address(),
            &to,
            &amount,
        );
        amount
    }

    pub fn get_value(env: Env, shares: i128) -> i128 {
        shares * Self::price(&env) / BPS
    }
}

impl MockVault {
    fn price(env: &Env) -> i128 {
        env.storage()
            .instance()
            .get(&symbol_short!("price"))
            .unwrap_or(BPS)
    }
}

#[contract]
pub struct MockOracle;

#[contractimpl]
impl MockOracle {
    pub fn set_price(env: Env, price: i128, timestamp: u64) {
        env.storage()
            .instance()
            .set(&symbol_short!("reading"), &(price, timestamp));
    }

    pub fn price(env: Env) -> (i128, u64) {
        env.storage()
            .instance()
            .get(&symbol_short!("reading"))
            .expect("no price published")
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Repayment {
    /// Principal plus fee, reports success.
    Full = 0,
    /// Principal only.
    PrincipalOnly = 1,
    /// Principal plus fee, but reports failure.
    Declined = 2,
}

/// Flash-loan receiver whose repayment behaviour is chosen at setup.
#[contract]
pub struct MockBorrower;

#[contractimpl]
impl MockBorrower {
    pub fn configure(env: Env, pool: Address, repayment: Repayment) {
        env.storage().instance().set(&symbol_short!("pool"), &pool);
        env.storage().instance().set(&symbol_short!("mode"), &repayment);
    }

    pub fn exec_op(
        env: Env,
        _initiator: Address,
        token: Address,
        amount: i128,
        fee: i128,
        _params: Bytes,
    ) -> bool {
        let pool: Address = env.storage().instance().get(&symbol_short!("pool")).unwrap();
        let repayment: Repayment = env.storage().instance().get(&symbol_short!("mode")).unwrap();
        let returned = match repayment {
            Repayment::PrincipalOnly => amount,
            Repayment::Full | Repayment::Declined => amount + fee,
        };
        token::Client::new(&env, &token).transfer(&env.current_contract_address(), &pool, &returned);
        repayment != Repayment::Declined
    }
}
