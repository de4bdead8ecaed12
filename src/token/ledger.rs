//! Owner-mintable fungible token ledger
//!
//! Tracks per-account balances and the total supply. The account that
//! deploys the ledger becomes its owner, receives the initial supply, and
//! is the only account allowed to mint afterwards.

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::account::AccountId;
use super::metadata::{TokenConfig, TokenMetadata};
use super::request::SignedMintRequest;
use crate::crypto::{sha256_hex, KeyError};

/// Number of mint events retained in the history
pub const MINT_HISTORY_LIMIT: usize = 100;

/// Ledger-related errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Only the owner can call this function")]
    Unauthorized,
    #[error("Mint would overflow the total supply")]
    SupplyOverflow,
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
    #[error("Invalid supply: must be greater than 0")]
    InvalidSupply,
    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] KeyError),
    #[error("Mint request is for ledger {got}, not {expected}")]
    WrongLedger { expected: String, got: String },
    #[error("Stale mint nonce: expected {expected}, got {got}")]
    StaleNonce { expected: u64, got: u64 },
    #[error("Ledger lock poisoned")]
    LockPoisoned,
}

/// Mint event (emitted when new tokens are created)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MintEvent {
    pub to: AccountId,
    pub amount: u128,
    pub new_total_supply: u128,
    pub timestamp: DateTime<Utc>,
}

/// A fungible token ledger with a single minting owner
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenLedger {
    /// Random per-deployment id; signed requests are bound to it
    ledger_id: String,
    /// Deployer; fixed for the lifetime of the ledger
    owner: AccountId,
    pub metadata: TokenMetadata,
    total_supply: u128,
    /// Balances: account -> amount. Missing accounts hold zero.
    balances: HashMap<AccountId, u128>,
    /// Count of successful mints; signed requests must quote it
    mint_nonce: u64,
    /// Mint history (last 100)
    mint_history: Vec<MintEvent>,
}

impl TokenLedger {
    /// Deploy a ledger with the default token config
    pub fn deploy(creator: AccountId) -> Self {
        Self::from_metadata(creator, TokenMetadata::unchecked(&TokenConfig::default()))
    }

    /// Deploy a ledger with a custom token config
    pub fn with_config(creator: AccountId, config: &TokenConfig) -> Result<Self, LedgerError> {
        let metadata = TokenMetadata::from_config(config)?;
        Ok(Self::from_metadata(creator, metadata))
    }

    fn from_metadata(creator: AccountId, metadata: TokenMetadata) -> Self {
        let initial_supply = metadata.initial_supply;
        let mut balances = HashMap::new();
        // All initial tokens belong to the creator
        balances.insert(creator, initial_supply);

        log::info!(
            "Token deployed: {} ({}) owner {} initial supply {}",
            metadata.name,
            metadata.symbol,
            creator.short(),
            initial_supply
        );

        Self {
            ledger_id: new_ledger_id(&creator),
            owner: creator,
            metadata,
            total_supply: initial_supply,
            balances,
            mint_nonce: 0,
            mint_history: Vec::new(),
        }
    }

    // =========================================================================
    // View Functions
    // =========================================================================

    pub fn ledger_id(&self) -> &str {
        &self.ledger_id
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Get total supply
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Get balance of an account (zero if never credited)
    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Nonce the next signed mint request must carry
    pub fn mint_nonce(&self) -> u64 {
        self.mint_nonce
    }

    /// Get all holders with non-zero balances, largest first
    pub fn holders(&self) -> Vec<(AccountId, u128)> {
        let mut holders: Vec<(AccountId, u128)> = self
            .balances
            .iter()
            .filter(|(_, &b)| b > 0)
            .map(|(a, b)| (*a, *b))
            .collect();
        holders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        holders
    }

    /// Get holder count
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|&&b| b > 0).count()
    }

    pub fn mint_history(&self) -> &[MintEvent] {
        &self.mint_history
    }

    /// Recompute the balance sum and compare it with the total supply
    pub fn check_invariant(&self) -> bool {
        self.balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            == Some(self.total_supply)
    }

    // =========================================================================
    // Mutating Functions
    // =========================================================================

    fn only_owner(&self, caller: AccountId) -> Result<(), LedgerError> {
        if caller != self.owner {
            log::warn!("Rejected mint from non-owner {}", caller.short());
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    /// Mint new tokens to `recipient`
    ///
    /// Only the owner may mint. Nothing changes unless the whole mint
    /// succeeds.
    pub fn mint(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
        amount: u128,
    ) -> Result<MintEvent, LedgerError> {
        self.only_owner(caller)?;

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        let new_balance = self
            .balance_of(&recipient)
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;

        self.balances.insert(recipient, new_balance);
        self.total_supply = new_supply;
        self.mint_nonce += 1;

        let event = MintEvent {
            to: recipient,
            amount,
            new_total_supply: new_supply,
            timestamp: Utc::now(),
        };

        self.mint_history.push(event.clone());
        if self.mint_history.len() > MINT_HISTORY_LIMIT {
            self.mint_history.remove(0);
        }

        log::info!(
            "Minted {} {} to {} (supply {})",
            amount,
            self.metadata.symbol,
            recipient.short(),
            new_supply
        );

        Ok(event)
    }

    /// Mint on behalf of whoever signed `signed`
    ///
    /// The signer is authenticated first, then must be the owner, then
    /// must name this ledger and quote its current mint nonce.
    pub fn mint_signed(&mut self, signed: &SignedMintRequest) -> Result<MintEvent, LedgerError> {
        let caller = signed.signer()?;
        self.only_owner(caller)?;

        let request = &signed.request;
        if request.ledger_id != self.ledger_id {
            return Err(LedgerError::WrongLedger {
                expected: self.ledger_id.clone(),
                got: request.ledger_id.clone(),
            });
        }
        if request.nonce != self.mint_nonce {
            return Err(LedgerError::StaleNonce {
                expected: self.mint_nonce,
                got: request.nonce,
            });
        }

        self.mint(caller, request.recipient, request.amount)
    }
}

/// SHA-256 over creator || deploy time || random salt, hex encoded
fn new_ledger_id(creator: &AccountId) -> String {
    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);

    let mut buf = Vec::with_capacity(52);
    buf.extend_from_slice(creator.as_bytes());
    buf.extend_from_slice(&Utc::now().timestamp_micros().to_be_bytes());
    buf.extend_from_slice(&salt);
    sha256_hex(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::metadata::INITIAL_SUPPLY;
    use crate::token::request::MintRequest;
    use crate::wallet::Signers;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 20])
    }

    fn sum_of_balances(ledger: &TokenLedger, accounts: &[AccountId]) -> u128 {
        accounts.iter().map(|a| ledger.balance_of(a)).sum()
    }

    #[test]
    fn test_initial_supply_assigned_to_owner() {
        let owner = account(1);
        let ledger = TokenLedger::deploy(owner);

        assert_eq!(ledger.owner(), owner);
        assert_eq!(ledger.total_supply(), INITIAL_SUPPLY);
        assert_eq!(ledger.balance_of(&owner), ledger.total_supply());
        assert_eq!(ledger.holder_count(), 1);
        assert_eq!(ledger.name(), "FlexiToken");
        assert_eq!(ledger.symbol(), "FLEXI");
        assert_eq!(ledger.decimals(), 18);
        assert!(ledger.check_invariant());
    }

    #[test]
    fn test_unknown_account_has_zero_balance() {
        let ledger = TokenLedger::deploy(account(1));
        assert_eq!(ledger.balance_of(&account(9)), 0);
        assert_eq!(ledger.balance_of(&AccountId::ZERO), 0);
    }

    #[test]
    fn test_owner_can_mint() {
        let (owner, addr1) = (account(1), account(2));
        let mut ledger = TokenLedger::deploy(owner);

        let event = ledger.mint(owner, addr1, 1000).unwrap();

        assert_eq!(event.to, addr1);
        assert_eq!(event.amount, 1000);
        assert_eq!(event.new_total_supply, INITIAL_SUPPLY + 1000);
        assert_eq!(ledger.balance_of(&addr1), 1000);
        assert_eq!(ledger.balance_of(&owner), INITIAL_SUPPLY);
        assert!(ledger.check_invariant());
    }

    #[test]
    fn test_non_owner_mint_rejected() {
        let (owner, addr1, addr2) = (account(1), account(2), account(3));
        let mut ledger = TokenLedger::deploy(owner);

        let err = ledger.mint(addr1, addr2, 1000).unwrap_err();

        assert!(matches!(err, LedgerError::Unauthorized));
        assert_eq!(err.to_string(), "Only the owner can call this function");
        assert_eq!(ledger.balance_of(&addr2), 0);
        assert_eq!(ledger.balance_of(&addr1), 0);
        assert_eq!(ledger.total_supply(), INITIAL_SUPPLY);
        assert_eq!(ledger.mint_nonce(), 0);
        assert!(ledger.mint_history().is_empty());
    }

    #[test]
    fn test_unauthorized_checked_before_overflow() {
        let (owner, other) = (account(1), account(2));
        let mut ledger = TokenLedger::deploy(owner);

        let result = ledger.mint(other, other, u128::MAX);
        assert!(matches!(result, Err(LedgerError::Unauthorized)));
    }

    #[test]
    fn test_mint_increases_total_supply() {
        let owner = account(1);
        let mut ledger = TokenLedger::deploy(owner);
        let initial_supply = ledger.total_supply();

        ledger.mint(owner, owner, 5000).unwrap();

        assert_eq!(ledger.total_supply(), initial_supply + 5000);
        assert_eq!(ledger.balance_of(&owner), initial_supply + 5000);
    }

    #[test]
    fn test_repeated_mints_accumulate() {
        let (owner, addr1) = (account(1), account(2));
        let mut ledger = TokenLedger::deploy(owner);

        ledger.mint(owner, addr1, 1000).unwrap();
        ledger.mint(owner, addr1, 1000).unwrap();

        assert_eq!(ledger.balance_of(&addr1), 2000);
        assert_eq!(ledger.total_supply(), INITIAL_SUPPLY + 2000);
        assert_eq!(ledger.mint_nonce(), 2);
        assert_eq!(ledger.mint_history().len(), 2);
    }

    #[test]
    fn test_zero_amount_mint_accepted() {
        let (owner, addr1) = (account(1), account(2));
        let mut ledger = TokenLedger::deploy(owner);

        let event = ledger.mint(owner, addr1, 0).unwrap();

        assert_eq!(event.amount, 0);
        assert_eq!(ledger.balance_of(&addr1), 0);
        assert_eq!(ledger.total_supply(), INITIAL_SUPPLY);
        assert_eq!(ledger.holder_count(), 1);
        assert!(ledger.check_invariant());
    }

    #[test]
    fn test_overflow_leaves_state_untouched() {
        let (owner, addr1) = (account(1), account(2));
        let config = TokenConfig {
            initial_supply: u128::MAX - 10,
            ..Default::default()
        };
        let mut ledger = TokenLedger::with_config(owner, &config).unwrap();

        ledger.mint(owner, addr1, 10).unwrap();
        let result = ledger.mint(owner, addr1, 1);

        assert!(matches!(result, Err(LedgerError::SupplyOverflow)));
        assert_eq!(ledger.total_supply(), u128::MAX);
        assert_eq!(ledger.balance_of(&addr1), 10);
        assert_eq!(ledger.mint_nonce(), 1);
        assert!(ledger.check_invariant());
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = TokenConfig {
            symbol: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            TokenLedger::with_config(account(1), &config),
            Err(LedgerError::InvalidSymbol)
        ));
    }

    #[test]
    fn test_supply_matches_balances_across_mints() {
        let owner = account(1);
        let accounts: Vec<AccountId> = (1..=5).map(account).collect();
        let mut ledger = TokenLedger::deploy(owner);

        for (i, to) in accounts.iter().cycle().take(23).enumerate() {
            ledger.mint(owner, *to, (i as u128 + 1) * 7).unwrap();
            assert_eq!(ledger.total_supply(), sum_of_balances(&ledger, &accounts));
        }
        assert!(ledger.check_invariant());
    }

    #[test]
    fn test_holders_sorted_by_balance() {
        let owner = account(1);
        let config = TokenConfig {
            initial_supply: 500,
            ..Default::default()
        };
        let mut ledger = TokenLedger::with_config(owner, &config).unwrap();
        ledger.mint(owner, account(2), 1000).unwrap();
        ledger.mint(owner, account(3), 0).unwrap();

        let holders = ledger.holders();
        assert_eq!(holders, vec![(account(2), 1000), (owner, 500)]);
    }

    #[test]
    fn test_mint_history_is_bounded() {
        let owner = account(1);
        let mut ledger = TokenLedger::deploy(owner);

        for i in 0..(MINT_HISTORY_LIMIT as u128 + 5) {
            ledger.mint(owner, account(2), i).unwrap();
        }

        let history = ledger.mint_history();
        assert_eq!(history.len(), MINT_HISTORY_LIMIT);
        assert_eq!(history[0].amount, 5);
    }

    #[test]
    fn test_signed_mint_by_owner() {
        let signers = Signers::generate(3);
        let owner = signers.owner();
        let mut ledger = TokenLedger::deploy(owner.account_id());

        let request = MintRequest::new(
            ledger.ledger_id(),
            signers[1].account_id(),
            1000,
            ledger.mint_nonce(),
        );
        let signed = request.sign(owner.key_pair()).unwrap();
        ledger.mint_signed(&signed).unwrap();

        assert_eq!(ledger.balance_of(&signers[1].account_id()), 1000);
        assert_eq!(ledger.mint_nonce(), 1);
    }

    #[test]
    fn test_signed_mint_by_non_owner_rejected() {
        let signers = Signers::generate(3);
        let mut ledger = TokenLedger::deploy(signers.owner().account_id());

        let request = MintRequest::new(
            ledger.ledger_id(),
            signers[2].account_id(),
            1000,
            ledger.mint_nonce(),
        );
        let signed = request.sign(signers[1].key_pair()).unwrap();
        let err = ledger.mint_signed(&signed).unwrap_err();

        assert_eq!(err.to_string(), "Only the owner can call this function");
        assert_eq!(ledger.balance_of(&signers[2].account_id()), 0);
        assert_eq!(ledger.total_supply(), INITIAL_SUPPLY);
    }

    #[test]
    fn test_signed_mint_replay_rejected() {
        let signers = Signers::generate(2);
        let owner = signers.owner();
        let mut ledger = TokenLedger::deploy(owner.account_id());

        let request = MintRequest::new(ledger.ledger_id(), signers[1].account_id(), 1000, 0);
        let signed = request.sign(owner.key_pair()).unwrap();
        ledger.mint_signed(&signed).unwrap();

        let replay = ledger.mint_signed(&signed);
        assert!(matches!(
            replay,
            Err(LedgerError::StaleNonce {
                expected: 1,
                got: 0
            })
        ));
        assert_eq!(ledger.balance_of(&signers[1].account_id()), 1000);
    }

    #[test]
    fn test_tampered_signed_mint_rejected() {
        let signers = Signers::generate(2);
        let owner = signers.owner();
        let mut ledger = TokenLedger::deploy(owner.account_id());

        let request = MintRequest::new(ledger.ledger_id(), signers[1].account_id(), 1000, 0);
        let mut signed = request.sign(owner.key_pair()).unwrap();
        signed.request.amount = 1_000_000;

        // owner key no longer verifies the altered request
        let result = ledger.mint_signed(&signed);
        assert!(matches!(result, Err(LedgerError::InvalidSignature(_))));
        assert_eq!(ledger.balance_of(&signers[1].account_id()), 0);
    }

    #[test]
    fn test_ledger_ids_are_unique() {
        let owner = account(1);
        let a = TokenLedger::deploy(owner);
        let b = TokenLedger::deploy(owner);

        assert_eq!(a.ledger_id().len(), 64);
        assert_ne!(a.ledger_id(), b.ledger_id());
    }

    #[test]
    fn test_signed_mint_not_accepted_by_other_ledger() {
        let signers = Signers::generate(2);
        let owner = signers.owner();
        let holder = signers[1].account_id();
        let mut first = TokenLedger::deploy(owner.account_id());
        let mut second = TokenLedger::deploy(owner.account_id());

        let request = MintRequest::new(first.ledger_id(), holder, 1000, 0);
        let signed = request.sign(owner.key_pair()).unwrap();
        first.mint_signed(&signed).unwrap();

        // same owner, same nonce, different deployment
        let result = second.mint_signed(&signed);
        assert!(matches!(result, Err(LedgerError::WrongLedger { .. })));
        assert_eq!(second.balance_of(&holder), 0);
        assert_eq!(second.total_supply(), INITIAL_SUPPLY);
        assert_eq!(second.mint_nonce(), 0);
        assert_eq!(first.balance_of(&holder), 1000);
    }

    #[test]
    fn test_repointed_request_rejected() {
        let signers = Signers::generate(2);
        let owner = signers.owner();
        let mut ledger = TokenLedger::deploy(owner.account_id());

        // re-pointing a signed request at this ledger breaks the signature
        let request = MintRequest::new("elsewhere", signers[1].account_id(), 1000, 0);
        let mut signed = request.sign(owner.key_pair()).unwrap();
        signed.request.ledger_id = ledger.ledger_id().to_string();

        let result = ledger.mint_signed(&signed);
        assert!(matches!(result, Err(LedgerError::InvalidSignature(_))));
        assert_eq!(ledger.balance_of(&signers[1].account_id()), 0);
    }
}
