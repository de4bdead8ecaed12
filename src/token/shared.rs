//! Thread-safe ledger handle
//!
//! Mints hold the write lock across the balance and supply update, so
//! readers never observe a half-applied mint. Queries share the read lock.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::account::AccountId;
use super::ledger::{LedgerError, MintEvent, TokenLedger};
use super::request::SignedMintRequest;

/// Cloneable handle to one ledger shared between threads
#[derive(Clone, Debug)]
pub struct SharedLedger {
    inner: Arc<RwLock<TokenLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: TokenLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Deploy a default ledger owned by `creator`
    pub fn deploy(creator: AccountId) -> Self {
        Self::new(TokenLedger::deploy(creator))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TokenLedger>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TokenLedger>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    pub fn total_supply(&self) -> Result<u128, LedgerError> {
        Ok(self.read()?.total_supply())
    }

    pub fn balance_of(&self, account: &AccountId) -> Result<u128, LedgerError> {
        Ok(self.read()?.balance_of(account))
    }

    pub fn mint(
        &self,
        caller: AccountId,
        recipient: AccountId,
        amount: u128,
    ) -> Result<MintEvent, LedgerError> {
        self.write()?.mint(caller, recipient, amount)
    }

    pub fn mint_signed(&self, signed: &SignedMintRequest) -> Result<MintEvent, LedgerError> {
        self.write()?.mint_signed(signed)
    }

    /// Run `f` against a consistent view of the ledger
    pub fn with_read<R>(&self, f: impl FnOnce(&TokenLedger) -> R) -> Result<R, LedgerError> {
        Ok(f(&*self.read()?))
    }

    /// Clone the current state, e.g. for persistence
    pub fn snapshot(&self) -> Result<TokenLedger, LedgerError> {
        self.with_read(TokenLedger::clone)
    }
}
