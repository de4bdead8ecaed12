//! FlexiToken: an owner-mintable fungible token ledger in Rust
//!
//! This crate provides:
//! - A token ledger with balances, total supply and owner-gated minting
//! - A thread-safe shared handle that serializes mints
//! - 160-bit account ids derived from secp256k1 keys
//! - Signed mint requests with replay protection
//! - Wallets, JSON persistence with backups, and a CLI
//!
//! # Example
//!
//! ```rust
//! use flexitoken::token::TokenLedger;
//! use flexitoken::wallet::Signers;
//!
//! // Owner plus two other accounts
//! let signers = Signers::generate(3);
//! let (owner, addr1, addr2) = (
//!     signers[0].account_id(),
//!     signers[1].account_id(),
//!     signers[2].account_id(),
//! );
//!
//! let mut ledger = TokenLedger::deploy(owner);
//! assert_eq!(ledger.balance_of(&owner), ledger.total_supply());
//!
//! ledger.mint(owner, addr1, 1000).unwrap();
//! assert_eq!(ledger.balance_of(&addr1), 1000);
//!
//! let err = ledger.mint(addr1, addr2, 1000).unwrap_err();
//! assert_eq!(err.to_string(), "Only the owner can call this function");
//! ```

pub mod cli;
pub mod crypto;
pub mod storage;
pub mod token;
pub mod wallet;

// Re-export commonly used types
pub use crypto::KeyPair;
pub use storage::{Storage, StorageConfig};
pub use token::{
    AccountId, LedgerError, MintEvent, SharedLedger, TokenConfig, TokenLedger, TokenMetadata,
    INITIAL_SUPPLY,
};
pub use wallet::{Signers, Wallet};
