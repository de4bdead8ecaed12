//! Owner-mintable fungible token ledger
//!
//! Provides:
//! - Balances per account, with implicit zero for unknown accounts
//! - A total supply kept equal to the sum of all balances
//! - Minting restricted to the account that deployed the ledger
//!
//! # Example
//!
//! ```ignore
//! use flexitoken::token::{AccountId, TokenLedger};
//!
//! let owner: AccountId = "0x00000000000000000000000000000000000000aa".parse()?;
//! let holder: AccountId = "0x00000000000000000000000000000000000000bb".parse()?;
//!
//! let mut ledger = TokenLedger::deploy(owner);
//! assert_eq!(ledger.balance_of(&owner), ledger.total_supply());
//!
//! ledger.mint(owner, holder, 1000)?;
//! assert_eq!(ledger.balance_of(&holder), 1000);
//!
//! // Anyone else is turned away
//! assert!(ledger.mint(holder, holder, 1000).is_err());
//! ```

pub mod account;
pub mod ledger;
pub mod metadata;
pub mod request;
pub mod shared;

pub use account::{AccountId, AccountIdError};
pub use ledger::{LedgerError, MintEvent, TokenLedger, MINT_HISTORY_LIMIT};
pub use metadata::{TokenConfig, TokenMetadata, INITIAL_SUPPLY};
pub use request::{MintRequest, SignedMintRequest};
pub use shared::SharedLedger;
