//! Wallet module for account keys and signing

pub mod wallet;

pub use wallet::{Signers, Wallet, WalletError, WalletInfo, WalletManager};
