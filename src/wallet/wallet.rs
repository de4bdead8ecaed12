//! Wallets for ledger accounts
//!
//! A wallet holds the key pair behind an account and signs mint requests
//! with it.

use crate::crypto::KeyPair;
use crate::token::{AccountId, MintRequest, SignedMintRequest, TokenLedger};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Wallet-related errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet not found: {0}")]
    NotFound(AccountId),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] crate::crypto::KeyError),
    #[error("Wallet file claims address {stored} but its key belongs to {derived}")]
    AddressMismatch { stored: AccountId, derived: AccountId },
}

/// Serializable wallet data for persistence
#[derive(Debug, Serialize, Deserialize)]
struct WalletData {
    private_key_hex: String,
    address: AccountId,
    label: Option<String>,
}

/// A key pair plus an optional human label
#[derive(Clone)]
pub struct Wallet {
    key_pair: KeyPair,
    pub label: Option<String>,
}

impl Wallet {
    /// Create a new wallet with a fresh key pair
    pub fn new() -> Self {
        Self {
            key_pair: KeyPair::generate(),
            label: None,
        }
    }

    /// Create a wallet with a label
    pub fn with_label(label: &str) -> Self {
        Self {
            key_pair: KeyPair::generate(),
            label: Some(label.to_string()),
        }
    }

    /// Import a wallet from a private key
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, WalletError> {
        let key_pair = KeyPair::from_private_key_hex(private_key_hex)?;
        Ok(Self {
            key_pair,
            label: None,
        })
    }

    /// The account this wallet controls
    pub fn account_id(&self) -> AccountId {
        self.key_pair.account_id()
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    /// Get the wallet's public key (hex)
    pub fn public_key(&self) -> String {
        self.key_pair.public_key_hex()
    }

    /// Get the wallet's private key (hex)
    /// WARNING: Keep this secret!
    pub fn private_key(&self) -> String {
        self.key_pair.private_key_hex()
    }

    /// Token balance of this wallet's account
    pub fn balance(&self, ledger: &TokenLedger) -> u128 {
        ledger.balance_of(&self.account_id())
    }

    /// Sign a mint request bound to `ledger` and its current nonce
    pub fn sign_mint(
        &self,
        ledger: &TokenLedger,
        recipient: AccountId,
        amount: u128,
    ) -> Result<SignedMintRequest, WalletError> {
        let request = MintRequest::new(ledger.ledger_id(), recipient, amount, ledger.mint_nonce());
        Ok(request.sign(&self.key_pair)?)
    }

    /// Save wallet to file
    pub fn save(&self, path: &Path) -> Result<(), WalletError> {
        let data = WalletData {
            private_key_hex: self.private_key(),
            address: self.account_id(),
            label: self.label.clone(),
        };

        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load wallet from file
    pub fn load(path: &Path) -> Result<Self, WalletError> {
        let json = fs::read_to_string(path)?;
        let data: WalletData = serde_json::from_str(&json)?;

        let mut wallet = Self::from_private_key(&data.private_key_hex)?;
        if wallet.account_id() != data.address {
            return Err(WalletError::AddressMismatch {
                stored: data.address,
                derived: wallet.account_id(),
            });
        }
        wallet.label = data.label;
        Ok(wallet)
    }

    /// Export wallet info (without private key)
    pub fn export_public_info(&self) -> WalletInfo {
        WalletInfo {
            address: self.account_id(),
            public_key: self.public_key(),
            label: self.label.clone(),
        }
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

/// Public wallet information (safe to share)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    pub address: AccountId,
    pub public_key: String,
    pub label: Option<String>,
}

/// Wallet manager for handling multiple wallets
pub struct WalletManager {
    wallets_dir: PathBuf,
}

impl WalletManager {
    /// Create a new wallet manager
    pub fn new(wallets_dir: &Path) -> Result<Self, WalletError> {
        fs::create_dir_all(wallets_dir)?;
        Ok(Self {
            wallets_dir: wallets_dir.to_path_buf(),
        })
    }

    fn wallet_path(&self, account: &AccountId) -> PathBuf {
        self.wallets_dir.join(format!("{}.json", account))
    }

    /// Create and save a new wallet
    pub fn create_wallet(&self, label: Option<&str>) -> Result<Wallet, WalletError> {
        let wallet = match label {
            Some(l) => Wallet::with_label(l),
            None => Wallet::new(),
        };

        wallet.save(&self.wallet_path(&wallet.account_id()))?;
        log::debug!("Created wallet {}", wallet.account_id());

        Ok(wallet)
    }

    /// List all wallets (public info only)
    pub fn list_wallets(&self) -> Result<Vec<WalletInfo>, WalletError> {
        let mut wallets = Vec::new();

        for entry in fs::read_dir(&self.wallets_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match Wallet::load(&path) {
                    Ok(wallet) => wallets.push(wallet.export_public_info()),
                    Err(e) => log::warn!("Skipping unreadable wallet {:?}: {}", path, e),
                }
            }
        }

        wallets.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(wallets)
    }

    /// Load a specific wallet by account
    pub fn load_wallet(&self, account: &AccountId) -> Result<Wallet, WalletError> {
        let path = self.wallet_path(account);
        if !path.exists() {
            return Err(WalletError::NotFound(*account));
        }
        let wallet = Wallet::load(&path)?;
        if wallet.account_id() != *account {
            return Err(WalletError::AddressMismatch {
                stored: *account,
                derived: wallet.account_id(),
            });
        }
        Ok(wallet)
    }
}

/// An ordered set of in-memory wallets
///
/// Index 0 is conventionally the deployer and owner; the rest act as
/// ordinary accounts.
pub struct Signers {
    wallets: Vec<Wallet>,
}

impl Signers {
    /// Generate `count` fresh wallets (at least one)
    pub fn generate(count: usize) -> Self {
        let wallets = (0..count.max(1))
            .map(|i| Wallet::with_label(&format!("signer-{}", i)))
            .collect();
        Self { wallets }
    }

    /// The first signer
    pub fn owner(&self) -> &Wallet {
        &self.wallets[0]
    }

    pub fn accounts(&self) -> Vec<AccountId> {
        self.wallets.iter().map(Wallet::account_id).collect()
    }
}

impl Index<usize> for Signers {
    type Output = Wallet;

    fn index(&self, index: usize) -> &Wallet {
        &self.wallets[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_creation() {
        let wallet = Wallet::new();
        assert_ne!(wallet.account_id(), AccountId::ZERO);
        assert!(!wallet.public_key().is_empty());
        assert!(!wallet.private_key().is_empty());
    }

    #[test]
    fn test_wallet_import() {
        let wallet1 = Wallet::new();
        let private_key = wallet1.private_key();

        let wallet2 = Wallet::from_private_key(&private_key).unwrap();
        assert_eq!(wallet1.account_id(), wallet2.account_id());
    }

    #[test]
    fn test_wallet_save_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("test_wallet.json");

        let wallet1 = Wallet::with_label("Test Wallet");
        wallet1.save(&path).unwrap();

        let wallet2 = Wallet::load(&path).unwrap();
        assert_eq!(wallet1.account_id(), wallet2.account_id());
        assert_eq!(wallet1.label, wallet2.label);
    }

    #[test]
    fn test_manager_create_list_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = WalletManager::new(temp_dir.path()).unwrap();

        let alice = manager.create_wallet(Some("alice")).unwrap();
        let bob = manager.create_wallet(None).unwrap();

        let listed: Vec<AccountId> = manager
            .list_wallets()
            .unwrap()
            .into_iter()
            .map(|w| w.address)
            .collect();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&alice.account_id()));
        assert!(listed.contains(&bob.account_id()));

        let loaded = manager.load_wallet(&alice.account_id()).unwrap();
        assert_eq!(loaded.label.as_deref(), Some("alice"));

        let unknown = AccountId::from_bytes([9; 20]);
        assert!(matches!(
            manager.load_wallet(&unknown),
            Err(WalletError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_wallet_rejects_misfiled_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = WalletManager::new(temp_dir.path()).unwrap();

        let alice = manager.create_wallet(Some("alice")).unwrap();
        let bob = manager.create_wallet(Some("bob")).unwrap();

        // Alice's key filed under Bob's account
        std::fs::copy(
            manager.wallet_path(&alice.account_id()),
            manager.wallet_path(&bob.account_id()),
        )
        .unwrap();

        match manager.load_wallet(&bob.account_id()) {
            Err(WalletError::AddressMismatch { stored, derived }) => {
                assert_eq!(stored, bob.account_id());
                assert_eq!(derived, alice.account_id());
            }
            other => panic!("expected AddressMismatch, got {:?}", other.map(|w| w.account_id())),
        }
    }

    #[test]
    fn test_load_rejects_edited_address() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("wallet.json");

        let wallet = Wallet::new();
        let data = WalletData {
            private_key_hex: wallet.private_key(),
            address: AccountId::from_bytes([7; 20]),
            label: None,
        };
        std::fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();

        assert!(matches!(
            Wallet::load(&path),
            Err(WalletError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn test_signers() {
        let signers = Signers::generate(3);
        let accounts = signers.accounts();

        assert_eq!(accounts.len(), 3);
        assert_eq!(signers.owner().account_id(), accounts[0]);
        assert_eq!(signers[2].account_id(), accounts[2]);
        assert_ne!(accounts[0], accounts[1]);
        assert_ne!(accounts[1], accounts[2]);
        assert_eq!(Signers::generate(0).accounts().len(), 1);
    }

    #[test]
    fn test_wallet_signs_mint_for_ledger() {
        let signers = Signers::generate(2);
        let mut ledger = TokenLedger::deploy(signers.owner().account_id());

        let signed = signers
            .owner()
            .sign_mint(&ledger, signers[1].account_id(), 1000)
            .unwrap();
        ledger.mint_signed(&signed).unwrap();

        assert_eq!(signers[1].balance(&ledger), 1000);
        assert_eq!(signers.owner().balance(&ledger), ledger.total_supply() - 1000);
    }
}
