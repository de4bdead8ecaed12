//! CLI commands for the token ledger
//!
//! Implements all command handlers for the CLI interface.

use crate::storage::{Storage, StorageConfig};
use crate::token::{AccountId, TokenConfig, TokenLedger};
use crate::wallet::WalletManager;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub ledger: Option<TokenLedger>,
    pub storage: Storage,
    pub wallet_manager: WalletManager,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };

        let storage = Storage::new(storage_config)?;
        let wallet_manager = WalletManager::new(&data_dir.join("wallets"))?;

        let ledger = if storage.exists() {
            Some(storage.load()?)
        } else {
            None
        };

        Ok(Self {
            ledger,
            storage,
            wallet_manager,
            data_dir,
        })
    }

    /// The deployed ledger, or an error telling the user to deploy one
    pub fn ledger(&self) -> CliResult<&TokenLedger> {
        self.ledger
            .as_ref()
            .ok_or_else(|| "No ledger deployed. Run: flexitoken deploy --owner <wallet>".into())
    }

    fn ledger_mut(&mut self) -> CliResult<&mut TokenLedger> {
        self.ledger
            .as_mut()
            .ok_or_else(|| "No ledger deployed. Run: flexitoken deploy --owner <wallet>".into())
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(self.ledger()?)?;
        Ok(())
    }
}

/// Deploy a new ledger owned by a local wallet
pub fn cmd_deploy(
    state: &mut AppState,
    owner: &AccountId,
    config: &TokenConfig,
    force: bool,
) -> CliResult<()> {
    if state.ledger.is_some() && !force {
        println!("⚠️  A ledger already exists at {:?}", state.data_dir);
        println!("   Use --force to redeploy (this replaces the existing ledger)");
        return Ok(());
    }

    // The owner must be a wallet we hold keys for, or nobody could mint
    let wallet = state.wallet_manager.load_wallet(owner)?;
    let ledger = TokenLedger::with_config(wallet.account_id(), config)?;

    println!("✅ Token deployed!");
    println!("   🪙 {} ({})", ledger.name(), ledger.symbol());
    println!("   👑 Owner: {}", ledger.owner());
    println!(
        "   💰 Initial supply: {} {}",
        ledger.metadata.format_amount(ledger.total_supply()),
        ledger.symbol()
    );

    state.ledger = Some(ledger);
    state.save()?;

    Ok(())
}

/// Mint tokens, signing the request with the caller's wallet
pub fn cmd_mint(
    state: &mut AppState,
    caller: &AccountId,
    to: &AccountId,
    amount: u128,
) -> CliResult<()> {
    let wallet = state.wallet_manager.load_wallet(caller)?;
    let signed = wallet.sign_mint(state.ledger()?, *to, amount)?;

    let ledger = state.ledger_mut()?;
    let event = ledger.mint_signed(&signed)?;
    let symbol = ledger.symbol().to_string();
    let formatted = ledger.metadata.format_amount(event.amount);
    let supply = ledger.metadata.format_amount(event.new_total_supply);
    let balance = ledger.metadata.format_amount(ledger.balance_of(to));

    state.save()?;

    println!("🪙 Minted {} {} to {}", formatted, symbol, event.to);
    println!("   ├─ New balance: {} {}", balance, symbol);
    println!("   └─ Total supply: {} {}", supply, symbol);

    Ok(())
}

/// Show the balance of an account
pub fn cmd_balance(state: &AppState, account: &AccountId) -> CliResult<()> {
    let ledger = state.ledger()?;
    let balance = ledger.balance_of(account);

    println!("💰 Balance for {}", account);
    println!(
        "   {} {} ({} base units)",
        ledger.metadata.format_amount(balance),
        ledger.symbol(),
        balance
    );

    Ok(())
}

/// Show the total supply
pub fn cmd_supply(state: &AppState) -> CliResult<()> {
    let ledger = state.ledger()?;
    let supply = ledger.total_supply();

    println!(
        "📊 Total supply: {} {} ({} base units)",
        ledger.metadata.format_amount(supply),
        ledger.symbol(),
        supply
    );

    Ok(())
}

/// Display ledger info
pub fn cmd_info(state: &AppState) -> CliResult<()> {
    let ledger = state.ledger()?;
    let stats = state.storage.stats()?;

    println!("🪙 Token Info");
    println!("   ├─ Name: {}", ledger.name());
    println!("   ├─ Symbol: {}", ledger.symbol());
    println!("   ├─ Decimals: {}", ledger.decimals());
    println!("   ├─ Owner: {}", ledger.owner());
    println!(
        "   ├─ Total supply: {}",
        ledger.metadata.format_amount(ledger.total_supply())
    );
    println!("   ├─ Holders: {}", ledger.holder_count());
    println!("   ├─ Mints: {}", ledger.mint_nonce());
    println!(
        "   ├─ Deployed: {}",
        ledger.metadata.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "   └─ Storage: {} bytes, {} backup(s)",
        stats.file_size, stats.backup_count
    );

    if !ledger.check_invariant() {
        println!("\n❌ Total supply does not match the sum of balances!");
    }

    Ok(())
}

/// List holders with non-zero balances
pub fn cmd_holders(state: &AppState, count: usize) -> CliResult<()> {
    let ledger = state.ledger()?;
    let holders = ledger.holders();

    println!("👥 Holders ({}):", holders.len());
    for (account, balance) in holders.iter().take(count) {
        let marker = if *account == ledger.owner() { " 👑" } else { "" };
        println!(
            "   {} - {} {}{}",
            account,
            ledger.metadata.format_amount(*balance),
            ledger.symbol(),
            marker
        );
    }
    if holders.len() > count {
        println!("   ... and {} more", holders.len() - count);
    }

    Ok(())
}

/// Show recent mints
pub fn cmd_history(state: &AppState) -> CliResult<()> {
    let ledger = state.ledger()?;
    let history = ledger.mint_history();

    if history.is_empty() {
        println!("📭 No mints yet");
        return Ok(());
    }

    println!("🧾 Recent mints:");
    for event in history.iter().rev() {
        println!(
            "   {} | {} {} -> {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            ledger.metadata.format_amount(event.amount),
            ledger.symbol(),
            event.to
        );
    }

    Ok(())
}

/// Create a new wallet
pub fn cmd_wallet_new(state: &AppState, label: Option<&str>) -> CliResult<()> {
    let wallet = state.wallet_manager.create_wallet(label)?;

    println!("🔐 New wallet created!");
    println!("   📍 Account: {}", wallet.account_id());
    println!("   🔑 Public Key: {}...", &wallet.public_key()[..32]);
    if let Some(l) = &wallet.label {
        println!("   🏷️  Label: {}", l);
    }
    println!("\n   ⚠️  IMPORTANT: Your private key is stored in the wallets directory.");
    println!("   Back up this directory to avoid losing access to your account!");

    Ok(())
}

/// List all wallets
pub fn cmd_wallet_list(state: &AppState) -> CliResult<()> {
    let wallets = state.wallet_manager.list_wallets()?;

    if wallets.is_empty() {
        println!("📭 No wallets found. Create one with: flexitoken wallet new");
        return Ok(());
    }

    println!("📋 Wallets:");
    for info in &wallets {
        let label = info.label.as_deref().unwrap_or("-");
        match &state.ledger {
            Some(ledger) => println!(
                "   {} ({}) - {} {}",
                info.address,
                label,
                ledger.metadata.format_amount(ledger.balance_of(&info.address)),
                ledger.symbol()
            ),
            None => println!("   {} ({})", info.address, label),
        }
    }

    Ok(())
}

/// Export ledger to file
pub fn cmd_export(state: &AppState, path: &Path) -> CliResult<()> {
    crate::storage::save_to_file(state.ledger()?, path)?;
    println!("📦 Ledger exported to {:?}", path);
    Ok(())
}

/// Import ledger from file
pub fn cmd_import(state: &mut AppState, path: &Path) -> CliResult<()> {
    let ledger = crate::storage::load_from_file(path)?;

    println!("📥 Ledger imported from {:?}", path);
    println!("   {} ({}) owned by {}", ledger.name(), ledger.symbol(), ledger.owner());

    state.ledger = Some(ledger);
    state.save()?;

    Ok(())
}

/// Roll the ledger back to a saved backup (0 is the most recent)
pub fn cmd_restore(state: &mut AppState, backup: usize) -> CliResult<()> {
    let available = state.storage.list_backups();
    if !available.contains(&backup) {
        return Err(format!("Backup {} not found (available: {:?})", backup, available).into());
    }

    let ledger = state.storage.restore_backup(backup)?;

    println!("⏪ Restored backup {}", backup);
    println!(
        "   └─ Total supply: {} {}",
        ledger.metadata.format_amount(ledger.total_supply()),
        ledger.symbol()
    );

    // The state being replaced becomes backup 0
    state.ledger = Some(ledger);
    state.save()?;

    Ok(())
}
