//! FlexiToken CLI Application
//!
//! A command-line interface for deploying and minting the token.

use clap::{Parser, Subcommand};
use flexitoken::cli::{self, AppState};
use flexitoken::token::{AccountId, TokenConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flexitoken")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "An owner-mintable fungible token ledger", long_about = None)]
struct Cli {
    /// Data directory for ledger storage
    #[arg(short, long, default_value = ".flexitoken_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a new token ledger
    Deploy {
        /// Wallet account that becomes the owner
        #[arg(short, long)]
        owner: AccountId,

        /// Token name
        #[arg(long)]
        name: Option<String>,

        /// Token symbol
        #[arg(long)]
        symbol: Option<String>,

        /// Decimal places
        #[arg(long)]
        decimals: Option<u8>,

        /// Initial supply in base units
        #[arg(long)]
        supply: Option<u128>,

        /// Replace an existing ledger
        #[arg(long)]
        force: bool,
    },

    /// Mint new tokens (owner only)
    Mint {
        /// Wallet account signing the mint
        #[arg(short, long)]
        caller: AccountId,

        /// Recipient account
        #[arg(short, long)]
        to: AccountId,

        /// Amount in base units
        #[arg(short, long)]
        amount: u128,
    },

    /// Show an account's balance
    Balance {
        /// Account to query
        #[arg(short, long)]
        account: AccountId,
    },

    /// Show the total supply
    Supply,

    /// Display token information
    Info,

    /// List token holders
    Holders {
        /// Number of holders to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Show recent mints
    History,

    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Export ledger to file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import ledger from file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Restore the ledger from a backup
    Restore {
        /// Backup index (0 is the most recent)
        #[arg(short, long, default_value = "0")]
        backup: usize,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create a new wallet
    New {
        /// Optional label for the wallet
        #[arg(short, long)]
        label: Option<String>,
    },

    /// List all wallets
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut state = AppState::new(cli.data_dir.clone())?;

    match cli.command {
        Commands::Deploy {
            owner,
            name,
            symbol,
            decimals,
            supply,
            force,
        } => {
            let defaults = TokenConfig::default();
            let config = TokenConfig {
                name: name.unwrap_or(defaults.name),
                symbol: symbol.unwrap_or(defaults.symbol),
                decimals: decimals.unwrap_or(defaults.decimals),
                initial_supply: supply.unwrap_or(defaults.initial_supply),
            };
            cli::cmd_deploy(&mut state, &owner, &config, force)?;
        }

        Commands::Mint { caller, to, amount } => {
            cli::cmd_mint(&mut state, &caller, &to, amount)?;
        }

        Commands::Balance { account } => {
            cli::cmd_balance(&state, &account)?;
        }

        Commands::Supply => {
            cli::cmd_supply(&state)?;
        }

        Commands::Info => {
            cli::cmd_info(&state)?;
        }

        Commands::Holders { count } => {
            cli::cmd_holders(&state, count)?;
        }

        Commands::History => {
            cli::cmd_history(&state)?;
        }

        Commands::Wallet { action } => match action {
            WalletCommands::New { label } => {
                cli::cmd_wallet_new(&state, label.as_deref())?;
            }
            WalletCommands::List => {
                cli::cmd_wallet_list(&state)?;
            }
        },

        Commands::Export { output } => {
            cli::cmd_export(&state, &output)?;
        }

        Commands::Import { input } => {
            cli::cmd_import(&mut state, &input)?;
        }

        Commands::Restore { backup } => {
            cli::cmd_restore(&mut state, backup)?;
        }
    }

    Ok(())
}
