//! Token configuration and metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ledger::LedgerError;

/// Decimal places of the default token
pub const DEFAULT_DECIMALS: u8 = 18;

/// Supply minted to the owner at deployment: one million whole tokens
pub const INITIAL_SUPPLY: u128 = 1_000_000 * 10u128.pow(DEFAULT_DECIMALS as u32);

/// Deployment parameters for a ledger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Base units minted to the owner on deployment
    pub initial_supply: u128,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "FlexiToken".to_string(),
            symbol: "FLEXI".to_string(),
            decimals: DEFAULT_DECIMALS,
            initial_supply: INITIAL_SUPPLY,
        }
    }
}

impl TokenConfig {
    /// Check the config against the metadata rules
    pub fn validate(&self) -> Result<(), LedgerError> {
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > 50 {
            return Err(LedgerError::InvalidName);
        }

        let symbol_len = self.symbol.chars().count();
        if symbol_len == 0 || symbol_len > 10 {
            return Err(LedgerError::InvalidSymbol);
        }

        if self.decimals > 18 {
            return Err(LedgerError::InvalidDecimals);
        }

        if self.initial_supply == 0 {
            return Err(LedgerError::InvalidSupply);
        }

        Ok(())
    }
}

/// Token metadata (immutable after deployment)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    /// Token name (e.g., "FlexiToken")
    pub name: String,
    /// Token symbol (e.g., "FLEXI")
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
    /// Supply minted at deployment
    pub initial_supply: u128,
    /// Timestamp when deployed
    pub created_at: DateTime<Utc>,
}

impl TokenMetadata {
    /// Create metadata from a validated config
    pub fn from_config(config: &TokenConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self::unchecked(config))
    }

    pub(crate) fn unchecked(config: &TokenConfig) -> Self {
        Self {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            initial_supply: config.initial_supply,
            created_at: Utc::now(),
        }
    }

    /// Render a base-unit amount with the decimal point in place
    pub fn format_amount(&self, amount: u128) -> String {
        if self.decimals == 0 {
            return amount.to_string();
        }

        let scale = 10u128.pow(self.decimals as u32);
        let whole = amount / scale;
        let frac = amount % scale;
        if frac == 0 {
            return whole.to_string();
        }

        let frac = format!("{:0width$}", frac, width = self.decimals as usize);
        format!("{}.{}", whole, frac.trim_end_matches('0'))
    }
}
