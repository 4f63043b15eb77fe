// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Client Data Models
//!
//! Chain-agnostic types returned by the client: assets, base-unit amounts,
//! balances, fees and transactions. All types derive `Serialize` and
//! `Deserialize` so callers can hand them straight to a JSON layer.
//!
//! ## Asset Notation
//!
//! Assets are written `CHAIN.SYMBOL` (e.g. `THOR.RUNE`, `ETH.USDT-0xdac1`).
//! Synthetic assets use a slash instead of the dot (`BTC/BTC`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

// =============================================================================
// Assets
// =============================================================================

/// A fungible asset, identified by chain and symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Asset {
    pub chain: String,
    pub symbol: String,
    pub ticker: String,
    pub synth: bool,
}

impl Asset {
    /// Build an asset; the ticker is the symbol up to its first `-`.
    pub fn new(chain: &str, symbol: &str, synth: bool) -> Self {
        let ticker = symbol.split('-').next().unwrap_or(symbol);
        Self {
            chain: chain.to_string(),
            symbol: symbol.to_string(),
            ticker: ticker.to_string(),
            synth,
        }
    }

    /// The native asset of THORChain.
    pub fn rune_native() -> Self {
        Self::new("THOR", "RUNE", false)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiter = if self.synth { '/' } else { '.' };
        write!(f, "{}{}{}", self.chain, delimiter, self.symbol)
    }
}

impl FromStr for Asset {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let synth = s.contains('/');
        let delimiter = if synth { '/' } else { '.' };
        let (chain, symbol) = s
            .split_once(delimiter)
            .ok_or_else(|| ClientError::InvalidObject(format!("invalid asset string: {s}")))?;
        if chain.is_empty() || symbol.is_empty() {
            return Err(ClientError::InvalidObject(format!("invalid asset string: {s}")));
        }
        Ok(Asset::new(chain, symbol, synth))
    }
}

// =============================================================================
// Amounts
// =============================================================================

/// An integer amount in the asset's smallest unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BaseAmount {
    amount: u128,
    decimals: u8,
}

impl BaseAmount {
    pub fn new(amount: u128, decimals: u8) -> Self {
        Self { amount, decimals }
    }

    /// Parse a decimal-string base amount such as `"100000000"`.
    pub fn from_str_with_decimals(value: &str, decimals: u8) -> Result<Self, ClientError> {
        let amount = value
            .trim()
            .parse::<u128>()
            .map_err(|_| ClientError::InvalidAmount(value.to_string()))?;
        Ok(Self::new(amount, decimals))
    }

    pub fn amount(&self) -> u128 {
        self.amount
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Sum of two amounts, saturating at `u128::MAX`.
    pub fn plus(&self, other: BaseAmount) -> BaseAmount {
        Self::new(self.amount.saturating_add(other.amount), self.decimals)
    }

    /// `true` if this amount is strictly lower than `other`.
    pub fn lt(&self, other: BaseAmount) -> bool {
        self.amount < other.amount
    }
}

impl fmt::Display for BaseAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount)
    }
}

/// Balance of one asset held by an address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    pub asset: Asset,
    pub amount: BaseAmount,
}

// =============================================================================
// Fees
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FeeType {
    FlatFee,
    PerByte,
}

/// Fee options. THORChain charges one flat native fee, so all tiers match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fees {
    #[serde(rename = "type")]
    pub fee_type: FeeType,
    pub average: BaseAmount,
    pub fast: BaseAmount,
    pub fastest: BaseAmount,
}

impl Fees {
    /// Same fee for every tier.
    pub fn single(fee_type: FeeType, fee: BaseAmount) -> Self {
        Self {
            fee_type,
            average: fee,
            fast: fee,
            fastest: fee,
        }
    }
}

// =============================================================================
// Transactions
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TxType {
    Transfer,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxFrom {
    pub from: String,
    pub amount: BaseAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxTo {
    pub to: String,
    pub amount: BaseAmount,
}

/// Sender/recipient breakdown parsed from transaction logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxData {
    pub from: Vec<TxFrom>,
    pub to: Vec<TxTo>,
    #[serde(rename = "type")]
    pub tx_type: TxType,
}

/// A transaction as presented to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tx {
    pub hash: String,
    pub asset: Asset,
    pub from: Vec<TxFrom>,
    pub to: Vec<TxTo>,
    /// Block time. `None` for lookups whose source carries no timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub tx_type: TxType,
}

/// One page of transaction history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxsPage {
    /// Number of matching entries before pagination (capped).
    pub total: usize,
    pub txs: Vec<Tx>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_string_round_trip() {
        let rune: Asset = "THOR.RUNE".parse().unwrap();
        assert_eq!(rune, Asset::rune_native());
        assert_eq!(rune.to_string(), "THOR.RUNE");

        let synth: Asset = "BTC/BTC".parse().unwrap();
        assert!(synth.synth);
        assert_eq!(synth.chain, "BTC");
        assert_eq!(synth.to_string(), "BTC/BTC");
    }

    #[test]
    fn asset_ticker_strips_contract_suffix() {
        let usdt: Asset = "ETH.USDT-0xdac17f958d2ee523a2206206994597c13d831ec7".parse().unwrap();
        assert_eq!(usdt.ticker, "USDT");
        assert_eq!(usdt.symbol, "USDT-0xdac17f958d2ee523a2206206994597c13d831ec7");
    }

    #[test]
    fn asset_parse_rejects_missing_parts() {
        assert!("RUNE".parse::<Asset>().is_err());
        assert!("THOR.".parse::<Asset>().is_err());
        assert!(".RUNE".parse::<Asset>().is_err());
    }

    #[test]
    fn base_amount_arithmetic() {
        let balance = BaseAmount::new(100, 8);
        let amount = BaseAmount::new(90, 8);
        let fee = BaseAmount::new(5, 8);
        assert!(!balance.lt(amount.plus(fee)));
        assert!(balance.lt(BaseAmount::new(96, 8).plus(fee)));
    }

    #[test]
    fn base_amount_parse() {
        assert_eq!(
            BaseAmount::from_str_with_decimals("2000000", 8).unwrap().amount(),
            2_000_000
        );
        assert!(BaseAmount::from_str_with_decimals("-1", 8).is_err());
        assert!(BaseAmount::from_str_with_decimals("1.5", 8).is_err());
    }

    #[test]
    fn single_fee_sets_all_tiers() {
        let fees = Fees::single(FeeType::FlatFee, BaseAmount::new(2_000_000, 8));
        assert_eq!(fees.average, fees.fast);
        assert_eq!(fees.fast, fees.fastest);
    }
}
