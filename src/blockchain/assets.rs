// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Denominations, balances and small asset helpers.

use base64ct::{Base64, Encoding as _};
use serde::Deserialize;

use super::proto;
use super::types::{DECIMAL, DEFAULT_FEE, DENOM_RUNE_NATIVE};
use crate::error::ClientError;
use crate::models::{Asset, BaseAmount, Balance, FeeType, Fees};

/// `true` if `asset` is `THOR.RUNE`.
pub fn is_asset_rune_native(asset: &Asset) -> bool {
    asset.to_string() == Asset::rune_native().to_string()
}

/// Chain-level denomination of `asset`.
pub fn get_denom(asset: &Asset) -> String {
    if is_asset_rune_native(asset) {
        return DENOM_RUNE_NATIVE.to_string();
    }
    if asset.synth {
        return asset.to_string().to_lowercase();
    }
    asset.symbol.to_lowercase()
}

/// Asset of a chain-level denomination.
///
/// `rune` is the native asset; other denoms are parsed upper-cased as an asset
/// string, and a bare symbol is taken to live on THORChain. `None` if the
/// denom cannot be read as an asset.
pub fn asset_from_denom(denom: &str) -> Option<Asset> {
    if denom == DENOM_RUNE_NATIVE {
        return Some(Asset::rune_native());
    }
    let upper = denom.to_uppercase();
    if upper.is_empty() {
        return None;
    }
    if upper.contains('.') || upper.contains('/') {
        return upper.parse().ok();
    }
    Some(Asset::new("THOR", &upper, false))
}

/// Fees used when the node cannot be asked: 0.02 RUNE flat.
pub fn default_fees() -> Fees {
    Fees::single(FeeType::FlatFee, BaseAmount::new(DEFAULT_FEE, DECIMAL))
}

/// Text encoding of raw transaction data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Base64,
    Hex,
}

/// Message type carried in raw transaction data: the decoded text without
/// its four-byte length prefix.
pub fn tx_type(data: &str, encoding: Encoding) -> Result<String, ClientError> {
    let bytes = match encoding {
        Encoding::Base64 => Base64::decode_vec(data)
            .map_err(|e| ClientError::InvalidObject(format!("invalid base64 tx data: {e}")))?,
        Encoding::Hex => hex::decode(data)
            .map_err(|e| ClientError::InvalidObject(format!("invalid hex tx data: {e}")))?,
    };
    Ok(String::from_utf8_lossy(&bytes).chars().skip(4).collect())
}

/// `{denom, amount}` pair as returned by the bank module.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DenomAmount {
    pub denom: String,
    pub amount: String,
}

/// Map raw bank balances to [`Balance`]s, keeping only `assets` when given.
/// Unreadable denoms are reported as the native asset.
pub fn balances_from_denoms(
    coins: &[DenomAmount],
    assets: Option<&[Asset]>,
) -> Result<Vec<Balance>, ClientError> {
    let mut balances = Vec::with_capacity(coins.len());
    for coin in coins {
        let asset = asset_from_denom(&coin.denom).unwrap_or_else(Asset::rune_native);
        if let Some(assets) = assets {
            let canonical = asset.to_string();
            if !assets.iter().any(|a| a.to_string() == canonical) {
                continue;
            }
        }
        balances.push(Balance {
            asset,
            amount: BaseAmount::from_str_with_decimals(&coin.amount, DECIMAL)?,
        });
    }
    Ok(balances)
}

impl From<&Asset> for proto::Asset {
    fn from(asset: &Asset) -> Self {
        proto::Asset {
            chain: Some(asset.chain.clone()),
            symbol: Some(asset.symbol.clone()),
            ticker: Some(asset.ticker.clone()),
            synth: Some(asset.synth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rune_denom_round_trip() {
        let rune = Asset::rune_native();
        assert!(is_asset_rune_native(&rune));
        assert_eq!(get_denom(&rune), "rune");
        assert_eq!(asset_from_denom(&get_denom(&rune)), Some(rune));
    }

    #[test]
    fn synth_and_token_denoms() {
        let synth: Asset = "BTC/BTC".parse().unwrap();
        assert_eq!(get_denom(&synth), "btc/btc");
        assert_eq!(asset_from_denom("btc/btc"), Some(synth));

        let token: Asset = "ETH.USDT-0XDAC".parse().unwrap();
        assert_eq!(get_denom(&token), "usdt-0xdac");
    }

    #[test]
    fn bare_symbol_resolves_to_thor() {
        let asset = asset_from_denom("tcy").unwrap();
        assert_eq!(asset.to_string(), "THOR.TCY");
        assert_eq!(asset_from_denom("btc."), None);
        assert_eq!(asset_from_denom(""), None);
    }

    #[test]
    fn balances_are_filtered_by_canonical_string() {
        let coins = vec![
            DenomAmount {
                denom: "rune".to_string(),
                amount: "100".to_string(),
            },
            DenomAmount {
                denom: "btc/btc".to_string(),
                amount: "7".to_string(),
            },
        ];
        let all = balances_from_denoms(&coins, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].amount, BaseAmount::new(100, 8));

        let only_synth = [Asset::new("BTC", "BTC", true)];
        let filtered = balances_from_denoms(&coins, Some(&only_synth)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].asset.to_string(), "BTC/BTC");
    }

    #[test]
    fn unreadable_amount_is_an_error() {
        let coins = vec![DenomAmount {
            denom: "rune".to_string(),
            amount: "lots".to_string(),
        }];
        assert!(matches!(
            balances_from_denoms(&coins, None),
            Err(ClientError::InvalidAmount(_))
        ));
    }

    #[test]
    fn tx_type_strips_prefix() {
        let mut raw = vec![0u8, 0, 0, 9];
        raw.extend_from_slice(b"MsgSend");
        assert_eq!(tx_type(&hex::encode(&raw), Encoding::Hex).unwrap(), "MsgSend");
        assert_eq!(
            tx_type(&Base64::encode_string(&raw), Encoding::Base64).unwrap(),
            "MsgSend"
        );
        assert!(tx_type("zz", Encoding::Hex).is_err());
    }

    #[test]
    fn default_fees_are_flat() {
        let fees = default_fees();
        assert_eq!(fees.fee_type, FeeType::FlatFee);
        assert_eq!(fees.average.amount(), 2_000_000);
    }

    #[test]
    fn wire_asset_sets_every_field() {
        let wire = proto::Asset::from(&Asset::rune_native());
        assert_eq!(wire.synth, Some(false));
        assert_eq!(wire.ticker.as_deref(), Some("RUNE"));
    }
}
