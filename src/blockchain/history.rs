// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction history: merging the two directional RPC searches, paging
//! the merged feed and reading transfers out of transaction logs.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::types::{DECIMAL, MAX_TX_COUNT};
use crate::error::ClientError;
use crate::models::{BaseAmount, TxData, TxFrom, TxTo, TxType};

/// One `tx_search` hit.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcTxResult {
    pub hash: String,
    pub height: u64,
    /// The hit as returned by the RPC node.
    pub raw: Value,
}

impl RpcTxResult {
    pub fn from_value(value: &Value) -> Result<Self, ClientError> {
        let hash = value
            .get("hash")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::InvalidResponse(format!("tx_search hit without hash: {value}")))?;
        let height = match value.get("height") {
            Some(Value::String(s)) => s.parse().ok(),
            Some(Value::Number(n)) => n.as_u64(),
            _ => None,
        }
        .ok_or_else(|| ClientError::InvalidResponse(format!("tx_search hit without height: {hash}")))?;

        Ok(Self {
            hash: hash.to_string(),
            height,
            raw: value.clone(),
        })
    }
}

/// Merge received and sent transfers into one feed: newest block first,
/// ties by descending hash, each hash once.
pub fn merge_history(incoming: Vec<RpcTxResult>, outgoing: Vec<RpcTxResult>) -> Vec<RpcTxResult> {
    let mut history = incoming;
    history.extend(outgoing);
    history.sort_by(|a, b| b.height.cmp(&a.height).then_with(|| b.hash.cmp(&a.hash)));
    history.dedup_by(|next, kept| next.hash == kept.hash);
    history
}

/// A window of the merged history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    /// Entries that passed the filter, capped at `MAX_TX_COUNT`.
    pub total: usize,
    pub entries: Vec<RpcTxResult>,
}

/// Filter, cap and window `history`.
pub fn paginate(
    history: Vec<RpcTxResult>,
    offset: usize,
    limit: usize,
    filter: Option<&(dyn Fn(&RpcTxResult) -> bool + Send + Sync)>,
) -> HistoryPage {
    let kept: Vec<RpcTxResult> = history
        .into_iter()
        .filter(|entry| filter.map_or(true, |f| f(entry)))
        .take(MAX_TX_COUNT)
        .collect();
    let total = kept.len();
    let entries = kept.into_iter().skip(offset).take(limit).collect();
    HistoryPage { total, entries }
}

// =============================================================================
// Logs
// =============================================================================

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TxLog {
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub events: Option<Vec<TxEvent>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub attributes: Vec<TxEventAttribute>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TxEventAttribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Default)]
struct Transfer {
    sender: String,
    recipient: String,
    amount: String,
}

/// Amount of a `transfer` event such as `123rune`.
fn transfer_amount(value: &str) -> Result<BaseAmount, ClientError> {
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ClientError::InvalidAmount(value.to_string()));
    }
    BaseAmount::from_str_with_decimals(&digits, DECIMAL)
}

/// Transfers touching `address` in the `transfer` events of the first log.
///
/// Event attributes come in `sender`, `recipient`, `amount` order; every
/// third attribute starts a new transfer. Only the amounts of transfers
/// touching `address` are read; an unreadable one counts as zero.
pub fn get_deposit_tx_data_from_logs(logs: &[TxLog], address: &str) -> Result<TxData, ClientError> {
    let events = logs
        .first()
        .and_then(|log| log.events.as_ref())
        .ok_or(ClientError::NoEvents)?;

    let mut transfers: Vec<Transfer> = Vec::new();
    for event in events.iter().filter(|e| e.event_type == "transfer") {
        for (index, attribute) in event.attributes.iter().enumerate() {
            if index % 3 == 0 {
                transfers.push(Transfer::default());
            }
            let Some(current) = transfers.last_mut() else {
                continue;
            };
            match attribute.key.as_str() {
                "sender" => current.sender = attribute.value.clone(),
                "recipient" => current.recipient = attribute.value.clone(),
                "amount" => current.amount = attribute.value.clone(),
                _ => {}
            }
        }
    }

    let mut data = TxData {
        from: Vec::new(),
        to: Vec::new(),
        tx_type: TxType::Transfer,
    };
    for transfer in transfers
        .into_iter()
        .filter(|t| t.sender == address || t.recipient == address)
    {
        let amount = transfer_amount(&transfer.amount).unwrap_or_else(|_| {
            debug!(amount = %transfer.amount, "unreadable transfer amount, counting zero");
            BaseAmount::new(0, DECIMAL)
        });
        data.from.push(TxFrom {
            from: transfer.sender,
            amount,
        });
        data.to.push(TxTo {
            to: transfer.recipient,
            amount,
        });
    }
    Ok(data)
}
