// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! THORChain integration.
//!
//! - `types` - networks, endpoints and chain constants
//! - `proto` - wire messages, plain-object conversion and the type registry
//! - `signing` - phrase handling, key derivation, addresses and signatures
//! - `assets` - denominations, balances and default fees
//! - `client` - THORNode REST and Tendermint RPC access
//! - `history` - merging, paging and parsing transaction history
//! - `transactions` - building and signing transaction bodies

pub mod assets;
pub mod client;
pub mod history;
pub mod proto;
pub mod signing;
pub mod transactions;
pub mod types;

pub use client::{get_chain_id, get_chain_ids, ThornodeClient};
pub use types::*;
