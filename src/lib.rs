// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! THORChain Client - Cosmos SDK client for THORChain
//!
//! Derives keys from a BIP39 phrase, builds and signs `MsgSend` and
//! `MsgDeposit` transactions, and reads balances, fees and history from a
//! THORNode.
//!
//! ## Modules
//!
//! - `blockchain` - THORChain wire types, keys, node access and tx building
//! - `client` - the [`Client`](client::Client) facade
//! - `config` - environment variables of the CLI
//! - `error` - the crate error type
//! - `models` - assets, amounts, balances, fees and transactions

pub mod blockchain;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Client, ClientParams};
pub use error::ClientError;
