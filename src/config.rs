// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! Environment variable names read by the `thorchain-cli` binary. Every
//! variable has a matching command-line flag that takes precedence.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `THORCHAIN_NETWORK` | Network (`mainnet`, `stagenet`, `testnet`) | `testnet` |
//! | `THORNODE_URL` | THORNode REST endpoint | Public endpoint of the network |
//! | `THORCHAIN_RPC_URL` | Tendermint RPC endpoint | Public endpoint of the network |
//! | `THORCHAIN_CHAIN_ID` | Expected chain id | Fetched from the node |
//! | `THORCHAIN_PHRASE` | BIP39 phrase for key-based commands | Required for signing |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

/// Environment variable name for the active network.
pub const NETWORK_ENV: &str = "THORCHAIN_NETWORK";

/// Environment variable name for the THORNode REST endpoint.
///
/// Overrides the node URL of the active network only.
pub const NODE_URL_ENV: &str = "THORNODE_URL";

/// Environment variable name for the Tendermint RPC endpoint.
///
/// History searches go through this endpoint.
pub const RPC_URL_ENV: &str = "THORCHAIN_RPC_URL";

/// Environment variable name for the expected chain id.
///
/// Built transactions are checked against the node's chain id before
/// signing. When unset, the id the node reports is used.
pub const CHAIN_ID_ENV: &str = "THORCHAIN_CHAIN_ID";

/// Environment variable name for the wallet phrase.
///
/// # Security
/// The phrase controls every derived key. Prefer the environment over the
/// command line so it stays out of shell history.
pub const PHRASE_ENV: &str = "THORCHAIN_PHRASE";

/// Environment variable name for the log output format.
///
/// # Values
/// - `json` - structured JSON lines
/// - anything else - human-readable output
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";
