// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error type shared by every THORChain client operation.

/// Errors that can occur while building, signing, broadcasting or querying.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid network (asked: {asked} / returned: {returned})")]
    ChainIdMismatch { asked: String, returned: String },

    #[error("Could not parse chain id")]
    ChainIdUnavailable,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("{0}")]
    InvalidObject(String),

    #[error("Unknown type url: {0}")]
    UnknownTypeUrl(String),

    #[error("No events in logs available")]
    NoEvents,

    #[error("Failed to get transaction data (tx-hash: {0})")]
    MissingTransactionData(String),

    #[error("transaction not found")]
    TransactionNotFound,

    #[error("failed to broadcast transaction: {0}")]
    BroadcastFailed(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid phrase")]
    InvalidPhrase,

    #[error("Phrase not set")]
    PhraseNotSet,

    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Cosmos SDK error: {0}")]
    Cosmos(String),

    #[error("Chain id required for offline signing")]
    ChainIdRequired,
}

impl ClientError {
    /// Wrap an error reported by `cosmrs`.
    pub fn cosmos(err: impl std::fmt::Display) -> Self {
        ClientError::Cosmos(err.to_string())
    }
}
