// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key management for THORChain accounts.
//!
//! A BIP39 mnemonic is turned into a seed and the seed is walked down a BIP32
//! derivation path such as `44'/931'/0'/0/0` to reach the account's secp256k1
//! key. Addresses are Cosmos account ids: the bech32 encoding of
//! `RIPEMD160(SHA256(compressed pubkey))`.

use cosmrs::bip32::{DerivationPath, XPrv};
use cosmrs::crypto::PublicKey;
use cosmrs::{AccountId, Any};
use k256::ecdsa::{signature::Signer, Signature, SigningKey};

use crate::error::ClientError;

/// Check that `phrase` is a valid BIP39 mnemonic.
pub fn validate_phrase(phrase: &str) -> bool {
    bip39::Mnemonic::parse(phrase).is_ok()
}

/// BIP39 seed of `phrase` with an empty passphrase.
///
/// # Arguments
/// * `phrase` - Space separated mnemonic words
///
/// # Returns
/// * `Ok([u8; 64])` - The seed fed to BIP32
/// * `Err(ClientError::InvalidPhrase)` - If the mnemonic does not parse
pub fn seed_from_phrase(phrase: &str) -> Result<[u8; 64], ClientError> {
    let mnemonic = bip39::Mnemonic::parse(phrase).map_err(|_| ClientError::InvalidPhrase)?;
    Ok(mnemonic.to_seed(""))
}

/// Parse a BIP32 path. The `m/` prefix is optional and `h` may stand in for
/// `'` on hardened components.
pub fn parse_derivation_path(path: &str) -> Result<DerivationPath, ClientError> {
    let trimmed = path.trim();
    let body = trimmed.strip_prefix("m/").unwrap_or(trimmed);
    let normalized = format!("m/{}", body.replace('h', "'"));
    normalized
        .parse()
        .map_err(|_| ClientError::InvalidDerivationPath(path.to_string()))
}

/// Derive the signing key at `path` from a mnemonic.
///
/// # Arguments
/// * `phrase` - BIP39 mnemonic
/// * `path` - Derivation path, e.g. `44'/931'/0'/0/0`
///
/// # Returns
/// * `Ok(SigningKey)` - The secp256k1 key of the account
/// * `Err(ClientError)` - If the phrase, the path or the derivation is invalid
pub fn derive_private_key(phrase: &str, path: &str) -> Result<SigningKey, ClientError> {
    let path = parse_derivation_path(path)?;
    let seed = seed_from_phrase(phrase)?;
    let xprv = XPrv::derive_from_path(seed, &path)
        .map_err(|e| ClientError::KeyDerivation(e.to_string()))?;
    Ok(xprv.private_key().clone())
}

/// The Cosmos view of `key`'s public half.
pub fn cosmos_public_key(key: &SigningKey) -> PublicKey {
    PublicKey::from(*key.verifying_key())
}

/// SEC1 compressed public key of `key`.
pub fn public_key_bytes(key: &SigningKey) -> Vec<u8> {
    cosmos_public_key(key).to_bytes()
}

/// The public key packed as `/cosmos.crypto.secp256k1.PubKey`.
pub fn public_key_any(key: &SigningKey) -> Result<Any, ClientError> {
    cosmos_public_key(key).to_any().map_err(ClientError::cosmos)
}

/// 64-byte `r || s` signature over SHA-256 of `message`.
pub fn sign(key: &SigningKey, message: &[u8]) -> Vec<u8> {
    let signature: Signature = key.sign(message);
    signature.to_bytes().to_vec()
}

// =============================================================================
// Addresses
// =============================================================================

/// Bech32 address of raw account bytes.
pub fn encode_address(prefix: &str, data: &[u8]) -> Result<String, ClientError> {
    AccountId::new(prefix, data)
        .map(|id| id.to_string())
        .map_err(|e| ClientError::InvalidAddress(e.to_string()))
}

/// Address of a compressed secp256k1 public key.
///
/// # Arguments
/// * `public_key` - 33-byte SEC1 compressed key
/// * `prefix` - Bech32 prefix of the network (`thor`, `sthor`, `tthor`)
pub fn address_from_public_key(public_key: &[u8], prefix: &str) -> Result<String, ClientError> {
    let key = cosmrs::tendermint::PublicKey::from_raw_secp256k1(public_key)
        .map(PublicKey::from)
        .ok_or_else(|| ClientError::InvalidAddress(format!("not a secp256k1 key: {}", hex::encode(public_key))))?;
    key.account_id(prefix)
        .map(|id| id.to_string())
        .map_err(|e| ClientError::InvalidAddress(e.to_string()))
}

/// Split a bech32 address into its prefix and raw bytes.
pub fn decode_address(address: &str) -> Result<(String, Vec<u8>), ClientError> {
    let id: AccountId = address
        .parse()
        .map_err(|e| ClientError::InvalidAddress(format!("{address}: {e}")))?;
    Ok((id.prefix().to_string(), id.to_bytes()))
}

/// `true` if `address` is valid bech32 carrying `prefix`.
pub fn validate_address(address: &str, prefix: &str) -> bool {
    matches!(decode_address(address), Ok((hrp, data)) if hrp == prefix && !data.is_empty())
}
