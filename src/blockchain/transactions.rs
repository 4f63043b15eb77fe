// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction building for THORChain.
//!
//! Deposits (`MsgDeposit`) and bank sends (`MsgSend`) are packed into a
//! Cosmos `TxBody`, wrapped with a single-signer `AuthInfo` and signed in
//! direct mode over the `SignDoc`. The envelope types are `cosmrs::tx`.

use cosmrs::crypto::PublicKey;
use cosmrs::tendermint::chain;
use cosmrs::tx::{self, AuthInfo, Body, Fee, SignDoc, SignerInfo};
use k256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::client::ThornodeClient;
use super::proto::{pack_any, BaseCoin, Coin, MsgDeposit, MsgSend, ThorMsg, TypeRegistry};
use super::signing::{decode_address, sign};
use crate::error::ClientError;
use crate::models::{Asset, BaseAmount};

// =============================================================================
// Native messages
// =============================================================================

/// A coin of a native deposit: asset and base-unit amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgCoin {
    pub asset: Asset,
    pub amount: String,
}

/// A deposit into THORChain, signed by a bech32 account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgNativeTx {
    pub coins: Vec<MsgCoin>,
    pub memo: String,
    pub signer: String,
}

/// Coin amounts are non-negative integers in base units: digits only.
fn check_coin_amount(amount: &str) -> Result<(), ClientError> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClientError::InvalidAmount(amount.to_string()));
    }
    Ok(())
}

impl MsgNativeTx {
    /// Build a deposit message.
    ///
    /// # Arguments
    /// * `coins` - Assets and base-unit amounts to deposit
    /// * `memo` - THORChain memo, e.g. `=:BTC.BTC:bc1q...`
    /// * `signer` - Bech32 address of the depositing account
    ///
    /// # Returns
    /// * `Ok(MsgNativeTx)` - The validated message
    /// * `Err(ClientError::InvalidAmount)` - If a coin amount is not a base-unit integer
    /// * `Err(ClientError::InvalidAddress)` - If the signer is not bech32
    pub fn new(coins: Vec<MsgCoin>, memo: &str, signer: &str) -> Result<Self, ClientError> {
        for coin in &coins {
            check_coin_amount(&coin.amount)?;
        }
        decode_address(signer)?;
        Ok(Self {
            coins,
            memo: memo.to_string(),
            signer: signer.to_string(),
        })
    }

    /// The wire `MsgDeposit`, with the signer as raw account bytes.
    pub fn to_msg_deposit(&self) -> Result<MsgDeposit, ClientError> {
        let (_, signer) = decode_address(&self.signer)?;
        Ok(MsgDeposit {
            coins: self
                .coins
                .iter()
                .map(|coin| Coin {
                    asset: Some((&coin.asset).into()),
                    amount: Some(coin.amount.clone()),
                    decimals: None,
                })
                .collect(),
            memo: Some(self.memo.clone()),
            signer: Some(signer),
        })
    }
}

/// Build a [`MsgNativeTx`] from `{coins, memo, signer}` JSON, with the same
/// checks as [`MsgNativeTx::new`].
pub fn msg_native_tx_from_json(value: &Value) -> Result<MsgNativeTx, ClientError> {
    let msg: MsgNativeTx = serde_json::from_value(value.clone())
        .map_err(|e| ClientError::InvalidObject(format!("invalid MsgNativeTx: {e}")))?;
    MsgNativeTx::new(msg.coins, &msg.memo, &msg.signer)
}

// =============================================================================
// Bodies
// =============================================================================

/// Fail unless the node serves `expected_chain_id`.
///
/// # Returns
/// * `Ok(())` - The node reports the expected chain id
/// * `Err(ClientError::ChainIdMismatch)` - Naming both ids otherwise
pub async fn verify_chain_id(
    node: &ThornodeClient,
    expected_chain_id: &str,
) -> Result<(), ClientError> {
    let returned = node.chain_id().await?;
    if returned != expected_chain_id {
        return Err(ClientError::ChainIdMismatch {
            asked: expected_chain_id.to_string(),
            returned,
        });
    }
    Ok(())
}

/// `TxBody` carrying one `MsgDeposit`.
pub fn deposit_tx_body(msg: &MsgNativeTx) -> Result<Body, ClientError> {
    let deposit = msg.to_msg_deposit()?;
    Ok(Body::new(vec![pack_any(&deposit)], msg.memo.clone(), 0u32))
}

/// Deposit body, after checking the node's chain id.
///
/// # Arguments
/// * `node` - THORNode to ask for its chain id
/// * `msg` - The deposit
/// * `expected_chain_id` - Chain id the transaction will be signed for
pub async fn build_deposit_tx(
    node: &ThornodeClient,
    msg: &MsgNativeTx,
    expected_chain_id: &str,
) -> Result<Body, ClientError> {
    verify_chain_id(node, expected_chain_id).await?;
    deposit_tx_body(msg)
}

/// Inputs of a bank send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTxParams {
    pub from: String,
    pub to: String,
    pub amount: BaseAmount,
    pub denom: String,
    pub memo: Option<String>,
}

/// `TxBody` carrying one `MsgSend` with a single coin.
pub fn transfer_tx_body(params: &TransferTxParams) -> Result<Body, ClientError> {
    let (_, from) = decode_address(&params.from)?;
    let (_, to) = decode_address(&params.to)?;
    let send = MsgSend {
        from_address: Some(from),
        to_address: Some(to),
        amount: vec![BaseCoin {
            denom: Some(params.denom.clone()),
            amount: Some(params.amount.amount().to_string()),
        }],
    };
    Ok(Body::new(
        vec![pack_any(&send)],
        params.memo.clone().unwrap_or_default(),
        0u32,
    ))
}

/// Transfer body, after checking the node's chain id.
///
/// # Arguments
/// * `node` - THORNode to ask for its chain id
/// * `params` - Sender, recipient, amount, denom and memo
/// * `expected_chain_id` - Chain id the transaction will be signed for
pub async fn build_transfer_tx(
    node: &ThornodeClient,
    params: &TransferTxParams,
    expected_chain_id: &str,
) -> Result<Body, ClientError> {
    verify_chain_id(node, expected_chain_id).await?;
    transfer_tx_body(params)
}

// =============================================================================
// Unsigned transactions
// =============================================================================

/// A transaction awaiting its signature.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTx {
    pub body: Body,
    pub auth_info: AuthInfo,
    pub signatures: Vec<Vec<u8>>,
}

/// Wrap `body` for a single signer in direct mode. The fee amount is left
/// empty; THORChain deducts its native fee itself.
///
/// # Arguments
/// * `body` - Transaction body
/// * `signer_pub_key` - Public key of the only signer
/// * `sequence` - The signer's account sequence
/// * `gas_limit` - Gas limit written into the fee
pub fn build_unsigned_tx(
    body: Body,
    signer_pub_key: PublicKey,
    sequence: u64,
    gas_limit: u64,
) -> UnsignedTx {
    let fee = Fee {
        amount: Vec::new(),
        gas_limit,
        payer: None,
        granter: None,
    };
    let auth_info = SignerInfo::single_direct(Some(signer_pub_key), sequence).auth_info(fee);
    UnsignedTx {
        body,
        auth_info,
        signatures: Vec::new(),
    }
}

impl UnsignedTx {
    /// Protobuf `SignDoc` bytes the signer commits to.
    ///
    /// # Arguments
    /// * `chain_id` - Chain the signature is valid on
    /// * `account_number` - The signer's account number
    pub fn sign_doc_bytes(
        &self,
        chain_id: &str,
        account_number: u64,
    ) -> Result<Vec<u8>, ClientError> {
        let chain_id: chain::Id = chain_id.parse().map_err(ClientError::cosmos)?;
        SignDoc::new(&self.body, &self.auth_info, &chain_id, account_number)
            .and_then(SignDoc::into_bytes)
            .map_err(ClientError::cosmos)
    }

    pub fn add_signature(&mut self, signature: Vec<u8>) {
        self.signatures.push(signature);
    }

    /// Sign the sign doc with `key` and attach the signature.
    pub fn sign(
        &mut self,
        key: &SigningKey,
        chain_id: &str,
        account_number: u64,
    ) -> Result<(), ClientError> {
        let sign_doc = self.sign_doc_bytes(chain_id, account_number)?;
        debug!(chain_id, account_number, len = sign_doc.len(), "signing sign doc");
        self.add_signature(sign(key, &sign_doc));
        Ok(())
    }

    /// `TxRaw` bytes ready for broadcast.
    pub fn tx_bytes(&self) -> Result<Vec<u8>, ClientError> {
        let raw = cosmrs::proto::cosmos::tx::v1beta1::TxRaw {
            body_bytes: self.body.clone().into_bytes().map_err(ClientError::cosmos)?,
            auth_info_bytes: self
                .auth_info
                .clone()
                .into_bytes()
                .map_err(ClientError::cosmos)?,
            signatures: self.signatures.clone(),
        };
        tx::Raw::from(raw).to_bytes().map_err(ClientError::cosmos)
    }

    /// Typed messages of the body.
    pub fn messages(&self, registry: &TypeRegistry) -> Result<Vec<ThorMsg>, ClientError> {
        self.body.messages.iter().map(|any| registry.unpack(any)).collect()
    }
}
