// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # THORChain Client
//!
//! [`Client`] ties key derivation, transaction building, signing and the node
//! endpoints together for one active network.
//!
//! ## Send pipeline
//!
//! `deposit` and `transfer` run the same steps:
//!
//! 1. fetch balances of the sending address
//! 2. check funds against the current native fee
//! 3. build the body (after verifying the node's chain id)
//! 4. fetch account number and sequence
//! 5. sign in direct mode
//! 6. broadcast in sync mode
//!
//! Any failure stops the pipeline and is returned as is. `get_fees` is the
//! one exception: a failed or invalid fee lookup falls back to
//! [`DEFAULT_FEE`](crate::blockchain::types::DEFAULT_FEE).

use chrono::{DateTime, Utc};
use k256::ecdsa::SigningKey;
use tracing::{debug, warn};

use crate::blockchain::assets::{
    balances_from_denoms, default_fees, get_denom, is_asset_rune_native,
};
use crate::blockchain::client::{ThornodeClient, TransferRole};
use crate::blockchain::history::{get_deposit_tx_data_from_logs, merge_history, paginate, RpcTxResult};
use crate::blockchain::signing::{
    address_from_public_key, cosmos_public_key, derive_private_key, public_key_bytes,
    validate_address, validate_phrase,
};
use crate::blockchain::transactions::{
    build_deposit_tx, build_transfer_tx, build_unsigned_tx, transfer_tx_body, MsgCoin,
    MsgNativeTx, TransferTxParams,
};
use crate::blockchain::types::{
    default_client_url, default_explorer_urls, default_root_derivation_paths, explorer_address_url,
    explorer_tx_url, explorer_url, get_prefix, ChainIds, ClientUrl, ExplorerUrls, Network,
    NodeUrl, RootDerivationPaths, DECIMAL, DEFAULT_GAS_VALUE, DEPOSIT_GAS_VALUE,
};
use crate::error::ClientError;
use crate::models::{Asset, Balance, BaseAmount, FeeType, Fees, Tx, TxFrom, TxTo, TxType, TxsPage};

const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Construction parameters. Chain ids are required; everything else has a
/// default.
#[derive(Debug, Clone)]
pub struct ClientParams {
    pub network: Network,
    pub phrase: Option<String>,
    pub client_url: Option<ClientUrl>,
    pub explorer_urls: Option<ExplorerUrls>,
    pub root_derivation_paths: Option<RootDerivationPaths>,
    pub chain_ids: ChainIds,
}

impl ClientParams {
    pub fn new(chain_ids: ChainIds) -> Self {
        Self {
            network: Network::default(),
            phrase: None,
            client_url: None,
            explorer_urls: None,
            root_derivation_paths: None,
            chain_ids,
        }
    }
}

/// Predicate applied to merged history entries.
pub type HistoryFilter = Box<dyn Fn(&RpcTxResult) -> bool + Send + Sync>;

/// Options of [`Client::list_transactions`].
pub struct TxHistoryParams {
    /// Defaults to the wallet's first address.
    pub address: Option<String>,
    pub offset: usize,
    /// `0` means the default page size.
    pub limit: usize,
    pub filter: Option<HistoryFilter>,
}

impl Default for TxHistoryParams {
    fn default() -> Self {
        Self {
            address: None,
            offset: 0,
            limit: DEFAULT_HISTORY_LIMIT,
            filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositParams {
    pub wallet_index: u32,
    pub asset: Asset,
    pub amount: BaseAmount,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxParams {
    pub wallet_index: u32,
    pub asset: Asset,
    pub amount: BaseAmount,
    pub recipient: String,
    pub memo: Option<String>,
}

/// A transfer signed without asking the node for balances or account state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOfflineParams {
    pub tx: TxParams,
    pub from_rune_balance: BaseAmount,
    /// Only consulted for non-native assets.
    pub from_asset_balance: BaseAmount,
    pub from_account_number: u64,
    pub from_sequence: u64,
}

/// Native assets pay `amount + fee` in RUNE; other assets need `amount` of
/// themselves and `fee` in RUNE.
pub fn check_funds(
    asset: &Asset,
    amount: BaseAmount,
    fee: BaseAmount,
    rune_balance: BaseAmount,
    asset_balance: BaseAmount,
) -> Result<(), ClientError> {
    let insufficient = if is_asset_rune_native(asset) {
        rune_balance.lt(amount.plus(fee))
    } else {
        asset_balance.lt(amount) || rune_balance.lt(fee)
    };
    if insufficient {
        return Err(ClientError::InsufficientFunds);
    }
    Ok(())
}

pub struct Client {
    network: Network,
    phrase: Option<String>,
    client_url: ClientUrl,
    explorer_urls: ExplorerUrls,
    chain_ids: ChainIds,
    root_derivation_paths: RootDerivationPaths,
    node: ThornodeClient,
}

impl Client {
    pub fn new(params: ClientParams) -> Result<Self, ClientError> {
        if let Some(phrase) = &params.phrase {
            if !validate_phrase(phrase) {
                return Err(ClientError::InvalidPhrase);
            }
        }
        let client_url = params.client_url.unwrap_or_else(default_client_url);
        let node = ThornodeClient::new(client_url.get(params.network))?;

        Ok(Self {
            network: params.network,
            phrase: params.phrase,
            client_url,
            explorer_urls: params.explorer_urls.unwrap_or_else(default_explorer_urls),
            chain_ids: params.chain_ids,
            root_derivation_paths: params
                .root_derivation_paths
                .unwrap_or_else(default_root_derivation_paths),
            node,
        })
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn set_network(&mut self, network: Network) -> Result<(), ClientError> {
        self.node = ThornodeClient::new(self.client_url.get(network))?;
        self.network = network;
        Ok(())
    }

    /// Endpoints of the active network.
    pub fn client_url(&self) -> &NodeUrl {
        self.client_url.get(self.network)
    }

    pub fn set_client_url(&mut self, client_url: ClientUrl) -> Result<(), ClientError> {
        self.node = ThornodeClient::new(client_url.get(self.network))?;
        self.client_url = client_url;
        Ok(())
    }

    pub fn set_explorer_urls(&mut self, urls: ExplorerUrls) {
        self.explorer_urls = urls;
    }

    pub fn explorer_url(&self) -> &str {
        explorer_url(&self.explorer_urls, self.network)
    }

    pub fn explorer_address_url(&self, address: &str) -> String {
        explorer_address_url(&self.explorer_urls, self.network, address)
    }

    pub fn explorer_tx_url(&self, tx_id: &str) -> String {
        explorer_tx_url(&self.explorer_urls, self.network, tx_id)
    }

    /// Chain id configured for the active network.
    pub fn chain_id(&self) -> &str {
        self.chain_ids.get(self.network)
    }

    pub fn set_chain_id(&mut self, chain_id: &str, network: Network) {
        self.chain_ids.set(network, chain_id.to_string());
    }

    pub fn node(&self) -> &ThornodeClient {
        &self.node
    }

    // -------------------------------------------------------------------------
    // Keys
    // -------------------------------------------------------------------------

    /// Replace the phrase; returns the first address it controls.
    pub fn set_phrase(&mut self, phrase: &str) -> Result<String, ClientError> {
        if !validate_phrase(phrase) {
            return Err(ClientError::InvalidPhrase);
        }
        self.phrase = Some(phrase.to_string());
        self.address(0)
    }

    /// Forget the phrase.
    pub fn purge(&mut self) {
        self.phrase = None;
    }

    pub fn derivation_path(&self, index: u32) -> String {
        format!("{}{}", self.root_derivation_paths.get(self.network), index)
    }

    pub fn private_key(&self, index: u32) -> Result<SigningKey, ClientError> {
        let phrase = self.phrase.as_deref().ok_or(ClientError::PhraseNotSet)?;
        derive_private_key(phrase, &self.derivation_path(index))
    }

    /// Compressed secp256k1 public key.
    pub fn public_key(&self, index: u32) -> Result<Vec<u8>, ClientError> {
        Ok(public_key_bytes(&self.private_key(index)?))
    }

    pub fn address(&self, index: u32) -> Result<String, ClientError> {
        address_from_public_key(&self.public_key(index)?, get_prefix(self.network))
    }

    /// `true` for bech32 addresses of the active network.
    pub fn validate_address(&self, address: &str) -> bool {
        validate_address(address, get_prefix(self.network))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub async fn get_balance(
        &self,
        address: &str,
        assets: Option<&[Asset]>,
    ) -> Result<Vec<Balance>, ClientError> {
        let coins = self.node.balances(address).await?;
        balances_from_denoms(&coins, assets)
    }

    /// Merged sent and received transfers of an address, one page at a time.
    pub async fn list_transactions(&self, params: TxHistoryParams) -> Result<TxsPage, ClientError> {
        let address = match params.address {
            Some(address) => address,
            None => self.address(0)?,
        };
        let limit = if params.limit == 0 {
            DEFAULT_HISTORY_LIMIT
        } else {
            params.limit
        };

        let (incoming, outgoing) = tokio::try_join!(
            self.node.search_transfers(TransferRole::Recipient, &address),
            self.node.search_transfers(TransferRole::Sender, &address),
        )?;
        debug!(
            address = %address,
            incoming = incoming.len(),
            outgoing = outgoing.len(),
            "searched transfer history"
        );

        let history = merge_history(incoming, outgoing);
        let page = paginate(history, params.offset, limit, params.filter.as_deref());

        let txs = futures_util::future::try_join_all(
            page.entries
                .iter()
                .map(|entry| self.get_transaction_data(&entry.hash, &address)),
        )
        .await?;

        Ok(TxsPage {
            total: page.total,
            txs,
        })
    }

    /// Transfers of `address` within the transaction `tx_id`.
    pub async fn get_transaction_data(&self, tx_id: &str, address: &str) -> Result<Tx, ClientError> {
        let response = self.node.tx(tx_id).await?;
        let logs = response
            .logs
            .as_ref()
            .ok_or_else(|| ClientError::MissingTransactionData(tx_id.to_string()))?;
        let data = get_deposit_tx_data_from_logs(logs, address)?;

        let date = response
            .timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc));

        Ok(Tx {
            hash: tx_id.to_string(),
            asset: Asset::rune_native(),
            from: data.from,
            to: data.to,
            date,
            tx_type: data.tx_type,
        })
    }

    /// An inbound transaction as observed by THORChain. Carries no date.
    pub async fn get_deposit_transaction(&self, tx_id: &str) -> Result<Tx, ClientError> {
        let observed = self.node.observed_tx(tx_id).await?;

        let mut from = Vec::with_capacity(observed.coins.len());
        let mut to = Vec::with_capacity(observed.coins.len());
        for coin in &observed.coins {
            let amount = BaseAmount::from_str_with_decimals(&coin.amount, DECIMAL)?;
            from.push(TxFrom {
                from: observed.from_address.clone(),
                amount,
            });
            to.push(TxTo {
                to: observed.to_address.clone(),
                amount,
            });
        }
        let asset = observed
            .coins
            .last()
            .and_then(|coin| coin.asset.parse().ok())
            .unwrap_or_else(Asset::rune_native);

        Ok(Tx {
            hash: tx_id.to_string(),
            asset,
            from,
            to,
            date: None,
            tx_type: TxType::Transfer,
        })
    }

    /// The node's native fee, or the default fee if it cannot be read.
    pub async fn get_fees(&self) -> Fees {
        match self.node.native_fee().await {
            Ok(fee) if fee >= 0 => {
                Fees::single(FeeType::FlatFee, BaseAmount::new(fee as u128, DECIMAL))
            }
            Ok(fee) => {
                warn!(fee, "node reported a negative native fee, using default fee");
                default_fees()
            }
            Err(e) => {
                warn!(error = %e, "failed to query native fee, using default fee");
                default_fees()
            }
        }
    }

    // -------------------------------------------------------------------------
    // Sending
    // -------------------------------------------------------------------------

    async fn check_balances(
        &self,
        address: &str,
        asset: &Asset,
        amount: BaseAmount,
    ) -> Result<(), ClientError> {
        let balances = self.get_balance(address, None).await?;
        let zero = BaseAmount::new(0, DECIMAL);
        let rune_balance = balances
            .iter()
            .find(|b| is_asset_rune_native(&b.asset))
            .map_or(zero, |b| b.amount);
        let asset_balance = balances
            .iter()
            .find(|b| b.asset.to_string() == asset.to_string())
            .map_or(zero, |b| b.amount);
        debug!(%address, %rune_balance, %asset_balance, "balances fetched");

        let fee = self.get_fees().await.average;
        check_funds(asset, amount, fee, rune_balance, asset_balance)?;
        debug!(%asset, %amount, %fee, "funds checked");
        Ok(())
    }

    /// Deposit into THORChain with `MsgDeposit`; returns the tx hash.
    pub async fn deposit(&self, params: DepositParams) -> Result<String, ClientError> {
        let key = self.private_key(params.wallet_index)?;
        let address = self.address(params.wallet_index)?;
        debug!(%address, asset = %params.asset, amount = %params.amount, "deposit started");

        self.check_balances(&address, &params.asset, params.amount)
            .await?;

        let msg = MsgNativeTx::new(
            vec![MsgCoin {
                asset: params.asset.clone(),
                amount: params.amount.amount().to_string(),
            }],
            &params.memo,
            &address,
        )?;
        let body = build_deposit_tx(&self.node, &msg, self.chain_id()).await?;
        debug!("deposit tx built");

        let account = self.node.account(&address).await?;
        let mut unsigned =
            build_unsigned_tx(body, cosmos_public_key(&key), account.sequence, DEPOSIT_GAS_VALUE);
        unsigned.sign(&key, self.chain_id(), account.account_number)?;
        debug!(sequence = account.sequence, "deposit tx signed");

        self.node.broadcast(&unsigned.tx_bytes()?).await
    }

    /// Send with `MsgSend`; returns the tx hash.
    pub async fn transfer(&self, params: TxParams) -> Result<String, ClientError> {
        let key = self.private_key(params.wallet_index)?;
        let address = self.address(params.wallet_index)?;
        debug!(%address, recipient = %params.recipient, asset = %params.asset, amount = %params.amount, "transfer started");

        self.check_balances(&address, &params.asset, params.amount)
            .await?;

        let transfer = TransferTxParams {
            from: address.clone(),
            to: params.recipient.clone(),
            amount: params.amount,
            denom: get_denom(&params.asset),
            memo: params.memo.clone(),
        };
        let body = build_transfer_tx(&self.node, &transfer, self.chain_id()).await?;
        debug!("transfer tx built");

        let account = self.node.account(&address).await?;
        let mut unsigned =
            build_unsigned_tx(body, cosmos_public_key(&key), account.sequence, DEFAULT_GAS_VALUE);
        unsigned.sign(&key, self.chain_id(), account.account_number)?;
        debug!(sequence = account.sequence, "transfer tx signed");

        self.node.broadcast(&unsigned.tx_bytes()?).await
    }

    /// Sign a transfer from caller-supplied balances and account state;
    /// returns `TxRaw` bytes without broadcasting.
    pub async fn transfer_offline(&self, params: TxOfflineParams) -> Result<Vec<u8>, ClientError> {
        let tx = &params.tx;
        let key = self.private_key(tx.wallet_index)?;
        let address = self.address(tx.wallet_index)?;

        let fee = self.get_fees().await.average;
        check_funds(
            &tx.asset,
            tx.amount,
            fee,
            params.from_rune_balance,
            params.from_asset_balance,
        )?;

        let body = transfer_tx_body(&TransferTxParams {
            from: address,
            to: tx.recipient.clone(),
            amount: tx.amount,
            denom: get_denom(&tx.asset),
            memo: tx.memo.clone(),
        })?;
        let mut unsigned = build_unsigned_tx(
            body,
            cosmos_public_key(&key),
            params.from_sequence,
            DEFAULT_GAS_VALUE,
        );
        unsigned.sign(&key, self.chain_id(), params.from_account_number)?;
        debug!(sequence = params.from_sequence, "offline transfer signed");

        unsigned.tx_bytes()
    }
}
