// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for THORNode REST and Tendermint RPC endpoints.

use std::time::Duration;

use base64ct::{Base64, Encoding};
use reqwest::{Client, Response, StatusCode};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::assets::DenomAmount;
use super::history::{RpcTxResult, TxLog};
use super::types::{ChainIds, ClientUrl, NodeUrl, PerNetwork, MAX_TX_COUNT};
use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const BROADCAST_MODE_SYNC: &str = "BROADCAST_MODE_SYNC";

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct NodeInfoResponse {
    default_node_info: Option<DefaultNodeInfo>,
}

#[derive(Debug, Deserialize)]
struct DefaultNodeInfo {
    network: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConstantsResponse {
    #[serde(default)]
    int_64_values: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    #[serde(default)]
    balances: Vec<DenomAmount>,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    account: AccountInfo,
}

/// Account number and sequence of an on-chain account.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub struct AccountInfo {
    #[serde(default, deserialize_with = "u64_from_string_or_number")]
    pub account_number: u64,
    #[serde(default, deserialize_with = "u64_from_string_or_number")]
    pub sequence: u64,
}

#[derive(Debug, Deserialize)]
struct GetTxResponse {
    tx_response: Option<TxResponse>,
}

/// `tx_response` of the Cosmos tx service.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TxResponse {
    #[serde(default)]
    pub txhash: String,
    #[serde(default, deserialize_with = "u64_from_string_or_number")]
    pub height: u64,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub logs: Option<Vec<TxLog>>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThorchainTxResponse {
    observed_tx: Option<ObservedTx>,
}

#[derive(Debug, Deserialize)]
struct ObservedTx {
    tx: ObservedTxBody,
}

/// Inbound transaction as observed by THORChain.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ObservedTxBody {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub chain: String,
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub to_address: String,
    #[serde(default)]
    pub coins: Vec<ObservedCoin>,
    #[serde(default)]
    pub memo: String,
}

/// A coin of an observed transaction, with its asset in string notation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ObservedCoin {
    pub asset: String,
    pub amount: String,
}

fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("expected unsigned integer, got {n}"))),
        Value::String(s) => s
            .parse()
            .map_err(|_| D::Error::custom(format!("expected unsigned integer, got {s:?}"))),
        Value::Null => Ok(0),
        other => Err(D::Error::custom(format!("expected unsigned integer, got {other}"))),
    }
}

/// Direction of a transfer search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferRole {
    Recipient,
    Sender,
}

impl TransferRole {
    fn query(&self, address: &str) -> String {
        match self {
            TransferRole::Recipient => format!("\"transfer.recipient='{address}'\""),
            TransferRole::Sender => format!("\"transfer.sender='{address}'\""),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for one network's THORNode and RPC endpoints.
#[derive(Debug, Clone)]
pub struct ThornodeClient {
    http: Client,
    node_url: String,
    rpc_url: String,
}

impl ThornodeClient {
    pub fn new(urls: &NodeUrl) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http_client()?,
            node_url: validate_url(&urls.node)?,
            rpc_url: validate_url(&urls.rpc)?,
        })
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Chain id reported by the node.
    pub async fn chain_id(&self) -> Result<String, ClientError> {
        fetch_chain_id(&self.http, &self.node_url).await
    }

    /// `NativeTransactionFee` from the node's constants.
    pub async fn native_fee(&self) -> Result<i64, ClientError> {
        let url = format!("{}/thorchain/constants", self.node_url);
        let constants: ConstantsResponse = get_json(&self.http, &url).await?;
        let fee = constants
            .int_64_values
            .get("NativeTransactionFee")
            .ok_or_else(|| {
                ClientError::InvalidResponse("NativeTransactionFee missing".to_string())
            })?;
        let parsed = match fee {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| ClientError::InvalidResponse(format!("NativeTransactionFee: {fee}")))
    }

    /// Bank balances of an account.
    ///
    /// # Arguments
    /// * `address` - Bech32 account address
    ///
    /// # Returns
    /// * `Ok(Vec<DenomAmount>)` - One entry per denom held, empty for unknown accounts
    /// * `Err(ClientError)` - On transport failure or an unreadable response
    pub async fn balances(&self, address: &str) -> Result<Vec<DenomAmount>, ClientError> {
        let url = format!("{}/cosmos/bank/v1beta1/balances/{}", self.node_url, address);
        let response: BalancesResponse = get_json(&self.http, &url).await?;
        Ok(response.balances)
    }

    /// Account number and sequence, needed to sign.
    ///
    /// # Arguments
    /// * `address` - Bech32 account address
    ///
    /// # Returns
    /// * `Ok(AccountInfo)` - The account's number and current sequence
    /// * `Err(ClientError)` - On transport failure or an unreadable response
    pub async fn account(&self, address: &str) -> Result<AccountInfo, ClientError> {
        let url = format!("{}/cosmos/auth/v1beta1/accounts/{}", self.node_url, address);
        let response: AccountResponse = get_json(&self.http, &url).await?;
        Ok(response.account)
    }

    /// Cosmos `tx_response` of `hash`.
    ///
    /// # Returns
    /// * `Ok(TxResponse)` - Height, timestamp and logs of the transaction
    /// * `Err(ClientError::MissingTransactionData)` - If the node has no `tx_response`
    pub async fn tx(&self, hash: &str) -> Result<TxResponse, ClientError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs/{}", self.node_url, hash);
        let response: GetTxResponse = get_json(&self.http, &url).await?;
        response
            .tx_response
            .ok_or_else(|| ClientError::MissingTransactionData(hash.to_string()))
    }

    /// THORChain's observation of an inbound transaction.
    ///
    /// # Arguments
    /// * `hash` - Hash of the transaction on its source chain
    ///
    /// # Returns
    /// * `Ok(ObservedTxBody)` - Sender, coins, gas and memo as observed
    /// * `Err(ClientError::TransactionNotFound)` - On 404 or when nothing was observed
    pub async fn observed_tx(&self, hash: &str) -> Result<ObservedTxBody, ClientError> {
        let url = format!("{}/thorchain/tx/{}", self.node_url, hash);
        let response = send(self.http.get(&url), &url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::TransactionNotFound);
        }
        let response: ThorchainTxResponse = read_json(&url, response).await?;
        response
            .observed_tx
            .map(|observed| observed.tx)
            .ok_or(ClientError::TransactionNotFound)
    }

    /// Broadcast signed `TxRaw` bytes in sync mode.
    ///
    /// # Returns
    /// * `Ok(String)` - Hash of the accepted transaction
    /// * `Err(ClientError::BroadcastFailed)` - With the node's raw log when `code != 0`
    pub async fn broadcast(&self, tx_bytes: &[u8]) -> Result<String, ClientError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs", self.node_url);
        let body = json!({
            "tx_bytes": Base64::encode_string(tx_bytes),
            "mode": BROADCAST_MODE_SYNC,
        });
        let response = send(self.http.post(&url).json(&body), &url).await?;
        let response: GetTxResponse = read_json(&url, response).await?;
        let tx_response = response
            .tx_response
            .ok_or_else(|| ClientError::InvalidResponse("broadcast: no tx_response".to_string()))?;

        if tx_response.code != 0 {
            return Err(ClientError::BroadcastFailed(tx_response.raw_log));
        }
        debug!(tx_hash = %tx_response.txhash, "transaction accepted by node");
        Ok(tx_response.txhash)
    }

    /// Up to `MAX_TX_COUNT` transfers of `address` in `role`, newest first.
    pub async fn search_transfers(
        &self,
        role: TransferRole,
        address: &str,
    ) -> Result<Vec<RpcTxResult>, ClientError> {
        let url = format!("{}/tx_search", self.rpc_url);
        let request = self.http.get(&url).query(&[
            ("query", role.query(address)),
            ("per_page", MAX_TX_COUNT.to_string()),
            ("order_by", "\"desc\"".to_string()),
        ]);
        let response = send(request, &url).await?;
        let body: Value = read_json(&url, response).await?;

        let txs = body
            .pointer("/result/txs")
            .and_then(Value::as_array)
            .ok_or_else(|| ClientError::InvalidResponse(format!("{url}: result.txs missing")))?;
        txs.iter().map(RpcTxResult::from_value).collect()
    }
}

fn build_http_client() -> Result<Client, ClientError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ClientError::Http(format!("failed to build HTTP client: {e}")))
}

fn validate_url(raw: &str) -> Result<String, ClientError> {
    url::Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))?;
    Ok(raw.trim_end_matches('/').to_string())
}

async fn send(request: reqwest::RequestBuilder, url: &str) -> Result<Response, ClientError> {
    request
        .send()
        .await
        .map_err(|e| ClientError::Http(format!("request to {url} failed: {e}")))
}

async fn read_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Http(format!("{url} returned {status}: {body}")));
    }
    response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(format!("{url}: {e}")))
}

async fn get_json<T: DeserializeOwned>(http: &Client, url: &str) -> Result<T, ClientError> {
    let response = send(http.get(url), url).await?;
    read_json(url, response).await
}

async fn fetch_chain_id(http: &Client, node_url: &str) -> Result<String, ClientError> {
    let url = format!("{node_url}/cosmos/base/tendermint/v1beta1/node_info");
    let info: NodeInfoResponse = get_json(http, &url).await?;
    info.default_node_info
        .and_then(|info| info.network)
        .filter(|network| !network.is_empty())
        .ok_or(ClientError::ChainIdUnavailable)
}

/// Chain id reported by the THORNode at `node_url`.
pub async fn get_chain_id(node_url: &str) -> Result<String, ClientError> {
    let http = build_http_client()?;
    fetch_chain_id(&http, &validate_url(node_url)?).await
}

/// Chain ids of all three networks, queried concurrently.
pub async fn get_chain_ids(urls: &ClientUrl) -> Result<ChainIds, ClientError> {
    let (mainnet, stagenet, testnet) = tokio::try_join!(
        get_chain_id(&urls.mainnet.node),
        get_chain_id(&urls.stagenet.node),
        get_chain_id(&urls.testnet.node),
    )?;
    Ok(PerNetwork {
        mainnet,
        stagenet,
        testnet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockNode, MockServer};

    fn client(node: &MockServer) -> ThornodeClient {
        ThornodeClient::new(&node.urls()).unwrap()
    }

    #[test]
    fn invalid_url_is_rejected() {
        let urls = NodeUrl {
            node: "not a url".to_string(),
            rpc: "http://localhost:26657".to_string(),
        };
        assert!(matches!(
            ThornodeClient::new(&urls),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn account_numbers_accept_strings() {
        let info: AccountInfo =
            serde_json::from_value(json!({"account_number": "12", "sequence": 3})).unwrap();
        assert_eq!(
            info,
            AccountInfo {
                account_number: 12,
                sequence: 3
            }
        );
    }

    #[tokio::test]
    async fn chain_id_from_node_info() {
        let node = MockNode::new()
            .route(
                "/cosmos/base/tendermint/v1beta1/node_info",
                json!({"default_node_info": {"network": "thorchain-mainnet-v1"}}),
            )
            .start()
            .await;
        assert_eq!(client(&node).chain_id().await.unwrap(), "thorchain-mainnet-v1");
    }

    #[tokio::test]
    async fn chain_id_missing_network() {
        let node = MockNode::new()
            .route(
                "/cosmos/base/tendermint/v1beta1/node_info",
                json!({"default_node_info": {}}),
            )
            .start()
            .await;
        assert!(matches!(
            client(&node).chain_id().await,
            Err(ClientError::ChainIdUnavailable)
        ));
    }

    #[tokio::test]
    async fn get_chain_ids_queries_every_network() {
        let node = MockNode::new()
            .route(
                "/cosmos/base/tendermint/v1beta1/node_info",
                json!({"default_node_info": {"network": "thorchain-stagenet-v2"}}),
            )
            .start()
            .await;
        let urls = PerNetwork::uniform(node.urls());
        let ids = get_chain_ids(&urls).await.unwrap();
        assert_eq!(ids, PerNetwork::uniform("thorchain-stagenet-v2".to_string()));
    }

    #[tokio::test]
    async fn native_fee_reads_constants() {
        let node = MockNode::new()
            .route(
                "/thorchain/constants",
                json!({"int_64_values": {"NativeTransactionFee": 2000000}}),
            )
            .start()
            .await;
        assert_eq!(client(&node).native_fee().await.unwrap(), 2_000_000);
    }

    #[tokio::test]
    async fn account_and_balances() {
        let node = MockNode::new()
            .route(
                "/cosmos/auth/v1beta1/accounts/",
                json!({"account": {"address": "thor1x", "account_number": "7", "sequence": "2"}}),
            )
            .route(
                "/cosmos/bank/v1beta1/balances/",
                json!({"balances": [{"denom": "rune", "amount": "5"}]}),
            )
            .start()
            .await;
        let client = client(&node);
        let account = client.account("thor1x").await.unwrap();
        assert_eq!(account.account_number, 7);
        assert_eq!(account.sequence, 2);
        let balances = client.balances("thor1x").await.unwrap();
        assert_eq!(balances[0].denom, "rune");
    }

    #[tokio::test]
    async fn broadcast_posts_base64_and_checks_code() {
        let node = MockNode::new()
            .route(
                "/cosmos/tx/v1beta1/txs",
                json!({"tx_response": {"code": 0, "txhash": "ABCD", "raw_log": "[]"}}),
            )
            .start()
            .await;
        let hash = client(&node).broadcast(&[1, 2, 3]).await.unwrap();
        assert_eq!(hash, "ABCD");

        let posted = node.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0]["tx_bytes"], json!("AQID"));
        assert_eq!(posted[0]["mode"], json!("BROADCAST_MODE_SYNC"));
    }

    #[tokio::test]
    async fn broadcast_failure_carries_raw_log() {
        let node = MockNode::new()
            .route(
                "/cosmos/tx/v1beta1/txs",
                json!({"tx_response": {"code": 5, "txhash": "", "raw_log": "insufficient fee"}}),
            )
            .start()
            .await;
        let err = client(&node).broadcast(&[1]).await.unwrap_err();
        assert!(matches!(err, ClientError::BroadcastFailed(log) if log == "insufficient fee"));
    }

    #[tokio::test]
    async fn observed_tx_not_found() {
        let node = MockNode::new()
            .route("/thorchain/tx/", json!({"keysign_metric": {}}))
            .start()
            .await;
        assert!(matches!(
            client(&node).observed_tx("ABC").await,
            Err(ClientError::TransactionNotFound)
        ));

        let empty = MockNode::new().start().await;
        assert!(matches!(
            client(&empty).observed_tx("ABC").await,
            Err(ClientError::TransactionNotFound)
        ));
    }

    #[tokio::test]
    async fn search_builds_transfer_query() {
        let node = MockNode::new()
            .route(
                "/tx_search?query=\"transfer.sender='thor1me'\"",
                json!({"result": {"txs": [{"hash": "AA", "height": "12"}], "total_count": "1"}}),
            )
            .route("/tx_search", json!({"result": {"txs": []}}))
            .start()
            .await;
        let client = client(&node);

        let sent = client
            .search_transfers(TransferRole::Sender, "thor1me")
            .await
            .unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].hash, "AA");
        assert_eq!(sent[0].height, 12);

        let received = client
            .search_transfers(TransferRole::Recipient, "thor1me")
            .await
            .unwrap();
        assert!(received.is_empty());
    }
}
