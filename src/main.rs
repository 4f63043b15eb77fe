// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use base64ct::{Base64, Encoding};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use thorchain_client::blockchain::{default_client_url, get_chain_id, Network, PerNetwork, DECIMAL};
use thorchain_client::client::{
    DepositParams, TxHistoryParams, TxOfflineParams, TxParams,
};
use thorchain_client::config::{
    CHAIN_ID_ENV, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV, NETWORK_ENV, NODE_URL_ENV, PHRASE_ENV,
    RPC_URL_ENV,
};
use thorchain_client::models::{Asset, BaseAmount};
use thorchain_client::{Client, ClientError, ClientParams};

#[derive(Parser)]
#[command(author, version, about = "THORChain client: balances, history and signed transfers")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    #[arg(long, env = NETWORK_ENV, default_value = "testnet")]
    network: Network,
    /// THORNode REST endpoint of the selected network
    #[arg(long, env = NODE_URL_ENV)]
    node_url: Option<String>,
    /// Tendermint RPC endpoint of the selected network
    #[arg(long, env = RPC_URL_ENV)]
    rpc_url: Option<String>,
    /// Expected chain id; asked from the node when omitted (required by send-offline)
    #[arg(long, env = CHAIN_ID_ENV)]
    chain_id: Option<String>,
    #[arg(long, env = PHRASE_ENV, hide_env_values = true)]
    phrase: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the chain id reported by the node
    ChainId,
    /// Print the current native fee
    Fees,
    /// Print the address of a wallet index
    Address {
        #[arg(short, long, default_value_t = 0)]
        index: u32,
    },
    /// Print balances of an address (defaults to wallet index 0)
    Balance {
        address: Option<String>,
        /// Only report these assets, e.g. `THOR.RUNE`
        #[arg(long = "asset")]
        assets: Vec<Asset>,
    },
    /// Print a page of transfer history
    History {
        address: Option<String>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print the transfers of an address within a transaction
    Tx {
        hash: String,
        /// Defaults to wallet index 0
        #[arg(long)]
        address: Option<String>,
    },
    /// Print an inbound transaction as observed by THORChain
    DepositTx { hash: String },
    /// Send an asset with MsgSend and broadcast it
    Send(SendArgs),
    /// Sign a MsgSend without contacting the node for chain id, balances or account
    SendOffline {
        #[command(flatten)]
        send: SendArgs,
        #[arg(long)]
        rune_balance: u128,
        #[arg(long, default_value_t = 0)]
        asset_balance: u128,
        #[arg(long, default_value_t = 0)]
        account_number: u64,
        #[arg(long, default_value_t = 0)]
        sequence: u64,
    },
    /// Deposit into THORChain with MsgDeposit and broadcast it
    Deposit {
        #[arg(long, default_value = "THOR.RUNE")]
        asset: Asset,
        /// Amount in base units (1e-8)
        #[arg(long)]
        amount: u128,
        #[arg(long)]
        memo: String,
        #[arg(short, long, default_value_t = 0)]
        index: u32,
    },
}

#[derive(Args)]
struct SendArgs {
    #[arg(long)]
    to: String,
    /// Amount in base units (1e-8)
    #[arg(long)]
    amount: u128,
    #[arg(long, default_value = "THOR.RUNE")]
    asset: Asset,
    #[arg(long)]
    memo: Option<String>,
    #[arg(short, long, default_value_t = 0)]
    index: u32,
}

impl SendArgs {
    fn into_params(self) -> TxParams {
        TxParams {
            wallet_index: self.index,
            asset: self.asset,
            amount: BaseAmount::new(self.amount, DECIMAL),
            recipient: self.to,
            memo: self.memo,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format == "json");

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// The configured chain id, or the node's when none is configured. Offline
/// signing never reaches the node, so it needs one configured.
async fn resolve_chain_id(
    configured: Option<String>,
    node_url: &str,
    offline: bool,
) -> Result<String, ClientError> {
    match configured {
        Some(chain_id) => Ok(chain_id),
        None if offline => Err(ClientError::ChainIdRequired),
        None => get_chain_id(node_url).await,
    }
}

async fn build_client(global: GlobalArgs, offline: bool) -> Result<Client, ClientError> {
    let mut client_url = default_client_url();
    let mut urls = client_url.get(global.network).clone();
    if let Some(node) = global.node_url {
        urls.node = node;
    }
    if let Some(rpc) = global.rpc_url {
        urls.rpc = rpc;
    }

    let chain_id = resolve_chain_id(global.chain_id, &urls.node, offline).await?;
    info!(network = %global.network, node = %urls.node, %chain_id, "using node");
    client_url.set(global.network, urls);

    let mut params = ClientParams::new(PerNetwork::uniform(chain_id));
    params.network = global.network;
    params.phrase = global.phrase;
    params.client_url = Some(client_url);
    Client::new(params)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ClientError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ClientError::InvalidObject(format!("failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}

fn address_or_default(client: &Client, address: Option<String>) -> Result<String, ClientError> {
    match address {
        Some(address) => Ok(address),
        None => client.address(0),
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let offline = matches!(cli.command, Commands::SendOffline { .. });
    let client = build_client(cli.global, offline).await?;

    match cli.command {
        Commands::ChainId => println!("{}", client.node().chain_id().await?),
        Commands::Fees => print_json(&client.get_fees().await)?,
        Commands::Address { index } => println!("{}", client.address(index)?),
        Commands::Balance { address, assets } => {
            let address = address_or_default(&client, address)?;
            let filter = (!assets.is_empty()).then_some(assets.as_slice());
            print_json(&client.get_balance(&address, filter).await?)?;
        }
        Commands::History {
            address,
            offset,
            limit,
        } => {
            let page = client
                .list_transactions(TxHistoryParams {
                    address,
                    offset,
                    limit,
                    filter: None,
                })
                .await?;
            print_json(&page)?;
        }
        Commands::Tx { hash, address } => {
            let address = address_or_default(&client, address)?;
            print_json(&client.get_transaction_data(&hash, &address).await?)?;
        }
        Commands::DepositTx { hash } => print_json(&client.get_deposit_transaction(&hash).await?)?,
        Commands::Send(send) => {
            let hash = client.transfer(send.into_params()).await?;
            println!("{hash}");
            println!("{}", client.explorer_tx_url(&hash));
        }
        Commands::SendOffline {
            send,
            rune_balance,
            asset_balance,
            account_number,
            sequence,
        } => {
            let tx_bytes = client
                .transfer_offline(TxOfflineParams {
                    tx: send.into_params(),
                    from_rune_balance: BaseAmount::new(rune_balance, DECIMAL),
                    from_asset_balance: BaseAmount::new(asset_balance, DECIMAL),
                    from_account_number: account_number,
                    from_sequence: sequence,
                })
                .await?;
            println!("{}", Base64::encode_string(&tx_bytes));
        }
        Commands::Deposit {
            asset,
            amount,
            memo,
            index,
        } => {
            let hash = client
                .deposit(DepositParams {
                    wallet_index: index,
                    asset,
                    amount: BaseAmount::new(amount, DECIMAL),
                    memo,
                })
                .await?;
            println!("{hash}");
            println!("{}", client.explorer_tx_url(&hash));
        }
    }
    Ok(())
}
