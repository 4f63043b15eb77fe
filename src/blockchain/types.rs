// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! THORChain network types, endpoints and constants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Decimals of the native asset (RUNE).
pub const DECIMAL: u8 = 8;

/// Gas limit for `MsgSend` transfers.
pub const DEFAULT_GAS_VALUE: u64 = 4_000_000;

/// Gas limit for `MsgDeposit` transactions.
pub const DEPOSIT_GAS_VALUE: u64 = 500_000_000;

/// Upper bound for each history search and for the merged history.
pub const MAX_TX_COUNT: usize = 100;

/// Chain-level denomination of RUNE.
pub const DENOM_RUNE_NATIVE: &str = "rune";

/// Fallback flat fee: 0.02 RUNE in base units.
pub const DEFAULT_FEE: u128 = 2_000_000;

/// Default root derivation path; the wallet index is appended.
pub const DEFAULT_ROOT_DERIVATION_PATH: &str = "44'/931'/0'/0/";

const DEFAULT_EXPLORER_URL: &str = "https://viewblock.io/thorchain";

/// THORChain network.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Stagenet,
    #[default]
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Stagenet => "stagenet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "stagenet" => Ok(Network::Stagenet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!(
                "Unknown network `{other}` (expected mainnet, stagenet or testnet)"
            )),
        }
    }
}

/// Bech32 human readable part for addresses on `network`.
pub fn get_prefix(network: Network) -> &'static str {
    match network {
        Network::Mainnet => "thor",
        Network::Stagenet => "sthor",
        Network::Testnet => "tthor",
    }
}

/// One value per network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerNetwork<T> {
    pub mainnet: T,
    pub stagenet: T,
    pub testnet: T,
}

impl<T> PerNetwork<T> {
    pub fn get(&self, network: Network) -> &T {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Stagenet => &self.stagenet,
            Network::Testnet => &self.testnet,
        }
    }

    pub fn set(&mut self, network: Network, value: T) {
        match network {
            Network::Mainnet => self.mainnet = value,
            Network::Stagenet => self.stagenet = value,
            Network::Testnet => self.testnet = value,
        }
    }
}

impl<T: Clone> PerNetwork<T> {
    /// Same value on every network.
    pub fn uniform(value: T) -> Self {
        Self {
            mainnet: value.clone(),
            stagenet: value.clone(),
            testnet: value,
        }
    }
}

/// THORNode REST endpoint and Tendermint RPC endpoint of one network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeUrl {
    pub node: String,
    pub rpc: String,
}

pub type ClientUrl = PerNetwork<NodeUrl>;
pub type ChainIds = PerNetwork<String>;
pub type ExplorerUrl = PerNetwork<String>;
pub type RootDerivationPaths = PerNetwork<String>;

/// Explorer base URLs: landing page, transaction pages, address pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExplorerUrls {
    pub root: ExplorerUrl,
    pub tx: ExplorerUrl,
    pub address: ExplorerUrl,
}

/// Public THORNode / RPC endpoints.
pub fn default_client_url() -> ClientUrl {
    PerNetwork {
        testnet: NodeUrl {
            node: "https://testnet.thornode.thorchain.info".to_string(),
            rpc: "https://testnet-rpc.ninerealms.com".to_string(),
        },
        stagenet: NodeUrl {
            node: "https://stagenet-thornode.ninerealms.com".to_string(),
            rpc: "https://stagenet-rpc.ninerealms.com".to_string(),
        },
        mainnet: NodeUrl {
            node: "https://thornode.ninerealms.com".to_string(),
            rpc: "https://rpc.ninerealms.com".to_string(),
        },
    }
}

pub fn default_explorer_urls() -> ExplorerUrls {
    ExplorerUrls {
        root: PerNetwork {
            testnet: format!("{DEFAULT_EXPLORER_URL}?network=testnet"),
            stagenet: format!("{DEFAULT_EXPLORER_URL}?network=stagenet"),
            mainnet: DEFAULT_EXPLORER_URL.to_string(),
        },
        tx: PerNetwork::uniform(format!("{DEFAULT_EXPLORER_URL}/tx")),
        address: PerNetwork::uniform(format!("{DEFAULT_EXPLORER_URL}/address")),
    }
}

pub fn default_root_derivation_paths() -> RootDerivationPaths {
    PerNetwork::uniform(DEFAULT_ROOT_DERIVATION_PATH.to_string())
}

pub fn explorer_url(urls: &ExplorerUrls, network: Network) -> &str {
    urls.root.get(network)
}

pub fn explorer_address_url(urls: &ExplorerUrls, network: Network, address: &str) -> String {
    with_network_query(format!("{}/{}", urls.address.get(network), address), network)
}

pub fn explorer_tx_url(urls: &ExplorerUrls, network: Network, tx_id: &str) -> String {
    with_network_query(format!("{}/{}", urls.tx.get(network), tx_id), network)
}

fn with_network_query(url: String, network: Network) -> String {
    match network {
        Network::Mainnet => url,
        Network::Stagenet => format!("{url}?network=stagenet"),
        Network::Testnet => format!("{url}?network=testnet"),
    }
}
