// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Protobuf wire types for THORChain messages.
//!
//! THORChain message types (`common.Asset`, `common.Coin`, `types.MsgDeposit`,
//! `types.MsgSend`) track field presence: a field set to an empty string,
//! `false` or `0` is written to the wire, an unset field is omitted. They are
//! therefore declared with `optional` scalars. The Cosmos SDK tx envelope
//! comes from `cosmrs`.

pub mod convert;
pub mod registry;

pub use convert::{BytesFormat, ConversionOptions, LongFormat, PlainObject};
pub use registry::{ThorMsg, TypeRegistry};

pub use cosmrs::Any;
use prost::Message;

/// A message that can be packed into an [`Any`].
pub trait TypedMessage: Message + Default + Sized {
    const TYPE_URL: &'static str;
}

/// Serialize `msg` into a type-tagged [`Any`].
pub fn pack_any<M: TypedMessage>(msg: &M) -> Any {
    Any {
        type_url: M::TYPE_URL.to_string(),
        value: msg.encode_to_vec(),
    }
}

// =============================================================================
// THORChain messages
// =============================================================================

/// `common.Asset`
#[derive(Clone, PartialEq, Message)]
pub struct Asset {
    #[prost(string, optional, tag = "1")]
    pub chain: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub symbol: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub ticker: Option<String>,
    #[prost(bool, optional, tag = "4")]
    pub synth: Option<bool>,
}

/// `common.Coin`
#[derive(Clone, PartialEq, Message)]
pub struct Coin {
    #[prost(message, optional, tag = "1")]
    pub asset: Option<Asset>,
    #[prost(string, optional, tag = "2")]
    pub amount: Option<String>,
    #[prost(int64, optional, tag = "3")]
    pub decimals: Option<i64>,
}

/// `types.MsgDeposit`
#[derive(Clone, PartialEq, Message)]
pub struct MsgDeposit {
    #[prost(message, repeated, tag = "1")]
    pub coins: Vec<Coin>,
    #[prost(string, optional, tag = "2")]
    pub memo: Option<String>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub signer: Option<Vec<u8>>,
}

impl TypedMessage for MsgDeposit {
    const TYPE_URL: &'static str = "/types.MsgDeposit";
}

/// `cosmos.base.v1beta1.Coin` as embedded in `types.MsgSend`, with the same
/// field presence as the THORChain messages.
#[derive(Clone, PartialEq, Message)]
pub struct BaseCoin {
    #[prost(string, optional, tag = "1")]
    pub denom: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub amount: Option<String>,
}

/// `types.MsgSend`
#[derive(Clone, PartialEq, Message)]
pub struct MsgSend {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub from_address: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub to_address: Option<Vec<u8>>,
    #[prost(message, repeated, tag = "3")]
    pub amount: Vec<BaseCoin>,
}

impl TypedMessage for MsgSend {
    const TYPE_URL: &'static str = "/types.MsgSend";
}
