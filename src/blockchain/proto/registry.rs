// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Type URL registry for packing and unpacking THORChain messages.

use std::collections::HashMap;

use prost::Message;

use super::{Any, MsgDeposit, MsgSend, TypedMessage};
use crate::error::ClientError;

/// A THORChain message carried in a transaction body.
#[derive(Debug, Clone, PartialEq)]
pub enum ThorMsg {
    Deposit(MsgDeposit),
    Send(MsgSend),
}

impl ThorMsg {
    pub fn type_url(&self) -> &'static str {
        match self {
            ThorMsg::Deposit(_) => MsgDeposit::TYPE_URL,
            ThorMsg::Send(_) => MsgSend::TYPE_URL,
        }
    }

    pub fn encode_to_vec(&self) -> Vec<u8> {
        match self {
            ThorMsg::Deposit(msg) => msg.encode_to_vec(),
            ThorMsg::Send(msg) => msg.encode_to_vec(),
        }
    }
}

impl From<MsgDeposit> for ThorMsg {
    fn from(msg: MsgDeposit) -> Self {
        ThorMsg::Deposit(msg)
    }
}

impl From<MsgSend> for ThorMsg {
    fn from(msg: MsgSend) -> Self {
        ThorMsg::Send(msg)
    }
}

type DecodeFn = fn(&[u8]) -> Result<ThorMsg, prost::DecodeError>;

fn decode_as<M>(bytes: &[u8]) -> Result<ThorMsg, prost::DecodeError>
where
    M: TypedMessage + Into<ThorMsg>,
{
    M::decode(bytes).map(Into::into)
}

/// Maps type URLs to decoders. Built explicitly and passed where needed.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `/types.MsgDeposit` and `/types.MsgSend`.
    pub fn thorchain() -> Self {
        let mut registry = Self::new();
        registry.register::<MsgDeposit>();
        registry.register::<MsgSend>();
        registry
    }

    pub fn register<M>(&mut self)
    where
        M: TypedMessage + Into<ThorMsg>,
    {
        self.decoders.insert(M::TYPE_URL, decode_as::<M>);
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.decoders.contains_key(type_url)
    }

    pub fn pack(&self, msg: &ThorMsg) -> Result<Any, ClientError> {
        let type_url = msg.type_url();
        if !self.contains(type_url) {
            return Err(ClientError::UnknownTypeUrl(type_url.to_string()));
        }
        Ok(Any {
            type_url: type_url.to_string(),
            value: msg.encode_to_vec(),
        })
    }

    pub fn unpack(&self, any: &Any) -> Result<ThorMsg, ClientError> {
        let decode = self
            .decoders
            .get(any.type_url.as_str())
            .ok_or_else(|| ClientError::UnknownTypeUrl(any.type_url.clone()))?;
        Ok(decode(&any.value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::proto::{pack_any, BaseCoin};

    #[test]
    fn pack_then_unpack_deposit() {
        let registry = TypeRegistry::thorchain();
        let msg = ThorMsg::Deposit(MsgDeposit {
            coins: vec![],
            memo: Some("=:BTC.BTC:bc1q".to_string()),
            signer: Some(vec![3u8; 20]),
        });
        let any = registry.pack(&msg).unwrap();
        assert_eq!(any.type_url, "/types.MsgDeposit");
        assert_eq!(registry.unpack(&any).unwrap(), msg);
    }

    #[test]
    fn unpack_matches_pack_any() {
        let registry = TypeRegistry::thorchain();
        let send = MsgSend {
            from_address: Some(vec![1u8; 20]),
            to_address: Some(vec![2u8; 20]),
            amount: vec![BaseCoin {
                denom: Some("rune".to_string()),
                amount: Some("1".to_string()),
            }],
        };
        let any = pack_any(&send);
        assert_eq!(registry.unpack(&any).unwrap(), ThorMsg::Send(send));
    }

    #[test]
    fn unknown_type_url_is_rejected() {
        let registry = TypeRegistry::thorchain();
        let any = Any {
            type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
            value: vec![],
        };
        assert!(matches!(
            registry.unpack(&any),
            Err(ClientError::UnknownTypeUrl(url)) if url == "/cosmos.bank.v1beta1.MsgSend"
        ));

        let empty = TypeRegistry::new();
        assert!(empty
            .pack(&ThorMsg::Deposit(MsgDeposit::default()))
            .is_err());
    }

    #[test]
    fn corrupt_value_is_a_decode_error() {
        let registry = TypeRegistry::thorchain();
        let any = Any {
            type_url: "/types.MsgDeposit".to_string(),
            value: vec![0x12, 0x05, b'a'],
        };
        assert!(matches!(registry.unpack(&any), Err(ClientError::Decode(_))));
    }
}
