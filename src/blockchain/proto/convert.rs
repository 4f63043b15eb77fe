// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversion between wire messages and plain JSON objects.
//!
//! Plain objects use the protobuf field names in camelCase (`fromAddress`,
//! `toAddress`). 64-bit integers may be given as numbers or decimal strings,
//! bytes as base64 strings or arrays of octets.

use base64ct::{Base64, Encoding};
use serde_json::{Map, Value};

use super::{Asset, BaseCoin, Coin, MsgDeposit, MsgSend};
use crate::error::ClientError;

/// How 64-bit integers are written by `to_object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongFormat {
    #[default]
    Number,
    String,
}

/// How byte fields are written by `to_object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BytesFormat {
    #[default]
    Base64,
    Array,
}

/// Options for `to_object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionOptions {
    pub longs: LongFormat,
    pub bytes: BytesFormat,
    /// Emit default values for unset fields.
    pub defaults: bool,
    /// Emit empty arrays for empty repeated fields.
    pub arrays: bool,
}

impl ConversionOptions {
    /// Options that produce JSON-safe output (64-bit values as strings).
    pub fn json() -> Self {
        Self {
            longs: LongFormat::String,
            bytes: BytesFormat::Base64,
            defaults: false,
            arrays: false,
        }
    }
}

/// Conversion of a wire message to and from a plain keyed structure.
pub trait PlainObject: Sized {
    /// Fully qualified protobuf name, used in conversion errors.
    const FULL_NAME: &'static str;

    /// `None` if `object` is a well-formed plain message, else the reason
    /// naming the first offending field path.
    fn verify(object: &Value) -> Option<String>;

    fn from_object(object: &Value) -> Result<Self, ClientError>;

    fn to_object(&self, options: &ConversionOptions) -> Value;

    fn to_json(&self) -> Value {
        self.to_object(&ConversionOptions::json())
    }
}

// =============================================================================
// Field helpers
// =============================================================================

/// The value of `key` when present and not null.
fn field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn as_object<'a, M: PlainObject>(object: &'a Value) -> Result<&'a Map<String, Value>, ClientError> {
    object
        .as_object()
        .ok_or_else(|| ClientError::InvalidObject(format!("{}: object expected", M::FULL_NAME)))
}

fn type_error<M: PlainObject>(key: &str, expected: &str) -> ClientError {
    ClientError::InvalidObject(format!("{}.{}: {} expected", M::FULL_NAME, key, expected))
}

fn is_long(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

fn is_bytes(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Array(items) => items
            .iter()
            .all(|item| item.as_u64().map(|b| b <= u8::MAX as u64).unwrap_or(false)),
        _ => false,
    }
}

fn verify_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    match field(object, key) {
        Some(v) if !v.is_string() => Some(format!("{key}: string expected")),
        _ => None,
    }
}

fn verify_bool(object: &Map<String, Value>, key: &str) -> Option<String> {
    match field(object, key) {
        Some(v) if !v.is_boolean() => Some(format!("{key}: boolean expected")),
        _ => None,
    }
}

fn verify_long(object: &Map<String, Value>, key: &str) -> Option<String> {
    match field(object, key) {
        Some(v) if !is_long(v) => Some(format!("{key}: integer|Long expected")),
        _ => None,
    }
}

fn verify_bytes(object: &Map<String, Value>, key: &str) -> Option<String> {
    match field(object, key) {
        Some(v) if !is_bytes(v) => Some(format!("{key}: buffer expected")),
        _ => None,
    }
}

fn verify_nested<M: PlainObject>(object: &Map<String, Value>, key: &str) -> Option<String> {
    field(object, key).and_then(|v| M::verify(v).map(|e| format!("{key}.{e}")))
}

fn verify_repeated<M: PlainObject>(object: &Map<String, Value>, key: &str) -> Option<String> {
    match field(object, key) {
        None => None,
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| M::verify(item).map(|e| format!("{key}.{i}.{e}"))),
        Some(_) => Some(format!("{key}: array expected")),
    }
}

fn string_from(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn bool_from(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn long_from<M: PlainObject>(value: &Value, key: &str) -> Result<i64, ClientError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| type_error::<M>(key, "integer|Long")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| type_error::<M>(key, "integer|Long")),
        _ => Err(type_error::<M>(key, "integer|Long")),
    }
}

fn bytes_from<M: PlainObject>(value: &Value, key: &str) -> Result<Vec<u8>, ClientError> {
    match value {
        Value::String(s) => Base64::decode_vec(s).map_err(|_| type_error::<M>(key, "base64")),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| type_error::<M>(key, "buffer"))
            })
            .collect(),
        _ => Err(type_error::<M>(key, "buffer")),
    }
}

fn nested_from<Parent: PlainObject, M: PlainObject>(
    value: &Value,
    key: &str,
) -> Result<M, ClientError> {
    if !value.is_object() {
        return Err(type_error::<Parent>(key, "object"));
    }
    M::from_object(value)
}

fn repeated_from<Parent: PlainObject, M: PlainObject>(
    value: &Value,
    key: &str,
) -> Result<Vec<M>, ClientError> {
    let items = value
        .as_array()
        .ok_or_else(|| type_error::<Parent>(key, "array"))?;
    items
        .iter()
        .map(|item| nested_from::<Parent, M>(item, key))
        .collect()
}

fn long_to(value: i64, options: &ConversionOptions) -> Value {
    match options.longs {
        LongFormat::String => Value::String(value.to_string()),
        LongFormat::Number => Value::from(value),
    }
}

fn bytes_to(value: &[u8], options: &ConversionOptions) -> Value {
    match options.bytes {
        BytesFormat::Base64 => Value::String(Base64::encode_string(value)),
        BytesFormat::Array => Value::Array(value.iter().map(|b| Value::from(*b)).collect()),
    }
}

fn put_string(out: &mut Map<String, Value>, key: &str, value: &Option<String>, options: &ConversionOptions) {
    match value {
        Some(v) => {
            out.insert(key.to_string(), Value::String(v.clone()));
        }
        None if options.defaults => {
            out.insert(key.to_string(), Value::String(String::new()));
        }
        None => {}
    }
}

fn put_bytes(out: &mut Map<String, Value>, key: &str, value: &Option<Vec<u8>>, options: &ConversionOptions) {
    match value {
        Some(v) => {
            out.insert(key.to_string(), bytes_to(v, options));
        }
        None if options.defaults => {
            out.insert(key.to_string(), bytes_to(&[], options));
        }
        None => {}
    }
}

fn put_repeated<M: PlainObject>(
    out: &mut Map<String, Value>,
    key: &str,
    items: &[M],
    options: &ConversionOptions,
) {
    if !items.is_empty() || options.arrays || options.defaults {
        let values = items.iter().map(|item| item.to_object(options)).collect();
        out.insert(key.to_string(), Value::Array(values));
    }
}

// =============================================================================
// Messages
// =============================================================================

impl PlainObject for Asset {
    const FULL_NAME: &'static str = ".common.Asset";

    fn verify(object: &Value) -> Option<String> {
        let Some(object) = object.as_object() else {
            return Some("object expected".to_string());
        };
        verify_string(object, "chain")
            .or_else(|| verify_string(object, "symbol"))
            .or_else(|| verify_string(object, "ticker"))
            .or_else(|| verify_bool(object, "synth"))
    }

    fn from_object(object: &Value) -> Result<Self, ClientError> {
        let object = as_object::<Self>(object)?;
        Ok(Asset {
            chain: field(object, "chain").map(string_from),
            symbol: field(object, "symbol").map(string_from),
            ticker: field(object, "ticker").map(string_from),
            synth: field(object, "synth").map(bool_from),
        })
    }

    fn to_object(&self, options: &ConversionOptions) -> Value {
        let mut out = Map::new();
        put_string(&mut out, "chain", &self.chain, options);
        put_string(&mut out, "symbol", &self.symbol, options);
        put_string(&mut out, "ticker", &self.ticker, options);
        match self.synth {
            Some(synth) => {
                out.insert("synth".to_string(), Value::Bool(synth));
            }
            None if options.defaults => {
                out.insert("synth".to_string(), Value::Bool(false));
            }
            None => {}
        }
        Value::Object(out)
    }
}

impl PlainObject for Coin {
    const FULL_NAME: &'static str = ".common.Coin";

    fn verify(object: &Value) -> Option<String> {
        let Some(object) = object.as_object() else {
            return Some("object expected".to_string());
        };
        verify_nested::<Asset>(object, "asset")
            .or_else(|| verify_string(object, "amount"))
            .or_else(|| verify_long(object, "decimals"))
    }

    fn from_object(object: &Value) -> Result<Self, ClientError> {
        let object = as_object::<Self>(object)?;
        Ok(Coin {
            asset: field(object, "asset")
                .map(|v| nested_from::<Self, Asset>(v, "asset"))
                .transpose()?,
            amount: field(object, "amount").map(string_from),
            decimals: field(object, "decimals")
                .map(|v| long_from::<Self>(v, "decimals"))
                .transpose()?,
        })
    }

    fn to_object(&self, options: &ConversionOptions) -> Value {
        let mut out = Map::new();
        match &self.asset {
            Some(asset) => {
                out.insert("asset".to_string(), asset.to_object(options));
            }
            None if options.defaults => {
                out.insert("asset".to_string(), Value::Null);
            }
            None => {}
        }
        put_string(&mut out, "amount", &self.amount, options);
        match self.decimals {
            Some(decimals) => {
                out.insert("decimals".to_string(), long_to(decimals, options));
            }
            None if options.defaults => {
                out.insert("decimals".to_string(), long_to(0, options));
            }
            None => {}
        }
        Value::Object(out)
    }
}

impl PlainObject for MsgDeposit {
    const FULL_NAME: &'static str = ".types.MsgDeposit";

    fn verify(object: &Value) -> Option<String> {
        let Some(object) = object.as_object() else {
            return Some("object expected".to_string());
        };
        verify_repeated::<Coin>(object, "coins")
            .or_else(|| verify_string(object, "memo"))
            .or_else(|| verify_bytes(object, "signer"))
    }

    fn from_object(object: &Value) -> Result<Self, ClientError> {
        let object = as_object::<Self>(object)?;
        Ok(MsgDeposit {
            coins: field(object, "coins")
                .map(|v| repeated_from::<Self, Coin>(v, "coins"))
                .transpose()?
                .unwrap_or_default(),
            memo: field(object, "memo").map(string_from),
            signer: field(object, "signer")
                .map(|v| bytes_from::<Self>(v, "signer"))
                .transpose()?,
        })
    }

    fn to_object(&self, options: &ConversionOptions) -> Value {
        let mut out = Map::new();
        put_repeated(&mut out, "coins", &self.coins, options);
        put_string(&mut out, "memo", &self.memo, options);
        put_bytes(&mut out, "signer", &self.signer, options);
        Value::Object(out)
    }
}

impl PlainObject for BaseCoin {
    const FULL_NAME: &'static str = ".cosmos.base.v1beta1.Coin";

    fn verify(object: &Value) -> Option<String> {
        let Some(object) = object.as_object() else {
            return Some("object expected".to_string());
        };
        verify_string(object, "denom").or_else(|| verify_string(object, "amount"))
    }

    fn from_object(object: &Value) -> Result<Self, ClientError> {
        let object = as_object::<Self>(object)?;
        Ok(BaseCoin {
            denom: field(object, "denom").map(string_from),
            amount: field(object, "amount").map(string_from),
        })
    }

    fn to_object(&self, options: &ConversionOptions) -> Value {
        let mut out = Map::new();
        put_string(&mut out, "denom", &self.denom, options);
        put_string(&mut out, "amount", &self.amount, options);
        Value::Object(out)
    }
}

impl PlainObject for MsgSend {
    const FULL_NAME: &'static str = ".types.MsgSend";

    fn verify(object: &Value) -> Option<String> {
        let Some(object) = object.as_object() else {
            return Some("object expected".to_string());
        };
        verify_bytes(object, "fromAddress")
            .or_else(|| verify_bytes(object, "toAddress"))
            .or_else(|| verify_repeated::<BaseCoin>(object, "amount"))
    }

    fn from_object(object: &Value) -> Result<Self, ClientError> {
        let object = as_object::<Self>(object)?;
        Ok(MsgSend {
            from_address: field(object, "fromAddress")
                .map(|v| bytes_from::<Self>(v, "fromAddress"))
                .transpose()?,
            to_address: field(object, "toAddress")
                .map(|v| bytes_from::<Self>(v, "toAddress"))
                .transpose()?,
            amount: field(object, "amount")
                .map(|v| repeated_from::<Self, BaseCoin>(v, "amount"))
                .transpose()?
                .unwrap_or_default(),
        })
    }

    fn to_object(&self, options: &ConversionOptions) -> Value {
        let mut out = Map::new();
        put_bytes(&mut out, "fromAddress", &self.from_address, options);
        put_bytes(&mut out, "toAddress", &self.to_address, options);
        put_repeated(&mut out, "amount", &self.amount, options);
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::blockchain::proto::tests::arb_coin;

    fn deposit_object() -> Value {
        json!({
            "coins": [{
                "asset": {"chain": "THOR", "symbol": "RUNE", "ticker": "RUNE", "synth": false},
                "amount": "100000000",
                "decimals": "8"
            }],
            "memo": "SWAP:BTC.BTC:bc1qxyz",
            "signer": [1, 2, 3, 4]
        })
    }

    #[test]
    fn verify_accepts_well_formed_objects() {
        assert_eq!(MsgDeposit::verify(&deposit_object()), None);
        assert_eq!(
            MsgSend::verify(&json!({
                "fromAddress": "AQID",
                "toAddress": [4, 5, 6],
                "amount": [{"denom": "rune", "amount": "1"}]
            })),
            None
        );
    }

    #[test]
    fn verify_names_first_offending_path() {
        let mut bad = deposit_object();
        bad["coins"][0]["amount"] = json!(100);
        assert_eq!(
            MsgDeposit::verify(&bad).as_deref(),
            Some("coins.0.amount: string expected")
        );

        let mut bad = deposit_object();
        bad["coins"][0]["asset"]["synth"] = json!("no");
        assert_eq!(
            MsgDeposit::verify(&bad).as_deref(),
            Some("coins.0.asset.synth: boolean expected")
        );

        let mut bad = deposit_object();
        bad["signer"] = json!(42);
        assert_eq!(MsgDeposit::verify(&bad).as_deref(), Some("signer: buffer expected"));

        assert_eq!(
            MsgDeposit::verify(&json!({"coins": {}})).as_deref(),
            Some("coins: array expected")
        );
        assert_eq!(MsgDeposit::verify(&json!("x")).as_deref(), Some("object expected"));
        assert_eq!(
            MsgSend::verify(&json!({"amount": [{"denom": 1}]})).as_deref(),
            Some("amount.0.denom: string expected")
        );
        assert_eq!(
            Coin::verify(&json!({"decimals": 1.5})).as_deref(),
            Some("decimals: integer|Long expected")
        );
    }

    #[test]
    fn from_object_builds_wire_message() {
        let msg = MsgDeposit::from_object(&deposit_object()).unwrap();
        assert_eq!(msg.coins.len(), 1);
        assert_eq!(msg.coins[0].decimals, Some(8));
        assert_eq!(msg.coins[0].amount.as_deref(), Some("100000000"));
        assert_eq!(msg.signer, Some(vec![1, 2, 3, 4]));
        assert_eq!(msg.memo.as_deref(), Some("SWAP:BTC.BTC:bc1qxyz"));
    }

    #[test]
    fn from_object_coerces_scalars() {
        let coin = Coin::from_object(&json!({"amount": 5, "decimals": 8})).unwrap();
        assert_eq!(coin.amount.as_deref(), Some("5"));
        assert_eq!(coin.decimals, Some(8));
    }

    #[test]
    fn from_object_rejects_structural_mismatch() {
        let err = MsgDeposit::from_object(&json!({"coins": "x"})).unwrap_err();
        assert_eq!(err.to_string(), ".types.MsgDeposit.coins: array expected");

        let err = MsgDeposit::from_object(&json!({"coins": [1]})).unwrap_err();
        assert_eq!(err.to_string(), ".types.MsgDeposit.coins: object expected");

        let err = Coin::from_object(&json!({"asset": "THOR.RUNE"})).unwrap_err();
        assert_eq!(err.to_string(), ".common.Coin.asset: object expected");
    }

    #[test]
    fn null_fields_are_unset() {
        let coin = Coin::from_object(&json!({"asset": null, "amount": null})).unwrap();
        assert_eq!(coin, Coin::default());
    }

    #[test]
    fn to_object_long_formats() {
        let coin = Coin {
            asset: None,
            amount: Some("1".to_string()),
            decimals: Some(8),
        };
        let as_string = coin.to_object(&ConversionOptions {
            longs: LongFormat::String,
            ..Default::default()
        });
        assert_eq!(as_string["decimals"], json!("8"));

        let as_number = coin.to_object(&ConversionOptions::default());
        assert_eq!(as_number["decimals"], json!(8));
    }

    #[test]
    fn to_object_defaults() {
        let object = MsgDeposit::default().to_object(&ConversionOptions {
            defaults: true,
            bytes: BytesFormat::Array,
            ..Default::default()
        });
        assert_eq!(object, json!({"coins": [], "memo": "", "signer": []}));

        let object = MsgDeposit::default().to_object(&ConversionOptions::default());
        assert_eq!(object, json!({}));
    }

    #[test]
    fn conversion_round_trip_verifies() {
        for options in [
            ConversionOptions::json(),
            ConversionOptions {
                bytes: BytesFormat::Array,
                ..Default::default()
            },
            ConversionOptions {
                defaults: true,
                arrays: true,
                ..ConversionOptions::json()
            },
        ] {
            let msg = MsgDeposit::from_object(&deposit_object()).unwrap();
            let object = msg.to_object(&options);
            assert_eq!(MsgDeposit::verify(&object), None);
            assert_eq!(MsgDeposit::from_object(&object).unwrap(), msg);
        }

        let send = MsgSend {
            from_address: Some(vec![9u8; 20]),
            to_address: Some(Vec::new()),
            amount: vec![BaseCoin {
                denom: Some("rune".to_string()),
                amount: Some("0".to_string()),
            }],
        };
        let object = send.to_json();
        assert_eq!(object["toAddress"], json!(""));
        assert_eq!(MsgSend::verify(&object), None);
        assert_eq!(MsgSend::from_object(&object).unwrap(), send);
    }

    fn arb_deposit() -> impl Strategy<Value = MsgDeposit> {
        (
            proptest::collection::vec(arb_coin(), 0..5),
            proptest::option::of(".{0,24}"),
            proptest::option::of(proptest::collection::vec(any::<u8>(), 0..32)),
        )
            .prop_map(|(coins, memo, signer)| MsgDeposit { coins, memo, signer })
    }

    fn arb_options() -> impl Strategy<Value = ConversionOptions> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(string_longs, array_bytes, defaults, arrays)| ConversionOptions {
                longs: if string_longs { LongFormat::String } else { LongFormat::Number },
                bytes: if array_bytes { BytesFormat::Array } else { BytesFormat::Base64 },
                defaults,
                arrays,
            },
        )
    }

    proptest! {
        #[test]
        fn converted_objects_always_verify(msg in arb_deposit(), options in arb_options()) {
            let object = msg.to_object(&options);
            prop_assert_eq!(MsgDeposit::verify(&object), None);
            prop_assert!(MsgDeposit::from_object(&object).is_ok());
        }

        /// Without defaults every set field, and only those, is written out.
        #[test]
        fn objects_without_defaults_convert_back(
            msg in arb_deposit(),
            options in arb_options().prop_map(|o| ConversionOptions { defaults: false, ..o }),
        ) {
            let object = msg.to_object(&options);
            let back = MsgDeposit::from_object(&object).unwrap();
            prop_assert_eq!(MsgDeposit::verify(&back.to_object(&options)), None);
            prop_assert_eq!(back, msg);
        }
    }
}
