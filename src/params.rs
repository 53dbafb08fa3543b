//! Mint call arguments: semantic roles from the drop config, resolved per wallet
//! and encoded against the mint function's ABI inputs.

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{hex, Address, Bytes, B256, U256};
use serde::Deserialize;
use std::fmt;

use crate::config::{ConfigValue, DropConfig};
use crate::error::{MinterError, Result};

/// Default `maxPerPhase` when the drop config leaves it unset
pub const DEFAULT_MAX_PER_PHASE: u64 = 10_000;

/// A positional argument of the mint function, named by what it carries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum ParamRole {
    To,
    Quantity,
    PhaseId,
    Price,
    MaxPerTx,
    MaxPerUser,
    MaxPerPhase,
    Nonce,
    Signature,
    /// Unrecognised token, passed to the contract as written
    Literal(String),
}

impl From<String> for ParamRole {
    fn from(token: String) -> Self {
        match token.as_str() {
            "to" => ParamRole::To,
            "amount" | "quantity" => ParamRole::Quantity,
            "phaseID" => ParamRole::PhaseId,
            "price" => ParamRole::Price,
            "maxPerTx" => ParamRole::MaxPerTx,
            "maxPerUser" => ParamRole::MaxPerUser,
            "maxPerPhase" => ParamRole::MaxPerPhase,
            "nonce" => ParamRole::Nonce,
            "signature" => ParamRole::Signature,
            _ => ParamRole::Literal(token),
        }
    }
}

/// Non-string entries are passed through as their JSON text
impl From<serde_json::Value> for ParamRole {
    fn from(token: serde_json::Value) -> Self {
        match token {
            serde_json::Value::String(token) => ParamRole::from(token),
            other => ParamRole::Literal(other.to_string()),
        }
    }
}

impl From<&str> for ParamRole {
    fn from(token: &str) -> Self {
        ParamRole::from(token.to_string())
    }
}

/// A resolved argument value, before ABI encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintArg {
    Address(Address),
    Uint(U256),
    Word(B256),
    Bytes(Bytes),
    Literal(String),
}

impl fmt::Display for MintArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MintArg::Address(address) => write!(f, "{}", address),
            MintArg::Uint(value) => write!(f, "{}", value),
            MintArg::Word(word) => f.write_str(&hex::encode_prefixed(word)),
            MintArg::Bytes(bytes) => f.write_str(&hex::encode_prefixed(bytes)),
            MintArg::Literal(text) => f.write_str(text),
        }
    }
}

impl MintArg {
    /// Encode against one ABI input type; mismatched pairs go through string coercion.
    pub fn encode(&self, ty: &DynSolType) -> Result<DynSolValue> {
        match (self, ty) {
            (MintArg::Address(address), DynSolType::Address) => Ok(DynSolValue::Address(*address)),
            (MintArg::Uint(value), DynSolType::Uint(bits)) => Ok(DynSolValue::Uint(*value, *bits)),
            (MintArg::Word(word), DynSolType::FixedBytes(32)) => Ok(DynSolValue::FixedBytes(*word, 32)),
            (MintArg::Word(word), DynSolType::Uint(bits)) => {
                Ok(DynSolValue::Uint(U256::from_be_bytes(word.0), *bits))
            }
            (MintArg::Uint(value), DynSolType::FixedBytes(32)) => {
                Ok(DynSolValue::FixedBytes(B256::from(value.to_be_bytes::<32>()), 32))
            }
            (MintArg::Bytes(bytes), DynSolType::Bytes) => Ok(DynSolValue::Bytes(bytes.to_vec())),
            _ => {
                let text = self.to_string();
                ty.coerce_str(&text).map_err(|e| {
                    MinterError::Encoding(format!("cannot encode '{}' as {}: {}", text, ty, e))
                })
            }
        }
    }
}

/// Numbers stay integers; text is a hex word if it is one, otherwise passed as-is
fn word_or_literal(value: &ConfigValue) -> MintArg {
    match value {
        ConfigValue::Number(n) => MintArg::Uint(*n),
        ConfigValue::Text(text) => text
            .parse::<B256>()
            .map(MintArg::Word)
            .unwrap_or_else(|_| MintArg::Literal(text.clone())),
    }
}

fn uint_or(value: Option<U256>, default: U256) -> MintArg {
    MintArg::Uint(value.filter(|v| !v.is_zero()).unwrap_or(default))
}

impl ParamRole {
    /// Resolve this role for one wallet
    pub fn resolve(&self, wallet: Address, config: &DropConfig) -> MintArg {
        let quantity = U256::from(config.mint_quantity);
        match self {
            ParamRole::To => MintArg::Address(wallet),
            ParamRole::Quantity => MintArg::Uint(quantity),
            ParamRole::PhaseId => config
                .phase_id()
                .map(word_or_literal)
                .unwrap_or(MintArg::Word(B256::ZERO)),
            ParamRole::Price => MintArg::Uint(config.price.unwrap_or(U256::ZERO)),
            ParamRole::MaxPerTx => uint_or(config.max_per_tx, quantity),
            ParamRole::MaxPerUser => uint_or(config.max_per_user, quantity),
            ParamRole::MaxPerPhase => uint_or(config.max_per_phase, U256::from(DEFAULT_MAX_PER_PHASE)),
            ParamRole::Nonce => config
                .nonce()
                .map(word_or_literal)
                .unwrap_or(MintArg::Word(B256::ZERO)),
            ParamRole::Signature => match config.signature() {
                Some(signature) => signature
                    .parse::<Bytes>()
                    .map(MintArg::Bytes)
                    .unwrap_or_else(|_| MintArg::Literal(signature.to_string())),
                None => MintArg::Bytes(Bytes::new()),
            },
            ParamRole::Literal(token) => MintArg::Literal(token.clone()),
        }
    }
}

/// Resolve every configured role, in order, for one wallet
pub fn build_mint_args(wallet: Address, config: &DropConfig) -> Vec<MintArg> {
    config
        .mint_params
        .iter()
        .map(|role| role.resolve(wallet, config))
        .collect()
}

/// The overload of `name` taking exactly `arity` inputs
pub fn select_function<'a>(abi: &'a JsonAbi, name: &str, arity: usize) -> Result<&'a Function> {
    let overloads = abi
        .function(name)
        .ok_or_else(|| MinterError::ContractCall(format!("Function '{}' not found in ABI", name)))?;

    overloads
        .iter()
        .find(|f| f.inputs.len() == arity)
        .ok_or_else(|| {
            MinterError::ContractCall(format!(
                "Function '{}' has no overload taking {} arguments",
                name, arity
            ))
        })
}

/// Encode resolved arguments against the inputs of `function`
pub fn encode_args(function: &Function, args: &[MintArg]) -> Result<Vec<DynSolValue>> {
    function
        .inputs
        .iter()
        .zip(args)
        .map(|(input, arg)| {
            let ty = input.resolve().map_err(|e| {
                MinterError::Encoding(format!("unsupported ABI type '{}': {}", input.ty, e))
            })?;
            arg.encode(&ty)
        })
        .collect()
}
