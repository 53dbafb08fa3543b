//! Drop configuration, RPC endpoint, private keys and contract ABI loading

use alloy_json_abi::JsonAbi;
use alloy_primitives::utils::{parse_ether, parse_units};
use alloy_primitives::U256;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{MinterError, Result};
use crate::params::ParamRole;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_RPC_PATH: &str = "rpc.json";
pub const DEFAULT_KEYS_PATH: &str = "PrivateKeys.txt";

/// One drop: which function to call, with what arguments, and how to pace the run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropConfig {
    pub drop_name: String,
    pub abi_file: PathBuf,
    pub mint_function: String,
    pub mint_params: Vec<ParamRole>,
    pub mint_quantity: u64,
    /// Native currency attached to each mint, in ether units ("0.05")
    pub mint_value: String,
    pub gas_limit: u64,
    pub max_gas_price_gwei: f64,
    pub delay_ms: u64,
    pub check_interval_ms: u64,
    #[serde(rename = "phaseID", default)]
    pub phase_id: Option<ConfigValue>,
    #[serde(default, deserialize_with = "deserialize_optional_u256")]
    pub price: Option<U256>,
    #[serde(default, deserialize_with = "deserialize_optional_u256")]
    pub max_per_tx: Option<U256>,
    #[serde(default, deserialize_with = "deserialize_optional_u256")]
    pub max_per_user: Option<U256>,
    #[serde(default, deserialize_with = "deserialize_optional_u256")]
    pub max_per_phase: Option<U256>,
    #[serde(default)]
    pub nonce: Option<ConfigValue>,
    #[serde(default)]
    pub signature: Option<String>,
}

impl DropConfig {
    /// Mint value converted to wei
    pub fn mint_value_wei(&self) -> Result<U256> {
        parse_ether(self.mint_value.trim()).map_err(|e| {
            MinterError::InvalidInput(format!("mintValue '{}' is not an ether amount: {}", self.mint_value, e))
        })
    }

    /// Gas price ceiling converted from gwei to wei
    pub fn max_gas_price_wei(&self) -> Result<u128> {
        let gwei = self.max_gas_price_gwei;
        if !gwei.is_finite() || gwei < 0.0 {
            return Err(MinterError::InvalidInput(format!(
                "maxGasPriceGwei must be a non-negative number, got {}",
                gwei
            )));
        }

        let wei: U256 = parse_units(&gwei.to_string(), "gwei")
            .map_err(|e| MinterError::InvalidInput(format!("maxGasPriceGwei {}: {}", gwei, e)))?
            .into();

        u128::try_from(wei)
            .map_err(|_| MinterError::InvalidInput(format!("maxGasPriceGwei {} is out of range", gwei)))
    }

    /// Configured phase identifier; an empty string or zero counts as unset
    pub fn phase_id(&self) -> Option<&ConfigValue> {
        self.phase_id.as_ref().filter(|v| v.is_set())
    }

    pub fn nonce(&self) -> Option<&ConfigValue> {
        self.nonce.as_ref().filter(|v| v.is_set())
    }

    pub fn signature(&self) -> Option<&str> {
        non_empty(self.signature.as_deref())
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.mint_function.trim().is_empty() {
            return Err(MinterError::invalid_config(path, "mintFunction must not be empty"));
        }
        if self.mint_quantity == 0 {
            return Err(MinterError::invalid_config(path, "mintQuantity must be greater than zero"));
        }
        self.mint_value_wei()
            .map_err(|e| MinterError::invalid_config(path, e.to_string()))?;
        self.max_gas_price_wei()
            .map_err(|e| MinterError::invalid_config(path, e.to_string()))?;
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A config scalar that may be written either as a JSON string or as an unsigned number
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum ConfigValue {
    Text(String),
    Number(U256),
}

impl ConfigValue {
    fn is_set(&self) -> bool {
        match self {
            ConfigValue::Text(text) => !text.trim().is_empty(),
            ConfigValue::Number(n) => !n.is_zero(),
        }
    }
}

impl TryFrom<serde_json::Value> for ConfigValue {
    type Error = String;

    fn try_from(value: serde_json::Value) -> std::result::Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(s) => Ok(ConfigValue::Text(s.trim().to_string())),
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(|v| ConfigValue::Number(U256::from(v)))
                .ok_or_else(|| format!("expected an unsigned integer, got {}", n)),
            other => Err(format!("expected a number or string, got {}", other)),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Text(text) => f.write_str(text),
            ConfigValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Accepts a JSON number or a decimal/hex string; null and "" mean unset.
fn deserialize_optional_u256<'de, D>(deserializer: D) -> std::result::Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .map(|v| Some(U256::from(v)))
            .ok_or_else(|| de::Error::custom(format!("expected an unsigned integer, got {}", n))),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => U256::from_str(s.trim())
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid integer '{}': {}", s, e))),
        Some(other) => Err(de::Error::custom(format!("expected a number or string, got {}", other))),
    }
}

/// RPC endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcConfig {
    pub rpc_url: String,
}

/// Wallet secrets in file order. Order is the mint order; duplicates are kept.
#[derive(Clone, Default)]
pub struct PrivateKeySet {
    keys: Vec<String>,
}

impl PrivateKeySet {
    /// One key per line, surrounding whitespace trimmed, blank lines dropped
    pub fn parse(text: &str) -> Self {
        let keys = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl fmt::Debug for PrivateKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKeySet({} keys)", self.keys.len())
    }
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| MinterError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|source| MinterError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate the drop configuration
pub async fn load_drop_config(path: &Path) -> Result<DropConfig> {
    let text = read_text(path).await?;
    let config: DropConfig = parse_json(path, &text)?;
    config.validate(path)?;
    Ok(config)
}

/// Load the RPC endpoint configuration
pub async fn load_rpc_config(path: &Path) -> Result<RpcConfig> {
    let text = read_text(path).await?;
    let config: RpcConfig = parse_json(path, &text)?;
    if config.rpc_url.trim().is_empty() {
        return Err(MinterError::invalid_config(path, "rpcUrl must not be empty"));
    }
    Ok(config)
}

/// Load the newline-delimited private key file
pub async fn load_private_keys(path: &Path) -> Result<PrivateKeySet> {
    let text = read_text(path).await?;
    Ok(PrivateKeySet::parse(&text))
}

/// Load a contract ABI: either a bare ABI array or a compiler artifact with an `abi` field
pub async fn load_abi(path: &Path) -> Result<JsonAbi> {
    let text = read_text(path).await?;
    let value: serde_json::Value = parse_json(path, &text)?;

    let abi_value = match value {
        serde_json::Value::Object(mut artifact) => match artifact.remove("abi") {
            Some(abi) => abi,
            None => serde_json::Value::Object(artifact),
        },
        other => other,
    };

    serde_json::from_value(abi_value).map_err(|source| MinterError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
