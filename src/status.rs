//! Mint-window detection

use alloy_dyn_abi::{DynSolValue, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{hex, Address, B256, U256};
use std::fmt;
use tracing::{debug, warn};

use crate::chain::MintChain;
use crate::config::DropConfig;
use crate::error::{MinterError, Result};
use crate::params::{select_function, ParamRole};

const MINTING_STARTED: &str = "mintingStarted";
const PUBLIC_MINT_ACTIVE: &str = "isPublicMintActive";
const MINTED_TOTAL: &str = "mintedTotal";
const SUPPLY: &str = "supply";

/// Which status view the contract exposes, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStatusProbe {
    /// `mintingStarted() -> bool`
    MintingStarted,
    /// `isPublicMintActive() -> bool`
    PublicMintActive,
    /// `mintedTotal(phase) -> uint` with `supply() -> uint`
    MintedSupply,
    /// Nothing recognised; the mint is assumed open
    Unknown,
}

impl fmt::Display for MintStatusProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MintStatusProbe::MintingStarted => "mintingStarted()",
            MintStatusProbe::PublicMintActive => "isPublicMintActive()",
            MintStatusProbe::MintedSupply => "mintedTotal(phase) / supply()",
            MintStatusProbe::Unknown => "none",
        };
        f.write_str(name)
    }
}

fn has_function(abi: &JsonAbi, name: &str, arity: usize) -> bool {
    abi.function(name)
        .map(|overloads| overloads.iter().any(|f| f.inputs.len() == arity))
        .unwrap_or(false)
}

impl MintStatusProbe {
    /// Classify the contract once from its ABI
    pub fn classify(abi: &JsonAbi) -> Self {
        if has_function(abi, MINTING_STARTED, 0) {
            MintStatusProbe::MintingStarted
        } else if has_function(abi, PUBLIC_MINT_ACTIVE, 0) {
            MintStatusProbe::PublicMintActive
        } else if has_function(abi, MINTED_TOTAL, 1) && has_function(abi, SUPPLY, 0) {
            MintStatusProbe::MintedSupply
        } else {
            MintStatusProbe::Unknown
        }
    }
}

fn first_bool(function: &str, values: &[DynSolValue]) -> Result<bool> {
    values
        .first()
        .and_then(DynSolValue::as_bool)
        .ok_or_else(|| MinterError::Decoding(format!("{} did not return a bool", function)))
}

fn first_uint(function: &str, values: &[DynSolValue]) -> Result<U256> {
    values
        .first()
        .and_then(DynSolValue::as_uint)
        .map(|(value, _)| value)
        .ok_or_else(|| MinterError::Decoding(format!("{} did not return an integer", function)))
}

/// The phase argument for `mintedTotal`, resolved the same way as the mint call's phaseID
fn phase_argument(minted_total: &Function, config: &DropConfig) -> Result<DynSolValue> {
    let input_ty = minted_total.inputs[0].resolve().map_err(|e| {
        MinterError::Encoding(format!("{} input type: {}", MINTED_TOTAL, e))
    })?;

    ParamRole::PhaseId.resolve(Address::ZERO, config).encode(&input_ty)
}

async fn view(chain: &dyn MintChain, name: &str, args: &[DynSolValue]) -> Result<Vec<DynSolValue>> {
    let function = select_function(chain.abi(), name, args.len())?;
    chain.call(function, args).await
}

async fn query(chain: &dyn MintChain, probe: MintStatusProbe, config: &DropConfig) -> Result<bool> {
    match probe {
        MintStatusProbe::MintingStarted => {
            let values = view(chain, MINTING_STARTED, &[]).await?;
            first_bool(MINTING_STARTED, &values)
        }
        MintStatusProbe::PublicMintActive => {
            let values = view(chain, PUBLIC_MINT_ACTIVE, &[]).await?;
            first_bool(PUBLIC_MINT_ACTIVE, &values)
        }
        MintStatusProbe::MintedSupply => {
            let minted_total = select_function(chain.abi(), MINTED_TOTAL, 1)?;
            let phase = phase_argument(minted_total, config)?;
            let minted = first_uint(MINTED_TOTAL, &chain.call(minted_total, &[phase]).await?)?;
            let supply = first_uint(SUPPLY, &view(chain, SUPPLY, &[]).await?)?;
            debug!("Minted {} of {} for phase {}", minted, supply, phase_label(config));

            if minted >= supply {
                warn!(
                    "Mint already finished for phaseID {} ({} of {} minted). Check the phaseID in the drop config",
                    phase_label(config),
                    minted,
                    supply
                );
            }
            Ok(minted < supply)
        }
        MintStatusProbe::Unknown => {
            warn!("No mint status function found on the contract, assuming the mint is active");
            Ok(true)
        }
    }
}

fn phase_label(config: &DropConfig) -> String {
    config
        .phase_id()
        .map(ToString::to_string)
        .unwrap_or_else(|| hex::encode_prefixed(B256::ZERO))
}

/// Whether minting is open. Never fails: a failing status call reads as "not yet".
pub async fn is_mint_active(chain: &dyn MintChain, probe: MintStatusProbe, config: &DropConfig) -> bool {
    match query(chain, probe, config).await {
        Ok(active) => active,
        Err(e) => {
            warn!(
                "Failed to check mint status, phaseID ({}) may be wrong: {}",
                phase_label(config),
                e
            );
            warn!("Verify the phaseID for this drop on the project's mint page");
            false
        }
    }
}
