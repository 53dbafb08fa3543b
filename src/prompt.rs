//! Operator prompt for the target contract address

use alloy_primitives::Address;
use dialoguer::Input;

use crate::error::{MinterError, Result};

/// Syntactic address check: 20 hex bytes, and a valid EIP-55 checksum when mixed-case.
pub fn is_valid_address(input: &str) -> bool {
    let input = input.trim();
    let hex_part = input.strip_prefix("0x").unwrap_or(input);

    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(format!("0x{}", hex_part), None).is_ok();
    }
    true
}

/// Validate and parse an address given on the command line
pub fn parse_contract_address(input: &str) -> Result<Address> {
    if !is_valid_address(input) {
        return Err(MinterError::InvalidAddress(format!(
            "'{}' is not 20 hex bytes with a valid checksum",
            input.trim()
        )));
    }
    input
        .trim()
        .parse()
        .map_err(|e| MinterError::InvalidAddress(format!("'{}': {}", input.trim(), e)))
}

/// Ask the operator for the contract address, re-prompting until it is well formed
pub async fn prompt_contract_address() -> Result<Address> {
    let answer = tokio::task::spawn_blocking(|| {
        Input::<String>::new()
            .with_prompt("Contract address")
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                if is_valid_address(input) {
                    Ok(())
                } else {
                    Err("Invalid contract address")
                }
            })
            .interact_text()
    })
    .await
    .map_err(|e| MinterError::Prompt(e.to_string()))?
    .map_err(|e| MinterError::Prompt(e.to_string()))?;

    parse_contract_address(&answer)
}
