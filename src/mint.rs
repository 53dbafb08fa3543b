//! Per-wallet mint execution

use alloy_primitives::{Address, TxHash};
use alloy_signer_local::PrivateKeySigner;
use tracing::{info, warn, error};

use crate::chain::{MintChain, TxOptions};
use crate::config::DropConfig;
use crate::error::Result;
use crate::params::{build_mint_args, encode_args, select_function};

/// Live network gas price, capped at `max_gas_price`. Falls back to the cap when the lookup fails.
pub async fn optimal_gas_price(chain: &dyn MintChain, max_gas_price: u128) -> u128 {
    match chain.gas_price().await {
        Ok(gas_price) => gas_price.min(max_gas_price),
        Err(e) => {
            warn!("Failed to fetch gas price, using the configured ceiling: {}", e);
            max_gas_price
        }
    }
}

async fn submit_mint(
    chain: &dyn MintChain,
    wallet: &PrivateKeySigner,
    config: &DropConfig,
) -> Result<TxHash> {
    let args = build_mint_args(wallet.address(), config);
    let function = select_function(chain.abi(), &config.mint_function, args.len())?;
    let values = encode_args(function, &args)?;

    let options = TxOptions {
        gas_limit: config.gas_limit,
        gas_price: optimal_gas_price(chain, config.max_gas_price_wei()?).await,
        value: config.mint_value_wei()?,
    };

    let tx_hash = chain.submit(wallet, function, &values, options).await?;
    info!("Transaction sent: {}", tx_hash);

    chain.wait_for_confirmation(tx_hash).await
}

/// Mint `config.mint_quantity` tokens from one wallet.
///
/// Outcome is reported through the log only; a failed mint never stops the run.
pub async fn mint_nfts(
    chain: &dyn MintChain,
    wallet: &PrivateKeySigner,
    wallet_address: Address,
    config: &DropConfig,
) {
    info!(
        "Minting {} NFT(s) for wallet {}",
        config.mint_quantity, wallet_address
    );

    match submit_mint(chain, wallet, config).await {
        Ok(tx_hash) => {
            info!("Mint succeeded for {}! Tx: {}", wallet_address, tx_hash);
        }
        Err(e) => {
            let message = e.to_string();
            error!("Mint failed for {}: {}", wallet_address, message);
            if message.contains("phaseID") {
                warn!("The phaseID may be wrong. Verify it on the project's mint page");
            }
        }
    }
}
