//! Run orchestration: load inputs, bind the contract, wait for the mint window, mint per wallet

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::chain::{derive_wallet, ChainClient, MintChain};
use crate::config::{
    load_abi, load_drop_config, load_private_keys, load_rpc_config, DropConfig, PrivateKeySet,
    DEFAULT_CONFIG_PATH, DEFAULT_KEYS_PATH, DEFAULT_RPC_PATH,
};
use crate::error::Result;
use crate::mint::mint_nfts;
use crate::prompt::{parse_contract_address, prompt_contract_address};
use crate::status::{is_mint_active, MintStatusProbe};

/// Phases of a run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Loading,
    AwaitingAddress,
    Connected,
    PollingMintStatus,
    Minting,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Loading => "LOADING",
            RunState::AwaitingAddress => "AWAITING_ADDRESS",
            RunState::Connected => "CONNECTED",
            RunState::PollingMintStatus => "POLLING_MINT_STATUS",
            RunState::Minting => "MINTING",
            RunState::Done => "DONE",
        };
        f.write_str(name)
    }
}

fn enter(state: RunState) {
    debug!("Entering {}", state);
}

/// Where the run reads its local inputs from
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub config: PathBuf,
    pub rpc: PathBuf,
    pub keys: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            rpc: PathBuf::from(DEFAULT_RPC_PATH),
            keys: PathBuf::from(DEFAULT_KEYS_PATH),
        }
    }
}

fn print_banner(drop_name: &str) {
    println!();
    println!("{}", format!("=== NFT Auto-Mint: {} ===", drop_name).bright_blue().bold());
    println!();
}

fn print_done() {
    println!();
    println!("{}", "=== Done ===".bright_blue().bold());
}

/// Full run. Errors returned here are startup or shared-setup failures; wallet failures are only logged.
pub async fn run(paths: &InputPaths, contract: Option<&str>) -> Result<()> {
    enter(RunState::Loading);
    let config = load_drop_config(&paths.config).await?;
    print_banner(&config.drop_name);
    let rpc = load_rpc_config(&paths.rpc).await?;
    let keys = load_private_keys(&paths.keys).await?;
    let abi = load_abi(&config.abi_file).await?;

    enter(RunState::AwaitingAddress);
    let address = match contract {
        Some(address) => parse_contract_address(address)?,
        None => prompt_contract_address().await?,
    };

    info!("RPC endpoint: {}", rpc.rpc_url);
    info!("NFT contract: {}", address);
    info!("Wallets: {}", keys.len());

    enter(RunState::Connected);
    let client = ChainClient::new(&rpc.rpc_url, address, abi)?;
    let (chain_id, block_number) = client.check_connection().await?;
    info!("Connected to chain {} at block {}", chain_id, block_number);

    let probe = MintStatusProbe::classify(client.abi());
    info!("Mint status check: {}", probe);

    enter(RunState::PollingMintStatus);
    wait_for_mint(&client, probe, &config).await;

    enter(RunState::Minting);
    mint_all(&client, &keys, &config).await;

    enter(RunState::Done);
    print_done();
    Ok(())
}

/// Poll at a fixed interval until the mint window opens. No upper bound.
pub async fn wait_for_mint(chain: &dyn MintChain, probe: MintStatusProbe, config: &DropConfig) {
    info!("Checking mint status...");
    if is_mint_active(chain, probe, config).await {
        return;
    }

    info!("Mint has not started yet. Watching the contract...");
    let interval = Duration::from_millis(config.check_interval_ms);
    loop {
        info!("Waiting {:.1} seconds before checking again...", interval.as_secs_f64());
        sleep(interval).await;
        if is_mint_active(chain, probe, config).await {
            break;
        }
    }
    info!("Mint is live! Starting to mint...");
}

/// One wallet, strictly in key-file order. Each wallet finishes before the next starts.
pub async fn mint_all(chain: &dyn MintChain, keys: &PrivateKeySet, config: &DropConfig) {
    if keys.is_empty() {
        warn!("No private keys loaded, nothing to mint");
        return;
    }

    let total = keys.len();
    let delay = Duration::from_millis(config.delay_ms);

    for (index, key) in keys.iter().enumerate() {
        if let Err(e) = process_wallet(chain, index, total, key, config).await {
            error!("Error on wallet {}: {}", index + 1, e);
        }

        if index + 1 < total {
            info!("Waiting {}ms before the next wallet...", config.delay_ms);
            sleep(delay).await;
        }
    }
}

async fn process_wallet(
    chain: &dyn MintChain,
    index: usize,
    total: usize,
    key: &str,
    config: &DropConfig,
) -> Result<()> {
    let wallet = derive_wallet(key)?;
    let address = wallet.address();
    info!("Processing wallet {}/{}: {}", index + 1, total, address);

    // Native gas-token balance only; mint price allowances are not checked
    let balance = chain.balance(address).await?;
    if balance.is_zero() {
        warn!("Native balance is empty for {}, skipping", address);
        return Ok(());
    }

    mint_nfts(chain, &wallet, address, config).await;
    Ok(())
}
