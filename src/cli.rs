//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

use crate::config::{DEFAULT_CONFIG_PATH, DEFAULT_KEYS_PATH, DEFAULT_RPC_PATH};
use crate::runner::InputPaths;

#[derive(Parser, Debug)]
#[command(name = "nft-automint")]
#[command(about = "Wait for an NFT drop to open, then mint from every wallet in the key file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Drop configuration file
    #[arg(short, long, env = "AUTOMINT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// RPC endpoint file
    #[arg(short, long, env = "AUTOMINT_RPC", default_value = DEFAULT_RPC_PATH)]
    pub rpc: PathBuf,

    /// Private key file, one key per line
    #[arg(short = 'k', long, env = "AUTOMINT_KEYS", default_value = DEFAULT_KEYS_PATH)]
    pub keys: PathBuf,

    /// Contract address; prompted for interactively when omitted
    #[arg(long, env = "CONTRACT_ADDRESS")]
    pub contract: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn input_paths(&self) -> InputPaths {
        InputPaths {
            config: self.config.clone(),
            rpc: self.rpc.clone(),
            keys: self.keys.clone(),
        }
    }
}
