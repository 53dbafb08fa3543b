//! Multi-wallet NFT mint automation
//!
//! Loads a drop configuration, an RPC endpoint, a private key list and the
//! contract ABI from local files, waits until the contract reports its mint
//! window open, then mints from each wallet in key-file order.
//!
//! # Example
//!
//! ```rust,no_run
//! use nft_automint::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let paths = InputPaths::default();
//!     run(&paths, Some("0x...")).await
//! }
//! ```

pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod mint;
pub mod params;
pub mod prompt;
pub mod runner;
pub mod status;

#[cfg(test)]
pub(crate) mod fakes;

pub use chain::{derive_wallet, ChainClient, MintChain, TxOptions};
pub use config::{ConfigValue, DropConfig, PrivateKeySet, RpcConfig};
pub use error::{MinterError, Result};
pub use params::{MintArg, ParamRole};
pub use runner::{run, InputPaths, RunState};
pub use status::{is_mint_active, MintStatusProbe};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chain::{ChainClient, MintChain};
    pub use crate::config::{DropConfig, PrivateKeySet};
    pub use crate::error::{MinterError, Result};
    pub use crate::runner::{run, InputPaths};
}
