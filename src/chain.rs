//! Chain access: RPC provider, contract binding over the loaded JSON ABI, and per-wallet signing

use alloy_contract::{ContractInstance, Interface};
use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::{Function, JsonAbi};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{PendingTransactionBuilder, Provider, ProviderBuilder, RootProvider};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{MinterError, Result};

/// Options attached to every mint transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    pub gas_limit: u64,
    /// Legacy gas price in wei
    pub gas_price: u128,
    /// Native currency attached, in wei
    pub value: U256,
}

/// What the minter needs from the chain. One read-only binding, shared by every wallet.
#[async_trait]
pub trait MintChain: Send + Sync {
    fn contract_address(&self) -> Address;

    fn abi(&self) -> &JsonAbi;

    /// Current network gas price in wei
    async fn gas_price(&self) -> Result<u128>;

    /// Native-currency balance in wei
    async fn balance(&self, address: Address) -> Result<U256>;

    /// Read-only call of one specific ABI function (overloads are told apart by selector)
    async fn call(&self, function: &Function, args: &[DynSolValue]) -> Result<Vec<DynSolValue>>;

    /// Sign with `signer` and broadcast; returns the transaction hash once accepted by the node
    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        function: &Function,
        args: &[DynSolValue],
        options: TxOptions,
    ) -> Result<TxHash>;

    /// Block until the transaction is mined. A reverted transaction is an error.
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxHash>;
}

/// Derive a signing wallet from a hex private key (with or without `0x`)
pub fn derive_wallet(private_key: &str) -> Result<PrivateKeySigner> {
    private_key
        .parse::<PrivateKeySigner>()
        .map_err(|e| MinterError::InvalidInput(format!("Invalid private key: {}", e)))
}

/// Alloy-backed chain client
pub struct ChainClient {
    provider: RootProvider,
    address: Address,
    abi: JsonAbi,
    instance: ContractInstance<RootProvider>,
}

impl ChainClient {
    /// Bind to `rpc_url` and the contract at `address`
    pub fn new(rpc_url: &str, address: Address, abi: JsonAbi) -> Result<Self> {
        let http_url: reqwest::Url = rpc_url
            .parse()
            .map_err(|e| MinterError::Provider(format!("Invalid RPC URL: {}", e)))?;

        let provider = RootProvider::new_http(http_url);
        let instance = ContractInstance::new(address, provider.clone(), Interface::new(abi.clone()));

        Ok(Self {
            provider,
            address,
            abi,
            instance,
        })
    }

    /// Check connection to the RPC endpoint; returns (chain id, block number)
    pub async fn check_connection(&self) -> Result<(u64, u64)> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| MinterError::Provider(format!("Failed to get chain id: {}", e)))?;

        let block_number = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| MinterError::Provider(format!("Failed to get block number: {}", e)))?;

        Ok((chain_id, block_number))
    }
}

#[async_trait]
impl MintChain for ChainClient {
    fn contract_address(&self) -> Address {
        self.address
    }

    fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| MinterError::Provider(format!("Failed to get gas price: {}", e)))
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| MinterError::Provider(format!("Failed to get balance of {}: {}", address, e)))
    }

    async fn call(&self, function: &Function, args: &[DynSolValue]) -> Result<Vec<DynSolValue>> {
        let call = self
            .instance
            .function_from_selector(&function.selector(), args)
            .map_err(|e| {
                MinterError::ContractCall(format!("Failed to create call to {}: {}", function.name, e))
            })?;

        call.call()
            .await
            .map_err(|e| MinterError::ContractCall(format!("{} call failed: {}", function.name, e)))
    }

    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        function: &Function,
        args: &[DynSolValue],
        options: TxOptions,
    ) -> Result<TxHash> {
        // Wallet-scoped view over the shared provider
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_provider(self.provider.clone());
        let instance = ContractInstance::new(self.address, provider, Interface::new(self.abi.clone()));

        debug!(
            "Sending {} from {} (gas limit {}, gas price {} wei, value {} wei)",
            function.signature(),
            signer.address(),
            options.gas_limit,
            options.gas_price,
            options.value
        );

        let pending = instance
            .function_from_selector(&function.selector(), args)
            .map_err(|e| MinterError::ContractCall(format!("Failed to create transaction: {}", e)))?
            .gas(options.gas_limit)
            .gas_price(options.gas_price)
            .value(options.value)
            .send()
            .await
            .map_err(|e| MinterError::Transaction(format!("Transaction failed: {}", e)))?;

        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxHash> {
        let receipt = PendingTransactionBuilder::new(self.provider.clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| MinterError::Transaction(format!("Failed to get receipt: {}", e)))?;

        if !receipt.status() {
            warn!("Transaction {} was mined but reverted", tx_hash);
            return Err(MinterError::Transaction(format!(
                "transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        Ok(receipt.transaction_hash)
    }
}
