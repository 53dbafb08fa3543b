//! In-memory chain for unit tests

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, Selector, TxHash, B256, U256};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

use crate::chain::{MintChain, TxOptions};
use crate::config::DropConfig;
use crate::error::{MinterError, Result};
use crate::params::ParamRole;

/// Anvil/hardhat development accounts 0..=2
pub(crate) const DEV_KEYS: [&str; 3] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

pub(crate) fn dev_address(index: usize) -> Address {
    DEV_KEYS[index]
        .parse::<PrivateKeySigner>()
        .unwrap()
        .address()
}

pub(crate) fn drop_config(mint_params: &[&str]) -> DropConfig {
    DropConfig {
        drop_name: "Boggy".to_string(),
        abi_file: PathBuf::from("abi.json"),
        mint_function: "mint".to_string(),
        mint_params: mint_params.iter().map(|p| ParamRole::from(*p)).collect(),
        mint_quantity: 3,
        mint_value: "0.01".to_string(),
        gas_limit: 300_000,
        max_gas_price_gwei: 50.0,
        delay_ms: 0,
        check_interval_ms: 1,
        phase_id: None,
        price: None,
        max_per_tx: None,
        max_per_user: None,
        max_per_phase: None,
        nonce: None,
        signature: None,
    }
}

/// Collects formatted log output for the current thread while the guard is held.
/// Tests using it must run on the current-thread runtime (the `#[tokio::test]` default).
#[derive(Clone, Default)]
pub(crate) struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_target(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Submission {
    pub from: Address,
    pub function: String,
    pub selector: Selector,
    pub args: Vec<DynSolValue>,
    pub options: TxOptions,
}

/// Everything the fake saw, in call order
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    View(String),
    Balance(Address),
    Submit(Address),
    Confirm(TxHash),
}

#[derive(Default)]
struct State {
    views: HashMap<String, VecDeque<Vec<DynSolValue>>>,
    view_args: HashMap<String, Vec<DynSolValue>>,
    events: Vec<Event>,
    submissions: Vec<Submission>,
}

pub(crate) struct FakeChain {
    abi: JsonAbi,
    gas_price: Option<u128>,
    balances: HashMap<Address, U256>,
    balance_errors: HashSet<Address>,
    rejected: HashMap<Address, String>,
    reverted: HashSet<Address>,
    state: Mutex<State>,
}

impl FakeChain {
    pub fn new(abi: JsonAbi) -> Self {
        Self {
            abi,
            gas_price: Some(1_000_000_000),
            balances: HashMap::new(),
            balance_errors: HashSet::new(),
            rejected: HashMap::new(),
            reverted: HashSet::new(),
            state: Mutex::new(State::default()),
        }
    }

    /// Always answer `function` with `values`
    pub fn with_view(self, function: &str, values: Vec<DynSolValue>) -> Self {
        self.with_view_sequence(function, vec![values])
    }

    /// Answer successive calls in order; the last answer repeats
    pub fn with_view_sequence(self, function: &str, answers: Vec<Vec<DynSolValue>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .views
            .insert(function.to_string(), answers.into());
        self
    }

    /// `None` makes the gas price lookup fail
    pub fn with_gas_price(mut self, gas_price: Option<u128>) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_balance(mut self, address: Address, wei: u64) -> Self {
        self.balances.insert(address, U256::from(wei));
        self
    }

    pub fn with_balance_error(mut self, address: Address) -> Self {
        self.balance_errors.insert(address);
        self
    }

    /// The node refuses transactions from `address`
    pub fn rejecting(mut self, address: Address, message: &str) -> Self {
        self.rejected.insert(address, message.to_string());
        self
    }

    /// Transactions from `address` are mined but revert
    pub fn reverting(mut self, address: Address) -> Self {
        self.reverted.insert(address);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn view_calls(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::View(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn view_args(&self, function: &str) -> Option<Vec<DynSolValue>> {
        self.state.lock().unwrap().view_args.get(function).cloned()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().unwrap().submissions.clone()
    }

    fn tx_hash_for(index: usize) -> TxHash {
        B256::with_last_byte(index as u8 + 1)
    }
}

#[async_trait]
impl MintChain for FakeChain {
    fn contract_address(&self) -> Address {
        Address::ZERO
    }

    fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    async fn gas_price(&self) -> Result<u128> {
        self.gas_price
            .ok_or_else(|| MinterError::Provider("gas price unavailable".to_string()))
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        self.state.lock().unwrap().events.push(Event::Balance(address));
        if self.balance_errors.contains(&address) {
            return Err(MinterError::Provider("balance lookup failed".to_string()));
        }
        Ok(self.balances.get(&address).copied().unwrap_or(U256::ZERO))
    }

    async fn call(&self, function: &Function, args: &[DynSolValue]) -> Result<Vec<DynSolValue>> {
        let function = function.name.as_str();
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::View(function.to_string()));
        state.view_args.insert(function.to_string(), args.to_vec());

        let answers = state
            .views
            .get_mut(function)
            .ok_or_else(|| MinterError::ContractCall(format!("{} call failed: execution reverted", function)))?;
        let answer = if answers.len() > 1 {
            answers.pop_front()
        } else {
            answers.front().cloned()
        };
        answer.ok_or_else(|| MinterError::ContractCall(format!("{} returned nothing", function)))
    }

    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        function: &Function,
        args: &[DynSolValue],
        options: TxOptions,
    ) -> Result<TxHash> {
        let from = signer.address();
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Submit(from));

        if let Some(message) = self.rejected.get(&from) {
            return Err(MinterError::Transaction(message.clone()));
        }

        state.submissions.push(Submission {
            from,
            function: function.name.clone(),
            selector: function.selector(),
            args: args.to_vec(),
            options,
        });
        Ok(Self::tx_hash_for(state.submissions.len() - 1))
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Confirm(tx_hash));

        let from = state
            .submissions
            .iter()
            .enumerate()
            .find(|(index, _)| Self::tx_hash_for(*index) == tx_hash)
            .map(|(_, submission)| submission.from)
            .ok_or_else(|| MinterError::Transaction(format!("unknown transaction {}", tx_hash)))?;

        if self.reverted.contains(&from) {
            return Err(MinterError::Transaction(format!("transaction {} reverted", tx_hash)));
        }
        Ok(tx_hash)
    }
}
