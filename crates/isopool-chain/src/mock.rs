//! Mock SDK for testing
//!
//! An in-memory chain double implementing `LendingSdk` without a node:
//! deterministic addresses, a pool registry with the directory's
//! newest-registration-wins lookup, registered ERC20 symbols, scripted
//! reverts, and read/transaction counters so tests can assert that an error
//! path performed no chain interaction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{keccak256, Address};
use async_trait::async_trait;

use isopool_error::{ChainError, ChainResult};
use isopool_types::{
    AssetConfig, DeploymentResult, PoolConfig, PoolHandle, TransactionReceipt, TxOptions,
    TxStatus,
};

use crate::sdk::{InterestRateModelConf, IrmRegistry, LendingSdk};

/// A market the mock has accepted, kept for assertions
#[derive(Debug, Clone)]
pub struct DeployedMarket {
    pub comptroller: Address,
    pub config: AssetConfig,
    pub deployed: Address,
}

#[derive(Debug, Default)]
struct MockChainState {
    nonce: u64,
    block: u64,
    pools: Vec<PoolHandle>,
    markets: Vec<DeployedMarket>,
    symbols: HashMap<Address, String>,
    asset_reverts: HashMap<Address, String>,
    pool_revert: Option<String>,
    reads: u64,
    txs: u64,
}

impl MockChainState {
    fn next_address(&mut self) -> Address {
        self.nonce += 1;
        let hash = keccak256(self.nonce.to_be_bytes());
        Address::from_slice(&hash[12..])
    }

    fn next_tx(&mut self) -> TransactionReceipt {
        self.nonce += 1;
        self.block += 1;
        TransactionReceipt {
            tx_hash: keccak256(self.nonce.to_be_bytes()),
            status: TxStatus::Success,
            block_number: Some(self.block),
            gas_used: Some(1_850_000),
        }
    }
}

/// In-memory `LendingSdk` implementation
#[derive(Debug, Clone)]
pub struct MockSdk {
    fee_distributor: Address,
    irm: IrmRegistry,
    state: Arc<Mutex<MockChainState>>,
}

impl Default for MockSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSdk {
    pub fn new() -> Self {
        Self {
            fee_distributor: Address::repeat_byte(0xfe),
            irm: IrmRegistry::default(),
            state: Arc::new(Mutex::new(MockChainState::default())),
        }
    }

    fn state(&self) -> ChainResult<MutexGuard<'_, MockChainState>> {
        self.state
            .lock()
            .map_err(|_| ChainError::contract("mock chain state poisoned"))
    }

    /// Register an ERC20 symbol so `erc20_symbol` answers for `token`.
    pub fn with_symbol(self, token: Address, symbol: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.symbols.insert(token, symbol.to_string());
        }
        self
    }

    /// Script the next pool deployment to revert with `reason`.
    pub fn fail_next_pool(&self, reason: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.pool_revert = Some(reason.to_string());
        }
    }

    /// Script every market deployment for `underlying` to revert.
    pub fn fail_underlying(&self, underlying: Address, reason: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.asset_reverts.insert(underlying, reason.to_string());
        }
    }

    /// Transactions submitted so far
    pub fn tx_count(&self) -> u64 {
        self.state.lock().map(|s| s.txs).unwrap_or(0)
    }

    /// Read-only calls made so far
    pub fn read_count(&self) -> u64 {
        self.state.lock().map(|s| s.reads).unwrap_or(0)
    }

    /// All chain interactions, reads and transactions together
    pub fn total_calls(&self) -> u64 {
        self.tx_count() + self.read_count()
    }

    /// Markets accepted so far, in deployment order
    pub fn markets(&self) -> Vec<DeployedMarket> {
        self.state.lock().map(|s| s.markets.clone()).unwrap_or_default()
    }

    /// Pools registered so far, in deployment order
    pub fn pools(&self) -> Vec<PoolHandle> {
        self.state.lock().map(|s| s.pools.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LendingSdk for MockSdk {
    async fn deploy_pool(
        &self,
        config: &PoolConfig,
        _opts: &TxOptions,
    ) -> ChainResult<PoolHandle> {
        let mut state = self.state()?;
        state.txs += 1;
        if let Some(reason) = state.pool_revert.take() {
            return Err(ChainError::revert(reason));
        }
        let comptroller = state.next_address();
        let implementation = state.next_address();
        let id = state.pools.len() as u64;
        let handle = PoolHandle::new(
            id,
            &config.name,
            comptroller,
            implementation,
            config.price_oracle,
        );
        state.pools.push(handle.clone());
        Ok(handle)
    }

    async fn deploy_asset(
        &self,
        _irm: &InterestRateModelConf,
        config: &AssetConfig,
        _opts: &TxOptions,
    ) -> ChainResult<DeploymentResult> {
        let mut state = self.state()?;
        state.txs += 1;
        if let Some(reason) = state.asset_reverts.get(&config.underlying) {
            return Err(ChainError::revert(reason.clone()));
        }
        let deployed = state.next_address();
        let implementation = state.next_address();
        let receipt = state.next_tx();
        state.markets.push(DeployedMarket {
            comptroller: config.comptroller,
            config: config.clone(),
            deployed,
        });
        Ok(DeploymentResult {
            deployed,
            implementation,
            receipt,
        })
    }

    async fn pool_by_name(&self, name: &str) -> ChainResult<Option<PoolHandle>> {
        let mut state = self.state()?;
        state.reads += 1;
        Ok(state.pools.iter().rev().find(|p| p.name == name).cloned())
    }

    async fn erc20_symbol(&self, token: Address) -> ChainResult<String> {
        let mut state = self.state()?;
        state.reads += 1;
        state
            .symbols
            .get(&token)
            .cloned()
            .ok_or_else(|| ChainError::revert("execution reverted"))
    }

    fn fee_distributor(&self) -> Address {
        self.fee_distributor
    }

    fn interest_rate_models(&self) -> &IrmRegistry {
        &self.irm
    }
}
