// The SDK boundary the deployers drive
//
// `LendingSdk` is the single seam between orchestration and the chain. The
// directory-backed implementation talks JSON-RPC; the mock implementation
// runs in memory. Deployers are written against the trait only.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use isopool_error::ChainResult;
use isopool_types::{
    parse_ether, AssetConfig, DeploymentResult, PoolConfig, PoolHandle, TxOptions,
};

/// Name of the default jump-rate model configuration
pub const JUMP_RATE_MODEL: &str = "JumpRateModel";

/// Name of the legacy linear model configuration
pub const WHITE_PAPER_MODEL: &str = "WhitePaperInterestRateModel";

/// Parameters of a named interest-rate-model family.
///
/// The model contract itself is already deployed (its address travels in the
/// asset config); this describes the curve the deployment expects, mirroring
/// what the protocol publishes for each named model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRateModelConf {
    pub name: String,
    /// Base borrow rate per year, 1e18-scaled
    pub base_rate_per_year: U256,
    /// Rate slope below the kink, 1e18-scaled
    pub multiplier_per_year: U256,
    /// Rate slope above the kink, jump models only
    pub jump_multiplier_per_year: Option<U256>,
    /// Utilization point where the jump slope starts, jump models only
    pub kink: Option<U256>,
}

/// Registry of named interest-rate-model configurations
#[derive(Debug, Clone)]
pub struct IrmRegistry {
    models: HashMap<String, InterestRateModelConf>,
}

impl IrmRegistry {
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    pub fn insert(&mut self, conf: InterestRateModelConf) {
        self.models.insert(conf.name.clone(), conf);
    }

    pub fn get(&self, name: &str) -> Option<&InterestRateModelConf> {
        self.models.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

impl Default for IrmRegistry {
    /// The two model families every deployment of this protocol ships with.
    fn default() -> Self {
        let mut registry = IrmRegistry::empty();
        registry.insert(InterestRateModelConf {
            name: JUMP_RATE_MODEL.to_string(),
            base_rate_per_year: U256::ZERO,
            multiplier_per_year: parse_ether("0.18").expect("constant"),
            jump_multiplier_per_year: Some(parse_ether("4").expect("constant")),
            kink: Some(parse_ether("0.8").expect("constant")),
        });
        registry.insert(InterestRateModelConf {
            name: WHITE_PAPER_MODEL.to_string(),
            base_rate_per_year: parse_ether("0.02").expect("constant"),
            multiplier_per_year: parse_ether("0.3").expect("constant"),
            jump_multiplier_per_year: None,
            kink: None,
        });
        registry
    }
}

/// Chain-facing operations for pool and market deployment.
///
/// Implementations submit at most one transaction per call and block until
/// it is mined. No retries, no caching: a revert or transport failure
/// surfaces to the caller unchanged.
#[async_trait]
pub trait LendingSdk: Send + Sync {
    /// Create a pool. Two calls with the same config create two pools.
    async fn deploy_pool(
        &self,
        config: &PoolConfig,
        opts: &TxOptions,
    ) -> ChainResult<PoolHandle>;

    /// Register one market in an existing pool.
    async fn deploy_asset(
        &self,
        irm: &InterestRateModelConf,
        config: &AssetConfig,
        opts: &TxOptions,
    ) -> ChainResult<DeploymentResult>;

    /// Look a pool up by display name; the most recent registration wins.
    async fn pool_by_name(&self, name: &str) -> ChainResult<Option<PoolHandle>>;

    /// The underlying token's `symbol()`, a read-only call.
    async fn erc20_symbol(&self, token: Address) -> ChainResult<String>;

    /// The protocol's fee sink for new markets.
    fn fee_distributor(&self) -> Address;

    /// Named interest-rate-model configurations.
    fn interest_rate_models(&self) -> &IrmRegistry;
}
