// Market (asset) deployment

use std::sync::Arc;

use alloy_primitives::Address;
use thiserror::Error;
use tracing::{info, warn};

use isopool_error::{ChainError, DeployError, DeployResult};
use isopool_types::{AssetConfig, DeploymentResult, MarketSpec, PoolHandle, TxOptions};

use isopool_chain::{LendingSdk, JUMP_RATE_MODEL};

/// What a batch does after one asset fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Stop submitting; assets after the failure never reach the chain
    #[default]
    FailFast,
    /// Keep going and collect per-asset results
    ContinueOnError,
}

/// A fail-fast batch stopped early.
///
/// Deployments are terminal on-chain facts, so the ones that succeeded
/// before the failure are reported rather than discarded.
#[derive(Error, Debug)]
#[error("asset {index} failed after {} deployments: {source}", .completed.len())]
pub struct BatchError {
    /// Position of the failing asset in the input batch
    pub index: usize,
    /// Results for the assets deployed before the failure
    pub completed: Vec<DeploymentResult>,
    #[source]
    pub source: DeployError,
}

/// Deploys markets into existing pools through the SDK boundary.
#[derive(Clone)]
pub struct AssetDeployer {
    sdk: Arc<dyn LendingSdk>,
}

impl AssetDeployer {
    pub fn new(sdk: Arc<dyn LendingSdk>) -> Self {
        Self { sdk }
    }

    /// Turn a parsed spec into a submittable config.
    ///
    /// Queries the underlying token's `symbol()`. The market's display name
    /// embeds it, so this read is required, and its failure (revert or
    /// transport) aborts resolution before any transaction is submitted.
    pub async fn resolve(
        &self,
        spec: &MarketSpec,
        pool: &PoolHandle,
        admin: Address,
    ) -> DeployResult<AssetConfig> {
        let symbol = self.sdk.erc20_symbol(spec.underlying).await?;
        Ok(AssetConfig::from_spec(
            spec,
            pool,
            self.sdk.fee_distributor(),
            admin,
            &symbol,
        ))
    }

    /// Register one market: one transaction, mined before this returns.
    pub async fn deploy_asset(
        &self,
        config: &AssetConfig,
        opts: &TxOptions,
    ) -> DeployResult<DeploymentResult> {
        let irm = self
            .sdk
            .interest_rate_models()
            .get(JUMP_RATE_MODEL)
            .ok_or_else(|| ChainError::contract("no JumpRateModel configuration registered"))?
            .clone();
        info!(market = %config.symbol, underlying = %config.underlying, "deploying market");
        let result = self.sdk.deploy_asset(&irm, config, opts).await?;
        info!(market = %config.symbol, address = %result.deployed, "market deployed");
        Ok(result)
    }

    /// Deploy a batch strictly sequentially, in input order, fail-fast.
    ///
    /// Sequential submission is a hard constraint: all transactions come
    /// from one signer, and nonce ordering does not tolerate concurrent
    /// submission. On the first failure the remaining assets are not
    /// submitted and `BatchError` reports the failing position.
    pub async fn deploy_assets(
        &self,
        configs: &[AssetConfig],
        opts: &TxOptions,
    ) -> Result<Vec<DeploymentResult>, BatchError> {
        let mut completed = Vec::with_capacity(configs.len());
        for (index, config) in configs.iter().enumerate() {
            match self.deploy_asset(config, opts).await {
                Ok(result) => completed.push(result),
                Err(source) => {
                    warn!(
                        index,
                        market = %config.symbol,
                        "asset deployment failed, aborting batch"
                    );
                    return Err(BatchError {
                        index,
                        completed,
                        source,
                    });
                }
            }
        }
        Ok(completed)
    }

    /// Batch deployment with an explicit failure policy. Still sequential;
    /// `ContinueOnError` only changes what happens after a failure, not the
    /// submission order.
    pub async fn deploy_assets_with_policy(
        &self,
        configs: &[AssetConfig],
        opts: &TxOptions,
        policy: BatchPolicy,
    ) -> Vec<DeployResult<DeploymentResult>> {
        let mut results = Vec::with_capacity(configs.len());
        for (index, config) in configs.iter().enumerate() {
            let outcome = self.deploy_asset(config, opts).await;
            let failed = outcome.is_err();
            results.push(outcome);
            if failed && policy == BatchPolicy::FailFast {
                warn!(index, "aborting batch after failure");
                break;
            }
        }
        results
    }
}
