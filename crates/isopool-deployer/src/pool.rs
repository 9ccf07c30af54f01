// Pool deployment

use std::sync::Arc;

use tracing::info;

use isopool_error::DeployResult;
use isopool_types::{PoolConfig, PoolHandle, TxOptions};

use isopool_chain::LendingSdk;

/// Deploys isolated pools through the SDK boundary.
#[derive(Clone)]
pub struct PoolDeployer {
    sdk: Arc<dyn LendingSdk>,
}

impl PoolDeployer {
    pub fn new(sdk: Arc<dyn LendingSdk>) -> Self {
        Self { sdk }
    }

    /// Create a pool: validate client-side, submit one transaction, and
    /// block until it is mined.
    ///
    /// Validation failures never reach the chain. A revert surfaces
    /// unchanged with the protocol's reason; resubmitting with corrected
    /// parameters is the caller's decision. Two calls with an identical
    /// config create two distinct pools.
    pub async fn deploy(
        &self,
        config: &PoolConfig,
        opts: &TxOptions,
    ) -> DeployResult<PoolHandle> {
        config.validate()?;
        info!(pool = %config.name, oracle = %config.price_oracle, "deploying pool");
        let handle = self.sdk.deploy_pool(config, opts).await?;
        info!(
            pool = %handle.name,
            id = handle.id,
            comptroller = %handle.comptroller,
            "pool deployed"
        );
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use isopool_chain::MockSdk;
    use isopool_error::DeployError;
    use isopool_types::parse_ether;

    fn config() -> PoolConfig {
        PoolConfig {
            name: "TEST".to_string(),
            whitelist_enabled: true,
            close_factor: parse_ether("0.5").unwrap(),
            max_assets: 20,
            liquidation_incentive: parse_ether("1.08").unwrap(),
            price_oracle: Address::repeat_byte(0x0a),
            whitelist: vec![Address::repeat_byte(0x0b)],
        }
    }

    #[tokio::test]
    async fn deploys_and_returns_distinct_addresses() {
        let sdk = MockSdk::new();
        let deployer = PoolDeployer::new(Arc::new(sdk));
        let opts = TxOptions::new(Address::repeat_byte(0x01));

        let handle = deployer.deploy(&config(), &opts).await.unwrap();
        assert_ne!(handle.comptroller, Address::ZERO);
        assert_ne!(handle.implementation, Address::ZERO);
        assert_ne!(handle.oracle, Address::ZERO);
        assert_ne!(handle.comptroller, handle.implementation);
        assert_ne!(handle.comptroller, handle.oracle);
    }

    #[tokio::test]
    async fn invalid_config_never_reaches_the_chain() {
        let sdk = MockSdk::new();
        let deployer = PoolDeployer::new(Arc::new(sdk.clone()));
        let opts = TxOptions::new(Address::repeat_byte(0x01));

        let mut bad = config();
        bad.close_factor = parse_ether("1.5").unwrap();
        let err = deployer.deploy(&bad, &opts).await.unwrap_err();
        assert!(matches!(err, DeployError::Validation(_)));
        assert_eq!(sdk.total_calls(), 0);
    }

    #[tokio::test]
    async fn revert_surfaces_with_reason() {
        let sdk = MockSdk::new();
        sdk.fail_next_pool("POOL_LIMIT_REACHED");
        let deployer = PoolDeployer::new(Arc::new(sdk));
        let opts = TxOptions::new(Address::repeat_byte(0x01));

        let err = deployer.deploy(&config(), &opts).await.unwrap_err();
        assert!(err.to_string().contains("POOL_LIMIT_REACHED"));
    }
}
