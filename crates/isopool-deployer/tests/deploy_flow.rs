// End-to-end deployment flow against the mock SDK

use std::sync::Arc;

use alloy_primitives::Address;

use isopool_chain::{LendingSdk, MockSdk};
use isopool_deployer::{parse_market_spec, AssetDeployer, BatchPolicy, PoolDeployer};
use isopool_error::DeployError;
use isopool_types::{parse_ether, AssetConfig, PoolConfig, PoolHandle, TxOptions};

const DAI: Address = Address::repeat_byte(0x21);
const USDC: Address = Address::repeat_byte(0x22);
const WBTC: Address = Address::repeat_byte(0x23);

fn signer() -> TxOptions {
    TxOptions::new(Address::repeat_byte(0x01))
}

fn pool_config(name: &str) -> PoolConfig {
    PoolConfig {
        name: name.to_string(),
        whitelist_enabled: true,
        close_factor: parse_ether("0.5").unwrap(),
        max_assets: 20,
        liquidation_incentive: parse_ether("1.08").unwrap(),
        price_oracle: Address::repeat_byte(0x0a),
        whitelist: vec![],
    }
}

fn mock_with_tokens() -> MockSdk {
    MockSdk::new()
        .with_symbol(DAI, "DAI")
        .with_symbol(USDC, "USDC")
        .with_symbol(WBTC, "WBTC")
}

fn spec_for(underlying: Address) -> isopool_types::MarketSpec {
    let input = format!(
        "Test,deployer,CErc20Delegate,{underlying:#x},{:#x},0.02,0.75,0.1,0.05,true,,,",
        Address::repeat_byte(0x31)
    );
    parse_market_spec(&input).unwrap()
}

async fn resolved_configs(
    deployer: &AssetDeployer,
    pool: &PoolHandle,
    underlyings: &[Address],
) -> Vec<AssetConfig> {
    let mut configs = Vec::new();
    for underlying in underlyings {
        let spec = spec_for(*underlying);
        configs.push(
            deployer
                .resolve(&spec, pool, signer().from)
                .await
                .unwrap(),
        );
    }
    configs
}

#[tokio::test]
async fn pool_then_assets_happy_path() {
    let sdk = mock_with_tokens();
    let pools = PoolDeployer::new(Arc::new(sdk.clone()));
    let assets = AssetDeployer::new(Arc::new(sdk.clone()));

    let pool = pools.deploy(&pool_config("Test"), &signer()).await.unwrap();
    assert_ne!(pool.comptroller, Address::ZERO);

    let configs = resolved_configs(&assets, &pool, &[DAI, USDC]).await;
    assert_eq!(configs[0].name, "Test DAI");
    assert_eq!(configs[0].symbol, "m0-DAI");
    assert_eq!(configs[0].comptroller, pool.comptroller);

    let results = assets.deploy_assets(&configs, &signer()).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.deployed != Address::ZERO));
    assert!(results.iter().all(|r| r.receipt.succeeded()));

    // submitted strictly in input order
    let markets = sdk.markets();
    assert_eq!(markets.len(), 2);
    assert_eq!(markets[0].config.underlying, DAI);
    assert_eq!(markets[1].config.underlying, USDC);
    assert_eq!(markets[0].deployed, results[0].deployed);
}

#[tokio::test]
async fn same_pool_config_twice_yields_distinct_pools() {
    let sdk = MockSdk::new();
    let pools = PoolDeployer::new(Arc::new(sdk.clone()));

    let first = pools.deploy(&pool_config("Test"), &signer()).await.unwrap();
    let second = pools.deploy(&pool_config("Test"), &signer()).await.unwrap();
    assert_ne!(first.comptroller, second.comptroller);
    assert_ne!(first.id, second.id);

    // lookup resolves to the newest registration
    let found = sdk.pool_by_name("Test").await.unwrap().unwrap();
    assert_eq!(found.comptroller, second.comptroller);
}

#[tokio::test]
async fn batch_fails_fast_and_stops_submitting() {
    let sdk = mock_with_tokens();
    sdk.fail_underlying(USDC, "UNSUPPORTED_UNDERLYING");
    let pools = PoolDeployer::new(Arc::new(sdk.clone()));
    let assets = AssetDeployer::new(Arc::new(sdk.clone()));

    let pool = pools.deploy(&pool_config("Test"), &signer()).await.unwrap();
    let configs = resolved_configs(&assets, &pool, &[DAI, USDC, WBTC]).await;

    let txs_before = sdk.tx_count();
    let err = assets.deploy_assets(&configs, &signer()).await.unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(err.completed.len(), 1);
    assert!(err.source.to_string().contains("UNSUPPORTED_UNDERLYING"));

    // DAI deployed, USDC reverted, WBTC never submitted
    assert_eq!(sdk.tx_count() - txs_before, 2);
    assert_eq!(sdk.markets().len(), 1);
    assert_eq!(sdk.markets()[0].config.underlying, DAI);
}

#[tokio::test]
async fn continue_on_error_collects_per_asset_results() {
    let sdk = mock_with_tokens();
    sdk.fail_underlying(USDC, "UNSUPPORTED_UNDERLYING");
    let pools = PoolDeployer::new(Arc::new(sdk.clone()));
    let assets = AssetDeployer::new(Arc::new(sdk.clone()));

    let pool = pools.deploy(&pool_config("Test"), &signer()).await.unwrap();
    let configs = resolved_configs(&assets, &pool, &[DAI, USDC, WBTC]).await;

    let results = assets
        .deploy_assets_with_policy(&configs, &signer(), BatchPolicy::ContinueOnError)
        .await;
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
    assert_eq!(sdk.markets().len(), 2);
}

#[tokio::test]
async fn symbol_failure_precedes_any_submission() {
    let sdk = MockSdk::new(); // no symbols registered
    let pools = PoolDeployer::new(Arc::new(sdk.clone()));
    let assets = AssetDeployer::new(Arc::new(sdk.clone()));

    let pool = pools.deploy(&pool_config("Test"), &signer()).await.unwrap();
    let txs_after_pool = sdk.tx_count();

    let err = assets
        .resolve(&spec_for(DAI), &pool, signer().from)
        .await
        .unwrap_err();
    assert!(matches!(err, DeployError::Chain(_)));
    // the read failed; no deployment transaction was ever submitted
    assert_eq!(sdk.tx_count(), txs_after_pool);
    assert!(sdk.markets().is_empty());
}

#[tokio::test]
async fn parse_failure_means_zero_chain_calls() {
    let sdk = MockSdk::new();
    let err = parse_market_spec("Test,deployer,CErc20Delegate,0xdead").unwrap_err();
    assert_eq!(err.to_string(), "expected 13 comma-separated fields, found 4");
    assert_eq!(sdk.total_calls(), 0);
}
