// CLI task implementations

use std::sync::Arc;

use alloy_primitives::Address;
use anyhow::{anyhow, ensure, Context, Result};
use colored::Colorize;
use tracing::debug;

use isopool_chain::{ChainContext, DirectorySdk, JsonRpcClient, LendingSdk};
use isopool_deployer::{parse_market_spec, AssetDeployer, PoolDeployer};
use isopool_types::{parse_ether, PoolConfig, TxOptions};

use crate::config::{self, NetworkConfig};

/// Arguments for `pool create`
#[derive(Debug, clap::Args)]
pub struct PoolCreateArgs {
    /// Pool display name
    #[arg(long)]
    pub name: String,
    /// Named account that submits the deployment
    #[arg(long, default_value = "deployer")]
    pub creator: String,
    /// Maximum liquidatable fraction of a borrow, e.g. 0.5
    #[arg(long)]
    pub close_factor: String,
    /// Maximum number of markets the pool accepts
    #[arg(long, default_value_t = 20)]
    pub max_assets: u32,
    /// Liquidator bonus multiplier, e.g. 1.08
    #[arg(long)]
    pub liquidation_incentive: String,
    /// Previously deployed price oracle
    #[arg(long)]
    pub price_oracle: Address,
    /// Enforce the supplier/borrower whitelist
    #[arg(long)]
    pub whitelist_enabled: bool,
    /// Whitelisted accounts, repeatable
    #[arg(long)]
    pub whitelist: Vec<Address>,
}

/// Build the SDK for a resolved network and signer.
async fn connect(network: &NetworkConfig, creator: &str) -> Result<(Arc<DirectorySdk>, Address)> {
    let rpc = Arc::new(JsonRpcClient::new(&network.url));
    let node_chain = rpc.chain_id().await?;
    ensure!(
        node_chain == network.chain_id,
        "node at {} reports chain id {node_chain}, network {:?} expects {}",
        network.url,
        network.name,
        network.chain_id
    );
    let signer = config::named_signer(&rpc, creator).await?;
    debug!(network = %network.name, signer = %signer, "connected");

    let addresses = config::protocol_addresses()?;
    let ctx = ChainContext::new(rpc, signer, network.chain_id);
    let sdk = DirectorySdk::new(ctx, addresses.directory, addresses.fee_distributor);
    Ok((Arc::new(sdk), signer))
}

/// `market create`: parse the positional asset config, resolve it against
/// its pool, deploy, and print the market address.
pub async fn market_create(asset_config: &str, network: &NetworkConfig) -> Result<()> {
    let spec = parse_market_spec(asset_config)?;
    let (sdk, signer) = connect(network, &spec.creator).await?;

    let pool = sdk
        .pool_by_name(&spec.pool_name)
        .await?
        .ok_or_else(|| anyhow!("no pool named {:?} on {}", spec.pool_name, network.name))?;

    let deployer = AssetDeployer::new(sdk);
    let config = deployer
        .resolve(&spec, &pool, signer)
        .await
        .context("failed to resolve asset config")?;
    println!("{:#?}", config);

    let result = deployer
        .deploy_asset(&config, &TxOptions::new(signer))
        .await?;
    println!("{} {}", "CToken:".green().bold(), result.deployed);
    Ok(())
}

/// `pool create`: deploy a pool and print its addresses.
pub async fn pool_create(args: PoolCreateArgs, network: &NetworkConfig) -> Result<()> {
    let config = PoolConfig {
        name: args.name,
        whitelist_enabled: args.whitelist_enabled,
        close_factor: parse_ether(&args.close_factor)
            .map_err(|e| anyhow!("--close-factor: {e}"))?,
        max_assets: args.max_assets,
        liquidation_incentive: parse_ether(&args.liquidation_incentive)
            .map_err(|e| anyhow!("--liquidation-incentive: {e}"))?,
        price_oracle: args.price_oracle,
        whitelist: args.whitelist,
    };
    let (sdk, signer) = connect(network, &args.creator).await?;

    let deployer = PoolDeployer::new(sdk);
    let pool = deployer.deploy(&config, &TxOptions::new(signer)).await?;
    println!(
        "{} pool {} at {}, comptroller implementation {}, oracle {}",
        "Deployed".green().bold(),
        pool.name,
        pool.comptroller,
        pool.implementation,
        pool.oracle
    );
    Ok(())
}
