// Shared types for the isopool deployment harness
//
// This crate defines the deployment configuration model (pools, markets,
// results) and the 1e18 fixed-point helpers used at the chain boundary.

pub mod asset;
pub mod fixed;
pub mod pool;
pub mod tx;

pub use asset::{
    AssetConfig, DeploymentResult, MarketDelegate, MarketSpec, UnknownDelegate, MARKET_DECIMALS,
};
pub use fixed::{parse_ether, FixedPointError, Ratio, WAD};
pub use pool::{PoolConfig, PoolHandle};
pub use tx::{TransactionReceipt, TxOptions, TxStatus};

// Re-exported so downstream crates agree on the primitive types.
pub use alloy_primitives::{Address, B256, U256};
