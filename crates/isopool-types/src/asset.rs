// Market (asset) configuration types

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fixed::Ratio;
use crate::pool::PoolHandle;
use crate::tx::TransactionReceipt;

/// Market token decimals, fixed across this protocol family.
pub const MARKET_DECIMALS: u8 = 8;

/// Which market implementation a deployment uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketDelegate {
    /// Plain ERC20 market
    CErc20Delegate,
    /// Native-asset market
    CEtherDelegate,
    /// ERC20 market with an ERC4626 plugin strategy
    CErc20PluginDelegate,
    /// Plugin market that also streams rewards
    CErc20PluginRewardsDelegate,
}

impl MarketDelegate {
    /// Stable ordinal used on the wire
    pub fn ordinal(&self) -> u8 {
        match self {
            MarketDelegate::CErc20Delegate => 0,
            MarketDelegate::CEtherDelegate => 1,
            MarketDelegate::CErc20PluginDelegate => 2,
            MarketDelegate::CErc20PluginRewardsDelegate => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketDelegate::CErc20Delegate => "CErc20Delegate",
            MarketDelegate::CEtherDelegate => "CEtherDelegate",
            MarketDelegate::CErc20PluginDelegate => "CErc20PluginDelegate",
            MarketDelegate::CErc20PluginRewardsDelegate => "CErc20PluginRewardsDelegate",
        }
    }
}

impl fmt::Display for MarketDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a delegate contract name is not one of the known kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown delegate contract {0:?}")]
pub struct UnknownDelegate(pub String);

impl FromStr for MarketDelegate {
    type Err = UnknownDelegate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CErc20Delegate" => Ok(MarketDelegate::CErc20Delegate),
            "CEtherDelegate" => Ok(MarketDelegate::CEtherDelegate),
            "CErc20PluginDelegate" => Ok(MarketDelegate::CErc20PluginDelegate),
            "CErc20PluginRewardsDelegate" => Ok(MarketDelegate::CErc20PluginRewardsDelegate),
            other => Err(UnknownDelegate(other.to_string())),
        }
    }
}

/// The typed product of the positional market parameter string.
///
/// This is everything the caller states up front. The fields that need the
/// chain (comptroller address, token symbol, derived market name) are filled
/// in later by `AssetConfig` resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSpec {
    /// Name of the pool the market joins
    pub pool_name: String,
    /// Named account submitting and administering the market
    pub creator: String,
    /// Market implementation kind
    pub delegate: MarketDelegate,
    /// Underlying ERC20 token
    pub underlying: Address,
    /// Deployed interest-rate model contract
    pub interest_rate_model: Address,
    /// Initial exchange rate, 1e18-scaled
    pub initial_exchange_rate: U256,
    /// Fraction of the asset's value usable as borrowing collateral
    pub collateral_factor: Ratio,
    /// Fraction of accrued interest kept as protocol reserves
    pub reserve_factor: Ratio,
    /// Fraction of accrued interest paid to the pool admin
    pub admin_fee: Ratio,
    /// Skip the oracle price-feed check at market creation
    pub bypass_price_feed_check: bool,
    /// ERC4626 plugin strategy, for plugin delegates
    pub plugin: Option<Address>,
    /// Rewards distributor, for rewards delegates
    pub rewards_distributor: Option<Address>,
    /// Token the distributor streams
    pub reward_token: Option<Address>,
}

/// A fully resolved market configuration, ready to submit.
///
/// Built from a `MarketSpec`, a `PoolHandle`, and the underlying token's
/// on-chain `symbol()`; see `AssetDeployer::resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub delegate: MarketDelegate,
    pub underlying: Address,
    /// The pool the market attaches to, taken from a `PoolHandle`
    pub comptroller: Address,
    /// Protocol fee sink
    pub fee_distributor: Address,
    pub interest_rate_model: Address,
    pub initial_exchange_rate: U256,
    /// Display name, `"{pool} {SYMBOL}"`
    pub name: String,
    /// Market token symbol, `"m{pool_id}-{SYMBOL}"`
    pub symbol: String,
    /// Always `MARKET_DECIMALS` for this protocol family
    pub decimals: u8,
    /// Market admin
    pub admin: Address,
    pub collateral_factor: Ratio,
    pub reserve_factor: Ratio,
    pub admin_fee: Ratio,
    pub bypass_price_feed_check: bool,
    pub plugin: Option<Address>,
    pub rewards_distributor: Option<Address>,
    pub reward_token: Option<Address>,
}

impl AssetConfig {
    /// Derive the resolved config from its parts. `symbol` is the underlying
    /// token's on-chain symbol, already queried by the caller.
    pub fn from_spec(
        spec: &MarketSpec,
        pool: &PoolHandle,
        fee_distributor: Address,
        admin: Address,
        underlying_symbol: &str,
    ) -> Self {
        AssetConfig {
            delegate: spec.delegate,
            underlying: spec.underlying,
            comptroller: pool.comptroller,
            fee_distributor,
            interest_rate_model: spec.interest_rate_model,
            initial_exchange_rate: spec.initial_exchange_rate,
            name: format!("{} {}", pool.name, underlying_symbol),
            symbol: format!("m{}-{}", pool.id, underlying_symbol),
            decimals: MARKET_DECIMALS,
            admin,
            collateral_factor: spec.collateral_factor,
            reserve_factor: spec.reserve_factor,
            admin_fee: spec.admin_fee,
            bypass_price_feed_check: spec.bypass_price_feed_check,
            plugin: spec.plugin,
            rewards_distributor: spec.rewards_distributor,
            reward_token: spec.reward_token,
        }
    }
}

/// The terminal fact a market deployment produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    /// Address of the new market token
    pub deployed: Address,
    /// Market implementation behind the proxy
    pub implementation: Address,
    /// Receipt of the deployment transaction
    pub receipt: TransactionReceipt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::parse_ether;

    #[test]
    fn delegate_round_trips() {
        for kind in [
            MarketDelegate::CErc20Delegate,
            MarketDelegate::CEtherDelegate,
            MarketDelegate::CErc20PluginDelegate,
            MarketDelegate::CErc20PluginRewardsDelegate,
        ] {
            assert_eq!(kind.as_str().parse::<MarketDelegate>().unwrap(), kind);
        }
        assert!("CTokenDelegate".parse::<MarketDelegate>().is_err());
    }

    #[test]
    fn market_naming_embeds_pool_and_symbol() {
        let pool = PoolHandle::new(
            7,
            "Test",
            Address::repeat_byte(0x01),
            Address::repeat_byte(0x02),
            Address::repeat_byte(0x03),
        );
        let spec = MarketSpec {
            pool_name: "Test".to_string(),
            creator: "deployer".to_string(),
            delegate: MarketDelegate::CErc20Delegate,
            underlying: Address::repeat_byte(0x04),
            interest_rate_model: Address::repeat_byte(0x05),
            initial_exchange_rate: parse_ether("0.1").unwrap(),
            collateral_factor: "0.9".parse().unwrap(),
            reserve_factor: "0.1".parse().unwrap(),
            admin_fee: Ratio::ZERO,
            bypass_price_feed_check: true,
            plugin: None,
            rewards_distributor: None,
            reward_token: None,
        };
        let config = AssetConfig::from_spec(
            &spec,
            &pool,
            Address::repeat_byte(0x06),
            Address::repeat_byte(0x07),
            "DAI",
        );
        assert_eq!(config.name, "Test DAI");
        assert_eq!(config.symbol, "m7-DAI");
        assert_eq!(config.decimals, MARKET_DECIMALS);
        assert_eq!(config.comptroller, pool.comptroller);
    }
}
