// Pool deployment configuration and the handle a deployment produces

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use isopool_error::{ConfigResult, ValidationError};

use crate::fixed::WAD;

/// Configuration for deploying an isolated pool.
///
/// Immutable once submitted; the chain returns a permanent address. Deploying
/// the same config twice creates two distinct pools; the protocol does not
/// dedupe by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Pool display name
    pub name: String,
    /// Whether supplier/borrower whitelisting is enforced
    pub whitelist_enabled: bool,
    /// Maximum liquidatable fraction of a borrow position, 1e18-scaled,
    /// in (0, 1e18]
    pub close_factor: U256,
    /// Maximum number of markets the pool will accept
    pub max_assets: u32,
    /// Liquidator bonus multiplier, 1e18-scaled, at least 1e18
    pub liquidation_incentive: U256,
    /// Previously deployed price oracle
    pub price_oracle: Address,
    /// Accounts allowed to interact when whitelisting is enforced
    pub whitelist: Vec<Address>,
}

impl PoolConfig {
    /// Client-side range checks, run before any chain interaction. The
    /// protocol enforces the same rules on-chain.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if self.close_factor.is_zero() || self.close_factor > WAD {
            return Err(ValidationError::out_of_range(
                "close_factor",
                self.close_factor,
                "must be in (0, 1e18]",
            ));
        }
        if self.max_assets == 0 {
            return Err(ValidationError::out_of_range(
                "max_assets",
                self.max_assets,
                "must be positive",
            ));
        }
        if self.liquidation_incentive < WAD {
            return Err(ValidationError::out_of_range(
                "liquidation_incentive",
                self.liquidation_incentive,
                "must be at least 1e18",
            ));
        }
        if self.price_oracle == Address::ZERO {
            return Err(ValidationError::out_of_range(
                "price_oracle",
                self.price_oracle,
                "must not be the zero address",
            ));
        }
        Ok(())
    }
}

/// A registered pool, as the directory knows it.
///
/// Handles come from `PoolDeployer::deploy` or from a directory lookup,
/// never from a bare address string, so holding one is evidence the pool
/// exists on-chain. When several pools share a name, lookup returns the most
/// recent registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct PoolHandle {
    /// Directory-assigned pool id
    pub id: u64,
    /// Pool display name
    pub name: String,
    /// The pool address (its comptroller proxy); markets attach here
    pub comptroller: Address,
    /// Comptroller implementation behind the proxy
    pub implementation: Address,
    /// Price oracle the pool was registered with
    pub oracle: Address,
}

impl PoolHandle {
    /// Assemble a handle from directory data. SDK implementations call this
    /// after a deployment or lookup round-trip.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        comptroller: Address,
        implementation: Address,
        oracle: Address,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            comptroller,
            implementation,
            oracle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::parse_ether;

    fn valid_config() -> PoolConfig {
        PoolConfig {
            name: "TEST".to_string(),
            whitelist_enabled: true,
            close_factor: parse_ether("0.5").unwrap(),
            max_assets: 20,
            liquidation_incentive: parse_ether("1.08").unwrap(),
            price_oracle: Address::repeat_byte(0x11),
            whitelist: vec![],
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = valid_config();
        config.close_factor = U256::ZERO;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.close_factor = parse_ether("1.5").unwrap();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.liquidation_incentive = parse_ether("0.99").unwrap();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.max_assets = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.name.clear();
        assert_eq!(
            config.validate(),
            Err(ValidationError::Empty { field: "name" })
        );

        let mut config = valid_config();
        config.price_oracle = Address::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn boundary_values_pass() {
        let mut config = valid_config();
        config.close_factor = WAD;
        config.liquidation_incentive = WAD;
        assert!(config.validate().is_ok());
    }
}
