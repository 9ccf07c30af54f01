// Named-network configuration
//
// Mirrors the deployment harness's network table: each named network has a
// chain id, an RPC URL resolved from environment variables with a documented
// fallback order, and the mnemonic that seeds the node's account set.
// Signing itself is node-managed; the harness only ever names an account.

use std::env;

use alloy_primitives::Address;
use anyhow::{anyhow, bail, Context, Result};

use isopool_chain::JsonRpcClient;

/// Stock development mnemonic, used when no override is configured
pub const DEFAULT_MNEMONIC: &str =
    "candy maple cake sugar pudding cream honey rich smooth crumble sweet treat";

/// Named accounts, by node account index
pub const NAMED_ACCOUNTS: &[(&str, usize)] =
    &[("deployer", 0), ("alice", 1), ("bob", 2), ("rando", 3)];

/// A resolved named network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub url: String,
    /// Seeds the node's unlocked accounts; never used for local signing
    pub mnemonic: String,
}

/// Resolve a named network.
///
/// URL fallback order: `ETH_PROVIDER_URL` overrides every network, then the
/// per-network variable, then the built-in default. Mnemonic fallback:
/// `SUGAR_DADDY`, then `MNEMONIC`, then the stock development mnemonic.
pub fn network(name: &str) -> Result<NetworkConfig> {
    let url_override = env::var("ETH_PROVIDER_URL").ok();
    let mnemonic = env::var("SUGAR_DADDY")
        .or_else(|_| env::var("MNEMONIC"))
        .unwrap_or_else(|_| DEFAULT_MNEMONIC.to_string());

    let (chain_id, url) = match name {
        "localhost" => (
            31_337,
            url_override.unwrap_or_else(|| "http://localhost:8545".to_string()),
        ),
        "rinkeby" => (
            4,
            url_override
                .or_else(|| env::var("RINKEBY_ETH_PROVIDER_URL").ok())
                .unwrap_or_else(|| "http://localhost:8545".to_string()),
        ),
        "bsc" => (
            56,
            url_override
                .or_else(|| env::var("BSC_PROVIDER_URL").ok())
                .unwrap_or_else(|| "https://bsc-dataseed.binance.org/".to_string()),
        ),
        "chapel" => (
            97,
            url_override
                .unwrap_or_else(|| "https://data-seed-prebsc-2-s1.binance.org:8545/".to_string()),
        ),
        other => bail!("unknown network {other:?} (expected localhost, rinkeby, bsc, or chapel)"),
    };

    Ok(NetworkConfig {
        name: name.to_string(),
        chain_id,
        url,
        mnemonic,
    })
}

/// Addresses of the already-deployed protocol contracts the harness drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolAddresses {
    pub directory: Address,
    pub fee_distributor: Address,
}

/// Protocol contract addresses come from the environment; there is no
/// sensible default for a contract address.
pub fn protocol_addresses() -> Result<ProtocolAddresses> {
    let directory = required_address("POOL_DIRECTORY_ADDRESS")?;
    let fee_distributor = required_address("FEE_DISTRIBUTOR_ADDRESS")?;
    Ok(ProtocolAddresses {
        directory,
        fee_distributor,
    })
}

fn required_address(var: &str) -> Result<Address> {
    let raw = env::var(var).with_context(|| format!("{var} must be set"))?;
    raw.parse::<Address>()
        .with_context(|| format!("{var} is not a valid address: {raw:?}"))
}

/// Resolve a named account to the node's matching unlocked address.
pub async fn named_signer(rpc: &JsonRpcClient, name: &str) -> Result<Address> {
    let index = NAMED_ACCOUNTS
        .iter()
        .find(|(account, _)| *account == name)
        .map(|(_, index)| *index)
        .ok_or_else(|| anyhow!("unknown account {name:?} (expected one of deployer, alice, bob, rando)"))?;
    let accounts = rpc.accounts().await?;
    accounts.get(index).copied().ok_or_else(|| {
        anyhow!(
            "node at {} exposes {} accounts, {name:?} needs index {index}",
            rpc.url(),
            accounts.len()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_network_is_rejected() {
        assert!(network("mainnet-beta").is_err());
    }

    #[test]
    fn named_account_table() {
        assert_eq!(NAMED_ACCOUNTS.iter().find(|(n, _)| *n == "bob"), Some(&("bob", 2)));
        assert!(!NAMED_ACCOUNTS.iter().any(|(n, _)| *n == "mallory"));
    }

    // Environment mutation is process-global, so all env-dependent cases
    // run in one test.
    #[test]
    fn env_fallback_order() {
        env::remove_var("ETH_PROVIDER_URL");
        env::remove_var("BSC_PROVIDER_URL");
        env::remove_var("SUGAR_DADDY");
        env::remove_var("MNEMONIC");

        let config = network("bsc").unwrap();
        assert_eq!(config.chain_id, 56);
        assert_eq!(config.url, "https://bsc-dataseed.binance.org/");
        assert_eq!(config.mnemonic, DEFAULT_MNEMONIC);

        env::set_var("BSC_PROVIDER_URL", "http://bsc.internal:8545");
        assert_eq!(network("bsc").unwrap().url, "http://bsc.internal:8545");

        // the global override beats the per-network variable
        env::set_var("ETH_PROVIDER_URL", "http://fork.internal:8545");
        assert_eq!(network("bsc").unwrap().url, "http://fork.internal:8545");
        assert_eq!(network("localhost").unwrap().url, "http://fork.internal:8545");

        env::set_var("MNEMONIC", "test test test");
        assert_eq!(network("localhost").unwrap().mnemonic, "test test test");
        env::set_var("SUGAR_DADDY", "rich rich rich");
        assert_eq!(network("localhost").unwrap().mnemonic, "rich rich rich");

        env::remove_var("ETH_PROVIDER_URL");
        env::remove_var("BSC_PROVIDER_URL");
        env::remove_var("SUGAR_DADDY");
        env::remove_var("MNEMONIC");
    }
}
