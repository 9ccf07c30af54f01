// Directory-backed SDK implementation
//
// Drives the protocol's pool directory and pool comptrollers over JSON-RPC:
// encode the call, submit it from the context's signer, await the receipt,
// and read the registered addresses back. A mined-but-failed transaction is
// replayed as an `eth_call` at its block to recover the revert reason.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use isopool_error::{ChainError, ChainResult};
use isopool_types::{
    AssetConfig, DeploymentResult, PoolConfig, PoolHandle, TransactionReceipt, TxOptions,
};

use crate::abi::{self, Token};
use crate::context::ChainContext;
use crate::sdk::{InterestRateModelConf, IrmRegistry, LendingSdk};

const DEPLOY_POOL_SIG: &str = "deployPool(string,bool,uint256,uint256,uint256,address,address[])";
const POOL_BY_NAME_SIG: &str = "getPoolByName(string)";
const DEPLOY_MARKET_SIG: &str = "deployMarket(uint8,address,address,address,uint256,string,string,uint8,address,uint256,uint256,uint256,bool,address,address,address)";
const MARKETS_BY_UNDERLYING_SIG: &str = "marketsByUnderlying(address)";
const SYMBOL_SIG: &str = "symbol()";

/// `LendingSdk` over a live pool directory contract
#[derive(Debug)]
pub struct DirectorySdk {
    ctx: ChainContext,
    directory: Address,
    fee_distributor: Address,
    irm: IrmRegistry,
    /// Upper bound on each confirmation wait; `None` waits indefinitely
    max_confirm_wait_ms: Option<u64>,
}

impl DirectorySdk {
    pub fn new(ctx: ChainContext, directory: Address, fee_distributor: Address) -> Self {
        Self {
            ctx,
            directory,
            fee_distributor,
            irm: IrmRegistry::default(),
            max_confirm_wait_ms: None,
        }
    }

    /// Cap how long each deployment waits for its receipt.
    pub fn with_confirmation_timeout(mut self, max_wait_ms: u64) -> Self {
        self.max_confirm_wait_ms = Some(max_wait_ms);
        self
    }

    /// Replace the interest-rate-model registry.
    pub fn with_interest_rate_models(mut self, registry: IrmRegistry) -> Self {
        self.irm = registry;
        self
    }

    pub fn context(&self) -> &ChainContext {
        &self.ctx
    }

    /// Submit calldata from `from` to `to` and block until it is mined.
    /// A failed receipt is converted into a revert error with the reason
    /// recovered by replaying the call at the mined block.
    async fn submit(
        &self,
        from: Address,
        to: Address,
        data: &[u8],
    ) -> ChainResult<TransactionReceipt> {
        let tx = self.ctx.rpc.send_transaction(from, to, data).await?;
        debug!(tx = %tx, to = %to, "transaction submitted");
        let receipt = self
            .ctx
            .rpc
            .wait_for_receipt(tx, self.max_confirm_wait_ms)
            .await?;
        if receipt.succeeded() {
            return Ok(receipt);
        }
        Err(self.revert_reason(from, to, data, &receipt).await)
    }

    /// Recover the revert reason for a mined-but-failed transaction by
    /// replaying it as a read at the block it failed in.
    async fn revert_reason(
        &self,
        from: Address,
        to: Address,
        data: &[u8],
        receipt: &TransactionReceipt,
    ) -> ChainError {
        match self
            .ctx
            .rpc
            .call_as(Some(from), to, data, receipt.block_number)
            .await
        {
            Err(err @ ChainError::Revert { .. }) => err,
            // The replay did not reproduce the failure; report what we know.
            Ok(_) => {
                warn!(tx = %receipt.tx_hash, "failed transaction replayed clean");
                ChainError::revert("transaction failed without revert data")
            }
            Err(other) => other,
        }
    }

    /// Read a pool's registration from the directory.
    async fn read_pool(&self, name: &str) -> ChainResult<Option<PoolHandle>> {
        let data = abi::encode_call(POOL_BY_NAME_SIG, &[Token::String(name.to_string())]);
        let out = self.ctx.rpc.call(self.directory, &data, None).await?;
        let id = u64::try_from(abi::decode_u256(&out, 0)?)
            .map_err(|_| ChainError::contract("pool id does not fit in u64"))?;
        let comptroller = abi::decode_address(&out, 1)?;
        if comptroller == Address::ZERO {
            return Ok(None);
        }
        let implementation = abi::decode_address(&out, 2)?;
        let oracle = abi::decode_address(&out, 3)?;
        Ok(Some(PoolHandle::new(
            id,
            name,
            comptroller,
            implementation,
            oracle,
        )))
    }
}

#[async_trait]
impl LendingSdk for DirectorySdk {
    async fn deploy_pool(
        &self,
        config: &PoolConfig,
        opts: &TxOptions,
    ) -> ChainResult<PoolHandle> {
        let data = abi::encode_call(
            DEPLOY_POOL_SIG,
            &[
                Token::String(config.name.clone()),
                Token::Bool(config.whitelist_enabled),
                Token::Uint(config.close_factor),
                Token::Uint(U256::from(config.max_assets)),
                Token::Uint(config.liquidation_incentive),
                Token::Address(config.price_oracle),
                Token::AddressArray(config.whitelist.clone()),
            ],
        );
        let receipt = self.submit(opts.from, self.directory, &data).await?;
        info!(pool = %config.name, tx = %receipt.tx_hash, "pool registered");
        // The directory keeps the newest registration per name, so this
        // reads back the pool the transaction just created.
        self.read_pool(&config.name).await?.ok_or_else(|| {
            ChainError::contract(format!(
                "pool {:?} missing from directory after deployment",
                config.name
            ))
        })
    }

    async fn deploy_asset(
        &self,
        irm: &InterestRateModelConf,
        config: &AssetConfig,
        opts: &TxOptions,
    ) -> ChainResult<DeploymentResult> {
        debug!(model = %irm.name, market = %config.symbol, "deploying market");
        let data = abi::encode_call(
            DEPLOY_MARKET_SIG,
            &[
                Token::Uint8(config.delegate.ordinal()),
                Token::Address(config.underlying),
                Token::Address(config.interest_rate_model),
                Token::Address(config.fee_distributor),
                Token::Uint(config.initial_exchange_rate),
                Token::String(config.name.clone()),
                Token::String(config.symbol.clone()),
                Token::Uint8(config.decimals),
                Token::Address(config.admin),
                Token::Uint(config.collateral_factor.mantissa()),
                Token::Uint(config.reserve_factor.mantissa()),
                Token::Uint(config.admin_fee.mantissa()),
                Token::Bool(config.bypass_price_feed_check),
                Token::Address(config.plugin.unwrap_or(Address::ZERO)),
                Token::Address(config.rewards_distributor.unwrap_or(Address::ZERO)),
                Token::Address(config.reward_token.unwrap_or(Address::ZERO)),
            ],
        );
        let receipt = self.submit(opts.from, config.comptroller, &data).await?;

        let lookup = abi::encode_call(
            MARKETS_BY_UNDERLYING_SIG,
            &[Token::Address(config.underlying)],
        );
        let out = self.ctx.rpc.call(config.comptroller, &lookup, None).await?;
        let deployed = abi::decode_address(&out, 0)?;
        let implementation = abi::decode_address(&out, 1)?;
        if deployed == Address::ZERO {
            return Err(ChainError::contract(format!(
                "market for underlying {} missing after deployment",
                config.underlying
            )));
        }
        info!(market = %config.symbol, address = %deployed, "market deployed");
        Ok(DeploymentResult {
            deployed,
            implementation,
            receipt,
        })
    }

    async fn pool_by_name(&self, name: &str) -> ChainResult<Option<PoolHandle>> {
        self.read_pool(name).await
    }

    async fn erc20_symbol(&self, token: Address) -> ChainResult<String> {
        let data = abi::encode_call(SYMBOL_SIG, &[]);
        let out = self.ctx.rpc.call(token, &data, None).await?;
        if out.is_empty() {
            // Calls to non-contract addresses return empty data instead of
            // reverting; treat both as "not an ERC20 we can deploy against".
            return Err(ChainError::contract(format!(
                "{token} returned no data for symbol()"
            )));
        }
        Ok(abi::decode_string(&out)?)
    }

    fn fee_distributor(&self) -> Address {
        self.fee_distributor
    }

    fn interest_rate_models(&self) -> &IrmRegistry {
        &self.irm
    }
}
