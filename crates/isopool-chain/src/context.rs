// Execution context for chain operations

use std::sync::Arc;

use alloy_primitives::Address;

use isopool_types::TxOptions;

use crate::rpc::JsonRpcClient;

/// Everything a chain operation needs, passed explicitly.
///
/// There is no ambient "current network": callers build a context from their
/// resolved network configuration and thread it through the SDK. One context
/// means one signer, and one signer means one outstanding transaction at a
/// time: concurrent submissions from the same signer race on the nonce and
/// are unsupported.
#[derive(Debug, Clone)]
pub struct ChainContext {
    /// RPC transport
    pub rpc: Arc<JsonRpcClient>,
    /// Account submitting transactions (node-managed)
    pub signer: Address,
    /// Chain the context is bound to
    pub chain_id: u64,
}

impl ChainContext {
    pub fn new(rpc: Arc<JsonRpcClient>, signer: Address, chain_id: u64) -> Self {
        Self {
            rpc,
            signer,
            chain_id,
        }
    }

    /// Default transaction options for this context's signer
    pub fn tx_options(&self) -> TxOptions {
        TxOptions::new(self.signer)
    }
}
