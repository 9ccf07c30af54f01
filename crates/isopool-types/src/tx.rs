// Transaction options and receipts

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Options attached to every submitted transaction.
///
/// Signing is node-managed, so the only thing a caller chooses is which
/// account submits. One outstanding transaction per `from` at a time; nonce
/// ordering is the signer's shared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOptions {
    /// Sender account, as understood by the node
    pub from: Address,
}

impl TxOptions {
    pub fn new(from: Address) -> Self {
        Self { from }
    }
}

/// Terminal status of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Success,
    Failed,
}

/// The mined outcome of a submitted transaction, never mutated afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Transaction hash
    pub tx_hash: B256,
    /// Execution status
    pub status: TxStatus,
    /// Block the transaction was mined in
    pub block_number: Option<u64>,
    /// Gas consumed
    pub gas_used: Option<u64>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == TxStatus::Success
    }
}
