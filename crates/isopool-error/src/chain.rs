// Chain-boundary errors
// Distinguishes "the chain said no" from "we do not know what the chain did"

use thiserror::Error;

/// Errors surfaced by the chain/SDK boundary
#[derive(Error, Debug, Clone)]
pub enum ChainError {
    /// The chain rejected the transaction or call, with the protocol's
    /// revert reason when one could be decoded
    #[error("transaction reverted: {reason}")]
    Revert { reason: String },

    /// The RPC transport failed. The transaction status is unknown, which is
    /// why this is kept distinct from a revert.
    #[error("network error: {message}")]
    Network { message: String },

    /// A confirmation wait exceeded its deadline
    #[error("timed out after {waited_ms}ms waiting for transaction {tx}")]
    Timeout { tx: String, waited_ms: u64 },

    /// The chain answered, but with something the protocol contract should
    /// never produce (missing registration, undecodable return data)
    #[error("contract error: {message}")]
    Contract { message: String },
}

impl ChainError {
    pub fn revert(reason: impl Into<String>) -> Self {
        ChainError::Revert {
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ChainError::Network {
            message: message.into(),
        }
    }

    pub fn contract(message: impl Into<String>) -> Self {
        ChainError::Contract {
            message: message.into(),
        }
    }

    /// True when the chain definitively rejected the operation
    pub fn is_revert(&self) -> bool {
        matches!(self, ChainError::Revert { .. })
    }
}

/// Convenient Result type for chain operations
pub type ChainResult<T> = Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_is_distinct_from_network() {
        assert!(ChainError::revert("CF_TOO_HIGH").is_revert());
        assert!(!ChainError::network("connection refused").is_revert());
    }
}
