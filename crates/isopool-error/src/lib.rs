// isopool error handling
// Central location for the harness error taxonomy and Result aliases

mod chain;
mod config;

pub use chain::{ChainError, ChainResult};
pub use config::{ConfigResult, ParseError, ValidationError};

use thiserror::Error;

/// Top-level error for deployment operations.
///
/// Everything the deployers and the CLI can fail with folds into this type;
/// nothing is swallowed or retried below it.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Malformed parameter string, detected before any chain interaction
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A config value out of the accepted range, detected before submission
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The chain boundary failed (revert, transport, confirmation timeout)
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Convenient Result type for deployment operations
pub type DeployResult<T> = Result<T, DeployError>;

impl DeployError {
    /// Whether the failure happened before anything was submitted on-chain.
    pub fn is_pre_chain(&self) -> bool {
        matches!(self, DeployError::Parse(_) | DeployError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_chain_classification() {
        let parse: DeployError = ParseError::Arity {
            expected: 13,
            found: 4,
        }
        .into();
        assert!(parse.is_pre_chain());

        let revert: DeployError = ChainError::Revert {
            reason: "COMPTROLLER_REJECTION".to_string(),
        }
        .into();
        assert!(!revert.is_pre_chain());
    }
}
