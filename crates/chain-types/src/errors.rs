//! # Error Types
//!
//! Consensus-rule violations reported inside `ValidationResult`, and
//! registration diagnostics surfaced by the notification hub.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A registration-discipline violation detected by the notification
/// hub.
///
/// Dispatch itself has no error channel; these are diagnostics the hub
/// logs rather than returns, since the conditions are tolerated by
/// design (duplicate delivery, skipped stale bindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The same listener was registered twice; it now holds two
    /// bindings per channel and receives every event twice.
    #[error("listener registered twice; duplicate callbacks will be delivered")]
    DuplicateRegistration,

    /// A listener was dropped without unregistering; its stale
    /// bindings are skipped and pruned on the next broadcast.
    #[error("listener dropped while still registered")]
    StaleBinding,
}

/// A consensus rule violated by a block that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// The block's proof of work does not meet the difficulty target.
    #[error("invalid proof of work")]
    BadProofOfWork,

    /// The header's merkle root does not match the transactions.
    #[error("merkle root mismatch")]
    BadMerkleRoot,

    /// The block timestamp is too far in the future.
    #[error("block timestamp too far in the future")]
    TimeTooNew,

    /// The first transaction is not a coinbase, or a later one is.
    #[error("misplaced coinbase transaction")]
    BadCoinbase,

    /// Any other consensus rule violation, with the rule named.
    #[error("consensus rule violation: {0}")]
    ConsensusRule(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ValidationError::BadProofOfWork.to_string(),
            "invalid proof of work"
        );
        assert_eq!(
            ValidationError::ConsensusRule("bad-txns-duplicate".into()).to_string(),
            "consensus rule violation: bad-txns-duplicate"
        );
    }

    #[test]
    fn test_notify_error_display() {
        assert_eq!(
            NotifyError::DuplicateRegistration.to_string(),
            "listener registered twice; duplicate callbacks will be delivered"
        );
        assert_eq!(
            NotifyError::StaleBinding.to_string(),
            "listener dropped while still registered"
        );
    }
}
