//! # Core Chain Entities
//!
//! The concrete payloads carried by notification events.
//!
//! ## Clusters
//!
//! - **Chain**: `Block`, `BlockHeader`, `Transaction`, `ChainTip`, `ChainLocator`
//! - **Validation**: `ValidationResult`
//! - **Mining**: `MiningScript`

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 32-byte hash (double-SHA-256 in block and transaction contexts).
pub type Hash = [u8; 32];

/// A 32-byte public key.
pub type PublicKey = [u8; 32];

/// A reference to one entry of the block index: enough information to
/// identify a chain tip without holding the full block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChainTip {
    /// Hash of the block at this tip.
    pub hash: Hash,
    /// Height of the block in the chain.
    pub height: u64,
    /// Unix timestamp of the block.
    pub time: u64,
}

/// A compact description of the active chain: block hashes sampled
/// back from the tip, densely at first and then at exponentially
/// increasing gaps. Used by subscribers that persist sync progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChainLocator {
    /// Sampled block hashes, newest first.
    pub have: Vec<Hash>,
}

impl ChainLocator {
    /// Returns true if the locator describes no chain at all.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.have.is_empty()
    }
}

/// The header of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Protocol version for this block.
    pub version: u32,
    /// Hash of the parent block.
    pub parent_hash: Hash,
    /// Merkle root of all transactions in the block.
    pub merkle_root: Hash,
    /// Unix timestamp when the block was assembled.
    pub timestamp: u64,
    /// Compact difficulty target.
    pub bits: u32,
    /// Proof-of-work nonce.
    pub nonce: u32,
}

impl BlockHeader {
    /// Compute the header hash.
    #[must_use]
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.parent_hash);
        hasher.update(self.merkle_root);
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.bits.to_le_bytes());
        hasher.update(self.nonce.to_le_bytes());
        let first = hasher.finalize();
        Sha256::digest(first).into()
    }
}

/// A full block: header plus transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// All transactions in this block, coinbase first.
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Compute the block hash (the hash of the header).
    #[must_use]
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }
}

/// A transaction as carried through notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Transaction {
    /// Sender's public key.
    pub from: PublicKey,
    /// Recipient's public key (empty for coinbase).
    pub to: PublicKey,
    /// Transaction amount in base units.
    pub value: u64,
    /// Sender's nonce.
    pub nonce: u64,
    /// Transaction payload.
    pub data: Vec<u8>,
}

impl Transaction {
    /// Compute the transaction hash.
    #[must_use]
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.from);
        hasher.update(self.to);
        hasher.update(self.value.to_le_bytes());
        hasher.update(self.nonce.to_le_bytes());
        hasher.update(&self.data);
        let first = hasher.finalize();
        Sha256::digest(first).into()
    }
}

/// Outcome of validating a block, as reported to `block_checked`
/// subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    /// The block passed all checks.
    Valid,
    /// The block violated a consensus rule and was rejected.
    Invalid {
        /// The rule that was violated.
        reason: ValidationError,
    },
    /// Validation could not complete (a local system failure, not a
    /// verdict on the block itself).
    Error {
        /// Description of the failure.
        reason: String,
    },
}

impl ValidationResult {
    /// Returns true if the block passed validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns true if the block was rejected as consensus-invalid.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// Returns true if validation aborted on a local failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::Valid
    }
}

/// A payout script handed to the miner by a responding wallet when
/// mining material is requested.
///
/// The script stays reserved on the wallet side; `keep` records whether
/// the miner actually used it, so an unused reservation can be returned
/// to the key pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MiningScript {
    /// The raw payout script.
    pub script: Vec<u8>,
    /// Whether the script was committed to a mined block.
    keep: bool,
}

impl MiningScript {
    /// Create a new reserved script.
    #[must_use]
    pub fn new(script: Vec<u8>) -> Self {
        Self {
            script,
            keep: false,
        }
    }

    /// Mark the script as used so the reservation becomes permanent.
    pub fn keep_script(&mut self) {
        self.keep = true;
    }

    /// Returns true if the script has been committed to a block.
    #[must_use]
    pub fn is_kept(&self) -> bool {
        self.keep
    }
}
