//! # Listener Capability Interface
//!
//! The contract a subscriber implements to receive node events. Every
//! hook defaults to a no-op, so a concrete listener overrides only the
//! events it cares about.

use chain_types::{Block, ChainLocator, ChainTip, Hash, MiningScript, Transaction, ValidationResult};

/// A subscriber to node lifecycle events.
///
/// Implementors are registered with [`crate::NotificationHub`] and
/// receive callbacks synchronously on whichever thread dispatches the
/// event. Hooks must therefore be cheap and must not block on the
/// dispatching subsystem.
///
/// Argument references are only valid for the duration of the call;
/// a listener that needs a payload beyond the callback must clone it.
///
/// Registration is address-based: a listener must be unregistered
/// before its last `Arc` is dropped, or its bindings go stale (stale
/// bindings are skipped and pruned, never invoked).
pub trait ChainNotify: Send + Sync {
    /// The best-chain pointer moved to `new_tip`.
    ///
    /// `fork_point` is the last block common to the old and new chain,
    /// or `None` when the node has no previous tip. `initial_sync` is
    /// true while the node is still catching up with the network;
    /// subscribers typically skip expensive work during initial sync.
    fn chain_tip_updated(&self, new_tip: &ChainTip, fork_point: Option<&ChainTip>, initial_sync: bool) {
        let _ = (new_tip, fork_point, initial_sync);
    }

    /// Updated data for a transaction, optionally with the block it was
    /// found in (`None` when the transaction is only in the pool).
    fn transaction_synced(&self, tx: &Transaction, block: Option<&Block>) {
        let _ = (tx, block);
    }

    /// A transaction left the pending pool without replacement data.
    fn transaction_removed(&self, hash: &Hash) {
        let _ = hash;
    }

    /// A transaction's visibility changed without new data (for now: a
    /// coinbase potentially becoming spendable).
    fn transaction_touched(&self, hash: &Hash) {
        let _ = hash;
    }

    /// The canonical-chain summary changed; subscribers that persist
    /// sync progress should record the new locator.
    fn best_chain_set(&self, locator: &ChainLocator) {
        let _ = locator;
    }

    /// An inventory item was observed on the network.
    fn inventory_seen(&self, hash: &Hash) {
        let _ = hash;
    }

    /// Periodic trigger to re-announce pending data. `best_block_time`
    /// is the timestamp of the current best block.
    fn rebroadcast_requested(&self, best_block_time: i64) {
        let _ = best_block_time;
    }

    /// A specific block finished validation with the given result.
    fn block_checked(&self, block: &Block, result: &ValidationResult) {
        let _ = (block, result);
    }

    /// The miner needs a payout script. A responding subscriber fills
    /// `script` synchronously; later subscribers in the same broadcast
    /// see the filled value and should leave it alone.
    fn mining_script_requested(&self, script: &mut Option<MiningScript>) {
        let _ = script;
    }

    /// A block produced locally was accepted into the chain.
    fn mined_block_accepted(&self, hash: &Hash) {
        let _ = hash;
    }
}
