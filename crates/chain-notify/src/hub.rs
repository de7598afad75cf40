//! # Notification Hub
//!
//! Owns one broadcast channel per event kind and exposes the
//! registration API and the per-event dispatch API.
//!
//! The hub is an explicit context object: the node constructs exactly
//! one at start-up and hands a reference (typically an `Arc`) to every
//! producer and to the subsystems that register subscribers. There is
//! no global accessor; tests construct isolated hubs freely.

use crate::channel::Channel;
use crate::listener::ChainNotify;
use chain_types::{
    Block, ChainLocator, ChainTip, Hash, MiningScript, NotifyError, Transaction, ValidationResult,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// The listener registry and dispatch engine.
///
/// All channels are constructed together; there is no partial
/// construction and no reconfiguration after construction. Channel
/// membership is only reachable through [`register_listener`],
/// [`unregister_listener`] and [`unregister_all_listeners`].
///
/// [`register_listener`]: NotificationHub::register_listener
/// [`unregister_listener`]: NotificationHub::unregister_listener
/// [`unregister_all_listeners`]: NotificationHub::unregister_all_listeners
pub struct NotificationHub {
    // One channel per event kind, in declaration order. Registration
    // attaches top to bottom; unregistration detaches bottom to top.
    chain_tip_updated: Channel,
    transaction_synced: Channel,
    transaction_removed: Channel,
    transaction_touched: Channel,
    best_chain_set: Channel,
    inventory_seen: Channel,
    rebroadcast_requested: Channel,
    block_checked: Channel,
    mining_script_requested: Channel,
    mined_block_accepted: Channel,
}

impl NotificationHub {
    /// Create a hub with all channels empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain_tip_updated: Channel::new("chain_tip_updated"),
            transaction_synced: Channel::new("transaction_synced"),
            transaction_removed: Channel::new("transaction_removed"),
            transaction_touched: Channel::new("transaction_touched"),
            best_chain_set: Channel::new("best_chain_set"),
            inventory_seen: Channel::new("inventory_seen"),
            rebroadcast_requested: Channel::new("rebroadcast_requested"),
            block_checked: Channel::new("block_checked"),
            mining_script_requested: Channel::new("mining_script_requested"),
            mined_block_accepted: Channel::new("mined_block_accepted"),
        }
    }

    // =========================================================================
    // REGISTRATION API
    // =========================================================================

    /// Attach `listener` to every channel, in channel declaration order.
    ///
    /// Registering the same listener twice is allowed but almost always
    /// a mistake: it creates a second binding per channel and the
    /// listener receives every event twice. A warning is logged when it
    /// happens.
    pub fn register_listener(&self, listener: &Arc<dyn ChainNotify>) {
        if self.chain_tip_updated.is_attached(listener) {
            warn!(error = %NotifyError::DuplicateRegistration, "registering listener again");
        }
        self.chain_tip_updated.attach(listener);
        self.transaction_synced.attach(listener);
        self.transaction_removed.attach(listener);
        self.transaction_touched.attach(listener);
        self.best_chain_set.attach(listener);
        self.inventory_seen.attach(listener);
        self.rebroadcast_requested.attach(listener);
        self.block_checked.attach(listener);
        self.mining_script_requested.attach(listener);
        self.mined_block_accepted.attach(listener);
        debug!(
            channels = crate::CHANNEL_COUNT,
            listeners = self.listener_count(),
            "listener registered"
        );
    }

    /// Detach `listener` from every channel, in the exact reverse of
    /// the attach order. Silent no-op for a listener never registered.
    ///
    /// Must be called before the listener's last `Arc` is dropped;
    /// see [`ChainNotify`] for the staleness rules.
    pub fn unregister_listener(&self, listener: &Arc<dyn ChainNotify>) {
        self.mined_block_accepted.detach(listener);
        self.mining_script_requested.detach(listener);
        self.block_checked.detach(listener);
        self.rebroadcast_requested.detach(listener);
        self.inventory_seen.detach(listener);
        self.best_chain_set.detach(listener);
        self.transaction_touched.detach(listener);
        self.transaction_removed.detach(listener);
        self.transaction_synced.detach(listener);
        self.chain_tip_updated.detach(listener);
        debug!(listeners = self.listener_count(), "listener unregistered");
    }

    /// Detach every listener from every channel. Used once, at node
    /// shutdown, so no channel retains a binding referencing a
    /// since-destroyed listener.
    pub fn unregister_all_listeners(&self) {
        self.mined_block_accepted.detach_all();
        self.mining_script_requested.detach_all();
        self.block_checked.detach_all();
        self.rebroadcast_requested.detach_all();
        self.inventory_seen.detach_all();
        self.best_chain_set.detach_all();
        self.transaction_touched.detach_all();
        self.transaction_removed.detach_all();
        self.transaction_synced.detach_all();
        self.chain_tip_updated.detach_all();
        debug!("all listeners unregistered");
    }

    /// Number of bindings currently registered (counting duplicates).
    ///
    /// Diagnostic only. A listener dropped without unregistering leaves
    /// a stale binding that stays in this count until the
    /// `chain_tip_updated` channel next broadcasts and prunes it, even
    /// if other channels have already pruned theirs.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        // Registration keeps every channel's membership identical, but
        // stale bindings are pruned per channel on broadcast, so this
        // channel may still count entries others have dropped.
        self.chain_tip_updated.len()
    }

    // =========================================================================
    // DISPATCH API
    // =========================================================================

    /// The best-chain pointer moved to `new_tip`.
    pub fn chain_tip_updated(
        &self,
        new_tip: &ChainTip,
        fork_point: Option<&ChainTip>,
        initial_sync: bool,
    ) {
        debug!(
            height = new_tip.height,
            initial_sync, "dispatching chain tip update"
        );
        self.chain_tip_updated
            .broadcast(|listener| listener.chain_tip_updated(new_tip, fork_point, initial_sync));
    }

    /// Updated data for `tx`, optionally with the block it was found in.
    pub fn transaction_synced(&self, tx: &Transaction, block: Option<&Block>) {
        self.transaction_synced
            .broadcast(|listener| listener.transaction_synced(tx, block));
    }

    /// A transaction left the pending pool without replacement data.
    pub fn transaction_removed(&self, hash: &Hash) {
        self.transaction_removed
            .broadcast(|listener| listener.transaction_removed(hash));
    }

    /// A transaction's visibility changed without new data.
    pub fn transaction_touched(&self, hash: &Hash) {
        self.transaction_touched
            .broadcast(|listener| listener.transaction_touched(hash));
    }

    /// The canonical-chain summary changed.
    pub fn best_chain_set(&self, locator: &ChainLocator) {
        self.best_chain_set
            .broadcast(|listener| listener.best_chain_set(locator));
    }

    /// An inventory item was observed on the network.
    pub fn inventory_seen(&self, hash: &Hash) {
        self.inventory_seen
            .broadcast(|listener| listener.inventory_seen(hash));
    }

    /// Periodic trigger for subscribers to re-announce pending data.
    pub fn rebroadcast_requested(&self, best_block_time: i64) {
        self.rebroadcast_requested
            .broadcast(|listener| listener.rebroadcast_requested(best_block_time));
    }

    /// A specific block finished validation with `result`.
    pub fn block_checked(&self, block: &Block, result: &ValidationResult) {
        debug!(valid = result.is_valid(), "dispatching block checked");
        self.block_checked
            .broadcast(|listener| listener.block_checked(block, result));
    }

    /// Request a payout script for mining. Request/response style: the
    /// responding subscriber (by convention the first with a wallet)
    /// fills `script` before this call returns; it stays `None` when no
    /// subscriber responds.
    pub fn mining_script_requested(&self, script: &mut Option<MiningScript>) {
        self.mining_script_requested
            .broadcast(|listener| listener.mining_script_requested(script));
        if script.is_none() {
            debug!("no subscriber supplied a mining script");
        }
    }

    /// A block produced locally was accepted into the chain.
    pub fn mined_block_accepted(&self, hash: &Hash) {
        self.mined_block_accepted
            .broadcast(|listener| listener.mined_block_accepted(hash));
    }

    /// Push an updated transaction to all registered subscribers.
    /// Convenience wrapper over [`transaction_synced`] kept for the
    /// mempool and block-connect call sites.
    ///
    /// [`transaction_synced`]: NotificationHub::transaction_synced
    pub fn sync_with_wallets(&self, tx: &Transaction, block: Option<&Block>) {
        self.transaction_synced(tx, block);
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
