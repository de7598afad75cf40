//! # Chain Notify - Event Hub for Node Subsystems
//!
//! The central point through which the validation pipeline announces
//! lifecycle events (new best tip, mempool changes, validated blocks,
//! mining requests, network inventory) to an open set of subscribers,
//! without those subscribers being linked against the pipeline.
//!
//! ```text
//! ┌──────────────┐                         ┌──────────────┐
//! │  Validation  │                         │    Wallet    │
//! │   Mempool    │   hub.block_checked()   │    Miner     │
//! │    Miner     │ ──────────┐             │    Relay     │
//! └──────────────┘           ▼             └──────────────┘
//!                     ┌──────────────┐            ↑
//!                     │ Notification │ ───────────┘
//!                     │     Hub      │   register_listener()
//!                     └──────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Dispatch is synchronous, unbuffered, and runs on the calling thread.
//! - Subscribers are invoked in registration order.
//! - A broadcast iterates a point-in-time snapshot of the channel, so a
//!   concurrent detach never invalidates iteration (the detached listener
//!   may still see one final call racing the detach).
//! - A panicking subscriber is isolated: the panic is caught and logged,
//!   and the remaining subscribers in that broadcast still run.
//!
//! ## Non-goals
//!
//! No event history, no replay, no cross-process delivery, no filtering,
//! no queuing. Bridges to external transports are ordinary subscribers.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod channel;
pub mod hub;
pub mod listener;

// Re-export main types
pub use hub::NotificationHub;
pub use listener::ChainNotify;

/// Number of event channels owned by the hub, in declaration order.
pub const CHANNEL_COUNT: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_count() {
        assert_eq!(CHANNEL_COUNT, 10);
    }
}
