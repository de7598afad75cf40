//! # Chain Types Crate
//!
//! Domain payload types announced through the node's notification hub.
//!
//! The hub (`chain-notify`) only passes these values through to attached
//! subscribers; it never constructs or inspects them. They are defined
//! here, in a leaf crate, so that producers (validation, mempool, miner)
//! and consumers (wallet, relay, external notifiers) can share them
//! without depending on one another.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::{NotifyError, ValidationError};
