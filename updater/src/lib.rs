// Licensed under the Apache-2.0 license

//! Inventory and factory-reset management for a single-slot, flash-resident
//! host firmware store.
//!
//! The flash device is reached through the platform's flash utility and its
//! access-arbitration daemon; both sit behind narrow traits ([`flash`],
//! [`arbiter`]) so everything above them stays pure and testable without
//! spawning processes.

pub mod arbiter;
pub mod flash;
pub mod inventory;
pub mod reset;
pub mod version;
