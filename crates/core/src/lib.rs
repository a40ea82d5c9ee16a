//! Gearstock Core - Shared types library.
//!
//! This crate provides common types used across all Gearstock components:
//! - `client` - Inventory synchronization and caching layer
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no filesystem access. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, drafts, sessions, and roles
//! - [`stats`] - Derived views over a catalog (low stock, totals)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod stats;
pub mod types;

pub use types::*;
