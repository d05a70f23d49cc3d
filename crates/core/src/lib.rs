//! Rocketshoes Core - Shared types library.
//!
//! This crate provides the types shared by all Rocketshoes components:
//! - `cart` - Cart store, inventory client and persistent stores
//! - `cli` - Command-line driver for the cart store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, catalog records, stock levels and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
