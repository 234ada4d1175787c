//! Orchard Core - Shared types library.
//!
//! This crate provides common types used across all Orchard Lane components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal administration console
//! - `cli` - Command-line tools for catalogue maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain logic - no I/O, no
//! HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`cart`] - The cart / temporary-cart state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use types::*;
