//! Storefront data models.

pub mod session;

pub use session::{AuthSession, keys as session_keys};
