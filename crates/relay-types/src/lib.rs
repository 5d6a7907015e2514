//! Common types module for the token factory relay.
//!
//! This module defines the core data types shared by the relay components.
//! It provides a centralized location for the token creation request, the
//! transaction outcome model, receipt types, and the HTTP wire formats so
//! that all crates agree on a single vocabulary.

/// HTTP wire types for the relay API endpoints.
pub mod api;
/// Transaction delivery types: hashes, receipts, and receipt logs.
pub mod delivery;
/// Transaction outcome model reported to callers.
pub mod outcome;
/// Validated token creation request and its validation errors.
pub mod request;
/// Secure string type for the relay signing key.
pub mod secret_string;
/// Hex string formatting helpers.
pub mod utils;

// Re-export all types for convenient access
pub use api::*;
pub use delivery::*;
pub use outcome::*;
pub use request::*;
pub use secret_string::SecretString;
pub use utils::{with_0x_prefix, without_0x_prefix};
