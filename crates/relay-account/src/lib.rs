//! Account management module for the token factory relay.
//!
//! This module provides the signing seam of the relay. It defines the
//! interface for producing raw signed transactions from the relay's
//! process-wide signing credentials, which are loaded once at startup and
//! never mutated or logged afterwards.

use alloy_primitives::Address;
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
}

/// Trait defining the interface for account implementations.
///
/// An account implementation owns the relay signing key and turns a fully
/// populated transaction request into raw bytes ready for broadcast. Error
/// messages from implementations must never contain key material.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Returns the address associated with this account.
	fn address(&self) -> Address;

	/// Signs a transaction and returns the EIP-2718 encoded raw bytes.
	///
	/// The request must already carry nonce, gas, gas price, chain id and
	/// call data; signing does not fill anything in.
	async fn sign_transaction(&self, tx: &TransactionRequest) -> Result<Vec<u8>, AccountError>;
}

/// Service that manages account operations.
///
/// Wraps an account implementation behind a stable API used by the
/// transaction submitter.
pub struct AccountService {
	/// The underlying account implementation.
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService with the specified implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Retrieves the address of the managed account.
	pub fn address(&self) -> Address {
		self.implementation.address()
	}

	/// Signs a transaction using the managed account.
	pub async fn sign(&self, tx: &TransactionRequest) -> Result<Vec<u8>, AccountError> {
		self.implementation.sign_transaction(tx).await
	}
}
