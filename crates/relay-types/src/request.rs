//! Validated token creation request.
//!
//! This module defines the immutable, validated input to the transaction
//! submitter, and the conversion from the raw HTTP wire format. Validation
//! happens before any chain call is attempted; a bad request never reaches
//! the network.

use crate::api::DeployTokenRequest;
use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Errors produced by request validation.
///
/// These classify as client errors (HTTP 400) and are raised without any
/// network interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// A required parameter is missing or empty.
	#[error("Missing required parameter: {0}")]
	MissingParameter(&'static str),
	/// The requested total supply is zero.
	#[error("totalSupply must be greater than zero")]
	ZeroSupply,
	/// The owner address is not a well-formed 20-byte hex address.
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
	/// The transaction hash is not a well-formed 32-byte hex string.
	#[error("Invalid transaction hash: {0}")]
	InvalidTransactionHash(String),
}

/// A validated request to deploy a new token through the factory.
///
/// Constructed once per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCreationRequest {
	/// Human-readable token name.
	pub name: String,
	/// Token ticker symbol.
	pub symbol: String,
	/// Initial total supply, in base units.
	pub total_supply: U256,
	/// Address that will own the deployed token.
	pub owner: Address,
}

impl TokenCreationRequest {
	/// Checks the request invariants: non-empty name and symbol, positive
	/// total supply. The owner address is well-formed by construction.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.name.trim().is_empty() {
			return Err(ValidationError::MissingParameter("tokenName"));
		}
		if self.symbol.trim().is_empty() {
			return Err(ValidationError::MissingParameter("symbol"));
		}
		if self.total_supply.is_zero() {
			return Err(ValidationError::ZeroSupply);
		}
		Ok(())
	}
}

impl TryFrom<DeployTokenRequest> for TokenCreationRequest {
	type Error = ValidationError;

	fn try_from(wire: DeployTokenRequest) -> Result<Self, Self::Error> {
		if wire.user_address.trim().is_empty() {
			return Err(ValidationError::MissingParameter("userAddress"));
		}
		let owner: Address = wire
			.user_address
			.parse()
			.map_err(|_| ValidationError::InvalidAddress(wire.user_address.clone()))?;

		let request = Self {
			name: wire.token_name,
			symbol: wire.symbol,
			total_supply: wire.total_supply,
			owner,
		};
		request.validate()?;
		Ok(request)
	}
}
