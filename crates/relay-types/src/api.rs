//! API types for the relay HTTP surface.
//!
//! This module defines the request and response wire formats for the token
//! deployment and status endpoints, plus the structured API error with its
//! HTTP status mapping.

use crate::{with_0x_prefix, AddressConfidence, TransactionHash, TransactionOutcome, ValidationError};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for deploying a new token through the factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployTokenRequest {
	/// Human-readable token name.
	#[serde(rename = "tokenName")]
	pub token_name: String,
	/// Token ticker symbol.
	pub symbol: String,
	/// Initial total supply; accepts a JSON number or a decimal string.
	#[serde(rename = "totalSupply", with = "supply_serde")]
	pub total_supply: U256,
	/// Address that will own the deployed token.
	#[serde(rename = "userAddress")]
	pub user_address: String,
}

/// Response body shared by the deploy and status endpoints.
///
/// The `status` tag carries the outcome; field names follow the original
/// relay wire format (`tx_hash`, `token_address`, `block_number`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TokenStatusResponse {
	/// Transaction mined and token address recovered (HTTP 200).
	Success {
		tx_hash: String,
		token_address: String,
		block_number: u64,
		confidence: AddressConfidence,
	},
	/// Transaction submitted but not yet mined (HTTP 202).
	Pending { tx_hash: String, message: String },
	/// Transaction mined but failed or unparseable (HTTP 500).
	Error { tx_hash: String, message: String },
}

impl TokenStatusResponse {
	/// Builds the wire response for a resolved outcome.
	pub fn from_outcome(tx_hash: &TransactionHash, outcome: TransactionOutcome) -> Self {
		let tx_hash = tx_hash.to_string();
		match outcome {
			TransactionOutcome::Pending => TokenStatusResponse::Pending {
				tx_hash,
				message: "Transaction submitted but receipt not available yet".to_string(),
			},
			TransactionOutcome::Success {
				token_address,
				block_number,
				confidence,
			} => TokenStatusResponse::Success {
				tx_hash,
				token_address: with_0x_prefix(&hex::encode(token_address.as_slice())),
				block_number,
				confidence,
			},
			TransactionOutcome::Failed { reason } => TokenStatusResponse::Error {
				tx_hash,
				message: reason,
			},
		}
	}

	/// HTTP status code this response should be served with.
	pub fn status_code(&self) -> u16 {
		match self {
			TokenStatusResponse::Success { .. } => 200,
			TokenStatusResponse::Pending { .. } => 202,
			TokenStatusResponse::Error { .. } => 500,
		}
	}
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code.
	pub error: String,
	/// Human-readable description.
	pub message: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
	/// Bad request with validation errors (400).
	BadRequest { error_type: String, message: String },
	/// Internal server error (500).
	InternalServerError { error_type: String, message: String },
}

impl ApiError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			ApiError::BadRequest { .. } => 400,
			ApiError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			ApiError::BadRequest {
				error_type,
				message,
			}
			| ApiError::InternalServerError {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
			},
		}
	}
}

impl From<ValidationError> for ApiError {
	fn from(err: ValidationError) -> Self {
		ApiError::BadRequest {
			error_type: "validation_error".to_string(),
			message: err.to_string(),
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			ApiError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for ApiError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = match self.status_code() {
			400 => StatusCode::BAD_REQUEST,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		};

		(status, Json(self.to_error_response())).into_response()
	}
}

/// Serde module for the total supply field.
///
/// Serializes as a decimal string; deserializes from either a JSON number
/// or a decimal string, since callers send both.
pub mod supply_serde {
	use alloy_primitives::U256;
	use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Number(u64),
		Text(String),
	}

	pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		value.to_string().serialize(serializer)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
	where
		D: Deserializer<'de>,
	{
		match Raw::deserialize(deserializer)? {
			Raw::Number(n) => Ok(U256::from(n)),
			Raw::Text(s) => U256::from_str_radix(&s, 10).map_err(D::Error::custom),
		}
	}
}
