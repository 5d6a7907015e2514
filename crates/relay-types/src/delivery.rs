//! Transaction delivery types for the relay.
//!
//! This module defines types describing submitted transactions and their
//! mined receipts, including the event logs the resolver inspects.

use crate::{without_0x_prefix, ValidationError};
use alloy_primitives::{Address, Bytes, B256};
use std::fmt;

/// Blockchain transaction hash representation.
///
/// Stores transaction hashes as raw bytes; the wire format is the
/// 0x-prefixed hex string.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl TransactionHash {
	/// Parses a 0x-prefixed (or bare) hex transaction hash.
	///
	/// The hash must decode to exactly 32 bytes; anything else is a
	/// client input error.
	pub fn from_hex(value: &str) -> Result<Self, ValidationError> {
		let bytes = hex::decode(without_0x_prefix(value))
			.map_err(|_| ValidationError::InvalidTransactionHash(value.to_string()))?;
		if bytes.len() != 32 {
			return Err(ValidationError::InvalidTransactionHash(value.to_string()));
		}
		Ok(Self(bytes))
	}
}

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

impl From<[u8; 32]> for TransactionHash {
	fn from(bytes: [u8; 32]) -> Self {
		Self(bytes.to_vec())
	}
}

/// A single event log taken from a mined receipt.
///
/// Topics are the fixed-size indexed fields; data is the unindexed payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReceiptLog {
	/// Contract address that emitted the log.
	pub address: Address,
	/// Ordered indexed topics; `topics[0]` identifies the event.
	pub topics: Vec<B256>,
	/// Unindexed event data payload.
	pub data: Bytes,
}

/// Transaction receipt containing execution details.
///
/// Carries the success bit and the full log set so the resolver can run
/// its address extraction without further chain calls.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
	/// Event logs emitted during execution, in receipt order.
	pub logs: Vec<ReceiptLog>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hash_from_hex_accepts_prefixed_and_bare() {
		let hex32 = "ab".repeat(32);
		let prefixed = TransactionHash::from_hex(&format!("0x{}", hex32)).unwrap();
		let bare = TransactionHash::from_hex(&hex32).unwrap();
		assert_eq!(prefixed, bare);
		assert_eq!(prefixed.0.len(), 32);
	}

	#[test]
	fn test_hash_from_hex_rejects_wrong_length() {
		assert!(TransactionHash::from_hex("0x1234").is_err());
		assert!(TransactionHash::from_hex(&"cd".repeat(33)).is_err());
	}

	#[test]
	fn test_hash_from_hex_rejects_non_hex() {
		assert!(TransactionHash::from_hex(&"zz".repeat(32)).is_err());
	}

	#[test]
	fn test_hash_display_is_prefixed() {
		let hash = TransactionHash::from([0x11u8; 32]);
		assert_eq!(hash.to_string(), format!("0x{}", "11".repeat(32)));
	}
}
