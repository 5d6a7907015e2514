//! Transaction outcome model for the relay.
//!
//! The outcome is the externally observable result of a token creation
//! transaction. It is derived purely from (transaction hash, current chain
//! state): querying right after submission and querying later through the
//! status endpoint must agree. Receipts are immutable once mined, so the
//! outcome is monotonic: `Pending` may become `Success` or `Failed`, but a
//! terminal outcome never changes and never switches token address.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// How the deployed token address was recovered from the receipt.
///
/// `Exact` means the log matched the `TokenDeployed` event signature;
/// `Heuristic` means the address came from the last-factory-log fallback,
/// which exists because mismatched factory artifacts have historically
/// caused the exact match to miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressConfidence {
	Exact,
	Heuristic,
}

/// Result of resolving a token creation transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TransactionOutcome {
	/// The transaction is not yet mined, or the receipt is temporarily
	/// unavailable. Safe to poll again.
	Pending,
	/// The transaction mined and a token address was recovered.
	Success {
		/// Address of the deployed token contract.
		token_address: Address,
		/// Block the transaction was included in.
		block_number: u64,
		/// Whether the address came from an exact event match or the
		/// heuristic fallback.
		confidence: AddressConfidence,
	},
	/// The transaction mined but did not yield a token address, or
	/// reverted on chain. The reason distinguishes the two.
	Failed {
		/// Human-readable failure description.
		reason: String,
	},
}

impl TransactionOutcome {
	/// Returns true for the terminal variants.
	pub fn is_terminal(&self) -> bool {
		!matches!(self, TransactionOutcome::Pending)
	}
}
