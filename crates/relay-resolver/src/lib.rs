//! Receipt resolution module for the token factory relay.
//!
//! Given a transaction hash, the resolver fetches the receipt (which may
//! not exist yet) and classifies it into a [`TransactionOutcome`]. The
//! classification is a pure function of the receipt contents, so resolving
//! the same hash twice against unchanged chain state yields the same
//! outcome, and a terminal outcome never changes afterwards.
//!
//! Receipt polling is bounded: a capped-exponential backoff loop with a
//! hard deadline that yields `Pending` on exhaustion. Transient chain
//! errors are treated as "receipt not yet available", never as failures.

mod extract;

pub use extract::extract_token_address;

use alloy_primitives::Address;
use relay_delivery::ChainInterface;
use relay_types::{TransactionHash, TransactionOutcome, TransactionReceipt};
use std::sync::Arc;
use std::time::Duration;

/// Bounded polling policy for receipt fetches.
#[derive(Debug, Clone)]
pub struct PollPolicy {
	/// Maximum fetch attempts before yielding Pending.
	pub max_attempts: u32,
	/// Delay before the second attempt; doubles per attempt.
	pub initial_backoff: Duration,
	/// Upper bound on the per-attempt delay.
	pub max_backoff: Duration,
	/// Hard deadline for the whole loop.
	pub deadline: Duration,
}

impl PollPolicy {
	/// Policy constructed from millisecond settings.
	pub fn from_millis(
		max_attempts: u32,
		initial_backoff_ms: u64,
		max_backoff_ms: u64,
		deadline_ms: u64,
	) -> Self {
		Self {
			max_attempts,
			initial_backoff: Duration::from_millis(initial_backoff_ms),
			max_backoff: Duration::from_millis(max_backoff_ms),
			deadline: Duration::from_millis(deadline_ms),
		}
	}
}

/// Service that resolves transaction hashes into outcomes.
///
/// Side-effect free: safe to call arbitrarily many times for the same
/// hash, from the submit path and the status endpoint alike.
pub struct ResolverService {
	/// Chain client used for receipt fetches.
	chain: Arc<dyn ChainInterface>,
	/// Token factory contract address; only its logs are inspected.
	factory: Address,
	/// Polling policy for [`ResolverService::resolve`].
	policy: PollPolicy,
}

impl ResolverService {
	/// Creates a resolver for the given factory contract.
	pub fn new(chain: Arc<dyn ChainInterface>, factory: Address, policy: PollPolicy) -> Self {
		Self {
			chain,
			factory,
			policy,
		}
	}

	/// Single receipt check without polling.
	///
	/// Used by the status endpoint; an absent receipt or a transient
	/// chain error both yield `Pending`.
	pub async fn check(&self, hash: &TransactionHash) -> TransactionOutcome {
		match self.chain.get_transaction_receipt(hash).await {
			Ok(Some(receipt)) => self.classify(&receipt),
			Ok(None) => TransactionOutcome::Pending,
			Err(e) => {
				tracing::debug!(tx_hash = %hash, error = %e, "Receipt fetch failed, treating as pending");
				TransactionOutcome::Pending
			},
		}
	}

	/// Polls for the receipt under the configured bounded policy.
	///
	/// Returns as soon as a receipt appears; on attempt or deadline
	/// exhaustion returns `Pending` rather than blocking indefinitely.
	pub async fn resolve(&self, hash: &TransactionHash) -> TransactionOutcome {
		let started = tokio::time::Instant::now();
		let mut backoff = self.policy.initial_backoff;

		for attempt in 1..=self.policy.max_attempts {
			match self.chain.get_transaction_receipt(hash).await {
				Ok(Some(receipt)) => return self.classify(&receipt),
				Ok(None) => {
					tracing::debug!(tx_hash = %hash, attempt, "Receipt not yet available");
				},
				Err(e) => {
					tracing::debug!(tx_hash = %hash, attempt, error = %e, "Transient receipt fetch error");
				},
			}

			if attempt == self.policy.max_attempts
				|| started.elapsed() + backoff > self.policy.deadline
			{
				break;
			}
			tokio::time::sleep(backoff).await;
			backoff = (backoff * 2).min(self.policy.max_backoff);
		}

		TransactionOutcome::Pending
	}

	/// Classifies a mined receipt.
	///
	/// A reverted transaction and a successful-but-unparseable log set
	/// are different failures and carry different reasons.
	fn classify(&self, receipt: &TransactionReceipt) -> TransactionOutcome {
		if !receipt.success {
			return TransactionOutcome::Failed {
				reason: "transaction reverted".to_string(),
			};
		}

		match extract_token_address(&receipt.logs, self.factory) {
			Some((token_address, confidence)) => TransactionOutcome::Success {
				token_address,
				block_number: receipt.block_number,
				confidence,
			},
			None => TransactionOutcome::Failed {
				reason: "token address not recoverable from receipt logs".to_string(),
			},
		}
	}
}
