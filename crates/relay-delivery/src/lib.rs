//! Transaction delivery module for the token factory relay.
//!
//! This module owns the chain-client seam and the transaction submitter.
//! The submitter builds a correctly-nonced, correctly-gassed factory call,
//! signs it through the account service, and broadcasts it. Nonce, gas
//! price and chain id are fetched fresh for every submission; nothing is
//! cached across requests.

use alloy_network::TransactionBuilder;
use alloy_primitives::Address;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use relay_account::AccountService;
use relay_types::{TokenCreationRequest, TransactionHash, TransactionReceipt, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// The request failed validation; no network call was attempted.
	#[error("Invalid request: {0}")]
	Validation(#[from] ValidationError),
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs while signing the transaction.
	#[error("Signing failed: {0}")]
	Signing(String),
	/// The node rejected the broadcast (insufficient funds, nonce too
	/// low, and similar).
	#[error("Transaction rejected: {0}")]
	Rejected(String),
}

sol! {
	/// Factory entry point: deploys a new token owned by `owner` and
	/// emits a `TokenDeployed` event recording the deployment.
	function createToken(string name, string symbol, uint256 totalSupply, address owner);
}

/// Trait defining the outbound chain-client dependency.
///
/// Everything the relay needs from a JSON-RPC node, narrowed to the calls
/// the submitter and resolver actually make so tests can substitute a
/// scripted implementation.
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// Current transaction count (next nonce) for an address.
	async fn get_transaction_count(&self, address: Address) -> Result<u64, DeliveryError>;

	/// Dry-run gas estimate for a call.
	async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, DeliveryError>;

	/// Current network gas price in wei.
	async fn get_gas_price(&self) -> Result<u128, DeliveryError>;

	/// Chain identifier of the connected network.
	async fn get_chain_id(&self) -> Result<u64, DeliveryError>;

	/// Broadcasts a raw signed transaction and returns its hash.
	async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TransactionHash, DeliveryError>;

	/// Fetches the receipt for a transaction.
	///
	/// `Ok(None)` means not-yet-mined or unknown hash; the two are
	/// indistinguishable at this level and neither is an error.
	async fn get_transaction_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError>;
}

/// Applies the configured safety multiplier to a gas estimate, rounding up.
fn apply_gas_multiplier(estimate: u64, percent: u64) -> u64 {
	((estimate as u128 * percent as u128).div_ceil(100)) as u64
}

/// Service that builds, signs, and broadcasts token creation transactions.
///
/// One broadcast per invocation; re-submitting the same request produces a
/// distinct transaction with a fresh nonce, so callers must check status
/// before retrying a submission that may have gone through.
pub struct SubmitterService {
	/// Chain client used for nonce, gas and broadcast.
	chain: Arc<dyn ChainInterface>,
	/// Account service holding the relay signing key.
	account: Arc<AccountService>,
	/// Token factory contract address.
	factory: Address,
	/// Gas limit used when estimation fails.
	fallback_gas_limit: u64,
	/// Safety multiplier applied to successful estimates, in percent.
	gas_multiplier_percent: u64,
	/// Serializes nonce acquisition through broadcast; concurrent
	/// submissions from the one signing address would otherwise race on
	/// the nonce.
	submit_lock: Mutex<()>,
}

impl SubmitterService {
	/// Creates a new submitter for the given factory contract.
	pub fn new(
		chain: Arc<dyn ChainInterface>,
		account: Arc<AccountService>,
		factory: Address,
		fallback_gas_limit: u64,
		gas_multiplier_percent: u64,
	) -> Self {
		Self {
			chain,
			account,
			factory,
			fallback_gas_limit,
			gas_multiplier_percent,
			submit_lock: Mutex::new(()),
		}
	}

	/// Address of the relay signing account.
	pub fn signer_address(&self) -> Address {
		self.account.address()
	}

	/// Builds, signs and broadcasts a token creation transaction.
	///
	/// Validation failures return before any chain call. Gas estimation
	/// failures do not abort the submission; the fallback limit is used
	/// instead.
	pub async fn submit(
		&self,
		request: &TokenCreationRequest,
	) -> Result<TransactionHash, DeliveryError> {
		request.validate()?;

		let calldata = createTokenCall {
			name: request.name.clone(),
			symbol: request.symbol.clone(),
			totalSupply: request.total_supply,
			owner: request.owner,
		}
		.abi_encode();

		let from = self.account.address();

		let _guard = self.submit_lock.lock().await;

		let nonce = self.chain.get_transaction_count(from).await?;
		let gas_price = self.chain.get_gas_price().await?;
		let chain_id = self.chain.get_chain_id().await?;

		let mut tx = TransactionRequest::default()
			.with_from(from)
			.with_to(self.factory)
			.with_nonce(nonce)
			.with_chain_id(chain_id)
			.with_gas_price(gas_price)
			.with_input(calldata);

		// Estimation is best-effort; a revert simulation or RPC error
		// falls back to the fixed conservative limit.
		let gas_limit = match self.chain.estimate_gas(&tx).await {
			Ok(estimate) => apply_gas_multiplier(estimate, self.gas_multiplier_percent),
			Err(e) => {
				tracing::warn!(
					error = %e,
					fallback = self.fallback_gas_limit,
					"Gas estimation failed, using fallback gas limit"
				);
				self.fallback_gas_limit
			},
		};
		tx = tx.with_gas_limit(gas_limit);

		let raw = self
			.account
			.sign(&tx)
			.await
			.map_err(|e| DeliveryError::Signing(e.to_string()))?;

		let tx_hash = self.chain.send_raw_transaction(&raw).await?;
		tracing::info!(
			tx_hash = %tx_hash,
			nonce,
			gas_limit,
			chain_id,
			"Submitted token creation transaction"
		);

		Ok(tx_hash)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_consensus::TxEnvelope;
	use alloy_eips::eip2718::Decodable2718;
	use alloy_primitives::{address, TxKind, U256};
	use relay_account::implementations::local::LocalAccount;
	use relay_types::SecretString;
	use std::sync::atomic::{AtomicUsize, Ordering};

	const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	const FACTORY: Address = address!("981A4465A74D467dDd3F28308B255de98F157d72");

	/// Scripted chain client recording calls and the broadcast payload.
	struct MockChain {
		nonce: u64,
		gas_price: u128,
		chain_id: u64,
		gas_estimate: Result<u64, String>,
		calls: AtomicUsize,
		sent: std::sync::Mutex<Option<Vec<u8>>>,
	}

	impl MockChain {
		fn new(gas_estimate: Result<u64, String>) -> Self {
			Self {
				nonce: 5,
				gas_price: 10,
				chain_id: 11155111,
				gas_estimate,
				calls: AtomicUsize::new(0),
				sent: std::sync::Mutex::new(None),
			}
		}
	}

	#[async_trait]
	impl ChainInterface for MockChain {
		async fn get_transaction_count(&self, _address: Address) -> Result<u64, DeliveryError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(self.nonce)
		}

		async fn estimate_gas(&self, _tx: &TransactionRequest) -> Result<u64, DeliveryError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.gas_estimate
				.clone()
				.map_err(DeliveryError::Network)
		}

		async fn get_gas_price(&self) -> Result<u128, DeliveryError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(self.gas_price)
		}

		async fn get_chain_id(&self) -> Result<u64, DeliveryError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(self.chain_id)
		}

		async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TransactionHash, DeliveryError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			*self.sent.lock().unwrap() = Some(raw.to_vec());
			Ok(TransactionHash::from([0xabu8; 32]))
		}

		async fn get_transaction_receipt(
			&self,
			_hash: &TransactionHash,
		) -> Result<Option<TransactionReceipt>, DeliveryError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(None)
		}
	}

	fn request() -> TokenCreationRequest {
		TokenCreationRequest {
			name: "Foo".to_string(),
			symbol: "FOO".to_string(),
			total_supply: U256::from(1000u64),
			owner: address!("0000000000000000000000000000000000000abc"),
		}
	}

	fn submitter(chain: Arc<MockChain>) -> SubmitterService {
		let account = LocalAccount::new(&SecretString::from(DEV_KEY)).unwrap();
		SubmitterService::new(
			chain,
			Arc::new(AccountService::new(Box::new(account))),
			FACTORY,
			3_000_000,
			120,
		)
	}

	fn decode_sent(chain: &MockChain) -> alloy_consensus::TxLegacy {
		let raw = chain.sent.lock().unwrap().clone().expect("nothing broadcast");
		match TxEnvelope::decode_2718(&mut raw.as_slice()).unwrap() {
			TxEnvelope::Legacy(signed) => signed.tx().clone(),
			other => panic!("expected legacy transaction, got {:?}", other),
		}
	}

	#[test]
	fn test_gas_multiplier_rounds_up() {
		assert_eq!(apply_gas_multiplier(100_000, 120), 120_000);
		assert_eq!(apply_gas_multiplier(100_001, 120), 120_002);
		assert_eq!(apply_gas_multiplier(1, 100), 1);
	}

	#[tokio::test]
	async fn test_submit_builds_correctly_nonced_and_gassed_transaction() {
		let chain = Arc::new(MockChain::new(Ok(100_000)));
		let submitter = submitter(Arc::clone(&chain));

		let hash = submitter.submit(&request()).await.unwrap();
		assert_eq!(hash, TransactionHash::from([0xabu8; 32]));

		let tx = decode_sent(&chain);
		assert_eq!(tx.nonce, 5);
		assert_eq!(tx.gas_price, 10);
		assert_eq!(tx.gas_limit, 120_000); // ceil(100_000 * 1.2)
		assert_eq!(tx.chain_id, Some(11155111));
		assert_eq!(tx.to, TxKind::Call(FACTORY));

		let expected_calldata = createTokenCall {
			name: "Foo".to_string(),
			symbol: "FOO".to_string(),
			totalSupply: U256::from(1000u64),
			owner: address!("0000000000000000000000000000000000000abc"),
		}
		.abi_encode();
		assert_eq!(tx.input.as_ref(), expected_calldata.as_slice());
	}

	#[tokio::test]
	async fn test_estimation_failure_falls_back_without_blocking_submission() {
		let chain = Arc::new(MockChain::new(Err("execution reverted".to_string())));
		let submitter = submitter(Arc::clone(&chain));

		submitter.submit(&request()).await.unwrap();

		let tx = decode_sent(&chain);
		assert_eq!(tx.gas_limit, 3_000_000);
	}

	#[tokio::test]
	async fn test_invalid_request_makes_no_chain_call() {
		let chain = Arc::new(MockChain::new(Ok(100_000)));
		let submitter = submitter(Arc::clone(&chain));

		let mut bad = request();
		bad.symbol = String::new();

		let err = submitter.submit(&bad).await.unwrap_err();
		assert!(matches!(err, DeliveryError::Validation(_)));
		assert_eq!(chain.calls.load(Ordering::SeqCst), 0);
		assert!(chain.sent.lock().unwrap().is_none());
	}
}
