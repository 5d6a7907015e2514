//! Alloy-based chain client implementation.
//!
//! Implements the ChainInterface trait over an HTTP JSON-RPC provider
//! using the Alloy library. This is the production chain client; tests
//! substitute scripted implementations of the same trait.

use crate::{ChainInterface, DeliveryError};
use alloy_primitives::{Address, FixedBytes};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::TransactionRequest;
use alloy_transport_http::Http;
use async_trait::async_trait;
use relay_types::{ReceiptLog, TransactionHash, TransactionReceipt};

/// Chain client backed by an Alloy HTTP provider.
#[derive(Debug)]
pub struct AlloyChain {
	/// The underlying JSON-RPC provider.
	provider: RootProvider<Http<reqwest::Client>>,
}

impl AlloyChain {
	/// Creates a chain client for the given RPC endpoint.
	pub fn new(rpc_url: &str) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL: {}", e)))?;
		Ok(Self {
			provider: RootProvider::new_http(url),
		})
	}
}

/// Converts an RPC receipt into the relay receipt model, carrying the
/// status bit and the full log set for the resolver.
fn convert_receipt(receipt: alloy_rpc_types::TransactionReceipt) -> TransactionReceipt {
	let logs = receipt
		.inner
		.logs()
		.iter()
		.map(|log| ReceiptLog {
			address: log.address(),
			topics: log.topics().to_vec(),
			data: log.data().data.clone(),
		})
		.collect();

	TransactionReceipt {
		hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
		block_number: receipt.block_number.unwrap_or(0),
		success: receipt.status(),
		logs,
	}
}

#[async_trait]
impl ChainInterface for AlloyChain {
	async fn get_transaction_count(&self, address: Address) -> Result<u64, DeliveryError> {
		self.provider
			.get_transaction_count(address)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get nonce: {}", e)))
	}

	async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, DeliveryError> {
		self.provider
			.estimate_gas(tx)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to estimate gas: {}", e)))
	}

	async fn get_gas_price(&self) -> Result<u128, DeliveryError> {
		self.provider
			.get_gas_price()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get gas price: {}", e)))
	}

	async fn get_chain_id(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get chain id: {}", e)))
	}

	async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TransactionHash, DeliveryError> {
		let pending = self
			.provider
			.send_raw_transaction(raw)
			.await
			.map_err(|e| DeliveryError::Rejected(format!("Failed to send transaction: {}", e)))?;

		let tx_hash = *pending.tx_hash();
		tracing::debug!(tx_hash = %TransactionHash(tx_hash.0.to_vec()), "Broadcast accepted");
		Ok(TransactionHash(tx_hash.0.to_vec()))
	}

	async fn get_transaction_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError> {
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);

		match self.provider.get_transaction_receipt(tx_hash).await {
			Ok(Some(receipt)) => Ok(Some(convert_receipt(receipt))),
			Ok(None) => Ok(None),
			Err(e) => Err(DeliveryError::Network(format!(
				"Failed to get receipt: {}",
				e
			))),
		}
	}
}
