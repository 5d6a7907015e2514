//! Local private-key account implementation.
//!
//! Signs relay transactions with an in-process secp256k1 key parsed from
//! the configured secret. Suitable for a single-relay deployment; the key
//! never leaves the process and never appears in errors or logs.

use crate::{AccountError, AccountInterface};
use alloy_eips::eip2718::Encodable2718;
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::Address;
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use relay_types::SecretString;

/// Account implementation backed by a local private key.
#[derive(Debug)]
pub struct LocalAccount {
	/// Parsed signing key.
	signer: PrivateKeySigner,
}

impl LocalAccount {
	/// Creates a local account from the configured private key.
	///
	/// The parse error is deliberately generic so a malformed key value
	/// cannot leak through error messages.
	pub fn new(private_key: &SecretString) -> Result<Self, AccountError> {
		let signer: PrivateKeySigner = private_key.with_exposed(|key| {
			key.parse()
				.map_err(|_| AccountError::InvalidKey("invalid private key format".to_string()))
		})?;
		Ok(Self { signer })
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	fn address(&self) -> Address {
		self.signer.address()
	}

	async fn sign_transaction(&self, tx: &TransactionRequest) -> Result<Vec<u8>, AccountError> {
		let wallet = EthereumWallet::from(self.signer.clone());
		let envelope = tx
			.clone()
			.build(&wallet)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;
		Ok(envelope.encoded_2718())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_consensus::TxEnvelope;
	use alloy_eips::eip2718::Decodable2718;
	use alloy_primitives::{address, Bytes, U256};

	// Well-known development key (anvil account 0).
	const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[test]
	fn test_address_derivation() {
		let account = LocalAccount::new(&SecretString::from(DEV_KEY)).unwrap();
		assert_eq!(
			account.address(),
			address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
		);
	}

	#[test]
	fn test_invalid_key_rejected_without_echo() {
		let err = LocalAccount::new(&SecretString::from("not-a-key")).unwrap_err();
		let message = err.to_string();
		assert!(message.contains("Invalid key"));
		assert!(!message.contains("not-a-key"));
	}

	#[tokio::test]
	async fn test_sign_produces_decodable_legacy_transaction() {
		let account = LocalAccount::new(&SecretString::from(DEV_KEY)).unwrap();

		let request = TransactionRequest::default()
			.with_from(account.address())
			.with_to(address!("981A4465A74D467dDd3F28308B255de98F157d72"))
			.with_nonce(5)
			.with_chain_id(11155111)
			.with_gas_price(10)
			.with_gas_limit(120_000)
			.with_value(U256::ZERO)
			.with_input(Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));

		let raw = account.sign_transaction(&request).await.unwrap();
		let envelope = TxEnvelope::decode_2718(&mut raw.as_slice()).unwrap();

		match envelope {
			TxEnvelope::Legacy(signed) => {
				let tx = signed.tx();
				assert_eq!(tx.nonce, 5);
				assert_eq!(tx.gas_limit, 120_000);
				assert_eq!(tx.gas_price, 10);
				assert_eq!(tx.chain_id, Some(11155111));
			},
			other => panic!("expected legacy transaction, got {:?}", other),
		}
	}
}
