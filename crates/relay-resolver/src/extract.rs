//! Token address extraction from receipt logs.
//!
//! The deployed token address is recovered with an ordered chain of decode
//! strategies, stopping at the first hit:
//!
//! 1. typed decode against the known `TokenDeployed` event schema,
//!    accepting both the current (indexed address) and the legacy
//!    (address-in-data) artifact layouts;
//! 2. manual topic decode: factory logs whose first topic is the keccak
//!    hash of the event signature;
//! 3. a heuristic over the last factory log, kept because mismatched
//!    factory artifacts have historically made the exact match miss.
//!
//! Every strategy is a pure function over the receipt logs; there is no
//! thrown control flow for "didn't match".

use alloy_primitives::{Address, Log as PrimLog, LogData};
use alloy_sol_types::{sol, SolEvent};
use relay_types::{AddressConfidence, ReceiptLog};

sol! {
	/// Deployment record emitted by the current factory artifact; the
	/// token address is indexed.
	event TokenDeployed(address indexed token, string name, string symbol);
}

/// Older factory artifacts emit the same event with the token address in
/// the data payload instead of an indexed topic. Same signature hash,
/// different layout and field name.
pub(crate) mod legacy {
	alloy_sol_types::sol! {
		event TokenDeployed(address tokenAddress, string name, string symbol);
	}
}

/// Minimum data length for the heuristic fallback to trust a payload.
const MIN_HEURISTIC_DATA_LEN: usize = 21;

fn to_prim_log(log: &ReceiptLog) -> PrimLog {
	PrimLog {
		address: log.address,
		data: LogData::new_unchecked(log.topics.clone(), log.data.clone()),
	}
}

/// Structural decode against the known event schema, trying both field
/// layout variants.
fn typed_decode(log: &ReceiptLog) -> Option<Address> {
	let prim = to_prim_log(log);
	if let Ok(event) = TokenDeployed::decode_log(&prim, true) {
		return Some(event.token);
	}
	if let Ok(event) = legacy::TokenDeployed::decode_log(&prim, true) {
		return Some(event.tokenAddress);
	}
	None
}

/// Manual decode of a log whose first topic matches the event signature
/// hash: an indexed address topic wins, otherwise the low 20 bytes of the
/// data payload.
fn topic_decode(log: &ReceiptLog) -> Option<Address> {
	if log.topics.first() != Some(&TokenDeployed::SIGNATURE_HASH) {
		return None;
	}
	if log.topics.len() > 1 {
		return Some(Address::from_slice(&log.topics[1][12..]));
	}
	if log.data.len() >= 20 {
		return Some(Address::from_slice(&log.data[log.data.len() - 20..]));
	}
	None
}

/// Last-resort decode: the last factory log with a plausible payload.
fn heuristic_decode(factory_logs: &[&ReceiptLog]) -> Option<Address> {
	let last = factory_logs.last()?;
	if last.data.len() >= MIN_HEURISTIC_DATA_LEN {
		return Some(Address::from_slice(&last.data[last.data.len() - 20..]));
	}
	None
}

/// Runs the ordered decode chain over a receipt's logs.
///
/// Only logs emitted by the factory contract are considered. Returns the
/// recovered address together with a confidence flag so callers can tell
/// an exact event match from the heuristic fallback.
pub fn extract_token_address(
	logs: &[ReceiptLog],
	factory: Address,
) -> Option<(Address, AddressConfidence)> {
	let factory_logs: Vec<&ReceiptLog> =
		logs.iter().filter(|log| log.address == factory).collect();

	for log in &factory_logs {
		if let Some(address) = typed_decode(log) {
			return Some((address, AddressConfidence::Exact));
		}
	}

	for log in &factory_logs {
		if let Some(address) = topic_decode(log) {
			tracing::trace!(token = %address, "Recovered token address via topic decode");
			return Some((address, AddressConfidence::Exact));
		}
	}

	heuristic_decode(&factory_logs).map(|address| {
		tracing::trace!(token = %address, "Recovered token address via heuristic fallback");
		(address, AddressConfidence::Heuristic)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, keccak256, Bytes, B256};

	const FACTORY: Address = address!("981A4465A74D467dDd3F28308B255de98F157d72");
	const TOKEN: Address = address!("0000000000000000000000000000000000000abc");

	fn event_log(address: Address, topics: Vec<B256>, data: Vec<u8>) -> ReceiptLog {
		ReceiptLog {
			address,
			topics,
			data: Bytes::from(data),
		}
	}

	fn indexed_event_log() -> ReceiptLog {
		let event = TokenDeployed {
			token: TOKEN,
			name: "Foo".to_string(),
			symbol: "FOO".to_string(),
		};
		let topics = event.encode_topics().into_iter().map(|t| t.0).collect();
		event_log(FACTORY, topics, event.encode_data())
	}

	fn legacy_event_log() -> ReceiptLog {
		let event = legacy::TokenDeployed {
			tokenAddress: TOKEN,
			name: "Foo".to_string(),
			symbol: "FOO".to_string(),
		};
		let topics = event.encode_topics().into_iter().map(|t| t.0).collect();
		event_log(FACTORY, topics, event.encode_data())
	}

	#[test]
	fn test_signature_hash_matches_keccak_of_signature_string() {
		assert_eq!(
			TokenDeployed::SIGNATURE_HASH,
			keccak256("TokenDeployed(address,string,string)".as_bytes())
		);
		assert_eq!(
			legacy::TokenDeployed::SIGNATURE_HASH,
			TokenDeployed::SIGNATURE_HASH
		);
	}

	#[test]
	fn test_typed_decode_indexed_variant() {
		let logs = vec![indexed_event_log()];
		let (address, confidence) = extract_token_address(&logs, FACTORY).unwrap();
		assert_eq!(address, TOKEN);
		assert_eq!(confidence, AddressConfidence::Exact);
	}

	#[test]
	fn test_typed_decode_legacy_variant() {
		let logs = vec![legacy_event_log()];
		let (address, confidence) = extract_token_address(&logs, FACTORY).unwrap();
		assert_eq!(address, TOKEN);
		assert_eq!(confidence, AddressConfidence::Exact);
	}

	#[test]
	fn test_topic_decode_indexed_address_with_unparseable_data() {
		// Matching signature topic and an indexed address, but data that
		// does not decode structurally: the topic decode stage catches it.
		let mut topic = [0u8; 32];
		topic[12..].copy_from_slice(TOKEN.as_slice());
		let logs = vec![event_log(
			FACTORY,
			vec![TokenDeployed::SIGNATURE_HASH, B256::from(topic)],
			vec![0xff; 3],
		)];
		let (address, confidence) = extract_token_address(&logs, FACTORY).unwrap();
		assert_eq!(address, TOKEN);
		assert_eq!(confidence, AddressConfidence::Exact);
	}

	#[test]
	fn test_topic_decode_address_in_data_tail() {
		let mut data = vec![0u8; 12];
		data.extend_from_slice(TOKEN.as_slice());
		let logs = vec![event_log(
			FACTORY,
			vec![TokenDeployed::SIGNATURE_HASH],
			data,
		)];
		let (address, confidence) = extract_token_address(&logs, FACTORY).unwrap();
		assert_eq!(address, TOKEN);
		assert_eq!(confidence, AddressConfidence::Exact);
	}

	#[test]
	fn test_heuristic_uses_last_factory_log() {
		let other_topic = vec![keccak256("SomethingElse(uint256)".as_bytes())];
		let decoy = Address::repeat_byte(0x11);

		let mut first_data = vec![0u8; 12];
		first_data.extend_from_slice(decoy.as_slice());
		let mut last_data = vec![0u8; 12];
		last_data.extend_from_slice(TOKEN.as_slice());

		let logs = vec![
			event_log(FACTORY, other_topic.clone(), first_data),
			event_log(FACTORY, other_topic, last_data),
		];
		let (address, confidence) = extract_token_address(&logs, FACTORY).unwrap();
		assert_eq!(address, TOKEN);
		assert_eq!(confidence, AddressConfidence::Heuristic);
	}

	#[test]
	fn test_heuristic_requires_minimum_data_length() {
		let logs = vec![event_log(FACTORY, vec![], TOKEN.as_slice().to_vec())];
		// 20 bytes is below the heuristic threshold.
		assert!(extract_token_address(&logs, FACTORY).is_none());
	}

	#[test]
	fn test_foreign_logs_are_ignored() {
		let stranger = Address::repeat_byte(0x99);
		let mut data = vec![0u8; 12];
		data.extend_from_slice(TOKEN.as_slice());
		let logs = vec![event_log(
			stranger,
			vec![TokenDeployed::SIGNATURE_HASH],
			data,
		)];
		assert!(extract_token_address(&logs, FACTORY).is_none());
	}

	#[test]
	fn test_empty_log_set_yields_nothing() {
		assert!(extract_token_address(&[], FACTORY).is_none());
	}
}
