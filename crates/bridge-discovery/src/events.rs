//! Pure decoder from a block's transaction-receipt records into the four
//! typed bridge events (§4.2). Performs no I/O; the adapter hands it
//! already-fetched receipts.

use alloy_primitives::{keccak256, U256};
use bridge_types::{
	AddBridgeTokenEvent, BridgeEvent, ExternalAddress, OracleSetUpdatedEvent, SendToFxEvent,
	TransactionBatchExecutedEvent, TxHash,
};

/// A single `{ address, topics, data }` log record from a transaction receipt.
#[derive(Debug, Clone)]
pub struct LogRecord {
	/// The emitting contract's 20-byte address body (no network-byte prefix).
	pub address: [u8; 20],
	pub topics: Vec<[u8; 32]>,
	pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptResult {
	Success,
	Failed,
}

/// One transaction's worth of logs, as the external-chain adapter would hand
/// them back for a given block height.
#[derive(Debug, Clone)]
pub struct TransactionReceipt {
	pub tx_id: TxHash,
	pub result: ReceiptResult,
	pub contract_address: Option<[u8; 20]>,
	pub logs: Vec<LogRecord>,
}

fn event_topic0(signature: &str) -> [u8; 32] {
	keccak256(signature.as_bytes()).0
}

/// Canonical event signatures the bridge contract emits. The exact ABI
/// schema is the out-of-scope collaborator (§1); these signatures ground the
/// topic0 selectors this decoder matches against.
fn send_to_fx_topic0() -> [u8; 32] {
	event_topic0("SendToFxEvent(uint256,address,address,bytes32,bytes32,uint256)")
}
fn transaction_batch_executed_topic0() -> [u8; 32] {
	event_topic0("TransactionBatchExecutedEvent(uint256,uint256,address)")
}
fn add_bridge_token_topic0() -> [u8; 32] {
	event_topic0("AddBridgeTokenEvent(uint256,address,string,string,uint8,bytes32)")
}
fn oracle_set_updated_topic0() -> [u8; 32] {
	event_topic0("OracleSetUpdatedEvent(uint256,uint256,address[],uint256[])")
}

fn word_to_u64(word: &[u8; 32]) -> Option<u64> {
	if word[..24].iter().any(|&b| b != 0) {
		return None;
	}
	Some(u64::from_be_bytes(word[24..32].try_into().ok()?))
}

fn word_to_address(word: &[u8]) -> Option<[u8; 20]> {
	if word.len() != 32 || word[..12].iter().any(|&b| b != 0) {
		return None;
	}
	let mut out = [0u8; 20];
	out.copy_from_slice(&word[12..]);
	Some(out)
}

fn read_length_prefixed_offset(data: &[u8], offset: usize) -> Option<usize> {
	let len_word: [u8; 32] = data.get(offset..offset + 32)?.try_into().ok()?;
	word_to_u64(&len_word).map(|n| n as usize)
}

fn decode_abi_string(data: &[u8], offset: usize) -> Option<String> {
	let len = read_length_prefixed_offset(data, offset)?;
	let bytes = data.get(offset + 32..offset + 32 + len)?;
	String::from_utf8(bytes.to_vec()).ok()
}

fn decode_address_array(data: &[u8], offset: usize) -> Option<Vec<ExternalAddress>> {
	let len = read_length_prefixed_offset(data, offset)?;
	(0..len)
		.map(|i| {
			let word = data.get(offset + 32 + 32 * i..offset + 32 + 32 * (i + 1))?;
			word_to_address(word).map(ExternalAddress)
		})
		.collect()
}

fn decode_uint256_array(data: &[u8], offset: usize) -> Option<Vec<U256>> {
	let len = read_length_prefixed_offset(data, offset)?;
	(0..len)
		.map(|i| {
			let word = data.get(offset + 32 + 32 * i..offset + 32 + 32 * (i + 1))?;
			Some(U256::from_be_slice(word))
		})
		.collect()
}

fn decode_send_to_fx(tx_hash: TxHash, topics: &[[u8; 32]], data: &[u8]) -> Option<SendToFxEvent> {
	if topics.len() != 4 || data.len() != 96 {
		return None;
	}
	let event_nonce = word_to_u64(&topics[1])?;
	let token_contract = ExternalAddress(word_to_address(&topics[2])?);
	let sender = ExternalAddress(word_to_address(&topics[3])?);
	let mut destination = [0u8; 32];
	destination.copy_from_slice(&data[0..32]);
	let mut target_ibc = [0u8; 32];
	target_ibc.copy_from_slice(&data[32..64]);
	let amount = U256::from_be_slice(&data[64..96]);
	Some(SendToFxEvent { event_nonce, tx_hash, token_contract, sender, destination, target_ibc, amount })
}

fn decode_transaction_batch_executed(
	tx_hash: TxHash,
	topics: &[[u8; 32]],
) -> Option<TransactionBatchExecutedEvent> {
	if topics.len() != 4 {
		return None;
	}
	let event_nonce = word_to_u64(&topics[1])?;
	let batch_nonce = U256::from_be_bytes(topics[2]);
	let token = ExternalAddress(word_to_address(&topics[3])?);
	Some(TransactionBatchExecutedEvent { event_nonce, tx_hash, batch_nonce, token })
}

fn decode_add_bridge_token(
	tx_hash: TxHash,
	topics: &[[u8; 32]],
	data: &[u8],
) -> Option<AddBridgeTokenEvent> {
	if topics.len() != 3 || data.len() < 128 {
		return None;
	}
	let event_nonce = word_to_u64(&topics[1])?;
	let token_contract = ExternalAddress(word_to_address(&topics[2])?);
	let name_offset = read_length_prefixed_offset(data, 0)?;
	let symbol_offset = read_length_prefixed_offset(data, 32)?;
	let decimals = *data.get(95)?;
	let mut channel_ibc = [0u8; 32];
	channel_ibc.copy_from_slice(data.get(96..128)?);
	let name = decode_abi_string(data, name_offset)?;
	let symbol = decode_abi_string(data, symbol_offset)?;
	Some(AddBridgeTokenEvent { event_nonce, tx_hash, token_contract, name, symbol, decimals, channel_ibc })
}

fn decode_oracle_set_updated(
	tx_hash: TxHash,
	topics: &[[u8; 32]],
	data: &[u8],
) -> Option<OracleSetUpdatedEvent> {
	if topics.len() != 3 || data.len() < 64 {
		return None;
	}
	let event_nonce = word_to_u64(&topics[1])?;
	let new_oracle_set_nonce = U256::from_be_bytes(topics[2]);
	let oracles_offset = read_length_prefixed_offset(data, 0)?;
	let powers_offset = read_length_prefixed_offset(data, 32)?;
	let oracles = decode_address_array(data, oracles_offset)?;
	let powers = decode_uint256_array(data, powers_offset)?;
	Some(OracleSetUpdatedEvent { event_nonce, tx_hash, new_oracle_set_nonce, oracles, powers })
}

/// Applies the four selection rules of §4.2 and decodes every matching log
/// in a block's receipts into a typed [`BridgeEvent`], in log order.
pub fn decode_block_events(bridge_address: ExternalAddress, receipts: &[TransactionReceipt]) -> Vec<BridgeEvent> {
	let send_to_fx = send_to_fx_topic0();
	let batch_executed = transaction_batch_executed_topic0();
	let add_token = add_bridge_token_topic0();
	let oracle_set_updated = oracle_set_updated_topic0();

	let mut events = Vec::new();
	for receipt in receipts {
		if receipt.result != ReceiptResult::Success {
			continue;
		}
		for log in &receipt.logs {
			let Some(&topic0) = log.topics.first() else { continue };

			let receipt_matches = receipt.contract_address == Some(bridge_address.0);
			let log_matches = ExternalAddress(log.address) == bridge_address;
			if !receipt_matches && !log_matches {
				continue;
			}

			let decoded = if topic0 == send_to_fx {
				decode_send_to_fx(receipt.tx_id, &log.topics, &log.data).map(BridgeEvent::SendToFx)
			} else if topic0 == batch_executed {
				decode_transaction_batch_executed(receipt.tx_id, &log.topics)
					.map(BridgeEvent::TransactionBatchExecuted)
			} else if topic0 == add_token {
				decode_add_bridge_token(receipt.tx_id, &log.topics, &log.data).map(BridgeEvent::AddBridgeToken)
			} else if topic0 == oracle_set_updated {
				decode_oracle_set_updated(receipt.tx_id, &log.topics, &log.data)
					.map(BridgeEvent::OracleSetUpdated)
			} else {
				None
			};

			if let Some(event) = decoded {
				events.push(event);
			} else if topic0 == send_to_fx
				|| topic0 == batch_executed
				|| topic0 == add_token
				|| topic0 == oracle_set_updated
			{
				tracing::warn!(tx_id = %hex::encode(receipt.tx_id), "log matched a known topic0 but failed to decode");
			}
		}
	}
	events
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bridge() -> ExternalAddress {
		ExternalAddress([0x11; 20])
	}

	fn topic_u64(v: u64) -> [u8; 32] {
		let mut word = [0u8; 32];
		word[24..].copy_from_slice(&v.to_be_bytes());
		word
	}

	fn topic_address(addr: &ExternalAddress) -> [u8; 32] {
		addr.to_abi_word()
	}

	#[test]
	fn decodes_send_to_fx_from_matching_receipt() {
		let token = ExternalAddress([0x22; 20]);
		let sender = ExternalAddress([0x33; 20]);
		let mut data = Vec::new();
		data.extend_from_slice(&[0xAAu8; 32]); // destination
		data.extend_from_slice(&[0xBBu8; 32]); // target_ibc
		data.extend_from_slice(&U256::from(1_000_000u64).to_be_bytes::<32>());

		let log = LogRecord {
			address: bridge().0,
			topics: vec![send_to_fx_topic0(), topic_u64(5), topic_address(&token), topic_address(&sender)],
			data,
		};
		let receipt = TransactionReceipt {
			tx_id: [9u8; 32],
			result: ReceiptResult::Success,
			contract_address: Some(bridge().0),
			logs: vec![log],
		};

		let events = decode_block_events(bridge(), &[receipt]);
		assert_eq!(events.len(), 1);
		match &events[0] {
			BridgeEvent::SendToFx(e) => {
				assert_eq!(e.event_nonce, 5);
				assert_eq!(e.token_contract, token);
				assert_eq!(e.sender, sender);
				assert_eq!(e.amount, U256::from(1_000_000u64));
			}
			other => panic!("unexpected event: {other:?}"),
		}
	}

	#[test]
	fn skips_logs_from_failed_transactions() {
		let log = LogRecord { address: bridge().0, topics: vec![send_to_fx_topic0()], data: vec![] };
		let receipt = TransactionReceipt {
			tx_id: [1u8; 32],
			result: ReceiptResult::Failed,
			contract_address: Some(bridge().0),
			logs: vec![log],
		};
		assert!(decode_block_events(bridge(), &[receipt]).is_empty());
	}

	#[test]
	fn skips_logs_with_no_topics() {
		let log = LogRecord { address: bridge().0, topics: vec![], data: vec![] };
		let receipt = TransactionReceipt {
			tx_id: [1u8; 32],
			result: ReceiptResult::Success,
			contract_address: Some(bridge().0),
			logs: vec![log],
		};
		assert!(decode_block_events(bridge(), &[receipt]).is_empty());
	}

	#[test]
	fn skips_logs_from_unrelated_contracts() {
		let other = ExternalAddress([0x99; 20]);
		let log = LogRecord {
			address: other.0,
			topics: vec![transaction_batch_executed_topic0(), topic_u64(1), topic_u64(2), topic_address(&other)],
			data: vec![],
		};
		let receipt = TransactionReceipt {
			tx_id: [1u8; 32],
			result: ReceiptResult::Success,
			contract_address: Some(other.0),
			logs: vec![log],
		};
		assert!(decode_block_events(bridge(), &[receipt]).is_empty());
	}

	#[test]
	fn matches_via_log_address_when_receipt_contract_differs() {
		// A contract that re-emits through the bridge: receipt.contract_address
		// is the caller, but the log's own address is the bridge.
		let caller = ExternalAddress([0x44; 20]);
		let token = ExternalAddress([0x22; 20]);
		let log = LogRecord {
			address: bridge().0,
			topics: vec![transaction_batch_executed_topic0(), topic_u64(7), topic_u64(3), topic_address(&token)],
			data: vec![],
		};
		let receipt = TransactionReceipt {
			tx_id: [2u8; 32],
			result: ReceiptResult::Success,
			contract_address: Some(caller.0),
			logs: vec![log],
		};
		let events = decode_block_events(bridge(), &[receipt]);
		assert_eq!(events.len(), 1);
	}

	#[test]
	fn decodes_oracle_set_updated_with_dynamic_arrays() {
		let a = ExternalAddress([1u8; 20]);
		let b = ExternalAddress([2u8; 20]);
		let mut data = Vec::new();
		data.extend_from_slice(&topic_u64(64)); // oracles offset
		data.extend_from_slice(&topic_u64(160)); // powers offset (64 + 32 len + 2*32 elems)
		data.extend_from_slice(&topic_u64(2)); // oracles length
		data.extend_from_slice(&topic_address(&a));
		data.extend_from_slice(&topic_address(&b));
		data.extend_from_slice(&topic_u64(2)); // powers length
		data.extend_from_slice(&U256::from(3000u64).to_be_bytes::<32>());
		data.extend_from_slice(&U256::from(1667u64).to_be_bytes::<32>());

		let log = LogRecord {
			address: bridge().0,
			topics: vec![oracle_set_updated_topic0(), topic_u64(9), topic_u64(4)],
			data,
		};
		let receipt = TransactionReceipt {
			tx_id: [3u8; 32],
			result: ReceiptResult::Success,
			contract_address: Some(bridge().0),
			logs: vec![log],
		};
		let events = decode_block_events(bridge(), &[receipt]);
		assert_eq!(events.len(), 1);
		match &events[0] {
			BridgeEvent::OracleSetUpdated(e) => {
				assert_eq!(e.oracles, vec![a, b]);
				assert_eq!(e.powers, vec![U256::from(3000u64), U256::from(1667u64)]);
			}
			other => panic!("unexpected event: {other:?}"),
		}
	}
}
