//! Deterministic ABI-style encoding and Keccak-256 digests of the two
//! signable structures the external-chain signer verifies: an oracle-set
//! rotation ("checkpoint") and an outgoing transaction batch.

mod abi;

use abi::{AbiEncoder, Slot};
use alloy_primitives::{keccak256, B256, U256};
use bridge_types::{BatchTransaction, ExternalAddress, OracleSetMember, PendingBatch, PendingOracleSet};
use thiserror::Error;

/// The 24-byte ASCII prefix the external chain prepends before the outer hash.
pub const SIGNED_MESSAGE_PREFIX: &[u8; 24] = b"\x19TRON Signed Message:\n32";

#[derive(Debug, Error)]
pub enum EncodingError {
	#[error("oracle set has no members")]
	EmptyMembers,
	#[error("address body has {0} bytes, expected 20")]
	BadAddressLength(usize),
	#[error("bytes32 field is not valid utf-8")]
	NotUtf8,
}

/// Right-pads up to the first 32 bytes of `s` with zeros.
///
/// Only the first 32 bytes of `s` are ever encoded; longer inputs are
/// silently truncated, matching the on-chain tag fields this backs
/// (`gravity_id`, `"checkpoint"`, `"transactionBatch"`), which are always
/// short ASCII constants in practice.
pub fn fixed_bytes32(s: &str) -> [u8; 32] {
	let mut word = [0u8; 32];
	let bytes = s.as_bytes();
	let n = bytes.len().min(32);
	word[..n].copy_from_slice(&bytes[..n]);
	word
}

/// Inverse of [`fixed_bytes32`]: the non-zero-terminated ASCII prefix of a slot.
pub fn decode_fixed_bytes32(word: &[u8; 32]) -> Result<String, EncodingError> {
	let end = word.iter().rposition(|&b| b != 0).map(|i| i + 1).unwrap_or(0);
	String::from_utf8(word[..end].to_vec()).map_err(|_| EncodingError::NotUtf8)
}

fn address_word(addr: ExternalAddress) -> [u8; 32] {
	addr.to_abi_word()
}

fn u256_word(v: U256) -> [u8; 32] {
	v.to_be_bytes::<32>()
}

/// The signable digest for an oracle-set rotation (a "checkpoint").
pub fn checkpoint_digest(gravity_id: &str, oracle_set: &PendingOracleSet) -> Result<B256, EncodingError> {
	if oracle_set.members.is_empty() {
		return Err(EncodingError::EmptyMembers);
	}

	let addresses: Vec<[u8; 32]> = oracle_set
		.members
		.iter()
		.map(|OracleSetMember { external_address, .. }| address_word(*external_address))
		.collect();
	let powers: Vec<[u8; 32]> = oracle_set
		.members
		.iter()
		.map(|m| u256_word(U256::from(m.power)))
		.collect();

	let slots = [
		Slot::Static(fixed_bytes32(gravity_id)),
		Slot::Static(fixed_bytes32("checkpoint")),
		Slot::Static(u256_word(oracle_set.nonce)),
		Slot::Dynamic(addresses),
		Slot::Dynamic(powers),
	];

	Ok(final_digest(&AbiEncoder::encode_tuple(&slots)))
}

/// The signable digest for an outgoing transaction batch.
pub fn batch_digest(gravity_id: &str, batch: &PendingBatch) -> Result<B256, EncodingError> {
	let amounts: Vec<[u8; 32]> = batch
		.transactions
		.iter()
		.map(|BatchTransaction { amount, .. }| u256_word(*amount))
		.collect();
	let destinations: Vec<[u8; 32]> = batch
		.transactions
		.iter()
		.map(|BatchTransaction { destination, .. }| address_word(*destination))
		.collect();
	let fees: Vec<[u8; 32]> = batch
		.transactions
		.iter()
		.map(|BatchTransaction { fee, .. }| u256_word(*fee))
		.collect();

	let slots = [
		Slot::Static(fixed_bytes32(gravity_id)),
		Slot::Static(fixed_bytes32("transactionBatch")),
		Slot::Dynamic(amounts),
		Slot::Dynamic(destinations),
		Slot::Dynamic(fees),
		Slot::Static(u256_word(batch.batch_nonce)),
		Slot::Static(address_word(batch.token_contract)),
		Slot::Static(u256_word(batch.batch_timeout)),
		Slot::Static(address_word(batch.fee_receive)),
	];

	Ok(final_digest(&AbiEncoder::encode_tuple(&slots)))
}

/// `keccak256(signed_message_prefix || keccak256(encoded_tuple))`.
fn final_digest(encoded_tuple: &[u8]) -> B256 {
	let inner = keccak256(encoded_tuple);
	let mut buf = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + 32);
	buf.extend_from_slice(SIGNED_MESSAGE_PREFIX);
	buf.extend_from_slice(inner.as_slice());
	keccak256(buf)
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_types::OracleSetMember;

	#[test]
	fn fixed_bytes32_round_trips_short_ascii() {
		for s in ["checkpoint", "transactionBatch", "tron", "a"] {
			let word = fixed_bytes32(s);
			assert_eq!(decode_fixed_bytes32(&word).unwrap(), s);
		}
	}

	#[test]
	fn fixed_bytes32_truncates_to_32_bytes() {
		let long = "x".repeat(40);
		let word = fixed_bytes32(&long);
		assert_eq!(decode_fixed_bytes32(&word).unwrap(), "x".repeat(32));
	}

	#[test]
	fn checkpoint_digest_rejects_empty_members() {
		let set = PendingOracleSet { nonce: U256::from(1u64), height: 1, members: vec![] };
		assert!(matches!(checkpoint_digest("tron", &set), Err(EncodingError::EmptyMembers)));
	}

	#[test]
	fn checkpoint_digest_is_stable_across_runs() {
		let set = PendingOracleSet {
			nonce: U256::from(7u64),
			height: 42,
			members: vec![
				OracleSetMember { external_address: ExternalAddress([1u8; 20]), power: 3000 },
				OracleSetMember { external_address: ExternalAddress([2u8; 20]), power: 1667 },
			],
		};
		let a = checkpoint_digest("tron", &set).unwrap();
		let b = checkpoint_digest("tron", &set).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn batch_digest_is_stable_across_runs() {
		let batch = PendingBatch {
			batch_nonce: U256::from(4u64),
			token_contract: ExternalAddress([0xAA; 20]),
			batch_timeout: U256::from(1000u64),
			fee_receive: ExternalAddress([0xBB; 20]),
			transactions: vec![BatchTransaction {
				id: U256::from(1u64),
				destination: ExternalAddress([0xCC; 20]),
				amount: U256::from(2_000_000_000u64),
				fee: U256::from(10_000_000u64),
			}],
		};
		let a = batch_digest("tron", &batch).unwrap();
		let b = batch_digest("tron", &batch).unwrap();
		assert_eq!(a, b);
		assert_ne!(a, B256::ZERO);
	}

	#[test]
	fn different_batches_yield_different_digests() {
		let base = PendingBatch {
			batch_nonce: U256::from(4u64),
			token_contract: ExternalAddress([0xAA; 20]),
			batch_timeout: U256::from(1000u64),
			fee_receive: ExternalAddress([0xBB; 20]),
			transactions: vec![BatchTransaction {
				id: U256::from(1u64),
				destination: ExternalAddress([0xCC; 20]),
				amount: U256::from(2_000_000_000u64),
				fee: U256::from(10_000_000u64),
			}],
		};
		let mut other = base.clone();
		other.batch_nonce = U256::from(5u64);
		assert_ne!(batch_digest("tron", &base).unwrap(), batch_digest("tron", &other).unwrap());
	}
}
