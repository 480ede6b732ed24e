//! Address newtypes for the two chains the relayer bridges between.
//!
//! External-chain addresses travel over the wire (events, pending batches, oracle
//! sets) as base58check strings; the digest codec needs their raw 20-byte body.
//! App-chain addresses travel as bech32 strings whose prefix is operator-configured.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Network byte TRON-style chains prefix their 20-byte address body with before
/// base58check-encoding (`0x41`, matching the TRON mainnet/production convention).
pub const EXTERNAL_NETWORK_BYTE: u8 = 0x41;

#[derive(Debug, Error)]
pub enum AddressError {
	#[error("invalid base58check address: {0}")]
	Base58(String),
	#[error("decoded address body has {0} bytes, expected 20")]
	BadLength(usize),
	#[error("invalid bech32 address: {0}")]
	Bech32(String),
}

/// An address on the external (TRON-like) chain: 20-byte body, base58check on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalAddress(pub [u8; 20]);

impl ExternalAddress {
	pub fn from_base58check(s: &str) -> Result<Self, AddressError> {
		let decoded = bs58::decode(s)
			.with_check(None)
			.into_vec()
			.map_err(|e| AddressError::Base58(e.to_string()))?;
		// bs58's with_check strips the checksum but keeps the leading network byte.
		if decoded.len() != 21 {
			return Err(AddressError::BadLength(decoded.len().saturating_sub(1)));
		}
		let mut body = [0u8; 20];
		body.copy_from_slice(&decoded[1..]);
		Ok(Self(body))
	}

    pub fn to_base58check(self) -> String {
        let mut full = Vec::with_capacity(21);
        full.push(EXTERNAL_NETWORK_BYTE);
        full.extend_from_slice(&self.0);
        bs58::encode(full).with_check().into_string()
    }

	/// Left-pad the 20-byte body into a 32-byte ABI `address` word.
	pub fn to_abi_word(self) -> [u8; 32] {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(&self.0);
		word
	}

	pub fn as_bytes(&self) -> &[u8; 20] {
		&self.0
	}
}

impl fmt::Display for ExternalAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_base58check())
	}
}

/// An address on the app-chain: bech32-encoded hash of a secp256k1 public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BridgerAddress(pub String);

impl BridgerAddress {
	/// Derives a bech32 cosmos-style address from a compressed secp256k1 public key:
	/// `ripemd160(sha256(pubkey))`, bech32-encoded with the given human-readable prefix.
	pub fn from_pubkey(prefix: &str, compressed_pubkey: &[u8]) -> Result<Self, AddressError> {
		use ripemd::Ripemd160;
		use sha2::{Digest, Sha256};

		let sha = Sha256::digest(compressed_pubkey);
		let hash = Ripemd160::digest(sha);
		let hrp = bech32::Hrp::parse(prefix).map_err(|e| AddressError::Bech32(e.to_string()))?;
		let encoded = bech32::encode::<bech32::Bech32>(hrp, &hash)
			.map_err(|e| AddressError::Bech32(e.to_string()))?;
		Ok(Self(encoded))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for BridgerAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn external_address_round_trips_through_base58check() {
		let addr = ExternalAddress([7u8; 20]);
		let encoded = addr.to_base58check();
		let decoded = ExternalAddress::from_base58check(&encoded).unwrap();
		assert_eq!(addr, decoded);
	}

	#[test]
	fn external_address_rejects_garbage() {
		assert!(ExternalAddress::from_base58check("not-base58!!").is_err());
	}

	#[test]
	fn abi_word_left_pads_the_body() {
		let addr = ExternalAddress([0xAB; 20]);
		let word = addr.to_abi_word();
		assert_eq!(&word[..12], &[0u8; 12]);
		assert_eq!(&word[12..], &[0xAB; 20]);
	}
}
