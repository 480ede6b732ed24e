//! Utility functions shared across the relayer crates.

/// Strips an optional `0x` prefix from a hex string.
pub fn without_0x_prefix(s: &str) -> &str {
	s.strip_prefix("0x").unwrap_or(s)
}

/// Encodes a right-padded 32-byte ABI field into the claim-message string the
/// app-chain expects: trailing zero bytes are trimmed, then the remainder is
/// hex-encoded. Note this hex-encodes the trimmed bytes themselves rather than
/// decoding them as ASCII, so an ibc channel path like `transfer/channel-0`
/// becomes its hex digits, not the path text.
pub fn encode_right_padded_field(bytes: &[u8; 32]) -> String {
	match bytes.iter().rposition(|&b| b != 0) {
		Some(last) => hex::encode(&bytes[..=last]),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn encode_right_padded_field_trims_trailing_zeros() {
		let mut bytes = [0u8; 32];
		bytes[..4].copy_from_slice(b"abcd");
		assert_eq!(encode_right_padded_field(&bytes), hex::encode(b"abcd"));
	}

	#[test]
	fn encode_right_padded_field_all_zero_is_empty() {
		assert_eq!(encode_right_padded_field(&[0u8; 32]), "");
	}
}
