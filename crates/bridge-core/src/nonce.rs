//! The nonce invariant as a pure, I/O-free function (§4.6, §9 Design Notes).

use bridge_types::ClaimMessage;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NonceError {
	#[error("first buffered claim has event_nonce {found}, expected {expected}")]
	Gap { expected: u64, found: u64 },
}

/// Checks that `claims[0].event_nonce == last_nonce + 1` and returns
/// `last_nonce + claims.len()`. An empty slice is a no-op that returns
/// `last_nonce` unchanged.
pub fn advance(last_nonce: u64, claims: &[ClaimMessage]) -> Result<u64, NonceError> {
	let Some(first) = claims.first() else {
		return Ok(last_nonce);
	};
	let expected = last_nonce + 1;
	let found = first.event_nonce();
	if found != expected {
		return Err(NonceError::Gap { expected, found });
	}
	Ok(last_nonce + claims.len() as u64)
}
