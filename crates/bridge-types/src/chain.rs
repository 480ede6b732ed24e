//! Shared read/write result shapes for the two chain adapters.

use crate::ExternalAddress;
use serde::{Deserialize, Serialize};

/// Whether this bridger is registered and online in the current oracle set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleStatus {
	pub online: bool,
	pub external_address: ExternalAddress,
}

/// App-chain bridge module parameters needed to build a signable digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
	pub gravity_id: String,
}

/// The outcome of broadcasting a signed transaction to the app-chain.
///
/// A non-zero `code` is a transactional reject, reported here rather than as
/// an `Err`; see the adapter's error enum for transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
	pub height: u64,
	pub tx_hash: String,
	pub code: u32,
	pub raw_log: String,
}

impl BroadcastResult {
	pub fn is_success(&self) -> bool {
		self.code == 0
	}
}
