//! Signer-side confirmations and the pending-work shapes the signer pipeline polls for.

use crate::{BridgerAddress, ExternalAddress};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// A member of an oracle set: external-chain signer address plus voting power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleSetMember {
	pub external_address: ExternalAddress,
	pub power: u64,
}

/// A pending oracle-set rotation awaiting this signer's confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOracleSet {
	pub nonce: U256,
	pub height: u64,
	pub members: Vec<OracleSetMember>,
}

/// A single transfer inside a pending batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTransaction {
	pub id: U256,
	pub destination: ExternalAddress,
	pub amount: U256,
	pub fee: U256,
}

/// A pending outgoing batch awaiting this signer's confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingBatch {
	pub batch_nonce: U256,
	pub token_contract: ExternalAddress,
	pub batch_timeout: U256,
	pub fee_receive: ExternalAddress,
	pub transactions: Vec<BatchTransaction>,
}

/// The signature this signer attaches to a checkpoint (oracle-set) digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleSetConfirm {
	pub nonce: U256,
	pub external_address: ExternalAddress,
	pub bridger_addr: BridgerAddress,
	pub signature: [u8; 65],
}

/// The signature this signer attaches to a transaction-batch digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmBatch {
	pub batch_nonce: U256,
	pub token_contract: ExternalAddress,
	pub external_address: ExternalAddress,
	pub bridger_addr: BridgerAddress,
	pub signature: [u8; 65],
}

/// A signed confirmation message, tagged by what it confirms.
///
/// Mirrors [`crate::claim::ClaimMessage`]: one enum, one nonce accessor, no
/// virtual dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfirmMessage {
	OracleSet(OracleSetConfirm),
	Batch(ConfirmBatch),
}

impl ConfirmMessage {
	pub fn nonce(&self) -> U256 {
		match self {
			ConfirmMessage::OracleSet(c) => c.nonce,
			ConfirmMessage::Batch(c) => c.batch_nonce,
		}
	}
}
