//! Typed bridge-contract events decoded from external-chain transaction logs.

use crate::ExternalAddress;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// A 32-byte external-chain transaction id.
pub type TxHash = [u8; 32];

/// The four event shapes the bridge contract can emit, each carrying the
/// contract-assigned `event_nonce` used to order claims on the app-chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BridgeEvent {
	SendToFx(SendToFxEvent),
	TransactionBatchExecuted(TransactionBatchExecutedEvent),
	AddBridgeToken(AddBridgeTokenEvent),
	OracleSetUpdated(OracleSetUpdatedEvent),
}

impl BridgeEvent {
	pub fn event_nonce(&self) -> u64 {
		match self {
			BridgeEvent::SendToFx(e) => e.event_nonce,
			BridgeEvent::TransactionBatchExecuted(e) => e.event_nonce,
			BridgeEvent::AddBridgeToken(e) => e.event_nonce,
			BridgeEvent::OracleSetUpdated(e) => e.event_nonce,
		}
	}

	pub fn tx_hash(&self) -> TxHash {
		match self {
			BridgeEvent::SendToFx(e) => e.tx_hash,
			BridgeEvent::TransactionBatchExecuted(e) => e.tx_hash,
			BridgeEvent::AddBridgeToken(e) => e.tx_hash,
			BridgeEvent::OracleSetUpdated(e) => e.tx_hash,
		}
	}

	/// Event name as it appears in the bridge contract ABI; used for logging only.
	pub fn name(&self) -> &'static str {
		match self {
			BridgeEvent::SendToFx(_) => "SendToFxEvent",
			BridgeEvent::TransactionBatchExecuted(_) => "TransactionBatchExecutedEvent",
			BridgeEvent::AddBridgeToken(_) => "AddBridgeTokenEvent",
			BridgeEvent::OracleSetUpdated(_) => "OracleSetUpdatedEvent",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendToFxEvent {
	pub event_nonce: u64,
	pub tx_hash: TxHash,
	pub token_contract: ExternalAddress,
	pub sender: ExternalAddress,
	/// Right-padded 32-byte app-chain account; the app-chain's 20-byte address
	/// lives in the last 20 bytes (`sdk.AccAddress(destination[12:])` upstream).
	pub destination: [u8; 32],
	/// Right-padded ascii ibc channel path, e.g. `transfer/channel-0`.
	pub target_ibc: [u8; 32],
	pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionBatchExecutedEvent {
	pub event_nonce: u64,
	pub tx_hash: TxHash,
	pub batch_nonce: U256,
	pub token: ExternalAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddBridgeTokenEvent {
	pub event_nonce: u64,
	pub tx_hash: TxHash,
	pub token_contract: ExternalAddress,
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
	pub channel_ibc: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleSetUpdatedEvent {
	pub event_nonce: u64,
	pub tx_hash: TxHash,
	pub new_oracle_set_nonce: U256,
	pub oracles: Vec<ExternalAddress>,
	pub powers: Vec<U256>,
}
