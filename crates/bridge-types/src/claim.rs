//! Claim messages: the app-chain-bound reports of external-chain bridge events.

use crate::events::{
	AddBridgeTokenEvent, BridgeEvent, OracleSetUpdatedEvent, SendToFxEvent,
	TransactionBatchExecutedEvent,
};
use crate::utils::encode_right_padded_field;
use crate::{BridgerAddress, ExternalAddress};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// The chain-name tag every claim and confirm carries; fixed for the process lifetime.
pub const CHAIN_NAME: &str = "tron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendToFxClaim {
	pub event_nonce: u64,
	pub block_height: u64,
	pub token_contract: ExternalAddress,
	pub amount: U256,
	pub sender: ExternalAddress,
	pub receiver: [u8; 32],
	pub target_ibc: String,
	pub bridger_addr: BridgerAddress,
	pub chain_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendToExternalClaim {
	pub event_nonce: u64,
	pub block_height: u64,
	pub batch_nonce: U256,
	pub token_contract: ExternalAddress,
	pub bridger_addr: BridgerAddress,
	pub chain_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeTokenClaim {
	pub event_nonce: u64,
	pub block_height: u64,
	pub token_contract: ExternalAddress,
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
	pub channel_ibc: String,
	pub bridger_addr: BridgerAddress,
	pub chain_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleSetUpdatedClaim {
	pub event_nonce: u64,
	pub block_height: u64,
	pub oracle_set_nonce: U256,
	pub members: Vec<(u64, ExternalAddress)>,
	pub bridger_addr: BridgerAddress,
	pub chain_name: &'static str,
}

/// A single app-chain claim message, tagged by the event kind it reports.
///
/// Each event (§3) maps to exactly one claim via [`BridgeEvent::to_claim`]; there
/// is no virtual dispatch, just one enum with a shared nonce accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClaimMessage {
	SendToFx(SendToFxClaim),
	SendToExternal(SendToExternalClaim),
	BridgeToken(BridgeTokenClaim),
	OracleSetUpdated(OracleSetUpdatedClaim),
}

impl ClaimMessage {
	pub fn event_nonce(&self) -> u64 {
		match self {
			ClaimMessage::SendToFx(c) => c.event_nonce,
			ClaimMessage::SendToExternal(c) => c.event_nonce,
			ClaimMessage::BridgeToken(c) => c.event_nonce,
			ClaimMessage::OracleSetUpdated(c) => c.event_nonce,
		}
	}
}

impl BridgeEvent {
	/// Maps a decoded event into the app-chain claim message that reports it.
	pub fn to_claim(&self, block_height: u64, bridger_addr: BridgerAddress) -> ClaimMessage {
		match self {
			BridgeEvent::SendToFx(SendToFxEvent {
				event_nonce,
				token_contract,
				sender,
				destination,
				target_ibc,
				amount,
				..
			}) => ClaimMessage::SendToFx(SendToFxClaim {
				event_nonce: *event_nonce,
				block_height,
				token_contract: *token_contract,
				amount: *amount,
				sender: *sender,
				receiver: *destination,
				target_ibc: encode_right_padded_field(target_ibc),
				bridger_addr,
				chain_name: CHAIN_NAME,
			}),
			BridgeEvent::TransactionBatchExecuted(TransactionBatchExecutedEvent {
				event_nonce,
				batch_nonce,
				token,
				..
			}) => ClaimMessage::SendToExternal(SendToExternalClaim {
				event_nonce: *event_nonce,
				block_height,
				batch_nonce: *batch_nonce,
				token_contract: *token,
				bridger_addr,
				chain_name: CHAIN_NAME,
			}),
			BridgeEvent::AddBridgeToken(AddBridgeTokenEvent {
				event_nonce,
				token_contract,
				name,
				symbol,
				decimals,
				channel_ibc,
				..
			}) => ClaimMessage::BridgeToken(BridgeTokenClaim {
				event_nonce: *event_nonce,
				block_height,
				token_contract: *token_contract,
				name: name.clone(),
				symbol: symbol.clone(),
				decimals: *decimals,
				channel_ibc: encode_right_padded_field(channel_ibc),
				bridger_addr,
				chain_name: CHAIN_NAME,
			}),
			BridgeEvent::OracleSetUpdated(OracleSetUpdatedEvent {
				event_nonce,
				new_oracle_set_nonce,
				oracles,
				powers,
				..
			}) => ClaimMessage::OracleSetUpdated(OracleSetUpdatedClaim {
				event_nonce: *event_nonce,
				block_height,
				oracle_set_nonce: *new_oracle_set_nonce,
				members: oracles
					.iter()
					.zip(powers.iter())
					.map(|(addr, power)| (power.to::<u64>(), *addr))
					.collect(),
				bridger_addr,
				chain_name: CHAIN_NAME,
			}),
		}
	}
}
