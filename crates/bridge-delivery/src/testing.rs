//! In-memory [`AppChainAdapter`] fake for exercising the oracle and signer
//! pipelines without a live app-chain.

use crate::{AppChainAdapter, AppChainError, OutboundMessage};
use async_trait::async_trait;
use bridge_types::{BridgerAddress, BroadcastResult, ChainParams, OracleStatus, PendingBatch, PendingOracleSet};
use std::sync::Mutex;

pub struct FakeAppChainAdapter {
	inner: Mutex<State>,
}

struct State {
	oracle_status: OracleStatus,
	last_event_nonce: u64,
	last_event_block: u64,
	pending_batch: Option<PendingBatch>,
	pending_oracle_sets: Vec<PendingOracleSet>,
	gravity_id: String,
	balance: u128,
	broadcasts: Vec<Vec<OutboundMessage>>,
	next_broadcast_code: u32,
}

impl FakeAppChainAdapter {
	pub fn new(oracle_status: OracleStatus, gravity_id: impl Into<String>) -> Self {
		Self {
			inner: Mutex::new(State {
				oracle_status,
				last_event_nonce: 0,
				last_event_block: 0,
				pending_batch: None,
				pending_oracle_sets: Vec::new(),
				gravity_id: gravity_id.into(),
				balance: 0,
				broadcasts: Vec::new(),
				next_broadcast_code: 0,
			}),
		}
	}

	pub fn set_last_event_nonce(&self, nonce: u64) {
		self.inner.lock().expect("fake adapter mutex poisoned").last_event_nonce = nonce;
	}

	pub fn set_last_event_block(&self, height: u64) {
		self.inner.lock().expect("fake adapter mutex poisoned").last_event_block = height;
	}

	pub fn set_pending_batch(&self, batch: Option<PendingBatch>) {
		self.inner.lock().expect("fake adapter mutex poisoned").pending_batch = batch;
	}

	pub fn set_pending_oracle_sets(&self, sets: Vec<PendingOracleSet>) {
		self.inner.lock().expect("fake adapter mutex poisoned").pending_oracle_sets = sets;
	}

	pub fn set_next_broadcast_code(&self, code: u32) {
		self.inner.lock().expect("fake adapter mutex poisoned").next_broadcast_code = code;
	}

	pub fn broadcasts(&self) -> Vec<Vec<OutboundMessage>> {
		self.inner.lock().expect("fake adapter mutex poisoned").broadcasts.clone()
	}
}

#[async_trait]
impl AppChainAdapter for FakeAppChainAdapter {
	async fn oracle_status(&self, _bridger: &BridgerAddress) -> Result<OracleStatus, AppChainError> {
		Ok(self.inner.lock().expect("fake adapter mutex poisoned").oracle_status)
	}

	async fn last_event_nonce(&self, _bridger: &BridgerAddress) -> Result<u64, AppChainError> {
		Ok(self.inner.lock().expect("fake adapter mutex poisoned").last_event_nonce)
	}

	async fn last_event_block(&self, _bridger: &BridgerAddress) -> Result<u64, AppChainError> {
		Ok(self.inner.lock().expect("fake adapter mutex poisoned").last_event_block)
	}

	async fn pending_batch(&self, _bridger: &BridgerAddress) -> Result<Option<PendingBatch>, AppChainError> {
		Ok(self.inner.lock().expect("fake adapter mutex poisoned").pending_batch.clone())
	}

	async fn pending_oracle_sets(&self, _bridger: &BridgerAddress) -> Result<Vec<PendingOracleSet>, AppChainError> {
		Ok(self.inner.lock().expect("fake adapter mutex poisoned").pending_oracle_sets.clone())
	}

	async fn params(&self) -> Result<ChainParams, AppChainError> {
		Ok(ChainParams { gravity_id: self.inner.lock().expect("fake adapter mutex poisoned").gravity_id.clone() })
	}

	async fn balance(&self, _bridger: &BridgerAddress, _denom: &str) -> Result<u128, AppChainError> {
		Ok(self.inner.lock().expect("fake adapter mutex poisoned").balance)
	}

	async fn broadcast(&self, _bridger: &BridgerAddress, messages: &[OutboundMessage]) -> Result<BroadcastResult, AppChainError> {
		let mut state = self.inner.lock().expect("fake adapter mutex poisoned");
		state.broadcasts.push(messages.to_vec());
		let code = state.next_broadcast_code;
		Ok(BroadcastResult { height: 1, tx_hash: format!("fake-{}", state.broadcasts.len()), code, raw_log: String::new() })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_types::{ClaimMessage, OracleSetUpdatedClaim};

	fn sample_status() -> OracleStatus {
		OracleStatus { online: true, external_address: bridge_types::ExternalAddress([1u8; 20]) }
	}

	#[tokio::test]
	async fn records_every_broadcast() {
		let fake = FakeAppChainAdapter::new(sample_status(), "tron");
		let bridger = BridgerAddress("fx1test".into());
		let claim = ClaimMessage::OracleSetUpdated(OracleSetUpdatedClaim {
			event_nonce: 1,
			block_height: 1,
			oracle_set_nonce: alloy_primitives::U256::from(1u64),
			members: vec![],
			bridger_addr: bridger.clone(),
			chain_name: "tron",
		});
		fake.broadcast(&bridger, &[OutboundMessage::Claim(claim)]).await.unwrap();
		assert_eq!(fake.broadcasts().len(), 1);
	}

	#[tokio::test]
	async fn reports_configured_broadcast_code() {
		let fake = FakeAppChainAdapter::new(sample_status(), "tron");
		fake.set_next_broadcast_code(5);
		let bridger = BridgerAddress("fx1test".into());
		let result = fake.broadcast(&bridger, &[]).await.unwrap();
		assert_eq!(result.code, 5);
		assert!(!result.is_success());
	}
}
