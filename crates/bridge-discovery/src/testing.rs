//! In-memory [`ExternalChainAdapter`] fake for exercising the oracle
//! pipeline without a live node.

use crate::{ExternalChainAdapter, ExternalChainError};
use async_trait::async_trait;
use bridge_types::{BridgeEvent, ExternalAddress};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A fixed chain of blocks, each holding whatever events the test wants to
/// appear at that height. `head_height` always reports the highest key
/// present, regardless of what's been scanned.
#[derive(Default)]
pub struct FakeExternalChainAdapter {
	blocks: Mutex<BTreeMap<u64, Vec<BridgeEvent>>>,
}

impl FakeExternalChainAdapter {
	pub fn new() -> Self {
		Self { blocks: Mutex::new(BTreeMap::new()) }
	}

	/// Registers `events` as the log contents of block `height`.
	pub fn set_block(&self, height: u64, events: Vec<BridgeEvent>) {
		self.blocks.lock().expect("fake adapter mutex poisoned").insert(height, events);
	}
}

#[async_trait]
impl ExternalChainAdapter for FakeExternalChainAdapter {
	async fn head_height(&self) -> Result<u64, ExternalChainError> {
		Ok(self
			.blocks
			.lock()
			.expect("fake adapter mutex poisoned")
			.keys()
			.next_back()
			.copied()
			.unwrap_or(0))
	}

	async fn block_events(
		&self,
		_contract: ExternalAddress,
		height: u64,
	) -> Result<Vec<BridgeEvent>, ExternalChainError> {
		Ok(self.blocks.lock().expect("fake adapter mutex poisoned").get(&height).cloned().unwrap_or_default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_types::{ExternalAddress, OracleSetUpdatedEvent};
	use alloy_primitives::U256;

	#[tokio::test]
	async fn reports_head_as_highest_registered_block() {
		let fake = FakeExternalChainAdapter::new();
		fake.set_block(10, vec![]);
		fake.set_block(12, vec![]);
		assert_eq!(fake.head_height().await.unwrap(), 12);
	}

	#[tokio::test]
	async fn returns_empty_for_unregistered_blocks() {
		let fake = FakeExternalChainAdapter::new();
		let events = fake.block_events(ExternalAddress([1u8; 20]), 99).await.unwrap();
		assert!(events.is_empty());
	}

	#[tokio::test]
	async fn default_query_oracle_set_updated_filters_other_variants() {
		let fake = FakeExternalChainAdapter::new();
		let o = OracleSetUpdatedEvent {
			event_nonce: 1,
			tx_hash: [0u8; 32],
			new_oracle_set_nonce: U256::from(1u64),
			oracles: vec![],
			powers: vec![],
		};
		fake.set_block(5, vec![BridgeEvent::OracleSetUpdated(o.clone())]);
		let found = fake.query_oracle_set_updated(ExternalAddress([1u8; 20]), 5).await.unwrap();
		assert_eq!(found.len(), 1);
		assert_eq!(found[0].event_nonce, o.event_nonce);
	}
}
