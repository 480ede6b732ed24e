//! Scans the external chain for bridge events, orders and batches them into
//! claims, submits them to the app-chain, and advances the durable
//! checkpoint (§4.6).

use crate::{nonce::advance, TickError};
use bridge_delivery::{AppChainAdapter, OutboundMessage};
use bridge_discovery::ExternalChainAdapter;
use bridge_storage::CheckpointStore;
use bridge_types::{BridgerAddress, ClaimMessage, ExternalAddress};
use std::sync::Arc;

use crate::metrics::Metrics;
use crate::identity::OperatorIdentity;

const BLOCK_CONFIRMATIONS: u64 = 25;
const MAX_BATCH_MSGS: usize = 100;
const FLUSH_HEIGHT_WINDOW: u64 = 100;
const RESTART_DELAY: u64 = 28_800;
const QUERY_LOG_INTERVAL_WARN: u64 = 3_000;

/// Determines the external-chain height to resume scanning from (§4.6
/// Bootstrap). `user_start` is `--start-block-number`; 0 defers to the
/// app-chain's own record.
pub async fn bootstrap_height(
	external: &dyn ExternalChainAdapter,
	app: &dyn AppChainAdapter,
	checkpoint: &dyn CheckpointStore,
	bridger: &BridgerAddress,
	bridge_contract: ExternalAddress,
	user_start: u64,
	bootstrap_window: u64,
) -> Result<u64, TickError> {
	let a = app.last_event_block(bridger).await?;
	let c = checkpoint.read().await?.unwrap_or(0);
	let mut s = a.max(user_start);

	if s == 0 {
		let head = external.head_height().await?;
		let floor = head.saturating_sub(bootstrap_window);
		let mut h = head;
		let mut found = None;
		while h > floor {
			let events = external.query_oracle_set_updated(bridge_contract, h).await?;
			if !events.is_empty() {
				found = Some(h - 1);
				break;
			}
			h -= 1;
		}
		s = found.ok_or_else(|| {
			TickError::Fatal(format!("no OracleSetUpdatedEvent found within bootstrap window of {bootstrap_window} blocks"))
		})?;
	} else if c > RESTART_DELAY && c - RESTART_DELAY > s {
		s = c - RESTART_DELAY;
	}

	Ok(s)
}

pub struct OraclePipeline {
	external: Arc<dyn ExternalChainAdapter>,
	app: Arc<dyn AppChainAdapter>,
	checkpoint: Arc<dyn CheckpointStore>,
	metrics: Arc<Metrics>,
	s: u64,
}

impl OraclePipeline {
	pub fn new(
		external: Arc<dyn ExternalChainAdapter>,
		app: Arc<dyn AppChainAdapter>,
		checkpoint: Arc<dyn CheckpointStore>,
		metrics: Arc<Metrics>,
		s: u64,
	) -> Self {
		Self { external, app, checkpoint, metrics, s }
	}

	pub fn checkpoint_height(&self) -> u64 {
		self.s
	}

	/// Runs one scheduler tick of the oracle duty (§4.6 "Per tick").
	pub async fn tick(&mut self, identity: &OperatorIdentity) -> Result<(), TickError> {
		let status = self.app.oracle_status(&identity.bridger_addr).await?;
		if !status.online {
			tracing::warn!(bridger = %identity.bridger_addr, "oracle offline, skipping tick");
			return Ok(());
		}

		let mut last_nonce = self.app.last_event_nonce(&identity.bridger_addr).await?;
		let head = self.external.head_height().await?;
		let end = head.saturating_sub(BLOCK_CONFIRMATIONS);

		let interval = end.saturating_sub(self.s);
		self.metrics.query_log_block_interval.set(interval as f64);
		if interval > QUERY_LOG_INTERVAL_WARN {
			tracing::warn!(interval, threshold = QUERY_LOG_INTERVAL_WARN, "scan window exceeds the warning threshold");
		}

		if self.s >= end {
			return Ok(());
		}

		let mut buffer: Vec<ClaimMessage> = Vec::new();
		let mut flush_window_start = self.s;

		for h in (self.s + 1)..=end {
			let mut events = self.external.block_events(identity.bridge_contract, h).await?;
			events.sort_by_key(|e| e.event_nonce());
			for event in events {
				if event.event_nonce() <= last_nonce {
					continue;
				}
				buffer.push(event.to_claim(h, identity.bridger_addr.clone()));
			}

			let should_flush = buffer.len() >= MAX_BATCH_MSGS || h - flush_window_start >= FLUSH_HEIGHT_WINDOW || h == end;
			if should_flush {
				if !buffer.is_empty() {
					last_nonce = self.submit(&mut buffer, last_nonce, &identity.bridger_addr).await?;
				}
				self.s = h;
				self.checkpoint.write(self.s).await?;
				self.metrics.sync_block_height.set(self.s as f64);
				flush_window_start = h;
			}
		}

		Ok(())
	}

	/// Partitions `buffer` into fixed-size chunks and broadcasts each. Any
	/// non-zero broadcast code aborts the tick (§4.6 "submit(messages)").
	async fn submit(&self, buffer: &mut Vec<ClaimMessage>, last_nonce: u64, bridger: &BridgerAddress) -> Result<u64, TickError> {
		let mut nonce = last_nonce;
		for chunk in buffer.chunks(MAX_BATCH_MSGS) {
			nonce = advance(nonce, chunk)?;
			let messages: Vec<OutboundMessage> = chunk.iter().cloned().map(OutboundMessage::from).collect();
			let result = self.app.broadcast(bridger, &messages).await?;
			if !result.is_success() {
				return Err(TickError::Transient(format!("broadcast rejected with code {}", result.code)));
			}
			self.metrics.msg_pending_count.inc_by(chunk.len() as u64);
		}
		buffer.clear();
		Ok(nonce)
	}
}
