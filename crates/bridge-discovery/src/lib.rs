//! The external-chain adapter: current head height, per-height block event
//! logs decoded into typed [`BridgeEvent`]s, and the bootstrap-only
//! oracle-set-rotation query (§4.4).

use async_trait::async_trait;
use bridge_types::{BridgeEvent, ExternalAddress, OracleSetUpdatedEvent};
use thiserror::Error;

pub mod events;
pub mod implementations {
	pub mod http;
}
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use events::{decode_block_events, LogRecord, ReceiptResult, TransactionReceipt};
pub use implementations::http::HttpExternalChainAdapter;

#[derive(Debug, Error)]
pub enum ExternalChainError {
	#[error("transient external-chain error: {0}")]
	Transient(String),
	#[error("malformed response from external chain: {0}")]
	Malformed(String),
}

/// Read-only operations the relayer core needs from the external chain. The
/// core programs against this trait so it is testable against an in-memory
/// fake instead of a live node (see [`testing::FakeExternalChainAdapter`]).
#[async_trait]
pub trait ExternalChainAdapter: Send + Sync {
	/// The current known head height.
	async fn head_height(&self) -> Result<u64, ExternalChainError>;

	/// Decoded bridge events at `height`, in log order.
	async fn block_events(
		&self,
		contract: ExternalAddress,
		height: u64,
	) -> Result<Vec<BridgeEvent>, ExternalChainError>;

	/// Specialization of [`Self::block_events`] used only at bootstrap, to
	/// walk backwards looking for the most recent oracle-set rotation.
	async fn query_oracle_set_updated(
		&self,
		contract: ExternalAddress,
		height: u64,
	) -> Result<Vec<OracleSetUpdatedEvent>, ExternalChainError> {
		Ok(self
			.block_events(contract, height)
			.await?
			.into_iter()
			.filter_map(|event| match event {
				BridgeEvent::OracleSetUpdated(o) => Some(o),
				_ => None,
			})
			.collect())
	}
}
