//! The app-chain adapter: read-only queries against the cross-chain module
//! and the single `broadcast` write path both pipelines submit through
//! (§4.5).

use async_trait::async_trait;
use bridge_types::{
	BridgerAddress, BroadcastResult, ChainParams, ClaimMessage, ConfirmMessage, OracleStatus,
	PendingBatch, PendingOracleSet,
};
use thiserror::Error;

pub mod implementations {
	pub mod http;
}
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use implementations::http::HttpAppChainAdapter;

#[derive(Debug, Error)]
pub enum AppChainError {
	#[error("transient app-chain error: {0}")]
	Transient(String),
	#[error("malformed response from app-chain: {0}")]
	Malformed(String),
}

/// A message queued for the next `broadcast` call. Both pipelines submit
/// through this one path; the adapter does not need to know which pipeline
/// produced a given message.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
	Claim(ClaimMessage),
	Confirm(ConfirmMessage),
}

impl From<ClaimMessage> for OutboundMessage {
	fn from(value: ClaimMessage) -> Self {
		OutboundMessage::Claim(value)
	}
}

impl From<ConfirmMessage> for OutboundMessage {
	fn from(value: ConfirmMessage) -> Self {
		OutboundMessage::Confirm(value)
	}
}

/// Reads and writes against the app-chain's cross-chain module, exposed as an
/// async trait so the oracle and signer pipelines are testable against an
/// in-memory fake (see [`testing::FakeAppChainAdapter`]).
#[async_trait]
pub trait AppChainAdapter: Send + Sync {
	/// Whether `bridger` is currently online in the oracle set, and the
	/// external address it is registered under.
	async fn oracle_status(&self, bridger: &BridgerAddress) -> Result<OracleStatus, AppChainError>;

	/// The highest external-chain event nonce the app-chain has already
	/// accepted a claim for, from `bridger`.
	async fn last_event_nonce(&self, bridger: &BridgerAddress) -> Result<u64, AppChainError>;

	/// The external-chain block height the app-chain associates with
	/// `last_event_nonce`.
	async fn last_event_block(&self, bridger: &BridgerAddress) -> Result<u64, AppChainError>;

	/// The single outgoing batch awaiting confirmation from `bridger`, if any.
	async fn pending_batch(&self, bridger: &BridgerAddress) -> Result<Option<PendingBatch>, AppChainError>;

	/// Oracle-set rotations awaiting confirmation from `bridger`.
	async fn pending_oracle_sets(&self, bridger: &BridgerAddress) -> Result<Vec<PendingOracleSet>, AppChainError>;

	/// Chain-wide bridge module parameters needed to compute a signable digest.
	async fn params(&self) -> Result<ChainParams, AppChainError>;

	/// `bridger`'s balance of `denom`.
	async fn balance(&self, bridger: &BridgerAddress, denom: &str) -> Result<u128, AppChainError>;

	/// Builds, signs, and submits a transaction carrying `messages`. A
	/// non-zero `BroadcastResult.code` is a transactional reject, not an
	/// `Err` (§7).
	async fn broadcast(&self, bridger: &BridgerAddress, messages: &[OutboundMessage]) -> Result<BroadcastResult, AppChainError>;
}
