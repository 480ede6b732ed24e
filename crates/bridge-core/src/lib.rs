//! The relayer core: operator identity, the pure nonce invariant, the oracle
//! and signer pipelines, and the tick scheduler that drives them (§4.6-§4.8).

pub mod identity;
pub mod metrics;
pub mod nonce;
pub mod oracle;
pub mod scheduler;
pub mod signer;

pub use identity::OperatorIdentity;
pub use metrics::Metrics;
pub use nonce::{advance, NonceError};
pub use oracle::OraclePipeline;
pub use scheduler::Scheduler;
pub use signer::SignerPipeline;

use thiserror::Error;

/// The error taxonomy of §7, expressed as types a tick handler matches on
/// instead of inspecting error text.
#[derive(Debug, Error)]
pub enum TickError {
	/// Network/timeout on either chain; the next tick retries.
	#[error("transient: {0}")]
	Transient(String),
	/// A digest codec failure; logged, next tick retries.
	#[error("encoding: {0}")]
	Encoding(String),
	/// Invariant violation the scheduler must not paper over.
	#[error("fatal: {0}")]
	Fatal(String),
}

impl From<bridge_discovery::ExternalChainError> for TickError {
	fn from(e: bridge_discovery::ExternalChainError) -> Self {
		match e {
			bridge_discovery::ExternalChainError::Transient(m) => TickError::Transient(m),
			bridge_discovery::ExternalChainError::Malformed(m) => TickError::Encoding(m),
		}
	}
}

impl From<bridge_delivery::AppChainError> for TickError {
	fn from(e: bridge_delivery::AppChainError) -> Self {
		match e {
			bridge_delivery::AppChainError::Transient(m) => TickError::Transient(m),
			bridge_delivery::AppChainError::Malformed(m) => TickError::Encoding(m),
		}
	}
}

impl From<bridge_digest::EncodingError> for TickError {
	fn from(e: bridge_digest::EncodingError) -> Self {
		TickError::Encoding(e.to_string())
	}
}

impl From<bridge_account::AccountError> for TickError {
	fn from(e: bridge_account::AccountError) -> Self {
		TickError::Transient(e.to_string())
	}
}

impl From<bridge_storage::StorageError> for TickError {
	fn from(e: bridge_storage::StorageError) -> Self {
		TickError::Transient(e.to_string())
	}
}

impl From<NonceError> for TickError {
	fn from(e: NonceError) -> Self {
		TickError::Fatal(e.to_string())
	}
}
