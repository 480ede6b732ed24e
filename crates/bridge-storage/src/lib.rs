//! Durable checkpoint of the highest external-chain block whose events have
//! all been submitted to the app-chain (§4.3).
//!
//! The only mutator is the oracle pipeline, and the only reader at startup is
//! the bootstrap bound-finder; no other component touches this file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod implementations {
	pub mod file;
	pub mod memory;
}

pub use implementations::file::FileCheckpointStore;
pub use implementations::memory::InMemoryCheckpointStore;

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("io error at {path}: {source}")]
	Io { path: PathBuf, source: std::io::Error },
	#[error("checkpoint file contains non-decimal content: {0:?}")]
	Malformed(String),
}

/// Persists and recovers the last fully-processed external block height.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
	/// Returns `None` if no checkpoint has ever been written.
	async fn read(&self) -> Result<Option<u64>, StorageError>;

	/// Persists `height` so it survives a process restart. Implementations
	/// must make this atomic enough that a crash mid-write loses at most the
	/// last advance, never corrupts the previously-durable value.
	async fn write(&self, height: u64) -> Result<(), StorageError>;
}

/// Resolves the checkpoint file path from `$HOME` (or an explicit override),
/// matching the on-disk layout `$HOME/.tronBridge/lastBlockNumber.info`.
pub fn checkpoint_path(home_override: Option<&Path>) -> PathBuf {
	let home = home_override
		.map(Path::to_path_buf)
		.or_else(|| std::env::var_os("HOME").map(PathBuf::from))
		.unwrap_or_else(|| PathBuf::from("."));
	home.join(".tronBridge").join("lastBlockNumber.info")
}
