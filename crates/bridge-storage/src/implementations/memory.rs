//! In-memory checkpoint store used by pipeline unit tests.

use crate::{CheckpointStore, StorageError};
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryCheckpointStore {
	value: Mutex<Option<u64>>,
}

impl InMemoryCheckpointStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn seeded(height: u64) -> Self {
		Self { value: Mutex::new(Some(height)) }
	}
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
	async fn read(&self) -> Result<Option<u64>, StorageError> {
		Ok(*self.value.lock().await)
	}

	async fn write(&self, height: u64) -> Result<(), StorageError> {
		*self.value.lock().await = Some(height);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn seeded_store_reads_initial_value() {
		let store = InMemoryCheckpointStore::seeded(42);
		assert_eq!(store.read().await.unwrap(), Some(42));
	}

	#[tokio::test]
	async fn fresh_store_reads_none() {
		let store = InMemoryCheckpointStore::new();
		assert_eq!(store.read().await.unwrap(), None);
	}
}
