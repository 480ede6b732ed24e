//! File-backed checkpoint store: write-then-rename for atomic replacement.
//!
//! Redesigns the original's plain write-over (§9 Design Notes) into a
//! temp-file-plus-rename sequence; the semantic contract to callers — read
//! returns `None` until the first successful write — does not change.

use crate::{CheckpointStore, StorageError};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct FileCheckpointStore {
	path: PathBuf,
}

impl FileCheckpointStore {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	fn io_err(&self, source: std::io::Error) -> StorageError {
		StorageError::Io { path: self.path.clone(), source }
	}
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
	async fn read(&self) -> Result<Option<u64>, StorageError> {
		let contents = match tokio::fs::read_to_string(&self.path).await {
			Ok(s) => s,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(self.io_err(e)),
		};
		let trimmed = contents.trim();
		if trimmed.is_empty() {
			return Ok(None);
		}
		trimmed
			.parse::<u64>()
			.map(Some)
			.map_err(|_| StorageError::Malformed(trimmed.to_string()))
	}

	async fn write(&self, height: u64) -> Result<(), StorageError> {
		let dir = self.path.parent().unwrap_or_else(|| std::path::Path::new("."));
		tokio::fs::create_dir_all(dir).await.map_err(|e| self.io_err(e))?;

		let tmp_path = dir.join(format!(
			".lastBlockNumber.info.tmp.{}",
			std::process::id()
		));
		tokio::fs::write(&tmp_path, height.to_string())
			.await
			.map_err(|e| self.io_err(e))?;
		tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| self.io_err(e))?;
		tracing::debug!(height, path = %self.path.display(), "checkpoint persisted");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn missing_file_reads_as_none() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileCheckpointStore::new(dir.path().join("lastBlockNumber.info"));
		assert_eq!(store.read().await.unwrap(), None);
	}

	#[tokio::test]
	async fn write_then_read_round_trips() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileCheckpointStore::new(dir.path().join("sub").join("lastBlockNumber.info"));
		store.write(12345).await.unwrap();
		assert_eq!(store.read().await.unwrap(), Some(12345));
	}

	#[tokio::test]
	async fn write_replaces_prior_value() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("lastBlockNumber.info");
		let store = FileCheckpointStore::new(path.clone());
		store.write(100).await.unwrap();
		store.write(200).await.unwrap();
		assert_eq!(store.read().await.unwrap(), Some(200));
		// No leftover temp files after a successful rename.
		let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
		assert_eq!(entries.len(), 1);
	}

	#[tokio::test]
	async fn empty_file_reads_as_none() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("lastBlockNumber.info");
		tokio::fs::write(&path, "").await.unwrap();
		let store = FileCheckpointStore::new(path);
		assert_eq!(store.read().await.unwrap(), None);
	}

	#[tokio::test]
	async fn malformed_contents_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("lastBlockNumber.info");
		tokio::fs::write(&path, "not-a-number").await.unwrap();
		let store = FileCheckpointStore::new(path);
		assert!(matches!(store.read().await, Err(StorageError::Malformed(_))));
	}
}
