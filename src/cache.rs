//! Short-lived file cache keyed by resubmission token
//!
//! Stores the full byte content of an upload together with the metadata
//! downstream validators inspect (filename, size, MIME type, charset), so
//! a file restored from the cache satisfies the same contract as a
//! freshly-submitted one.

use crate::backend::CacheBackend;
use crate::error::CacheError;
use crate::upload::UploadedFile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Cache payload for one resubmission token
///
/// Entries are written once per token and never updated in place; the
/// `content` bytes round-trip without transcoding.
#[derive(Debug, Serialize, Deserialize)]
struct CachedFile {
	name: String,
	size: usize,
	content_type: String,
	charset: Option<String>,
	#[serde(with = "serde_bytes")]
	content: Vec<u8>,
}

/// Key-value store of upload payloads, backed by an injected cache backend
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_file_resubmit::{FileCache, InMemoryBackend, UploadedFile};
///
/// let cache = FileCache::new(Arc::new(InMemoryBackend::new()));
/// let upload = UploadedFile::new("doc", "report.pdf", b"%PDF".to_vec(), "application/pdf");
///
/// cache.set("a1b2c3d4e5", &upload).unwrap();
/// let restored = cache.get("a1b2c3d4e5", "doc").unwrap().unwrap();
/// assert_eq!(restored.content(), b"%PDF");
/// ```
#[derive(Clone)]
pub struct FileCache {
	backend: Arc<dyn CacheBackend>,
	ttl: Option<Duration>,
}

impl FileCache {
	/// Create a file cache over a backend, deferring expiry to backend policy
	pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
		Self { backend, ttl: None }
	}

	/// Request an explicit TTL for entries written through this cache
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = Some(ttl);
		self
	}

	/// Store an upload's content and metadata under `key`
	///
	/// One write to the backend; backend failures propagate unmodified.
	pub fn set(&self, key: &str, upload: &UploadedFile) -> Result<(), CacheError> {
		let state = CachedFile {
			name: upload.name().to_string(),
			size: upload.size(),
			content_type: upload.content_type().to_string(),
			charset: upload.charset().map(str::to_string),
			content: upload.content().to_vec(),
		};
		let encoded = serde_json::to_vec(&state)
			.map_err(|e| CacheError::Serialization(e.to_string()))?;

		tracing::debug!(key, size = state.size, "caching upload for resubmission");
		self.backend.set(key, encoded, self.ttl)
	}

	/// Reconstruct the upload stored under `key`, labeled with `field_name`
	///
	/// An absent or expired entry is `Ok(None)`; only backend I/O failures
	/// and corrupt payloads are errors.
	pub fn get(&self, key: &str, field_name: &str) -> Result<Option<UploadedFile>, CacheError> {
		let Some(encoded) = self.backend.get(key)? else {
			tracing::debug!(key, "resubmission cache miss");
			return Ok(None);
		};
		let state: CachedFile = serde_json::from_slice(&encoded)
			.map_err(|e| CacheError::Serialization(e.to_string()))?;

		tracing::debug!(key, size = state.size, "restored upload from resubmission cache");
		let mut upload =
			UploadedFile::new(field_name, state.name, state.content, state.content_type);
		if let Some(charset) = state.charset {
			upload = upload.with_charset(charset);
		}
		Ok(Some(upload))
	}

	/// Remove the entry for `key`; no-op if absent
	pub fn delete(&self, key: &str) -> Result<(), CacheError> {
		self.backend.delete(key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::backend::InMemoryBackend;
	use rstest::rstest;

	fn cache() -> FileCache {
		FileCache::new(Arc::new(InMemoryBackend::new()))
	}

	#[rstest]
	#[case(b"plain text".to_vec())]
	#[case(vec![])]
	#[case(vec![0x00, 0xFF, 0x89, 0x50, 0x4E, 0x47])]
	fn test_content_round_trips_byte_exact(#[case] content: Vec<u8>) {
		// Arrange
		let cache = cache();
		let upload = UploadedFile::new("doc", "file.bin", content.clone(), "application/octet-stream");

		// Act
		cache.set("key1", &upload).unwrap();
		let restored = cache.get("key1", "doc").unwrap().unwrap();

		// Assert
		assert_eq!(restored.content(), content.as_slice());
		assert_eq!(restored.size(), content.len());
	}

	#[test]
	fn test_metadata_round_trips() {
		// Arrange
		let cache = cache();
		let upload = UploadedFile::new("notes", "dir/notes.txt", b"hello".to_vec(), "text/plain")
			.with_charset("utf-8");

		// Act
		cache.set("key1", &upload).unwrap();
		let restored = cache.get("key1", "notes").unwrap().unwrap();

		// Assert
		assert_eq!(restored.name(), "dir/notes.txt");
		assert_eq!(restored.size(), 5);
		assert_eq!(restored.content_type(), "text/plain");
		assert_eq!(restored.charset(), Some("utf-8"));
		assert_eq!(restored.field_name(), "notes");
	}

	#[test]
	fn test_get_labels_upload_with_destination_field() {
		let cache = cache();
		let upload = UploadedFile::new("original_field", "a.txt", b"x".to_vec(), "text/plain");
		cache.set("key1", &upload).unwrap();

		let restored = cache.get("key1", "other_field").unwrap().unwrap();

		assert_eq!(restored.field_name(), "other_field");
	}

	#[test]
	fn test_missing_key_is_none() {
		let cache = cache();
		assert!(cache.get("never-written", "doc").unwrap().is_none());
	}

	#[test]
	fn test_delete_then_get_is_none() {
		let cache = cache();
		let upload = UploadedFile::new("doc", "a.txt", b"x".to_vec(), "text/plain");
		cache.set("key1", &upload).unwrap();

		cache.delete("key1").unwrap();

		assert!(cache.get("key1", "doc").unwrap().is_none());
	}

	#[test]
	fn test_delete_missing_key_is_noop() {
		cache().delete("never-written").unwrap();
	}

	#[test]
	fn test_ttl_expiry_reads_as_absent() {
		// Arrange
		let cache = cache().with_ttl(Duration::from_millis(10));
		let upload = UploadedFile::new("doc", "a.txt", b"x".to_vec(), "text/plain");
		cache.set("key1", &upload).unwrap();

		// Act
		std::thread::sleep(Duration::from_millis(20));

		// Assert
		assert!(cache.get("key1", "doc").unwrap().is_none());
	}
}
