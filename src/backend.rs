//! Cache backend abstraction and the in-memory reference backend
//!
//! The resubmission cache treats its store as an opaque synchronous
//! key-value service: value extraction runs inline in request handling,
//! so backends expose blocking `set`/`get`/`delete` and nothing else.
//! TTL and eviction are entirely backend policy.

use crate::error::{CacheError, ResubmitError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cache alias the host application must provision for file resubmission
pub const FILE_RESUBMIT_CACHE: &str = "file_resubmit";

/// A synchronous key-value store with backend-defined expiry
///
/// Implementations may be shared across concurrent requests; this crate
/// never issues two writes to the same key (tokens are minted fresh per
/// upload), so no locking beyond the backend's own is required.
pub trait CacheBackend: Send + Sync {
	/// Store `value` under `key`. Overwrite semantics for an existing key
	/// are backend-defined and not relied upon.
	fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), CacheError>;

	/// Look up `key`. An absent or expired entry is `Ok(None)`, not an error.
	fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

	/// Remove the entry for `key`; no-op if absent.
	fn delete(&self, key: &str) -> Result<(), CacheError>;
}

struct CacheEntry {
	value: Vec<u8>,
	expires_at: Option<Instant>,
}

impl CacheEntry {
	fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
		Self {
			value,
			expires_at: ttl.map(|ttl| Instant::now() + ttl),
		}
	}

	fn is_expired(&self) -> bool {
		self.expires_at.is_some_and(|at| Instant::now() >= at)
	}
}

/// In-memory cache backend
///
/// Reference backend for tests and single-process deployments. Entries are
/// process-local and vanish on restart, which is acceptable for a cache
/// whose contents are short-lived by design.
///
/// # Examples
///
/// ```
/// use reinhardt_file_resubmit::{CacheBackend, InMemoryBackend};
///
/// let backend = InMemoryBackend::new();
/// backend.set("key", b"value".to_vec(), None).unwrap();
/// assert_eq!(backend.get("key").unwrap(), Some(b"value".to_vec()));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryBackend {
	store: Arc<RwLock<HashMap<String, CacheEntry>>>,
	default_ttl: Option<Duration>,
}

impl InMemoryBackend {
	/// Create a new in-memory backend with no default TTL
	pub fn new() -> Self {
		Self::default()
	}

	/// Apply a default TTL to entries stored without an explicit one
	///
	/// # Examples
	///
	/// ```
	/// use std::time::Duration;
	/// use reinhardt_file_resubmit::InMemoryBackend;
	///
	/// let backend = InMemoryBackend::new().with_default_ttl(Duration::from_secs(600));
	/// ```
	pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
		self.default_ttl = Some(ttl);
		self
	}

	/// Drop expired entries
	///
	/// Expired entries already read as absent; this reclaims their memory.
	pub fn cleanup_expired(&self) {
		let mut store = self.store.write();
		store.retain(|_, entry| !entry.is_expired());
	}

	/// Number of entries currently stored, expired ones included
	pub fn len(&self) -> usize {
		self.store.read().len()
	}

	/// Whether the backend holds no entries
	pub fn is_empty(&self) -> bool {
		self.store.read().is_empty()
	}
}

impl CacheBackend for InMemoryBackend {
	fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), CacheError> {
		let ttl = ttl.or(self.default_ttl);
		let mut store = self.store.write();
		store.insert(key.to_string(), CacheEntry::new(value, ttl));
		Ok(())
	}

	fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
		let store = self.store.read();
		match store.get(key) {
			Some(entry) if !entry.is_expired() => Ok(Some(entry.value.clone())),
			_ => Ok(None),
		}
	}

	fn delete(&self, key: &str) -> Result<(), CacheError> {
		let mut store = self.store.write();
		store.remove(key);
		Ok(())
	}
}

/// Named cache backends provisioned by the host application
///
/// Replaces ambient global cache configuration with an explicit handle the
/// host threads through to wherever widgets are built. The
/// [`FILE_RESUBMIT_CACHE`] alias must be present before the resubmission
/// feature is usable; a missing alias is a configuration error the host
/// should surface at startup.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_file_resubmit::{CacheRegistry, InMemoryBackend};
///
/// let mut registry = CacheRegistry::new();
/// registry.insert("file_resubmit", Arc::new(InMemoryBackend::new()));
/// assert!(registry.file_resubmit().is_ok());
/// ```
#[derive(Clone, Default)]
pub struct CacheRegistry {
	backends: HashMap<String, Arc<dyn CacheBackend>>,
}

impl CacheRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a backend under an alias
	pub fn insert(&mut self, alias: impl Into<String>, backend: Arc<dyn CacheBackend>) {
		self.backends.insert(alias.into(), backend);
	}

	/// Look up a backend by alias
	pub fn get(&self, alias: &str) -> Result<Arc<dyn CacheBackend>, ResubmitError> {
		self.backends
			.get(alias)
			.cloned()
			.ok_or_else(|| ResubmitError::CacheNotConfigured(alias.to_string()))
	}

	/// Backend registered under the [`FILE_RESUBMIT_CACHE`] alias
	pub fn file_resubmit(&self) -> Result<Arc<dyn CacheBackend>, ResubmitError> {
		self.get(FILE_RESUBMIT_CACHE)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_set_get_delete() {
		let backend = InMemoryBackend::new();

		backend.set("key1", b"value1".to_vec(), None).unwrap();
		assert_eq!(backend.get("key1").unwrap(), Some(b"value1".to_vec()));

		backend.delete("key1").unwrap();
		assert_eq!(backend.get("key1").unwrap(), None);
	}

	#[test]
	fn test_get_missing_key_is_none_not_error() {
		let backend = InMemoryBackend::new();
		assert_eq!(backend.get("never-written").unwrap(), None);
	}

	#[test]
	fn test_delete_missing_key_is_noop() {
		let backend = InMemoryBackend::new();
		backend.delete("never-written").unwrap();
	}

	#[test]
	fn test_expired_entry_reads_as_absent() {
		// Arrange
		let backend = InMemoryBackend::new();
		backend
			.set("key1", b"value1".to_vec(), Some(Duration::from_millis(10)))
			.unwrap();

		// Act
		std::thread::sleep(Duration::from_millis(20));

		// Assert
		assert_eq!(backend.get("key1").unwrap(), None);
	}

	#[test]
	fn test_default_ttl_applies_when_no_explicit_ttl() {
		// Arrange
		let backend = InMemoryBackend::new().with_default_ttl(Duration::from_millis(10));
		backend.set("key1", b"value1".to_vec(), None).unwrap();

		// Act
		std::thread::sleep(Duration::from_millis(20));

		// Assert
		assert_eq!(backend.get("key1").unwrap(), None);
	}

	#[test]
	fn test_cleanup_expired_reclaims_entries() {
		// Arrange
		let backend = InMemoryBackend::new();
		backend
			.set("short", b"v".to_vec(), Some(Duration::from_millis(10)))
			.unwrap();
		backend.set("long", b"v".to_vec(), None).unwrap();
		std::thread::sleep(Duration::from_millis(20));
		assert_eq!(backend.len(), 2);

		// Act
		backend.cleanup_expired();

		// Assert
		assert_eq!(backend.len(), 1);
		assert_eq!(backend.get("long").unwrap(), Some(b"v".to_vec()));
	}

	#[test]
	fn test_registry_returns_configured_backend() {
		let mut registry = CacheRegistry::new();
		registry.insert(FILE_RESUBMIT_CACHE, Arc::new(InMemoryBackend::new()));

		assert!(registry.file_resubmit().is_ok());
	}

	#[test]
	fn test_registry_missing_alias_is_configuration_error() {
		let registry = CacheRegistry::new();

		let result = registry.file_resubmit();

		assert!(matches!(
			result,
			Err(ResubmitError::CacheNotConfigured(alias)) if alias == FILE_RESUBMIT_CACHE
		));
	}
}
