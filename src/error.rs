//! Error types for the file resubmission cache

/// Errors raised by a cache backend or the payload codec
///
/// A missing key is not an error; lookups return `Ok(None)`. These variants
/// cover genuine failures of the underlying store, which propagate to the
/// caller unmodified (no retry or suppression layer here).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
	#[error("cache backend error: {0}")]
	Backend(String),
	#[error("cached file encoding error: {0}")]
	Serialization(String),
}

/// Errors surfaced to the host application
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ResubmitError {
	/// The `"file_resubmit"` cache alias is not provisioned. Fatal at
	/// startup: the feature is unusable without a backing store.
	#[error("cache \"{0}\" is not configured")]
	CacheNotConfigured(String),
	#[error(transparent)]
	Cache(#[from] CacheError),
}
