//! File upload preservation across failed form submissions
//!
//! Browsers never resubmit a previously chosen file when a form comes back
//! with validation errors, so without help the user has to pick the file
//! again. This crate intercepts the upload during the initial submission,
//! parks its bytes in a short-lived cache under a random token, renders the
//! token as a hidden field, and restores the file from the cache on the
//! next submission when no new file arrives.
//!
//! Two components:
//! - [`FileCache`]: put/get/delete of upload payloads (content plus the
//!   metadata validators need), over an injected [`CacheBackend`].
//! - [`ResubmitWidget`]: the per-request decision between a fresh upload,
//!   a cached file, or no value, parameterized by a base markup delegate
//!   so plain form, image and admin contexts share one implementation.
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use reinhardt_file_resubmit::{
//!     FileCache, FileValue, InMemoryBackend, ResubmitWidget, UploadedFile,
//! };
//!
//! let cache = FileCache::new(Arc::new(InMemoryBackend::new()));
//! let widget = ResubmitWidget::file(cache);
//!
//! // Submission with a file: the widget caches it and mints a token.
//! let mut files = HashMap::new();
//! files.insert(
//!     "resume".to_string(),
//!     UploadedFile::new("resume", "cv.pdf", b"%PDF-1.7".to_vec(), "application/pdf"),
//! );
//! let extraction = widget.extract(&HashMap::new(), &files, "resume").unwrap();
//!
//! // The hidden field keeps the token alive across the failed attempt.
//! let hidden = widget.render_extra(None, &extraction.state);
//! assert!(hidden.contains("resume_cache_key"));
//! ```

pub mod admin;
pub mod backend;
pub mod cache;
pub mod error;
pub mod upload;
pub mod widgets;

pub use backend::{CacheBackend, CacheRegistry, FILE_RESUBMIT_CACHE, InMemoryBackend};
pub use cache::FileCache;
pub use error::{CacheError, ResubmitError};
pub use upload::UploadedFile;
pub use widgets::{
	BaseRenderer, Extraction, FieldKind, FileInput, FileValue, FormData, FormFiles, HiddenInput,
	ResubmitWidget, WidgetState, cache_key_input_name,
};
