//! Resubmission-aware file input widgets
//!
//! When a form with a file field fails validation, browsers drop the chosen
//! file from the next submission. [`ResubmitWidget`] intercepts the upload
//! on the way in, parks its bytes in the [`FileCache`] under a freshly
//! minted token, and emits that token as a hidden field
//! (`<field>_cache_key`). A later submission that carries the token but no
//! new file gets the cached upload back, so the user never re-picks it.
//!
//! File, image and admin variants share one decision procedure; only the
//! delegated base markup differs, so the widget is parameterized by a
//! [`BaseRenderer`] instead of subclassed per context.

use crate::cache::FileCache;
use crate::error::CacheError;
use crate::upload::UploadedFile;
use std::collections::HashMap;

/// Submitted non-file form values, keyed by input name
pub type FormData = HashMap<String, String>;

/// Submitted uploads, keyed by field name
pub type FormFiles = HashMap<String, UploadedFile>;

/// Length of a resubmission token in hex characters
const TOKEN_LENGTH: usize = 10;

/// Outcome of extracting a file field's value from submitted data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileValue {
	/// A file is available, fresh from the request or restored from cache
	Upload(UploadedFile),
	/// The user checked the clear checkbox
	Clear,
	/// The user both uploaded a new file and checked clear; the
	/// contradiction is surfaced unchanged for the field to reject
	Contradiction,
	/// Nothing was submitted for this field
	Missing,
}

/// Per-extraction widget state threaded into rendering
///
/// Returned from [`ResubmitWidget::extract`] rather than kept as mutable
/// widget fields, so render calls carry no ordering dependency on earlier
/// extractions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
	input_name: String,
	cache_key: Option<String>,
}

impl WidgetState {
	fn new(name: &str, cache_key: Option<String>) -> Self {
		Self {
			input_name: cache_key_input_name(name),
			cache_key,
		}
	}

	/// Name of the companion hidden input (`<field>_cache_key`)
	pub fn input_name(&self) -> &str {
		&self.input_name
	}

	/// Token currently associated with this render, if any
	pub fn cache_key(&self) -> Option<&str> {
		self.cache_key.as_deref()
	}
}

/// Extraction result: the field value plus the state the render step needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
	pub value: FileValue,
	pub state: WidgetState,
}

/// Markup delegate for the non-resubmission parts of the widget
///
/// Implemented by [`FileInput`] for plain forms and
/// [`AdminFileInput`](crate::admin::AdminFileInput) for the admin; the
/// resubmission logic itself never varies across delegates.
pub trait BaseRenderer: Send + Sync {
	/// Render the base file input markup
	fn render(
		&self,
		name: &str,
		value: Option<&UploadedFile>,
		attrs: &HashMap<String, String>,
	) -> String;
}

/// Whether a widget is attached to a file field or an image field
///
/// The distinction is resolved by the host's field classifier (see
/// [`crate::admin::FieldClassifier`]); the widget logic ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	File,
	Image,
}

/// File input widget that preserves uploads across failed submissions
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use std::sync::Arc;
/// use reinhardt_file_resubmit::{
///     FileCache, FileValue, InMemoryBackend, ResubmitWidget, UploadedFile,
/// };
///
/// let cache = FileCache::new(Arc::new(InMemoryBackend::new()));
/// let widget = ResubmitWidget::file(cache);
///
/// // First submission: fresh upload, token minted.
/// let mut files = HashMap::new();
/// files.insert(
///     "avatar".to_string(),
///     UploadedFile::new("avatar", "me.png", vec![0x89, 0x50], "image/png"),
/// );
/// let first = widget.extract(&HashMap::new(), &files, "avatar").unwrap();
/// let token = first.state.cache_key().unwrap().to_string();
///
/// // Resubmission: token only, upload restored from cache.
/// let mut data = HashMap::new();
/// data.insert("avatar_cache_key".to_string(), token);
/// let second = widget.extract(&data, &HashMap::new(), "avatar").unwrap();
/// assert!(matches!(second.value, FileValue::Upload(u) if u.content() == &[0x89, 0x50]));
/// ```
pub struct ResubmitWidget {
	cache: FileCache,
	kind: FieldKind,
	base: Box<dyn BaseRenderer>,
	attrs: HashMap<String, String>,
}

impl ResubmitWidget {
	/// Widget for a plain form file field
	pub fn file(cache: FileCache) -> Self {
		Self::with_base(cache, FieldKind::File, Box::new(FileInput::new()))
	}

	/// Widget for a plain form image field
	pub fn image(cache: FileCache) -> Self {
		Self::with_base(cache, FieldKind::Image, Box::new(FileInput::new()))
	}

	/// Widget with an explicit base markup delegate
	pub fn with_base(cache: FileCache, kind: FieldKind, base: Box<dyn BaseRenderer>) -> Self {
		Self {
			cache,
			kind,
			base,
			attrs: HashMap::new(),
		}
	}

	/// Extra HTML attributes for the base input element
	pub fn with_attrs(mut self, attrs: HashMap<String, String>) -> Self {
		self.attrs = attrs;
		self
	}

	/// Which field kind this widget was attached to
	pub fn kind(&self) -> FieldKind {
		self.kind
	}

	/// Extract this field's value from submitted data
	///
	/// Decision order: a clear/upload contradiction passes through
	/// untouched; a fresh upload is cached under a newly minted token; a
	/// submitted token alone restores the cached upload; otherwise the
	/// base extraction stands. Backend I/O failures propagate; a missing
	/// or expired cache entry silently degrades to the base value.
	pub fn extract(
		&self,
		data: &FormData,
		files: &FormFiles,
		name: &str,
	) -> Result<Extraction, CacheError> {
		let base = base_value(data, files, name);
		if matches!(base, FileValue::Contradiction) {
			return Ok(Extraction {
				value: base,
				state: WidgetState::new(name, None),
			});
		}

		if let FileValue::Upload(upload) = &base {
			// A submitted token never keys a fresh upload: minting per
			// upload keeps a crafted token from overwriting someone
			// else's cache entry.
			let token = mint_token();
			self.cache.set(&token, upload)?;
			return Ok(Extraction {
				state: WidgetState::new(name, Some(token)),
				value: base,
			});
		}

		let submitted_key = data
			.get(&cache_key_input_name(name))
			.filter(|key| !key.is_empty());
		if let Some(key) = submitted_key {
			let state = WidgetState::new(name, Some(key.clone()));
			let value = match self.cache.get(key, name)? {
				Some(restored) => FileValue::Upload(restored),
				// expired or evicted entry: fall back to the base result
				None => base,
			};
			return Ok(Extraction { value, state });
		}

		Ok(Extraction {
			value: base,
			state: WidgetState::new(name, None),
		})
	}

	/// Render the widget: base markup plus the resubmission extras
	pub fn render(&self, name: &str, value: Option<&UploadedFile>, state: &WidgetState) -> String {
		let mut html = self.base.render(name, value, &self.attrs);
		html.push_str(&self.render_extra(value, state));
		html
	}

	/// Filename display and hidden token field appended after the base markup
	pub fn render_extra(&self, value: Option<&UploadedFile>, state: &WidgetState) -> String {
		let mut html = String::new();
		if let (Some(upload), Some(_)) = (value, state.cache_key()) {
			html.push(' ');
			html.push_str(&html_escape(upload.base_name()));
		}
		if let Some(key) = state.cache_key() {
			html.push_str(&HiddenInput.render(state.input_name(), Some(key), &HashMap::new()));
		}
		html
	}
}

/// Base extraction shared with the host's clearable file input: resolves
/// the fresh upload and the clear checkbox into a single [`FileValue`].
fn base_value(data: &FormData, files: &FormFiles, name: &str) -> FileValue {
	let clear = data
		.get(&clear_checkbox_name(name))
		.is_some_and(|v| checkbox_checked(v));
	match (files.get(name), clear) {
		(Some(_), true) => FileValue::Contradiction,
		(Some(upload), false) => FileValue::Upload(upload.clone()),
		(None, true) => FileValue::Clear,
		(None, false) => FileValue::Missing,
	}
}

/// Hidden input name carrying the resubmission token for `name`
///
/// Wire contract: existing forms submit the token as `<field>_cache_key`,
/// so this naming must not change.
pub fn cache_key_input_name(name: &str) -> String {
	format!("{name}_cache_key")
}

/// Checkbox input name used to request clearing `name`
pub fn clear_checkbox_name(name: &str) -> String {
	format!("{name}-clear")
}

fn checkbox_checked(value: &str) -> bool {
	matches!(value, "on" | "true" | "1")
}

/// Mint a fresh resubmission token: 128 bits of randomness as hex,
/// truncated. Collisions within a cache TTL window are vanishingly
/// unlikely at this length.
fn mint_token() -> String {
	let mut token = uuid::Uuid::new_v4().simple().to_string();
	token.truncate(TOKEN_LENGTH);
	token
}

/// Plain form file input with clear checkbox and current-filename display
#[derive(Debug, Clone, Default)]
pub struct FileInput;

impl FileInput {
	pub fn new() -> Self {
		Self
	}
}

impl BaseRenderer for FileInput {
	fn render(
		&self,
		name: &str,
		value: Option<&UploadedFile>,
		attrs: &HashMap<String, String>,
	) -> String {
		let mut html = String::new();
		if let Some(upload) = value {
			html.push_str(&format!("Currently: {} ", html_escape(upload.base_name())));
			html.push_str(&format!(
				r#"<input type="checkbox" name="{}" /> Change: "#,
				html_escape(&clear_checkbox_name(name))
			));
		}
		html.push_str(&format!(r#"<input type="file" name="{}""#, html_escape(name)));
		for (key, val) in attrs {
			html.push_str(&format!(r#" {}="{}""#, key, html_escape(val)));
		}
		html.push_str(" />");
		html
	}
}

/// Hidden input widget
#[derive(Debug, Clone, Default)]
pub struct HiddenInput;

impl HiddenInput {
	/// Render a hidden input element
	pub fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
		let mut html = format!(r#"<input type="hidden" name="{}""#, html_escape(name));
		if let Some(v) = value {
			html.push_str(&format!(r#" value="{}""#, html_escape(v)));
		}
		for (key, val) in attrs {
			html.push_str(&format!(r#" {}="{}""#, key, html_escape(val)));
		}
		html.push_str(" />");
		html
	}
}

/// Escape a string for use in HTML attribute values and text
pub fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}
