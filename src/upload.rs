//! In-memory uploaded file representation
//!
//! An [`UploadedFile`] carries everything downstream form validators need
//! from a multipart upload: original filename, size, MIME type, optional
//! text charset and the raw body. A file restored from the resubmission
//! cache uses the same type, so the rest of the form pipeline cannot tell
//! a resubmitted file from a first-time one.

use std::io::Cursor;

/// An uploaded file held entirely in memory
///
/// `size` always equals `content.len()`; the constructor derives it so the
/// two cannot drift apart.
///
/// # Examples
///
/// ```
/// use reinhardt_file_resubmit::UploadedFile;
///
/// let upload = UploadedFile::new("avatar", "photo.jpg", b"jpeg data".to_vec(), "image/jpeg");
/// assert_eq!(upload.size(), 9);
/// assert_eq!(upload.base_name(), "photo.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
	field_name: String,
	name: String,
	content_type: String,
	charset: Option<String>,
	content: Vec<u8>,
}

impl UploadedFile {
	/// Create a new in-memory upload for a form field
	pub fn new(
		field_name: impl Into<String>,
		name: impl Into<String>,
		content: Vec<u8>,
		content_type: impl Into<String>,
	) -> Self {
		Self {
			field_name: field_name.into(),
			name: name.into(),
			content_type: content_type.into(),
			charset: None,
			content,
		}
	}

	/// Set the text charset reported by the client
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_file_resubmit::UploadedFile;
	///
	/// let upload = UploadedFile::new("notes", "notes.txt", b"hello".to_vec(), "text/plain")
	///     .with_charset("utf-8");
	/// assert_eq!(upload.charset(), Some("utf-8"));
	/// ```
	pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
		self.charset = Some(charset.into());
		self
	}

	/// Name of the form field this upload was submitted under
	pub fn field_name(&self) -> &str {
		&self.field_name
	}

	/// Original filename as sent by the client
	pub fn name(&self) -> &str {
		&self.name
	}

	/// MIME type reported by the client
	pub fn content_type(&self) -> &str {
		&self.content_type
	}

	/// Text charset, if the client reported one
	pub fn charset(&self) -> Option<&str> {
		self.charset.as_deref()
	}

	/// Raw file body
	pub fn content(&self) -> &[u8] {
		&self.content
	}

	/// File size in bytes
	pub fn size(&self) -> usize {
		self.content.len()
	}

	/// Whether the file body is empty
	pub fn is_empty(&self) -> bool {
		self.content.is_empty()
	}

	/// Filename with any directory components stripped
	///
	/// Some browsers (historically IE) submit a full client-side path;
	/// only the final component is meaningful for display.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_file_resubmit::UploadedFile;
	///
	/// let upload = UploadedFile::new("doc", r"C:\fakepath\report.pdf", vec![], "application/pdf");
	/// assert_eq!(upload.base_name(), "report.pdf");
	/// ```
	pub fn base_name(&self) -> &str {
		self.name
			.rsplit(['/', '\\'])
			.next()
			.unwrap_or(&self.name)
	}

	/// Open a reader over the file body, positioned at offset 0
	///
	/// # Examples
	///
	/// ```
	/// use std::io::Read;
	/// use reinhardt_file_resubmit::UploadedFile;
	///
	/// let upload = UploadedFile::new("doc", "a.bin", vec![1, 2, 3], "application/octet-stream");
	/// let mut buf = Vec::new();
	/// upload.open().read_to_end(&mut buf).unwrap();
	/// assert_eq!(buf, vec![1, 2, 3]);
	/// ```
	pub fn open(&self) -> Cursor<&[u8]> {
		Cursor::new(&self.content)
	}
}
