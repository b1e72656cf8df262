//! Admin integration
//!
//! The admin renders file inputs with its own chrome, but the resubmission
//! logic is identical to plain forms: only the [`BaseRenderer`] delegate
//! changes. Field-type detection stays with the host — an injected
//! [`FieldClassifier`] decides which fields get a resubmission widget and
//! of which kind.

use crate::cache::FileCache;
use crate::upload::UploadedFile;
use crate::widgets::{BaseRenderer, FieldKind, FileInput, ResubmitWidget, clear_checkbox_name, html_escape};
use std::collections::HashMap;

/// Decides whether a form-field descriptor is a file or image field
///
/// Generic over the host's field descriptor type; this crate never
/// inspects descriptors itself.
pub trait FieldClassifier<F>: Send + Sync {
	/// `Some(kind)` if the field should carry a resubmission widget
	fn classify(&self, field: &F) -> Option<FieldKind>;
}

/// Admin-styled file input
///
/// Wraps the current-file display and the input in the admin's
/// `file-upload` paragraph markup.
#[derive(Debug, Clone, Default)]
pub struct AdminFileInput;

impl AdminFileInput {
	pub fn new() -> Self {
		Self
	}
}

impl BaseRenderer for AdminFileInput {
	fn render(
		&self,
		name: &str,
		value: Option<&UploadedFile>,
		attrs: &HashMap<String, String>,
	) -> String {
		let mut html = String::from(r#"<p class="file-upload">"#);
		if let Some(upload) = value {
			html.push_str(&format!(
				"Currently: <strong>{}</strong> ",
				html_escape(upload.base_name())
			));
			html.push_str(&format!(
				r#"<span class="clearable-file-input"><input type="checkbox" name="{}" /> Clear</span> Change: "#,
				html_escape(&clear_checkbox_name(name))
			));
		}
		html.push_str(&format!(r#"<input type="file" name="{}""#, html_escape(name)));
		for (key, val) in attrs {
			html.push_str(&format!(r#" {}="{}""#, key, html_escape(val)));
		}
		html.push_str(" /></p>");
		html
	}
}

/// Build the resubmission widget for an admin field, if it is one the
/// classifier recognizes
///
/// Image fields get the admin-styled base markup; plain file fields keep
/// the standard form rendering. Both share the same decision logic.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_file_resubmit::admin::{FieldClassifier, resubmit_widget_for};
/// use reinhardt_file_resubmit::{FieldKind, FileCache, InMemoryBackend};
///
/// struct DbField {
///     data_type: &'static str,
/// }
///
/// struct ByDataType;
///
/// impl FieldClassifier<DbField> for ByDataType {
///     fn classify(&self, field: &DbField) -> Option<FieldKind> {
///         match field.data_type {
///             "image" => Some(FieldKind::Image),
///             "file" => Some(FieldKind::File),
///             _ => None,
///         }
///     }
/// }
///
/// let cache = FileCache::new(Arc::new(InMemoryBackend::new()));
/// let field = DbField { data_type: "image" };
/// let widget = resubmit_widget_for(&field, &ByDataType, cache).unwrap();
/// assert_eq!(widget.kind(), FieldKind::Image);
/// ```
pub fn resubmit_widget_for<F>(
	field: &F,
	classifier: &dyn FieldClassifier<F>,
	cache: FileCache,
) -> Option<ResubmitWidget> {
	match classifier.classify(field)? {
		FieldKind::Image => Some(ResubmitWidget::with_base(
			cache,
			FieldKind::Image,
			Box::new(AdminFileInput::new()),
		)),
		FieldKind::File => Some(ResubmitWidget::with_base(
			cache,
			FieldKind::File,
			Box::new(FileInput::new()),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::backend::InMemoryBackend;
	use crate::widgets::{FileValue, FormData, FormFiles};
	use std::sync::Arc;

	struct StubField {
		kind: Option<FieldKind>,
	}

	struct StubClassifier;

	impl FieldClassifier<StubField> for StubClassifier {
		fn classify(&self, field: &StubField) -> Option<FieldKind> {
			field.kind
		}
	}

	fn cache() -> FileCache {
		FileCache::new(Arc::new(InMemoryBackend::new()))
	}

	#[test]
	fn test_unclassified_field_gets_no_widget() {
		let field = StubField { kind: None };
		assert!(resubmit_widget_for(&field, &StubClassifier, cache()).is_none());
	}

	#[test]
	fn test_image_field_gets_admin_widget() {
		let field = StubField {
			kind: Some(FieldKind::Image),
		};

		let widget = resubmit_widget_for(&field, &StubClassifier, cache()).unwrap();

		assert_eq!(widget.kind(), FieldKind::Image);
	}

	#[test]
	fn test_admin_widget_decision_logic_matches_plain_widget() {
		// Arrange
		let field = StubField {
			kind: Some(FieldKind::Image),
		};
		let widget = resubmit_widget_for(&field, &StubClassifier, cache()).unwrap();
		let mut files = FormFiles::new();
		files.insert(
			"photo".to_string(),
			UploadedFile::new("photo", "me.png", b"\x89PNG".to_vec(), "image/png"),
		);

		// Act: the same extract/restore cycle as a plain form widget
		let first = widget.extract(&FormData::new(), &files, "photo").unwrap();
		let token = first.state.cache_key().unwrap().to_string();
		let mut data = FormData::new();
		data.insert("photo_cache_key".to_string(), token);
		let second = widget.extract(&data, &FormFiles::new(), "photo").unwrap();

		// Assert
		assert!(matches!(second.value, FileValue::Upload(u) if u.content() == b"\x89PNG"));
	}

	#[test]
	fn test_admin_base_markup_wraps_input_in_file_upload_paragraph() {
		// Arrange
		let base = AdminFileInput::new();
		let upload = UploadedFile::new("photo", "me.png", b"\x89PNG".to_vec(), "image/png");

		// Act
		let html = base.render("photo", Some(&upload), &HashMap::new());

		// Assert
		assert!(html.starts_with(r#"<p class="file-upload">"#));
		assert!(html.contains("Currently: <strong>me.png</strong>"));
		assert!(html.contains(r#"<input type="checkbox" name="photo-clear""#));
		assert!(html.contains(r#"<input type="file" name="photo""#));
		assert!(html.ends_with("</p>"));
	}
}
