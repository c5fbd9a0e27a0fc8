//! Content type guessing from file names.

use std::path::Path;

use crate::content_type::ContentType;

/// Suffixes that denote a content *encoding* (compression) rather than a
/// content type. A file such as `logs.tar.gz` is sent as opaque bytes.
const ENCODING_SUFFIXES: &[&str] = &["gz", "bz2", "xz", "z", "br", "tgz", "tbz", "txz"];

/// Guesses the content type of a file from its extension.
///
/// Compressed files and unknown extensions give
/// `application/octet-stream`.
#[must_use]
pub fn guess_content_type(path: impl AsRef<Path>) -> ContentType {
    let path = path.as_ref();

    let extension = path.extension().and_then(|e| e.to_str());
    if extension.is_some_and(|ext| {
        ENCODING_SUFFIXES
            .iter()
            .any(|s| s.eq_ignore_ascii_case(ext))
    }) {
        return ContentType::octet_stream();
    }

    mime_guess::from_path(path)
        .first()
        .map_or_else(ContentType::octet_stream, |mime| {
            ContentType::new(mime.type_().as_str(), mime.subtype().as_str())
        })
}
