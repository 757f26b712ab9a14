//! Storage key and public URL derivation.
//!
//! Keys are `{upload_dir}/{filename}` with spaces in the filename replaced by
//! underscores and every backslash turned into a forward slash. Leading and
//! trailing separators are trimmed from the upload directory so keys never
//! start with `/`. Nothing else is sanitized: `..` segments and arbitrary
//! characters pass through.

/// Build the object key for an uploaded file.
#[must_use]
pub fn storage_key(upload_dir: &str, filename: &str) -> String {
    let sanitized = filename.replace(' ', "_");
    let prefix = upload_dir.trim_matches(['/', '\\']);

    let joined = if prefix.is_empty() {
        sanitized
    } else {
        format!("{prefix}/{sanitized}")
    };

    joined.replace('\\', "/")
}

/// Build the public URL for a stored key.
#[must_use]
pub fn public_url(base: &str, key: &str) -> String {
    format!("{base}/{}", key.replace('\\', "/"))
}

/// Listing prefix for the upload directory, matching keys from [`storage_key`].
///
/// Empty when objects live at the bucket root, otherwise ends with `/`.
#[must_use]
pub fn list_prefix(upload_dir: &str) -> String {
    let normalized = upload_dir.replace('\\', "/");
    let trimmed = normalized.trim_matches('/');

    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}
