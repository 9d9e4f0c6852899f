//! Naming rules for uploaded photo files.
//!
//! Stored names look like `1718000000123-9f2c41ab.png`: the upload time in
//! milliseconds, a short random token, and the extension of the client's
//! filename. The client's name is never used as a path component.

/// Maximum accepted extension length (without the dot).
const MAX_EXTENSION_LEN: usize = 16;

/// Extract a safe extension (including the leading dot) from a client filename.
///
/// Returns an empty string when there is no extension or when it contains
/// anything other than ASCII alphanumerics.
pub fn safe_extension(original_name: &str) -> String {
    // Strip any directory part a client may have sent.
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    match base.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{ext}")
        }
        _ => String::new(),
    }
}

/// Build the stored filename for an upload.
pub fn stored_file_name(original_name: &str, timestamp_millis: i64, token: &str) -> String {
    format!(
        "{timestamp_millis}-{token}{}",
        safe_extension(original_name)
    )
}

/// Check that a stored name can be safely joined onto the upload directory.
pub fn is_stored_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && !name.starts_with('.')
}
