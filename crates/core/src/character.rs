//! Field rules for character create/update requests.
//!
//! Form fields arrive as optional strings. An empty string counts as "not
//! supplied", so the update path can never blank out a stored value by
//! accident.

use crate::error::CoreError;

/// Multipart field carrying the character name.
pub const FIELD_NAME: &str = "nome";

/// Multipart field carrying the character description.
pub const FIELD_DESCRIPTION: &str = "descricao";

/// Multipart file field carrying the character photo.
pub const FIELD_PHOTO: &str = "foto";

/// Collapse an empty string into `None`.
pub fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Check the fields of a create request.
///
/// The name is the only text field the row cannot live without.
pub fn validate_create(name: Option<&str>) -> Result<(), CoreError> {
    match name {
        Some(n) if !n.is_empty() => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Missing required '{FIELD_NAME}' field"
        ))),
    }
}

/// Check that an update request changes at least one field.
pub fn validate_update(
    name: Option<&str>,
    description: Option<&str>,
    has_photo: bool,
) -> Result<(), CoreError> {
    if name.is_none() && description.is_none() && !has_photo {
        return Err(CoreError::Validation("No fields to update".into()));
    }
    Ok(())
}
