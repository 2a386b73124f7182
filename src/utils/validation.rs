//! Centralized validation and helper functions.

use std::path::Path;

use crate::core::manifest::ManifestError;

/// Maximum length of a derived identifier
pub const MAX_IDENT_LENGTH: usize = 255;

/// Validate that a string is a valid MD5 checksum (32 hex characters).
///
/// # Examples
///
/// ```
/// use kiln::utils::validation::is_valid_md5;
///
/// assert!(is_valid_md5("6aef897c3d6ff0c78aff06ac189178dd"));
/// assert!(!is_valid_md5("not-an-md5"));
/// assert!(!is_valid_md5("6aef897c3d6ff0c78aff06ac189178d")); // 31 chars
/// ```
#[must_use]
pub fn is_valid_md5(s: &str) -> bool {
    s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize an MD5 string to lowercase.
/// Returns None if the input is not a valid MD5.
#[must_use]
pub fn normalize_md5(s: &str) -> Option<String> {
    if is_valid_md5(s) {
        Some(s.to_lowercase())
    } else {
        None
    }
}

/// Check that a derived identifier can be written to a manifest and used in
/// a file name.
///
/// Returns a reason when the identifier is rejected.
#[must_use]
pub fn check_identifier(ident: &str) -> Option<String> {
    if ident.is_empty() {
        return Some("derived identifier is empty".to_string());
    }
    if ident.len() > MAX_IDENT_LENGTH {
        return Some(format!(
            "derived identifier exceeds {MAX_IDENT_LENGTH} characters"
        ));
    }
    if ident.trim() != ident {
        return Some(format!(
            "derived identifier '{ident}' has leading or trailing whitespace"
        ));
    }
    if ident.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return Some(format!(
            "derived identifier '{ident}' contains a path separator or control character"
        ));
    }
    None
}

/// Refuse to clobber an existing output unless forced.
///
/// # Errors
///
/// Returns `ManifestError::OutputExists` if `path` exists and `force` is false,
/// or `ManifestError::InvalidInput` if `path` is a directory.
pub fn check_output_path(path: &Path, force: bool) -> Result<(), ManifestError> {
    if path.is_dir() {
        return Err(ManifestError::invalid_input(
            path,
            "output path is a directory",
        ));
    }
    if path.exists() && !force {
        return Err(ManifestError::OutputExists(path.display().to_string()));
    }
    Ok(())
}
