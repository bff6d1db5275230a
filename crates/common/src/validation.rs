//! Validation utilities for upload input.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest accepted submission name, in characters.
pub const MAX_SUBMISSION_NAME_CHARS: usize = 30;

static EXTENSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{1,16}$").expect("valid extension regex"));

/// Validate and normalize an optional submission name.
///
/// Surrounding whitespace is trimmed; a blank name is treated as absent.
///
/// # Examples
///
/// ```
/// use leaderboard_common::validation::validate_submission_name;
///
/// assert_eq!(validate_submission_name(Some("  v2 ")).unwrap(), Some("v2".to_string()));
/// assert_eq!(validate_submission_name(Some("   ")).unwrap(), None);
/// assert!(validate_submission_name(Some(&"x".repeat(31))).is_err());
/// ```
pub fn validate_submission_name(name: Option<&str>) -> Result<Option<String>, String> {
    let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
        return Ok(None);
    };

    if name.chars().count() > MAX_SUBMISSION_NAME_CHARS {
        return Err(format!(
            "Submission name cannot be longer than {} characters",
            MAX_SUBMISSION_NAME_CHARS
        ));
    }

    if name.chars().any(char::is_control) {
        return Err("Submission name cannot contain control characters".to_string());
    }

    Ok(Some(name.to_string()))
}

/// Normalize a file extension: strip a leading dot and lowercase it.
///
/// # Examples
///
/// ```
/// use leaderboard_common::validation::normalize_extension;
///
/// assert_eq!(normalize_extension(".CSV").unwrap(), "csv");
/// assert!(normalize_extension("tar/gz").is_err());
/// ```
pub fn normalize_extension(ext: &str) -> Result<String, String> {
    let ext = ext.trim().trim_start_matches('.');
    if !EXTENSION_REGEX.is_match(ext) {
        return Err(format!("Invalid file extension: {:?}", ext));
    }
    Ok(ext.to_ascii_lowercase())
}
