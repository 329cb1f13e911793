//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.
//!
//! Project and record IDs are opaque to the client, so only what cannot
//! form a usable path segment is rejected. Titles and descriptions are not
//! checked here; the backend decides what it accepts.

/// Validate a project ID.
///
/// # Errors
///
/// Returns a message when the ID is empty or contains whitespace or
/// control characters.
pub fn validate_project_id(s: &str) -> Result<String, String> {
    validate_identifier(s, "Project ID")
}

/// Validate a record ID.
///
/// # Errors
///
/// Same rules as [`validate_project_id`].
pub fn validate_record_id(s: &str) -> Result<String, String> {
    validate_identifier(s, "Record ID")
}

fn validate_identifier(s: &str, what: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err(format!("{what} cannot be empty"));
    }

    if let Some(pos) = s.chars().position(char::is_whitespace) {
        return Err(format!("{what} contains whitespace at position {pos}"));
    }

    if let Some(pos) = s.chars().position(char::is_control) {
        return Err(format!(
            "{what} contains invalid control character at position {pos}"
        ));
    }

    Ok(s.to_string())
}
