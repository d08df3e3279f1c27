//! Slash-delimited object key helpers.
//!
//! Object stores have a flat namespace; these functions are the only place
//! where keys are split into parent/child relationships. A prefix is either
//! empty (the container root) or ends with `/`.

/// Key delimiter used to simulate directories.
pub const DELIMITER: char = '/';

/// Ensure a non-empty prefix ends with the delimiter.
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with(DELIMITER) {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, DELIMITER)
    }
}

/// Parent prefix of `prefix`, or the empty string at the top level.
///
/// Idempotent at the root.
pub fn parent_of(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches(DELIMITER);
    match trimmed.rfind(DELIMITER) {
        Some(idx) => format!("{}{}", &trimmed[..idx], DELIMITER),
        None => String::new(),
    }
}

/// Key for a file named `file_name` placed under `prefix`.
pub fn join_key(prefix: &str, file_name: &str) -> String {
    let joined = if prefix.is_empty() || prefix.ends_with(DELIMITER) {
        format!("{}{}", prefix, file_name)
    } else {
        format!("{}{}{}", prefix, DELIMITER, file_name)
    };
    joined.trim_start_matches(DELIMITER).to_string()
}

/// Last segment of a key, without a trailing delimiter.
pub fn display_name(key: &str) -> &str {
    let trimmed = key.trim_end_matches(DELIMITER);
    match trimmed.rfind(DELIMITER) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Location shown to users: `/` at the root, `/dir/sub/` below it.
pub fn display_path(prefix: &str) -> String {
    format!("{}{}", DELIMITER, prefix)
}

/// Number of non-empty segments in a key.
pub fn segments(key: &str) -> usize {
    key.split(DELIMITER).filter(|s| !s.is_empty()).count()
}
