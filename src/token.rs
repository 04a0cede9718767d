//! Normalization of configuration tokens shared by workflow and task decoding.

/// Folds a configuration token to a comparison form: ASCII upper case with
/// separators removed, so `dueDate`, `due_date`, and `DUE-DATE` coincide.
pub(crate) fn fold(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}
