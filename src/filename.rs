/// Remove every character that is not alphanumeric, a space, a period, an
/// underscore or a hyphen. Unicode letters and digits are kept.
pub fn strip_unsafe_chars(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .collect()
}

/// Turn a section name into something usable as a file stem.
pub fn safe_filename(name: &str) -> String {
    let mut stem = strip_unsafe_chars(name);
    stem.truncate(stem.trim_end().len());
    stem
}
