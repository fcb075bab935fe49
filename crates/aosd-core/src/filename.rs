//! Local file names for downloaded listing rows.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Turns a listing link into a file name that stays inside the output directory.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Trims surrounding whitespace and rejects `.` and `..`
/// - Limits length to 255 bytes
///
/// Returns `None` when nothing usable is left.
pub fn local_file_name(link: &str) -> Option<String> {
    let replaced: String = link
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." || trimmed.chars().all(|c| c == '_') {
        return None;
    }

    let mut take = trimmed.len().min(NAME_MAX);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    Some(trimmed[..take].to_string())
}
