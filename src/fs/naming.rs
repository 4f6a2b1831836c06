//! Filename sanitization.

/// Characters that are not allowed in file or folder names.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Folder name used when a playlist title sanitizes to nothing usable.
pub const FALLBACK_PLAYLIST_FOLDER: &str = "playlist";

/// Remove characters that are invalid in filenames.
///
/// Forbidden characters and control characters are dropped rather than
/// replaced, so applying this twice gives the same result as applying it once.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .collect()
}

/// Folder name for a playlist title.
///
/// Names that would be empty or resolve to the current/parent directory fall
/// back to [`FALLBACK_PLAYLIST_FOLDER`].
pub fn playlist_folder_name(title: &str) -> String {
    let sanitized = sanitize_filename(title);
    let trimmed = sanitized.trim();

    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return FALLBACK_PLAYLIST_FOLDER.to_string();
    }

    trimmed.to_string()
}
