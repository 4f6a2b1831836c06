//! Path and directory management.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, UserDirs};

use crate::error::Result;
use crate::fs::naming::playlist_folder_name;
use crate::platforms::PlatformId;

/// Relative directory used when no home directory can be determined.
const FALLBACK_DOWNLOAD_DIR: &str = "downloads";

/// Default base directory for downloads: the user's download folder.
pub fn default_download_base() -> PathBuf {
    if let Some(dir) = UserDirs::new().and_then(|u| u.download_dir().map(Path::to_path_buf)) {
        return dir;
    }

    BaseDirs::new()
        .map(|b| b.home_dir().join("Downloads"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DOWNLOAD_DIR))
}

/// Per-platform folder under the base directory.
pub fn platform_dir(base: &Path, platform: PlatformId) -> PathBuf {
    base.join(platform.as_str())
}

/// Folder for a playlist, named after its sanitized title.
pub fn playlist_dir(base: &Path, platform: PlatformId, title: &str) -> PathBuf {
    platform_dir(base, platform).join(playlist_folder_name(title))
}

/// Engine output template rooted in `dir`.
pub fn output_template(dir: &Path, pattern: &str) -> String {
    dir.join(pattern).to_string_lossy().into_owned()
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_platform_and_playlist_dirs() {
        let base = Path::new("/downloads");
        assert_eq!(
            platform_dir(base, PlatformId::Tiktok),
            PathBuf::from("/downloads/tiktok")
        );
        assert_eq!(
            playlist_dir(base, PlatformId::Youtube, "Mix: Best/Of"),
            PathBuf::from("/downloads/youtube/Mix BestOf")
        );
        assert_eq!(
            playlist_dir(base, PlatformId::Youtube, ".."),
            PathBuf::from("/downloads/youtube/playlist")
        );
    }

    #[test]
    fn test_output_template() {
        assert_eq!(
            output_template(Path::new("/downloads/youtube"), "%(title)s.%(ext)s"),
            "/downloads/youtube/%(title)s.%(ext)s"
        );
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        ensure_dir(&dir).unwrap();
    }
}
