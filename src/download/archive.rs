//! Download archive: the durable set of already-downloaded playlist items.
//!
//! The file is append-only, one identifier per line, in the engine's own
//! `<extractor> <id>` format so both sides read the same records.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Archive file name inside a playlist directory.
pub const ARCHIVE_FILE_NAME: &str = ".download_archive";

/// In-memory view of an archive file.
#[derive(Debug)]
pub struct DownloadArchive {
    path: PathBuf,
    entries: HashSet<String>,
}

impl DownloadArchive {
    /// Load the archive at `path`. A missing file is an empty archive.
    pub fn load(path: &Path) -> Result<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Archive stored in the given playlist directory.
    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(ARCHIVE_FILE_NAME))
    }

    /// Build the archive key for an item.
    fn entry_key(extractor: &str, id: &str) -> String {
        format!("{} {}", extractor.to_lowercase(), id)
    }

    fn contains(&self, entry: &str) -> bool {
        self.entries.contains(entry.trim())
    }

    pub fn contains_item(&self, extractor: &str, id: &str) -> bool {
        self.contains(&Self::entry_key(extractor, id))
    }

    /// Append an item. Returns `false` if it was already recorded.
    ///
    /// Production runs leave writing to the engine.
    #[cfg(test)]
    pub fn record(&mut self, extractor: &str, id: &str) -> Result<bool> {
        let key = Self::entry_key(extractor, id);
        if self.entries.contains(&key) {
            return Ok(false);
        }

        use std::io::Write;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", key)?;

        self.entries.insert(key);
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
