//! Enumerates candidate files under the source root.

use globset::GlobBuilder;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::classify::MediaKind;
use crate::exclude::to_slash_path;

use super::error::SyncError;

/// A file found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub absolute_path: PathBuf,
    /// Path relative to the source root.
    pub relative_path: PathBuf,
    /// Extension without the dot, as found on disk.
    pub extension: Option<String>,
}

impl FileEntry {
    pub fn new(absolute_path: PathBuf, relative_path: PathBuf) -> Self {
        let extension = relative_path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        Self {
            absolute_path,
            relative_path,
            extension,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match &self.extension {
            Some(ext) => MediaKind::from_extension(ext),
            None => MediaKind::Unrecognized,
        }
    }
}

/// Lists every non-directory under `source` matching `include`, sorted by
/// path.
///
/// Hidden entries (names starting with `.`) are not descended into or
/// returned. Symbolic links are followed. In `include`, `*` stays within one
/// path component and `**` spans any number of them.
pub fn collect_entries(source: &Path, include: &str) -> Result<Vec<FileEntry>, SyncError> {
    let matcher = GlobBuilder::new(include)
        .literal_separator(true)
        .build()
        .map_err(|e| SyncError::InvalidInclude {
            pattern: include.to_string(),
            reason: e.kind().to_string(),
        })?
        .compile_matcher();

    let mut entries = Vec::new();
    let walker = WalkDir::new(source)
        .follow_links(true)
        .sort_by_file_name()
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        if !matcher.is_match(to_slash_path(relative)) {
            continue;
        }

        entries.push(FileEntry::new(
            entry.path().to_path_buf(),
            relative.to_path_buf(),
        ));
    }

    Ok(entries)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}
