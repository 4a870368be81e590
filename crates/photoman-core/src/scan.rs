use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::SortError;

/// Allow-list of file suffixes. Empty means every file passes.
///
/// A suffix may span several dots (`tar.gz`); a file matches when its name
/// ends with `.` followed by one of the suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    /// Lowercase, without the leading dot
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Build from items like `jpg`, `.PNG` or ` tif `. Blank items are dropped.
    pub fn new<I, S>(items: I) -> Result<Self, SortError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extensions = Vec::new();
        for item in items {
            let ext = item.as_ref().trim();
            let ext = ext.strip_prefix('.').unwrap_or(ext);
            if ext.is_empty() {
                continue;
            }
            if ext.contains(['/', '\\', '*', '?', '[', ']', '{', '}']) {
                return Err(SortError::InvalidExtension {
                    value: item.as_ref().to_string(),
                });
            }
            let ext = ext.to_ascii_lowercase();
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        Ok(Self { extensions })
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let name = name.to_ascii_lowercase();
        self.extensions.iter().any(|ext| {
            name.strip_suffix(ext.as_str())
                .map_or(false, |stem| stem.ends_with('.'))
        })
    }
}

impl FromStr for ExtensionFilter {
    type Err = SortError;

    /// Parse a comma-separated list such as `jpg,png`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(','))
    }
}

/// Regular files directly inside `dir` that pass `filter`, in listing order.
pub fn list_source_files(dir: &Path, filter: &ExtensionFilter) -> Result<Vec<PathBuf>, SortError> {
    let entries = fs::read_dir(dir).map_err(|e| SortError::io("read directory", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SortError::io("read directory", dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            log::debug!("Ignoring {} (not a regular file)", path.display());
            continue;
        }
        if !filter.matches(&path) {
            log::debug!("Ignoring {} (extension filtered)", path.display());
            continue;
        }
        files.push(path);
    }
    Ok(files)
}
