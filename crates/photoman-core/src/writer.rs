use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::fs::utc_to_filetime;
use crate::date::ResolvedTimestamp;
use crate::error::SortError;

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyOutcome {
    Copied,
    /// A file with the same name already sat in the day folder.
    SkippedExisting,
}

/// Copy `source` into `dest_dir` under its own name and stamp it with `timestamp`.
///
/// An existing file of the same name is left alone, whatever its content.
pub fn copy_into(
    source: &Path,
    timestamp: &ResolvedTimestamp,
    dest_dir: &Path,
) -> Result<(PathBuf, CopyOutcome), SortError> {
    let file_name = source.file_name().ok_or_else(|| {
        SortError::io(
            "copy",
            source,
            io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
        )
    })?;
    let dest = dest_dir.join(file_name);

    let exists = dest
        .try_exists()
        .map_err(|e| SortError::io("check destination", &dest, e))?;
    if exists {
        log::info!("{} already exists.", file_name.to_string_lossy());
        return Ok((dest, CopyOutcome::SkippedExisting));
    }

    log::info!("Copying file: {}", file_name.to_string_lossy());
    copy_and_stamp(source, &dest, |path| apply_timestamp(path, timestamp.instant))?;

    Ok((dest, CopyOutcome::Copied))
}

/// Copy `source` to `dest`, then run `stamp` on the copy.
///
/// A failure in either step removes whatever landed at `dest`, so a later
/// run does not mistake a partial copy for an existing file.
fn copy_and_stamp<F>(source: &Path, dest: &Path, stamp: F) -> Result<(), SortError>
where
    F: FnOnce(&Path) -> Result<(), SortError>,
{
    let result = fs::copy(source, dest)
        .map_err(|e| SortError::io("copy", source, e))
        .and_then(|_| stamp(dest));

    if result.is_err() {
        match fs::remove_file(dest) {
            Ok(()) => log::debug!("Removed incomplete copy {}", dest.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not remove incomplete copy {}: {}", dest.display(), e),
        }
    }
    result
}

/// Set creation (where supported), access and modification times of `path` to `at`.
pub fn apply_timestamp(path: &Path, at: DateTime<Utc>) -> Result<(), SortError> {
    set_created(path, SystemTime::from(at)).map_err(|e| SortError::io("set creation time", path, e))?;

    let ft = utc_to_filetime(at);
    filetime::set_file_times(path, ft, ft).map_err(|e| SortError::io("set file times", path, e))
}

#[cfg(any(windows, target_os = "macos"))]
fn set_created(path: &Path, at: SystemTime) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    use std::os::macos::fs::FileTimesExt;
    #[cfg(windows)]
    use std::os::windows::fs::FileTimesExt;

    let file = fs::OpenOptions::new().write(true).open(path)?;
    file.set_times(fs::FileTimes::new().set_created(at))
}

// Birth time is not settable here; the copy keeps the time it was created.
#[cfg(not(any(windows, target_os = "macos")))]
fn set_created(_path: &Path, _at: SystemTime) -> io::Result<()> {
    Ok(())
}
