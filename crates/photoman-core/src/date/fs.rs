use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use filetime::FileTime;

use crate::error::SortError;

/// Filesystem creation time of `path`.
///
/// Platforms or filesystems that do not record a birth time yield the
/// modification time instead.
pub fn read_creation_time(path: &Path) -> Result<DateTime<Utc>, SortError> {
    let meta = fs::metadata(path).map_err(|e| SortError::io("stat", path, e))?;
    let ft = FileTime::from_creation_time(&meta)
        .unwrap_or_else(|| FileTime::from_last_modification_time(&meta));
    Ok(filetime_to_utc(ft))
}

pub(crate) fn filetime_to_utc(ft: FileTime) -> DateTime<Utc> {
    DateTime::from_timestamp(ft.unix_seconds(), ft.nanoseconds()).unwrap_or_default()
}

pub(crate) fn utc_to_filetime(at: DateTime<Utc>) -> FileTime {
    FileTime::from_unix_time(at.timestamp(), at.timestamp_subsec_nanos())
}
