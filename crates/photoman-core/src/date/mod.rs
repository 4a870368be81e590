pub mod exif;
pub mod fs;

use std::path::Path;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::SortError;

/// Where a resolved timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// Exif DateTimeOriginal, pinned to the configured zone.
    Metadata,
    /// Filesystem creation time of the source file.
    CreationTime,
}

/// The single instant a file is filed under and stamped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimestamp {
    pub instant: DateTime<Utc>,
    pub source: TimestampSource,
}

impl ResolvedTimestamp {
    /// Wall-clock view of the instant in `zone`.
    pub fn in_zone(&self, zone: Tz) -> DateTime<Tz> {
        self.instant.with_timezone(&zone)
    }
}

/// Resolve a file's timestamp: Exif capture date first, creation time otherwise.
pub fn resolve_timestamp(path: &Path, zone: Tz) -> Result<ResolvedTimestamp, SortError> {
    if let Some(instant) = exif::read_capture_date(path, zone)? {
        log::debug!("{}: capture date {}", path.display(), instant);
        return Ok(ResolvedTimestamp {
            instant,
            source: TimestampSource::Metadata,
        });
    }

    let instant = fs::read_creation_time(path)?;
    log::debug!("{}: no capture date, using creation time {}", path.display(), instant);
    Ok(ResolvedTimestamp {
        instant,
        source: TimestampSource::CreationTime,
    })
}
