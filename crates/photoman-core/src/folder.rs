use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::date::ResolvedTimestamp;
use crate::error::SortError;

/// `YYYY/MM-Mon/MM-DD-YYYY`, relative to the destination root.
///
/// All three levels come from the one `date`, so the month and day names
/// always agree with the year.
pub fn day_folder_path(date: NaiveDate) -> PathBuf {
    let year = date.format("%Y").to_string();
    let month = date.format("%m-%b").to_string();
    let day = date.format("%m-%d-%Y").to_string();
    PathBuf::from(year).join(month).join(day)
}

/// Creates day folders under a destination root.
pub struct FolderBuilder {
    root: PathBuf,
    zone: Tz,
    created: HashSet<PathBuf>,
}

impl FolderBuilder {
    pub fn new(root: &Path, zone: Tz) -> Self {
        Self {
            root: root.to_path_buf(),
            zone,
            created: HashSet::new(),
        }
    }

    /// Day folder for `timestamp` as seen in the configured zone, created if absent.
    pub fn ensure_day_folder(&mut self, timestamp: &ResolvedTimestamp) -> Result<PathBuf, SortError> {
        let date = timestamp.in_zone(self.zone).date_naive();
        let dir = self.root.join(day_folder_path(date));

        // Create directory only once per unique path
        if !self.created.contains(&dir) {
            fs::create_dir_all(&dir).map_err(|e| SortError::io("create directory", &dir, e))?;
            log::debug!("Ensured folder {}", dir.display());
            self.created.insert(dir.clone());
        }

        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::TimestampSource;
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::New_York;
    use tempfile::tempdir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_folder_path() {
        assert_eq!(day_folder_path(ymd(2023, 5, 14)), Path::new("2023/05-May/05-14-2023"));
        assert_eq!(day_folder_path(ymd(1999, 12, 31)), Path::new("1999/12-Dec/12-31-1999"));
        assert_eq!(day_folder_path(ymd(2024, 2, 29)), Path::new("2024/02-Feb/02-29-2024"));
        assert_eq!(day_folder_path(ymd(2021, 9, 1)), Path::new("2021/09-Sep/09-01-2021"));
    }

    #[test]
    fn test_every_month_abbreviation() {
        let names = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
        for (i, name) in names.iter().enumerate() {
            let month = i as u32 + 1;
            let expected = format!("2020/{:02}-{}/{:02}-01-2020", month, name, month);
            assert_eq!(day_folder_path(ymd(2020, month, 1)), PathBuf::from(expected));
        }
    }

    #[test]
    fn test_ensure_day_folder_uses_zone_calendar() {
        let dir = tempdir().unwrap();
        let mut builder = FolderBuilder::new(dir.path(), New_York);

        // 03:30 UTC on the 15th is still the evening of the 14th in New York.
        let ts = ResolvedTimestamp {
            instant: Utc.with_ymd_and_hms(2023, 5, 15, 3, 30, 0).unwrap(),
            source: TimestampSource::Metadata,
        };
        let day = builder.ensure_day_folder(&ts).unwrap();

        assert_eq!(day, dir.path().join("2023/05-May/05-14-2023"));
        assert!(day.is_dir());
    }

    #[test]
    fn test_ensure_day_folder_is_idempotent() {
        let dir = tempdir().unwrap();
        let ts = ResolvedTimestamp {
            instant: Utc.with_ymd_and_hms(2022, 1, 2, 12, 0, 0).unwrap(),
            source: TimestampSource::CreationTime,
        };

        let first = FolderBuilder::new(dir.path(), New_York).ensure_day_folder(&ts).unwrap();
        // A fresh builder has no memo and hits the existing tree.
        let second = FolderBuilder::new(dir.path(), New_York).ensure_day_folder(&ts).unwrap();
        assert_eq!(first, second);
        assert!(second.is_dir());
    }

    #[test]
    fn test_ensure_day_folder_blocked_by_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("2022"), b"in the way").unwrap();
        let ts = ResolvedTimestamp {
            instant: Utc.with_ymd_and_hms(2022, 6, 1, 12, 0, 0).unwrap(),
            source: TimestampSource::Metadata,
        };

        let err = FolderBuilder::new(dir.path(), New_York).ensure_day_folder(&ts).unwrap_err();
        assert!(matches!(err, SortError::Io { operation: "create directory", .. }));
    }
}
