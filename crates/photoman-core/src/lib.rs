pub mod date;
pub mod error;
pub mod folder;
pub mod scan;
pub mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub use date::{ResolvedTimestamp, TimestampSource};
pub use error::SortError;
pub use folder::FolderBuilder;
pub use scan::ExtensionFilter;
pub use writer::CopyOutcome;

/// Zone that Exif capture times are assumed to be recorded in.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

fn default_timezone() -> Tz {
    DEFAULT_TIMEZONE
}

/// What to do when a single file cannot be sorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the failure, record it and carry on with the next file.
    #[default]
    Skip,
    /// Stop the whole run at the first failure.
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Extension allow-list; empty copies every file
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

impl SortOptions {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            extensions: Vec::new(),
            timezone: DEFAULT_TIMEZONE,
            on_error: ErrorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Copied,
    SkippedExisting,
    Failed { reason: String },
}

impl From<CopyOutcome> for FileStatus {
    fn from(outcome: CopyOutcome) -> Self {
        match outcome {
            CopyOutcome::Copied => FileStatus::Copied,
            CopyOutcome::SkippedExisting => FileStatus::SkippedExisting,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub timestamp: Option<DateTime<Utc>>,
    pub timestamp_source: Option<TimestampSource>,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortResult {
    pub files_seen: u64,
    pub files_copied: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub entries: Vec<FileEntry>,
}

impl SortResult {
    fn record(&mut self, entry: FileEntry) {
        match entry.status {
            FileStatus::Copied => self.files_copied += 1,
            FileStatus::SkippedExisting => self.files_skipped += 1,
            FileStatus::Failed { .. } => self.files_failed += 1,
        }
        self.entries.push(entry);
    }
}

/// Type alias for progress callback: (stage, current, total, message)
pub type ProgressCallback<'a> = dyn Fn(&str, u64, u64, &str) + Send + Sync + 'a;

struct Placement {
    timestamp: ResolvedTimestamp,
    destination: PathBuf,
    outcome: CopyOutcome,
}

/// Resolve, place and copy one file.
fn place_file(path: &Path, zone: Tz, folders: &mut FolderBuilder) -> Result<Placement, SortError> {
    let timestamp = date::resolve_timestamp(path, zone)?;
    let day_dir = folders.ensure_day_folder(&timestamp)?;
    let (destination, outcome) = writer::copy_into(path, &timestamp, &day_dir)?;
    Ok(Placement {
        timestamp,
        destination,
        outcome,
    })
}

/// Sort every matching file directly inside `options.source` into the
/// dated tree under `options.destination`.
///
/// Files are handled one at a time in directory listing order. A missing
/// source aborts before anything is copied; a missing destination is
/// created first.
pub fn organize(options: &SortOptions, progress: &ProgressCallback<'_>) -> Result<SortResult, SortError> {
    let filter = ExtensionFilter::new(&options.extensions)?;

    if !options.source.exists() {
        return Err(SortError::InvalidSource {
            path: options.source.clone(),
        });
    }

    log::info!("Source Path: {}", options.source.display());
    log::info!("Destination Path: {}", options.destination.display());

    if !options.destination.exists() {
        fs::create_dir_all(&options.destination)
            .map_err(|e| SortError::io("create directory", &options.destination, e))?;
        log::info!("Creating destination folder: {}", options.destination.display());
    }

    let files = scan::list_source_files(&options.source, &filter)?;
    let total = files.len() as u64;
    let mut folders = FolderBuilder::new(&options.destination, options.timezone);
    let mut result = SortResult {
        files_seen: total,
        ..SortResult::default()
    };

    for (i, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress("copy", i as u64, total, &name);

        let entry = match place_file(path, options.timezone, &mut folders) {
            Ok(placed) => FileEntry {
                source: path.clone(),
                destination: Some(placed.destination),
                timestamp: Some(placed.timestamp.instant),
                timestamp_source: Some(placed.timestamp.source),
                status: placed.outcome.into(),
            },
            Err(err) if options.on_error == ErrorPolicy::Skip => {
                log::warn!("Skipping {}: {}", name, err);
                FileEntry {
                    source: path.clone(),
                    destination: None,
                    timestamp: None,
                    timestamp_source: None,
                    status: FileStatus::Failed {
                        reason: err.to_string(),
                    },
                }
            }
            Err(err) => return Err(err),
        };
        result.record(entry);
    }

    log::info!("Files copy completed.");
    Ok(result)
}
