use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while sorting photos.
#[derive(Debug, Error)]
pub enum SortError {
    /// Source directory does not exist.
    #[error("invalid source path: {}", path.display())]
    InvalidSource { path: PathBuf },

    /// The metadata decoder could not parse the file at all.
    #[error("cannot read image metadata of {}: {source}", path.display())]
    MetadataUnreadable {
        path: PathBuf,
        #[source]
        source: exif::Error,
    },

    /// DateTimeOriginal is present but not in `YYYY:MM:DD HH:MM:SS` form.
    #[error("malformed capture date {value:?} in {}", path.display())]
    MalformedCaptureDate { path: PathBuf, value: String },

    /// Filesystem failure.
    #[error("{operation} failed for {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Extension filter item that cannot name a file suffix.
    #[error("invalid extension filter item {value:?}")]
    InvalidExtension { value: String },
}

impl SortError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SortError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
