use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use exif::{Exif, In, Reader, Tag, Value};

use crate::error::SortError;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Read DateTimeOriginal from the file's Exif block and pin it to `zone`.
///
/// Exif datetimes carry no offset; the camera's zone is unknown, so the
/// caller-supplied zone is assumed for every file. Returns `Ok(None)` when
/// the container holds no Exif block or the tag is absent.
pub fn read_capture_date(path: &Path, zone: Tz) -> Result<Option<DateTime<Utc>>, SortError> {
    let mut file = File::open(path).map_err(|e| SortError::io("open", path, e))?;
    let mut head = Vec::with_capacity(HEAD_LEN);
    (&mut file)
        .take(HEAD_LEN as u64)
        .read_to_end(&mut head)
        .map_err(|e| SortError::io("read metadata", path, e))?;
    file.rewind().map_err(|e| SortError::io("read metadata", path, e))?;

    let exif = match Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(None),
        Err(exif::Error::InvalidFormat(_)) if is_exifless_container(&head) => {
            log::debug!("{}: container carries no Exif block", path.display());
            return Ok(None);
        }
        Err(exif::Error::Io(e)) => return Err(SortError::io("read metadata", path, e)),
        Err(source) => {
            return Err(SortError::MetadataUnreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let Some(raw) = original_capture_value(&exif) else {
        return Ok(None);
    };

    let naive = parse_exif_datetime(&raw).ok_or_else(|| SortError::MalformedCaptureDate {
        path: path.to_path_buf(),
        value: raw.clone(),
    })?;

    let local = localize(naive, zone).ok_or_else(|| SortError::MalformedCaptureDate {
        path: path.to_path_buf(),
        value: raw,
    })?;

    Ok(Some(local.with_timezone(&Utc)))
}

/// Bytes needed to recognise the containers below.
const HEAD_LEN: usize = 12;

const QUICKTIME_ATOMS: [&[u8; 4]; 6] = [b"moov", b"mdat", b"wide", b"free", b"skip", b"pnot"];

/// Media formats the Exif reader does not open but that are still photos or
/// clips worth filing: GIF, BMP, AVI and ISO-BMFF/QuickTime movies.
fn is_exifless_container(head: &[u8]) -> bool {
    let gif = head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a");
    let bmp = head.starts_with(b"BM");
    let avi = head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"AVI ";
    let bmff = head.len() >= 8 && (&head[4..8] == b"ftyp" || QUICKTIME_ATOMS.iter().any(|a| &head[4..8] == *a));
    gif || bmp || avi || bmff
}

fn original_capture_value(exif: &Exif) -> Option<String> {
    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref parts) => parts.first().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
                .to_string()
        }),
        _ => None,
    }
}

fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, EXIF_DATETIME_FORMAT).ok()
}

/// Attach `zone` to a wall-clock time.
///
/// Times skipped by a DST jump move forward by an hour; repeated times take
/// the earlier offset.
fn localize(naive: NaiveDateTime, zone: Tz) -> Option<DateTime<Tz>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
}
