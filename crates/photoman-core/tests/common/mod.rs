//! Synthetic JPEG fixtures with a minimal little-endian Exif block.

#![allow(dead_code)]

const TAG_ORIENTATION: u16 = 0x0112;
const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
const TAG_DATETIME_ORIGINAL: u16 = 0x9003;

const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;

fn ifd_entry(tag: u16, typ: u16, count: u32, value: u32) -> Vec<u8> {
    let mut e = Vec::with_capacity(12);
    e.extend_from_slice(&tag.to_le_bytes());
    e.extend_from_slice(&typ.to_le_bytes());
    e.extend_from_slice(&count.to_le_bytes());
    e.extend_from_slice(&value.to_le_bytes());
    e
}

/// Single-entry IFD followed by a zero next-IFD offset.
fn single_entry_ifd(entry: Vec<u8>) -> Vec<u8> {
    let mut ifd = 1u16.to_le_bytes().to_vec();
    ifd.extend(entry);
    ifd.extend_from_slice(&0u32.to_le_bytes());
    ifd
}

const IFD_LEN: u32 = 2 + 12 + 4;
const HEADER_LEN: u32 = 8;

fn tiff_header() -> Vec<u8> {
    let mut t = b"II\x2a\x00".to_vec();
    t.extend_from_slice(&HEADER_LEN.to_le_bytes());
    t
}

/// IFD0 -> Exif IFD -> DateTimeOriginal. `value` must be longer than 3 bytes.
fn tiff_with_capture_date(value: &str) -> Vec<u8> {
    let mut ascii = value.as_bytes().to_vec();
    ascii.push(0);

    let exif_ifd_offset = HEADER_LEN + IFD_LEN;
    let data_offset = exif_ifd_offset + IFD_LEN;

    let mut t = tiff_header();
    t.extend(single_entry_ifd(ifd_entry(TAG_EXIF_IFD_POINTER, TYPE_LONG, 1, exif_ifd_offset)));
    t.extend(single_entry_ifd(ifd_entry(
        TAG_DATETIME_ORIGINAL,
        TYPE_ASCII,
        ascii.len() as u32,
        data_offset,
    )));
    t.extend(ascii);
    t
}

/// IFD0 holding only an orientation tag.
fn tiff_without_capture_date() -> Vec<u8> {
    let mut t = tiff_header();
    t.extend(single_entry_ifd(ifd_entry(TAG_ORIENTATION, TYPE_SHORT, 1, 1)));
    t
}

fn wrap_app1(tiff: Vec<u8>) -> Vec<u8> {
    let payload_len = 2 + 6 + tiff.len();
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&(payload_len as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend(tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// JPEG whose Exif block records `value` as DateTimeOriginal.
pub fn jpeg_with_capture_date(value: &str) -> Vec<u8> {
    wrap_app1(tiff_with_capture_date(value))
}

/// JPEG with an Exif block but no DateTimeOriginal.
pub fn jpeg_without_capture_date() -> Vec<u8> {
    wrap_app1(tiff_without_capture_date())
}

/// JPEG with no Exif block at all.
pub fn jpeg_without_exif() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xD9]
}
