//! Locate the TIFF-structured EXIF block inside an image container.
//!
//! | Container | Where EXIF lives |
//! |---|---|
//! | JPEG | APP1 segment starting with `Exif\0\0` |
//! | PNG | `eXIf` chunk |
//! | WebP | `EXIF` RIFF chunk (some writers keep the `Exif\0\0` prefix) |
//! | TIFF | the file itself |
//!
//! A scan that reaches the image data or the end of a well-formed container
//! without finding EXIF is [`Error::NoMetadata`]. Truncation inside the EXIF
//! segment itself is [`Error::Decode`]; truncation anywhere else just ends
//! the scan.

use crate::error::{Error, Result};
use crate::imaging::SourceFormat;

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Return the TIFF block embedded in `bytes`.
pub(crate) fn find_tiff_block(bytes: &[u8]) -> Result<&[u8]> {
    match SourceFormat::detect(bytes) {
        Some(SourceFormat::Jpeg) => find_in_jpeg(bytes),
        Some(SourceFormat::Png) => find_in_png(bytes),
        Some(SourceFormat::WebP) => find_in_webp(bytes),
        Some(SourceFormat::Tiff) => Ok(bytes),
        None => Err(Error::decode("unrecognized image format")),
    }
}

// ---------------------------------------------------------------------------
// JPEG: APP1 "Exif\0\0"
// ---------------------------------------------------------------------------

const APP1: u8 = 0xE1;
const SOS: u8 = 0xDA;
const EOI: u8 = 0xD9;

fn find_in_jpeg(data: &[u8]) -> Result<&[u8]> {
    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        match marker {
            // Fill byte before a marker.
            0xFF => {
                pos += 1;
                continue;
            }
            SOS | EOI => break,
            // Markers without a length field.
            0x00 | 0x01 | 0xD0..=0xD8 => {
                pos += 2;
                continue;
            }
            _ => {}
        }

        let Some(len_bytes) = data.get(pos + 2..pos + 4) else {
            break;
        };
        let seg_len = usize::from(u16::from_be_bytes([len_bytes[0], len_bytes[1]]));
        if seg_len < 2 {
            break;
        }
        let payload_start = pos + 4;
        let seg_end = pos + 2 + seg_len;

        if marker == APP1 && data[payload_start..].starts_with(EXIF_HEADER) {
            return data
                .get(payload_start + EXIF_HEADER.len()..seg_end)
                .ok_or_else(|| Error::decode("JPEG EXIF segment is truncated"));
        }
        pos = seg_end;
    }
    Err(Error::NoMetadata)
}

// ---------------------------------------------------------------------------
// PNG: eXIf chunk
// ---------------------------------------------------------------------------

const PNG_SIGNATURE_LEN: usize = 8;

fn find_in_png(data: &[u8]) -> Result<&[u8]> {
    let mut pos = PNG_SIGNATURE_LEN;
    while let Some(header) = data.get(pos..pos + 8) {
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let kind = &header[4..8];
        let body_start = pos + 8;
        let Some(body_end) = body_start.checked_add(len) else {
            break;
        };

        match kind {
            b"eXIf" => {
                return data
                    .get(body_start..body_end)
                    .ok_or_else(|| Error::decode("PNG eXIf chunk is truncated"));
            }
            b"IEND" => break,
            _ => {}
        }
        // Skip the body and its CRC.
        let Some(next) = body_end.checked_add(4) else {
            break;
        };
        pos = next;
    }
    Err(Error::NoMetadata)
}

// ---------------------------------------------------------------------------
// WebP: EXIF RIFF chunk
// ---------------------------------------------------------------------------

const RIFF_HEADER_LEN: usize = 12;

fn find_in_webp(data: &[u8]) -> Result<&[u8]> {
    let mut pos = RIFF_HEADER_LEN;
    while let Some(header) = data.get(pos..pos + 8) {
        let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let body_start = pos + 8;
        let Some(body_end) = body_start.checked_add(len) else {
            break;
        };

        if &header[0..4] == b"EXIF" {
            let body = data
                .get(body_start..body_end)
                .ok_or_else(|| Error::decode("WebP EXIF chunk is truncated"))?;
            return Ok(body.strip_prefix(EXIF_HEADER).unwrap_or(body));
        }
        // Chunks are padded to an even length.
        let Some(next) = body_end.checked_add(len & 1) else {
            break;
        };
        pos = next;
    }
    Err(Error::NoMetadata)
}
