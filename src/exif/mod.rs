//! Raw EXIF tag lookup.
//!
//! EXIF is a TIFF structure embedded in the image container: an 8-byte
//! header naming the byte order, followed by linked directories (IFDs) of
//! 12-byte entries. Each entry holds a tag number, a type code, a value
//! count, and either the value itself (when it fits in four bytes) or an
//! offset to it.
//!
//! ```text
//! JPEG  APP1 "Exif\0\0" ─┐
//! PNG   eXIf chunk ──────┼─→ TIFF block ─→ IFD0 ─┬─→ SubIFDs
//! WebP  EXIF chunk ──────┤                       ├─→ Exif IFD ─→ Interop IFD
//! TIFF  whole file ──────┘                       └─→ GPS IFD
//! ```
//!
//! [`ExifDirectory`] indexes every entry of those directories without
//! copying the source; [`ExifDirectory::get`] resolves one tag into an owned
//! [`ExifValue`] holding the raw value bytes exactly as stored. When the same
//! tag number appears in more than one directory, the first directory in
//! [`IfdKind::SEARCH_ORDER`] wins.
//!
//! All reads are bounds-checked against the block. A malformed directory is
//! reported as [`Error::Decode`]; a container without any EXIF block is
//! [`Error::NoMetadata`]; a readable directory without the tag is
//! [`Error::TagNotFound`].

mod container;
mod ifd;
pub mod tags;
#[cfg(test)]
pub(crate) mod test_fixtures;

use crate::error::{Error, Result};
use ifd::{RawEntry, TiffReader};
use log::warn;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Byte order declared by the TIFF header (`II` or `MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    pub fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    pub fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        }
    }

    pub fn u64(self, bytes: [u8; 8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => u64::from_le_bytes(bytes),
            ByteOrder::BigEndian => u64::from_be_bytes(bytes),
        }
    }
}

/// The directory an entry was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IfdKind {
    Primary,
    /// Child image directories listed by IFD0's `SubIFDs` (0x014A) tag, as
    /// written by TIFF-based raw formats for the full-size image.
    SubIfd,
    Exif,
    Gps,
    Interop,
}

impl IfdKind {
    /// Order in which directories are searched for a tag.
    pub const SEARCH_ORDER: [IfdKind; 5] = [
        IfdKind::Primary,
        IfdKind::SubIfd,
        IfdKind::Exif,
        IfdKind::Gps,
        IfdKind::Interop,
    ];

    /// Position in [`Self::SEARCH_ORDER`].
    pub(crate) fn rank(self) -> usize {
        match self {
            IfdKind::Primary => 0,
            IfdKind::SubIfd => 1,
            IfdKind::Exif => 2,
            IfdKind::Gps => 3,
            IfdKind::Interop => 4,
        }
    }
}

/// EXIF field types and their numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u16)]
pub enum TagType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
}

impl TagType {
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => TagType::Byte,
            2 => TagType::Ascii,
            3 => TagType::Short,
            4 => TagType::Long,
            5 => TagType::Rational,
            6 => TagType::SByte,
            7 => TagType::Undefined,
            8 => TagType::SShort,
            9 => TagType::SLong,
            10 => TagType::SRational,
            11 => TagType::Float,
            12 => TagType::Double,
            _ => return None,
        })
    }

    /// Size in bytes of one component.
    pub fn size(self) -> usize {
        match self {
            TagType::Byte | TagType::Ascii | TagType::SByte | TagType::Undefined => 1,
            TagType::Short | TagType::SShort => 2,
            TagType::Long | TagType::SLong | TagType::Float => 4,
            TagType::Rational | TagType::SRational | TagType::Double => 8,
        }
    }
}

/// A tag value as typed components, in native byte order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum TagValue {
    Byte(Vec<u8>),
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<(u32, u32)>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<(i32, i32)>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

/// One resolved tag: its raw value bytes plus what is needed to read them.
///
/// `data` is copied out of the source, so the value outlives the bytes it
/// was read from. Its length is always `count * tag_type().size()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExifValue {
    tag: u16,
    ifd: IfdKind,
    kind: TagType,
    count: u32,
    byte_order: ByteOrder,
    data: Vec<u8>,
}

impl ExifValue {
    pub fn tag(&self) -> u16 {
        self.tag
    }

    pub fn ifd(&self) -> IfdKind {
        self.ifd
    }

    /// Numeric EXIF type code (ASCII = 2, SHORT = 3, LONG = 4, ...).
    pub fn type_code(&self) -> i16 {
        self.kind as i16
    }

    pub fn tag_type(&self) -> TagType {
        self.kind
    }

    /// Number of components, not bytes.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Raw value bytes in the source's byte order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// A tag may legitimately carry zero components.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Interpret the raw bytes according to the type code and byte order.
    pub fn decode(&self) -> TagValue {
        let order = self.byte_order;
        let d = &self.data;
        match self.kind {
            TagType::Byte => TagValue::Byte(d.clone()),
            TagType::Undefined => TagValue::Undefined(d.clone()),
            TagType::SByte => TagValue::SByte(d.iter().map(|&b| b as i8).collect()),
            TagType::Ascii => {
                let end = d.iter().position(|&b| b == 0).unwrap_or(d.len());
                TagValue::Ascii(String::from_utf8_lossy(&d[..end]).into_owned())
            }
            TagType::Short => TagValue::Short(words(d).map(|w| order.u16(w)).collect()),
            TagType::SShort => {
                TagValue::SShort(words(d).map(|w| order.u16(w) as i16).collect())
            }
            TagType::Long => TagValue::Long(words(d).map(|w| order.u32(w)).collect()),
            TagType::SLong => TagValue::SLong(words(d).map(|w| order.u32(w) as i32).collect()),
            TagType::Float => {
                TagValue::Float(words(d).map(|w| f32::from_bits(order.u32(w))).collect())
            }
            TagType::Double => {
                TagValue::Double(words(d).map(|w| f64::from_bits(order.u64(w))).collect())
            }
            TagType::Rational => TagValue::Rational(
                words::<8>(d)
                    .map(|w| rational_parts(order, w))
                    .collect(),
            ),
            TagType::SRational => TagValue::SRational(
                words::<8>(d)
                    .map(|w| {
                        let (num, den) = rational_parts(order, w);
                        (num as i32, den as i32)
                    })
                    .collect(),
            ),
        }
    }
}

fn words<const N: usize>(data: &[u8]) -> impl Iterator<Item = [u8; N]> + '_ {
    data.chunks_exact(N).filter_map(|c| c.try_into().ok())
}

fn rational_parts(order: ByteOrder, w: [u8; 8]) -> (u32, u32) {
    let [a, b, c, d, e, f, g, h] = w;
    (order.u32([a, b, c, d]), order.u32([e, f, g, h]))
}

/// Index of every entry in IFD0 and its SubIFD, Exif, GPS and
/// Interoperability sub-directories, borrowing the TIFF block it was parsed from.
pub struct ExifDirectory<'a> {
    reader: TiffReader<'a>,
    entries: Vec<RawEntry>,
}

impl<'a> ExifDirectory<'a> {
    /// Parse a bare TIFF-structured block (starting at `II`/`MM`).
    pub fn parse(block: &'a [u8]) -> Result<Self> {
        let (reader, first_ifd) = TiffReader::new(block)?;
        let entries = reader.walk(first_ifd)?;
        Ok(Self { reader, entries })
    }

    /// Locate the EXIF block inside an image file's bytes and parse it.
    pub fn from_source(bytes: &'a [u8]) -> Result<Self> {
        Self::parse(container::find_tiff_block(bytes)?)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.reader.byte_order()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every `(directory, tag)` pair, in search order.
    pub fn tags(&self) -> impl Iterator<Item = (IfdKind, u16)> + '_ {
        self.entries.iter().map(|e| (e.ifd, e.tag))
    }

    /// Resolve `tag`, searching directories in [`IfdKind::SEARCH_ORDER`].
    pub fn get(&self, tag: u16) -> Result<ExifValue> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.tag == tag)
            .ok_or(Error::TagNotFound { tag })?;
        self.resolve(entry)
    }

    fn resolve(&self, entry: &RawEntry) -> Result<ExifValue> {
        let kind = TagType::from_code(entry.type_code).ok_or_else(|| {
            Error::decode(format!(
                "EXIF tag 0x{:04X} has unknown type code {}",
                entry.tag, entry.type_code
            ))
        })?;
        let data = self.reader.value_bytes(entry, kind)?;
        Ok(ExifValue {
            tag: entry.tag,
            ifd: entry.ifd,
            kind,
            count: entry.count,
            byte_order: self.byte_order(),
            data: data.to_vec(),
        })
    }

    /// Dump every resolvable entry as a JSON array.
    ///
    /// Entries whose value cannot be read are logged and left out rather
    /// than failing the whole dump.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct JsonEntry {
            ifd: IfdKind,
            tag: u16,
            name: Option<&'static str>,
            #[serde(flatten)]
            value: TagValue,
        }

        let entries: Vec<JsonEntry> = self
            .entries
            .iter()
            .filter_map(|entry| match self.resolve(entry) {
                Ok(value) => Some(JsonEntry {
                    ifd: entry.ifd,
                    tag: entry.tag,
                    name: tags::tag_name_in(entry.ifd, entry.tag),
                    value: value.decode(),
                }),
                Err(e) => {
                    warn!("Skipping EXIF tag 0x{:04X}: {e}", entry.tag);
                    None
                }
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }
}

/// Find `tag` in the EXIF block of an image file's bytes.
pub fn lookup(bytes: &[u8], tag: u16) -> Result<ExifValue> {
    ExifDirectory::from_source(bytes)?.get(tag)
}

/// Where to read EXIF from: a file on disk or bytes already in memory.
#[derive(Debug, Clone, Copy)]
pub enum ExifSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Path> for ExifSource<'a> {
    fn from(path: &'a Path) -> Self {
        ExifSource::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ExifSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ExifSource::Path(path)
    }
}

impl<'a> From<&'a [u8]> for ExifSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ExifSource::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for ExifSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        ExifSource::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for ExifSource<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        ExifSource::Bytes(bytes)
    }
}
