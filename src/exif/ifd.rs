//! Bounds-checked walker over a TIFF-structured EXIF block.
//!
//! Every offset in the block is attacker-controlled, so nothing here indexes
//! the slice directly: all reads go through [`TiffReader::bytes`], which
//! turns an out-of-range or overflowing offset into [`Error::Decode`].
//!
//! TIFF header (8 bytes):
//!   Bytes 0-1: "II" (little-endian) or "MM" (big-endian)
//!   Bytes 2-3: 42
//!   Bytes 4-7: offset of IFD0
//!
//! IFD: u16 entry count, then 12-byte entries:
//!   Bytes 0-1:  tag
//!   Bytes 2-3:  type code
//!   Bytes 4-7:  component count
//!   Bytes 8-11: value (if it fits in 4 bytes) or offset to it

use super::tags::{EXIF_IFD_POINTER, GPS_IFD_POINTER, INTEROP_IFD_POINTER, SUB_IFDS};
use super::{ByteOrder, IfdKind, TagType};
use crate::error::{Error, Result};
use log::{debug, warn};
use std::collections::VecDeque;

const HEADER_LEN: usize = 8;
const ENTRY_LEN: usize = 12;
const TIFF_MAGIC: u16 = 42;
/// TIFF 6.0 "IFD" type, used by some writers for sub-IFD pointers.
const TYPE_IFD: u16 = 13;

/// One directory entry, not yet resolved to its value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawEntry {
    pub tag: u16,
    pub type_code: u16,
    pub count: u32,
    /// Absolute position of the 4-byte value/offset field in the block.
    pub field: usize,
    pub ifd: IfdKind,
}

pub(crate) struct TiffReader<'a> {
    data: &'a [u8],
    order: ByteOrder,
}

impl<'a> TiffReader<'a> {
    /// Validate the header; returns the reader and the offset of IFD0.
    pub fn new(data: &'a [u8]) -> Result<(Self, u32)> {
        if data.len() < HEADER_LEN {
            return Err(Error::decode(format!(
                "EXIF block too short for a TIFF header ({} bytes)",
                data.len()
            )));
        }
        let order = match &data[0..2] {
            b"II" => ByteOrder::LittleEndian,
            b"MM" => ByteOrder::BigEndian,
            _ => return Err(Error::decode("EXIF block has no TIFF byte-order mark")),
        };
        let reader = Self { data, order };
        if reader.u16_at(2)? != TIFF_MAGIC {
            return Err(Error::decode("EXIF block has a bad TIFF magic number"));
        }
        let first_ifd = reader.u32_at(4)?;
        Ok((reader, first_ifd))
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| {
                Error::decode(format!(
                    "EXIF offset {offset} (+{len}) is outside the {}-byte block",
                    self.data.len()
                ))
            })
    }

    fn u16_at(&self, offset: usize) -> Result<u16> {
        let b = self.bytes(offset, 2)?;
        Ok(self.order.u16([b[0], b[1]]))
    }

    fn u32_at(&self, offset: usize) -> Result<u32> {
        let b = self.bytes(offset, 4)?;
        Ok(self.order.u32([b[0], b[1], b[2], b[3]]))
    }

    /// Read the entry table of one directory.
    fn read_ifd(&self, offset: u32, ifd: IfdKind) -> Result<Vec<RawEntry>> {
        let start = offset as usize;
        let count = usize::from(self.u16_at(start)?);
        let table_start = start + 2;
        let table = self.bytes(table_start, count * ENTRY_LEN)?;

        Ok(table
            .chunks_exact(ENTRY_LEN)
            .enumerate()
            .map(|(i, e)| RawEntry {
                tag: self.order.u16([e[0], e[1]]),
                type_code: self.order.u16([e[2], e[3]]),
                count: self.order.u32([e[4], e[5], e[6], e[7]]),
                field: table_start + i * ENTRY_LEN + 8,
                ifd,
            })
            .collect())
    }

    /// Collect the entries of IFD0 and every sub-IFD reachable from it,
    /// grouped in [`IfdKind::SEARCH_ORDER`]. Entries keep their stored order
    /// within a directory, and several SubIFDs keep the order IFD0 lists them.
    pub fn walk(&self, first_ifd: u32) -> Result<Vec<RawEntry>> {
        let mut entries = Vec::new();
        let mut visited: Vec<u32> = Vec::new();
        let mut pending = VecDeque::from([(first_ifd, IfdKind::Primary)]);

        while let Some((offset, ifd)) = pending.pop_front() {
            if visited.contains(&offset) {
                warn!("EXIF {ifd:?} IFD at {offset} was already read, skipping");
                continue;
            }
            visited.push(offset);

            let table = self.read_ifd(offset, ifd)?;
            debug!("EXIF {ifd:?} IFD at {offset}: {} entries", table.len());
            for entry in &table {
                let Some(child) = sub_ifd(ifd, entry.tag) else {
                    continue;
                };
                for child_offset in self.pointers(entry)? {
                    if child_offset != 0 {
                        pending.push_back((child_offset, child));
                    }
                }
            }
            entries.extend(table);
        }

        // Stable, so per-directory order survives.
        entries.sort_by_key(|e| e.ifd.rank());
        Ok(entries)
    }

    /// Target offsets of a sub-IFD pointer entry. `SubIFDs` may hold an
    /// array, stored out of line once it outgrows the 4-byte field.
    fn pointers(&self, entry: &RawEntry) -> Result<Vec<u32>> {
        let kind = match entry.type_code {
            c if c == TagType::Long as u16 || c == TYPE_IFD => TagType::Long,
            c if c == TagType::Short as u16 => TagType::Short,
            other => {
                return Err(Error::decode(format!(
                    "EXIF sub-IFD pointer 0x{:04X} has type code {other}",
                    entry.tag
                )));
            }
        };
        let raw = self.value_bytes(entry, kind)?;
        let order = self.order;
        Ok(match kind {
            TagType::Short => raw
                .chunks_exact(2)
                .map(|b| u32::from(order.u16([b[0], b[1]])))
                .collect(),
            _ => raw
                .chunks_exact(4)
                .map(|b| order.u32([b[0], b[1], b[2], b[3]]))
                .collect(),
        })
    }

    /// Raw value bytes of an entry: inline when they fit in the 4-byte
    /// field, otherwise at the offset the field holds.
    pub fn value_bytes(&self, entry: &RawEntry, kind: TagType) -> Result<&'a [u8]> {
        let size = usize::try_from(entry.count)
            .ok()
            .and_then(|count| count.checked_mul(kind.size()))
            .ok_or_else(|| {
                Error::decode(format!(
                    "EXIF tag 0x{:04X} declares {} components",
                    entry.tag, entry.count
                ))
            })?;

        if size <= 4 {
            self.bytes(entry.field, size)
        } else {
            let offset = self.u32_at(entry.field)?;
            self.bytes(offset as usize, size)
        }
    }
}

/// The directory a pointer tag leads to, if `tag` is a pointer in `parent`.
fn sub_ifd(parent: IfdKind, tag: u16) -> Option<IfdKind> {
    match (parent, tag) {
        (IfdKind::Primary, SUB_IFDS) => Some(IfdKind::SubIfd),
        (IfdKind::Primary, EXIF_IFD_POINTER) => Some(IfdKind::Exif),
        (IfdKind::Primary, GPS_IFD_POINTER) => Some(IfdKind::Gps),
        (IfdKind::Exif, INTEROP_IFD_POINTER) => Some(IfdKind::Interop),
        _ => None,
    }
}
