//! Builders for synthetic EXIF blocks and the containers that carry them.

use super::tags::{EXIF_IFD_POINTER, GPS_IFD_POINTER, INTEROP_IFD_POINTER, SUB_IFDS};

/// A directory entry to write. `payload` is serialized per byte order when
/// the block is built.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    tag: u16,
    type_code: u16,
    count: u32,
    payload: Payload,
}

#[derive(Debug, Clone)]
enum Payload {
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<(u32, u32)>),
    /// Already in final byte order.
    Raw(Vec<u8>),
}

impl Entry {
    pub fn short(tag: u16, value: u16) -> Self {
        Self::shorts(tag, &[value])
    }

    pub fn shorts(tag: u16, values: &[u16]) -> Self {
        Self {
            tag,
            type_code: 3,
            count: values.len() as u32,
            payload: Payload::Shorts(values.to_vec()),
        }
    }

    pub fn long(tag: u16, value: u32) -> Self {
        Self::longs(tag, &[value])
    }

    pub fn longs(tag: u16, values: &[u32]) -> Self {
        Self {
            tag,
            type_code: 4,
            count: values.len() as u32,
            payload: Payload::Longs(values.to_vec()),
        }
    }

    /// NUL-terminated, as EXIF writers store strings.
    pub fn ascii(tag: u16, text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        Self {
            tag,
            type_code: 2,
            count: bytes.len() as u32,
            payload: Payload::Raw(bytes),
        }
    }

    pub fn rational(tag: u16, num: u32, den: u32) -> Self {
        Self {
            tag,
            type_code: 5,
            count: 1,
            payload: Payload::Rationals(vec![(num, den)]),
        }
    }

    /// Arbitrary type code and count; `bytes` go in verbatim.
    pub fn raw(tag: u16, type_code: u16, count: u32, bytes: Vec<u8>) -> Self {
        Self {
            tag,
            type_code,
            count,
            payload: Payload::Raw(bytes),
        }
    }
}

struct Writer {
    big_endian: bool,
    out: Vec<u8>,
}

impl Writer {
    fn u16(&mut self, v: u16) {
        let b = if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        self.out.extend_from_slice(&b);
    }

    fn u32(&mut self, v: u32) {
        let b = if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        self.out.extend_from_slice(&b);
    }

    fn payload(&self, payload: &Payload) -> Vec<u8> {
        let mut w = Writer {
            big_endian: self.big_endian,
            out: Vec::new(),
        };
        match payload {
            Payload::Shorts(v) => v.iter().for_each(|&x| w.u16(x)),
            Payload::Longs(v) => v.iter().for_each(|&x| w.u32(x)),
            Payload::Rationals(v) => v.iter().for_each(|&(n, d)| {
                w.u32(n);
                w.u32(d);
            }),
            Payload::Raw(b) => w.out.extend_from_slice(b),
        }
        w.out
    }
}

fn ifd_len(entries: usize) -> usize {
    2 + entries * 12 + 4
}

/// Directory contents of a synthetic TIFF block.
///
/// IFD0 sits at offset 8; the other directories follow it in the order
/// SubIFDs, Exif, GPS, Interop, then one shared data area. Pointer entries
/// are appended for every non-empty child: `SubIFDs`, Exif and GPS to IFD0,
/// Interop to the Exif IFD (which is written even when empty if Interop is
/// not).
#[derive(Debug, Clone, Default)]
pub(crate) struct TiffBuilder {
    pub ifd0: Vec<Entry>,
    pub sub_ifds: Vec<Vec<Entry>>,
    pub exif: Vec<Entry>,
    pub gps: Vec<Entry>,
    pub interop: Vec<Entry>,
}

impl TiffBuilder {
    pub fn build(&self, big_endian: bool) -> Vec<u8> {
        let mut primary = self.ifd0.clone();
        let mut exif = self.exif.clone();
        let has_exif = !exif.is_empty() || !self.interop.is_empty();

        let sub_at = (!self.sub_ifds.is_empty()).then(|| {
            primary.push(Entry::longs(SUB_IFDS, &vec![0; self.sub_ifds.len()]));
            primary.len() - 1
        });
        let exif_at = has_exif.then(|| {
            primary.push(Entry::long(EXIF_IFD_POINTER, 0));
            primary.len() - 1
        });
        let gps_at = (!self.gps.is_empty()).then(|| {
            primary.push(Entry::long(GPS_IFD_POINTER, 0));
            primary.len() - 1
        });
        let interop_at = (!self.interop.is_empty()).then(|| {
            exif.push(Entry::long(INTEROP_IFD_POINTER, 0));
            exif.len() - 1
        });

        let ifd0_offset = 8;
        let mut offset = ifd0_offset + ifd_len(primary.len());
        let mut next = |len: usize| {
            let at = offset as u32;
            offset += ifd_len(len);
            at
        };
        let sub_offsets: Vec<u32> = self.sub_ifds.iter().map(|d| next(d.len())).collect();
        let exif_offset = if has_exif { next(exif.len()) } else { 0 };
        let gps_offset = if self.gps.is_empty() { 0 } else { next(self.gps.len()) };
        let interop_offset = if self.interop.is_empty() {
            0
        } else {
            next(self.interop.len())
        };
        let data_offset = offset;

        if let Some(i) = sub_at {
            primary[i].payload = Payload::Longs(sub_offsets);
        }
        if let Some(i) = exif_at {
            primary[i].payload = Payload::Longs(vec![exif_offset]);
        }
        if let Some(i) = gps_at {
            primary[i].payload = Payload::Longs(vec![gps_offset]);
        }
        if let Some(i) = interop_at {
            exif[i].payload = Payload::Longs(vec![interop_offset]);
        }

        let mut dirs: Vec<&[Entry]> = vec![primary.as_slice()];
        dirs.extend(self.sub_ifds.iter().map(Vec::as_slice));
        if has_exif {
            dirs.push(exif.as_slice());
        }
        for child in [&self.gps, &self.interop] {
            if !child.is_empty() {
                dirs.push(child.as_slice());
            }
        }

        let mut w = Writer {
            big_endian,
            out: Vec::new(),
        };
        w.out.extend_from_slice(if big_endian { b"MM" } else { b"II" });
        w.u16(42);
        w.u32(ifd0_offset as u32);

        let mut data = Vec::new();
        for dir in dirs {
            w.u16(dir.len() as u16);
            for entry in dir {
                w.u16(entry.tag);
                w.u16(entry.type_code);
                w.u32(entry.count);
                let bytes = w.payload(&entry.payload);
                if bytes.len() <= 4 {
                    let mut field = bytes;
                    field.resize(4, 0);
                    w.out.extend_from_slice(&field);
                } else {
                    w.u32((data_offset + data.len()) as u32);
                    data.extend_from_slice(&bytes);
                    if data.len() % 2 == 1 {
                        data.push(0);
                    }
                }
            }
            // No next IFD.
            w.u32(0);
        }
        w.out.extend_from_slice(&data);
        w.out
    }
}

/// A TIFF block with IFD0 and, when non-empty, Exif and GPS sub-IFDs.
pub(crate) fn tiff(big_endian: bool, ifd0: &[Entry], exif: &[Entry], gps: &[Entry]) -> Vec<u8> {
    TiffBuilder {
        ifd0: ifd0.to_vec(),
        exif: exif.to_vec(),
        gps: gps.to_vec(),
        ..Default::default()
    }
    .build(big_endian)
}

/// A TIFF block holding only IFD0.
pub(crate) fn tiff_block(big_endian: bool, entries: &[Entry]) -> Vec<u8> {
    tiff(big_endian, entries, &[], &[])
}

/// SOI, one APP1 Exif segment, EOI.
pub(crate) fn jpeg_with_exif(block: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend_from_slice(&app1_segment(block));
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// An APP1 segment (marker included) carrying `block`.
fn app1_segment(block: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xE1];
    out.extend_from_slice(&((2 + 6 + block.len()) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(block);
    out
}

/// PNG signature, an eXIf chunk, IEND. CRCs are not checked by the locator.
pub(crate) fn png_with_exif(block: &[u8]) -> Vec<u8> {
    let mut out = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    out.extend_from_slice(&(block.len() as u32).to_be_bytes());
    out.extend_from_slice(b"eXIf");
    out.extend_from_slice(block);
    out.extend_from_slice(&[0; 4]); // CRC
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(b"IEND");
    out.extend_from_slice(&[0xAE, 0x42, 0x60, 0x82]);
    out
}

/// RIFF/WEBP with a single EXIF chunk, optionally `Exif\0\0`-prefixed.
pub(crate) fn webp_with_exif(block: &[u8], with_prefix: bool) -> Vec<u8> {
    let mut body = Vec::new();
    if with_prefix {
        body.extend_from_slice(b"Exif\0\0");
    }
    body.extend_from_slice(block);

    let mut chunk = b"EXIF".to_vec();
    chunk.extend_from_slice(&(body.len() as u32).to_le_bytes());
    chunk.extend_from_slice(&body);
    if body.len() % 2 == 1 {
        chunk.push(0);
    }

    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&((4 + chunk.len()) as u32).to_le_bytes());
    out.extend_from_slice(b"WEBP");
    out.extend_from_slice(&chunk);
    out
}
