//! Input format detection from magic bytes.
//!
//! Detection never looks at file extensions: a `.jpg` holding PNG bytes is a
//! PNG. Adding a format means adding a variant here and a decoder mapping in
//! the backend.

/// Raster formats the decoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
    Tiff,
}

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

impl SourceFormat {
    /// Every decodable format, in detection order.
    pub fn all() -> &'static [SourceFormat] {
        &[
            SourceFormat::Jpeg,
            SourceFormat::Png,
            SourceFormat::WebP,
            SourceFormat::Tiff,
        ]
    }

    /// Identify the container from its leading bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.matches(data))
    }

    fn matches(self, data: &[u8]) -> bool {
        match self {
            SourceFormat::Jpeg => data.starts_with(&[0xFF, 0xD8, 0xFF]),
            SourceFormat::Png => data.starts_with(PNG_SIGNATURE),
            SourceFormat::WebP => {
                data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP"
            }
            SourceFormat::Tiff => {
                data.starts_with(b"II\x2A\x00") || data.starts_with(b"MM\x00\x2A")
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Png => "png",
            SourceFormat::WebP => "webp",
            SourceFormat::Tiff => "tiff",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
            SourceFormat::WebP => "image/webp",
            SourceFormat::Tiff => "image/tiff",
        }
    }

    /// The matching `image` crate format.
    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            SourceFormat::Jpeg => image::ImageFormat::Jpeg,
            SourceFormat::Png => image::ImageFormat::Png,
            SourceFormat::WebP => image::ImageFormat::WebP,
            SourceFormat::Tiff => image::ImageFormat::Tiff,
        }
    }
}
