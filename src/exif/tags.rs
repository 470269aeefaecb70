//! Well-known EXIF tag numbers and their names.
//!
//! Tag numbers are only unique within a directory: `0x0001` is
//! `InteropIndex` in the Interoperability IFD but `GPSLatitudeRef` in the
//! GPS IFD. [`tag_name`] resolves without context and prefers the primary
//! and Exif directories; [`tag_name_in`] takes the directory into account.

use super::IfdKind;

pub const INTEROP_INDEX: u16 = 0x0001;
pub const IMAGE_WIDTH: u16 = 0x0100;
pub const IMAGE_LENGTH: u16 = 0x0101;
pub const IMAGE_DESCRIPTION: u16 = 0x010E;
pub const MAKE: u16 = 0x010F;
pub const MODEL: u16 = 0x0110;
pub const ORIENTATION: u16 = 0x0112;
pub const SOFTWARE: u16 = 0x0131;
pub const DATE_TIME: u16 = 0x0132;
pub const ARTIST: u16 = 0x013B;
pub const SUB_IFDS: u16 = 0x014A;
pub const COPYRIGHT: u16 = 0x8298;
pub const EXPOSURE_TIME: u16 = 0x829A;
pub const F_NUMBER: u16 = 0x829D;
pub const EXIF_IFD_POINTER: u16 = 0x8769;
pub const GPS_IFD_POINTER: u16 = 0x8825;
pub const ISO_SPEED: u16 = 0x8827;
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const FOCAL_LENGTH: u16 = 0x920A;
pub const INTEROP_IFD_POINTER: u16 = 0xA005;
pub const GPS_LATITUDE_REF: u16 = 0x0001;
pub const GPS_LATITUDE: u16 = 0x0002;
pub const GPS_LONGITUDE_REF: u16 = 0x0003;
pub const GPS_LONGITUDE: u16 = 0x0004;

/// `(tag, directory, name)` for the tags this crate can name.
static KNOWN_TAGS: &[(u16, IfdKind, &str)] = &[
    // Primary image (IFD0)
    (0x000B, IfdKind::Primary, "ProcessingSoftware"),
    (0x00FE, IfdKind::Primary, "SubfileType"),
    (IMAGE_WIDTH, IfdKind::Primary, "ImageWidth"),
    (IMAGE_LENGTH, IfdKind::Primary, "ImageLength"),
    (0x0102, IfdKind::Primary, "BitsPerSample"),
    (0x0103, IfdKind::Primary, "Compression"),
    (0x0106, IfdKind::Primary, "PhotometricInterpretation"),
    (IMAGE_DESCRIPTION, IfdKind::Primary, "ImageDescription"),
    (MAKE, IfdKind::Primary, "Make"),
    (MODEL, IfdKind::Primary, "Model"),
    (0x0111, IfdKind::Primary, "StripOffsets"),
    (ORIENTATION, IfdKind::Primary, "Orientation"),
    (0x0115, IfdKind::Primary, "SamplesPerPixel"),
    (0x0116, IfdKind::Primary, "RowsPerStrip"),
    (0x0117, IfdKind::Primary, "StripByteCounts"),
    (0x011A, IfdKind::Primary, "XResolution"),
    (0x011B, IfdKind::Primary, "YResolution"),
    (0x011C, IfdKind::Primary, "PlanarConfiguration"),
    (0x0128, IfdKind::Primary, "ResolutionUnit"),
    (SOFTWARE, IfdKind::Primary, "Software"),
    (DATE_TIME, IfdKind::Primary, "DateTime"),
    (ARTIST, IfdKind::Primary, "Artist"),
    (0x013E, IfdKind::Primary, "WhitePoint"),
    (0x013F, IfdKind::Primary, "PrimaryChromaticities"),
    (SUB_IFDS, IfdKind::Primary, "SubIFDs"),
    (0x0201, IfdKind::Primary, "JPEGInterchangeFormat"),
    (0x0202, IfdKind::Primary, "JPEGInterchangeFormatLength"),
    (0x0211, IfdKind::Primary, "YCbCrCoefficients"),
    (0x0213, IfdKind::Primary, "YCbCrPositioning"),
    (0x0214, IfdKind::Primary, "ReferenceBlackWhite"),
    (COPYRIGHT, IfdKind::Primary, "Copyright"),
    (EXIF_IFD_POINTER, IfdKind::Primary, "ExifIFDPointer"),
    (GPS_IFD_POINTER, IfdKind::Primary, "GPSInfoIFDPointer"),
    (0x9C9B, IfdKind::Primary, "XPTitle"),
    (0x9C9C, IfdKind::Primary, "XPComment"),
    (0x9C9D, IfdKind::Primary, "XPAuthor"),
    (0x9C9E, IfdKind::Primary, "XPKeywords"),
    (0x9C9F, IfdKind::Primary, "XPSubject"),
    // Exif sub-IFD
    (EXPOSURE_TIME, IfdKind::Exif, "ExposureTime"),
    (F_NUMBER, IfdKind::Exif, "FNumber"),
    (0x8822, IfdKind::Exif, "ExposureProgram"),
    (ISO_SPEED, IfdKind::Exif, "ISOSpeedRatings"),
    (0x8830, IfdKind::Exif, "SensitivityType"),
    (0x9000, IfdKind::Exif, "ExifVersion"),
    (DATE_TIME_ORIGINAL, IfdKind::Exif, "DateTimeOriginal"),
    (0x9004, IfdKind::Exif, "DateTimeDigitized"),
    (0x9010, IfdKind::Exif, "OffsetTime"),
    (0x9011, IfdKind::Exif, "OffsetTimeOriginal"),
    (0x9101, IfdKind::Exif, "ComponentsConfiguration"),
    (0x9201, IfdKind::Exif, "ShutterSpeedValue"),
    (0x9202, IfdKind::Exif, "ApertureValue"),
    (0x9203, IfdKind::Exif, "BrightnessValue"),
    (0x9204, IfdKind::Exif, "ExposureBiasValue"),
    (0x9205, IfdKind::Exif, "MaxApertureValue"),
    (0x9207, IfdKind::Exif, "MeteringMode"),
    (0x9208, IfdKind::Exif, "LightSource"),
    (0x9209, IfdKind::Exif, "Flash"),
    (FOCAL_LENGTH, IfdKind::Exif, "FocalLength"),
    (0x927C, IfdKind::Exif, "MakerNote"),
    (0x9286, IfdKind::Exif, "UserComment"),
    (0x9290, IfdKind::Exif, "SubSecTime"),
    (0x9291, IfdKind::Exif, "SubSecTimeOriginal"),
    (0xA000, IfdKind::Exif, "FlashpixVersion"),
    (0xA001, IfdKind::Exif, "ColorSpace"),
    (0xA002, IfdKind::Exif, "PixelXDimension"),
    (0xA003, IfdKind::Exif, "PixelYDimension"),
    (INTEROP_IFD_POINTER, IfdKind::Exif, "InteroperabilityIFDPointer"),
    (0xA20E, IfdKind::Exif, "FocalPlaneXResolution"),
    (0xA20F, IfdKind::Exif, "FocalPlaneYResolution"),
    (0xA210, IfdKind::Exif, "FocalPlaneResolutionUnit"),
    (0xA217, IfdKind::Exif, "SensingMethod"),
    (0xA300, IfdKind::Exif, "FileSource"),
    (0xA301, IfdKind::Exif, "SceneType"),
    (0xA401, IfdKind::Exif, "CustomRendered"),
    (0xA402, IfdKind::Exif, "ExposureMode"),
    (0xA403, IfdKind::Exif, "WhiteBalance"),
    (0xA404, IfdKind::Exif, "DigitalZoomRatio"),
    (0xA405, IfdKind::Exif, "FocalLengthIn35mmFilm"),
    (0xA406, IfdKind::Exif, "SceneCaptureType"),
    (0xA408, IfdKind::Exif, "Contrast"),
    (0xA409, IfdKind::Exif, "Saturation"),
    (0xA40A, IfdKind::Exif, "Sharpness"),
    (0xA420, IfdKind::Exif, "ImageUniqueID"),
    (0xA430, IfdKind::Exif, "CameraOwnerName"),
    (0xA431, IfdKind::Exif, "BodySerialNumber"),
    (0xA432, IfdKind::Exif, "LensSpecification"),
    (0xA433, IfdKind::Exif, "LensMake"),
    (0xA434, IfdKind::Exif, "LensModel"),
    (0xA435, IfdKind::Exif, "LensSerialNumber"),
    // GPS sub-IFD
    (0x0000, IfdKind::Gps, "GPSVersionID"),
    (GPS_LATITUDE_REF, IfdKind::Gps, "GPSLatitudeRef"),
    (GPS_LATITUDE, IfdKind::Gps, "GPSLatitude"),
    (GPS_LONGITUDE_REF, IfdKind::Gps, "GPSLongitudeRef"),
    (GPS_LONGITUDE, IfdKind::Gps, "GPSLongitude"),
    (0x0005, IfdKind::Gps, "GPSAltitudeRef"),
    (0x0006, IfdKind::Gps, "GPSAltitude"),
    (0x0007, IfdKind::Gps, "GPSTimeStamp"),
    (0x0010, IfdKind::Gps, "GPSImgDirectionRef"),
    (0x0011, IfdKind::Gps, "GPSImgDirection"),
    (0x0012, IfdKind::Gps, "GPSMapDatum"),
    (0x001D, IfdKind::Gps, "GPSDateStamp"),
    // Interoperability sub-IFD
    (INTEROP_INDEX, IfdKind::Interop, "InteropIndex"),
    (0x0002, IfdKind::Interop, "InteropVersion"),
];

/// Name of a tag in a specific directory.
///
/// SubIFDs describe images just like IFD0, so they share its names.
pub fn tag_name_in(ifd: IfdKind, tag: u16) -> Option<&'static str> {
    let ifd = match ifd {
        IfdKind::SubIfd => IfdKind::Primary,
        other => other,
    };
    KNOWN_TAGS
        .iter()
        .find(|(t, kind, _)| *t == tag && *kind == ifd)
        .map(|(_, _, name)| *name)
}

/// Best-effort name of a tag without knowing its directory.
///
/// Lookup order matches the resolver's search order: primary, SubIFD,
/// Exif, GPS, Interoperability.
pub fn tag_name(tag: u16) -> Option<&'static str> {
    IfdKind::SEARCH_ORDER
        .iter()
        .find_map(|&ifd| tag_name_in(ifd, tag))
}
