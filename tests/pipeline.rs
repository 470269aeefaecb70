//! End-to-end tests through the public API: real files on disk, real codecs.

use agno::config::PipelineConfig;
use agno::{Error, Pipeline, TagValue, WebpMode};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MAKE: i16 = 0x010F;
const ORIENTATION: i16 = 0x0112;

fn write_png(dir: &Path, name: &str, img: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 5 % 256) as u8, (y * 5 % 256) as u8, 90])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// Little-endian TIFF block with Make and Orientation in IFD0.
fn exif_block(make: &str, orientation: u16) -> Vec<u8> {
    let mut make_bytes = make.as_bytes().to_vec();
    make_bytes.push(0);
    // Header (8) + count (2) + 2 entries (24) + next IFD (4).
    let data_offset = 8 + 2 + 2 * 12 + 4;

    let mut b = b"II*\0".to_vec();
    b.extend_from_slice(&8u32.to_le_bytes());
    b.extend_from_slice(&2u16.to_le_bytes());

    b.extend_from_slice(&0x010Fu16.to_le_bytes());
    b.extend_from_slice(&2u16.to_le_bytes());
    b.extend_from_slice(&(make_bytes.len() as u32).to_le_bytes());
    b.extend_from_slice(&(data_offset as u32).to_le_bytes());

    b.extend_from_slice(&0x0112u16.to_le_bytes());
    b.extend_from_slice(&3u16.to_le_bytes());
    b.extend_from_slice(&1u32.to_le_bytes());
    b.extend_from_slice(&orientation.to_le_bytes());
    b.extend_from_slice(&[0, 0]);

    b.extend_from_slice(&0u32.to_le_bytes());
    b.extend_from_slice(&make_bytes);
    b
}

/// Insert an APP1 Exif segment right after SOI.
fn with_exif(jpeg: &[u8], block: &[u8]) -> Vec<u8> {
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((2 + 6 + block.len()) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(block);
    out.extend_from_slice(&jpeg[2..]);
    out
}

#[test]
fn red_png_to_webp() {
    agno::init();
    let tmp = TempDir::new().unwrap();
    let red = RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255]));
    let src = write_png(tmp.path(), "red.png", &red);

    let img = agno::load_image(&src).unwrap();
    assert_eq!(img.dimensions(), (100, 100));
    assert_eq!(img.len(), 100 * 100 * 4);

    let small = agno::resize_image(&img, 50, 50).unwrap();
    assert_eq!(small.dimensions(), (50, 50));
    assert!(small.as_bytes().chunks(4).all(|px| px == [255, 0, 0, 255]));
    // The source is untouched by resizing.
    assert_eq!(img.dimensions(), (100, 100));

    let out = tmp.path().join("red.webp");
    agno::write_webp(&out, &small).unwrap();
    let written = std::fs::read(&out).unwrap();
    assert_eq!(&written[0..4], b"RIFF");
    assert_eq!(&written[8..12], b"WEBP");

    assert!(matches!(
        agno::get_exif_value(&src, ORIENTATION),
        Err(Error::NoMetadata)
    ));

    agno::free_image(small);
    agno::free_image(img);
}

#[test]
fn default_webp_is_lossy_and_close() {
    agno::init();
    let tmp = TempDir::new().unwrap();
    let img = RgbaImage::from_pixel(40, 24, Rgba([30, 120, 220, 255]));
    let buf = agno::load_image(&write_png(tmp.path(), "blue.png", &img)).unwrap();

    let out = tmp.path().join("blue.webp");
    agno::write_webp(&out, &buf).unwrap();
    assert_eq!(&std::fs::read(&out).unwrap()[12..16], b"VP8 ");

    let back = agno::load_image(&out).unwrap();
    assert_eq!(back.dimensions(), (40, 24));
    for (got, want) in back.as_bytes().iter().zip(buf.as_bytes()) {
        assert!(got.abs_diff(*want) <= 12, "{got} vs {want}");
    }
}

#[test]
fn lossless_webp_output_round_trips() {
    agno::init();
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("agno.toml");
    std::fs::write(&config_path, "[encode]\nmode = \"lossless\"\n").unwrap();
    let pipeline = Pipeline::from_config_file(&config_path).unwrap();
    assert_eq!(pipeline.config().encode.mode, WebpMode::Lossless);

    let img = RgbaImage::from_fn(33, 17, |x, y| Rgba([x as u8 * 7, y as u8 * 13, 200, 255]));
    let buf = pipeline.load(&write_png(tmp.path(), "grad.png", &img)).unwrap();
    let out = tmp.path().join("grad.webp");
    pipeline.write_webp(&out, &buf).unwrap();

    let back = pipeline.load(&out).unwrap();
    assert_eq!(back, buf);
}

#[test]
fn bad_config_file_is_config_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("agno.toml");
    std::fs::write(&path, "[encode]\nmode = \"jpeg\"\n").unwrap();

    let err = Pipeline::from_config_file(&path).err().unwrap();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("TOML"), "{err}");
}

#[cfg(unix)]
#[test]
fn write_webp_keeps_permissions_of_replaced_file() {
    use std::os::unix::fs::PermissionsExt;
    agno::init();
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("shared.webp");
    std::fs::write(&out, b"old").unwrap();
    std::fs::set_permissions(&out, std::fs::Permissions::from_mode(0o644)).unwrap();

    let buf = agno::PixelBuffer::from_rgba(2, 2, vec![200; 16]).unwrap();
    agno::write_webp(&out, &buf).unwrap();
    let mode = std::fs::metadata(&out).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[test]
fn write_webp_overwrites_existing_file() {
    agno::init();
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out.webp");
    std::fs::write(&out, b"stale").unwrap();

    let buf = agno::PixelBuffer::from_rgba(2, 2, vec![9; 16]).unwrap();
    agno::write_webp(&out, &buf).unwrap();
    assert_eq!(&std::fs::read(&out).unwrap()[0..4], b"RIFF");
}

#[test]
fn resize_is_deterministic_and_exact() {
    agno::init();
    let tmp = TempDir::new().unwrap();
    let img = RgbaImage::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, 0, 255]));
    let src = agno::load_image(&write_png(tmp.path(), "g.png", &img)).unwrap();

    let a = agno::resize_image(&src, 200, 30).unwrap();
    let b = agno::resize_image(&src, 200, 30).unwrap();
    assert_eq!(a.dimensions(), (200, 30));
    assert_eq!(a, b);
}

#[test]
fn resize_rejects_zero_dimensions() {
    agno::init();
    let buf = agno::PixelBuffer::from_rgba(4, 4, vec![0; 64]).unwrap();
    assert!(matches!(
        agno::resize_image(&buf, 0, 10),
        Err(Error::InvalidDimensions { .. })
    ));
    assert!(matches!(
        agno::resize_image(&buf, 10, 0),
        Err(Error::InvalidDimensions { .. })
    ));
    assert!(matches!(
        agno::resize_image(&buf, u32::MAX, u32::MAX),
        Err(Error::InvalidDimensions { .. })
    ));
}

#[test]
fn load_errors_are_typed() {
    agno::init();
    let tmp = TempDir::new().unwrap();

    let missing = tmp.path().join("nope.png");
    assert!(matches!(agno::load_image(&missing), Err(Error::Io { .. })));

    let text = tmp.path().join("notes.png");
    std::fs::write(&text, "definitely not a PNG").unwrap();
    assert!(matches!(agno::load_image(&text), Err(Error::Decode(_))));
}

#[test]
fn exif_lookup_in_jpeg() {
    agno::init();
    let jpeg = with_exif(&jpeg_bytes(40, 20), &exif_block("Nikon", 6));

    let make = agno::get_exif_value(&jpeg, MAKE).unwrap();
    assert_eq!(make.type_code(), 2);
    assert_eq!(make.data(), b"Nikon\0");
    assert_eq!(make.len(), 6);

    let orientation = agno::get_exif_value(&jpeg, ORIENTATION).unwrap();
    assert_eq!(orientation.type_code(), 3);
    assert_eq!(orientation.decode(), TagValue::Short(vec![6]));

    assert!(matches!(
        agno::get_exif_value(&jpeg, 0x0110),
        Err(Error::TagNotFound { tag: 0x0110 })
    ));
}

#[test]
fn exif_lookup_from_path_matches_bytes() {
    agno::init();
    let tmp = TempDir::new().unwrap();
    let jpeg = with_exif(&jpeg_bytes(8, 8), &exif_block("Olympus", 1));
    let path = tmp.path().join("cam.jpg");
    std::fs::write(&path, &jpeg).unwrap();

    let from_path = agno::get_exif_value(&path, MAKE).unwrap();
    let from_bytes = agno::get_exif_value(&jpeg, MAKE).unwrap();
    assert_eq!(from_path, from_bytes);

    assert!(matches!(
        agno::get_exif_value(&tmp.path().join("missing.jpg"), MAKE),
        Err(Error::Io { .. })
    ));
}

#[test]
fn jpeg_with_exif_still_decodes() {
    agno::init();
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("rotated.jpg");
    std::fs::write(&path, with_exif(&jpeg_bytes(40, 20), &exif_block("Sony", 6))).unwrap();

    // Orientation is ignored by default...
    assert_eq!(agno::load_image(&path).unwrap().dimensions(), (40, 20));

    // ...and applied when configured.
    let mut config = PipelineConfig::default();
    config.decode.auto_orient = true;
    let pipeline = Pipeline::new(config);
    assert_eq!(pipeline.load(&path).unwrap().dimensions(), (20, 40));
}

#[test]
fn truncated_inputs_return_errors() {
    agno::init();
    let jpeg = with_exif(&jpeg_bytes(16, 16), &exif_block("Pentax", 3));
    let pipeline: Pipeline = Pipeline::default();

    for len in 0..jpeg.len() {
        let prefix = &jpeg[..len];
        // Any outcome is fine as long as it is a value, not a panic.
        let _ = agno::get_exif_value(prefix, MAKE);
        let _ = pipeline.decode(prefix);
    }
}

#[test]
fn corrupted_exif_offsets_are_decode_errors() {
    agno::init();
    let mut block = exif_block("Canon", 1);
    // Point Make's value far outside the block.
    block[18..22].copy_from_slice(&0x00FF_FFFFu32.to_le_bytes());
    let jpeg = with_exif(&jpeg_bytes(8, 8), &block);

    assert!(matches!(
        agno::get_exif_value(&jpeg, MAKE),
        Err(Error::Decode(_))
    ));
    // Other tags stay readable.
    assert!(agno::get_exif_value(&jpeg, ORIENTATION).is_ok());
}
