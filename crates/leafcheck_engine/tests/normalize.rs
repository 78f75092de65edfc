use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use leafcheck_engine::{
    normalize_payload, NormalizeError, NormalizeSettings, NORMALIZED_IMAGE_MEDIA_TYPE,
};
use pretty_assertions::assert_eq;

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 160, 60]))),
        ImageFormat::Png,
    )
}

fn decode_output(data: &str) -> (ImageFormat, DynamicImage) {
    let bytes = STANDARD.decode(data).unwrap();
    let format = image::guess_format(&bytes).unwrap();
    (format, image::load_from_memory(&bytes).unwrap())
}

#[test]
fn wide_image_is_bounded_and_keeps_aspect_ratio() {
    let payload =
        normalize_payload(&png(3000, 2000), "image/png", &NormalizeSettings::default()).unwrap();

    assert_eq!(payload.mime_type, NORMALIZED_IMAGE_MEDIA_TYPE);
    let (format, image) = decode_output(&payload.data);
    assert_eq!(format, ImageFormat::Jpeg);
    assert_eq!(image.dimensions(), (1024, 683));
}

#[test]
fn tall_image_is_bounded_by_height() {
    let payload =
        normalize_payload(&png(600, 1800), "image/png", &NormalizeSettings::default()).unwrap();

    let (_, image) = decode_output(&payload.data);
    let (width, height) = image.dimensions();
    assert_eq!(height, 1024);
    let expected_width = 600.0 * 1024.0 / 1800.0;
    assert!((f64::from(width) - expected_width).abs() <= 1.0);
}

#[test]
fn small_image_keeps_size_but_becomes_jpeg() {
    let payload =
        normalize_payload(&png(320, 240), "image/png", &NormalizeSettings::default()).unwrap();

    assert_eq!(payload.mime_type, "image/jpeg");
    let (format, image) = decode_output(&payload.data);
    assert_eq!(format, ImageFormat::Jpeg);
    assert_eq!(image.dimensions(), (320, 240));
}

#[test]
fn transparent_image_is_flattened() {
    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 32, Rgba([0, 200, 0, 128])));
    let payload = normalize_payload(
        &encode(rgba, ImageFormat::Png),
        "image/png",
        &NormalizeSettings::default(),
    )
    .unwrap();

    let (format, image) = decode_output(&payload.data);
    assert_eq!(format, ImageFormat::Jpeg);
    assert_eq!(image.dimensions(), (64, 32));
}

#[test]
fn custom_bound_is_honoured() {
    let settings = NormalizeSettings {
        max_dimension: 100,
        ..NormalizeSettings::default()
    };
    let payload = normalize_payload(&png(400, 200), "image/png", &settings).unwrap();

    let (_, image) = decode_output(&payload.data);
    assert_eq!(image.dimensions(), (100, 50));
}

#[test]
fn documents_pass_through_unchanged() {
    let pdf = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF".to_vec();
    let payload =
        normalize_payload(&pdf, "application/pdf", &NormalizeSettings::default()).unwrap();

    assert_eq!(payload.mime_type, "application/pdf");
    assert_eq!(STANDARD.decode(&payload.data).unwrap(), pdf);
}

#[test]
fn malformed_image_fails_to_decode() {
    let err = normalize_payload(b"not an image", "image/jpeg", &NormalizeSettings::default())
        .unwrap_err();

    assert!(matches!(err, NormalizeError::Decode(_)));
}

#[test]
fn empty_input_is_a_read_failure() {
    let err = normalize_payload(&[], "application/pdf", &NormalizeSettings::default()).unwrap_err();

    assert_eq!(err, NormalizeError::Read);
}
