//! Test fixtures: generated images and hand-built multipart bodies.

use std::io::Cursor;

use axum_test::multipart::{MultipartForm, Part};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

pub const BOUNDARY: &str = "thumbnailer-test-boundary";

pub fn solid_image(width: u32, height: u32, color: [u8; 3], format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture image");
    buffer
}

pub fn red_png(width: u32, height: u32) -> Vec<u8> {
    solid_image(width, height, [255, 0, 0], ImageFormat::Png)
}

pub fn blue_png(width: u32, height: u32) -> Vec<u8> {
    solid_image(width, height, [0, 0, 255], ImageFormat::Png)
}

/// Single-file form, the way a browser sends it
pub fn file_form(field: &str, file_name: &str, mime: &str, data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime.to_string());
    MultipartForm::new().add_part(field.to_string(), part)
}

pub fn image_form(data: Vec<u8>) -> MultipartForm {
    file_form("image", "upload.png", "image/png", data)
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Opening of a file part, without the closing boundary
pub fn raw_file_part_head(field: &str, file_name: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes()
}

pub fn raw_text_part(field: &str, value: &str) -> Vec<u8> {
    format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n")
        .into_bytes()
}

pub fn raw_closing() -> Vec<u8> {
    format!("--{BOUNDARY}--\r\n").into_bytes()
}

/// Decode the JPEG carried in an `imageUrl` data URL
pub fn decode_data_url(url: &str) -> Vec<u8> {
    let payload = url
        .strip_prefix("data:image/jpeg;base64,")
        .expect("imageUrl is not a JPEG data URL");
    STANDARD.decode(payload).expect("imageUrl payload is not base64")
}
