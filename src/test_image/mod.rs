//! Test image generation.
//!
//! Produces small encoded images with a recognisable pattern so tests can
//! exercise real format sniffing without fixture files on disk.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Pixel pattern: red follows x, green follows y, blue is a 4px checkerboard.
fn pattern(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let fx = x as f32 / width.max(1) as f32;
        let fy = y as f32 / height.max(1) as f32;
        let checker = ((x / 4) + (y / 4)) % 2 == 0;
        Rgb([
            (fx * 255.0) as u8,
            (fy * 255.0) as u8,
            if checker { 200 } else { 40 },
        ])
    })
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(pattern(width, height))
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encoding an in-memory test image");
    bytes
}

/// PNG-encoded test image.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// JPEG-encoded test image.
pub fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}
