//! Test fixtures: in-memory images and multipart bodies.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Boundary used by every multipart body built here
pub const BOUNDARY: &str = "----cartoonify-test-boundary";

/// Small scene with flat regions and hard boundaries
pub fn scene(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let cx = x as i64 - width as i64 / 2;
        let cy = y as i64 - height as i64 / 2;
        let r = (width.min(height) / 4) as i64;
        if cx * cx + cy * cy < r * r {
            Rgb([230, 180, 40])
        } else if y > height * 2 / 3 {
            Rgb([50, 120, 60])
        } else {
            Rgb([110, 170, 230])
        }
    })
}

/// Encode an image in memory
pub fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut buf, format)
        .expect("Failed to encode test image");
    buf.into_inner()
}

pub fn scene_png(width: u32, height: u32) -> Vec<u8> {
    encode(&scene(width, height), ImageFormat::Png)
}

pub fn scene_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&scene(width, height), ImageFormat::Jpeg)
}

/// Parameters that keep pipeline runs quick in tests
pub const FAST_PARAMS: &[(&str, &str)] = &[
    ("blur_type", "median"),
    ("quantizer", "mediancut"),
    ("target_long_side", "256"),
];

/// One part of a multipart form
pub struct Part {
    name: String,
    file_name: Option<String>,
    data: Vec<u8>,
}

impl Part {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: None,
            data: value.as_bytes().to_vec(),
        }
    }

    pub fn file(name: &str, file_name: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            file_name: Some(file_name.to_string()),
            data,
        }
    }
}

/// Build a `multipart/form-data` body delimited by [`BOUNDARY`]
pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match &part.file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
