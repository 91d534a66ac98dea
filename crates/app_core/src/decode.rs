//! Image decoding and thumbnail scaling

use crate::AppError;
use image::{GenericImageView, ImageReader};
use std::io::Cursor;
use xxhash_rust::xxh3::xxh3_64;

/// Decoded RGBA8 raster
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub hash: u64,
}

/// Decode capability injected into the directory loader.
///
/// Malformed input is a normal outcome: implementations return an error,
/// never panic, and the loader skips the file.
pub trait ThumbnailDecoder: Send + Sync {
    /// Decode raw file bytes and scale so the longest edge is at most `max_edge`
    fn decode(&self, bytes: &[u8], max_edge: u32) -> Result<Raster, AppError>;
}

/// Decoder backed by the `image` crate
#[derive(Debug, Default)]
pub struct ImageDecoder;

impl ImageDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ThumbnailDecoder for ImageDecoder {
    fn decode(&self, bytes: &[u8], max_edge: u32) -> Result<Raster, AppError> {
        let hash = xxh3_64(bytes);

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| AppError::ImageDecode(e.to_string()))?;

        let img = reader
            .decode()
            .map_err(|e| AppError::ImageDecode(e.to_string()))?;

        let (w, h) = img.dimensions();
        let img = if w > max_edge || h > max_edge {
            img.thumbnail(max_edge, max_edge)
        } else {
            img
        };

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Raster {
            width,
            height,
            data: rgba.into_raw(),
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_and_scales_to_edge() {
        let decoder = ImageDecoder::new();
        let raster = decoder.decode(&png_bytes(300, 150), 150).unwrap();

        assert_eq!(raster.width, 150);
        assert_eq!(raster.height, 75);
        assert_eq!(raster.data.len(), (150 * 75 * 4) as usize);
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let decoder = ImageDecoder::new();
        let raster = decoder.decode(&png_bytes(40, 20), 150).unwrap();

        assert_eq!((raster.width, raster.height), (40, 20));
    }

    #[test]
    fn malformed_bytes_are_an_error_not_a_panic() {
        let decoder = ImageDecoder::new();
        assert!(matches!(
            decoder.decode(b"definitely not an image", 150),
            Err(AppError::ImageDecode(_))
        ));
    }
}
