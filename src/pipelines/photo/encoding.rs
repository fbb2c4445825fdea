// SPDX-License-Identifier: GPL-3.0-only

//! Still image encoding
//!
//! Encodes an RGBA raster to one of:
//! - PNG (lossless, also the fallback for unknown types)
//! - JPEG (with quality control)
//! - WebP (lossless)
//!
//! and wraps the bytes in a base64 `data:` URI.

use crate::errors::PhotoError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use tracing::{debug, warn};

/// Supported output types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageType {
    /// PNG (lossless)
    #[default]
    Png,
    /// JPEG (lossy)
    Jpeg,
    /// WebP (lossless)
    Webp,
}

impl ImageType {
    /// Resolve a MIME type; unknown types fall back to PNG
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => ImageType::Png,
            "image/jpeg" | "image/jpg" => ImageType::Jpeg,
            "image/webp" => ImageType::Webp,
            other => {
                warn!(mime = other, "Unsupported image type, falling back to PNG");
                ImageType::Png
            }
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageType::Png => "image/png",
            ImageType::Jpeg => "image/jpeg",
            ImageType::Webp => "image/webp",
        }
    }

    /// File extension for this type
    pub fn extension(&self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpeg => "jpg",
            ImageType::Webp => "webp",
        }
    }
}

/// Raster to data URI encoder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoEncoder {
    image_type: ImageType,
    quality: f32,
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new(ImageType::default(), crate::constants::defaults::IMAGE_QUALITY)
    }
}

impl PhotoEncoder {
    /// `quality` is clamped into 0..=1 and only affects JPEG
    pub fn new(image_type: ImageType, quality: f32) -> Self {
        let quality = if quality.is_finite() {
            quality.clamp(0.0, 1.0)
        } else {
            crate::constants::defaults::IMAGE_QUALITY
        };
        Self {
            image_type,
            quality,
        }
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// JPEG quality value (1-100)
    pub fn jpeg_quality(&self) -> u8 {
        ((self.quality * 100.0).round() as u8).clamp(1, 100)
    }

    /// Encode the raster to bytes in the configured type
    pub fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, PhotoError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        match self.image_type {
            ImageType::Png => image
                .write_to(&mut cursor, ImageFormat::Png)
                .map_err(|e| PhotoError::EncodingFailed(format!("PNG encoding failed: {}", e)))?,
            ImageType::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut cursor,
                    self.jpeg_quality(),
                );
                rgb.write_with_encoder(encoder).map_err(|e| {
                    PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e))
                })?;
            }
            ImageType::Webp => image
                .write_to(&mut cursor, ImageFormat::WebP)
                .map_err(|e| PhotoError::EncodingFailed(format!("WebP encoding failed: {}", e)))?,
        }

        debug!(
            size = buffer.len(),
            format = ?self.image_type,
            width = image.width(),
            height = image.height(),
            "Encoding complete"
        );
        Ok(buffer)
    }

    /// Encode the raster and wrap it in a base64 data URI
    pub fn encode_data_uri(&self, image: &RgbaImage) -> Result<String, PhotoError> {
        let bytes = self.encode(image)?;
        Ok(to_data_uri(self.image_type.mime(), &bytes))
    }
}

/// Build a base64 data URI
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URI into its MIME type and decoded bytes
pub fn parse_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}
