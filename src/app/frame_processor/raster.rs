// SPDX-License-Identifier: GPL-3.0-only

//! Off-screen raster buffer
//!
//! Draws a video frame at a target size, optionally through a horizontal
//! flip, and exposes the resulting RGBA pixels. One buffer is shared by the
//! scan loop and still capture; each draw fully replaces the contents.

use crate::backends::camera::types::{CameraFrame, Resolution};
use crate::errors::PhotoError;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, RgbaImage};
use tracing::trace;

/// RGBA drawing surface
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    image: RgbaImage,
}

impl RasterBuffer {
    /// Create a blank buffer of the given size
    pub fn new(size: Resolution) -> Self {
        Self {
            image: RgbaImage::new(size.width(), size.height()),
        }
    }

    /// Draw `frame` scaled to `size`, mirrored horizontally when `mirror`
    /// is set
    pub fn draw(&mut self, frame: &CameraFrame, size: Resolution, mirror: bool) -> Result<(), PhotoError> {
        if !frame.is_well_formed() {
            return Err(PhotoError::InvalidFrame(format!(
                "{} bytes for {}x{} RGBA",
                frame.data.len(),
                frame.width,
                frame.height
            )));
        }

        let source: ImageBuffer<Rgba<u8>, &[u8]> =
            ImageBuffer::from_raw(frame.width, frame.height, &frame.data[..]).ok_or_else(|| {
                PhotoError::InvalidFrame("frame data does not match dimensions".to_string())
            })?;

        let mut image = if (frame.width, frame.height) == (size.width(), size.height()) {
            RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec()).ok_or_else(
                || PhotoError::InvalidFrame("frame data does not match dimensions".to_string()),
            )?
        } else {
            imageops::resize(&source, size.width(), size.height(), FilterType::Triangle)
        };

        if mirror {
            imageops::flip_horizontal_in_place(&mut image);
        }

        trace!(
            src_width = frame.width,
            src_height = frame.height,
            width = size.width(),
            height = size.height(),
            mirror,
            "Frame drawn into raster"
        );

        self.image = image;
        Ok(())
    }

    /// Raw RGBA pixels, `width * height * 4` bytes
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pixel_frame() -> CameraFrame {
        CameraFrame::from_rgba(
            2,
            1,
            vec![
                255, 0, 0, 255, // red
                0, 0, 255, 255, // blue
            ],
        )
    }

    #[test]
    fn test_draw_same_size_copies() {
        let mut raster = RasterBuffer::new(Resolution::new(1, 1).unwrap());
        let frame = two_pixel_frame();
        raster
            .draw(&frame, Resolution::new(2, 1).unwrap(), false)
            .unwrap();
        assert_eq!(raster.pixels(), &frame.data[..]);
        assert_eq!((raster.width(), raster.height()), (2, 1));
    }

    #[test]
    fn test_draw_mirrored_swaps_columns() {
        let mut raster = RasterBuffer::new(Resolution::new(2, 1).unwrap());
        raster
            .draw(&two_pixel_frame(), Resolution::new(2, 1).unwrap(), true)
            .unwrap();
        assert_eq!(&raster.pixels()[0..4], &[0, 0, 255, 255]);
        assert_eq!(&raster.pixels()[4..8], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_draw_scales_to_target() {
        let mut raster = RasterBuffer::new(Resolution::new(1, 1).unwrap());
        let frame = CameraFrame::from_rgba(4, 4, vec![200; 64]);
        raster
            .draw(&frame, Resolution::new(2, 3).unwrap(), false)
            .unwrap();
        assert_eq!(raster.pixels().len(), 2 * 3 * 4);
        assert!(raster.pixels().iter().all(|&v| (199..=201).contains(&v)));
    }

    #[test]
    fn test_draw_rejects_short_frame() {
        let mut raster = RasterBuffer::new(Resolution::new(2, 1).unwrap());
        let frame = CameraFrame::from_rgba(2, 2, vec![0; 8]);
        let err = raster
            .draw(&frame, Resolution::new(2, 2).unwrap(), false)
            .unwrap_err();
        assert!(matches!(err, PhotoError::InvalidFrame(_)));
    }
}
