// SPDX-License-Identifier: GPL-3.0-only

//! QR code decoding
//!
//! Decoders take a raw RGBA buffer and its dimensions and return the text
//! of one QR symbol, if any. [`RqrrDecoder`] converts to luma and runs
//! the rqrr grid detector.

use tracing::trace;

/// Pure function from RGBA pixels to an optional decoded payload
pub trait QrDecoder {
    /// Locate and decode one QR symbol in `pixels` (`width * height * 4`
    /// RGBA bytes)
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String>;
}

impl<F> QrDecoder for F
where
    F: Fn(&[u8], u32, u32) -> Option<String>,
{
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String> {
        self(pixels, width, height)
    }
}

/// QR decoder backed by rqrr
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String> {
        let luma = rgba_to_luma(pixels, width, height)?;
        let w = width as usize;

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(w, height as usize, |x, y| luma[y * w + x]);
        let grids = prepared.detect_grids();
        trace!(count = grids.len(), "QR grids located");

        for grid in grids {
            match grid.decode() {
                Ok((_meta, content)) => return Some(content),
                Err(e) => trace!(error = ?e, "QR grid failed to decode"),
            }
        }
        None
    }
}

/// Convert tightly packed RGBA to 8-bit luma (BT.601 weights)
///
/// Returns `None` when the buffer does not hold `width * height` pixels.
fn rgba_to_luma(pixels: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let count = width as usize * height as usize;
    if count == 0 || pixels.len() < count * 4 {
        trace!(
            len = pixels.len(),
            width,
            height,
            "Pixel buffer too small for dimensions"
        );
        return None;
    }

    Some(
        pixels
            .chunks_exact(4)
            .take(count)
            .map(|px| {
                let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
                ((r * 299 + g * 587 + b * 114) / 1000) as u8
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_to_luma_weights() {
        let pixels = [
            255, 255, 255, 255, // white
            0, 0, 0, 255, // black
            255, 0, 0, 255, // red
        ];
        let luma = rgba_to_luma(&pixels, 3, 1).unwrap();
        assert_eq!(luma, vec![255, 0, 76]);
    }

    #[test]
    fn test_short_buffer_decodes_nothing() {
        assert!(rgba_to_luma(&[0; 12], 2, 2).is_none());
        assert_eq!(RqrrDecoder::new().decode(&[0; 12], 2, 2), None);
        assert_eq!(RqrrDecoder::new().decode(&[], 0, 0), None);
    }

    #[test]
    fn test_blank_frame_has_no_code() {
        let pixels = vec![255u8; 64 * 64 * 4];
        assert_eq!(RqrrDecoder::new().decode(&pixels, 64, 64), None);
    }

    /// White `width` x `height` RGBA canvas with `text` encoded in the
    /// middle, 8 pixels per module
    fn qr_canvas(text: &str, width: u32, height: u32) -> Vec<u8> {
        let code = qrcode::QrCode::new(text).unwrap();
        let modules = code.width() as u32;
        let scale = 8;
        let left = (width - modules * scale) / 2;
        let top = (height - modules * scale) / 2;

        let mut pixels = vec![255u8; (width * height * 4) as usize];
        for (i, color) in code.to_colors().into_iter().enumerate() {
            if color != qrcode::Color::Dark {
                continue;
            }
            let (mx, my) = (i as u32 % modules, i as u32 / modules);
            for y in 0..scale {
                for x in 0..scale {
                    let offset = ((top + my * scale + y) * width + left + mx * scale + x) * 4;
                    pixels[offset as usize..offset as usize + 3].fill(0);
                }
            }
        }
        pixels
    }

    #[test]
    fn test_decodes_real_symbol() {
        let pixels = qr_canvas("https://example.com/ticket/42", 400, 300);
        assert_eq!(
            RqrrDecoder::new().decode(&pixels, 400, 300),
            Some("https://example.com/ticket/42".to_string())
        );
    }

    #[test]
    fn test_closure_decoder() {
        let decoder = |_: &[u8], w: u32, h: u32| Some(format!("{}x{}", w, h));
        assert_eq!(decoder.decode(&[], 3, 4), Some("3x4".to_string()));
    }
}
