// SPDX-License-Identifier: GPL-3.0-only

//! Still capture from the live stream
//!
//! A capture draws the current frame into the raster at the negotiated track
//! size, flips it when the stream is mirrored, encodes it and wraps the
//! result with a fresh object key.

use super::encoding::PhotoEncoder;
use crate::app::frame_processor::raster::RasterBuffer;
use crate::backends::camera::types::{CameraFrame, Resolution, TrackSettings};
use crate::errors::PhotoError;
use crate::gallery::{CapturedImage, ObjectKey};
use tracing::{debug, info};

/// Device orientation supplied by the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Orientation of a viewport: landscape when wider than tall
    pub fn of_viewport(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Raster size for a capture
///
/// Uses the negotiated track size, falling back per side to `fallback`.
/// When an orientation is given and the stream's orientation disagrees with
/// it, width and height are swapped.
pub fn capture_size(
    negotiated: Option<TrackSettings>,
    fallback: Resolution,
    orientation: Option<Orientation>,
) -> Resolution {
    let settings = negotiated.unwrap_or_default();
    let width = settings.width.filter(|w| *w > 0).unwrap_or(fallback.width());
    let height = settings.height.filter(|h| *h > 0).unwrap_or(fallback.height());
    let size = Resolution::new(width, height).unwrap_or(fallback);

    match orientation {
        Some(Orientation::Landscape) if size.is_portrait() => size.swapped(),
        Some(Orientation::Portrait) if size.width() > size.height() => size.swapped(),
        _ => size,
    }
}

/// Time-derived unique keys
///
/// Keys are `<unix millis>-<sequence>`. Several keys within the same
/// millisecond get increasing sequence numbers, and a clock that steps
/// backwards never produces a key that sorts before the previous one.
#[derive(Debug, Clone, Default)]
pub struct ObjectKeyGenerator {
    last_millis: i64,
    sequence: u32,
}

impl ObjectKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next key for the current wall-clock time
    pub fn next_key(&mut self) -> ObjectKey {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    /// Next key for a given timestamp
    pub fn next_at(&mut self, millis: i64) -> ObjectKey {
        if millis > self.last_millis {
            self.last_millis = millis;
            self.sequence = 0;
        } else {
            self.sequence += 1;
        }
        ObjectKey::new(format!("{}-{:04}", self.last_millis, self.sequence))
    }
}

/// Produces captured images from live frames
#[derive(Debug, Clone)]
pub struct CaptureEngine {
    encoder: PhotoEncoder,
    fallback: Resolution,
    keys: ObjectKeyGenerator,
}

impl CaptureEngine {
    /// `fallback` is used when the track does not report its size
    pub fn new(encoder: PhotoEncoder, fallback: Resolution) -> Self {
        Self {
            encoder,
            fallback,
            keys: ObjectKeyGenerator::new(),
        }
    }

    pub fn encoder(&self) -> &PhotoEncoder {
        &self.encoder
    }

    /// Key generator shared with file import
    pub fn keys_mut(&mut self) -> &mut ObjectKeyGenerator {
        &mut self.keys
    }

    /// Capture `frame` into a new image
    ///
    /// `mirror` flips the raster horizontally; `orientation` requests the
    /// orientation-aware size swap.
    pub fn capture(
        &mut self,
        raster: &mut RasterBuffer,
        frame: &CameraFrame,
        negotiated: Option<TrackSettings>,
        mirror: bool,
        orientation: Option<Orientation>,
    ) -> Result<CapturedImage, PhotoError> {
        let size = capture_size(negotiated, self.fallback, orientation);
        debug!(
            width = size.width(),
            height = size.height(),
            mirror,
            ?orientation,
            "Capturing frame"
        );

        raster.draw(frame, size, mirror)?;
        let payload = self.encoder.encode_data_uri(raster.image())?;
        let key = self.keys.next_key();

        info!(key = %key, bytes = payload.len(), "Photo captured");
        Ok(CapturedImage::new(payload, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::photo::encoding::{ImageType, parse_data_uri};

    fn fallback() -> Resolution {
        Resolution::new(320, 500).unwrap()
    }

    #[test]
    fn test_capture_size_prefers_negotiated() {
        let settings = TrackSettings {
            width: Some(1280),
            height: Some(720),
            frame_rate: None,
        };
        assert_eq!(
            capture_size(Some(settings), fallback(), None),
            Resolution::new(1280, 720).unwrap()
        );
        assert_eq!(capture_size(None, fallback(), None), fallback());

        let partial = TrackSettings {
            width: Some(640),
            height: None,
            frame_rate: None,
        };
        assert_eq!(
            capture_size(Some(partial), fallback(), None),
            Resolution::new(640, 500).unwrap()
        );
    }

    #[test]
    fn test_capture_size_orientation_swap() {
        let portrait = TrackSettings {
            width: Some(720),
            height: Some(1280),
            frame_rate: None,
        };
        assert_eq!(
            capture_size(Some(portrait), fallback(), Some(Orientation::Landscape)),
            Resolution::new(1280, 720).unwrap()
        );
        assert_eq!(
            capture_size(Some(portrait), fallback(), Some(Orientation::Portrait)),
            Resolution::new(720, 1280).unwrap()
        );
        assert_eq!(
            capture_size(Some(portrait), fallback(), None),
            Resolution::new(720, 1280).unwrap()
        );
    }

    #[test]
    fn test_viewport_orientation() {
        assert_eq!(Orientation::of_viewport(800, 600), Orientation::Landscape);
        assert_eq!(Orientation::of_viewport(600, 800), Orientation::Portrait);
    }

    #[test]
    fn test_keys_unique_within_millisecond() {
        let mut keys = ObjectKeyGenerator::new();
        let a = keys.next_at(1_000);
        let b = keys.next_at(1_000);
        let c = keys.next_at(999);
        let d = keys.next_at(1_001);
        assert_eq!(a.as_str(), "1000-0000");
        assert_eq!(b.as_str(), "1000-0001");
        assert_eq!(c.as_str(), "1000-0002");
        assert_eq!(d.as_str(), "1001-0000");
    }

    #[test]
    fn test_capture_mirrors_when_asked() {
        let frame = CameraFrame::from_rgba(
            2,
            1,
            vec![
                255, 0, 0, 255, // red
                0, 255, 0, 255, // green
            ],
        );
        let settings = Some(TrackSettings {
            width: Some(2),
            height: Some(1),
            frame_rate: None,
        });
        let mut engine = CaptureEngine::new(PhotoEncoder::new(ImageType::Png, 1.0), fallback());
        let mut raster = RasterBuffer::new(fallback());

        let plain = engine
            .capture(&mut raster, &frame, settings, false, None)
            .unwrap();
        let mirrored = engine
            .capture(&mut raster, &frame, settings, true, None)
            .unwrap();
        assert_ne!(plain.key(), mirrored.key());

        let decode = |image: &CapturedImage| {
            let (_, bytes) = parse_data_uri(image.payload()).unwrap();
            image::load_from_memory(&bytes).unwrap().to_rgba8().into_raw()
        };
        assert_eq!(decode(&plain), vec![255, 0, 0, 255, 0, 255, 0, 255]);
        assert_eq!(decode(&mirrored), vec![0, 255, 0, 255, 255, 0, 0, 255]);
    }
}
