// SPDX-License-Identifier: GPL-3.0-only

//! Continuous QR scanning
//!
//! One tick per presented video frame: draw the frame into the shared
//! raster, read the pixels back, decode, and emit only payloads that differ
//! from the last emission. Per-frame failures are skipped silently, and a
//! decoder that panics only costs the frame it panicked on.

use super::qr_detector::QrDecoder;
use crate::app::frame_processor::raster::RasterBuffer;
use crate::app::frame_processor::types::{ScanEvent, ScanState};
use crate::backends::camera::types::{CameraFrame, Resolution};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, trace, warn};

/// QR scan loop state
#[derive(Debug, Clone)]
pub struct ScanLoop {
    resolution: Resolution,
    state: ScanState,
}

impl ScanLoop {
    /// Scan at `resolution`; the raster is redrawn at this size every tick
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            state: ScanState::default(),
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Process one presented frame
    pub fn tick(
        &mut self,
        raster: &mut RasterBuffer,
        frame: &CameraFrame,
        decoder: &dyn QrDecoder,
    ) -> Option<ScanEvent> {
        let detection = match raster.draw(frame, self.resolution, false) {
            Ok(()) => {
                let (pixels, width, height) = (raster.pixels(), raster.width(), raster.height());
                match catch_unwind(AssertUnwindSafe(|| decoder.decode(pixels, width, height))) {
                    Ok(detection) => detection,
                    Err(_) => {
                        warn!(width, height, "QR decoder panicked, skipping frame");
                        None
                    }
                }
            }
            Err(e) => {
                trace!(error = %e, "Skipping frame that could not be sampled");
                None
            }
        };

        let payload = self.state.observe(detection)?;
        debug!(content = %payload, "Detected QR code");
        Some(ScanEvent::qr(payload))
    }

    /// Forget the last emission
    pub fn reset(&mut self) {
        self.state.reset();
    }
}
