// SPDX-License-Identifier: GPL-3.0-only

//! Camera control handlers
//!
//! Handles enumeration, playback, renegotiation, torch and the per-frame
//! scan tick.

use crate::app::frame_processor::ScanEvent;
use crate::app::state::{CameraEvent, CameraModel};
use crate::backends::camera::types::{FacingMode, Resolution};
use crate::backends::camera::MediaSource;
use crate::errors::AppResult;
use tracing::{debug, info, trace};

impl<S: MediaSource> CameraModel<S> {
    // =========================================================================
    // Camera Control Handlers
    // =========================================================================

    /// Enumerate cameras, then start playing if autoplay is configured
    pub async fn init(&mut self) -> AppResult<()> {
        let count = self.session.refresh_cameras(&self.source).await?.len();
        info!(cameras = count, autoplay = self.config.autoplay, "Camera model initialized");
        if self.config.autoplay {
            self.play().await?;
        }
        Ok(())
    }

    /// Start the selected camera
    pub async fn play(&mut self) -> AppResult<()> {
        self.reset_scan();
        self.session.play(&self.source).await?;
        Ok(())
    }

    /// Halt the stream; a no-op when already stopped
    pub fn stop(&mut self) {
        self.session.stop();
        self.reset_scan();
    }

    pub async fn toggle_video(&mut self) -> AppResult<()> {
        if self.session.is_playing() {
            self.stop();
            Ok(())
        } else {
            self.play().await
        }
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    /// Choose which enumerated camera the next `play` opens
    pub fn select_camera(&mut self, index: usize) -> AppResult<()> {
        self.session.select_camera(index)?;
        Ok(())
    }

    /// Switch to the next enumerated camera
    pub async fn toggle_camera(&mut self) -> AppResult<()> {
        self.reset_scan();
        self.session.cycle_camera(&self.source).await?;
        Ok(())
    }

    pub async fn toggle_facing_mode(&mut self) -> AppResult<()> {
        self.reset_scan();
        self.session.toggle_facing_mode(&self.source).await?;
        Ok(())
    }

    pub async fn set_facing_mode(&mut self, facing_mode: FacingMode) -> AppResult<()> {
        self.reset_scan();
        self.session.set_facing_mode(&self.source, facing_mode).await?;
        Ok(())
    }

    /// Restart with a new resolution hint
    ///
    /// Ignored while scanning, which always runs at the smallest size.
    pub async fn set_resolution(&mut self, resolution: Resolution) -> AppResult<()> {
        if self.scanner.is_some() {
            debug!(resolution = %resolution, "Resolution is fixed while scanning");
            return Ok(());
        }
        self.session.set_resolution(&self.source, resolution).await?;
        Ok(())
    }

    /// Flip the torch; returns the resulting state
    pub fn toggle_torch(&mut self) -> bool {
        self.session.toggle_torch()
    }

    pub fn torch_supported(&self) -> bool {
        self.session.capability().torch_supported
    }

    // =========================================================================
    // Frame Handlers
    // =========================================================================

    /// Called once per presented video frame
    ///
    /// Runs one scan tick in QR mode and emits a [`CameraEvent::Scan`] for
    /// every new payload. Does nothing while stopped.
    pub fn on_playback_progress(&mut self) -> Option<ScanEvent> {
        if !self.session.is_playing() {
            return None;
        }
        let scanner = self.scanner.as_mut()?;
        let Some(frame) = self.session.current_frame() else {
            trace!("No frame presented yet");
            return None;
        };

        let event = scanner.tick(&mut self.raster, &frame, self.decoder.as_ref())?;
        info!(content = %event.code_data, "QR code emitted");
        self.emit(CameraEvent::Scan(event.clone()));
        Some(event)
    }

    fn reset_scan(&mut self) {
        if let Some(scanner) = self.scanner.as_mut() {
            scanner.reset();
        }
    }
}
