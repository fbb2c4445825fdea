// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles still capture from the live stream and file import into the
//! collection.

use crate::app::state::{CameraEvent, CameraModel};
use crate::backends::camera::MediaSource;
use crate::errors::{AppResult, PhotoError};
use crate::feedback::FeedbackCue;
use crate::gallery::CapturedImage;
use crate::import::{self, ImportedFile};
use crate::pipelines::photo::Orientation;
use std::path::PathBuf;
use tracing::{info, warn};

impl<S: MediaSource> CameraModel<S> {
    // =========================================================================
    // Capture Operations Handlers
    // =========================================================================

    /// Capture the current frame and add it to the collection
    ///
    /// Returns the encoded payload. The raster keeps the negotiated stream
    /// size; use [`capture_oriented`](Self::capture_oriented) to match the
    /// device orientation instead.
    pub fn capture(&mut self) -> AppResult<String> {
        self.capture_with(None)
    }

    /// Capture, swapping the raster size when the stream orientation
    /// disagrees with `orientation`
    pub fn capture_oriented(&mut self, orientation: Orientation) -> AppResult<String> {
        self.capture_with(Some(orientation))
    }

    fn capture_with(&mut self, orientation: Option<Orientation>) -> AppResult<String> {
        let Some(frame) = self.session.current_frame() else {
            warn!("No frame available to capture");
            return Err(PhotoError::NoFrameAvailable.into());
        };
        if self.gallery.has_reached_limit() {
            info!(max = self.gallery.max_images(), "Capturing past the image limit");
        }

        let image = self.capture.capture(
            &mut self.raster,
            &frame,
            self.session.negotiated(),
            self.session.is_mirrored(),
            orientation,
        )?;
        self.feedback.notify(FeedbackCue::CaptureFlash);

        let payload = image.payload().to_string();
        self.gallery.add(image);
        self.emit(CameraEvent::Capture {
            payload: payload.clone(),
        });
        Ok(payload)
    }

    /// Add picked files to the collection
    ///
    /// Nothing is added if no files were picked or any of them is not an
    /// image.
    pub fn import_files(&mut self, files: Vec<ImportedFile>) -> AppResult<Vec<CapturedImage>> {
        let images = import::import(files, self.capture.keys_mut())?;
        for image in &images {
            self.gallery.add(image.clone());
        }
        info!(added = images.len(), total = self.gallery.len(), "Import complete");
        Ok(images)
    }

    /// Read files from disk and import them
    pub async fn import_paths(&mut self, paths: &[PathBuf]) -> AppResult<Vec<CapturedImage>> {
        let files = import::read_files(paths).await?;
        self.import_files(files)
    }
}
