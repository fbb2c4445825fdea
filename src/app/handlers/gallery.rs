// SPDX-License-Identifier: GPL-3.0-only

//! Gallery handlers
//!
//! Preview selection, removal, submission and closing. Collection changes
//! are reported to the consumer with a snapshot of the remaining images.

use crate::app::state::{CameraEvent, CameraModel};
use crate::backends::camera::MediaSource;
use crate::feedback::FeedbackCue;
use crate::gallery::{CapturedImage, CloseOutcome, ImageCollection, ObjectKey};
use tracing::{debug, info};

impl<S: MediaSource> CameraModel<S> {
    pub fn gallery(&self) -> &ImageCollection {
        &self.gallery
    }

    /// Images, newest first
    pub fn images(&self) -> Vec<CapturedImage> {
        self.gallery.snapshot()
    }

    pub fn selected(&self) -> Option<&CapturedImage> {
        self.gallery.selected()
    }

    /// Advisory: consumers should stop capturing and importing when true
    pub fn has_reached_limit(&self) -> bool {
        self.gallery.has_reached_limit()
    }

    /// Open `key` in the preview
    pub fn select(&mut self, key: &ObjectKey) -> bool {
        if !self.gallery.select(key) {
            return false;
        }
        debug!(key = %key, "Preview opened");
        self.feedback.notify(FeedbackCue::EnterPreview);
        true
    }

    /// Remove images by key and notify the consumer
    ///
    /// Unknown keys are ignored; when nothing was removed no event is sent.
    pub fn remove(&mut self, keys: &[ObjectKey]) -> Vec<CapturedImage> {
        let had_selection = self.gallery.selected().is_some();
        let removed = self.gallery.remove(keys);
        if removed.is_empty() {
            return removed;
        }

        if had_selection && self.gallery.selected().is_none() {
            self.feedback.notify(FeedbackCue::LeavePreview);
        }
        self.emit(CameraEvent::Remove {
            removed: removed.clone(),
            images: self.gallery.snapshot(),
            session: self.session_id,
        });
        removed
    }

    /// Hand the whole collection to the consumer; the collection is kept
    pub fn submit(&mut self) -> usize {
        let images = self.gallery.snapshot();
        let count = images.len();
        info!(count, "Submitting images");
        self.emit(CameraEvent::Submit {
            images,
            session: self.session_id,
        });
        count
    }

    /// Dismiss the preview, or close the camera when no preview is open
    ///
    /// A full close stops the stream and sends [`CameraEvent::Close`].
    pub fn close(&mut self) -> CloseOutcome {
        let outcome = self.gallery.close();
        match outcome {
            CloseOutcome::PreviewCleared => {
                debug!("Preview closed");
                self.feedback.notify(FeedbackCue::LeavePreview);
            }
            CloseOutcome::Closed => {
                info!(images = self.gallery.len(), "Closing camera");
                self.stop();
                self.emit(CameraEvent::Close {
                    images: self.gallery.snapshot(),
                    session: self.session_id,
                });
            }
        }
        outcome
    }
}
