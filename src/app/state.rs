// SPDX-License-Identifier: GPL-3.0-only

//! Camera model state

use crate::app::frame_processor::{QrDecoder, RasterBuffer, ScanEvent, ScanLoop};
use crate::backends::camera::{MediaSource, StreamSession};
use crate::config::Config;
use crate::feedback::UiFeedback;
use crate::gallery::{CapturedImage, ImageCollection};
use crate::pipelines::photo::CaptureEngine;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Camera modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Still capture only
    #[default]
    #[serde(rename = "photo")]
    Photo,
    /// Continuous QR scanning on the live stream
    #[serde(rename = "qrcode")]
    QrCode,
}

/// Opaque reference handed to the consumer with every collection event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outbound notifications to the consumer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum CameraEvent {
    /// A new QR payload was decoded
    Scan(ScanEvent),
    /// A still was captured
    Capture { payload: String },
    /// The consumer asked for the whole collection
    Submit {
        images: Vec<CapturedImage>,
        session: SessionId,
    },
    /// The camera view was closed
    Close {
        images: Vec<CapturedImage>,
        session: SessionId,
    },
    /// Images were removed from the collection
    Remove {
        removed: Vec<CapturedImage>,
        images: Vec<CapturedImage>,
        session: SessionId,
    },
}

/// Consumer-facing camera component
///
/// Owns the stream session and everything that consumes its frames. All
/// methods take `&mut self`; the model is driven from one task.
pub struct CameraModel<S: MediaSource> {
    pub(crate) config: Config,
    pub(crate) source: S,
    pub(crate) session: StreamSession<S::Stream>,
    /// Shared by the scan loop and still capture
    pub(crate) raster: RasterBuffer,
    /// Present only in QR mode
    pub(crate) scanner: Option<ScanLoop>,
    pub(crate) decoder: Box<dyn QrDecoder>,
    pub(crate) capture: CaptureEngine,
    pub(crate) gallery: ImageCollection,
    pub(crate) feedback: Box<dyn UiFeedback>,
    pub(crate) events: UnboundedSender<CameraEvent>,
    pub(crate) session_id: SessionId,
}

impl<S: MediaSource> fmt::Debug for CameraModel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraModel")
            .field("session_id", &self.session_id)
            .field("mode", &self.config.mode)
            .field("session", &self.session)
            .field("scanning", &self.scanner.is_some())
            .field("images", &self.gallery.len())
            .finish()
    }
}
