// SPDX-License-Identifier: GPL-3.0-only

//! Consumer-facing camera component
//!
//! [`CameraModel`] wires the stream session to the scan loop, the capture
//! engine and the image collection, and reports what happens through a
//! channel of [`CameraEvent`]s.
//!
//! # Architecture
//!
//! - `state`: model struct, modes and outbound events
//! - `frame_processor`: raster sampling and QR scanning
//! - `handlers`: operations grouped by domain (camera, capture, gallery)

pub mod frame_processor;
mod handlers;
mod state;

pub use state::{CameraEvent, CameraMode, CameraModel, SessionId};

use crate::app::frame_processor::{QrDecoder, RasterBuffer, RqrrDecoder, ScanLoop};
use crate::backends::camera::{MediaSource, StreamSession, StreamTarget};
use crate::config::Config;
use crate::constants::resolutions;
use crate::errors::AppResult;
use crate::feedback::{NoFeedback, UiFeedback};
use crate::gallery::ImageCollection;
use crate::pipelines::photo::{CaptureEngine, ImageType, PhotoEncoder};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

impl<S: MediaSource> CameraModel<S> {
    /// Build a stopped model and the receiver for its events
    pub fn new(config: Config, source: S) -> AppResult<(Self, UnboundedReceiver<CameraEvent>)> {
        config.validate()?;

        let mut session = StreamSession::new(StreamTarget {
            facing_mode: config.facing_mode,
            resolution: config.resolution,
            frame_rate: config.frame_rate,
        });

        let scanner = match config.mode {
            CameraMode::QrCode => {
                // Decoding cost grows with the raster, so scan at the smallest size
                session.set_target_resolution(resolutions::SMALLEST);
                Some(ScanLoop::new(resolutions::SMALLEST))
            }
            CameraMode::Photo => None,
        };

        let encoder = PhotoEncoder::new(
            ImageType::from_mime(&config.image_type),
            config.clamped_quality(),
        );
        let (events, receiver) = mpsc::unbounded_channel();

        let model = Self {
            raster: RasterBuffer::new(config.fallback_size()),
            capture: CaptureEngine::new(encoder, config.fallback_size()),
            gallery: ImageCollection::new(config.max_images),
            decoder: Box::new(RqrrDecoder::new()),
            feedback: Box::new(NoFeedback),
            scanner,
            session,
            source,
            events,
            session_id: state::SessionId::new(),
            config,
        };
        info!(
            session = %model.session_id,
            mode = ?model.config.mode,
            "Camera model created"
        );
        Ok((model, receiver))
    }

    /// Replace the QR decoder
    pub fn with_decoder(mut self, decoder: impl QrDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Route UI feedback cues to `feedback`
    pub fn with_feedback(mut self, feedback: impl UiFeedback + 'static) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn session(&self) -> &StreamSession<S::Stream> {
        &self.session
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn mode(&self) -> CameraMode {
        self.config.mode
    }

    /// Whether decoded QR payloads are being produced
    pub fn is_scanning(&self) -> bool {
        self.scanner.is_some()
    }

    pub(crate) fn emit(&self, event: CameraEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped, discarding event");
        }
    }
}
